//! Display formatting for counts, percentages and dates.

use chrono::NaiveDate;

/// Abbreviate a count for display: `2.4M`, `1.5K`, `999`.
///
/// The suffix is chosen by magnitude, so negative values keep their sign
/// (`-1500` formats as `-1.5K`). Values under a thousand are rounded to an
/// integer.
pub fn format_metric(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", round1(value / 1_000_000.0))
    } else if magnitude >= 1_000.0 {
        format!("{:.1}K", round1(value / 1_000.0))
    } else {
        format_thousands(value.round() as i64)
    }
}

/// Integer with comma thousands separators: `1,234,567`.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Signed percentage badge, one decimal: `+12.5%`, `-2.1%`, `0.0%`.
pub fn format_change(change_percent: f64) -> String {
    let rounded = round1(change_percent);
    if rounded > 0.0 {
        format!("+{:.1}%", rounded)
    } else if rounded < 0.0 {
        format!("{:.1}%", rounded)
    } else {
        "0.0%".to_string()
    }
}

/// Unsigned percentage, one decimal. Shown next to a direction arrow.
pub fn format_change_magnitude(change_percent: f64) -> String {
    format!("{:.1}%", round1(change_percent.abs()))
}

/// Table date: `Jan 15, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Compact date for filter summaries: `Jan 15`.
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// Round to one decimal, halves away from zero.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
