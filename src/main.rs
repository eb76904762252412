use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_pulse::calculate::{format_metric, Direction, Granularity};
use social_pulse::config::AppConfig;
use social_pulse::export::{self, DateRangePreset, ExportFormat, ExportRequest};
use social_pulse::ingest::{self, RawEntry};
use social_pulse::models::{DateRange, MetricKind, PlatformId};
use social_pulse::present::{
    format_time_ago, AlertRules, ComparisonCard, Dashboard, DashboardState, DistributionSlice,
    DrilldownView, KpiCard, LeaderboardRow, PostSort, TableView,
};
use social_pulse::{parse_window_days, sample};
use social_pulse::storage::{JsonlRepository, MetricsRepository, StorageConfig};

#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "Social media performance dashboard in the terminal")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./pulse.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print view models as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Dashboard selection shared by the view commands.
#[derive(Args, Debug, Clone)]
struct Selection {
    /// Platforms to include, comma separated (default from config)
    #[arg(long, value_delimiter = ',')]
    platforms: Vec<PlatformId>,

    /// Include every platform
    #[arg(long, conflicts_with = "platforms")]
    all_platforms: bool,

    /// Window start (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Window end (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Window length ending today, e.g. "30", "7d" or "4w"
    #[arg(long, conflicts_with = "from")]
    days: Option<String>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Case-insensitive search over platform and account
    #[arg(long, default_value = "")]
    search: String,

    /// Metric for comparisons, trend, distribution and leaderboard
    #[arg(long)]
    metric: Option<MetricKind>,

    /// Comparison bucket: week or month
    #[arg(long)]
    period: Option<Granularity>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the demo dataset to the data directory
    Seed {
        /// Include six months of per-platform views history
        #[arg(long)]
        history: bool,
    },

    /// Add or replace one day of metrics for an account
    Add {
        #[arg(long)]
        platform: String,
        #[arg(long)]
        account: String,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "0")]
        reach: String,
        #[arg(long, default_value = "0")]
        views: String,
        #[arg(long, default_value = "0")]
        engagement: String,
        #[arg(long, default_value = "0")]
        clicks: String,
        #[arg(long, default_value = "0")]
        leads: String,
        #[arg(long, default_value = "0")]
        conversions: String,
    },

    /// Every widget at once
    Dashboard {
        #[command(flatten)]
        selection: Selection,
    },

    /// KPI cards
    Kpis {
        #[command(flatten)]
        selection: Selection,
    },

    /// Filtered data table
    Table {
        #[command(flatten)]
        selection: Selection,
    },

    /// Period-over-period comparison per platform
    Compare {
        #[command(flatten)]
        selection: Selection,
    },

    /// Team leaderboard
    Leaderboard {
        #[command(flatten)]
        selection: Selection,
    },

    /// Platform distribution and trend of the selected metric
    Distribution {
        #[command(flatten)]
        selection: Selection,
    },

    /// Performance alerts
    Alerts {
        #[command(flatten)]
        selection: Selection,
    },

    /// Top posts and campaigns for one platform
    Drilldown {
        /// Platform to inspect
        platform: PlatformId,

        /// Post order: engagement, reach or date
        #[arg(long, default_value = "engagement")]
        sort: PostSort,

        #[command(flatten)]
        selection: Selection,
    },

    /// Export records as a report file
    Export {
        /// csv, excel, pdf or png (default from config)
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Metrics to include, comma separated (default from config)
        #[arg(long, value_delimiter = ',')]
        metrics: Vec<MetricKind>,

        /// Platforms to include, comma separated (default: all)
        #[arg(long, value_delimiter = ',')]
        platforms: Vec<PlatformId>,

        /// last7days, last30days, last90days, thismonth or lastmonth
        #[arg(long, default_value = "last30days", conflicts_with = "from")]
        preset: String,

        /// Custom range start (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Custom range end (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Output file (default: <data-dir>/exports/<file name>)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the report instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        AppConfig::from_file(&cli.config)
            .with_context(|| format!("Failed to load config {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting pulse v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Data directory: {:?}", config.data_dir);

    let repo = JsonlRepository::new(StorageConfig::new(config.data_dir.clone()));

    match cli.command {
        Commands::Seed { history } => {
            let dataset = if history {
                sample::dataset_with_history()
            } else {
                sample::dataset()
            };
            repo.seed(&dataset).context("Failed to seed data directory")?;

            println!("=== Seeded {} ===", config.data_dir.display());
            println!("Records:    {}", dataset.records.len());
            println!("Team:       {}", dataset.team.len());
            println!("Posts:      {}", dataset.posts.len());
            println!("Campaigns:  {}", dataset.campaigns.len());
        }
        Commands::Add {
            platform,
            account,
            date,
            reach,
            views,
            engagement,
            clicks,
            leads,
            conversions,
        } => {
            let entry = RawEntry {
                platform,
                account,
                date,
                reach,
                views,
                engagement,
                clicks,
                leads,
                conversions,
            };
            let record = ingest::validate_entry(&entry).context("Invalid entry")?;
            let replaced = repo.add_record(&record).context("Failed to store record")?;

            let verb = if replaced { "Updated" } else { "Added" };
            println!(
                "{} {} {} on {} ({})",
                verb,
                record.platform.label(),
                record.account,
                record.date,
                record.id
            );
        }
        Commands::Dashboard { selection } => {
            let dashboard = dashboard(repo, &config, &selection)?;
            let view = dashboard.view(Utc::now())?;
            if cli.json {
                return print_json(&view);
            }
            print_kpis(&view.kpis);
            print_comparisons(&view.comparisons);
            print_table(&view.table);
            print_distribution(&view.distribution);
            print_leaderboard(&view.leaderboard, view.state.selected_metric);
            println!("\n=== Alerts ({}) ===\n", view.alerts.len());
            let now = Utc::now();
            for alert in &view.alerts {
                println!(
                    "  [{}] {}: {} ({})",
                    alert.kind,
                    alert.title,
                    alert.message,
                    format_time_ago(alert.timestamp, now)
                );
            }
        }
        Commands::Kpis { selection } => {
            let kpis = dashboard(repo, &config, &selection)?.kpis()?;
            if cli.json {
                return print_json(&kpis);
            }
            print_kpis(&kpis);
        }
        Commands::Table { selection } => {
            let table = dashboard(repo, &config, &selection)?.table()?;
            if cli.json {
                return print_json(&table);
            }
            print_table(&table);
        }
        Commands::Compare { selection } => {
            let comparisons = dashboard(repo, &config, &selection)?.comparisons()?;
            if cli.json {
                return print_json(&comparisons);
            }
            print_comparisons(&comparisons);
        }
        Commands::Leaderboard { selection } => {
            let dashboard = dashboard(repo, &config, &selection)?;
            let rows = dashboard.leaderboard()?;
            if cli.json {
                return print_json(&rows);
            }
            print_leaderboard(&rows, dashboard.state().selected_metric);
        }
        Commands::Distribution { selection } => {
            let dashboard = dashboard(repo, &config, &selection)?;
            let slices = dashboard.distribution()?;
            let trend = dashboard.trend()?;
            if cli.json {
                return print_json(&serde_json::json!({
                    "distribution": slices,
                    "trend": trend,
                }));
            }
            print_distribution(&slices);

            println!("\n=== Trend ({}) ===\n", dashboard.state().selected_metric.label());
            for bucket in &trend {
                let values: Vec<String> = bucket
                    .values
                    .iter()
                    .map(|(platform, value)| {
                        format!("{}={}", platform, format_metric(*value))
                    })
                    .collect();
                println!("  {:<16} {}", bucket.period, values.join("  "));
            }
        }
        Commands::Alerts { selection } => {
            let now = Utc::now();
            let feed = dashboard(repo, &config, &selection)?.alerts(now)?;
            if cli.json {
                return print_json(&feed);
            }
            let active = feed.active();
            println!("=== Performance Alerts ({}) ===\n", active.len());
            if active.is_empty() {
                println!("  No active alerts.");
            }
            for alert in active {
                println!("  [{}] {}", alert.kind, alert.title);
                println!(
                    "      {} ({})",
                    alert.message,
                    format_time_ago(alert.timestamp, now)
                );
            }
        }
        Commands::Drilldown {
            platform,
            sort,
            selection,
        } => {
            let view = dashboard(repo, &config, &selection)?.drilldown(platform, sort)?;
            if cli.json {
                return print_json(&view);
            }
            print_drilldown(&view);
        }
        Commands::Export {
            format,
            metrics,
            platforms,
            preset,
            from,
            to,
            today,
            output,
            stdout,
        } => {
            let today = today
                .or(config.dashboard.reference_date)
                .unwrap_or_else(|| Utc::now().date_naive());
            let preset = match (from, to) {
                (Some(from), Some(to)) => DateRangePreset::Custom(checked_range(from, to)?),
                _ => preset.parse::<DateRangePreset>()?,
            };

            let request = ExportRequest {
                format: format.unwrap_or(config.export.format),
                metrics: if metrics.is_empty() {
                    config.export.metrics.clone()
                } else {
                    metrics
                },
                platforms: if platforms.is_empty() {
                    PlatformId::ALL.to_vec()
                } else {
                    platforms
                },
                range: preset.resolve(today),
                file_name: config.export.file_name.clone(),
            };

            tracing::info!("{}", request.summary());
            let records = repo.records().context("Failed to read records")?;
            let report = export::render(&request, &records)?;

            if stdout {
                print!("{}", report);
            } else {
                let path = output
                    .unwrap_or_else(|| repo.config().exports_dir().join(request.output_name()));
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                std::fs::write(&path, report)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("{}", request.summary());
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}

fn dashboard(
    repo: JsonlRepository,
    config: &AppConfig,
    selection: &Selection,
) -> Result<Dashboard<JsonlRepository>> {
    let state = build_state(config, selection)?;
    tracing::debug!("Dashboard selection: {:?}", state);
    Ok(Dashboard::new(repo, state).with_alert_rules(AlertRules::from(&config.alerts)))
}

fn build_state(config: &AppConfig, selection: &Selection) -> Result<DashboardState> {
    let today = selection
        .today
        .or(config.dashboard.reference_date)
        .unwrap_or_else(|| Utc::now().date_naive());

    let mut state = DashboardState::from_config(&config.dashboard, today);

    let days = match selection.days.as_deref() {
        Some(input) => match parse_window_days(input) {
            Some(days) => days,
            None => bail!("Invalid --days value: {}", input),
        },
        None => config.dashboard.window_days,
    };

    state.date_range = match (selection.from, selection.to) {
        (Some(from), Some(to)) => checked_range(from, to)?,
        (None, Some(to)) => DateRange::last_days(to, days),
        _ => DateRange::last_days(today, days),
    };

    if selection.all_platforms {
        state.selected_platforms.clear();
    } else if !selection.platforms.is_empty() {
        state.selected_platforms.clear();
        for platform in &selection.platforms {
            if !state.selected_platforms.contains(platform) {
                state.toggle_platform(*platform);
            }
        }
    }

    state.search_text = selection.search.clone();
    if let Some(metric) = selection.metric {
        state.selected_metric = metric;
    }
    if let Some(period) = selection.period {
        state.comparison_period = period;
    }

    Ok(state)
}

fn checked_range(from: NaiveDate, to: NaiveDate) -> Result<DateRange> {
    if from > to {
        bail!("--from {} is after --to {}", from, to);
    }
    Ok(DateRange::new(from, to))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn print_kpis(kpis: &[KpiCard]) {
    println!("=== Key Metrics ===\n");
    for kpi in kpis {
        println!(
            "  {:<14} {:>10}  {:>8}  {}",
            kpi.title, kpi.display, kpi.change_label, kpi.subtitle
        );
    }
}

fn print_comparisons(cards: &[ComparisonCard]) {
    let Some(first) = cards.first() else {
        return;
    };
    println!(
        "\n=== {} vs {} ({}) ===\n",
        first.period,
        first.previous_period,
        first.metric.label()
    );
    for card in cards {
        let arrow = match card.comparison.direction {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Flat => "→",
        };
        let bar = "#".repeat((card.bar_width / 5.0).round() as usize);
        println!(
            "  {:<10} {:>10} {:>10}  {} {:>7}  {}",
            card.label,
            format_metric(card.comparison.current),
            format_metric(card.comparison.previous),
            arrow,
            card.magnitude_label,
            bar
        );
    }
}

fn print_table(table: &TableView) {
    println!("\n=== Data Table ===\n");
    println!(
        "  {:<13} {:<10} {:<18} {:>7} {:>7} {:>7} {:>7} {:>6} {:>6}",
        "Date", "Platform", "Account", "Reach", "Views", "Engage", "Clicks", "Leads", "Conv"
    );
    for row in &table.rows {
        println!(
            "  {:<13} {:<10} {:<18} {:>7} {:>7} {:>7} {:>7} {:>6} {:>6}",
            row.date,
            row.platform,
            row.account,
            row.reach,
            row.views,
            row.engagement,
            row.clicks,
            row.leads,
            row.conversions
        );
    }
    if let Some(message) = &table.empty_message {
        println!("  {}", message);
    }
    println!("\n  {}", table.summary);
    println!("  {}", table.filters);
}

fn print_distribution(slices: &[DistributionSlice]) {
    println!("\n=== Platform Distribution ===\n");
    for slice in slices {
        println!(
            "  {:<10} {:>10} {:>6.1}%",
            slice.label, slice.display, slice.share_percent
        );
    }
}

fn print_leaderboard(rows: &[LeaderboardRow], metric: MetricKind) {
    println!("\n=== Team Leaderboard ({}) ===\n", metric.label());
    for row in rows {
        println!(
            "  #{:<2} [{:<2}] {:<18} {:<22} {:>2} accts {:>12}  {}",
            row.rank,
            row.initials,
            row.name,
            row.role,
            row.accounts_managed,
            row.display,
            row.performance
        );
    }
}

fn print_drilldown(view: &DrilldownView) {
    println!("=== {} ===\n", view.title);
    println!("Top posts (by {:?}):", view.sort);
    if view.posts.is_empty() {
        println!("  No posts for this platform.");
    }
    for post in &view.posts {
        println!("  {}. {} ({}, {})", post.rank, post.text, post.author, post.date);
        println!(
            "     likes {}  comments {}  shares {}  reach {}",
            post.likes, post.comments, post.shares, post.reach
        );
    }

    println!("\nCampaigns:");
    if view.campaigns.is_empty() {
        println!("  No campaigns for this platform.");
    }
    for campaign in &view.campaigns {
        println!(
            "  {:<20} {:>3} posts  reach {:>7}  engagement {:>5}  {:?}",
            campaign.name, campaign.posts, campaign.reach, campaign.engagement_rate, campaign.status
        );
    }
}
