//! Leaderboard ranking.

use serde::Serialize;
use std::cmp::Ordering;

/// An entity with its 1-based position in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntity<T> {
    pub entity: T,
    pub rank: usize,
    pub metric_value: f64,
}

/// Order entities by `selector`, highest first.
///
/// The sort is stable: entities with equal values keep their input order.
/// Ranks are output positions, so equal values still receive consecutive,
/// distinct ranks. NaN values sort last.
pub fn rank<T, I, F>(entities: I, selector: F) -> Vec<RankedEntity<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> f64,
{
    let mut scored: Vec<(f64, T)> = entities
        .into_iter()
        .map(|entity| (selector(&entity), entity))
        .collect();

    scored.sort_by(|a, b| descending(a.0, b.0));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (metric_value, entity))| RankedEntity {
            entity,
            rank: i + 1,
            metric_value,
        })
        .collect()
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<T: Copy>(ranked: &[RankedEntity<(T, f64)>]) -> Vec<T> {
        ranked.iter().map(|r| r.entity.0).collect()
    }

    #[test]
    fn test_rank_descending_with_positions() {
        let members = vec![("david", 320.0), ("sarah", 850.0), ("mike", 620.0)];
        let ranked = rank(members, |m| m.1);

        assert_eq!(names(&ranked), vec!["sarah", "mike", "david"]);
        assert_eq!(
            ranked.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(ranked[0].metric_value, 850.0);
    }

    #[test]
    fn test_rank_permutation_invariant_for_distinct_values() {
        let base = [("a", 5.0), ("b", 3.0), ("c", 9.0), ("d", 1.0)];
        let permutations = [
            vec![base[0], base[1], base[2], base[3]],
            vec![base[3], base[2], base[1], base[0]],
            vec![base[2], base[0], base[3], base[1]],
            vec![base[1], base[3], base[0], base[2]],
        ];

        for input in permutations {
            let ranked = rank(input, |e| e.1);
            assert_eq!(names(&ranked), vec!["c", "a", "b", "d"]);
            for pair in ranked.windows(2) {
                assert!(pair[0].metric_value >= pair[1].metric_value);
            }
        }
    }

    #[test]
    fn test_rank_stable_for_ties() {
        let ranked = rank(vec![("A", 10.0), ("B", 10.0)], |e| e.1);
        assert_eq!(names(&ranked), vec!["A", "B"]);

        let ranked = rank(vec![("B", 10.0), ("A", 10.0)], |e| e.1);
        assert_eq!(names(&ranked), vec!["B", "A"]);
    }

    #[test]
    fn test_rank_ties_get_distinct_ranks() {
        let ranked = rank(vec![("x", 1.0), ("y", 7.0), ("z", 7.0)], |e| e.1);
        assert_eq!(names(&ranked), vec!["y", "z", "x"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_rank_empty() {
        let ranked = rank(Vec::<(&str, f64)>::new(), |e| e.1);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_nan_sorts_last() {
        let ranked = rank(vec![("nan", f64::NAN), ("one", 1.0), ("zero", 0.0)], |e| e.1);
        assert_eq!(names(&ranked), vec!["one", "zero", "nan"]);
    }

    #[test]
    fn test_rank_negative_zero_ties_with_zero() {
        let ranked = rank(vec![("neg", -0.0), ("pos", 0.0)], |e| e.1);
        assert_eq!(names(&ranked), vec!["neg", "pos"]);
    }
}
