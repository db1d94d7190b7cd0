//! Deterministic ordering of leaderboard entries.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::models::LeaderboardEntry;

/// Sort entries into display order and assign 1-based ranks.
///
/// Order: points descending, chores completed descending, earliest
/// completion ascending (missing timestamps last), profile id ascending.
/// The final key makes the order total, so two runs over the same data
/// always agree.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.chores_completed.cmp(&a.chores_completed))
            .then_with(|| cmp_earliest(a.earliest_completion, b.earliest_completion))
            .then_with(|| a.profile_id.cmp(&b.profile_id))
    });

    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as i64 + 1;
    }

    entries
}

fn cmp_earliest(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn entry(
        id: u128,
        points: i64,
        chores_completed: i64,
        earliest: Option<DateTime<Utc>>,
    ) -> LeaderboardEntry {
        LeaderboardEntry {
            rank: 0,
            profile_id: Uuid::from_u128(id),
            display_name: format!("profile-{id}"),
            avatar_url: None,
            points,
            chores_completed,
            earliest_completion: earliest,
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_points_dominate_the_order() {
        let ranked = rank_entries(vec![
            entry(1, 5, 10, Some(at(1))),
            entry(2, 30, 1, Some(at(9))),
            entry(3, 12, 4, Some(at(2))),
        ]);

        let order: Vec<u128> = ranked.iter().map(|e| e.profile_id.as_u128()).collect();
        assert_eq!(order, vec![2, 3, 1]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn test_ties_break_on_chores_then_earliest_completion() {
        // All on 10 points: A has fewer chores, B and C tie on chores but C
        // finished first.
        let a = entry(1, 10, 2, Some(at(1)));
        let b = entry(2, 10, 3, Some(at(2)));
        let c = entry(3, 10, 3, Some(at(0)));

        let ranked = rank_entries(vec![a, b, c]);
        let order: Vec<u128> = ranked.iter().map(|e| e.profile_id.as_u128()).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_missing_earliest_completion_sorts_last_within_tie() {
        let ranked = rank_entries(vec![
            entry(1, 10, 3, None),
            entry(2, 10, 3, Some(at(5))),
        ]);
        let order: Vec<u128> = ranked.iter().map(|e| e.profile_id.as_u128()).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn test_profile_id_resolves_full_ties() {
        let ranked = rank_entries(vec![
            entry(7, 10, 3, Some(at(4))),
            entry(2, 10, 3, Some(at(4))),
            entry(5, 10, 3, Some(at(4))),
        ]);
        let order: Vec<u128> = ranked.iter().map(|e| e.profile_id.as_u128()).collect();
        assert_eq!(order, vec![2, 5, 7]);
    }

    #[test]
    fn test_ranks_are_sequential_even_on_ties() {
        let ranked = rank_entries(vec![
            entry(1, 10, 3, Some(at(4))),
            entry(2, 10, 3, Some(at(4))),
        ]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert!(rank_entries(Vec::new()).is_empty());
    }
}
