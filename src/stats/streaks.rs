//! Consecutive-day solve streaks.
//!
//! Two current-streak variants exist: `current_streak` walks the full solve
//! date set and is authoritative; `advance` is the fast incremental update
//! used while logging attempts in real time. They diverge for backdated
//! attempt dates, where the recompute path wins.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};

use crate::domain::UserStats;

/// Longest run of consecutive dates. Each date is only walked from its run's
/// anchor (the date whose predecessor is absent), so the whole pass is O(n)
/// amortized.
pub fn longest_streak(solve_dates: &HashSet<NaiveDate>) -> i64 {
    let mut longest = 0;

    for &date in solve_dates {
        if date
            .checked_sub_days(Days::new(1))
            .is_some_and(|prev| solve_dates.contains(&prev))
        {
            continue;
        }

        let mut streak = 1;
        let mut cursor = date;
        while let Some(next) = cursor.checked_add_days(Days::new(1)) {
            if !solve_dates.contains(&next) {
                break;
            }
            cursor = next;
            streak += 1;
        }
        longest = longest.max(streak);
    }

    longest
}

/// Walk backward from today (or yesterday, when today has no solve yet)
pub fn current_streak(solve_dates: &HashSet<NaiveDate>, today: NaiveDate) -> i64 {
    if solve_dates.is_empty() {
        return 0;
    }

    let mut cursor = today;
    if !solve_dates.contains(&cursor) {
        match cursor.checked_sub_days(Days::new(1)) {
            Some(yesterday) if solve_dates.contains(&yesterday) => cursor = yesterday,
            _ => return 0,
        }
    }

    let mut streak = 0;
    loop {
        streak += 1;
        match cursor.checked_sub_days(Days::new(1)) {
            Some(prev) if solve_dates.contains(&prev) => cursor = prev,
            _ => break,
        }
    }
    streak
}

/// Incremental update on a first solve, using only the previous streak state.
/// Anchored on `today`; only valid when attempts are logged as they happen.
pub fn advance(stats: &mut UserStats, today: NaiveDate) {
    let yesterday = today.checked_sub_days(Days::new(1));

    match (stats.last_solved_date, yesterday) {
        (Some(last), Some(y)) if last == y => stats.current_streak += 1,
        (Some(last), _) if last == today => {} // already counted today
        _ => stats.current_streak = 1,
    }

    if stats.current_streak > stats.longest_streak {
        stats.longest_streak = stats.current_streak;
    }
    stats.last_solved_date = Some(today);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dates(items: &[&str]) -> HashSet<NaiveDate> {
        items.iter().map(|s| date(s)).collect()
    }

    #[test]
    fn test_longest_streak_empty() {
        assert_eq!(longest_streak(&HashSet::new()), 0);
    }

    #[test]
    fn test_longest_streak_with_gaps() {
        let set = dates(&[
            "2026-08-01",
            "2026-08-02",
            "2026-08-03",
            "2026-08-05",
            "2026-08-10",
            "2026-08-11",
        ]);
        assert_eq!(longest_streak(&set), 3);
    }

    #[test]
    fn test_longest_streak_single_days() {
        let set = dates(&["2026-08-01", "2026-08-07", "2026-08-20"]);
        assert_eq!(longest_streak(&set), 1);
    }

    #[test]
    fn test_current_streak_includes_today() {
        let set = dates(&["2026-08-28", "2026-08-29", "2026-08-30"]);
        assert_eq!(current_streak(&set, date("2026-08-30")), 3);
    }

    #[test]
    fn test_current_streak_anchors_on_yesterday_when_today_missing() {
        let set = dates(&["2026-08-28", "2026-08-29"]);
        assert_eq!(current_streak(&set, date("2026-08-30")), 2);
    }

    #[test]
    fn test_current_streak_zero_after_gap() {
        let set = dates(&["2026-08-25", "2026-08-26"]);
        assert_eq!(current_streak(&set, date("2026-08-30")), 0);
    }

    #[test]
    fn test_advance_starts_at_one() {
        let mut stats = UserStats::new(1);
        advance(&mut stats, date("2026-08-30"));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.last_solved_date, Some(date("2026-08-30")));
    }

    #[test]
    fn test_advance_extends_from_yesterday() {
        let mut stats = UserStats::new(1);
        stats.current_streak = 4;
        stats.longest_streak = 6;
        stats.last_solved_date = Some(date("2026-08-29"));

        advance(&mut stats, date("2026-08-30"));
        assert_eq!(stats.current_streak, 5);
        assert_eq!(stats.longest_streak, 6);
    }

    #[test]
    fn test_advance_same_day_is_idempotent() {
        let mut stats = UserStats::new(1);
        stats.current_streak = 2;
        stats.longest_streak = 2;
        stats.last_solved_date = Some(date("2026-08-30"));

        advance(&mut stats, date("2026-08-30"));
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn test_advance_resets_after_gap_and_raises_longest() {
        let mut stats = UserStats::new(1);
        stats.current_streak = 3;
        stats.longest_streak = 3;
        stats.last_solved_date = Some(date("2026-08-20"));

        advance(&mut stats, date("2026-08-30"));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 3);

        // and a fresh run can still take over longest
        for d in ["2026-08-31", "2026-09-01", "2026-09-02"] {
            advance(&mut stats, date(d));
        }
        assert_eq!(stats.current_streak, 4);
        assert_eq!(stats.longest_streak, 4);
    }

    #[test]
    fn test_incremental_matches_recompute_for_realtime_runs() {
        let run = ["2026-08-27", "2026-08-28", "2026-08-29", "2026-08-30"];
        let mut stats = UserStats::new(1);
        let mut set = HashSet::new();
        for d in run {
            advance(&mut stats, date(d));
            set.insert(date(d));
        }

        assert_eq!(stats.current_streak, current_streak(&set, date("2026-08-30")));
        assert_eq!(stats.longest_streak, longest_streak(&set));
    }
}
