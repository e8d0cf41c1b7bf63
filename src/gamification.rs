// ABOUTME: Streak accounting and Zen Garden milestone mapping
// ABOUTME: Pure policy functions applied on every lesson or recommendation completion
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Streaks and the Zen Garden
//!
//! Streak semantics: the streak counts consecutive UTC calendar days with at
//! least one completion. A day with several completions counts once; a gap of
//! one or more days resets the streak to 1. The source application
//! incremented the counter on every completion regardless of date — that
//! behavior was judged a defect and is deliberately not reproduced. See
//! `advance_streak` for the canonical rules.

use crate::constants::gamification::{FLOWER_MILESTONES, POINTS_PER_LESSON};
use crate::models::UserStreaks;
use chrono::{Duration, NaiveDate, Utc};

/// Apply one completion to a streak record for the given calendar date
///
/// Rules, in order:
/// - `last_activity_date == today`: the day is already counted, the current
///   streak is unchanged;
/// - `last_activity_date == today - 1`: the chain continues, increment;
/// - anything else (including a fresh record): the chain restarts at 1.
///
/// Unconditionally: `longest_streak` is raised to cover the new current
/// streak, ten points are awarded, the lifetime lesson count grows by one,
/// and `last_activity_date` becomes `today`. Points and the lifetime count
/// therefore never decrease, and `longest_streak >= current_streak` holds
/// after every call.
#[must_use]
pub fn advance_streak(streaks: &UserStreaks, today: NaiveDate) -> UserStreaks {
    let new_current = match streaks.last_activity_date {
        Some(last) if last == today => streaks.current_streak,
        Some(last) if last + Duration::days(1) == today => streaks.current_streak + 1,
        _ => 1,
    };

    UserStreaks {
        user_id: streaks.user_id,
        current_streak: new_current,
        longest_streak: streaks.longest_streak.max(new_current),
        zen_garden_points: streaks.zen_garden_points + POINTS_PER_LESSON,
        total_lessons_completed: streaks.total_lessons_completed + 1,
        last_activity_date: Some(today),
        streak_freeze_used: streaks.streak_freeze_used,
        created_at: streaks.created_at,
        updated_at: Utc::now(),
    }
}

/// Number of Zen Garden flowers earned for a lifetime lesson count
///
/// One flower blooms at each threshold of the fixed ladder
/// `[1, 3, 5, 7, 9, 12, 15, 18, 21, 25, 30]`; the result is monotone
/// non-decreasing in `total_lessons`.
#[must_use]
pub fn milestones_reached(total_lessons: u32) -> usize {
    FLOWER_MILESTONES
        .iter()
        .filter(|&&m| total_lessons >= m)
        .count()
}

/// The next unearned milestone, if any remain on the ladder
#[must_use]
pub fn next_milestone(total_lessons: u32) -> Option<u32> {
    FLOWER_MILESTONES
        .iter()
        .copied()
        .find(|&m| total_lessons < m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn streaks_with(
        current: u32,
        longest: u32,
        last_activity: Option<NaiveDate>,
    ) -> UserStreaks {
        let mut s = UserStreaks::new(Uuid::new_v4());
        s.current_streak = current;
        s.longest_streak = longest;
        s.last_activity_date = last_activity;
        s
    }

    #[test]
    fn test_first_completion_starts_streak() {
        let today = date(2025, 6, 1);
        let updated = advance_streak(&UserStreaks::new(Uuid::new_v4()), today);

        assert_eq!(updated.current_streak, 1);
        assert_eq!(updated.longest_streak, 1);
        assert_eq!(updated.zen_garden_points, 10);
        assert_eq!(updated.total_lessons_completed, 1);
        assert_eq!(updated.last_activity_date, Some(today));
    }

    #[test]
    fn test_consecutive_day_increments() {
        let streaks = streaks_with(7, 12, Some(date(2025, 6, 1)));
        let updated = advance_streak(&streaks, date(2025, 6, 2));

        assert_eq!(updated.current_streak, 8);
        // 12 >= 8, so the longest streak stays put
        assert_eq!(updated.longest_streak, 12);
    }

    #[test]
    fn test_same_day_counts_once() {
        let today = date(2025, 6, 2);
        let streaks = streaks_with(3, 3, Some(today));
        let updated = advance_streak(&streaks, today);

        assert_eq!(updated.current_streak, 3);
        // Points and lifetime count still accrue on repeat completions
        assert_eq!(updated.zen_garden_points, streaks.zen_garden_points + 10);
        assert_eq!(
            updated.total_lessons_completed,
            streaks.total_lessons_completed + 1
        );
    }

    #[test]
    fn test_gap_resets_to_one() {
        let streaks = streaks_with(9, 9, Some(date(2025, 6, 1)));
        let updated = advance_streak(&streaks, date(2025, 6, 5));

        assert_eq!(updated.current_streak, 1);
        assert_eq!(updated.longest_streak, 9);
    }

    #[test]
    fn test_longest_follows_new_record() {
        let streaks = streaks_with(12, 12, Some(date(2025, 6, 1)));
        let updated = advance_streak(&streaks, date(2025, 6, 2));

        assert_eq!(updated.current_streak, 13);
        assert_eq!(updated.longest_streak, 13);
    }

    #[test]
    fn test_invariants_over_mixed_sequence() {
        let mut streaks = UserStreaks::new(Uuid::new_v4());
        let days = [
            date(2025, 6, 1),
            date(2025, 6, 2),
            date(2025, 6, 2), // same-day repeat
            date(2025, 6, 3),
            date(2025, 6, 7), // gap, resets
            date(2025, 6, 8),
        ];

        let mut prev_points = 0;
        let mut prev_total = 0;
        for day in days {
            streaks = advance_streak(&streaks, day);
            assert!(streaks.longest_streak >= streaks.current_streak);
            assert!(streaks.zen_garden_points >= prev_points);
            assert!(streaks.total_lessons_completed >= prev_total);
            prev_points = streaks.zen_garden_points;
            prev_total = streaks.total_lessons_completed;
        }

        assert_eq!(streaks.current_streak, 2);
        assert_eq!(streaks.longest_streak, 3);
        assert_eq!(streaks.total_lessons_completed, 6);
        assert_eq!(streaks.zen_garden_points, 60);
    }

    #[test]
    fn test_milestones_reached() {
        assert_eq!(milestones_reached(0), 0);
        assert_eq!(milestones_reached(1), 1);
        assert_eq!(milestones_reached(9), 5);
        assert_eq!(milestones_reached(10), 5);
        assert_eq!(milestones_reached(12), 6);
        assert_eq!(milestones_reached(30), 11);
        assert_eq!(milestones_reached(1000), 11);
    }

    #[test]
    fn test_milestones_monotone() {
        let mut prev = 0;
        for n in 0..40 {
            let reached = milestones_reached(n);
            assert!(reached >= prev);
            prev = reached;
        }
    }

    #[test]
    fn test_next_milestone() {
        assert_eq!(next_milestone(0), Some(1));
        assert_eq!(next_milestone(9), Some(12));
        assert_eq!(next_milestone(29), Some(30));
        assert_eq!(next_milestone(30), None);
    }
}
