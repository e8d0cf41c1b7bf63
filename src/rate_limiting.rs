// ABOUTME: Daily usage quota engine for lesson and chat-message gating
// ABOUTME: Implements per-tier daily limits with UTC day-boundary reset calculation
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Daily Usage Quotas
//!
//! This module provides the quota calculation used to gate how many lessons
//! and chat messages a user may consume per day. The same calculation applies
//! to both actions; only the per-tier limit differs.
//!
//! "Today" is the UTC calendar date, uniformly for lessons and messages, and
//! quotas reset at the next UTC midnight.

use crate::constants::limits;
use crate::models::SubscriptionTier;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Quota status for one action kind on one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyQuota {
    /// Whether the action is currently blocked
    pub is_limited: bool,
    /// Maximum actions allowed today (None = unlimited)
    pub limit: Option<u32>,
    /// Remaining actions today (None = unlimited)
    pub remaining: Option<u32>,
    /// When the quota resets (next UTC midnight; None = unlimited)
    pub reset_at: Option<DateTime<Utc>>,
    /// The tier this quota was computed for
    pub tier: SubscriptionTier,
}

impl DailyQuota {
    /// Unlimited quota for the premium tier
    #[must_use]
    const fn unlimited(tier: SubscriptionTier) -> Self {
        Self {
            is_limited: false,
            limit: None,
            remaining: None,
            reset_at: None,
            tier,
        }
    }

    /// Metered quota derived from a fixed daily limit and today's usage
    #[must_use]
    fn metered(tier: SubscriptionTier, limit: u32, used_today: u32) -> Self {
        Self {
            is_limited: used_today >= limit,
            limit: Some(limit),
            remaining: Some(limit.saturating_sub(used_today)),
            reset_at: Some(next_utc_midnight()),
            tier,
        }
    }

    /// Whether the gated action may proceed
    #[must_use]
    pub const fn allows_action(&self) -> bool {
        !self.is_limited
    }
}

/// Compute the lesson quota for a user
///
/// Zenith users are never limited. Explorer users may complete one lesson per
/// UTC day; `lessons_completed_today` comes from the `user_progress` row for
/// today (an absent row counts as zero).
#[must_use]
pub fn lesson_quota(tier: SubscriptionTier, lessons_completed_today: u32) -> DailyQuota {
    match tier {
        SubscriptionTier::Zenith => DailyQuota::unlimited(tier),
        SubscriptionTier::Explorer => DailyQuota::metered(
            tier,
            limits::EXPLORER_DAILY_LESSON_LIMIT,
            lessons_completed_today,
        ),
    }
}

/// Compute the chat-message quota for a user
///
/// Zenith users are never limited. Explorer users may send five messages per
/// UTC day; `messages_sent_today` counts persisted user-role messages with
/// `created_at` inside today's UTC day window.
#[must_use]
pub fn message_quota(tier: SubscriptionTier, messages_sent_today: u32) -> DailyQuota {
    match tier {
        SubscriptionTier::Zenith => DailyQuota::unlimited(tier),
        SubscriptionTier::Explorer => DailyQuota::metered(
            tier,
            limits::EXPLORER_DAILY_MESSAGE_LIMIT,
            messages_sent_today,
        ),
    }
}

/// The current UTC calendar date
#[must_use]
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Half-open UTC window `[start, end)` covering one calendar date
#[must_use]
pub fn utc_day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc();
    (start, start + Duration::days(1))
}

/// The next UTC midnight after now
fn next_utc_midnight() -> DateTime<Utc> {
    let (_, end) = utc_day_bounds(utc_today());
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zenith_never_limited() {
        for used in [0, 1, 5, 999, u32::MAX] {
            assert!(lesson_quota(SubscriptionTier::Zenith, used).allows_action());
            assert!(message_quota(SubscriptionTier::Zenith, used).allows_action());
        }
    }

    #[test]
    fn test_explorer_lesson_gate() {
        let open = lesson_quota(SubscriptionTier::Explorer, 0);
        assert!(open.allows_action());
        assert_eq!(open.limit, Some(1));
        assert_eq!(open.remaining, Some(1));

        let closed = lesson_quota(SubscriptionTier::Explorer, 1);
        assert!(!closed.allows_action());
        assert_eq!(closed.remaining, Some(0));

        // Counts beyond the limit stay saturated at zero remaining
        assert_eq!(
            lesson_quota(SubscriptionTier::Explorer, 7).remaining,
            Some(0)
        );
    }

    #[test]
    fn test_explorer_message_gate() {
        for sent in 0..5 {
            assert!(
                message_quota(SubscriptionTier::Explorer, sent).allows_action(),
                "message {sent} should be allowed"
            );
        }
        assert!(!message_quota(SubscriptionTier::Explorer, 5).allows_action());
        assert!(!message_quota(SubscriptionTier::Explorer, 6).allows_action());
    }

    #[test]
    fn test_metered_quota_reports_reset() {
        let quota = message_quota(SubscriptionTier::Explorer, 2);
        let reset = quota.reset_at.unwrap();
        assert!(reset > Utc::now());
        assert_eq!(reset.time(), chrono::NaiveTime::MIN);
    }

    #[test]
    fn test_day_bounds_are_half_open() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let (start, end) = utc_day_bounds(date);
        assert_eq!(end - start, Duration::days(1));
        assert_eq!(start.date_naive(), date);
        assert_eq!(end.date_naive(), date.succ_opt().unwrap());
    }
}
