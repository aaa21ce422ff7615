//! Streak advancement for the failure-logging path.
//!
//! A streak counts consecutive "active" logging days. Rather than a strict
//! same-calendar-day check, continuation tolerates up to 24 hours between
//! failures (logging at 11pm one day and 8am the next still counts as daily),
//! and a 10-hour grace window flags the streak as at risk before it is lost.

use chrono::{DateTime, Duration, Utc};

use super::goals_constants::{STREAK_CONTINUE_MAX_HOURS, STREAK_GRACE_MAX_HOURS};
use super::goals_model::StreakStatus;

/// Computes the streak count and status after a failure logged at `now`.
///
/// - No prior failure: streak starts at 1, `Active`.
/// - Elapsed <= 24h since the last failure: streak + 1, `Active`.
/// - Elapsed in (24h, 34h]: streak unchanged, `Warning`.
/// - Elapsed > 34h: streak resets to 1 (this failure is day one), `Broken`.
///
/// Both thresholds are inclusive on the upper bound.
pub fn advance_streak(
    current_streak: i32,
    last_failure_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> (i32, StreakStatus) {
    let last = match last_failure_at {
        Some(last) => last,
        None => return (1, StreakStatus::Active),
    };

    let elapsed = now - last;
    if elapsed <= Duration::hours(STREAK_CONTINUE_MAX_HOURS) {
        (current_streak + 1, StreakStatus::Active)
    } else if elapsed <= Duration::hours(STREAK_GRACE_MAX_HOURS) {
        (current_streak, StreakStatus::Warning)
    } else {
        (1, StreakStatus::Broken)
    }
}
