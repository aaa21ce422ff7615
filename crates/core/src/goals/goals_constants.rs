/// Streak window thresholds
///
/// A streak continues when consecutive failures are logged within 24 hours
/// of each other. Between 24 and 34 hours the streak is preserved but flagged
/// as at risk (10-hour grace buffer). Past 34 hours the streak is lost and
/// restarts at day one.

/// Maximum elapsed hours between failures for the streak to keep growing.
pub const STREAK_CONTINUE_MAX_HOURS: i64 = 24;

/// Maximum elapsed hours before the streak is considered lost.
pub const STREAK_GRACE_MAX_HOURS: i64 = 34;

/// Streak status values as persisted and serialized.
pub const STREAK_STATUS_ACTIVE: &str = "active";
pub const STREAK_STATUS_WARNING: &str = "warning";
pub const STREAK_STATUS_BROKEN: &str = "broken";

/// Smallest accepted completion target for a goal.
pub const MIN_TARGET_FAILURES: i32 = 1;
