//! Per-user daily generation quota, backed by the usage_counters table.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::models::NewUsageCounter;
use crate::schema::usage_counters;

pub const DEFAULT_DAILY_LIMIT: i32 = 100;

/// Daily generation limit, overridable via HEARTGLOW_DAILY_LIMIT.
pub fn daily_limit() -> i32 {
    std::env::var("HEARTGLOW_DAILY_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DAILY_LIMIT)
}

/// Count one request against the user's quota for `day` and return the
/// updated count. A single upsert does the read-modify-write, so two
/// concurrent requests cannot both claim the same slot.
pub fn check_and_increment(
    conn: &mut PgConnection,
    user_id: uuid::Uuid,
    day: NaiveDate,
) -> Result<i32, diesel::result::Error> {
    diesel::insert_into(usage_counters::table)
        .values(&NewUsageCounter {
            user_id,
            day,
            count: 1,
        })
        .on_conflict((usage_counters::user_id, usage_counters::day))
        .do_update()
        .set(usage_counters::count.eq(usage_counters::count + 1))
        .returning(usage_counters::count)
        .get_result(conn)
}

/// Whether a request that moved the counter to `count` is still allowed.
/// The count at exactly the limit is the last allowed request.
pub fn within_limit(count: i32, limit: i32) -> bool {
    count <= limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_boundary() {
        assert!(within_limit(1, 100));
        assert!(within_limit(99, 100));
        assert!(within_limit(100, 100));
        assert!(!within_limit(101, 100));
    }

    #[test]
    fn test_zero_limit_blocks_everything() {
        assert!(!within_limit(1, 0));
    }
}
