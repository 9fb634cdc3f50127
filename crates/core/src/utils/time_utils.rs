use chrono::{Datelike, NaiveDateTime, Utc};

/// Current UTC time without offset, as stored in the database.
pub fn now_naive() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Current calendar year (UTC).
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Milliseconds elapsed since `start`, saturating at zero.
pub fn elapsed_ms(start: std::time::Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
