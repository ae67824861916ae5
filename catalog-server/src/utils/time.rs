//! Time helpers
//!
//! The repository layer stores timestamps as `i64` Unix millis; creation
//! times double as the ordering tie-break for photo and tab listings.

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
