/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a session-local design ID.
///
/// UUIDv4; designs never leave the session so there is no need for a
/// sortable or compact scheme.
pub fn design_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
