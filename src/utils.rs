use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Fresh opaque identifier for lists, groups and drafts.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Add a scheme when the user typed a bare host, and make sure the base ends
/// with a slash so relative endpoint paths join underneath it.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    let mut url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Fold whitespace and case so list names compare the way a person reads them.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
