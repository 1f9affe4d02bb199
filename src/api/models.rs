use crate::lists::Group;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub api_id: &'a str,
    pub api_hash: &'a str,
    pub phone_number: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub requires_code: bool,
    pub session_token: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyRequest<'a> {
    pub phone_number: &'a str,
    pub code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    #[serde(default)]
    pub requires_password: bool,
    pub session_token: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthStatus {
    pub connected: bool,
    pub phone_number: Option<String>,
}

/// A dialog the logged-in account can message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub username: Option<String>,
    pub participants_count: Option<u64>,
}

impl Chat {
    /// What to put in a recipient's `identifier`: the @handle when there is
    /// one, the numeric id otherwise.
    pub fn identifier(&self) -> String {
        match &self.username {
            Some(u) if !u.is_empty() => format!("@{}", u.trim_start_matches('@')),
            _ => self.id.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatsResponse {
    #[serde(default)]
    pub chats: Vec<Chat>,
}

#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    pub recipients: &'a [Group],
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_for: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeliveryResult {
    pub recipient: String,
    pub identifier: String,
    pub success: bool,
    pub error: Option<String>,
}

/// Reply to send, send-media and execute.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub success: bool,
    pub sent_count: Option<u32>,
    pub failed_count: Option<u32>,
    #[serde(default)]
    pub results: Vec<DeliveryResult>,
    pub message: Option<String>,
    pub scheduled_id: Option<i64>,
    pub media_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Sent,
    Failed,
}

/// Client-side copy of a deferred message. The backend owns the real record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMessage {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub recipients: Vec<Group>,
    pub message: String,
    #[serde(alias = "scheduled_for")]
    pub scheduled_for: String,
    pub status: MessageStatus,
    #[serde(alias = "created_at", default)]
    pub created_at: Option<String>,
    #[serde(alias = "executed_at", default, skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<String>,
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom("expected a string or numeric id")),
    }
}

#[derive(Debug, Deserialize)]
pub struct ScheduledListResponse {
    #[serde(default)]
    pub messages: Vec<ScheduledMessage>,
}

#[derive(Debug, Deserialize)]
pub struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: Option<String>,
    #[serde(default)]
    pub scheduler_running: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulerStats {
    #[serde(default)]
    pub pending_messages: u32,
    #[serde(default)]
    pub sent_messages: u32,
    #[serde(default)]
    pub failed_messages: u32,
    #[serde(default)]
    pub total_messages: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerStatus {
    #[serde(default)]
    pub scheduler_running: bool,
    pub server_time: Option<String>,
    #[serde(default)]
    pub stats: SchedulerStats,
}

/// Error body the backend returns alongside non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::GroupType;

    #[test]
    fn scheduled_message_accepts_backend_snake_case() {
        let json = r#"{
            "id": "12",
            "recipients": [{"name": "Alice", "identifier": "@alice"}],
            "message": "hi",
            "scheduled_for": "2025-03-09T07:30:00Z",
            "status": "pending",
            "created_at": "2025-03-01 10:00:00",
            "executed_at": null
        }"#;
        let m: ScheduledMessage = serde_json::from_str(json).unwrap();
        assert_eq!(m.id, "12");
        assert_eq!(m.scheduled_for, "2025-03-09T07:30:00Z");
        assert_eq!(m.status, MessageStatus::Pending);
        assert_eq!(m.recipients[0].kind, GroupType::User);
        assert_eq!(m.executed_at, None);

        // stored locally in camelCase
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["scheduledFor"], "2025-03-09T07:30:00Z");
        assert!(v.get("executedAt").is_none());
    }

    #[test]
    fn numeric_ids_are_accepted() {
        let json = r#"{"id": 5, "recipients": [], "message": "m", "scheduledFor": "x", "status": "sent"}"#;
        let m: ScheduledMessage = serde_json::from_str(json).unwrap();
        assert_eq!(m.id, "5");
        assert_eq!(m.status, MessageStatus::Sent);
    }

    #[test]
    fn send_request_omits_missing_schedule() {
        let recipients = vec![Group {
            id: "g".into(),
            name: "Alice".into(),
            kind: GroupType::User,
            identifier: "@alice".into(),
        }];
        let req = SendRequest {
            recipients: &recipients,
            message: "hello",
            schedule_for: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert!(v.get("schedule_for").is_none());
        assert_eq!(v["recipients"][0]["type"], "user");
        assert_eq!(v["recipients"][0]["identifier"], "@alice");
    }

    #[test]
    fn chat_identifier_prefers_handle() {
        let mut chat = Chat {
            id: "42".into(),
            name: "Bob".into(),
            kind: "user".into(),
            username: Some("bob".into()),
            participants_count: None,
        };
        assert_eq!(chat.identifier(), "@bob");
        chat.username = None;
        assert_eq!(chat.identifier(), "42");
    }
}
