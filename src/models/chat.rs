use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message in the stylist chat, from either side
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub is_user: bool,
    pub message_type: String,
    /// Structured payload attached to stylist replies
    pub ai_response: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn from_user(user_id: Uuid, content: String, message_type: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            content,
            is_user: true,
            message_type,
            ai_response: None,
            created_at: Utc::now(),
        }
    }

    pub fn from_stylist(user_id: Uuid, content: String, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            content,
            is_user: false,
            message_type: "ai_response".to_string(),
            ai_response: Some(payload),
            created_at: Utc::now(),
        }
    }
}
