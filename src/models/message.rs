use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::EntityRef;
use crate::utils::lenient::{deserialize_bool_lenient, deserialize_count_lenient};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<EntityRef>,
    pub sender: EntityRef,
    pub receiver: EntityRef,
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Messages with one counterpart, grouped for display. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(alias = "user", alias = "otherUser")]
    pub counterpart: EntityRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,
    #[serde(default, alias = "unread", deserialize_with = "deserialize_count_lenient")]
    pub unread_count: Option<i64>,
}

impl Conversation {
    /// Unread counter as shown on a badge. Missing or negative is zero.
    pub fn unread(&self) -> u64 {
        self.unread_count.map(|n| n.max(0) as u64).unwrap_or(0)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessage {
    pub receiver_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_accepts_populated_counterpart_and_last_message() {
        let conversation: Conversation = serde_json::from_str(
            r#"{
                "otherUser": {"_id": "u2", "fullName": "Grace Hopper"},
                "lastMessage": {
                    "_id": "m9",
                    "sender": "u2",
                    "receiver": {"_id": "me", "name": "Me"},
                    "content": "See you Friday",
                    "isRead": "false",
                    "createdAt": "2025-01-05T09:00:00Z"
                },
                "unread": 1.0
            }"#,
        )
        .unwrap();
        assert_eq!(conversation.counterpart.label(), "Grace Hopper");
        let last = conversation.last_message.unwrap();
        assert_eq!(last.receiver.id(), "me");
        assert!(!last.is_read);
        assert_eq!(conversation.unread_count, Some(1));
    }

    #[test]
    fn malformed_unread_counter_reads_as_zero() {
        let conversation: Conversation =
            serde_json::from_str(r#"{"counterpart":"u1","unreadCount":-3}"#).unwrap();
        assert_eq!(conversation.unread(), 0);

        let conversation: Conversation =
            serde_json::from_str(r#"{"counterpart":"u1","unreadCount":"lots"}"#).unwrap();
        assert_eq!(conversation.unread(), 0);
    }
}
