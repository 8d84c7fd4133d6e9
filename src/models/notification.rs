use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::status::{NotificationKind, Token};
use crate::models::user::EntityRef;
use crate::utils::lenient::deserialize_bool_lenient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "user", skip_serializing_if = "Option::is_none")]
    pub recipient: Option<EntityRef>,
    #[serde(rename = "type")]
    pub kind: Token<NotificationKind>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_may_be_an_id_or_a_populated_user() {
        let bare: Notification = serde_json::from_str(
            r#"{"_id":"n1","user":"u1","type":"interview","title":"Interview","isRead":0}"#,
        )
        .unwrap();
        assert_eq!(bare.recipient.as_ref().map(EntityRef::id), Some("u1"));
        assert!(!bare.is_read);

        let populated: Notification = serde_json::from_str(
            r#"{"_id":"n2","user":{"_id":"u1","name":"Ada"},"type":"job_update","isRead":true}"#,
        )
        .unwrap();
        assert_eq!(populated.recipient.as_ref().map(EntityRef::id), Some("u1"));
        assert!(populated.kind.is(NotificationKind::JobUpdate));
    }

    #[test]
    fn unknown_kind_is_kept() {
        let n: Notification =
            serde_json::from_str(r#"{"_id":"n3","type":"promotion","title":"Sale"}"#).unwrap();
        assert_eq!(n.kind.to_string(), "promotion");
    }
}
