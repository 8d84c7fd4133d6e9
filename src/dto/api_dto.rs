use serde::{Deserialize, Deserializer};

use crate::utils::lenient::deserialize_count_lenient;

/// Single-entity response, either bare or wrapped as `{ "data": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct CountBody {
    #[serde(alias = "unreadCount", alias = "total", deserialize_with = "count_or_zero")]
    pub count: u64,
}

fn count_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(deserialize_count_lenient(deserializer)?
        .map(|n| n.max(0) as u64)
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value as JsonValue;

    #[test]
    fn envelope_unwraps_data() {
        let wrapped: Envelope<JsonValue> =
            serde_json::from_str(r#"{"data":{"id":"a"}}"#).unwrap();
        assert_eq!(wrapped.into_inner()["id"], "a");

        let bare: Envelope<JsonValue> = serde_json::from_str(r#"{"id":"b"}"#).unwrap();
        assert_eq!(bare.into_inner()["id"], "b");
    }

    #[test]
    fn error_body_prefers_message() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"message":"Application not found","error":"x"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Application not found"));
        let body: ApiErrorBody = serde_json::from_str(r#"{"error":"forbidden"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("forbidden"));
    }

    #[test]
    fn count_body_tolerates_aliases_and_junk() {
        let body: CountBody = serde_json::from_str(r#"{"unreadCount":4}"#).unwrap();
        assert_eq!(body.count, 4);
        let body: CountBody = serde_json::from_str(r#"{"count":-1}"#).unwrap();
        assert_eq!(body.count, 0);
    }
}
