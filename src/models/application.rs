use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::status::{ApplicationStatus, Token};
use crate::models::user::EntityRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(alias = "_id")]
    pub id: String,
    pub job: EntityRef,
    pub applicant: EntityRef,
    pub status: Token<ApplicationStatus>,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub interview_scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_message: Option<String>,
}

impl Application {
    /// Folds the server's representation over the previous local copy. The
    /// server wins on every field it sends; interview history that it
    /// omitted is carried forward since it is never cleared.
    pub fn reconcile_from(mut self, previous: &Application) -> Application {
        if self.interview_scheduled_at.is_none() {
            self.interview_scheduled_at = previous.interview_scheduled_at;
            if self.interview_message.is_none() {
                self.interview_message = previous.interview_message.clone();
            }
        }
        if self.applied_at.is_none() {
            self.applied_at = previous.applied_at;
        }
        self
    }

    pub fn has_been_interviewed(&self) -> bool {
        self.interview_scheduled_at.is_some()
    }
}
