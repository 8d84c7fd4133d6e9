use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::status::{InterviewStatus, Token};
use crate::models::user::EntityRef;
use crate::utils::lenient::deserialize_bool_lenient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    #[serde(alias = "_id")]
    pub id: String,
    pub job: EntityRef,
    pub applicant: EntityRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<EntityRef>,
    pub status: Token<InterviewStatus>,
    #[serde(default, alias = "interviewDate")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    pub candidate_confirmed: bool,
    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    pub reschedule_requested: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_reschedule_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reschedule_reason: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Interview {
    /// Scheduled and still waiting on the candidate.
    pub fn awaits_confirmation(&self) -> bool {
        self.status.is(InterviewStatus::Scheduled) && !self.candidate_confirmed
    }
}
