use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::status::{ApplicationStatus, InterviewStatus};
use crate::utils::time::parse_form_datetime;
use crate::utils::validation::{push_field_error, validate_with};

/// Form input accompanying an application status change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPayload {
    pub interview_date: Option<String>,
    #[validate(length(max = 2000))]
    pub interview_message: Option<String>,
    #[validate(length(max = 2000))]
    pub rejection_reason: Option<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    #[validate(range(max = 5))]
    pub rating: Option<u8>,
}

impl TransitionPayload {
    pub fn interview(date: impl Into<String>, message: Option<&str>) -> Self {
        Self {
            interview_date: Some(date.into()),
            interview_message: message.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn rejection(reason: impl Into<String>) -> Self {
        Self {
            rejection_reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.interview_date.is_none()
            && self.interview_message.is_none()
            && self.rejection_reason.is_none()
            && self.notes.is_none()
            && self.rating.is_none()
    }

    /// Field checks for the given target status. Moving to
    /// `Interview Scheduled` requires a usable interview date.
    pub fn validate_for(&self, target: ApplicationStatus) -> Result<(), ValidationErrors> {
        validate_with(self, |errors| {
            if target != ApplicationStatus::InterviewScheduled {
                return;
            }
            match self.interview_date.as_deref().map(str::trim) {
                None | Some("") => push_field_error(
                    errors,
                    "interview_date",
                    "required",
                    "an interview date is required",
                ),
                Some(raw) if parse_form_datetime(raw).is_none() => push_field_error(
                    errors,
                    "interview_date",
                    "invalid_datetime",
                    "the interview date is not a valid date and time",
                ),
                Some(_) => {}
            }
        })
    }

    pub fn parsed_interview_date(&self) -> Option<DateTime<Utc>> {
        self.interview_date.as_deref().and_then(parse_form_datetime)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl StatusUpdate {
    pub fn new(status: ApplicationStatus, payload: &TransitionPayload) -> Self {
        Self {
            status,
            rejection_reason: payload.rejection_reason.clone(),
            notes: payload.notes.clone(),
            rating: payload.rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInterview {
    pub interview_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    pub proposed_date: DateTime<Utc>,
    #[validate(length(min = 1, max = 1000))]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleDecision {
    pub accept: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewStatusUpdate {
    pub status: InterviewStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    #[validate(length(min = 1))]
    pub receiver_id: String,
    pub job_id: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ListQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            status: None,
        }
    }
}
