use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{Error, Result};

/// A closed set of wire tokens.
pub trait Vocabulary: Copy + Eq + fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn from_token(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    New,
    Reviewed,
    Shortlisted,
    InterviewScheduled,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    /// No transition leaves these states.
    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Hired)
    }
}

impl Vocabulary for ApplicationStatus {
    const ALL: &'static [Self] = &[
        ApplicationStatus::New,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Rejected,
        ApplicationStatus::Hired,
    ];

    fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::New => "New",
            ApplicationStatus::Reviewed => "Reviewed",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Hired => "Hired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
    Rescheduled,
}

impl InterviewStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            InterviewStatus::Completed | InterviewStatus::Cancelled | InterviewStatus::NoShow
        )
    }
}

impl Vocabulary for InterviewStatus {
    const ALL: &'static [Self] = &[
        InterviewStatus::Scheduled,
        InterviewStatus::Completed,
        InterviewStatus::Cancelled,
        InterviewStatus::NoShow,
        InterviewStatus::Rescheduled,
    ];

    fn as_str(self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "Scheduled",
            InterviewStatus::Completed => "Completed",
            InterviewStatus::Cancelled => "Cancelled",
            InterviewStatus::NoShow => "No-Show",
            InterviewStatus::Rescheduled => "Rescheduled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Application,
    Interview,
    JobUpdate,
    System,
}

impl Vocabulary for NotificationKind {
    const ALL: &'static [Self] = &[
        NotificationKind::Application,
        NotificationKind::Interview,
        NotificationKind::JobUpdate,
        NotificationKind::System,
    ];

    fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Application => "application",
            NotificationKind::Interview => "interview",
            NotificationKind::JobUpdate => "job_update",
            NotificationKind::System => "system",
        }
    }
}

macro_rules! vocabulary_serde {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                <$ty>::from_token(&raw)
                    .ok_or_else(|| serde::de::Error::custom(format!("unknown token: {}", raw)))
            }
        }
    )*};
}

vocabulary_serde!(ApplicationStatus, InterviewStatus, NotificationKind);

/// A status as received from the server. Tokens outside the vocabulary are
/// kept verbatim so they can be displayed, but nothing may act on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<T> {
    Known(T),
    Unknown(String),
}

impl<T: Vocabulary> Token<T> {
    pub fn known(&self) -> Result<T> {
        match self {
            Token::Known(value) => Ok(*value),
            Token::Unknown(raw) => Err(Error::UnknownStatus(raw.clone())),
        }
    }

    pub fn is(&self, value: T) -> bool {
        matches!(self, Token::Known(v) if *v == value)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Token::Known(value) => value.as_str(),
            Token::Unknown(raw) => raw,
        }
    }
}

impl<T: Vocabulary> From<T> for Token<T> {
    fn from(value: T) -> Self {
        Token::Known(value)
    }
}

impl<T: Vocabulary> fmt::Display for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T: Vocabulary> Serialize for Token<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de, T: Vocabulary> Deserialize<'de> for Token<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match T::from_token(&raw) {
            Some(value) => Token::Known(value),
            None => Token::Unknown(raw),
        })
    }
}
