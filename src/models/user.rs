use serde::{Deserialize, Serialize};
use std::fmt;

/// Who is asking for a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Recruiter,
    #[serde(alias = "job_seeker", alias = "candidate")]
    Jobseeker,
    System,
}

impl ActorRole {
    /// Maps the role claim carried in an access token. Employers post jobs
    /// and are treated as recruiters.
    pub fn from_claim(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "recruiter" | "employer" => Some(ActorRole::Recruiter),
            "jobseeker" | "job_seeker" | "candidate" => Some(ActorRole::Jobseeker),
            "system" | "admin" => Some(ActorRole::System),
            _ => None,
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActorRole::Recruiter => "recruiter",
            ActorRole::Jobseeker => "jobseeker",
            ActorRole::System => "system",
        };
        f.write_str(s)
    }
}

/// Non-owning reference to another record. The backend sends either the
/// bare id or a populated summary object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Id(String),
    Populated(EntitySummary),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "title", alias = "fullName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityRef {
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Id(id) => id,
            EntityRef::Populated(summary) => &summary.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EntityRef::Populated(EntitySummary { name: Some(name), .. }) => name,
            other => other.id(),
        }
    }
}

impl From<&str> for EntityRef {
    fn from(id: &str) -> Self {
        EntityRef::Id(id.to_string())
    }
}
