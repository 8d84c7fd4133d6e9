//! Decides whether a requested status change is legal for the acting role.
//!
//! Everything here is pure. A denied change never reaches the transport, so
//! views can surface the reason without a round trip.

use std::fmt;

use crate::models::interview::Interview;
use crate::models::status::{ApplicationStatus, InterviewStatus};
use crate::models::user::ActorRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Denied(Denial),
}

impl Verdict {
    pub fn is_allowed(self) -> bool {
        matches!(self, Verdict::Allowed)
    }

    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Verdict::Allowed => Ok(()),
            Verdict::Denied(denial) => Err(denial),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    ApplicationClosed,
    InterviewClosed,
    RoleNotPermitted(ActorRole),
    SystemOnly,
    NotScheduled,
    NoPendingReschedule,
    RescheduleRequiresRequest,
    CannotReopen,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::ApplicationClosed => write!(f, "application is closed"),
            Denial::InterviewClosed => write!(f, "interview is closed"),
            Denial::RoleNotPermitted(role) => write!(f, "a {} cannot perform this action", role),
            Denial::SystemOnly => write!(f, "system transitions are handled by the server"),
            Denial::NotScheduled => {
                write!(f, "a reschedule can only be requested for a scheduled interview")
            }
            Denial::NoPendingReschedule => write!(f, "no reschedule request is pending"),
            Denial::RescheduleRequiresRequest => {
                write!(f, "an interview is rescheduled by accepting the candidate's request")
            }
            Denial::CannotReopen => write!(f, "a rescheduled interview cannot be reset"),
        }
    }
}

/// Application status rules. Only recruiters move applications; once
/// rejected or hired an application accepts nothing further, not even a
/// self-transition. Every other pair is allowed, including jumps such as
/// `New -> Hired`.
pub fn check_application_transition(
    current: ApplicationStatus,
    _requested: ApplicationStatus,
    role: ActorRole,
) -> Verdict {
    match role {
        ActorRole::System => Verdict::Denied(Denial::SystemOnly),
        ActorRole::Jobseeker => Verdict::Denied(Denial::RoleNotPermitted(role)),
        ActorRole::Recruiter if current.is_terminal() => Verdict::Denied(Denial::ApplicationClosed),
        ActorRole::Recruiter => Verdict::Allowed,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewAction {
    Confirm,
    RequestReschedule,
    AcceptReschedule,
    DeclineReschedule,
    SetStatus(InterviewStatus),
}

/// The parts of an interview record the rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterviewState {
    pub status: InterviewStatus,
    pub candidate_confirmed: bool,
    pub reschedule_requested: bool,
}

impl InterviewState {
    pub fn of(interview: &Interview, status: InterviewStatus) -> Self {
        Self {
            status,
            candidate_confirmed: interview.candidate_confirmed,
            reschedule_requested: interview.reschedule_requested,
        }
    }
}

pub fn check_interview_action(
    state: InterviewState,
    action: InterviewAction,
    role: ActorRole,
) -> Verdict {
    use InterviewAction::*;

    if role == ActorRole::System {
        return Verdict::Denied(Denial::SystemOnly);
    }
    let expected = match action {
        Confirm | RequestReschedule => ActorRole::Jobseeker,
        AcceptReschedule | DeclineReschedule | SetStatus(_) => ActorRole::Recruiter,
    };
    if role != expected {
        return Verdict::Denied(Denial::RoleNotPermitted(role));
    }
    if state.status.is_terminal() {
        return Verdict::Denied(Denial::InterviewClosed);
    }

    match action {
        Confirm => Verdict::Allowed,
        RequestReschedule if state.status == InterviewStatus::Scheduled => Verdict::Allowed,
        RequestReschedule => Verdict::Denied(Denial::NotScheduled),
        AcceptReschedule | DeclineReschedule
            if state.status == InterviewStatus::Scheduled && state.reschedule_requested =>
        {
            Verdict::Allowed
        }
        AcceptReschedule | DeclineReschedule => Verdict::Denied(Denial::NoPendingReschedule),
        SetStatus(target) if target == state.status => Verdict::Allowed,
        SetStatus(InterviewStatus::Rescheduled) => {
            Verdict::Denied(Denial::RescheduleRequiresRequest)
        }
        SetStatus(InterviewStatus::Scheduled) => Verdict::Denied(Denial::CannotReopen),
        SetStatus(_) => Verdict::Allowed,
    }
}
