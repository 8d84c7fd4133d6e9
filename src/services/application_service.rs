use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dto::workflow_dto::{ListQuery, ScheduleInterview, StatusUpdate, TransitionPayload};
use crate::error::{Error, Result};
use crate::models::application::Application;
use crate::models::page::Page;
use crate::models::status::ApplicationStatus;
use crate::models::user::ActorRole;
use crate::scope::ViewScope;
use crate::services::api_service::JobBoardApi;
use crate::services::in_flight::{InFlight, Pending};
use crate::workflow::badges::new_applicant_count;
use crate::workflow::guard::{check_application_transition, Verdict};
use crate::workflow::reconcile::{find_by_id, replace_by_id};

#[derive(Debug, Default)]
struct BoardState {
    applications: Vec<Application>,
    page: u32,
    total_pages: u32,
    new_applicants: usize,
    in_flight: HashSet<String>,
}

impl Pending for BoardState {
    fn pending(&mut self) -> &mut HashSet<String> {
        &mut self.in_flight
    }
}

impl BoardState {
    fn recount(&mut self) {
        self.new_applicants = new_applicant_count(&self.applications);
    }
}

/// Recruiter's view of the applications for their postings.
pub struct ApplicationBoard {
    api: Arc<dyn JobBoardApi>,
    actor: ActorRole,
    scope: ViewScope,
    state: Mutex<BoardState>,
}

impl ApplicationBoard {
    pub fn new(api: Arc<dyn JobBoardApi>, actor: ActorRole, parent: &ViewScope) -> Self {
        Self {
            api,
            actor,
            scope: parent.child(),
            state: Mutex::new(BoardState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn applications(&self) -> Vec<Application> {
        self.state().applications.clone()
    }

    pub fn get(&self, id: &str) -> Option<Application> {
        find_by_id(&self.state().applications, id).cloned()
    }

    pub fn new_applicants(&self) -> usize {
        self.state().new_applicants
    }

    pub fn page(&self) -> (u32, u32) {
        let state = self.state();
        (state.page, state.total_pages)
    }

    /// Drives the per-row loading indicator.
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.state().in_flight.contains(id)
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Tears the view down. Requests still outstanding are abandoned.
    pub fn close(&self) {
        self.scope.close();
    }

    pub async fn refresh(&self, query: &ListQuery) -> Result<()> {
        let page: Page<Application> = self.scope.run(self.api.list_applications(query)).await?;
        let mut state = self.state();
        state.applications = page.items;
        state.page = page.page;
        state.total_pages = page.total_pages;
        state.recount();
        tracing::debug!(
            count = state.applications.len(),
            new = state.new_applicants,
            "Applications refreshed"
        );
        Ok(())
    }

    /// Moves one application to `requested`.
    ///
    /// Validation and the transition guard run first and never touch the
    /// network. On success the local row is replaced with the server's copy;
    /// on failure it is left exactly as it was. Failed requests are not
    /// retried.
    pub async fn perform_transition(
        &self,
        id: &str,
        requested: ApplicationStatus,
        payload: TransitionPayload,
    ) -> Result<Application> {
        let current = self
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("application {}", id)))?;

        let status = current.status.known()?;
        let verdict = check_application_transition(status, requested, self.actor);
        if let Verdict::Denied(denial) = verdict {
            tracing::info!(
                application = id,
                from = %status,
                to = %requested,
                %denial,
                "Transition denied"
            );
            return Err(Error::Denied(denial));
        }

        // Re-selecting the current status acknowledges it, whatever fields
        // that status would otherwise require.
        if status == requested && payload.is_empty() {
            return Ok(current);
        }

        payload.validate_for(requested)?;

        let _in_flight = InFlight::begin(&self.state, id)?;

        let request = async {
            if requested == ApplicationStatus::InterviewScheduled {
                let interview_date = payload.parsed_interview_date().ok_or_else(|| {
                    Error::Internal("validated interview date did not parse".to_string())
                })?;
                let body = ScheduleInterview {
                    interview_date,
                    interview_message: payload.interview_message.clone(),
                };
                self.api.schedule_interview(id, &body).await
            } else {
                let body = StatusUpdate::new(requested, &payload);
                self.api.update_application_status(id, &body).await
            }
        };

        let updated = match self.scope.run(request).await {
            Ok(updated) => updated,
            Err(Error::Cancelled) => return Err(Error::Cancelled),
            Err(e) => {
                tracing::error!(
                    application = id,
                    to = %requested,
                    error = ?e,
                    "Status update failed"
                );
                return Err(e);
            }
        };

        let mut state = self.state();
        let previous = find_by_id(&state.applications, id).cloned().unwrap_or(current);
        let merged = updated.reconcile_from(&previous);
        replace_by_id(&mut state.applications, merged.clone());
        state.recount();
        tracing::info!(application = id, status = %merged.status, "Application updated");
        Ok(merged)
    }
}

impl Drop for ApplicationBoard {
    fn drop(&mut self) {
        self.scope.close();
    }
}
