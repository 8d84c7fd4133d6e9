use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dto::workflow_dto::{
    InterviewStatusUpdate, ListQuery, RescheduleDecision, RescheduleRequest,
};
use crate::error::{Error, Result};
use crate::models::interview::Interview;
use crate::models::status::InterviewStatus;
use crate::models::user::ActorRole;
use crate::scope::ViewScope;
use crate::services::api_service::JobBoardApi;
use crate::services::in_flight::{InFlight, Pending};
use crate::utils::validation::validate;
use crate::workflow::badges::pending_interview_count;
use crate::workflow::guard::{check_interview_action, InterviewAction, InterviewState, Verdict};
use crate::workflow::reconcile::{find_by_id, replace_by_id};

#[derive(Debug, Default)]
struct BoardState {
    interviews: Vec<Interview>,
    pending: usize,
    in_flight: HashSet<String>,
}

impl Pending for BoardState {
    fn pending(&mut self) -> &mut HashSet<String> {
        &mut self.in_flight
    }
}

/// Interviews as seen by either side: the candidate confirms or asks to
/// reschedule, the recruiter resolves requests and records outcomes.
pub struct InterviewBoard {
    api: Arc<dyn JobBoardApi>,
    actor: ActorRole,
    scope: ViewScope,
    state: Mutex<BoardState>,
}

impl InterviewBoard {
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

    pub fn interviews(&self) -> Vec<Interview> {
        self.state().interviews.clone()
    }

    pub fn get(&self, id: &str) -> Option<Interview> {
        find_by_id(&self.state().interviews, id).cloned()
    }

    /// Scheduled interviews the candidate has not confirmed yet.
    pub fn pending_confirmations(&self) -> usize {
        self.state().pending
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.state().in_flight.contains(id)
    }

    pub fn close(&self) {
        self.scope.close();
    }

    pub async fn refresh(&self, query: &ListQuery) -> Result<()> {
        let page = self.scope.run(self.api.list_interviews(query)).await?;
        let mut state = self.state();
        state.interviews = page.items;
        state.pending = pending_interview_count(&state.interviews);
        Ok(())
    }

    /// Confirms attendance. Confirming twice is harmless: an interview that
    /// is already confirmed is acknowledged without a request.
    pub async fn confirm(&self, id: &str) -> Result<Interview> {
        let current = self.checked(id, InterviewAction::Confirm)?;
        if current.candidate_confirmed {
            return Ok(current);
        }
        self.mutate(id, || self.api.confirm_interview(id)).await
    }

    pub async fn request_reschedule(
        &self,
        id: &str,
        request: RescheduleRequest,
    ) -> Result<Interview> {
        validate(&request)?;
        self.checked(id, InterviewAction::RequestReschedule)?;
        self.mutate(id, || self.api.request_reschedule(id, &request)).await
    }

    pub async fn accept_reschedule(&self, id: &str) -> Result<Interview> {
        self.resolve(id, InterviewAction::AcceptReschedule, true).await
    }

    pub async fn decline_reschedule(&self, id: &str) -> Result<Interview> {
        self.resolve(id, InterviewAction::DeclineReschedule, false).await
    }

    pub async fn set_status(&self, id: &str, status: InterviewStatus) -> Result<Interview> {
        let current = self.checked(id, InterviewAction::SetStatus(status))?;
        if current.status.is(status) {
            return Ok(current);
        }
        let body = InterviewStatusUpdate { status };
        self.mutate(id, || self.api.update_interview_status(id, &body)).await
    }

    async fn resolve(&self, id: &str, action: InterviewAction, accept: bool) -> Result<Interview> {
        self.checked(id, action)?;
        let body = RescheduleDecision { accept };
        self.mutate(id, || self.api.resolve_reschedule(id, &body)).await
    }

    /// Looks the interview up and runs the guard for `action`.
    fn checked(&self, id: &str, action: InterviewAction) -> Result<Interview> {
        let current = self
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("interview {}", id)))?;
        let status = current.status.known()?;
        if let Verdict::Denied(denial) =
            check_interview_action(InterviewState::of(&current, status), action, self.actor)
        {
            tracing::info!(interview = id, ?action, %denial, "Interview action denied");
            return Err(Error::Denied(denial));
        }
        Ok(current)
    }

    /// Runs one request for `id`. The request is only built once the
    /// in-flight mark is held and the scope is still open.
    async fn mutate<F, Fut>(&self, id: &str, request: F) -> Result<Interview>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Interview>>,
    {
        let _in_flight = InFlight::begin(&self.state, id)?;

        let outcome = self.scope.run(async { request().await }).await;

        let updated = match outcome {
            Ok(updated) => updated,
            Err(e) => {
                if !matches!(e, Error::Cancelled) {
                    tracing::error!(interview = id, error = ?e, "Interview update failed");
                }
                return Err(e);
            }
        };
        let mut state = self.state();
        replace_by_id(&mut state.interviews, updated.clone());
        state.pending = pending_interview_count(&state.interviews);
        Ok(updated)
    }
}

impl Drop for InterviewBoard {
    fn drop(&mut self) {
        self.scope.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::page::Page;
    use crate::services::api_service::MockJobBoardApi;
    use crate::workflow::guard::Denial;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn interview(id: &str, status: &str, confirmed: bool, requested: bool) -> Interview {
        serde_json::from_value(json!({
            "id": id,
            "job": "job-1",
            "applicant": "user-1",
            "status": status,
            "candidateConfirmed": confirmed,
            "rescheduleRequested": requested,
        }))
        .unwrap()
    }

    async fn board(
        mut mock: MockJobBoardApi,
        actor: ActorRole,
        rows: Vec<Interview>,
    ) -> InterviewBoard {
        mock.expect_list_interviews()
            .times(1)
            .returning(move |_| Ok(Page::single(rows.clone())));
        let board = InterviewBoard::new(Arc::new(mock), actor, &ViewScope::new());
        board.refresh(&ListQuery::default()).await.unwrap();
        board
    }

    #[tokio::test]
    async fn confirming_twice_stays_confirmed() {
        let mut mock = MockJobBoardApi::new();
        mock.expect_confirm_interview()
            .times(1)
            .returning(|id| Ok(interview(id, "Scheduled", true, false)));
        let rows = vec![interview("i1", "Scheduled", false, false)];
        let board = board(mock, ActorRole::Jobseeker, rows).await;
        assert_eq!(board.pending_confirmations(), 1);

        let first = board.confirm("i1").await.unwrap();
        assert!(first.candidate_confirmed);
        let second = board.confirm("i1").await.unwrap();
        assert!(second.candidate_confirmed);
        assert_eq!(board.pending_confirmations(), 0);
    }

    #[tokio::test]
    async fn reschedule_request_requires_scheduled_interview() {
        let mut mock = MockJobBoardApi::new();
        mock.expect_request_reschedule().never();
        let rows = vec![interview("i1", "Rescheduled", false, false)];
        let board = board(mock, ActorRole::Jobseeker, rows).await;

        let request = RescheduleRequest {
            proposed_date: Utc.with_ymd_and_hms(2025, 1, 12, 9, 0, 0).unwrap(),
            reason: "Conflict".to_string(),
        };
        let err = board.request_reschedule("i1", request).await.unwrap_err();
        assert!(matches!(err, Error::Denied(Denial::NotScheduled)));
    }

    #[tokio::test]
    async fn reschedule_request_needs_a_reason() {
        let mut mock = MockJobBoardApi::new();
        mock.expect_request_reschedule().never();
        let rows = vec![interview("i1", "Scheduled", false, false)];
        let board = board(mock, ActorRole::Jobseeker, rows).await;

        let request = RescheduleRequest {
            proposed_date: Utc.with_ymd_and_hms(2025, 1, 12, 9, 0, 0).unwrap(),
            reason: String::new(),
        };
        assert!(matches!(
            board.request_reschedule("i1", request).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn recruiter_accepts_pending_request() {
        let mut mock = MockJobBoardApi::new();
        mock.expect_resolve_reschedule()
            .withf(|id, body| id == "i1" && body.accept)
            .times(1)
            .returning(|id, _| Ok(interview(id, "Rescheduled", false, false)));
        let rows = vec![interview("i1", "Scheduled", false, true)];
        let board = board(mock, ActorRole::Recruiter, rows).await;

        let updated = board.accept_reschedule("i1").await.unwrap();
        assert!(updated.status.is(InterviewStatus::Rescheduled));
        assert!(!updated.reschedule_requested);
    }

    #[tokio::test]
    async fn nothing_to_decline_without_a_request() {
        let mut mock = MockJobBoardApi::new();
        mock.expect_resolve_reschedule().never();
        let rows = vec![interview("i1", "Scheduled", false, false)];
        let board = board(mock, ActorRole::Recruiter, rows).await;
        assert!(matches!(
            board.decline_reschedule("i1").await,
            Err(Error::Denied(Denial::NoPendingReschedule))
        ));
    }

    #[tokio::test]
    async fn recruiter_records_the_outcome() {
        let mut mock = MockJobBoardApi::new();
        mock.expect_update_interview_status()
            .withf(|id, body| id == "i1" && body.status == InterviewStatus::Completed)
            .times(1)
            .returning(|id, _| Ok(interview(id, "Completed", true, false)));
        let rows = vec![
            interview("i1", "Scheduled", true, false),
            interview("i2", "Scheduled", false, false),
        ];
        let board = board(mock, ActorRole::Recruiter, rows).await;

        let updated = board.set_status("i1", InterviewStatus::Completed).await.unwrap();
        assert!(updated.status.is(InterviewStatus::Completed));
        assert!(board.get("i1").unwrap().status.is(InterviewStatus::Completed));
        assert_eq!(board.interviews()[1].id, "i2");
        assert_eq!(board.pending_confirmations(), 1);
        assert!(!board.is_in_flight("i1"));
    }

    #[tokio::test]
    async fn setting_the_same_outcome_sends_nothing() {
        let mut mock = MockJobBoardApi::new();
        mock.expect_update_interview_status().never();
        let rows = vec![interview("i1", "Scheduled", false, false)];
        let board = board(mock, ActorRole::Recruiter, rows).await;

        let same = board.set_status("i1", InterviewStatus::Scheduled).await.unwrap();
        assert_eq!(same, board.get("i1").unwrap());
    }

    #[tokio::test]
    async fn closed_board_sends_nothing() {
        let mut mock = MockJobBoardApi::new();
        mock.expect_confirm_interview().never();
        let rows = vec![interview("i1", "Scheduled", false, false)];
        let board = board(mock, ActorRole::Jobseeker, rows).await;

        board.close();
        assert!(matches!(board.confirm("i1").await, Err(Error::Cancelled)));
        assert!(!board.is_in_flight("i1"));
        assert!(!board.get("i1").unwrap().candidate_confirmed);
    }

    #[tokio::test]
    async fn closed_interview_keeps_its_outcome() {
        let mut mock = MockJobBoardApi::new();
        mock.expect_update_interview_status().never();
        let rows = vec![interview("i1", "No-Show", false, false)];
        let board = board(mock, ActorRole::Recruiter, rows).await;
        assert!(matches!(
            board.set_status("i1", InterviewStatus::Completed).await,
            Err(Error::Denied(Denial::InterviewClosed))
        ));
    }

    #[tokio::test]
    async fn failed_confirmation_keeps_previous_state() {
        let mut mock = MockJobBoardApi::new();
        mock.expect_confirm_interview()
            .times(1)
            .returning(|_| Err(Error::Api { status: 500, message: "boom".into() }));
        let rows = vec![interview("i1", "Scheduled", false, false)];
        let board = board(mock, ActorRole::Jobseeker, rows).await;

        assert!(board.confirm("i1").await.is_err());
        assert!(!board.get("i1").unwrap().candidate_confirmed);
        assert_eq!(board.pending_confirmations(), 1);
        assert!(!board.is_in_flight("i1"));
    }
}
