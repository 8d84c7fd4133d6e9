use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::dto::workflow_dto::ListQuery;
use crate::error::Result;
use crate::models::user::ActorRole;
use crate::scope::ViewScope;
use crate::services::api_service::JobBoardApi;
use crate::workflow::badges::{
    new_applicant_count, pending_interview_count, unread_message_count, BadgeCounts,
};

/// Which collections feed the badges for a given role.
#[derive(Debug, Clone)]
pub struct BadgeSources {
    pub applications: bool,
    pub interviews: bool,
    pub conversations: bool,
    pub notifications: bool,
    pub query: ListQuery,
}

impl BadgeSources {
    pub fn for_role(role: ActorRole, page_size: u32) -> Self {
        Self {
            applications: role == ActorRole::Recruiter,
            interviews: role == ActorRole::Jobseeker,
            conversations: role != ActorRole::System,
            notifications: true,
            query: ListQuery::page(1, page_size),
        }
    }
}

/// Fetches every enabled source and derives a fresh set of counts.
pub async fn collect_badges(api: &dyn JobBoardApi, sources: &BadgeSources) -> Result<BadgeCounts> {
    let mut counts = BadgeCounts::default();
    if sources.notifications {
        counts.unread_notifications = api.unread_notification_count().await?;
    }
    if sources.conversations {
        counts.unread_messages = unread_message_count(&api.list_conversations().await?);
    }
    if sources.applications {
        let page = api.list_applications(&sources.query).await?;
        counts.new_applicants = new_applicant_count(&page.items);
    }
    if sources.interviews {
        let page = api.list_interviews(&sources.query).await?;
        counts.pending_interviews = pending_interview_count(&page.items);
    }
    Ok(counts)
}

/// Repeating refresh of the header badges. Stops when its scope closes or
/// the poller is dropped.
pub struct BadgePoller {
    scope: ViewScope,
    counts: watch::Receiver<BadgeCounts>,
    handle: JoinHandle<()>,
}

impl BadgePoller {
    pub fn spawn(
        api: Arc<dyn JobBoardApi>,
        sources: BadgeSources,
        period: Duration,
        parent: &ViewScope,
    ) -> Self {
        let scope = parent.child();
        let (tx, counts) = watch::channel(BadgeCounts::default());
        let task_scope = scope.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = task_scope.token().cancelled() => break,
                    _ = ticker.tick() => {}
                }
                match task_scope.run(collect_badges(api.as_ref(), &sources)).await {
                    Ok(fresh) => {
                        tx.send_if_modified(|current| {
                            let changed = *current != fresh;
                            *current = fresh;
                            changed
                        });
                    }
                    Err(crate::error::Error::Cancelled) => break,
                    Err(e) => {
                        tracing::warn!(error = ?e, "Badge refresh failed; keeping last counts");
                    }
                }
            }
            tracing::debug!("Badge poller stopped");
        });

        Self {
            scope,
            counts,
            handle,
        }
    }

    pub fn counts(&self) -> BadgeCounts {
        *self.counts.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<BadgeCounts> {
        self.counts.clone()
    }

    pub fn stop(&self) {
        self.scope.close();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for BadgePoller {
    fn drop(&mut self) {
        self.scope.close();
    }
}
