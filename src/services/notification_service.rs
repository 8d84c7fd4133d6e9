use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dto::workflow_dto::ListQuery;
use crate::error::Result;
use crate::models::notification::Notification;
use crate::scope::ViewScope;
use crate::services::api_service::JobBoardApi;
use crate::workflow::badges::unread_notification_count;
use crate::workflow::reconcile::remove_by_id;

#[derive(Debug, Default)]
struct CenterState {
    notifications: Vec<Notification>,
    unread: usize,
    query: ListQuery,
}

/// The notification list and its unread badge.
///
/// Every mutation is followed by a refetch, and the badge is recomputed from
/// what came back. The counter is never adjusted in place.
pub struct NotificationCenter {
    api: Arc<dyn JobBoardApi>,
    scope: ViewScope,
    state: Mutex<CenterState>,
}

impl NotificationCenter {
    pub fn new(api: Arc<dyn JobBoardApi>, parent: &ViewScope) -> Self {
        Self {
            api,
            scope: parent.child(),
            state: Mutex::new(CenterState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CenterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state().notifications.clone()
    }

    pub fn unread(&self) -> usize {
        self.state().unread
    }

    pub fn close(&self) {
        self.scope.close();
    }

    pub async fn load(&self, query: ListQuery) -> Result<()> {
        self.state().query = query;
        self.refresh().await
    }

    pub async fn refresh(&self) -> Result<()> {
        let query = self.state().query.clone();
        let page = self.scope.run(self.api.list_notifications(&query)).await?;
        let mut state = self.state();
        state.notifications = page.items;
        state.unread = unread_notification_count(&state.notifications);
        Ok(())
    }

    pub async fn mark_read(&self, id: &str) -> Result<()> {
        self.scope.run(self.api.mark_notification_read(id)).await?;
        self.refresh().await
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        self.scope.run(self.api.mark_all_notifications_read()).await?;
        self.refresh().await
    }

    /// Deletes one notification. The row leaves the list as soon as the
    /// server confirms, even if the refetch that follows fails.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.scope.run(self.api.delete_notification(id)).await?;
        {
            let mut state = self.state();
            remove_by_id(&mut state.notifications, id);
            state.unread = unread_notification_count(&state.notifications);
        }
        self.refresh().await
    }

    /// First half of "delete all". Nothing is sent until the returned
    /// request is confirmed.
    pub fn request_clear_all(&self) -> ClearAll<'_> {
        ClearAll { center: self }
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.scope.close();
    }
}

/// A pending "delete all notifications". Dropping it cancels the action.
#[must_use = "nothing is deleted until the request is confirmed"]
pub struct ClearAll<'a> {
    center: &'a NotificationCenter,
}

impl ClearAll<'_> {
    pub async fn confirm(self) -> Result<()> {
        let center = self.center;
        tracing::info!("Clearing all notifications");
        center.scope.run(center.api.delete_all_notifications()).await?;
        center.refresh().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::page::Page;
    use crate::services::api_service::MockJobBoardApi;
    use mockall::Sequence;
    use serde_json::json;

    fn note(id: &str, read: bool) -> Notification {
        serde_json::from_value(json!({
            "_id": id,
            "type": "application",
            "title": "New applicant",
            "message": "Someone applied",
            "isRead": read,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn mark_read_recounts_from_refetched_list() {
        let mut mock = MockJobBoardApi::new();
        let mut seq = Sequence::new();
        mock.expect_list_notifications()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Page::single(vec![note("n1", false), note("n2", false)])));
        mock.expect_mark_notification_read()
            .withf(|id| id == "n1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        // Another session read n2 in the meantime; the refetch reflects both.
        mock.expect_list_notifications()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Page::single(vec![note("n1", true), note("n2", true)])));

        let center = NotificationCenter::new(Arc::new(mock), &ViewScope::new());
        center.refresh().await.unwrap();
        assert_eq!(center.unread(), 2);

        center.mark_read("n1").await.unwrap();
        assert_eq!(center.unread(), 0);
    }

    #[tokio::test]
    async fn clear_all_sends_nothing_until_confirmed() {
        let mut mock = MockJobBoardApi::new();
        mock.expect_delete_all_notifications().times(1).returning(|| Ok(()));
        mock.expect_list_notifications()
            .times(1)
            .returning(|_| Ok(Page::single(vec![])));

        let center = NotificationCenter::new(Arc::new(mock), &ViewScope::new());
        let pending = center.request_clear_all();
        drop(pending);

        center.request_clear_all().confirm().await.unwrap();
        assert!(center.notifications().is_empty());
    }

    #[tokio::test]
    async fn deleted_row_is_gone_even_if_the_refetch_fails() {
        let mut mock = MockJobBoardApi::new();
        let mut seq = Sequence::new();
        mock.expect_list_notifications()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Page::single(vec![note("n1", false), note("n2", false)])));
        mock.expect_delete_notification()
            .withf(|id| id == "n1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_list_notifications()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(Error::Api { status: 503, message: "Service unavailable".into() }));

        let center = NotificationCenter::new(Arc::new(mock), &ViewScope::new());
        center.refresh().await.unwrap();

        assert!(center.delete("n1").await.is_err());
        let remaining: Vec<String> = center.notifications().into_iter().map(|n| n.id).collect();
        assert_eq!(remaining, vec!["n2".to_string()]);
        assert_eq!(center.unread(), 1);
    }

    #[tokio::test]
    async fn failed_mark_read_keeps_the_list() {
        let mut mock = MockJobBoardApi::new();
        mock.expect_list_notifications()
            .times(1)
            .returning(|_| Ok(Page::single(vec![note("n1", false)])));
        mock.expect_mark_notification_read()
            .times(1)
            .returning(|_| Err(Error::Api { status: 502, message: "Bad gateway".into() }));

        let center = NotificationCenter::new(Arc::new(mock), &ViewScope::new());
        center.refresh().await.unwrap();
        assert!(center.mark_read("n1").await.is_err());
        assert_eq!(center.unread(), 1);
    }
}
