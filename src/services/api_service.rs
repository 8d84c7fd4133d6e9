use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::dto::api_dto::{ApiErrorBody, CountBody, Envelope};
use crate::dto::workflow_dto::{
    InterviewStatusUpdate, ListQuery, RescheduleDecision, RescheduleRequest, ScheduleInterview,
    SendMessage, StatusUpdate,
};
use crate::error::{Error, Result};
use crate::middleware::auth::AuthContext;
use crate::models::application::Application;
use crate::models::interview::Interview;
use crate::models::message::{Conversation, CreateMessage, Message};
use crate::models::notification::Notification;
use crate::models::page::Page;

/// Remote operations the workflow depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobBoardApi: Send + Sync {
    async fn list_applications(&self, query: &ListQuery) -> Result<Page<Application>>;
    async fn update_application_status(&self, id: &str, body: &StatusUpdate) -> Result<Application>;
    async fn schedule_interview(&self, id: &str, body: &ScheduleInterview) -> Result<Application>;

    async fn list_interviews(&self, query: &ListQuery) -> Result<Page<Interview>>;
    async fn confirm_interview(&self, id: &str) -> Result<Interview>;
    async fn request_reschedule(&self, id: &str, body: &RescheduleRequest) -> Result<Interview>;
    async fn resolve_reschedule(&self, id: &str, body: &RescheduleDecision) -> Result<Interview>;
    async fn update_interview_status(
        &self,
        id: &str,
        body: &InterviewStatusUpdate,
    ) -> Result<Interview>;

    async fn list_notifications(&self, query: &ListQuery) -> Result<Page<Notification>>;
    async fn unread_notification_count(&self) -> Result<u64>;
    async fn mark_notification_read(&self, id: &str) -> Result<()>;
    async fn mark_all_notifications_read(&self) -> Result<()>;
    async fn delete_notification(&self, id: &str) -> Result<()>;
    async fn delete_all_notifications(&self) -> Result<()>;

    async fn list_conversations(&self) -> Result<Vec<Conversation>>;
    async fn list_messages(&self, counterpart_id: &str) -> Result<Vec<Message>>;
    async fn send_message(&self, body: &SendMessage) -> Result<Message>;
    async fn mark_conversation_read(&self, counterpart_id: &str) -> Result<()>;
}

/// `JobBoardApi` over HTTP.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    auth: AuthContext,
}

impl ApiClient {
    pub fn new(base_url: &str, auth: AuthContext, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url, auth)
    }

    pub fn with_client(client: Client, base_url: &str, auth: AuthContext) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url.trim())?,
            auth,
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Appends `segments` to the base path. Each one is percent-encoded on
    /// its own, so an id can never add segments, a query or a fragment.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(Error::NotFound(format!("resource {:?}", bad)));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::Config(format!("API base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(self.auth.authorize(self.client.request(method, url)))
    }

    async fn execute(&self, req: RequestBuilder) -> Result<Response> {
        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(ApiErrorBody::into_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        tracing::warn!(status = status.as_u16(), %message, "API request failed");

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized(message));
        }
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let response = self.execute(req).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice::<Envelope<T>>(&bytes)?.into_inner())
    }

    async fn fetch_page<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Page<T>> {
        let response = self.execute(req).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice::<Page<T>>(&bytes)?)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        self.fetch(self.request(method, segments)?.json(body)).await
    }

    async fn send_empty(&self, method: Method, segments: &[&str]) -> Result<()> {
        self.execute(self.request(method, segments)?).await?;
        Ok(())
    }
}

#[async_trait]
impl JobBoardApi for ApiClient {
    async fn list_applications(&self, query: &ListQuery) -> Result<Page<Application>> {
        self.fetch_page(self.request(Method::GET, &["applications"])?.query(query))
            .await
    }

    async fn update_application_status(
        &self,
        id: &str,
        body: &StatusUpdate,
    ) -> Result<Application> {
        tracing::info!(application = id, status = %body.status, "Updating application status");
        self.send_json(Method::PUT, &["applications", id, "status"], body)
            .await
    }

    async fn schedule_interview(&self, id: &str, body: &ScheduleInterview) -> Result<Application> {
        tracing::info!(application = id, at = %body.interview_date, "Scheduling interview");
        self.send_json(Method::PUT, &["applications", id, "schedule-interview"], body)
            .await
    }

    async fn list_interviews(&self, query: &ListQuery) -> Result<Page<Interview>> {
        self.fetch_page(self.request(Method::GET, &["interviews"])?.query(query))
            .await
    }

    async fn confirm_interview(&self, id: &str) -> Result<Interview> {
        tracing::info!(interview = id, "Confirming interview");
        self.fetch(self.request(Method::PUT, &["interviews", id, "confirm"])?)
            .await
    }

    async fn request_reschedule(&self, id: &str, body: &RescheduleRequest) -> Result<Interview> {
        self.send_json(Method::PUT, &["interviews", id, "reschedule-request"], body)
            .await
    }

    async fn resolve_reschedule(&self, id: &str, body: &RescheduleDecision) -> Result<Interview> {
        self.send_json(Method::PUT, &["interviews", id, "reschedule"], body)
            .await
    }

    async fn update_interview_status(
        &self,
        id: &str,
        body: &InterviewStatusUpdate,
    ) -> Result<Interview> {
        self.send_json(Method::PUT, &["interviews", id, "status"], body)
            .await
    }

    async fn list_notifications(&self, query: &ListQuery) -> Result<Page<Notification>> {
        self.fetch_page(self.request(Method::GET, &["notifications"])?.query(query))
            .await
    }

    async fn unread_notification_count(&self) -> Result<u64> {
        let body: CountBody = self
            .fetch(self.request(Method::GET, &["notifications", "unread-count"])?)
            .await?;
        Ok(body.count)
    }

    async fn mark_notification_read(&self, id: &str) -> Result<()> {
        self.send_empty(Method::PUT, &["notifications", id, "read"])
            .await
    }

    async fn mark_all_notifications_read(&self) -> Result<()> {
        self.send_empty(Method::PUT, &["notifications", "read-all"]).await
    }

    async fn delete_notification(&self, id: &str) -> Result<()> {
        self.send_empty(Method::DELETE, &["notifications", id])
            .await
    }

    async fn delete_all_notifications(&self) -> Result<()> {
        tracing::info!("Deleting all notifications");
        self.send_empty(Method::DELETE, &["notifications"]).await
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let page: Page<Conversation> = self
            .fetch_page(self.request(Method::GET, &["messages", "conversations"])?)
            .await?;
        Ok(page.items)
    }

    async fn list_messages(&self, counterpart_id: &str) -> Result<Vec<Message>> {
        let page: Page<Message> = self
            .fetch_page(self.request(Method::GET, &["messages", "conversation", counterpart_id])?)
            .await?;
        Ok(page.items)
    }

    async fn send_message(&self, body: &SendMessage) -> Result<Message> {
        let wire = CreateMessage {
            receiver_id: body.receiver_id.clone(),
            job_id: body.job_id.clone(),
            content: body.content.clone(),
        };
        self.send_json(Method::POST, &["messages"], &wire).await
    }

    async fn mark_conversation_read(&self, counterpart_id: &str) -> Result<()> {
        self.send_empty(Method::PUT, &["messages", "read", counterpart_id])
            .await
    }
}
