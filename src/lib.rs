pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod scope;
pub mod services;
pub mod utils;
pub mod workflow;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::middleware::auth::AuthContext;
use crate::models::user::ActorRole;
use crate::scope::ViewScope;
use crate::services::{
    api_service::{ApiClient, JobBoardApi},
    application_service::ApplicationBoard,
    badge_poller::{BadgePoller, BadgeSources},
    interview_service::InterviewBoard,
    message_service::MessageCenter,
    notification_service::NotificationCenter,
};

/// Shared handles for one signed-in session. Views are built from it and
/// each gets its own child scope, so closing a view never touches another.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn JobBoardApi>,
    pub role: ActorRole,
    pub scope: ViewScope,
    pub page_size: u32,
    pub poll_interval: Duration,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let auth = match (&config.api_token, &config.api_token_file) {
            (Some(token), _) => AuthContext::from_token(token.as_str())?,
            (None, Some(path)) => AuthContext::from_token_file(path)?,
            (None, None) => AuthContext::anonymous(),
        };
        if auth.is_expired(chrono::Utc::now().timestamp().max(0) as usize) {
            tracing::warn!("API token has expired; requests will be rejected until it is renewed");
        }
        // Without a role claim the session gets the narrowest permissions.
        let role = auth.role().unwrap_or(ActorRole::System);
        let client = ApiClient::new(&config.api_base_url, auth, config.request_timeout())?;

        Ok(Self::with_api(
            Arc::new(client),
            role,
            config.page_size,
            config.poll_interval(),
        ))
    }

    pub fn with_api(
        api: Arc<dyn JobBoardApi>,
        role: ActorRole,
        page_size: u32,
        poll_interval: Duration,
    ) -> Self {
        Self {
            api,
            role,
            scope: ViewScope::new(),
            page_size,
            poll_interval,
        }
    }

    pub fn role(&self) -> ActorRole {
        self.role
    }

    pub fn application_board(&self) -> ApplicationBoard {
        ApplicationBoard::new(self.api.clone(), self.role, &self.scope)
    }

    pub fn interview_board(&self) -> InterviewBoard {
        InterviewBoard::new(self.api.clone(), self.role, &self.scope)
    }

    pub fn notification_center(&self) -> NotificationCenter {
        NotificationCenter::new(self.api.clone(), &self.scope)
    }

    pub fn message_center(&self) -> MessageCenter {
        MessageCenter::new(self.api.clone(), &self.scope)
    }

    pub fn spawn_badge_poller(&self) -> BadgePoller {
        BadgePoller::spawn(
            self.api.clone(),
            BadgeSources::for_role(self.role, self.page_size),
            self.poll_interval,
            &self.scope,
        )
    }

    /// Closes every view created from this state.
    pub fn shutdown(&self) {
        self.scope.close();
    }
}
