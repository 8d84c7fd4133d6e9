use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dto::workflow_dto::SendMessage;
use crate::error::Result;
use crate::models::message::{Conversation, Message};
use crate::scope::ViewScope;
use crate::services::api_service::JobBoardApi;
use crate::utils::validation::validate;
use crate::workflow::badges::unread_message_count;

#[derive(Debug, Default)]
struct InboxState {
    conversations: Vec<Conversation>,
    open: Option<String>,
    thread: Vec<Message>,
    unread: u64,
}

pub struct MessageCenter {
    api: Arc<dyn JobBoardApi>,
    scope: ViewScope,
    state: Mutex<InboxState>,
}

impl MessageCenter {
    pub fn new(api: Arc<dyn JobBoardApi>, parent: &ViewScope) -> Self {
        Self {
            api,
            scope: parent.child(),
            state: Mutex::new(InboxState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, InboxState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.state().conversations.clone()
    }

    pub fn thread(&self) -> Vec<Message> {
        self.state().thread.clone()
    }

    pub fn unread(&self) -> u64 {
        self.state().unread
    }

    pub fn close(&self) {
        self.scope.close();
    }

    pub async fn refresh_conversations(&self) -> Result<()> {
        let conversations = self.scope.run(self.api.list_conversations()).await?;
        let mut state = self.state();
        state.unread = unread_message_count(&conversations);
        state.conversations = conversations;
        Ok(())
    }

    /// Loads the thread with `counterpart_id`, marks it read, then refetches
    /// the conversation list so the badge comes from the server.
    pub async fn open_conversation(&self, counterpart_id: &str) -> Result<Vec<Message>> {
        let thread = self.scope.run(self.api.list_messages(counterpart_id)).await?;
        {
            let mut state = self.state();
            state.open = Some(counterpart_id.to_string());
            state.thread = thread.clone();
        }
        self.scope
            .run(self.api.mark_conversation_read(counterpart_id))
            .await?;
        self.refresh_conversations().await?;
        Ok(thread)
    }

    pub async fn send(&self, message: SendMessage) -> Result<Message> {
        validate(&message)?;
        let sent = self.scope.run(self.api.send_message(&message)).await?;
        {
            let mut state = self.state();
            if state.open.as_deref() == Some(message.receiver_id.as_str()) {
                state.thread.push(sent.clone());
            }
        }
        self.refresh_conversations().await?;
        Ok(sent)
    }
}

impl Drop for MessageCenter {
    fn drop(&mut self) {
        self.scope.close();
    }
}
