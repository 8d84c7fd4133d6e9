//! Badge counters derived from fetched collections.
//!
//! These are recomputed from the latest fetch every time. Nothing keeps a
//! running counter, so another session's changes cannot leave a badge stale
//! beyond the next refresh.

use serde::Serialize;

use crate::models::application::Application;
use crate::models::interview::Interview;
use crate::models::message::Conversation;
use crate::models::notification::Notification;
use crate::models::status::ApplicationStatus;

pub fn unread_message_count(conversations: &[Conversation]) -> u64 {
    conversations
        .iter()
        .map(Conversation::unread)
        .fold(0, u64::saturating_add)
}

pub fn pending_interview_count(interviews: &[Interview]) -> usize {
    interviews.iter().filter(|i| i.awaits_confirmation()).count()
}

pub fn new_applicant_count(applications: &[Application]) -> usize {
    applications
        .iter()
        .filter(|a| a.status.is(ApplicationStatus::New))
        .count()
}

pub fn unread_notification_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeCounts {
    pub unread_messages: u64,
    pub pending_interviews: usize,
    pub new_applicants: usize,
    pub unread_notifications: u64,
}

impl BadgeCounts {
    /// Sum shown on the header bell. Saturates instead of wrapping.
    pub fn total(&self) -> u64 {
        self.unread_messages
            .saturating_add(self.pending_interviews as u64)
            .saturating_add(self.new_applicants as u64)
            .saturating_add(self.unread_notifications)
    }
}
