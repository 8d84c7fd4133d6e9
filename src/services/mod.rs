pub mod api_service;
pub mod application_service;
pub mod badge_poller;
mod in_flight;
pub mod interview_service;
pub mod message_service;
pub mod notification_service;
