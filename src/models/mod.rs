pub mod application;
pub mod interview;
pub mod message;
pub mod notification;
pub mod page;
pub mod status;
pub mod user;
