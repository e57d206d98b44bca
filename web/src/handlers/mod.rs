//! HTTP handlers.

pub mod auth;
pub mod dispatch;
pub mod health;
pub mod queue;
pub mod send;
