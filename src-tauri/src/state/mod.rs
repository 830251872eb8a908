//! Screen sessions: per-screen input held between IPC calls, plus the
//! observable state the frontend renders.

pub mod auth;
pub mod booking;
pub mod catalog;
pub mod dashboard;
pub mod history;
pub mod profile;
pub mod publisher;

pub use publisher::{StatePublisher, UiState};
