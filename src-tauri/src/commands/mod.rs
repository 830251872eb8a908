//! IPC surface. Each `*_internal` function holds the logic and is what the
//! integration tests call; the `#[tauri::command]` wrappers only unpack
//! managed state.

pub mod auth;
pub mod booking;
pub mod catalog;
pub mod dashboard;
#[cfg(feature = "app")]
pub mod events;
pub mod history;
pub mod launch;
pub mod profile;
pub mod reviews;
pub mod settings;
