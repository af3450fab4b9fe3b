pub mod detail;
pub mod search;
pub mod watched;

use iced::Task;

use popcorn_core::models::WatchedEntry;

use crate::app;

/// Requests a screen hands back to the app router instead of touching
/// shared state itself.
pub enum Action {
    None,
    /// Open the detail panel for this id, or close it if already open.
    ToggleDetail(String),
    /// Store a rated title and close the detail panel.
    AddWatched(WatchedEntry),
    RemoveWatched(String),
    /// Run an async Iced task that eventually produces an app::Message.
    RunTask(Task<app::Message>),
}
