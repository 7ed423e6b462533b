//! Client-side controller for the book service: dispatches requests, validates
//! drafts, and reconciles replies into a single-owner snapshot.

pub mod action;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod input;
pub mod reconciler;
pub mod session;
pub mod view_state;

pub use action::Action;
pub use config::{load_settings, load_settings_from, ClientSettings};
pub use dispatcher::{execute, Completion, HttpDispatcher, Outcome, Request, ResourceApi};
pub use error::ActionError;
pub use input::Drafts;
pub use reconciler::BookController;
pub use session::Session;
pub use view_state::{BookSummary, Notice, ViewState};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
