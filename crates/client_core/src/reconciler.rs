//! Applies user actions and dispatcher completions to the client snapshot.
//!
//! Every action runs the same sequence: reset the notice, drop superseded
//! projections, validate the drafts, and (once the request settles) write
//! exactly one notice. Completions are applied in the order they arrive.

use shared::domain::BookId;
use tracing::{debug, info};

use crate::{
    action::Action,
    dispatcher::{Completion, Outcome, Request},
    error::ActionError,
    input::Drafts,
    view_state::{BookSummary, ViewState},
};

#[derive(Debug, Clone, Default)]
pub struct BookController {
    state: ViewState,
    drafts: Drafts,
}

impl BookController {
    pub fn new(drafts: Drafts) -> Self {
        Self {
            state: ViewState::default(),
            drafts,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn drafts(&self) -> &Drafts {
        &self.drafts
    }

    pub fn drafts_mut(&mut self) -> &mut Drafts {
        &mut self.drafts
    }

    /// Starts `action`. Returns the request to dispatch, or `None` when the
    /// drafts failed validation (the error notice is already set).
    pub fn begin(&mut self, action: Action) -> Option<Request> {
        self.state.reset_notice();
        self.state.clear_superseded(action);
        match self.drafts.validate(action) {
            Ok(request) => Some(request),
            Err(err) => {
                debug!(action = action.name(), "rejected before dispatch: {err}");
                self.state.fail(err);
                None
            }
        }
    }

    pub fn settle(&mut self, completion: Completion) {
        let action = completion.action();
        match completion {
            Completion::ListBooks(outcome) => {
                if let Some(books) = self.accept(action, None, outcome) {
                    info!(count = books.len(), "book list replaced");
                    self.state.replace_books(books);
                    self.state.succeed("Fetched all books successfully!");
                }
            }
            Completion::GetBook { id, outcome } => {
                if let Some(book) = self.accept(action, Some(&id), outcome) {
                    self.state.show_book(book);
                    self.state
                        .succeed(format!("Book ID [{id}] fetched successfully!"));
                }
            }
            Completion::CreateBook(outcome) => {
                if self.accept(action, None, outcome).is_some() {
                    self.drafts.clear_book_fields();
                    self.state.succeed("Book added successfully!");
                }
            }
            Completion::UpdateBook { id, outcome } => {
                if self.accept(action, Some(&id), outcome).is_some() {
                    self.drafts.clear_book_id();
                    self.drafts.clear_book_fields();
                    self.state
                        .succeed(format!("Book ID [{id}] updated successfully!"));
                }
            }
            Completion::DeleteBook { id, outcome } => {
                if self.accept(action, Some(&id), outcome).is_some() {
                    self.drafts.clear_book_id();
                    self.state
                        .succeed(format!("Book ID [{id}] deleted successfully!"));
                }
            }
            Completion::DeleteAllBooks(outcome) => {
                if self.accept(action, None, outcome).is_some() {
                    self.state.succeed("All books deleted successfully!");
                }
            }
            Completion::GetBookInfo { id, outcome } => {
                if let Some(info) = self.accept(action, Some(&id), outcome) {
                    let message = format!("Fetched summary for \"{}\" (Book ID [{id}])", info.title);
                    self.state.show_summary(BookSummary::from_info(id, info));
                    self.state.succeed(message);
                }
            }
            Completion::GetWeather(outcome) => {
                if let Some(report) = self.accept(action, None, outcome) {
                    let message = format!("Fetched weather for {} successfully!", report.city);
                    self.state.show_weather(report);
                    self.state.succeed(message);
                }
            }
        }
    }

    /// Unwraps a successful payload; otherwise records the error notice.
    fn accept<T>(&mut self, action: Action, id: Option<&BookId>, outcome: Outcome<T>) -> Option<T> {
        match outcome {
            Outcome::Success(payload) => Some(payload),
            Outcome::NotFound => {
                let err = match id {
                    Some(id) => ActionError::NotFound {
                        action,
                        id: id.clone(),
                    },
                    // Only id-addressed actions map 404 to not found.
                    None => ActionError::transport(action, action.failure_message()),
                };
                self.state.fail(err);
                None
            }
            Outcome::TransportFailure(message) => {
                self.state.fail(ActionError::transport(action, message));
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/reconciler_tests.rs"]
mod tests;
