use shared::{domain::BookId, protocol::BookPayload};

use crate::{action::Action, dispatcher::Request, error::ActionError};

pub const DEFAULT_CITY: &str = "London";

const MISSING_ID: &str = "Book ID cannot be empty.";
const MISSING_TITLE_OR_AUTHOR: &str = "Title and author cannot be empty.";
const MISSING_UPDATE_FIELDS: &str = "Book ID, title, and author cannot be empty.";

/// User-entered values that have not been submitted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drafts {
    pub title: String,
    pub author: String,
    pub book_id: String,
    pub city: String,
}

impl Default for Drafts {
    fn default() -> Self {
        Self::with_city(DEFAULT_CITY)
    }
}

impl Drafts {
    pub fn with_city(city: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            book_id: String::new(),
            city: city.into(),
        }
    }

    pub(crate) fn clear_book_fields(&mut self) {
        self.title.clear();
        self.author.clear();
    }

    pub(crate) fn clear_book_id(&mut self) {
        self.book_id.clear();
    }

    /// Builds the request for `action` from the current drafts, or explains
    /// which required field is blank.
    pub fn validate(&self, action: Action) -> Result<Request, ActionError> {
        match action {
            Action::ListBooks => Ok(Request::ListBooks),
            Action::DeleteAllBooks => Ok(Request::DeleteAllBooks),
            Action::GetBook => Ok(Request::GetBook {
                id: self.required_id()?,
            }),
            Action::DeleteBook => Ok(Request::DeleteBook {
                id: self.required_id()?,
            }),
            Action::GetBookInfo => Ok(Request::GetBookInfo {
                id: self.required_id()?,
            }),
            Action::CreateBook => Ok(Request::CreateBook {
                payload: self
                    .payload()
                    .ok_or_else(|| ActionError::validation(MISSING_TITLE_OR_AUTHOR))?,
            }),
            Action::UpdateBook => {
                let missing = || ActionError::validation(MISSING_UPDATE_FIELDS);
                let id = non_blank(&self.book_id).ok_or_else(missing)?;
                let payload = self.payload().ok_or_else(missing)?;
                Ok(Request::UpdateBook {
                    id: BookId::new(id),
                    payload,
                })
            }
            Action::GetWeather => Ok(Request::GetWeather {
                city: non_blank(&self.city).map(str::to_string),
            }),
        }
    }

    fn required_id(&self) -> Result<BookId, ActionError> {
        non_blank(&self.book_id)
            .map(BookId::new)
            .ok_or_else(|| ActionError::validation(MISSING_ID))
    }

    fn payload(&self) -> Option<BookPayload> {
        Some(BookPayload {
            title: non_blank(&self.title)?.to_string(),
            author: non_blank(&self.author)?.to_string(),
        })
    }
}

fn non_blank(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
