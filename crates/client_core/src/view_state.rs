use shared::{
    domain::{Book, BookId},
    protocol::{BookInfo, WeatherReport},
};

use crate::{action::Action, error::ActionError};

/// Transient outcome message for the most recent action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Notice {
    #[default]
    None,
    Error(ActionError),
    Success(String),
}

impl Notice {
    pub fn message(&self) -> Option<String> {
        match self {
            Notice::None => None,
            Notice::Error(err) => Some(err.to_string()),
            Notice::Success(message) => Some(message.clone()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSummary {
    pub book_id: BookId,
    pub title: String,
    pub author: Option<String>,
    pub summary: String,
    pub wikipedia_url: Option<String>,
}

impl BookSummary {
    pub(crate) fn from_info(book_id: BookId, info: BookInfo) -> Self {
        Self {
            book_id,
            title: info.title,
            author: info.author,
            summary: info.summary,
            wikipedia_url: info.wikipedia_url,
        }
    }
}

/// The client's snapshot. Only the reconciler mutates it, through the entry
/// points below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    books: Vec<Book>,
    single_book: Option<Book>,
    summary: Option<BookSummary>,
    weather: Option<WeatherReport>,
    notice: Notice,
}

impl ViewState {
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn single_book(&self) -> Option<&Book> {
        self.single_book.as_ref()
    }

    pub fn summary(&self) -> Option<&BookSummary> {
        self.summary.as_ref()
    }

    pub fn weather(&self) -> Option<&WeatherReport> {
        self.weather.as_ref()
    }

    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    pub(crate) fn reset_notice(&mut self) {
        self.notice = Notice::None;
    }

    pub(crate) fn clear_superseded(&mut self, action: Action) {
        match action {
            Action::ListBooks | Action::GetBook => self.single_book = None,
            Action::GetBookInfo => self.summary = None,
            Action::GetWeather => self.weather = None,
            Action::CreateBook
            | Action::UpdateBook
            | Action::DeleteBook
            | Action::DeleteAllBooks => {}
        }
    }

    pub(crate) fn fail(&mut self, err: ActionError) {
        self.notice = Notice::Error(err);
    }

    pub(crate) fn succeed(&mut self, message: impl Into<String>) {
        self.notice = Notice::Success(message.into());
    }

    pub(crate) fn replace_books(&mut self, books: Vec<Book>) {
        self.books = books;
    }

    pub(crate) fn show_book(&mut self, book: Book) {
        self.single_book = Some(book);
    }

    pub(crate) fn show_summary(&mut self, summary: BookSummary) {
        self.summary = Some(summary);
    }

    pub(crate) fn show_weather(&mut self, report: WeatherReport) {
        self.weather = Some(report);
    }
}
