/// One user-triggerable operation. Inputs are taken from the current drafts
/// when the action is submitted, so the variants carry no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ListBooks,
    GetBook,
    CreateBook,
    UpdateBook,
    DeleteBook,
    DeleteAllBooks,
    GetBookInfo,
    GetWeather,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::ListBooks,
        Action::GetBook,
        Action::CreateBook,
        Action::UpdateBook,
        Action::DeleteBook,
        Action::DeleteAllBooks,
        Action::GetBookInfo,
        Action::GetWeather,
    ];

    /// Stable name used in log fields.
    pub fn name(self) -> &'static str {
        match self {
            Action::ListBooks => "list_books",
            Action::GetBook => "get_book",
            Action::CreateBook => "create_book",
            Action::UpdateBook => "update_book",
            Action::DeleteBook => "delete_book",
            Action::DeleteAllBooks => "delete_all_books",
            Action::GetBookInfo => "get_book_info",
            Action::GetWeather => "get_weather",
        }
    }

    pub(crate) fn in_progress(self) -> &'static str {
        match self {
            Action::ListBooks => "fetching books",
            Action::GetBook => "fetching book",
            Action::CreateBook => "adding book",
            Action::UpdateBook => "updating book",
            Action::DeleteBook => "deleting book",
            Action::DeleteAllBooks => "deleting all books",
            Action::GetBookInfo => "fetching book info",
            Action::GetWeather => "fetching weather",
        }
    }

    /// Generic message for a non-2xx reply that is not a mapped 404.
    pub(crate) fn failure_message(self) -> &'static str {
        match self {
            Action::ListBooks => "Failed to fetch books.",
            Action::GetBook => "Failed to fetch book.",
            Action::CreateBook => "Failed to add book.",
            Action::UpdateBook => "Failed to update book.",
            Action::DeleteBook => "Failed to delete book.",
            Action::DeleteAllBooks => "Failed to delete all books.",
            Action::GetBookInfo => "Failed to fetch book info.",
            Action::GetWeather => "Failed to fetch weather data.",
        }
    }

    pub(crate) fn absence(self) -> &'static str {
        match self {
            Action::UpdateBook | Action::DeleteBook => "doesn't exist",
            _ => "not found",
        }
    }

    /// Whether a 404 from the service is a domain "not found" for this action.
    pub(crate) fn maps_not_found(self) -> bool {
        matches!(
            self,
            Action::GetBook | Action::UpdateBook | Action::DeleteBook | Action::GetBookInfo
        )
    }
}
