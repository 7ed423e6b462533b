use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Book, BookId},
    error::ServiceError,
    protocol::{BookInfo, BookPayload, WeatherReport},
};
use tracing::{info, warn};
use url::Url;

use crate::action::Action;

/// Classified result of one round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    NotFound,
    TransportFailure(String),
}

/// The resource API as seen by the controller: one call per operation, each
/// attempted exactly once.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    async fn list_books(&self) -> Outcome<Vec<Book>>;
    async fn get_book(&self, id: &BookId) -> Outcome<Book>;
    async fn create_book(&self, payload: &BookPayload) -> Outcome<()>;
    async fn update_book(&self, id: &BookId, payload: &BookPayload) -> Outcome<()>;
    async fn delete_book(&self, id: &BookId) -> Outcome<()>;
    async fn delete_all_books(&self) -> Outcome<()>;
    async fn get_book_info(&self, id: &BookId) -> Outcome<BookInfo>;
    async fn get_weather(&self, city: Option<&str>) -> Outcome<WeatherReport>;
}

/// A validated request, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListBooks,
    GetBook { id: BookId },
    CreateBook { payload: BookPayload },
    UpdateBook { id: BookId, payload: BookPayload },
    DeleteBook { id: BookId },
    DeleteAllBooks,
    GetBookInfo { id: BookId },
    GetWeather { city: Option<String> },
}

impl Request {
    pub fn action(&self) -> Action {
        match self {
            Request::ListBooks => Action::ListBooks,
            Request::GetBook { .. } => Action::GetBook,
            Request::CreateBook { .. } => Action::CreateBook,
            Request::UpdateBook { .. } => Action::UpdateBook,
            Request::DeleteBook { .. } => Action::DeleteBook,
            Request::DeleteAllBooks => Action::DeleteAllBooks,
            Request::GetBookInfo { .. } => Action::GetBookInfo,
            Request::GetWeather { .. } => Action::GetWeather,
        }
    }
}

/// A finished request, tagged with everything needed to apply it.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    ListBooks(Outcome<Vec<Book>>),
    GetBook { id: BookId, outcome: Outcome<Book> },
    CreateBook(Outcome<()>),
    UpdateBook { id: BookId, outcome: Outcome<()> },
    DeleteBook { id: BookId, outcome: Outcome<()> },
    DeleteAllBooks(Outcome<()>),
    GetBookInfo { id: BookId, outcome: Outcome<BookInfo> },
    GetWeather(Outcome<WeatherReport>),
}

impl Completion {
    pub fn action(&self) -> Action {
        match self {
            Completion::ListBooks(_) => Action::ListBooks,
            Completion::GetBook { .. } => Action::GetBook,
            Completion::CreateBook(_) => Action::CreateBook,
            Completion::UpdateBook { .. } => Action::UpdateBook,
            Completion::DeleteBook { .. } => Action::DeleteBook,
            Completion::DeleteAllBooks(_) => Action::DeleteAllBooks,
            Completion::GetBookInfo { .. } => Action::GetBookInfo,
            Completion::GetWeather(_) => Action::GetWeather,
        }
    }
}

pub async fn execute(api: &dyn ResourceApi, request: Request) -> Completion {
    match request {
        Request::ListBooks => Completion::ListBooks(api.list_books().await),
        Request::GetBook { id } => {
            let outcome = api.get_book(&id).await;
            Completion::GetBook { id, outcome }
        }
        Request::CreateBook { payload } => Completion::CreateBook(api.create_book(&payload).await),
        Request::UpdateBook { id, payload } => {
            let outcome = api.update_book(&id, &payload).await;
            Completion::UpdateBook { id, outcome }
        }
        Request::DeleteBook { id } => {
            let outcome = api.delete_book(&id).await;
            Completion::DeleteBook { id, outcome }
        }
        Request::DeleteAllBooks => Completion::DeleteAllBooks(api.delete_all_books().await),
        Request::GetBookInfo { id } => {
            let outcome = api.get_book_info(&id).await;
            Completion::GetBookInfo { id, outcome }
        }
        Request::GetWeather { city } => {
            Completion::GetWeather(api.get_weather(city.as_deref()).await)
        }
    }
}

enum Checked {
    Ok(Response),
    NotFound,
    Failed(String),
}

/// `ResourceApi` over HTTP.
pub struct HttpDispatcher {
    http: Client,
    base: Url,
}

impl HttpDispatcher {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("invalid book service url '{base_url}'"))?;
        if base.cannot_be_a_base() {
            bail!("book service url '{base_url}' cannot carry a path");
        }
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `/{collection}/{id}`, or `None` for ids that URL normalization would
    /// collapse into a different resource.
    fn book_endpoint(&self, collection: &str, action: Action, id: &BookId) -> Option<Url> {
        if matches!(id.as_str(), "." | "..") {
            warn!(action = action.name(), id = %id, "refusing dot-segment book id");
            return None;
        }
        Some(self.endpoint(&[collection, id.as_str()]))
    }

    async fn check(action: Action, sent: reqwest::Result<Response>) -> Checked {
        let response = match sent {
            Ok(response) => response,
            Err(err) => {
                warn!(action = action.name(), "book service unreachable: {err}");
                return Checked::Failed(err.to_string());
            }
        };

        let status = response.status();
        if status.is_success() {
            info!(action = action.name(), status = status.as_u16(), "book service replied");
            return Checked::Ok(response);
        }
        if status == StatusCode::NOT_FOUND && action.maps_not_found() {
            info!(action = action.name(), "book service: not found");
            return Checked::NotFound;
        }

        let detail = response
            .bytes()
            .await
            .ok()
            .and_then(|body| ServiceError::parse(&body));
        match detail {
            Some(detail) => warn!(
                action = action.name(),
                status = status.as_u16(),
                detail = %detail,
                "book service rejected request"
            ),
            None => warn!(
                action = action.name(),
                status = status.as_u16(),
                "book service rejected request"
            ),
        }
        Checked::Failed(action.failure_message().to_string())
    }

    async fn expect_json<T: DeserializeOwned>(
        action: Action,
        sent: reqwest::Result<Response>,
    ) -> Outcome<T> {
        match Self::check(action, sent).await {
            Checked::Ok(response) => match response.json::<T>().await {
                Ok(payload) => Outcome::Success(payload),
                Err(err) => {
                    warn!(action = action.name(), "malformed book service reply: {err}");
                    Outcome::TransportFailure(err.to_string())
                }
            },
            Checked::NotFound => Outcome::NotFound,
            Checked::Failed(message) => Outcome::TransportFailure(message),
        }
    }

    async fn expect_ack(action: Action, sent: reqwest::Result<Response>) -> Outcome<()> {
        match Self::check(action, sent).await {
            // The body is not interpreted, but it must arrive in full.
            Checked::Ok(response) => match response.bytes().await {
                Ok(_) => Outcome::Success(()),
                Err(err) => {
                    warn!(action = action.name(), "incomplete book service reply: {err}");
                    Outcome::TransportFailure(err.to_string())
                }
            },
            Checked::NotFound => Outcome::NotFound,
            Checked::Failed(message) => Outcome::TransportFailure(message),
        }
    }
}

#[async_trait]
impl ResourceApi for HttpDispatcher {
    async fn list_books(&self) -> Outcome<Vec<Book>> {
        let sent = self.http.get(self.endpoint(&["books"])).send().await;
        Self::expect_json(Action::ListBooks, sent).await
    }

    async fn get_book(&self, id: &BookId) -> Outcome<Book> {
        let Some(url) = self.book_endpoint("books", Action::GetBook, id) else {
            return Outcome::NotFound;
        };
        let sent = self.http.get(url).send().await;
        Self::expect_json(Action::GetBook, sent).await
    }

    async fn create_book(&self, payload: &BookPayload) -> Outcome<()> {
        let sent = self
            .http
            .post(self.endpoint(&["books"]))
            .json(payload)
            .send()
            .await;
        Self::expect_ack(Action::CreateBook, sent).await
    }

    async fn update_book(&self, id: &BookId, payload: &BookPayload) -> Outcome<()> {
        let Some(url) = self.book_endpoint("books", Action::UpdateBook, id) else {
            return Outcome::NotFound;
        };
        let sent = self.http.put(url).json(payload).send().await;
        Self::expect_ack(Action::UpdateBook, sent).await
    }

    async fn delete_book(&self, id: &BookId) -> Outcome<()> {
        let Some(url) = self.book_endpoint("books", Action::DeleteBook, id) else {
            return Outcome::NotFound;
        };
        let sent = self.http.delete(url).send().await;
        Self::expect_ack(Action::DeleteBook, sent).await
    }

    async fn delete_all_books(&self) -> Outcome<()> {
        let sent = self.http.delete(self.endpoint(&["books"])).send().await;
        Self::expect_ack(Action::DeleteAllBooks, sent).await
    }

    async fn get_book_info(&self, id: &BookId) -> Outcome<BookInfo> {
        let Some(url) = self.book_endpoint("book-info", Action::GetBookInfo, id) else {
            return Outcome::NotFound;
        };
        let sent = self.http.get(url).send().await;
        Self::expect_json(Action::GetBookInfo, sent).await
    }

    async fn get_weather(&self, city: Option<&str>) -> Outcome<WeatherReport> {
        let mut request = self.http.get(self.endpoint(&["weather"]));
        if let Some(city) = city {
            request = request.query(&[("city", city)]);
        }
        Self::expect_json(Action::GetWeather, request.send().await).await
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
