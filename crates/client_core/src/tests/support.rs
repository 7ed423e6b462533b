use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use shared::{
    domain::{Book, BookId},
    protocol::{BookInfo, BookPayload, WeatherReport},
};
use tokio::{
    net::TcpListener,
    sync::{Mutex, Notify},
};

use crate::dispatcher::{Outcome, ResourceApi};

pub fn book(id: i64, title: &str, author: &str) -> Book {
    Book {
        id: BookId::from(id),
        title: title.to_string(),
        author: author.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct LibraryInner {
    books: Vec<Book>,
    next_id: i64,
    requests: Vec<RecordedRequest>,
    forced_status: Option<StatusCode>,
    held: HashMap<String, Arc<Notify>>,
}

/// In-process stand-in for the book service.
#[derive(Clone, Default)]
pub struct MockLibrary {
    inner: Arc<Mutex<LibraryInner>>,
}

impl MockLibrary {
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().await.requests.clone()
    }

    pub async fn books(&self) -> Vec<Book> {
        self.inner.lock().await.books.clone()
    }

    /// Every later request is answered with `status` and an error envelope.
    pub async fn force_status(&self, status: StatusCode) {
        self.inner.lock().await.forced_status = Some(status);
    }

    /// `GET /books/{id}` waits until the returned handle is notified.
    pub async fn hold(&self, id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.inner
            .lock()
            .await
            .held
            .insert(id.to_string(), Arc::clone(&gate));
        gate
    }
}

pub async fn spawn_mock_library(seed: &[(&str, &str)]) -> Result<(String, MockLibrary)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let library = MockLibrary::default();
    {
        let mut inner = library.inner.lock().await;
        for (title, author) in seed {
            inner.next_id += 1;
            let id = inner.next_id;
            inner.books.push(book(id, title, author));
        }
    }

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .fallback(handle_library)
        .with_state(library.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), library))
}

/// Address that refuses connections.
pub async fn closed_server_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

fn error_reply(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn handle_library(
    State(library): State<MockLibrary>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let query = uri.query().map(str::to_string);
    let body_json = serde_json::from_slice::<Value>(&body).ok();

    let gate = {
        let mut inner = library.inner.lock().await;
        inner.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: query.clone(),
            content_type: headers
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            body: body_json.clone(),
        });
        if let Some(status) = inner.forced_status {
            return error_reply(status, "forced failure");
        }
        match (&method, path.strip_prefix("/books/")) {
            (&Method::GET, Some(id)) => inner.held.get(id).cloned(),
            _ => None,
        }
    };
    if let Some(gate) = gate {
        gate.notified().await;
    }

    let mut inner = library.inner.lock().await;
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (&method, segments.as_slice()) {
        (&Method::GET, ["books"]) => Json(inner.books.clone()).into_response(),
        (&Method::POST, ["books"]) => {
            let Some(payload) = body_json.and_then(|v| serde_json::from_value::<BookPayload>(v).ok())
            else {
                return error_reply(StatusCode::BAD_REQUEST, "Title and author required");
            };
            inner.next_id += 1;
            let id = inner.next_id;
            inner.books.push(book(id, &payload.title, &payload.author));
            (StatusCode::CREATED, Json(json!({ "message": "Book added" }))).into_response()
        }
        (&Method::DELETE, ["books"]) => {
            inner.books.clear();
            Json(json!({ "message": "All books deleted" })).into_response()
        }
        (&Method::GET, ["books", id]) => match inner.books.iter().find(|b| b.id.as_str() == *id) {
            Some(found) => Json(found.clone()).into_response(),
            None => error_reply(StatusCode::NOT_FOUND, "Book not found"),
        },
        (&Method::PUT, ["books", id]) => {
            let payload = body_json.and_then(|v| serde_json::from_value::<BookPayload>(v).ok());
            match (payload, inner.books.iter_mut().find(|b| b.id.as_str() == *id)) {
                (Some(payload), Some(found)) => {
                    found.title = payload.title;
                    found.author = payload.author;
                    Json(json!({ "message": "Book updated" })).into_response()
                }
                (None, _) => error_reply(StatusCode::BAD_REQUEST, "Title and author required"),
                (_, None) => error_reply(StatusCode::NOT_FOUND, "Book not found"),
            }
        }
        (&Method::DELETE, ["books", id]) => {
            let before = inner.books.len();
            inner.books.retain(|b| b.id.as_str() != *id);
            if inner.books.len() == before {
                error_reply(StatusCode::NOT_FOUND, "Book not found")
            } else {
                Json(json!({ "message": "Book deleted" })).into_response()
            }
        }
        (&Method::GET, ["book-info", id]) => match inner.books.iter().find(|b| b.id.as_str() == *id) {
            Some(found) => Json(json!({
                "book_id": found.id,
                "title": found.title,
                "author": found.author,
                "summary": format!("{} is a novel by {}.", found.title, found.author),
                "wikipedia_url": null,
            }))
            .into_response(),
            None => error_reply(StatusCode::NOT_FOUND, format!("Book with ID {id} not found")),
        },
        (&Method::GET, ["weather"]) => {
            let city = query
                .as_deref()
                .and_then(|q| {
                    url::form_urlencoded::parse(q.as_bytes())
                        .find(|(key, _)| key == "city")
                        .map(|(_, value)| value.into_owned())
                })
                .unwrap_or_else(|| "London".to_string());
            if city == "Atlantis" {
                return error_reply(StatusCode::NOT_FOUND, "Failed to fetch weather data");
            }
            Json(json!({ "city": city, "temperature": 18, "description": "Cloudy" })).into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

/// Fake `ResourceApi` that counts calls and always reports the service as
/// unreachable.
#[derive(Default)]
pub struct CountingApi {
    calls: AtomicUsize,
}

impl CountingApi {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record<T>(&self) -> Outcome<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Outcome::TransportFailure("offline".to_string())
    }
}

#[async_trait]
impl ResourceApi for CountingApi {
    async fn list_books(&self) -> Outcome<Vec<Book>> {
        self.record()
    }

    async fn get_book(&self, _id: &BookId) -> Outcome<Book> {
        self.record()
    }

    async fn create_book(&self, _payload: &BookPayload) -> Outcome<()> {
        self.record()
    }

    async fn update_book(&self, _id: &BookId, _payload: &BookPayload) -> Outcome<()> {
        self.record()
    }

    async fn delete_book(&self, _id: &BookId) -> Outcome<()> {
        self.record()
    }

    async fn delete_all_books(&self) -> Outcome<()> {
        self.record()
    }

    async fn get_book_info(&self, _id: &BookId) -> Outcome<BookInfo> {
        self.record()
    }

    async fn get_weather(&self, _city: Option<&str>) -> Outcome<WeatherReport> {
        self.record()
    }
}
