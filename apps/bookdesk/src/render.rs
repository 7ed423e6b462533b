//! Plain-text rendering of the client snapshot.

use std::fmt::Write as _;

use client_core::{Drafts, Notice, ViewState};

pub fn snapshot(state: &ViewState) -> String {
    let mut out = String::new();

    match state.notice() {
        Notice::None => {}
        Notice::Error(err) => {
            let _ = writeln!(out, "error: {err}");
        }
        Notice::Success(message) => {
            let _ = writeln!(out, "ok: {message}");
        }
    }

    if let Some(book) = state.single_book() {
        let _ = writeln!(out, "\nSingle book");
        let _ = writeln!(out, "  ID: {}", book.id);
        let _ = writeln!(out, "  Title: {}", book.title);
        let _ = writeln!(out, "  Author: {}", book.author);
    }

    if let Some(summary) = state.summary() {
        let _ = writeln!(out, "\nSummary of \"{}\" (ID {})", summary.title, summary.book_id);
        let _ = writeln!(out, "  {}", summary.summary);
        if let Some(url) = &summary.wikipedia_url {
            let _ = writeln!(out, "  {url}");
        }
    }

    if !state.books().is_empty() {
        let _ = writeln!(out, "\nBooks");
        for book in state.books() {
            let _ = writeln!(
                out,
                "  ID: {} | Title: {} | Author: {}",
                book.id, book.title, book.author
            );
        }
    }

    if let Some(weather) = state.weather() {
        let _ = writeln!(out, "\nWeather in {}", weather.city);
        let _ = writeln!(out, "  Temperature: {}°C", weather.temperature);
        let _ = writeln!(out, "  Description: {}", weather.description);
    }

    out
}

pub fn drafts(drafts: &Drafts) -> String {
    format!(
        "title={:?} author={:?} id={:?} city={:?}\n",
        drafts.title, drafts.author, drafts.book_id, drafts.city
    )
}
