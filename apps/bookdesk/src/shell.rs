//! Line-oriented front end: edit drafts, submit actions, and print the
//! snapshot whenever a completion lands.

use anyhow::{Context, Result};
use client_core::{Action, Session};
use tokio::io::{self, AsyncBufReadExt, BufReader};

use crate::render;

const HELP: &str = "\
drafts:  title <text> | author <text> | id <text> | city <text>
actions: list | get | add | update | delete | delete-all | info | weather
other:   show | help | quit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    BookId,
    City,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Empty,
    Edit(Field, String),
    Submit(Action),
    Show,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_line(raw: &str) -> Line {
    let raw = raw.trim();
    let (word, rest) = raw.split_once(char::is_whitespace).unwrap_or((raw, ""));
    let rest = rest.trim().to_string();

    let field = match word {
        "title" => Some(Field::Title),
        "author" => Some(Field::Author),
        "id" => Some(Field::BookId),
        "city" => Some(Field::City),
        _ => None,
    };
    if let Some(field) = field {
        return Line::Edit(field, rest);
    }

    match word {
        "" => Line::Empty,
        "list" => Line::Submit(Action::ListBooks),
        "get" => Line::Submit(Action::GetBook),
        "add" => Line::Submit(Action::CreateBook),
        "update" => Line::Submit(Action::UpdateBook),
        "delete" => Line::Submit(Action::DeleteBook),
        "delete-all" => Line::Submit(Action::DeleteAllBooks),
        "info" => Line::Submit(Action::GetBookInfo),
        "weather" => Line::Submit(Action::GetWeather),
        "show" => Line::Show,
        "help" | "?" => Line::Help,
        "quit" | "exit" => Line::Quit,
        other => Line::Unknown(other.to_string()),
    }
}

enum ShellEvent {
    Settled,
    Input(Option<String>),
}

pub async fn run(session: &mut Session) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    print!("{HELP}");

    loop {
        let pending = session.in_flight() > 0;
        let event = tokio::select! {
            settled = session.settle_next(), if pending => {
                if settled { ShellEvent::Settled } else { continue }
            }
            line = lines.next_line() => {
                ShellEvent::Input(line.context("failed to read stdin")?)
            }
        };

        let line = match event {
            ShellEvent::Settled => {
                print!("{}", render::snapshot(session.state()));
                continue;
            }
            ShellEvent::Input(None) => break,
            ShellEvent::Input(Some(line)) => line,
        };

        match parse_line(&line) {
            Line::Empty => {}
            Line::Edit(field, value) => {
                let drafts = session.drafts_mut();
                match field {
                    Field::Title => drafts.title = value,
                    Field::Author => drafts.author = value,
                    Field::BookId => drafts.book_id = value,
                    Field::City => drafts.city = value,
                }
            }
            Line::Submit(action) => {
                if !session.submit(action) {
                    print!("{}", render::snapshot(session.state()));
                }
            }
            Line::Show => {
                print!("{}", render::drafts(session.drafts()));
                print!("{}", render::snapshot(session.state()));
            }
            Line::Help => print!("{HELP}"),
            Line::Quit => break,
            Line::Unknown(word) => println!("unknown command '{word}', try 'help'"),
        }
    }

    if session.in_flight() > 0 {
        session.settle_all().await;
        print!("{}", render::snapshot(session.state()));
    }
    Ok(())
}
