use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    config::normalize_base_url, load_settings, load_settings_from, Action, Drafts,
    HttpDispatcher, Session,
};
use tracing_subscriber::EnvFilter;

mod render;
mod shell;

#[derive(Parser, Debug)]
#[command(name = "bookdesk", about = "Manage books and look up summaries and weather")]
struct Args {
    /// Settings file (defaults to ./bookdesk.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Get { id: String },
    Add { title: String, author: String },
    Update { id: String, title: String, author: String },
    Delete { id: String },
    DeleteAll,
    Info { id: String },
    Weather { city: Option<String> },
    /// Read draft edits and actions from stdin.
    Shell,
}

impl Command {
    /// Fills the drafts the action reads and returns it. `None` for `shell`.
    fn into_action(self, drafts: &mut Drafts) -> Option<Action> {
        let action = match self {
            Command::List => Action::ListBooks,
            Command::Get { id } => {
                drafts.book_id = id;
                Action::GetBook
            }
            Command::Add { title, author } => {
                drafts.title = title;
                drafts.author = author;
                Action::CreateBook
            }
            Command::Update { id, title, author } => {
                drafts.book_id = id;
                drafts.title = title;
                drafts.author = author;
                Action::UpdateBook
            }
            Command::Delete { id } => {
                drafts.book_id = id;
                Action::DeleteBook
            }
            Command::DeleteAll => Action::DeleteAllBooks,
            Command::Info { id } => {
                drafts.book_id = id;
                Action::GetBookInfo
            }
            Command::Weather { city } => {
                if let Some(city) = city {
                    drafts.city = city;
                }
                Action::GetWeather
            }
            Command::Shell => return None,
        };
        Some(action)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings(),
    };
    if let Some(base_url) = &args.base_url {
        settings.base_url = normalize_base_url(base_url);
    }
    tracing::debug!(base_url = %settings.base_url, "using book service");

    let dispatcher = HttpDispatcher::new(&settings.base_url)?;
    let mut session = Session::new(
        Arc::new(dispatcher),
        Drafts::with_city(settings.default_city.clone()),
        tokio::runtime::Handle::current(),
    );

    let Some(action) = args.command.into_action(session.drafts_mut()) else {
        shell::run(&mut session).await?;
        return Ok(ExitCode::SUCCESS);
    };

    session.submit(action);
    session.settle_all().await;
    print!("{}", render::snapshot(session.state()));

    if session.state().notice().is_error() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
