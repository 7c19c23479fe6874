//! Terminal store assistant.
//!
//! Drives the same widget model the storefront page uses, with a JSON file
//! standing in for the browser's local storage. Editing that file from
//! another process behaves like another page component changing a setting.
//!
//! # Usage
//!
//! ```bash
//! as-cli chat --lang fr --storage assistant-storage.json
//! ```
//!
//! Lines starting with `/` are commands; anything else is a question.
//!
//! ```text
//! /open /close /toggle         show or hide the panel
//! /lang fr                     switch language
//! /theme dark                  store a theme
//! /msg {"type":"setLang","value":"ar"}   deliver a cross-frame message
//! /quit
//! ```

use std::path::Path;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use autoservice_core::{Language, Theme};
use autoservice_storefront::assistant::widget::{
    AssistantWidget, ClientStorage, EntryId, EntryKind, ExternalMessage, JsonFileStorage,
    PendingQuery, Role, StorageError, WidgetState,
};
use autoservice_storefront::assistant::{Assistant, AssistantSetupError, Reply};
use autoservice_storefront::config::{AssistantConfig, ConfigError};

/// Base URL used for the fact sheet's website when none is configured.
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Errors that stop the chat.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Setup(#[from] AssistantSetupError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    Toggle,
    Lang(Language),
    Theme(Theme),
    Message(ExternalMessage),
    Ask(String),
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse a line. Blank lines parse as an empty question, which the
    /// widget ignores.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Ask(line.to_owned());
        };
        let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));
        let arg = arg.trim();

        match name {
            "open" => Self::Open,
            "close" => Self::Close,
            "toggle" => Self::Toggle,
            "quit" | "exit" => Self::Quit,
            "lang" => Self::Lang(Language::from_code_or_default(arg)),
            "theme" => Self::Theme(Theme::resolve(Some(arg), None)),
            "msg" => ExternalMessage::parse(arg)
                .map_or_else(|| Self::Unknown(line.to_owned()), Self::Message),
            _ => Self::Unknown(line.to_owned()),
        }
    }
}

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// A question was accepted and needs answering.
    Answer(PendingQuery),
    /// The widget refused the question.
    Ignored,
    Quit,
}

/// Apply one command to the widget.
pub fn apply<S: ClientStorage>(widget: &mut AssistantWidget<S>, command: Command) -> Step {
    match command {
        Command::Open => widget.open(),
        Command::Close => widget.close(),
        Command::Toggle => {
            widget.toggle();
        }
        Command::Lang(language) => widget.set_language(language),
        Command::Theme(theme) => {
            widget.set_theme(theme);
        }
        Command::Message(message) => widget.handle_message(&message),
        Command::Ask(text) => {
            return widget.submit(&text).map_or(Step::Ignored, Step::Answer);
        }
        Command::Quit => return Step::Quit,
        Command::Unknown(line) => {
            tracing::warn!("Unknown command: {line}");
        }
    }
    Step::Continue
}

/// Prints transcript entries as they appear.
#[derive(Debug, Default)]
struct Printer {
    last_shown: Option<EntryId>,
}

impl Printer {
    #[allow(clippy::print_stdout)]
    fn show_new<S: ClientStorage>(&mut self, widget: &AssistantWidget<S>) {
        for entry in widget.transcript().entries() {
            if self.last_shown.is_some_and(|last| entry.id <= last) {
                continue;
            }
            self.last_shown = Some(entry.id);
            match (entry.role, entry.kind) {
                (Role::User, _) => println!("you> {}", entry.text),
                (Role::Bot, EntryKind::Thinking) => println!("bot… {}", entry.text),
                (Role::Bot, EntryKind::Message) => println!(
                    "bot[{}|{}]> {}",
                    entry.language,
                    entry.direction().as_str(),
                    entry.text
                ),
            }
        }
    }

    #[allow(clippy::print_stdout)]
    fn status<S: ClientStorage>(widget: &AssistantWidget<S>) {
        let state = match widget.state() {
            WidgetState::Open => "open",
            WidgetState::Closed => "closed",
        };
        println!(
            "[{state} | lang={} | theme={}]",
            widget.language(),
            widget.theme().as_str()
        );
    }
}

/// Run the terminal chat until `/quit` or end of input.
///
/// # Errors
///
/// Returns `ChatError` if the assistant cannot be configured, the storage
/// file is unreadable at startup, or stdin fails.
pub async fn run(page_language: Option<&str>, storage_path: &Path) -> Result<(), ChatError> {
    dotenvy::dotenv().ok();

    let config = AssistantConfig::from_env()?;
    let base_url =
        std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
    let assistant = Assistant::from_config(&config, &base_url)?;
    tracing::info!(remote = assistant.has_remote(), "Assistant ready");

    let storage = JsonFileStorage::open(storage_path)?;
    tracing::info!(path = %storage.path().display(), "Using storage file");
    let mut widget = AssistantWidget::new(storage, assistant.phrase_book(), page_language);
    let mut printer = Printer::default();
    Printer::status(&widget);

    let (tx, mut rx) = mpsc::unbounded_channel::<(PendingQuery, Reply)>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                sync_storage(&mut widget);

                match apply(&mut widget, Command::parse(&line)) {
                    Step::Quit => break,
                    Step::Answer(query) => {
                        let assistant = assistant.clone();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let reply = assistant.answer_paced(&query.text, query.language).await;
                            // Receiver only drops on shutdown.
                            let _ = tx.send((query, reply));
                        });
                    }
                    Step::Ignored => {
                        tracing::info!(
                            open = widget.is_open(),
                            busy = widget.is_busy(),
                            "Question not accepted"
                        );
                    }
                    Step::Continue => Printer::status(&widget),
                }
                printer.show_new(&widget);
            }
            Some((query, reply)) = rx.recv() => {
                tracing::debug!(source = ?reply.source, "Answer received");
                widget.complete(&query, &reply.text);
                printer.show_new(&widget);
            }
        }
    }

    Ok(())
}

/// Pick up edits made to the storage file by other processes.
fn sync_storage(widget: &mut AssistantWidget<JsonFileStorage>) {
    match widget.storage_mut().reload() {
        Ok(events) => {
            for event in &events {
                widget.handle_storage_event(event);
            }
        }
        Err(e) => tracing::warn!(
            error = %e,
            path = %widget.storage().path().display(),
            "Failed to reload storage file"
        ),
    }
}
