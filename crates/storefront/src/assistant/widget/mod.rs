//! Conversation widget model.
//!
//! A chat surface (the terminal chat in `as-cli`, or a page script talking
//! to the JSON API) drives this model: it toggles open and closed, collects
//! one question at a time, shows a localized thinking placeholder until the
//! answer arrives, and follows language and theme changes made by other
//! components through shared client storage.
//!
//! Answering is left to the caller: [`AssistantWidget::submit`] hands back a
//! [`PendingQuery`], and the answer is delivered with
//! [`AssistantWidget::complete`], whenever it arrives.

pub mod storage;
pub mod transcript;

use std::sync::Arc;

use tracing::warn;

use autoservice_core::{Language, Theme};

use super::PhraseBook;

pub use storage::{
    ClientStorage, ExternalMessage, JsonFileStorage, MemoryStorage, StorageError, StorageEvent,
    keys,
};
pub use transcript::{Entry, EntryId, EntryKind, Role, Transcript};

/// Whether the panel is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WidgetState {
    #[default]
    Closed,
    Open,
}

/// A submitted question waiting for its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    /// Placeholder entry shown for this query.
    pub placeholder: EntryId,
    pub text: String,
    /// Language at submission time; the answer should be in it.
    pub language: Language,
}

/// The widget's state and transcript.
pub struct AssistantWidget<S> {
    state: WidgetState,
    language: Language,
    theme: Theme,
    transcript: Transcript,
    pending: Option<EntryId>,
    phrases: Arc<PhraseBook>,
    storage: S,
}

impl<S: ClientStorage> AssistantWidget<S> {
    /// Create a closed widget.
    ///
    /// The language comes from storage, then `page_language` (the host
    /// page's declared language), then English; unknown codes mean English.
    pub fn new(storage: S, phrases: Arc<PhraseBook>, page_language: Option<&str>) -> Self {
        let language = storage
            .get(keys::LANG)
            .as_deref()
            .or(page_language)
            .map_or_else(Language::default, Language::from_code_or_default);

        let mut widget = Self {
            state: WidgetState::Closed,
            language,
            theme: Theme::default(),
            transcript: Transcript::new(),
            pending: None,
            phrases,
            storage,
        };
        widget.apply_theme();
        widget
    }

    #[must_use]
    pub const fn state(&self) -> WidgetState {
        self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, WidgetState::Open)
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Whether a question is awaiting its answer.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Open if closed, close if open.
    pub fn toggle(&mut self) -> WidgetState {
        match self.state {
            WidgetState::Closed => self.open(),
            WidgetState::Open => self.close(),
        }
        self.state
    }

    /// Open the panel and greet. Opening an open panel does nothing.
    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        self.state = WidgetState::Open;
        let greeting = self.phrases.greeting(self.language).to_owned();
        self.transcript.push_bot(&greeting, self.language);
    }

    /// Hide the panel. The transcript is kept.
    pub fn close(&mut self) {
        self.state = WidgetState::Closed;
    }

    /// Submit a question.
    ///
    /// Returns `None`, changing nothing, if the panel is closed, the text is
    /// blank, or another question is still pending.
    pub fn submit(&mut self, text: &str) -> Option<PendingQuery> {
        let text = text.trim();
        if !self.is_open() || text.is_empty() || self.is_busy() {
            return None;
        }

        self.transcript.push_user(text, self.language);
        let thinking = self.phrases.thinking(self.language).to_owned();
        let placeholder = self.transcript.push_thinking(&thinking, self.language);
        self.pending = Some(placeholder);

        Some(PendingQuery {
            placeholder,
            text: text.to_owned(),
            language: self.language,
        })
    }

    /// Deliver the answer to a pending question.
    ///
    /// The most recent bot entry is removed if it is a thinking placeholder,
    /// then the answer is appended, even if the panel was closed meanwhile.
    pub fn complete(&mut self, query: &PendingQuery, answer: &str) {
        self.transcript.remove_trailing_thinking();
        if self.pending == Some(query.placeholder) {
            self.pending = None;
        }
        self.transcript.push_bot(answer, query.language);
    }

    /// Switch language, persist it, and announce the switch in the new language.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.persist(keys::LANG, language.code());
        let notice = self.phrases.language_switched(language).to_owned();
        self.transcript.push_bot(&notice, language);
    }

    /// Store a theme the way another page component would, then re-apply.
    pub fn set_theme(&mut self, theme: Theme) -> Theme {
        self.persist(keys::THEME, theme.as_str());
        self.apply_theme()
    }

    /// Handle a cross-frame message.
    pub fn handle_message(&mut self, message: &ExternalMessage) {
        match message {
            ExternalMessage::SetLang { value } => {
                self.language = Language::from_code_or_default(value);
                self.persist(keys::LANG, self.language.code());
            }
            ExternalMessage::SetTheme => {
                self.apply_theme();
            }
        }
    }

    /// Handle a storage change made by another component.
    ///
    /// Theme and language keys re-apply the theme; a language change is also
    /// picked up silently. Other keys are ignored.
    pub fn handle_storage_event(&mut self, event: &StorageEvent) {
        match event.key.as_str() {
            keys::LANG => {
                if let Some(code) = self.storage.get(keys::LANG) {
                    self.language = Language::from_code_or_default(&code);
                }
                self.apply_theme();
            }
            keys::THEME => {
                self.apply_theme();
            }
            _ => {}
        }
    }

    /// Resolve the theme from storage, keeping the current one if unset.
    pub fn apply_theme(&mut self) -> Theme {
        let stored = self.storage.get(keys::THEME);
        self.theme = Theme::resolve(stored.as_deref(), Some(self.theme.as_str()));
        self.theme
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(error = %e, key, "Failed to persist widget setting");
        }
    }
}
