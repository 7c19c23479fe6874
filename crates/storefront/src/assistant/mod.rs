//! Store assistant.
//!
//! Answers visitor questions about the store. When a generation endpoint is
//! configured the question is sent there with a system context built from
//! the fact sheet; otherwise, or when that call fails, a keyword intent table
//! answers from the fact sheet directly. Local answers are localized for
//! French and Arabic by phrase substitution.
//!
//! [`widget`] holds the client-side conversation model that drives an
//! [`Assistant`] from a chat surface.

pub mod facts;
pub mod generation;
pub mod intents;
pub mod phrases;
pub mod prompt;
pub mod widget;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use autoservice_core::Language;

use crate::config::AssistantConfig;

pub use facts::{FactSheet, FactSheetError};
pub use generation::{GenerationClient, GenerationError, GenerationRequest, TextGenerator};
pub use intents::{Intent, IntentTable};
pub use phrases::PhraseBook;

/// Errors building an assistant from configuration.
#[derive(Debug, Error)]
pub enum AssistantSetupError {
    #[error(transparent)]
    Facts(#[from] FactSheetError),
    #[error("failed to build generation client: {0}")]
    Generation(#[from] GenerationError),
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    /// The remote generation service.
    Remote,
    /// The keyword intent table.
    Local,
}

/// An answer to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

/// Question answering over a fact sheet.
///
/// Cheap to clone; all tables are shared.
#[derive(Clone)]
pub struct Assistant {
    facts: Arc<FactSheet>,
    phrases: Arc<PhraseBook>,
    intents: Arc<IntentTable>,
    generator: Option<Arc<dyn TextGenerator>>,
    model: String,
    max_tokens: u32,
    thinking_delay: Duration,
}

impl Assistant {
    /// Local-only assistant over `facts` with the built-in tables.
    #[must_use]
    pub fn new(facts: FactSheet) -> Self {
        let defaults = AssistantConfig::default();
        Self {
            facts: Arc::new(facts),
            phrases: Arc::new(PhraseBook::default()),
            intents: Arc::new(IntentTable::builtin()),
            generator: None,
            model: defaults.model,
            max_tokens: defaults.max_tokens,
            thinking_delay: defaults.thinking_delay,
        }
    }

    /// Build from configuration.
    ///
    /// Loads the fact sheet from `facts_path` when set, filling in the
    /// website from `base_url` if the sheet has none, and attaches an HTTP
    /// generation client when an endpoint is configured.
    ///
    /// # Errors
    ///
    /// Returns `AssistantSetupError` if the fact sheet cannot be loaded or
    /// the HTTP client cannot be built.
    pub fn from_config(
        config: &AssistantConfig,
        base_url: &str,
    ) -> Result<Self, AssistantSetupError> {
        let facts = match &config.facts_path {
            Some(path) => FactSheet::load(path)?,
            None => FactSheet::default(),
        }
        .with_default_website(base_url);

        let mut assistant = Self::new(facts)
            .with_model(&config.model, config.max_tokens)
            .with_thinking_delay(config.thinking_delay);

        if let Some(endpoint) = &config.endpoint {
            let client = GenerationClient::new(endpoint.clone(), generation::REQUEST_TIMEOUT)?;
            assistant = assistant.with_generator(Arc::new(client));
        }

        Ok(assistant)
    }

    /// Send questions to `generator` before falling back to local answers.
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Model hint and output size hint for remote requests.
    #[must_use]
    pub fn with_model(mut self, model: &str, max_tokens: u32) -> Self {
        model.clone_into(&mut self.model);
        self.max_tokens = max_tokens;
        self
    }

    /// Pause before local answers in [`Assistant::answer_paced`].
    #[must_use]
    pub const fn with_thinking_delay(mut self, delay: Duration) -> Self {
        self.thinking_delay = delay;
        self
    }

    /// Replace the intent table.
    #[must_use]
    pub fn with_intents(mut self, intents: IntentTable) -> Self {
        self.intents = Arc::new(intents);
        self
    }

    #[must_use]
    pub fn facts(&self) -> &FactSheet {
        &self.facts
    }

    #[must_use]
    pub fn phrases(&self) -> &PhraseBook {
        &self.phrases
    }

    /// Shared handle to the phrase book, for widgets.
    #[must_use]
    pub fn phrase_book(&self) -> Arc<PhraseBook> {
        Arc::clone(&self.phrases)
    }

    /// Whether a generation service is configured.
    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.generator.is_some()
    }

    /// Cosmetic delay before a local answer is shown.
    #[must_use]
    pub const fn thinking_delay(&self) -> Duration {
        self.thinking_delay
    }

    /// Answer from the fact sheet alone.
    ///
    /// Never fails: unmatched questions get a fallback pointing at the owner.
    #[must_use]
    pub fn local_answer(&self, text: &str, lang: Language) -> String {
        let lowered = text.to_lowercase();
        let english = self.intents.classify(&lowered).map_or_else(
            || intents::fallback_answer(&self.facts),
            |rule| {
                debug!(intent = %rule.intent, "Matched local intent");
                rule.answer(&self.facts, &lowered)
            },
        );
        self.phrases.localize(&english, lang)
    }

    /// Answer a question, remotely if possible.
    ///
    /// Always produces an answer. A failed remote call is logged and the
    /// local responder answers instead; there is no retry.
    #[instrument(skip(self, text), fields(lang = %lang, remote = self.has_remote()))]
    pub async fn answer(&self, text: &str, lang: Language) -> Reply {
        if let Some(generator) = &self.generator {
            let request = GenerationRequest {
                model: self.model.clone(),
                prompt: prompt::build_prompt(&self.facts, lang, text),
                max_tokens: self.max_tokens,
                lang,
            };

            match generator.generate(&request).await {
                Ok(text) => {
                    return Reply {
                        text,
                        source: ReplySource::Remote,
                    };
                }
                Err(e) => warn!(error = %e, "Generation failed, answering locally"),
            }
        }

        Reply {
            text: self.local_answer(text, lang),
            source: ReplySource::Local,
        }
    }

    /// Like [`Assistant::answer`], but local-only assistants wait the
    /// thinking delay first so the placeholder is visible.
    pub async fn answer_paced(&self, text: &str, lang: Language) -> Reply {
        if !self.has_remote() && !self.thinking_delay.is_zero() {
            tokio::time::sleep(self.thinking_delay).await;
        }
        self.answer(text, lang).await
    }
}
