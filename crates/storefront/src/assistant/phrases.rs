//! Localized assistant texts.
//!
//! Canned answers are composed in English and then localized by literal
//! substring replacement. Widget texts (greeting, thinking placeholder,
//! language-switch notice) are looked up per language with English as the
//! fallback.

use std::collections::HashMap;

use autoservice_core::Language;

/// Widget texts shown outside of answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiText {
    Greeting,
    Thinking,
    LanguageSwitched,
}

/// Substitution and UI text tables, built once and shared.
#[derive(Debug, Clone)]
pub struct PhraseBook {
    substitutions: HashMap<Language, Vec<(String, String)>>,
    ui: HashMap<(Language, UiText), String>,
}

impl Default for PhraseBook {
    fn default() -> Self {
        let mut book = Self {
            substitutions: HashMap::new(),
            ui: HashMap::new(),
        };

        book.add_substitutions(
            Language::Fr,
            &[
                ("Owner", "Propriétaire"),
                ("Phone", "Téléphone"),
                ("Opening hours", "Heures d'ouverture"),
                ("Our address", "Notre adresse"),
                ("Prices vary by part.", "Les prix varient selon la pièce."),
                ("Popular services", "Services populaires"),
            ],
        );
        book.add_substitutions(
            Language::Ar,
            &[
                ("Owner", "المالك"),
                ("Phone", "الهاتف"),
                ("Opening hours", "ساعات العمل"),
                ("Our address", "عنواننا"),
                ("Prices vary by part.", "الأسعار تختلف حسب القطعة."),
                ("Popular services", "الخدمات الشائعة"),
            ],
        );

        book.add_ui(
            Language::En,
            "Hello! I can help with parts, opening hours, and contact info.",
            "Thinking...",
            "Language switched.",
        );
        book.add_ui(
            Language::Fr,
            "Bonjour ! Je peux vous aider avec des pièces, horaires, et contact.",
            "Réflexion...",
            "Langue changée.",
        );
        book.add_ui(
            Language::Ar,
            "مرحبًا! أستطيع مساعدتك بالقطع، ساعات العمل، ومعلومات الاتصال.",
            "جارٍ التفكير...",
            "تم تغيير اللغة.",
        );

        book
    }
}

impl PhraseBook {
    fn add_substitutions(&mut self, lang: Language, pairs: &[(&str, &str)]) {
        self.substitutions.insert(
            lang,
            pairs
                .iter()
                .map(|(from, to)| ((*from).to_owned(), (*to).to_owned()))
                .collect(),
        );
    }

    fn add_ui(&mut self, lang: Language, greeting: &str, thinking: &str, switched: &str) {
        self.ui.insert((lang, UiText::Greeting), greeting.to_owned());
        self.ui.insert((lang, UiText::Thinking), thinking.to_owned());
        self.ui
            .insert((lang, UiText::LanguageSwitched), switched.to_owned());
    }

    /// Localize an English answer.
    ///
    /// Every occurrence of each phrase is replaced, in table order. English,
    /// and any language without a table, is returned unchanged.
    #[must_use]
    pub fn localize(&self, text: &str, lang: Language) -> String {
        let Some(pairs) = self.substitutions.get(&lang) else {
            return text.to_owned();
        };

        pairs
            .iter()
            .fold(text.to_owned(), |acc, (from, to)| acc.replace(from, to))
    }

    /// Widget text for a language, falling back to English.
    #[must_use]
    pub fn ui(&self, key: UiText, lang: Language) -> &str {
        self.ui
            .get(&(lang, key))
            .or_else(|| self.ui.get(&(Language::En, key)))
            .map_or("", String::as_str)
    }

    /// Greeting shown when the widget opens.
    #[must_use]
    pub fn greeting(&self, lang: Language) -> &str {
        self.ui(UiText::Greeting, lang)
    }

    /// Placeholder shown while an answer is pending.
    #[must_use]
    pub fn thinking(&self, lang: Language) -> &str {
        self.ui(UiText::Thinking, lang)
    }

    /// Notice appended after a language change.
    #[must_use]
    pub fn language_switched(&self, lang: Language) -> &str {
        self.ui(UiText::LanguageSwitched, lang)
    }
}
