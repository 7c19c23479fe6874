//! Keyword intent table for local answers.
//!
//! Rules are tried in order against the lowercased question and the first
//! match answers. Each rule pairs a pattern with the function that builds
//! the English answer from the fact sheet.

use std::fmt;

use regex::Regex;

use super::facts::FactSheet;

/// What a question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Owner,
    Contact,
    Hours,
    Address,
    Price,
    Parts,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Owner => "owner",
            Self::Contact => "contact",
            Self::Hours => "hours",
            Self::Address => "address",
            Self::Price => "price",
            Self::Parts => "parts",
        };
        f.write_str(name)
    }
}

/// Builds an English answer from the fact sheet and the lowercased question.
pub type AnswerFn = fn(&FactSheet, &str) -> String;

/// One entry of the intent table.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub intent: Intent,
    pattern: Regex,
    answer: AnswerFn,
}

impl IntentRule {
    /// Whether this rule matches an already-lowercased question.
    #[must_use]
    pub fn matches(&self, lowered: &str) -> bool {
        self.pattern.is_match(lowered)
    }

    /// Build this rule's English answer.
    #[must_use]
    pub fn answer(&self, facts: &FactSheet, lowered: &str) -> String {
        (self.answer)(facts, lowered)
    }
}

/// Ordered intent rules.
#[derive(Debug, Clone, Default)]
pub struct IntentTable {
    rules: Vec<IntentRule>,
}

impl IntentTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Rules added earlier take precedence.
    ///
    /// # Errors
    ///
    /// Returns the regex error if `pattern` does not compile.
    pub fn with_rule(
        mut self,
        intent: Intent,
        pattern: &str,
        answer: AnswerFn,
    ) -> Result<Self, regex::Error> {
        self.rules.push(IntentRule {
            intent,
            pattern: Regex::new(pattern)?,
            answer,
        });
        Ok(self)
    }

    /// First rule matching an already-lowercased question.
    #[must_use]
    pub fn classify(&self, lowered: &str) -> Option<&IntentRule> {
        self.rules.iter().find(|rule| rule.matches(lowered))
    }

    /// Intents in precedence order.
    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.rules.iter().map(|rule| rule.intent)
    }

    /// The built-in English, French and Arabic keyword table.
    ///
    /// # Panics
    ///
    /// Panics if a built-in pattern fails to compile, which would be a bug
    /// caught by the tests below.
    #[must_use]
    pub fn builtin() -> Self {
        let table = || -> Result<Self, regex::Error> {
            Self::new()
                .with_rule(
                    Intent::Owner,
                    r"(owner|owner name|who owns|proprietor|مالك|المالك|propriétaire)",
                    answer_owner,
                )?
                .with_rule(
                    Intent::Contact,
                    r"(phone|contact|call|رقم|tel|telephone|اتصل)",
                    answer_contact,
                )?
                .with_rule(
                    Intent::Hours,
                    r"(hours|open|when|opening|متى|الدوام|heure|ouvert)",
                    answer_hours,
                )?
                .with_rule(
                    Intent::Address,
                    r"(address|where|location|أين|adresse|emplacement)",
                    answer_address,
                )?
                .with_rule(
                    Intent::Price,
                    r"(price|cost|how much|قيمة|سعر|prix)",
                    answer_price,
                )?
                .with_rule(
                    Intent::Parts,
                    r"(part|parts|brake|engine|tires|tyre|قطع|قطع غيار|pièces|frein)",
                    answer_parts,
                )
        };
        table().expect("built-in intent patterns are valid")
    }
}

fn answer_owner(facts: &FactSheet, _: &str) -> String {
    format!("Owner: {}. Phone: {}", facts.owner.name, facts.owner.phone)
}

fn answer_contact(facts: &FactSheet, _: &str) -> String {
    format!("You can call {} at {}", facts.owner.name, facts.owner.phone)
}

fn answer_hours(facts: &FactSheet, _: &str) -> String {
    format!("Opening hours: {}", facts.hours)
}

fn answer_address(facts: &FactSheet, _: &str) -> String {
    format!("Our address: {}", facts.address)
}

fn answer_price(facts: &FactSheet, lowered: &str) -> String {
    facts.find_price(lowered).map_or_else(
        || format!("Prices vary by part. Example: {}", facts.price_list()),
        |hint| format!("{} — {}", hint.item, hint.price),
    )
}

fn answer_parts(facts: &FactSheet, _: &str) -> String {
    format!(
        "{}. Popular services: {}. For specific parts, tell me the car model and part name.",
        facts.description.trim_end_matches('.'),
        facts.services.join(", ")
    )
}

/// Answer when no rule matches.
#[must_use]
pub fn fallback_answer(facts: &FactSheet) -> String {
    format!(
        "I don't have an exact answer in my local knowledge. Please call {} at {} \
         or ask me to forward your question.",
        facts.owner.name, facts.owner.phone
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn classify(question: &str) -> Option<Intent> {
        IntentTable::builtin()
            .classify(&question.to_lowercase())
            .map(|rule| rule.intent)
    }

    #[test]
    fn test_builtin_order() {
        let order: Vec<_> = IntentTable::builtin().intents().collect();
        assert_eq!(
            order,
            vec![
                Intent::Owner,
                Intent::Contact,
                Intent::Hours,
                Intent::Address,
                Intent::Price,
                Intent::Parts,
            ]
        );
    }

    #[test]
    fn test_classify_each_language() {
        assert_eq!(classify("Who is the OWNER?"), Some(Intent::Owner));
        assert_eq!(classify("What are your opening hours?"), Some(Intent::Hours));
        assert_eq!(classify("Quelle est votre adresse ?"), Some(Intent::Address));
        assert_eq!(classify("متى تفتحون؟"), Some(Intent::Hours));
        assert_eq!(classify("Do you have brake discs?"), Some(Intent::Parts));
        assert_eq!(classify("Do you sell tomatoes?"), None);
    }

    #[test]
    fn test_first_match_wins() {
        // Mentions both the owner and a phone number.
        assert_eq!(classify("owner phone please"), Some(Intent::Owner));
        // Mentions both opening and a part.
        assert_eq!(classify("when can I buy brake pads"), Some(Intent::Hours));
    }

    #[test]
    fn test_price_with_known_item() {
        let facts = FactSheet::default();
        let table = IntentTable::builtin();
        let rule = table.classify("how much is an oil change?").unwrap();
        assert_eq!(rule.intent, Intent::Price);
        assert_eq!(
            rule.answer(&facts, "how much is an oil change?"),
            "oil change — from 25 USD"
        );
    }

    #[test]
    fn test_price_without_known_item_lists_all() {
        let facts = FactSheet::default();
        assert_eq!(
            answer_price(&facts, "what does a clutch cost?"),
            "Prices vary by part. Example: oil change: from 25 USD; brake pads: from 40 USD per axle"
        );
    }

    #[test]
    fn test_fallback_mentions_owner_phone() {
        let answer = fallback_answer(&FactSheet::default());
        assert_eq!(
            answer,
            "I don't have an exact answer in my local knowledge. Please call Loay at \
             +212 776270650 or ask me to forward your question."
        );
    }

    #[test]
    fn test_parts_answer_lists_services() {
        let answer = answer_parts(&FactSheet::default(), "brake");
        assert!(answer.starts_with("AutoService BL sells car parts"));
        assert!(answer.contains("diagnostics. Popular services: Genuine OEM parts"));
        assert!(answer.ends_with("tell me the car model and part name."));
    }

    #[test]
    fn test_invalid_custom_pattern() {
        assert!(IntentTable::new()
            .with_rule(Intent::Owner, "(unclosed", answer_owner)
            .is_err());
    }
}
