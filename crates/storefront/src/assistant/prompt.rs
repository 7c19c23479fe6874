//! Prompt construction for the remote generation service.

use askama::Template;

use autoservice_core::Language;

use super::facts::FactSheet;

/// System context template, one line per fact.
#[derive(Template)]
#[template(path = "assistant/system_context.txt")]
struct SystemContextTemplate<'a> {
    intro: String,
    facts: &'a FactSheet,
    services: String,
    prices: String,
    website: &'a str,
    language_name: &'static str,
}

fn intro(facts: &FactSheet, lang: Language) -> String {
    match lang {
        Language::En => format!("You are an assistant for {}.", facts.name),
        Language::Fr => format!("Vous êtes un assistant pour {}.", facts.name),
        Language::Ar => format!("أنت مساعد لموقع {}.", facts.name),
    }
}

/// Render the system context describing the store to the model.
#[must_use]
pub fn system_context(facts: &FactSheet, lang: Language) -> String {
    let template = SystemContextTemplate {
        intro: intro(facts, lang),
        facts,
        services: facts.services.join("; "),
        prices: facts.price_list(),
        website: facts.website.as_deref().unwrap_or_default(),
        language_name: lang.english_name(),
    };

    // Only plain string fields are interpolated, so rendering cannot fail in
    // practice; fall back to the intro line if it ever does.
    template.render().map_or_else(
        |_| intro(facts, lang),
        |rendered| rendered.trim_end().to_owned(),
    )
}

/// Full prompt for one question.
#[must_use]
pub fn build_prompt(facts: &FactSheet, lang: Language, question: &str) -> String {
    format!(
        "{}\nUser: {question}\nAssistant:",
        system_context(facts, lang)
    )
}
