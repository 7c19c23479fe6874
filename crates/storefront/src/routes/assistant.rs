//! Store assistant JSON API.
//!
//! The page widget posts questions here; the answer comes back with the
//! direction to render it in and a ready-made HTML fragment.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use autoservice_core::{Language, TextDirection};

use crate::assistant::{FactSheet, ReplySource, widget::transcript::render_bot_html};
use crate::error::AppError;
use crate::state::AppState;

/// Longest question accepted, in characters.
const MAX_QUESTION_CHARS: usize = 2000;

/// Question posted by the widget.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub message: String,
    /// Language code; missing or unknown means English.
    #[serde(default)]
    pub lang: Option<String>,
}

/// Answer returned to the widget.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub text: String,
    /// `text` as an escaped HTML fragment.
    pub html: String,
    pub lang: Language,
    pub direction: TextDirection,
    pub source: ReplySource,
}

/// Query for the widget texts.
#[derive(Debug, Deserialize)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Option<String>,
}

/// Widget texts for one language.
#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub lang: Language,
    pub direction: TextDirection,
    pub greeting: String,
    pub thinking: String,
    pub language_switched: String,
    /// How long the page shows the thinking placeholder before a local answer.
    pub thinking_delay_ms: u64,
}

fn language(code: Option<&str>) -> Language {
    code.map_or_else(Language::default, Language::from_code_or_default)
}

/// Answer a visitor question.
///
/// Always answers unless the question is blank or too long: a failing
/// generation service falls back to the local responder.
#[instrument(skip_all)]
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message must not be empty".to_string()));
    }
    if message.chars().count() > MAX_QUESTION_CHARS {
        return Err(AppError::BadRequest(format!(
            "message must be at most {MAX_QUESTION_CHARS} characters"
        )));
    }

    let lang = language(request.lang.as_deref());
    let reply = state.assistant().answer(message, lang).await;

    Ok(Json(AskResponse {
        html: render_bot_html(&reply.text, lang),
        text: reply.text,
        lang,
        direction: lang.direction(),
        source: reply.source,
    }))
}

/// Greeting, thinking placeholder and language-switch notice.
pub async fn greeting(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Json<GreetingResponse> {
    let lang = language(query.lang.as_deref());
    let assistant = state.assistant();
    let phrases = assistant.phrases();

    Json(GreetingResponse {
        lang,
        direction: lang.direction(),
        greeting: phrases.greeting(lang).to_string(),
        thinking: phrases.thinking(lang).to_string(),
        language_switched: phrases.language_switched(lang).to_string(),
        thinking_delay_ms: u64::try_from(assistant.thinking_delay().as_millis())
            .unwrap_or(u64::MAX),
    })
}

/// The fact sheet the assistant answers from.
pub async fn facts(State(state): State<AppState>) -> Json<FactSheet> {
    Json(state.assistant().facts().clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::assistant::{Assistant, GenerationError, GenerationRequest, TextGenerator};
    use crate::routes::test_support::{body_string, test_app, test_app_with};

    use super::*;

    fn ask_request(body: &Value) -> Request<Body> {
        Request::post("/api/assistant/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    struct Unreachable;

    #[async_trait]
    impl TextGenerator for Unreachable {
        async fn generate(&self, _: &GenerationRequest) -> Result<String, GenerationError> {
            Err(GenerationError::Parse("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_ask_local_answer() {
        let (app, _) = test_app();

        let response = app
            .oneshot(ask_request(&json!({ "message": "Who is the owner?", "lang": "fr" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["text"], "Propriétaire: Loay. Téléphone: +212 776270650");
        assert_eq!(body["lang"], "fr");
        assert_eq!(body["direction"], "ltr");
        assert_eq!(body["source"], "local");
    }

    #[tokio::test]
    async fn test_ask_arabic_is_rtl() {
        let (app, _) = test_app();

        let body = json_body(
            app.oneshot(ask_request(&json!({ "message": "متى تفتحون؟", "lang": "ar" })))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["direction"], "rtl");
        assert!(body["html"].as_str().unwrap().contains(r#"dir="rtl""#));
        assert!(body["text"].as_str().unwrap().starts_with("ساعات العمل"));
    }

    #[tokio::test]
    async fn test_ask_unknown_language_is_english() {
        let (app, _) = test_app();

        let body = json_body(
            app.oneshot(ask_request(&json!({ "message": "where are you?", "lang": "de" })))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["lang"], "en");
        assert_eq!(body["text"], "Our address: 123 Main St, Casablanca, Morocco");
    }

    #[tokio::test]
    async fn test_ask_blank_message_rejected() {
        let (app, _) = test_app();

        let response = app
            .oneshot(ask_request(&json!({ "message": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ask_falls_back_when_generation_fails() {
        let assistant = Assistant::new(FactSheet::default()).with_generator(Arc::new(Unreachable));
        let (app, _) = test_app_with(assistant);

        let body = json_body(
            app.oneshot(ask_request(&json!({ "message": "phone?" })))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["source"], "local");
        assert_eq!(body["text"], "You can call Loay at +212 776270650");
    }

    #[tokio::test]
    async fn test_greeting() {
        let (app, _) = test_app();

        let body = json_body(
            app.oneshot(
                Request::get("/api/assistant/greeting?lang=fr")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(
            body["greeting"],
            "Bonjour ! Je peux vous aider avec des pièces, horaires, et contact."
        );
        assert_eq!(body["language_switched"], "Langue changée.");
        assert_eq!(body["thinking_delay_ms"], 600);
    }

    #[tokio::test]
    async fn test_facts() {
        let (app, _) = test_app();

        let body = json_body(
            app.oneshot(Request::get("/api/assistant/facts").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["owner"]["phone"], "+212 776270650");
        assert_eq!(body["prices"][0]["item"], "oil change");
    }
}
