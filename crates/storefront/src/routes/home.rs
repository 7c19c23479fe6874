//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub store_name: String,
    pub user: Option<CurrentUser>,
}

/// Display the landing page, greeting the logged-in user if there is one.
pub async fn home(State(state): State<AppState>, OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    HomeTemplate {
        store_name: state.assistant().facts().name.clone(),
        user,
    }
}
