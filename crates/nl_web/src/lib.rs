use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/tones", get(handlers::list_tones))
        .route("/api/newsletter", post(handlers::create_newsletter))
        .layer(cors)
        .with_state(state)
}

pub mod prelude {
    pub use crate::{create_app, AppState};
    pub use nl_core::{Error, NewsletterReport, NewsletterRequest, Result};
}
