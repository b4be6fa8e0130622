pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::forms::handlers as forms;
use crate::questions::handlers as questions;
use crate::responses::handlers as responses;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Question bank
        .route("/api/questions", get(questions::handle_list_questions))
        .route("/api/questions", post(questions::handle_create_question))
        .route(
            "/api/questions/:id",
            patch(questions::handle_update_question),
        )
        .route(
            "/api/questions/:id",
            delete(questions::handle_delete_question),
        )
        // Forms and layouts
        .route("/api/forms", get(forms::handle_list_forms))
        .route("/api/forms", post(forms::handle_create_form))
        .route("/api/forms/:slug", get(forms::handle_get_form))
        .route("/api/forms/:slug", put(forms::handle_update_form))
        .route("/api/forms/:slug", delete(forms::handle_delete_form))
        // Responses
        .route("/api/responses", post(responses::handle_submit_response))
        .route(
            "/api/forms/:slug/responses",
            get(responses::handle_list_form_responses),
        )
        .route("/api/responses/:id", get(responses::handle_get_response))
        .with_state(state)
}
