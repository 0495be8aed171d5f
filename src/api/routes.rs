//! API Routes
//!
//! Configures the Axum router for the development backend. Catalog, account
//! and shortlist endpoints live under `/api`; `/health` sits at the root.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_shortlist_handler, chat_handler, countries_handler, current_user_handler,
    disciplines_handler, get_program_handler, get_shortlist_handler, health_handler,
    login_handler, recommendations_handler, register_handler, remove_shortlist_handler,
    search_programs_handler, similar_programs_handler, submit_lead_handler, universities_handler,
    update_profile_handler, update_shortlist_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/programs/search", get(search_programs_handler))
        .route("/programs/:id", get(get_program_handler))
        .route("/programs/:id/similar", get(similar_programs_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/me", get(current_user_handler))
        .route("/users/profile", put(update_profile_handler))
        .route(
            "/shortlist",
            get(get_shortlist_handler).post(add_shortlist_handler),
        )
        .route(
            "/shortlist/:id",
            put(update_shortlist_handler).delete(remove_shortlist_handler),
        )
        .route("/recommendations", post(recommendations_handler))
        .route("/ai/chat", post(chat_handler))
        .route("/leads", post(submit_lead_handler))
        .route("/metadata/countries", get(countries_handler))
        .route("/metadata/disciplines", get(disciplines_handler))
        .route("/metadata/universities", get(universities_handler));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
