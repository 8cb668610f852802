use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::application::{application_gate, RoutePolicy};
use crate::session;
use crate::shared::AppState;

/// Builds the HTTP router with every session route behind the application gate
pub fn build_router(state: AppState) -> Router {
    let issue_routes = Router::new()
        .route("/", post(session::create_session))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), RoutePolicy::ISSUE),
            application_gate,
        ));

    let manage_routes = Router::new()
        .route(
            "/:token",
            get(session::get_session).delete(session::delete_session),
        )
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), RoutePolicy::MANAGE),
            application_gate,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/sessions", issue_routes.merge(manage_routes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
