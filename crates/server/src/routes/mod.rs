pub mod frontend;
pub mod health;
pub mod projects;
pub mod tasks;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    let api_router = Router::new()
        .merge(projects::router())
        .merge(tasks::router())
        .merge(health::router());

    Router::new()
        .nest("/api", api_router)
        .merge(frontend::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
