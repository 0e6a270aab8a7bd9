use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::health::health;
use super::render::{render_adhoc, render_template};
use super::template::{
    create_template, delete_template, get_template, list_templates, update_template,
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health))
        .nest(
            "/api/v1",
            Router::new()
                // Template CRUD
                .route("/templates", post(create_template).get(list_templates))
                .route(
                    "/templates/{id}",
                    get(get_template).put(update_template).delete(delete_template),
                )
                // Rendering
                .route("/templates/{id}/render", post(render_template))
                .route("/render", post(render_adhoc)),
        )
}
