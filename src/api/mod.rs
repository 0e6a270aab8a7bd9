//! API layer - HTTP endpoint handlers.

mod health;
mod render;
mod routes;
mod template;

pub use health::{health, HealthResponse};
pub use render::{render_adhoc, render_template, AdhocRenderRequest, RenderTemplateRequest};
pub use routes::api_routes;
pub use template::{create_template, delete_template, get_template, list_templates, update_template};
