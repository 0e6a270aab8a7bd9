//! Rendering endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::template::{
    render_content, RenderedContent, RenderedNotification, TemplateContent,
};

/// Body for rendering a stored template
#[derive(Debug, Deserialize)]
pub struct RenderTemplateRequest {
    /// Preferred locale; the template's default locale is used when absent
    pub locale: Option<String>,

    /// Variable bag, must be a JSON object
    #[serde(default = "empty_object")]
    pub variables: serde_json::Value,
}

/// Body for rendering content that is not stored
#[derive(Debug, Deserialize)]
pub struct AdhocRenderRequest {
    pub content: TemplateContent,

    #[serde(default = "empty_object")]
    pub variables: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// POST /api/v1/templates/{id}/render - Render a stored template
#[tracing::instrument(
    name = "http.render_template",
    skip(state, request),
    fields(locale = request.locale.as_deref().unwrap_or("default"))
)]
pub async fn render_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenderTemplateRequest>,
) -> Result<Json<RenderedNotification>> {
    let rendered = state
        .template_store
        .render(&id, request.locale.as_deref(), &request.variables)?;

    Ok(Json(rendered))
}

/// POST /api/v1/render - Render ad-hoc content
#[tracing::instrument(name = "http.render_adhoc", skip(state, request))]
pub async fn render_adhoc(
    State(state): State<AppState>,
    Json(request): Json<AdhocRenderRequest>,
) -> Result<Json<RenderedContent>> {
    let limit = state.settings.templates.max_template_bytes;
    let content = &request.content;

    if [&content.subject, &content.text, &content.html]
        .into_iter()
        .flatten()
        .any(|field| field.len() > limit)
    {
        return Err(AppError::Validation(format!(
            "Content fields must not exceed {} bytes",
            limit
        )));
    }

    Ok(Json(render_content(content, &request.variables)?))
}
