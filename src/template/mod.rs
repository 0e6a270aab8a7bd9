//! Notification template system.
//!
//! This module provides:
//! - A renderer for `{{path}}` placeholders, `{{#if}}` and `{{#each}}` blocks
//! - Per-field rendering of subject/text/html content with HTML escaping
//! - In-memory template storage with CRUD operations and locale fallback
//!
//! # Example
//!
//! ```ignore
//! let content = TemplateContent {
//!     subject: Some("Booking {{booking.id}} confirmed".to_string()),
//!     text: Some("{{#each booking.items}}- {{name}}\n{{/each}}".to_string()),
//!     html: Some("<p>Hi {{booking.customerName}}</p>".to_string()),
//! };
//!
//! let variables = json!({
//!     "booking": {
//!         "id": "BK-1001",
//!         "customerName": "Asha",
//!         "items": [{"name": "Dinner cruise"}]
//!     }
//! });
//!
//! let rendered = render_content(&content, &variables)?;
//! ```

mod parser;
mod render;
mod store;
mod substitution;
mod types;
mod value;

pub use parser::{parse, BlockKind, Node};
pub use render::{render_content, render_template};
pub use store::{create_template_store, TemplateStore};
pub use substitution::{escape_html, render_nodes, OutputMode};
pub use types::{
    Channel, CreateTemplateRequest, NotificationTemplate, RenderedContent, RenderedNotification,
    TemplateContent, TemplateError, TemplateListResponse, TemplateResult, UpdateTemplateRequest,
};
pub use value::{is_truthy, resolve};
