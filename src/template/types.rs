//! Template types and error definitions

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid template ID: {0}")]
    InvalidId(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field missing or empty: {0}")]
    MissingField(&'static str),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Notification delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    Push,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Push => "push",
        }
    }

    /// Check that the fields this channel needs are present and non-empty.
    ///
    /// Email needs a subject plus a text or HTML body. SMS and push need text.
    pub fn check_fields(
        &self,
        subject: Option<&str>,
        text: Option<&str>,
        html: Option<&str>,
    ) -> TemplateResult<()> {
        let filled = |field: Option<&str>| field.is_some_and(|s| !s.trim().is_empty());

        match self {
            Channel::Email => {
                if !filled(subject) {
                    return Err(TemplateError::MissingField("subject"));
                }
                if !filled(text) && !filled(html) {
                    return Err(TemplateError::MissingField("text"));
                }
            }
            Channel::Sms | Channel::Push => {
                if !filled(text) {
                    return Err(TemplateError::MissingField("text"));
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw template content for one locale
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl TemplateContent {
    fn fields(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("subject", self.subject.as_deref()),
            ("text", self.text.as_deref()),
            ("html", self.html.as_deref()),
        ]
    }
}

/// Rendered content; only fields present in the source content are set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// A stored notification template definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTemplate {
    /// Unique template identifier (alphanumeric, dash, underscore)
    pub id: String,

    /// Human-readable template name
    pub name: String,

    /// Delivery channel the content is written for
    pub channel: Channel,

    /// Locale used when a render request names none, or one without content
    pub default_locale: String,

    /// Content keyed by locale
    pub content: BTreeMap<String, TemplateContent>,

    /// Starts at 1, incremented on every update
    pub version: u32,

    /// Template description (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl NotificationTemplate {
    /// Validate the template against the store limits
    pub fn validate(&self, max_field_bytes: usize) -> TemplateResult<()> {
        if self.id.is_empty() || self.id.len() > 64 {
            return Err(TemplateError::InvalidId(
                "ID must be 1-64 characters".to_string(),
            ));
        }

        if !self
            .id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TemplateError::InvalidId(
                "ID must contain only alphanumeric, dash, or underscore".to_string(),
            ));
        }

        if self.name.is_empty() || self.name.len() > 256 {
            return Err(TemplateError::InvalidTemplate(
                "Name must be 1-256 characters".to_string(),
            ));
        }

        if !self.content.contains_key(&self.default_locale) {
            return Err(TemplateError::InvalidTemplate(format!(
                "No content for default locale '{}'",
                self.default_locale
            )));
        }

        for (locale, content) in &self.content {
            if locale.is_empty() || locale.len() > 35 {
                return Err(TemplateError::InvalidTemplate(
                    "Locale must be 1-35 characters".to_string(),
                ));
            }

            for (field, value) in content.fields() {
                if value.is_some_and(|v| v.len() > max_field_bytes) {
                    return Err(TemplateError::InvalidTemplate(format!(
                        "Field '{}' for locale '{}' exceeds {} bytes",
                        field, locale, max_field_bytes
                    )));
                }
            }

            // The raw source must carry every field the channel delivers.
            self.channel
                .check_fields(
                    content.subject.as_deref(),
                    content.text.as_deref(),
                    content.html.as_deref(),
                )
                .map_err(|e| {
                    TemplateError::InvalidTemplate(format!("Locale '{}': {}", locale, e))
                })?;
        }

        Ok(())
    }
}

/// Request to create a new template
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    /// Unique template identifier
    pub id: String,

    /// Human-readable template name
    pub name: String,

    /// Delivery channel
    pub channel: Channel,

    /// Default locale (optional, defaults to the configured locale)
    pub default_locale: Option<String>,

    /// Content keyed by locale
    pub content: BTreeMap<String, TemplateContent>,

    /// Template description (optional)
    pub description: Option<String>,
}

impl CreateTemplateRequest {
    /// Build a template, filling in the default locale when none was given
    pub fn into_template(self, fallback_locale: &str) -> NotificationTemplate {
        let now = Utc::now();
        NotificationTemplate {
            id: self.id,
            name: self.name,
            channel: self.channel,
            default_locale: self
                .default_locale
                .unwrap_or_else(|| fallback_locale.to_string()),
            content: self.content,
            version: 1,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to update an existing template
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    /// Human-readable template name (optional)
    pub name: Option<String>,

    /// Delivery channel (optional)
    pub channel: Option<Channel>,

    /// Default locale (optional)
    pub default_locale: Option<String>,

    /// Replacement content map (optional)
    pub content: Option<BTreeMap<String, TemplateContent>>,

    /// Template description (optional, use null to clear)
    #[serde(default, deserialize_with = "present_or_null")]
    pub description: Option<Option<String>>,
}

/// Keeps an explicit `null` apart from an absent key: absent stays `None`
/// through `default`, `null` becomes `Some(None)`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Response for listing templates
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateListResponse {
    /// List of templates
    pub templates: Vec<NotificationTemplate>,

    /// Total count
    pub total: usize,
}

/// A rendered template with the metadata a dispatcher needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedNotification {
    pub template_id: String,
    pub channel: Channel,
    /// Locale whose content was rendered
    pub locale: String,
    pub version: u32,
    pub content: RenderedContent,
}
