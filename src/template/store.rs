//! Template storage with CRUD operations and rendering

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use super::render::render_content;
use super::types::{
    NotificationTemplate, RenderedNotification, TemplateError, TemplateResult,
    UpdateTemplateRequest,
};
use crate::config::TemplateConfig;

/// In-memory template storage
pub struct TemplateStore {
    templates: DashMap<String, NotificationTemplate>,
    config: TemplateConfig,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    /// Create a new template store with default limits
    pub fn new() -> Self {
        Self::with_config(TemplateConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(config: TemplateConfig) -> Self {
        Self {
            templates: DashMap::new(),
            config,
        }
    }

    /// Locale assigned to templates created without one
    pub fn default_locale(&self) -> &str {
        &self.config.default_locale
    }

    /// Create a new template
    pub fn create(&self, template: NotificationTemplate) -> TemplateResult<NotificationTemplate> {
        template.validate(self.config.max_template_bytes)?;

        // entry() holds the shard lock so concurrent creates cannot both succeed
        match self.templates.entry(template.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(TemplateError::AlreadyExists(template.id))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                tracing::info!(
                    template_id = %template.id,
                    channel = %template.channel,
                    locales = template.content.len(),
                    "Template created"
                );
                Ok(slot.insert(template).clone())
            }
        }
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> TemplateResult<NotificationTemplate> {
        self.templates
            .get(id)
            .map(|t| t.clone())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// List all templates, ordered by ID
    pub fn list(&self) -> Vec<NotificationTemplate> {
        let mut templates: Vec<_> = self
            .templates
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }

    /// Update an existing template and bump its version
    pub fn update(
        &self,
        id: &str,
        updates: UpdateTemplateRequest,
    ) -> TemplateResult<NotificationTemplate> {
        let mut entry = self
            .templates
            .get_mut(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;

        let mut template = entry.clone();

        if let Some(name) = updates.name {
            template.name = name;
        }

        if let Some(channel) = updates.channel {
            template.channel = channel;
        }

        if let Some(locale) = updates.default_locale {
            template.default_locale = locale;
        }

        if let Some(content) = updates.content {
            template.content = content;
        }

        if let Some(description) = updates.description {
            template.description = description;
        }

        template.validate(self.config.max_template_bytes)?;
        template.version += 1;
        template.updated_at = Utc::now();

        *entry = template.clone();

        tracing::info!(
            template_id = %id,
            version = template.version,
            "Template updated"
        );

        Ok(template)
    }

    /// Delete a template by ID
    pub fn delete(&self, id: &str) -> TemplateResult<()> {
        self.templates
            .remove(id)
            .map(|_| tracing::info!(template_id = %id, "Template deleted"))
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Check if a template exists
    pub fn exists(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Get the number of templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }

    /// Render a template for a locale.
    ///
    /// Falls back to the template's default locale when `locale` is absent or
    /// has no content. Fails with `MissingField` when a field the channel
    /// requires renders empty.
    pub fn render(
        &self,
        id: &str,
        locale: Option<&str>,
        variables: &serde_json::Value,
    ) -> TemplateResult<RenderedNotification> {
        let template = self.get(id)?;

        let (locale, content) = locale
            .and_then(|l| template.content.get_key_value(l))
            .or_else(|| template.content.get_key_value(&template.default_locale))
            .ok_or_else(|| {
                TemplateError::InvalidTemplate(format!(
                    "No content for default locale '{}'",
                    template.default_locale
                ))
            })?;

        let rendered = render_content(content, variables)?;

        template.channel.check_fields(
            rendered.subject.as_deref(),
            rendered.text.as_deref(),
            rendered.html.as_deref(),
        )?;

        tracing::debug!(
            template_id = %id,
            locale = %locale,
            version = template.version,
            "Template rendered"
        );

        Ok(RenderedNotification {
            template_id: template.id.clone(),
            channel: template.channel,
            locale: locale.clone(),
            version: template.version,
            content: rendered,
        })
    }
}

/// Create an Arc-wrapped template store
pub fn create_template_store(config: TemplateConfig) -> Arc<TemplateStore> {
    Arc::new(TemplateStore::with_config(config))
}
