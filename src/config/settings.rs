use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    /// Locale assigned to templates created without one
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Upper bound for each subject/text/html source, in bytes
    #[serde(default = "default_max_template_bytes")]
    pub max_template_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_max_template_bytes() -> usize {
    64 * 1024
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8081)?
            .set_default("templates.default_locale", "en")?
            .set_default("templates.max_template_bytes", 64 * 1024)?
            .set_default("logging.format", "pretty")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // SERVER__PORT, TEMPLATES__DEFAULT_LOCALE, LOGGING__FORMAT, etc.
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            max_template_bytes: default_max_template_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8081);

        let templates = TemplateConfig::default();
        assert_eq!(templates.default_locale, "en");
        assert_eq!(templates.max_template_bytes, 65536);

        assert_eq!(LoggingConfig::default().format, LogFormat::Pretty);
    }

    #[test]
    fn test_deserialize_partial_settings() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "server": {"port": 9000},
            "logging": {"format": "json"}
        }))
        .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.templates.default_locale, "en");
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.server_addr(), "0.0.0.0:9000");
    }
}
