//! Configuration model loaded from external sources.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

fn default_database_url() -> String {
    "app.db".to_string()
}

#[derive(Clone, Debug, Deserialize)]
/// Worker configuration: database location and the two external services.
pub struct AppConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Base URL of an OpenAI-compatible chat-completions API.
    pub model_api_base: String,
    pub model: String,
    #[serde(default)]
    pub llm_api_key: Option<String>,
    /// Endpoint of the embedding microservice.
    pub embedder_url: String,
    /// When set, embeddings of any other length are rejected.
    #[serde(default)]
    pub embedder_dimensions: Option<usize>,
}

impl AppConfig {
    /// Loads `config.yaml` (optional) overlaid with environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, FileFormat};

    use super::AppConfig;

    #[test]
    fn config_defaults_database_url_and_optional_fields() {
        let config: AppConfig = Config::builder()
            .add_source(config::File::from_str(
                "model_api_base: http://localhost:8000/v1\nmodel: qwen\nembedder_url: http://localhost:8080/embed\n",
                FileFormat::Yaml,
            ))
            .build()
            .expect("config builds")
            .try_deserialize()
            .expect("config deserializes");

        assert_eq!(config.database_url, "app.db");
        assert_eq!(config.model, "qwen");
        assert!(config.llm_api_key.is_none());
        assert!(config.embedder_dimensions.is_none());
    }

    #[test]
    fn config_reads_explicit_values() {
        let config: AppConfig = Config::builder()
            .add_source(config::File::from_str(
                concat!(
                    "database_url: bank.db\n",
                    "model_api_base: http://llm:8000/v1\n",
                    "model: qwen\n",
                    "llm_api_key: secret\n",
                    "embedder_url: http://embedder:8080/embed\n",
                    "embedder_dimensions: 384\n",
                ),
                FileFormat::Yaml,
            ))
            .build()
            .expect("config builds")
            .try_deserialize()
            .expect("config deserializes");

        assert_eq!(config.database_url, "bank.db");
        assert_eq!(config.llm_api_key.as_deref(), Some("secret"));
        assert_eq!(config.embedder_dimensions, Some(384));
    }
}
