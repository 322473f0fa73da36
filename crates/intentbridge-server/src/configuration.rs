use crate::error::{to_env_var, ConfigError, ENV_PREFIX};
use config::{Config, Environment, File};
use intentbridge::completion::DEFAULT_PERSONA;
use intentbridge::providers::configs::{
    ApiKey, OpenAiProviderConfig, OPENAI_ENDPOINT, OPENAI_MODEL,
};
use intentbridge::webhook::DEFAULT_FALLBACK_INTENT;
use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[derive(Debug, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: ApiKey,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<i32>,
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    // Convert to the intentbridge provider config
    pub fn into_config(self) -> OpenAiProviderConfig {
        let timeout = self.timeout();
        OpenAiProviderConfig {
            endpoint: self.endpoint,
            api_key: self.api_key,
            model: self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WebhookSettings {
    #[serde(default = "default_fallback_intent")]
    pub fallback_intent: String,
    #[serde(default = "default_persona")]
    pub persona: String,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            fallback_intent: default_fallback_intent(),
            persona: default_persona(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    #[serde(default)]
    pub webhook: WebhookSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        // Start with default configuration
        let config = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            // Provider defaults
            .set_default("provider.endpoint", default_endpoint())?
            .set_default("provider.model", default_model())?
            .set_default("provider.timeout_secs", default_timeout_secs())?
            // Optional intentbridge.toml in the working directory
            .add_source(File::with_name("intentbridge").required(false))
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Try to deserialize the configuration
        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        let settings = match result {
            Ok(settings) => settings,
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                // Handle both NotFound and missing field message variants
                let error_str = err.to_string();
                return if error_str.starts_with("missing field") {
                    // Extract field name from error message "missing field `type`"
                    let field = error_str
                        .trim_start_matches("missing field `")
                        .split('`')
                        .next()
                        .unwrap_or_default();
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                };
            }
        };

        // The key has no usable default, so an empty one means it was never set
        if settings.provider.api_key.is_empty() {
            return Err(ConfigError::MissingEnvVar {
                env_var: to_env_var("provider.api_key"),
            });
        }

        Ok(settings)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_model() -> String {
    OPENAI_MODEL.to_string()
}

fn default_endpoint() -> String {
    OPENAI_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_fallback_intent() -> String {
    DEFAULT_FALLBACK_INTENT.to_string()
}

fn default_persona() -> String {
    DEFAULT_PERSONA.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clean_env() {
        for (key, _) in env::vars() {
            if key.starts_with("INTENTBRIDGE_") {
                env::remove_var(&key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_settings() {
        clean_env();

        // Set required provider settings for test
        env::set_var("INTENTBRIDGE_PROVIDER__API_KEY", "test-key");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);

        let provider = &settings.provider;
        assert_eq!(
            provider.endpoint,
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(provider.api_key.expose(), "test-key");
        assert_eq!(provider.model, "gpt-4-turbo");
        assert_eq!(provider.timeout(), Duration::from_secs(30));
        assert_eq!(provider.temperature, None);
        assert_eq!(provider.max_tokens, None);

        assert_eq!(settings.webhook.fallback_intent, "Default Fallback Intent");
        assert_eq!(settings.webhook.persona, DEFAULT_PERSONA);

        // Clean up
        env::remove_var("INTENTBRIDGE_PROVIDER__API_KEY");
    }

    #[test]
    #[serial]
    fn test_missing_api_key() {
        clean_env();

        match Settings::new() {
            Err(ConfigError::MissingEnvVar { env_var }) => {
                assert_eq!(env_var, "INTENTBRIDGE_PROVIDER__API_KEY");
            }
            other => panic!("Expected missing api key error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    #[serial]
    fn test_blank_api_key_is_missing() {
        clean_env();
        env::set_var("INTENTBRIDGE_PROVIDER__API_KEY", "   ");

        assert!(matches!(
            Settings::new(),
            Err(ConfigError::MissingEnvVar { .. })
        ));

        env::remove_var("INTENTBRIDGE_PROVIDER__API_KEY");
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        clean_env();
        env::set_var("INTENTBRIDGE_SERVER__PORT", "9090");
        env::set_var("INTENTBRIDGE_PROVIDER__API_KEY", "test-key");
        env::set_var(
            "INTENTBRIDGE_PROVIDER__ENDPOINT",
            "https://llm.internal.example/v1beta/openai/chat/completions",
        );
        env::set_var("INTENTBRIDGE_PROVIDER__MODEL", "gpt-4o-mini");
        env::set_var("INTENTBRIDGE_PROVIDER__TIMEOUT_SECS", "5");
        env::set_var("INTENTBRIDGE_PROVIDER__TEMPERATURE", "0.2");
        env::set_var("INTENTBRIDGE_PROVIDER__MAX_TOKENS", "512");
        env::set_var("INTENTBRIDGE_WEBHOOK__FALLBACK_INTENT", "Unknown Question");
        env::set_var("INTENTBRIDGE_WEBHOOK__PERSONA", "You are a test bot.");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.webhook.fallback_intent, "Unknown Question");
        assert_eq!(settings.webhook.persona, "You are a test bot.");

        let config = settings.provider.into_config();
        assert_eq!(
            config.endpoint,
            "https://llm.internal.example/v1beta/openai/chat/completions"
        );
        assert_eq!(config.api_key.expose(), "test-key");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.max_tokens, Some(512));

        // Clean up
        clean_env();
    }

    #[test]
    #[serial]
    fn test_api_key_not_in_debug_output() {
        clean_env();
        env::set_var("INTENTBRIDGE_PROVIDER__API_KEY", "sk-super-secret");

        let settings = Settings::new().unwrap();
        assert!(!format!("{:?}", settings).contains("sk-super-secret"));

        env::remove_var("INTENTBRIDGE_PROVIDER__API_KEY");
    }

    #[test]
    fn test_socket_addr_conversion() {
        let server_settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        };
        let addr = server_settings.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");

        let bad = ServerSettings {
            host: "not a host".to_string(),
            port: 3000,
        };
        assert!(bad.socket_addr().is_err());
    }
}
