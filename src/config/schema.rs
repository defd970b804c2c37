use crate::error::ConfigError;
use crate::links::{EndpointTemplate, PublisherId, RedirectTemplate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Publisher identifier substituted into the endpoint template
    #[serde(default)]
    pub publisher_id: PublisherId,
    /// Ask for exclusive matches on every link
    #[serde(default)]
    pub exclusive_links: bool,
    /// Anchor attribute holding the link URL (default: "href")
    #[serde(default = "default_link_attribute")]
    pub link_attribute: String,

    #[serde(default)]
    pub api: ApiConfig,
}

fn default_link_attribute() -> String {
    "href".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            publisher_id: PublisherId::default(),
            exclusive_links: false,
            link_attribute: default_link_attribute(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.publisher_id.is_empty() {
            return Err(ConfigError::Validation(
                "publisher_id is not set (config file or SMARTLINKS_PUBLISHER_ID)".into(),
            ));
        }
        if self.link_attribute.trim().is_empty() {
            return Err(ConfigError::Validation("link_attribute is empty".into()));
        }
        if !self.api.endpoint_template.has_placeholder() {
            return Err(ConfigError::Validation(format!(
                "api.endpoint_template must contain {{publisher_id}}: {}",
                self.api.endpoint_template.as_str()
            )));
        }
        if !self.api.redirect_template.has_placeholder() {
            return Err(ConfigError::Validation(format!(
                "api.redirect_template must contain {{auction_id}}: {}",
                self.api.redirect_template.as_str()
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

// ── Smart link API ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// POST endpoint, `{publisher_id}` is substituted
    #[serde(default)]
    pub endpoint_template: EndpointTemplate,
    /// Redirect URL written into matching anchors, `{auction_id}` is substituted
    #[serde(default)]
    pub redirect_template: RedirectTemplate,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint_template: EndpointTemplate::default(),
            redirect_template: RedirectTemplate::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
