use super::Config;
use crate::links::{EndpointTemplate, PublisherId};

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("SMARTLINKS_PUBLISHER_ID")
            && !id.trim().is_empty()
        {
            self.publisher_id = PublisherId::from(id.trim());
        }

        if let Ok(flag) = std::env::var("SMARTLINKS_EXCLUSIVE_LINKS")
            && let Some(exclusive) = parse_bool(&flag)
        {
            self.exclusive_links = exclusive;
        }

        if let Ok(attribute) = std::env::var("SMARTLINKS_LINK_ATTRIBUTE")
            && !attribute.trim().is_empty()
        {
            self.link_attribute = attribute.trim().to_string();
        }

        if let Ok(endpoint) = std::env::var("SMARTLINKS_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.api.endpoint_template = EndpointTemplate::new(endpoint);
        }

        if let Ok(timeout_str) = std::env::var("SMARTLINKS_TIMEOUT_SECS")
            && let Ok(timeout) = timeout_str.parse::<u64>()
            && timeout > 0
        {
            self.api.timeout_secs = timeout;
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
