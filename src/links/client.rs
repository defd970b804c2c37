use super::types::{EndpointTemplate, LinkPayload, PublisherId, SmartLink};
use crate::config::Config;
use crate::error::LinkMapError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Sends a payload to the smart link API and returns `data[0].smart_links`.
#[async_trait]
pub trait SmartLinkTransport: Send + Sync {
    async fn fetch_smart_links(
        &self,
        payload: &LinkPayload,
    ) -> Result<Vec<SmartLink>, LinkMapError>;
}

pub struct HttpTransport {
    endpoint: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(endpoint: &EndpointTemplate, publisher_id: &PublisherId, timeout_secs: u64) -> Self {
        Self {
            endpoint: endpoint.render(publisher_id),
            client: build_client(timeout_secs),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.api.endpoint_template,
            &config.publisher_id,
            config.api.timeout_secs,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[async_trait]
impl SmartLinkTransport for HttpTransport {
    async fn fetch_smart_links(
        &self,
        payload: &LinkPayload,
    ) -> Result<Vec<SmartLink>, LinkMapError> {
        tracing::debug!(endpoint = %self.endpoint, links = payload.links.len(), "posting smart link request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            return Err(LinkMapError::Status {
                status: status.as_u16(),
                body: truncate_error_body(&body),
            });
        }

        let bytes = response.bytes().await?;
        parse_smart_links(&decode_body(&bytes)?)
    }
}

/// Decode a response body as JSON. Transport failures never reach here.
pub fn decode_body(bytes: &[u8]) -> Result<Value, LinkMapError> {
    serde_json::from_slice(bytes)
        .map_err(|e| LinkMapError::MalformedResponse(format!("body is not JSON: {e}")))
}

/// Read `data[0].smart_links`. Anything else in the body is ignored.
pub fn parse_smart_links(body: &Value) -> Result<Vec<SmartLink>, LinkMapError> {
    let smart_links = body
        .get("data")
        .and_then(|data| data.get(0))
        .and_then(|first| first.get("smart_links"))
        .ok_or_else(|| {
            LinkMapError::MalformedResponse("missing data[0].smart_links".to_string())
        })?;

    serde_json::from_value(smart_links.clone())
        .map_err(|e| LinkMapError::MalformedResponse(format!("smart_links: {e}")))
}

fn truncate_error_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!("{truncated}...")
}
