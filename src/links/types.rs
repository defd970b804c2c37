use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const DEFAULT_ENDPOINT_TEMPLATE: &str =
    "https://api.narrativ.com/api/v1/publishers/{publisher_id}/linkmate/smart_links/";
pub const DEFAULT_REDIRECT_TEMPLATE: &str = "https://shop-links.co/{auction_id}/?amp=true";

const PUBLISHER_PLACEHOLDER: &str = "{publisher_id}";
const AUCTION_PLACEHOLDER: &str = "{auction_id}";

/// One anchor as sent to the smart link API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRequestItem {
    pub raw_url: String,
    pub exclusive_match_requested: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleInfo {
    pub name: Option<String>,
    pub url: String,
}

impl ArticleInfo {
    pub fn new(name: Option<String>, url: impl Into<String>) -> Self {
        Self {
            name,
            url: url.into(),
        }
    }
}

/// Request body: `{"article": {...}, "links": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPayload {
    pub article: ArticleInfo,
    pub links: Vec<LinkRequestItem>,
}

/// A canonical link returned by the API. Only `url` and `auction_id` are
/// interpreted; everything else rides along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartLink {
    pub url: String,
    pub auction_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SmartLink {
    pub fn new(url: impl Into<String>, auction_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auction_id: auction_id.into(),
            extra: Map::new(),
        }
    }
}

/// Outcome for one (smart link, anchor) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation<A> {
    pub anchor: A,
    pub replacement_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublisherId {
    Numeric(u64),
    Text(String),
}

impl PublisherId {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Numeric(_) => false,
            Self::Text(text) => text.trim().is_empty(),
        }
    }
}

impl Default for PublisherId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for PublisherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<&str> for PublisherId {
    fn from(value: &str) -> Self {
        value
            .parse::<u64>()
            .map_or_else(|_| Self::Text(value.to_string()), Self::Numeric)
    }
}

/// API endpoint with a `{publisher_id}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointTemplate(String);

impl EndpointTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_placeholder(&self) -> bool {
        self.0.contains(PUBLISHER_PLACEHOLDER)
    }

    pub fn render(&self, publisher_id: &PublisherId) -> String {
        self.0
            .replace(PUBLISHER_PLACEHOLDER, &publisher_id.to_string())
    }
}

impl Default for EndpointTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT_TEMPLATE)
    }
}

/// Redirect URL with an `{auction_id}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedirectTemplate(String);

impl RedirectTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_placeholder(&self) -> bool {
        self.0.contains(AUCTION_PLACEHOLDER)
    }

    pub fn render(&self, auction_id: &str) -> String {
        self.0.replace(AUCTION_PLACEHOLDER, auction_id)
    }
}

impl Default for RedirectTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_REDIRECT_TEMPLATE)
    }
}
