use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `smartlinks`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; the binary and loaders continue to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum SmartLinksError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Link mapping / transport ────────────────────────────────────────
    #[error("links: {0}")]
    Link(#[from] LinkMapError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Link mapping errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LinkMapError {
    /// Network, TLS or timeout failure before a response arrived.
    #[error("smart link request failed: {0}")]
    Request(String),

    #[error("smart link API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("malformed smart link response: {0}")]
    MalformedResponse(String),

    /// A newer request was issued before this one resolved; its response was
    /// discarded.
    #[error("smart link request #{seq} superseded by #{latest}")]
    Superseded { seq: u64, latest: u64 },

    #[error("smart link task aborted: {0}")]
    Aborted(String),

    #[error("no tokio runtime to issue the smart link request")]
    NoRuntime,
}

impl LinkMapError {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}

impl From<reqwest::Error> for LinkMapError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error.to_string())
    }
}
