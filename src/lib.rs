#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

//! Keep a page's anchors in sync with a smart link API and rewrite matching
//! anchors to monetized redirect URLs.

pub mod config;
pub mod error;
pub mod links;

pub use config::Config;
pub use error::{ConfigError, LinkMapError, SmartLinksError};
pub use links::{LinkMapper, TwoPhaseResult};
