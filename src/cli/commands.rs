use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `smartlinks` - Rewrite page anchors to smart link redirects.
#[derive(Parser, Debug)]
#[command(name = "smartlinks")]
#[command(version = "0.1.0")]
#[command(about = "Sync a page's anchors with the smart link API.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.smartlinks/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Request smart links for a page and rewrite matching anchors
    Rewrite {
        #[command(flatten)]
        page: PageArgs,

        /// Publisher ID (overrides config)
        #[arg(long)]
        publisher_id: Option<String>,

        /// Print the full mapping as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the request body without sending it
    Payload {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show the effective configuration
    Config,
}

#[derive(clap::Args, Debug)]
pub struct PageArgs {
    /// HTML file to read
    #[arg(long)]
    pub html: PathBuf,

    /// URL the page is served from (canonical fallback, relative link base)
    #[arg(long)]
    pub url: String,

    /// Request exclusive matches for every link
    #[arg(long)]
    pub exclusive: bool,
}
