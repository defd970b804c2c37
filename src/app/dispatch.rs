use crate::cli::commands::{Cli, Commands, PageArgs};
use anyhow::{Context, Result};
use serde_json::json;
use smartlinks::Config;
use smartlinks::links::{
    Anchor, HttpTransport, LinkMapper, MapperSettings, PageDocument, PublisherId,
    apply_replacements, build_payload,
};
use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::app::status::render_config;

async fn load_page(page: &PageArgs, link_attribute: &str) -> Result<PageDocument> {
    let page_url = Url::parse(&page.url).with_context(|| format!("Invalid page URL: {}", page.url))?;
    let html = tokio::fs::read_to_string(&page.html)
        .await
        .with_context(|| format!("Failed to read {}", page.html.display()))?;
    Ok(PageDocument::parse(&html, &page_url, link_attribute))
}

/// Request smart links for the page, rewrite matching anchors and report.
async fn run_rewrite(
    mut config: Config,
    page: &PageArgs,
    publisher_id: Option<&str>,
    json_output: bool,
) -> Result<()> {
    if let Some(id) = publisher_id {
        config.publisher_id = PublisherId::from(id);
    }
    config.exclusive_links |= page.exclusive;
    config.validate()?;

    let document = load_page(page, &config.link_attribute).await?;
    info!(
        anchors = document.anchors.len(),
        article = %document.canonical_url,
        "loaded page"
    );

    let transport = Arc::new(HttpTransport::from_config(&config));
    let mapper = LinkMapper::new(
        MapperSettings::from_config(&config),
        document.article(),
        transport,
    );

    let original: Vec<String> = document.anchors.iter().map(Anchor::link_value).collect();
    let mapping = mapper
        .reconcile(document.anchors.clone())
        .settle()
        .await?
        .unwrap_or_default();

    if json_output {
        let entries: Vec<_> = mapping
            .iter()
            .map(|entry| {
                json!({
                    "link": entry.anchor.link_value(),
                    "text": entry.anchor.text(),
                    "replacement_url": entry.replacement_url,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    }

    let rewritten = apply_replacements(&mapping);

    if !json_output {
        for (anchor, before) in document.anchors.iter().zip(&original) {
            let after = anchor.link_value();
            if after != *before {
                println!("{before} -> {after}");
            }
        }
    }
    info!(rewritten, anchors = document.anchors.len(), "rewrite complete");
    Ok(())
}

async fn run_payload(config: &Config, page: &PageArgs) -> Result<()> {
    let document = load_page(page, &config.link_attribute).await?;
    let payload = build_payload(
        &document.article(),
        &document.anchors,
        config.exclusive_links || page.exclusive,
    );
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match &cli.command {
        Commands::Rewrite {
            page,
            publisher_id,
            json,
        } => run_rewrite(config, page, publisher_id.as_deref(), *json).await,
        Commands::Payload { page } => run_payload(&config, page).await,
        Commands::Config => {
            println!("{}", render_config(&config));
            Ok(())
        }
    }
}
