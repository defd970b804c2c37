use smartlinks::Config;

pub fn render_config(config: &Config) -> String {
    let publisher = if config.publisher_id.is_empty() {
        "(not set)".to_string()
    } else {
        config.publisher_id.to_string()
    };

    let lines = [
        format!("◆ smartlinks {}", env!("CARGO_PKG_VERSION")),
        String::new(),
        format!("  config          {}", config.config_path.display()),
        format!("  publisher       {publisher}"),
        format!("  link attribute  {}", config.link_attribute),
        format!("  exclusive       {}", config.exclusive_links),
        String::new(),
        format!(
            "  endpoint        {}",
            config.api.endpoint_template.render(&config.publisher_id)
        ),
        format!("  redirect        {}", config.api.redirect_template.as_str()),
        format!("  timeout         {}s", config.api.timeout_secs),
    ];
    lines.join("\n")
}
