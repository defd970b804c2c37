use smartlinks::{Config, ConfigError};
use smartlinks::links::PublisherId;
use std::fs;

#[test]
fn loads_config_file_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
publisher_id = 981
exclusive_links = true

[api]
redirect_template = "https://go.example/{auction_id}"
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).expect("config should load");

    assert_eq!(config.config_path, path);
    assert_eq!(config.publisher_id, PublisherId::Numeric(981));
    assert!(config.exclusive_links);
    assert_eq!(config.link_attribute, "href");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(
        config.api.redirect_template.render("A1"),
        "https://go.example/A1"
    );
    assert!(config.validate().is_ok());
}

#[test]
fn save_then_load_preserves_settings() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        config_path: dir.path().join("config.toml"),
        publisher_id: PublisherId::Text("pub-7".into()),
        link_attribute: "data-href".into(),
        ..Config::default()
    };
    config.save().unwrap();

    let loaded = Config::load_from(&config.config_path).unwrap();
    assert_eq!(loaded.publisher_id, PublisherId::Text("pub-7".into()));
    assert_eq!(loaded.link_attribute, "data-href");
}

#[test]
fn unparsable_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "publisher_id = [").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Load(_))
    ));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Io(_))
    ));
}
