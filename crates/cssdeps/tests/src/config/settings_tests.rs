use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::extract::LiteralUrls;

use super::*;

/// Create a unique temporary directory for each test.
fn test_dir() -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("cssdeps_config_test_{}_{id}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn parses_every_category() {
    let settings = Settings::from_toml_str(
        r#"
        [import]
        enabled = false
        exclude = ["^https?:"]

        [url]
        literal = "keep"
        exclude = ["\\.svg$"]

        [resolve]
        root = "/srv/static"
        concurrency = 8
        extensions = [".css", "scss"]
        modules = ["node_modules", "vendor"]
        alias = { "@assets" = "/srv/assets" }

        [output]
        url_style = "relative"
        runtime_helper = "helpers/get-url.js"
        pretty = true

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    assert!(!settings.import.enabled);
    assert_eq!(settings.import.exclude, vec!["^https?:"]);
    assert!(settings.url.enabled);
    assert_eq!(settings.url.literal, LiteralUrls::Keep);
    assert_eq!(settings.resolve.root.as_deref(), Some("/srv/static"));
    assert_eq!(settings.resolve.concurrency, 8);
    assert_eq!(settings.resolve.extensions, vec![".css", ".scss"]);
    assert_eq!(settings.resolve.modules, vec!["node_modules", "vendor"]);
    assert_eq!(settings.resolve.alias.get("@assets").map(String::as_str), Some("/srv/assets"));
    assert_eq!(settings.output.url_style, UrlStyle::Relative);
    assert_eq!(settings.output.runtime_helper, "helpers/get-url.js");
    assert!(settings.output.pretty);
    assert_eq!(settings.logging.level, LogLevel::Debug);
    assert_eq!(settings.logging.filter_directive(), "cssdeps=debug");
}

#[test]
fn empty_file_gives_defaults() {
    assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    assert_eq!(Settings::default().url.literal, LiteralUrls::Rewrite);
}

#[test]
fn unknown_keys_are_ignored() {
    let settings = Settings::from_toml_str(
        r#"
        future = 1
        [url]
        enabled = false
        mystery = "yes"
        [plugins]
        x = true
        "#,
    )
    .unwrap();
    assert!(!settings.url.enabled);
}

#[test]
fn normalize_clamps_and_cleans() {
    let settings = Settings::from_toml_str(
        r#"
        [resolve]
        concurrency = 100000
        root = "   "
        [output]
        runtime_helper = ""
        [import]
        exclude = ["", "x"]
        "#,
    )
    .unwrap();
    assert_eq!(settings.resolve.concurrency, MAX_RESOLVE_CONCURRENCY);
    assert_eq!(settings.resolve.root, None);
    assert_eq!(settings.output.runtime_helper, crate::pass::DEFAULT_RUNTIME_HELPER);
    assert_eq!(settings.import.exclude, vec!["x"]);
}

#[test]
fn wrong_types_are_parse_errors() {
    assert!(Settings::from_toml_str("[resolve]\nconcurrency = \"many\"").is_err());
}

#[test]
fn discovers_in_parent_dir() {
    let dir = test_dir();
    let config = dir.join(CONFIG_FILENAME);
    fs::write(&config, "[url]\nenabled = false\n").unwrap();

    let sub = dir.join("styles");
    fs::create_dir_all(&sub).unwrap();
    let sheet = sub.join("main.css");
    fs::write(&sheet, "").unwrap();

    assert_eq!(find_config_file(&sheet), Some(config));
    assert!(!Settings::discover(&sheet).unwrap().url.enabled);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn load_reports_read_and_parse_errors() {
    let dir = test_dir();
    let missing = dir.join("missing.toml");
    assert!(matches!(Settings::load(&missing), Err(ConfigError::Read { .. })));

    let broken = dir.join(CONFIG_FILENAME);
    fs::write(&broken, "[resolve\n").unwrap();
    assert!(matches!(Settings::load(&broken), Err(ConfigError::Parse { .. })));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn pass_options_follow_settings() {
    let mut settings = Settings::default();
    settings.import.exclude = vec!["^https?:".to_string()];
    settings.url.exclude = vec!["\\.svg$".to_string()];
    settings.resolve.concurrency = 3;
    settings.output.url_style = UrlStyle::Relative;

    let options = settings.to_pass_options(Path::new("/project/src")).unwrap();
    assert_eq!(options.context, PathBuf::from("/project/src"));
    assert_eq!(options.concurrency, 3);
    assert!(options.url_handler.is_some());

    let filter = options.filter.unwrap();
    let import = |url| FilterInput {
        url,
        media: Some(""),
    };
    let reference = |url| FilterInput {
        url,
        media: None,
    };
    assert!(!filter(&import("http://x.org/a.css")));
    assert!(filter(&import("./a.svg")));
    assert!(!filter(&reference("./a.svg")));
    assert!(filter(&reference("http://x.org/a.css")));

    assert!(Settings::default().to_pass_options(Path::new(".")).unwrap().filter.is_none());
}

#[test]
fn invalid_patterns_are_errors() {
    let mut settings = Settings::default();
    settings.url.exclude = vec!["(".to_string()];
    assert!(matches!(settings.to_pass_options(Path::new(".")), Err(ConfigError::Pattern(_))));
}
