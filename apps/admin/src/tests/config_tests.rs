use super::{load_settings, load_settings_from, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(None, env_from(&[])).expect("settings");
    assert_eq!(settings, Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
        api_base_url = "https://admin.example.com"
        api_token = "from-file"
        page_size = 25
        request_timeout_secs = 5
    "#;
    let settings = load_settings_from(Some(raw), env_from(&[])).expect("settings");
    assert_eq!(settings.api_base_url, "https://admin.example.com");
    assert_eq!(settings.api_token.as_deref(), Some("from-file"));
    assert_eq!(settings.page_size, 25);
    assert_eq!(settings.request_timeout().as_secs(), 5);
}

#[test]
fn env_overrides_file_and_prefixed_url_wins() {
    let raw = r#"api_base_url = "https://file.example.com""#;
    let settings = load_settings_from(
        Some(raw),
        env_from(&[
            ("ADMIN_API_URL", "https://legacy.example.com"),
            ("APP__API_BASE_URL", "https://env.example.com"),
            ("APP__API_TOKEN", "from-env"),
            ("APP__PAGE_SIZE", "50"),
        ]),
    )
    .expect("settings");
    assert_eq!(settings.api_base_url, "https://env.example.com");
    assert_eq!(settings.api_token.as_deref(), Some("from-env"));
    assert_eq!(settings.page_size, 50);
}

#[test]
fn invalid_numbers_and_zero_values_are_ignored() {
    let settings = load_settings_from(
        Some("page_size = 0"),
        env_from(&[
            ("APP__PAGE_SIZE", "0"),
            ("APP__REQUEST_TIMEOUT_SECS", "soon"),
        ]),
    )
    .expect("settings");
    assert_eq!(settings.page_size, 10);
    assert_eq!(settings.request_timeout_secs, 30);

    let settings = load_settings_from(None, env_from(&[("APP__PAGE_SIZE", "many")]))
        .expect("settings");
    assert_eq!(settings.page_size, 10);

    let settings = load_settings_from(
        Some("request_timeout_secs = 0"),
        env_from(&[("APP__REQUEST_TIMEOUT_SECS", "0")]),
    )
    .expect("settings");
    assert_eq!(settings.request_timeout_secs, 30);
    assert_eq!(settings.request_timeout().as_secs(), 30);
}

#[test]
fn blank_token_means_no_token() {
    let settings =
        load_settings_from(None, env_from(&[("APP__API_TOKEN", "  ")])).expect("settings");
    assert_eq!(settings.api_token, None);
}

#[test]
fn malformed_file_is_an_error() {
    assert!(load_settings_from(Some("page_size = \"ten\""), env_from(&[])).is_err());
}

#[test]
fn explicit_missing_file_is_an_error() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("admin_config_missing_{suffix}.toml"));
    assert!(load_settings(Some(&missing)).is_err());
}

#[test]
fn explicit_file_is_read() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("admin_config_{suffix}.toml"));
    fs::write(&path, "page_size = 15\n").expect("write config");

    let settings = load_settings(Some(&path)).expect("settings");
    assert_eq!(settings.page_size, 15);

    fs::remove_file(path).expect("cleanup");
}
