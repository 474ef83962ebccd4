use super::*;

use std::{collections::HashMap, io::Write};

use tempfile::NamedTempFile;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn defaults_target_query_endpoint() {
    let settings = ChatSettings::default();
    assert_eq!(
        settings.endpoint().expect("endpoint").as_str(),
        "http://127.0.0.1:8000/query/"
    );
    assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    assert_eq!(settings.suggestion_visibility, SuggestionVisibility::Always);
    assert_eq!(settings.suggestion_catalog().len(), 6);
    settings.validate().expect("defaults are valid");
}

#[test]
fn endpoint_keeps_base_url_path_prefix() {
    for backend_url in ["http://gateway.local/halsa", "http://gateway.local/halsa/"] {
        let settings = ChatSettings {
            backend_url: backend_url.into(),
            ..ChatSettings::default()
        };
        assert_eq!(
            settings.endpoint().expect("endpoint").as_str(),
            "http://gateway.local/halsa/query/",
            "base url {backend_url}"
        );
    }
}

#[test]
fn endpoint_accepts_relative_query_path() {
    let settings = ChatSettings {
        backend_url: "http://10.0.0.5:9000/".into(),
        query_path: "query/".into(),
        ..ChatSettings::default()
    };
    assert_eq!(
        settings.endpoint().expect("endpoint").as_str(),
        "http://10.0.0.5:9000/query/"
    );
}

#[test]
fn file_values_override_defaults() {
    let file = config_file(
        r#"
backend_url = "http://10.0.0.5:9000"
request_timeout_secs = 5
suggestion_visibility = "until_first_turn"

[[suggestion_groups]]
key = "sleep"
heading = "Sleep"
questions = ["How can I improve my sleep quality?"]

[page]
title = "Health chat"
"#,
    );

    let settings = load_settings_with_env(Some(file.path()), no_env).expect("load");

    assert_eq!(
        settings.endpoint().expect("endpoint").as_str(),
        "http://10.0.0.5:9000/query/"
    );
    assert_eq!(settings.request_timeout_secs, 5);
    assert_eq!(
        settings.suggestion_visibility,
        SuggestionVisibility::UntilFirstTurn
    );
    assert_eq!(settings.suggestion_groups.len(), 1);
    assert_eq!(settings.suggestion_groups[0].key, "sleep");
    assert_eq!(settings.page.title, "Health chat");
    assert_eq!(
        settings.page.suggestions_heading,
        PageText::default().suggestions_heading
    );
}

#[test]
fn env_overrides_file_values() {
    let file = config_file("backend_url = \"http://from-file:8000\"\n");
    let env = env_from(&[
        ("CHAT_BACKEND_URL", "http://short-form:8000"),
        ("APP__BACKEND_URL", "http://from-env:8000"),
        ("APP__REQUEST_TIMEOUT_SECS", "12"),
        ("APP__SUGGESTION_VISIBILITY", "until-first-turn"),
    ]);

    let settings = load_settings_with_env(Some(file.path()), env).expect("load");

    assert_eq!(settings.backend_url, "http://from-env:8000");
    assert_eq!(settings.request_timeout_secs, 12);
    assert_eq!(
        settings.suggestion_visibility,
        SuggestionVisibility::UntilFirstTurn
    );
}

#[test]
fn unparseable_env_values_are_ignored() {
    let mut settings = ChatSettings::default();
    settings.apply_env_overrides(env_from(&[
        ("APP__REQUEST_TIMEOUT_SECS", "soon"),
        ("APP__SUGGESTION_VISIBILITY", "sometimes"),
    ]));

    assert_eq!(settings.request_timeout_secs, 30);
    assert_eq!(settings.suggestion_visibility, SuggestionVisibility::Always);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let err = load_settings_with_env(Some(Path::new("/nonexistent/chat.toml")), no_env)
        .expect_err("must fail");
    assert!(matches!(err, SettingsError::Read { .. }), "unexpected: {err}");
}

#[test]
fn unknown_keys_are_rejected() {
    let file = config_file("backend = \"http://typo:8000\"\n");
    let err = load_settings_with_env(Some(file.path()), no_env).expect_err("must fail");
    assert!(matches!(err, SettingsError::Parse { .. }), "unexpected: {err}");
}

#[test]
fn invalid_backend_url_fails_validation() {
    let settings = ChatSettings {
        backend_url: "not a url".into(),
        ..ChatSettings::default()
    };
    assert!(matches!(
        settings.validate(),
        Err(SettingsError::InvalidUrl { .. })
    ));
}

#[test]
fn zero_timeout_fails_validation() {
    let settings = ChatSettings {
        request_timeout_secs: 0,
        ..ChatSettings::default()
    };
    assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
}

#[test]
fn example_config_matches_defaults() {
    let file_cfg: FileSettings =
        toml::from_str(include_str!("../../../../chat.example.toml")).expect("parse example");
    let mut settings = ChatSettings::default();
    settings.apply_file(file_cfg);

    let defaults = ChatSettings::default();
    assert_eq!(settings.backend_url, defaults.backend_url);
    assert_eq!(settings.query_path, defaults.query_path);
    assert_eq!(settings.suggestion_groups, defaults.suggestion_groups);
    assert_eq!(settings.page, defaults.page);
}
