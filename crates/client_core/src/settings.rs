//! Client configuration: built-in defaults, then an optional TOML file, then
//! environment overrides. Command-line flags are applied by the binary.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use shared::domain::SuggestionGroup;
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::{session::SuggestionVisibility, suggestions::SuggestionCatalog};

pub const DEFAULT_CONFIG_FILE: &str = "chat.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid backend url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageText {
    pub title: String,
    pub greeting: Vec<String>,
    pub suggestions_heading: String,
    pub input_placeholder: String,
}

impl Default for PageText {
    fn default() -> Self {
        Self {
            title: "Chat with Hälsa+GPT".into(),
            greeting: vec![
                "Hi Anders,".into(),
                "Welcome to your personal AI assistant, Hälsa+GPT, which analyzes your health data in a secure GDPR- and HIPAA-compliant system.".into(),
            ],
            suggestions_heading: "Need some ideas? Try these:".into(),
            input_placeholder: "Ask me anything about your health based on your data…".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub backend_url: String,
    pub query_path: String,
    pub request_timeout_secs: u64,
    pub suggestion_visibility: SuggestionVisibility,
    pub suggestion_groups: Vec<SuggestionGroup>,
    pub page: PageText,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".into(),
            query_path: "/query/".into(),
            request_timeout_secs: 30,
            suggestion_visibility: SuggestionVisibility::default(),
            suggestion_groups: SuggestionCatalog::default().groups().to_vec(),
            page: PageText::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    backend_url: Option<String>,
    query_path: Option<String>,
    request_timeout_secs: Option<u64>,
    suggestion_visibility: Option<SuggestionVisibility>,
    suggestion_groups: Option<Vec<SuggestionGroup>>,
    page: Option<PageText>,
}

impl ChatSettings {
    /// `backend_url` followed by `query_path`, keeping any path prefix on the base.
    pub fn endpoint(&self) -> Result<Url, SettingsError> {
        let base = self.backend_url.trim().trim_end_matches('/');
        let path = self.query_path.trim().trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(|source| SettingsError::InvalidUrl {
            url: self.backend_url.clone(),
            source,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn suggestion_catalog(&self) -> SuggestionCatalog {
        SuggestionCatalog::new(self.suggestion_groups.clone())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        self.endpoint().map(|_| ())
    }

    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.backend_url {
            self.backend_url = v;
        }
        if let Some(v) = file_cfg.query_path {
            self.query_path = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file_cfg.suggestion_visibility {
            self.suggestion_visibility = v;
        }
        if let Some(v) = file_cfg.suggestion_groups {
            self.suggestion_groups = v;
        }
        if let Some(v) = file_cfg.page {
            self.page = v;
        }
    }

    /// Later keys win, so `APP__*` overrides the short form.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("CHAT_BACKEND_URL") {
            self.backend_url = v;
        }
        if let Some(v) = lookup("APP__BACKEND_URL") {
            self.backend_url = v;
        }
        if let Some(v) = lookup("APP__QUERY_PATH") {
            self.query_path = v;
        }
        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(parsed) => self.request_timeout_secs = parsed,
                Err(_) => warn!(value = %v, "ignoring non-numeric APP__REQUEST_TIMEOUT_SECS"),
            }
        }
        if let Some(v) = lookup("APP__SUGGESTION_VISIBILITY") {
            match v.parse::<SuggestionVisibility>() {
                Ok(parsed) => self.suggestion_visibility = parsed,
                Err(err) => warn!(error = %err, "ignoring APP__SUGGESTION_VISIBILITY"),
            }
        }
    }
}

/// Loads settings from `path`, or from `chat.toml` in the working directory
/// when no path is given and that file exists, then applies the environment.
pub fn load_settings(path: Option<&Path>) -> Result<ChatSettings, SettingsError> {
    load_settings_with_env(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with_env(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ChatSettings, SettingsError> {
    let mut settings = ChatSettings::default();

    let file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            default_path.exists().then_some(default_path)
        }
    };

    if let Some(file) = file {
        settings.apply_file(read_file_settings(&file)?);
    }

    settings.apply_env_overrides(lookup);
    Ok(settings)
}

fn read_file_settings(path: &Path) -> Result<FileSettings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
