use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use grader_core::{FormVariant, InsertionOrder, PanelPolicy};
use grader_engine::ClientSettings;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Overrides applied on top of the preset for `form_variant`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyOverrides {
    pub insertion_order: Option<InsertionOrder>,
    /// `0` polls every job.
    pub refresh_limit: Option<usize>,
    pub surface_submit_errors: Option<bool>,
    pub terminal_statuses: Option<Vec<String>>,
}

/// Settings loaded from `config.toml`, all optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraderConfig {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub form_variant: FormVariant,
    pub log_level: String,
    pub log_to_terminal: bool,
    pub log_file: bool,
    pub clear_screen: bool,
    pub connect_timeout_secs: u64,
    /// `0` disables the per-request timeout.
    pub request_timeout_secs: u64,
    pub policy: PolicyOverrides,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5535".to_string(),
            poll_interval_ms: 3_000,
            form_variant: FormVariant::Inline,
            log_level: "info".to_string(),
            log_to_terminal: true,
            log_file: false,
            clear_screen: false,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            policy: PolicyOverrides::default(),
        }
    }
}

/// Explicit path if given, else `$XDG_CONFIG_HOME/grader/config.toml` when it exists.
pub fn resolve_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        xdg::BaseDirectories::with_prefix("grader")
            .ok()?
            .find_config_file("config.toml")
    })
}

impl GraderConfig {
    /// Reads the file at `path`, or returns defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&data).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(
        &mut self,
        server_url: Option<String>,
        poll_interval_ms: Option<u64>,
        form_variant: Option<FormVariant>,
    ) -> Result<(), ConfigError> {
        if let Some(server_url) = server_url {
            self.server_url = server_url;
        }
        if let Some(poll_interval_ms) = poll_interval_ms {
            self.poll_interval_ms = poll_interval_ms;
        }
        if let Some(form_variant) = form_variant {
            self.form_variant = form_variant;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::Invalid("server_url is empty".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than zero".into(),
            ));
        }
        if grader_logging::parse_level(&self.log_level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "unknown log_level {:?}",
                self.log_level
            )));
        }
        Ok(())
    }

    pub fn level(&self) -> LevelFilter {
        grader_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn log_destination(&self) -> Option<LogDestination> {
        LogDestination::from_flags(self.log_to_terminal, self.log_file)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn panel_policy(&self) -> PanelPolicy {
        let mut policy = PanelPolicy::for_variant(self.form_variant);
        let overrides = &self.policy;
        if let Some(order) = overrides.insertion_order {
            policy.insertion_order = order;
        }
        if let Some(limit) = overrides.refresh_limit {
            policy.refresh_limit = (limit > 0).then_some(limit);
        }
        if let Some(surface) = overrides.surface_submit_errors {
            policy.surface_submit_errors = surface;
        }
        if let Some(statuses) = &overrides.terminal_statuses {
            policy.terminal_statuses = statuses.iter().cloned().collect();
        }
        policy
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.server_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: (self.request_timeout_secs > 0)
                .then(|| Duration::from_secs(self.request_timeout_secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_the_inline_panel() {
        let cfg = GraderConfig::load(None).unwrap();
        assert_eq!(cfg.poll_interval(), Duration::from_secs(3));
        assert_eq!(cfg.panel_policy(), PanelPolicy::inline_rubric());
        assert_eq!(cfg.level(), LevelFilter::Info);
        assert_eq!(cfg.log_destination(), Some(LogDestination::Terminal));

        let settings = cfg.client_settings();
        assert_eq!(settings.base_url, "http://127.0.0.1:5535");
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn keyed_variant_with_policy_overrides() {
        let file = write_config(
            r#"
            server_url = "http://grader.test:8080"
            form_variant = "keyed"
            request_timeout_secs = 0

            [policy]
            insertion_order = "prepend"
            refresh_limit = 3
            terminal_statuses = ["done"]
            "#,
        );
        let cfg = GraderConfig::load(Some(file.path())).unwrap();
        let policy = cfg.panel_policy();

        assert_eq!(policy.insertion_order, InsertionOrder::Prepend);
        assert_eq!(policy.refresh_limit, Some(3));
        assert!(!policy.surface_submit_errors);
        assert!(policy.is_terminal("done"));
        assert!(!policy.is_terminal("failed"));
        assert_eq!(cfg.client_settings().request_timeout, None);
    }

    #[test]
    fn zero_refresh_limit_means_unbounded() {
        let file = write_config("[policy]\nrefresh_limit = 0\n");
        let cfg = GraderConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.panel_policy().refresh_limit, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config("poll_interval = 5\n");
        let err = GraderConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_interval_is_invalid() {
        let file = write_config("poll_interval_ms = 0\n");
        let err = GraderConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = GraderConfig::load(Some(Path::new("/nonexistent/grader.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn cli_overrides_win() {
        let mut cfg = GraderConfig::default();
        cfg.apply_overrides(
            Some("http://other:1".to_string()),
            Some(500),
            Some(FormVariant::Keyed),
        )
        .unwrap();
        assert_eq!(cfg.server_url, "http://other:1");
        assert_eq!(cfg.poll_interval(), Duration::from_millis(500));
        assert_eq!(cfg.panel_policy(), PanelPolicy::rubric_key());

        assert!(cfg.apply_overrides(None, Some(0), None).is_err());
    }
}
