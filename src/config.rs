// Settings read from the environment. Everything has a default so the CLI
// works out of the box against the public service.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://fotw.xyz";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the verification service, without a trailing slash.
    pub api_url: String,
    /// Default directory for `verification.adif`.
    pub output_dir: PathBuf,
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_url: DEFAULT_API_URL.into(),
            output_dir: PathBuf::from("."),
            log_level: DEFAULT_LOG_LEVEL.into(),
        }
    }
}

impl Settings {
    /// Build settings from `FOTW_API_URL`, `FOTW_OUTPUT_DIR` and `FOTW_LOG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Settings::default();
        Settings {
            api_url: lookup("FOTW_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_url),
            output_dir: lookup("FOTW_OUTPUT_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            log_level: lookup("FOTW_LOG").unwrap_or(defaults.log_level),
        }
    }

    pub fn verify_url(&self) -> String {
        format!("{}/verify", self.api_url)
    }

    pub fn check_url(&self) -> String {
        format!("{}/check", self.api_url)
    }
}
