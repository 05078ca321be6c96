//! Configuration file support for attest.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. Environment variables (prefixed with `ATTEST_`, e.g., `ATTEST_GITHUB_TOKEN`)
//! 2. Local config file (./attest.toml)
//! 3. XDG config file (~/.config/attest/config.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [github]
//! host = "https://api.github.com"  # optional, this is the default
//! token = "ghp_..."                # user token, read operations
//! installation = "ghs_..."         # App installation token, mutations
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

use attest::Credential;
use attest::checks::GITHUB_API_ROOT;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration.
    pub github: GitHubConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API root URL (e.g., "https://api.github.com" or a GitHub Enterprise
    /// "https://ghe.example.com/api/v3").
    /// Can also be set via ATTEST_GITHUB_HOST environment variable.
    pub host: Option<String>,
    /// User access token, sufficient for read operations.
    /// Can also be set via ATTEST_GITHUB_TOKEN environment variable.
    pub token: Option<String>,
    /// App installation token, required for creating and updating check runs.
    /// Can also be set via ATTEST_GITHUB_INSTALLATION environment variable.
    pub installation: Option<String>,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. XDG config file (~/.config/attest/config.toml)
    /// 2. Local config file (./attest.toml)
    /// 3. Environment variables with ATTEST_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "attest") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("attest.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./attest.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("ATTEST")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// API root, falling back to api.github.com.
    pub fn api_root(&self) -> String {
        self.github
            .host
            .clone()
            .unwrap_or_else(|| GITHUB_API_ROOT.to_string())
    }

    /// Credential for read operations: the user token if present, otherwise
    /// the installation token.
    pub fn read_credential(&self) -> Option<Credential> {
        if let Some(ref token) = self.github.token {
            return Some(Credential::token(token));
        }
        self.github
            .installation
            .as_ref()
            .map(Credential::installation)
    }

    /// Credential for mutating operations. Only the installation token
    /// qualifies; check runs cannot be created or updated with a user token.
    pub fn write_credential(&self) -> Option<Credential> {
        self.github
            .installation
            .as_ref()
            .map(Credential::installation)
    }

    /// Get the default config file path.
    #[allow(dead_code)]
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "attest").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.host.is_none());
        assert!(config.github.token.is_none());
        assert!(config.github.installation.is_none());
        assert_eq!(config.api_root(), GITHUB_API_ROOT);
    }

    #[test]
    fn test_config_builder_with_toml_string() {
        let toml_content = r#"
            [github]
            host = "https://ghe.example.com/api/v3"
            token = "ghp_test123"
            installation = "ghs_test456"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(
            config.github.host,
            Some("https://ghe.example.com/api/v3".to_string())
        );
        assert_eq!(config.github.token, Some("ghp_test123".to_string()));
        assert_eq!(config.github.installation, Some("ghs_test456".to_string()));
        assert_eq!(config.api_root(), "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_read_credential_prefers_user_token() {
        let toml_content = r#"
            [github]
            token = "ghp_user"
            installation = "ghs_install"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();
        let config: Config = settings.try_deserialize().unwrap();

        let cred = config.read_credential().expect("credential should exist");
        assert!(!cred.is_installation());
    }

    #[test]
    fn test_read_credential_falls_back_to_installation() {
        let toml_content = r#"
            [github]
            installation = "ghs_install"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();
        let config: Config = settings.try_deserialize().unwrap();

        let cred = config.read_credential().expect("credential should exist");
        assert!(cred.is_installation());
    }

    #[test]
    fn test_write_credential_requires_installation_token() {
        let toml_content = r#"
            [github]
            token = "ghp_user"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();
        let config: Config = settings.try_deserialize().unwrap();

        assert!(config.read_credential().is_some());
        assert!(
            config.write_credential().is_none(),
            "a user token must not qualify for mutations"
        );
    }

    #[test]
    fn test_config_merging_order() {
        let base_toml = r#"
            [github]
            token = "ghp_base"
            installation = "ghs_base"
        "#;

        let override_toml = r#"
            [github]
            token = "ghp_override"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(base_toml, FileFormat::Toml))
            .add_source(config::File::from_str(override_toml, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(config.github.token, Some("ghp_override".to_string()));
        assert_eq!(config.github.installation, Some("ghs_base".to_string()));
    }

    #[test]
    fn test_config_invalid_toml() {
        let invalid_toml = r#"
            [github
            token = "x"
        "#;

        let result = ConfigBuilder::builder()
            .add_source(config::File::from_str(invalid_toml, FileFormat::Toml))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_config_unknown_fields_ignored() {
        let toml_content = r#"
            [github]
            token = "ghp_test"
            unknown_field = "should be ignored"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();
        assert_eq!(config.github.token, Some("ghp_test".to_string()));
    }
}
