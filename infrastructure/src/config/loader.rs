//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use chorus_application::EngineConfig;
use chorus_domain::ConfigIssue;
use chorus_domain::config::{Severity, has_errors};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const PROJECT_FILES: [&str; 2] = ["chorus.toml", ".chorus.toml"];

/// Prefix of environment overrides; `__` separates nested keys,
/// e.g. `CHORUS_AUTO_RUN__MESSAGE_CEILING=40`.
pub const ENV_PREFIX: &str = "CHORUS_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {}", join_messages(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn join_messages(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Build the merged configuration source.
    ///
    /// Priority (highest to lowest):
    /// 1. `CHORUS_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./chorus.toml` or `./.chorus.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/chorus/config.toml`
    /// 5. Default values
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Using global config {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            debug!("Using project config {}", path.display());
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from all sources with proper priority
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        Ok(Self::figment(config_path)
            .extract()
            .map_err(Box::new)?)
    }

    /// Load and convert into an [`EngineConfig`].
    ///
    /// Warnings are logged and the defaults they fell back to are kept;
    /// errors reject the configuration.
    pub fn load_engine_config(
        config_path: Option<&Path>,
    ) -> Result<(EngineConfig, FileConfig), ConfigError> {
        let file_config = Self::load(config_path)?;
        let (engine, issues) = file_config.to_engine_config();

        if has_errors(&issues) {
            return Err(ConfigError::Invalid(
                issues
                    .into_iter()
                    .filter(|i| i.severity == Severity::Error)
                    .collect(),
            ));
        }
        for issue in &issues {
            warn!("{}", issue.message);
        }
        Ok((engine, file_config))
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("chorus").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().ends_with("chorus/config.toml"));
    }

    #[test]
    fn test_explicit_path_overrides_defaults() {
        let file = write_config(
            r#"
[auto_run]
message_ceiling = 12
"#,
        );
        let config = ConfigLoader::load(Some(file.path())).unwrap();
        assert_eq!(config.auto_run.message_ceiling, 12);
        assert_eq!(config.auto_run.default_speed, 5);
    }

    #[test]
    fn test_invalid_file_is_a_load_error() {
        let file = write_config("[auto_run]\nmessage_ceiling = \"lots\"\n");
        let result = ConfigLoader::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_engine_config_rejects_errors() {
        let file = write_config("[auto_run]\nmessage_ceiling = 0\n");
        let result = ConfigLoader::load_engine_config(Some(file.path()));
        match result {
            Err(ConfigError::Invalid(issues)) => {
                assert_eq!(issues.len(), 1);
                assert!(issues[0].message.contains("message_ceiling"));
            }
            other => panic!("expected invalid config, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_project_file_and_env_precedence() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "chorus.toml",
                r#"
[auto_run]
message_ceiling = 30
default_speed = 9
"#,
            )?;
            jail.set_env("CHORUS_AUTO_RUN__MESSAGE_CEILING", "45");

            let config =
                ConfigLoader::load(None).map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(config.auto_run.message_ceiling, 45);
            assert_eq!(config.auto_run.default_speed, 9);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_beats_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(".chorus.toml", "[reasoning]\ntimeout_ms = 300\n")?;
            jail.create_file("override.toml", "[reasoning]\ntimeout_ms = 900\n")?;

            let config = ConfigLoader::load(Some(Path::new("override.toml")))
                .map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(config.reasoning.timeout_ms, 900);
            Ok(())
        });
    }
}
