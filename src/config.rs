// Layered configuration: defaults, config files, environment

use crate::format::Format;
use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the `.taskroll` store.
    pub store_path: PathBuf,
    /// Where exports are written when no directory is given.
    pub export_dir: PathBuf,
    /// Format used by `export` when none is given.
    pub default_format: Format,
    /// Whether exports may write to disk at all.
    pub allow_write: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: dirs_data_path().unwrap_or_else(|| PathBuf::from(".")),
            export_dir: dirs::document_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            default_format: Format::Json,
            allow_write: true,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, the user config file, `config_path`,
    /// then `TASKROLL_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TASKROLL_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for taskroll.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("taskroll"))
}

/// Returns the platform-specific data directory for taskroll.
///
/// On Linux: `~/.local/share/taskroll`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("taskroll"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_format, Format::Json);
        assert!(config.allow_write);
    }

    // Loads run inside a Jail so they serialize with the env-mutating test
    #[test]
    fn test_load_from_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            let temp = TempDir::new().unwrap();
            jail.create_file(
                "taskroll.toml",
                &format!(
                    "store_path = \"{}\"\ndefault_format = \"yaml\"\nallow_write = false\n",
                    temp.path().display()
                ),
            )?;

            let config = Config::load_from(Some(Path::new("taskroll.toml")))?;
            assert_eq!(config.store_path, temp.path());
            assert_eq!(config.default_format, Format::Yaml);
            assert!(!config.allow_write);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(Path::new("absent.toml")))?;
            assert_eq!(config.default_format, Format::Json);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("taskroll.toml", "default_format = \"yaml\"\nallow_write = true\n")?;
            jail.set_env("TASKROLL_DEFAULT_FORMAT", "toml");
            jail.set_env("TASKROLL_ALLOW_WRITE", "false");
            jail.set_env("TASKROLL_EXPORT_DIR", "/tmp/taskroll-exports");

            let config = Config::load_from(Some(Path::new("taskroll.toml")))?;
            assert_eq!(config.default_format, Format::Toml);
            assert!(!config.allow_write);
            assert_eq!(config.export_dir, PathBuf::from("/tmp/taskroll-exports"));
            Ok(())
        });
    }
}
