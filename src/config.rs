//! Operator configuration for the raceday tool.

use crate::Result;
use crate::index::PaceBands;
use camino::Utf8Path;
use ohno::{IntoAppError, bail};
use serde::Deserialize;
use std::fs;
use std::io;

/// Default configuration file name, looked for in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "raceday.toml";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Dataset root holding the `<year>/<month>/<day>` tree.
    #[serde(default)]
    pub data_root: Option<String>,

    /// Where the persisted index files live. Defaults to `cache` under the
    /// dataset root.
    #[serde(default)]
    pub cache_dir: Option<String>,

    /// RPCI thresholds for pace classification.
    #[serde(default)]
    pub pace: PaceBands,
}

impl Config {
    /// Load configuration from an explicit file, or from `raceday.toml` in
    /// the working directory when present.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing, if the file
    /// cannot be parsed, or if the pace thresholds are inconsistent.
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let text = if let Some(path) = config_path {
            fs::read_to_string(path).into_app_err_with(|| format!("reading raceday configuration from {path}"))?
        } else {
            match fs::read_to_string(DEFAULT_CONFIG_FILE) {
                Ok(text) => text,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => {
                    return Err(e).into_app_err_with(|| format!("reading raceday configuration from {DEFAULT_CONFIG_FILE}"));
                }
            }
        };

        let source = config_path.map_or(DEFAULT_CONFIG_FILE, Utf8Path::as_str);
        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing TOML configuration from {source}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject threshold pairs that leave no room for an average pace.
    fn validate(&self) -> Result<()> {
        if self.pace.stamina_max_rpci <= 0.0 {
            bail!("pace.stamina_max_rpci ({}) must be positive", self.pace.stamina_max_rpci);
        }

        if self.pace.sprint_min_rpci <= self.pace.stamina_max_rpci {
            bail!(
                "pace.sprint_min_rpci ({}) must be greater than pace.stamina_max_rpci ({})",
                self.pace.sprint_min_rpci,
                self.pace.stamina_max_rpci
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("raceday.toml")).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_full_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            data_root = "/srv/keibabook/data"
            cache_dir = "/srv/keibabook/cache"

            [pace]
            sprint_min_rpci = 52.0
            stamina_max_rpci = 47.5
            "#,
        );

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.data_root.as_deref(), Some("/srv/keibabook/data"));
        assert_eq!(config.cache_dir.as_deref(), Some("/srv/keibabook/cache"));
        assert_eq!(config.pace.sprint_min_rpci, 52.0);
        assert_eq!(config.pace.stamina_max_rpci, 47.5);
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, r#"data_root = "/srv/keibabook/data""#);

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.cache_dir, None);
        assert_eq!(config.pace, PaceBands::default());
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("missing.toml")).unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, r#"dataroot = "/typo""#);

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_inverted_pace_bands_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [pace]
            sprint_min_rpci = 45.0
            stamina_max_rpci = 50.0
            "#,
        );

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "file I/O not supported under miri")]
    fn test_non_positive_band_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [pace]
            sprint_min_rpci = 51.0
            stamina_max_rpci = -1.0
            "#,
        );

        assert!(Config::load(Some(&path)).is_err());
    }
}
