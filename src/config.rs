//! Demo configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file (behind the `config`
//! feature), then command-line overrides applied by the binary.

use crate::error::{RentalError, Result};
use crate::rental::DEFAULT_STEP_DELAY_MS;
use crate::render::ui::ColorTheme;
use std::time::Duration;

#[cfg(feature = "config")]
use std::path::{Path, PathBuf};

/// Delay before the returned screen drops back to home.
pub const DEFAULT_RETURNED_RESET_MS: u64 = 2_000;

/// Named color themes selectable from the command line or config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum ThemeName {
    #[default]
    Default,
    Monochrome,
    HighContrast,
}

impl ThemeName {
    pub fn theme(self) -> ColorTheme {
        match self {
            ThemeName::Default => ColorTheme::default(),
            ThemeName::Monochrome => ColorTheme::monochrome(),
            ThemeName::HighContrast => ColorTheme::high_contrast(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default, deny_unknown_fields))]
pub struct DemoConfig {
    /// Delay applied to each simulated hardware phase
    pub step_delay_ms: u64,
    /// Start with forced failures enabled
    pub force_fail: bool,
    /// How long the returned screen stays up before resetting
    pub returned_reset_ms: u64,
    pub theme: ThemeName,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            force_fail: false,
            returned_reset_ms: DEFAULT_RETURNED_RESET_MS,
            theme: ThemeName::Default,
        }
    }
}

impl DemoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.step_delay_ms == 0 {
            return Err(RentalError::config("step_delay_ms must be positive"));
        }
        if self.returned_reset_ms == 0 {
            return Err(RentalError::config("returned_reset_ms must be positive"));
        }
        Ok(())
    }

    pub fn returned_reset_delay(&self) -> Duration {
        Duration::from_millis(self.returned_reset_ms)
    }

    /// Load and validate a TOML config file. Missing keys keep their defaults.
    #[cfg(feature = "config")]
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| RentalError::Io {
            message: format!("Failed to read config {}", path.display()),
            source: err,
        })?;
        let config: DemoConfig = toml::from_str(&contents)
            .map_err(|err| RentalError::config(format!("{}: {}", path.display(), err)))?;
        config.validate()?;
        Ok(config)
    }

    /// `<config_dir>/stroller-rental/config.toml`, if the platform has a config dir.
    #[cfg(feature = "config")]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stroller-rental").join("config.toml"))
    }

    /// Load the default config file when it exists, otherwise use defaults.
    #[cfg(feature = "config")]
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[test]
    fn defaults_are_valid() {
        let config = DemoConfig::default();
        assert_ok!(config.validate());
        assert_eq!(config.step_delay_ms, 10_000);
        assert_eq!(config.returned_reset_delay(), Duration::from_secs(2));
    }

    #[test]
    fn zero_delays_are_rejected() {
        let config = DemoConfig {
            step_delay_ms: 0,
            ..DemoConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RentalError::ConfigError { .. })
        ));

        let config = DemoConfig {
            returned_reset_ms: 0,
            ..DemoConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn theme_names_map_to_themes() {
        assert_eq!(
            ThemeName::Monochrome.theme().status_bg,
            ColorTheme::monochrome().status_bg
        );
        assert_eq!(
            ThemeName::Default.theme().status_bg,
            ColorTheme::default().status_bg
        );
    }

    #[cfg(feature = "config")]
    mod file {
        use super::super::*;
        use std::io::Write;

        #[test]
        fn partial_file_keeps_defaults() {
            let mut file = tempfile::NamedTempFile::new().expect("create temp file");
            writeln!(file, "step_delay_ms = 500\ntheme = \"high-contrast\"").unwrap();

            let config = DemoConfig::load_from_file(file.path()).unwrap();
            assert_eq!(config.step_delay_ms, 500);
            assert_eq!(config.theme, ThemeName::HighContrast);
            assert!(!config.force_fail);
            assert_eq!(config.returned_reset_ms, DEFAULT_RETURNED_RESET_MS);
        }

        #[test]
        fn invalid_values_are_rejected() {
            let mut file = tempfile::NamedTempFile::new().expect("create temp file");
            writeln!(file, "step_delay_ms = 0").unwrap();
            assert!(matches!(
                DemoConfig::load_from_file(file.path()),
                Err(RentalError::ConfigError { .. })
            ));
        }

        #[test]
        fn unknown_keys_are_rejected() {
            let mut file = tempfile::NamedTempFile::new().expect("create temp file");
            writeln!(file, "delay = 10").unwrap();
            assert!(DemoConfig::load_from_file(file.path()).is_err());
        }

        #[test]
        fn missing_file_is_io_error() {
            let result = DemoConfig::load_from_file(Path::new("/nonexistent/stroller.toml"));
            assert!(matches!(result, Err(RentalError::Io { .. })));
        }
    }
}
