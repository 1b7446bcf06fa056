//! TOML configuration for the chart engine.
//!
//! Every field is optional; a missing file means built-in defaults. The
//! path is taken from an explicit argument, else the `MANDALA_CONFIG`
//! environment variable.
//!
//! ```toml
//! utc_offset_minutes = 480
//! classification = "simplified"
//!
//! [design]
//! strategy = "root-find"
//! solar_arc_deg = 88.0
//!
//! [range]
//! min_year = 1800
//! max_year = 2050
//! ```

pub mod error;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use mandala_base::ClassificationRule;
use mandala_search::{ChartConfig, DesignConfig, DesignStrategy};
use mandala_time::{FixedOffset, MAX_OFFSET_MINUTES, SupportedRange, offset_from_minutes};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use error::ConfigError;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "MANDALA_CONFIG";

/// Design-epoch section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignSection {
    #[serde(default)]
    pub strategy: DesignStrategy,
    #[serde(default = "default_solar_arc")]
    pub solar_arc_deg: f64,
    #[serde(default = "default_fixed_offset_days")]
    pub fixed_offset_days: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance_deg: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_bracket_days")]
    pub bracket_days: f64,
}

fn default_solar_arc() -> f64 {
    DesignConfig::default().solar_arc_deg
}

fn default_fixed_offset_days() -> f64 {
    DesignConfig::default().fixed_offset_days
}

fn default_tolerance() -> f64 {
    DesignConfig::default().tolerance_deg
}

fn default_max_iterations() -> u32 {
    DesignConfig::default().max_iterations
}

fn default_bracket_days() -> f64 {
    DesignConfig::default().bracket_days
}

impl Default for DesignSection {
    fn default() -> Self {
        DesignConfig::default().into()
    }
}

impl From<DesignConfig> for DesignSection {
    fn from(c: DesignConfig) -> Self {
        Self {
            strategy: c.strategy,
            solar_arc_deg: c.solar_arc_deg,
            fixed_offset_days: c.fixed_offset_days,
            tolerance_deg: c.tolerance_deg,
            max_iterations: c.max_iterations,
            bracket_days: c.bracket_days,
        }
    }
}

impl From<DesignSection> for DesignConfig {
    fn from(s: DesignSection) -> Self {
        Self {
            strategy: s.strategy,
            solar_arc_deg: s.solar_arc_deg,
            fixed_offset_days: s.fixed_offset_days,
            tolerance_deg: s.tolerance_deg,
            max_iterations: s.max_iterations,
            bracket_days: s.bracket_days,
        }
    }
}

/// Accepted birth years, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeSection {
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    #[serde(default = "default_max_year")]
    pub max_year: i32,
}

fn default_min_year() -> i32 {
    SupportedRange::default().min_year
}

fn default_max_year() -> i32 {
    SupportedRange::default().max_year
}

impl Default for RangeSection {
    fn default() -> Self {
        Self {
            min_year: default_min_year(),
            max_year: default_max_year(),
        }
    }
}

/// Contents of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Wall-clock offset east of UTC used when a request gives none.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub classification: ClassificationRule,
    #[serde(default)]
    pub design: DesignSection,
    #[serde(default)]
    pub range: RangeSection,
}

/// UTC+8, the offset births were historically entered in.
fn default_utc_offset_minutes() -> i32 {
    480
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset_minutes(),
            classification: ClassificationRule::default(),
            design: DesignSection::default(),
            range: RangeSection::default(),
        }
    }
}

impl ConfigFile {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ConfigFile = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::Invalid("utc_offset_minutes must be within ±1080"));
        }
        self.chart_config().validate().map_err(ConfigError::Invalid)
    }

    /// The runtime chart configuration.
    pub fn chart_config(&self) -> ChartConfig {
        ChartConfig {
            design: self.design.into(),
            classification: self.classification,
            range: SupportedRange::new(self.range.min_year, self.range.max_year),
        }
    }

    /// Default wall-clock offset.
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        offset_from_minutes(self.utc_offset_minutes)
            .map_err(|_| ConfigError::Invalid("utc_offset_minutes must be within ±1080"))
    }

    /// Pretty TOML, suitable as a starting config file.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Pick the config path: `explicit`, else the value of `MANDALA_CONFIG`.
pub fn resolve_config_path(explicit: Option<&Path>, env_value: Option<OsString>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
}

/// Load the effective configuration.
///
/// A named file that cannot be read is an error; no file at all means
/// defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    match resolve_config_path(explicit, std::env::var_os(CONFIG_ENV)) {
        Some(path) => ConfigFile::load(&path),
        None => {
            debug!("no config file given, using defaults");
            Ok(ConfigFile::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let c = ConfigFile::from_toml_str("").unwrap();
        assert_eq!(c, ConfigFile::default());
        assert_eq!(c.utc_offset_minutes, 480);
        assert_eq!(c.chart_config(), ChartConfig::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let c = ConfigFile::from_toml_str(
            r#"
classification = "full"

[design]
strategy = "fixed-offset"
fixed_offset_days = 87.5

[range]
max_year = 2040
"#,
        )
        .unwrap();
        let chart = c.chart_config();
        assert_eq!(chart.classification, ClassificationRule::Full);
        assert_eq!(chart.design.strategy, DesignStrategy::FixedOffset);
        assert_eq!(chart.design.fixed_offset_days, 87.5);
        assert_eq!(chart.design.solar_arc_deg, 88.0);
        assert_eq!(chart.range, SupportedRange::new(1800, 2040));
    }

    #[test]
    fn rejects_out_of_bounds_values() {
        for text in [
            "utc_offset_minutes = 2000",
            "[design]\ntolerance_deg = 0.0",
            "[design]\ntolerance_deg = 0.001",
            "[design]\nmax_iterations = 0",
            "[range]\nmin_year = 2000\nmax_year = 1999",
        ] {
            let err = ConfigFile::from_toml_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{text}: {err}");
        }
    }

    #[test]
    fn rejects_unknown_keys_and_values() {
        assert!(matches!(
            ConfigFile::from_toml_str("colour = \"blue\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ConfigFile::from_toml_str("[design]\nstrategy = \"guess\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn explicit_path_wins_over_env() {
        let explicit = Path::new("/tmp/a.toml");
        assert_eq!(
            resolve_config_path(Some(explicit), Some("/tmp/b.toml".into())),
            Some(PathBuf::from("/tmp/a.toml"))
        );
        assert_eq!(
            resolve_config_path(None, Some("/tmp/b.toml".into())),
            Some(PathBuf::from("/tmp/b.toml"))
        );
        assert_eq!(resolve_config_path(None, Some(OsString::new())), None);
        assert_eq!(resolve_config_path(None, None), None);
    }

    #[test]
    fn missing_named_file_is_io_error() {
        let err = ConfigFile::load(Path::new("/nonexistent/mandala.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_from_disk() {
        let path = std::env::temp_dir().join(format!("mandala-config-{}.toml", std::process::id()));
        fs::write(&path, "utc_offset_minutes = -300\n").unwrap();
        let c = ConfigFile::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(c.utc_offset().unwrap().local_minus_utc(), -300 * 60);
    }

    #[test]
    fn default_file_round_trips() {
        let text = ConfigFile::default().to_toml_string().unwrap();
        assert!(text.contains("strategy = \"root-find\""));
        assert_eq!(ConfigFile::from_toml_str(&text).unwrap(), ConfigFile::default());
    }
}
