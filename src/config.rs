use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::core::{MotionThresholds, ThresholdError};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub motion: MotionSettings,
    #[serde(default)]
    pub deck: DeckSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MotionSettings {
    #[serde(default = "default_commit_ratio")]
    pub commit_ratio: f64,
    #[serde(default = "default_exit_travel_ratio")]
    pub exit_travel_ratio: f64,
    #[serde(default = "default_max_vertical_drag")]
    pub max_vertical_drag: f64,
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
    #[serde(default = "default_max_rotation_degrees")]
    pub max_rotation_degrees: f64,
    #[serde(default = "default_indicator_gain")]
    pub indicator_gain: f64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            commit_ratio: default_commit_ratio(),
            exit_travel_ratio: default_exit_travel_ratio(),
            max_vertical_drag: default_max_vertical_drag(),
            min_scale: default_min_scale(),
            max_rotation_degrees: default_max_rotation_degrees(),
            indicator_gain: default_indicator_gain(),
        }
    }
}

fn default_commit_ratio() -> f64 { 0.25 }
fn default_exit_travel_ratio() -> f64 { 1.5 }
fn default_max_vertical_drag() -> f64 { 100.0 }
fn default_min_scale() -> f64 { 0.75 }
fn default_max_rotation_degrees() -> f64 { 10.0 }
fn default_indicator_gain() -> f64 { 4.0 }

impl MotionSettings {
    /// Convert into thresholds, rejecting values the transforms cannot use
    pub fn thresholds(&self) -> Result<MotionThresholds, ThresholdError> {
        let thresholds = MotionThresholds {
            commit_ratio: self.commit_ratio,
            exit_travel_ratio: self.exit_travel_ratio,
            max_vertical_drag: self.max_vertical_drag,
            min_scale: self.min_scale,
            max_rotation_degrees: self.max_rotation_degrees,
            indicator_gain: self.indicator_gain,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeckSettings {
    /// Viewport width used until the rendering surface reports a real one
    #[serde(default = "default_reference_width")]
    pub reference_width: f64,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            reference_width: default_reference_width(),
        }
    }
}

fn default_reference_width() -> f64 { 390.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SWIPE__, sections split by __)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SWIPE__MOTION__COMMIT_RATIO -> motion.commit_ratio
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("SWIPE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_motion_matches_thresholds() {
        let thresholds = MotionSettings::default().thresholds().unwrap();
        assert_eq!(thresholds, MotionThresholds::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "pretty");
    }

    #[test]
    fn test_invalid_motion_rejected() {
        let motion = MotionSettings {
            min_scale: 0.0,
            ..Default::default()
        };
        assert!(motion.thresholds().is_err());
    }

    #[test]
    fn test_load_from_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[motion]\ncommit_ratio = 0.3\n\n[deck]\nreference_width = 320.0").unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.motion.commit_ratio, 0.3);
        assert_eq!(settings.motion.exit_travel_ratio, 1.5);
        assert_eq!(settings.deck.reference_width, 320.0);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_env_uses_double_underscore_prefix() {
        let vars = config::Map::from([
            ("SWIPE__MOTION__COMMIT_RATIO".to_string(), "0.4".to_string()),
            ("SWIPE__DECK__REFERENCE_WIDTH".to_string(), "512".to_string()),
            ("SWIPE_LOGGING__LEVEL".to_string(), "debug".to_string()),
        ]);

        let settings: Settings = Config::builder()
            .add_source(env_source().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.motion.commit_ratio, 0.4);
        assert_eq!(settings.deck.reference_width, 512.0);
        // a single underscore after the prefix is not picked up
        assert_eq!(settings.logging.level, "info");
    }
}
