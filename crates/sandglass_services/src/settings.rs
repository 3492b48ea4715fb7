//! Settings management
//!
//! Settings come from a JSON file. Every section and field is optional and
//! falls back to its default, so a file only needs the values it changes.

use sandglass_core::{ConfigError, Phase, PhysicsConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Environment variable naming a settings file.
pub const SETTINGS_ENV: &str = "SANDGLASS_SETTINGS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid physics tuning: {0}")]
    Physics(#[from] ConfigError),

    #[error("countdown duration must be a positive number of seconds, got {0}")]
    Duration(f64),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub countdown: CountdownSettings,
    pub physics: PhysicsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Sandglass".to_string(),
            width: 480,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownSettings {
    pub duration_secs: f64,
    pub phase: Phase,
    /// Start running as soon as the window opens.
    pub autostart: bool,
    /// Fixed seed for reproducible grain layouts.
    pub seed: Option<u64>,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            duration_secs: 60.0,
            phase: Phase::Work,
            autostart: true,
            seed: None,
        }
    }
}

impl CountdownSettings {
    /// Zero when the configured seconds are not a valid duration.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs).unwrap_or(Duration::ZERO)
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        check_duration(self.countdown.duration_secs)?;
        self.physics.validate()?;
        Ok(())
    }

    /// Resolve settings from the command line and environment.
    ///
    /// A `.json` argument wins over `env_path`; a bare number overrides the
    /// countdown duration in seconds. Other arguments are ignored.
    pub fn from_args<I, S>(args: I, env_path: Option<String>) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut file = env_path.filter(|p| !p.is_empty()).map(PathBuf::from);
        let mut duration = None;

        for arg in args {
            let arg = arg.as_ref();
            if arg.ends_with(".json") {
                file = Some(PathBuf::from(arg));
            } else if let Ok(secs) = arg.parse::<f64>() {
                duration = Some(secs);
            }
        }

        let mut settings = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(secs) = duration {
            check_duration(secs)?;
            settings.countdown.duration_secs = secs;
        }
        Ok(settings)
    }
}

fn check_duration(secs: f64) -> Result<(), SettingsError> {
    if secs.is_finite() && secs > 0.0 && secs <= Duration::MAX.as_secs_f64() {
        Ok(())
    } else {
        Err(SettingsError::Duration(secs))
    }
}
