//! Host settings
//!
//! Loaded from a JSON file; every field is optional and falls back to its
//! default. Command-line flags are applied on top by the binary.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game_loop::StopPolicy;

/// Error loading or validating settings
#[derive(Debug)]
pub enum SettingsError {
    /// The settings file could not be read
    Io(std::io::Error),
    /// The file is not valid settings JSON
    Parse(serde_json::Error),
    /// A value is outside its usable range
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "cannot read settings: {err}"),
            SettingsError::Parse(err) => write!(f, "malformed settings: {err}"),
            SettingsError::Invalid { field, reason } => {
                write!(f, "invalid setting `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
            SettingsError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
    /// Target display frames per second
    pub frame_rate: u32,
    /// Stop the frame loop when a session ends instead of idling on the
    /// game-over screen
    pub stop_on_game_over: bool,
    /// Terminals that never report key releases: a key counts as released
    /// after this long without a press or repeat
    pub key_hold_ms: u64,
    /// Frames simulated by the headless demo
    pub demo_frames: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            frame_rate: 60,
            stop_on_game_over: false,
            key_hold_ms: 150,
            demo_frames: 3600,
        }
    }
}

impl Settings {
    /// Read and validate a settings file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Like [`Settings::load`], but any problem is logged and defaults are used
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|err| {
                log::warn!("{err}; using default settings");
                Self::default()
            }),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.frame_rate == 0 {
            return Err(SettingsError::Invalid {
                field: "frame_rate",
                reason: "must be at least 1",
            });
        }
        if self.demo_frames == 0 {
            return Err(SettingsError::Invalid {
                field: "demo_frames",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Milliseconds per display frame
    pub fn frame_ms(&self) -> f64 {
        1000.0 / self.frame_rate as f64
    }

    pub fn stop_policy(&self) -> StopPolicy {
        if self.stop_on_game_over {
            StopPolicy::StopOnGameOver
        } else {
            StopPolicy::KeepRendering
        }
    }
}
