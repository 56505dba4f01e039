//! Viewer configuration
//!
//! Every tuning constant of the synchronization and segment-building layers
//! lives here so tests and hosts can override them. Values load from a TOML
//! file when one is provided, otherwise serde defaults apply.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning constants for ingestion and playback synchronization.
///
/// Defaults reproduce the behavior observed in production sessions; none of
/// them is load-bearing beyond absorbing clock-tick granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Synthesized end time for rows that carry only a start (seconds)
    pub default_gap_secs: f64,

    /// Adjacency tolerance when merging same-label intervals (seconds)
    pub merge_epsilon_secs: f64,

    /// Quick preview: reseek when the clock drifts this far before the
    /// current segment start (seconds)
    pub seek_epsilon_secs: f64,

    /// Quick preview: advance to the next segment this close to the end
    /// of the current one (seconds)
    pub end_epsilon_secs: f64,

    /// Playback-rate multiplier while quick preview is active
    pub preview_rate: f64,

    /// Gaze track sample rate (frames per second)
    pub gaze_fps: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_gap_secs: 5.0,
            merge_epsilon_secs: 0.001,
            seek_epsilon_secs: 0.05,
            end_epsilon_secs: 0.02,
            preview_rate: 6.0,
            gaze_fps: 25.0,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a TOML file.
    ///
    /// Missing keys fall back to defaults; a malformed file is a hard
    /// configuration error rather than a silent fallback.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: ViewerConfig = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration with priority: explicit path, then the
    /// `GAZEVIEW_CONFIG` environment variable, then compiled defaults.
    pub fn resolve(cli_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_path {
            return Self::load(path);
        }
        if let Ok(env_path) = std::env::var("GAZEVIEW_CONFIG") {
            return Self::load(Path::new(&env_path));
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if self.default_gap_secs <= 0.0 {
            return Err(Error::Config("default_gap_secs must be > 0".to_string()));
        }
        if self.preview_rate <= 0.0 {
            return Err(Error::Config("preview_rate must be > 0".to_string()));
        }
        if self.gaze_fps <= 0.0 {
            return Err(Error::Config("gaze_fps must be > 0".to_string()));
        }
        Ok(())
    }
}
