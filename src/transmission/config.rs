use crate::audio::PcmFormat;
use crate::error::ConfigError;
use crate::utils::consts::{
    DEFAULT_BIT_RATE, DEFAULT_CHANNELS, DEFAULT_LEVEL, SAMPLE_RATE, STANDARD_BIT_RATES,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Runtime settings of the audio side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmitterConfig {
    /// Used for file and pipe outputs; JACK dictates its own rate
    pub sample_rate: u32,
    pub bit_rate: u32,
    pub inverted: bool,
    /// Peak level of both output states
    pub level: f32,
    pub channels: u16,
    pub pcm_format: PcmFormat,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            bit_rate: DEFAULT_BIT_RATE,
            inverted: false,
            level: DEFAULT_LEVEL,
            channels: DEFAULT_CHANNELS,
            pcm_format: PcmFormat::default(),
        }
    }
}

impl TransmitterConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bit_rate == 0 {
            return Err(ConfigError::Invalid("bit_rate must be positive".into()));
        }
        if self.bit_rate > self.sample_rate {
            return Err(ConfigError::Invalid(format!(
                "bit_rate {} exceeds sample_rate {}",
                self.bit_rate, self.sample_rate
            )));
        }
        if self.channels == 0 {
            return Err(ConfigError::Invalid("channels must be at least 1".into()));
        }
        if !(self.level > 0.0 && self.level <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "level {} outside (0, 1]",
                self.level
            )));
        }
        if !self.is_standard_rate() {
            warn!(
                "{} baud is not a standard POCSAG rate ({:?})",
                self.bit_rate, STANDARD_BIT_RATES
            );
        }
        Ok(())
    }

    pub fn is_standard_rate(&self) -> bool {
        STANDARD_BIT_RATES.contains(&self.bit_rate)
    }
}
