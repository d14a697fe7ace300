//! sfzr-core: Shared types for the sfzr sample-playback core
//!
//! This crate provides the foundational types used by the DSP crate:
//! sample element types, opcodes, parameter ranges and processing configuration.

mod error;
mod opcode;
mod params;
mod sample;

pub use error::*;
pub use opcode::*;
pub use params::*;
pub use sample::*;

use serde::{Deserialize, Serialize};

/// Largest block a host may request through [`ProcessConfig`]
pub const MAX_BLOCK_SIZE: usize = 8192;

/// Highest sample rate accepted by [`ProcessConfig::validate`]
pub const MAX_SAMPLE_RATE: f64 = 768_000.0;

/// Processing configuration pushed to effects off the audio thread
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessConfig {
    pub sample_rate: f64,
    pub samples_per_block: usize,
}

impl ProcessConfig {
    pub fn new(sample_rate: f64, samples_per_block: usize) -> Self {
        Self {
            sample_rate,
            samples_per_block,
        }
    }

    /// Check the configuration is usable by the processing path
    pub fn validate(&self) -> SfzrResult<()> {
        if !(self.sample_rate > 0.0 && self.sample_rate <= MAX_SAMPLE_RATE) {
            return Err(SfzrError::InvalidSampleRate(self.sample_rate));
        }
        if self.samples_per_block == 0 || self.samples_per_block > MAX_BLOCK_SIZE {
            return Err(SfzrError::InvalidBlockSize(self.samples_per_block));
        }
        Ok(())
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self::new(48_000.0, 512)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ProcessConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(matches!(
            ProcessConfig::new(0.0, 512).validate(),
            Err(SfzrError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            ProcessConfig::new(f64::NAN, 512).validate(),
            Err(SfzrError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            ProcessConfig::new(44_100.0, 0).validate(),
            Err(SfzrError::InvalidBlockSize(0))
        ));
        assert!(matches!(
            ProcessConfig::new(44_100.0, MAX_BLOCK_SIZE + 1).validate(),
            Err(SfzrError::InvalidBlockSize(_))
        ));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ProcessConfig::new(44_100.0, 256);
        let json = serde_json::to_string(&config).unwrap();
        let back: ProcessConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
