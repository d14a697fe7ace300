//! Parameter ranges for instrument opcodes

use serde::{Deserialize, Serialize};

/// Inclusive value range with a default
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    /// Clamp into the range. NaN maps to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

/// Filter cutoff in Hz
pub const FILTER_CUTOFF_RANGE: ParamRange = ParamRange::new(0.0, 20_000.0, 0.0);

/// Filter resonance in dB
pub const FILTER_RESONANCE_RANGE: ParamRange = ParamRange::new(0.0, 96.0, 0.0);

/// Filter gain in dB (peaking and shelving types)
pub const FILTER_GAIN_RANGE: ParamRange = ParamRange::new(-96.0, 96.0, 0.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(FILTER_CUTOFF_RANGE.clamp(-5.0), 0.0);
        assert_eq!(FILTER_CUTOFF_RANGE.clamp(50_000.0), 20_000.0);
        assert_eq!(FILTER_CUTOFF_RANGE.clamp(1_000.0), 1_000.0);
        assert_eq!(FILTER_GAIN_RANGE.clamp(f32::NAN), 0.0);
        assert_eq!(FILTER_RESONANCE_RANGE.clamp(f32::INFINITY), 96.0);
        assert_eq!(FILTER_GAIN_RANGE.clamp(-96.0), -96.0);
        assert_eq!(FILTER_GAIN_RANGE.clamp(96.5), 96.0);
    }
}
