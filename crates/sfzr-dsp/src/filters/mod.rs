//! Filter DSP
//!
//! - `biquad` - RBJ coefficient design and TDF-II sections
//! - `cascade` - Multi-channel cascade of identical sections with coefficient
//!   smoothing and per-sample modulation

pub mod biquad;
pub mod cascade;

pub use biquad::{BiquadCoeffs, BiquadState};
pub use cascade::{CONTROL_INTERVAL, FilterCascade, MAX_CHANNELS, MAX_STAGES, SMOOTHING_TIME_MS};

use serde::{Deserialize, Serialize};
use sfzr_core::SfzrError;
use std::fmt;
use std::str::FromStr;

/// Filter types, named as in instrument files (`lpf_2p`, `hsh`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterType {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "apf_1p")]
    Apf1p,
    #[serde(rename = "lpf_1p")]
    Lpf1p,
    #[serde(rename = "hpf_1p")]
    Hpf1p,
    #[default]
    #[serde(rename = "lpf_2p")]
    Lpf2p,
    #[serde(rename = "hpf_2p")]
    Hpf2p,
    #[serde(rename = "bpf_2p")]
    Bpf2p,
    #[serde(rename = "brf_2p")]
    Brf2p,
    #[serde(rename = "lpf_4p")]
    Lpf4p,
    #[serde(rename = "hpf_4p")]
    Hpf4p,
    #[serde(rename = "bpf_4p")]
    Bpf4p,
    #[serde(rename = "lpf_6p")]
    Lpf6p,
    #[serde(rename = "hpf_6p")]
    Hpf6p,
    #[serde(rename = "bpf_6p")]
    Bpf6p,
    #[serde(rename = "peq")]
    Peq,
    #[serde(rename = "lsh")]
    Lsh,
    #[serde(rename = "hsh")]
    Hsh,
}

impl FilterType {
    pub const ALL: [FilterType; 17] = [
        FilterType::None,
        FilterType::Apf1p,
        FilterType::Lpf1p,
        FilterType::Hpf1p,
        FilterType::Lpf2p,
        FilterType::Hpf2p,
        FilterType::Bpf2p,
        FilterType::Brf2p,
        FilterType::Lpf4p,
        FilterType::Hpf4p,
        FilterType::Bpf4p,
        FilterType::Lpf6p,
        FilterType::Hpf6p,
        FilterType::Bpf6p,
        FilterType::Peq,
        FilterType::Lsh,
        FilterType::Hsh,
    ];

    /// Look up a type by its instrument-file name (surrounding whitespace ignored)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    pub const fn name(self) -> &'static str {
        match self {
            FilterType::None => "none",
            FilterType::Apf1p => "apf_1p",
            FilterType::Lpf1p => "lpf_1p",
            FilterType::Hpf1p => "hpf_1p",
            FilterType::Lpf2p => "lpf_2p",
            FilterType::Hpf2p => "hpf_2p",
            FilterType::Bpf2p => "bpf_2p",
            FilterType::Brf2p => "brf_2p",
            FilterType::Lpf4p => "lpf_4p",
            FilterType::Hpf4p => "hpf_4p",
            FilterType::Bpf4p => "bpf_4p",
            FilterType::Lpf6p => "lpf_6p",
            FilterType::Hpf6p => "hpf_6p",
            FilterType::Bpf6p => "bpf_6p",
            FilterType::Peq => "peq",
            FilterType::Lsh => "lsh",
            FilterType::Hsh => "hsh",
        }
    }

    /// Number of cascaded sections
    pub const fn stages(self) -> usize {
        match self {
            FilterType::None => 0,
            FilterType::Lpf4p | FilterType::Hpf4p | FilterType::Bpf4p => 2,
            FilterType::Lpf6p | FilterType::Hpf6p | FilterType::Bpf6p => 3,
            _ => 1,
        }
    }

    /// Coefficients of one section
    pub fn design(self, cutoff: f64, q: f64, gain_db: f64, sample_rate: f64) -> BiquadCoeffs {
        match self {
            FilterType::None => BiquadCoeffs::bypass(),
            FilterType::Apf1p => BiquadCoeffs::allpass_1p(cutoff, sample_rate),
            FilterType::Lpf1p => BiquadCoeffs::lowpass_1p(cutoff, sample_rate),
            FilterType::Hpf1p => BiquadCoeffs::highpass_1p(cutoff, sample_rate),
            FilterType::Lpf2p | FilterType::Lpf4p | FilterType::Lpf6p => {
                BiquadCoeffs::lowpass(cutoff, q, sample_rate)
            }
            FilterType::Hpf2p | FilterType::Hpf4p | FilterType::Hpf6p => {
                BiquadCoeffs::highpass(cutoff, q, sample_rate)
            }
            FilterType::Bpf2p | FilterType::Bpf4p | FilterType::Bpf6p => {
                BiquadCoeffs::bandpass(cutoff, q, sample_rate)
            }
            FilterType::Brf2p => BiquadCoeffs::notch(cutoff, q, sample_rate),
            FilterType::Peq => BiquadCoeffs::peaking(cutoff, q, gain_db, sample_rate),
            FilterType::Lsh => BiquadCoeffs::low_shelf(cutoff, q, gain_db, sample_rate),
            FilterType::Hsh => BiquadCoeffs::high_shelf(cutoff, q, gain_db, sample_rate),
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterType {
    type Err = SfzrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| SfzrError::InvalidParameter {
            name: "filter_type".into(),
            reason: format!("unknown filter type `{}`", s.trim()),
        })
    }
}

/// Resonance in dB to quality factor
#[inline]
pub fn resonance_to_q(resonance_db: f64) -> f64 {
    10.0_f64.powf(0.05 * resonance_db).max(0.001)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for t in FilterType::ALL {
            assert_eq!(FilterType::from_name(t.name()), Some(t));
            assert_eq!(t.to_string(), t.name());
        }
        assert_eq!(FilterType::from_name(" lpf_4p "), Some(FilterType::Lpf4p));
        assert_eq!(FilterType::from_name("lpf_8p"), None);
    }

    #[test]
    fn test_from_str_error() {
        assert!("hsh".parse::<FilterType>().is_ok());
        assert!(matches!(
            "comb".parse::<FilterType>(),
            Err(SfzrError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_stages() {
        assert_eq!(FilterType::None.stages(), 0);
        assert_eq!(FilterType::Lpf2p.stages(), 1);
        assert_eq!(FilterType::Bpf4p.stages(), 2);
        assert_eq!(FilterType::Hpf6p.stages(), 3);
        assert!(FilterType::ALL.iter().all(|t| t.stages() <= MAX_STAGES));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&FilterType::Lpf4p).unwrap();
        assert_eq!(json, "\"lpf_4p\"");
        let back: FilterType = serde_json::from_str("\"hsh\"").unwrap();
        assert_eq!(back, FilterType::Hsh);
    }

    #[test]
    fn test_resonance_to_q() {
        assert!((resonance_to_q(0.0) - 1.0).abs() < 1e-12);
        assert!((resonance_to_q(20.0) - 10.0).abs() < 1e-9);
        assert_eq!(resonance_to_q(-200.0), 0.001);
    }
}
