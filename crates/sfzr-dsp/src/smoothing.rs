//! One-pole parameter smoothing
//!
//! Exponential approach towards a target, used to glide filter coefficients
//! between control updates without zipper noise.

/// Exponential smoothing coefficient for a time constant of `samples`
///
/// The smoothed value reaches ~63% of a step after `samples` samples.
#[inline]
pub fn calculate_coeff(samples: f64) -> f64 {
    if samples <= 0.0 || !samples.is_finite() {
        1.0
    } else {
        1.0 - (-1.0 / samples).exp()
    }
}

/// One-pole smoother with a fixed time constant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePole {
    coeff: f64,
}

impl OnePole {
    pub fn new(time_ms: f64, sample_rate: f64) -> Self {
        Self {
            coeff: calculate_coeff((time_ms / 1000.0) * sample_rate),
        }
    }

    /// One smoothing step of `current` towards `target`
    #[inline(always)]
    pub fn next(&self, current: f64, target: f64) -> f64 {
        current + self.coeff * (target - current)
    }
}

impl Default for OnePole {
    fn default() -> Self {
        Self::new(1.0, 48_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_coeff_matches_pole() {
        // 1 ms at 48 kHz: pole at exp(-1000 / fs)
        let smoother = OnePole::new(1.0, 48_000.0);
        assert_relative_eq!(
            smoother.next(0.0, 1.0),
            1.0 - (-1000.0f64 / 48_000.0).exp(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_zero_time_is_instant() {
        let smoother = OnePole::new(0.0, 44_100.0);
        assert_eq!(smoother.next(0.0, 1.0), 1.0);
        assert_eq!(smoother.next(0.0, 5.0), 5.0);
    }

    #[test]
    fn test_converges() {
        let smoother = OnePole::new(1.0, 44_100.0);
        let mut value = 0.0;
        // ~10 time constants
        for _ in 0..441 {
            value = smoother.next(value, 1.0);
        }
        assert!((value - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_higher_rate_smooths_slower() {
        let slow = OnePole::new(1.0, 96_000.0);
        let fast = OnePole::new(1.0, 44_100.0);
        assert!(slow.next(0.0, 1.0) < fast.next(0.0, 1.0));
    }
}
