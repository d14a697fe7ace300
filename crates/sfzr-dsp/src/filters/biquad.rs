//! Biquad sections using Transposed Direct Form II
//!
//! Coefficients follow the RBJ Audio EQ Cookbook, normalized so `a0 = 1`.
//! First-order designs use the bilinear transform and leave `b2 = a2 = 0`.

use std::f64::consts::PI;

use crate::smoothing::OnePole;

/// Biquad coefficients
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

/// `(sin, cos, alpha)` for a cookbook design
#[inline]
fn prewarp(freq: f64, q: f64, sample_rate: f64) -> (f64, f64, f64) {
    let omega = 2.0 * PI * freq / sample_rate;
    let sin_omega = omega.sin();
    let cos_omega = omega.cos();
    (sin_omega, cos_omega, sin_omega / (2.0 * q))
}

impl BiquadCoeffs {
    #[inline]
    fn normalized(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Calculate lowpass filter coefficients
    pub fn lowpass(freq: f64, q: f64, sample_rate: f64) -> Self {
        let (_, cos_omega, alpha) = prewarp(freq, q, sample_rate);

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        Self::normalized(b0, b1, b0, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
    }

    /// Calculate highpass filter coefficients
    pub fn highpass(freq: f64, q: f64, sample_rate: f64) -> Self {
        let (_, cos_omega, alpha) = prewarp(freq, q, sample_rate);

        let b0 = (1.0 + cos_omega) / 2.0;
        let b1 = -(1.0 + cos_omega);
        Self::normalized(b0, b1, b0, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
    }

    /// Calculate bandpass filter coefficients (constant 0 dB peak gain)
    pub fn bandpass(freq: f64, q: f64, sample_rate: f64) -> Self {
        let (_, cos_omega, alpha) = prewarp(freq, q, sample_rate);
        Self::normalized(alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
    }

    /// Calculate notch (band reject) filter coefficients
    pub fn notch(freq: f64, q: f64, sample_rate: f64) -> Self {
        let (_, cos_omega, alpha) = prewarp(freq, q, sample_rate);
        Self::normalized(
            1.0,
            -2.0 * cos_omega,
            1.0,
            1.0 + alpha,
            -2.0 * cos_omega,
            1.0 - alpha,
        )
    }

    /// Calculate peaking EQ filter coefficients
    /// gain_db: gain in decibels
    pub fn peaking(freq: f64, q: f64, gain_db: f64, sample_rate: f64) -> Self {
        let a = 10.0_f64.powf(gain_db / 40.0);
        let (_, cos_omega, alpha) = prewarp(freq, q, sample_rate);

        Self::normalized(
            1.0 + alpha * a,
            -2.0 * cos_omega,
            1.0 - alpha * a,
            1.0 + alpha / a,
            -2.0 * cos_omega,
            1.0 - alpha / a,
        )
    }

    /// Calculate low shelf filter coefficients
    pub fn low_shelf(freq: f64, q: f64, gain_db: f64, sample_rate: f64) -> Self {
        let a = 10.0_f64.powf(gain_db / 40.0);
        let (_, cos_omega, alpha) = prewarp(freq, q, sample_rate);
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        Self::normalized(
            a * ((a + 1.0) - (a - 1.0) * cos_omega + two_sqrt_a_alpha),
            2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega),
            a * ((a + 1.0) - (a - 1.0) * cos_omega - two_sqrt_a_alpha),
            (a + 1.0) + (a - 1.0) * cos_omega + two_sqrt_a_alpha,
            -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega),
            (a + 1.0) + (a - 1.0) * cos_omega - two_sqrt_a_alpha,
        )
    }

    /// Calculate high shelf filter coefficients
    pub fn high_shelf(freq: f64, q: f64, gain_db: f64, sample_rate: f64) -> Self {
        let a = 10.0_f64.powf(gain_db / 40.0);
        let (_, cos_omega, alpha) = prewarp(freq, q, sample_rate);
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        Self::normalized(
            a * ((a + 1.0) + (a - 1.0) * cos_omega + two_sqrt_a_alpha),
            -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega),
            a * ((a + 1.0) + (a - 1.0) * cos_omega - two_sqrt_a_alpha),
            (a + 1.0) - (a - 1.0) * cos_omega + two_sqrt_a_alpha,
            2.0 * ((a - 1.0) - (a + 1.0) * cos_omega),
            (a + 1.0) - (a - 1.0) * cos_omega - two_sqrt_a_alpha,
        )
    }

    /// First-order lowpass
    pub fn lowpass_1p(freq: f64, sample_rate: f64) -> Self {
        let k = (PI * freq / sample_rate).tan();
        Self::normalized(k, k, 0.0, k + 1.0, k - 1.0, 0.0)
    }

    /// First-order highpass
    pub fn highpass_1p(freq: f64, sample_rate: f64) -> Self {
        let k = (PI * freq / sample_rate).tan();
        Self::normalized(1.0, -1.0, 0.0, k + 1.0, k - 1.0, 0.0)
    }

    /// First-order allpass, 90 degrees of phase shift at `freq`
    pub fn allpass_1p(freq: f64, sample_rate: f64) -> Self {
        let k = (PI * freq / sample_rate).tan();
        Self::normalized(k - 1.0, k + 1.0, 0.0, k + 1.0, k - 1.0, 0.0)
    }

    /// Bypass (unity gain, no filtering)
    pub fn bypass() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// Move every coefficient one smoothing step towards `target`
    #[inline(always)]
    pub fn smooth_towards(&mut self, target: &Self, smoother: &OnePole) {
        self.b0 = smoother.next(self.b0, target.b0);
        self.b1 = smoother.next(self.b1, target.b1);
        self.b2 = smoother.next(self.b2, target.b2);
        self.a1 = smoother.next(self.a1, target.a1);
        self.a2 = smoother.next(self.a2, target.a2);
    }

    pub fn is_finite(&self) -> bool {
        self.b0.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
    }
}

/// Delay-line state of one TDF-II section
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadState {
    z1: f64,
    z2: f64,
}

impl BiquadState {
    #[inline(always)]
    pub fn process(&mut self, coeffs: &BiquadCoeffs, input: f64) -> f64 {
        let output = coeffs.b0 * input + self.z1;
        self.z1 = coeffs.b1 * input - coeffs.a1 * output + self.z2;
        self.z2 = coeffs.b2 * input - coeffs.a2 * output;
        output
    }

    #[inline]
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.z1.is_finite() && self.z2.is_finite()
    }
}
