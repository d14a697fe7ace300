//! Multi-channel filter cascade
//!
//! Up to [`MAX_STAGES`] identical sections per channel, all channels sharing
//! one coefficient set. Coefficients glide towards their target with a one-pole
//! smoother every sample; modulation inputs are read once per
//! [`CONTROL_INTERVAL`] samples and only trigger a redesign when they change.
//!
//! Nothing in the processing path allocates or logs.

use sfzr_core::{FILTER_CUTOFF_RANGE, FILTER_GAIN_RANGE, FILTER_RESONANCE_RANGE};

use super::{BiquadCoeffs, BiquadState, FilterType, resonance_to_q};
use crate::simd::scalar;
use crate::smoothing::OnePole;

/// Channels a cascade can process
pub const MAX_CHANNELS: usize = 2;

/// Sections of the steepest filter type
pub const MAX_STAGES: usize = 3;

/// Samples between reads of the modulation spans
pub const CONTROL_INTERVAL: usize = 16;

/// Coefficient smoothing time constant
pub const SMOOTHING_TIME_MS: f64 = 1.0;

/// Upper cutoff limit relative to the sample rate
const MAX_CUTOFF_RATIO: f64 = 0.49;

/// Control values after range clamping
#[derive(Debug, Clone, Copy, PartialEq)]
struct Controls {
    cutoff: f32,
    resonance: f32,
    gain: f32,
}

impl Controls {
    fn sanitized(cutoff: f32, resonance: f32, gain: f32) -> Self {
        Self {
            cutoff: FILTER_CUTOFF_RANGE.clamp(cutoff),
            resonance: FILTER_RESONANCE_RANGE.clamp(resonance),
            gain: FILTER_GAIN_RANGE.clamp(gain),
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            cutoff: FILTER_CUTOFF_RANGE.default,
            resonance: FILTER_RESONANCE_RANGE.default,
            gain: FILTER_GAIN_RANGE.default,
        }
    }
}

/// Cascade of identical biquad sections
#[derive(Debug, Clone)]
pub struct FilterCascade {
    filter_type: FilterType,
    channels: usize,
    /// Zero until `init`
    sample_rate: f64,
    smoother: OnePole,
    current: BiquadCoeffs,
    target: BiquadCoeffs,
    controls: Controls,
    states: [[BiquadState; MAX_STAGES]; MAX_CHANNELS],
}

impl FilterCascade {
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            filter_type,
            channels: 1,
            sample_rate: 0.0,
            smoother: OnePole::default(),
            current: BiquadCoeffs::bypass(),
            target: BiquadCoeffs::bypass(),
            controls: Controls::default(),
            states: [[BiquadState::default(); MAX_STAGES]; MAX_CHANNELS],
        }
    }

    #[inline]
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Change the filter type; clears the delay lines when it differs
    pub fn set_type(&mut self, filter_type: FilterType) {
        if filter_type == self.filter_type {
            return;
        }
        self.filter_type = filter_type;
        self.clear();
        self.target = self.design(self.controls);
        self.current = self.target;
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.channels
    }

    pub fn set_channels(&mut self, channels: usize) {
        debug_assert!(channels <= MAX_CHANNELS, "at most {MAX_CHANNELS} channels");
        self.channels = channels.min(MAX_CHANNELS);
    }

    /// Set the sample rate and clear the delay lines
    pub fn init(&mut self, sample_rate: f64) {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
            self.smoother = OnePole::new(SMOOTHING_TIME_MS, sample_rate);
        } else {
            log::warn!("Ignoring invalid filter sample rate {sample_rate}");
            self.sample_rate = 0.0;
        }
        self.target = self.design(self.controls);
        self.current = self.target;
        self.clear();
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.sample_rate > 0.0
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Reset every delay line to silence
    pub fn clear(&mut self) {
        for channel in &mut self.states {
            for state in channel.iter_mut() {
                state.reset();
            }
        }
    }

    /// Jump to the given controls without smoothing
    pub fn prepare(&mut self, cutoff: f32, resonance: f32, gain: f32) {
        self.controls = Controls::sanitized(cutoff, resonance, gain);
        self.target = self.design(self.controls);
        self.current = self.target;
    }

    /// Current smoothed coefficients
    #[inline]
    pub fn coeffs(&self) -> &BiquadCoeffs {
        &self.current
    }

    fn design(&self, controls: Controls) -> BiquadCoeffs {
        if !self.is_initialized() {
            return BiquadCoeffs::bypass();
        }
        let cutoff = (controls.cutoff as f64).min(MAX_CUTOFF_RATIO * self.sample_rate);
        let q = resonance_to_q(controls.resonance as f64);
        let coeffs = self
            .filter_type
            .design(cutoff, q, controls.gain as f64, self.sample_rate);

        if coeffs.is_finite() {
            coeffs
        } else {
            BiquadCoeffs::bypass()
        }
    }

    fn update_controls(&mut self, controls: Controls) {
        if controls != self.controls {
            self.controls = controls;
            self.target = self.design(controls);
        }
    }

    /// Process with the controls of the last `prepare`
    pub fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], frames: usize) {
        let controls = self.controls;
        self.run(inputs, outputs, frames, |_| controls);
    }

    /// Process with per-sample cutoff (Hz), resonance (dB) and gain (dB) spans
    pub fn process_modulated(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        cutoff: &[f32],
        resonance: &[f32],
        gain: &[f32],
        frames: usize,
    ) {
        debug_assert!(cutoff.len() >= frames, "cutoff span shorter than block");
        debug_assert!(resonance.len() >= frames, "resonance span shorter than block");
        debug_assert!(gain.len() >= frames, "gain span shorter than block");
        let frames = frames.min(cutoff.len()).min(resonance.len()).min(gain.len());

        self.run(inputs, outputs, frames, |i| {
            Controls::sanitized(cutoff[i], resonance[i], gain[i])
        });
    }

    fn run<F>(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: usize,
        controls_at: F,
    ) where
        F: Fn(usize) -> Controls,
    {
        debug_assert!(inputs.len() >= self.channels, "missing input channels");
        debug_assert!(outputs.len() >= self.channels, "missing output channels");
        let channels = self.channels.min(inputs.len()).min(outputs.len());

        let mut frames = frames;
        for c in 0..channels {
            frames = frames.min(inputs[c].len()).min(outputs[c].len());
        }

        let stages = self.filter_type.stages();
        if stages == 0 {
            for c in 0..channels {
                outputs[c][..frames].copy_from_slice(&inputs[c][..frames]);
            }
            return;
        }

        let mut start = 0;
        while start < frames {
            let end = (start + CONTROL_INTERVAL).min(frames);
            self.update_controls(controls_at(start));

            for i in start..end {
                self.current.smooth_towards(&self.target, &self.smoother);
                let coeffs = self.current;
                for c in 0..channels {
                    let mut sample = inputs[c][i] as f64;
                    for state in &mut self.states[c][..stages] {
                        sample = state.process(&coeffs, sample);
                    }
                    outputs[c][i] = sample as f32;
                }
            }

            for c in 0..channels {
                let states = &mut self.states[c][..stages];
                if !states.iter().all(BiquadState::is_finite) {
                    states.iter_mut().for_each(BiquadState::reset);
                }
                scalar::flush_non_finite(&mut outputs[c][start..end]);
            }

            start = end;
        }
    }
}

impl Default for FilterCascade {
    fn default() -> Self {
        Self::new(FilterType::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_stereo(
        cascade: &mut FilterCascade,
        left: &[f32],
        right: &[f32],
    ) -> (Vec<f32>, Vec<f32>) {
        let mut out_l = vec![0.0; left.len()];
        let mut out_r = vec![0.0; right.len()];
        {
            let mut outputs = [out_l.as_mut_slice(), out_r.as_mut_slice()];
            cascade.process(&[left, right], &mut outputs, left.len());
        }
        (out_l, out_r)
    }

    fn lowpass() -> FilterCascade {
        let mut cascade = FilterCascade::new(FilterType::Lpf2p);
        cascade.set_channels(2);
        cascade.init(44_100.0);
        cascade.prepare(1_000.0, 0.0, 0.0);
        cascade
    }

    #[test]
    fn test_none_copies() {
        let mut cascade = FilterCascade::new(FilterType::None);
        cascade.set_channels(2);
        cascade.init(48_000.0);
        let input: Vec<f32> = (0..40).map(|i| (i as f32 * 0.3).sin()).collect();
        let (l, r) = run_stereo(&mut cascade, &input, &input);
        assert_eq!(l, input);
        assert_eq!(r, input);
    }

    #[test]
    fn test_uninitialized_is_bypass() {
        let mut cascade = FilterCascade::new(FilterType::Lpf4p);
        cascade.set_channels(2);
        cascade.prepare(100.0, 0.0, 0.0);
        let input = [0.5f32, -0.25, 1.0, 0.0];
        let (l, _) = run_stereo(&mut cascade, &input, &input);
        assert_eq!(l, input);
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut cascade = lowpass();
        let input = vec![1.0f32; 4096];
        let (l, r) = run_stereo(&mut cascade, &input, &input);
        assert!((l[4095] - 1.0).abs() < 1e-3);
        assert_eq!(l, r);
    }

    #[test]
    fn test_nan_input_is_flushed() {
        let mut cascade = lowpass();
        let mut input = vec![0.5f32; 64];
        input[10] = f32::NAN;
        let (l, r) = run_stereo(&mut cascade, &input, &input);
        assert!(l.iter().chain(&r).all(|x| x.is_finite()));

        // State recovered after the poisoned interval
        let (l, _) = run_stereo(&mut cascade, &[0.5; 64], &[0.5; 64]);
        assert!(l.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_clear_removes_ringing() {
        let mut cascade = lowpass();
        let mut impulse = vec![0.0f32; 32];
        impulse[0] = 1.0;
        run_stereo(&mut cascade, &impulse, &impulse);

        cascade.clear();
        let silence = vec![0.0f32; 32];
        let (l, r) = run_stereo(&mut cascade, &silence, &silence);
        assert!(l.iter().chain(&r).all(|&x| x == 0.0));
    }

    #[test]
    fn test_modulation_changes_target() {
        let mut cascade = lowpass();
        let before = *cascade.coeffs();

        let frames = 256;
        let input = vec![0.0f32; frames];
        let cutoff = vec![5_000.0f32; frames];
        let resonance = vec![0.0f32; frames];
        let gain = vec![0.0f32; frames];
        let mut out_l = vec![0.0; frames];
        let mut out_r = vec![0.0; frames];
        let mut outputs = [out_l.as_mut_slice(), out_r.as_mut_slice()];
        cascade.process_modulated(
            &[&input, &input],
            &mut outputs,
            &cutoff,
            &resonance,
            &gain,
            frames,
        );

        let expected = BiquadCoeffs::lowpass(5_000.0, 1.0, 44_100.0);
        assert_ne!(before, *cascade.coeffs());
        // 256 samples is ~5.8 time constants at 44.1 kHz
        assert!((cascade.coeffs().b0 - expected.b0).abs() < 0.01);
    }

    #[test]
    fn test_cutoff_limited_below_nyquist() {
        let mut cascade = FilterCascade::new(FilterType::Lpf2p);
        cascade.init(22_050.0);
        cascade.prepare(20_000.0, 0.0, 0.0);
        let expected = BiquadCoeffs::lowpass(0.49 * 22_050.0, 1.0, 22_050.0);
        assert_eq!(*cascade.coeffs(), expected);
    }

    #[test]
    fn test_set_type_resets() {
        let mut cascade = lowpass();
        run_stereo(&mut cascade, &[1.0; 16], &[1.0; 16]);
        cascade.set_type(FilterType::Hpf2p);
        assert_eq!(cascade.filter_type(), FilterType::Hpf2p);
        assert_eq!(*cascade.coeffs(), BiquadCoeffs::highpass(1_000.0, 1.0, 44_100.0));
    }

    #[test]
    fn test_invalid_sample_rate() {
        let mut cascade = FilterCascade::new(FilterType::Lpf2p);
        cascade.init(f64::NAN);
        assert!(!cascade.is_initialized());
        assert_eq!(*cascade.coeffs(), BiquadCoeffs::bypass());
    }
}
