//! Filter effect
//!
//! Runs one stereo [`FilterCascade`] with controls fixed by the opcodes of the
//! effect block (`filter_type`, `filter_cutoff`, `filter_resonance`,
//! `filter_gain`).

use serde::{Deserialize, Serialize};
use sfzr_core::{FILTER_CUTOFF_RANGE, FILTER_GAIN_RANGE, FILTER_RESONANCE_RANGE, Opcode, ParamRange};

use super::Effect;
use crate::buffer::{AudioBuffer, SplitBuffer};
use crate::filters::{FilterCascade, FilterType};
use crate::simd::KernelTable;

const CUTOFF_CHANNEL: usize = 0;
const RESONANCE_CHANNEL: usize = 1;
const GAIN_CHANNEL: usize = 2;

/// Static configuration of a filter effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDescription {
    pub filter_type: FilterType,
    /// Hz
    pub cutoff: f32,
    /// dB
    pub resonance: f32,
    /// dB, peaking and shelving types only
    pub gain: f32,
}

impl Default for FilterDescription {
    fn default() -> Self {
        Self {
            filter_type: FilterType::Lpf2p,
            cutoff: FILTER_CUTOFF_RANGE.default,
            resonance: FILTER_RESONANCE_RANGE.default,
            gain: FILTER_GAIN_RANGE.default,
        }
    }
}

impl FilterDescription {
    /// Collect the filter opcodes of an effect block; anything else is ignored
    pub fn from_opcodes(opcodes: &[Opcode]) -> Self {
        let mut desc = Self::default();

        for opcode in opcodes {
            match opcode.letters_only.as_str() {
                "filter_cutoff" => read_into(opcode, &mut desc.cutoff, &FILTER_CUTOFF_RANGE),
                "filter_resonance" => {
                    read_into(opcode, &mut desc.resonance, &FILTER_RESONANCE_RANGE)
                }
                "filter_type" => {
                    desc.filter_type = FilterType::from_name(&opcode.value).unwrap_or_else(|| {
                        log::warn!("Unknown filter type: {}", opcode.value);
                        FilterType::None
                    });
                }
                "filter_gain" | "sfizz:filter_gain" => {
                    read_into(opcode, &mut desc.gain, &FILTER_GAIN_RANGE)
                }
                _ => {}
            }
        }

        desc
    }
}

fn read_into(opcode: &Opcode, target: &mut f32, range: &ParamRange) {
    match opcode.read(range) {
        Ok(value) => *target = value,
        Err(err) => log::warn!("{err}"),
    }
}

/// Stereo filter effect
#[derive(Debug)]
pub struct Filter {
    desc: FilterDescription,
    cascade: FilterCascade,
    /// Cutoff, resonance and gain spans for the cascade
    scratch: SplitBuffer<f32>,
    kernels: KernelTable<f32>,
}

impl Filter {
    pub fn new(desc: FilterDescription) -> Self {
        let mut cascade = FilterCascade::new(desc.filter_type);
        cascade.set_channels(2);

        Self {
            desc,
            cascade,
            scratch: SplitBuffer::new(3, 0),
            kernels: KernelTable::detected(),
        }
    }

    /// Build a filter effect from the opcodes of an effect block
    pub fn make_instance(opcodes: &[Opcode]) -> Box<dyn Effect> {
        Box::new(Self::new(FilterDescription::from_opcodes(opcodes)))
    }

    #[inline]
    pub fn description(&self) -> &FilterDescription {
        &self.desc
    }

    fn prepare_filter(&mut self) {
        self.cascade
            .prepare(self.desc.cutoff, self.desc.resonance, self.desc.gain);
    }
}

impl Effect for Filter {
    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.cascade.init(sample_rate);
        self.prepare_filter();
    }

    fn set_samples_per_block(&mut self, samples_per_block: usize) {
        self.scratch.resize(samples_per_block);
    }

    fn clear(&mut self) {
        self.cascade.clear();
        self.prepare_filter();
    }

    fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], frames: usize) {
        debug_assert!(
            frames <= self.scratch.num_frames(),
            "block of {frames} frames exceeds the configured block size"
        );
        let frames = frames.min(self.scratch.num_frames());

        let fill = self.kernels.fill;
        fill(&mut self.scratch.channel_mut(CUTOFF_CHANNEL)[..frames], self.desc.cutoff);
        fill(&mut self.scratch.channel_mut(RESONANCE_CHANNEL)[..frames], self.desc.resonance);
        fill(&mut self.scratch.channel_mut(GAIN_CHANNEL)[..frames], self.desc.gain);

        self.cascade.process_modulated(
            inputs,
            outputs,
            &self.scratch.channel(CUTOFF_CHANNEL)[..frames],
            &self.scratch.channel(RESONANCE_CHANNEL)[..frames],
            &self.scratch.channel(GAIN_CHANNEL)[..frames],
            frames,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfzr_core::ProcessConfig;

    fn opcodes(pairs: &[(&str, &str)]) -> Vec<Opcode> {
        pairs.iter().map(|&(k, v)| Opcode::new(k, v)).collect()
    }

    #[test]
    fn test_description_defaults() {
        let desc = FilterDescription::from_opcodes(&[]);
        assert_eq!(desc, FilterDescription::default());
        assert_eq!(desc.filter_type, FilterType::Lpf2p);
        assert_eq!(desc.cutoff, 0.0);
    }

    #[test]
    fn test_description_from_opcodes() {
        let desc = FilterDescription::from_opcodes(&opcodes(&[
            ("filter_type", "hpf_4p"),
            ("filter_cutoff", "1500"),
            ("filter_resonance", "6"),
            ("sfizz:filter_gain", "-3"),
            ("volume", "-6"),
        ]));
        assert_eq!(desc.filter_type, FilterType::Hpf4p);
        assert_eq!(desc.cutoff, 1500.0);
        assert_eq!(desc.resonance, 6.0);
        assert_eq!(desc.gain, -3.0);
    }

    #[test]
    fn test_description_clamps_and_recovers() {
        let desc = FilterDescription::from_opcodes(&opcodes(&[
            ("filter_cutoff", "99999"),
            ("filter_resonance", "loud"),
            ("filter_gain", "200"),
            ("filter_type", "moog"),
        ]));
        assert_eq!(desc.cutoff, 20_000.0);
        assert_eq!(desc.resonance, 0.0);
        assert_eq!(desc.gain, 96.0);
        assert_eq!(desc.filter_type, FilterType::None);
    }

    #[test]
    fn test_description_serde() {
        let desc: FilterDescription =
            serde_json::from_str(r#"{"filter_type":"bpf_2p","cutoff":800.0}"#).unwrap();
        assert_eq!(desc.filter_type, FilterType::Bpf2p);
        assert_eq!(desc.cutoff, 800.0);
        assert_eq!(desc.resonance, 0.0);
    }

    #[test]
    fn test_filter_process_lowpass() {
        let mut filter = Filter::new(FilterDescription {
            cutoff: 500.0,
            ..Default::default()
        });
        filter.prepare_to_play(&ProcessConfig::new(48_000.0, 256)).unwrap();

        // Nyquist-rate square wave is removed by the lowpass
        let input: Vec<f32> = (0..256).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let mut out_l = vec![0.0; 256];
        let mut out_r = vec![0.0; 256];
        {
            let mut outputs = [out_l.as_mut_slice(), out_r.as_mut_slice()];
            filter.process(&[&input, &input], &mut outputs, 256);
        }
        assert!(out_l[200..].iter().all(|x| x.abs() < 1e-3));
        assert_eq!(out_l, out_r);
    }

    #[test]
    fn test_filter_none_passes_through() {
        let mut filter = Filter::new(FilterDescription {
            filter_type: FilterType::None,
            ..Default::default()
        });
        filter.prepare_to_play(&ProcessConfig::new(44_100.0, 32)).unwrap();

        let input: Vec<f32> = (0..32).map(|i| i as f32 / 32.0).collect();
        let mut out_l = vec![0.0; 32];
        let mut out_r = vec![0.0; 32];
        {
            let mut outputs = [out_l.as_mut_slice(), out_r.as_mut_slice()];
            filter.process(&[&input, &input], &mut outputs, 32);
        }
        assert_eq!(out_l, input);
    }
}
