//! Bus and voice effects
//!
//! Effects are configured off the audio thread (`set_sample_rate`,
//! `set_samples_per_block`, `clear`) and then driven block by block through
//! `process`, which never allocates.

mod filter;

pub use filter::{Filter, FilterDescription};

use sfzr_core::{Opcode, ProcessConfig, SfzrError, SfzrResult};
use std::collections::HashMap;

/// Block-based stereo effect
pub trait Effect: Send {
    fn set_sample_rate(&mut self, sample_rate: f64);

    /// Reserve scratch space for blocks of up to `samples_per_block` frames
    fn set_samples_per_block(&mut self, samples_per_block: usize);

    /// Reset internal state to silence
    fn clear(&mut self);

    /// Process `frames` frames of every input channel into the matching output
    fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], frames: usize);

    /// Validate `config` and apply it
    fn prepare_to_play(&mut self, config: &ProcessConfig) -> SfzrResult<()> {
        config.validate()?;
        self.set_sample_rate(config.sample_rate);
        self.set_samples_per_block(config.samples_per_block);
        Ok(())
    }
}

/// Pass-through effect
#[derive(Debug, Clone, Copy, Default)]
pub struct Nothing;

impl Nothing {
    pub fn make_instance(_opcodes: &[Opcode]) -> Box<dyn Effect> {
        Box::new(Nothing)
    }
}

impl Effect for Nothing {
    fn set_sample_rate(&mut self, _sample_rate: f64) {}

    fn set_samples_per_block(&mut self, _samples_per_block: usize) {}

    fn clear(&mut self) {}

    fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], frames: usize) {
        for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
            let frames = frames.min(input.len()).min(output.len());
            output[..frames].copy_from_slice(&input[..frames]);
        }
    }
}

/// Builds an effect from the opcodes of its block
pub type EffectMaker = fn(&[Opcode]) -> Box<dyn Effect>;

/// Registry of effect constructors keyed by effect type name
#[derive(Debug, Clone)]
pub struct EffectFactory {
    makers: HashMap<String, EffectMaker>,
}

impl EffectFactory {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            makers: HashMap::new(),
        }
    }

    /// Registry with the built-in effects
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register("filter", Filter::make_instance);
        factory
    }

    /// Add or replace the constructor for `name`
    pub fn register(&mut self, name: impl Into<String>, maker: EffectMaker) {
        self.makers.insert(name.into(), maker);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.makers.contains_key(name)
    }

    /// Build the effect registered under `name`
    pub fn make_named(&self, name: &str, opcodes: &[Opcode]) -> SfzrResult<Box<dyn Effect>> {
        let maker = self
            .makers
            .get(name.trim())
            .ok_or_else(|| SfzrError::UnknownEffect(name.to_string()))?;
        Ok(maker(opcodes))
    }

    /// Build the effect named by the `type` opcode, or a pass-through when it
    /// is missing or unknown
    pub fn make_effect(&self, opcodes: &[Opcode]) -> Box<dyn Effect> {
        let Some(type_opcode) = opcodes.iter().find(|o| o.letters_only == "type") else {
            log::warn!("Effect without a type, using pass-through");
            return Box::new(Nothing);
        };

        match self.make_named(&type_opcode.value, opcodes) {
            Ok(effect) => effect,
            Err(err) => {
                log::warn!("{err}, using pass-through");
                Box::new(Nothing)
            }
        }
    }
}

impl Default for EffectFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}
