//! sfzr-dsp: Numeric core of the sfzr sample player
//!
//! Real-time safe building blocks: no allocation, locking or logging on the
//! processing path.
//!
//! ## Modules
//! - `simd` - Scalar and wide-register kernels, capability tags, dispatch tables
//! - `buffer` - Interleaved and per-channel sample buffers
//! - `smoothing` - One-pole parameter smoothing
//! - `filters` - Biquad design and the multi-channel filter cascade
//! - `effects` - Effect trait, filter effect and effect factory

pub mod buffer;
pub mod effects;
pub mod filters;
pub mod simd;
pub mod smoothing;

pub use buffer::{
    AudioBuffer, ChannelSpan, ChannelSpanMut, JointBuffer, SplitBuffer, Strided, StridedMut,
};
pub use effects::{Effect, EffectFactory, Filter, FilterDescription, Nothing};
pub use filters::{FilterCascade, FilterType};
pub use simd::{Kernel, KernelTable, Scalar, SimdLevel, Vector, detect_simd_level};
