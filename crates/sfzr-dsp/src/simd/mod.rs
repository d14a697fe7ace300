//! Kernel dispatch for sfzr DSP
//!
//! Elementwise kernels in two flavours: a scalar reference ([`Scalar`]) and a
//! wide-register version ([`Vector`]). Call sites pick one through a
//! capability tag type parameter, or resolve a [`KernelTable`] of function
//! pointers once (at construction) and call through it afterwards.
//!
//! # Design
//! - Capability is a type, so a tagged call is a direct, inlinable call
//! - Detection happens once, the result is cached
//! - Tables hold plain function pointers, no branching per call
//! - Span length mismatches assert in debug builds; release builds process
//!   the common prefix of all spans

pub mod scalar;
pub mod vector;

pub use vector::TRANSCENDENTAL_TOLERANCE;

use sfzr_core::Element;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::OnceLock;

// ============ SIMD Level Detection ============

/// Register width the `wide` backend was compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SimdLevel {
    /// No vector registers, scalar loops only
    Scalar = 0,
    /// SSE2 (128-bit)
    Sse2 = 1,
    /// AVX (256-bit)
    Avx = 2,
    /// AVX2 (256-bit, integer ops)
    Avx2 = 3,
    /// ARM NEON (128-bit)
    Neon = 4,
    /// WebAssembly SIMD (128-bit)
    Simd128 = 5,
}

impl SimdLevel {
    pub const fn name(self) -> &'static str {
        match self {
            SimdLevel::Scalar => "Scalar",
            SimdLevel::Sse2 => "SSE2",
            SimdLevel::Avx => "AVX",
            SimdLevel::Avx2 => "AVX2",
            SimdLevel::Neon => "NEON",
            SimdLevel::Simd128 => "SIMD128",
        }
    }

    pub const fn is_vectorized(self) -> bool {
        !matches!(self, SimdLevel::Scalar)
    }
}

static DETECTED_SIMD_LEVEL: OnceLock<SimdLevel> = OnceLock::new();

/// Detect the vector level available to the kernels (computed once).
///
/// `wide` selects its instructions from the compile-time target features, so
/// this reports those features rather than probing the CPU at runtime.
pub fn detect_simd_level() -> SimdLevel {
    *DETECTED_SIMD_LEVEL.get_or_init(|| {
        let level = if !cfg!(feature = "simd") {
            SimdLevel::Scalar
        } else if cfg!(target_feature = "avx2") {
            SimdLevel::Avx2
        } else if cfg!(target_feature = "avx") {
            SimdLevel::Avx
        } else if cfg!(target_feature = "sse2") {
            SimdLevel::Sse2
        } else if cfg!(target_feature = "neon") {
            SimdLevel::Neon
        } else if cfg!(target_feature = "simd128") {
            SimdLevel::Simd128
        } else {
            SimdLevel::Scalar
        };
        log::debug!("SIMD level: {}", level.name());
        level
    })
}

// ============ Capability Tags ============

/// A kernel implementation, selected at compile time by type
pub trait Kernel: Copy + Default + Debug + Send + Sync + 'static {
    /// Whether this tag runs wide-register code
    const VECTORIZED: bool;

    fn fill<T: Element>(output: &mut [T], value: T);
    fn add<T: Element>(input: &[T], output: &mut [T]);
    fn apply_gain<T: Element>(gain: T, input: &[T], output: &mut [T]);
    fn apply_gain_span<T: Element>(gain: &[T], input: &[T], output: &mut [T]);
    fn linear_ramp<T: Element>(output: &mut [T], start: T, step: T) -> T;
    fn multiplicative_ramp<T: Element>(output: &mut [T], start: T, step: T) -> T;
    fn exp<T: Element>(input: &[T], output: &mut [T]);
    fn log<T: Element>(input: &[T], output: &mut [T]);
    fn sin<T: Element>(input: &[T], output: &mut [T]);
    fn cos<T: Element>(input: &[T], output: &mut [T]);
    fn read_interleaved<T: Element>(input: &[T], left: &mut [T], right: &mut [T]);
    fn write_interleaved<T: Element>(left: &[T], right: &[T], output: &mut [T]);
    fn looping_sfz_index<T: Element>(
        jumps: &[T],
        left_coeff: &mut [T],
        right_coeff: &mut [T],
        indices: &mut [i32],
        float_index: T,
        loop_end: T,
        loop_start: T,
    ) -> T;
    fn flush_non_finite<T: Element>(buffer: &mut [T]);
}

/// Scalar reference kernels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scalar;

/// Wide-register kernels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vector;

macro_rules! impl_kernel {
    ($tag:ty, $module:ident, $vectorized:expr) => {
        impl Kernel for $tag {
            const VECTORIZED: bool = $vectorized;

            #[inline]
            fn fill<T: Element>(output: &mut [T], value: T) {
                $module::fill(output, value)
            }
            #[inline]
            fn add<T: Element>(input: &[T], output: &mut [T]) {
                $module::add(input, output)
            }
            #[inline]
            fn apply_gain<T: Element>(gain: T, input: &[T], output: &mut [T]) {
                $module::apply_gain(gain, input, output)
            }
            #[inline]
            fn apply_gain_span<T: Element>(gain: &[T], input: &[T], output: &mut [T]) {
                $module::apply_gain_span(gain, input, output)
            }
            #[inline]
            fn linear_ramp<T: Element>(output: &mut [T], start: T, step: T) -> T {
                $module::linear_ramp(output, start, step)
            }
            #[inline]
            fn multiplicative_ramp<T: Element>(output: &mut [T], start: T, step: T) -> T {
                $module::multiplicative_ramp(output, start, step)
            }
            #[inline]
            fn exp<T: Element>(input: &[T], output: &mut [T]) {
                $module::exp(input, output)
            }
            #[inline]
            fn log<T: Element>(input: &[T], output: &mut [T]) {
                $module::log(input, output)
            }
            #[inline]
            fn sin<T: Element>(input: &[T], output: &mut [T]) {
                $module::sin(input, output)
            }
            #[inline]
            fn cos<T: Element>(input: &[T], output: &mut [T]) {
                $module::cos(input, output)
            }
            #[inline]
            fn read_interleaved<T: Element>(input: &[T], left: &mut [T], right: &mut [T]) {
                $module::read_interleaved(input, left, right)
            }
            #[inline]
            fn write_interleaved<T: Element>(left: &[T], right: &[T], output: &mut [T]) {
                $module::write_interleaved(left, right, output)
            }
            #[inline]
            fn looping_sfz_index<T: Element>(
                jumps: &[T],
                left_coeff: &mut [T],
                right_coeff: &mut [T],
                indices: &mut [i32],
                float_index: T,
                loop_end: T,
                loop_start: T,
            ) -> T {
                $module::looping_sfz_index(
                    jumps,
                    left_coeff,
                    right_coeff,
                    indices,
                    float_index,
                    loop_end,
                    loop_start,
                )
            }
            #[inline]
            fn flush_non_finite<T: Element>(buffer: &mut [T]) {
                $module::flush_non_finite(buffer)
            }
        }
    };
}

impl_kernel!(Scalar, scalar, false);

#[cfg(feature = "simd")]
impl_kernel!(Vector, vector, true);

// Without the `simd` feature the vector tag keeps its call sites but runs the
// reference loops
#[cfg(not(feature = "simd"))]
impl_kernel!(Vector, scalar, false);

// ============ Dispatch Tables ============

/// Function pointer type for the looping index kernel
pub type LoopingIndexFn<T> = fn(&[T], &mut [T], &mut [T], &mut [i32], T, T, T) -> T;

/// Kernel table resolved once for a [`SimdLevel`]
#[derive(Debug, Clone, Copy)]
pub struct KernelTable<T: Element> {
    pub fill: fn(&mut [T], T),
    pub add: fn(&[T], &mut [T]),
    pub apply_gain: fn(T, &[T], &mut [T]),
    pub apply_gain_span: fn(&[T], &[T], &mut [T]),
    pub linear_ramp: fn(&mut [T], T, T) -> T,
    pub multiplicative_ramp: fn(&mut [T], T, T) -> T,
    pub exp: fn(&[T], &mut [T]),
    pub log: fn(&[T], &mut [T]),
    pub sin: fn(&[T], &mut [T]),
    pub cos: fn(&[T], &mut [T]),
    pub read_interleaved: fn(&[T], &mut [T], &mut [T]),
    pub write_interleaved: fn(&[T], &[T], &mut [T]),
    pub looping_sfz_index: LoopingIndexFn<T>,
    pub flush_non_finite: fn(&mut [T]),
    /// Level the table was resolved for
    pub level: SimdLevel,
}

impl<T: Element> KernelTable<T> {
    /// Table for an explicit capability tag
    pub fn for_kernel<K: Kernel>(level: SimdLevel) -> Self {
        Self {
            fill: K::fill::<T>,
            add: K::add::<T>,
            apply_gain: K::apply_gain::<T>,
            apply_gain_span: K::apply_gain_span::<T>,
            linear_ramp: K::linear_ramp::<T>,
            multiplicative_ramp: K::multiplicative_ramp::<T>,
            exp: K::exp::<T>,
            log: K::log::<T>,
            sin: K::sin::<T>,
            cos: K::cos::<T>,
            read_interleaved: K::read_interleaved::<T>,
            write_interleaved: K::write_interleaved::<T>,
            looping_sfz_index: K::looping_sfz_index::<T>,
            flush_non_finite: K::flush_non_finite::<T>,
            level,
        }
    }

    /// Table for a specific SIMD level
    pub fn for_level(level: SimdLevel) -> Self {
        if level.is_vectorized() {
            Self::for_kernel::<Vector>(level)
        } else {
            Self::for_kernel::<Scalar>(level)
        }
    }

    /// Table for the detected SIMD level
    pub fn detected() -> Self {
        Self::for_level(detect_simd_level())
    }
}

impl<T: Element> Default for KernelTable<T> {
    fn default() -> Self {
        Self::detected()
    }
}

// ============ Tests ============

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simd_detection() {
        let level = detect_simd_level();
        println!("Detected SIMD level: {:?} ({})", level, level.name());
        assert!(!level.name().is_empty());
        assert_eq!(level, detect_simd_level());
    }

    #[test]
    fn test_scalar_table_level() {
        let table = KernelTable::<f32>::for_level(SimdLevel::Scalar);
        assert_eq!(table.level, SimdLevel::Scalar);

        let mut buffer = vec![0.0f32; 13];
        (table.fill)(&mut buffer, 0.25);
        assert!(buffer.iter().all(|&x| x == 0.25));
    }

    #[test]
    fn test_vector_table_matches_scalar() {
        let scalar = KernelTable::<f64>::for_level(SimdLevel::Scalar);
        let vector = KernelTable::<f64>::for_kernel::<Vector>(SimdLevel::Avx);

        let mut a = vec![0.0; 19];
        let mut b = vec![0.0; 19];
        let next_a = (scalar.linear_ramp)(&mut a, 0.1, 0.3);
        let next_b = (vector.linear_ramp)(&mut b, 0.1, 0.3);
        assert_eq!(a, b);
        assert_eq!(next_a, next_b);
    }

    #[test]
    fn test_tags() {
        assert!(!Scalar::VECTORIZED);
        let mut buffer = [0.0f32; 9];
        Vector::fill(&mut buffer, 2.0);
        Vector::add(&[1.0; 9], &mut buffer);
        assert_eq!(buffer, [3.0; 9]);
    }
}
