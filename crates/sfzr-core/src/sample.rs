//! Sample element types and their SIMD lane mapping

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Rem, Sub, SubAssign};

use wide::{f32x8, f64x4};

/// Numeric element a kernel can run on.
///
/// Every element type names the wide vector the vectorized kernels use
/// (`f32x8` for `f32`, `f64x4` for `f64`).
pub trait Element:
    Copy
    + Default
    + PartialOrd
    + Debug
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Rem<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
{
    /// Wide register type
    type Wide: Copy + Add<Output = Self::Wide> + Mul<Output = Self::Wide>;

    /// Elements per wide register
    const LANES: usize;
    const ZERO: Self;
    const ONE: Self;

    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
    fn from_i32(value: i32) -> Self;
    fn floor_to_i32(self) -> i32;
    fn is_finite(self) -> bool;

    fn exp(self) -> Self;
    fn ln(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;

    fn splat(value: Self) -> Self::Wide;
    /// Load `LANES` elements from the front of `src`
    fn load(src: &[Self]) -> Self::Wide;
    /// Store `LANES` elements to the front of `dst`
    fn store(value: Self::Wide, dst: &mut [Self]);

    fn wide_exp(value: Self::Wide) -> Self::Wide;
    fn wide_ln(value: Self::Wide) -> Self::Wide;
    fn wide_sin(value: Self::Wide) -> Self::Wide;
    fn wide_cos(value: Self::Wide) -> Self::Wide;
}

impl Element for f32 {
    type Wide = f32x8;

    const LANES: usize = 8;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[inline(always)]
    fn from_i32(value: i32) -> Self {
        value as f32
    }
    #[inline(always)]
    fn floor_to_i32(self) -> i32 {
        f32::floor(self) as i32
    }
    #[inline(always)]
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }

    #[inline(always)]
    fn exp(self) -> Self {
        f32::exp(self)
    }
    #[inline(always)]
    fn ln(self) -> Self {
        f32::ln(self)
    }
    #[inline(always)]
    fn sin(self) -> Self {
        f32::sin(self)
    }
    #[inline(always)]
    fn cos(self) -> Self {
        f32::cos(self)
    }

    #[inline(always)]
    fn splat(value: Self) -> f32x8 {
        f32x8::splat(value)
    }
    #[inline(always)]
    fn load(src: &[Self]) -> f32x8 {
        let mut lanes = [0.0f32; 8];
        lanes.copy_from_slice(&src[..8]);
        f32x8::new(lanes)
    }
    #[inline(always)]
    fn store(value: f32x8, dst: &mut [Self]) {
        dst[..8].copy_from_slice(&value.to_array());
    }
    #[inline(always)]
    fn wide_exp(value: f32x8) -> f32x8 {
        value.exp()
    }
    #[inline(always)]
    fn wide_ln(value: f32x8) -> f32x8 {
        value.ln()
    }
    #[inline(always)]
    fn wide_sin(value: f32x8) -> f32x8 {
        value.sin()
    }
    #[inline(always)]
    fn wide_cos(value: f32x8) -> f32x8 {
        value.cos()
    }
}

impl Element for f64 {
    type Wide = f64x4;

    const LANES: usize = 4;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value
    }
    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }
    #[inline(always)]
    fn from_i32(value: i32) -> Self {
        value as f64
    }
    #[inline(always)]
    fn floor_to_i32(self) -> i32 {
        f64::floor(self) as i32
    }
    #[inline(always)]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }

    #[inline(always)]
    fn exp(self) -> Self {
        f64::exp(self)
    }
    #[inline(always)]
    fn ln(self) -> Self {
        f64::ln(self)
    }
    #[inline(always)]
    fn sin(self) -> Self {
        f64::sin(self)
    }
    #[inline(always)]
    fn cos(self) -> Self {
        f64::cos(self)
    }

    #[inline(always)]
    fn splat(value: Self) -> f64x4 {
        f64x4::splat(value)
    }
    #[inline(always)]
    fn load(src: &[Self]) -> f64x4 {
        let mut lanes = [0.0f64; 4];
        lanes.copy_from_slice(&src[..4]);
        f64x4::new(lanes)
    }
    #[inline(always)]
    fn store(value: f64x4, dst: &mut [Self]) {
        dst[..4].copy_from_slice(&value.to_array());
    }
    #[inline(always)]
    fn wide_exp(value: f64x4) -> f64x4 {
        value.exp()
    }
    #[inline(always)]
    fn wide_ln(value: f64x4) -> f64x4 {
        value.ln()
    }
    #[inline(always)]
    fn wide_sin(value: f64x4) -> f64x4 {
        value.sin()
    }
    #[inline(always)]
    fn wide_cos(value: f64x4) -> f64x4 {
        value.cos()
    }
}
