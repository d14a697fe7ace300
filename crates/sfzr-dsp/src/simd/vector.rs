//! Wide-register kernels
//!
//! Each kernel walks the span in `T::LANES`-sized groups and hands the tail to
//! the scalar loop. Arithmetic kernels perform the same IEEE operation per lane
//! as the scalar reference, so results are bit-identical. Serial recurrences
//! (linear and multiplicative ramps, looping index) run the scalar loop directly.
//!
//! `exp`, `log`, `sin` and `cos` use polynomial approximations; their error
//! against the scalar reference stays within [`TRANSCENDENTAL_TOLERANCE`]
//! relative to `max(1, |reference|)` for `exp` on `[-10, 10]`, `log` on
//! `[1e-3, 1e3]` and `sin`/`cos` on `[-10, 10]`.

use sfzr_core::Element;

use super::scalar;

/// Documented error bound of the vector transcendental kernels
pub const TRANSCENDENTAL_TOLERANCE: f64 = 1e-4;

pub fn fill<T: Element>(output: &mut [T], value: T) {
    let wide = T::splat(value);
    let mut chunks = output.chunks_exact_mut(T::LANES);
    for chunk in &mut chunks {
        T::store(wide, chunk);
    }
    scalar::fill(chunks.into_remainder(), value);
}

pub fn add<T: Element>(input: &[T], output: &mut [T]) {
    debug_assert_eq!(input.len(), output.len(), "add: span length mismatch");
    let len = input.len().min(output.len());
    let mut in_chunks = input[..len].chunks_exact(T::LANES);
    let mut out_chunks = output[..len].chunks_exact_mut(T::LANES);
    for (out, inp) in (&mut out_chunks).zip(&mut in_chunks) {
        T::store(T::load(out) + T::load(inp), out);
    }
    scalar::add(in_chunks.remainder(), out_chunks.into_remainder());
}

pub fn apply_gain<T: Element>(gain: T, input: &[T], output: &mut [T]) {
    debug_assert_eq!(input.len(), output.len(), "apply_gain: span length mismatch");
    let len = input.len().min(output.len());
    let gain_wide = T::splat(gain);
    let mut in_chunks = input[..len].chunks_exact(T::LANES);
    let mut out_chunks = output[..len].chunks_exact_mut(T::LANES);
    for (out, inp) in (&mut out_chunks).zip(&mut in_chunks) {
        T::store(T::load(inp) * gain_wide, out);
    }
    scalar::apply_gain(gain, in_chunks.remainder(), out_chunks.into_remainder());
}

pub fn apply_gain_span<T: Element>(gain: &[T], input: &[T], output: &mut [T]) {
    debug_assert_eq!(input.len(), output.len(), "apply_gain: span length mismatch");
    debug_assert_eq!(gain.len(), output.len(), "apply_gain: gain length mismatch");
    let len = gain.len().min(input.len()).min(output.len());
    let mut gain_chunks = gain[..len].chunks_exact(T::LANES);
    let mut in_chunks = input[..len].chunks_exact(T::LANES);
    let mut out_chunks = output[..len].chunks_exact_mut(T::LANES);
    for ((out, inp), g) in (&mut out_chunks).zip(&mut in_chunks).zip(&mut gain_chunks) {
        T::store(T::load(inp) * T::load(g), out);
    }
    scalar::apply_gain_span(
        gain_chunks.remainder(),
        in_chunks.remainder(),
        out_chunks.into_remainder(),
    );
}

pub fn linear_ramp<T: Element>(output: &mut [T], start: T, step: T) -> T {
    scalar::linear_ramp(output, start, step)
}

pub fn multiplicative_ramp<T: Element>(output: &mut [T], start: T, step: T) -> T {
    scalar::multiplicative_ramp(output, start, step)
}

macro_rules! wide_unary {
    ($name:ident, $wide:ident) => {
        pub fn $name<T: Element>(input: &[T], output: &mut [T]) {
            debug_assert_eq!(
                input.len(),
                output.len(),
                concat!(stringify!($name), ": span length mismatch")
            );
            let len = input.len().min(output.len());
            let mut in_chunks = input[..len].chunks_exact(T::LANES);
            let mut out_chunks = output[..len].chunks_exact_mut(T::LANES);
            for (out, inp) in (&mut out_chunks).zip(&mut in_chunks) {
                T::store(T::$wide(T::load(inp)), out);
            }
            scalar::$name(in_chunks.remainder(), out_chunks.into_remainder());
        }
    };
}

wide_unary!(exp, wide_exp);
wide_unary!(log, wide_ln);
wide_unary!(sin, wide_sin);
wide_unary!(cos, wide_cos);

/// Deinterleave in blocks of `T::LANES` frames; the compiler lowers each block
/// to register shuffles.
pub fn read_interleaved<T: Element>(input: &[T], left: &mut [T], right: &mut [T]) {
    debug_assert_eq!(left.len(), right.len(), "read_interleaved: channel length mismatch");
    debug_assert_eq!(input.len(), 2 * left.len(), "read_interleaved: input length mismatch");
    let frames = left.len().min(right.len()).min(input.len() / 2);
    let whole = frames - frames % T::LANES;

    for ((block, l), r) in input[..2 * whole]
        .chunks_exact(2 * T::LANES)
        .zip(left[..whole].chunks_exact_mut(T::LANES))
        .zip(right[..whole].chunks_exact_mut(T::LANES))
    {
        for k in 0..T::LANES {
            l[k] = block[2 * k];
            r[k] = block[2 * k + 1];
        }
    }

    scalar::read_interleaved(
        &input[2 * whole..2 * frames],
        &mut left[whole..frames],
        &mut right[whole..frames],
    );
}

pub fn write_interleaved<T: Element>(left: &[T], right: &[T], output: &mut [T]) {
    debug_assert_eq!(left.len(), right.len(), "write_interleaved: channel length mismatch");
    debug_assert_eq!(output.len(), 2 * left.len(), "write_interleaved: output length mismatch");
    let frames = left.len().min(right.len()).min(output.len() / 2);
    let whole = frames - frames % T::LANES;

    for ((block, l), r) in output[..2 * whole]
        .chunks_exact_mut(2 * T::LANES)
        .zip(left[..whole].chunks_exact(T::LANES))
        .zip(right[..whole].chunks_exact(T::LANES))
    {
        for k in 0..T::LANES {
            block[2 * k] = l[k];
            block[2 * k + 1] = r[k];
        }
    }

    scalar::write_interleaved(
        &left[whole..frames],
        &right[whole..frames],
        &mut output[2 * whole..2 * frames],
    );
}

pub fn looping_sfz_index<T: Element>(
    jumps: &[T],
    left_coeff: &mut [T],
    right_coeff: &mut [T],
    indices: &mut [i32],
    float_index: T,
    loop_end: T,
    loop_start: T,
) -> T {
    scalar::looping_sfz_index(
        jumps,
        left_coeff,
        right_coeff,
        indices,
        float_index,
        loop_end,
        loop_start,
    )
}

pub fn flush_non_finite<T: Element>(buffer: &mut [T]) {
    scalar::flush_non_finite(buffer);
}
