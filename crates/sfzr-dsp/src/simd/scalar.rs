//! Scalar reference kernels
//!
//! Every kernel here defines the semantics the vector kernels must reproduce.
//! Mismatched span lengths trip a debug assertion; release builds process the
//! common prefix of all spans.

use sfzr_core::Element;

pub fn fill<T: Element>(output: &mut [T], value: T) {
    output.fill(value);
}

pub fn add<T: Element>(input: &[T], output: &mut [T]) {
    debug_assert_eq!(input.len(), output.len(), "add: span length mismatch");
    for (out, &inp) in output.iter_mut().zip(input) {
        *out += inp;
    }
}

pub fn apply_gain<T: Element>(gain: T, input: &[T], output: &mut [T]) {
    debug_assert_eq!(input.len(), output.len(), "apply_gain: span length mismatch");
    for (out, &inp) in output.iter_mut().zip(input) {
        *out = inp * gain;
    }
}

pub fn apply_gain_span<T: Element>(gain: &[T], input: &[T], output: &mut [T]) {
    debug_assert_eq!(input.len(), output.len(), "apply_gain: span length mismatch");
    debug_assert_eq!(gain.len(), output.len(), "apply_gain: gain length mismatch");
    for ((out, &inp), &g) in output.iter_mut().zip(input).zip(gain) {
        *out = inp * g;
    }
}

/// Arithmetic progression starting at `start`, returns the next value
pub fn linear_ramp<T: Element>(output: &mut [T], start: T, step: T) -> T {
    let mut value = start;
    for out in output.iter_mut() {
        *out = value;
        value += step;
    }
    value
}

/// Geometric progression starting at `start`, returns the next value
pub fn multiplicative_ramp<T: Element>(output: &mut [T], start: T, step: T) -> T {
    let mut value = start;
    for out in output.iter_mut() {
        *out = value;
        value *= step;
    }
    value
}

pub fn exp<T: Element>(input: &[T], output: &mut [T]) {
    debug_assert_eq!(input.len(), output.len(), "exp: span length mismatch");
    for (out, &inp) in output.iter_mut().zip(input) {
        *out = inp.exp();
    }
}

pub fn log<T: Element>(input: &[T], output: &mut [T]) {
    debug_assert_eq!(input.len(), output.len(), "log: span length mismatch");
    for (out, &inp) in output.iter_mut().zip(input) {
        *out = inp.ln();
    }
}

pub fn sin<T: Element>(input: &[T], output: &mut [T]) {
    debug_assert_eq!(input.len(), output.len(), "sin: span length mismatch");
    for (out, &inp) in output.iter_mut().zip(input) {
        *out = inp.sin();
    }
}

pub fn cos<T: Element>(input: &[T], output: &mut [T]) {
    debug_assert_eq!(input.len(), output.len(), "cos: span length mismatch");
    for (out, &inp) in output.iter_mut().zip(input) {
        *out = inp.cos();
    }
}

pub fn read_interleaved<T: Element>(input: &[T], left: &mut [T], right: &mut [T]) {
    debug_assert_eq!(left.len(), right.len(), "read_interleaved: channel length mismatch");
    debug_assert_eq!(input.len(), 2 * left.len(), "read_interleaved: input length mismatch");
    for ((frame, l), r) in input.chunks_exact(2).zip(left.iter_mut()).zip(right.iter_mut()) {
        *l = frame[0];
        *r = frame[1];
    }
}

pub fn write_interleaved<T: Element>(left: &[T], right: &[T], output: &mut [T]) {
    debug_assert_eq!(left.len(), right.len(), "write_interleaved: channel length mismatch");
    debug_assert_eq!(output.len(), 2 * left.len(), "write_interleaved: output length mismatch");
    for ((frame, &l), &r) in output.chunks_exact_mut(2).zip(left).zip(right) {
        frame[0] = l;
        frame[1] = r;
    }
}

/// Advance a fractional playback position through a loop.
///
/// Per sample: `position += jump`; once `position >= loop_end` it moves back by
/// the loop length, keeping the overshoot. `indices` receives the integer part,
/// `right_coeff` the fractional part and `left_coeff` its complement.
/// Returns the position after the last sample.
pub fn looping_sfz_index<T: Element>(
    jumps: &[T],
    left_coeff: &mut [T],
    right_coeff: &mut [T],
    indices: &mut [i32],
    float_index: T,
    loop_end: T,
    loop_start: T,
) -> T {
    debug_assert_eq!(jumps.len(), indices.len(), "looping_sfz_index: index length mismatch");
    debug_assert_eq!(jumps.len(), left_coeff.len(), "looping_sfz_index: coeff length mismatch");
    debug_assert_eq!(jumps.len(), right_coeff.len(), "looping_sfz_index: coeff length mismatch");

    let loop_length = loop_end - loop_start;
    let wraps = loop_length > T::ZERO;
    let mut position = float_index;

    for (((&jump, left), right), index) in jumps
        .iter()
        .zip(left_coeff.iter_mut())
        .zip(right_coeff.iter_mut())
        .zip(indices.iter_mut())
    {
        position += jump;
        if wraps && position >= loop_end {
            position -= loop_length;
            // Jumps longer than the loop itself
            if position >= loop_end {
                position = loop_start + (position - loop_start) % loop_length;
            }
        }

        let whole = position.floor_to_i32();
        *index = whole;
        *right = position - T::from_i32(whole);
        *left = T::ONE - *right;
    }

    position
}

/// Replace NaN and infinities with zero
pub fn flush_non_finite<T: Element>(buffer: &mut [T]) {
    for sample in buffer.iter_mut() {
        if !sample.is_finite() {
            *sample = T::ZERO;
        }
    }
}
