// SPDX-License-Identifier: Apache-2.0

//! Cascade recursion kernels (Transposed Direct Form II).
//!
//! Every kernel implements the standard difference equation per section:
//!
//! ```text
//!   y[n] = b0*x[n] + d0
//!   d0   = b1*x[n] - a1*y[n] + d1
//!   d1   = b2*x[n] - a2*y[n]
//! ```
//!
//! which is algebraically `y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
//! - a1*y[n-1] - a2*y[n-2]` with two delay values of state per section.
//! In a cascade each section's output feeds the next section's input,
//! in slot order.
//!
//! All kernels process `min(dst.len(), src.len())` samples, mutate only
//! the state passed in, and cannot fail.

use multiversion::multiversion;

use crate::frame::Frame;
use crate::types::BiquadCoeffs;

/// Process a buffer through a single biquad section (mono `f32`).
///
/// Fast path for one-section cascades: coefficients and state are kept in
/// locals across the whole buffer.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn biquad_process_x1(dst: &mut [f32], src: &[f32], c: &BiquadCoeffs, d: &mut [f32; 2]) {
    let (b0, b1, b2) = (c.b0, c.b1, c.b2);
    let (a1, a2) = (c.a1, c.a2);
    let (mut d0, mut d1) = (d[0], d[1]);

    for (out, &x) in dst.iter_mut().zip(src.iter()) {
        let y = b0 * x + d0;
        d0 = b1 * x - a1 * y + d1;
        d1 = b2 * x - a2 * y;
        *out = y;
    }

    d[0] = d0;
    d[1] = d1;
}

/// Process a buffer through an N-section cascade (mono `f32`).
///
/// `coeffs[i]` and `state[i]` belong to cascade slot `i`; slots are applied
/// in order, each consuming the previous slot's output.
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn cascade_process(
    dst: &mut [f32],
    src: &[f32],
    coeffs: &[BiquadCoeffs],
    state: &mut [[f32; 2]],
) {
    debug_assert_eq!(coeffs.len(), state.len());

    for (out, &x) in dst.iter_mut().zip(src.iter()) {
        let mut s = x;
        for (c, d) in coeffs.iter().zip(state.iter_mut()) {
            let y = c.b0 * s + d[0];
            d[0] = c.b1 * s - c.a1 * y + d[1];
            d[1] = c.b2 * s - c.a2 * y;
            s = y;
        }
        *out = s;
    }
}

/// In-place variant of [`cascade_process`].
#[multiversion(targets("x86_64+avx2+fma", "x86_64+avx", "x86_64+sse4.1", "aarch64+neon",))]
pub fn cascade_process_inplace(buf: &mut [f32], coeffs: &[BiquadCoeffs], state: &mut [[f32; 2]]) {
    debug_assert_eq!(coeffs.len(), state.len());

    for sample in buf.iter_mut() {
        let mut s = *sample;
        for (c, d) in coeffs.iter().zip(state.iter_mut()) {
            let y = c.b0 * s + d[0];
            d[0] = c.b1 * s - c.a1 * y + d[1];
            d[1] = c.b2 * s - c.a2 * y;
            s = y;
        }
        *sample = s;
    }
}

/// Process a buffer of frames through an N-section cascade.
///
/// Scalar kernel generic over the frame type; each channel runs the same
/// recursion independently. Identical sample ordering to
/// [`cascade_process`], so mono `f32` frames produce the same output as
/// the dispatched kernel.
pub fn cascade_process_frames<F: Frame>(
    dst: &mut [F],
    src: &[F],
    coeffs: &[BiquadCoeffs],
    state: &mut [[F; 2]],
) {
    debug_assert_eq!(coeffs.len(), state.len());

    for (out, &x) in dst.iter_mut().zip(src.iter()) {
        let mut s = x;
        for (c, d) in coeffs.iter().zip(state.iter_mut()) {
            let y = s.scale(c.b0).add(d[0]);
            d[0] = s.scale(c.b1).sub(y.scale(c.a1)).add(d[1]);
            d[1] = s.scale(c.b2).sub(y.scale(c.a2));
            s = y;
        }
        *out = s;
    }
}

/// In-place variant of [`cascade_process_frames`].
pub fn cascade_process_frames_inplace<F: Frame>(
    buf: &mut [F],
    coeffs: &[BiquadCoeffs],
    state: &mut [[F; 2]],
) {
    debug_assert_eq!(coeffs.len(), state.len());

    for sample in buf.iter_mut() {
        let mut s = *sample;
        for (c, d) in coeffs.iter().zip(state.iter_mut()) {
            let y = s.scale(c.b0).add(d[0]);
            d[0] = s.scale(c.b1).sub(y.scale(c.a1)).add(d[1]);
            d[1] = s.scale(c.b2).sub(y.scale(c.a2));
            s = y;
        }
        *sample = s;
    }
}
