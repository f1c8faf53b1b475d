// SPDX-License-Identifier: Apache-2.0

//! Floating-point sanitization.
//!
//! IIR feedback paths decay exponentially; once a tail drops into the
//! denormal range, arithmetic on some CPUs becomes dramatically slower.
//! NaN or infinity in the state is worse: it never recovers. These helpers
//! flush all of that to zero.

/// Flush denormals, NaN, and infinity to zero.
#[inline]
pub fn sanitize(x: f32) -> f32 {
    if x.is_finite() && x.abs() >= f32::MIN_POSITIVE {
        x
    } else {
        0.0
    }
}

/// Sanitize every sample of a buffer in place.
pub fn sanitize_buf(buf: &mut [f32]) {
    for sample in buf.iter_mut() {
        *sample = sanitize(*sample);
    }
}
