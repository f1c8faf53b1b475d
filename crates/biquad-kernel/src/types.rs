// SPDX-License-Identifier: Apache-2.0

//! Coefficient value type for one biquad section.

/// Coefficients of a single biquad (second-order IIR) section.
///
/// Normalized so that `a0 = 1`, using the standard Audio EQ Cookbook sign
/// convention. The recursion implemented by the kernels is:
///
/// ```text
///   y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// A coefficient set is a plain value: it is computed once (directly or by
/// coefficient synthesis), installed into a cascade slot, and only ever
/// replaced wholesale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoeffs {
    /// The identity (pass-through) section: `b0 = 1`, all others zero.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Create a coefficient set from raw values (already normalized to
    /// `a0 = 1`).
    pub const fn new(b0: f32, b1: f32, b2: f32, a1: f32, a2: f32) -> Self {
        Self { b0, b1, b2, a1, a2 }
    }

    /// Return true if every coefficient is finite (no NaN or infinity).
    pub fn is_finite(&self) -> bool {
        self.b0.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
    }
}

impl Default for BiquadCoeffs {
    /// Defaults to [`BiquadCoeffs::IDENTITY`], so an unconfigured section
    /// passes audio through unchanged instead of silencing it.
    fn default() -> Self {
        Self::IDENTITY
    }
}
