// SPDX-License-Identifier: Apache-2.0

//! Audio frame abstraction.
//!
//! A frame is the sample container a filter processes: one `f32` for mono,
//! `[f32; C]` for C interleaved channels. The recursion is applied
//! independently per channel, so the only operations a frame must provide
//! are scaling by a coefficient and element-wise add/sub.

use crate::float::sanitize;

/// One audio frame (all channels of one sample instant).
pub trait Frame: Copy {
    /// The silent frame (all channels zero).
    fn zero() -> Self;

    /// Multiply every channel by a scalar coefficient.
    fn scale(self, k: f32) -> Self;

    /// Element-wise add.
    fn add(self, rhs: Self) -> Self;

    /// Element-wise subtract.
    fn sub(self, rhs: Self) -> Self;

    /// Flush denormals, NaN, and infinity to zero in every channel.
    fn sanitize(self) -> Self;
}

impl Frame for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn scale(self, k: f32) -> Self {
        self * k
    }

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self - rhs
    }

    #[inline]
    fn sanitize(self) -> Self {
        sanitize(self)
    }
}

impl<const C: usize> Frame for [f32; C] {
    #[inline]
    fn zero() -> Self {
        [0.0; C]
    }

    #[inline]
    fn scale(mut self, k: f32) -> Self {
        for ch in &mut self {
            *ch *= k;
        }
        self
    }

    #[inline]
    fn add(mut self, rhs: Self) -> Self {
        for (ch, r) in self.iter_mut().zip(rhs.iter()) {
            *ch += r;
        }
        self
    }

    #[inline]
    fn sub(mut self, rhs: Self) -> Self {
        for (ch, r) in self.iter_mut().zip(rhs.iter()) {
            *ch -= r;
        }
        self
    }

    #[inline]
    fn sanitize(mut self) -> Self {
        for ch in &mut self {
            *ch = sanitize(*ch);
        }
        self
    }
}
