// SPDX-License-Identifier: Apache-2.0

//! # biquad-kernel
//!
//! Low-level building blocks for cascaded biquad (second-order IIR)
//! filtering:
//!
//! - **Types**: the five-coefficient biquad value type ([`types::BiquadCoeffs`])
//! - **Frames**: the sample container abstraction ([`frame::Frame`]),
//!   implemented for mono `f32` and interleaved `[f32; C]` frames
//! - **Kernels**: the Transposed Direct Form II recursion over whole
//!   buffers ([`process`]), for a single section or an N-section cascade
//! - **Float utilities**: denormal/NaN flushing for clean feedback paths
//!   ([`float`])
//!
//! ## Design
//!
//! The mono `f32` kernels use runtime SIMD dispatch via the `multiversion`
//! crate: each kernel is compiled for AVX2+FMA, AVX, SSE4.1, and NEON
//! targets, and the best variant is selected at startup. The frame-generic
//! kernels are scalar; they exist so multichannel frames share the exact
//! same recursion.
//!
//! Kernels never allocate and never fail. Coefficient validation belongs
//! to the layer that produces coefficients, not here.

pub mod float;
pub mod frame;
pub mod process;
pub mod types;
