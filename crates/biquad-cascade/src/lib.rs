// SPDX-License-Identifier: Apache-2.0

//! # biquad-cascade
//!
//! A cascaded biquad (second-order IIR) filter engine for real-time audio
//! conditioning: equalization, shelving, notch and peak filtering.
//!
//! The engine manages a fixed, compile-time number of biquad sections and
//! enforces a strict initialize-vs-update contract:
//!
//! - **init** installs coefficients *and* zeroes section state — a fresh
//!   start after a stream discontinuity;
//! - **update** installs coefficients but *preserves* state — the
//!   click-free path for changing a filter response while audio flows.
//!
//! Storage and the per-sample recursion live in a core operator selected
//! at compile time ([`operator::BiquadCoreOperator`]); the engine is
//! generic over it, so specialized operators cost no dynamic dispatch.
//!
//! ## Modules
//!
//! - [`coeffs`] — filter parameters, RBJ Audio-EQ-Cookbook coefficient
//!   synthesis with validation, frequency response evaluation
//! - [`operator`] — the core operator contract plus the reference
//!   operators (frame-generic scalar, mono SIMD-dispatched)
//! - [`cascade`] — the public engine
//!
//! ## Example
//!
//! ```
//! use biquad_cascade::cascade::MonoCascade;
//! use biquad_cascade::coeffs::{CoeffsError, FilterParams, FilterType};
//!
//! let mut filter: MonoCascade<2> = MonoCascade::new();
//! filter.init_all(&[
//!     FilterParams {
//!         filter_type: FilterType::Lowpass,
//!         frequency: 8000.0,
//!         ..FilterParams::default()
//!     },
//!     FilterParams {
//!         filter_type: FilterType::Highpass,
//!         frequency: 40.0,
//!         ..FilterParams::default()
//!     },
//! ])?;
//!
//! let mut buf = [0.0f32; 256];
//! // ... fill buf with audio ...
//! filter.process_inplace(&mut buf);
//! # Ok::<(), CoeffsError>(())
//! ```

pub mod cascade;
pub mod coeffs;
pub mod operator;

pub use biquad_kernel::frame::Frame;
pub use biquad_kernel::types::BiquadCoeffs;

pub use cascade::{CascadedBiquadFilter, MonoCascade, StereoCascade};
pub use coeffs::{CoeffsError, FilterParams, FilterType};
pub use operator::{BiquadCoreOperator, DirectFormOperator, MonoOperator};
