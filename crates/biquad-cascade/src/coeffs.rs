// SPDX-License-Identifier: Apache-2.0

//! Filter parameters and biquad coefficient synthesis.
//!
//! Synthesis follows the RBJ Audio EQ Cookbook ("Cookbook formulae for
//! audio EQ biquad filter coefficients", Robert Bristow-Johnson).
//! Coefficients come out normalized to `a0 = 1` with the standard sign
//! convention — the kernels subtract the feedback terms.
//!
//! Synthesis is a pure function: the same parameters always produce the
//! same coefficients, and parameter combinations for which the derivation
//! is undefined are rejected with [`CoeffsError`] instead of producing
//! unstable or non-finite coefficients.

use std::error::Error;
use std::f32::consts::PI;
use std::fmt;

use biquad_kernel::types::BiquadCoeffs;

/// Supported biquad filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    /// Bypass (identity): passes signal unchanged.
    Off,
    /// Second-order low-pass filter.
    Lowpass,
    /// Second-order high-pass filter.
    Highpass,
    /// Band-pass with constant skirt gain (peak gain = Q).
    BandpassConstantSkirt,
    /// Band-pass with constant 0 dB peak gain.
    BandpassConstantPeak,
    /// Notch (band-reject) filter.
    Notch,
    /// All-pass filter (phase shift only, unit magnitude).
    Allpass,
    /// Peaking (bell/parametric) equalizer.
    Peaking,
    /// Low-shelf equalizer.
    LowShelf,
    /// High-shelf equalizer.
    HighShelf,
}

impl FilterType {
    /// True for the types whose derivation uses the gain parameter.
    fn uses_gain(self) -> bool {
        matches!(
            self,
            FilterType::Peaking | FilterType::LowShelf | FilterType::HighShelf
        )
    }
}

/// Human-meaningful parameters for one biquad section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Filter type.
    pub filter_type: FilterType,
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Center/cutoff frequency in Hz.
    pub frequency: f32,
    /// Quality factor (bandwidth).
    pub q: f32,
    /// Gain in dB (used by Peaking, LowShelf, HighShelf).
    pub gain_db: f32,
}

impl Default for FilterParams {
    /// Defaults: Off, 48 kHz, 1000 Hz, Q = 1/sqrt(2), 0 dB.
    fn default() -> Self {
        Self {
            filter_type: FilterType::Off,
            sample_rate: 48000.0,
            frequency: 1000.0,
            q: std::f32::consts::FRAC_1_SQRT_2,
            gain_db: 0.0,
        }
    }
}

/// Parameter rejection from coefficient synthesis.
///
/// Synthesis is deterministic, so retrying with the same parameters is
/// pointless; the offending value is carried for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoeffsError {
    /// Sample rate is not finite or not positive.
    InvalidSampleRate { sample_rate: f32 },
    /// Frequency is outside `(0, Nyquist)` or not finite.
    InvalidFrequency { frequency: f32, nyquist: f32 },
    /// Q is not finite or not positive.
    InvalidQ { q: f32 },
    /// Gain is not finite (for a gain-using filter type).
    InvalidGain { gain_db: f32 },
    /// The derivation overflowed to non-finite coefficients even though
    /// every parameter passed its individual range check (extreme but
    /// finite Q or gain).
    SynthesisOverflow { filter_type: FilterType },
}

impl fmt::Display for CoeffsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSampleRate { sample_rate } => {
                write!(f, "invalid sample rate {sample_rate} Hz: must be finite and > 0")
            }
            Self::InvalidFrequency { frequency, nyquist } => {
                write!(
                    f,
                    "invalid frequency {frequency} Hz: must be finite and in (0, {nyquist})"
                )
            }
            Self::InvalidQ { q } => write!(f, "invalid Q {q}: must be finite and > 0"),
            Self::InvalidGain { gain_db } => {
                write!(f, "invalid gain {gain_db} dB: must be finite")
            }
            Self::SynthesisOverflow { filter_type } => {
                write!(
                    f,
                    "{filter_type:?} synthesis overflowed to non-finite coefficients"
                )
            }
        }
    }
}

impl Error for CoeffsError {}

/// Synthesize biquad coefficients from filter parameters.
///
/// [`FilterType::Off`] always yields [`BiquadCoeffs::IDENTITY`] and
/// ignores the numeric parameters. Every other type is validated first:
/// sample rate must be finite and positive, frequency inside
/// `(0, Nyquist)`, Q finite and positive, and gain finite where the type
/// uses it. The result is checked as well: parameters that pass the range
/// checks but overflow the derivation (a denormal Q, a gain of thousands
/// of dB) are rejected instead of yielding non-finite coefficients.
///
/// # Errors
///
/// Returns a [`CoeffsError`] naming the first offending parameter.
pub fn calc_coeffs(params: &FilterParams) -> Result<BiquadCoeffs, CoeffsError> {
    if params.filter_type == FilterType::Off {
        return Ok(BiquadCoeffs::IDENTITY);
    }

    let sr = params.sample_rate;
    if !sr.is_finite() || sr <= 0.0 {
        return Err(CoeffsError::InvalidSampleRate { sample_rate: sr });
    }

    let nyquist = sr / 2.0;
    let freq = params.frequency;
    if !freq.is_finite() || freq <= 0.0 || freq >= nyquist {
        return Err(CoeffsError::InvalidFrequency {
            frequency: freq,
            nyquist,
        });
    }

    let q = params.q;
    if !q.is_finite() || q <= 0.0 {
        return Err(CoeffsError::InvalidQ { q });
    }

    if params.filter_type.uses_gain() && !params.gain_db.is_finite() {
        return Err(CoeffsError::InvalidGain {
            gain_db: params.gain_db,
        });
    }

    let w0 = 2.0 * PI * freq / sr;
    let cos_w0 = w0.cos();
    let sin_w0 = w0.sin();
    let alpha = sin_w0 / (2.0 * q);

    // A is used only by the gain-using types
    let a_lin = 10.0_f32.powf(params.gain_db / 40.0);

    let (b0, b1, b2, a0, a1, a2) = match params.filter_type {
        FilterType::Off => unreachable!(),

        FilterType::Lowpass => {
            let b1 = 1.0 - cos_w0;
            let b0 = b1 / 2.0;
            (b0, b1, b0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
        }

        FilterType::Highpass => {
            let b0 = (1.0 + cos_w0) / 2.0;
            let b1 = -(1.0 + cos_w0);
            (b0, b1, b0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
        }

        FilterType::BandpassConstantSkirt => (
            alpha,
            0.0,
            -alpha,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        ),

        FilterType::BandpassConstantPeak => (
            sin_w0 / 2.0,
            0.0,
            -sin_w0 / 2.0,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        ),

        FilterType::Notch => (
            1.0,
            -2.0 * cos_w0,
            1.0,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        ),

        FilterType::Allpass => (
            1.0 - alpha,
            -2.0 * cos_w0,
            1.0 + alpha,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        ),

        FilterType::Peaking => (
            1.0 + alpha * a_lin,
            -2.0 * cos_w0,
            1.0 - alpha * a_lin,
            1.0 + alpha / a_lin,
            -2.0 * cos_w0,
            1.0 - alpha / a_lin,
        ),

        FilterType::LowShelf => {
            let two_sqrt_a_alpha = 2.0 * a_lin.sqrt() * alpha;
            let ap1 = a_lin + 1.0;
            let am1 = a_lin - 1.0;

            (
                a_lin * (ap1 - am1 * cos_w0 + two_sqrt_a_alpha),
                2.0 * a_lin * (am1 - ap1 * cos_w0),
                a_lin * (ap1 - am1 * cos_w0 - two_sqrt_a_alpha),
                ap1 + am1 * cos_w0 + two_sqrt_a_alpha,
                -2.0 * (am1 + ap1 * cos_w0),
                ap1 + am1 * cos_w0 - two_sqrt_a_alpha,
            )
        }

        FilterType::HighShelf => {
            let two_sqrt_a_alpha = 2.0 * a_lin.sqrt() * alpha;
            let ap1 = a_lin + 1.0;
            let am1 = a_lin - 1.0;

            (
                a_lin * (ap1 + am1 * cos_w0 + two_sqrt_a_alpha),
                -2.0 * a_lin * (am1 + ap1 * cos_w0),
                a_lin * (ap1 + am1 * cos_w0 - two_sqrt_a_alpha),
                ap1 - am1 * cos_w0 + two_sqrt_a_alpha,
                2.0 * (am1 - ap1 * cos_w0),
                ap1 - am1 * cos_w0 - two_sqrt_a_alpha,
            )
        }
    };

    let inv_a0 = 1.0 / a0;
    let c = BiquadCoeffs::new(
        b0 * inv_a0,
        b1 * inv_a0,
        b2 * inv_a0,
        a1 * inv_a0,
        a2 * inv_a0,
    );

    // Range checks on the inputs do not cover everything: a denormal Q
    // or a huge finite gain can still overflow the intermediates. Gate
    // the result so the cascade never sees Inf/NaN coefficients.
    if !c.is_finite() {
        return Err(CoeffsError::SynthesisOverflow {
            filter_type: params.filter_type,
        });
    }

    Ok(c)
}

/// Evaluate the frequency response of one coefficient set.
///
/// Returns `(magnitude, phase)` at `freq` Hz, magnitude linear and phase
/// in radians. Useful for plotting and for verifying installed responses;
/// the cascade response is the product of magnitudes and the sum of
/// phases across sections.
pub fn freq_response(c: &BiquadCoeffs, freq: f32, sample_rate: f32) -> (f32, f32) {
    let w = 2.0 * PI * freq / sample_rate;
    let (cos_w, sin_w) = (w.cos(), w.sin());
    let (cos_2w, sin_2w) = ((2.0 * w).cos(), (2.0 * w).sin());

    // H(e^jw) = (b0 + b1 e^-jw + b2 e^-j2w) / (1 + a1 e^-jw + a2 e^-j2w)
    let num_re = c.b0 + c.b1 * cos_w + c.b2 * cos_2w;
    let num_im = -(c.b1 * sin_w + c.b2 * sin_2w);
    let den_re = 1.0 + c.a1 * cos_w + c.a2 * cos_2w;
    let den_im = -(c.a1 * sin_w + c.a2 * sin_2w);

    let den_mag_sq = den_re * den_re + den_im * den_im;
    let h_re = (num_re * den_re + num_im * den_im) / den_mag_sq;
    let h_im = (num_im * den_re - num_re * den_im) / den_mag_sq;

    ((h_re * h_re + h_im * h_im).sqrt(), h_im.atan2(h_re))
}
