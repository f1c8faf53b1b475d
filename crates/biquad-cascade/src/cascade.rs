// SPDX-License-Identifier: Apache-2.0

//! The cascaded biquad filter engine.
//!
//! Owns exactly one core operator and orchestrates per-section and
//! whole-bank configuration on top of it. The central contract is the
//! init-vs-update split:
//!
//! - `init_*` installs coefficients **and zeroes state** — a fresh start;
//! - `update_*` installs coefficients and **preserves state** — changing a
//!   response while audio is flowing, without an audible click from a
//!   discarded feedback history.
//!
//! Whole-bank parameter calls are all-or-nothing: every section is
//! synthesized into a local array before anything is installed, so a
//! rejected parameter set leaves the engine exactly as it was.

use std::marker::PhantomData;

use biquad_kernel::frame::Frame;
use biquad_kernel::types::BiquadCoeffs;

use crate::coeffs::{CoeffsError, FilterParams, calc_coeffs};
use crate::operator::{BiquadCoreOperator, DirectFormOperator, MonoOperator};

/// An `N`-section cascaded biquad filter.
///
/// `N` is a type-level constant: the cascade is never resized, and all
/// coefficient/state storage is fixed-size inside the operator. The
/// operator type `O` is chosen at compile time.
///
/// A freshly constructed engine passes audio through unchanged (identity
/// coefficients, zero state); configure it with `init_*` before use.
///
/// Single-owner, single-thread use is assumed: no operation blocks,
/// suspends, or allocates, and the engine provides no internal
/// synchronization.
///
/// # Examples
///
/// ```
/// use biquad_cascade::cascade::MonoCascade;
/// use biquad_cascade::coeffs::{CoeffsError, FilterParams, FilterType};
///
/// let mut hpf_lpf: MonoCascade<2> = MonoCascade::new();
/// hpf_lpf.init_all(&[
///     FilterParams {
///         filter_type: FilterType::Highpass,
///         frequency: 40.0,
///         ..FilterParams::default()
///     },
///     FilterParams {
///         filter_type: FilterType::Lowpass,
///         frequency: 16000.0,
///         ..FilterParams::default()
///     },
/// ])?;
///
/// let mut buf = [0.0f32; 512];
/// hpf_lpf.process_inplace(&mut buf);
///
/// // Live tweak: move the lowpass without clicking
/// hpf_lpf.update_section(1, &FilterParams {
///     filter_type: FilterType::Lowpass,
///     frequency: 12000.0,
///     ..FilterParams::default()
/// })?;
/// # Ok::<(), CoeffsError>(())
/// ```
pub struct CascadedBiquadFilter<F, O, const N: usize>
where
    F: Frame,
    O: BiquadCoreOperator<F, N>,
{
    op: O,
    _frame: PhantomData<fn() -> F>,
}

/// Mono cascade on the SIMD-dispatched operator.
pub type MonoCascade<const N: usize> = CascadedBiquadFilter<f32, MonoOperator<N>, N>;

/// Stereo cascade on the frame-generic operator.
pub type StereoCascade<const N: usize> =
    CascadedBiquadFilter<[f32; 2], DirectFormOperator<[f32; 2], N>, N>;

impl<F, O, const N: usize> Default for CascadedBiquadFilter<F, O, N>
where
    F: Frame,
    O: BiquadCoreOperator<F, N> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<F, O, const N: usize> CascadedBiquadFilter<F, O, N>
where
    F: Frame,
    O: BiquadCoreOperator<F, N>,
{
    /// Number of cascaded sections.
    pub const NUM_CASCADED: usize = N;

    /// Create an engine with every section reset and identity
    /// coefficients.
    pub fn new() -> Self
    where
        O: Default,
    {
        let mut op = O::default();
        for section in 0..N {
            op.reset(section);
        }
        Self {
            op,
            _frame: PhantomData,
        }
    }

    /// Initialize every section from filter parameters.
    ///
    /// Synthesizes all `N` coefficient sets into a local array first; if
    /// any section's parameters are rejected, nothing is installed and
    /// the engine keeps its previous configuration. On success all
    /// coefficients are installed and **all section state is zeroed**.
    ///
    /// # Errors
    ///
    /// Returns the first [`CoeffsError`] encountered, in section order.
    pub fn init_all(&mut self, params: &[FilterParams; N]) -> Result<(), CoeffsError> {
        let coeffs = Self::synthesize_all(params)?;
        self.init_all_raw(&coeffs);
        Ok(())
    }

    /// Initialize every section from raw coefficients.
    ///
    /// Installs all `N` coefficient sets and zeroes all section state.
    /// Raw installation cannot fail.
    pub fn init_all_raw(&mut self, coeffs: &[BiquadCoeffs; N]) {
        for (section, c) in coeffs.iter().enumerate() {
            self.op.set_params(section, c.b0, c.b1, c.b2, c.a1, c.a2);
            self.op.reset(section);
        }
    }

    /// Initialize one section from filter parameters.
    ///
    /// On success installs the coefficients and zeroes **only** this
    /// section's state; every other section is untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`CoeffsError`] if the parameters are rejected; the
    /// section keeps its previous coefficients and state.
    ///
    /// # Panics
    ///
    /// Panics if `section >= N`.
    pub fn init_section(
        &mut self,
        section: usize,
        params: &FilterParams,
    ) -> Result<(), CoeffsError> {
        assert!(section < N, "section index {section} out of range (N = {N})");
        let c = calc_coeffs(params)?;
        self.init_section_raw(section, &c);
        Ok(())
    }

    /// Initialize one section from raw coefficients: install and zero this
    /// section's state.
    ///
    /// # Panics
    ///
    /// Panics if `section >= N`.
    pub fn init_section_raw(&mut self, section: usize, c: &BiquadCoeffs) {
        assert!(section < N, "section index {section} out of range (N = {N})");
        self.op.set_params(section, c.b0, c.b1, c.b2, c.a1, c.a2);
        self.op.reset(section);
    }

    /// Update every section from filter parameters, **preserving all
    /// section state** — the click-free reconfiguration path.
    ///
    /// All-or-nothing like [`init_all`](Self::init_all): a rejected
    /// section leaves the whole engine untouched.
    ///
    /// # Errors
    ///
    /// Returns the first [`CoeffsError`] encountered, in section order.
    pub fn update_all(&mut self, params: &[FilterParams; N]) -> Result<(), CoeffsError> {
        let coeffs = Self::synthesize_all(params)?;
        self.update_all_raw(&coeffs);
        Ok(())
    }

    /// Update every section from raw coefficients, preserving all state.
    pub fn update_all_raw(&mut self, coeffs: &[BiquadCoeffs; N]) {
        for (section, c) in coeffs.iter().enumerate() {
            self.op.set_params(section, c.b0, c.b1, c.b2, c.a1, c.a2);
        }
    }

    /// Update one section from filter parameters, preserving state
    /// everywhere (including this section).
    ///
    /// # Errors
    ///
    /// Returns a [`CoeffsError`] if the parameters are rejected.
    ///
    /// # Panics
    ///
    /// Panics if `section >= N`.
    pub fn update_section(
        &mut self,
        section: usize,
        params: &FilterParams,
    ) -> Result<(), CoeffsError> {
        assert!(section < N, "section index {section} out of range (N = {N})");
        let c = calc_coeffs(params)?;
        self.update_section_raw(section, &c);
        Ok(())
    }

    /// Update one section from raw coefficients, preserving state.
    ///
    /// # Panics
    ///
    /// Panics if `section >= N`.
    pub fn update_section_raw(&mut self, section: usize, c: &BiquadCoeffs) {
        assert!(section < N, "section index {section} out of range (N = {N})");
        self.op.set_params(section, c.b0, c.b1, c.b2, c.a1, c.a2);
    }

    /// Zero the history state of every section; coefficients are
    /// unchanged. Clears transients after an input discontinuity without
    /// respecifying the response.
    pub fn reset_all(&mut self) {
        for section in 0..N {
            self.op.reset(section);
        }
    }

    /// Zero the history state of one section; coefficients are unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `section >= N`.
    pub fn reset_section(&mut self, section: usize) {
        assert!(section < N, "section index {section} out of range (N = {N})");
        self.op.reset(section);
    }

    /// Filter `min(dst.len(), src.len())` frames from `src` into `dst`,
    /// through all `N` sections in cascade order.
    ///
    /// Never fails, never allocates. Aliasing of `src` and `dst` is ruled
    /// out by the borrow checker.
    pub fn process(&mut self, dst: &mut [F], src: &[F]) {
        self.op.process(dst, src);
    }

    /// Filter `buf` in place through all `N` sections in cascade order.
    pub fn process_inplace(&mut self, buf: &mut [F]) {
        self.op.process_inplace(buf);
    }

    /// Synthesize all sections into a stack array, failing without
    /// side effects.
    fn synthesize_all(params: &[FilterParams; N]) -> Result<[BiquadCoeffs; N], CoeffsError> {
        let mut coeffs = [BiquadCoeffs::IDENTITY; N];
        for (c, p) in coeffs.iter_mut().zip(params.iter()) {
            *c = calc_coeffs(p)?;
        }
        Ok(coeffs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coeffs::FilterType;

    const SR: f32 = 48000.0;

    fn lowpass(frequency: f32) -> FilterParams {
        FilterParams {
            filter_type: FilterType::Lowpass,
            sample_rate: SR,
            frequency,
            ..FilterParams::default()
        }
    }

    fn peaking(frequency: f32, gain_db: f32) -> FilterParams {
        FilterParams {
            filter_type: FilterType::Peaking,
            sample_rate: SR,
            frequency,
            q: 2.0,
            gain_db,
        }
    }

    fn noise(len: usize) -> Vec<f32> {
        let mut state: u64 = 0x1234_5678_9ABC_DEF0;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 33) as i32) as f32 / (i32::MAX as f32)
            })
            .collect()
    }

    #[test]
    fn fresh_engine_passes_through() {
        let mut f: MonoCascade<3> = MonoCascade::new();
        let src = [1.0, -0.5, 0.25, 0.125];
        let mut dst = [0.0f32; 4];
        f.process(&mut dst, &src);
        assert_eq!(dst, src);
    }

    #[test]
    fn num_cascaded_is_type_level() {
        assert_eq!(MonoCascade::<4>::NUM_CASCADED, 4);
        assert_eq!(StereoCascade::<2>::NUM_CASCADED, 2);
    }

    #[test]
    fn init_all_rejection_installs_nothing() {
        let mut f: MonoCascade<2> = MonoCascade::new();
        f.init_all(&[lowpass(1000.0), lowpass(4000.0)]).unwrap();

        // Impulse response with the valid configuration
        let mut reference = vec![0.0f32; 64];
        let mut impulse = vec![0.0f32; 64];
        impulse[0] = 1.0;
        f.process(&mut reference, &impulse);
        f.reset_all();

        // Section 1 invalid: whole call must be a no-op
        let err = f.update_all(&[peaking(500.0, 3.0), lowpass(-1.0)]);
        assert!(matches!(err, Err(CoeffsError::InvalidFrequency { .. })));

        let mut after = vec![0.0f32; 64];
        f.process(&mut after, &impulse);
        assert_eq!(reference, after, "failed update_all must not change coefficients");
    }

    #[test]
    fn update_preserves_state_init_resets_it() {
        let params = [lowpass(1000.0), peaking(2000.0, 6.0)];
        let input = noise(512);

        let mut control: MonoCascade<2> = MonoCascade::new();
        let mut updated: MonoCascade<2> = MonoCascade::new();
        let mut reinit: MonoCascade<2> = MonoCascade::new();
        control.init_all(&params).unwrap();
        updated.init_all(&params).unwrap();
        reinit.init_all(&params).unwrap();

        let mut out_control = vec![0.0f32; 512];
        let mut out_updated = vec![0.0f32; 512];
        let mut out_reinit = vec![0.0f32; 512];

        control.process(&mut out_control[..256], &input[..256]);
        updated.process(&mut out_updated[..256], &input[..256]);
        reinit.process(&mut out_reinit[..256], &input[..256]);

        // Reinstall identical parameters mid-stream
        updated.update_section(1, &params[1]).unwrap();
        reinit.init_section(1, &params[1]).unwrap();

        control.process(&mut out_control[256..], &input[256..]);
        updated.process(&mut out_updated[256..], &input[256..]);
        reinit.process(&mut out_reinit[256..], &input[256..]);

        assert_eq!(
            out_control, out_updated,
            "update with identical params must continue bit-identically"
        );
        assert_ne!(
            out_control[256..],
            out_reinit[256..],
            "init zeroes state, so the continuation must differ"
        );
    }

    #[test]
    fn reset_all_then_zero_input_is_zero_output() {
        let mut f: MonoCascade<2> = MonoCascade::new();
        f.init_all(&[lowpass(500.0), peaking(3000.0, -4.0)]).unwrap();

        let mut buf = noise(256);
        f.process_inplace(&mut buf);

        f.reset_all();
        let mut silence = vec![0.0f32; 256];
        f.process_inplace(&mut silence);
        assert!(silence.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn reset_section_keeps_coefficients() {
        let mut f: MonoCascade<1> = MonoCascade::new();
        f.init_all(&[lowpass(1000.0)]).unwrap();

        let mut impulse1 = vec![0.0f32; 64];
        impulse1[0] = 1.0;
        let mut out1 = vec![0.0f32; 64];
        f.process(&mut out1, &impulse1);

        f.reset_section(0);
        let mut out2 = vec![0.0f32; 64];
        f.process(&mut out2, &impulse1);

        assert_eq!(out1, out2, "reset must not alter the installed response");
    }

    #[test]
    fn stereo_cascade_filters_both_channels() {
        let mut f: StereoCascade<1> = StereoCascade::new();
        f.init_all(&[lowpass(1000.0)]).unwrap();

        let mono = noise(256);
        let src: Vec<[f32; 2]> = mono.iter().map(|&s| [s, s]).collect();
        let mut dst = vec![[0.0f32; 2]; 256];
        f.process(&mut dst, &src);

        for (i, frame) in dst.iter().enumerate() {
            assert_eq!(frame[0], frame[1], "identical channels must stay identical at {i}");
        }
        assert_ne!(dst[10][0], src[10][0], "lowpass must actually filter");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn init_section_out_of_range_panics() {
        let mut f: MonoCascade<2> = MonoCascade::new();
        let _ = f.init_section(2, &lowpass(1000.0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn reset_section_out_of_range_panics() {
        let mut f: MonoCascade<2> = MonoCascade::new();
        f.reset_section(2);
    }
}
