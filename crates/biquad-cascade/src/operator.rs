// SPDX-License-Identifier: Apache-2.0

//! Core operator contract and reference implementations.
//!
//! A core operator owns the coefficient and state storage for all `N`
//! cascade sections and runs the recursion over buffers. The engine is
//! generic over the operator type, so a specialized operator (different
//! recursion form, different execution strategy) is a compile-time choice
//! with no dynamic dispatch.

use biquad_kernel::float::sanitize;
use biquad_kernel::frame::Frame;
use biquad_kernel::process::{
    biquad_process_x1, cascade_process, cascade_process_frames,
    cascade_process_frames_inplace, cascade_process_inplace,
};
use biquad_kernel::types::BiquadCoeffs;

/// Storage and execution contract for an `N`-section biquad cascade.
///
/// Section indices run `0..N` in cascade order. Coefficients and state for
/// one section always live together in the operator; the caller mutates
/// them only through this interface.
///
/// `process`/`process_inplace` must implement a standard biquad difference
/// equation (`y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1]
/// - a2*y[n-2]`, `a0 = 1`) per section, applied independently per channel
/// for multichannel frames. They must not allocate and cannot fail.
pub trait BiquadCoreOperator<F: Frame, const N: usize> {
    /// Zero the history state of section `section`. Coefficients are
    /// untouched.
    ///
    /// # Panics
    ///
    /// Panics if `section >= N`.
    fn reset(&mut self, section: usize);

    /// Install coefficients for section `section`. State is untouched.
    ///
    /// # Panics
    ///
    /// Panics if `section >= N`.
    fn set_params(&mut self, section: usize, b0: f32, b1: f32, b2: f32, a1: f32, a2: f32);

    /// Filter `min(dst.len(), src.len())` frames from `src` into `dst`,
    /// updating section state.
    fn process(&mut self, dst: &mut [F], src: &[F]);

    /// Filter `buf` in place, updating section state.
    fn process_inplace(&mut self, buf: &mut [F]);
}

/// Reference operator: scalar Transposed Direct Form II over any frame
/// type.
///
/// All storage is inline fixed-size arrays; nothing here touches the heap.
#[derive(Debug, Clone)]
pub struct DirectFormOperator<F: Frame, const N: usize> {
    coeffs: [BiquadCoeffs; N],
    state: [[F; 2]; N],
}

impl<F: Frame, const N: usize> Default for DirectFormOperator<F, N> {
    fn default() -> Self {
        Self {
            coeffs: [BiquadCoeffs::IDENTITY; N],
            state: [[F::zero(); 2]; N],
        }
    }
}

impl<F: Frame, const N: usize> DirectFormOperator<F, N> {
    /// Flush denormal/non-finite state so IIR tails cannot linger in the
    /// denormal range between buffers.
    fn flush_state(&mut self) {
        for d in &mut self.state {
            d[0] = d[0].sanitize();
            d[1] = d[1].sanitize();
        }
    }
}

impl<F: Frame, const N: usize> BiquadCoreOperator<F, N> for DirectFormOperator<F, N> {
    fn reset(&mut self, section: usize) {
        self.state[section] = [F::zero(); 2];
    }

    fn set_params(&mut self, section: usize, b0: f32, b1: f32, b2: f32, a1: f32, a2: f32) {
        self.coeffs[section] = BiquadCoeffs::new(b0, b1, b2, a1, a2);
    }

    fn process(&mut self, dst: &mut [F], src: &[F]) {
        cascade_process_frames(dst, src, &self.coeffs, &mut self.state);
        self.flush_state();
    }

    fn process_inplace(&mut self, buf: &mut [F]) {
        cascade_process_frames_inplace(buf, &self.coeffs, &mut self.state);
        self.flush_state();
    }
}

/// Mono `f32` operator driving the runtime-SIMD-dispatched kernels.
///
/// Functionally identical to `DirectFormOperator<f32, N>`; the kernels are
/// compiled per SIMD target and selected at startup. `N == 1` takes the
/// single-section fast path.
#[derive(Debug, Clone)]
pub struct MonoOperator<const N: usize> {
    coeffs: [BiquadCoeffs; N],
    state: [[f32; 2]; N],
}

impl<const N: usize> Default for MonoOperator<N> {
    fn default() -> Self {
        Self {
            coeffs: [BiquadCoeffs::IDENTITY; N],
            state: [[0.0; 2]; N],
        }
    }
}

impl<const N: usize> MonoOperator<N> {
    fn flush_state(&mut self) {
        for d in &mut self.state {
            d[0] = sanitize(d[0]);
            d[1] = sanitize(d[1]);
        }
    }
}

impl<const N: usize> BiquadCoreOperator<f32, N> for MonoOperator<N> {
    fn reset(&mut self, section: usize) {
        self.state[section] = [0.0; 2];
    }

    fn set_params(&mut self, section: usize, b0: f32, b1: f32, b2: f32, a1: f32, a2: f32) {
        self.coeffs[section] = BiquadCoeffs::new(b0, b1, b2, a1, a2);
    }

    fn process(&mut self, dst: &mut [f32], src: &[f32]) {
        if N == 1 {
            biquad_process_x1(dst, src, &self.coeffs[0], &mut self.state[0]);
        } else {
            cascade_process(dst, src, &self.coeffs, &mut self.state);
        }
        self.flush_state();
    }

    fn process_inplace(&mut self, buf: &mut [f32]) {
        cascade_process_inplace(buf, &self.coeffs, &mut self.state);
        self.flush_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use std::f32::consts::PI;

    fn lowpass_1k() -> BiquadCoeffs {
        let w0 = 2.0 * PI * 1000.0 / 48000.0;
        let alpha = w0.sin() / (2.0 * std::f32::consts::FRAC_1_SQRT_2);
        let cos_w0 = w0.cos();
        let b1 = 1.0 - cos_w0;
        let b0 = b1 / 2.0;
        let a0 = 1.0 + alpha;
        BiquadCoeffs::new(
            b0 / a0,
            b1 / a0,
            b0 / a0,
            -2.0 * cos_w0 / a0,
            (1.0 - alpha) / a0,
        )
    }

    fn install(op: &mut impl BiquadCoreOperator<f32, 2>, section: usize, c: &BiquadCoeffs) {
        op.set_params(section, c.b0, c.b1, c.b2, c.a1, c.a2);
    }

    #[test]
    fn default_operator_passes_through() {
        let mut op: DirectFormOperator<f32, 3> = DirectFormOperator::default();
        let src = [1.0, -0.5, 0.25, 0.0];
        let mut dst = [0.0f32; 4];
        op.process(&mut dst, &src);
        assert_eq!(dst, src);
    }

    #[test]
    fn reset_zeroes_only_one_section() {
        let c = lowpass_1k();
        let mut op: DirectFormOperator<f32, 2> = DirectFormOperator::default();
        install(&mut op, 0, &c);
        install(&mut op, 1, &c);

        let src: Vec<f32> = (0..64).map(|i| (i as f32 * 0.3).sin()).collect();
        let mut dst = vec![0.0f32; 64];
        op.process(&mut dst, &src);

        let before = op.state;
        op.reset(0);
        assert_eq!(op.state[0], [0.0; 2]);
        assert_eq!(op.state[1], before[1], "section 1 state must survive reset(0)");
    }

    #[test]
    fn set_params_preserves_state() {
        let c = lowpass_1k();
        let mut op: DirectFormOperator<f32, 2> = DirectFormOperator::default();
        install(&mut op, 0, &c);

        let src: Vec<f32> = (0..64).map(|i| (i as f32 * 0.4).sin()).collect();
        let mut dst = vec![0.0f32; 64];
        op.process(&mut dst, &src);

        let before = op.state;
        install(&mut op, 0, &BiquadCoeffs::IDENTITY);
        assert_eq!(op.state, before, "set_params must not touch state");
    }

    #[test]
    fn mono_operator_matches_generic() {
        let c = lowpass_1k();

        let mut generic: DirectFormOperator<f32, 2> = DirectFormOperator::default();
        let mut mono: MonoOperator<2> = MonoOperator::default();
        for section in 0..2 {
            install(&mut generic, section, &c);
            install(&mut mono, section, &c);
        }

        let src: Vec<f32> = (0..512)
            .map(|i| (i as f32 * 0.19).sin() * 0.6 + (i as f32 * 0.41).cos() * 0.3)
            .collect();
        let mut dst_generic = vec![0.0f32; 512];
        let mut dst_mono = vec![0.0f32; 512];

        generic.process(&mut dst_generic, &src);
        mono.process(&mut dst_mono, &src);

        for i in 0..512 {
            assert_approx_eq!(f32, dst_generic[i], dst_mono[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn mono_x1_fast_path_matches_cascade_kernel() {
        let c = lowpass_1k();
        let mut x1: MonoOperator<1> = MonoOperator::default();
        x1.set_params(0, c.b0, c.b1, c.b2, c.a1, c.a2);

        let mut generic: DirectFormOperator<f32, 1> = DirectFormOperator::default();
        generic.set_params(0, c.b0, c.b1, c.b2, c.a1, c.a2);

        let src: Vec<f32> = (0..256).map(|i| (i as f32 * 0.23).sin()).collect();
        let mut dst_x1 = vec![0.0f32; 256];
        let mut dst_gen = vec![0.0f32; 256];
        x1.process(&mut dst_x1, &src);
        generic.process(&mut dst_gen, &src);

        for i in 0..256 {
            assert_approx_eq!(f32, dst_x1[i], dst_gen[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn inplace_matches_separate_buffers() {
        let c = lowpass_1k();
        let mut op_a: MonoOperator<2> = MonoOperator::default();
        let mut op_b: MonoOperator<2> = MonoOperator::default();
        for section in 0..2 {
            install(&mut op_a, section, &c);
            install(&mut op_b, section, &c);
        }

        let src: Vec<f32> = (0..128).map(|i| (i as f32 * 0.29).sin()).collect();
        let mut dst = vec![0.0f32; 128];
        op_a.process(&mut dst, &src);

        let mut buf = src.clone();
        op_b.process_inplace(&mut buf);

        for i in 0..128 {
            assert_approx_eq!(f32, dst[i], buf[i], ulps = 2);
        }
    }

    #[test]
    #[should_panic]
    fn reset_out_of_range_panics() {
        let mut op: DirectFormOperator<f32, 2> = DirectFormOperator::default();
        op.reset(2);
    }
}
