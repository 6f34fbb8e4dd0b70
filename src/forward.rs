// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Closed-form diffraction forward models for the canonical ring apertures:
//! a single straight edge, a ringlet (opaque band) and its complement (a
//! gap), a double slit, and a truncated-Fourier square-wave grating. Used
//! both standalone (`reconstruct forward`) and as ground truth for the
//! transform driver's `run_forward` self-check.
//!
//! Every aperture is built from the normalized Fresnel integrals
//! [`crate::math::fresnel_c`]/[`crate::math::fresnel_s`]: the diffracted
//! field from illuminating the radial interval `[a, b]` only is
//!
//! `T(rho) = (1/sqrt(2)) * [(C(s_b) - C(s_a)) + i*(S(s_b) - S(s_a))]`,
//! `s_x = sqrt(2)*(x - rho)/F`,
//!
//! which every other aperture here is assembled from by linearity
//! (superposition of illuminated intervals) or by subtraction from the
//! fully-open aperture `exp(i*pi/4)`.

use num_complex::Complex;

use crate::math::{fresnel_c, fresnel_s};
use crate::scalar::Scalar;

/// `exp(i*pi/4)`, the diffracted field of a fully unobstructed aperture.
fn fully_open<S: Scalar>() -> Complex<S> {
    let half = S::from(0.5).unwrap();
    Complex::new(half, half) * S::from(std::f64::consts::SQRT_2).unwrap()
}

fn cumulative<S: Scalar>(rho: S, x: S, fresnel_scale: S) -> Complex<S> {
    let s = S::from(std::f64::consts::SQRT_2).unwrap() * (x - rho) / fresnel_scale;
    Complex::new(fresnel_c(s), fresnel_s(s))
}

/// Diffracted field with only `[a, b]` illuminated (a "gap" in an otherwise
/// opaque ring, or equivalently a single slit — see [`gap`]).
fn illuminated_interval<S: Scalar>(rho: S, a: S, b: S, fresnel_scale: S) -> Complex<S> {
    let inv_sqrt2 = S::one() / S::from(std::f64::consts::SQRT_2).unwrap();
    (cumulative(rho, b, fresnel_scale) - cumulative(rho, a, fresnel_scale)) * inv_sqrt2
}

/// A straight edge at `edge`: transparent for `rho' > edge`, opaque below.
pub fn straightedge<S: Scalar>(rho: S, edge: S, fresnel_scale: S) -> Complex<S> {
    let half = S::from(0.5).unwrap();
    let inv_sqrt2 = S::one() / S::from(std::f64::consts::SQRT_2).unwrap();
    let c = cumulative(rho, edge, fresnel_scale);
    Complex::new(half - c.re, half - c.im) * inv_sqrt2
}

/// An opaque ring of material spanning `[a, b]` (`a < b`), open elsewhere.
pub fn ringlet<S: Scalar>(rho: S, a: S, b: S, fresnel_scale: S) -> Complex<S> {
    fully_open() - illuminated_interval(rho, a, b, fresnel_scale)
}

/// The complement of [`ringlet`]: a transparent gap spanning `[a, b]`,
/// opaque elsewhere.
pub fn gap<S: Scalar>(rho: S, a: S, b: S, fresnel_scale: S) -> Complex<S> {
    illuminated_interval(rho, a, b, fresnel_scale)
}

/// Alias of [`ringlet`] (spec names these separately; the underlying
/// aperture geometry is identical).
pub fn single_slit<S: Scalar>(rho: S, a: S, b: S, fresnel_scale: S) -> Complex<S> {
    ringlet(rho, a, b, fresnel_scale)
}

/// Two independent transparent gaps, `[a0, b0]` and `[a1, b1]`.
#[allow(clippy::too_many_arguments)]
pub fn double_slit<S: Scalar>(
    rho: S,
    a0: S,
    b0: S,
    a1: S,
    b1: S,
    fresnel_scale: S,
) -> Complex<S> {
    gap(rho, a0, b0, fresnel_scale) + gap(rho, a1, b1, fresnel_scale)
}

/// A periodic square-wave transmittance grating (period `period`, fraction
/// `duty` open per period), Fresnel-propagated by summing the closed-form
/// propagation of each of its Fourier harmonics up to `n_terms`.
///
/// Propagating a pure grating harmonic `exp(i*K*rho')` through the Fresnel
/// kernel `(1/F)*exp(i*pi*(rho-rho')^2/F^2)` gives, by the standard Fresnel
/// Gaussian-integral identity, `exp(i*pi/4) * exp(i*K*rho) *
/// exp(-i*K^2*F^2/(4*pi))` — each harmonic is propagated to itself with a
/// quadratic phase shift and no change in amplitude (the Talbot effect).
pub fn square_wave<S: Scalar>(
    rho: S,
    period: S,
    duty: S,
    n_terms: u32,
    fresnel_scale: S,
) -> Complex<S> {
    let two_pi = S::from(2.0 * std::f64::consts::PI).unwrap();
    let four_pi = S::from(4.0 * std::f64::consts::PI).unwrap();
    let phase = fully_open();
    let mut total = Complex::new(S::zero(), S::zero());
    for n in -(n_terms as i64)..=(n_terms as i64) {
        let nf = S::from(n as f64).unwrap();
        let c_n = if n == 0 {
            duty
        } else {
            (S::PI() * nf * duty).sin() / (S::PI() * nf)
        };
        if c_n.is_zero() {
            continue;
        }
        let k_n = two_pi * nf / period;
        let harmonic_phase = k_n * rho - (k_n * k_n * fresnel_scale * fresnel_scale) / four_pi;
        let (s, c) = harmonic_phase.sin_cos();
        total += phase * Complex::new(c_n, S::zero()) * Complex::new(c, s);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn straightedge_is_fully_open_far_from_edge() {
        let t = straightedge(1000.0_f64, 0.0, 1.0);
        assert_abs_diff_eq!(t.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn straightedge_is_fully_shadowed_far_from_edge() {
        let t = straightedge(-1000.0_f64, 0.0, 1.0);
        assert_abs_diff_eq!(t.norm(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn straightedge_is_half_power_at_the_edge() {
        let t = straightedge(0.0_f64, 0.0, 1.0);
        assert_abs_diff_eq!(t.norm_sqr(), 0.25, epsilon = 1e-9);
    }

    #[test]
    fn ringlet_and_gap_sum_to_fully_open() {
        let rho = 3.3_f64;
        let (a, b, f) = (2.0, 4.0, 0.5);
        let r = ringlet(rho, a, b, f);
        let g = gap(rho, a, b, f);
        let open = fully_open::<f64>();
        assert_abs_diff_eq!((r + g).re, open.re, epsilon = 1e-9);
        assert_abs_diff_eq!((r + g).im, open.im, epsilon = 1e-9);
    }

    #[test]
    fn ringlet_is_fully_open_far_outside_band() {
        let t = ringlet(1000.0_f64, 2.0, 4.0, 0.5);
        assert_abs_diff_eq!(t.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn gap_is_dark_far_outside_band() {
        let t = gap(1000.0_f64, 2.0, 4.0, 0.5);
        assert_abs_diff_eq!(t.norm(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn single_slit_matches_ringlet() {
        let (rho, a, b, f) = (3.3_f64, 2.0, 4.0, 0.5);
        assert_eq!(single_slit(rho, a, b, f), ringlet(rho, a, b, f));
    }

    #[test]
    fn double_slit_is_linear_sum_of_two_gaps() {
        let rho = 1.0_f64;
        let (a0, b0, a1, b1, f) = (-5.0, -4.0, 4.0, 5.0, 0.5);
        let t = double_slit(rho, a0, b0, a1, b1, f);
        let expected = gap(rho, a0, b0, f) + gap(rho, a1, b1, f);
        assert_abs_diff_eq!(t.re, expected.re, epsilon = 1e-12);
        assert_abs_diff_eq!(t.im, expected.im, epsilon = 1e-12);
    }

    #[test]
    fn square_wave_duty_one_is_fully_open() {
        // duty = 1 means every period is fully transparent, i.e. no grating
        // at all: only the n=0 DC term survives.
        let t = square_wave(10.0_f64, 2.0, 1.0, 8, 0.5);
        let open = fully_open::<f64>();
        assert_abs_diff_eq!(t.re, open.re, epsilon = 1e-9);
        assert_abs_diff_eq!(t.im, open.im, epsilon = 1e-9);
    }

    #[test]
    fn square_wave_duty_zero_is_dark() {
        let t = square_wave(10.0_f64, 2.0, 0.0, 8, 0.5);
        assert_abs_diff_eq!(t.norm(), 0.0, epsilon = 1e-9);
    }
}
