// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The normalization denominator `integral exp(i*psi) d(rho)` (spec section
//! 4.6, point 5): analytic for the quadratic strategy, trapezoid quadrature
//! over the already-computed `psi_ij` values otherwise.

use crate::data::Strategy;
use crate::math::{fresnel_c, fresnel_s};
use crate::scalar::{Cplx, Scalar};

/// `integral_{-W/2}^{W/2} exp(i*psi(x)) dx`.
pub fn denominator<S: Scalar>(
    strategy: Strategy,
    half_width: S,
    fresnel_scale: S,
    psi_values: &[S],
    delta_rho: S,
) -> Cplx<S> {
    match strategy {
        Strategy::Fresnel | Strategy::Fft => quadratic_denominator(half_width, fresnel_scale),
        _ => trapezoid_denominator(psi_values, delta_rho),
    }
}

/// `psi(x) = (pi/2)*(x/F)^2`, substitute `s = sqrt(2)*x/F`:
/// `integral = (F/sqrt(2)) * integral_{-s_max}^{s_max} exp(i*pi*s^2/2) ds
///           = (F/sqrt(2)) * 2*(C(s_max) + i*S(s_max))`, `s_max =
/// sqrt(2)*(W/2)/F`.
fn quadratic_denominator<S: Scalar>(half_width: S, fresnel_scale: S) -> Cplx<S> {
    let sqrt2 = S::from(std::f64::consts::SQRT_2).unwrap();
    let s_max = sqrt2 * (half_width / S::from(2.0).unwrap()) / fresnel_scale;
    let scale = fresnel_scale / sqrt2 * S::from(2.0).unwrap();
    Cplx::new(fresnel_c(s_max), fresnel_s(s_max)) * scale
}

/// Riemann sum of `exp(i*psi_j)` over the already-sampled span, scaled by
/// the (uniform) sample spacing.
fn trapezoid_denominator<S: Scalar>(psi_values: &[S], delta_rho: S) -> Cplx<S> {
    let mut acc = Cplx::new(S::zero(), S::zero());
    let n = psi_values.len();
    for (idx, &psi) in psi_values.iter().enumerate() {
        let (s, c) = psi.sin_cos();
        let weight = if idx == 0 || idx == n - 1 {
            S::from(0.5).unwrap()
        } else {
            S::one()
        };
        acc += Cplx::new(c, s) * weight;
    }
    acc * delta_rho
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn quadratic_denominator_matches_full_open_limit() {
        // As half_width -> infinity, the integral of exp(i*pi*s^2/2) over
        // all of R is (1+i), magnitude sqrt(2); scaled by the F/sqrt(2)
        // prefactor, the denominator's magnitude approaches F.
        let f = 0.5_f64;
        let d = quadratic_denominator(1000.0, f);
        assert_abs_diff_eq!(d.norm(), f, epsilon = 1e-3);
    }

    #[test]
    fn trapezoid_denominator_matches_analytic_for_constant_psi() {
        // exp(i*0) summed over a span of length L with spacing dr
        // integrates to L (a real number).
        let psi_values = vec![0.0_f64; 11];
        let d = trapezoid_denominator(&psi_values, 0.1);
        assert_abs_diff_eq!(d.re, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(d.im, 0.0, epsilon = 1e-9);
    }
}
