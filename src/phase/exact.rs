// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Exact spherical phase, from the law-of-cosines distance between the
//! spacecraft (fixed at the output sample's geometry: distance `D`, opening
//! angle `B`, measured azimuth `phi0`) and a ring-plane point at radius
//! `rho` and free azimuth `phi`.

use super::Psi;
use crate::scalar::Scalar;

/// `g(phi) = 1 + u^2 - 2*u*cos(B)*cos(phi - phi0)`, `u = rho/D`, plus its
/// first two derivatives with respect to `phi`.
fn g_and_derivs<S: Scalar>(u: S, cos_b: S, phi: S, phi0: S) -> (S, S, S) {
    let two = S::from(2.0).unwrap();
    let (s, c) = (phi - phi0).sin_cos();
    let g = S::one() + u * u - two * u * cos_b * c;
    let g1 = two * u * cos_b * s;
    let g2 = two * u * cos_b * c;
    (g, g1, g2)
}

/// `psi = k*D * (sqrt(g(phi)) - 1)`.
///
/// `rho_km` is the integration-column radius (`rho_j` in the driver's
/// notation), `d_km`/`cos_b`/`k_d`/`phi0` are the output sample's geometry
/// (`D_i`, `cos(B_i)`, `k_i*D_i`, `phi_i`), and `phi` is the free azimuth
/// the stationary-phase solver drives to `d(psi)/d(phi) = 0`.
pub fn psi<S: Scalar>(rho_km: S, d_km: S, cos_b: S, k_d: S, phi: S, phi0: S) -> Psi<S> {
    let two = S::from(2.0).unwrap();
    let four = S::from(4.0).unwrap();
    let u = rho_km / d_km;
    let (g, g1, g2) = g_and_derivs(u, cos_b, phi, phi0);
    let sqrt_g = g.sqrt();
    let value = k_d * (sqrt_g - S::one());
    let d1 = k_d * g1 / (two * sqrt_g);
    let d2 = k_d * (g2 / (two * sqrt_g) - g1 * g1 / (four * g * sqrt_g));
    Psi { value, d1, d2 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn vanishes_when_rho_equals_d_and_phi_equals_phi0_and_b_zero() {
        // u = 1, cos_b = 1, phi = phi0: g = 1 + 1 - 2 = 0, psi = k*D*(0-1).
        let p = psi(1.0_f64, 1.0, 1.0, 5.0, 0.3, 0.3);
        assert_abs_diff_eq!(p.value, -5.0, epsilon = 1e-10);
    }

    #[test]
    fn first_derivative_vanishes_at_phi_equals_phi0() {
        // d(phi-phi0)=0 => sin term is zero => g1 = 0 => d1 = 0, for any u/cos_b.
        let p = psi(0.8_f64, 1.0, 0.5, 10.0, 1.234, 1.234);
        assert_abs_diff_eq!(p.d1, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn derivatives_match_finite_difference() {
        let rho = 0.93_f64;
        let d = 1.0;
        let cos_b = 0.6;
        let k_d = 3.0;
        let phi0 = 0.2;
        let phi = 0.55;
        let h = 1e-6;
        let p = psi(rho, d, cos_b, k_d, phi, phi0);
        let p_plus = psi(rho, d, cos_b, k_d, phi + h, phi0);
        let p_minus = psi(rho, d, cos_b, k_d, phi - h, phi0);
        let d1_fd = (p_plus.value - p_minus.value) / (2.0 * h);
        let d2_fd = (p_plus.value - 2.0 * p.value + p_minus.value) / (h * h);
        assert_abs_diff_eq!(p.d1, d1_fd, epsilon = 1e-5);
        assert_abs_diff_eq!(p.d2, d2_fd, epsilon = 1e-3);
    }
}
