// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Elliptic-perturbed phase: the exact spherical phase with the
//! integration-column radius replaced by its first-order eccentric
//! approximation `rho*(1 + ecc*cos(phi - peri))`, so the ring intercept
//! traces a (slightly) eccentric orbit instead of a circle.

use super::Psi;
use crate::scalar::Scalar;

/// `psi = k*D * (sqrt(g(phi)) - 1)` with `u(phi) = (rho/D)*(1 +
/// ecc*cos(phi - peri))` substituted for the circular-orbit `u = rho/D`.
pub fn psi<S: Scalar>(
    rho_km: S,
    d_km: S,
    cos_b: S,
    k_d: S,
    phi: S,
    phi0: S,
    ecc: S,
    peri_rad: S,
) -> Psi<S> {
    let two = S::from(2.0).unwrap();
    let four = S::from(4.0).unwrap();
    let u0 = rho_km / d_km;

    let (sin_peri, cos_peri) = (phi - peri_rad).sin_cos();
    let ecc_factor = S::one() + ecc * cos_peri;
    let u = u0 * ecc_factor;
    let du = -u0 * ecc * sin_peri;
    let d2u = -u0 * ecc * cos_peri;

    let (sin_dphi, cos_dphi) = (phi - phi0).sin_cos();
    let g = S::one() + u * u - two * u * cos_b * cos_dphi;

    // a = u - cos_b*cos(phi-phi0), the common factor in dg/dphi's first term.
    let a = u - cos_b * cos_dphi;
    let g1 = two * du * a + two * cos_b * u * sin_dphi;
    let g2 = two * d2u * a
        + two * du * du
        + four * cos_b * du * sin_dphi
        + two * cos_b * u * cos_dphi;

    let sqrt_g = g.sqrt();
    let value = k_d * (sqrt_g - S::one());
    let d1 = k_d * g1 / (two * sqrt_g);
    // d2(psi)/dphi2 = kD * (2*g*g2 - g1^2) / (4*g^{3/2})
    let d2 = k_d * (two * g * g2 - g1 * g1) / (four * g * sqrt_g);
    Psi { value, d1, d2 }
}
