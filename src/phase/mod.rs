// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Fresnel-phase module: `psi`, `d(psi)/d(phi)` and `d^2(psi)/d(phi)^2`
//! for every phase model the transform driver can select, plus the
//! azimuth-free quadratic (stationary-phase-free) form used by the
//! `Fresnel`/`Fft` strategies.

pub mod elliptic;
pub mod exact;
pub mod legendre;
pub mod perturbed;

use thiserror::Error;

use crate::scalar::Scalar;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PhaseError {
    #[error("legendre order must be in 2..=8 (got {0})")]
    InvalidLegendreOrder(u8),
}

/// Phase value plus its first two derivatives with respect to the free
/// azimuth `phi`. The stationary-phase solver only ever needs `d1`/`d2`; the
/// driver's accumulation step only ever needs `value`, but it's convenient
/// to keep them together since every phase model computes all three from the
/// same intermediate terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Psi<S> {
    pub value: S,
    pub d1: S,
    pub d2: S,
}

/// The quadratic (small-angle Fresnel) phase: `psi = (pi/2)*((rho-rho0)/F)^2`.
/// Has no azimuthal dependence, so it bypasses the stationary-phase solver
/// entirely; used directly by the `Fresnel` and `Fft` strategies.
pub fn quadratic<S: Scalar>(rho_km: S, rho0_km: S, fresnel_scale_km: S) -> S {
    let half = S::from(0.5).unwrap();
    let x = (rho_km - rho0_km) / fresnel_scale_km;
    S::PI() * half * x * x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn quadratic_vanishes_at_rho0() {
        assert_abs_diff_eq!(quadratic(10.0_f64, 10.0, 0.5), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn quadratic_matches_formula() {
        let v = quadratic(10.5_f64, 10.0, 0.5);
        let expected = std::f64::consts::PI / 2.0 * (0.5_f64 / 0.5).powi(2);
        assert_abs_diff_eq!(v, expected, epsilon = 1e-12);
    }
}
