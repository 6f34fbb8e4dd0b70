// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Perturbed phase: the exact spherical phase plus a user-supplied
//! fifth-degree polynomial correction in `(rho - rho0)`. The correction is
//! azimuth-independent, so it leaves the stationary point (and `d1`/`d2`)
//! untouched and only shifts `value`.

use super::{exact, Psi};
use crate::data::Perturbation;
use crate::scalar::Scalar;

/// `psi = psi_exact + c[0]*x + c[1]*x^2 + ... + c[4]*x^5`, `x = rho - rho0`.
#[allow(clippy::too_many_arguments)]
pub fn psi<S: Scalar>(
    rho_km: S,
    rho0_km: S,
    d_km: S,
    cos_b: S,
    k_d: S,
    phi: S,
    phi0: S,
    perturbation: &Perturbation,
) -> Psi<S> {
    let mut base = exact::psi(rho_km, d_km, cos_b, k_d, phi, phi0);
    let x = rho_km - rho0_km;
    let mut term = x;
    let mut correction = S::zero();
    for &c in &perturbation.0 {
        correction += S::from(c).unwrap() * term;
        term *= x;
    }
    base.value += correction;
    base
}
