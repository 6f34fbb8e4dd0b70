// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Scalar and complex math primitives: Bessel `J0`/`I0`, the Fresnel
//! integrals, Lambert `W`, `erf`/`erfc` and Horner polynomial evaluation.
//! Every routine here is generic over [`crate::scalar::Scalar`] and fails
//! with [`DomainError`] on NaN input rather than silently propagating it.

mod bessel;
mod erf;
mod fresnel;
mod lambert_w;
mod poly;

pub use bessel::{bessel_i0, bessel_j0};
pub use erf::{erf, erfc};
pub use fresnel::{fresnel_c, fresnel_s};
pub use lambert_w::lambert_w;
pub use poly::{poly_deriv_coeffs, poly_eval};

use thiserror::Error;

/// Input was outside a special function's defined domain (e.g. NaN, or
/// `x < -1/e` for [`lambert_w`]).
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DomainError {
    #[error("input was NaN")]
    Nan,
    #[error("Lambert W is undefined for x < -1/e (got {0})")]
    LambertWBelowBranchPoint(f64),
}
