// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Legendre-polynomial phase expansion: a per-sample Taylor series of the
//! exact phase in `x = (rho - rho0)/D`, precomputed once per output sample
//! and then evaluated as a plain polynomial for every integration column.
//! Bypasses the stationary-phase solver, like the quadratic form.
//!
//! `g(x) = 1 + (u0+x)^2 - 2*(u0+x)*cos(B) = g0 + b*x + x^2` is an exact
//! quadratic in `x` (the azimuthal argument is frozen at the output
//! sample's own measured value, so `cos(phi-phi0)` evaluates to `cos(0) =
//! 1` and drops out of the `u`-dependent terms). The
//! Taylor coefficients of `sqrt(g(x))` about `x = 0` are generated by the
//! same recurrence that generates the coefficients of the Legendre
//! polynomial generating function, since `sqrt(g0 + b*x + x^2)` is that
//! generating function up to an affine change of variable.

use super::PhaseError;
use crate::scalar::Scalar;

/// Per-sample table of Taylor coefficients `a_0..=a_order` of
/// `sqrt(g(x))`, so that `psi(x) = k*D * (a_0 + a_1*x + ... - 1)`.
#[derive(Clone, Debug)]
pub struct LegendreCoeffs<S> {
    pub coeffs: Vec<S>,
    pub k_d: S,
}

impl<S: Scalar> LegendreCoeffs<S> {
    /// Build the coefficient table for one output sample. `u0 = rho0/D`,
    /// `cos_b` the opening-angle cosine, `k_d = k*D`, `order` the requested
    /// truncation (`2..=8`, spec section 4.4).
    pub fn build(u0: S, cos_b: S, k_d: S, order: u8) -> Result<Self, PhaseError> {
        if !(2..=8).contains(&order) {
            return Err(PhaseError::InvalidLegendreOrder(order));
        }
        let two = S::from(2.0).unwrap();
        let g0 = S::one() + u0 * u0 - two * u0 * cos_b;
        let b = two * u0 - two * cos_b;

        let n = order as usize;
        let mut a = vec![S::zero(); n + 1];
        a[0] = g0.sqrt();
        if n >= 1 {
            a[1] = b / (two * a[0]);
        }
        // a_2 satisfies 2*a0*a2 + a1^2 = 1 (coefficient of x^2 on the RHS).
        if n >= 2 {
            a[2] = (S::one() - a[1] * a[1]) / (two * a[0]);
        }
        // For k >= 3, the RHS has no x^k term: sum_{j=0}^{k} a_j*a_{k-j} = 0.
        for k in 3..=n {
            let mut cross = S::zero();
            for j in 1..k {
                cross += a[j] * a[k - j];
            }
            a[k] = -cross / (two * a[0]);
        }

        Ok(Self { coeffs: a, k_d })
    }

    /// Evaluate `psi(x)` by Horner's method.
    pub fn eval(&self, x: S) -> S {
        let mut acc = *self.coeffs.last().unwrap();
        for c in self.coeffs[..self.coeffs.len() - 1].iter().rev() {
            acc = acc * x + *c;
        }
        self.k_d * (acc - S::one())
    }
}
