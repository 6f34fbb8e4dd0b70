// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The stationary-phase solver: for a pair of output/integration samples,
//! locate the free azimuth `phi*` at which `d(psi)/d(phi) = 0` by Newton
//! iteration, warm-started from the previous sample's solution.

use thiserror::Error;

use crate::phase::Psi;
use crate::scalar::Scalar;

const MAX_ITERATIONS: usize = 20;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SolverError {
    #[error("stationary-phase solver failed to converge after {0} iterations (last |d(psi)/d(phi)| = {1})")]
    NonConvergence(usize, f64),
    #[error("stationary-phase solver's second derivative vanished at iteration {0}")]
    SingularDerivative(usize),
}

/// Newton-iterate `phi` towards the root of `psi_fn(phi).d1`, starting from
/// `initial_guess` (the previous sample's `phi*`, or `phi0` on the first
/// call — spec section 4.5). Returns the converged `phi*` and the `Psi`
/// evaluated there.
///
/// `tolerance` is compared against `|d1|` scaled by `k_d` (the dominant
/// scale of `psi`), per spec: "a small multiple of machine epsilon scaled
/// by kD".
pub fn find_stationary_point<S: Scalar>(
    mut psi_fn: impl FnMut(S) -> Psi<S>,
    initial_guess: S,
    k_d: S,
) -> Result<(S, Psi<S>), SolverError> {
    let tolerance = S::solver_eps() * k_d.abs().max(S::one());
    let mut phi = initial_guess;
    let mut last_abs_d1 = S::infinity();

    for iter in 0..MAX_ITERATIONS {
        let p = psi_fn(phi);
        last_abs_d1 = p.d1.abs();
        if last_abs_d1 < tolerance {
            return Ok((phi, p));
        }
        if p.d2.is_zero() {
            return Err(SolverError::SingularDerivative(iter));
        }
        // Newton step on d(psi)/d(phi): phi_{n+1} = phi_n - d1/d2.
        phi -= p.d1 / p.d2;
    }

    Err(SolverError::NonConvergence(
        MAX_ITERATIONS,
        last_abs_d1.to_f64().unwrap_or(f64::NAN),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::exact;
    use approx::assert_abs_diff_eq;

    #[test]
    fn finds_phi0_when_u_is_one() {
        // At u = rho/D = 1 the stationary point of the exact phase is
        // exactly phi = phi0 (g1 is proportional to sin(phi-phi0) times a
        // factor that is nonzero only off that point; starting the guess a
        // little off phi0 should still converge onto it).
        let d = 1.0_f64;
        let rho = 1.0;
        let cos_b = 0.6;
        let k_d = 50.0;
        let phi0 = 0.3_f64;
        let (phi_star, _) =
            find_stationary_point(|phi| exact::psi(rho, d, cos_b, k_d, phi, phi0), phi0 + 0.1, k_d)
                .unwrap();
        assert_abs_diff_eq!(phi_star, phi0, epsilon = 1e-8);
    }

    #[test]
    fn converges_from_a_displaced_guess() {
        let d = 1.0_f64;
        let rho = 0.8;
        let cos_b = 0.6;
        let k_d = 200.0;
        let phi0 = 0.0_f64;
        let (phi_star, p) =
            find_stationary_point(|phi| exact::psi(rho, d, cos_b, k_d, phi, phi0), 0.3, k_d)
                .unwrap();
        assert!(p.d1.abs() < 1e-6);
        assert_abs_diff_eq!(phi_star, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn reports_non_convergence_for_a_pathological_function() {
        // d1 oscillates forever without a root the Newton step can find
        // cleanly within the iteration budget: d2 is also periodic and
        // designed to never let the step settle.
        let err = find_stationary_point::<f64>(
            |phi| Psi {
                value: 0.0,
                d1: (phi * 1e3).sin() + 1.0001,
                d2: (phi * 1e3).cos(),
            },
            0.0,
            1.0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SolverError::NonConvergence(..) | SolverError::SingularDerivative(..)
        ));
    }
}
