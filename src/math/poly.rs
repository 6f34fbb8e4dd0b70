// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Horner-scheme polynomial evaluation and derivative-by-coefficient-shift,
//! shared by the Legendre phase expansion and the perturbation polynomial.

use crate::scalar::Scalar;

/// Evaluate `c[0] + c[1]*x + c[2]*x^2 + ...` with Horner's scheme.
pub fn poly_eval<S: Scalar>(coeffs: &[S], x: S) -> S {
    coeffs
        .iter()
        .rev()
        .fold(S::zero(), |acc, &c| acc * x + c)
}

/// Coefficients of the derivative of the polynomial with coefficients
/// `coeffs` (lowest order first), i.e. `[c1, 2*c2, 3*c3, ...]`.
pub fn poly_deriv_coeffs<S: Scalar>(coeffs: &[S]) -> Vec<S> {
    if coeffs.len() <= 1 {
        return Vec::new();
    }
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &c)| c * S::from(i).unwrap())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn eval_matches_direct_computation() {
        // 1 + 2x + 3x^2 at x = 2 => 1 + 4 + 12 = 17
        let coeffs = [1.0_f64, 2.0, 3.0];
        assert_abs_diff_eq!(poly_eval(&coeffs, 2.0), 17.0);
    }

    #[test]
    fn derivative_shifts_coefficients() {
        let coeffs = [1.0_f64, 2.0, 3.0, 4.0];
        let d = poly_deriv_coeffs(&coeffs);
        assert_eq!(d, vec![2.0, 6.0, 12.0]);
    }

    #[test]
    fn derivative_of_constant_is_empty() {
        let coeffs = [5.0_f64];
        assert!(poly_deriv_coeffs(&coeffs).is_empty());
    }
}
