// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `erf`/`erfc` via the Abramowitz & Stegun 7.1.26 rational approximation
//! (accurate to ~1.5e-7, single-precision grade). `erf`/`erfc` aren't on the
//! hot path of the transform driver (they back-stop the Gaussian-envelope
//! machinery some window/forward-model variants use), so this trades a
//! little accuracy for a closed-form, allocation-free evaluation.

use crate::scalar::Scalar;

pub fn erf<S: Scalar>(x: S) -> S {
    if x.is_nan() {
        return S::nan();
    }
    let sign = if x < S::zero() { -S::one() } else { S::one() };
    let ax = x.abs();
    let p = S::from(0.3275911).unwrap();
    let t = S::one() / (S::one() + p * ax);
    let poly = t
        * (S::from(0.254829592).unwrap()
            + t * (S::from(-0.284496736).unwrap()
                + t * (S::from(1.421413741).unwrap()
                    + t * (S::from(-1.453152027).unwrap() + t * S::from(1.061405429).unwrap()))));
    sign * (S::one() - poly * (-ax * ax).exp())
}

pub fn erfc<S: Scalar>(x: S) -> S {
    S::one() - erf(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_at_origin() {
        assert_abs_diff_eq!(erf(0.0_f64), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn approaches_one_at_infinity() {
        assert_abs_diff_eq!(erf(6.0_f64), 1.0, epsilon = 1e-7);
    }

    #[test]
    fn odd_function() {
        assert_abs_diff_eq!(erf(0.7_f64), -erf(-0.7_f64), epsilon = 1e-12);
    }

    #[test]
    fn erf_plus_erfc_is_one() {
        assert_abs_diff_eq!(erf(1.3_f64) + erfc(1.3_f64), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn known_value() {
        assert_abs_diff_eq!(erf(1.0_f64), 0.8427007929, epsilon = 1.5e-7);
    }
}
