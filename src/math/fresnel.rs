// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fresnel cosine/sine integrals, `C(x) = integral_0^x cos(pi t^2 / 2) dt`
//! and `S(x) = integral_0^x sin(pi t^2 / 2) dt`. Three-region evaluation:
//! convergent power series for `|x| <= 4`, a two-term asymptotic auxiliary
//! `f, g` expansion for `4 < |x| <= 6`, and a three-term asymptotic expansion
//! for `|x| > 6`.

use crate::scalar::Scalar;

const SMALL_LIMIT: f64 = 4.0;
const MID_LIMIT: f64 = 6.0;
const SERIES_TERMS: usize = 40;

/// The Fresnel cosine integral.
pub fn fresnel_c<S: Scalar>(x: S) -> S {
    fresnel_pair(x).0
}

/// The Fresnel sine integral.
pub fn fresnel_s<S: Scalar>(x: S) -> S {
    fresnel_pair(x).1
}

/// Compute `(C(x), S(x))` together; both share the same trig evaluation in
/// the asymptotic branches, so there's no reason to compute them separately.
fn fresnel_pair<S: Scalar>(x: S) -> (S, S) {
    if x.is_nan() {
        return (S::nan(), S::nan());
    }
    if x.is_zero() {
        return (S::zero(), S::zero());
    }
    if x.is_infinite() {
        let half = S::from(0.5).unwrap();
        return if x > S::zero() {
            (half, half)
        } else {
            (-half, -half)
        };
    }
    let sign = if x < S::zero() { -S::one() } else { S::one() };
    let ax = x.abs();
    let small_limit = S::from(SMALL_LIMIT).unwrap();
    let mid_limit = S::from(MID_LIMIT).unwrap();

    let (c, s) = if ax <= small_limit {
        power_series(ax)
    } else if ax <= mid_limit {
        asymptotic(ax, 2)
    } else {
        asymptotic(ax, 3)
    };
    (sign * c, sign * s)
}

/// Direct summation of the defining power series. Converges well for
/// `|x| <= 4` within `SERIES_TERMS` terms.
fn power_series<S: Scalar>(x: S) -> (S, S) {
    let half_pi = S::PI() / (S::one() + S::one());
    let mut c = S::zero();
    let mut s = S::zero();
    let mut term_c = x; // n = 0 term of C: x
    let mut term_s = half_pi * x.powi(3) / S::from(3.0).unwrap(); // n = 0 term of S
    let x4 = x.powi(4);
    for n in 0..SERIES_TERMS {
        c += term_c;
        s += term_s;
        let nf = S::from(n as f64).unwrap();
        // Recurrence from term_n to term_{n+1} for the C series:
        // term_{n+1}/term_n = -(pi/2)^2 * x^4 * (4n+1) / ((4n+5)*(2n+1)*(2n+2))
        let num_c = S::from(4.0 * n as f64 + 1.0).unwrap();
        let den_c = S::from(4.0 * n as f64 + 5.0).unwrap()
            * (S::from(2.0).unwrap() * nf + S::one())
            * (S::from(2.0).unwrap() * nf + S::from(2.0).unwrap());
        term_c = term_c * (-half_pi * half_pi) * x4 * num_c / den_c;

        let num_s = S::from(4.0 * n as f64 + 3.0).unwrap();
        let den_s = S::from(4.0 * n as f64 + 7.0).unwrap()
            * (S::from(2.0).unwrap() * nf + S::from(2.0).unwrap())
            * (S::from(2.0).unwrap() * nf + S::from(3.0).unwrap());
        term_s = term_s * (-half_pi * half_pi) * x4 * num_s / den_s;
    }
    (c, s)
}

/// Asymptotic expansion for large `x`, derived by repeated integration by
/// parts of `integral_x^infinity cos/sin(pi t^2 / 2) dt`. `terms` selects how
/// many correction orders beyond the leading `1/x` term are kept (2 for the
/// `4 < x <= 6` region, 3 for `x > 6`).
fn asymptotic<S: Scalar>(x: S, terms: usize) -> (S, S) {
    let half = S::from(0.5).unwrap();
    let pi = S::PI();
    let u = pi * x * x / (S::one() + S::one());
    let (su, cu) = u.sin_cos();

    let inv_pi_x = S::one() / (pi * x);
    let inv_pi2_x3 = inv_pi_x / (pi * x * x);

    let mut c = half + su * inv_pi_x - cu * inv_pi2_x3;
    let mut s = half - cu * inv_pi_x - su * inv_pi2_x3;

    if terms >= 3 {
        let three = S::from(3.0).unwrap();
        let inv_pi3_x5 = inv_pi2_x3 / (pi * x * x);
        c = c - three * su * inv_pi3_x5;
        s = s + three * cu * inv_pi3_x5;
    }
    (c, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_at_origin() {
        assert_eq!(fresnel_c(0.0_f64), 0.0);
        assert_eq!(fresnel_s(0.0_f64), 0.0);
    }

    #[test]
    fn half_at_infinity() {
        assert_abs_diff_eq!(fresnel_c(f64::INFINITY), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(fresnel_s(f64::INFINITY), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn odd_function() {
        assert_abs_diff_eq!(fresnel_c(1.7_f64), -fresnel_c(-1.7_f64), epsilon = 1e-12);
        assert_abs_diff_eq!(fresnel_s(1.7_f64), -fresnel_s(-1.7_f64), epsilon = 1e-12);
    }

    #[test]
    fn known_value_at_one() {
        // Reference values from standard Fresnel integral tables.
        assert_abs_diff_eq!(fresnel_c(1.0_f64), 0.7798934003, epsilon = 1e-8);
        assert_abs_diff_eq!(fresnel_s(1.0_f64), 0.4382591473, epsilon = 1e-8);
    }

    #[test]
    fn continuous_across_region_boundaries() {
        // The power series and the 2-term asymptotic must agree closely near
        // x = 4, and the 2-term and 3-term asymptotic near x = 6.
        let (c_small, s_small) = power_series(4.0_f64);
        let (c_mid, s_mid) = asymptotic(4.0_f64, 2);
        assert_abs_diff_eq!(c_small, c_mid, epsilon = 1e-4);
        assert_abs_diff_eq!(s_small, s_mid, epsilon = 1e-4);

        let (c_mid6, s_mid6) = asymptotic(6.0_f64, 2);
        let (c_large6, s_large6) = asymptotic(6.0_f64, 3);
        assert_abs_diff_eq!(c_mid6, c_large6, epsilon = 1e-5);
        assert_abs_diff_eq!(s_mid6, s_large6, epsilon = 1e-5);
    }

    #[test]
    fn nan_propagates() {
        assert!(fresnel_c(f64::NAN).is_nan());
        assert!(fresnel_s(f64::NAN).is_nan());
    }
}
