// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `BesselJ0` and `BesselI0`, accurate over the whole real line via the
//! classic Abramowitz & Stegun polynomial approximations: a near-origin
//! power-series-derived polynomial, and an amplitude/phase (resp. scaled
//! exponential) asymptotic form beyond the transition radius.

use crate::scalar::Scalar;

/// Zeroth-order Bessel function of the first kind, `J0(x)`.
///
/// Uses the A&S 9.4.1 polynomial for `|x| <= 3` and the A&S 9.4.3
/// amplitude/phase asymptotic form beyond it. NaN propagates to NaN; there is
/// no domain restriction (`J0` is entire).
pub fn bessel_j0<S: Scalar>(x: S) -> S {
    if x.is_nan() {
        return S::nan();
    }
    let ax = x.abs();
    let three = S::from(3.0).unwrap();
    if ax <= three {
        let t = (x / three) * (x / three);
        horner(
            &[
                1.0,
                -2.2499997,
                1.2656208,
                -0.3163866,
                0.0444479,
                -0.0039444,
                0.0002100,
            ],
            t,
        )
    } else {
        let t = three / ax;
        let f0 = horner(
            &[
                0.79788456,
                -0.00000077,
                -0.00552740,
                -0.00009512,
                0.00137237,
                -0.00072805,
                0.00014476,
            ],
            t,
        );
        let theta0 = ax
            - S::from(0.78539816).unwrap()
            + t * horner(
                &[
                    -0.04166397,
                    -0.00003954,
                    0.00262573,
                    -0.00054125,
                    -0.00029333,
                    0.00013558,
                ],
                t,
            );
        f0 * theta0.cos() / ax.sqrt()
    }
}

/// Zeroth-order modified Bessel function of the first kind, `I0(x)`.
///
/// Uses the A&S 9.8.1 polynomial for `|x| <= 3.75` and the A&S 9.8.2 scaled
/// exponential asymptotic form beyond it. `I0` is even and entire; NaN
/// propagates to NaN.
pub fn bessel_i0<S: Scalar>(x: S) -> S {
    if x.is_nan() {
        return S::nan();
    }
    let ax = x.abs();
    let threshold = S::from(3.75).unwrap();
    if ax <= threshold {
        let t = (x / threshold) * (x / threshold);
        horner(
            &[
                1.0,
                3.5156229,
                3.0899424,
                1.2067492,
                0.2659732,
                0.0360768,
                0.0045813,
            ],
            t,
        )
    } else {
        let t = threshold / ax;
        let poly = horner(
            &[
                0.39894228,
                0.01328592,
                0.00225319,
                -0.00157565,
                0.00916281,
                -0.02057706,
                0.02635537,
                -0.01647633,
                0.00392377,
            ],
            t,
        );
        ax.exp() / ax.sqrt() * poly
    }
}

/// Horner evaluation against literal `f64` coefficients, promoted to `S`.
fn horner<S: Scalar>(coeffs: &[f64], x: S) -> S {
    coeffs
        .iter()
        .rev()
        .fold(S::zero(), |acc, &c| acc * x + S::from(c).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn j0_at_zero_is_one() {
        assert_abs_diff_eq!(bessel_j0(0.0_f64), 1.0, epsilon = 1e-7);
    }

    #[test]
    fn j0_first_zero_near_2_4048() {
        assert_abs_diff_eq!(bessel_j0(2.4048255_f64), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn j0_is_even() {
        assert_abs_diff_eq!(bessel_j0(5.3_f64), bessel_j0(-5.3_f64), epsilon = 1e-10);
    }

    #[test]
    fn j0_large_argument_decays() {
        assert!(bessel_j0(1000.0_f64).abs() < 0.1);
    }

    #[test]
    fn i0_at_zero_is_one() {
        assert_abs_diff_eq!(bessel_i0(0.0_f64), 1.0, epsilon = 1e-7);
    }

    #[test]
    fn i0_is_even() {
        assert_abs_diff_eq!(bessel_i0(4.0_f64), bessel_i0(-4.0_f64), epsilon = 1e-10);
    }

    #[test]
    fn i0_grows_like_scaled_exponential() {
        // I0(x) ~ e^x / sqrt(2 pi x) for large x.
        let x = 20.0_f64;
        let approx = x.exp() / (2.0 * std::f64::consts::PI * x).sqrt();
        assert_abs_diff_eq!(bessel_i0(x) / approx, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn nan_propagates() {
        assert!(bessel_j0(f64::NAN).is_nan());
        assert!(bessel_i0(f64::NAN).is_nan());
    }
}
