// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Kaiser-Bessel and modified Kaiser-Bessel window kernels.

use super::WindowError;
use crate::math::bessel_i0;
use crate::scalar::Scalar;

/// `I0(alpha * pi * sqrt(1 - (2x/W)^2)) / I0(alpha * pi)`.
///
/// Caller guarantees `|x| < half_width` (checked by [`super::WindowType::eval`]
/// before dispatch); `alpha = 0` reduces to the rectangular window.
pub fn kaiser_bessel<S: Scalar>(x: S, half_width: S, alpha: S) -> Result<S, WindowError> {
    if alpha < S::zero() {
        return Err(WindowError::NegativeAlpha(alpha.to_f64().unwrap_or(f64::NAN)));
    }
    if alpha.is_zero() {
        return Ok(S::one());
    }
    let ratio = x / half_width * S::from(2.0).unwrap();
    let arg = alpha * S::PI() * (S::one() - ratio * ratio).max(S::zero()).sqrt();
    Ok(bessel_i0(arg) / bessel_i0(alpha * S::PI()))
}

/// `(I0(alpha*pi*sqrt(1-(2x/W)^2)) - 1) / (I0(alpha*pi) - 1)`.
///
/// Vanishes at the edges of its support rather than just at `|x| = W/2`.
/// `alpha` must be strictly positive: at `alpha = 0` the denominator is zero.
pub fn kaiser_bessel_modified<S: Scalar>(
    x: S,
    half_width: S,
    alpha: S,
) -> Result<S, WindowError> {
    if alpha <= S::zero() {
        return Err(WindowError::NegativeAlpha(alpha.to_f64().unwrap_or(f64::NAN)));
    }
    let ratio = x / half_width * S::from(2.0).unwrap();
    let arg = alpha * S::PI() * (S::one() - ratio * ratio).max(S::zero()).sqrt();
    let denom = bessel_i0(alpha * S::PI()) - S::one();
    Ok((bessel_i0(arg) - S::one()) / denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn kb_one_at_origin() {
        let v = kaiser_bessel(0.0_f64, 5.0, 2.5).unwrap();
        assert_abs_diff_eq!(v, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn kb_alpha_zero_is_rect() {
        let v = kaiser_bessel(1.0_f64, 5.0, 0.0).unwrap();
        assert_abs_diff_eq!(v, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn kbmd_one_at_origin() {
        let v = kaiser_bessel_modified(0.0_f64, 5.0, 2.5).unwrap();
        assert_abs_diff_eq!(v, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn kbmd_vanishes_at_edges() {
        // At x -> W/2, the I0 argument -> 0, so I0 -> 1 and the numerator
        // vanishes (this is what distinguishes it from the un-modified KB).
        let v = kaiser_bessel_modified(4.999999_f64, 5.0, 2.5).unwrap();
        assert!(v.abs() < 1e-4);
    }

    #[test]
    fn rejects_negative_alpha() {
        assert!(kaiser_bessel(0.0_f64, 5.0, -1.0).is_err());
        assert!(kaiser_bessel_modified(0.0_f64, 5.0, -1.0).is_err());
    }

    #[test]
    fn rejects_zero_alpha_for_modified() {
        assert!(kaiser_bessel_modified(0.0_f64, 5.0, 0.0).is_err());
    }
}
