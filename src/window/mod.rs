// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Window-function library: rectangular, squared-cosine and Kaiser-Bessel
//! (including the modified, edge-vanishing variant), plus each window's
//! normalized-equivalent-width.

mod kaiser_bessel;

pub use kaiser_bessel::{kaiser_bessel, kaiser_bessel_modified};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scalar::Scalar;

/// One of the window functions named in the reconstruction options. Fixed-
/// alpha Kaiser-Bessel variants exist alongside the free-parameter `KBAlpha`
/// / `KBMDAlpha` so that common choices get a compile-time-known normalized
/// equivalent width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum WindowType {
    Rect,
    CosSquared,
    Kb20,
    Kb25,
    Kb35,
    KbMd20,
    KbMd25,
    KbMd35,
    KbAlpha(f64),
    KbMdAlpha(f64),
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum WindowError {
    #[error("window half-width must be positive (got {0})")]
    NonPositiveWidth(f64),
    #[error("Kaiser-Bessel alpha must be non-negative (got {0})")]
    NegativeAlpha(f64),
}

impl WindowType {
    /// Evaluate `w(x; W)` for this window, returning 0 outside the support
    /// `[-W/2, W/2]`.
    pub fn eval<S: Scalar>(&self, x: S, half_width: S) -> Result<S, WindowError> {
        if half_width <= S::zero() {
            return Err(WindowError::NonPositiveWidth(
                half_width.to_f64().unwrap_or(f64::NAN),
            ));
        }
        if x.abs() >= half_width {
            return Ok(S::zero());
        }
        let w = match *self {
            WindowType::Rect => S::one(),
            WindowType::CosSquared => {
                let arg = S::PI() * x / (half_width * S::from(2.0).unwrap());
                arg.cos() * arg.cos()
            }
            WindowType::Kb20 => kaiser_bessel(x, half_width, S::from(2.0).unwrap())?,
            WindowType::Kb25 => kaiser_bessel(x, half_width, S::from(2.5).unwrap())?,
            WindowType::Kb35 => kaiser_bessel(x, half_width, S::from(3.5).unwrap())?,
            WindowType::KbMd20 => kaiser_bessel_modified(x, half_width, S::from(2.0).unwrap())?,
            WindowType::KbMd25 => kaiser_bessel_modified(x, half_width, S::from(2.5).unwrap())?,
            WindowType::KbMd35 => kaiser_bessel_modified(x, half_width, S::from(3.5).unwrap())?,
            WindowType::KbAlpha(alpha) => {
                kaiser_bessel(x, half_width, S::from(alpha).unwrap())?
            }
            WindowType::KbMdAlpha(alpha) => {
                kaiser_bessel_modified(x, half_width, S::from(alpha).unwrap())?
            }
        };
        Ok(w)
    }

    /// The normalized equivalent width `W * (integral w^2) / (integral w)^2`.
    /// Known analytically for `Rect` (1) and `CosSquared` (1.5); computed by
    /// trapezoid quadrature for every other variant (including the
    /// fixed-alpha Kaiser-Bessel windows, whose values are well known but
    /// not worth hard-coding twice).
    pub fn norm_eq<S: Scalar>(&self, half_width: S) -> Result<S, WindowError> {
        match self {
            WindowType::Rect => Ok(S::one()),
            WindowType::CosSquared => Ok(S::from(1.5).unwrap()),
            _ => self.norm_eq_numeric(half_width, 2001),
        }
    }

    fn norm_eq_numeric<S: Scalar>(
        &self,
        half_width: S,
        n_samples: usize,
    ) -> Result<S, WindowError> {
        let w_full = half_width * S::from(2.0).unwrap();
        let dx = w_full / S::from((n_samples - 1) as f64).unwrap();
        let mut integral = S::zero();
        let mut integral_sq = S::zero();
        for i in 0..n_samples {
            let x = -half_width + S::from(i as f64).unwrap() * dx;
            let w = self.eval(x, half_width)?;
            // Trapezoid weight: endpoints count half.
            let weight = if i == 0 || i == n_samples - 1 {
                S::from(0.5).unwrap()
            } else {
                S::one()
            };
            integral += weight * w;
            integral_sq += weight * w * w;
        }
        integral *= dx;
        integral_sq *= dx;
        Ok(w_full * integral_sq / (integral * integral))
    }

    /// Sample this window on an odd-length symmetric grid with spacing
    /// `delta_rho` and half-width `half_width`.
    pub fn sampled_kernel<S: Scalar>(
        &self,
        half_width: S,
        delta_rho: S,
    ) -> Result<Vec<S>, WindowError> {
        if delta_rho <= S::zero() {
            return Err(WindowError::NonPositiveWidth(
                delta_rho.to_f64().unwrap_or(f64::NAN),
            ));
        }
        let n = (half_width / delta_rho).floor().to_usize().unwrap_or(0);
        let mut samples = Vec::with_capacity(2 * n + 1);
        for j in -(n as isize)..=(n as isize) {
            let x = S::from(j as f64).unwrap() * delta_rho;
            samples.push(self.eval(x, half_width)?);
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn all_windows() -> Vec<WindowType> {
        vec![
            WindowType::Rect,
            WindowType::CosSquared,
            WindowType::Kb20,
            WindowType::Kb25,
            WindowType::Kb35,
            WindowType::KbMd20,
            WindowType::KbMd25,
            WindowType::KbMd35,
            WindowType::KbAlpha(1.3),
            WindowType::KbMdAlpha(1.3),
        ]
    }

    #[test]
    fn zero_outside_support() {
        for w in all_windows() {
            let v = w.eval(5.0_f64, 5.0).unwrap();
            assert_abs_diff_eq!(v, 0.0, epsilon = 1e-10);
            let v = w.eval(10.0_f64, 5.0).unwrap();
            assert_abs_diff_eq!(v, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn one_at_origin() {
        for w in all_windows() {
            let v = w.eval(0.0_f64, 5.0).unwrap();
            assert_abs_diff_eq!(v, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn even_function() {
        for w in all_windows() {
            let a = w.eval(1.7_f64, 5.0).unwrap();
            let b = w.eval(-1.7_f64, 5.0).unwrap();
            assert_abs_diff_eq!(a, b, epsilon = 1e-10);
        }
    }

    #[test]
    fn non_negative() {
        for w in all_windows() {
            for i in -49..=49 {
                let x = i as f64 / 10.0;
                let v = w.eval(x, 5.0).unwrap();
                assert!(v >= -1e-10, "{:?} negative at x={}: {}", w, x, v);
            }
        }
    }

    #[test]
    fn rect_norm_eq_is_one() {
        assert_abs_diff_eq!(WindowType::Rect.norm_eq(5.0_f64).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cos_squared_norm_eq_is_one_point_five() {
        assert_abs_diff_eq!(
            WindowType::CosSquared.norm_eq(5.0_f64).unwrap(),
            1.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn kb25_norm_eq_matches_fixture() {
        // End-to-end scenario 3: kb25 on rho in [-10, 10], W = 20, norm_eq =
        // 1.6519208 to 6 decimals.
        let n = WindowType::Kb25.norm_eq(10.0_f64).unwrap();
        assert_abs_diff_eq!(n, 1.6519208, epsilon = 1e-4);
    }

    #[test]
    fn rejects_non_positive_width() {
        assert!(WindowType::Rect.eval(0.0_f64, 0.0).is_err());
        assert!(WindowType::Rect.eval(0.0_f64, -1.0).is_err());
    }

    #[test]
    fn sampled_kernel_is_odd_length() {
        let samples = WindowType::Rect.sampled_kernel(5.0_f64, 0.5).unwrap();
        assert_eq!(samples.len() % 2, 1);
    }
}
