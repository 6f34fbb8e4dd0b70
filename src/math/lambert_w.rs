// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The principal branch of the Lambert `W` function, the inverse of
//! `t * exp(t)`, defined for `x >= -1/e`.

use crate::math::DomainError;
use crate::scalar::Scalar;

const MAX_ITER: usize = 100;

/// Solve `w * exp(w) = x` for `w`, returning the principal branch.
///
/// Starting guess: `log(x / log(x))` for `x > 2`, `x` otherwise, except very
/// close to the branch point `x = -1/e` where the bare guess makes Halley's
/// method converge glacially; there a perturbative expansion in
/// `p = sqrt(2*(e*x + 1))` is used instead. Returns `-1` exactly at the
/// branch point, `Err(DomainError)` below it.
pub fn lambert_w<S: Scalar>(x: S) -> Result<S, DomainError> {
    if x.is_nan() {
        return Err(DomainError::Nan);
    }
    let neg_inv_e = -S::one() / S::E();
    if x < neg_inv_e {
        return Err(DomainError::LambertWBelowBranchPoint(
            x.to_f64().unwrap_or(f64::NAN),
        ));
    }
    if (x - neg_inv_e).abs() <= S::epsilon() * S::from(1.0e8).unwrap() {
        return Ok(-S::one());
    }
    if x.is_infinite() {
        return Ok(S::infinity());
    }

    let two = S::from(2.0).unwrap();
    let near_branch = S::from(0.02).unwrap();

    let mut w = if (x - neg_inv_e).abs() < near_branch {
        let p = (two * (S::E() * x + S::one())).max(S::zero()).sqrt();
        -S::one() + p - p * p / S::from(3.0).unwrap()
            + S::from(11.0).unwrap() * p.powi(3) / S::from(72.0).unwrap()
    } else if x > two {
        let lx = x.ln();
        (x / lx).ln()
    } else {
        x
    };

    for _ in 0..MAX_ITER {
        let ew = w.exp();
        let f = w * ew - x;
        let denom = ew * (w + S::one()) - (w + two) * f / (two * w + two);
        if denom.is_zero() || denom.is_nan() {
            break;
        }
        let delta = f / denom;
        if delta.is_nan() {
            break;
        }
        w -= delta;
        if delta.abs() <= S::solver_eps() * (S::one() + w.abs()) {
            break;
        }
    }
    Ok(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn known_value_at_one() {
        assert_abs_diff_eq!(
            lambert_w(1.0_f64).unwrap(),
            0.5671432904097838,
            epsilon = 1e-12
        );
    }

    #[test]
    fn exact_at_branch_point() {
        let neg_inv_e = -1.0_f64 / std::f64::consts::E;
        assert_abs_diff_eq!(lambert_w(neg_inv_e).unwrap(), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn domain_error_below_branch_point() {
        let neg_inv_e = -1.0_f64 / std::f64::consts::E;
        assert!(lambert_w(neg_inv_e - 0.01).is_err());
    }

    #[test]
    fn round_trips_over_range() {
        let mut x = -1.0_f64;
        while x <= 50.0 {
            let z = x * x.exp();
            let w = lambert_w(z).unwrap();
            assert_abs_diff_eq!(w, x, epsilon = 1e-9);
            x += 0.37;
        }
    }

    #[test]
    fn nan_is_domain_error() {
        assert!(lambert_w(f64::NAN).is_err());
    }

    #[test]
    fn infinity_maps_to_infinity() {
        // Open question noted in DESIGN.md: the legacy "Resolution_Inverse"
        // returned 0 here; the calculus implies +inf, which is what this
        // implementation returns.
        assert!(lambert_w(f64::INFINITY).unwrap().is_infinite());
    }
}
