// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The window-width planner: turns a requested radial resolution and
//! per-sample geometry into a window half-width `W_i` and an integer index
//! span for every output sample, optionally applying the b-factor
//! (finite-frequency-stability) correction via a Lambert-W inversion.

use thiserror::Error;

use crate::data::{CalibratedProfile, ReconstructionOptions};
use crate::math::{lambert_w, DomainError};

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PlannerError {
    #[error("requested resolution {res} km is below the Nyquist limit 2*delta_rho = {limit} km")]
    ResolutionBelowNyquist { res: f64, limit: f64 },
    #[error("use_bfac requires sigma and omega to be set")]
    MissingBfacParams,
    #[error("use_bfac requires rho_dot_kms on the calibrated profile")]
    MissingRhoDot,
    #[error("b-factor equation has no solution at index {index}: y = {y} <= 1")]
    BfacNoSolution { index: usize, y: f64 },
    #[error("b-factor Lambert-W inversion failed to converge at index {index}: {source}")]
    BfacDomain { index: usize, source: DomainError },
}

/// Per-sample output of the window-width planner, ready for the transform
/// driver to consume.
#[derive(Clone, Debug)]
pub struct InversionPlan {
    /// Window half-width \[km\] at each sample in the full profile.
    pub half_width_km: Vec<f64>,
    /// Integer index half-span `n_i` at each sample, i.e. the covered index
    /// range is `[i - n_i, i + n_i]`.
    pub n_half_span: Vec<usize>,
    /// Whether the span at each sample lies entirely inside the data range.
    pub in_range: Vec<bool>,
    /// `k * D` at each sample, precomputed once for the phase module.
    pub k_d: Vec<f64>,
}

impl InversionPlan {
    /// Build a plan for every sample in `profile`, given `options`.
    pub fn build(
        profile: &CalibratedProfile,
        options: &ReconstructionOptions,
    ) -> Result<Self, PlannerError> {
        let delta_rho = profile.delta_rho_km().abs();
        let limit = 2.0 * delta_rho;
        if options.res_km < limit {
            return Err(PlannerError::ResolutionBelowNyquist {
                res: options.res_km,
                limit,
            });
        }

        let n = profile.len();
        let mut half_width_km = Vec::with_capacity(n);

        if options.use_bfac {
            let sigma = options.sigma.ok_or(PlannerError::MissingBfacParams)?;
            let omega = options.omega.ok_or(PlannerError::MissingBfacParams)?;
            let rho_dot = profile
                .rho_dot_kms
                .as_ref()
                .ok_or(PlannerError::MissingRhoDot)?;
            for i in 0..n {
                let w = bfac_width(
                    profile.fresnel_scale_km[i],
                    options.res_km,
                    sigma,
                    omega,
                    rho_dot[i],
                    i,
                )?;
                half_width_km.push(w);
            }
        } else {
            for i in 0..n {
                half_width_km.push(standard_width(profile.fresnel_scale_km[i], options.res_km));
            }
        }

        let mut n_half_span = Vec::with_capacity(n);
        let mut in_range = Vec::with_capacity(n);
        for i in 0..n {
            let n_i = (half_width_km[i] / (2.0 * delta_rho)).floor() as isize;
            let n_i = n_i.max(0) as usize;
            n_half_span.push(n_i);
            let lo_ok = i.checked_sub(n_i).is_some();
            let hi_ok = i + n_i < n;
            in_range.push(lo_ok && hi_ok);
        }

        let k_d = profile.k_d_rad.clone();

        Ok(Self {
            half_width_km,
            n_half_span,
            in_range,
            k_d,
        })
    }
}

/// `W = 2*F^2/res`, the standard (non-b-factor) form.
fn standard_width(fresnel_scale_km: f64, res_km: f64) -> f64 {
    2.0 * fresnel_scale_km * fresnel_scale_km / res_km
}

/// Solve `res = (2*F^2/W) * (b^2/2) / (e^-b + b - 1)` for `W`, where
/// `b = omega^2 * sigma^2 * W / (2*rho_dot)`.
///
/// Substituting `W = 2*rho_dot*b/(omega^2*sigma^2)` into the defining
/// equation collapses it to the single-variable form `y = b/(e^-b + b - 1)`
/// with `y = 2*res*rho_dot/(F^2*omega^2*sigma^2)`, which spec section 4.3
/// inverts via `P = y/(1-y)`, `b = W_lambert(P*e^P) - P` (principal branch).
/// A solution exists only for `y > 1`.
fn bfac_width(
    fresnel_scale_km: f64,
    res_km: f64,
    sigma: f64,
    omega: f64,
    rho_dot_kms: f64,
    index: usize,
) -> Result<f64, PlannerError> {
    let rho_dot = rho_dot_kms.abs();
    let denom = fresnel_scale_km * fresnel_scale_km * omega * omega * sigma * sigma;
    let y = 2.0 * res_km * rho_dot / denom;
    if y <= 1.0 {
        return Err(PlannerError::BfacNoSolution { index, y });
    }
    let p = y / (1.0 - y);
    // p is negative here (y > 1 implies 1 - y < 0); the principal branch of
    // Lambert W is still defined provided p*e^p >= -1/e, which holds for any
    // finite p < 0 with |p| not enormous (true for physically reasonable
    // sigma/omega/res combinations).
    let w_arg = p * p.exp();
    let b = lambert_w(w_arg).map_err(|source| PlannerError::BfacDomain { index, source })? - p;
    Ok((2.0 * rho_dot * b / (omega * omega * sigma * sigma)).abs())
}

/// Evaluate the b-factor defining equation `res = (2F^2/W) * (b^2/2) /
/// (e^-b + b - 1)` forward, for the round-trip test in section 8.
#[cfg(test)]
fn bfac_res_from_width(fresnel_scale_km: f64, w_km: f64, sigma: f64, omega: f64, rho_dot_kms: f64) -> f64 {
    let b = omega * omega * sigma * sigma * w_km / (2.0 * rho_dot_kms.abs());
    (2.0 * fresnel_scale_km * fresnel_scale_km / w_km) * (b * b / 2.0) / ((-b).exp() + b - 1.0)
}
