// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-sample span assembly: dispatches to the phase model named by
//! [`Strategy`], accumulates the discretized inversion sum, and (for the
//! stationary-phase strategies) drives [`crate::solver`] with a warm-started
//! initial guess carried across the span.

use super::DriverError;
use crate::data::{CalibratedProfile, InterpOrder, ReconstructionOptions, Strategy};
use crate::phase::{elliptic, exact, legendre, perturbed, quadratic, Psi};
use crate::planner::InversionPlan;
use crate::scalar::{Cplx, Scalar};
use crate::solver::find_stationary_point;

pub struct AssembledSpan<S> {
    /// `sum_j t_hat_j * w[j-i] * exp(-i*psi_ij)`.
    pub sum: Cplx<S>,
    /// `sum_j w[j-i] * exp(i*psi_ij)`, the normalization numerator.
    pub conj_sum: Cplx<S>,
    /// `psi_ij` at every `j` in the span, for the numeric normalization
    /// denominator.
    pub psi_values: Vec<S>,
}

#[allow(clippy::too_many_arguments)]
pub fn assemble_span<S: Scalar>(
    profile: &CalibratedProfile,
    options: &ReconstructionOptions,
    i: usize,
    lo_j: usize,
    hi_j: usize,
    half_width: S,
) -> Result<AssembledSpan<S>, DriverError> {
    let delta_rho = S::from(profile.delta_rho_km().abs()).unwrap();
    let rho_i = S::from(profile.rho_km[i]).unwrap();
    let d_i = S::from(profile.spacecraft_distance_km[i]).unwrap();
    let cos_b_i = S::from(profile.ring_opening_angle_rad[i]).unwrap().cos();
    let k_d_i = S::from(profile.k_d_rad[i]).unwrap();
    let phi0_i = S::from(profile.phi_rad[i]).unwrap();

    let n_span = hi_j - lo_j + 1;
    let mut psi_values = Vec::with_capacity(n_span);

    // Anchor spacing for the interpolated stationary-phase strategies: 1
    // means every column is solved exactly (InterpOrder::Exact).
    let step = match options.interp_order {
        InterpOrder::Exact => 1,
        other => other.order() as usize,
    };
    let needs_solver = matches!(
        options.strategy,
        Strategy::Newton | Strategy::PerturbedNewton | Strategy::EllipticNewton
    );
    if needs_solver && step == 0 {
        return Err(DriverError::InvalidInterpOrder(0, options.strategy));
    }

    let mut anchors: Vec<(S, S)> = Vec::new();
    let mut warm_start = phi0_i;

    let mut sum = Cplx::new(S::zero(), S::zero());
    let mut conj_sum = Cplx::new(S::zero(), S::zero());

    // Precomputed once per output sample (spec section 4.4): depends only on
    // `i`'s own geometry, not on the integration column `j`.
    let legendre_table = match options.strategy {
        Strategy::Legendre(order) => {
            let u0 = rho_i / d_i;
            Some(legendre::LegendreCoeffs::build(u0, cos_b_i, k_d_i, order)?)
        }
        _ => None,
    };

    for (local, j) in (lo_j..=hi_j).enumerate() {
        let x = S::from((j as isize - i as isize) as f64).unwrap() * delta_rho;
        let w = options.window_type.eval(x, half_width)?;

        let rho_j = S::from(profile.rho_km[j]).unwrap();
        let is_anchor = local % step == 0 || j == hi_j;

        let psi_value = match options.strategy {
            Strategy::Fresnel | Strategy::Fft => {
                quadratic(rho_j, rho_i, S::from(profile.fresnel_scale_km[i]).unwrap())
            }
            Strategy::Legendre(_) => legendre_table
                .as_ref()
                .expect("legendre_table is built above whenever strategy is Legendre")
                .eval((rho_j - rho_i) / d_i),
            Strategy::Newton if is_anchor => {
                let phi_j = S::from(profile.phi_rad[j]).unwrap();
                let (phi_star, p) = find_stationary_point(
                    |phi| exact::psi(rho_j, d_i, cos_b_i, k_d_i, phi, phi_j),
                    warm_start,
                    k_d_i,
                )?;
                warm_start = phi_star;
                anchors.push((rho_j, p.value));
                p.value
            }
            Strategy::PerturbedNewton if is_anchor => {
                let phi_j = S::from(profile.phi_rad[j]).unwrap();
                let (phi_star, _) = find_stationary_point(
                    |phi| exact::psi(rho_j, d_i, cos_b_i, k_d_i, phi, phi_j),
                    warm_start,
                    k_d_i,
                )?;
                warm_start = phi_star;
                let p = perturbed::psi(
                    rho_j,
                    rho_i,
                    d_i,
                    cos_b_i,
                    k_d_i,
                    phi_star,
                    phi_j,
                    &options.perturbation,
                );
                anchors.push((rho_j, p.value));
                p.value
            }
            Strategy::EllipticNewton if is_anchor => {
                let phi_j = S::from(profile.phi_rad[j]).unwrap();
                let ecc = S::from(options.elliptic.ecc).unwrap();
                let peri = S::from(options.elliptic.peri_rad).unwrap();
                let (phi_star, p) = find_stationary_point(
                    |phi| elliptic::psi(rho_j, d_i, cos_b_i, k_d_i, phi, phi_j, ecc, peri),
                    warm_start,
                    k_d_i,
                )?;
                warm_start = phi_star;
                anchors.push((rho_j, p.value));
                p.value
            }
            Strategy::Newton | Strategy::PerturbedNewton | Strategy::EllipticNewton => {
                // Not an anchor: interpolate from the nearest solved points.
                interpolate_lagrange(&anchors, rho_j)
            }
        };

        psi_values.push(psi_value);
        let (sin_p, cos_p) = psi_value.sin_cos();
        let kernel_fwd = Cplx::new(cos_p, -sin_p); // exp(-i*psi)
        let kernel_bwd = Cplx::new(cos_p, sin_p); // exp(+i*psi)

        let t_hat_j = Cplx::new(
            S::from(profile.t_hat[j].re).unwrap(),
            S::from(profile.t_hat[j].im).unwrap(),
        );
        sum += t_hat_j * w * kernel_fwd;
        conj_sum += Cplx::new(w, S::zero()) * kernel_bwd;
    }

    Ok(AssembledSpan {
        sum,
        conj_sum,
        psi_values,
    })
}

/// Lagrange-interpolate `psi(rho)` from the nearest solved anchors. Uses at
/// most the 4 anchors closest to `rho` (matching `interp_order`'s maximum of
/// 4), falling back to the single nearest anchor if fewer are available.
fn interpolate_lagrange<S: Scalar>(anchors: &[(S, S)], rho: S) -> S {
    if anchors.is_empty() {
        return S::zero();
    }
    let mut sorted: Vec<&(S, S)> = anchors.iter().collect();
    sorted.sort_by(|a, b| {
        (a.0 - rho)
            .abs()
            .partial_cmp(&(b.0 - rho).abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let take = sorted.len().min(4);
    let nodes = &sorted[..take];

    let mut result = S::zero();
    for (k, &&(xk, yk)) in nodes.iter().enumerate() {
        let mut term = yk;
        for (m, &&(xm, _)) in nodes.iter().enumerate() {
            if m != k {
                term *= (rho - xm) / (xk - xm);
            }
        }
        result += term;
    }
    result
}

/// A direct (no stationary-phase search) forward convolution of the
/// reconstructed `out_t` with the quadratic Fresnel kernel, used as the
/// `run_forward` self-check (spec section 4.6, point 6). Columns outside
/// `indices` (i.e. not reconstructed because they fell outside
/// `options.range`) are treated as contributing zero.
pub fn forward_convolve<S: Scalar>(
    profile: &CalibratedProfile,
    plan: &InversionPlan,
    indices: &[usize],
    out_rho: &[f64],
    out_t: &[Cplx<f64>],
) -> Vec<Cplx<f64>> {
    let mut lookup = vec![None; profile.len()];
    for (&i, &t) in indices.iter().zip(out_t.iter()) {
        lookup[i] = Some(t);
    }

    let delta_rho = profile.delta_rho_km().abs();
    let mut out_fwd = Vec::with_capacity(indices.len());
    for (&i, &rho_i) in indices.iter().zip(out_rho.iter()) {
        let n_i = plan.n_half_span[i];
        let lo_j = i.saturating_sub(n_i);
        let hi_j = (i + n_i).min(profile.len() - 1);
        let half_width = plan.half_width_km[i];
        let fresnel_scale = profile.fresnel_scale_km[i];

        // Always uses a rectangular window: the self-check is meant to
        // recover t_hat's own magnitude convention, not replicate whichever
        // window the inversion itself used.
        let mut acc = Cplx::new(0.0_f64, 0.0);
        for j in lo_j..=hi_j {
            let Some(t_j) = lookup[j] else { continue };
            let x = (j as f64 - i as f64) * delta_rho;
            let Ok(w) = crate::window::WindowType::Rect.eval(x, half_width) else {
                continue;
            };
            let psi =
                std::f64::consts::PI / 2.0 * ((rho_i - profile.rho_km[j]) / fresnel_scale).powi(2);
            let kernel = Cplx::new(psi.cos(), psi.sin());
            acc += t_j * w * kernel;
        }
        let prefactor = Cplx::new(1.0, 1.0) / (2.0 * fresnel_scale);
        out_fwd.push(acc * delta_rho * prefactor);
    }
    out_fwd
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn lagrange_interpolation_is_exact_for_linear_anchors() {
        let anchors = vec![(0.0_f64, 1.0), (1.0, 3.0), (2.0, 5.0)];
        let v = interpolate_lagrange(&anchors, 1.5);
        assert_abs_diff_eq!(v, 4.0, epsilon = 1e-10);
    }

    #[test]
    fn lagrange_interpolation_handles_single_anchor() {
        let anchors = vec![(0.0_f64, 7.0)];
        let v = interpolate_lagrange(&anchors, 3.0);
        assert_abs_diff_eq!(v, 7.0, epsilon = 1e-10);
    }
}
