// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The transform driver: the heart of the core. Turns a [`CalibratedProfile`]
//! plus [`ReconstructionOptions`] into a [`ReconstructedProfile`] by running
//! the discretized stationary-phase Fresnel inversion sum at every in-range
//! output sample.

mod fft_strategy;
mod normalize;
mod strategy;

use std::sync::Mutex;

use log::{debug, trace};
use rayon::prelude::*;
use thiserror::Error;

use crate::data::{
    CalibratedProfile, ProfileError, ReconstructedProfile, ReconstructionOptions, Strategy,
};
use crate::phase::PhaseError;
use crate::planner::{InversionPlan, PlannerError};
use crate::scalar::{Cplx, Scalar};
use crate::solver::SolverError;
use crate::window::WindowError;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Planner(#[from] PlannerError),
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error(transparent)]
    Phase(#[from] PhaseError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error("output sample {0} is out of range: its window span does not fit within the data")]
    OutOfRange(usize),
    #[error("interp_order {0} is invalid for strategy {1:?}")]
    InvalidInterpOrder(u8, Strategy),
    #[error("failed to allocate working buffers for {need_elems} elements")]
    AllocationFailure { need_elems: usize },
    #[error("FFT strategy requires a uniform radial grid: {0}")]
    NonUniformGrid(String),
}

/// Per-sample lifecycle, traced via `log::trace!` as the driver progresses;
/// not retained in the output, but documents the state machine spec section
/// 4.6 names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleStatus {
    Planned,
    InRange,
    SpanAssembled,
    Accumulated,
    Normalized,
    Done,
}

/// Optional per-sample (or per-block) progress callback, invoked with the
/// number of output samples completed so far and the total.
pub type ProgressCallback<'a> = dyn FnMut(usize, usize) + Send + 'a;

/// Run the Fresnel inversion described by `options` over `profile`, at
/// working precision `S`. `CalibratedProfile`/`ReconstructedProfile` are
/// always stored at `f64`; the conversion to/from `S` happens once here, at
/// the API boundary (see [`crate::scalar`]).
pub fn run<S: Scalar + rustfft::FftNum>(
    profile: &CalibratedProfile,
    options: &ReconstructionOptions,
    mut progress: Option<&mut ProgressCallback>,
) -> Result<ReconstructedProfile, DriverError> {
    profile.validate()?;
    let plan = InversionPlan::build(profile, options)?;

    if options.strategy == Strategy::Fft {
        return fft_strategy::run::<S>(profile, options, &plan);
    }

    let lo = options.range.lo_km;
    let hi = options.range.hi_km;
    let indices: Vec<usize> = (0..profile.len())
        .filter(|&i| profile.rho_km[i] >= lo && profile.rho_km[i] <= hi)
        .collect();
    let total = indices.len();
    debug!(
        "transform driver: {total} output samples, strategy {:?}, window {:?}",
        options.strategy, options.window_type
    );

    // Output samples are independent (spec section 5): each index is solved
    // from private scratch (its own window samples, Legendre table and
    // stationary-point search) against read-only input arrays, so the outer
    // loop is safe to run across rayon's worker threads. The progress
    // callback isn't `Sync`, so it's driven through a mutex; contention on it
    // is negligible next to the per-sample solver cost.
    let progress_mutex = progress.as_deref_mut().map(Mutex::new);
    let done_counter = std::sync::atomic::AtomicUsize::new(0);

    let results: Vec<Result<(f64, Cplx<f64>), DriverError>> = indices
        .par_iter()
        .map(|&i| {
            trace!("sample {i}: {:?}", SampleStatus::Planned);
            if !plan.in_range[i] {
                return Err(DriverError::OutOfRange(i));
            }
            trace!("sample {i}: {:?}", SampleStatus::InRange);

            let n_i = plan.n_half_span[i];
            let lo_j = i - n_i;
            let hi_j = i + n_i;

            let half_width: S = S::from(plan.half_width_km[i]).unwrap();
            let delta_rho: S = S::from(profile.delta_rho_km().abs()).unwrap();

            let assembled =
                strategy::assemble_span::<S>(profile, options, i, lo_j, hi_j, half_width)?;
            trace!("sample {i}: {:?}", SampleStatus::SpanAssembled);

            let prefactor = Cplx::new(S::one(), -S::one())
                / (S::from(2.0).unwrap() * S::from(profile.fresnel_scale_km[i]).unwrap());
            let mut t_i = assembled.sum * delta_rho * prefactor;
            trace!("sample {i}: {:?}", SampleStatus::Accumulated);

            if options.normalize {
                let denom = normalize::denominator::<S>(
                    options.strategy,
                    half_width,
                    S::from(profile.fresnel_scale_km[i]).unwrap(),
                    &assembled.psi_values,
                    delta_rho,
                );
                let n_factor = (assembled.conj_sum.norm() * delta_rho.to_f64().unwrap())
                    / denom.norm().to_f64().unwrap();
                if n_factor.is_finite() && n_factor > 0.0 {
                    t_i /= S::from(n_factor).unwrap();
                }
            }
            trace!("sample {i}: {:?}", SampleStatus::Normalized);

            let out = (
                profile.rho_km[i],
                Cplx::new(t_i.re.to_f64().unwrap(), t_i.im.to_f64().unwrap()),
            );
            trace!("sample {i}: {:?}", SampleStatus::Done);

            if let Some(mutex) = &progress_mutex {
                let done = done_counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
                if let Ok(mut cb) = mutex.lock() {
                    cb(done, total);
                }
            }
            Ok(out)
        })
        .collect();

    let mut out_rho = Vec::with_capacity(total);
    let mut out_t: Vec<Cplx<f64>> = Vec::with_capacity(total);
    for r in results {
        let (rho, t) = r?;
        out_rho.push(rho);
        out_t.push(t);
    }

    let mut out_fwd: Vec<Cplx<f64>> = Vec::new();
    if options.run_forward {
        out_fwd = strategy::forward_convolve::<S>(profile, &plan, &indices, &out_rho, &out_t);
    }

    let opening_angles: Vec<f64> = indices
        .iter()
        .map(|&i| profile.ring_opening_angle_rad[i])
        .collect();
    let (raw_tau_threshold, tau_threshold) = noise_floor_tau_thresholds(profile, &plan, &indices);

    Ok(ReconstructedProfile::from_transmittance(
        out_rho,
        out_t,
        &opening_angles,
        if options.run_forward {
            Some(out_fwd)
        } else {
            None
        },
        raw_tau_threshold,
        tau_threshold,
    ))
}

/// Estimate the optical-depth noise floor from the high-frequency scatter of
/// `t_hat` (a proxy for receiver thermal noise, since the diffraction
/// pattern itself varies smoothly across a Fresnel scale): the variance of
/// consecutive differences is twice the per-sample noise power, and
/// averaging over a window of `2*n+1` effectively resolved samples divides
/// that variance by the window's normalized equivalent width times its
/// sample count.
fn noise_floor_tau_thresholds(
    profile: &CalibratedProfile,
    plan: &InversionPlan,
    indices: &[usize],
) -> (f64, f64) {
    let n = profile.t_hat.len();
    if n < 2 || indices.is_empty() {
        return (f64::INFINITY, f64::INFINITY);
    }
    let mut sum_sq = 0.0;
    for w in profile.t_hat.windows(2) {
        let d = w[1] - w[0];
        sum_sq += d.norm_sqr();
    }
    let diff_variance = sum_sq / (n - 1) as f64;
    let noise_power = (diff_variance / 2.0).max(f64::MIN_POSITIVE);

    let mean_sin_b: f64 = indices
        .iter()
        .map(|&i| profile.ring_opening_angle_rad[i].sin().abs())
        .sum::<f64>()
        / indices.len() as f64;
    let mean_span: f64 = indices
        .iter()
        .map(|&i| (2 * plan.n_half_span[i] + 1) as f64)
        .sum::<f64>()
        / indices.len() as f64;

    let raw_tau_threshold = -2.0 * mean_sin_b * noise_power.ln();
    let tau_threshold = raw_tau_threshold + 2.0 * mean_sin_b * mean_span.max(1.0).ln();
    (raw_tau_threshold, tau_threshold)
}
