// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The FFT-accelerated path for the `Fft` strategy (spec section 4.6):
//! valid only for the quadratic (Fresnel) kernel on a uniform radial grid,
//! where the convolution kernel depends on `j - i` alone. Replaces the
//! per-sample convolution with a single forward FFT, a pointwise multiply
//! against the Fresnel-kernel spectrum, and an inverse FFT.

use log::debug;
use rustfft::{num_complex::Complex as RustComplex, FftNum, FftPlanner};

use super::DriverError;
use crate::data::{CalibratedProfile, ReconstructedProfile, ReconstructionOptions};
use crate::planner::InversionPlan;
use crate::scalar::{Cplx, Scalar};

/// Relative tolerance on sample spacing for a grid to be considered
/// "uniform" enough for the FFT path.
const UNIFORMITY_TOLERANCE: f64 = 1e-6;

pub fn run<S: Scalar + FftNum>(
    profile: &CalibratedProfile,
    options: &ReconstructionOptions,
    plan: &InversionPlan,
) -> Result<ReconstructedProfile, DriverError> {
    let delta_rho = profile.delta_rho_km().abs();
    for w in profile.rho_km.windows(2) {
        let spacing = (w[1] - w[0]).abs();
        if ((spacing - delta_rho) / delta_rho).abs() > UNIFORMITY_TOLERANCE {
            return Err(DriverError::NonUniformGrid(format!(
                "spacing {spacing} km deviates from the nominal {delta_rho} km by more than {UNIFORMITY_TOLERANCE}"
            )));
        }
    }

    let n = profile.len();
    let max_span = plan.n_half_span.iter().copied().max().unwrap_or(0);
    let fft_len = (n + 2 * max_span).next_power_of_two();
    debug!("FFT strategy: n={n}, max_span={max_span}, fft_len={fft_len}");

    // Position-invariant Fresnel scale and window, evaluated at the
    // profile's midpoint (spec: "windowing uses a position-invariant
    // approximation").
    let mid = n / 2;
    let fresnel_scale = S::from(profile.fresnel_scale_km[mid]).unwrap();
    let half_width = S::from(plan.half_width_km[mid]).unwrap();
    let delta_rho_s = S::from(delta_rho).unwrap();

    let kernel_samples = options
        .window_type
        .sampled_kernel(half_width, delta_rho_s)?;
    let kernel_half = (kernel_samples.len() - 1) / 2;

    let mut kernel_buf = vec![RustComplex::new(S::zero(), S::zero()); fft_len];
    for (off, &w) in kernel_samples.iter().enumerate() {
        let offset = off as isize - kernel_half as isize;
        let psi =
            S::PI() / S::from(2.0).unwrap() * (S::from(offset as f64).unwrap() * delta_rho_s / fresnel_scale)
                * (S::from(offset as f64).unwrap() * delta_rho_s / fresnel_scale);
        let (s, c) = psi.sin_cos();
        let kernel_val = RustComplex::new(w * c, -(w * s)); // w * exp(-i*psi)
        let idx = offset.rem_euclid(fft_len as isize) as usize;
        kernel_buf[idx] = kernel_val;
    }

    let mut data_buf = vec![RustComplex::new(S::zero(), S::zero()); fft_len];
    for (idx, t_hat) in profile.t_hat.iter().enumerate() {
        data_buf[idx] = RustComplex::new(S::from(t_hat.re).unwrap(), S::from(t_hat.im).unwrap());
    }

    let mut planner = FftPlanner::<S>::new();
    let fwd = planner.plan_fft_forward(fft_len);
    let inv = planner.plan_fft_inverse(fft_len);

    fwd.process(&mut data_buf);
    fwd.process(&mut kernel_buf);
    for (d, k) in data_buf.iter_mut().zip(kernel_buf.iter()) {
        *d *= *k;
    }
    inv.process(&mut data_buf);
    let norm = S::from(fft_len as f64).unwrap();

    let prefactor = Cplx::new(S::one(), -S::one()) / (S::from(2.0).unwrap() * fresnel_scale);

    let lo = options.range.lo_km;
    let hi = options.range.hi_km;
    let mut out_rho = Vec::new();
    let mut out_t = Vec::new();
    for i in 0..n {
        if !plan.in_range[i] {
            continue;
        }
        if profile.rho_km[i] < lo || profile.rho_km[i] > hi {
            continue;
        }
        let raw = data_buf[i] / norm;
        let t_i = Cplx::new(raw.re, raw.im) * delta_rho_s * prefactor;
        out_rho.push(profile.rho_km[i]);
        out_t.push(Cplx::new(
            t_i.re.to_f64().unwrap(),
            t_i.im.to_f64().unwrap(),
        ));
    }

    let opening_angles: Vec<f64> = (0..n)
        .filter(|&i| plan.in_range[i] && profile.rho_km[i] >= lo && profile.rho_km[i] <= hi)
        .map(|i| profile.ring_opening_angle_rad[i])
        .collect();

    Ok(ReconstructedProfile::from_transmittance(
        out_rho,
        out_t,
        &opening_angles,
        None,
        f64::INFINITY,
        f64::INFINITY,
    ))
}
