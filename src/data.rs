// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The data model: [`CalibratedProfile`] in, [`ReconstructedProfile`] out,
//! [`ReconstructionOptions`] in between. Per-sample geometry is stored
//! struct-of-arrays, matching the access pattern of the transform driver's
//! hot loop, which reads each field across a contiguous index span.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scalar::{Cplx, Precision};
use crate::window::WindowType;

/// A calibrated diffracted amplitude profile, struct-of-arrays, immutable
/// for the duration of an inversion.
///
/// Invariant: all seven per-sample arrays have the same length; `rho` is
/// strictly increasing; all real arrays are finite; `fresnel_scale_km > 0`,
/// `spacecraft_distance_km > 0`, `|ring_opening_angle_rad| < pi/2`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibratedProfile {
    /// Ring-plane radial intercept [km], strictly increasing.
    pub rho_km: Vec<f64>,
    /// Calibrated diffracted amplitude, dimensionless.
    pub t_hat: Vec<Cplx<f64>>,
    /// Local Fresnel scale [km].
    pub fresnel_scale_km: Vec<f64>,
    /// Ring azimuth at intercept [rad].
    pub phi_rad: Vec<f64>,
    /// Wavenumber times spacecraft-to-ring distance [rad], kept as a single
    /// product to preserve numerical conditioning.
    pub k_d_rad: Vec<f64>,
    /// Ring opening angle [rad].
    pub ring_opening_angle_rad: Vec<f64>,
    /// Spacecraft-to-intercept distance [km].
    pub spacecraft_distance_km: Vec<f64>,
    /// Intercept radial velocity \[km/s\], a.k.a. `rho_dot`. Only required
    /// when [`ReconstructionOptions::use_bfac`] is set; the window-width
    /// planner's b-factor correction needs it and has nothing else in this
    /// record from which to derive it (there's no time axis here — ingestion
    /// and SPICE geometry reconstruction are out of scope; see spec.md
    /// section 1).
    #[serde(default)]
    pub rho_dot_kms: Option<Vec<f64>>,
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ProfileError {
    #[error("per-sample arrays have mismatched lengths")]
    LengthMismatch,
    #[error("profile has fewer than two samples")]
    TooFewSamples,
    #[error("rho is not strictly increasing at index {0}")]
    NotMonotonic(usize),
    #[error("a non-finite value appears in array `{array}` at index {index}")]
    NonFinite { array: &'static str, index: usize },
    #[error("fresnel_scale_km must be positive at index {0}")]
    NonPositiveFresnelScale(usize),
    #[error("spacecraft_distance_km must be positive at index {0}")]
    NonPositiveDistance(usize),
    #[error("ring_opening_angle_rad must satisfy |B| < pi/2 at index {0}")]
    OpeningAngleOutOfRange(usize),
}

impl CalibratedProfile {
    pub fn len(&self) -> usize {
        self.rho_km.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rho_km.is_empty()
    }

    /// The (tolerated-constant) sample spacing, estimated from the first two
    /// samples.
    pub fn delta_rho_km(&self) -> f64 {
        self.rho_km[1] - self.rho_km[0]
    }

    /// Validate every invariant in the type's documentation. Called once by
    /// the driver before building an [`crate::planner::InversionPlan`].
    pub fn validate(&self) -> Result<(), ProfileError> {
        let n = self.rho_km.len();
        if self.t_hat.len() != n
            || self.fresnel_scale_km.len() != n
            || self.phi_rad.len() != n
            || self.k_d_rad.len() != n
            || self.ring_opening_angle_rad.len() != n
            || self.spacecraft_distance_km.len() != n
        {
            return Err(ProfileError::LengthMismatch);
        }
        if n < 2 {
            return Err(ProfileError::TooFewSamples);
        }
        if let Some(rho_dot) = &self.rho_dot_kms {
            if rho_dot.len() != n {
                return Err(ProfileError::LengthMismatch);
            }
        }
        for i in 1..n {
            if self.rho_km[i] <= self.rho_km[i - 1] {
                return Err(ProfileError::NotMonotonic(i));
            }
        }
        for (i, &v) in self.rho_km.iter().enumerate() {
            if !v.is_finite() {
                return Err(ProfileError::NonFinite { array: "rho_km", index: i });
            }
        }
        for (i, v) in self.t_hat.iter().enumerate() {
            if !v.re.is_finite() || !v.im.is_finite() {
                return Err(ProfileError::NonFinite { array: "t_hat", index: i });
            }
        }
        for (i, &v) in self.fresnel_scale_km.iter().enumerate() {
            if !v.is_finite() {
                return Err(ProfileError::NonFinite {
                    array: "fresnel_scale_km",
                    index: i,
                });
            }
            if v <= 0.0 {
                return Err(ProfileError::NonPositiveFresnelScale(i));
            }
        }
        for (i, &v) in self.phi_rad.iter().enumerate() {
            if !v.is_finite() {
                return Err(ProfileError::NonFinite { array: "phi_rad", index: i });
            }
        }
        for (i, &v) in self.k_d_rad.iter().enumerate() {
            if !v.is_finite() {
                return Err(ProfileError::NonFinite { array: "k_d_rad", index: i });
            }
        }
        for (i, &v) in self.ring_opening_angle_rad.iter().enumerate() {
            if !v.is_finite() {
                return Err(ProfileError::NonFinite {
                    array: "ring_opening_angle_rad",
                    index: i,
                });
            }
            if v.abs() >= std::f64::consts::FRAC_PI_2 {
                return Err(ProfileError::OpeningAngleOutOfRange(i));
            }
        }
        for (i, &v) in self.spacecraft_distance_km.iter().enumerate() {
            if !v.is_finite() {
                return Err(ProfileError::NonFinite {
                    array: "spacecraft_distance_km",
                    index: i,
                });
            }
            if v <= 0.0 {
                return Err(ProfileError::NonPositiveDistance(i));
            }
        }
        Ok(())
    }
}

/// Kernel-approximation strategy used by the transform driver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    Fresnel,
    Legendre(u8),
    Newton,
    PerturbedNewton,
    EllipticNewton,
    Fft,
}

/// A closed radial interval `[lo, hi]`, inclusive, in km.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadialRange {
    pub lo_km: f64,
    pub hi_km: f64,
}

/// The interpolation order used inside the transform loop for the
/// stationary-phase strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpOrder {
    /// Exact per-sample evaluation; no interpolation.
    Exact,
    Quadratic,
    Cubic,
    Quartic,
}

impl InterpOrder {
    pub fn order(self) -> u8 {
        match self {
            InterpOrder::Exact => 0,
            InterpOrder::Quadratic => 2,
            InterpOrder::Cubic => 3,
            InterpOrder::Quartic => 4,
        }
    }
}

/// Five coefficients `[c0, c1, c2, c3, c4]` of a degree-4 polynomial in
/// `(rho - rho0)` added additively to `psi` when the `PerturbedNewton`
/// strategy (or the quadratic-Fresnel perturbation hook) is in use. All zero
/// disables the perturbation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct Perturbation(pub [f64; 5]);

impl Perturbation {
    pub fn is_disabled(&self) -> bool {
        self.0.iter().all(|&c| c == 0.0)
    }
}

/// Eccentricity and pericenter angle describing elliptic ring geometry. Both
/// zero disables the elliptic correction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct EllipticParams {
    pub ecc: f64,
    pub peri_rad: f64,
}

impl EllipticParams {
    pub fn is_disabled(&self) -> bool {
        self.ecc == 0.0 && self.peri_rad == 0.0
    }
}

/// All user-facing knobs controlling one inversion call. See spec section 3.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReconstructionOptions {
    /// Requested radial resolution \[km\], bounded below by `2 * delta_rho`.
    pub res_km: f64,
    pub window_type: WindowType,
    pub strategy: Strategy,
    pub normalize: bool,
    /// If true, `sigma`/`omega` are required and the window-width planner
    /// applies the Lambert-W b-factor correction.
    pub use_bfac: bool,
    /// Allen deviation, used only when `use_bfac`.
    pub sigma: Option<f64>,
    /// Angular frequency \[rad/s\], used only when `use_bfac`.
    pub omega: Option<f64>,
    pub range: RadialRange,
    pub perturbation: Perturbation,
    pub elliptic: EllipticParams,
    pub interp_order: InterpOrder,
    /// If true, forward-convolve the reconstructed `T` after completion to
    /// produce `t_hat_fwd` as a self-check.
    pub run_forward: bool,
    /// Working float width the transform driver monomorphizes into. See
    /// `crate::scalar::Scalar`.
    #[serde(default)]
    pub precision: Precision,
}

impl Default for ReconstructionOptions {
    fn default() -> Self {
        Self {
            res_km: 1.0,
            window_type: WindowType::Kb25,
            strategy: Strategy::Fresnel,
            normalize: true,
            use_bfac: false,
            sigma: None,
            omega: None,
            range: RadialRange { lo_km: 0.0, hi_km: 1.0 },
            perturbation: Perturbation::default(),
            elliptic: EllipticParams::default(),
            interp_order: InterpOrder::Exact,
            run_forward: false,
            precision: Precision::F64,
        }
    }
}

/// The reconstructed transmittance and the quantities derived from it.
/// Same length as the in-range subset of the input [`CalibratedProfile`]
/// covered by [`ReconstructionOptions::range`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReconstructedProfile {
    pub rho_km: Vec<f64>,
    pub t: Vec<Cplx<f64>>,
    pub power: Vec<f64>,
    pub phase_rad: Vec<f64>,
    pub tau: Vec<f64>,
    pub t_hat_fwd: Option<Vec<Cplx<f64>>>,
    pub raw_tau_threshold: f64,
    pub tau_threshold: f64,
}

impl ReconstructedProfile {
    /// Derive `power`, `phase` and `tau` from a freshly-accumulated `T` and
    /// the per-sample ring opening angle used at each output index.
    pub fn from_transmittance(
        rho_km: Vec<f64>,
        t: Vec<Cplx<f64>>,
        opening_angle_rad: &[f64],
        t_hat_fwd: Option<Vec<Cplx<f64>>>,
        raw_tau_threshold: f64,
        tau_threshold: f64,
    ) -> Self {
        debug_assert_eq!(rho_km.len(), t.len());
        debug_assert_eq!(rho_km.len(), opening_angle_rad.len());
        let power: Vec<f64> = t.iter().map(|c| c.norm_sqr()).collect();
        let phase_rad: Vec<f64> = t.iter().map(|c| c.arg()).collect();
        let tau: Vec<f64> = power
            .iter()
            .zip(opening_angle_rad.iter())
            .map(|(&p, &b)| {
                if p <= 0.0 {
                    f64::INFINITY
                } else {
                    -2.0 * b.sin().abs() * p.ln()
                }
            })
            .collect();
        Self {
            rho_km,
            t,
            power,
            phase_rad,
            tau,
            t_hat_fwd,
            raw_tau_threshold,
            tau_threshold,
        }
    }
}
