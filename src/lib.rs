// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A Fresnel inversion engine for reconstructing planetary ring
//! optical-depth profiles from radio-occultation diffraction data.
//!
//! The entry point is [`driver::run`]: it takes a [`data::CalibratedProfile`]
//! and [`data::ReconstructionOptions`] and produces a
//! [`data::ReconstructedProfile`] by evaluating the discretized
//! stationary-phase Fresnel inversion sum at every in-range sample.

mod cli;
pub(crate) mod error;
pub mod scalar;

pub mod data;
pub mod driver;
pub mod forward;
pub mod math;
pub mod phase;
pub mod planner;
pub mod solver;
pub mod window;

// Re-exports.
pub use cli::{Cli, CliError, ForwardArgs, InvertArgs, PlanArgs};
pub use data::{
    CalibratedProfile, EllipticParams, InterpOrder, Perturbation, RadialRange,
    ReconstructedProfile, ReconstructionOptions, Strategy,
};
pub use error::{RsrInvertError, RsrInvertErrorKind};
pub use scalar::Precision;
