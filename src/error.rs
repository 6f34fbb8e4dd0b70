// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all reconstruction-related errors. This should be the
//! *only* error enum that is publicly visible.

use thiserror::Error;

use crate::data::ProfileError;
use crate::driver::DriverError;
use crate::phase::PhaseError;
use crate::planner::PlannerError;
use crate::solver::SolverError;
use crate::window::WindowError;

/// The *only* publicly visible error from this crate. Each submodule defines
/// its own error enum; this facade wraps all of them.
#[derive(Error, Debug)]
pub enum RsrInvertError {
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
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// A coarse classification of [`RsrInvertError`], for callers that want to
/// react to a category of failure without matching on every inner error
/// type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RsrInvertErrorKind {
    /// The input profile itself is malformed (bad lengths, non-finite
    /// values, non-monotonic radius).
    Domain,
    /// A requested radius, index, or range falls outside what the data or
    /// plan can support.
    Range,
    /// A Newton/Halley stationary-phase search failed to converge.
    NonConvergence,
    /// A combination of options is invalid (bad interpolation order for the
    /// chosen strategy, a window incompatible with the requested grid).
    InvalidOption,
    /// A working buffer could not be sized (e.g. the FFT strategy's padded
    /// length).
    Allocation,
}

impl RsrInvertError {
    pub fn kind(&self) -> RsrInvertErrorKind {
        match self {
            RsrInvertError::Profile(_) => RsrInvertErrorKind::Domain,
            RsrInvertError::Planner(e) => match e {
                PlannerError::ResolutionBelowNyquist { .. }
                | PlannerError::BfacDomain { .. }
                | PlannerError::BfacNoSolution { .. } => RsrInvertErrorKind::Domain,
                PlannerError::MissingBfacParams | PlannerError::MissingRhoDot => {
                    RsrInvertErrorKind::InvalidOption
                }
            },
            RsrInvertError::Window(_) | RsrInvertError::Phase(_) => {
                RsrInvertErrorKind::InvalidOption
            }
            RsrInvertError::Solver(_) => RsrInvertErrorKind::NonConvergence,
            RsrInvertError::Driver(e) => match e {
                DriverError::OutOfRange(_) => RsrInvertErrorKind::Range,
                DriverError::InvalidInterpOrder(..) | DriverError::NonUniformGrid(_) => {
                    RsrInvertErrorKind::InvalidOption
                }
                DriverError::AllocationFailure { .. } => RsrInvertErrorKind::Allocation,
                DriverError::Solver(_) => RsrInvertErrorKind::NonConvergence,
                DriverError::Profile(_) => RsrInvertErrorKind::Domain,
                DriverError::Planner(pe) => match pe {
                    PlannerError::ResolutionBelowNyquist { .. }
                    | PlannerError::BfacDomain { .. }
                    | PlannerError::BfacNoSolution { .. } => RsrInvertErrorKind::Domain,
                    PlannerError::MissingBfacParams | PlannerError::MissingRhoDot => {
                        RsrInvertErrorKind::InvalidOption
                    }
                },
                DriverError::Window(_) | DriverError::Phase(_) => {
                    RsrInvertErrorKind::InvalidOption
                }
            },
        }
    }
}
