// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Numeric-capability abstraction used to run the transform driver, the phase
module and the special functions at either working precision without
duplicating the inner loops.

Design note: the legacy source this crate reimplements replicated every
routine for `f32`, `f64` and `long double` via preprocessor macros. Here
precision is a type parameter bounded by [`Scalar`] instead; integer-typed
inputs (timestep counts, `interp_order`, ...) are converted to the working
float type once at the API boundary, never inside a hot loop.
*/

use num_complex::Complex;
use num_traits::{Float, FloatConst, NumAssignOps};

/// Everything the math primitives, window library and transform driver need
/// from a working float type.
pub trait Scalar:
    Float + FloatConst + NumAssignOps + Send + Sync + std::fmt::Debug + std::iter::Sum + 'static
{
    /// A small multiple of machine epsilon, used as the default convergence
    /// tolerance for iterative solvers.
    fn solver_eps() -> Self;
}

impl Scalar for f32 {
    fn solver_eps() -> Self {
        // A generous multiple of f32::EPSILON; single precision can't support
        // the tight tolerances double precision can.
        Self::EPSILON * 64.0
    }
}

impl Scalar for f64 {
    fn solver_eps() -> Self {
        Self::EPSILON * 16.0
    }
}

/// Complex amplitude at working precision `S`.
pub type Cplx<S> = Complex<S>;

/// Which hardware float width a [`crate::data::CalibratedProfile`] was built
/// with. Resolved once at the API boundary; the inner loops are monomorphic
/// in `S`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Precision {
    F32,
    #[default]
    F64,
}
