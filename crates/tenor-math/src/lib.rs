//! # Tenor Math
//!
//! Numerical building blocks for the Tenor term structure library.
//!
//! This crate provides:
//!
//! - **Solvers**: a one-dimensional solver framework with bracket expansion,
//!   an evaluation budget and six convergence steps (Bisection, Brent,
//!   Secant, Newton, False Position, Ridder)
//! - **Interpolation**: linear, log-linear and backward-flat interpolators
//!   with derivatives and integrals
//!
//! ## Example
//!
//! ```rust
//! use tenor_math::prelude::*;
//!
//! let solver = Solver1D::new(SolverAlgorithm::Bisection);
//! let result = solver
//!     .solve_bracketed(|x: f64| x * x * x - x - 2.0, 1e-8, 1.5, 1.0, 2.0)
//!     .unwrap();
//! assert!((result.root - 1.521_379_707).abs() < 1e-8);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        BackwardFlatInterpolator, Interpolation, Interpolator, LinearInterpolator,
        LogLinearInterpolator,
    };
    pub use crate::solvers::{Solver1D, SolverAlgorithm, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
