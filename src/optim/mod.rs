//! Root finding: bracketing, scalar solvers, monotone inversion, and
//! multivariate Newton.
//!
//! All routines work on [`Mpf`] at the thread's working precision. Scalar
//! solvers temporarily raise the precision by
//! [`RootSettings::extra_prec`] bits and accept a root once the step size
//! drops below `tol * max(1, |x|)`; with verification enabled the result
//! must also satisfy `|f(x)|^2 <= tol`.
//!
//! # Bracketing
//!
//! - [`find_bracket`]: bracket the solution of `f(x) = p` for monotone `f`
//!   on `[a, b]` (either end may be infinite), refined by a few bisections
//! - [`find_bracket_by_expansion_0_inf`],
//!   [`find_bracket_by_expansion_neginf_inf`]: expansion-only brackets on
//!   `(0, ∞)` and `(-∞, ∞)`
//!
//! # Scalar root finding
//!
//! | [`Solver`] | Start | Notes |
//! |---|---|---|
//! | `Bisect` | pair | halves the bracket each step |
//! | `Secant` | point or pair | a point `x` is paired with `x + 1/4` |
//! | `Newton` | point | analytic or central-difference derivative |
//! | `Illinois` | pair | regula falsi, stale end scaled by 1/2 |
//! | `Pegasus` | pair | stale end scaled by `fb / (fb + fz)` |
//! | `Anderson` | pair | stale end scaled by `1 - fz / fb` |
//! | `Brent` | pair | bisection + secant + inverse quadratic interpolation |
//!
//! - [`find_root`] / [`find_root_with_derivative`]: run one solver
//! - [`invert_monotone`]: bracket then solve `f(x) = p`, with an optional
//!   one-shot fallback solver
//! - [`generic_inv`]: invert a monotone function on `(0, ∞)` at doubled
//!   precision
//!
//! # Systems of equations
//!
//! - [`find_root_nd`]: damped Newton with a forward-difference Jacobian
//! - [`finite_difference_jacobian`]
//!
//! # Example
//!
//! ```
//! use mpdist::mp::{self, Mpf};
//! use mpdist::optim::{invert_monotone, InvertOptions};
//!
//! let _prec = mp::workdps(40);
//! // Solve exp(x) = 1/16 on (-inf, 0].
//! let p = Mpf::from(1) / 16;
//! let x = invert_monotone(
//!     |x: &Mpf| x.exp(),
//!     &p,
//!     &Mpf::neg_infinity(),
//!     &Mpf::from(0),
//!     &InvertOptions::default(),
//! )
//! .unwrap();
//! let expected = -Mpf::from(16).ln();
//! assert!((x - expected).abs() < 1e-38);
//! ```

mod bracket;
mod invert;
mod jacobian;
mod multiroot;
mod root;


pub use bracket::{
    find_bracket, find_bracket_by_expansion_0_inf, find_bracket_by_expansion_neginf_inf, Bracket,
    Monotonicity,
};
pub use invert::{generic_inv, invert_monotone, InvertOptions};
pub use jacobian::finite_difference_jacobian;
pub use multiroot::{find_root_nd, NdRootResult, NdSettings};
pub use root::{find_root, find_root_with_derivative, RootSettings, Solver, Start};

use crate::mp::Mpf;

/// Errors from root-finding algorithms.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptimError {
    /// Maximum number of iterations exceeded without meeting the tolerance.
    #[error("maximum iterations exceeded")]
    MaxIterations,
    /// Bracket endpoints do not enclose a sign change (or are not a pair).
    #[error("bracket endpoints must have opposite signs")]
    BracketInvalid,
    /// Encountered a singular Jacobian or a zero slope.
    #[error("singular or near-singular matrix")]
    Singular,
    /// A computed value was NaN or infinity.
    #[error("computed value is NaN or infinity")]
    NotFinite,
    /// The solver stopped but the residual check failed.
    #[error("could not find root within tolerance (|f(x)|^2 = {residual})")]
    NoConvergence {
        /// `|f(x)|^2` at the returned point.
        residual: Mpf,
    },
    /// Solver name not recognised by [`Solver::from_str`](core::str::FromStr).
    #[error("unknown solver {0:?}")]
    UnknownSolver(String),
    /// Vector lengths disagree (start point vs. system size).
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Result of a scalar root-finding algorithm.
#[derive(Debug, Clone)]
pub struct RootResult {
    /// Approximate root.
    pub x: Mpf,
    /// Function value at the root: `f(x)`.
    pub fx: Mpf,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Number of function evaluations.
    pub evals: usize,
}

/// Default tolerance `eps * 2^10` at the working precision.
pub(crate) fn default_tol() -> Mpf {
    crate::mp::eps() << 10
}
