//! Probability distributions at arbitrary precision.
//!
//! Each distribution is an immutable parameter struct validated by its
//! `new` constructor. The [`ContinuousDistribution`] and
//! [`DiscreteDistribution`] traits give a common API; estimators and
//! other extras are inherent methods. Every method evaluates with 5 extra
//! decimal digits and rounds its result to the caller's working precision.
//!
//! # Continuous distributions
//!
//! | Distribution | Parameters | Support |
//! |---|---|---|
//! | [`Argus`] | χ > 0, c > 0 | [0, c] |
//! | [`Beta`] | a > 0, b > 0 | [0, 1] |
//! | [`Gamma`] | shape k > 0, scale > 0 | [0, ∞) |
//! | [`GumbelMax`] | loc, scale > 0 | (−∞, ∞) |
//! | [`Maxwell`] | loc, scale > 0 | [loc, ∞) |
//! | [`Normal`] | μ, σ > 0 | (−∞, ∞) |
//! | [`Pareto`] | b > 0, loc, scale > 0 | [loc + scale, ∞) |
//!
//! # Discrete distributions
//!
//! | Distribution | Parameters | Support |
//! |---|---|---|
//! | [`GaussKuzmin`] | none | {1, 2, 3, …} |
//!
//! # Parameter estimation
//!
//! `mle` methods take one [`Param`] per parameter: [`Param::Free`] to
//! estimate it from a default starting point, [`Param::Initial`] to
//! estimate it from a given guess, or [`Param::Fixed`] to hold it. The
//! purely numeric cases go through [`FreeParams`] and
//! [`solve_score_equations`].
//!
//! # Example
//!
//! ```
//! use mpdist::mp::{self, Mpf};
//! use mpdist::distributions::{Beta, ContinuousDistribution};
//!
//! let _prec = mp::workdps(30);
//! let d = Beta::new(2, 3).unwrap();
//! let x = d.invcdf(&Mpf::from(0.25)).unwrap();
//! assert!((d.cdf(&x).unwrap() - 0.25).abs() < 1e-28);
//! ```

mod argus;
mod beta;
mod gamma;
mod gauss_kuzmin;
mod gumbel_max;
mod maxwell;
mod normal;
mod param;
mod pareto;


pub use argus::Argus;
pub use beta::Beta;
pub use gamma::Gamma;
pub use gauss_kuzmin::GaussKuzmin;
pub use gumbel_max::GumbelMax;
pub use maxwell::Maxwell;
pub use normal::Normal;
pub use param::{solve_score_equations, FreeParams, Param};
pub use pareto::Pareto;

use crate::mp::{self, fsum, Mpf};
use crate::optim::{invert_monotone, InvertOptions, OptimError};
use crate::special::SpecialError;
use crate::stats::StatsError;

/// Errors from distribution construction, evaluation and estimation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistError {
    /// A parameter is outside its domain.
    #[error("{name} must be {requirement}")]
    InvalidParameter {
        name: &'static str,
        requirement: &'static str,
    },
    /// A probability argument is outside [0, 1].
    #[error("p must be in the interval [0, 1]")]
    ProbabilityOutOfRange,
    /// A moment order is negative.
    #[error("n must be nonnegative")]
    NegativeMomentOrder,
    /// A sample value is outside the allowed range.
    #[error("{0}")]
    SampleOutOfBounds(String),
    /// The sample has no values.
    #[error("x must contain at least one value")]
    EmptySample,
    /// The lower end of an interval exceeds the upper end.
    #[error("x1 must not be greater than x2")]
    IntervalReversed,
    #[error(transparent)]
    Solver(#[from] OptimError),
    #[error(transparent)]
    Special(#[from] SpecialError),
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Continuous probability distribution.
pub trait ContinuousDistribution {
    /// Probability density function.
    fn pdf(&self, x: &Mpf) -> Mpf;
    /// Natural log of the probability density function.
    fn logpdf(&self, x: &Mpf) -> Mpf;
    /// Cumulative distribution function P(X ≤ x).
    fn cdf(&self, x: &Mpf) -> Result<Mpf, DistError>;
    /// Survival function P(X > x), computed without `1 - cdf` cancellation.
    fn sf(&self, x: &Mpf) -> Result<Mpf, DistError>;
    /// Inverse of [`cdf`](Self::cdf) for p in [0, 1].
    fn invcdf(&self, p: &Mpf) -> Result<Mpf, DistError>;
    /// Inverse of [`sf`](Self::sf) for p in [0, 1].
    fn invsf(&self, p: &Mpf) -> Result<Mpf, DistError>;
    /// Endpoints of the support.
    fn support(&self) -> (Mpf, Mpf);
    /// Expected value E\[X\].
    fn mean(&self) -> Result<Mpf, DistError>;
    /// Variance Var(X).
    fn var(&self) -> Result<Mpf, DistError>;
}

/// Discrete probability distribution on the integers.
pub trait DiscreteDistribution {
    /// Probability mass function P(X = k).
    fn pmf(&self, k: i64) -> Mpf;
    /// Natural log of the probability mass function.
    fn logpmf(&self, k: i64) -> Mpf;
    /// Cumulative distribution function P(X ≤ k).
    fn cdf(&self, k: i64) -> Mpf;
    /// Survival function P(X > k).
    fn sf(&self, k: i64) -> Mpf;
    /// Inverse of [`cdf`](Self::cdf); an `Mpf` so that it can be infinite.
    fn invcdf(&self, p: &Mpf) -> Result<Mpf, DistError>;
    /// Inverse of [`sf`](Self::sf); an `Mpf` so that it can be infinite.
    fn invsf(&self, p: &Mpf) -> Result<Mpf, DistError>;
    /// Expected value E\[X\].
    fn mean(&self) -> Mpf;
    /// Variance Var(X).
    fn var(&self) -> Mpf;
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check that `p` is a probability.
pub fn validate_p(p: &Mpf) -> Result<(), DistError> {
    if *p >= 0 && *p <= 1 {
        Ok(())
    } else {
        Err(DistError::ProbabilityOutOfRange)
    }
}

/// Check a moment order and return it unsigned.
pub fn validate_moment_n(n: i64) -> Result<u64, DistError> {
    u64::try_from(n).map_err(|_| DistError::NegativeMomentOrder)
}

/// Check that a sample has at least one value.
pub fn validate_sample_nonempty(x: &[Mpf]) -> Result<(), DistError> {
    if x.is_empty() {
        Err(DistError::EmptySample)
    } else {
        Ok(())
    }
}

/// One end of an [`XBounds`] range.
#[derive(Debug, Clone)]
pub struct Bound {
    pub value: Mpf,
    /// Exclude `value` itself.
    pub strict: bool,
    /// Shown before the value in error messages, e.g. `loc+scale (3)`.
    pub name: Option<&'static str>,
}

/// Allowed range for the values of a sample; see [`validate_x_bounds`].
#[derive(Debug, Clone, Default)]
pub struct XBounds {
    pub low: Option<Bound>,
    pub high: Option<Bound>,
}

impl XBounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values must be `>= value` (`> value` when `strict`).
    pub fn low(mut self, value: Mpf, strict: bool) -> Self {
        self.low = Some(Bound {
            value,
            strict,
            name: None,
        });
        self
    }

    /// Values must be `<= value` (`< value` when `strict`).
    pub fn high(mut self, value: Mpf, strict: bool) -> Self {
        self.high = Some(Bound {
            value,
            strict,
            name: None,
        });
        self
    }

    /// Name the lower bound in error messages. No effect without a lower bound.
    pub fn low_name(mut self, name: &'static str) -> Self {
        if let Some(b) = self.low.as_mut() {
            b.name = Some(name);
        }
        self
    }

    /// Name the upper bound in error messages. No effect without an upper bound.
    pub fn high_name(mut self, name: &'static str) -> Self {
        if let Some(b) = self.high.as_mut() {
            b.name = Some(name);
        }
        self
    }
}

fn bound_label(b: &Bound) -> String {
    let or_equal = if b.strict { "" } else { "or equal to " };
    match b.name {
        Some(name) => format!("{or_equal}{name} ({})", b.value),
        None => format!("{or_equal}{}", b.value),
    }
}

/// Check every value of `x` against `bounds`.
///
/// NaN values fail any bound. The error message names the violated bound,
/// e.g. "All values in x must be greater than or equal to loc+scale (3)."
pub fn validate_x_bounds(x: &[Mpf], bounds: &XBounds) -> Result<(), DistError> {
    if let Some(low) = &bounds.low {
        let ok = |t: &Mpf| {
            if low.strict {
                *t > low.value
            } else {
                *t >= low.value
            }
        };
        if !x.iter().all(ok) {
            return Err(DistError::SampleOutOfBounds(format!(
                "All values in x must be greater than {}.",
                bound_label(low)
            )));
        }
    }
    if let Some(high) = &bounds.high {
        let ok = |t: &Mpf| {
            if high.strict {
                *t < high.value
            } else {
                *t <= high.value
            }
        };
        if !x.iter().all(ok) {
            return Err(DistError::SampleOutOfBounds(format!(
                "All values in x must be less than {}.",
                bound_label(high)
            )));
        }
    }
    Ok(())
}

pub(crate) fn require_positive(name: &'static str, v: Mpf) -> Result<Mpf, DistError> {
    if v > 0 && !v.is_infinite() {
        Ok(v)
    } else {
        Err(DistError::InvalidParameter {
            name,
            requirement: "positive and finite",
        })
    }
}

pub(crate) fn require_finite(name: &'static str, v: Mpf) -> Result<Mpf, DistError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DistError::InvalidParameter {
            name,
            requirement: "finite",
        })
    }
}

// ---------------------------------------------------------------------------
// Evaluation helpers
// ---------------------------------------------------------------------------

/// Decimal digits added while evaluating a distribution method.
pub(crate) const EXTRA_DPS: u32 = 5;

/// Bisections applied to an inversion bracket before the solver runs.
/// Eight leave the secant method too far out in the tails (p ~ 1e-12).
pub(crate) const INVERT_NBISECT: usize = 16;

/// Run `f` with [`EXTRA_DPS`] more digits and round the result back.
pub(crate) fn evaluate(f: impl FnOnce() -> Mpf) -> Mpf {
    mp::with_extradps(EXTRA_DPS, f).rounded()
}

/// Fallible form of [`evaluate`].
pub(crate) fn try_evaluate(
    f: impl FnOnce() -> Result<Mpf, DistError>,
) -> Result<Mpf, DistError> {
    mp::with_extradps(EXTRA_DPS, f).map(|v| v.rounded())
}

/// Run a parameter estimator with [`EXTRA_DPS`] more digits and round
/// each estimate back.
pub(crate) fn try_evaluate_params<const N: usize>(
    f: impl FnOnce() -> Result<[Mpf; N], DistError>,
) -> Result<[Mpf; N], DistError> {
    mp::with_extradps(EXTRA_DPS, f).map(|v| v.map(|t| t.rounded()))
}

/// Solve `f(x) = p` on `[a, b]` for a fallible monotone `f`.
///
/// The first error `f` reports is returned in place of whatever the
/// solver made of the NaN it was handed.
pub(crate) fn invert(
    mut f: impl FnMut(&Mpf) -> Result<Mpf, DistError>,
    p: &Mpf,
    a: &Mpf,
    b: &Mpf,
    opts: &InvertOptions,
) -> Result<Mpf, DistError> {
    let mut failure: Option<DistError> = None;
    let result = invert_monotone(
        |x: &Mpf| match f(x) {
            Ok(v) => v,
            Err(e) => {
                if failure.is_none() {
                    failure = Some(e);
                }
                Mpf::nan()
            }
        },
        p,
        a,
        b,
        opts,
    );
    if let Some(e) = failure {
        return Err(e);
    }
    Ok(result?)
}

/// Negative log-likelihood `-Σ terms`, summed exactly.
pub(crate) fn negated_sum(terms: &[Mpf]) -> Mpf {
    -fsum(terms)
}
