//! # mpdist
//!
//! Probability distributions evaluated at arbitrary precision, for use as a
//! source of reference values. Built on MPFR through [`rug`]; every result
//! is correct to (nearly) the working precision chosen by the caller.
//!
//! ## Quick start
//!
//! ```
//! use mpdist::mp::{self, Mpf};
//! use mpdist::distributions::{ContinuousDistribution, Gamma};
//!
//! // 40 significant digits while `_prec` is alive
//! let _prec = mp::workdps(40);
//! let g = Gamma::new(2, 3).unwrap();
//! let median = g.invcdf(&Mpf::from(0.5)).unwrap();
//! assert!((g.cdf(&median).unwrap() - 0.5).abs() < 1e-38);
//! ```
//!
//! ## Modules
//!
//! - [`mp`]: `Mpf` scalar and the thread-local working precision, changed
//!   through scoped guards (`workdps`, `extradps`, ...).
//!
//! - [`special`]: incomplete beta and gamma functions, Bessel I,
//!   inverse digamma, `powm1` and friends, standard normal density and
//!   distribution function.
//!
//! - [`optim`]: bracket finding, seven scalar root solvers, monotone
//!   inversion with fallback, and damped Newton for square systems.
//!
//! - [`stats`]: sample mean, variance, geometric/harmonic means, median.
//!
//! - [`distributions`]: Argus, Beta, Gamma, Gauss–Kuzmin, Gumbel (max),
//!   Maxwell, Normal and Pareto, with maximum likelihood estimation where
//!   the distribution supports it.
//!
//! ## Logging
//!
//! Solvers and estimators emit [`log`] records at `debug` and `trace`
//! level. Install any `log` backend to see them.

pub mod distributions;
pub mod mp;
pub mod optim;
pub mod special;
pub mod stats;

pub use mp::Mpf;
