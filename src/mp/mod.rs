//! Arbitrary-precision scalar and working-precision context.
//!
//! [`Mpf`] wraps an MPFR float from [`rug`]. Unlike a plain `rug::Float`,
//! whose precision is fixed at construction, every `Mpf` operation rounds
//! to the *working precision* of the current thread. The working
//! precision starts at 53 bits (15 decimal digits) and is changed through
//! scoped guards:
//!
//! | Function | Effect while the guard lives |
//! |---|---|
//! | [`workprec`] | precision set to `bits` |
//! | [`workdps`] | precision set to `digits` decimal digits |
//! | [`extraprec`] | precision raised by `bits` |
//! | [`extradps`] | precision raised by `digits` decimal digits |
//!
//! Each guard restores the previous precision when dropped, including on
//! early return through `?`. The closure forms [`with_workdps`],
//! [`with_extradps`], etc. run a closure under a guard.
//!
//! # Example
//!
//! ```
//! use mpdist::mp::{self, Mpf};
//!
//! let third = mp::with_workdps(50, || Mpf::from(1) / 3i32);
//! assert_eq!(mp::dps(), 15);
//!
//! // `third` still carries 50 digits; new arithmetic rounds to the
//! // precision in force where it happens.
//! let err = mp::with_workdps(50, || (&third * 3i32 - 1i32).abs());
//! assert!(err < 1e-49);
//! ```

mod context;
mod ops;
mod scalar;

#[cfg(test)]
mod tests;

pub use context::{
    dps, dps_to_prec, eps, extradps, extraprec, prec, prec_to_dps, set_dps, set_prec, with_extradps,
    with_extraprec, with_workdps, with_workprec, workdps, workprec, PrecisionGuard, DEFAULT_PREC,
};
pub use scalar::{fsum, Mpf};

pub(crate) use scalar::complete;

/// Error returned when a string is not a valid number literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid number literal {input:?}")]
pub struct ParseError {
    pub(crate) input: String,
}

impl ParseError {
    /// The string that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}
