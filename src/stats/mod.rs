//! Sample statistics at arbitrary precision.
//!
//! These are the summaries the parameter estimators in
//! [`distributions`](crate::distributions) start from. Every function
//! accumulates with exact summation ([`fsum`]) under 16 extra bits and
//! rounds the result to the working precision.
//!
//! | Function | Description |
//! |---|---|
//! | [`mean`] | arithmetic mean |
//! | [`weighted_mean`] | mean with weights (any sign, nonzero sum) |
//! | [`var`] | variance with `ddof` delta degrees of freedom |
//! | [`std`] | standard deviation, `sqrt(var)` |
//! | [`variation`] | `std / mean` |
//! | [`gmean`] | geometric mean of nonnegative values |
//! | [`hmean`] | harmonic mean |
//! | [`median`] | middle value, or the mean of the two middle values |
//!
//! # Example
//!
//! ```
//! use mpdist::mp::Mpf;
//! use mpdist::stats;
//!
//! let x: Vec<Mpf> = [2, 3, 5, 8].iter().map(|&v| Mpf::from(v)).collect();
//! assert_eq!(stats::mean(&x).unwrap(), 4.5);
//! assert_eq!(stats::median(&x).unwrap(), 4);
//! assert_eq!(stats::var(&x, 1).unwrap(), 7);
//! ```

use num_traits::Zero;

use crate::mp::{self, fsum, Mpf};

#[cfg(test)]
mod tests;

/// Errors from sample statistics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// The sample has no values.
    #[error("x must contain at least one value")]
    Empty,
    /// Paired sequences have different lengths.
    #[error("x and weights must have the same length (got {x} and {weights})")]
    LengthMismatch { x: usize, weights: usize },
    /// The weights sum to zero.
    #[error("sum(weights) must be nonzero")]
    ZeroWeightSum,
    /// Fewer values than the delta degrees of freedom require.
    #[error("variance with ddof={ddof} needs more than {ddof} values, got {n}")]
    TooFewValues { n: usize, ddof: usize },
    /// A value is outside the function's domain.
    #[error("all values in x must be nonnegative")]
    NegativeValue,
}

const GUARD_BITS: u32 = 16;

fn nonempty(x: &[Mpf]) -> Result<(), StatsError> {
    if x.is_empty() {
        Err(StatsError::Empty)
    } else {
        Ok(())
    }
}

/// Arithmetic mean of `x`.
pub fn mean(x: &[Mpf]) -> Result<Mpf, StatsError> {
    nonempty(x)?;
    let m = mp::with_extraprec(GUARD_BITS, || fsum(x) / Mpf::from(x.len()));
    Ok(m.rounded())
}

/// Weighted mean `Σ wᵢxᵢ / Σ wᵢ`.
///
/// Negative weights are allowed; only a zero weight sum is rejected.
pub fn weighted_mean(x: &[Mpf], weights: &[Mpf]) -> Result<Mpf, StatsError> {
    nonempty(x)?;
    if weights.len() != x.len() {
        return Err(StatsError::LengthMismatch {
            x: x.len(),
            weights: weights.len(),
        });
    }
    let m = {
        let _prec = mp::extraprec(GUARD_BITS);
        let wsum = fsum(weights);
        if wsum.is_zero() {
            return Err(StatsError::ZeroWeightSum);
        }
        let products: Vec<Mpf> = x.iter().zip(weights).map(|(t, w)| t * w).collect();
        fsum(&products) / wsum
    };
    Ok(m.rounded())
}

/// Variance of `x`, dividing the squared deviations by `n - ddof`.
///
/// `ddof = 0` gives the population (maximum likelihood) variance,
/// `ddof = 1` the unbiased sample variance.
pub fn var(x: &[Mpf], ddof: usize) -> Result<Mpf, StatsError> {
    let v = mp::with_extraprec(GUARD_BITS, || var_raw(x, ddof))?;
    Ok(v.rounded())
}

fn var_raw(x: &[Mpf], ddof: usize) -> Result<Mpf, StatsError> {
    nonempty(x)?;
    let n = x.len();
    if n <= ddof {
        return Err(StatsError::TooFewValues { n, ddof });
    }
    let m = fsum(x) / Mpf::from(n);
    let squares: Vec<Mpf> = x.iter().map(|t| (t - &m).square()).collect();
    Ok(fsum(&squares) / Mpf::from(n - ddof))
}

/// Standard deviation, `sqrt(var(x, ddof))`.
pub fn std(x: &[Mpf], ddof: usize) -> Result<Mpf, StatsError> {
    let s = mp::with_extraprec(GUARD_BITS, || var_raw(x, ddof).map(|v| v.sqrt()))?;
    Ok(s.rounded())
}

/// Coefficient of variation `std(x, ddof) / mean(x)`.
///
/// No special handling for a zero mean; the result is then infinite or NaN.
pub fn variation(x: &[Mpf], ddof: usize) -> Result<Mpf, StatsError> {
    let r = {
        let _prec = mp::extraprec(GUARD_BITS);
        let s = var_raw(x, ddof)?.sqrt();
        s / (fsum(x) / Mpf::from(x.len()))
    };
    Ok(r.rounded())
}

/// Geometric mean of nonnegative values; zero if any value is zero.
pub fn gmean(x: &[Mpf]) -> Result<Mpf, StatsError> {
    nonempty(x)?;
    if x.iter().any(|t| *t < 0) {
        return Err(StatsError::NegativeValue);
    }
    if x.iter().any(|t| t.is_zero()) {
        return Ok(Mpf::zero());
    }
    let g = {
        let _prec = mp::extraprec(GUARD_BITS);
        let logs: Vec<Mpf> = x.iter().map(|t| t.ln()).collect();
        (fsum(&logs) / Mpf::from(x.len())).exp()
    };
    Ok(g.rounded())
}

/// Harmonic mean `n / Σ 1/xᵢ`.
///
/// Zero if any value is zero. Values of mixed sign are accepted; when the
/// reciprocals cancel exactly the result is NaN for mixed signs and the
/// common infinity otherwise.
pub fn hmean(x: &[Mpf]) -> Result<Mpf, StatsError> {
    nonempty(x)?;
    if x.iter().any(|t| t.is_zero()) {
        return Ok(Mpf::zero());
    }
    let npos = x.iter().filter(|t| **t > 0).count();
    let nneg = x.len() - npos;
    let h = {
        let _prec = mp::extraprec(GUARD_BITS);
        let recips: Vec<Mpf> = x.iter().map(|t| t.recip()).collect();
        let m = fsum(&recips) / Mpf::from(x.len());
        if m.is_zero() {
            match (npos, nneg) {
                (0, _) => Mpf::neg_infinity(),
                (_, 0) => Mpf::infinity(),
                _ => Mpf::nan(),
            }
        } else {
            m.recip()
        }
    };
    Ok(h.rounded())
}

/// Median of `x`.
pub fn median(x: &[Mpf]) -> Result<Mpf, StatsError> {
    nonempty(x)?;
    let mut sorted: Vec<&Mpf> = x.iter().collect();
    sorted.sort_by(|a, b| a.as_float().total_cmp(b.as_float()));
    let n = sorted.len();
    let m = n / 2;
    if n % 2 == 1 {
        Ok(sorted[m].rounded())
    } else {
        let mid = mp::with_extraprec(GUARD_BITS, || (sorted[m - 1] + sorted[m]) >> 1);
        Ok(mid.rounded())
    }
}
