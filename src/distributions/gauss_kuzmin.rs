use num_traits::Zero;

use crate::mp::Mpf;
use crate::special::powm1;

use super::{evaluate, validate_p, DiscreteDistribution, DistError};

/// Gauss–Kuzmin distribution of continued fraction coefficients.
///
/// P(X = k) = −log₂(1 − 1/(k + 1)²) for k = 1, 2, 3, …
///
/// The mean and variance are infinite.
///
/// # Example
///
/// ```
/// use mpdist::mp::Mpf;
/// use mpdist::distributions::{DiscreteDistribution, GaussKuzmin};
///
/// // P(X = 1) = log₂(4/3)
/// let p = GaussKuzmin.pmf(1);
/// let expected = (Mpf::from(4) / 3i32).ln() / Mpf::ln2();
/// assert!((p - expected).abs() < 1e-15);
/// assert!(GaussKuzmin.invcdf(&Mpf::from(1)).unwrap().is_infinite());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GaussKuzmin;

impl GaussKuzmin {
    pub fn mode(&self) -> Mpf {
        Mpf::from(1)
    }

    pub fn median(&self) -> Mpf {
        Mpf::from(2)
    }
}

/// `1/(k + 1)`
fn recip_k1(k: i64) -> Mpf {
    (Mpf::from(k) + 1i32).recip()
}

impl DiscreteDistribution for GaussKuzmin {
    fn pmf(&self, k: i64) -> Mpf {
        if k < 1 {
            return Mpf::zero();
        }
        evaluate(|| {
            let r = recip_k1(k);
            -((-&r).ln_1p() + r.ln_1p()) / Mpf::ln2()
        })
    }

    fn logpmf(&self, k: i64) -> Mpf {
        if k < 1 {
            return Mpf::neg_infinity();
        }
        evaluate(|| self.pmf(k).ln())
    }

    fn cdf(&self, k: i64) -> Mpf {
        if k < 0 {
            return Mpf::zero();
        }
        evaluate(|| 1 - recip_k1(k).ln_1p() / Mpf::ln2())
    }

    fn sf(&self, k: i64) -> Mpf {
        if k < 0 {
            return Mpf::from(1);
        }
        evaluate(|| recip_k1(k).ln_1p() / Mpf::ln2())
    }

    /// Solves `cdf(k) = p` for real k; infinite at p = 1.
    fn invcdf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        if *p == 1 {
            return Ok(Mpf::infinity());
        }
        Ok(evaluate(|| {
            let t = powm1(&Mpf::from(2), &(1 - p));
            powm1(&t, &Mpf::from(-1))
        }))
    }

    /// Solves `sf(k) = p` for real k; infinite at p = 0.
    fn invsf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        if p.is_zero() {
            return Ok(Mpf::infinity());
        }
        Ok(evaluate(|| {
            let t = powm1(&Mpf::from(2), p);
            powm1(&t, &Mpf::from(-1))
        }))
    }

    fn mean(&self) -> Mpf {
        Mpf::infinity()
    }

    fn var(&self) -> Mpf {
        Mpf::infinity()
    }
}
