use num_traits::Zero;

use crate::mp::Mpf;
use crate::optim::{InvertOptions, Solver};
use crate::special::{gammainc_lower, gammainc_upper};

use super::{
    evaluate, invert, require_finite, require_positive, try_evaluate, validate_p,
    ContinuousDistribution, DistError, INVERT_NBISECT,
};

/// Maxwell (Maxwell–Boltzmann) distribution with location and scale.
///
/// f(x) = √(2/π) z² e^{−z²/2} / scale, z = (x − loc)/scale, for x > loc.
///
/// # Example
///
/// ```
/// use mpdist::mp::{self, Mpf};
/// use mpdist::distributions::{ContinuousDistribution, Maxwell};
///
/// let _prec = mp::workdps(30);
/// let d = Maxwell::new(0, 3).unwrap();
/// let x = Mpf::from(1.5);
/// let p = d.cdf(&x).unwrap();
/// assert!((d.invcdf(&p).unwrap() - x).abs() < 1e-27);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Maxwell {
    loc: Mpf,
    scale: Mpf,
}

impl Maxwell {
    /// Requires finite loc and scale > 0.
    pub fn new(loc: impl Into<Mpf>, scale: impl Into<Mpf>) -> Result<Self, DistError> {
        Ok(Self {
            loc: require_finite("loc", loc.into())?,
            scale: require_positive("scale", scale.into())?,
        })
    }

    pub fn loc(&self) -> &Mpf {
        &self.loc
    }

    pub fn scale(&self) -> &Mpf {
        &self.scale
    }

    /// `loc + √2 · scale`.
    pub fn mode(&self) -> Mpf {
        evaluate(|| &self.loc + Mpf::from(2).sqrt() * &self.scale)
    }

    /// Differential entropy `ln(scale √(2π)) + γ − 1/2`.
    pub fn entropy(&self) -> Mpf {
        evaluate(|| (&self.scale * (2i32 * Mpf::pi()).sqrt()).ln() + Mpf::euler() - Mpf::from(0.5))
    }

    /// `z²/2`, the argument of the incomplete gamma functions.
    fn half_z2(&self, x: &Mpf) -> Mpf {
        ((x - &self.loc) / &self.scale).square() >> 1
    }

    fn invert_options() -> InvertOptions {
        InvertOptions::default()
            .with_nbisect(INVERT_NBISECT)
            .with_fallback(Solver::Newton)
    }
}

impl ContinuousDistribution for Maxwell {
    fn pdf(&self, x: &Mpf) -> Mpf {
        if *x <= self.loc {
            return Mpf::zero();
        }
        evaluate(|| {
            let z2 = ((x - &self.loc) / &self.scale).square();
            (Mpf::from(2) / Mpf::pi()).sqrt() * &z2 * (-(&z2 >> 1)).exp() / &self.scale
        })
    }

    fn logpdf(&self, x: &Mpf) -> Mpf {
        if *x <= self.loc {
            return Mpf::neg_infinity();
        }
        evaluate(|| {
            let z = (x - &self.loc) / &self.scale;
            (Mpf::from(2) / Mpf::pi()).ln() / 2 + 2 * z.ln() - (z.square() >> 1)
                - self.scale.ln()
        })
    }

    /// `P(3/2, z²/2)`, the regularized lower incomplete gamma function.
    fn cdf(&self, x: &Mpf) -> Result<Mpf, DistError> {
        if *x <= self.loc {
            return Ok(Mpf::zero());
        }
        try_evaluate(|| Ok(gammainc_lower(&Mpf::from(1.5), &self.half_z2(x))?))
    }

    fn sf(&self, x: &Mpf) -> Result<Mpf, DistError> {
        if *x <= self.loc {
            return Ok(Mpf::from(1));
        }
        try_evaluate(|| Ok(gammainc_upper(&Mpf::from(1.5), &self.half_z2(x))?))
    }

    /// Numerical inversion on `[loc, ∞)`; secant with a Newton fallback.
    /// May fail for extremely small `p`.
    fn invcdf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        try_evaluate(|| {
            if p.is_zero() {
                return Ok(self.loc.clone());
            }
            if *p == 1 {
                return Ok(Mpf::infinity());
            }
            invert(
                |x| self.cdf(x),
                p,
                &self.loc,
                &Mpf::infinity(),
                &Self::invert_options(),
            )
        })
    }

    /// Numerical inversion on `[loc, ∞)`; may fail for `p` very close to 1.
    fn invsf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        try_evaluate(|| {
            if p.is_zero() {
                return Ok(Mpf::infinity());
            }
            if *p == 1 {
                return Ok(self.loc.clone());
            }
            invert(
                |x| self.sf(x),
                p,
                &self.loc,
                &Mpf::infinity(),
                &Self::invert_options(),
            )
        })
    }

    fn support(&self) -> (Mpf, Mpf) {
        (self.loc.rounded(), Mpf::infinity())
    }

    /// `loc + 2√(2/π) · scale`.
    fn mean(&self) -> Result<Mpf, DistError> {
        Ok(evaluate(|| {
            &self.loc + 2 * (Mpf::from(2) / Mpf::pi()).sqrt() * &self.scale
        }))
    }

    /// `scale² (3π − 8)/π`.
    fn var(&self) -> Result<Mpf, DistError> {
        Ok(evaluate(|| {
            let pi = Mpf::pi();
            self.scale.square() * (3 * &pi - 8) / pi
        }))
    }
}
