use num_traits::Zero;

use crate::mp::{self, Mpf};
use crate::optim::InvertOptions;
use crate::special::{bessel_i, difference_with_retry, ncdf, npdf};

use super::{
    evaluate, invert, require_positive, try_evaluate, validate_p, ContinuousDistribution,
    DistError, INVERT_NBISECT,
};

/// ARGUS distribution with shape χ and scale c.
///
/// f(x) = χ³ / (√(2π) Ψ(χ)) · (x/c²) √(1 − z²) exp(−χ²(1 − z²)/2),
/// with z = x/c on 0 ≤ x ≤ c and Ψ(χ) = Φ(χ) − χφ(χ) − 1/2.
#[derive(Debug, Clone, PartialEq)]
pub struct Argus {
    chi: Mpf,
    c: Mpf,
}

/// Ψ(χ) = Φ(χ) − χφ(χ) − 1/2.
///
/// Ψ(χ) ~ χ³/(3√(2π)) near zero, so the three terms cancel; three guard
/// bits are added per bit of smallness of χ.
fn psi(chi: &Mpf) -> Mpf {
    let small = chi.exponent().map_or(0, |e| (-e).max(0)) as u32;
    mp::with_extraprec(10 + 3 * small, || ncdf(chi) - chi * npdf(chi) - Mpf::from(0.5))
}

impl Argus {
    /// Requires χ > 0 and c > 0.
    pub fn new(chi: impl Into<Mpf>, c: impl Into<Mpf>) -> Result<Self, DistError> {
        Ok(Self {
            chi: require_positive("chi", chi.into())?,
            c: require_positive("c", c.into())?,
        })
    }

    pub fn chi(&self) -> &Mpf {
        &self.chi
    }

    pub fn c(&self) -> &Mpf {
        &self.c
    }

    /// `c/(√2 χ) · √(χ² − 2 + √(χ⁴ + 4))`.
    pub fn mode(&self) -> Mpf {
        evaluate(|| {
            let chi2 = self.chi.square();
            let inner = &chi2 - 2i32 + (chi2.square() + 4i32).sqrt();
            &self.c / Mpf::from(2).sqrt() / &self.chi * inner.sqrt()
        })
    }

    fn outside(&self, x: &Mpf) -> bool {
        *x < 0 || *x > self.c
    }

    /// 1 − z² as (c − x)(c + x)/c², which keeps its accuracy as z → 1.
    fn one_minus_z2(&self, x: &Mpf) -> Mpf {
        (&self.c - x) * (&self.c + x) / self.c.square()
    }

    /// Ψ(χ√(1 − z²)) / Ψ(χ) for x inside the support.
    fn sf_ratio(&self, x: &Mpf) -> Mpf {
        psi(&(&self.chi * self.one_minus_z2(x).sqrt())) / psi(&self.chi)
    }

    /// (Ψ(χ) − Ψ(χ√(1 − z²))) / Ψ(χ) for x inside the support.
    ///
    /// For small x the two Ψ values agree to about 2·log2(1/z) bits, so
    /// the numerator is taken with enough guard bits to cover that.
    fn cdf_ratio(&self, x: &Mpf) -> Result<Mpf, DistError> {
        let num = difference_with_retry(10, || {
            let inner = &self.chi * self.one_minus_z2(x).sqrt();
            Ok((psi(&self.chi), psi(&inner)))
        })?;
        Ok(num / psi(&self.chi))
    }

    fn mean_raw(&self) -> Result<Mpf, DistError> {
        let chi = &self.chi;
        let chi2o4 = chi.square() >> 2;
        let i1 = bessel_i(&Mpf::from(1), &chi2o4)?;
        Ok(&self.c * (Mpf::pi() >> 3).sqrt() * chi * (-&chi2o4).exp() * i1 / psi(chi))
    }
}

impl ContinuousDistribution for Argus {
    fn pdf(&self, x: &Mpf) -> Mpf {
        if self.outside(x) {
            return Mpf::zero();
        }
        evaluate(|| self.logpdf(x).exp())
    }

    fn logpdf(&self, x: &Mpf) -> Mpf {
        if self.outside(x) {
            return Mpf::neg_infinity();
        }
        evaluate(|| {
            let (chi, c) = (&self.chi, &self.c);
            let w = self.one_minus_z2(x);
            let t1 = 3 * chi.ln() - (2i32 * Mpf::pi()).ln() / 2 - psi(chi).ln();
            let t2 = (x / c).ln() - c.ln();
            let t3 = w.ln() / 2;
            let t4 = -(chi.square() / 2i32) * w;
            t1 + t2 + t3 + t4
        })
    }

    fn cdf(&self, x: &Mpf) -> Result<Mpf, DistError> {
        if *x <= 0 {
            return Ok(Mpf::zero());
        }
        if *x >= self.c {
            return Ok(Mpf::from(1));
        }
        try_evaluate(|| self.cdf_ratio(x))
    }

    fn sf(&self, x: &Mpf) -> Result<Mpf, DistError> {
        if *x < 0 {
            return Ok(Mpf::from(1));
        }
        if *x > self.c {
            return Ok(Mpf::zero());
        }
        Ok(evaluate(|| self.sf_ratio(x)))
    }

    fn invcdf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        try_evaluate(|| {
            if p.is_zero() {
                return Ok(Mpf::zero());
            }
            if *p == 1 {
                return Ok(self.c.clone());
            }
            invert(
                |x| self.cdf(x),
                p,
                &Mpf::zero(),
                &self.c,
                &InvertOptions::default().with_nbisect(INVERT_NBISECT),
            )
        })
    }

    fn invsf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        try_evaluate(|| {
            if p.is_zero() {
                return Ok(self.c.clone());
            }
            if *p == 1 {
                return Ok(Mpf::zero());
            }
            invert(
                |x| self.sf(x),
                p,
                &Mpf::zero(),
                &self.c,
                &InvertOptions::default().with_nbisect(INVERT_NBISECT),
            )
        })
    }

    fn support(&self) -> (Mpf, Mpf) {
        (Mpf::zero(), self.c.rounded())
    }

    /// `c √(π/8) χ e^{−χ²/4} I₁(χ²/4) / Ψ(χ)`.
    fn mean(&self) -> Result<Mpf, DistError> {
        try_evaluate(|| self.mean_raw())
    }

    /// `c² (1 − 3/χ² + χφ(χ)/Ψ(χ)) − mean²`.
    fn var(&self) -> Result<Mpf, DistError> {
        try_evaluate(|| {
            let chi = &self.chi;
            let mu = self.mean_raw()?;
            let m2 = self.c.square() * (1 - 3 / chi.square() + chi * npdf(chi) / psi(chi));
            Ok(m2 - mu.square())
        })
    }
}
