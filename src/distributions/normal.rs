use num_traits::Zero;

use crate::mp::{fsum, Mpf};
use crate::optim::InvertOptions;
use crate::special::{ncdf, npdf};

use super::{
    evaluate, invert, negated_sum, require_finite, require_positive, try_evaluate,
    try_evaluate_params, validate_p, validate_sample_nonempty, ContinuousDistribution,
    DistError, Param,
};

/// Normal (Gaussian) distribution with mean μ and standard deviation σ.
///
/// f(x) = exp(−(x−μ)²/(2σ²)) / (σ√(2π)).
///
/// # Example
///
/// ```
/// use mpdist::mp::{self, Mpf};
/// use mpdist::distributions::{ContinuousDistribution, Normal};
///
/// let _prec = mp::workdps(40);
/// let n = Normal::new(0, 1).unwrap();
/// assert_eq!(n.cdf(&Mpf::from(0)).unwrap(), 0.5);
/// let x = n.invcdf(&Mpf::from(0.975)).unwrap();
/// assert!((x - 1.959963984540054).abs() < 1e-14);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Normal {
    mu: Mpf,
    sigma: Mpf,
}

impl Normal {
    /// Requires finite μ and σ > 0.
    pub fn new(mu: impl Into<Mpf>, sigma: impl Into<Mpf>) -> Result<Self, DistError> {
        Ok(Self {
            mu: require_finite("mu", mu.into())?,
            sigma: require_positive("sigma", sigma.into())?,
        })
    }

    pub fn mu(&self) -> &Mpf {
        &self.mu
    }

    pub fn sigma(&self) -> &Mpf {
        &self.sigma
    }

    /// Differential entropy `(ln(2π) + 1)/2 + ln σ`.
    pub fn entropy(&self) -> Mpf {
        evaluate(|| ((2i32 * Mpf::pi()).ln() + 1) / 2 + self.sigma.ln())
    }

    /// Negative log-likelihood of the sample `x`.
    pub fn nll(&self, x: &[Mpf]) -> Mpf {
        evaluate(|| {
            let terms: Vec<Mpf> = x.iter().map(|t| self.logpdf_raw(t)).collect();
            negated_sum(&terms)
        })
    }

    /// Maximum likelihood estimates of (μ, σ).
    ///
    /// Closed form for every combination: μ̂ is the sample mean and σ̂ the
    /// root mean square deviation from μ (fixed or estimated).
    pub fn mle(x: &[Mpf], mu: Param, sigma: Param) -> Result<(Mpf, Mpf), DistError> {
        validate_sample_nonempty(x)?;
        let fixed_mu = mu.fixed_value().map(|v| require_finite("mu", v.clone())).transpose()?;
        let fixed_sigma = sigma
            .fixed_value()
            .map(|v| require_positive("sigma", v.clone()))
            .transpose()?;

        let [mu_hat, sigma_hat] = try_evaluate_params(|| {
            let n = Mpf::from(x.len());
            let mu_hat = match fixed_mu {
                Some(mu) => mu,
                None => fsum(x) / &n,
            };
            let sigma_hat = match fixed_sigma {
                Some(sigma) => sigma,
                None => {
                    let squares: Vec<Mpf> = x.iter().map(|t| (t - &mu_hat).square()).collect();
                    (fsum(&squares) / &n).sqrt()
                }
            };
            Ok([mu_hat, sigma_hat])
        })?;
        Ok((mu_hat, sigma_hat))
    }

    fn logpdf_raw(&self, x: &Mpf) -> Mpf {
        let z = (x - &self.mu) / &self.sigma;
        -(2i32 * Mpf::pi()).ln() / 2 - self.sigma.ln() - z.square() / 2
    }
}

impl ContinuousDistribution for Normal {
    fn pdf(&self, x: &Mpf) -> Mpf {
        evaluate(|| npdf(&((x - &self.mu) / &self.sigma)) / &self.sigma)
    }

    fn logpdf(&self, x: &Mpf) -> Mpf {
        evaluate(|| self.logpdf_raw(x))
    }

    fn cdf(&self, x: &Mpf) -> Result<Mpf, DistError> {
        Ok(evaluate(|| ncdf(&((x - &self.mu) / &self.sigma))))
    }

    fn sf(&self, x: &Mpf) -> Result<Mpf, DistError> {
        Ok(evaluate(|| ncdf(&((&self.mu - x) / &self.sigma))))
    }

    fn invcdf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        try_evaluate(|| {
            if p.is_zero() {
                return Ok(Mpf::neg_infinity());
            }
            if *p == 1 {
                return Ok(Mpf::infinity());
            }
            invert(
                |x| self.cdf(x),
                p,
                &Mpf::neg_infinity(),
                &Mpf::infinity(),
                &InvertOptions::default(),
            )
        })
    }

    /// Mirror image of [`invcdf`](Self::invcdf) about μ.
    fn invsf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        let x = self.invcdf(p)?;
        Ok(evaluate(|| 2 * &self.mu - x))
    }

    fn support(&self) -> (Mpf, Mpf) {
        (Mpf::neg_infinity(), Mpf::infinity())
    }

    fn mean(&self) -> Result<Mpf, DistError> {
        Ok(self.mu.rounded())
    }

    fn var(&self) -> Result<Mpf, DistError> {
        Ok(evaluate(|| self.sigma.square()))
    }
}
