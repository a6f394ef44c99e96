use num_traits::Zero;

use crate::mp::{fsum, Mpf};
use crate::optim::{InvertOptions, NdSettings};
use crate::special::{
    beta, betainc, betainc_complement, betainc_interval, lbeta, xlog1py, xlogy,
};
use crate::stats;

use super::{
    evaluate, invert, negated_sum, require_positive, solve_score_equations, try_evaluate,
    try_evaluate_params, validate_moment_n, validate_p, validate_sample_nonempty,
    validate_x_bounds, ContinuousDistribution, DistError, FreeParams, Param, XBounds,
    INVERT_NBISECT,
};

/// Beta distribution with shape parameters a and b.
///
/// f(x) = x^{a−1} (1−x)^{b−1} / B(a, b) for 0 ≤ x ≤ 1.
///
/// # Example
///
/// ```
/// use mpdist::mp::Mpf;
/// use mpdist::distributions::{Beta, ContinuousDistribution};
///
/// let d = Beta::new(2, 3).unwrap();
/// assert!((d.mean().unwrap() - 0.4).abs() < 1e-15);
/// // F(x) = 6x² − 8x³ + 3x⁴
/// assert!((d.cdf(&Mpf::from(0.5)).unwrap() - 0.6875).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Beta {
    a: Mpf,
    b: Mpf,
}

impl Beta {
    /// Requires a > 0 and b > 0.
    pub fn new(a: impl Into<Mpf>, b: impl Into<Mpf>) -> Result<Self, DistError> {
        Ok(Self {
            a: require_positive("a", a.into())?,
            b: require_positive("b", b.into())?,
        })
    }

    pub fn a(&self) -> &Mpf {
        &self.a
    }

    pub fn b(&self) -> &Mpf {
        &self.b
    }

    /// P(x1 ≤ X ≤ x2), accurate even when the two CDF values nearly agree.
    pub fn interval_prob(&self, x1: &Mpf, x2: &Mpf) -> Result<Mpf, DistError> {
        if x1 > x2 {
            return Err(DistError::IntervalReversed);
        }
        try_evaluate(|| {
            let clamp = |x: &Mpf| x.max(&Mpf::zero()).min(&Mpf::from(1));
            Ok(betainc_interval(&self.a, &self.b, &clamp(x1), &clamp(x2))?)
        })
    }

    pub fn skewness(&self) -> Mpf {
        evaluate(|| {
            let (a, b) = (&self.a, &self.b);
            let apb = a + b;
            2 * (b - a) * (&apb + 1i32).sqrt() / ((&apb + 2) * (a * b).sqrt())
        })
    }

    /// Excess kurtosis.
    pub fn kurtosis(&self) -> Mpf {
        evaluate(|| {
            let (a, b) = (&self.a, &self.b);
            let apb = a + b;
            let ab = a * b;
            let num = (a - b).square() * (&apb + 1) - &ab * (&apb + 2);
            6 * num / (&ab * (&apb + 2) * (&apb + 3))
        })
    }

    /// E\[Xⁿ\] = Π_{j<n} (a + j) / (a + b + j).
    pub fn noncentral_moment(&self, n: i64) -> Result<Mpf, DistError> {
        let n = validate_moment_n(n)?;
        Ok(evaluate(|| {
            let apb = &self.a + &self.b;
            let mut mu = Mpf::from(1);
            for j in 0..n {
                let j = Mpf::from(j);
                mu = mu * (&self.a + &j) / (&apb + &j);
            }
            mu
        }))
    }

    /// Differential entropy.
    pub fn entropy(&self) -> Mpf {
        evaluate(|| {
            let (a, b) = (&self.a, &self.b);
            let apb = a + b;
            lbeta(a, b) - (a - 1) * a.digamma() - (b - 1) * b.digamma()
                + (&apb - 2) * apb.digamma()
        })
    }

    /// Negative log-likelihood of the sample `x`.
    pub fn nll(&self, x: &[Mpf]) -> Mpf {
        evaluate(|| {
            let terms: Vec<Mpf> = x.iter().map(|t| self.logpdf_raw(t)).collect();
            negated_sum(&terms)
        })
    }

    /// Maximum likelihood estimates of (a, b).
    ///
    /// Every value of `x` must lie strictly between 0 and 1. With both
    /// parameters free the search starts from the method of moments
    /// estimate; with one free it starts from the mean-matching value
    /// `b·x̄/(1−x̄)` (or `a(1−x̄)/x̄`). [`Param::Initial`] overrides either.
    pub fn mle(x: &[Mpf], a: Param, b: Param) -> Result<(Mpf, Mpf), DistError> {
        validate_sample(x)?;
        let fixed_a = a.fixed_value().map(|v| require_positive("a", v.clone())).transpose()?;
        let fixed_b = b.fixed_value().map(|v| require_positive("b", v.clone())).transpose()?;

        let [a_hat, b_hat] = try_evaluate_params(|| {
            let n = Mpf::from(x.len());
            let xbar = stats::mean(x)?;
            let defaults = match (&fixed_a, &fixed_b) {
                (None, None) => {
                    log::debug!("beta mle: fitting a and b");
                    let (a0, b0) = Self::mom(x)?;
                    [a0, b0]
                }
                (None, Some(b)) => {
                    log::debug!("beta mle: fitting a with b fixed");
                    [b * &xbar / (1 - &xbar), b.clone()]
                }
                (Some(a), None) => {
                    log::debug!("beta mle: fitting b with a fixed");
                    [a.clone(), a * (1 - &xbar) / &xbar]
                }
                (Some(a), Some(b)) => [a.clone(), b.clone()],
            };

            let logs: Vec<Mpf> = x.iter().map(|t| t.ln()).collect();
            let log1ms: Vec<Mpf> = x.iter().map(|t| (-t).ln_1p()).collect();
            let s1 = fsum(&logs);
            let s2 = fsum(&log1ms);

            let free = FreeParams::new(&[a, b], defaults);
            let [a_hat, b_hat] = solve_score_equations(
                &free,
                |[a, b]: &[Mpf; 2]| {
                    let psi_ab = (a + b).digamma();
                    [
                        &s1 - &n * (a.digamma() - &psi_ab),
                        &s2 - &n * (b.digamma() - &psi_ab),
                    ]
                },
                &NdSettings::default(),
            )?;
            Ok([a_hat, b_hat])
        })?;
        Ok((a_hat, b_hat))
    }

    /// Method of moments estimates of (a, b); values must lie in (0, 1).
    pub fn mom(x: &[Mpf]) -> Result<(Mpf, Mpf), DistError> {
        validate_sample(x)?;
        let [a, b] = try_evaluate_params(|| {
            let m1 = stats::mean(x)?;
            let squares: Vec<Mpf> = x.iter().map(|t| t.square()).collect();
            let m2 = stats::mean(&squares)?;
            let c = (&m1 - &m2) / (&m2 - m1.square());
            Ok([&m1 * &c, (1 - &m1) * &c])
        })?;
        Ok((a, b))
    }

    fn logpdf_raw(&self, x: &Mpf) -> Mpf {
        if *x < 0 || *x > 1 {
            return Mpf::neg_infinity();
        }
        xlogy(&(&self.a - 1), x) + xlog1py(&(&self.b - 1), &-x) - lbeta(&self.a, &self.b)
    }
}

fn validate_sample(x: &[Mpf]) -> Result<(), DistError> {
    validate_sample_nonempty(x)?;
    validate_x_bounds(
        x,
        &XBounds::new().low(Mpf::zero(), true).high(Mpf::from(1), true),
    )
}

impl ContinuousDistribution for Beta {
    fn pdf(&self, x: &Mpf) -> Mpf {
        evaluate(|| {
            if *x < 0 || *x > 1 {
                return Mpf::zero();
            }
            if x.is_zero() && self.a < 1 {
                return Mpf::infinity();
            }
            if *x == 1 && self.b < 1 {
                return Mpf::infinity();
            }
            x.powf(&(&self.a - 1)) * (1i32 - x).powf(&(&self.b - 1)) / beta(&self.a, &self.b)
        })
    }

    fn logpdf(&self, x: &Mpf) -> Mpf {
        evaluate(|| self.logpdf_raw(x))
    }

    fn cdf(&self, x: &Mpf) -> Result<Mpf, DistError> {
        try_evaluate(|| {
            if *x < 0 {
                return Ok(Mpf::zero());
            }
            if *x > 1 {
                return Ok(Mpf::from(1));
            }
            Ok(betainc(&self.a, &self.b, x)?)
        })
    }

    fn sf(&self, x: &Mpf) -> Result<Mpf, DistError> {
        try_evaluate(|| {
            if *x < 0 {
                return Ok(Mpf::from(1));
            }
            if *x > 1 {
                return Ok(Mpf::zero());
            }
            Ok(betainc_complement(&self.a, &self.b, x)?)
        })
    }

    fn invcdf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        try_evaluate(|| {
            if p.is_zero() {
                return Ok(Mpf::zero());
            }
            if *p == 1 {
                return Ok(Mpf::from(1));
            }
            invert(
                |x| self.cdf(x),
                p,
                &Mpf::zero(),
                &Mpf::from(1),
                &InvertOptions::default().with_nbisect(INVERT_NBISECT),
            )
        })
    }

    fn invsf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        try_evaluate(|| {
            if p.is_zero() {
                return Ok(Mpf::from(1));
            }
            if *p == 1 {
                return Ok(Mpf::zero());
            }
            invert(
                |x| self.sf(x),
                p,
                &Mpf::zero(),
                &Mpf::from(1),
                &InvertOptions::default().with_nbisect(INVERT_NBISECT),
            )
        })
    }

    fn support(&self) -> (Mpf, Mpf) {
        (Mpf::zero(), Mpf::from(1))
    }

    fn mean(&self) -> Result<Mpf, DistError> {
        Ok(evaluate(|| &self.a / (&self.a + &self.b)))
    }

    fn var(&self) -> Result<Mpf, DistError> {
        Ok(evaluate(|| {
            let apb = &self.a + &self.b;
            &self.a * &self.b / (apb.square() * (&apb + 1))
        }))
    }
}
