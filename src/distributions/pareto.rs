use num_traits::Zero;

use crate::mp::{fsum, Mpf};
use crate::optim::NdSettings;
use crate::special::{inv_powm1, powm1};

use super::{
    evaluate, negated_sum, require_finite, require_positive, solve_score_equations,
    try_evaluate_params, validate_p, validate_sample_nonempty, validate_x_bounds,
    ContinuousDistribution, DistError, FreeParams, Param, XBounds,
};

/// Pareto distribution (type I) with shape b, location and scale.
///
/// F(x) = 1 − ((x − loc)/scale)^{−b} for x ≥ loc + scale.
///
/// # Example
///
/// ```
/// use mpdist::mp::Mpf;
/// use mpdist::distributions::{ContinuousDistribution, Pareto};
///
/// let d = Pareto::new(2, 0, 1).unwrap();
/// assert_eq!(d.sf(&Mpf::from(4)).unwrap(), 0.0625);
/// assert_eq!(d.invsf(&Mpf::from(0.0625)).unwrap(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Pareto {
    b: Mpf,
    loc: Mpf,
    scale: Mpf,
}

impl Pareto {
    /// Requires b > 0, finite loc and scale > 0.
    pub fn new(
        b: impl Into<Mpf>,
        loc: impl Into<Mpf>,
        scale: impl Into<Mpf>,
    ) -> Result<Self, DistError> {
        Ok(Self {
            b: require_positive("b", b.into())?,
            loc: require_finite("loc", loc.into())?,
            scale: require_positive("scale", scale.into())?,
        })
    }

    pub fn b(&self) -> &Mpf {
        &self.b
    }

    pub fn loc(&self) -> &Mpf {
        &self.loc
    }

    pub fn scale(&self) -> &Mpf {
        &self.scale
    }

    fn lower_bound(&self) -> Mpf {
        &self.loc + &self.scale
    }

    /// Differential entropy `1 + 1/b + ln(scale/b)`.
    pub fn entropy(&self) -> Mpf {
        evaluate(|| 1 + self.b.recip() + (&self.scale / &self.b).ln())
    }

    /// Negative log-likelihood; every value must be at least loc + scale.
    pub fn nll(&self, x: &[Mpf]) -> Result<Mpf, DistError> {
        validate_x_bounds(
            x,
            &XBounds::new()
                .low(self.lower_bound(), false)
                .low_name("loc+scale"),
        )?;
        Ok(evaluate(|| {
            let terms: Vec<Mpf> = x.iter().map(|t| self.logpdf_raw(t)).collect();
            negated_sum(&terms)
        }))
    }

    /// Maximum likelihood estimates of (b, loc, scale).
    ///
    /// Whenever loc or scale is free, the smallest sample value pins
    /// loc + scale. Of the eight combinations only two need a numeric
    /// solve (all free, and b fixed with loc and scale free); their
    /// starting guess is 1 for each free parameter unless a
    /// [`Param::Initial`] is given. Convergence from the default guess is
    /// not assured.
    pub fn mle(x: &[Mpf], b: Param, loc: Param, scale: Param) -> Result<(Mpf, Mpf, Mpf), DistError> {
        validate_sample_nonempty(x)?;
        let fixed_b = b.fixed_value().map(|v| require_positive("b", v.clone())).transpose()?;
        let fixed_loc = loc.fixed_value().map(|v| require_finite("loc", v.clone())).transpose()?;
        let fixed_scale = scale
            .fixed_value()
            .map(|v| require_positive("scale", v.clone()))
            .transpose()?;
        let all_finite = XBounds::new()
            .low(Mpf::neg_infinity(), true)
            .high(Mpf::infinity(), true);

        let [b_hat, loc_hat, scale_hat] = try_evaluate_params(|| {
            let n = Mpf::from(x.len());
            let x1 = min_value(x);
            Ok(match (fixed_b, fixed_loc, fixed_scale) {
                (Some(b), Some(loc), Some(scale)) => {
                    validate_x_bounds(x, &XBounds::new().low(&loc + &scale, false))?;
                    [b, loc, scale]
                }
                (None, Some(loc), None) => {
                    log::debug!("pareto mle: b and scale free, loc fixed");
                    validate_x_bounds(x, &XBounds::new().low(loc.clone(), true))?;
                    let scale_hat = &x1 - &loc;
                    let b_hat = shape_given(x, &n, &loc, &scale_hat);
                    [b_hat, loc, scale_hat]
                }
                (None, None, Some(scale)) => {
                    log::debug!("pareto mle: b and loc free, scale fixed");
                    validate_x_bounds(x, &all_finite)?;
                    let loc_hat = &x1 - &scale;
                    let b_hat = shape_given(x, &n, &loc_hat, &scale);
                    [b_hat, loc_hat, scale]
                }
                (Some(b), Some(loc), None) => {
                    validate_x_bounds(x, &XBounds::new().low(loc.clone(), true))?;
                    let scale_hat = &x1 - &loc;
                    [b, loc, scale_hat]
                }
                (Some(b), None, Some(scale)) => {
                    let loc_hat = &x1 - &scale;
                    [b, loc_hat, scale]
                }
                (_, None, None) => {
                    log::debug!(
                        "pareto mle: loc and scale free, b {}",
                        if b.is_fixed() { "fixed" } else { "free" }
                    );
                    validate_x_bounds(x, &all_finite)?;
                    // loc = x1 - scale, so the unknowns are b and scale.
                    let params = [b.clone(), scale.clone()];
                    let defaults = [Mpf::from(1), Mpf::from(1)];
                    let free = FreeParams::new(&params, defaults);
                    let [b_hat, scale_hat] = solve_score_equations(
                        &free,
                        |[b, s]: &[Mpf; 2]| shape_scale_score(x, &x1, &n, b, s),
                        &NdSettings::default(),
                    )?;
                    let loc_hat = &x1 - &scale_hat;
                    [b_hat, loc_hat, scale_hat]
                }
            })
        })?;
        Ok((b_hat, loc_hat, scale_hat))
    }

    fn logpdf_raw(&self, x: &Mpf) -> Mpf {
        if *x < self.lower_bound() {
            return Mpf::neg_infinity();
        }
        self.b.ln() - (&self.b + 1) * (x - &self.loc).ln() + &self.b * self.scale.ln()
    }
}

fn min_value(x: &[Mpf]) -> Mpf {
    x.iter()
        .skip(1)
        .fold(x[0].clone(), |acc, t| if *t < acc { t.clone() } else { acc })
}

/// Closed-form shape for known loc and scale: `n / (Σ ln(x − loc) − n ln scale)`.
fn shape_given(x: &[Mpf], n: &Mpf, loc: &Mpf, scale: &Mpf) -> Mpf {
    let logs: Vec<Mpf> = x.iter().map(|t| (t - loc).ln()).collect();
    1 / (fsum(&logs) / n - scale.ln())
}

/// Score equations in (b, scale) with loc eliminated as `x1 − scale`.
fn shape_scale_score(x: &[Mpf], x1: &Mpf, n: &Mpf, b: &Mpf, s: &Mpf) -> [Mpf; 2] {
    let shifted: Vec<Mpf> = x.iter().map(|t| t - x1 + s).collect();
    let logs: Vec<Mpf> = shifted.iter().map(|d| d.ln()).collect();
    let recips: Vec<Mpf> = shifted.iter().map(|d| d.recip()).collect();
    let eq_b = n / b + n * s.ln() - fsum(&logs);
    let eq_s = n * b / s - (b + 1) * fsum(&recips);
    [eq_b, eq_s]
}

impl ContinuousDistribution for Pareto {
    fn pdf(&self, x: &Mpf) -> Mpf {
        evaluate(|| {
            if *x < self.lower_bound() {
                return Mpf::zero();
            }
            let z = (x - &self.loc) / &self.scale;
            &self.b * z.powf(&(-&self.b - 1)) / &self.scale
        })
    }

    fn logpdf(&self, x: &Mpf) -> Mpf {
        evaluate(|| self.logpdf_raw(x))
    }

    fn cdf(&self, x: &Mpf) -> Result<Mpf, DistError> {
        Ok(evaluate(|| {
            if *x < self.lower_bound() {
                return Mpf::zero();
            }
            let z = (x - &self.loc) / &self.scale;
            -powm1(&z, &-&self.b)
        }))
    }

    fn sf(&self, x: &Mpf) -> Result<Mpf, DistError> {
        Ok(evaluate(|| {
            if *x < self.lower_bound() {
                return Mpf::from(1);
            }
            let z = (x - &self.loc) / &self.scale;
            z.powf(&-&self.b)
        }))
    }

    fn invcdf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        if p.is_zero() {
            return Ok(evaluate(|| self.lower_bound()));
        }
        if *p == 1 {
            return Ok(Mpf::infinity());
        }
        Ok(evaluate(|| {
            &self.loc + &self.scale * inv_powm1(&-p, &-&self.b)
        }))
    }

    fn invsf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        if p.is_zero() {
            return Ok(Mpf::infinity());
        }
        if *p == 1 {
            return Ok(evaluate(|| self.lower_bound()));
        }
        Ok(evaluate(|| {
            &self.loc + &self.scale * p.powf(&-self.b.recip())
        }))
    }

    fn support(&self) -> (Mpf, Mpf) {
        (evaluate(|| self.lower_bound()), Mpf::infinity())
    }

    /// Infinite for b ≤ 1.
    fn mean(&self) -> Result<Mpf, DistError> {
        Ok(evaluate(|| {
            if self.b <= 1 {
                return Mpf::infinity();
            }
            &self.loc + &self.scale * &self.b / (&self.b - 1)
        }))
    }

    /// Infinite for 1 < b ≤ 2, NaN for b ≤ 1 where the mean is infinite.
    fn var(&self) -> Result<Mpf, DistError> {
        Ok(evaluate(|| {
            if self.b <= 1 {
                return Mpf::nan();
            }
            if self.b <= 2 {
                return Mpf::infinity();
            }
            let b = &self.b;
            self.scale.square() * b / (b - 1i32).square() / (b - 2)
        }))
    }
}
