use num_traits::Zero;

use crate::mp::{fsum, Mpf};
use crate::optim::{find_root, RootSettings, Solver, Start};
use crate::stats;

use super::{
    evaluate, require_finite, require_positive, try_evaluate_params, validate_p,
    validate_sample_nonempty, ContinuousDistribution, DistError, Param,
};

/// Gumbel distribution for maxima (type I extreme value).
///
/// F(x) = exp(−exp(−(x − loc)/scale)).
///
/// # Example
///
/// ```
/// use mpdist::mp::Mpf;
/// use mpdist::distributions::{ContinuousDistribution, GumbelMax};
///
/// let g = GumbelMax::new(0, 1).unwrap();
/// // F(0) = 1/e
/// assert!((g.cdf(&Mpf::from(0)).unwrap() - (-1.0f64).exp()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GumbelMax {
    loc: Mpf,
    scale: Mpf,
}

impl GumbelMax {
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

    fn z(&self, x: &Mpf) -> Mpf {
        (x - &self.loc) / &self.scale
    }

    /// Negative log-likelihood `n ln scale + Σ z + Σ e^{−z}`.
    pub fn nll(&self, x: &[Mpf]) -> Mpf {
        evaluate(|| {
            let z: Vec<Mpf> = x.iter().map(|t| self.z(t)).collect();
            let ez: Vec<Mpf> = z.iter().map(|t| (-t).exp()).collect();
            Mpf::from(x.len()) * self.scale.ln() + fsum(&z) + fsum(&ez)
        })
    }

    /// Maximum likelihood estimates of (loc, scale).
    ///
    /// A free scale is the root of its score equation, found with the
    /// secant method from the sample standard deviation (or the
    /// [`Param::Initial`] guess). loc then has the closed form
    /// `−scale · ln(mean(e^{−x/scale}))`.
    pub fn mle(x: &[Mpf], loc: Param, scale: Param) -> Result<(Mpf, Mpf), DistError> {
        validate_sample_nonempty(x)?;
        let fixed_loc = loc.fixed_value().map(|v| require_finite("loc", v.clone())).transpose()?;
        let fixed_scale = scale
            .fixed_value()
            .map(|v| require_positive("scale", v.clone()))
            .transpose()?;

        let [loc_hat, scale_hat] = try_evaluate_params(|| {
            let settings = RootSettings::default();
            let scale_hat = match (&fixed_loc, fixed_scale) {
                (_, Some(scale)) => scale,
                (Some(loc), None) => {
                    log::debug!("gumbel_max mle: fitting scale with loc fixed");
                    let shifted: Vec<Mpf> = x.iter().map(|t| t - loc).collect();
                    let s0 = scale.guess_or(stats::std(&shifted, 0)?);
                    find_root(
                        |s: &Mpf| scale_score_fixed_loc(s, &shifted),
                        Start::Point(s0),
                        Solver::Secant,
                        &settings,
                    )?
                    .x
                }
                (None, None) => {
                    log::debug!("gumbel_max mle: fitting scale with loc free");
                    let xbar = stats::mean(x)?;
                    let s0 = scale.guess_or(stats::std(x, 0)?);
                    find_root(
                        |s: &Mpf| scale_score(s, x, &xbar),
                        Start::Point(s0),
                        Solver::Secant,
                        &settings,
                    )?
                    .x
                }
            };
            let loc_hat = match fixed_loc {
                Some(loc) => loc,
                None => {
                    let ex: Vec<Mpf> = x.iter().map(|t| (-(t / &scale_hat)).exp()).collect();
                    -(&scale_hat) * stats::mean(&ex)?.ln()
                }
            };
            Ok([loc_hat, scale_hat])
        })?;
        Ok((loc_hat, scale_hat))
    }
}

/// Score equation for the scale after eliminating loc:
/// `Σe^{−x/s} (x̄ − s) − Σ x e^{−x/s}`.
fn scale_score(s: &Mpf, x: &[Mpf], xbar: &Mpf) -> Mpf {
    let emx: Vec<Mpf> = x.iter().map(|t| (-(t / s)).exp()).collect();
    let weighted: Vec<Mpf> = x.iter().zip(&emx).map(|(t, e)| t * e).collect();
    fsum(&emx) * (xbar - s) - fsum(&weighted)
}

/// Score equation for the scale with loc fixed, on `d = x − loc`:
/// `mean(z · expm1(−z)) + 1` with `z = d/s`.
fn scale_score_fixed_loc(s: &Mpf, shifted: &[Mpf]) -> Mpf {
    let terms: Vec<Mpf> = shifted
        .iter()
        .map(|d| {
            let z = d / s;
            (-&z).exp_m1() * z
        })
        .collect();
    fsum(&terms) / Mpf::from(shifted.len()) + 1
}

impl ContinuousDistribution for GumbelMax {
    fn pdf(&self, x: &Mpf) -> Mpf {
        evaluate(|| self.logpdf(x).exp())
    }

    fn logpdf(&self, x: &Mpf) -> Mpf {
        evaluate(|| {
            let z = self.z(x);
            -(&z + (-&z).exp()) - self.scale.ln()
        })
    }

    fn cdf(&self, x: &Mpf) -> Result<Mpf, DistError> {
        Ok(evaluate(|| (-(-self.z(x)).exp()).exp()))
    }

    fn sf(&self, x: &Mpf) -> Result<Mpf, DistError> {
        Ok(evaluate(|| -(-(-self.z(x)).exp()).exp_m1()))
    }

    fn invcdf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        if p.is_zero() {
            return Ok(Mpf::neg_infinity());
        }
        if *p == 1 {
            return Ok(Mpf::infinity());
        }
        Ok(evaluate(|| &self.loc - &self.scale * (-p.ln()).ln()))
    }

    fn invsf(&self, p: &Mpf) -> Result<Mpf, DistError> {
        validate_p(p)?;
        if p.is_zero() {
            return Ok(Mpf::infinity());
        }
        if *p == 1 {
            return Ok(Mpf::neg_infinity());
        }
        Ok(evaluate(|| &self.loc - &self.scale * (-(-p).ln_1p()).ln()))
    }

    fn support(&self) -> (Mpf, Mpf) {
        (Mpf::neg_infinity(), Mpf::infinity())
    }

    /// `loc + γ·scale`.
    fn mean(&self) -> Result<Mpf, DistError> {
        Ok(evaluate(|| &self.loc + Mpf::euler() * &self.scale))
    }

    /// `π²/6 · scale²`.
    fn var(&self) -> Result<Mpf, DistError> {
        Ok(evaluate(|| Mpf::pi().square() / 6 * self.scale.square()))
    }
}
