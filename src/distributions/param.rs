use crate::mp::Mpf;
use crate::optim::{find_root_nd, NdSettings};

use super::DistError;

/// How a parameter enters a maximum likelihood fit.
///
/// Plain values convert to [`Param::Fixed`], so `mle(&x, 2.5.into(), Param::Free)`
/// holds the first parameter at 2.5.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Param {
    /// Estimate the parameter starting from the distribution's default guess.
    #[default]
    Free,
    /// Estimate the parameter starting from the given guess.
    Initial(Mpf),
    /// Hold the parameter at the given value.
    Fixed(Mpf),
}

impl Param {
    pub fn initial(v: impl Into<Mpf>) -> Self {
        Param::Initial(v.into())
    }

    pub fn fixed(v: impl Into<Mpf>) -> Self {
        Param::Fixed(v.into())
    }

    /// True only for [`Param::Fixed`]; an initial guess is still free.
    pub fn is_fixed(&self) -> bool {
        matches!(self, Param::Fixed(_))
    }

    pub fn fixed_value(&self) -> Option<&Mpf> {
        match self {
            Param::Fixed(v) => Some(v),
            _ => None,
        }
    }

    /// The fixed value or initial guess, else `default`.
    pub fn guess_or(&self, default: Mpf) -> Mpf {
        match self {
            Param::Free => default,
            Param::Initial(v) | Param::Fixed(v) => v.clone(),
        }
    }
}

impl From<Mpf> for Param {
    fn from(v: Mpf) -> Self {
        Param::Fixed(v)
    }
}

impl From<&Mpf> for Param {
    fn from(v: &Mpf) -> Self {
        Param::Fixed(v.clone())
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Fixed(Mpf::from(v))
    }
}

impl From<i32> for Param {
    fn from(v: i32) -> Self {
        Param::Fixed(Mpf::from(v))
    }
}

/// Split of `N` parameters into fixed values and free unknowns.
///
/// Holds a full parameter vector in which fixed entries carry their value
/// and free entries their starting guess. A solver works on the free
/// entries only; [`expand`](Self::expand) puts its answer back in place.
#[derive(Debug, Clone)]
pub struct FreeParams<const N: usize> {
    values: [Mpf; N],
    free: Vec<usize>,
}

impl<const N: usize> FreeParams<N> {
    /// Classify `params`, taking `defaults[i]` as the guess for each
    /// [`Param::Free`] entry.
    pub fn new(params: &[Param; N], defaults: [Mpf; N]) -> Self {
        let mut free = Vec::with_capacity(N);
        let mut values = defaults;
        for (i, p) in params.iter().enumerate() {
            match p {
                Param::Fixed(v) => values[i] = v.clone(),
                Param::Initial(v) => {
                    values[i] = v.clone();
                    free.push(i);
                }
                Param::Free => free.push(i),
            }
        }
        Self { values, free }
    }

    pub fn all_fixed(&self) -> bool {
        self.free.is_empty()
    }

    /// Indices of the free parameters, in order.
    pub fn free_indices(&self) -> &[usize] {
        &self.free
    }

    /// Fixed values and starting guesses.
    pub fn values(&self) -> &[Mpf; N] {
        &self.values
    }

    /// Starting guesses of the free parameters.
    pub fn initial_guess(&self) -> Vec<Mpf> {
        self.free.iter().map(|&i| self.values[i].clone()).collect()
    }

    /// Full parameter vector with the free entries replaced by `free_values`.
    pub fn expand(&self, free_values: &[Mpf]) -> [Mpf; N] {
        let mut full = self.values.clone();
        for (&i, v) in self.free.iter().zip(free_values) {
            full[i] = v.clone();
        }
        full
    }
}

/// Maximize a likelihood over the free parameters by solving their score
/// equations.
///
/// `score` returns all `N` partial derivatives of the log-likelihood at a
/// full parameter vector; only the entries of the free parameters form the
/// reduced system handed to [`find_root_nd`]. With every parameter fixed,
/// the fixed values come back without calling the solver.
pub fn solve_score_equations<const N: usize>(
    params: &FreeParams<N>,
    mut score: impl FnMut(&[Mpf; N]) -> [Mpf; N],
    settings: &NdSettings,
) -> Result<[Mpf; N], DistError> {
    if params.all_fixed() {
        return Ok(params.values().clone());
    }
    log::debug!(
        "solve_score_equations: {} free of {} parameters",
        params.free_indices().len(),
        N
    );

    let reduced = |free_values: &[Mpf]| -> Vec<Mpf> {
        let full = params.expand(free_values);
        let s = score(&full);
        params.free_indices().iter().map(|&i| s[i].clone()).collect()
    };
    let root = find_root_nd(reduced, &params.initial_guess(), settings)?;
    Ok(params.expand(&root.x).map(|v| v.rounded()))
}
