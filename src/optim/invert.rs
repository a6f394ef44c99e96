use crate::mp::{self, Mpf};

use super::{
    find_bracket, find_bracket_by_expansion_0_inf, Bracket, Monotonicity, OptimError, RootSettings,
    Solver, Start,
};
use super::root::find_root;

/// Options for [`invert_monotone`].
#[derive(Debug, Clone)]
pub struct InvertOptions {
    /// Solver run on the bracket.
    pub solver: Solver,
    /// Solver tried once if `solver` fails.
    pub fallback: Option<Solver>,
    /// Bisection refinements when bracketing.
    pub nbisect: usize,
    pub settings: RootSettings,
}

impl Default for InvertOptions {
    fn default() -> Self {
        Self {
            solver: Solver::Secant,
            fallback: None,
            nbisect: super::bracket::DEFAULT_NBISECT,
            settings: RootSettings::default(),
        }
    }
}

impl InvertOptions {
    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_fallback(mut self, fallback: Solver) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_nbisect(mut self, nbisect: usize) -> Self {
        self.nbisect = nbisect;
        self
    }
}

/// Starting point(s) for the first attempt: Newton starts at the
/// midpoint, every other solver on the bracket ends.
fn start_for(solver: Solver, bracket: &Bracket) -> Start {
    match solver {
        Solver::Newton => Start::Point(bracket.midpoint()),
        _ => Start::Pair(bracket.lo.clone(), bracket.hi.clone()),
    }
}

/// Starting point(s) for the fallback: non-bracketing solvers restart
/// from the midpoint.
fn fallback_start(solver: Solver, bracket: &Bracket) -> Start {
    if solver.is_bracketing() {
        Start::Pair(bracket.lo.clone(), bracket.hi.clone())
    } else {
        Start::Point(bracket.midpoint())
    }
}

/// Solve `f(x) = p` for `f` monotone on `[a, b]`.
///
/// Brackets the solution with [`find_bracket`] and runs
/// [`InvertOptions::solver`] on `f(x) - p`. An exact bracket returns its
/// point without solving. If the solver fails and a fallback is
/// configured, the fallback is tried once: bracketing solvers reuse the
/// bracket, the others start from its midpoint.
pub fn invert_monotone(
    mut f: impl FnMut(&Mpf) -> Mpf,
    p: &Mpf,
    a: &Mpf,
    b: &Mpf,
    opts: &InvertOptions,
) -> Result<Mpf, OptimError> {
    let bracket = find_bracket(&mut f, p, a, b, Some(opts.nbisect))?;
    if bracket.is_exact() {
        return Ok(bracket.lo);
    }
    log::trace!("invert_monotone: bracket [{}, {}]", bracket.lo, bracket.hi);

    let mut shifted = |x: &Mpf| f(x) - p;
    match find_root(
        &mut shifted,
        start_for(opts.solver, &bracket),
        opts.solver,
        &opts.settings,
    ) {
        Ok(r) => Ok(r.x),
        Err(e) => match opts.fallback {
            Some(fallback) => {
                log::debug!(
                    "invert_monotone: {} failed ({}), retrying with {}",
                    opts.solver,
                    e,
                    fallback
                );
                find_root(
                    &mut shifted,
                    fallback_start(fallback, &bracket),
                    fallback,
                    &opts.settings,
                )
                .map(|r| r.x)
            }
            None => Err(e),
        },
    }
}

/// Invert `f` monotone on `(0, ∞)` at doubled working precision.
///
/// The bracket comes from [`find_bracket_by_expansion_0_inf`]. Unless
/// `settings` says otherwise, the solver may take up to `2 * prec` steps
/// (counted at the doubled precision). The root is rounded back to the
/// caller's precision.
pub fn generic_inv(
    mut f: impl FnMut(&Mpf) -> Mpf,
    p: &Mpf,
    direction: Monotonicity,
    solver: Solver,
    settings: &RootSettings,
) -> Result<Mpf, OptimError> {
    let x = {
        let _prec = mp::workprec(2 * mp::prec());
        let mut settings = settings.clone();
        if settings.max_steps.is_none() {
            settings.max_steps = Some(2 * mp::prec() as usize);
        }

        let bracket = find_bracket_by_expansion_0_inf(&mut f, p, direction);
        log::trace!("generic_inv: bracket [{}, {}]", bracket.lo, bracket.hi);
        let start = if solver.is_bracketing() {
            Start::Pair(bracket.lo.clone(), bracket.hi.clone())
        } else {
            Start::Point(bracket.midpoint())
        };
        find_root(|x: &Mpf| f(x) - p, start, solver, &settings)?.x
    };
    Ok(x.rounded())
}
