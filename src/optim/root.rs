use core::cell::Cell;
use core::fmt;
use core::str::FromStr;

use num_traits::Zero;

use crate::mp::{self, Mpf};

use super::{default_tol, OptimError, RootResult};

/// Scalar root-finding method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solver {
    Bisect,
    Secant,
    Newton,
    Illinois,
    Anderson,
    Pegasus,
    Brent,
}

impl Solver {
    pub const ALL: [Solver; 7] = [
        Solver::Bisect,
        Solver::Secant,
        Solver::Newton,
        Solver::Illinois,
        Solver::Anderson,
        Solver::Pegasus,
        Solver::Brent,
    ];

    /// Lower-case name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Solver::Bisect => "bisect",
            Solver::Secant => "secant",
            Solver::Newton => "newton",
            Solver::Illinois => "illinois",
            Solver::Anderson => "anderson",
            Solver::Pegasus => "pegasus",
            Solver::Brent => "brent",
        }
    }

    /// Whether the solver needs a sign-changing pair of starting points.
    pub fn is_bracketing(self) -> bool {
        !matches!(self, Solver::Secant | Solver::Newton)
    }

    /// Default step limit at the current working precision.
    pub fn default_max_steps(self) -> usize {
        match self {
            Solver::Secant | Solver::Illinois | Solver::Anderson | Solver::Pegasus => 30,
            Solver::Newton => 20,
            // Linear convergence: roughly one bit per step.
            Solver::Bisect | Solver::Brent => mp::prec() as usize + 30,
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Solver {
    type Err = OptimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Solver::ALL
            .into_iter()
            .find(|solver| solver.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| OptimError::UnknownSolver(s.to_string()))
    }
}

/// Starting point(s) for a scalar solver.
#[derive(Debug, Clone, PartialEq)]
pub enum Start {
    /// Single starting point.
    Point(Mpf),
    /// Two starting points; a bracket for bracketing solvers.
    Pair(Mpf, Mpf),
}

impl Start {
    /// A point for Newton (the midpoint of a pair).
    fn point(&self) -> Mpf {
        match self {
            Start::Point(x) => x.clone(),
            Start::Pair(a, b) => (a + b) >> 1,
        }
    }

    /// Two points for the secant method; a lone point `x` is paired with `x + 1/4`.
    fn secant_pair(&self) -> (Mpf, Mpf) {
        match self {
            Start::Point(x) => (x.clone(), x + 0.25),
            Start::Pair(a, b) => (a.clone(), b.clone()),
        }
    }

    fn first(&self) -> &Mpf {
        match self {
            Start::Point(x) | Start::Pair(x, _) => x,
        }
    }
}

/// Settings for scalar root finding.
#[derive(Debug, Clone)]
pub struct RootSettings {
    /// Step tolerance; `None` means `eps * 2^10` at the solver's precision.
    pub tol: Option<Mpf>,
    /// Step limit; `None` means [`Solver::default_max_steps`].
    pub max_steps: Option<usize>,
    /// Require `|f(x)|^2 <= tol` at the returned point.
    pub verify: bool,
    /// Bits added to the working precision while solving.
    pub extra_prec: u32,
}

impl Default for RootSettings {
    fn default() -> Self {
        Self {
            tol: None,
            max_steps: None,
            verify: true,
            extra_prec: 20,
        }
    }
}

/// Where an iteration stopped.
struct Iterate {
    x: Mpf,
    iterations: usize,
    /// The step criterion was met (or no further progress was possible).
    converged: bool,
}

impl Iterate {
    fn converged(x: Mpf, iterations: usize) -> Self {
        Self {
            x,
            iterations,
            converged: true,
        }
    }

    fn exhausted(x: Mpf, iterations: usize) -> Self {
        Self {
            x,
            iterations,
            converged: false,
        }
    }
}

/// Step-size acceptance test shared by all solvers.
struct Criterion<'a> {
    tol: &'a Mpf,
    max_steps: usize,
}

impl Criterion<'_> {
    fn accepts(&self, x: &Mpf, error: &Mpf) -> bool {
        *error < self.tol * &x.abs().max(&Mpf::from(1))
    }
}

type Func<'a> = dyn FnMut(&Mpf) -> Mpf + 'a;

/// Find a root of the scalar function `f`.
///
/// Runs `solver` at the working precision plus
/// [`RootSettings::extra_prec`] bits. Each step produces an estimate and
/// an error bound; iteration stops when the error is below
/// `tol * max(1, |x|)` or after `max_steps` steps. If `f(start)` is
/// already zero the start is returned immediately.
///
/// Newton uses a central-difference derivative; see
/// [`find_root_with_derivative`] for an analytic one.
///
/// # Errors
///
/// - [`OptimError::BracketInvalid`]: a bracketing solver got a single point
///   or a pair without a sign change.
/// - [`OptimError::Singular`]: zero slope before any step was taken.
/// - [`OptimError::NotFinite`]: an iterate became NaN or infinite.
/// - [`OptimError::MaxIterations`]: the step limit was hit and the residual
///   check failed.
/// - [`OptimError::NoConvergence`]: the step criterion was met but the
///   residual check failed.
///
/// # Example
///
/// ```
/// use mpdist::mp::{self, Mpf};
/// use mpdist::optim::{find_root, RootSettings, Solver, Start};
///
/// let _prec = mp::workdps(50);
/// let r = find_root(
///     |x: &Mpf| x.square() - 2,
///     Start::Pair(Mpf::from(1), Mpf::from(2)),
///     Solver::Anderson,
///     &RootSettings::default(),
/// )
/// .unwrap();
/// assert!((r.x - Mpf::from(2).sqrt()).abs() < 1e-48);
/// ```
pub fn find_root(
    mut f: impl FnMut(&Mpf) -> Mpf,
    start: Start,
    solver: Solver,
    settings: &RootSettings,
) -> Result<RootResult, OptimError> {
    solve(&mut f, None, start, solver, settings)
}

/// Newton's method with an analytic derivative `df`.
///
/// Same stopping rules and errors as [`find_root`] with [`Solver::Newton`].
pub fn find_root_with_derivative(
    mut f: impl FnMut(&Mpf) -> Mpf,
    mut df: impl FnMut(&Mpf) -> Mpf,
    x0: Mpf,
    settings: &RootSettings,
) -> Result<RootResult, OptimError> {
    solve(&mut f, Some(&mut df), Start::Point(x0), Solver::Newton, settings)
}

fn solve(
    f: &mut Func<'_>,
    df: Option<&mut Func<'_>>,
    start: Start,
    solver: Solver,
    settings: &RootSettings,
) -> Result<RootResult, OptimError> {
    let _prec = mp::extraprec(settings.extra_prec);
    let tol = settings.tol.clone().unwrap_or_else(default_tol);
    let criterion = Criterion {
        tol: &tol,
        max_steps: settings.max_steps.unwrap_or_else(|| solver.default_max_steps()),
    };

    let evals = Cell::new(0usize);
    let mut counted = |x: &Mpf| {
        evals.set(evals.get() + 1);
        f(x)
    };

    let f0 = counted(start.first());
    if f0.is_zero() {
        return Ok(RootResult {
            x: start.first().clone(),
            fx: f0,
            iterations: 0,
            evals: evals.get(),
        });
    }

    log::debug!(
        "find_root: {} with tol {:.5}, at most {} steps",
        solver,
        tol,
        criterion.max_steps
    );

    let iterate = match solver {
        Solver::Secant => {
            let (x0, x1) = start.secant_pair();
            secant(&mut counted, x0, x1, &criterion)?
        }
        Solver::Newton => newton(&mut counted, df, start.point(), &criterion)?,
        Solver::Bisect => {
            let (a, b) = bracketing_pair(&start)?;
            bisect(&mut counted, a, b, &criterion)?
        }
        Solver::Illinois | Solver::Anderson | Solver::Pegasus => {
            let (a, b) = bracketing_pair(&start)?;
            illinois(&mut counted, a, b, solver, &criterion)?
        }
        Solver::Brent => {
            let (a, b) = bracketing_pair(&start)?;
            brent(&mut counted, a, b, &criterion)?
        }
    };

    let fx = counted(&iterate.x);
    if settings.verify {
        let residual = fx.square();
        if residual > tol {
            return Err(if iterate.converged {
                OptimError::NoConvergence { residual }
            } else {
                OptimError::MaxIterations
            });
        }
    }

    Ok(RootResult {
        x: iterate.x,
        fx,
        iterations: iterate.iterations,
        evals: evals.get(),
    })
}

fn bracketing_pair(start: &Start) -> Result<(Mpf, Mpf), OptimError> {
    match start {
        Start::Pair(a, b) => Ok((a.clone(), b.clone())),
        Start::Point(_) => Err(OptimError::BracketInvalid),
    }
}

/// `fa` and `fb` differ in sign, or one of them is zero.
fn opposite_signs(fa: &Mpf, fb: &Mpf) -> bool {
    use core::cmp::Ordering::{Equal, Greater, Less};
    matches!(
        (fa.sign(), fb.sign()),
        (Some(Less), Some(Greater)) | (Some(Greater), Some(Less)) | (Some(Equal), Some(_)) | (Some(_), Some(Equal))
    )
}

fn check_finite(x: &Mpf) -> Result<(), OptimError> {
    if x.is_finite() {
        Ok(())
    } else {
        Err(OptimError::NotFinite)
    }
}

fn secant(f: &mut Func<'_>, mut x0: Mpf, mut x1: Mpf, crit: &Criterion<'_>) -> Result<Iterate, OptimError> {
    let mut f0 = f(&x0);
    for step in 0..crit.max_steps {
        let f1 = f(&x1);
        let l = &x1 - &x0;
        if l.is_zero() {
            return Ok(Iterate::converged(x1, step));
        }
        let s = (&f1 - &f0) / &l;
        if s.is_zero() {
            if step == 0 {
                return Err(OptimError::Singular);
            }
            return Ok(Iterate::exhausted(x1, step));
        }
        let next = &x1 - &f1 / &s;
        check_finite(&next)?;
        x0 = core::mem::replace(&mut x1, next);
        f0 = f1;
        let error = l.abs();
        log::trace!("secant step {}: x = {}, error = {:.5}", step + 1, x1, error);
        if crit.accepts(&x1, &error) {
            return Ok(Iterate::converged(x1, step + 1));
        }
    }
    Ok(Iterate::exhausted(x1, crit.max_steps))
}

fn newton(
    f: &mut Func<'_>,
    mut df: Option<&mut Func<'_>>,
    mut x: Mpf,
    crit: &Criterion<'_>,
) -> Result<Iterate, OptimError> {
    for step in 0..crit.max_steps {
        let slope = match df.as_deref_mut() {
            Some(df) => df(&x),
            None => central_difference(f, &x),
        };
        if slope.is_zero() {
            return Err(OptimError::Singular);
        }
        let next = &x - f(&x) / slope;
        check_finite(&next)?;
        let error = (&next - &x).abs();
        x = next;
        log::trace!("newton step {}: x = {}, error = {:.5}", step + 1, x, error);
        if crit.accepts(&x, &error) {
            return Ok(Iterate::converged(x, step + 1));
        }
    }
    Ok(Iterate::exhausted(x, crit.max_steps))
}

/// Central difference `(f(x + h) - f(x - h)) / 2h` at doubled precision.
fn central_difference(f: &mut Func<'_>, x: &Mpf) -> Mpf {
    let bits = mp::prec();
    let _prec = mp::workprec(2 * bits + 10);
    let h = x.abs().max(&Mpf::from(1)) >> (bits as i32 / 2);
    (f(&(x + &h)) - f(&(x - &h))) / (h << 1)
}

fn bisect(f: &mut Func<'_>, mut a: Mpf, mut b: Mpf, crit: &Criterion<'_>) -> Result<Iterate, OptimError> {
    let fa = f(&a);
    let mut fb = f(&b);
    if !opposite_signs(&fa, &fb) {
        return Err(OptimError::BracketInvalid);
    }
    if fb.is_zero() {
        return Ok(Iterate::converged(b, 0));
    }
    let mut l = &b - &a;
    for step in 0..crit.max_steps {
        let m = (&a + &b) >> 1;
        let fm = f(&m);
        match (&fm * &fb).sign() {
            Some(core::cmp::Ordering::Less) => a = m,
            Some(core::cmp::Ordering::Greater) => {
                b = m;
                fb = fm;
            }
            _ => return Ok(Iterate::converged(m, step + 1)),
        }
        l = l >> 1;
        let x = (&a + &b) >> 1;
        let error = l.abs();
        log::trace!("bisect step {}: x = {}, error = {:.5}", step + 1, x, error);
        if crit.accepts(&x, &error) {
            return Ok(Iterate::converged(x, step + 1));
        }
    }
    Ok(Iterate::exhausted((a + b) >> 1, crit.max_steps))
}

/// Scale factor applied to the retained end when the new point lands on
/// the same side as the previous one.
fn stale_end_factor(solver: Solver, fz: &Mpf, fb: &Mpf) -> Mpf {
    match solver {
        Solver::Pegasus => fb / (fb + fz),
        Solver::Anderson => {
            let m = 1 - fz / fb;
            if m > 0 {
                m
            } else {
                Mpf::from(0.5)
            }
        }
        _ => Mpf::from(0.5),
    }
}

fn illinois(
    f: &mut Func<'_>,
    mut a: Mpf,
    mut b: Mpf,
    solver: Solver,
    crit: &Criterion<'_>,
) -> Result<Iterate, OptimError> {
    let mut fa = f(&a);
    let mut fb = f(&b);
    if !opposite_signs(&fa, &fb) {
        return Err(OptimError::BracketInvalid);
    }
    if fb.is_zero() {
        return Ok(Iterate::converged(b, 0));
    }
    for step in 0..crit.max_steps {
        let l = &b - &a;
        if l.is_zero() {
            return Ok(Iterate::converged(b, step));
        }
        let s = (&fb - &fa) / &l;
        let z = &a - &fa / &s;
        check_finite(&z)?;
        let fz = f(&z);
        if fz.abs() < *crit.tol {
            log::trace!("{} step {}: |f(z)| below tol at z = {}", solver, step + 1, z);
            return Ok(Iterate::converged(z, step + 1));
        }
        if (&fz * &fb) < 0 {
            a = core::mem::replace(&mut b, z);
            fa = core::mem::replace(&mut fb, fz);
        } else {
            let m = stale_end_factor(solver, &fz, &fb);
            b = z;
            fb = fz;
            fa = fa * m;
        }
        let x = (&a + &b) >> 1;
        let error = l.abs();
        log::trace!("{} step {}: x = {}, error = {:.5}", solver, step + 1, x, error);
        if crit.accepts(&x, &error) {
            return Ok(Iterate::converged(x, step + 1));
        }
    }
    Ok(Iterate::exhausted((a + b) >> 1, crit.max_steps))
}

fn brent(f: &mut Func<'_>, a: Mpf, b: Mpf, crit: &Criterion<'_>) -> Result<Iterate, OptimError> {
    let mut a = a;
    let mut b = b;
    let mut fa = f(&a);
    let mut fb = f(&b);

    if !opposite_signs(&fa, &fb) {
        return Err(OptimError::BracketInvalid);
    }

    // Keep |f(a)| >= |f(b)| so b is the best approximation
    if fa.abs() < fb.abs() {
        core::mem::swap(&mut a, &mut b);
        core::mem::swap(&mut fa, &mut fb);
    }

    let mut c = a.clone();
    let mut fc = fa.clone();
    let mut d = &b - &a;
    let mut mflag = true;

    for step in 0..crit.max_steps {
        let width = (&b - &a).abs();
        if fb.is_zero() || crit.accepts(&b, &width) {
            return Ok(Iterate::converged(b, step));
        }
        let x_tol = crit.tol * &b.abs().max(&Mpf::from(1));

        let mut s = if fa != fc && fb != fc {
            // Inverse quadratic interpolation
            &a * &fb * &fc / ((&fa - &fb) * (&fa - &fc))
                + &b * &fa * &fc / ((&fb - &fa) * (&fb - &fc))
                + &c * &fa * &fb / ((&fc - &fa) * (&fc - &fb))
        } else {
            // Secant
            &b - &fb * (&b - &a) / (&fb - &fa)
        };

        // Fall back to bisection when the interpolant leaves the safe region
        let three_quarter = (&a * 3 + &b) >> 2;
        let outside = if three_quarter < b {
            s < three_quarter || s > b
        } else {
            s > three_quarter || s < b
        };
        let step_sb = (&s - &b).abs();
        let slow = if mflag {
            step_sb >= (&b - &c).abs() >> 1 || (&b - &c).abs() < x_tol
        } else {
            step_sb >= (&c - &d).abs() >> 1 || (&c - &d).abs() < x_tol
        };

        if outside || slow || !s.is_finite() {
            s = (&a + &b) >> 1;
            mflag = true;
        } else {
            mflag = false;
        }

        let fs = f(&s);
        log::trace!("brent step {}: s = {}, width = {:.5}", step + 1, s, width);

        d = core::mem::replace(&mut c, b.clone());
        fc = fb.clone();

        if (&fa * &fs) < 0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }

        if fa.abs() < fb.abs() {
            core::mem::swap(&mut a, &mut b);
            core::mem::swap(&mut fa, &mut fb);
        }
    }

    Ok(Iterate::exhausted(b, crit.max_steps))
}
