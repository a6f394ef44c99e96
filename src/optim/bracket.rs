use core::cmp::Ordering;

use num_traits::Zero;

use crate::mp::Mpf;

use super::OptimError;

/// Closed interval `[lo, hi]` known to contain the solution of `f(x) = p`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bracket {
    pub lo: Mpf,
    pub hi: Mpf,
}

impl Bracket {
    pub fn new(lo: Mpf, hi: Mpf) -> Self {
        Self { lo, hi }
    }

    /// True when both ends coincide, i.e. `f(lo) == p` was hit exactly.
    pub fn is_exact(&self) -> bool {
        self.lo == self.hi
    }

    pub fn midpoint(&self) -> Mpf {
        (&self.lo + &self.hi) >> 1
    }

    pub fn width(&self) -> Mpf {
        &self.hi - &self.lo
    }
}

/// Direction of a strictly monotone function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monotonicity {
    Increasing,
    Decreasing,
}

/// Default number of bisection refinements in [`find_bracket`].
pub const DEFAULT_NBISECT: usize = 8;

/// Find an interval bracketing the solution of `f(x) = p`.
///
/// `f` must be finite and strictly monotone on `[a, b]`; either end may be
/// infinite. The direction of `f` is taken from `sign(f(b) - f(a))`. An
/// infinite end is replaced by a finite point found by doubling a step
/// away from the other end (or away from ±1 when both ends are infinite).
/// The resulting bracket is then refined by `nbisect` bisection steps
/// (default 8).
///
/// When `p` equals `f(a)`, `f(b)` or a bisection midpoint exactly, the
/// returned bracket has `lo == hi` at that point.
///
/// # Errors
///
/// Returns [`OptimError::BracketInvalid`] if `a >= b` or `f(a) == f(b)`,
/// and [`OptimError::NotFinite`] if `f(a)` or `f(b)` is NaN.
///
/// The expansion loops have no iteration cap: a function that is not
/// monotone (or is constant towards an infinite end) can make this loop
/// forever.
///
/// # Example
///
/// ```
/// use mpdist::mp::Mpf;
/// use mpdist::optim::find_bracket;
///
/// let p = Mpf::from(1) / 16;
/// let br = find_bracket(|x: &Mpf| x.exp(), &p, &Mpf::neg_infinity(), &Mpf::from(0), None).unwrap();
/// let root = -Mpf::from(16).ln();
/// assert!(br.lo < root && root < br.hi);
/// ```
pub fn find_bracket(
    mut f: impl FnMut(&Mpf) -> Mpf,
    p: &Mpf,
    a: &Mpf,
    b: &Mpf,
    nbisect: Option<usize>,
) -> Result<Bracket, OptimError> {
    if a.partial_cmp(b) != Some(Ordering::Less) {
        return Err(OptimError::BracketInvalid);
    }

    let pa = f(a);
    if *p == pa {
        return Ok(Bracket::new(a.clone(), a.clone()));
    }
    let pb = f(b);
    if *p == pb {
        return Ok(Bracket::new(b.clone(), b.clone()));
    }

    let sign = match (&pb - &pa).sign() {
        None => return Err(OptimError::NotFinite),
        Some(Ordering::Equal) => return Err(OptimError::BracketInvalid),
        Some(s) => Some(s),
    };
    let side = |fx: Mpf| (p - fx).sign();

    let (mut x0, mut x1) = match (a.is_infinite(), b.is_infinite()) {
        (true, true) => {
            let mut x0 = Mpf::from(-1);
            let mut x1 = Mpf::from(1);
            while side(f(&x0)) != sign {
                x1 = x0.clone();
                x0 = &x0 * 2;
                log::trace!("find_bracket: lower end expanded to {}", x0);
            }
            while side(f(&x1)) == sign {
                x1 = &x1 * 2;
                log::trace!("find_bracket: upper end expanded to {}", x1);
            }
            (x0, x1)
        }
        (true, false) => {
            let mut delta = Mpf::from(1);
            let mut x1 = b.clone();
            let mut x0 = b - &delta;
            while side(f(&x0)) != sign {
                x1 = x0;
                delta = &delta * 2;
                x0 = b - &delta;
                log::trace!("find_bracket: lower end expanded to {}", x0);
            }
            (x0, x1)
        }
        (false, true) => {
            let mut delta = Mpf::from(1);
            let mut x0 = a.clone();
            let mut x1 = a + &delta;
            while side(f(&x1)) == sign {
                x0 = x1;
                delta = &delta * 2;
                x1 = a + &delta;
                log::trace!("find_bracket: upper end expanded to {}", x1);
            }
            (x0, x1)
        }
        (false, false) => (a.clone(), b.clone()),
    };

    for _ in 0..nbisect.unwrap_or(DEFAULT_NBISECT) {
        let mid = (&x0 + &x1) >> 1;
        let pmid = f(&mid);
        if pmid == *p {
            return Ok(Bracket::new(mid.clone(), mid));
        }
        if side(pmid) == sign {
            x0 = mid;
        } else {
            x1 = mid;
        }
    }

    Ok(Bracket::new(x0, x1))
}

/// Predicates "f(x) is still below the target" and "f(x) is still above
/// the target", in the direction of `f`.
fn target_tests(direction: Monotonicity) -> (fn(&Mpf, &Mpf) -> bool, fn(&Mpf, &Mpf) -> bool) {
    match direction {
        Monotonicity::Increasing => (|fx, p| fx < p, |fx, p| fx > p),
        Monotonicity::Decreasing => (|fx, p| fx > p, |fx, p| fx < p),
    }
}

/// Bracket the solution of `f(x) = p` for `f` strictly monotone on `[0, ∞)`.
///
/// The upper end starts at 1 and grows by a factor 1.5 until it is past
/// the target; the lower end starts at 1 and is halved until it is below
/// the target. The lower end assumes a bound exists in `(0, 1]`.
pub fn find_bracket_by_expansion_0_inf(
    mut f: impl FnMut(&Mpf) -> Mpf,
    p: &Mpf,
    direction: Monotonicity,
) -> Bracket {
    let (not_high_enough, not_low_enough) = target_tests(direction);

    let mut x_high = Mpf::from(1);
    while not_high_enough(&f(&x_high), p) {
        x_high = &x_high * 1.5;
        log::trace!("expansion: upper end {}", x_high);
    }
    let mut x_low = Mpf::from(1);
    while x_low > 0 && not_low_enough(&f(&x_low), p) {
        x_low = &x_low * 0.5;
        log::trace!("expansion: lower end {}", x_low);
    }
    Bracket::new(x_low, x_high)
}

/// Bracket the solution of `f(x) = p` for `f` strictly monotone on `(-∞, ∞)`.
///
/// Both ends start at 0. An end that is not a bound moves to ±1 and then
/// grows by a factor 1.5 until it is.
pub fn find_bracket_by_expansion_neginf_inf(
    mut f: impl FnMut(&Mpf) -> Mpf,
    p: &Mpf,
    direction: Monotonicity,
) -> Bracket {
    let (not_high_enough, not_low_enough) = target_tests(direction);

    let mut x_high = Mpf::zero();
    if not_high_enough(&f(&x_high), p) {
        x_high = Mpf::from(1);
        while not_high_enough(&f(&x_high), p) {
            x_high = &x_high * 1.5;
            log::trace!("expansion: upper end {}", x_high);
        }
    }
    let mut x_low = Mpf::zero();
    if not_low_enough(&f(&x_low), p) {
        x_low = Mpf::from(-1);
        while not_low_enough(&f(&x_low), p) {
            x_low = &x_low * 1.5;
            log::trace!("expansion: lower end {}", x_low);
        }
    }
    Bracket::new(x_low, x_high)
}
