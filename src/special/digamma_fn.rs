//! Inverse of the digamma (psi) function.

use num_traits::Zero;

use crate::mp::Mpf;
use crate::optim::{find_root, RootSettings, Solver, Start};

use super::SpecialError;

/// Inverse digamma: the `x > 0` with ψ(x) = y.
///
/// ψ is strictly increasing on (0, ∞) with range (−∞, ∞), so the inverse
/// exists for every real `y`. The starting guess is
///
/// - `exp(y) + 1/2` for y > −0.125,
/// - `exp(y / 2.332) + 0.08661` for −3 < y ≤ −0.125,
/// - `1 / (−y − γ)` below that (from ψ(x) ≈ −1/x − γ near 0),
///
/// widened geometrically into a bracket and refined with the Anderson
/// solver.
///
/// # Example
///
/// ```
/// use mpdist::mp::{self, Mpf};
/// use mpdist::special::digamma_inv;
///
/// let _prec = mp::workdps(30);
/// let x = Mpf::from(3.25);
/// let back = digamma_inv(&x.digamma()).unwrap();
/// assert!((back - x).abs() < 1e-27);
/// ```
pub fn digamma_inv(y: &Mpf) -> Result<Mpf, SpecialError> {
    if y.is_nan() {
        return Err(SpecialError::DomainError);
    }
    if y.is_infinite() {
        return Ok(if y.is_sign_negative() {
            Mpf::zero()
        } else {
            Mpf::infinity()
        });
    }

    let x0 = if *y > -0.125 {
        y.exp() + 0.5
    } else if *y > -3 {
        (y / 2.332).exp() + 0.08661
    } else {
        (-y - Mpf::euler()).recip()
    };

    let mut lo = &x0 * 4i32 / 5i32;
    while lo.digamma() > *y {
        lo = &lo * 4 / 5;
    }
    let mut hi = &x0 * 5i32 / 4i32;
    while hi.digamma() < *y {
        hi = &hi * 5 / 4;
    }
    log::trace!("digamma_inv: bracket [{}, {}]", lo, hi);

    let root = find_root(
        |x: &Mpf| x.digamma() - y,
        Start::Pair(lo, hi),
        Solver::Anderson,
        &RootSettings::default(),
    )?;
    Ok(root.x.rounded())
}
