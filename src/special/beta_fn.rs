//! Beta function and log-beta via ln Γ.

use crate::mp::{self, Mpf};

use super::magnitude_bits;

/// Beta function B(a, b) = Γ(a)·Γ(b) / Γ(a+b).
///
/// Computed as `exp(lbeta(a, b))` to avoid overflow for large arguments.
///
/// # Example
///
/// ```
/// use mpdist::mp::Mpf;
/// use mpdist::special::beta;
///
/// // B(2, 3) = 1/12
/// assert!((beta(&Mpf::from(2), &Mpf::from(3)) - 1.0 / 12.0).abs() < 1e-15);
/// ```
pub fn beta(a: &Mpf, b: &Mpf) -> Mpf {
    let r = {
        let _prec = mp::extraprec(10);
        lbeta(a, b).exp()
    };
    r.rounded()
}

/// Natural logarithm of the beta function, ln B(a, b), for a, b > 0.
///
/// Computed as `lnΓ(a) + lnΓ(b) − lnΓ(a+b)` with enough extra bits to
/// absorb the cancellation between the terms.
pub fn lbeta(a: &Mpf, b: &Mpf) -> Mpf {
    let guard = 10 + 2 * magnitude_bits(&(a + b));
    let r = {
        let _prec = mp::extraprec(guard);
        a.ln_gamma() + b.ln_gamma() - (a + b).ln_gamma()
    };
    r.rounded()
}
