//! Standard normal density and distribution function.

use crate::mp::{self, Mpf};

/// Standard normal density `exp(-x²/2) / sqrt(2π)`.
pub fn npdf(x: &Mpf) -> Mpf {
    let r = {
        let _prec = mp::extraprec(10);
        (-(x.square() >> 1)).exp() / (Mpf::pi() << 1).sqrt()
    };
    r.rounded()
}

/// Standard normal distribution function `erfc(-x/√2) / 2`.
///
/// Uses `erfc` so that the lower tail keeps full relative accuracy.
///
/// # Example
///
/// ```
/// use mpdist::mp::Mpf;
/// use mpdist::special::ncdf;
///
/// assert_eq!(ncdf(&Mpf::from(0)), 0.5);
/// // Φ(-10) ≈ 7.62e-24, far below the f64 epsilon of 1 - Φ(10)
/// assert!((ncdf(&Mpf::from(-10)) / 7.6198530241605260e-24 - 1i32).abs() < 1e-14);
/// ```
pub fn ncdf(x: &Mpf) -> Mpf {
    let r = {
        let _prec = mp::extraprec(10);
        (-x / Mpf::from(2).sqrt()).erfc() >> 1
    };
    r.rounded()
}
