//! Logarithm and power helpers that stay accurate near their singular
//! points.

use num_traits::Zero;

use crate::mp::{self, Mpf};

/// `x * ln(y)`, defined as 0 when `x == 0` (even for `y == 0`).
pub fn xlogy(x: &Mpf, y: &Mpf) -> Mpf {
    if x.is_zero() {
        return Mpf::zero();
    }
    x * y.ln()
}

/// `x * ln(1 + y)`, defined as 0 when `x == 0` (even for `y == -1`).
pub fn xlog1py(x: &Mpf, y: &Mpf) -> Mpf {
    if x.is_zero() {
        return Mpf::zero();
    }
    x * y.ln_1p()
}

/// `x^y - 1`, accurate when the result is close to zero.
///
/// Exactly 0 when `y == 0` or `x == 1`. For `x > 0` this is
/// `expm1(y * ln(x))`. Negative `x` requires an integer `y`; otherwise the
/// result is NaN.
///
/// # Example
///
/// ```
/// use mpdist::mp::{self, Mpf};
/// use mpdist::special::powm1;
///
/// let _prec = mp::workdps(30);
/// // 2^(1e-20) - 1 ≈ 1e-20 * ln 2, with every digit intact
/// let t = Mpf::from(1e-20);
/// let r = powm1(&Mpf::from(2), &t);
/// assert!((r / (t * Mpf::ln2()) - 1i32).abs() < 1e-19);
/// ```
pub fn powm1(x: &Mpf, y: &Mpf) -> Mpf {
    if y.is_zero() || *x == 1 {
        return Mpf::zero();
    }
    if x.is_nan() || y.is_nan() {
        return Mpf::nan();
    }
    if x.is_zero() {
        return if y.is_sign_negative() {
            Mpf::infinity()
        } else {
            Mpf::from(-1)
        };
    }
    let r = {
        let _prec = mp::extraprec(10);
        if x.is_sign_negative() {
            if y.floor() != *y {
                return Mpf::nan();
            }
            x.powf(y) - 1
        } else {
            (y * x.ln()).exp_m1()
        }
    };
    r.rounded()
}

/// `(1 + t)^(1/y)`: the `x` solving `powm1(x, y) == t`.
///
/// Evaluated as `exp(ln(1 + t) / y)` so small `t` keeps full accuracy.
pub fn inv_powm1(t: &Mpf, y: &Mpf) -> Mpf {
    let r = {
        let _prec = mp::extraprec(10);
        (t.ln_1p() / y).exp()
    };
    r.rounded()
}
