use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use rug::float::{Constant, Special};
use rug::ops::Pow;
use rug::{Assign, Float};

use super::context::{prec, prec_to_dps};
use super::ParseError;

/// Arbitrary-precision real number.
///
/// Thin wrapper over [`rug::Float`]. Every operation rounds its result to
/// the working precision of the calling thread ([`prec`](super::prec)), no
/// matter what precision the operands were created with. Raising the
/// precision with a guard therefore affects all arithmetic done inside its
/// scope.
///
/// `NaN` compares unequal to everything and is unordered, as for `f64`.
#[derive(Clone, PartialEq, PartialOrd)]
pub struct Mpf(pub(crate) Float);

/// Round an incomplete `rug` computation to the working precision.
#[inline]
pub(crate) fn complete<T>(val: T) -> Mpf
where
    Float: Assign<T>,
{
    Mpf(Float::with_val(prec(), val))
}

impl Mpf {
    /// Parse a decimal (or `inf`/`nan`) literal, rounded to the working precision.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let parsed = Float::parse(s.trim()).map_err(|_| ParseError {
            input: s.to_string(),
        })?;
        Ok(complete(parsed))
    }

    /// Positive infinity.
    pub fn infinity() -> Self {
        complete(Special::Infinity)
    }

    /// Negative infinity.
    pub fn neg_infinity() -> Self {
        complete(Special::NegInfinity)
    }

    /// Not-a-number.
    pub fn nan() -> Self {
        complete(Special::Nan)
    }

    /// π at the working precision.
    pub fn pi() -> Self {
        complete(Constant::Pi)
    }

    /// ln 2 at the working precision.
    pub fn ln2() -> Self {
        complete(Constant::Log2)
    }

    /// The Euler-Mascheroni constant γ at the working precision.
    pub fn euler() -> Self {
        complete(Constant::Euler)
    }

    /// Copy of `self` rounded to the working precision.
    pub fn rounded(&self) -> Self {
        complete(&self.0)
    }

    /// Borrow the underlying `rug` value.
    pub fn as_float(&self) -> &Float {
        &self.0
    }

    /// Unwrap into the underlying `rug` value.
    pub fn into_float(self) -> Float {
        self.0
    }

    /// Nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64()
    }

    pub fn is_nan(&self) -> bool {
        self.0.is_nan()
    }

    pub fn is_infinite(&self) -> bool {
        self.0.is_infinite()
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    pub fn is_sign_negative(&self) -> bool {
        self.0.is_sign_negative()
    }

    /// Sign of the value: `Some(Less | Equal | Greater)`, `None` for NaN.
    ///
    /// Unlike `signum`, zero has sign `Equal`.
    pub fn sign(&self) -> Option<Ordering> {
        self.0.cmp0()
    }

    /// Binary exponent `e` such that `2^(e-1) <= |self| < 2^e`.
    ///
    /// `None` for zero, infinities and NaN.
    pub fn exponent(&self) -> Option<i32> {
        self.0.get_exp()
    }

    pub fn abs(&self) -> Self {
        complete(self.0.abs_ref())
    }

    pub fn sqrt(&self) -> Self {
        complete(self.0.sqrt_ref())
    }

    pub fn square(&self) -> Self {
        complete(self.0.square_ref())
    }

    pub fn recip(&self) -> Self {
        complete(self.0.recip_ref())
    }

    pub fn floor(&self) -> Self {
        complete(self.0.floor_ref())
    }

    /// Natural logarithm.
    pub fn ln(&self) -> Self {
        complete(self.0.ln_ref())
    }

    /// `ln(1 + self)`, accurate for small `self`.
    pub fn ln_1p(&self) -> Self {
        complete(self.0.ln_1p_ref())
    }

    pub fn exp(&self) -> Self {
        complete(self.0.exp_ref())
    }

    /// `exp(self) - 1`, accurate for small `self`.
    pub fn exp_m1(&self) -> Self {
        complete(self.0.exp_m1_ref())
    }

    /// `self^y`.
    pub fn powf(&self, y: &Mpf) -> Self {
        complete((&self.0).pow(&y.0))
    }

    /// `self^n` for an integer exponent.
    pub fn powi(&self, n: i32) -> Self {
        complete((&self.0).pow(n))
    }

    pub fn erf(&self) -> Self {
        complete(self.0.erf_ref())
    }

    pub fn erfc(&self) -> Self {
        complete(self.0.erfc_ref())
    }

    /// Gamma function Γ(x).
    pub fn gamma(&self) -> Self {
        complete(self.0.gamma_ref())
    }

    /// ln Γ(x) for x > 0.
    pub fn ln_gamma(&self) -> Self {
        complete(self.0.ln_gamma_ref())
    }

    /// Digamma ψ(x) = d/dx ln Γ(x).
    pub fn digamma(&self) -> Self {
        complete(self.0.digamma_ref())
    }

    /// Larger of two values; NaN loses against a number.
    pub fn max(&self, other: &Mpf) -> Self {
        match self.partial_cmp(other) {
            Some(Ordering::Less) => other.rounded(),
            Some(_) => self.rounded(),
            None if self.is_nan() => other.rounded(),
            None => self.rounded(),
        }
    }

    /// Smaller of two values; NaN loses against a number.
    pub fn min(&self, other: &Mpf) -> Self {
        match self.partial_cmp(other) {
            Some(Ordering::Greater) => other.rounded(),
            Some(_) => self.rounded(),
            None if self.is_nan() => other.rounded(),
            None => self.rounded(),
        }
    }
}

/// Correctly rounded sum of `values` at the working precision.
///
/// Uses MPFR's exact summation, so no cancellation error accumulates no
/// matter the order or magnitude of the terms.
pub fn fsum<'a, I>(values: I) -> Mpf
where
    I: IntoIterator<Item = &'a Mpf>,
{
    complete(Float::sum(values.into_iter().map(|v| &v.0)))
}

impl<'a> core::iter::Sum<&'a Mpf> for Mpf {
    fn sum<I: Iterator<Item = &'a Mpf>>(iter: I) -> Mpf {
        fsum(iter)
    }
}

impl core::iter::Sum for Mpf {
    fn sum<I: Iterator<Item = Mpf>>(iter: I) -> Mpf {
        let terms: Vec<Mpf> = iter.collect();
        fsum(&terms)
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty => $bits:expr),* $(,)?) => {$(
        impl From<$t> for Mpf {
            /// Exact whenever the value fits in the working precision or
            /// the type's own width, whichever is larger.
            fn from(v: $t) -> Self {
                Mpf(Float::with_val(prec().max($bits), v))
            }
        }
    )*};
}

impl_from_primitive! {
    f64 => 53,
    i32 => 32,
    u32 => 32,
    i64 => 64,
    u64 => 64,
    usize => 64,
}

impl From<Float> for Mpf {
    fn from(v: Float) -> Self {
        Mpf(v)
    }
}

impl From<&Mpf> for Mpf {
    fn from(v: &Mpf) -> Self {
        v.clone()
    }
}

impl FromStr for Mpf {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mpf::parse(s)
    }
}

macro_rules! impl_cmp_primitive {
    ($($t:ty),*) => {$(
        impl PartialEq<$t> for Mpf {
            fn eq(&self, other: &$t) -> bool {
                self.0 == *other
            }
        }

        impl PartialOrd<$t> for Mpf {
            fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
                self.0.partial_cmp(other)
            }
        }
    )*};
}

impl_cmp_primitive!(i32, u32, f64);

impl fmt::Display for Mpf {
    /// Prints as many significant digits as the value's precision carries,
    /// or exactly `{:.N}` digits when a precision is given.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.0.is_finite() {
            return f.write_str(if self.0.is_nan() {
                "nan"
            } else if self.0.is_sign_negative() {
                "-inf"
            } else {
                "inf"
            });
        }
        let digits = f
            .precision()
            .unwrap_or_else(|| prec_to_dps(self.0.prec()) as usize)
            .max(1);
        f.write_str(&self.0.to_string_radix(10, Some(digits)))
    }
}

impl fmt::Debug for Mpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mpf({})", self)
    }
}

impl num_traits::Zero for Mpf {
    fn zero() -> Self {
        complete(Special::Zero)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl num_traits::One for Mpf {
    fn one() -> Self {
        Mpf::from(1)
    }
}

/// `2^(4 - prec)`, the default closeness tolerance at the working precision.
fn default_tolerance() -> f64 {
    (4.0 - f64::from(prec())).exp2()
}

impl approx::AbsDiffEq for Mpf {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        default_tolerance()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        if self == other {
            return true;
        }
        (self - other).abs() <= epsilon
    }
}

impl approx::RelativeEq for Mpf {
    fn default_max_relative() -> f64 {
        default_tolerance()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        if self == other {
            return true;
        }
        if self.is_infinite() || other.is_infinite() {
            return false;
        }
        let diff = (self - other).abs();
        if diff <= epsilon {
            return true;
        }
        let largest = self.abs().max(&other.abs());
        diff <= largest * max_relative
    }
}
