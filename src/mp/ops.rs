//! Operator overloads for [`Mpf`].
//!
//! Every result is rounded to the working precision. Owned operands are
//! forwarded to the by-reference implementations, which hand the
//! incomplete `rug` expression to [`complete`].

use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Shl, Shr, Sub, SubAssign};

use super::scalar::complete;
use super::Mpf;

macro_rules! impl_binop {
    (@prim $Trait:ident, $method:ident, $AssignTrait:ident, $assign:ident, $($t:ty),*) => {$(
        impl $Trait<$t> for &Mpf {
            type Output = Mpf;
            #[inline]
            fn $method(self, rhs: $t) -> Mpf {
                complete($Trait::$method(&self.0, rhs))
            }
        }

        impl $Trait<$t> for Mpf {
            type Output = Mpf;
            #[inline]
            fn $method(self, rhs: $t) -> Mpf {
                $Trait::$method(&self, rhs)
            }
        }

        impl $Trait<&Mpf> for $t {
            type Output = Mpf;
            #[inline]
            fn $method(self, rhs: &Mpf) -> Mpf {
                complete($Trait::$method(self, &rhs.0))
            }
        }

        impl $Trait<Mpf> for $t {
            type Output = Mpf;
            #[inline]
            fn $method(self, rhs: Mpf) -> Mpf {
                $Trait::$method(self, &rhs)
            }
        }

        impl $AssignTrait<$t> for Mpf {
            #[inline]
            fn $assign(&mut self, rhs: $t) {
                *self = $Trait::$method(&*self, rhs);
            }
        }
    )*};

    ($Trait:ident, $method:ident, $AssignTrait:ident, $assign:ident) => {
        impl $Trait<&Mpf> for &Mpf {
            type Output = Mpf;
            #[inline]
            fn $method(self, rhs: &Mpf) -> Mpf {
                complete($Trait::$method(&self.0, &rhs.0))
            }
        }

        impl $Trait<Mpf> for &Mpf {
            type Output = Mpf;
            #[inline]
            fn $method(self, rhs: Mpf) -> Mpf {
                $Trait::$method(self, &rhs)
            }
        }

        impl $Trait<&Mpf> for Mpf {
            type Output = Mpf;
            #[inline]
            fn $method(self, rhs: &Mpf) -> Mpf {
                $Trait::$method(&self, rhs)
            }
        }

        impl $Trait<Mpf> for Mpf {
            type Output = Mpf;
            #[inline]
            fn $method(self, rhs: Mpf) -> Mpf {
                $Trait::$method(&self, &rhs)
            }
        }

        impl $AssignTrait<&Mpf> for Mpf {
            #[inline]
            fn $assign(&mut self, rhs: &Mpf) {
                *self = $Trait::$method(&*self, rhs);
            }
        }

        impl $AssignTrait<Mpf> for Mpf {
            #[inline]
            fn $assign(&mut self, rhs: Mpf) {
                *self = $Trait::$method(&*self, &rhs);
            }
        }

        impl_binop!(@prim $Trait, $method, $AssignTrait, $assign, i32, u32, f64);
    };
}

impl_binop!(Add, add, AddAssign, add_assign);
impl_binop!(Sub, sub, SubAssign, sub_assign);
impl_binop!(Mul, mul, MulAssign, mul_assign);
impl_binop!(Div, div, DivAssign, div_assign);

impl Neg for &Mpf {
    type Output = Mpf;
    #[inline]
    fn neg(self) -> Mpf {
        complete(-&self.0)
    }
}

impl Neg for Mpf {
    type Output = Mpf;
    #[inline]
    fn neg(self) -> Mpf {
        -&self
    }
}

// Multiplication by a power of two, exact apart from the final rounding.

impl Shl<i32> for &Mpf {
    type Output = Mpf;
    #[inline]
    fn shl(self, bits: i32) -> Mpf {
        complete(&self.0 << bits)
    }
}

impl Shl<i32> for Mpf {
    type Output = Mpf;
    #[inline]
    fn shl(self, bits: i32) -> Mpf {
        &self << bits
    }
}

impl Shr<i32> for &Mpf {
    type Output = Mpf;
    #[inline]
    fn shr(self, bits: i32) -> Mpf {
        complete(&self.0 >> bits)
    }
}

impl Shr<i32> for Mpf {
    type Output = Mpf;
    #[inline]
    fn shr(self, bits: i32) -> Mpf {
        &self >> bits
    }
}
