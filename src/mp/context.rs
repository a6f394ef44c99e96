//! Thread-local working precision and scoped precision guards.

use core::cell::Cell;
use core::marker::PhantomData;

use super::Mpf;

/// Default working precision in bits (IEEE double, 15 decimal digits).
pub const DEFAULT_PREC: u32 = 53;

/// log2(10), used for the digits/bits conversion.
const LOG2_10: f64 = 3.321_928_094_887_362_6;

thread_local! {
    static PREC: Cell<u32> = const { Cell::new(DEFAULT_PREC) };
}

/// Current working precision in bits.
#[inline]
pub fn prec() -> u32 {
    PREC.with(Cell::get)
}

/// Set the working precision in bits for the current thread.
///
/// The value is clamped to the range accepted by MPFR. Library code never
/// calls this directly; it goes through a [`PrecisionGuard`].
pub fn set_prec(bits: u32) {
    let bits = bits.clamp(rug::float::prec_min(), rug::float::prec_max());
    PREC.with(|p| p.set(bits));
}

/// Current working precision in decimal digits.
pub fn dps() -> u32 {
    prec_to_dps(prec())
}

/// Set the working precision in decimal digits for the current thread.
pub fn set_dps(digits: u32) {
    set_prec(dps_to_prec(digits));
}

/// Number of bits needed for `digits` significant decimal digits.
///
/// `max(1, round((digits + 1) * log2(10)))`
pub fn dps_to_prec(digits: u32) -> u32 {
    let bits = ((f64::from(digits) + 1.0) * LOG2_10).round();
    (bits as u32).max(1)
}

/// Number of decimal digits represented by `bits` of binary precision.
///
/// `max(1, round(bits / log2(10)) - 1)`
pub fn prec_to_dps(bits: u32) -> u32 {
    let digits = (f64::from(bits) / LOG2_10).round() as i64 - 1;
    digits.max(1) as u32
}

/// Machine epsilon at the current working precision: `2^(1 - prec)`.
pub fn eps() -> Mpf {
    Mpf::from(1) >> (prec() as i32 - 1)
}

/// RAII guard that restores the previous working precision on drop.
///
/// Created by [`workprec`], [`workdps`], [`extraprec`] and [`extradps`].
/// Guards nest: each one restores exactly the precision that was current
/// when it was created, also when the scope is left by `?` or a panic.
/// The guard is tied to the thread whose precision it changed and is
/// therefore `!Send`.
#[must_use = "the precision is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct PrecisionGuard {
    saved: u32,
    _thread_bound: PhantomData<*const ()>,
}

impl PrecisionGuard {
    fn enter(bits: u32) -> Self {
        let saved = prec();
        set_prec(bits);
        log::trace!("precision {} -> {} bits", saved, prec());
        Self {
            saved,
            _thread_bound: PhantomData,
        }
    }

    /// The precision that will be restored when this guard is dropped.
    pub fn saved_prec(&self) -> u32 {
        self.saved
    }
}

impl Drop for PrecisionGuard {
    fn drop(&mut self) {
        PREC.with(|p| p.set(self.saved));
    }
}

/// Set the working precision to `bits` until the guard is dropped.
pub fn workprec(bits: u32) -> PrecisionGuard {
    PrecisionGuard::enter(bits)
}

/// Set the working precision to `digits` decimal digits until the guard is dropped.
pub fn workdps(digits: u32) -> PrecisionGuard {
    PrecisionGuard::enter(dps_to_prec(digits))
}

/// Raise the working precision by `bits` until the guard is dropped.
pub fn extraprec(bits: u32) -> PrecisionGuard {
    PrecisionGuard::enter(prec().saturating_add(bits))
}

/// Raise the working precision by `digits` decimal digits until the guard
/// is dropped.
///
/// The new precision is `dps_to_prec(dps() + digits)`, so `extradps(0)`
/// may differ from the current precision by a few bits when the current
/// precision was not set from a digit count.
pub fn extradps(digits: u32) -> PrecisionGuard {
    PrecisionGuard::enter(dps_to_prec(dps().saturating_add(digits)))
}

/// Run `f` with the working precision set to `bits`.
pub fn with_workprec<R>(bits: u32, f: impl FnOnce() -> R) -> R {
    let _guard = workprec(bits);
    f()
}

/// Run `f` with the working precision set to `digits` decimal digits.
pub fn with_workdps<R>(digits: u32, f: impl FnOnce() -> R) -> R {
    let _guard = workdps(digits);
    f()
}

/// Run `f` with the working precision raised by `bits`.
pub fn with_extraprec<R>(bits: u32, f: impl FnOnce() -> R) -> R {
    let _guard = extraprec(bits);
    f()
}

/// Run `f` with the working precision raised by `digits` decimal digits.
pub fn with_extradps<R>(digits: u32, f: impl FnOnce() -> R) -> R {
    let _guard = extradps(digits);
    f()
}
