use super::*;
use approx::{assert_abs_diff_eq, assert_relative_eq};
use core::cmp::Ordering;
use num_traits::{One, Zero};

// ═══════════════════════════════════════════════════════════════════
// Precision context
// ═══════════════════════════════════════════════════════════════════

#[test]
fn default_precision() {
    assert_eq!(prec(), DEFAULT_PREC);
    assert_eq!(dps(), 15);
}

#[test]
fn digits_bits_conversion() {
    assert_eq!(dps_to_prec(15), 53);
    assert_eq!(dps_to_prec(50), 169);
    assert_eq!(prec_to_dps(53), 15);
    assert_eq!(prec_to_dps(169), 50);
    assert_eq!(dps_to_prec(0), 3);
    assert_eq!(prec_to_dps(1), 1);
}

#[test]
fn guards_nest_and_restore() {
    {
        let _outer = workdps(30);
        assert_eq!(dps(), 30);
        {
            let inner = extraprec(10);
            assert_eq!(prec(), dps_to_prec(30) + 10);
            assert_eq!(inner.saved_prec(), dps_to_prec(30));
        }
        assert_eq!(dps(), 30);
        {
            let _inner = extradps(5);
            assert_eq!(dps(), 35);
        }
        assert_eq!(dps(), 30);
    }
    assert_eq!(prec(), DEFAULT_PREC);
}

#[test]
fn guard_restores_on_early_return() {
    fn fails() -> Result<(), ParseError> {
        let _guard = workprec(300);
        Mpf::parse("not a number")?;
        Ok(())
    }
    assert!(fails().is_err());
    assert_eq!(prec(), DEFAULT_PREC);
}

#[test]
fn guard_restores_on_panic() {
    let result = std::panic::catch_unwind(|| {
        let _guard = workprec(400);
        panic!("inside guard");
    });
    assert!(result.is_err());
    assert_eq!(prec(), DEFAULT_PREC);
}

#[test]
fn closure_forms() {
    let p = with_extradps(10, dps);
    assert_eq!(p, 25);
    let bits = with_workprec(99, prec);
    assert_eq!(bits, 99);
    assert_eq!(prec(), DEFAULT_PREC);
}

#[test]
fn precision_is_thread_local() {
    let _guard = workprec(500);
    let other = std::thread::spawn(prec).join().unwrap();
    assert_eq!(other, DEFAULT_PREC);
    assert_eq!(prec(), 500);
}

#[test]
fn set_prec_clamps() {
    let _restore = workprec(prec());
    set_prec(0);
    assert_eq!(prec(), rug::float::prec_min());
    set_dps(20);
    assert_eq!(dps(), 20);
}

#[test]
fn eps_matches_precision() {
    assert_eq!(eps(), Mpf::from(f64::EPSILON));
    let _guard = workprec(100);
    assert_eq!(eps(), Mpf::from(1) >> 99);
}

// ═══════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════

#[test]
fn results_round_to_working_precision() {
    let third = with_workdps(50, || Mpf::from(1) / 3i32);
    assert_eq!(third.as_float().prec(), dps_to_prec(50));
    // Arithmetic at the default precision rounds back to 53 bits.
    let doubled = &third * 2i32;
    assert_eq!(doubled.as_float().prec(), 53);
    assert_eq!(doubled.to_f64(), 2.0 / 3.0);
}

#[test]
fn mixed_primitive_ops() {
    let x = Mpf::from(3);
    assert_eq!(&x + 1, 4);
    assert_eq!(1 - &x, -2);
    assert_eq!(&x * 0.5, 1.5);
    assert_eq!(6.0 / &x, 2);
    assert_eq!(2u32 * x.clone(), 6);
    let mut y = x.clone();
    y += &x;
    y *= 2;
    y -= 1.0;
    y /= Mpf::from(11);
    assert_eq!(y, 1);
    assert_eq!(-x, -3);
}

#[test]
fn shifts_scale_by_powers_of_two() {
    let x = Mpf::from(3);
    assert_eq!(&x << 4, 48);
    assert_eq!(x >> 1, 1.5);
}

#[test]
fn special_values() {
    let inf = Mpf::infinity();
    let ninf = Mpf::neg_infinity();
    let nan = Mpf::nan();
    assert!(inf > 1e300);
    assert!(ninf < -1e300);
    assert!(nan != nan);
    assert_eq!(nan.partial_cmp(&inf), None);
    assert_eq!(nan.sign(), None);
    assert_eq!(Mpf::zero().sign(), Some(Ordering::Equal));
    assert_eq!(ninf.sign(), Some(Ordering::Less));
    assert!((&inf - &inf).is_nan());
    assert_eq!(Mpf::from(1) / Mpf::zero(), inf);
}

#[test]
fn parse_and_display() {
    let _guard = workdps(30);
    let x: Mpf = "0.1".parse().unwrap();
    let y = Mpf::from(1) / 10;
    assert_eq!(x, y);
    assert!(Mpf::parse("1.5x").is_err());
    assert_eq!(Mpf::parse("abc").unwrap_err().input(), "abc");
    assert_eq!(format!("{}", Mpf::infinity()), "inf");
    assert_eq!(format!("{}", Mpf::neg_infinity()), "-inf");
    assert_eq!(format!("{}", Mpf::nan()), "nan");
}

#[test]
fn exact_conversions() {
    let big = Mpf::from(i64::MAX);
    assert_eq!(big.as_float(), &rug::Float::with_val(64, i64::MAX));
    assert_eq!(Mpf::from(0.1_f64).to_f64(), 0.1);
    assert_eq!(Mpf::from(7usize), 7);
}

#[test]
fn fsum_is_exactly_rounded() {
    let terms = [Mpf::from(1e100), Mpf::from(1), Mpf::from(-1e100)];
    assert_eq!(fsum(&terms), 1);
    let total: Mpf = terms.iter().sum();
    assert_eq!(total, 1);
}

#[test]
fn min_max_with_nan() {
    let a = Mpf::from(2);
    let nan = Mpf::nan();
    assert_eq!(a.max(&nan), 2);
    assert_eq!(nan.min(&a), 2);
    assert_eq!(a.min(&Mpf::from(-1)), -1);
}

#[test]
fn zero_one_traits() {
    assert!(Mpf::zero().is_zero());
    assert_eq!(Mpf::one(), 1);
}

// ═══════════════════════════════════════════════════════════════════
// Elementary functions
// ═══════════════════════════════════════════════════════════════════

#[test]
fn elementary_functions_at_high_precision() {
    let _guard = workdps(40);
    let two = Mpf::from(2);
    let sqrt2: Mpf = "1.414213562373095048801688724209698078569671875377"
        .parse()
        .unwrap();
    assert_relative_eq!(two.sqrt(), sqrt2);
    assert_relative_eq!(Mpf::ln2(), two.ln());
    assert_relative_eq!(two.ln().exp(), two);
    assert_relative_eq!(Mpf::from(5).gamma(), Mpf::from(24));
    assert_relative_eq!(Mpf::from(1).digamma(), -Mpf::euler());
    assert_relative_eq!(Mpf::from(0.5).powf(&Mpf::from(2)), Mpf::from(0.25));
    assert_relative_eq!(two.powi(-3), Mpf::from(0.125));
}

#[test]
fn small_argument_functions() {
    let _guard = workdps(30);
    let tiny = Mpf::from(1) >> 200;
    // ln(1 + t) ≈ t and exp(t) - 1 ≈ t without cancellation.
    assert_relative_eq!(tiny.ln_1p(), tiny.clone(), max_relative = 1e-50);
    assert_relative_eq!(tiny.exp_m1(), tiny.clone(), max_relative = 1e-50);
}

#[test]
fn approx_tolerance_follows_precision() {
    let a = Mpf::from(1);
    let b = &a + 1e-14;
    assert_abs_diff_eq!(a, b, epsilon = 1e-13);
    let _guard = workdps(30);
    assert!(!approx::relative_eq!(a, b));
}
