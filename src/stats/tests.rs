use super::*;

fn values(v: &[f64]) -> Vec<Mpf> {
    v.iter().map(|&t| Mpf::from(t)).collect()
}

fn approx_eq(a: &Mpf, b: &Mpf, tol: f64) -> bool {
    (a - b).abs() <= tol
}

// ======================== Mean ========================

#[test]
fn mean_simple() {
    let x = values(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(mean(&x).unwrap(), 2.5);
}

#[test]
fn mean_keeps_small_terms() {
    // 1e30 + 1 - 1e30 loses the 1 in double precision, not with exact sums
    let x = values(&[1e30, 1.0, -1e30]);
    let m = mean(&x).unwrap();
    assert!(approx_eq(&m, &(Mpf::from(1) / 3), 1e-15));
}

#[test]
fn mean_empty() {
    assert_eq!(mean(&[]), Err(StatsError::Empty));
}

#[test]
fn weighted_mean_basic() {
    let x = values(&[1.0, 2.0, 4.0]);
    let w = values(&[3.0, 1.0, 1.0]);
    // (3 + 2 + 4) / 5
    assert_eq!(weighted_mean(&x, &w).unwrap(), 1.8);
}

#[test]
fn weighted_mean_negative_weights() {
    let x = values(&[1.0, 5.0]);
    let w = values(&[-1.0, 2.0]);
    // (-1 + 10) / 1
    assert_eq!(weighted_mean(&x, &w).unwrap(), 9);
}

#[test]
fn weighted_mean_errors() {
    let x = values(&[1.0, 2.0]);
    assert_eq!(
        weighted_mean(&x, &values(&[1.0])),
        Err(StatsError::LengthMismatch { x: 2, weights: 1 })
    );
    assert_eq!(
        weighted_mean(&x, &values(&[1.0, -1.0])),
        Err(StatsError::ZeroWeightSum)
    );
}

// ======================== Variance ========================

#[test]
fn var_population_and_sample() {
    let x = values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    assert_eq!(var(&x, 0).unwrap(), 4);
    assert!(approx_eq(&var(&x, 1).unwrap(), &(Mpf::from(32) / 7), 1e-15));
    assert_eq!(std(&x, 0).unwrap(), 2);
}

#[test]
fn var_single_value() {
    let x = values(&[3.5]);
    assert_eq!(var(&x, 0).unwrap(), 0);
    assert_eq!(var(&x, 1), Err(StatsError::TooFewValues { n: 1, ddof: 1 }));
}

#[test]
fn var_high_precision() {
    let _prec = mp::workdps(40);
    let x: Vec<Mpf> = (1..=10).map(|i: i32| Mpf::from(i)).collect();
    // variance of 1..=n is (n^2 - 1)/12
    let expected = Mpf::from(99) / 12;
    assert!(approx_eq(&var(&x, 0).unwrap(), &expected, 1e-38));
}

#[test]
fn variation_matches_ratio() {
    let x = values(&[2.0, 3.0, 5.0, 8.0, 13.0, 21.0]);
    let v = variation(&x, 1).unwrap();
    let expected = std(&x, 1).unwrap() / mean(&x).unwrap();
    assert!(approx_eq(&v, &expected, 1e-14));
    assert!(approx_eq(&v, &Mpf::from(0.83418102841390518), 1e-14));
}

// ======================== Other means ========================

#[test]
fn gmean_basic() {
    let x = values(&[2.0, 8.0]);
    assert!(approx_eq(&gmean(&x).unwrap(), &Mpf::from(4), 1e-14));
    assert_eq!(gmean(&values(&[0.0, 3.0])).unwrap(), 0);
    assert_eq!(gmean(&values(&[-1.0, 3.0])), Err(StatsError::NegativeValue));
}

#[test]
fn hmean_cases() {
    let _prec = mp::workdps(25);
    assert!(approx_eq(
        &hmean(&values(&[1.0, 3.0, 3.0])).unwrap(),
        &(Mpf::from(9) / 5),
        1e-24
    ));
    assert_eq!(hmean(&values(&[10.0, 3.0, -2.0])).unwrap(), -45);
    assert!(hmean(&values(&[2.0, -2.0])).unwrap().is_nan());
    let inf = Mpf::infinity();
    assert!(hmean(&[inf.clone(), inf.clone()]).unwrap().is_infinite());
    assert_eq!(hmean(&values(&[0.0, 5.0])).unwrap(), 0);
}

// ======================== Median ========================

#[test]
fn median_odd_even() {
    assert_eq!(median(&values(&[5.0, 1.0, 3.0])).unwrap(), 3);
    assert_eq!(median(&values(&[4.0, 1.0, 3.0, 2.0])).unwrap(), 2.5);
    assert_eq!(median(&values(&[-7.0])).unwrap(), -7);
}

#[test]
fn median_empty() {
    assert_eq!(median(&[]), Err(StatsError::Empty));
}
