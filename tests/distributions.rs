use approx::assert_relative_eq;
use mpdist::distributions::{
    Argus, Beta, ContinuousDistribution, DiscreteDistribution, Gamma, GaussKuzmin, GumbelMax,
    Maxwell, Normal, Param, Pareto,
};
use mpdist::mp::{self, Mpf};
use mpdist::optim::find_bracket;

fn values(v: &[f64]) -> Vec<Mpf> {
    v.iter().map(|&t| Mpf::from(t)).collect()
}

fn continuous() -> Vec<(&'static str, Box<dyn ContinuousDistribution>)> {
    vec![
        ("argus", Box::new(Argus::new(3, 0.5).unwrap())),
        ("beta", Box::new(Beta::new(2, 3).unwrap())),
        ("gamma", Box::new(Gamma::new(2.5, 3).unwrap())),
        ("gumbel_max", Box::new(GumbelMax::new(1, 2).unwrap())),
        ("maxwell", Box::new(Maxwell::new(0, 2.5).unwrap())),
        ("normal", Box::new(Normal::new(-1, 0.5).unwrap())),
        ("pareto", Box::new(Pareto::new(3, 1, 2).unwrap())),
    ]
}

// ======================== Bracketing ========================

#[test]
fn bracket_finite_and_infinite_ends() {
    let _prec = mp::workdps(30);
    let f = |x: &Mpf| x.exp();
    let p = Mpf::from(10);
    let root = p.ln();
    let ends = [
        (Mpf::from(-5), Mpf::from(5)),
        (Mpf::neg_infinity(), Mpf::from(5)),
        (Mpf::from(-5), Mpf::infinity()),
        (Mpf::neg_infinity(), Mpf::infinity()),
    ];
    for (a, b) in ends {
        let br = find_bracket(f, &p, &a, &b, None).unwrap();
        assert!(br.lo < root && root < br.hi, "[{a}, {b}] gave [{}, {}]", br.lo, br.hi);
    }
}

#[test]
fn bracket_exact_hit() {
    let f = |x: &Mpf| x.square();
    let (a, b) = (Mpf::from(1), Mpf::from(4));
    let br = find_bracket(f, &Mpf::from(1), &a, &b, None).unwrap();
    assert!(br.is_exact());
    assert_eq!(br.lo, 1);
    let br = find_bracket(f, &Mpf::from(16), &a, &b, None).unwrap();
    assert!(br.is_exact());
    assert_eq!(br.lo, 4);
}

// ======================== Inversion ========================

/// Round trip `cdf(invcdf(p))` and `sf(invsf(p))` at `dps` digits, to
/// within `10^(6 - dps)` relative.
fn check_inverse_roundtrip(dps: u32) {
    let _prec = mp::workdps(dps);
    let tol = Mpf::from(10).powi(6 - dps as i32);
    let tiny = Mpf::from(1) / Mpf::from(10).powi(12);
    let ps = [tiny, Mpf::from(0.25), Mpf::from(0.5), Mpf::from(0.9)];
    for (name, d) in continuous() {
        for p in &ps {
            let x = d.invcdf(p).unwrap();
            let back = d.cdf(&x).unwrap();
            let err = ((&back - p) / p).abs();
            assert!(err <= tol, "{name} at {dps} digits: cdf(invcdf({p})) = {back}");
            let x = d.invsf(p).unwrap();
            let back = d.sf(&x).unwrap();
            let err = ((&back - p) / p).abs();
            assert!(err <= tol, "{name} at {dps} digits: sf(invsf({p})) = {back}");
        }
    }
}

#[test]
fn cdf_inverts_invcdf() {
    check_inverse_roundtrip(30);
}

#[test]
fn cdf_inverts_invcdf_default_precision() {
    check_inverse_roundtrip(mp::dps());
}

#[test]
fn inverse_endpoints() {
    for (name, d) in continuous() {
        let (lo, hi) = d.support();
        assert_eq!(d.invcdf(&Mpf::from(0)).unwrap(), lo, "{name}");
        assert_eq!(d.invcdf(&Mpf::from(1)).unwrap(), hi, "{name}");
        assert_eq!(d.invsf(&Mpf::from(1)).unwrap(), lo, "{name}");
        assert_eq!(d.invsf(&Mpf::from(0)).unwrap(), hi, "{name}");
    }
}

// ======================== Maximum likelihood ========================

#[test]
fn mle_all_fixed_returns_inputs() {
    let x = values(&[0.25, 0.5, 0.625]);
    assert_eq!(
        Beta::mle(&x, Param::fixed(1.5), Param::fixed(4)).unwrap(),
        (Mpf::from(1.5), Mpf::from(4))
    );
    assert_eq!(
        Gamma::mle(&x, Param::fixed(2), Param::fixed(0.75)).unwrap(),
        (Mpf::from(2), Mpf::from(0.75))
    );
    assert_eq!(
        Normal::mle(&x, Param::fixed(-1), Param::fixed(3)).unwrap(),
        (Mpf::from(-1), Mpf::from(3))
    );
    assert_eq!(
        GumbelMax::mle(&x, Param::fixed(0), Param::fixed(2)).unwrap(),
        (Mpf::from(0), Mpf::from(2))
    );
    assert_eq!(
        Pareto::mle(&x, Param::fixed(2), Param::fixed(0), Param::fixed(0.25)).unwrap(),
        (Mpf::from(2), Mpf::from(0), Mpf::from(0.25))
    );
}

/// Every ±δ nudge of a free parameter raises the negative log-likelihood.
fn assert_local_min(nll: impl Fn(&Mpf, &Mpf) -> Mpf, p0: &Mpf, p1: &Mpf) {
    let best = nll(p0, p1);
    let delta = Mpf::from(1e-6);
    for (d0, d1) in [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (-1, 1), (1, -1), (-1, -1)] {
        let q0 = p0 + &delta * d0;
        let q1 = p1 + &delta * d1;
        assert!(nll(&q0, &q1) > best, "nudge ({d0}, {d1})");
    }
}

#[test]
fn mle_is_local_optimum() {
    let _prec = mp::workdps(30);

    let x = values(&[0.25, 0.5, 0.625, 0.875]);
    let (a, b) = Beta::mle(&x, Param::Free, Param::Free).unwrap();
    assert_local_min(|a, b| Beta::new(a.clone(), b.clone()).unwrap().nll(&x), &a, &b);

    let x = values(&[1.5, 2.25, 3.0, 4.75, 8.0]);
    let (k, scale) = Gamma::mle(&x, Param::Free, Param::Free).unwrap();
    assert_local_min(
        |k, s| Gamma::new(k.clone(), s.clone()).unwrap().nll(&x).unwrap(),
        &k,
        &scale,
    );

    let (mu, sigma) = Normal::mle(&x, Param::Free, Param::Free).unwrap();
    assert_local_min(
        |m, s| Normal::new(m.clone(), s.clone()).unwrap().nll(&x),
        &mu,
        &sigma,
    );

    let x = values(&[6.86, 14.8, 15.65, 8.72, 8.11, 8.15, 13.01, 13.36]);
    let (loc, scale) = GumbelMax::mle(&x, Param::Free, Param::Free).unwrap();
    assert_local_min(
        |l, s| GumbelMax::new(l.clone(), s.clone()).unwrap().nll(&x),
        &loc,
        &scale,
    );
}

/// Every ±δ nudge of the single free parameter raises the negative log-likelihood.
fn assert_local_min_1d(nll: impl Fn(&Mpf) -> Mpf, p: &Mpf) {
    let best = nll(p);
    let delta = Mpf::from(1e-6);
    assert!(nll(&(p + &delta)) > best, "nudge up from {p}");
    assert!(nll(&(p - &delta)) > best, "nudge down from {p}");
}

#[test]
fn mle_one_free_is_local_optimum() {
    let _prec = mp::workdps(30);

    let x = values(&[0.25, 0.5, 0.625, 0.875]);
    let (a, b) = Beta::mle(&x, Param::Free, Param::fixed(2)).unwrap();
    assert_eq!(b, 2);
    assert_local_min_1d(|a| Beta::new(a.clone(), 2).unwrap().nll(&x), &a);

    let (a, b) = Beta::mle(&x, Param::fixed(1.5), Param::Free).unwrap();
    assert_eq!(a, 1.5);
    assert_local_min_1d(|b| Beta::new(1.5, b.clone()).unwrap().nll(&x), &b);

    let x = values(&[6.86, 14.8, 15.65, 8.72, 8.11, 8.15, 13.01, 13.36]);
    let (loc, scale) = GumbelMax::mle(&x, Param::fixed(10), Param::Free).unwrap();
    assert_eq!(loc, 10);
    assert_local_min_1d(|s| GumbelMax::new(10, s.clone()).unwrap().nll(&x), &scale);

    let (loc, scale) = GumbelMax::mle(&x, Param::Free, Param::fixed(2.5)).unwrap();
    assert_eq!(scale, 2.5);
    assert_local_min_1d(|l| GumbelMax::new(l.clone(), 2.5).unwrap().nll(&x), &loc);
}

#[test]
fn mle_initial_guess_is_not_fixed() {
    let _prec = mp::workdps(30);

    let x = values(&[0.25, 0.5, 0.625, 0.875]);
    let free = Beta::mle(&x, Param::Free, Param::Free).unwrap();
    let guessed = Beta::mle(&x, Param::initial(5), Param::initial(0.5)).unwrap();
    assert!(guessed.0 != 5 && guessed.1 != 0.5);
    assert_relative_eq!(guessed.0, free.0, max_relative = 1e-25);
    assert_relative_eq!(guessed.1, free.1, max_relative = 1e-25);

    let (a, b) = Beta::mle(&x, Param::initial(3), Param::fixed(2)).unwrap();
    assert_eq!(b, 2);
    let (a_free, _) = Beta::mle(&x, Param::Free, Param::fixed(2)).unwrap();
    assert_relative_eq!(a, a_free, max_relative = 1e-25);
}

#[test]
fn pareto_mle_all_free() {
    let _prec = mp::workdps(30);
    let x = values(&[2.0, 2.25, 2.5, 3.0, 4.5, 9.0, 17.5, 41.0]);
    let expected_b = Mpf::parse("0.598275937997825714143163958494786250").unwrap();
    let expected_scale = Mpf::parse("0.627341793650549692485211128425320118").unwrap();
    let expected_loc = Mpf::from(2) - &expected_scale;

    let (b, loc, scale) = Pareto::mle(&x, Param::Free, Param::Free, Param::Free).unwrap();
    assert_relative_eq!(b, expected_b.clone(), max_relative = 1e-25);
    assert_relative_eq!(scale, expected_scale.clone(), max_relative = 1e-25);
    assert_relative_eq!(loc, expected_loc.clone(), max_relative = 1e-25);

    // loc is tied to the sample minimum, so b and scale are the free directions
    let x1 = Mpf::from(2);
    assert_local_min(
        |b, s| Pareto::new(b.clone(), &x1 - s, s.clone()).unwrap().nll(&x).unwrap(),
        &b,
        &scale,
    );

    let guessed =
        Pareto::mle(&x, Param::initial(0.5), Param::Free, Param::initial(0.5)).unwrap();
    assert!(guessed.0 != 0.5 && guessed.2 != 0.5);
    assert_relative_eq!(guessed.0, expected_b, max_relative = 1e-25);
    assert_relative_eq!(guessed.1, expected_loc, max_relative = 1e-25);
    assert_relative_eq!(guessed.2, expected_scale, max_relative = 1e-25);
}

#[test]
fn beta_mle_first_order_conditions() {
    let _prec = mp::workdps(40);
    let x = values(&[0.25, 0.5, 0.625, 0.875]);
    let (a, b) = Beta::mle(&x, Param::Free, Param::Free).unwrap();
    let n = Mpf::from(x.len());
    let s1: Mpf = x.iter().map(|t| t.ln()).sum();
    let s2: Mpf = x.iter().map(|t| (-t).ln_1p()).sum();
    let psi_ab = (&a + &b).digamma();
    let g1 = s1 - &n * (a.digamma() - &psi_ab);
    let g2 = s2 - &n * (b.digamma() - &psi_ab);
    assert!(g1.abs() < 1e-35, "d/da = {g1}");
    assert!(g2.abs() < 1e-35, "d/db = {g2}");
}

// ======================== Specific distributions ========================

#[test]
fn argus_support_edges() {
    let _prec = mp::workdps(25);
    let d = Argus::new(1.0, 0.5).unwrap();
    assert_eq!(d.support(), (Mpf::from(0), Mpf::from(0.5)));
    let d = Argus::new(5, 1).unwrap();
    assert_eq!(d.pdf(&Mpf::from(-0.5)), 0);
    assert_eq!(d.cdf(&Mpf::from(1.5)).unwrap(), 1);
}

#[test]
fn gauss_kuzmin_roundtrip() {
    let _prec = mp::workdps(40);
    for k in [1i64, 2, 3, 9] {
        let p = GaussKuzmin.cdf(k);
        assert_relative_eq!(GaussKuzmin.invcdf(&p).unwrap(), Mpf::from(k), max_relative = 1e-35);
    }
}

#[test]
fn results_follow_working_precision() {
    let d = Normal::new(0, 1).unwrap();
    let lo = mp::with_workdps(15, || d.cdf(&Mpf::from(1)).unwrap());
    let hi = mp::with_workdps(60, || d.cdf(&Mpf::from(1)).unwrap());
    assert_eq!(lo.as_float().prec(), mp::dps_to_prec(15));
    assert_eq!(hi.as_float().prec(), mp::dps_to_prec(60));
    let _prec = mp::workdps(60);
    assert_relative_eq!(lo, hi, max_relative = 1e-14);
}
