use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use mpdist::distributions::{Beta, ContinuousDistribution, Gamma, Normal};
use mpdist::mp::{self, Mpf};
use mpdist::optim::{invert_monotone, InvertOptions, Solver};

// ---------------------------------------------------------------------------
// Scalar solvers: invert the Beta(2, 5) CDF at p = 0.3 with each method
// ---------------------------------------------------------------------------

fn invert_beta_cdf(c: &mut Criterion) {
    let _prec = mp::workdps(30);
    let d = Beta::new(2, 5).unwrap();
    let p = Mpf::from(0.3);
    let (a, b) = (Mpf::from(0), Mpf::from(1));

    let mut g = c.benchmark_group("invert_beta_cdf");
    for solver in Solver::ALL {
        let opts = InvertOptions::default().with_solver(solver).with_nbisect(16);
        g.bench_function(BenchmarkId::from_parameter(solver.name()), |bench| {
            bench.iter(|| {
                invert_monotone(
                    |x: &Mpf| d.cdf(x).unwrap_or_else(|_| Mpf::nan()),
                    std::hint::black_box(&p),
                    &a,
                    &b,
                    &opts,
                )
            })
        });
    }
    g.finish();
}

// ---------------------------------------------------------------------------
// Quantiles at increasing precision
// ---------------------------------------------------------------------------

fn quantiles_by_precision(c: &mut Criterion) {
    let mut g = c.benchmark_group("invcdf");
    let p = 0.9;
    for dps in [15u32, 30, 60] {
        g.bench_with_input(BenchmarkId::new("normal", dps), &dps, |bench, &dps| {
            let _prec = mp::workdps(dps);
            let d = Normal::new(0, 1).unwrap();
            let p = Mpf::from(p);
            bench.iter(|| d.invcdf(std::hint::black_box(&p)))
        });
        g.bench_with_input(BenchmarkId::new("gamma", dps), &dps, |bench, &dps| {
            let _prec = mp::workdps(dps);
            let d = Gamma::new(2.5, 3).unwrap();
            let p = Mpf::from(p);
            bench.iter(|| d.invcdf(std::hint::black_box(&p)))
        });
    }
    g.finish();
}

// ---------------------------------------------------------------------------
// Maximum likelihood
// ---------------------------------------------------------------------------

fn mle(c: &mut Criterion) {
    use mpdist::distributions::Param;

    let _prec = mp::workdps(30);
    let x: Vec<Mpf> = [0.25, 0.5, 0.625, 0.875, 0.125, 0.375]
        .iter()
        .map(|&v| Mpf::from(v))
        .collect();
    let y: Vec<Mpf> = [1.5, 2.25, 3.0, 4.75, 8.0].iter().map(|&v| Mpf::from(v)).collect();

    let mut g = c.benchmark_group("mle");
    g.bench_function("beta", |bench| {
        bench.iter(|| Beta::mle(std::hint::black_box(&x), Param::Free, Param::Free))
    });
    g.bench_function("gamma", |bench| {
        bench.iter(|| Gamma::mle(std::hint::black_box(&y), Param::Free, Param::Free))
    });
    g.finish();
}

criterion_group!(benches, invert_beta_cdf, quantiles_by_precision, mle);
criterion_main!(benches);
