use crate::mp::{self, Mpf};

/// Approximate the Jacobian of `f: R^N → R^M` using forward finite differences.
///
/// Uses step size `h_j = sqrt(ε) * max(|x_j|, 1)` for each component,
/// requiring `N + 1` function evaluations (one base evaluation + N perturbed).
/// `f0` is `f(x)` when the caller already has it. Rows are indexed by
/// output, columns by input.
///
/// # Example
///
/// ```
/// use mpdist::mp::Mpf;
/// use mpdist::optim::finite_difference_jacobian;
///
/// // f(x) = [x0^2, x0*x1], Jacobian = [[2*x0, 0], [x1, x0]]
/// let x = vec![Mpf::from(3), Mpf::from(4)];
/// let j = finite_difference_jacobian(
///     |x: &[Mpf]| vec![x[0].square(), &x[0] * &x[1]],
///     &x,
///     None,
/// );
/// assert!((&j[0][0] - 6i32).abs() < 1e-6);
/// assert!(j[0][1].abs() < 1e-6);
/// assert!((&j[1][0] - 4i32).abs() < 1e-6);
/// assert!((&j[1][1] - 3i32).abs() < 1e-6);
/// ```
pub fn finite_difference_jacobian(
    mut f: impl FnMut(&[Mpf]) -> Vec<Mpf>,
    x: &[Mpf],
    f0: Option<&[Mpf]>,
) -> Vec<Vec<Mpf>> {
    let sqrt_eps = mp::eps().sqrt();
    let base;
    let f0: &[Mpf] = match f0 {
        Some(f0) => f0,
        None => {
            base = f(x);
            &base
        }
    };
    let mut jac = vec![Vec::with_capacity(x.len()); f0.len()];

    for j in 0..x.len() {
        let h = &sqrt_eps * x[j].abs().max(&Mpf::from(1));
        let mut x_pert = x.to_vec();
        x_pert[j] = &x_pert[j] + &h;
        let f_pert = f(&x_pert);

        for (row, (fp, fb)) in jac.iter_mut().zip(f_pert.iter().zip(f0)) {
            row.push((fp - fb) / &h);
        }
    }

    jac
}
