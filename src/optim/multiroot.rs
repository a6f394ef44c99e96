use num_traits::Zero;

use crate::mp::{self, Mpf};

use super::{default_tol, finite_difference_jacobian, OptimError};

/// Settings for [`find_root_nd`].
#[derive(Debug, Clone)]
pub struct NdSettings {
    /// Step tolerance; `None` means `eps * 2^10` at the solver's precision.
    pub tol: Option<Mpf>,
    /// Maximum number of Newton steps.
    pub max_steps: usize,
    /// Require `‖F(x)‖^2 <= tol` at the returned point.
    pub verify: bool,
    /// Bits added to the working precision while solving.
    pub extra_prec: u32,
}

impl Default for NdSettings {
    fn default() -> Self {
        Self {
            tol: None,
            max_steps: 50,
            verify: true,
            extra_prec: 20,
        }
    }
}

/// Result of [`find_root_nd`].
#[derive(Debug, Clone)]
pub struct NdRootResult {
    /// Approximate root.
    pub x: Vec<Mpf>,
    /// Residual vector `F(x)`.
    pub fx: Vec<Mpf>,
    /// Number of Newton steps taken.
    pub iterations: usize,
    /// Number of evaluations of `F`, including those for the Jacobian.
    pub evals: usize,
}

fn norm_inf(v: &[Mpf]) -> Mpf {
    v.iter().fold(Mpf::zero(), |acc, x| acc.max(&x.abs()))
}

/// LU decomposition with partial pivoting, in place.
///
/// On return, `a` contains both L and U packed together:
/// - Upper triangle (including diagonal): U
/// - Lower triangle (excluding diagonal): L (diagonal of L is implicitly 1)
///
/// `perm` is filled with the row permutation indices.
fn lu_in_place(a: &mut [Vec<Mpf>], perm: &mut [usize]) -> Result<(), OptimError> {
    let n = a.len();
    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    for col in 0..n {
        // Partial pivoting: find row with largest modulus in this column
        let mut max_row = col;
        let mut max_val = a[col][col].abs();
        for (row, r) in a.iter().enumerate().skip(col + 1) {
            let val = r[col].abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_val.is_zero() || max_val.is_nan() {
            return Err(OptimError::Singular);
        }

        if max_row != col {
            perm.swap(col, max_row);
            a.swap(col, max_row);
        }

        let inv_pivot = a[col][col].recip();
        let (upper, lower) = a.split_at_mut(col + 1);
        let pivot_row = &upper[col];
        for r in lower.iter_mut() {
            r[col] = &r[col] * &inv_pivot;
            let factor = r[col].clone();
            for j in (col + 1)..n {
                r[j] = &r[j] - &factor * &pivot_row[j];
            }
        }
    }

    Ok(())
}

/// Solve Ax = b given the packed LU decomposition and permutation.
fn lu_solve(lu: &[Vec<Mpf>], perm: &[usize], b: &[Mpf]) -> Vec<Mpf> {
    let n = lu.len();
    let mut x: Vec<Mpf> = Vec::with_capacity(n);

    // Apply permutation and forward substitution (solve Ly = Pb)
    for i in 0..n {
        let mut sum = b[perm[i]].clone();
        for j in 0..i {
            sum = sum - &lu[i][j] * &x[j];
        }
        x.push(sum);
    }

    // Back substitution (solve Ux = y)
    for i in (0..n).rev() {
        let mut sum = x[i].clone();
        for j in (i + 1)..n {
            sum = sum - &lu[i][j] * &x[j];
        }
        x[i] = sum / &lu[i][i];
    }

    x
}

/// Solve `F(x) = 0` for `F: R^n → R^n` by damped Newton iteration.
///
/// Each step solves `J Δx = -F(x)` with a forward-difference Jacobian and
/// LU factorization, then halves the step (at most `prec` times) until
/// `‖F‖∞` decreases. Iteration stops when `‖Δx‖∞ < tol * max(1, ‖x‖∞)`,
/// when no damped step improves the residual, or after
/// [`NdSettings::max_steps`] steps.
///
/// # Errors
///
/// - [`OptimError::DimensionMismatch`]: `F` returned a vector of the wrong length.
/// - [`OptimError::Singular`]: the Jacobian has a zero pivot.
/// - [`OptimError::NotFinite`]: the residual became NaN.
/// - [`OptimError::MaxIterations`] / [`OptimError::NoConvergence`]: the
///   residual check `‖F(x)‖∞^2 <= tol` failed.
///
/// # Example
///
/// ```
/// use mpdist::mp::{self, Mpf};
/// use mpdist::optim::{find_root_nd, NdSettings};
///
/// let _prec = mp::workdps(30);
/// // x^2 + y^2 = 4, x = y
/// let r = find_root_nd(
///     |v: &[Mpf]| vec![v[0].square() + v[1].square() - 4, &v[0] - &v[1]],
///     &[Mpf::from(1), Mpf::from(2)],
///     &NdSettings::default(),
/// )
/// .unwrap();
/// let expected = Mpf::from(2).sqrt();
/// assert!((&r.x[0] - &expected).abs() < 1e-28);
/// assert!((&r.x[1] - &expected).abs() < 1e-28);
/// ```
pub fn find_root_nd(
    mut f: impl FnMut(&[Mpf]) -> Vec<Mpf>,
    x0: &[Mpf],
    settings: &NdSettings,
) -> Result<NdRootResult, OptimError> {
    let n = x0.len();
    if n == 0 {
        return Ok(NdRootResult {
            x: Vec::new(),
            fx: Vec::new(),
            iterations: 0,
            evals: 0,
        });
    }

    let _prec = mp::extraprec(settings.extra_prec);
    let tol = settings.tol.clone().unwrap_or_else(default_tol);
    let mut evals = 0usize;
    let mut eval = |x: &[Mpf]| -> Result<Vec<Mpf>, OptimError> {
        evals += 1;
        let fx = f(x);
        if fx.len() != n {
            return Err(OptimError::DimensionMismatch {
                expected: n,
                got: fx.len(),
            });
        }
        Ok(fx)
    };

    let mut x: Vec<Mpf> = x0.iter().map(Mpf::rounded).collect();
    let mut fx = eval(&x)?;
    let mut fx_norm = norm_inf(&fx);
    if fx_norm.is_nan() {
        return Err(OptimError::NotFinite);
    }

    let mut iterations = 0;
    let mut converged = fx_norm.is_zero();
    while !converged && iterations < settings.max_steps {
        iterations += 1;

        let mut jac_err = None;
        let mut jac = finite_difference_jacobian(
            |v: &[Mpf]| match eval(v) {
                Ok(fv) => fv,
                Err(e) => {
                    jac_err = Some(e);
                    vec![Mpf::nan(); n]
                }
            },
            &x,
            Some(fx.as_slice()),
        );
        if let Some(e) = jac_err {
            return Err(e);
        }

        let mut perm = vec![0; n];
        lu_in_place(&mut jac, &mut perm)?;
        let neg_fx: Vec<Mpf> = fx.iter().map(|v| -v).collect();
        let step = lu_solve(&jac, &perm, &neg_fx);

        // Damping: halve the step until the residual norm decreases
        let mut accepted = None;
        let mut scale = Mpf::from(1);
        for _ in 0..=mp::prec() {
            let x1: Vec<Mpf> = x.iter().zip(&step).map(|(xi, si)| xi + &scale * si).collect();
            if x1 == x {
                break;
            }
            let f1 = eval(&x1)?;
            let norm1 = norm_inf(&f1);
            if norm1 < fx_norm {
                accepted = Some((x1, f1, norm1));
                break;
            }
            scale = scale >> 1;
        }

        let Some((x1, f1, norm1)) = accepted else {
            log::trace!("find_root_nd step {}: no damped step reduces the residual", iterations);
            converged = true;
            break;
        };

        let taken: Vec<Mpf> = x1.iter().zip(&x).map(|(a, b)| a - b).collect();
        let error = norm_inf(&taken);
        x = x1;
        fx = f1;
        fx_norm = norm1;
        log::trace!(
            "find_root_nd step {}: |F| = {:.5}, |dx| = {:.5}, damping {}",
            iterations,
            fx_norm,
            error,
            scale
        );
        converged = fx_norm.is_zero() || error < &tol * &norm_inf(&x).max(&Mpf::from(1));
    }

    if settings.verify {
        let residual = fx_norm.square();
        if residual > tol {
            return Err(if converged {
                OptimError::NoConvergence { residual }
            } else {
                OptimError::MaxIterations
            });
        }
    }

    Ok(NdRootResult {
        x,
        fx,
        iterations,
        evals,
    })
}
