//! Modified Bessel function of the first kind.

use num_traits::Zero;

use crate::mp::{self, Mpf};

use super::{magnitude_bits, SpecialError};

/// Modified Bessel function of the first kind I_ν(x) for ν ≥ 0, x ≥ 0.
///
/// Sums the ascending series
/// I_ν(x) = Σ_k (x/2)^{2k+ν} / (k! Γ(k+ν+1)),
/// whose terms are all positive, so no cancellation occurs.
///
/// # Example
///
/// ```
/// use mpdist::mp::{self, Mpf};
/// use mpdist::special::bessel_i;
///
/// let _prec = mp::workdps(30);
/// // I_{1/2}(x) = sqrt(2/(πx)) sinh(x)
/// let x = Mpf::from(2);
/// let sinh = (x.exp() - (-&x).exp()) >> 1;
/// let expected = (Mpf::from(2) / (Mpf::pi() * &x)).sqrt() * sinh;
/// let i = bessel_i(&Mpf::from(0.5), &x).unwrap();
/// assert!((i - expected).abs() < 1e-28);
/// ```
pub fn bessel_i(nu: &Mpf, x: &Mpf) -> Result<Mpf, SpecialError> {
    if !(*nu >= 0) || !(*x >= 0) || nu.is_infinite() {
        return Err(SpecialError::DomainError);
    }
    if x.is_zero() {
        return Ok(if nu.is_zero() { Mpf::from(1) } else { Mpf::zero() });
    }
    if x.is_infinite() {
        return Ok(Mpf::infinity());
    }

    let bits = mp::prec() as usize;
    // Terms grow until k ≈ x/2 and then fall off factorially.
    let limit = 100 + 4 * bits + 2 * x.to_f64() as usize;

    let r = {
        let _prec = mp::extraprec(20 + magnitude_bits(x));
        let eps = mp::eps();
        let half = x >> 1;
        let q = half.square();

        let mut term = half.powf(nu) / (nu + 1i32).gamma();
        let mut sum = term.clone();
        let mut converged = false;
        for k in 1..limit {
            let kf = Mpf::from(k);
            let denom = &kf * (&kf + nu);
            term = term * &q / &denom;
            sum += &term;
            if term < &sum * &eps && denom > q {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(SpecialError::ConvergenceFailure);
        }
        sum
    };
    Ok(r.rounded())
}
