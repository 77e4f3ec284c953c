use num_complex::Complex64;

use crate::domain::TmmError;
use crate::numerics::Matrix2;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoefficientError {
    #[error("leading transfer-matrix element M[0,0] is zero")]
    ZeroLeadingElement,
    #[error("{quantity} is not finite ({value})")]
    NonFinite {
        quantity: &'static str,
        value: Complex64,
    },
    #[error("{quantity} has a zero denominator")]
    ZeroDenominator { quantity: &'static str },
}

impl From<CoefficientError> for TmmError {
    fn from(error: CoefficientError) -> Self {
        let placeholder = match error {
            CoefficientError::ZeroLeadingElement => "NUMERIC.ZERO_LEADING_ELEMENT",
            CoefficientError::NonFinite { .. } => "NUMERIC.NON_FINITE_COEFFICIENT",
            CoefficientError::ZeroDenominator { .. } => "NUMERIC.ZERO_DENOMINATOR",
        };
        TmmError::numerical(placeholder, error.to_string())
    }
}

/// Power reflectance and amplitude `(R, r)` with `r = M10 / M00`.
pub fn reflectance(transfer: &Matrix2) -> Result<(f64, Complex64), CoefficientError> {
    let m00 = leading_element(transfer)?;
    let amplitude = checked("reflection amplitude", transfer[(1, 0)] / m00)?;
    let power = (amplitude * amplitude.conj()).re;
    Ok((power, amplitude))
}

/// Power transmittance and amplitude `(T, t)` with `t = 1 / M00`.
///
/// `Re(det M)` carries the substrate/ambient admittance ratio, so the result
/// is a power fraction even when the two semi-infinite media differ.
pub fn transmittance(transfer: &Matrix2) -> Result<(f64, Complex64), CoefficientError> {
    let m00 = leading_element(transfer)?;
    let amplitude = checked("transmission amplitude", m00.inv())?;
    let determinant = checked("transfer-matrix determinant", transfer.determinant())?;
    let power = determinant.re * (amplitude * amplitude.conj()).re;
    Ok((power, amplitude))
}

/// Single-interface Fresnel amplitudes from medium 1 into medium 2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FresnelCoefficients {
    pub r_s: Complex64,
    pub t_s: Complex64,
    pub r_p: Complex64,
    pub t_p: Complex64,
}

/// Fresnel amplitudes from indices and longitudinal wavenumbers `k1x`, `k2x`.
/// The p-wave amplitudes refer to the electric field, matching the p-form
/// dynamical matrix.
pub fn fresnel_coefficients(
    n1: Complex64,
    n2: Complex64,
    k1x: Complex64,
    k2x: Complex64,
) -> Result<FresnelCoefficients, CoefficientError> {
    let s_denominator = k1x + k2x;
    if s_denominator.norm_sqr() == 0.0 {
        return Err(CoefficientError::ZeroDenominator {
            quantity: "s-wave Fresnel coefficient",
        });
    }

    let n1_sq = n1 * n1;
    let n2_sq = n2 * n2;
    let p_denominator = n1_sq * k2x + n2_sq * k1x;
    if p_denominator.norm_sqr() == 0.0 {
        return Err(CoefficientError::ZeroDenominator {
            quantity: "p-wave Fresnel coefficient",
        });
    }

    Ok(FresnelCoefficients {
        r_s: (k1x - k2x) / s_denominator,
        t_s: 2.0 * k1x / s_denominator,
        r_p: (n1_sq * k2x - n2_sq * k1x) / p_denominator,
        t_p: 2.0 * n1 * n2 * k1x / p_denominator,
    })
}

/// Interface transfer matrix `(1/t) [[1, r], [r, 1]]`.
pub fn interface_matrix(r: Complex64, t: Complex64) -> Result<Matrix2, CoefficientError> {
    if t.norm_sqr() == 0.0 {
        return Err(CoefficientError::ZeroDenominator {
            quantity: "interface matrix",
        });
    }

    let one = Complex64::new(1.0, 0.0);
    Ok(Matrix2::new(one, r, r, one).scale(t.inv()))
}

fn leading_element(transfer: &Matrix2) -> Result<Complex64, CoefficientError> {
    let m00 = transfer[(0, 0)];
    if m00.re == 0.0 && m00.im == 0.0 {
        return Err(CoefficientError::ZeroLeadingElement);
    }
    Ok(m00)
}

fn checked(quantity: &'static str, value: Complex64) -> Result<Complex64, CoefficientError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoefficientError::NonFinite { quantity, value })
    }
}
