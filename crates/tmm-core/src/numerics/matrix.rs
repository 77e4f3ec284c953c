use num_complex::Complex64;
use serde::Serialize;
use std::ops::{Index, IndexMut, Mul};

const SINGULAR_RELATIVE_EPSILON: f64 = 1.0e-15;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MatrixError {
    #[error("matrix is singular (determinant {determinant})")]
    Singular { determinant: Complex64 },
    #[error("matrix contains non-finite entry at ({row},{col})")]
    NonFinite { row: usize, col: usize },
}

/// Dense 2x2 complex matrix, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Matrix2 {
    entries: [[Complex64; 2]; 2],
}

impl Matrix2 {
    pub const IDENTITY: Self = Self {
        entries: [[ONE, ZERO], [ZERO, ONE]],
    };

    pub const fn new(m00: Complex64, m01: Complex64, m10: Complex64, m11: Complex64) -> Self {
        Self {
            entries: [[m00, m01], [m10, m11]],
        }
    }

    pub const fn diagonal(d0: Complex64, d1: Complex64) -> Self {
        Self::new(d0, ZERO, ZERO, d1)
    }

    pub fn determinant(&self) -> Complex64 {
        let [[a, b], [c, d]] = self.entries;
        a * d - b * c
    }

    pub fn scale(&self, factor: Complex64) -> Self {
        let [[a, b], [c, d]] = self.entries;
        Self::new(a * factor, b * factor, c * factor, d * factor)
    }

    /// Maximum absolute row sum.
    pub fn infinity_norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|row| row[0].norm() + row[1].norm())
            .fold(0.0, f64::max)
    }

    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }

    /// Closed-form inverse. The determinant is compared against the squared
    /// infinity norm so the singularity test does not depend on scale.
    pub fn inverse(&self) -> Result<Self, MatrixError> {
        if let Some((row, col)) = self.first_non_finite() {
            return Err(MatrixError::NonFinite { row, col });
        }

        let determinant = self.determinant();
        let norm = self.infinity_norm();
        if determinant == ZERO || determinant.norm() <= SINGULAR_RELATIVE_EPSILON * norm * norm {
            return Err(MatrixError::Singular { determinant });
        }

        let [[a, b], [c, d]] = self.entries;
        Ok(Self::new(d, -b, -c, a).scale(determinant.inv()))
    }

    /// Element-wise closeness under an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, abs_tol: f64) -> bool {
        self.entries
            .iter()
            .flatten()
            .zip(other.entries.iter().flatten())
            .all(|(lhs, rhs)| (lhs - rhs).norm() <= abs_tol)
    }

    fn first_non_finite(&self) -> Option<(usize, usize)> {
        (0..2)
            .flat_map(|row| (0..2).map(move |col| (row, col)))
            .find(|&(row, col)| !self.entries[row][col].is_finite())
    }
}

impl Default for Matrix2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<(usize, usize)> for Matrix2 {
    type Output = Complex64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.entries[row][col]
    }
}

impl IndexMut<(usize, usize)> for Matrix2 {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.entries[row][col]
    }
}

impl Mul for Matrix2 {
    type Output = Matrix2;

    fn mul(self, rhs: Matrix2) -> Matrix2 {
        &self * &rhs
    }
}

impl Mul<&Matrix2> for &Matrix2 {
    type Output = Matrix2;

    fn mul(self, rhs: &Matrix2) -> Matrix2 {
        let [[a, b], [c, d]] = self.entries;
        let [[e, f], [g, h]] = rhs.entries;
        Matrix2::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }
}
