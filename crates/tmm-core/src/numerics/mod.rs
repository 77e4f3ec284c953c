pub mod matrix;

pub use matrix::{Matrix2, MatrixError};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct NumericTolerance {
    #[serde(rename = "absTol")]
    pub abs_tol: f64,
    #[serde(rename = "relTol")]
    pub rel_tol: f64,
    #[serde(rename = "relativeFloor")]
    pub relative_floor: f64,
}

impl NumericTolerance {
    pub const fn absolute(abs_tol: f64) -> Self {
        Self {
            abs_tol,
            rel_tol: 0.0,
            relative_floor: 1.0e-12,
        }
    }

    pub fn accepts(&self, lhs: f64, rhs: f64) -> bool {
        within_tolerance(lhs, rhs, self.abs_tol, self.rel_tol, self.relative_floor)
    }
}

pub fn relative_difference(lhs: f64, rhs: f64, relative_floor: f64) -> f64 {
    let scale = lhs.abs().max(rhs.abs()).max(relative_floor);
    (lhs - rhs).abs() / scale
}

pub fn within_tolerance(
    lhs: f64,
    rhs: f64,
    abs_tol: f64,
    rel_tol: f64,
    relative_floor: f64,
) -> bool {
    let abs_diff = (lhs - rhs).abs();
    abs_diff <= abs_tol || relative_difference(lhs, rhs, relative_floor) <= rel_tol
}

/// Index of the first pair whose values disagree beyond `tolerance`, or the
/// shorter length when the slices differ in length.
pub fn first_grid_mismatch(lhs: &[f64], rhs: &[f64], tolerance: NumericTolerance) -> Option<usize> {
    let mismatch = lhs
        .iter()
        .zip(rhs)
        .position(|(&left, &right)| !tolerance.accepts(left, right));

    mismatch.or_else(|| (lhs.len() != rhs.len()).then(|| lhs.len().min(rhs.len())))
}
