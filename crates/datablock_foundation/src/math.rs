//! Small numeric helpers shared by the access layer and tests.

use ndarray::Array2;

/// Linear interpolation between two scalars.
///
/// `t = 0` yields `a`, `t = 1` yields `b`. `t` is not clamped.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Element-wise linear interpolation between two matrices of equal shape.
///
/// # Panics
/// Panics if the shapes differ (ndarray broadcasting rules).
#[must_use]
pub fn lerp_matrix(a: &Array2<f64>, b: &Array2<f64>, t: f64) -> Array2<f64> {
    a * (1.0 - t) + b * t
}
