//! Dense linear-algebra helpers on top of nalgebra
//!
//! All routines accept empty matrices and never fail: rank deficiency and
//! singular inputs are handled through singular-value cutoffs.

use nalgebra::DMatrix;

/// Relative singular-value cutoff used for cohomology ranks
pub const RANK_RTOL: f64 = 1e-12;

/// Numerical rank: number of singular values above `rtol * sigma_max`
pub fn numerical_rank(matrix: &DMatrix<f64>, rtol: f64) -> usize {
    if matrix.is_empty() {
        return 0;
    }
    let singular_values = matrix.clone().svd(false, false).singular_values;
    let max = singular_values.iter().copied().fold(0.0_f64, f64::max);
    let threshold = rtol * max;
    singular_values.iter().filter(|&&s| s > threshold).count()
}

/// Moore-Penrose pseudo-inverse with a relative cutoff of `1e-15 * max(rows, cols) * sigma_max`
///
/// Returns a `cols x rows` matrix. Singular values at or below the cutoff are
/// treated as zero, so near-singular Gram matrices are inverted on their range.
pub fn pseudo_inverse(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    let (rows, cols) = matrix.shape();
    if matrix.is_empty() {
        return DMatrix::zeros(cols, rows);
    }

    let svd = matrix.clone().svd(true, true);
    let max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let cutoff = 1e-15 * rows.max(cols) as f64 * max;

    // Only fails when U/V^T were not requested, which they were
    svd.pseudo_inverse(cutoff)
        .unwrap_or_else(|_| DMatrix::zeros(cols, rows))
}

/// `(A + A^T) / 2`
pub fn symmetrize(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    (matrix + matrix.transpose()) * 0.5
}

/// Largest absolute entry, 0 for an empty matrix
pub fn max_abs(matrix: &DMatrix<f64>) -> f64 {
    matrix.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}

/// Whether `A` equals its transpose within `tolerance`
pub fn is_symmetric(matrix: &DMatrix<f64>, tolerance: f64) -> bool {
    matrix.is_square() && max_abs(&(matrix - matrix.transpose())) <= tolerance
}
