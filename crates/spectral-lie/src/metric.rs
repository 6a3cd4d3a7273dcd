//! Induced inner products on exterior powers
//!
//! A base metric G on the algebra induces `<e_I, e_J> = det(G[I, J])` on the
//! degree-p wedge basis (Grassmann / Cauchy-Binet). The Gram matrix is dense
//! with one p x p determinant per pair of basis tuples, which is fine for the
//! algebra sizes this crate targets.

use nalgebra::DMatrix;

use crate::combinatorics::wedge_basis;
use crate::error::{Result, SpectralLieError};
use crate::linalg::{is_symmetric, symmetrize};

/// Symmetry tolerance for user-supplied base metrics
pub const METRIC_SYMMETRY_TOLERANCE: f64 = 1e-12;

/// Inner product on the algebra used to induce wedge-power metrics
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BaseMetric {
    /// Standard inner product, orthonormal basis
    #[default]
    Identity,
    /// Explicit symmetric n x n matrix
    Explicit(DMatrix<f64>),
}

impl BaseMetric {
    /// Validate an explicit metric given as rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(SpectralLieError::InvalidMetric(format!(
                "row {i} has {} entries, expected {n}",
                row.len()
            )));
        }
        let matrix = DMatrix::from_fn(n, n, |i, j| rows[i][j]);
        if !is_symmetric(&matrix, METRIC_SYMMETRY_TOLERANCE) {
            return Err(SpectralLieError::InvalidMetric(
                "matrix is not symmetric".to_string(),
            ));
        }
        Ok(Self::Explicit(matrix))
    }

    /// Dense n x n matrix for an algebra of dimension `n`
    pub fn matrix(&self, n: usize) -> Result<DMatrix<f64>> {
        match self {
            Self::Identity => Ok(DMatrix::identity(n, n)),
            Self::Explicit(m) if m.shape() == (n, n) => Ok(m.clone()),
            Self::Explicit(m) => Err(SpectralLieError::shape_mismatch(
                format!("({n}, {n}) base metric"),
                format!("{:?}", m.shape()),
            )),
        }
    }
}

/// Gram matrix of the degree-`p` wedge basis under the base metric `g`
///
/// `p = 0` gives the 1 x 1 identity and `p > n` an empty matrix. The result is
/// averaged with its transpose so it is exactly symmetric.
pub fn induced_metric(g: &DMatrix<f64>, p: usize) -> DMatrix<f64> {
    let n = g.nrows();
    if p == 0 {
        return DMatrix::identity(1, 1);
    }
    if p > n {
        return DMatrix::zeros(0, 0);
    }

    let basis = wedge_basis(n, p);
    let m = basis.len();
    let mut gram = DMatrix::zeros(m, m);

    for (a, rows) in basis.iter().enumerate() {
        for (b, cols) in basis.iter().enumerate() {
            let minor = DMatrix::from_fn(p, p, |r, c| g[(rows[r], cols[c])]);
            gram[(a, b)] = minor.determinant();
        }
    }

    symmetrize(&gram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_induces_identity() {
        let g = DMatrix::<f64>::identity(4, 4);
        for p in 0..=4 {
            let gram = induced_metric(&g, p);
            let dim = gram.nrows();
            assert_relative_eq!(gram, DMatrix::identity(dim, dim));
        }
    }

    #[test]
    fn test_out_of_range_degree_is_empty() {
        let g = DMatrix::<f64>::identity(3, 3);
        assert_eq!(induced_metric(&g, 4).shape(), (0, 0));
    }

    #[test]
    fn test_diagonal_metric_products() {
        let g = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![2.0, 3.0, 5.0]));
        let gram = induced_metric(&g, 2);
        // basis (0,1), (0,2), (1,2)
        assert_relative_eq!(gram[(0, 0)], 6.0, epsilon = 1e-12);
        assert_relative_eq!(gram[(1, 1)], 10.0, epsilon = 1e-12);
        assert_relative_eq!(gram[(2, 2)], 15.0, epsilon = 1e-12);
        assert_relative_eq!(gram[(0, 1)], 0.0, epsilon = 1e-12);

        let top = induced_metric(&g, 3);
        assert_relative_eq!(top[(0, 0)], 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_off_diagonal_minor() {
        let g = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]);
        let gram = induced_metric(&g, 1);
        assert_relative_eq!(gram, g);
        let top = induced_metric(&g, 2);
        assert_relative_eq!(top[(0, 0)], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_base_metric_validation() {
        assert!(BaseMetric::from_rows(&[vec![1.0, 0.5], vec![0.5, 1.0]]).is_ok());
        assert!(matches!(
            BaseMetric::from_rows(&[vec![1.0, 0.5], vec![0.0, 1.0]]),
            Err(SpectralLieError::InvalidMetric(_))
        ));
        assert!(BaseMetric::from_rows(&[vec![1.0, 0.5]]).is_err());

        let metric = BaseMetric::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert!(metric.matrix(3).is_err());
        assert_eq!(BaseMetric::Identity.matrix(3).unwrap(), DMatrix::identity(3, 3));
    }
}
