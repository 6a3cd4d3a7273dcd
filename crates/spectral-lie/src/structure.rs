//! Structure constants of a finite-dimensional Lie algebra
//!
//! `C[i, j, k]` is the coefficient of `e_k` in `[e_i, e_j]`. The tensor is
//! antisymmetric in its first two slots; the Jacobi identity is not checked
//! here but through `d^2 = 0` on the Chevalley-Eilenberg complex.

use crate::error::{Result, SpectralLieError};
use nalgebra::DMatrix;

/// Tolerance on `tr(ad_x)` for unimodularity
pub const UNIMODULAR_TOLERANCE: f64 = 1e-12;

/// Relative singular-value cutoff for Killing-form non-degeneracy
pub const KILLING_RANK_RTOL: f64 = 1e-10;

/// Dense n x n x n structure-constant tensor
#[derive(Debug, Clone, PartialEq)]
pub struct StructureConstants {
    n: usize,
    data: Vec<f64>,
}

impl StructureConstants {
    /// The abelian algebra of dimension `n` (all brackets zero)
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n * n],
        }
    }

    /// Build from a row-major flat buffer of length n^3
    pub fn from_flat(n: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n * n * n {
            return Err(SpectralLieError::shape_mismatch(
                format!("{} entries ({n} x {n} x {n})", n * n * n),
                format!("{} entries", data.len()),
            ));
        }
        Ok(Self { n, data })
    }

    /// Build from a nested `[i][j][k]` array; every axis must have the same length
    pub fn from_nested(nested: &[Vec<Vec<f64>>]) -> Result<Self> {
        let n = nested.len();
        let mut data = Vec::with_capacity(n * n * n);

        for (i, plane) in nested.iter().enumerate() {
            if plane.len() != n {
                return Err(SpectralLieError::shape_mismatch(
                    format!("({n}, {n}, {n})"),
                    format!("axis 1 of slice {i} has length {}", plane.len()),
                ));
            }
            for (j, row) in plane.iter().enumerate() {
                if row.len() != n {
                    return Err(SpectralLieError::shape_mismatch(
                        format!("({n}, {n}, {n})"),
                        format!("axis 2 of slice ({i}, {j}) has length {}", row.len()),
                    ));
                }
                data.extend_from_slice(row);
            }
        }

        Ok(Self { n, data })
    }

    /// Build from brackets `[e_i, e_j] += c e_k`, writing both `+c` at (i, j, k) and `-c` at (j, i, k)
    pub fn from_brackets(n: usize, brackets: &[(usize, usize, usize, f64)]) -> Result<Self> {
        let mut constants = Self::zeros(n);
        for &(i, j, k, c) in brackets {
            constants.add_bracket(i, j, k, c)?;
        }
        Ok(constants)
    }

    /// Accumulate `[e_i, e_j] += c e_k` together with its antisymmetric partner
    pub fn add_bracket(&mut self, i: usize, j: usize, k: usize, c: f64) -> Result<()> {
        let n = self.n;
        if i >= n || j >= n || k >= n {
            return Err(SpectralLieError::shape_mismatch(
                format!("indices below {n}"),
                format!("({i}, {j}, {k})"),
            ));
        }
        let ijk = self.offset(i, j, k);
        let jik = self.offset(j, i, k);
        self.data[ijk] += c;
        self.data[jik] -= c;
        Ok(())
    }

    #[inline]
    fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.n + j) * self.n + k
    }

    /// Algebra dimension n
    pub fn dimension(&self) -> usize {
        self.n
    }

    /// Coefficient of `e_k` in `[e_i, e_j]`
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        self.data[self.offset(i, j, k)]
    }

    /// Coefficients of `[e_i, e_j]` over the basis
    pub fn bracket(&self, i: usize, j: usize) -> &[f64] {
        let start = self.offset(i, j, 0);
        &self.data[start..start + self.n]
    }

    /// Whether every bracket vanishes (within `tolerance`)
    pub fn is_abelian(&self, tolerance: f64) -> bool {
        self.data.iter().all(|c| c.abs() <= tolerance)
    }

    /// Whether `C[i, j, k] = -C[j, i, k]` holds within `tolerance`
    pub fn is_antisymmetric(&self, tolerance: f64) -> bool {
        let n = self.n;
        for i in 0..n {
            for j in i..n {
                for k in 0..n {
                    if (self.get(i, j, k) + self.get(j, i, k)).abs() > tolerance {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Matrix of `ad_x`: column `j` holds the coordinates of `[e_x, e_j]`
    pub fn adjoint(&self, x: usize) -> DMatrix<f64> {
        DMatrix::from_fn(self.n, self.n, |k, j| self.get(x, j, k))
    }

    /// `tr(ad_x)`
    pub fn adjoint_trace(&self, x: usize) -> f64 {
        (0..self.n).map(|i| self.get(x, i, i)).sum()
    }

    /// Every adjoint map is traceless
    pub fn is_unimodular(&self) -> bool {
        (0..self.n).all(|x| self.adjoint_trace(x).abs() <= UNIMODULAR_TOLERANCE)
    }

    /// Killing form `K_ab = tr(ad_a ad_b) = sum_{k,j} C[a,k,j] C[b,j,k]`
    pub fn killing_form(&self) -> DMatrix<f64> {
        let n = self.n;
        let mut killing = DMatrix::zeros(n, n);
        for a in 0..n {
            for b in a..n {
                let mut trace = 0.0;
                for k in 0..n {
                    for j in 0..n {
                        trace += self.get(a, k, j) * self.get(b, j, k);
                    }
                }
                killing[(a, b)] = trace;
                killing[(b, a)] = trace;
            }
        }
        killing
    }

    /// Cartan's criterion: semisimple iff the Killing form is non-degenerate
    ///
    /// The zero algebra is not reported as semisimple.
    pub fn is_semisimple(&self) -> bool {
        if self.n == 0 {
            return false;
        }
        let singular_values = self.killing_form().svd(false, false).singular_values;
        let max = singular_values.iter().copied().fold(0.0_f64, f64::max);
        if max <= 0.0 {
            return false;
        }
        singular_values
            .iter()
            .all(|&s| s > KILLING_RANK_RTOL * max)
    }
}
