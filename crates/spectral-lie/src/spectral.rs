//! Hodge Laplacian spectra
//!
//! With Gram matrices G_p induced from a base metric, the metric adjoint of
//! d_p is `d_p^* = G_p^+ d_p^T G_{p+1}` and the Hodge Laplacian is
//!
//! ```text
//! Delta_p = d_p^* d_p + d_{p-1} d_{p-1}^*
//! ```
//!
//! Its kernel is the space of harmonic p-forms, so the number of zero
//! eigenvalues is the harmonic dimension at degree p.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, SymmetricEigen};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::CohomologyEngine;
use crate::error::Result;
use crate::linalg::{pseudo_inverse, symmetrize};
use crate::metric::{induced_metric, BaseMetric};

/// Eigenvalues with |lambda| below this are counted as harmonic
pub const HARMONIC_TOLERANCE: f64 = 1e-10;

/// Spectrum of the Hodge Laplacian at one degree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Eigenvalues in ascending order
    pub eigenvalues: Vec<f64>,
    /// Number of eigenvalues within [`HARMONIC_TOLERANCE`] of zero
    pub harmonic_dimension: usize,
}

impl Spectrum {
    /// Spectrum of the zero space
    pub fn empty() -> Self {
        Self {
            eigenvalues: Vec::new(),
            harmonic_dimension: 0,
        }
    }

    /// Smallest eigenvalue above the harmonic tolerance
    pub fn spectral_gap(&self) -> Option<f64> {
        self.eigenvalues
            .iter()
            .copied()
            .find(|&e| e >= HARMONIC_TOLERANCE)
    }

    /// Whether every eigenvalue is at least `-tolerance`
    pub fn is_positive_semidefinite(&self, tolerance: f64) -> bool {
        self.eigenvalues.iter().all(|&e| e >= -tolerance)
    }
}

/// Builds and diagonalizes Hodge Laplacians for an engine and a base metric
#[derive(Debug, Clone)]
pub struct SpectralAnalyzer<'a> {
    engine: &'a CohomologyEngine,
    metric: DMatrix<f64>,
}

impl<'a> SpectralAnalyzer<'a> {
    /// Analyzer with an explicit n x n base metric matrix
    pub fn new(engine: &'a CohomologyEngine, metric: DMatrix<f64>) -> Self {
        Self { engine, metric }
    }

    /// Analyzer from a [`BaseMetric`], checking its shape against the algebra
    pub fn with_base_metric(engine: &'a CohomologyEngine, metric: &BaseMetric) -> Result<Self> {
        Ok(Self::new(engine, metric.matrix(engine.dimension())?))
    }

    /// Base metric on the algebra
    pub fn metric(&self) -> &DMatrix<f64> {
        &self.metric
    }

    /// Hodge Laplacian at degree `p`, exactly symmetric
    pub fn laplacian(&self, p: usize) -> DMatrix<f64> {
        let g_p = induced_metric(&self.metric, p);
        if g_p.is_empty() {
            return DMatrix::zeros(0, 0);
        }
        let g_next = induced_metric(&self.metric, p + 1);
        let d_p = self.engine.assemble_d(p);

        let mut laplacian = DMatrix::zeros(g_p.nrows(), g_p.ncols());

        // d_p^* d_p
        if !d_p.is_empty() && !g_next.is_empty() {
            let d_star = pseudo_inverse(&g_p) * d_p.transpose() * &g_next;
            laplacian += d_star * &d_p;
        }

        // d_{p-1} d_{p-1}^*
        if let Some(prev) = p.checked_sub(1) {
            let g_prev = induced_metric(&self.metric, prev);
            let d_prev = self.engine.assemble_d(prev);
            if !d_prev.is_empty() && !g_prev.is_empty() {
                let d_prev_star = pseudo_inverse(&g_prev) * d_prev.transpose() * &g_p;
                laplacian += &d_prev * d_prev_star;
            }
        }

        symmetrize(&laplacian)
    }

    /// Ascending eigenvalues of the Laplacian and its harmonic dimension
    pub fn spectrum(&self, p: usize) -> Spectrum {
        let laplacian = self.laplacian(p);
        if laplacian.is_empty() {
            return Spectrum::empty();
        }

        let mut eigenvalues: Vec<f64> = SymmetricEigen::new(laplacian)
            .eigenvalues
            .iter()
            .copied()
            .collect();
        eigenvalues.sort_by(|a, b| a.total_cmp(b));

        let harmonic_dimension = eigenvalues
            .iter()
            .filter(|e| e.abs() < HARMONIC_TOLERANCE)
            .count();

        debug!(degree = p, size = eigenvalues.len(), harmonic_dimension, "diagonalized Laplacian");

        Spectrum {
            eigenvalues,
            harmonic_dimension,
        }
    }

    /// Spectra for degrees `0..=max_degree`
    pub fn spectra(&self, max_degree: usize) -> BTreeMap<usize, Spectrum> {
        (0..=max_degree).map(|p| (p, self.spectrum(p))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betti::BettiPolicy;
    use crate::linalg::is_symmetric;
    use crate::structure::StructureConstants;
    use approx::assert_relative_eq;

    fn engine(constants: StructureConstants, semisimple: bool) -> CohomologyEngine {
        CohomologyEngine::new(constants, 5, BettiPolicy::ChevalleyEilenberg, semisimple)
    }

    fn sl2() -> StructureConstants {
        StructureConstants::from_brackets(3, &[(0, 1, 1, 2.0), (0, 2, 2, -2.0), (1, 2, 0, 1.0)])
            .unwrap()
    }

    #[test]
    fn test_abelian_laplacian_vanishes() {
        let engine = engine(StructureConstants::zeros(3), false);
        let analyzer = SpectralAnalyzer::new(&engine, DMatrix::identity(3, 3));

        let l0 = analyzer.laplacian(0);
        assert_eq!(l0.shape(), (1, 1));
        assert_relative_eq!(l0[(0, 0)], 0.0);

        let s1 = analyzer.spectrum(1);
        assert_eq!(s1.harmonic_dimension, 3);
        assert_eq!(analyzer.spectrum(0).harmonic_dimension, 1);
    }

    #[test]
    fn test_sl2_spectrum() {
        let engine = engine(sl2(), true);
        let analyzer = SpectralAnalyzer::new(&engine, DMatrix::identity(3, 3));

        // Delta_1 = d_1^T d_1 = diag(1, 4, 4)
        let s1 = analyzer.spectrum(1);
        assert_eq!(s1.harmonic_dimension, 0);
        for (got, want) in s1.eigenvalues.iter().zip([1.0, 4.0, 4.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-10);
        }
        assert_relative_eq!(s1.spectral_gap().unwrap(), 1.0, epsilon = 1e-10);

        // Delta_2 = d_1 d_1^T = diag(4, 4, 1)
        let s2 = analyzer.spectrum(2);
        for (got, want) in s2.eigenvalues.iter().zip([1.0, 4.0, 4.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-10);
        }

        assert_eq!(analyzer.spectrum(0).harmonic_dimension, 1);
        assert_eq!(analyzer.spectrum(3).harmonic_dimension, 1);
    }

    #[test]
    fn test_empty_degree() {
        let engine = engine(sl2(), true);
        let analyzer = SpectralAnalyzer::new(&engine, DMatrix::identity(3, 3));
        assert_eq!(analyzer.laplacian(4).shape(), (0, 0));
        assert_eq!(analyzer.spectrum(4), Spectrum::empty());
    }

    #[test]
    fn test_laplacian_is_symmetric_under_general_metric() {
        let engine = engine(sl2(), true);
        let g = DMatrix::from_row_slice(3, 3, &[2.0, 0.3, 0.0, 0.3, 1.0, 0.1, 0.0, 0.1, 1.5]);
        let analyzer = SpectralAnalyzer::new(&engine, g);
        for p in 0..=3 {
            assert!(is_symmetric(&analyzer.laplacian(p), 0.0));
        }
    }

    #[test]
    fn test_singular_metric_does_not_fail() {
        let engine = engine(sl2(), true);
        let g = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![1.0, 1.0, 0.0]));
        let analyzer = SpectralAnalyzer::new(&engine, g);
        let spectra = analyzer.spectra(3);
        assert_eq!(spectra.len(), 4);
        assert!(spectra.values().all(|s| s.eigenvalues.iter().all(|e| e.is_finite())));
    }

    #[test]
    fn test_base_metric_shape_checked() {
        let engine = engine(sl2(), true);
        let metric = BaseMetric::Explicit(DMatrix::identity(2, 2));
        assert!(SpectralAnalyzer::with_base_metric(&engine, &metric).is_err());
    }
}
