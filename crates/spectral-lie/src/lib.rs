//! # spectral-lie
//!
//! Chevalley-Eilenberg cohomology and Hodge Laplacian spectra of
//! finite-dimensional real Lie algebras.
//!
//! Given structure constants `[e_i, e_j] = C[i, j, k] e_k`, the crate builds
//! the cochain complex of the dual exterior algebra with trivial
//! coefficients and reads off:
//!
//! | Quantity | Module |
//! |----------|--------|
//! | Differentials d_p and the d^2 = 0 check | [`engine`] |
//! | Betti numbers with policy corrections | [`engine`], [`betti`] |
//! | Metrics induced on wedge powers | [`metric`] |
//! | Hodge Laplacian spectra, harmonic dimensions | [`spectral`] |
//! | Euler characteristic summary | [`physics`] |
//!
//! ## Quick Start
//!
//! ```rust
//! use spectral_lie::{BettiPolicy, CohomologyEngine, SpectralAnalyzer, StructureConstants};
//!
//! // sl(2) in the basis H, E, F
//! let sl2 = StructureConstants::from_brackets(
//!     3,
//!     &[(0, 1, 1, 2.0), (0, 2, 2, -2.0), (1, 2, 0, 1.0)],
//! )
//! .unwrap();
//!
//! let engine = CohomologyEngine::new(sl2, 3, BettiPolicy::ChevalleyEilenberg, true);
//! assert!(engine.d_squared_zero(1e-12));
//!
//! // Whitehead's lemma clears every positive degree of a semisimple algebra
//! let betti = engine.betti_numbers();
//! assert_eq!(betti[&0], 1);
//! assert_eq!(betti[&1], 0);
//!
//! let analyzer = SpectralAnalyzer::new(&engine, nalgebra::DMatrix::identity(3, 3));
//! assert_eq!(analyzer.spectrum(0).harmonic_dimension, 1);
//! ```
//!
//! ## Pipeline
//!
//! [`SpectralLieModel`] ties the pieces together from an [`AnalysisConfig`]:
//!
//! ```rust,no_run
//! use spectral_lie::SpectralLieModel;
//!
//! let model = SpectralLieModel::from_config_file("configs/sl2.yaml").unwrap();
//! let (report, path) = model.run().unwrap();
//! println!("{:?} written to {}", report.cohomology.betti_numbers, path.display());
//! ```

pub mod betti;
pub mod cartan;
pub mod combinatorics;
pub mod config;
pub mod engine;
pub mod error;
pub mod linalg;
pub mod metric;
pub mod model;
pub mod physics;
pub mod registry;
pub mod report;
pub mod source;
pub mod spectral;
pub mod structure;

// Re-export main types
pub use betti::{adjust_betti, euler_characteristic, BettiNumbers, BettiPolicy, StructuralFacts};
pub use cartan::{CartanFamily, CartanType, ClassicalBackend, ClassificationBackend};
pub use config::{
    load_config, AnalysisConfig, CohomologyConfig, InputConfig, OutputConfig, PhysicsConfig,
    SemisimpleMode, SpectralConfig,
};
pub use engine::{CohomologyEngine, EngineOptions, WedgeBasis};
pub use error::{Result, SpectralLieError};
pub use metric::{induced_metric, BaseMetric};
pub use model::SpectralLieModel;
pub use physics::{PhysicsAnalyzer, PhysicsSummary, StructuralInvariants};
pub use registry::SourceRegistry;
pub use report::AnalysisReport;
pub use source::{AlgebraSource, CartanTypeSource, JsonStructureSource, LoadedAlgebra};
pub use spectral::{SpectralAnalyzer, Spectrum};
pub use structure::StructureConstants;

/// Crate version recorded in result metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used items
pub mod prelude {
    pub use crate::{
        AnalysisConfig, AnalysisReport, BettiPolicy, CohomologyEngine, Result,
        SpectralAnalyzer, SpectralLieError, SpectralLieModel, StructureConstants,
    };
}
