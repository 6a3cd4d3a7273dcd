//! End-to-end analysis: load, validate, compute, export

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::config::{load_config, AnalysisConfig, SemisimpleMode};
use crate::engine::CohomologyEngine;
use crate::error::{Result, SpectralLieError};
use crate::physics::PhysicsAnalyzer;
use crate::registry::SourceRegistry;
use crate::report::{AlgebraInfo, AnalysisReport, CohomologySummary, RunMetadata, SpectralSummary};
use crate::source::LoadedAlgebra;
use crate::spectral::SpectralAnalyzer;
use crate::VERSION;

/// File name written by [`SpectralLieModel::export`]
pub const RESULTS_FILE: &str = "results.json";

/// Configured analysis pipeline
#[derive(Debug, Clone)]
pub struct SpectralLieModel {
    config: AnalysisConfig,
    registry: SourceRegistry,
}

impl SpectralLieModel {
    /// Model over the default source registry
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_registry(config, SourceRegistry::with_defaults())
    }

    /// Model over a custom registry
    pub fn with_registry(config: AnalysisConfig, registry: SourceRegistry) -> Self {
        Self { config, registry }
    }

    /// Model from a YAML or TOML configuration file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(load_config(path)?))
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Load the algebra named by the input section
    pub fn load_algebra(&self) -> Result<LoadedAlgebra> {
        let input = &self.config.input;
        self.registry.get(&input.format)?.load(input)
    }

    /// Semisimplicity as configured, hinted by the source, or detected
    fn resolve_semisimple(&self, algebra: &LoadedAlgebra) -> bool {
        match self.config.cohomology.semisimple {
            SemisimpleMode::Assume(flag) => flag,
            SemisimpleMode::Auto => algebra
                .semisimple_hint
                .unwrap_or_else(|| algebra.constants.is_semisimple()),
        }
    }

    /// Engine for a loaded algebra under this configuration
    pub fn build_engine(&self, algebra: &LoadedAlgebra) -> CohomologyEngine {
        let cohomology = &self.config.cohomology;
        CohomologyEngine::new(
            algebra.constants.clone(),
            cohomology.max_degree,
            cohomology.policy,
            self.resolve_semisimple(algebra),
        )
    }

    /// Run the whole analysis
    ///
    /// With `input.validate_jacobi` set, a nonzero d^2 aborts with
    /// [`SpectralLieError::Consistency`] before anything else is computed.
    #[instrument(skip(self), fields(format = %self.config.input.format))]
    pub fn fit(&self) -> Result<AnalysisReport> {
        let algebra = self.load_algebra()?;

        // a mis-sized base metric is a config error, reported before any cochain work
        let metric = if self.config.spectral.compute_eigenvalues {
            let base = self.config.spectral.base_metric()?;
            Some(base.matrix(algebra.dimension())?)
        } else {
            None
        };

        let engine = self.build_engine(&algebra);
        let tolerance = self.config.cohomology.d2_tolerance;

        let violation = engine.first_d_squared_violation(tolerance);
        if let Some((degree, defect)) = violation {
            if self.config.input.validate_jacobi {
                return Err(SpectralLieError::Consistency { degree, defect });
            }
            warn!(degree, defect, "d^2 != 0, continuing without Jacobi validation");
        }

        let betti_numbers = engine.betti_numbers();
        info!(
            dimension = engine.dimension(),
            max_degree = engine.max_degree(),
            semisimple = engine.is_semisimple(),
            ?betti_numbers,
            "computed cohomology"
        );

        let spectral_analysis = match metric {
            Some(metric) => {
                let analyzer = SpectralAnalyzer::new(&engine, metric);
                SpectralSummary {
                    per_degree: analyzer.spectra(engine.max_degree()),
                }
            }
            None => SpectralSummary::default(),
        };

        let physics = self
            .config
            .physics
            .analyze_symmetries
            .then(|| PhysicsAnalyzer::from_betti(betti_numbers.clone()));

        Ok(AnalysisReport {
            algebra_info: AlgebraInfo {
                dimension: engine.dimension(),
                is_semisimple: engine.is_semisimple(),
                basis: algebra.basis,
            },
            cohomology: CohomologySummary {
                betti_numbers,
                d_squared_zero: violation.is_none(),
                wedge_dimensions: engine.wedge_dimensions(),
                max_degree: engine.max_degree(),
                policy: engine.policy(),
            },
            spectral_analysis,
            physics,
            metadata: RunMetadata {
                seed: self.config.seed,
                version: VERSION.to_string(),
            },
        })
    }

    /// Write `results.json` into the configured output directory
    ///
    /// The document is serialized before anything touches the disk.
    pub fn export(&self, report: &AnalysisReport) -> Result<PathBuf> {
        let output = &self.config.output;
        if output.format != "json" {
            return Err(SpectralLieError::UnsupportedFormat(format!(
                "output format '{}'",
                output.format
            )));
        }

        let body = report.to_json()?;
        std::fs::create_dir_all(&output.directory)?;
        let path = output.directory.join(RESULTS_FILE);
        std::fs::write(&path, body)?;

        info!(path = %path.display(), "exported results");
        Ok(path)
    }

    /// [`fit`](Self::fit) followed by [`export`](Self::export)
    pub fn run(&self) -> Result<(AnalysisReport, PathBuf)> {
        let report = self.fit()?;
        let path = self.export(&report)?;
        Ok((report, path))
    }
}
