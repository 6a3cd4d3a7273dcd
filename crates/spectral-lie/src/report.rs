//! Result document written to `results.json`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::betti::{BettiNumbers, BettiPolicy};
use crate::physics::PhysicsSummary;
use crate::spectral::Spectrum;

/// Full result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub algebra_info: AlgebraInfo,
    pub cohomology: CohomologySummary,
    pub spectral_analysis: SpectralSummary,
    /// Absent when `physics.analyze_symmetries` is off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physics: Option<PhysicsSummary>,
    pub metadata: RunMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgebraInfo {
    pub dimension: usize,
    pub is_semisimple: bool,
    pub basis: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohomologySummary {
    /// Corrected Betti numbers for degrees `0..=max_degree`
    pub betti_numbers: BettiNumbers,
    /// Whether d_{p+1} d_p vanished for every degree
    pub d_squared_zero: bool,
    /// C(n, p) for p in `0..=max_degree`
    pub wedge_dimensions: Vec<usize>,
    pub max_degree: usize,
    pub policy: BettiPolicy,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpectralSummary {
    /// Empty when eigenvalues were not requested
    pub per_degree: BTreeMap<usize, Spectrum>,
}

impl SpectralSummary {
    /// Harmonic dimension per degree
    pub fn harmonic_dimensions(&self) -> BTreeMap<usize, usize> {
        self.per_degree
            .iter()
            .map(|(&p, spectrum)| (p, spectrum.harmonic_dimension))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub seed: u64,
    pub version: String,
}

impl AnalysisReport {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
