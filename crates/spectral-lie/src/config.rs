//! Analysis configuration
//!
//! A configuration document has five required sections (`input`,
//! `cohomology`, `spectral`, `physics`, `output`) and an optional `seed`.
//! YAML (`.yaml`, `.yml`) and TOML (`.toml`) files are accepted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::betti::BettiPolicy;
use crate::engine::DEFAULT_D2_TOLERANCE;
use crate::error::{Result, SpectralLieError};
use crate::metric::BaseMetric;

/// Output formats the exporter understands
pub const SUPPORTED_OUTPUT_FORMATS: &[&str] = &["json"];

/// Top-level analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Where the structure constants come from
    pub input: InputConfig,
    /// Cohomology settings
    pub cohomology: CohomologyConfig,
    /// Spectral settings
    pub spectral: SpectralConfig,
    /// Structural summary settings
    pub physics: PhysicsConfig,
    /// Result export settings
    pub output: OutputConfig,
    /// Seed recorded in the report metadata
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Input section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Registered source name: `structure_json` or `cartan_type`
    pub format: String,
    /// Structure-constant JSON file (also the fallback for `cartan_type`)
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Cartan type such as `A1` or `D4`
    #[serde(default)]
    pub cartan_type: Option<String>,
    /// Abort when d^2 != 0
    #[serde(default = "default_true")]
    pub validate_jacobi: bool,
}

impl InputConfig {
    /// JSON input from a file
    pub fn structure_json(path: impl Into<PathBuf>) -> Self {
        Self {
            format: "structure_json".to_string(),
            path: Some(path.into()),
            cartan_type: None,
            validate_jacobi: true,
        }
    }

    /// Cartan-type input
    pub fn cartan_type(cartan_type: impl Into<String>) -> Self {
        Self {
            format: "cartan_type".to_string(),
            path: None,
            cartan_type: Some(cartan_type.into()),
            validate_jacobi: true,
        }
    }

    /// Cartan type, treating an empty string as absent
    pub fn cartan_type_name(&self) -> Option<&str> {
        self.cartan_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// How semisimplicity is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "SemisimpleRepr", into = "SemisimpleRepr")]
pub enum SemisimpleMode {
    /// Use the source's hint, else Killing-form non-degeneracy
    #[default]
    Auto,
    /// Caller-supplied flag
    Assume(bool),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum SemisimpleRepr {
    Flag(bool),
    Text(String),
}

impl TryFrom<SemisimpleRepr> for SemisimpleMode {
    type Error = String;

    fn try_from(repr: SemisimpleRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            SemisimpleRepr::Flag(flag) => Ok(Self::Assume(flag)),
            SemisimpleRepr::Text(text) => match text.as_str() {
                "auto" => Ok(Self::Auto),
                "true" => Ok(Self::Assume(true)),
                "false" => Ok(Self::Assume(false)),
                other => Err(format!(
                    "invalid semisimple mode '{other}' (expected auto, true or false)"
                )),
            },
        }
    }
}

impl From<SemisimpleMode> for SemisimpleRepr {
    fn from(mode: SemisimpleMode) -> Self {
        match mode {
            SemisimpleMode::Auto => Self::Text("auto".to_string()),
            SemisimpleMode::Assume(flag) => Self::Flag(flag),
        }
    }
}

impl fmt::Display for SemisimpleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Assume(flag) => write!(f, "{flag}"),
        }
    }
}

/// Cohomology section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohomologyConfig {
    /// Highest degree (clamped to the algebra dimension)
    #[serde(default = "default_max_degree")]
    pub max_degree: usize,
    /// Betti correction policy
    #[serde(default)]
    pub policy: BettiPolicy,
    /// Semisimplicity flag or detection
    #[serde(default)]
    pub semisimple: SemisimpleMode,
    /// Tolerance for the d^2 = 0 check
    #[serde(default = "default_d2_tolerance")]
    pub d2_tolerance: f64,
}

impl Default for CohomologyConfig {
    fn default() -> Self {
        Self {
            max_degree: default_max_degree(),
            policy: BettiPolicy::default(),
            semisimple: SemisimpleMode::default(),
            d2_tolerance: default_d2_tolerance(),
        }
    }
}

/// Spectral section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralConfig {
    /// Diagonalize the Hodge Laplacians
    #[serde(default = "default_true")]
    pub compute_eigenvalues: bool,
    /// Rows of an explicit base metric; identity when absent
    #[serde(default)]
    pub base_metric: Option<Vec<Vec<f64>>>,
}

impl SpectralConfig {
    /// Base metric described by this section
    pub fn base_metric(&self) -> Result<BaseMetric> {
        match &self.base_metric {
            Some(rows) => BaseMetric::from_rows(rows),
            None => Ok(BaseMetric::Identity),
        }
    }
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            compute_eigenvalues: true,
            base_metric: None,
        }
    }
}

/// Physics section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Include the structural summary
    #[serde(default = "default_true")]
    pub analyze_symmetries: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            analyze_symmetries: true,
        }
    }
}

/// Output section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving `results.json`
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
    /// Serialization format
    #[serde(default = "default_output_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            format: default_output_format(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_seed() -> u64 {
    42
}

fn default_max_degree() -> usize {
    5
}

fn default_d2_tolerance() -> f64 {
    DEFAULT_D2_TOLERANCE
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("results")
}

fn default_output_format() -> String {
    "json".to_string()
}

impl AnalysisConfig {
    /// Configuration with default sections around an input section
    pub fn new(input: InputConfig) -> Self {
        Self {
            input,
            cohomology: CohomologyConfig::default(),
            spectral: SpectralConfig::default(),
            physics: PhysicsConfig::default(),
            output: OutputConfig::default(),
            seed: default_seed(),
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| SpectralLieError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SpectralLieError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that need no algebra: formats, tolerances, metric shape
    pub fn validate(&self) -> Result<()> {
        if self.input.format.trim().is_empty() {
            return Err(SpectralLieError::config("input.format must not be empty"));
        }
        if !SUPPORTED_OUTPUT_FORMATS.contains(&self.output.format.as_str()) {
            return Err(SpectralLieError::UnsupportedFormat(format!(
                "output format '{}' (supported: {})",
                self.output.format,
                SUPPORTED_OUTPUT_FORMATS.join(", ")
            )));
        }
        if !(self.cohomology.d2_tolerance.is_finite() && self.cohomology.d2_tolerance >= 0.0) {
            return Err(SpectralLieError::config(
                "cohomology.d2_tolerance must be a non-negative number",
            ));
        }
        self.spectral.base_metric()?;
        Ok(())
    }
}

/// Load a configuration file, choosing the parser by extension
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let parse: fn(&str) -> Result<AnalysisConfig> = match extension.as_deref() {
        Some("yaml") | Some("yml") => AnalysisConfig::from_yaml_str,
        Some("toml") => AnalysisConfig::from_toml_str,
        _ => {
            return Err(SpectralLieError::UnsupportedFormat(format!(
                "configuration file '{}' (expected .yaml, .yml or .toml)",
                path.display()
            )))
        }
    };

    let content = std::fs::read_to_string(path)?;
    parse(&content)
}
