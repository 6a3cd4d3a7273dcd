//! Structure-constant sources
//!
//! An [`AlgebraSource`] turns the `input` section of a configuration into a
//! [`LoadedAlgebra`]. Two sources ship with the crate:
//!
//! - [`JsonStructureSource`] (`structure_json`) reads named brackets from a
//!   JSON document
//! - [`CartanTypeSource`] (`cartan_type`) asks a [`ClassificationBackend`]
//!   and falls back to the JSON path when the backend cannot help

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use tracing::{info, warn};

use crate::cartan::{CartanType, ClassicalBackend, ClassificationBackend};
use crate::config::InputConfig;
use crate::error::{Result, SpectralLieError};
use crate::structure::StructureConstants;

/// Structure constants with basis labels
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAlgebra {
    /// Dense constants in basis order
    pub constants: StructureConstants,
    /// Basis element names, position i labels e_i
    pub basis: Vec<String>,
    /// Semisimplicity known from the source, if any
    pub semisimple_hint: Option<bool>,
}

impl LoadedAlgebra {
    /// Dimension of the algebra
    pub fn dimension(&self) -> usize {
        self.constants.dimension()
    }

    /// Basis name to position
    pub fn basis_index(&self) -> HashMap<String, usize> {
        self.basis
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect()
    }
}

/// Source of structure constants selected by `input.format`
pub trait AlgebraSource: Send + Sync {
    /// Registry key
    fn format(&self) -> &str;

    /// Whether the source can run without falling back
    fn available(&self) -> bool {
        true
    }

    /// Load the algebra described by the input section
    fn load(&self, input: &InputConfig) -> Result<LoadedAlgebra>;
}

/// JSON document: basis names and brackets of named pairs
///
/// ```json
/// {
///   "basis": ["H", "E", "F"],
///   "structure_constants": [
///     [["H", "E"], {"E": 2}],
///     [["E", "F"], {"H": 1}]
///   ]
/// }
/// ```
///
/// Each listed bracket `[a, b] = sum c_k e_k` also sets `[b, a] = -sum c_k e_k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureDocument {
    /// Basis names; the order fixes the index of each e_i
    pub basis: Vec<String>,
    /// `[[a, b], {c: coefficient, ...}]` entries, one per listed bracket
    pub structure_constants: Vec<((String, String), BTreeMap<String, f64>)>,
}

impl StructureDocument {
    /// Resolve names into dense constants
    pub fn into_algebra(self) -> Result<LoadedAlgebra> {
        let n = self.basis.len();
        let mut index = HashMap::with_capacity(n);
        for (i, name) in self.basis.iter().enumerate() {
            if index.insert(name.as_str(), i).is_some() {
                return Err(SpectralLieError::schema(format!(
                    "duplicate basis element '{name}'"
                )));
            }
        }

        let lookup = |name: &str| {
            index.get(name).copied().ok_or_else(|| {
                SpectralLieError::schema(format!("unknown basis element '{name}'"))
            })
        };

        let mut constants = StructureConstants::zeros(n);
        for ((a, b), coefficients) in &self.structure_constants {
            let i = lookup(a)?;
            let j = lookup(b)?;
            for (target, &c) in coefficients {
                let k = lookup(target)?;
                if !c.is_finite() {
                    return Err(SpectralLieError::schema(format!(
                        "coefficient of '{target}' in [{a}, {b}] is not finite"
                    )));
                }
                constants.add_bracket(i, j, k, c)?;
            }
        }

        Ok(LoadedAlgebra {
            constants,
            basis: self.basis,
            semisimple_hint: None,
        })
    }
}

/// `structure_json` source
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStructureSource;

impl JsonStructureSource {
    /// Value of `input.format` that selects this source
    pub const FORMAT: &'static str = "structure_json";

    /// Stateless; the path comes from each request's config
    pub fn new() -> Self {
        Self
    }

    /// Parse a document from a string
    ///
    /// Malformed JSON is a [`SpectralLieError::Json`]; well-formed JSON with
    /// the wrong shape is a [`SpectralLieError::Schema`].
    pub fn parse_str(content: &str) -> Result<LoadedAlgebra> {
        let document: StructureDocument =
            serde_json::from_str(content).map_err(|e| match e.classify() {
                Category::Data => SpectralLieError::schema(e.to_string()),
                _ => SpectralLieError::Json(e),
            })?;
        document.into_algebra()
    }

    /// Read and parse a document from disk
    pub fn load_path(path: impl AsRef<Path>) -> Result<LoadedAlgebra> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let algebra = Self::parse_str(&content)?;
        info!(
            path = %path.display(),
            dimension = algebra.dimension(),
            "loaded structure constants"
        );
        Ok(algebra)
    }
}

impl AlgebraSource for JsonStructureSource {
    fn format(&self) -> &str {
        Self::FORMAT
    }

    fn load(&self, input: &InputConfig) -> Result<LoadedAlgebra> {
        let path = input.path.as_ref().ok_or_else(|| {
            SpectralLieError::config("input.path is required for format 'structure_json'")
        })?;
        Self::load_path(path)
    }
}

/// `cartan_type` source backed by a classification backend
///
/// When the backend is unavailable or fails, a configured `input.path` is
/// loaded as JSON instead. Without a path the backend error is returned.
#[derive(Clone)]
pub struct CartanTypeSource {
    backend: Arc<dyn ClassificationBackend>,
}

impl CartanTypeSource {
    /// Value of `input.format` that selects this source
    pub const FORMAT: &'static str = "cartan_type";

    /// Source over the given backend
    pub fn new(backend: Arc<dyn ClassificationBackend>) -> Self {
        Self { backend }
    }

    /// Name of the backend in use
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn from_backend(&self, cartan_type: &str) -> Result<LoadedAlgebra> {
        if !self.backend.available() {
            return Err(SpectralLieError::BackendUnavailable {
                backend: self.backend.name().to_string(),
            });
        }
        let parsed: CartanType = cartan_type.parse()?;
        self.backend.structure_constants(&parsed)
    }
}

impl Default for CartanTypeSource {
    fn default() -> Self {
        Self::new(Arc::new(ClassicalBackend::new()))
    }
}

impl std::fmt::Debug for CartanTypeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartanTypeSource")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl AlgebraSource for CartanTypeSource {
    fn format(&self) -> &str {
        Self::FORMAT
    }

    fn available(&self) -> bool {
        self.backend.available()
    }

    fn load(&self, input: &InputConfig) -> Result<LoadedAlgebra> {
        let cartan_type = input.cartan_type_name().ok_or_else(|| {
            SpectralLieError::config("input.cartan_type is required for format 'cartan_type'")
        })?;

        match self.from_backend(cartan_type) {
            Ok(algebra) => Ok(algebra),
            Err(err) if err.is_backend_error() => match &input.path {
                Some(path) => {
                    warn!(
                        cartan_type,
                        backend = self.backend.name(),
                        error = %err,
                        path = %path.display(),
                        "classification backend failed, falling back to structure JSON"
                    );
                    JsonStructureSource::load_path(path)
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SL2: &str = r#"{
        "basis": ["H", "E", "F"],
        "structure_constants": [
            [["H", "E"], {"E": 2}],
            [["H", "F"], {"F": -2}],
            [["E", "F"], {"H": 1}]
        ]
    }"#;

    struct OfflineBackend;

    impl ClassificationBackend for OfflineBackend {
        fn name(&self) -> &str {
            "offline"
        }

        fn available(&self) -> bool {
            false
        }

        fn structure_constants(&self, _: &CartanType) -> Result<LoadedAlgebra> {
            unreachable!("unavailable backend is never asked")
        }
    }

    fn sl2_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SL2.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_sl2() {
        let algebra = JsonStructureSource::parse_str(SL2).unwrap();
        assert_eq!(algebra.dimension(), 3);
        assert_eq!(algebra.basis_index()["E"], 1);
        let c = &algebra.constants;
        assert_eq!(c.get(0, 1, 1), 2.0);
        assert_eq!(c.get(1, 0, 1), -2.0);
        assert_eq!(c.get(2, 1, 0), -1.0);
        assert!(c.is_antisymmetric(0.0));
        assert_eq!(algebra.semisimple_hint, None);
    }

    #[test]
    fn test_schema_errors() {
        let missing = r#"{"basis": ["X"]}"#;
        assert!(matches!(
            JsonStructureSource::parse_str(missing),
            Err(SpectralLieError::Schema(_))
        ));

        let unknown = r#"{"basis": ["X"], "structure_constants": [[["X", "Y"], {"X": 1}]]}"#;
        assert!(matches!(
            JsonStructureSource::parse_str(unknown),
            Err(SpectralLieError::Schema(_))
        ));

        let duplicate = r#"{"basis": ["X", "X"], "structure_constants": []}"#;
        assert!(matches!(
            JsonStructureSource::parse_str(duplicate),
            Err(SpectralLieError::Schema(_))
        ));

        assert!(matches!(
            JsonStructureSource::parse_str("{not json"),
            Err(SpectralLieError::Json(_))
        ));
    }

    #[test]
    fn test_format_names_match_input_constructors() {
        assert_eq!(InputConfig::structure_json("a.json").format, JsonStructureSource::FORMAT);
        assert_eq!(InputConfig::cartan_type("A1").format, CartanTypeSource::FORMAT);

        let doc: StructureDocument = serde_json::from_str(SL2).unwrap();
        assert_eq!(doc.basis, vec!["H", "E", "F"]);
        let ((a, b), coefficients) = &doc.structure_constants[0];
        assert_eq!((a.as_str(), b.as_str()), ("H", "E"));
        assert_eq!(coefficients["E"], 2.0);
    }

    #[test]
    fn test_json_source_needs_path() {
        let input = InputConfig {
            path: None,
            ..InputConfig::structure_json("unused")
        };
        assert!(matches!(
            JsonStructureSource::new().load(&input),
            Err(SpectralLieError::Config(_))
        ));
    }

    #[test]
    fn test_cartan_source_classical() {
        let source = CartanTypeSource::default();
        let algebra = source.load(&InputConfig::cartan_type("A1")).unwrap();
        assert_eq!(algebra.dimension(), 3);
        assert_eq!(algebra.semisimple_hint, Some(true));
    }

    #[test]
    fn test_cartan_source_requires_type() {
        let mut input = InputConfig::cartan_type("");
        assert!(matches!(
            CartanTypeSource::default().load(&input),
            Err(SpectralLieError::Config(_))
        ));
        input.cartan_type = Some("Q7".to_string());
        assert!(matches!(
            CartanTypeSource::default().load(&input),
            Err(SpectralLieError::Config(_))
        ));
    }

    #[test]
    fn test_unavailable_backend_without_path() {
        let source = CartanTypeSource::new(Arc::new(OfflineBackend));
        assert!(!source.available());
        let err = source.load(&InputConfig::cartan_type("A1")).unwrap_err();
        assert!(matches!(err, SpectralLieError::BackendUnavailable { .. }));
        assert!(err.to_string().contains("structure_json"));
    }

    #[test]
    fn test_unavailable_backend_falls_back_to_json() {
        let file = sl2_file();
        let mut input = InputConfig::cartan_type("A1");
        input.path = Some(file.path().to_path_buf());

        let source = CartanTypeSource::new(Arc::new(OfflineBackend));
        let algebra = source.load(&input).unwrap();
        assert_eq!(algebra.basis, vec!["H", "E", "F"]);
    }

    #[test]
    fn test_exceptional_type_falls_back_to_json() {
        let file = sl2_file();
        let mut input = InputConfig::cartan_type("E8");
        input.path = Some(file.path().to_path_buf());

        let algebra = CartanTypeSource::default().load(&input).unwrap();
        assert_eq!(algebra.dimension(), 3);

        input.path = None;
        let err = CartanTypeSource::default().load(&input).unwrap_err();
        assert!(matches!(err, SpectralLieError::BackendFailure { .. }));
    }
}
