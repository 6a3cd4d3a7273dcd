//! Registry of structure-constant sources keyed by `input.format`

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::cartan::ClassificationBackend;
use crate::error::{Result, SpectralLieError};
use crate::source::{AlgebraSource, CartanTypeSource, JsonStructureSource};

/// Sources by format name
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, Arc<dyn AlgebraSource>>,
}

impl SourceRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `structure_json` and a classical `cartan_type` source
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(Arc::new(JsonStructureSource::new()));
        registry.insert(Arc::new(CartanTypeSource::default()));
        registry
    }

    /// Default registry with a custom classification backend
    pub fn with_backend(backend: Arc<dyn ClassificationBackend>) -> Self {
        let mut registry = Self::new();
        registry.insert(Arc::new(JsonStructureSource::new()));
        registry.insert(Arc::new(CartanTypeSource::new(backend)));
        registry
    }

    fn insert(&mut self, source: Arc<dyn AlgebraSource>) {
        self.sources.insert(source.format().to_string(), source);
    }

    /// Add a source; a second source under the same name is rejected
    pub fn register(&mut self, source: Arc<dyn AlgebraSource>) -> Result<()> {
        let format = source.format().to_string();
        if self.sources.contains_key(&format) {
            return Err(SpectralLieError::DuplicateComponent(format!(
                "source '{format}'"
            )));
        }
        self.sources.insert(format, source);
        Ok(())
    }

    /// Source registered under `format`
    pub fn get(&self, format: &str) -> Result<Arc<dyn AlgebraSource>> {
        self.sources.get(format).cloned().ok_or_else(|| {
            SpectralLieError::UnsupportedFormat(format!(
                "input format '{format}' (registered: {})",
                self.formats().join(", ")
            ))
        })
    }

    /// Registered format names, sorted
    pub fn formats(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    /// Format names with their availability
    pub fn availability(&self) -> Vec<(&str, bool)> {
        self.sources
            .iter()
            .map(|(name, source)| (name.as_str(), source.available()))
            .collect()
    }
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_formats() {
        let registry = SourceRegistry::with_defaults();
        assert_eq!(registry.formats(), vec!["cartan_type", "structure_json"]);
        assert!(registry.get("structure_json").is_ok());
        assert!(registry
            .availability()
            .iter()
            .all(|(_, available)| *available));
    }

    #[test]
    fn test_unknown_format() {
        let registry = SourceRegistry::with_defaults();
        let err = registry.get("hdf5").err().unwrap();
        assert!(matches!(err, SpectralLieError::UnsupportedFormat(_)));
        assert!(err.to_string().contains("structure_json"));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = SourceRegistry::with_defaults();
        let err = registry
            .register(Arc::new(JsonStructureSource::new()))
            .unwrap_err();
        assert!(matches!(err, SpectralLieError::DuplicateComponent(_)));

        let mut empty = SourceRegistry::new();
        assert!(empty.register(Arc::new(JsonStructureSource::new())).is_ok());
        assert_eq!(empty.formats(), vec!["structure_json"]);
    }
}
