//! Process-wide analysis factory

use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::debug;

use super::{Analysis, AnalysisError, ParticleCount, PtSpectrum};

/// Constructor of a fresh analysis instance
pub type AnalysisFactory = fn() -> Box<dyn Analysis>;

static GLOBAL: OnceLock<AnalysisRegistry> = OnceLock::new();

/// Name → factory table for analyses
///
/// Registries only grow: names can be added but never removed or replaced.
/// The process-wide registry is set up once, either explicitly through
/// [`install`](Self::install) at startup or lazily with the built-in
/// analyses on first use of [`global`](Self::global), and is read-only
/// afterwards.
#[derive(Clone, Default)]
pub struct AnalysisRegistry {
    factories: BTreeMap<String, AnalysisFactory>,
}

impl AnalysisRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the analyses shipped with this crate
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let builtins: [(&str, AnalysisFactory); 2] = [
            (ParticleCount::NAME, ParticleCount::factory),
            (PtSpectrum::NAME, PtSpectrum::factory),
        ];
        for (name, factory) in builtins {
            registry.factories.insert(name.to_string(), factory);
        }
        registry
    }

    /// Add a factory under `name`
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: AnalysisFactory,
    ) -> Result<(), AnalysisError> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(AnalysisError::DuplicateAnalysis { name });
        }
        debug!("Registered analysis '{}'", name);
        self.factories.insert(name, factory);
        Ok(())
    }

    /// New instance of the analysis registered as `name`
    pub fn create(&self, name: &str) -> Option<Box<dyn Analysis>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// True if `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered analyses
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Make `registry` the process-wide registry
    ///
    /// Must run before the first call to [`global`](Self::global); fails
    /// with [`AnalysisError::RegistryInitialized`] otherwise.
    pub fn install(registry: AnalysisRegistry) -> Result<(), AnalysisError> {
        GLOBAL
            .set(registry)
            .map_err(|_| AnalysisError::RegistryInitialized)
    }

    /// Process-wide registry, initialized with the built-ins if nothing was installed
    pub fn global() -> &'static AnalysisRegistry {
        GLOBAL.get_or_init(Self::with_builtins)
    }
}

impl std::fmt::Debug for AnalysisRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}
