//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use czset_ir::Circuit;

use crate::config::ConversionConfig;
use crate::convert::ConvertToCzAndSingleGates;
use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::VocabularyVerification;
use crate::property::PropertySet;

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit, properties), fields(circuit = circuit.name()))]
    pub fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), circuit.len());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!("Pass manager completed, ops: {}", circuit.len());
        Ok(())
    }

    /// Names of the passes, in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the standard conversion pipeline.
pub struct PassManagerBuilder {
    /// Shared properties, carrying the conversion configuration.
    properties: PropertySet,
    /// Append the vocabulary verification pass.
    verify: bool,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            properties: PropertySet::new(),
            verify: true,
        }
    }

    /// Set the conversion configuration.
    #[must_use]
    pub fn with_config(mut self, config: ConversionConfig) -> Self {
        self.properties.conversion = config;
        self
    }

    /// Enable or disable the final verification pass (enabled by default).
    #[must_use]
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();
        pm.add_pass(ConvertToCzAndSingleGates::new(self.properties.conversion));
        if self.verify {
            pm.add_pass(VocabularyVerification);
        }
        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use czset_ir::QubitId;

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_empty_manager_leaves_circuit() {
        let pm = PassManager::new();
        let mut props = PropertySet::new();

        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        pm.run(&mut circuit, &mut props).unwrap();
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn test_builder_pipeline() {
        let (pm, props) = PassManagerBuilder::new()
            .with_config(ConversionConfig::new().with_partial_czs(true))
            .build();
        assert_eq!(
            pm.pass_names(),
            vec!["convert_to_cz_and_single_gates", "vocabulary_verification"]
        );
        assert!(props.conversion.allow_partial_czs);

        let (pm, _) = PassManagerBuilder::new().with_verification(false).build();
        assert_eq!(pm.len(), 1);
    }
}
