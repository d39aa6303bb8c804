//! Verification that a circuit only uses `CZ` and single-qubit gates.

use tracing::{debug, warn};

use czset_ir::Circuit;

use crate::convert::is_legal_entangler_or_measurement;
use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Result of vocabulary verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether every instruction is in the vocabulary.
    pub passed: bool,
    /// Number of instructions checked.
    pub operations_checked: usize,
    /// Number of instructions outside the vocabulary.
    pub violations: usize,
    /// The first offending instruction, if any.
    pub first_violation: Option<String>,
}

/// Analysis pass that checks every instruction is a single-qubit gate with a
/// known matrix, a measurement, or a `CZ` allowed by the active
/// [`ConversionConfig`].
///
/// Writes a [`VerificationResult`] into the property set. Violations are an
/// error unless the conversion ignores failures, in which case they are only
/// counted, since unconvertible operations were passed through on purpose.
///
/// [`ConversionConfig`]: crate::config::ConversionConfig
#[derive(Debug, Clone, Copy, Default)]
pub struct VocabularyVerification;

impl Pass for VocabularyVerification {
    fn name(&self) -> &'static str {
        "vocabulary_verification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let config = properties.conversion;
        let mut result = VerificationResult {
            passed: true,
            operations_checked: circuit.len(),
            ..VerificationResult::default()
        };

        for inst in circuit.instructions() {
            let legal = (inst.num_qubits() == 1 && inst.unitary().is_some())
                || is_legal_entangler_or_measurement(inst, config.allow_partial_czs);
            if !legal {
                result.passed = false;
                result.violations += 1;
                result.first_violation.get_or_insert_with(|| inst.to_string());
            }
        }

        debug!(
            "Vocabulary verification: {} operations, {} violations",
            result.operations_checked, result.violations
        );

        let failure = match (&result.first_violation, config.ignore_failures) {
            (Some(first), false) => Some(CompileError::VerificationFailed {
                violations: result.violations,
                first: first.clone(),
            }),
            (Some(first), true) => {
                warn!("{} operation(s) left outside the target gate set, first: {first}", result.violations);
                None
            }
            (None, _) => None,
        };

        properties.insert(result);
        failure.map_or(Ok(()), Err)
    }
}
