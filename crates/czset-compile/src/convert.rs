//! Conversion of operations to `CZ` and single-qubit gates.
//!
//! [`ConvertToCzAndSingleGates`] resolves one operation at a time:
//!
//! 1. **Classify**: a canonical `CZ` (any `CZ**t` when partial powers are
//!    allowed) or a measurement is already legal.
//! 2. **Synthesize**: a known single-qubit matrix is kept as is; a known
//!    two-qubit matrix is handed to the [`TwoQubitSynthesizer`].
//! 3. **Decompose**: otherwise the operation is decomposed one level and every
//!    sub-operation goes through the same steps.
//! 4. **Fail**: an operation that is none of the above is an error, or is
//!    passed through when `ignore_failures` is set.

use tracing::{debug, trace};

use czset_ir::{Circuit, Gate, Instruction, OperationTree};

use crate::config::ConversionConfig;
use crate::error::{CompileError, CompileResult};
use crate::optimizer::{PointOptimizationSummary, PointOptimizer};
use crate::protocols::{Decomposer, StandardProtocols, UnitaryProvider};
use crate::synthesis::{GivensSynthesizer, TwoQubitSynthesizer};

/// Outcome of converting one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    /// The operation is its own result.
    Unchanged,
    /// The operation is replaced by these operations, in order.
    Rewritten(Vec<Instruction>),
}

impl ConversionResult {
    /// Check if the operation was left as is.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, ConversionResult::Unchanged)
    }

    /// The resulting operations, with `Unchanged` resolved to `original`.
    pub fn into_operations(self, original: &Instruction) -> Vec<Instruction> {
        match self {
            ConversionResult::Unchanged => vec![original.clone()],
            ConversionResult::Rewritten(ops) => ops,
        }
    }
}

/// Outcome of the synthesis step.
#[derive(Debug, Clone, PartialEq)]
pub enum Synthesized {
    /// A single-qubit operation with a matrix, already legal.
    Unchanged,
    /// A replacement tree, still to be flattened.
    Tree(OperationTree),
}

/// Whether `op` is a legal `CZ` power or a measurement.
pub(crate) fn is_legal_entangler_or_measurement(op: &Instruction, allow_partial_czs: bool) -> bool {
    if let Some(exponent) = op.as_gate().and_then(Gate::cz_exponent) {
        return allow_partial_czs || exponent.is_exactly(1.0);
    }
    op.is_measure()
}

/// Rewrites operations into single-qubit gates and `CZ`.
///
/// Generic over its collaborators; [`ConvertToCzAndSingleGates::new`] wires
/// in the IR's own protocols and the [`GivensSynthesizer`].
///
/// ```
/// use czset_compile::{ConversionConfig, ConvertToCzAndSingleGates};
/// use czset_ir::{Gate, Instruction, QubitId, StandardGate};
///
/// let converter = ConvertToCzAndSingleGates::new(ConversionConfig::default());
/// let cx = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1));
/// let ops = converter.convert(&cx).unwrap().into_operations(&cx);
/// assert!(ops.iter().all(|op| {
///     let canonical_cz = op.as_gate().and_then(Gate::cz_exponent).is_some_and(|t| t.is_exactly(1.0));
///     op.num_qubits() == 1 || canonical_cz
/// }));
/// ```
#[derive(Debug, Clone)]
pub struct ConvertToCzAndSingleGates<U = StandardProtocols, D = StandardProtocols, S = GivensSynthesizer>
{
    config: ConversionConfig,
    unitaries: U,
    decomposer: D,
    synthesizer: S,
}

impl ConvertToCzAndSingleGates {
    /// Create a converter backed by the default collaborators.
    pub fn new(config: ConversionConfig) -> Self {
        Self::with_collaborators(config, StandardProtocols, StandardProtocols, GivensSynthesizer)
    }
}

impl Default for ConvertToCzAndSingleGates {
    fn default() -> Self {
        Self::new(ConversionConfig::default())
    }
}

impl<U, D, S> ConvertToCzAndSingleGates<U, D, S>
where
    U: UnitaryProvider,
    D: Decomposer,
    S: TwoQubitSynthesizer,
{
    /// Create a converter with explicit collaborators.
    pub fn with_collaborators(
        config: ConversionConfig,
        unitaries: U,
        decomposer: D,
        synthesizer: S,
    ) -> Self {
        Self {
            config,
            unitaries,
            decomposer,
            synthesizer,
        }
    }

    /// The configuration fixed at construction.
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Check whether `op` is already in the target vocabulary.
    ///
    /// Only `CZ` powers and measurements qualify here; single-qubit gates are
    /// recognized by the synthesis step through their matrix.
    pub fn is_legal(&self, op: &Instruction) -> bool {
        is_legal_entangler_or_measurement(op, self.config.allow_partial_czs)
    }

    /// Try to replace `op` using its matrix.
    ///
    /// Two-qubit synthesis always targets the canonical `CZ`, whatever
    /// `allow_partial_czs` says.
    pub fn try_synthesize(&self, op: &Instruction) -> Option<Synthesized> {
        let matrix = self.unitaries.try_unitary(op)?;
        match (matrix.num_qubits(), op.qubits.as_slice()) {
            (1, [_]) => Some(Synthesized::Unchanged),
            (2, &[a, b]) => Some(Synthesized::Tree(
                self.synthesizer.synthesize(a, b, &matrix, false),
            )),
            _ => None,
        }
    }

    /// Convert `op` into legal operations.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnconvertibleOperation`] if `op`, or any
    /// operation it decomposes into, is neither legal, synthesizable nor
    /// decomposable, unless the converter ignores failures.
    pub fn convert(&self, op: &Instruction) -> CompileResult<ConversionResult> {
        if self.is_legal(op) {
            trace!("{op} is legal");
            return Ok(ConversionResult::Unchanged);
        }

        let tree = match self.try_synthesize(op) {
            Some(Synthesized::Unchanged) => return Ok(ConversionResult::Unchanged),
            Some(Synthesized::Tree(tree)) => {
                debug!("synthesized {op} from its matrix");
                Some(tree)
            }
            None => self.decomposer.decompose_once(op),
        };

        match tree {
            Some(tree) => {
                let mut out = Vec::new();
                self.flatten_into(&tree, &mut out)?;
                Ok(ConversionResult::Rewritten(out))
            }
            None if self.config.ignore_failures => Ok(ConversionResult::Unchanged),
            None => Err(CompileError::UnconvertibleOperation {
                operation: op.to_string(),
            }),
        }
    }

    /// Convert each child of `tree`, one level at a time, appending the
    /// results to `out`.
    fn flatten_into(&self, tree: &OperationTree, out: &mut Vec<Instruction>) -> CompileResult<()> {
        for child in tree.children() {
            match child {
                OperationTree::Leaf(op) => match self.convert(op)? {
                    ConversionResult::Unchanged => out.push(op.clone()),
                    ConversionResult::Rewritten(ops) => out.extend(ops),
                },
                OperationTree::Node(_) => self.flatten_into(child, out)?,
            }
        }
        Ok(())
    }
}

impl<U, D, S> PointOptimizer for ConvertToCzAndSingleGates<U, D, S>
where
    U: UnitaryProvider,
    D: Decomposer,
    S: TwoQubitSynthesizer,
{
    fn optimization_at(
        &self,
        _circuit: &Circuit,
        _index: usize,
        op: &Instruction,
    ) -> CompileResult<Option<PointOptimizationSummary>> {
        Ok(match self.convert(op)? {
            ConversionResult::Unchanged => None,
            ConversionResult::Rewritten(new_operations) => Some(PointOptimizationSummary {
                clear_span: 1,
                clear_qubits: op.qubits.clone(),
                new_operations,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use czset_ir::{ClbitId, CustomGate, ParameterExpression, QubitId, StandardGate};

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    fn strict() -> ConvertToCzAndSingleGates {
        ConvertToCzAndSingleGates::default()
    }

    fn partial() -> ConvertToCzAndSingleGates {
        ConvertToCzAndSingleGates::new(ConversionConfig::new().with_partial_czs(true))
    }

    #[test]
    fn test_canonical_cz_unchanged() {
        let cz = Instruction::two_qubit_gate(StandardGate::cz(), q(0), q(1));
        assert!(strict().convert(&cz).unwrap().is_unchanged());
        assert!(partial().convert(&cz).unwrap().is_unchanged());
    }

    #[test]
    fn test_partial_cz_depends_on_config() {
        let op = Instruction::two_qubit_gate(StandardGate::CZPow(0.5.into()), q(0), q(1));
        assert!(partial().is_legal(&op));
        assert!(partial().convert(&op).unwrap().is_unchanged());

        assert!(!strict().is_legal(&op));
        let ConversionResult::Rewritten(ops) = strict().convert(&op).unwrap() else {
            panic!("partial CZ must be rewritten");
        };
        assert!(ops.iter().all(|o| {
            o.num_qubits() == 1
                || o.as_gate().and_then(Gate::cz_exponent).is_some_and(|t| t.is_exactly(1.0))
        }));
    }

    #[test]
    fn test_symbolic_cz_power_not_canonical() {
        let op = Instruction::two_qubit_gate(
            StandardGate::CZPow(ParameterExpression::symbol("t")),
            q(0),
            q(1),
        );
        assert!(!strict().is_legal(&op));
        assert!(partial().is_legal(&op));
    }

    #[test]
    fn test_measurements_unchanged() {
        let m = Instruction::measure_many([q(0), q(1), q(2)], [ClbitId(0), ClbitId(1), ClbitId(2)])
            .unwrap();
        assert!(strict().is_legal(&m));
        assert!(strict().convert(&m).unwrap().is_unchanged());
    }

    #[test]
    fn test_single_qubit_matrix_unchanged() {
        let op = Instruction::single_qubit_gate(StandardGate::Rx(0.3.into()), q(4));
        assert!(!strict().is_legal(&op));
        assert_eq!(strict().try_synthesize(&op), Some(Synthesized::Unchanged));
        assert!(strict().convert(&op).unwrap().is_unchanged());
    }

    #[test]
    fn test_three_qubit_matrix_falls_through() {
        let op = Instruction::gate(StandardGate::CCX, [q(0), q(1), q(2)]).unwrap();
        assert!(strict().try_synthesize(&op).is_none());
        let ConversionResult::Rewritten(ops) = strict().convert(&op).unwrap() else {
            panic!("toffoli must be rewritten");
        };
        assert!(ops.iter().all(|o| o.num_qubits() <= 2));
    }

    #[test]
    fn test_unconvertible_fails_or_passes_through() {
        let opaque = Instruction::gate(CustomGate::new("oracle", 3), [q(0), q(1), q(2)]).unwrap();

        let err = strict().convert(&opaque).unwrap_err();
        assert!(matches!(err, CompileError::UnconvertibleOperation { .. }));
        assert!(err.to_string().contains("oracle"));

        let lenient = ConvertToCzAndSingleGates::new(ConversionConfig::new().with_ignore_failures(true));
        assert!(lenient.convert(&opaque).unwrap().is_unchanged());
    }

    #[test]
    fn test_nested_failure_aborts_without_partial_output() {
        let opaque = CustomGate::new("opaque", 1);
        let composite = CustomGate::new("composite", 2)
            .with_definition(vec![
                Instruction::two_qubit_gate(StandardGate::CX, q(0), q(1)),
                Instruction::gate(opaque, [q(1)]).unwrap(),
            ])
            .unwrap();
        let op = Instruction::gate(composite, [q(0), q(1)]).unwrap();

        assert!(strict().convert(&op).is_err());

        let lenient = ConvertToCzAndSingleGates::new(ConversionConfig::new().with_ignore_failures(true));
        let ops = lenient.convert(&op).unwrap().into_operations(&op);
        assert_eq!(ops.last().map(Instruction::name), Some("opaque"));
    }

    #[test]
    fn test_point_summary() {
        let circuit = Circuit::with_size("c", 2, 0);
        let cx = Instruction::two_qubit_gate(StandardGate::CX, q(1), q(0));
        let summary = strict().optimization_at(&circuit, 0, &cx).unwrap().unwrap();
        assert_eq!(summary.clear_span, 1);
        assert_eq!(summary.clear_qubits, vec![q(1), q(0)]);
        assert!(!summary.new_operations.is_empty());

        let h = Instruction::single_qubit_gate(StandardGate::H, q(0));
        assert!(strict().optimization_at(&circuit, 0, &h).unwrap().is_none());
    }
}
