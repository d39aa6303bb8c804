//! Collaborator protocols consulted by the converter.
//!
//! The converter never inspects gates directly for matrices or
//! decompositions. It asks a [`UnitaryProvider`] and a [`Decomposer`], so
//! callers can swap in their own gate knowledge.

use czset_ir::{Instruction, OperationTree, UnitaryMatrix};

/// Extracts the matrix of an operation with a known unitary effect.
pub trait UnitaryProvider: Send + Sync {
    /// The operation's matrix over its qubits in order, or `None` if it has
    /// no known unitary effect.
    fn try_unitary(&self, op: &Instruction) -> Option<UnitaryMatrix>;
}

/// Produces one-level structural decompositions.
pub trait Decomposer: Send + Sync {
    /// Decompose `op` one level, or `None` if it is not composite.
    ///
    /// Sub-operations in the returned tree may be composite themselves.
    fn decompose_once(&self, op: &Instruction) -> Option<OperationTree>;
}

/// Protocols backed by the IR's own gate catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardProtocols;

impl UnitaryProvider for StandardProtocols {
    fn try_unitary(&self, op: &Instruction) -> Option<UnitaryMatrix> {
        op.unitary()
    }
}

impl Decomposer for StandardProtocols {
    fn decompose_once(&self, op: &Instruction) -> Option<OperationTree> {
        op.decompose_once()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use czset_ir::{ClbitId, ParameterExpression, QubitId, StandardGate};

    #[test]
    fn test_standard_unitary() {
        let h = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert_eq!(StandardProtocols.try_unitary(&h).map(|m| m.num_qubits()), Some(1));

        let theta = ParameterExpression::symbol("theta");
        let rx = Instruction::single_qubit_gate(StandardGate::Rx(theta), QubitId(0));
        assert!(StandardProtocols.try_unitary(&rx).is_none());

        let m = Instruction::measure(QubitId(0), ClbitId(0));
        assert!(StandardProtocols.try_unitary(&m).is_none());
    }

    #[test]
    fn test_standard_decompose() {
        let cx = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1));
        assert_eq!(StandardProtocols.decompose_once(&cx).map(|t| t.num_leaves()), Some(3));
        let h = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert!(StandardProtocols.decompose_once(&h).is_none());
    }
}
