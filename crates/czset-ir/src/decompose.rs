//! One-level structural decompositions.
//!
//! [`Instruction::decompose_once`] rewrites an instruction into an
//! [`OperationTree`] of simpler instructions without consulting any matrix.
//! Sub-instructions may themselves decompose further; this module never
//! recurses.

use crate::gate::{Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::ParameterExpression;
use crate::qubit::QubitId;
use crate::tree::OperationTree;

impl Instruction {
    /// Decompose one level, or `None` if the instruction has no structural
    /// decomposition.
    pub fn decompose_once(&self) -> Option<OperationTree> {
        match self.as_gate()? {
            Gate::Standard(gate) => decompose_standard(gate, &self.qubits),
            Gate::Custom(gate) => {
                let definition = gate.definition.as_ref()?;
                let remap = |q: QubitId| self.qubits.get(q.0 as usize).copied().unwrap_or(q);
                Some(
                    definition
                        .iter()
                        .map(|inst| OperationTree::Leaf(inst.map_qubits(remap)))
                        .collect(),
                )
            }
        }
    }
}

fn half(theta: &ParameterExpression) -> ParameterExpression {
    (theta.clone() / ParameterExpression::constant(2.0)).simplify()
}

fn one(gate: StandardGate, q: QubitId) -> OperationTree {
    Instruction::single_qubit_gate(gate, q).into()
}

fn two(gate: StandardGate, a: QubitId, b: QubitId) -> OperationTree {
    Instruction::two_qubit_gate(gate, a, b).into()
}

fn three(gate: StandardGate, a: QubitId, b: QubitId, c: QubitId) -> OperationTree {
    OperationTree::Leaf(Instruction {
        kind: InstructionKind::Gate(gate.into()),
        qubits: vec![a, b, c],
        clbits: vec![],
    })
}

fn decompose_standard(gate: &StandardGate, qubits: &[QubitId]) -> Option<OperationTree> {
    Some(match (gate, qubits) {
        // CX = H · CZ · H (on target)
        (StandardGate::CX, &[c, t]) => OperationTree::node([
            one(StandardGate::H, t),
            two(StandardGate::cz(), c, t),
            one(StandardGate::H, t),
        ]),

        // CY = S · CX · S† (on target)
        (StandardGate::CY, &[c, t]) => OperationTree::node([
            one(StandardGate::Sdg, t),
            two(StandardGate::CX, c, t),
            one(StandardGate::S, t),
        ]),

        (StandardGate::Swap, &[a, b]) => OperationTree::node([
            two(StandardGate::CX, a, b),
            two(StandardGate::CX, b, a),
            two(StandardGate::CX, a, b),
        ]),

        // CP(λ) = CZ^(λ/π)
        (StandardGate::CP(lambda), &[c, t]) => {
            let exponent = (lambda.clone() / ParameterExpression::pi()).simplify();
            OperationTree::node([two(StandardGate::CZPow(exponent), c, t)])
        }

        (StandardGate::CRz(theta), &[c, t]) => OperationTree::node([
            one(StandardGate::Rz(half(theta)), t),
            two(StandardGate::CX, c, t),
            one(StandardGate::Rz(-half(theta)), t),
            two(StandardGate::CX, c, t),
        ]),

        (StandardGate::RZZ(theta), &[a, b]) => OperationTree::node([
            two(StandardGate::CX, a, b),
            one(StandardGate::Rz(theta.clone()), b),
            two(StandardGate::CX, a, b),
        ]),

        (StandardGate::CCX, &[a, b, c]) => OperationTree::node([
            one(StandardGate::H, c),
            two(StandardGate::CX, b, c),
            one(StandardGate::Tdg, c),
            two(StandardGate::CX, a, c),
            one(StandardGate::T, c),
            two(StandardGate::CX, b, c),
            one(StandardGate::Tdg, c),
            two(StandardGate::CX, a, c),
            one(StandardGate::T, b),
            one(StandardGate::T, c),
            one(StandardGate::H, c),
            two(StandardGate::CX, a, b),
            one(StandardGate::T, a),
            one(StandardGate::Tdg, b),
            two(StandardGate::CX, a, b),
        ]),

        // Fredkin as CX · Toffoli · CX; the Toffoli stays composite.
        (StandardGate::CSwap, &[a, b, c]) => OperationTree::node([
            two(StandardGate::CX, c, b),
            three(StandardGate::CCX, a, b, c),
            two(StandardGate::CX, c, b),
        ]),

        _ => return None,
    })
}
