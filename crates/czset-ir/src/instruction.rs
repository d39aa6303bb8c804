//! Operations: gates, measurements and other instructions bound to qubits.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};
use crate::unitary::{EPSILON, UnitaryMatrix};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(Gate),
    /// Measurement of one or more qubits.
    Measure,
    /// Reset qubit to |0⟩.
    Reset,
    /// Barrier (synchronization point).
    Barrier,
}

/// An operation: an instruction kind applied to an ordered list of qubits.
///
/// Qubits are unique within an instruction and their order fixes the
/// row/column layout of the instruction's matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction writes (for measure).
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction, validating arity and qubit uniqueness.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        let gate = gate.into();
        let qubits: Vec<_> = qubits.into_iter().collect();
        let got = u32::try_from(qubits.len()).unwrap_or(u32::MAX);
        if got != gate.num_qubits() {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected: gate.num_qubits(),
                got,
            });
        }
        check_distinct(&qubits, Some(gate.name()))?;
        Ok(Self {
            kind: InstructionKind::Gate(gate),
            qubits,
            clbits: vec![],
        })
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        debug_assert_eq!(gate.num_qubits(), 1, "{} is not a single-qubit gate", gate.name());
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        debug_assert_eq!(gate.num_qubits(), 2, "{} is not a two-qubit gate", gate.name());
        debug_assert_ne!(q1, q2, "two-qubit gate on a single qubit");
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: vec![q1, q2],
            clbits: vec![],
        }
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a multi-qubit measurement instruction.
    ///
    /// Returns an error if the number of qubits and classical bits do not
    /// match, or if a qubit repeats.
    pub fn measure_many(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let clbits: Vec<_> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(IrError::MeasurementArity {
                qubits: qubits.len(),
                clbits: clbits.len(),
            });
        }
        check_distinct(&qubits, Some("measure"))?;
        Ok(Self {
            kind: InstructionKind::Measure,
            qubits,
            clbits,
        })
    }

    /// Create a reset instruction.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        check_distinct(&qubits, Some("barrier"))?;
        Ok(Self {
            kind: InstructionKind::Barrier,
            qubits,
            clbits: vec![],
        })
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
        }
    }

    /// Number of qubits the instruction acts on.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// The instruction's matrix, if it has a known unitary effect.
    ///
    /// Standard gates have a matrix once their parameters are bound; a custom
    /// gate has one if it carries a matrix that is actually unitary.
    /// Measurements, resets and barriers never do.
    pub fn unitary(&self) -> Option<UnitaryMatrix> {
        match self.as_gate()? {
            Gate::Standard(g) => g.matrix(),
            Gate::Custom(g) => g
                .matrix
                .as_ref()
                .filter(|m| m.is_unitary(EPSILON.sqrt()))
                .cloned(),
        }
    }

    /// Copy of this instruction with every qubit passed through `map`.
    #[must_use]
    pub fn map_qubits(&self, map: impl Fn(QubitId) -> QubitId) -> Self {
        Self {
            kind: self.kind.clone(),
            qubits: self.qubits.iter().copied().map(map).collect(),
            clbits: self.clbits.clone(),
        }
    }
}

fn check_distinct(qubits: &[QubitId], gate_name: Option<&str>) -> IrResult<()> {
    let mut seen = FxHashSet::default();
    for &qubit in qubits {
        if !seen.insert(qubit) {
            return Err(IrError::DuplicateQubit {
                qubit,
                gate_name: gate_name.map(str::to_string),
            });
        }
    }
    Ok(())
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            InstructionKind::Gate(g) => write!(f, "{g}")?,
            _ => write!(f, "{}", self.name())?,
        }
        for (i, q) in self.qubits.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{q}")?;
        }
        if !self.clbits.is_empty() {
            write!(f, " ->")?;
            for (i, c) in self.clbits.iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                write!(f, "{sep}{c}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::CustomGate;
    use num_complex::Complex64;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert!(inst.is_gate());
        assert_eq!(inst.num_qubits(), 1);
        assert_eq!(inst.name(), "h");
    }

    #[test]
    fn test_gate_arity_checked() {
        let err = Instruction::gate(StandardGate::cz(), [QubitId(0)]).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let err = Instruction::gate(StandardGate::CX, [QubitId(1), QubitId(1)]).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { qubit: QubitId(1), .. }));
    }

    #[test]
    fn test_measure_many() {
        let inst = Instruction::measure_many([QubitId(0), QubitId(2)], [ClbitId(0), ClbitId(1)])
            .unwrap();
        assert!(inst.is_measure());
        assert_eq!(inst.to_string(), "measure q0, q2 -> c0, c1");

        let err = Instruction::measure_many([QubitId(0)], [ClbitId(0), ClbitId(1)]).unwrap_err();
        assert!(matches!(err, IrError::MeasurementArity { qubits: 1, clbits: 2 }));
    }

    #[test]
    fn test_display() {
        let inst = Instruction::two_qubit_gate(StandardGate::CZPow(0.5.into()), QubitId(0), QubitId(1));
        assert_eq!(inst.to_string(), "cz**0.5 q0, q1");
        assert_eq!(Instruction::reset(QubitId(3)).to_string(), "reset q3");
    }

    #[test]
    fn test_unitary_of_non_gates_is_none() {
        assert!(Instruction::measure(QubitId(0), ClbitId(0)).unitary().is_none());
        assert!(Instruction::reset(QubitId(0)).unitary().is_none());
        assert!(Instruction::barrier([QubitId(0)]).unwrap().unitary().is_none());
    }

    #[test]
    fn test_custom_matrix_must_be_unitary() {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let projector = UnitaryMatrix::new(1, vec![one, zero, zero, zero]).unwrap();
        let gate = CustomGate::new("proj", 1).with_matrix(projector).unwrap();
        let inst = Instruction::gate(gate, [QubitId(0)]).unwrap();
        assert!(inst.unitary().is_none());
    }

    #[test]
    fn test_map_qubits() {
        let inst = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1));
        let mapped = inst.map_qubits(|q| QubitId(q.0 + 5));
        assert_eq!(mapped.qubits, vec![QubitId(5), QubitId(6)]);
        assert_eq!(mapped.kind, inst.kind);
    }
}
