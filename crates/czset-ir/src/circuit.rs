//! A flat, ordered circuit container.

use rustc_hash::FxHashSet;

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::Instruction;
use crate::parameter::ParameterExpression;
use crate::qubit::{ClbitId, QubitId};
use crate::unitary::{MAX_DENSE_QUBITS, UnitaryMatrix};

/// A quantum circuit: qubits plus an ordered list of instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit, in register order.
    qubits: Vec<QubitId>,
    /// Number of classical bits.
    num_clbits: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            num_clbits: 0,
            instructions: vec![],
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        circuit.num_clbits = num_clbits;
        circuit
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(u32::try_from(self.qubits.len()).unwrap_or(u32::MAX));
        self.qubits.push(id);
        id
    }

    /// Append an instruction after checking that its qubits and classical
    /// bits belong to the circuit.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.check_operands(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn check_operands(&self, instruction: &Instruction) -> IrResult<()> {
        let known: FxHashSet<QubitId> = self.qubits.iter().copied().collect();
        if let Some(&qubit) = instruction.qubits.iter().find(|q| !known.contains(q)) {
            return Err(IrError::QubitNotFound {
                qubit,
                gate_name: Some(instruction.name().to_string()),
            });
        }
        if let Some(clbit) = instruction.clbits.iter().find(|c| c.0 >= self.num_clbits) {
            return Err(IrError::IndexOutOfRange {
                index: clbit.0 as usize,
                len: self.num_clbits as usize,
            });
        }
        Ok(())
    }

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits)?)
    }

    // =========================================================================
    // Common gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::H, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::X, [qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::T, [qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rx(theta.into()), [qubit])
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rz(theta.into()), [qubit])
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, [control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::cz(), [q1, q2])
    }

    /// Apply `CZ**t`.
    pub fn cz_pow(
        &mut self,
        exponent: impl Into<ParameterExpression>,
        q1: QubitId,
        q2: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::CZPow(exponent.into()), [q1, q2])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Swap, [q1, q2])
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::ISwap, [q1, q2])
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CCX, [c1, c2, target])
    }

    /// Apply Fredkin gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CSwap, [control, t1, t2])
    }

    // =========================================================================
    // Non-unitary instructions
    // =========================================================================

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Reset a qubit.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::reset(qubit))
    }

    /// Barrier across the given qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits)?)
    }

    // =========================================================================
    // Accessors and rewriting
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qubits in register order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Replace part of the circuit.
    ///
    /// Removes the instructions in `[index, index + span)` that act on any of
    /// `clear_qubits`, then inserts `new_instructions` at `index`. Returns the
    /// index just past the inserted instructions. Nothing is modified when an
    /// error is returned.
    pub fn replace_at(
        &mut self,
        index: usize,
        span: usize,
        clear_qubits: &[QubitId],
        new_instructions: Vec<Instruction>,
    ) -> IrResult<usize> {
        if index > self.instructions.len() {
            return Err(IrError::IndexOutOfRange {
                index,
                len: self.instructions.len(),
            });
        }
        for inst in &new_instructions {
            self.check_operands(inst)?;
        }

        let end = index.saturating_add(span).min(self.instructions.len());
        let clear: FxHashSet<QubitId> = clear_qubits.iter().copied().collect();
        let kept: Vec<Instruction> = self
            .instructions
            .drain(index..end)
            .filter(|inst| !inst.qubits.iter().any(|q| clear.contains(q)))
            .collect();

        let inserted = new_instructions.len();
        let tail = self.instructions.split_off(index);
        self.instructions.extend(new_instructions);
        self.instructions.extend(kept);
        self.instructions.extend(tail);
        Ok(index + inserted)
    }

    /// The circuit's combined unitary over its qubits in register order, or
    /// `None` if any instruction has no matrix or the circuit is wider than
    /// [`MAX_DENSE_QUBITS`].
    pub fn unitary(&self) -> Option<UnitaryMatrix> {
        sequence_unitary(&self.instructions, &self.qubits)
    }

    // =========================================================================
    // Standard circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        circuit.measure(QubitId(0), ClbitId(0))?;
        circuit.measure(QubitId(1), ClbitId(1))?;
        Ok(circuit)
    }

    /// Create a GHZ state preparation on `n` qubits, without measurement.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size(format!("ghz_{n}"), n, 0);
        if n == 0 {
            return Ok(circuit);
        }
        circuit.h(QubitId(0))?;
        for i in 1..n {
            circuit.cx(QubitId(i - 1), QubitId(i))?;
        }
        Ok(circuit)
    }
}

/// Combined unitary of `instructions` applied in order, over `qubits`
/// (first qubit most significant).
///
/// Returns `None` if an instruction has no matrix or touches a qubit outside
/// `qubits`, or if there are more than [`MAX_DENSE_QUBITS`] qubits.
pub fn sequence_unitary(instructions: &[Instruction], qubits: &[QubitId]) -> Option<UnitaryMatrix> {
    let total = u32::try_from(qubits.len())
        .ok()
        .filter(|&n| n <= MAX_DENSE_QUBITS)?;
    let mut acc = UnitaryMatrix::identity(total);
    for inst in instructions {
        let positions = inst
            .qubits
            .iter()
            .map(|q| qubits.iter().position(|r| r == q))
            .collect::<Option<Vec<_>>>()?;
        let step = inst.unitary()?.embed(&positions, total);
        acc = step.matmul(&acc);
    }
    Some(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.instructions()[1].name(), "cx");
    }

    #[test]
    fn test_unknown_qubit_rejected() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        let err = circuit.cz(QubitId(0), QubitId(4)).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { qubit: QubitId(4), .. }));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_unknown_clbit_rejected() {
        let mut circuit = Circuit::with_size("test", 1, 1);
        assert!(circuit.measure(QubitId(0), ClbitId(1)).is_err());
        assert!(circuit.measure(QubitId(0), ClbitId(0)).is_ok());
    }

    #[test]
    fn test_replace_at_respects_clear_qubits() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.x(QubitId(2)).unwrap();
        circuit.t(QubitId(1)).unwrap();

        // Span of two instructions, but only q0 is cleared: the X on q2 stays.
        let next = circuit
            .replace_at(
                0,
                2,
                &[QubitId(0)],
                vec![
                    Instruction::single_qubit_gate(StandardGate::S, QubitId(0)),
                    Instruction::single_qubit_gate(StandardGate::S, QubitId(0)),
                ],
            )
            .unwrap();
        assert_eq!(next, 2);
        let names: Vec<_> = circuit.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, vec!["s", "s", "x", "t"]);
    }

    #[test]
    fn test_replace_at_validates_before_mutating() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        let err = circuit.replace_at(
            0,
            1,
            &[QubitId(0)],
            vec![Instruction::single_qubit_gate(StandardGate::X, QubitId(9))],
        );
        assert!(err.is_err());
        assert_eq!(circuit.instructions()[0].name(), "h");
    }

    #[test]
    fn test_bell_unitary_unavailable_with_measurement() {
        let bell = Circuit::bell().unwrap();
        assert!(bell.unitary().is_none());
    }

    #[test]
    fn test_ghz_unitary_maps_zero_state() {
        let ghz = Circuit::ghz(3).unwrap();
        let u = ghz.unitary().unwrap();
        let amp = std::f64::consts::FRAC_1_SQRT_2;
        assert!((u.get(0b000, 0).re - amp).abs() < 1e-12);
        assert!((u.get(0b111, 0).re - amp).abs() < 1e-12);
        assert!(u.get(0b010, 0).norm() < 1e-12);
    }

    #[test]
    fn test_wide_circuit_has_no_dense_unitary() {
        let mut circuit = Circuit::with_size("wide", 32, 0);
        circuit.h(QubitId(31)).unwrap();
        assert!(circuit.unitary().is_none());
        assert!(sequence_unitary(&[], &circuit.qubits()[..=MAX_DENSE_QUBITS as usize]).is_none());
    }
}
