//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building operations and circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Measurement qubits and classical bits differ in length.
    #[error("Measurement on {qubits} qubits cannot write {clbits} classical bits")]
    MeasurementArity {
        /// Number of measured qubits.
        qubits: usize,
        /// Number of classical bits.
        clbits: usize,
    },

    /// Matrix has the wrong number of entries for the gate arity.
    #[error("Matrix with {len} entries does not fit a {num_qubits}-qubit gate")]
    MatrixShape {
        /// Number of entries supplied.
        len: usize,
        /// Arity of the gate.
        num_qubits: u32,
    },

    /// Index is outside the circuit's instruction list.
    #[error("Instruction index {index} out of range for circuit with {len} instructions")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of instructions in the circuit.
        len: usize,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
