//! czset Operation Intermediate Representation
//!
//! Core data structures for the CZ conversion stack: qubits, symbolic
//! parameters, gates, instructions, nested operation trees, dense unitary
//! matrices and a flat [`Circuit`] container.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`] for the built-in catalogue (including the
//!   `CZ**t` family) and [`CustomGate`] for user-defined operations with an
//!   optional matrix and an optional one-level definition
//! - **Parameters**: [`ParameterExpression`] for symbolic parameters
//! - **Instructions**: [`Instruction`], a gate or measurement bound to qubits
//! - **Trees**: [`OperationTree`], the output shape of decomposition and
//!   synthesis
//! - **Matrices**: [`UnitaryMatrix`] and [`Unitary2x2`], big-endian (the
//!   first qubit of an instruction is the most significant bit)
//!
//! # Example: Decomposing a CNOT
//!
//! ```rust
//! use czset_ir::{Instruction, QubitId, StandardGate};
//!
//! let cx = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1));
//! let tree = cx.decompose_once().unwrap();
//! let names: Vec<_> = tree.leaves().map(Instruction::name).collect();
//! assert_eq!(names, ["h", "cz", "h"]);
//! ```
//!
//! # Example: Circuit Unitary
//!
//! ```rust
//! use czset_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("pair", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cz(QubitId(0), QubitId(1)).unwrap();
//!
//! let u = circuit.unitary().unwrap();
//! assert!(u.is_unitary(1e-12));
//! ```

pub mod circuit;
mod decompose;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;
pub mod tree;
pub mod unitary;

pub use circuit::{Circuit, sequence_unitary};
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use parameter::{BinaryOp, ParameterExpression};
pub use qubit::{ClbitId, QubitId};
pub use tree::{Leaves, OperationTree};
pub use unitary::{EPSILON, MAX_DENSE_QUBITS, Unitary2x2, UnitaryMatrix, ZyzAngles};
