//! Error types for the compilation crate.

use thiserror::Error;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] czset_ir::IrError),

    /// The operation is not legal, has no matrix usable by the synthesizer
    /// and has no decomposition.
    #[error(
        "Don't know how to work with {operation}. It isn't composite or an operation \
         with a known unitary effect on 1 or 2 qubits."
    )]
    UnconvertibleOperation {
        /// Display form of the offending operation.
        operation: String,
    },

    /// Operations outside the CZ + single-qubit vocabulary remain.
    #[error("Verification failed: {violations} operation(s) outside the target gate set, first: {first}")]
    VerificationFailed {
        /// Number of offending operations.
        violations: usize,
        /// Display form of the first offending operation.
        first: String,
    },
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
