//! Point optimizers: local rewrites applied at each instruction.

use tracing::trace;

use czset_ir::{Circuit, Instruction, QubitId};

use crate::error::CompileResult;

/// A local rewrite proposed at one circuit index.
#[derive(Debug, Clone, PartialEq)]
pub struct PointOptimizationSummary {
    /// Number of instructions, starting at the index, the rewrite covers.
    pub clear_span: usize,
    /// Qubits whose instructions inside the span are removed.
    pub clear_qubits: Vec<QubitId>,
    /// Instructions inserted at the index.
    pub new_operations: Vec<Instruction>,
}

/// A rewrite that looks at one instruction at a time.
pub trait PointOptimizer {
    /// Propose a rewrite of `op`, found at `index` in `circuit`, or `None`
    /// to leave it alone.
    fn optimization_at(
        &self,
        circuit: &Circuit,
        index: usize,
        op: &Instruction,
    ) -> CompileResult<Option<PointOptimizationSummary>>;

    /// Apply [`PointOptimizer::optimization_at`] across the circuit.
    ///
    /// Instructions are visited in order. A rewrite removes the instructions
    /// in `[index, index + clear_span)` that touch `clear_qubits`, inserts
    /// the new operations at `index` and resumes after them, so inserted
    /// operations are never revisited.
    ///
    /// # Errors
    ///
    /// Propagates the first error; the circuit is then left unmodified.
    fn optimize_circuit(&self, circuit: &mut Circuit) -> CompileResult<()> {
        let mut work = circuit.clone();
        let mut index = 0;
        while index < work.len() {
            let op = work.instructions()[index].clone();
            let Some(summary) = self.optimization_at(&work, index, &op)? else {
                index += 1;
                continue;
            };

            let len_before = work.len();
            let inserted = summary.new_operations.len();
            let next = work.replace_at(
                index,
                summary.clear_span,
                &summary.clear_qubits,
                summary.new_operations,
            )?;
            trace!("rewrote {op} at {index} into {inserted} operation(s)");

            // A rewrite that neither removed nor inserted anything must still
            // make progress.
            index = if next == index && work.len() == len_before {
                index + 1
            } else {
                next
            };
        }
        *circuit = work;
        Ok(())
    }
}
