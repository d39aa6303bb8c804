//! The converter as a transformation pass.

use tracing::debug;

use czset_ir::Circuit;

use crate::convert::ConvertToCzAndSingleGates;
use crate::error::CompileResult;
use crate::optimizer::PointOptimizer;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::protocols::{Decomposer, UnitaryProvider};
use crate::synthesis::TwoQubitSynthesizer;

/// Instruction counts around a conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Instructions before conversion.
    pub before: usize,
    /// Instructions after conversion.
    pub after: usize,
}

impl<U, D, S> Pass for ConvertToCzAndSingleGates<U, D, S>
where
    U: UnitaryProvider,
    D: Decomposer,
    S: TwoQubitSynthesizer,
{
    fn name(&self) -> &'static str {
        "convert_to_cz_and_single_gates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let before = circuit.len();
        self.optimize_circuit(circuit)?;
        let after = circuit.len();
        debug!("converted {before} instruction(s) into {after}");
        properties.insert(ConversionStats { before, after });
        Ok(())
    }
}
