//! czset Conversion Framework
//!
//! Rewrites quantum operations into single-qubit gates plus the controlled-Z
//! (`CZ`), optionally allowing its partial powers `CZ**t`.
//!
//! # Overview
//!
//! The core is [`ConvertToCzAndSingleGates`], which resolves each operation
//! in turn:
//!
//! ```text
//! operation
//!     │
//!     ├── legal (CZ, measurement)        ──► unchanged
//!     ├── known 1q matrix                ──► unchanged
//!     ├── known 2q matrix                ──► TwoQubitSynthesizer ──┐
//!     ├── one-level decomposition        ──► Decomposer ───────────┤
//!     │                                                            ▼
//!     │                                        convert every child, in order
//!     └── none of the above              ──► error, or unchanged with
//!                                            `ignore_failures`
//! ```
//!
//! Matrices and decompositions come from the [`UnitaryProvider`] and
//! [`Decomposer`] protocols; [`StandardProtocols`] and [`GivensSynthesizer`]
//! are the defaults.
//!
//! # Example: Converting a Circuit
//!
//! ```rust
//! use czset_compile::{ConversionConfig, PassManagerBuilder};
//! use czset_ir::{Circuit, Gate, QubitId};
//!
//! let mut circuit = Circuit::with_size("swap", 2, 0);
//! circuit.swap(QubitId(0), QubitId(1)).unwrap();
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_config(ConversionConfig::default())
//!     .build();
//! pm.run(&mut circuit, &mut props).unwrap();
//!
//! assert!(circuit
//!     .instructions()
//!     .iter()
//!     .all(|inst| inst.num_qubits() == 1
//!         || inst.as_gate().and_then(Gate::cz_exponent).is_some_and(|t| t.is_exactly(1.0))));
//! ```
//!
//! # Custom Passes
//!
//! ```rust
//! use czset_compile::{CompileResult, Pass, PassKind, PropertySet};
//! use czset_ir::Circuit;
//!
//! struct CountOnly;
//!
//! impl Pass for CountOnly {
//!     fn name(&self) -> &str { "count_only" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, circuit: &mut Circuit, props: &mut PropertySet) -> CompileResult<()> {
//!         props.insert(circuit.len());
//!         Ok(())
//!     }
//! }
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod manager;
pub mod optimizer;
pub mod pass;
pub mod property;
pub mod protocols;
pub mod synthesis;

// Built-in passes
pub mod passes;

pub use config::ConversionConfig;
pub use convert::{ConversionResult, ConvertToCzAndSingleGates, Synthesized};
pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use optimizer::{PointOptimizationSummary, PointOptimizer};
pub use pass::{Pass, PassKind};
pub use property::PropertySet;
pub use protocols::{Decomposer, StandardProtocols, UnitaryProvider};
pub use synthesis::{GivensSynthesizer, TwoQubitSynthesizer};
