//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::parameter::ParameterExpression;
use crate::unitary::{Unitary2x2, UnitaryMatrix};

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),
    /// Phase gate.
    P(ParameterExpression),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Power of the controlled-Z gate, `diag(1, 1, 1, e^{iπt})`.
    ///
    /// `CZPow(1)` is the canonical CZ.
    CZPow(ParameterExpression),
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Controlled rotation around X.
    CRx(ParameterExpression),
    /// Controlled rotation around Y.
    CRy(ParameterExpression),
    /// Controlled rotation around Z.
    CRz(ParameterExpression),
    /// Controlled phase gate.
    CP(ParameterExpression),
    /// XX rotation gate.
    RXX(ParameterExpression),
    /// YY rotation gate.
    RYY(ParameterExpression),
    /// ZZ rotation gate.
    RZZ(ParameterExpression),

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// The canonical controlled-Z gate.
    pub fn cz() -> Self {
        StandardGate::CZPow(ParameterExpression::constant(1.0))
    }

    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZPow(_) => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::RXX(_) => "rxx",
            StandardGate::RYY(_) => "ryy",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZPow(_)
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::CP(_)
            | StandardGate::RXX(_)
            | StandardGate::RYY(_)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Get parameters of this gate.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CZPow(p)
            | StandardGate::CRx(p)
            | StandardGate::CRy(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p)
            | StandardGate::RXX(p)
            | StandardGate::RYY(p)
            | StandardGate::RZZ(p) => vec![p],

            StandardGate::U(a, b, c) => vec![a, b, c],

            _ => vec![],
        }
    }

    /// Check if any parameter is symbolic.
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|p| p.is_symbolic())
    }

    /// The gate's matrix, or `None` while a parameter is unbound.
    pub fn matrix(&self) -> Option<UnitaryMatrix> {
        let one = Complex64::new(1.0, 0.0);
        let single = |u: Unitary2x2| Some(UnitaryMatrix::from(u));
        let angle = |p: &ParameterExpression| p.as_f64();

        match self {
            StandardGate::I => single(Unitary2x2::identity()),
            StandardGate::X => single(Unitary2x2::x()),
            StandardGate::Y => single(Unitary2x2::y()),
            StandardGate::Z => single(Unitary2x2::z()),
            StandardGate::H => single(Unitary2x2::h()),
            StandardGate::S => single(Unitary2x2::p(PI / 2.0)),
            StandardGate::Sdg => single(Unitary2x2::p(-PI / 2.0)),
            StandardGate::T => single(Unitary2x2::p(PI / 4.0)),
            StandardGate::Tdg => single(Unitary2x2::p(-PI / 4.0)),
            StandardGate::SX => single(Unitary2x2::sx()),
            StandardGate::SXdg => single(Unitary2x2::sx().dagger()),
            StandardGate::Rx(t) => single(Unitary2x2::rx(angle(t)?)),
            StandardGate::Ry(t) => single(Unitary2x2::ry(angle(t)?)),
            StandardGate::Rz(t) => single(Unitary2x2::rz(angle(t)?)),
            StandardGate::P(l) => single(Unitary2x2::p(angle(l)?)),
            StandardGate::U(t, p, l) => single(Unitary2x2::u(angle(t)?, angle(p)?, angle(l)?)),

            StandardGate::CX => Some(UnitaryMatrix::controlled(&Unitary2x2::x())),
            StandardGate::CY => Some(UnitaryMatrix::controlled(&Unitary2x2::y())),
            StandardGate::CZPow(t) => Some(UnitaryMatrix::diagonal_2q([
                one,
                one,
                one,
                Complex64::from_polar(1.0, PI * angle(t)?),
            ])),
            StandardGate::CH => Some(UnitaryMatrix::controlled(&Unitary2x2::h())),
            StandardGate::Swap => Some(UnitaryMatrix::swap()),
            StandardGate::ISwap => Some(UnitaryMatrix::iswap()),
            StandardGate::CRx(t) => Some(UnitaryMatrix::controlled(&Unitary2x2::rx(angle(t)?))),
            StandardGate::CRy(t) => Some(UnitaryMatrix::controlled(&Unitary2x2::ry(angle(t)?))),
            StandardGate::CRz(t) => Some(UnitaryMatrix::controlled(&Unitary2x2::rz(angle(t)?))),
            StandardGate::CP(l) => Some(UnitaryMatrix::controlled(&Unitary2x2::p(angle(l)?))),
            StandardGate::RXX(t) => Some(UnitaryMatrix::pauli_rotation(
                angle(t)?,
                &pauli_product(&Unitary2x2::x()),
            )),
            StandardGate::RYY(t) => Some(UnitaryMatrix::pauli_rotation(
                angle(t)?,
                &pauli_product(&Unitary2x2::y()),
            )),
            StandardGate::RZZ(t) => Some(UnitaryMatrix::pauli_rotation(
                angle(t)?,
                &pauli_product(&Unitary2x2::z()),
            )),

            StandardGate::CCX => Some(UnitaryMatrix::ccx()),
            StandardGate::CSwap => Some(UnitaryMatrix::cswap()),
        }
    }
}

/// `P ⊗ P` for a single-qubit Pauli `P`.
fn pauli_product(p: &Unitary2x2) -> UnitaryMatrix {
    let single = UnitaryMatrix::from(*p);
    single.embed(&[0], 2).matmul(&single.embed(&[1], 2))
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let StandardGate::CZPow(t) = self {
            return if t.is_exactly(1.0) {
                write!(f, "cz")
            } else {
                write!(f, "cz**{t}")
            };
        }
        write!(f, "{}", self.name())?;
        write_params(f, self.parameters().into_iter())
    }
}

fn write_params<'a>(
    f: &mut fmt::Formatter<'_>,
    params: impl ExactSizeIterator<Item = &'a ParameterExpression>,
) -> fmt::Result {
    if params.len() == 0 {
        return Ok(());
    }
    write!(f, "(")?;
    for (i, p) in params.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{p}")?;
    }
    write!(f, ")")
}

/// A user-defined gate.
///
/// A custom gate may carry a unitary matrix, a one-level definition, both,
/// or neither. The definition is a list of instructions over local qubit
/// ids `q0..q{n-1}`, which are remapped onto the qubits of each
/// application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Parameters of the gate.
    pub params: Vec<ParameterExpression>,
    /// Optional unitary matrix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<UnitaryMatrix>,
    /// Optional one-level definition over local qubits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<Vec<Instruction>>,
}

impl CustomGate {
    /// Create a new custom gate.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            params: vec![],
            matrix: None,
            definition: None,
        }
    }

    /// Add parameters to the gate.
    #[must_use]
    pub fn with_params(mut self, params: Vec<ParameterExpression>) -> Self {
        self.params = params;
        self
    }

    /// Attach a matrix.
    ///
    /// Returns an error if the matrix acts on a different number of qubits.
    pub fn with_matrix(mut self, matrix: UnitaryMatrix) -> IrResult<Self> {
        if matrix.num_qubits() != self.num_qubits {
            return Err(IrError::MatrixShape {
                len: matrix.data().len(),
                num_qubits: self.num_qubits,
            });
        }
        self.matrix = Some(matrix);
        Ok(self)
    }

    /// Attach a one-level definition.
    ///
    /// Returns an error if an instruction refers to a local qubit outside
    /// `q0..q{n-1}`.
    pub fn with_definition(mut self, definition: Vec<Instruction>) -> IrResult<Self> {
        for inst in &definition {
            if let Some(&qubit) = inst.qubits.iter().find(|q| q.0 >= self.num_qubits) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: Some(self.name.clone()),
                });
            }
        }
        self.definition = Some(definition);
        Ok(self)
    }

    /// Check if any parameter is symbolic.
    pub fn is_parameterized(&self) -> bool {
        self.params.iter().any(ParameterExpression::is_symbolic)
    }
}

/// A quantum gate, either standard or custom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A custom user-defined gate.
    Custom(CustomGate),
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Gate::Standard(g) => g.name(),
            Gate::Custom(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Standard(g) => g.num_qubits(),
            Gate::Custom(g) => g.num_qubits,
        }
    }

    /// Get the standard gate, if this is one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match self {
            Gate::Standard(g) => Some(g),
            Gate::Custom(_) => None,
        }
    }

    /// The CZ exponent, if this is a power of CZ.
    pub fn cz_exponent(&self) -> Option<&ParameterExpression> {
        match self {
            Gate::Standard(StandardGate::CZPow(t)) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Standard(g) => write!(f, "{g}"),
            Gate::Custom(g) => {
                write!(f, "{}", g.name)?;
                write_params(f, g.params.iter())
            }
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::Standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::Custom(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::cz().num_qubits(), 2);
        assert_eq!(StandardGate::CSwap.num_qubits(), 3);

        assert!(!StandardGate::H.is_parameterized());
        assert!(!StandardGate::Rx(ParameterExpression::constant(PI)).is_parameterized());
        assert!(StandardGate::CZPow(ParameterExpression::symbol("t")).is_parameterized());
    }

    #[test]
    fn test_display() {
        assert_eq!(StandardGate::cz().to_string(), "cz");
        assert_eq!(StandardGate::CZPow(0.5.into()).to_string(), "cz**0.5");
        assert_eq!(StandardGate::Rx(ParameterExpression::symbol("theta")).to_string(), "rx(theta)");
        assert_eq!(StandardGate::H.to_string(), "h");
    }

    #[test]
    fn test_symbolic_gate_has_no_matrix() {
        assert!(StandardGate::Rz(ParameterExpression::symbol("t")).matrix().is_none());
        assert!(StandardGate::CZPow(ParameterExpression::symbol("t")).matrix().is_none());
        assert!(StandardGate::Rz(0.3.into()).matrix().is_some());
    }

    #[test]
    fn test_all_bound_matrices_are_unitary() {
        let gates = [
            StandardGate::I,
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::H,
            StandardGate::S,
            StandardGate::Sdg,
            StandardGate::T,
            StandardGate::Tdg,
            StandardGate::SX,
            StandardGate::SXdg,
            StandardGate::Rx(0.3.into()),
            StandardGate::Ry(0.3.into()),
            StandardGate::Rz(0.3.into()),
            StandardGate::P(0.3.into()),
            StandardGate::U(0.1.into(), 0.2.into(), 0.3.into()),
            StandardGate::CX,
            StandardGate::CY,
            StandardGate::CZPow(0.25.into()),
            StandardGate::CH,
            StandardGate::Swap,
            StandardGate::ISwap,
            StandardGate::CRx(0.3.into()),
            StandardGate::CRy(0.3.into()),
            StandardGate::CRz(0.3.into()),
            StandardGate::CP(0.3.into()),
            StandardGate::RXX(0.3.into()),
            StandardGate::RYY(0.3.into()),
            StandardGate::RZZ(0.3.into()),
            StandardGate::CCX,
            StandardGate::CSwap,
        ];
        for gate in gates {
            let m = gate.matrix().unwrap();
            assert_eq!(m.num_qubits(), gate.num_qubits(), "{gate}");
            assert!(m.is_unitary(1e-12), "{gate} is not unitary");
        }
    }

    #[test]
    fn test_cz_power_matches_controlled_phase() {
        let cz_half = StandardGate::CZPow(0.5.into()).matrix().unwrap();
        let cp = StandardGate::CP((PI / 2.0).into()).matrix().unwrap();
        assert!(cz_half.approx_eq(&cp, 1e-12));
    }

    #[test]
    fn test_custom_gate_definition_checks_local_qubits() {
        use crate::qubit::QubitId;

        let bad = CustomGate::new("bad", 1).with_definition(vec![Instruction::two_qubit_gate(
            StandardGate::cz(),
            QubitId(0),
            QubitId(1),
        )]);
        assert!(matches!(bad, Err(IrError::QubitNotFound { .. })));
    }

    #[test]
    fn test_custom_gate_matrix_arity_checked() {
        let err = CustomGate::new("g", 2).with_matrix(UnitaryMatrix::identity(1));
        assert!(matches!(err, Err(IrError::MatrixShape { .. })));
    }
}
