//! Unitary matrices of operations.
//!
//! [`Unitary2x2`] is the fixed-size single-qubit matrix used for Euler
//! decompositions. [`UnitaryMatrix`] is the general `2^n x 2^n` matrix used
//! for operation effects, embedding into larger registers, and equivalence
//! checks.
//!
//! Basis states are indexed big-endian: for an operation on qubits
//! `[a, b]`, the basis index is `2 * bit(a) + bit(b)`.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{IrError, IrResult};

/// Tolerance for floating point comparisons.
pub const EPSILON: f64 = 1e-10;

/// Widest register a dense [`UnitaryMatrix`] is built for.
pub const MAX_DENSE_QUBITS: u32 = 10;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: `[[a, b], [c, d]]`.
    pub data: [Complex64; 4],
}

/// Euler angles of a single-qubit unitary.
///
/// `U = e^{i·phase} · Rz(alpha) · Ry(beta) · Rz(gamma)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZyzAngles {
    /// Angle of the last-applied Z rotation.
    pub alpha: f64,
    /// Y rotation angle, in `[0, π]`.
    pub beta: f64,
    /// Angle of the first-applied Z rotation.
    pub gamma: f64,
    /// Global phase.
    pub phase: f64,
}

impl Unitary2x2 {
    /// Create a new 2x2 matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Diagonal matrix `diag(d0, d1)`.
    pub fn diagonal(d0: Complex64, d1: Complex64) -> Self {
        Self::new(d0, ZERO, ZERO, d1)
    }

    /// The identity matrix.
    pub fn identity() -> Self {
        Self::diagonal(ONE, ONE)
    }

    /// Hadamard.
    pub fn h() -> Self {
        let s = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        Self::new(s, s, s, -s)
    }

    /// Pauli-X.
    pub fn x() -> Self {
        Self::new(ZERO, ONE, ONE, ZERO)
    }

    /// Pauli-Y.
    pub fn y() -> Self {
        Self::new(ZERO, Complex64::new(0.0, -1.0), Complex64::new(0.0, 1.0), ZERO)
    }

    /// Pauli-Z.
    pub fn z() -> Self {
        Self::diagonal(ONE, -ONE)
    }

    /// sqrt(X).
    pub fn sx() -> Self {
        let plus = Complex64::new(0.5, 0.5);
        let minus = Complex64::new(0.5, -0.5);
        Self::new(plus, minus, minus, plus)
    }

    /// Rotation about X.
    pub fn rx(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        let c = Complex64::new(c, 0.0);
        let mis = Complex64::new(0.0, -s);
        Self::new(c, mis, mis, c)
    }

    /// Rotation about Y.
    pub fn ry(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
    }

    /// Rotation about Z.
    pub fn rz(theta: f64) -> Self {
        Self::diagonal(
            Complex64::from_polar(1.0, -theta / 2.0),
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Phase gate `diag(1, e^{iλ})`.
    pub fn p(lambda: f64) -> Self {
        Self::diagonal(ONE, Complex64::from_polar(1.0, lambda))
    }

    /// Universal gate U(θ, φ, λ).
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self::new(
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
    }

    /// Matrix product `self * other`.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> Self {
        let [a, b, c, d] = self.data;
        Self::new(a.conj(), c.conj(), b.conj(), d.conj())
    }

    /// Entry-wise comparison within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.data
            .iter()
            .zip(&other.data)
            .all(|(a, b)| (a - b).norm() <= tol)
    }

    /// ZYZ Euler decomposition.
    pub fn zyz(&self) -> ZyzAngles {
        let [a, b, c, d] = self.data;

        let det = a * d - b * c;
        let phase = det.arg() / 2.0;

        // Remove the global phase to land in SU(2):
        // [[cos(β/2)·e^{-i(α+γ)/2}, -sin(β/2)·e^{-i(α-γ)/2}],
        //  [sin(β/2)·e^{ i(α-γ)/2},  cos(β/2)·e^{ i(α+γ)/2}]]
        let unphase = Complex64::from_polar(1.0, -phase);
        let a = a * unphase;
        let b = b * unphase;
        let c = c * unphase;

        let beta = 2.0 * c.norm().atan2(a.norm());

        if beta.abs() < EPSILON {
            let alpha_plus_gamma = -2.0 * a.arg();
            return ZyzAngles {
                alpha: alpha_plus_gamma,
                beta: 0.0,
                gamma: 0.0,
                phase,
            };
        }

        if (beta - PI).abs() < EPSILON {
            let alpha_minus_gamma = -2.0 * (-b).arg();
            return ZyzAngles {
                alpha: alpha_minus_gamma,
                beta: PI,
                gamma: 0.0,
                phase,
            };
        }

        let alpha_plus_gamma = -2.0 * a.arg();
        let alpha_minus_gamma = 2.0 * c.arg();
        ZyzAngles {
            alpha: (alpha_plus_gamma + alpha_minus_gamma) / 2.0,
            beta,
            gamma: (alpha_plus_gamma - alpha_minus_gamma) / 2.0,
            phase,
        }
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}

/// A `2^n x 2^n` complex matrix in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryMatrix {
    num_qubits: u32,
    data: Vec<Complex64>,
}

impl UnitaryMatrix {
    /// Wrap row-major entries for an `num_qubits`-qubit operation.
    ///
    /// Returns an error if the entry count is not `4^num_qubits` or
    /// `num_qubits` exceeds [`MAX_DENSE_QUBITS`].
    pub fn new(num_qubits: u32, data: Vec<Complex64>) -> IrResult<Self> {
        let dim = 1usize << num_qubits.min(MAX_DENSE_QUBITS);
        if num_qubits > MAX_DENSE_QUBITS || data.len() != dim * dim {
            return Err(IrError::MatrixShape {
                len: data.len(),
                num_qubits,
            });
        }
        Ok(Self { num_qubits, data })
    }

    /// The identity on `num_qubits` qubits.
    ///
    /// Callers keep `num_qubits` within [`MAX_DENSE_QUBITS`].
    pub fn identity(num_qubits: u32) -> Self {
        let dim = 1usize << num_qubits;
        Self::diagonal(num_qubits, vec![ONE; dim])
    }

    fn diagonal(num_qubits: u32, diag: Vec<Complex64>) -> Self {
        let dim = diag.len();
        let mut data = vec![ZERO; dim * dim];
        for (i, d) in diag.into_iter().enumerate() {
            data[i * dim + i] = d;
        }
        Self { num_qubits, data }
    }

    /// Permutation matrix mapping basis state `i` to `perm[i]`.
    fn permutation(num_qubits: u32, perm: &[usize]) -> Self {
        let dim = perm.len();
        let mut data = vec![ZERO; dim * dim];
        for (col, &row) in perm.iter().enumerate() {
            data[row * dim + col] = ONE;
        }
        Self { num_qubits, data }
    }

    /// Two-qubit diagonal matrix.
    pub fn diagonal_2q(d: [Complex64; 4]) -> Self {
        Self::diagonal(2, d.to_vec())
    }

    /// `|0⟩⟨0| ⊗ I + |1⟩⟨1| ⊗ v`, control on the first qubit.
    pub fn controlled(v: &Unitary2x2) -> Self {
        let mut m = Self::identity(2);
        m.data[2 * 4 + 2] = v.data[0];
        m.data[2 * 4 + 3] = v.data[1];
        m.data[3 * 4 + 2] = v.data[2];
        m.data[3 * 4 + 3] = v.data[3];
        m
    }

    /// SWAP.
    pub fn swap() -> Self {
        Self::permutation(2, &[0, 2, 1, 3])
    }

    /// iSWAP.
    pub fn iswap() -> Self {
        let mut m = Self::permutation(2, &[0, 2, 1, 3]);
        m.data[4 + 2] = Complex64::new(0.0, 1.0);
        m.data[2 * 4 + 1] = Complex64::new(0.0, 1.0);
        m
    }

    /// `exp(-iθ/2 · P⊗P)` for a Pauli product whose matrix is `pp`.
    pub fn pauli_rotation(theta: f64, pp: &UnitaryMatrix) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        let mut m = Self::identity(pp.num_qubits);
        for (entry, p) in m.data.iter_mut().zip(&pp.data) {
            *entry = *entry * c + p * Complex64::new(0.0, -s);
        }
        m
    }

    /// Toffoli on three qubits, targeting the last.
    pub fn ccx() -> Self {
        Self::permutation(3, &[0, 1, 2, 3, 4, 5, 7, 6])
    }

    /// Fredkin on three qubits, controlled by the first.
    pub fn cswap() -> Self {
        Self::permutation(3, &[0, 1, 2, 3, 4, 6, 5, 7])
    }

    /// Number of qubits the matrix acts on.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Row/column dimension.
    pub fn dim(&self) -> usize {
        1usize << self.num_qubits
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim() + col]
    }

    /// Row-major entries.
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Narrow to a [`Unitary2x2`] if this is a single-qubit matrix.
    pub fn as_2x2(&self) -> Option<Unitary2x2> {
        match self.data.as_slice() {
            [a, b, c, d] => Some(Unitary2x2::new(*a, *b, *c, *d)),
            _ => None,
        }
    }

    /// Matrix product `self * other`.
    ///
    /// # Panics
    ///
    /// Panics if the two matrices act on different qubit counts.
    pub fn matmul(&self, other: &Self) -> Self {
        assert_eq!(self.num_qubits, other.num_qubits, "matmul dimension mismatch");
        let dim = self.dim();
        let mut data = vec![ZERO; dim * dim];
        for r in 0..dim {
            for k in 0..dim {
                let lhs = self.data[r * dim + k];
                if lhs == ZERO {
                    continue;
                }
                for c in 0..dim {
                    data[r * dim + c] += lhs * other.data[k * dim + c];
                }
            }
        }
        Self {
            num_qubits: self.num_qubits,
            data,
        }
    }

    /// Conjugate transpose.
    #[must_use]
    pub fn dagger(&self) -> Self {
        let dim = self.dim();
        let mut data = vec![ZERO; dim * dim];
        for r in 0..dim {
            for c in 0..dim {
                data[c * dim + r] = self.data[r * dim + c].conj();
            }
        }
        Self {
            num_qubits: self.num_qubits,
            data,
        }
    }

    /// Whether `U†U` is the identity within `tol`.
    pub fn is_unitary(&self, tol: f64) -> bool {
        self.dagger()
            .matmul(self)
            .approx_eq(&Self::identity(self.num_qubits), tol)
    }

    /// Entry-wise comparison within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.num_qubits == other.num_qubits
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).norm() <= tol)
    }

    /// Whether `other = e^{iφ} · self` for some global phase `φ`.
    pub fn approx_eq_up_to_global_phase(&self, other: &Self, tol: f64) -> bool {
        if self.num_qubits != other.num_qubits {
            return false;
        }
        let Some((pivot, value)) = self
            .data
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
        else {
            return true;
        };
        if value.norm() <= tol {
            return other.data.iter().all(|v| v.norm() <= tol);
        }
        let phase = other.data[pivot] / value;
        if (phase.norm() - 1.0).abs() > tol {
            return false;
        }
        self.data
            .iter()
            .zip(&other.data)
            .all(|(a, b)| (a * phase - b).norm() <= tol)
    }

    /// Embed this matrix into a `total_qubits` register.
    ///
    /// `positions[i]` is the register position of this matrix's `i`-th
    /// qubit; position 0 is the most significant bit.
    pub fn embed(&self, positions: &[usize], total_qubits: u32) -> Self {
        let n = total_qubits as usize;
        let dim = 1usize << n;
        let bit = |idx: usize, pos: usize| (idx >> (n - 1 - pos)) & 1;
        let sub_index =
            |idx: usize| positions.iter().fold(0usize, |acc, &p| (acc << 1) | bit(idx, p));
        let mask = positions
            .iter()
            .fold(0usize, |m, &p| m | (1usize << (n - 1 - p)));

        let mut data = vec![ZERO; dim * dim];
        for r in 0..dim {
            for c in 0..dim {
                if (r & !mask) == (c & !mask) {
                    data[r * dim + c] = self.get(sub_index(r), sub_index(c));
                }
            }
        }
        Self {
            num_qubits: total_qubits,
            data,
        }
    }
}

impl From<Unitary2x2> for UnitaryMatrix {
    fn from(u: Unitary2x2) -> Self {
        Self {
            num_qubits: 1,
            data: u.data.to_vec(),
        }
    }
}
