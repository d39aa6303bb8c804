//! Two-qubit unitary synthesis into CZ and single-qubit gates.
//!
//! [`GivensSynthesizer`] reduces a 4x4 unitary to a diagonal by Givens
//! rotations between basis states that differ in one qubit. Each rotation is a
//! controlled single-qubit gate, so the unitary becomes a short sequence of
//! (possibly 0-controlled) controlled gates, and each of those becomes
//! single-qubit rotations around two `CZ`s.
//!
//! The result is exact, not CZ-count optimal.

use std::f64::consts::PI;

use num_complex::Complex64;
use tracing::trace;

use czset_ir::{
    Instruction, OperationTree, QubitId, StandardGate, Unitary2x2, UnitaryMatrix, ZyzAngles,
};

/// Angle and amplitude threshold below which a step is treated as trivial.
const TOL: f64 = 1e-9;

/// Synthesizes a two-qubit unitary into legal gates.
pub trait TwoQubitSynthesizer: Send + Sync {
    /// Synthesize `matrix`, expressed over `(a, b)` with `a` the more
    /// significant qubit.
    ///
    /// The combined unitary of the returned leaves equals `matrix` up to
    /// global phase. Leaves are single-qubit gates and `CZ`; `CZ**t` appears
    /// only when `allow_partial_czs` is set.
    ///
    /// `matrix` must be a two-qubit matrix; the converter only passes
    /// matrices of two-qubit operations.
    fn synthesize(
        &self,
        a: QubitId,
        b: QubitId,
        matrix: &UnitaryMatrix,
        allow_partial_czs: bool,
    ) -> OperationTree;
}

/// Exact two-level (Givens) decomposition.
#[derive(Debug, Clone, Copy, Default)]
pub struct GivensSynthesizer;

/// One elimination: rotate basis rows `lo` and `hi` to zero one entry of
/// column `col`.
struct Step {
    lo: usize,
    hi: usize,
    col: usize,
    /// Zero the `hi` entry (true) or the `lo` entry (false).
    keep_lo: bool,
    /// The rows differ in the less significant qubit.
    target_low: bool,
    /// Value of the other qubit on both rows.
    control_value: bool,
}

const STEPS: [Step; 6] = [
    Step { lo: 2, hi: 3, col: 0, keep_lo: true, target_low: true, control_value: true },
    Step { lo: 0, hi: 1, col: 0, keep_lo: true, target_low: true, control_value: false },
    Step { lo: 0, hi: 2, col: 0, keep_lo: true, target_low: false, control_value: false },
    Step { lo: 2, hi: 3, col: 1, keep_lo: false, target_low: true, control_value: true },
    Step { lo: 1, hi: 3, col: 1, keep_lo: true, target_low: false, control_value: true },
    Step { lo: 2, hi: 3, col: 2, keep_lo: true, target_low: true, control_value: true },
];

type Rows = [[Complex64; 4]; 4];

impl TwoQubitSynthesizer for GivensSynthesizer {
    fn synthesize(
        &self,
        a: QubitId,
        b: QubitId,
        matrix: &UnitaryMatrix,
        allow_partial_czs: bool,
    ) -> OperationTree {
        debug_assert_eq!(matrix.num_qubits(), 2, "two-qubit synthesis of a {}-qubit matrix", matrix.num_qubits());

        let mut rows: Rows = std::array::from_fn(|r| std::array::from_fn(|c| matrix.get(r, c)));

        // rows = G_k ... G_1 U after the loop, and U = G_1† ... G_k† D.
        let mut undo = Vec::new();
        for step in &STEPS {
            let u = rows[step.lo][step.col];
            let v = rows[step.hi][step.col];
            let zeroed = if step.keep_lo { v } else { u };
            if zeroed.norm() < TOL {
                continue;
            }
            let r = (u.norm_sqr() + v.norm_sqr()).sqrt();
            let g = if step.keep_lo {
                Unitary2x2::new(u.conj() / r, v.conj() / r, -v / r, u / r)
            } else {
                Unitary2x2::new(v / r, -u / r, u.conj() / r, v.conj() / r)
            };
            rotate_rows(&mut rows, step.lo, step.hi, &g);

            let (control, target) = if step.target_low { (a, b) } else { (b, a) };
            let mut emitter = Emitter::new(allow_partial_czs);
            emitter.controlled(control, target, step.control_value, &g.dagger());
            undo.push(emitter.into_tree());
        }

        let mut emitter = Emitter::new(allow_partial_czs);
        emitter.controlled(a, b, false, &Unitary2x2::diagonal(rows[0][0], rows[1][1]));
        emitter.controlled(a, b, true, &Unitary2x2::diagonal(rows[2][2], rows[3][3]));

        let mut children = vec![emitter.into_tree()];
        children.extend(undo.into_iter().rev());
        let tree = OperationTree::Node(children);
        trace!("synthesized 2q unitary on {a}, {b} into {} gates", tree.num_leaves());
        tree
    }
}

fn rotate_rows(rows: &mut Rows, lo: usize, hi: usize, g: &Unitary2x2) {
    let [g00, g01, g10, g11] = g.data;
    for c in 0..4 {
        let (x, y) = (rows[lo][c], rows[hi][c]);
        rows[lo][c] = g00 * x + g01 * y;
        rows[hi][c] = g10 * x + g11 * y;
    }
}

/// Wrap an angle into `(-π, π]`.
fn wrap(theta: f64) -> f64 {
    let t = theta.rem_euclid(2.0 * PI);
    if t > PI { t - 2.0 * PI } else { t }
}

/// Accumulates the leaves of one synthesized block.
struct Emitter {
    ops: Vec<Instruction>,
    allow_partial_czs: bool,
}

impl Emitter {
    fn new(allow_partial_czs: bool) -> Self {
        Self {
            ops: Vec::new(),
            allow_partial_czs,
        }
    }

    fn into_tree(self) -> OperationTree {
        OperationTree::from(self.ops)
    }

    fn single(&mut self, gate: StandardGate, q: QubitId) {
        self.ops.push(Instruction::single_qubit_gate(gate, q));
    }

    fn rotation(&mut self, make: fn(f64) -> StandardGate, theta: f64, q: QubitId) {
        let theta = wrap(theta);
        if theta.abs() > TOL {
            self.single(make(theta), q);
        }
    }

    fn rz(&mut self, theta: f64, q: QubitId) {
        self.rotation(|t| StandardGate::Rz(t.into()), theta, q);
    }

    fn ry(&mut self, theta: f64, q: QubitId) {
        self.rotation(|t| StandardGate::Ry(t.into()), theta, q);
    }

    fn phase(&mut self, lambda: f64, q: QubitId) {
        self.rotation(|t| StandardGate::P(t.into()), lambda, q);
    }

    fn cz_pow(&mut self, t: f64, a: QubitId, b: QubitId) {
        self.ops.push(Instruction::two_qubit_gate(StandardGate::CZPow(t.into()), a, b));
    }

    fn cx(&mut self, control: QubitId, target: QubitId) {
        self.single(StandardGate::H, target);
        self.cz_pow(1.0, control, target);
        self.single(StandardGate::H, target);
    }

    /// Apply `v` to `target` when `control` equals `control_value`.
    fn controlled(&mut self, control: QubitId, target: QubitId, control_value: bool, v: &Unitary2x2) {
        if v.approx_eq(&Unitary2x2::identity(), TOL) {
            return;
        }
        if !control_value {
            self.single(StandardGate::X, control);
        }
        self.controlled_on_one(control, target, v);
        if !control_value {
            self.single(StandardGate::X, control);
        }
    }

    fn controlled_on_one(&mut self, control: QubitId, target: QubitId, v: &Unitary2x2) {
        let [v00, v01, v10, v11] = v.data;

        // diag(1, 1, v00, v11) = P(arg v00) on the control times CZ**t.
        if v01.norm() < TOL && v10.norm() < TOL {
            let t = (v11 / v00).arg() / PI;
            let partial_ok = self.allow_partial_czs || t.abs() < TOL || (t.abs() - 1.0).abs() < TOL;
            if partial_ok {
                if (t.abs() - 1.0).abs() < TOL {
                    self.cz_pow(1.0, control, target);
                } else if t.abs() >= TOL {
                    self.cz_pow(t, control, target);
                }
                self.phase(v00.arg(), control);
                return;
            }
        }

        // V = e^{iφ} A X B X C with ABC = I.
        let ZyzAngles {
            alpha,
            beta,
            gamma,
            phase,
        } = v.zyz();
        self.rz((gamma - alpha) / 2.0, target);
        self.cx(control, target);
        self.rz(-(gamma + alpha) / 2.0, target);
        self.ry(-beta / 2.0, target);
        self.cx(control, target);
        self.ry(beta / 2.0, target);
        self.rz(alpha, target);
        self.phase(phase, control);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use czset_ir::{Gate, sequence_unitary};

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    fn check(matrix: &UnitaryMatrix, allow_partial_czs: bool) -> Vec<Instruction> {
        let tree = GivensSynthesizer.synthesize(q(0), q(1), matrix, allow_partial_czs);
        let leaves = tree.into_leaves();
        let actual = sequence_unitary(&leaves, &[q(0), q(1)]).unwrap();
        assert!(
            matrix.approx_eq_up_to_global_phase(&actual, 1e-8),
            "synthesis mismatch"
        );
        leaves
    }

    fn is_canonical_cz(inst: &Instruction) -> bool {
        inst.as_gate()
            .and_then(Gate::cz_exponent)
            .is_some_and(|t| t.is_exactly(1.0))
    }

    #[test]
    fn test_cnot_uses_cz() {
        let cx = StandardGate::CX.matrix().unwrap();
        let leaves = check(&cx, false);
        assert!(leaves.iter().any(is_canonical_cz));
        assert!(leaves.iter().all(|l| l.num_qubits() == 1 || is_canonical_cz(l)));
    }

    #[test]
    fn test_cz_is_single_gate() {
        let cz = StandardGate::cz().matrix().unwrap();
        let leaves = check(&cz, false);
        assert_eq!(leaves.len(), 1);
        assert!(is_canonical_cz(&leaves[0]));
    }

    #[test]
    fn test_identity_is_empty() {
        let leaves = check(&UnitaryMatrix::identity(2), false);
        assert!(leaves.is_empty());
    }

    #[test]
    fn test_swap_and_iswap() {
        for m in [UnitaryMatrix::swap(), UnitaryMatrix::iswap()] {
            let leaves = check(&m, false);
            assert!(leaves.iter().all(|l| l.num_qubits() == 1 || is_canonical_cz(l)));
        }
    }

    #[test]
    fn test_partial_cz_only_when_allowed() {
        let m = StandardGate::CZPow(0.3.into()).matrix().unwrap();

        let strict = check(&m, false);
        assert!(strict.iter().all(|l| l.num_qubits() == 1 || is_canonical_cz(l)));

        let partial = check(&m, true);
        assert_eq!(partial.len(), 1);
        let t = partial[0].as_gate().and_then(Gate::cz_exponent).and_then(|t| t.as_f64());
        assert!((t.unwrap() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_qubit_order_respected() {
        let m = StandardGate::CX.matrix().unwrap();
        let leaves = GivensSynthesizer.synthesize(q(5), q(2), &m, false).into_leaves();
        let actual = sequence_unitary(&leaves, &[q(5), q(2)]).unwrap();
        assert!(m.approx_eq_up_to_global_phase(&actual, 1e-8));
    }

    #[test]
    fn test_wrap() {
        assert!((wrap(3.0 * PI) - PI).abs() < 1e-12);
        assert!((wrap(-0.5) + 0.5).abs() < 1e-12);
    }
}
