//! Property tests for structural decompositions and Euler angles.

use std::f64::consts::PI;

use czset_ir::{
    Circuit, Instruction, OperationTree, QubitId, StandardGate, Unitary2x2, sequence_unitary,
};
use proptest::prelude::*;

fn angle() -> impl Strategy<Value = f64> {
    -2.0 * PI..2.0 * PI
}

/// Fully expand an instruction through every nested decomposition level.
fn expand(inst: &Instruction) -> Vec<Instruction> {
    match inst.decompose_once() {
        None => vec![inst.clone()],
        Some(tree) => tree.into_leaves().iter().flat_map(expand).collect(),
    }
}

fn reconstruct(u: &Unitary2x2) -> Unitary2x2 {
    let zyz = u.zyz();
    let phase = num_complex::Complex64::from_polar(1.0, zyz.phase);
    let rotation = Unitary2x2::rz(zyz.alpha) * Unitary2x2::ry(zyz.beta) * Unitary2x2::rz(zyz.gamma);
    Unitary2x2::new(
        rotation.data[0] * phase,
        rotation.data[1] * phase,
        rotation.data[2] * phase,
        rotation.data[3] * phase,
    )
}

proptest! {
    #[test]
    fn zyz_reconstructs_u(theta in angle(), phi in angle(), lambda in angle()) {
        let u = Unitary2x2::u(theta, phi, lambda);
        prop_assert!(reconstruct(&u).approx_eq(&u, 1e-9));
    }

    #[test]
    fn zyz_reconstructs_phase_gates(lambda in angle()) {
        let u = Unitary2x2::p(lambda);
        prop_assert!(reconstruct(&u).approx_eq(&u, 1e-9));
    }

    #[test]
    fn parameterized_decompositions_match(theta in angle()) {
        for gate in [
            StandardGate::CP(theta.into()),
            StandardGate::CRz(theta.into()),
            StandardGate::RZZ(theta.into()),
        ] {
            let inst = Instruction::two_qubit_gate(gate, QubitId(3), QubitId(1));
            let expected = inst.unitary().unwrap();
            let leaves = inst.decompose_once().unwrap().into_leaves();
            let actual = sequence_unitary(&leaves, &inst.qubits).unwrap();
            prop_assert!(expected.approx_eq_up_to_global_phase(&actual, 1e-9));
        }
    }
}

#[test]
fn test_full_expansion_of_cswap_reaches_cz_and_single_qubit_gates() {
    let inst = Instruction::gate(StandardGate::CSwap, [QubitId(0), QubitId(1), QubitId(2)]).unwrap();
    let leaves = expand(&inst);

    assert!(leaves.iter().all(|l| l.num_qubits() == 1 || l.name() == "cz"));
    let cz_count = leaves.iter().filter(|l| l.name() == "cz").count();
    assert_eq!(cz_count, 8);

    let actual = sequence_unitary(&leaves, &inst.qubits).unwrap();
    assert!(inst.unitary().unwrap().approx_eq_up_to_global_phase(&actual, 1e-9));
}

#[test]
fn test_tree_serde() {
    let tree = OperationTree::from(vec![
        Instruction::single_qubit_gate(StandardGate::H, QubitId(0)),
        Instruction::two_qubit_gate(StandardGate::CZPow(0.25.into()), QubitId(0), QubitId(1)),
    ]);
    let json = serde_json::to_string(&tree).unwrap();
    let back: OperationTree = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tree);
}

#[test]
fn test_circuit_unitary_of_ghz_is_unitary() {
    let circuit = Circuit::ghz(4).unwrap();
    let u = circuit.unitary().unwrap();
    assert_eq!(u.num_qubits(), 4);
    assert!(u.is_unitary(1e-9));
}
