//! Benchmarks for CZ conversion
//!
//! Run with: cargo bench -p czset-compile

use czset_compile::{
    ConversionConfig, ConvertToCzAndSingleGates, GivensSynthesizer, PassManagerBuilder,
    PropertySet, TwoQubitSynthesizer,
};
use czset_ir::{Circuit, Instruction, QubitId, StandardGate};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Benchmark converting single operations
fn bench_convert_operation(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_operation");
    let converter = ConvertToCzAndSingleGates::new(ConversionConfig::default());

    let cases = [
        ("cz", Instruction::two_qubit_gate(StandardGate::cz(), QubitId(0), QubitId(1))),
        ("cx", Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1))),
        ("iswap", Instruction::two_qubit_gate(StandardGate::ISwap, QubitId(0), QubitId(1))),
        (
            "ccx",
            Instruction::gate(StandardGate::CCX, [QubitId(0), QubitId(1), QubitId(2)]).unwrap(),
        ),
        (
            "cswap",
            Instruction::gate(StandardGate::CSwap, [QubitId(0), QubitId(1), QubitId(2)]).unwrap(),
        ),
    ];

    for (name, op) in &cases {
        group.bench_with_input(BenchmarkId::new("convert", name), op, |b, op| {
            b.iter(|| converter.convert(black_box(op)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the two-qubit synthesizer alone
fn bench_synthesis(c: &mut Criterion) {
    let matrix = StandardGate::RXX(0.7.into()).matrix().unwrap();
    c.bench_function("givens_rxx", |b| {
        b.iter(|| GivensSynthesizer.synthesize(QubitId(0), QubitId(1), black_box(&matrix), false));
    });
}

/// Benchmark the full pipeline on GHZ circuits
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for num_qubits in &[5u32, 20, 50] {
        let circuit = Circuit::ghz(*num_qubits).unwrap();
        group.bench_with_input(
            BenchmarkId::new("ghz", num_qubits),
            &circuit,
            |b, circuit| {
                let (pm, _) = PassManagerBuilder::new().build();
                b.iter(|| {
                    let mut circuit = circuit.clone();
                    let mut props = PropertySet::new();
                    pm.run(&mut circuit, &mut props).unwrap();
                    circuit
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_convert_operation, bench_synthesis, bench_pipeline);
criterion_main!(benches);
