//! Benchmark for matching deployed bytecode against many candidates.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use forseti_common::utils::version::SolcVersion;
use forseti_core::{
    forseti_matcher::{ArtifactBytecode, CompiledArtifact, CompilerOutput, MatchOptions},
    verify,
};

fn candidates(count: usize, size: usize) -> (Vec<u8>, CompilerOutput) {
    let deployed: Vec<u8> = (0..size).map(|i| (i % 0x50) as u8).collect();
    let output = (0..count)
        .map(|i| {
            let mut code = deployed.clone();
            if i + 1 != count {
                code[size / 2] = 0xff;
            }
            CompiledArtifact::new(format!("C{i}.sol"), format!("C{i}"), ArtifactBytecode::new(code))
        })
        .collect();

    (deployed, output)
}

fn test_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("forseti_match");
    let version = SolcVersion::new(0, 8, 24);

    for count in [8, 64, 512] {
        let (deployed, output) = candidates(count, 24 * 1024);

        for threads in [1, 8] {
            let options = MatchOptions { threads, parallel_threshold: 8, ..Default::default() };
            group.bench_with_input(
                BenchmarkId::new(format!("threads-{threads}"), count),
                &options,
                |b, options| {
                    b.iter(|| {
                        verify(&deployed, &output, &version, options)
                            .expect("last candidate matches")
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, test_match);
criterion_main!(benches);
