use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cluster_matmul::prelude::*;
use cluster_matmul::{ScalarDotKernel, SumDotp4Kernel};

fn operands(n: usize) -> (MatI8, MatI8) {
    (
        MatI8::from_pattern(n, FillPattern::Ramp),
        MatI8::from_pattern(n, FillPattern::Ramp).transposed(),
    )
}

fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("ClusterMatmul_64");
    group.sample_size(50);

    let n = 64;
    let (a, b) = operands(n);
    group.throughput(Throughput::Elements((n * n * n) as u64));

    for cores in [1, 2, 4, 8] {
        let cluster = Cluster::new(cores).unwrap();

        group.bench_with_input(BenchmarkId::new("naive", cores), &cores, |bench, _| {
            let mut c = MatI32::zeros(n);
            bench.iter(|| {
                cluster.matmul_naive(&a, &b, &mut c).unwrap();
                black_box(c.as_slice()[0])
            });
        });

        group.bench_with_input(BenchmarkId::new("transposed_dotp", cores), &cores, |bench, _| {
            let mut b = b.clone();
            let mut c = MatI32::zeros(n);
            // Each call transposes B in place; alternating orientations
            // costs the same as restoring it.
            bench.iter(|| {
                cluster.matmul_transposed(&a, &mut b, &mut c).unwrap();
                black_box(c.as_slice()[0])
            });
        });
    }

    group.finish();
}

fn bench_dot_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("DotKernel_64");
    group.sample_size(50);

    let n = 64;
    let (a, b) = operands(n);
    let cluster = Cluster::new(1).unwrap();

    group.bench_function("scalar", |bench| {
        let mut b = b.clone();
        let mut c = MatI32::zeros(n);
        bench.iter(|| {
            cluster
                .matmul_transposed_with(&a, &mut b, &mut c, &ScalarDotKernel)
                .unwrap();
            black_box(c.as_slice()[0])
        });
    });

    group.bench_function("sumdotp4", |bench| {
        let mut b = b.clone();
        let mut c = MatI32::zeros(n);
        bench.iter(|| {
            cluster
                .matmul_transposed_with(&a, &mut b, &mut c, &SumDotp4Kernel)
                .unwrap();
            black_box(c.as_slice()[0])
        });
    });

    for choice in [DotKernelChoice::Wide4, DotKernelChoice::Avx2] {
        if !choice.is_supported() {
            continue;
        }
        let cluster = cluster.clone().with_dot_kernel(choice);
        group.bench_function(choice.to_string(), |bench| {
            let mut b = b.clone();
            let mut c = MatI32::zeros(n);
            bench.iter(|| {
                cluster.matmul_transposed(&a, &mut b, &mut c).unwrap();
                black_box(c.as_slice()[0])
            });
        });
    }

    group.finish();
}

/// Larger sizes to see how the two strategies scale.
fn bench_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("ClusterMatmul_sizes");
    group.sample_size(10);

    let cluster = Cluster::new(8).unwrap();
    for n in [64, 128, 256] {
        let (a, b) = operands(n);
        group.throughput(Throughput::Elements((n * n * n) as u64));

        group.bench_with_input(BenchmarkId::new("naive", n), &n, |bench, &n| {
            let mut c = MatI32::zeros(n);
            bench.iter(|| cluster.matmul_naive(&a, &b, &mut c).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("transposed_dotp", n), &n, |bench, &n| {
            let mut b = b.clone();
            let mut c = MatI32::zeros(n);
            bench.iter(|| cluster.matmul_transposed(&a, &mut b, &mut c).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kernels, bench_dot_kernels, bench_sizes);
criterion_main!(benches);
