//! Basic example of the two cluster matmul kernels.

use cluster_matmul::prelude::*;

fn main() -> Result<(), MatmulError> {
    println!("Cluster MatMul - Basic Example\n");
    println!("{}\n", cluster_matmul::version_info());

    let n = 8;
    let cluster = Cluster::new(3)?;

    // Asymmetric operands so the transpose actually matters
    let a = MatI8::from_pattern(n, FillPattern::Ramp);
    let mut b = MatI8::from_fn(n, |i, j| (i as i8) - (j as i8));

    println!("Matrix A ({n}x{n}):");
    print_matrix(a.as_slice(), n);
    println!("\nMatrix B ({n}x{n}):");
    print_matrix(b.as_slice(), n);

    let mut naive = MatI32::zeros(n);
    cluster.matmul_naive(&a, &b, &mut naive)?;

    println!("\nC = A * B (naive, {} cores):", cluster.nb_cores());
    print_matrix(naive.as_slice(), n);

    let mut dotp = MatI32::zeros(n);
    cluster.matmul_transposed(&a, &mut b, &mut dotp)?;

    println!("\nB after the dot-product kernel (transposed in place):");
    print_matrix(b.as_slice(), n);

    println!(
        "\nDot kernel {} result {} the naive result",
        cluster.dot_kernel(),
        if dotp == naive { "matches" } else { "DIFFERS from" }
    );

    // Transposing twice restores the original operand
    cluster.transpose_in_place(&mut b);
    assert_eq!(b, MatI8::from_fn(n, |i, j| (i as i8) - (j as i8)));

    println!("\n--- Row partitions for {n} rows over 3 cores ---\n");
    for rounding in [cluster_matmul::BlockRounding::Ceil, cluster_matmul::BlockRounding::Floor] {
        let partition = cluster_matmul::RowPartition::new(n, 3, rounding);
        let ranges: Vec<_> = partition.iter().collect();
        println!("  {rounding:?}: {ranges:?}");
    }

    println!("\nDone!");
    Ok(())
}

fn print_matrix<T: std::fmt::Display>(data: &[T], n: usize) {
    for i in 0..n {
        print!("  ");
        for j in 0..n {
            print!("{:6} ", data[i * n + j]);
        }
        println!();
    }
}
