use std::ops::Range;

use crate::kernel::DotKernel;
use crate::partition::{BlockRounding, RowPartition};
use crate::team::{SharedMatrices, TeamContext};
use crate::transpose::transpose_rows;

/// Transpose + dot-product matmul: `C = A * B`.
///
/// Must be called by every worker of the team. Runs in two phases over
/// the same [`BlockRounding::Floor`] row block:
///
/// 1. transpose the owned rows of `B` in place, then barrier;
/// 2. for each owned row `i` of `C` and each `j`, set
///    `C[i][j] = kernel.dot(A[i], Bᵀ[j])`, then barrier.
///
/// On return `B` holds `Bᵀ`.
///
/// # Safety
/// - `mats` must satisfy the contract of [`SharedMatrices::new`]
/// - `mats.n` must be a multiple of `K::WIDTH`
pub unsafe fn matmul_transposed_dotp<K: DotKernel>(
    ctx: &TeamContext<'_>,
    mats: &SharedMatrices,
    kernel: &K,
) {
    let n = mats.n;
    let rows = RowPartition::new(n, ctx.nb_cores(), BlockRounding::Floor).range(ctx.core_id());

    // Phase 1
    transpose_rows(mats.b, n, rows.clone());
    ctx.barrier();

    // Phase 2 reads rows of Bᵀ written by other workers.
    dotp_rows(rows, mats, kernel);
    ctx.barrier();
}

/// Compute rows `rows` of `C` against an already transposed `B`.
///
/// # Safety
/// Same requirements as [`matmul_transposed_dotp`]; `mats.b` must hold
/// `Bᵀ` and must not be written concurrently.
pub unsafe fn dotp_rows<K: DotKernel>(rows: Range<usize>, mats: &SharedMatrices, kernel: &K) {
    let n = mats.n;
    debug_assert_eq!(n % K::WIDTH, 0, "n must be a multiple of the kernel width");
    let bt = mats.b as *const i8;

    for i in rows {
        let a_row = mats.a.add(i * n);
        for j in 0..n {
            *mats.c.add(i * n + j) = kernel.dot(a_row, bt.add(j * n), n);
        }
    }
}
