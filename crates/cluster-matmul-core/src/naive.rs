use crate::partition::{BlockRounding, RowPartition};
use crate::team::{SharedMatrices, TeamContext};

/// Naive blocked matmul: `C = A * B`, one contiguous row block per worker.
///
/// Must be called by every worker of the team. Rows are split with
/// [`BlockRounding::Ceil`]; the inner `k` loop is unrolled by four.
/// Ends with a team barrier, after which `C` is complete.
///
/// # Safety
/// `mats` must satisfy the contract of [`SharedMatrices::new`].
pub unsafe fn matmul_naive(ctx: &TeamContext<'_>, mats: &SharedMatrices) {
    let n = mats.n;
    let partition = RowPartition::new(n, ctx.nb_cores(), BlockRounding::Ceil);
    matmul_naive_rows(partition.range(ctx.core_id()), mats);
    ctx.barrier();
}

/// Compute the rows `rows` of `C` without any synchronisation.
///
/// # Safety
/// Same requirements as [`matmul_naive`]; no other thread may write
/// the rows `rows` of `C` concurrently.
pub unsafe fn matmul_naive_rows(rows: std::ops::Range<usize>, mats: &SharedMatrices) {
    let n = mats.n;
    let (a, b, c) = (mats.a, mats.b as *const i8, mats.c);
    let unrolled = n - n % 4;

    for i in rows {
        let a_row = a.add(i * n);
        for j in 0..n {
            let mut acc = 0i32;
            let mut k = 0;
            while k < unrolled {
                let b_col = b.add(k * n + j);
                acc = acc.wrapping_add(*a_row.add(k) as i32 * *b_col as i32);
                acc = acc.wrapping_add(*a_row.add(k + 1) as i32 * *b_col.add(n) as i32);
                acc = acc.wrapping_add(*a_row.add(k + 2) as i32 * *b_col.add(2 * n) as i32);
                acc = acc.wrapping_add(*a_row.add(k + 3) as i32 * *b_col.add(3 * n) as i32);
                k += 4;
            }
            while k < n {
                acc = acc.wrapping_add(*a_row.add(k) as i32 * *b.add(k * n + j) as i32);
                k += 1;
            }
            *c.add(i * n + j) = acc;
        }
    }
}
