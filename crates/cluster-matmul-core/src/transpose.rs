use std::ops::Range;

use crate::partition::{BlockRounding, RowPartition};
use crate::team::TeamContext;

/// Transpose the lower triangle of `rows` against the upper triangle.
///
/// For each row `i` in `rows` and each `j < i`, swaps `b[i][j]` with
/// `b[j][i]`; the diagonal stays put. When the row ranges of a team
/// partition `[0, n)`, every off-diagonal pair is swapped by exactly one
/// worker (the owner of the larger index), so the union of all calls
/// transposes `b`.
///
/// # Safety
/// - `b` must be valid for `n * n` reads and writes
/// - concurrent callers must use disjoint `rows` ranges of one partition
pub unsafe fn transpose_rows(b: *mut i8, n: usize, rows: Range<usize>) {
    for i in rows {
        for j in 0..i {
            std::ptr::swap(b.add(i * n + j), b.add(j * n + i));
        }
    }
}

/// In-place transpose of an `n x n` matrix across the whole team.
///
/// Must be called by every worker of the team. Rows are split with
/// [`BlockRounding::Floor`]. Ends with a team barrier, after which any
/// worker may read any row of the transposed matrix.
///
/// # Safety
/// `b` must be valid for `n * n` reads and writes, and no code outside
/// the team may access it during the call.
pub unsafe fn transpose_in_place(ctx: &TeamContext<'_>, b: *mut i8, n: usize) {
    let partition = RowPartition::new(n, ctx.nb_cores(), BlockRounding::Floor);
    transpose_rows(b, n, partition.range(ctx.core_id()));
    ctx.barrier();
}
