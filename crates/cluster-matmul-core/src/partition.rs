use std::ops::Range;

/// How the per-worker block size is derived from `rows / workers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRounding {
    /// `ceil(rows / workers)`. Trailing workers may receive an empty range.
    Ceil,
    /// `floor(rows / workers)`. The last worker absorbs the remainder.
    Floor,
}

/// Contiguous row partition of an output matrix across a worker team.
///
/// Every row in `[0, rows)` belongs to exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPartition {
    rows: usize,
    workers: usize,
    block_size: usize,
    rounding: BlockRounding,
}

impl RowPartition {
    /// Create a partition of `rows` rows over `workers` workers.
    ///
    /// # Panics
    /// Panics if `workers == 0`.
    pub fn new(rows: usize, workers: usize, rounding: BlockRounding) -> Self {
        assert!(workers > 0, "a partition needs at least one worker");
        let block_size = match rounding {
            BlockRounding::Ceil => rows.div_ceil(workers),
            BlockRounding::Floor => rows / workers,
        };
        Self {
            rows,
            workers,
            block_size,
            rounding,
        }
    }

    /// Number of rows being partitioned.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of workers in the team.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Rows per worker before clipping.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn rounding(&self) -> BlockRounding {
        self.rounding
    }

    /// Half-open row range owned by `worker`.
    ///
    /// Workers whose start falls past the end get an empty range.
    pub fn range(&self, worker: usize) -> Range<usize> {
        debug_assert!(worker < self.workers);
        let start = (worker * self.block_size).min(self.rows);
        let stop = if self.rounding == BlockRounding::Floor && worker + 1 == self.workers {
            self.rows
        } else {
            (start + self.block_size).min(self.rows)
        };
        start..stop
    }

    /// Iterate over the ranges of all workers in worker order.
    pub fn iter(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.workers).map(move |w| self.range(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(rows: usize, workers: usize, rounding: BlockRounding) -> Vec<Range<usize>> {
        RowPartition::new(rows, workers, rounding).iter().collect()
    }

    #[test]
    fn test_ceil_even() {
        assert_eq!(
            collect(64, 4, BlockRounding::Ceil),
            vec![0..16, 16..32, 32..48, 48..64]
        );
    }

    #[test]
    fn test_ceil_uneven_clips_last() {
        // 64 / 3 rounds up to 22
        assert_eq!(
            collect(64, 3, BlockRounding::Ceil),
            vec![0..22, 22..44, 44..64]
        );
    }

    #[test]
    fn test_floor_uneven_last_absorbs_remainder() {
        // 64 / 3 rounds down to 21, row 63 goes to the last worker
        assert_eq!(
            collect(64, 3, BlockRounding::Floor),
            vec![0..21, 21..42, 42..64]
        );
    }

    #[test]
    fn test_ceil_more_workers_than_rows() {
        let ranges = collect(4, 6, BlockRounding::Ceil);
        assert_eq!(ranges[..4], [0..1, 1..2, 2..3, 3..4]);
        assert!(ranges[4].is_empty());
        assert!(ranges[5].is_empty());
    }

    #[test]
    fn test_floor_more_workers_than_rows() {
        let ranges = collect(4, 6, BlockRounding::Floor);
        assert!(ranges[..5].iter().all(|r| r.is_empty()));
        assert_eq!(ranges[5], 0..4);
    }

    #[test]
    fn test_single_worker() {
        assert_eq!(collect(64, 1, BlockRounding::Ceil), vec![0..64]);
        assert_eq!(collect(64, 1, BlockRounding::Floor), vec![0..64]);
    }

    #[test]
    fn test_block_size() {
        assert_eq!(RowPartition::new(64, 3, BlockRounding::Ceil).block_size(), 22);
        assert_eq!(RowPartition::new(64, 3, BlockRounding::Floor).block_size(), 21);
        assert_eq!(RowPartition::new(64, 8, BlockRounding::Floor).block_size(), 8);
    }

    #[test]
    fn test_exact_cover() {
        for rounding in [BlockRounding::Ceil, BlockRounding::Floor] {
            for workers in [1, 2, 3, 4, 8] {
                let mut seen = [0u8; 64];
                for range in collect(64, workers, rounding) {
                    for row in range {
                        seen[row] += 1;
                    }
                }
                assert!(
                    seen.iter().all(|&s| s == 1),
                    "{rounding:?} with {workers} workers"
                );
            }
        }
    }

    #[test]
    #[should_panic(expected = "at least one worker")]
    fn test_zero_workers() {
        let _ = RowPartition::new(64, 0, BlockRounding::Ceil);
    }
}
