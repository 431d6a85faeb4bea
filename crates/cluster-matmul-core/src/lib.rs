//! Core partitioned int8 matmul kernels.
//!
//! This crate provides the portable building blocks of the cluster
//! matmul benchmark: a row partitioner, a fork-join worker team with a
//! shared barrier, and two `C = A * B` kernels over `n x n` row-major
//! `i8` inputs with wrapping `i32` accumulators.
//!
//! # Kernels
//!
//! - [`matmul_naive`]: each worker computes a contiguous block of rows
//!   with a 4-way unrolled inner loop.
//! - [`matmul_transposed_dotp`]: each worker transposes its block of `B`
//!   in place, the team meets at a barrier, then each worker computes its
//!   rows of `C` as dot products of rows of `A` and rows of `Bᵀ` using a
//!   pluggable [`DotKernel`].
//!
//! Both kernels produce bit-identical results for the same inputs.
//!
//! # Example
//!
//! ```
//! use cluster_matmul_core::{matmul_transposed_dotp, team_fork, SharedMatrices, SumDotp4Kernel};
//!
//! let n = 64;
//! let a = vec![1i8; n * n];
//! let mut b = vec![1i8; n * n];
//! let mut c = vec![0i32; n * n];
//!
//! let mats = unsafe { SharedMatrices::new(a.as_ptr(), b.as_mut_ptr(), c.as_mut_ptr(), n) };
//! team_fork(4, |ctx| unsafe { matmul_transposed_dotp(ctx, &mats, &SumDotp4Kernel) });
//!
//! assert!(c.iter().all(|&v| v == 64));
//! ```

mod dotp;
mod kernel;
mod naive;
mod partition;
mod team;
mod transpose;

pub use dotp::{dotp_rows, matmul_transposed_dotp};
pub use kernel::{sumdotp4, DotKernel, ScalarDotKernel, SumDotp4Kernel};
pub use naive::{matmul_naive, matmul_naive_rows};
pub use partition::{BlockRounding, RowPartition};
pub use team::{team_fork, SharedMatrices, TeamContext};
pub use transpose::{transpose_in_place, transpose_rows};

/// Matrix dimension of the reference benchmark.
pub const MATRIX_SIZE: usize = 64;
