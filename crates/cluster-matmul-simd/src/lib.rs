//! SIMD dot-product kernels for the transpose + dot-product matmul.
//!
//! This crate provides architecture-specific implementations of the
//! [`DotKernel`](cluster_matmul_core::DotKernel) trait, standing in for
//! the four-lane sum-of-dot-products intrinsic of the cluster cores.
//!
//! # Supported Architectures
//!
//! - **x86-64**: AVX2 `vpmaddwd` (sixteen lanes per step)
//! - **Everywhere else**: portable `sumdotp4` emulation
//!
//! `WideDot4Kernel` (four `wide::i32x4` lanes) stays selectable by hand.
//!
//! Every kernel returns bit-identical sums, so the choice only affects
//! speed.
//!
//! # Example
//!
//! ```
//! use cluster_matmul_core::{team_fork, SharedMatrices};
//! use cluster_matmul_simd::{matmul_transposed_dispatch, simd_level};
//!
//! println!("Detected SIMD level: {}", simd_level());
//!
//! let n = 64;
//! let a = vec![1i8; n * n];
//! let mut b = vec![1i8; n * n];
//! let mut c = vec![0i32; n * n];
//!
//! let mats = unsafe { SharedMatrices::new(a.as_ptr(), b.as_mut_ptr(), c.as_mut_ptr(), n) };
//! team_fork(4, |ctx| unsafe { matmul_transposed_dispatch(ctx, &mats) });
//! assert_eq!(c[0], 64);
//! ```

mod detect;
pub mod dispatch;
pub mod kernels;

pub use detect::{simd_level, SimdLevel};
pub use dispatch::{matmul_transposed_dispatch, matmul_transposed_with_choice, DotKernelChoice};
pub use kernels::*;
