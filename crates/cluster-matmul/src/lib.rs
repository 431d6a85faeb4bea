//! Parallel int8 matrix multiplication micro-benchmark.
//!
//! Multiplies two square `i8` matrices into `i32` accumulators on a team
//! of worker cores, comparing two strategies:
//!
//! | Kernel | Partition | Inner loop |
//! |--------|-----------|------------|
//! | naive | `ceil(n / cores)` rows per core | 4-way unrolled multiply-accumulate |
//! | transpose + dotp | `floor(n / cores)` rows per core, last core takes the rest | in-place `Bᵀ`, barrier, 4-lane dot products |
//!
//! Both produce bit-identical results.
//!
//! # Quick Start
//!
//! ```
//! use cluster_matmul::{Cluster, FillPattern, MatI32, MatI8};
//!
//! let cluster = Cluster::new(4).unwrap();
//! let a = MatI8::from_pattern(64, FillPattern::Ramp);
//! let mut b = MatI8::from_pattern(64, FillPattern::Ramp);
//!
//! let mut naive = MatI32::zeros(64);
//! cluster.matmul_naive(&a, &b, &mut naive).unwrap();
//!
//! let mut dotp = MatI32::zeros(64);
//! cluster.matmul_transposed(&a, &mut b, &mut dotp).unwrap();
//!
//! assert_eq!(naive, dotp);
//! ```
//!
//! # Benchmark
//!
//! ```
//! use cluster_matmul::{run_benchmark, BenchConfig, HostPlatform};
//!
//! let mut platform = HostPlatform::new();
//! let summary = run_benchmark(&mut platform, &BenchConfig::default()).unwrap();
//! for report in &summary.reports {
//!     println!("{report}");
//! }
//! assert_eq!(summary.errors(), 0);
//! ```
//!
//! ```
//! println!("{}", cluster_matmul::version_info());
//! ```

pub mod bench;
pub mod config;
pub mod error;
pub mod mat;
pub mod perf;
pub mod platform;

mod cluster;

pub use bench::{run_benchmark, run_kernels, version_info, BenchSummary, KernelKind, KernelReport};
pub use cluster::Cluster;
pub use config::BenchConfig;
pub use error::{MatmulError, Result};
pub use mat::{FillPattern, MatI32, MatI8};
pub use perf::{CycleCounter, HostCycleCounter};
pub use platform::{ClusterConf, FreqDomain, HostPlatform, Platform};

pub use cluster_matmul_core::{
    BlockRounding, DotKernel, RowPartition, ScalarDotKernel, SumDotp4Kernel, TeamContext,
    MATRIX_SIZE,
};
pub use cluster_matmul_simd::{simd_level, DotKernelChoice, SimdLevel};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::{
        run_benchmark, BenchConfig, Cluster, DotKernelChoice, FillPattern, HostPlatform,
        KernelKind, MatI32, MatI8, MatmulError, Platform,
    };
}
