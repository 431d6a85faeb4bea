//! SIMD dot-product kernel implementations.

#[cfg(target_arch = "x86_64")]
pub mod avx2;
pub mod portable;

#[cfg(target_arch = "x86_64")]
pub use avx2::Avx2MaddKernel;
pub use portable::WideDot4Kernel;
