//! CPU feature detection for runtime dot-kernel dispatch.

use std::fmt;

/// Available SIMD instruction sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SimdLevel {
    /// No SIMD, use scalar code.
    Scalar,
    /// SSE2 (128-bit, available on all x86-64).
    Sse2,
    /// AVX2 (256-bit integer).
    Avx2,
    /// AVX-512 (512-bit). Dispatched like AVX2.
    Avx512,
    /// ARM NEON (128-bit).
    Neon,
}

impl SimdLevel {
    /// Detect the best available SIMD level at runtime.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("avx2") {
                return SimdLevel::Avx512;
            }
            if is_x86_feature_detected!("avx2") {
                return SimdLevel::Avx2;
            }
            // SSE2 is always available on x86-64
            return SimdLevel::Sse2;
        }

        #[cfg(target_arch = "aarch64")]
        {
            return SimdLevel::Neon;
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            SimdLevel::Scalar
        }
    }
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SimdLevel::Scalar => "scalar",
            SimdLevel::Sse2 => "x86-64 SSE2 (128-bit)",
            SimdLevel::Avx2 => "x86-64 AVX2 (256-bit)",
            SimdLevel::Avx512 => "x86-64 AVX-512 (512-bit)",
            SimdLevel::Neon => "ARM NEON (128-bit)",
        };
        f.write_str(s)
    }
}

/// Global cached SIMD level.
static SIMD_LEVEL: std::sync::OnceLock<SimdLevel> = std::sync::OnceLock::new();

/// Get the detected SIMD level (cached).
pub fn simd_level() -> SimdLevel {
    *SIMD_LEVEL.get_or_init(SimdLevel::detect)
}
