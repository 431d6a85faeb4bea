use std::fmt;

use crate::detect::{simd_level, SimdLevel};
use crate::kernels::*;
use cluster_matmul_core::{
    matmul_transposed_dotp, ScalarDotKernel, SharedMatrices, SumDotp4Kernel, TeamContext,
};

/// Dot kernel used by the transpose + dot-product matmul.
///
/// All variants produce the same sums; they only differ in speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotKernelChoice {
    /// One lane at a time.
    Scalar,
    /// Portable four-lane `sumdotp4` emulation.
    SumDotp4,
    /// Four lanes through `wide::i32x4`.
    Wide4,
    /// Sixteen lanes per step through AVX2 `vpmaddwd`.
    Avx2,
}

impl DotKernelChoice {
    /// Best kernel for a SIMD level.
    ///
    /// Below AVX2 this is `SumDotp4`; `Wide4` is only used when chosen
    /// explicitly or as the AVX2 fallback.
    pub fn for_level(level: SimdLevel) -> Self {
        match level {
            SimdLevel::Avx2 | SimdLevel::Avx512 if cfg!(target_arch = "x86_64") => {
                DotKernelChoice::Avx2
            }
            _ => DotKernelChoice::SumDotp4,
        }
    }

    /// Best kernel for the running CPU.
    pub fn detect() -> Self {
        Self::for_level(simd_level())
    }

    /// Whether this kernel can run on the current CPU.
    pub fn is_supported(&self) -> bool {
        match self {
            DotKernelChoice::Avx2 => {
                cfg!(target_arch = "x86_64")
                    && matches!(simd_level(), SimdLevel::Avx2 | SimdLevel::Avx512)
            }
            _ => true,
        }
    }

    /// Lane group width; `n` must be a multiple of it.
    pub fn width(&self) -> usize {
        match self {
            DotKernelChoice::Scalar => 1,
            _ => 4,
        }
    }
}

impl fmt::Display for DotKernelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DotKernelChoice::Scalar => "scalar",
            DotKernelChoice::SumDotp4 => "sumdotp4",
            DotKernelChoice::Wide4 => "wide-i32x4",
            DotKernelChoice::Avx2 => "avx2-madd",
        };
        f.write_str(s)
    }
}

/// Transpose + dot-product matmul with the kernel picked at runtime.
///
/// Must be called by every worker of the team.
///
/// # Safety
/// Same requirements as [`matmul_transposed_dotp`].
pub unsafe fn matmul_transposed_dispatch(ctx: &TeamContext<'_>, mats: &SharedMatrices) {
    matmul_transposed_with_choice(ctx, mats, DotKernelChoice::detect());
}

/// Transpose + dot-product matmul with an explicit kernel.
///
/// Every worker of the team must pass the same `choice`. An unsupported
/// `Avx2` choice falls back to [`WideDot4Kernel`].
///
/// # Safety
/// Same requirements as [`matmul_transposed_dotp`], and `mats.n` must be
/// a multiple of `choice.width()`.
pub unsafe fn matmul_transposed_with_choice(
    ctx: &TeamContext<'_>,
    mats: &SharedMatrices,
    choice: DotKernelChoice,
) {
    match choice {
        DotKernelChoice::Scalar => matmul_transposed_dotp(ctx, mats, &ScalarDotKernel),
        DotKernelChoice::SumDotp4 => matmul_transposed_dotp(ctx, mats, &SumDotp4Kernel),
        #[cfg(target_arch = "x86_64")]
        DotKernelChoice::Avx2 if choice.is_supported() => {
            matmul_transposed_dotp(ctx, mats, &Avx2MaddKernel)
        }
        _ => matmul_transposed_dotp(ctx, mats, &WideDot4Kernel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cluster_matmul_core::{matmul_naive, team_fork};

    const CHOICES: [DotKernelChoice; 4] = [
        DotKernelChoice::Scalar,
        DotKernelChoice::SumDotp4,
        DotKernelChoice::Wide4,
        DotKernelChoice::Avx2,
    ];

    fn operands(n: usize) -> (Vec<i8>, Vec<i8>) {
        let a = (0..n * n).map(|v| (v * 5 % 256) as u8 as i8).collect();
        let b = (0..n * n).map(|v| (v * 17 % 256) as u8 as i8).collect();
        (a, b)
    }

    fn multiply(
        a: &[i8],
        b: &[i8],
        n: usize,
        workers: usize,
        choice: Option<DotKernelChoice>,
    ) -> Vec<i32> {
        let mut b = b.to_vec();
        let mut c = vec![0i32; n * n];
        let mats = unsafe { SharedMatrices::new(a.as_ptr(), b.as_mut_ptr(), c.as_mut_ptr(), n) };
        team_fork(workers, |ctx| unsafe {
            match choice {
                Some(choice) => matmul_transposed_with_choice(ctx, &mats, choice),
                None => matmul_naive(ctx, &mats),
            }
        });
        c
    }

    #[test]
    fn test_all_choices_match_naive() {
        let n = 64;
        let (a, b) = operands(n);
        let expected = multiply(&a, &b, n, 4, None);
        for choice in CHOICES {
            assert_eq!(multiply(&a, &b, n, 4, Some(choice)), expected, "{choice}");
        }
    }

    #[test]
    fn test_dispatch_all_ones() {
        let n = 64;
        let a = vec![1i8; n * n];
        let mut b = vec![1i8; n * n];
        let mut c = vec![0i32; n * n];
        let mats = unsafe { SharedMatrices::new(a.as_ptr(), b.as_mut_ptr(), c.as_mut_ptr(), n) };
        team_fork(8, |ctx| unsafe { matmul_transposed_dispatch(ctx, &mats) });
        assert!(c.iter().all(|&v| v == 64));
    }

    #[test]
    fn test_for_level() {
        assert_eq!(
            DotKernelChoice::for_level(SimdLevel::Scalar),
            DotKernelChoice::SumDotp4
        );
        assert_eq!(
            DotKernelChoice::for_level(SimdLevel::Neon),
            DotKernelChoice::SumDotp4
        );
        assert_eq!(
            DotKernelChoice::for_level(SimdLevel::Sse2),
            DotKernelChoice::SumDotp4
        );
        #[cfg(target_arch = "x86_64")]
        assert_eq!(DotKernelChoice::for_level(SimdLevel::Avx2), DotKernelChoice::Avx2);
    }

    #[test]
    fn test_detected_is_supported() {
        assert!(DotKernelChoice::detect().is_supported());
        assert!(DotKernelChoice::Scalar.is_supported());
    }

    #[test]
    fn test_width() {
        assert_eq!(DotKernelChoice::Scalar.width(), 1);
        assert_eq!(DotKernelChoice::Wide4.width(), 4);
    }
}
