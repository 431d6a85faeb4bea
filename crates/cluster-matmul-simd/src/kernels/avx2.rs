use std::arch::x86_64::{
    __m128i, __m256i, _mm256_add_epi32, _mm256_castsi256_si128, _mm256_cvtepi8_epi16,
    _mm256_extracti128_si256, _mm256_madd_epi16, _mm256_setzero_si256, _mm_add_epi32,
    _mm_cvtsi128_si32, _mm_loadu_si128, _mm_shuffle_epi32,
};

use cluster_matmul_core::{sumdotp4, DotKernel};

/// AVX2 dot kernel.
///
/// Sign-extends sixteen `i8` lanes to `i16` and reduces them pairwise into
/// eight `i32` lanes with `vpmaddwd`. Trailing groups of four go through
/// [`sumdotp4`]. Callers must only select it when AVX2 is available (see
/// [`crate::simd_level`]).
#[derive(Debug, Default, Clone, Copy)]
pub struct Avx2MaddKernel;

impl DotKernel for Avx2MaddKernel {
    const WIDTH: usize = 4;

    unsafe fn dot(&self, a: *const i8, b: *const i8, len: usize) -> i32 {
        dot_avx2(a, b, len)
    }
}

#[target_feature(enable = "avx2")]
unsafe fn dot_avx2(a: *const i8, b: *const i8, len: usize) -> i32 {
    debug_assert_eq!(len % 4, 0);
    let body = len - len % 16;

    // Pair sums of sign-extended i8 products stay within i32.
    let mut acc = _mm256_setzero_si256();
    let mut k = 0;
    while k < body {
        let va = _mm256_cvtepi8_epi16(_mm_loadu_si128(a.add(k) as *const __m128i));
        let vb = _mm256_cvtepi8_epi16(_mm_loadu_si128(b.add(k) as *const __m128i));
        acc = _mm256_add_epi32(acc, _mm256_madd_epi16(va, vb));
        k += 16;
    }

    let mut sum = hsum_epi32(acc);
    while k < len {
        let ta = (a.add(k) as *const [i8; 4]).read_unaligned();
        let tb = (b.add(k) as *const [i8; 4]).read_unaligned();
        sum = sumdotp4(ta, tb, sum);
        k += 4;
    }
    sum
}

/// Wrapping sum of the eight `i32` lanes.
#[target_feature(enable = "avx2")]
#[inline]
unsafe fn hsum_epi32(v: __m256i) -> i32 {
    let sum128 = _mm_add_epi32(_mm256_castsi256_si128(v), _mm256_extracti128_si256(v, 1));
    let sum64 = _mm_add_epi32(sum128, _mm_shuffle_epi32(sum128, 0b10_11_00_01));
    let sum32 = _mm_add_epi32(sum64, _mm_shuffle_epi32(sum64, 0b00_00_10_10));
    _mm_cvtsi128_si32(sum32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{simd_level, SimdLevel};
    use cluster_matmul_core::ScalarDotKernel;

    fn has_avx2() -> bool {
        matches!(simd_level(), SimdLevel::Avx2 | SimdLevel::Avx512)
    }

    #[test]
    fn test_avx2_matches_scalar() {
        if !has_avx2() {
            return;
        }
        // Whole 16-lane steps, and lengths leaving one to three 4-lane tails
        for len in [4usize, 12, 16, 20, 28, 44, 64] {
            let a: Vec<i8> = (0..len).map(|i| (i * 29 % 256) as u8 as i8).collect();
            let b: Vec<i8> = (0..len).map(|i| (i * 53 % 256) as u8 as i8).collect();
            unsafe {
                assert_eq!(
                    Avx2MaddKernel.dot(a.as_ptr(), b.as_ptr(), len),
                    ScalarDotKernel.dot(a.as_ptr(), b.as_ptr(), len),
                    "len {len}"
                );
            }
        }
    }

    #[test]
    fn test_avx2_all_ones() {
        if !has_avx2() {
            return;
        }
        let a = [1i8; 64];
        let sum = unsafe { Avx2MaddKernel.dot(a.as_ptr(), a.as_ptr(), 64) };
        assert_eq!(sum, 64);
    }

    #[test]
    fn test_avx2_extremes() {
        if !has_avx2() {
            return;
        }
        let a = [-128i8; 64];
        let sum = unsafe { Avx2MaddKernel.dot(a.as_ptr(), a.as_ptr(), 64) };
        assert_eq!(sum, 64 * 16384);

        let b = [127i8; 64];
        let sum = unsafe { Avx2MaddKernel.dot(a.as_ptr(), b.as_ptr(), 64) };
        assert_eq!(sum, 64 * -16256);
    }
}
