/// Trait for int8 dot-product kernels.
///
/// A dot kernel reduces two equal-length `i8` vectors into a wrapping
/// 32-bit sum. Lanes are consumed in groups of `WIDTH` consecutive
/// elements, in index order. Every implementation must return the same
/// bits as [`ScalarDotKernel`] for the same inputs.
pub trait DotKernel: Sync {
    /// Number of lanes reduced per step.
    const WIDTH: usize;

    /// Compute `sum(a[k] * b[k])` for `k` in `0..len`.
    ///
    /// # Safety
    /// - `a` and `b` must be valid for `len` reads
    /// - `len` must be a multiple of `Self::WIDTH`
    unsafe fn dot(&self, a: *const i8, b: *const i8, len: usize) -> i32;
}

/// Four-lane signed sum-of-dot-products: `acc + a0*b0 + a1*b1 + a2*b2 + a3*b3`.
///
/// Portable equivalent of the `sumdotp4` cluster intrinsic.
#[inline(always)]
pub fn sumdotp4(a: [i8; 4], b: [i8; 4], acc: i32) -> i32 {
    acc.wrapping_add(a[0] as i32 * b[0] as i32)
        .wrapping_add(a[1] as i32 * b[1] as i32)
        .wrapping_add(a[2] as i32 * b[2] as i32)
        .wrapping_add(a[3] as i32 * b[3] as i32)
}

/// One lane at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarDotKernel;

impl DotKernel for ScalarDotKernel {
    const WIDTH: usize = 1;

    unsafe fn dot(&self, a: *const i8, b: *const i8, len: usize) -> i32 {
        let mut sum = 0i32;
        for k in 0..len {
            sum = sum.wrapping_add(*a.add(k) as i32 * *b.add(k) as i32);
        }
        sum
    }
}

/// Groups of four lanes reduced through [`sumdotp4`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SumDotp4Kernel;

impl DotKernel for SumDotp4Kernel {
    const WIDTH: usize = 4;

    unsafe fn dot(&self, a: *const i8, b: *const i8, len: usize) -> i32 {
        debug_assert_eq!(len % Self::WIDTH, 0);
        let a = a as *const [i8; 4];
        let b = b as *const [i8; 4];
        let mut sum = 0i32;
        for g in 0..len / 4 {
            sum = sumdotp4(a.add(g).read_unaligned(), b.add(g).read_unaligned(), sum);
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sumdotp4() {
        assert_eq!(sumdotp4([1, 2, 3, 4], [5, 6, 7, 8], 10), 10 + 5 + 12 + 21 + 32);
        assert_eq!(sumdotp4([-128, 127, -1, 0], [-128, 127, 1, 9], 0), 16384 + 16129 - 1);
    }

    #[test]
    fn test_scalar_kernel() {
        let a: [i8; 3] = [1, -2, 3];
        let b: [i8; 3] = [4, 5, -6];
        let sum = unsafe { ScalarDotKernel.dot(a.as_ptr(), b.as_ptr(), 3) };
        assert_eq!(sum, 4 - 10 - 18);
    }

    #[test]
    fn test_sumdotp4_kernel_matches_scalar() {
        let a: Vec<i8> = (0..64).map(|i| (i * 7 % 255 - 127) as i8).collect();
        let b: Vec<i8> = (0..64).map(|i| (i * 13 % 255 - 127) as i8).collect();
        let (scalar, grouped) = unsafe {
            (
                ScalarDotKernel.dot(a.as_ptr(), b.as_ptr(), 64),
                SumDotp4Kernel.dot(a.as_ptr(), b.as_ptr(), 64),
            )
        };
        assert_eq!(scalar, grouped);
    }

    #[test]
    fn test_empty() {
        let sum = unsafe { SumDotp4Kernel.dot(std::ptr::null(), std::ptr::null(), 0) };
        assert_eq!(sum, 0);
    }

    #[test]
    fn test_widths() {
        assert_eq!(<ScalarDotKernel as DotKernel>::WIDTH, 1);
        assert_eq!(<SumDotp4Kernel as DotKernel>::WIDTH, 4);
    }
}
