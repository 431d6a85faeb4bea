use cluster_matmul_core::DotKernel;
use wide::i32x4;

/// Four-lane dot kernel built on `wide::i32x4`.
///
/// Each group of four `i8` lanes is sign-extended into one vector and
/// multiplied lane-wise; lane partial sums are folded at the end. Maps
/// onto SSE2 on x86-64 and NEON on AArch64, with a scalar fallback
/// elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct WideDot4Kernel;

#[inline(always)]
unsafe fn load4(p: *const i8) -> i32x4 {
    let v = (p as *const [i8; 4]).read_unaligned();
    i32x4::from([v[0] as i32, v[1] as i32, v[2] as i32, v[3] as i32])
}

#[inline(always)]
fn fold4(acc: i32x4) -> i32 {
    acc.to_array()
        .iter()
        .fold(0i32, |sum, &lane| sum.wrapping_add(lane))
}

impl DotKernel for WideDot4Kernel {
    const WIDTH: usize = 4;

    unsafe fn dot(&self, a: *const i8, b: *const i8, len: usize) -> i32 {
        debug_assert_eq!(len % Self::WIDTH, 0);
        let mut acc = i32x4::splat(0);
        for k in (0..len).step_by(4) {
            acc = acc + load4(a.add(k)) * load4(b.add(k));
        }
        fold4(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cluster_matmul_core::{ScalarDotKernel, SumDotp4Kernel};

    #[test]
    fn test_wide_dot4_known() {
        let a: [i8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];
        let b: [i8; 8] = [1, 1, 1, 1, -1, -1, -1, -1];
        let sum = unsafe { WideDot4Kernel.dot(a.as_ptr(), b.as_ptr(), 8) };
        assert_eq!(sum, 10 - 26);
    }

    #[test]
    fn test_wide_dot4_matches_scalar() {
        let a: Vec<i8> = (0..64).map(|i| (i * 37 % 256 - 128) as i8).collect();
        let b: Vec<i8> = (0..64).map(|i| (i * 11 % 256 - 128) as i8).collect();
        unsafe {
            let expected = ScalarDotKernel.dot(a.as_ptr(), b.as_ptr(), 64);
            assert_eq!(WideDot4Kernel.dot(a.as_ptr(), b.as_ptr(), 64), expected);
            assert_eq!(SumDotp4Kernel.dot(a.as_ptr(), b.as_ptr(), 64), expected);
        }
    }

    #[test]
    fn test_wide_dot4_extremes() {
        let a = [-128i8; 16];
        let b = [-128i8; 16];
        let sum = unsafe { WideDot4Kernel.dot(a.as_ptr(), b.as_ptr(), 16) };
        assert_eq!(sum, 16 * 16384);
    }

    #[test]
    fn test_wide_dot4_default() {
        let kernel = WideDot4Kernel::default();
        assert_eq!(<WideDot4Kernel as DotKernel>::WIDTH, 4);
        let _ = kernel;
    }
}
