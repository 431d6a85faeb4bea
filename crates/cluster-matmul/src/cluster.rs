use cluster_matmul_core::{
    matmul_naive, matmul_transposed_dotp, team_fork, transpose_in_place, DotKernel,
    SharedMatrices, TeamContext,
};
use cluster_matmul_simd::{matmul_transposed_with_choice, DotKernelChoice};

use crate::error::{MatmulError, Result};
use crate::mat::{MatI32, MatI8};

/// A team of worker cores that kernels are forked onto.
///
/// Every multiply borrows `A` shared and `B`/`C` exclusively for the
/// duration of the fork, so the raw fan-out inside never aliases
/// caller-visible data.
///
/// # Example
///
/// ```
/// use cluster_matmul::{Cluster, MatI32, MatI8};
///
/// let cluster = Cluster::new(4).unwrap();
/// let a = MatI8::filled(64, 1);
/// let mut b = MatI8::filled(64, 1);
/// let mut c = MatI32::zeros(64);
///
/// cluster.matmul_naive(&a, &b, &mut c).unwrap();
/// assert!(c.as_slice().iter().all(|&v| v == 64));
///
/// cluster.matmul_transposed(&a, &mut b, &mut c).unwrap();
/// assert!(c.as_slice().iter().all(|&v| v == 64));
/// ```
#[derive(Debug, Clone)]
pub struct Cluster {
    nb_cores: usize,
    dot_kernel: DotKernelChoice,
}

impl Cluster {
    /// Create a cluster of `nb_cores` workers using the best dot kernel
    /// for the running CPU.
    pub fn new(nb_cores: usize) -> Result<Self> {
        if nb_cores == 0 {
            return Err(MatmulError::InvalidWorkerCount(nb_cores));
        }
        Ok(Self {
            nb_cores,
            dot_kernel: DotKernelChoice::detect(),
        })
    }

    /// Use `choice` for [`Cluster::matmul_transposed`].
    ///
    /// Unsupported SIMD choices fall back to a portable kernel at run time.
    pub fn with_dot_kernel(mut self, choice: DotKernelChoice) -> Self {
        self.dot_kernel = choice;
        self
    }

    /// Number of worker cores.
    #[inline]
    pub fn nb_cores(&self) -> usize {
        self.nb_cores
    }

    /// Dot kernel used by [`Cluster::matmul_transposed`].
    #[inline]
    pub fn dot_kernel(&self) -> DotKernelChoice {
        self.dot_kernel
    }

    /// Run `task` on every core of the cluster and wait for all of them.
    pub fn fork<F>(&self, task: F)
    where
        F: Fn(&TeamContext<'_>) + Sync,
    {
        log::trace!("forking {} cores", self.nb_cores);
        team_fork(self.nb_cores, task);
    }

    /// Naive blocked multiply `C = A * B`.
    pub fn matmul_naive(&self, a: &MatI8, b: &MatI8, c: &mut MatI32) -> Result<()> {
        check_shapes(a, b, c)?;
        // The naive kernel never writes B.
        let mats = unsafe {
            SharedMatrices::new(
                a.as_slice().as_ptr(),
                b.as_slice().as_ptr() as *mut i8,
                c.as_mut_slice().as_mut_ptr(),
                a.n(),
            )
        };
        self.fork(|ctx| unsafe { matmul_naive(ctx, &mats) });
        Ok(())
    }

    /// Transpose + dot-product multiply `C = A * B` with the cluster's
    /// dot kernel. On return `b` holds `Bᵀ`.
    pub fn matmul_transposed(&self, a: &MatI8, b: &mut MatI8, c: &mut MatI32) -> Result<()> {
        check_shapes(a, b, c)?;
        check_width(a.n(), self.dot_kernel.width())?;
        let choice = self.dot_kernel;
        let mats = shared(a, b, c);
        self.fork(|ctx| unsafe { matmul_transposed_with_choice(ctx, &mats, choice) });
        Ok(())
    }

    /// Transpose + dot-product multiply with an explicit [`DotKernel`].
    /// On return `b` holds `Bᵀ`.
    pub fn matmul_transposed_with<K: DotKernel>(
        &self,
        a: &MatI8,
        b: &mut MatI8,
        c: &mut MatI32,
        kernel: &K,
    ) -> Result<()> {
        check_shapes(a, b, c)?;
        check_width(a.n(), K::WIDTH)?;
        let mats = shared(a, b, c);
        self.fork(|ctx| unsafe { matmul_transposed_dotp(ctx, &mats, kernel) });
        Ok(())
    }

    /// Transpose `b` in place across the cluster.
    pub fn transpose_in_place(&self, b: &mut MatI8) {
        let n = b.n();
        let ptr = SendPtr(b.as_mut_slice().as_mut_ptr());
        self.fork(|ctx| unsafe { transpose_in_place(ctx, ptr.get(), n) });
    }
}

struct SendPtr(*mut i8);

// SAFETY: used only by `transpose_in_place`, whose workers touch
// disjoint element pairs.
unsafe impl Sync for SendPtr {}

impl SendPtr {
    fn get(&self) -> *mut i8 {
        self.0
    }
}

fn shared(a: &MatI8, b: &mut MatI8, c: &mut MatI32) -> SharedMatrices {
    // SAFETY: the borrows outlive the fork that uses the bundle.
    unsafe {
        SharedMatrices::new(
            a.as_slice().as_ptr(),
            b.as_mut_slice().as_mut_ptr(),
            c.as_mut_slice().as_mut_ptr(),
            a.n(),
        )
    }
}

fn check_shapes(a: &MatI8, b: &MatI8, c: &MatI32) -> Result<()> {
    if a.n() != b.n() || a.n() != c.n() {
        return Err(MatmulError::DimensionMismatch(format!(
            "A is {0}x{0}, B is {1}x{1}, C is {2}x{2}",
            a.n(),
            b.n(),
            c.n()
        )));
    }
    Ok(())
}

fn check_width(n: usize, width: usize) -> Result<()> {
    if n % width != 0 {
        return Err(MatmulError::NotDivisible { n, width });
    }
    Ok(())
}
