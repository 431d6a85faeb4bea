use std::sync::Barrier;
use std::thread;

/// Per-worker view of a forked team.
///
/// Handed to every worker by [`team_fork`]. All workers of a fork share
/// one cyclic barrier, so every worker must call [`TeamContext::barrier`]
/// the same number of times or the team deadlocks.
pub struct TeamContext<'a> {
    core_id: usize,
    nb_cores: usize,
    barrier: &'a Barrier,
}

impl<'a> TeamContext<'a> {
    /// Index of this worker in `[0, nb_cores)`.
    #[inline]
    pub fn core_id(&self) -> usize {
        self.core_id
    }

    /// Number of workers in the team.
    #[inline]
    pub fn nb_cores(&self) -> usize {
        self.nb_cores
    }

    /// Block until every worker of the team has reached this point.
    #[inline]
    pub fn barrier(&self) {
        self.barrier.wait();
    }
}

/// Run `task` on `nb_cores` workers and wait for all of them.
///
/// Worker 0 runs on the calling thread, the remaining workers on scoped
/// threads. The call returns only after every worker has returned.
///
/// # Panics
/// Panics if `nb_cores == 0`, or if any worker panics.
pub fn team_fork<F>(nb_cores: usize, task: F)
where
    F: Fn(&TeamContext<'_>) + Sync,
{
    assert!(nb_cores > 0, "cannot fork a team of zero workers");
    let barrier = Barrier::new(nb_cores);
    let task = &task;
    let barrier = &barrier;

    thread::scope(|s| {
        for core_id in 1..nb_cores {
            s.spawn(move || {
                let ctx = TeamContext {
                    core_id,
                    nb_cores,
                    barrier,
                };
                task(&ctx);
            });
        }
        let ctx = TeamContext {
            core_id: 0,
            nb_cores,
            barrier,
        };
        task(&ctx);
    });
}

/// Raw views of the three matrices of one multiply, shared by a team.
///
/// `a` is read-only, `b` may be transposed in place and `c` is written
/// by row. All are `n x n`, row-major. Kernels receiving this type rely
/// on the row partition to keep writers disjoint.
#[derive(Debug, Clone, Copy)]
pub struct SharedMatrices {
    pub a: *const i8,
    pub b: *mut i8,
    pub c: *mut i32,
    pub n: usize,
}

// SAFETY: the pointers are only dereferenced by kernels that partition
// writes by row and separate dependent phases with a team barrier.
unsafe impl Send for SharedMatrices {}
unsafe impl Sync for SharedMatrices {}

impl SharedMatrices {
    /// Bundle raw matrix pointers.
    ///
    /// # Safety
    /// `a` and `b` must be valid for `n * n` elements and `c` for `n * n`
    /// accumulators for as long as any kernel uses the bundle, and no
    /// other code may access them meanwhile.
    pub unsafe fn new(a: *const i8, b: *mut i8, c: *mut i32, n: usize) -> Self {
        Self { a, b, c, n }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_every_worker_runs_once() {
        let seen = Mutex::new(Vec::new());
        team_fork(5, |ctx| {
            assert_eq!(ctx.nb_cores(), 5);
            seen.lock().unwrap().push(ctx.core_id());
        });
        let mut seen = seen.into_inner().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_barrier_orders_phases() {
        let arrived = AtomicUsize::new(0);
        team_fork(4, |ctx| {
            arrived.fetch_add(1, Ordering::SeqCst);
            ctx.barrier();
            // Nobody passes the barrier before everyone arrived.
            assert_eq!(arrived.load(Ordering::SeqCst), 4);
            ctx.barrier();
        });
    }

    #[test]
    fn test_single_worker_runs_on_caller() {
        let caller = thread::current().id();
        team_fork(1, |ctx| {
            assert_eq!(ctx.core_id(), 0);
            assert_eq!(thread::current().id(), caller);
            ctx.barrier();
        });
    }

    #[test]
    #[should_panic(expected = "zero workers")]
    fn test_zero_workers() {
        team_fork(0, |_| {});
    }
}
