//! Active-cycle counter used to time kernels.

use std::time::Instant;

/// Counter of cycles spent between `start` and `stop`.
pub trait CycleCounter {
    /// Clear the accumulated count.
    fn reset(&mut self);
    /// Begin counting.
    fn start(&mut self);
    /// Stop counting and add the elapsed cycles to the total.
    fn stop(&mut self);
    /// Accumulated active cycles.
    fn read(&self) -> u64;
}

/// Host cycle counter.
///
/// Reads the time-stamp counter on x86-64 and monotonic nanoseconds on
/// other targets.
#[derive(Debug, Default)]
pub struct HostCycleCounter {
    started: Option<Stamp>,
    total: u64,
}

#[derive(Debug, Clone, Copy)]
enum Stamp {
    #[cfg(target_arch = "x86_64")]
    Tsc(u64),
    #[cfg_attr(target_arch = "x86_64", allow(dead_code))]
    Clock(Instant),
}

impl Stamp {
    fn now() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            // SAFETY: rdtsc is available on every x86-64 CPU.
            Stamp::Tsc(unsafe { core::arch::x86_64::_rdtsc() })
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            Stamp::Clock(Instant::now())
        }
    }

    fn elapsed(self) -> u64 {
        match self {
            #[cfg(target_arch = "x86_64")]
            Stamp::Tsc(t0) => {
                // SAFETY: see `Stamp::now`.
                let t1 = unsafe { core::arch::x86_64::_rdtsc() };
                t1.saturating_sub(t0)
            }
            Stamp::Clock(t0) => t0.elapsed().as_nanos() as u64,
        }
    }
}

impl HostCycleCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit of [`CycleCounter::read`] on this target.
    pub fn unit() -> &'static str {
        if cfg!(target_arch = "x86_64") {
            "cycles"
        } else {
            "ns"
        }
    }
}

impl CycleCounter for HostCycleCounter {
    fn reset(&mut self) {
        self.started = None;
        self.total = 0;
    }

    fn start(&mut self) {
        self.started = Some(Stamp::now());
    }

    fn stop(&mut self) {
        if let Some(stamp) = self.started.take() {
            self.total += stamp.elapsed();
        }
    }

    fn read(&self) -> u64 {
        self.total
    }
}

/// Operations per cycle for an `n x n x n` multiply.
///
/// Returns `0.0` when no cycles were recorded.
pub fn ops_per_cycle(n: usize, cycles: u64) -> f64 {
    if cycles == 0 {
        return 0.0;
    }
    (n * n * n) as f64 / cycles as f64
}
