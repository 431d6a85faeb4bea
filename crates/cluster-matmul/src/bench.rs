//! Benchmark orchestrator.
//!
//! Brings the platform up, allocates and fills the operands, then forks
//! each kernel once onto the cluster while a cycle counter runs.

use std::fmt;
use std::str::FromStr;

use cluster_matmul_simd::{simd_level, DotKernelChoice};

use crate::cluster::Cluster;
use crate::config::BenchConfig;
use crate::error::Result;
use crate::mat::{MatI32, MatI8};
use crate::perf::{ops_per_cycle, CycleCounter, HostCycleCounter};
use crate::platform::{ClusterConf, FreqDomain, Platform};

/// Kernels the benchmark can time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelKind {
    /// Naive blocked multiply.
    Naive,
    /// In-place transpose followed by dot products.
    TransposedDotp,
}

impl KernelKind {
    /// Reference order: naive first, then transpose + dot product.
    pub const ALL: [KernelKind; 2] = [KernelKind::Naive, KernelKind::TransposedDotp];

    /// Whether the kernel leaves `B` modified.
    pub fn mutates_b(&self) -> bool {
        matches!(self, KernelKind::TransposedDotp)
    }

    fn banner(&self) -> &'static str {
        match self {
            KernelKind::Naive => "Run a Parallel Matrix Multiplication",
            KernelKind::TransposedDotp => "Run a Parallel Matrix Multiplication w/ intrinsics",
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelKind::Naive => f.write_str("naive"),
            KernelKind::TransposedDotp => f.write_str("dotp"),
        }
    }
}

impl FromStr for KernelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "naive" => Ok(KernelKind::Naive),
            "dotp" | "transposed" => Ok(KernelKind::TransposedDotp),
            other => Err(format!("unknown kernel '{other}' (expected naive or dotp)")),
        }
    }
}

/// Timing and verification of one kernel run.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelReport {
    pub kernel: KernelKind,
    pub cycles: u64,
    pub ops_per_cycle: f64,
    /// Sum of all elements of `C`.
    pub checksum: i64,
    /// Elements differing from the reference; `None` when not verified.
    pub mismatches: Option<usize>,
}

impl fmt::Display for KernelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Computation done in {} cycles at {:.2} operations per cycle....",
            self.cycles, self.ops_per_cycle
        )
    }
}

/// Outcome of a whole benchmark.
#[derive(Debug, Clone)]
pub struct BenchSummary {
    pub matrix_size: usize,
    pub nb_cores: usize,
    pub fc_freq_hz: u32,
    pub cluster_freq_hz: u32,
    pub dot_kernel: DotKernelChoice,
    pub reports: Vec<KernelReport>,
}

impl BenchSummary {
    /// Total mismatching elements over all verified runs.
    pub fn errors(&self) -> usize {
        self.reports.iter().filter_map(|r| r.mismatches).sum()
    }

    /// Report of the first run of `kernel`.
    pub fn report(&self, kernel: KernelKind) -> Option<&KernelReport> {
        self.reports.iter().find(|r| r.kernel == kernel)
    }

    /// `0` when every verified run matched the reference, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.errors() == 0 {
            0
        } else {
            1
        }
    }
}

/// Process status of a benchmark outcome.
///
/// `0` on success, `255` (`-1`) when platform bring-up failed, `1` on any
/// other error or on verification mismatches.
pub fn exit_code(outcome: &Result<BenchSummary>) -> u8 {
    match outcome {
        Ok(summary) => summary.exit_code(),
        Err(err) => err.exit_code(),
    }
}

/// Library version, SIMD level and the dot kernel picked for this CPU.
pub fn version_info() -> String {
    format!(
        "cluster-matmul v{}\nSIMD level: {}\nDot kernel: {}",
        env!("CARGO_PKG_VERSION"),
        simd_level(),
        DotKernelChoice::detect()
    )
}

/// Run the reference sequence of kernels with the host cycle counter.
pub fn run_benchmark<P: Platform>(
    platform: &mut P,
    config: &BenchConfig,
) -> Result<BenchSummary> {
    run_kernels(platform, &mut HostCycleCounter::new(), config, &KernelKind::ALL)
}

/// Run `kernels` in order on one set of buffers.
///
/// Fails only on platform configuration; kernel errors are reported in
/// the summary as mismatches.
pub fn run_kernels<P, C>(
    platform: &mut P,
    counter: &mut C,
    config: &BenchConfig,
    kernels: &[KernelKind],
) -> Result<BenchSummary>
where
    P: Platform,
    C: CycleCounter,
{
    config.validate(kernels)?;

    platform.set_voltage(config.voltage_mv)?;
    let fc_freq_hz = platform.set_frequency(FreqDomain::Fc, config.fc_freq_hz);
    log::info!("Fabric Controller Frequency {fc_freq_hz} Hz");

    let conf = ClusterConf {
        id: 0,
        nb_cores: config.nb_cores,
    };
    let mut cluster = platform.open_cluster(&conf)?;
    if let Some(choice) = config.dot_kernel {
        cluster = cluster.with_dot_kernel(choice);
    }
    let cluster_freq_hz = platform.set_frequency(FreqDomain::Cluster, config.cluster_freq_hz);
    log::info!("Cluster Frequency {cluster_freq_hz} Hz");

    let nb_cores = cluster.nb_cores();
    let dot_kernel = cluster.dot_kernel();
    let reports = run_on_cluster(&cluster, counter, config, kernels);
    platform.close_cluster(cluster);

    Ok(BenchSummary {
        matrix_size: config.matrix_size,
        nb_cores,
        fc_freq_hz,
        cluster_freq_hz,
        dot_kernel,
        reports: reports?,
    })
}

fn run_on_cluster<C: CycleCounter>(
    cluster: &Cluster,
    counter: &mut C,
    config: &BenchConfig,
    kernels: &[KernelKind],
) -> Result<Vec<KernelReport>> {
    let n = config.matrix_size;
    let a = MatI8::from_pattern(n, config.pattern);
    let mut b = MatI8::from_pattern(n, config.pattern);
    let mut c = MatI32::zeros(n);

    let mut reports = Vec::with_capacity(kernels.len());
    let mut b_dirty = false;
    for &kernel in kernels {
        if b_dirty && config.reinit_between_runs {
            log::debug!("refilling B before {kernel}");
            b.fill(config.pattern);
            b_dirty = false;
        }
        let expected = if config.verify {
            Some(MatI32::reference_product(&a, &b)?)
        } else {
            None
        };

        log::info!("{}", kernel.banner());
        counter.reset();
        counter.start();
        match kernel {
            KernelKind::Naive => cluster.matmul_naive(&a, &b, &mut c)?,
            KernelKind::TransposedDotp => cluster.matmul_transposed(&a, &mut b, &mut c)?,
        }
        counter.stop();
        b_dirty |= kernel.mutates_b();

        let cycles = counter.read();
        let report = KernelReport {
            kernel,
            cycles,
            ops_per_cycle: ops_per_cycle(n, cycles),
            checksum: c.checksum(),
            mismatches: expected.map(|e| c.count_mismatches(&e)),
        };
        log::debug!("{kernel}: {report}");
        if let Some(bad) = report.mismatches.filter(|&m| m > 0) {
            log::warn!("{kernel}: {bad} elements differ from the reference");
        }
        reports.push(report);
    }
    Ok(reports)
}
