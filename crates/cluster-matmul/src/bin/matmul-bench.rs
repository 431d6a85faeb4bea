//! Cluster matmul benchmark.
//!
//! Brings up the host platform, then times the naive and the
//! transpose + dot-product multiply back to back.

use std::process::ExitCode;

use clap::Parser;
use cluster_matmul::bench::exit_code;
use cluster_matmul::platform::{
    CLUSTER_MAX_FREQ_HZ, CLUSTER_NB_CORES, FC_MAX_FREQ_HZ, VOLTAGE_MAX_MV,
};
use cluster_matmul::{
    run_kernels, version_info, BenchConfig, DotKernelChoice, FillPattern, HostCycleCounter,
    HostPlatform, KernelKind, MATRIX_SIZE,
};

const MHZ: u32 = 1_000_000;

/// Parallel int8 matmul: naive blocked vs transpose + dot product
#[derive(Parser, Debug)]
#[command(name = "matmul-bench")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Matrix dimension (multiple of 4 for the dotp kernel)
    #[arg(short = 'n', long, default_value_t = MATRIX_SIZE)]
    size: usize,

    /// Cluster cores (0 = all available)
    #[arg(short, long, default_value_t = CLUSTER_NB_CORES)]
    cores: usize,

    /// Supply voltage in mV
    #[arg(long, default_value_t = VOLTAGE_MAX_MV)]
    voltage_mv: u32,

    /// Fabric controller frequency in MHz
    #[arg(long, default_value_t = FC_MAX_FREQ_HZ / MHZ)]
    fc_mhz: u32,

    /// Cluster frequency in MHz
    #[arg(long, default_value_t = CLUSTER_MAX_FREQ_HZ / MHZ)]
    cluster_mhz: u32,

    /// Operand fill pattern: ones or ramp
    #[arg(short, long, default_value = "ones")]
    pattern: FillPattern,

    /// Kernels to run, in order: naive, dotp
    #[arg(short, long, value_delimiter = ',', default_value = "naive,dotp")]
    kernels: Vec<KernelKind>,

    /// Dot kernel: scalar, sumdotp4, wide4, avx2 (default: detect)
    #[arg(long, value_parser = parse_dot_kernel)]
    dot_kernel: Option<DotKernelChoice>,

    /// Keep B as the previous kernel left it instead of refilling it
    #[arg(long)]
    no_reinit: bool,

    /// Skip verification against the reference product
    #[arg(long)]
    no_verify: bool,
}

fn parse_dot_kernel(s: &str) -> Result<DotKernelChoice, String> {
    match s.to_ascii_lowercase().as_str() {
        "scalar" => Ok(DotKernelChoice::Scalar),
        "sumdotp4" => Ok(DotKernelChoice::SumDotp4),
        "wide4" => Ok(DotKernelChoice::Wide4),
        "avx2" => Ok(DotKernelChoice::Avx2),
        other => Err(format!("unknown dot kernel '{other}'")),
    }
}

impl Cli {
    fn config(&self) -> BenchConfig {
        BenchConfig {
            matrix_size: self.size,
            nb_cores: self.cores,
            voltage_mv: self.voltage_mv,
            fc_freq_hz: self.fc_mhz.saturating_mul(MHZ),
            cluster_freq_hz: self.cluster_mhz.saturating_mul(MHZ),
            pattern: self.pattern,
            dot_kernel: self.dot_kernel,
            reinit_between_runs: !self.no_reinit,
            verify: !self.no_verify,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    println!("\n\n\t *** Cluster MatMul & Frequency Test ***\n");
    log::debug!("{}", version_info());
    log::debug!("timing unit: {}", HostCycleCounter::unit());

    let config = cli.config();
    let mut platform = HostPlatform::new();
    let mut counter = HostCycleCounter::new();

    let outcome = run_kernels(&mut platform, &mut counter, &config, &cli.kernels);
    let summary = match &outcome {
        Ok(summary) => summary,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::from(exit_code(&outcome));
        }
    };

    println!(
        "{} cores, {}x{} matrices, dot kernel {}",
        summary.nb_cores, summary.matrix_size, summary.matrix_size, summary.dot_kernel
    );
    for report in &summary.reports {
        println!("{}: {report}", report.kernel);
    }

    let errors = summary.errors();
    if errors > 0 {
        println!("Test failed with {errors} errors");
    } else {
        println!("Test success !");
    }
    ExitCode::from(exit_code(&outcome))
}
