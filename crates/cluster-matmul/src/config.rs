//! Benchmark configuration.

use cluster_matmul_core::MATRIX_SIZE;
use cluster_matmul_simd::DotKernelChoice;

use crate::bench::KernelKind;
use crate::error::{MatmulError, Result};
use crate::mat::FillPattern;
use crate::platform::{CLUSTER_MAX_FREQ_HZ, CLUSTER_NB_CORES, FC_MAX_FREQ_HZ, VOLTAGE_MAX_MV};

/// Settings of one benchmark run.
///
/// The defaults reproduce the reference setup: a 64x64 multiply of
/// all-ones matrices on an 8-core cluster at 1.2 V, fabric controller
/// at 250 MHz and cluster at 175 MHz.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Matrix dimension `n`.
    pub matrix_size: usize,
    /// Cluster cores; `0` means every available core.
    pub nb_cores: usize,
    /// Supply voltage in mV.
    pub voltage_mv: u32,
    /// Fabric controller frequency in Hz.
    pub fc_freq_hz: u32,
    /// Cluster frequency in Hz.
    pub cluster_freq_hz: u32,
    /// Operand initialisation.
    pub pattern: FillPattern,
    /// Dot kernel override; `None` picks the best for the CPU.
    pub dot_kernel: Option<DotKernelChoice>,
    /// Refill `B` between the two kernels. When false, the second kernel
    /// runs on whatever the first one left in `B`.
    pub reinit_between_runs: bool,
    /// Compare each result against a single-threaded reference.
    pub verify: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            matrix_size: MATRIX_SIZE,
            nb_cores: CLUSTER_NB_CORES,
            voltage_mv: VOLTAGE_MAX_MV,
            fc_freq_hz: FC_MAX_FREQ_HZ,
            cluster_freq_hz: CLUSTER_MAX_FREQ_HZ,
            pattern: FillPattern::Ones,
            dot_kernel: None,
            reinit_between_runs: true,
            verify: true,
        }
    }
}

impl BenchConfig {
    /// Check that every kernel in `kernels` can run this configuration.
    ///
    /// The lane-group width only constrains the transpose + dot-product
    /// kernel; the naive kernel takes any size.
    pub fn validate(&self, kernels: &[KernelKind]) -> Result<()> {
        if self.matrix_size == 0 {
            return Err(MatmulError::Config("matrix size must be non-zero".into()));
        }
        let width = self.dot_kernel.map_or(4, |k| k.width());
        if kernels.contains(&KernelKind::TransposedDotp) && self.matrix_size % width != 0 {
            return Err(MatmulError::NotDivisible {
                n: self.matrix_size,
                width,
            });
        }
        if self.fc_freq_hz == 0 || self.cluster_freq_hz == 0 {
            return Err(MatmulError::Config("frequencies must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = BenchConfig::default();
        assert_eq!(config.matrix_size, 64);
        assert_eq!(config.nb_cores, 8);
        assert_eq!(config.voltage_mv, 1200);
        assert_eq!(config.fc_freq_hz, 250_000_000);
        assert_eq!(config.cluster_freq_hz, 175_000_000);
        assert_eq!(config.pattern, FillPattern::Ones);
        assert!(config.reinit_between_runs);
        assert!(config.validate(&KernelKind::ALL).is_ok());
    }

    #[test]
    fn test_validate_size() {
        let config = BenchConfig {
            matrix_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(&[KernelKind::Naive]),
            Err(MatmulError::Config(_))
        ));

        let config = BenchConfig {
            matrix_size: 30,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(&KernelKind::ALL),
            Err(MatmulError::NotDivisible { n: 30, width: 4 })
        ));
        // The naive kernel alone has no lane-group constraint.
        assert!(config.validate(&[KernelKind::Naive]).is_ok());

        let config = BenchConfig {
            matrix_size: 30,
            dot_kernel: Some(DotKernelChoice::Scalar),
            ..Default::default()
        };
        assert!(config.validate(&KernelKind::ALL).is_ok());
    }

    #[test]
    fn test_validate_frequency() {
        let config = BenchConfig {
            cluster_freq_hz: 0,
            ..Default::default()
        };
        assert!(config.validate(&KernelKind::ALL).is_err());
    }
}
