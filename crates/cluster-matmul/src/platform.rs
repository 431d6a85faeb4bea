//! Platform bring-up: supply voltage, clock domains and cluster lifecycle.

use std::fmt;

use crate::cluster::Cluster;
use crate::error::{MatmulError, Result};

/// Lowest supply voltage the host platform accepts.
pub const VOLTAGE_MIN_MV: u32 = 1000;
/// Highest supply voltage the host platform accepts.
pub const VOLTAGE_MAX_MV: u32 = 1200;
/// Fabric controller ceiling at [`VOLTAGE_MAX_MV`].
pub const FC_MAX_FREQ_HZ: u32 = 250_000_000;
/// Cluster ceiling at [`VOLTAGE_MAX_MV`].
pub const CLUSTER_MAX_FREQ_HZ: u32 = 175_000_000;
/// Frequency both domains run at before any configuration.
pub const BOOT_FREQ_HZ: u32 = 50_000_000;
/// Cores of the reference cluster.
pub const CLUSTER_NB_CORES: usize = 8;

/// Clock domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreqDomain {
    /// Fabric controller.
    Fc,
    /// Compute cluster.
    Cluster,
}

impl fmt::Display for FreqDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreqDomain::Fc => f.write_str("Fabric Controller"),
            FreqDomain::Cluster => f.write_str("Cluster"),
        }
    }
}

/// Cluster device configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterConf {
    /// Cluster identifier.
    pub id: u32,
    /// Number of cores to bring up; `0` means every available core.
    pub nb_cores: usize,
}

impl Default for ClusterConf {
    fn default() -> Self {
        Self {
            id: 0,
            nb_cores: CLUSTER_NB_CORES,
        }
    }
}

/// Platform services consumed by the benchmark orchestrator.
pub trait Platform {
    /// Apply a supply voltage.
    fn set_voltage(&mut self, mv: u32) -> Result<()>;

    /// Request a domain frequency; returns the frequency actually applied.
    fn set_frequency(&mut self, domain: FreqDomain, hz: u32) -> u32;

    /// Current frequency of a domain.
    fn frequency(&self, domain: FreqDomain) -> u32;

    /// Open a cluster device.
    fn open_cluster(&mut self, conf: &ClusterConf) -> Result<Cluster>;

    /// Release a cluster device.
    fn close_cluster(&mut self, cluster: Cluster);
}

/// Platform backed by the host CPU.
///
/// Cluster cores map onto host threads. Voltage and frequencies are
/// tracked and validated but have no physical effect.
#[derive(Debug, Clone)]
pub struct HostPlatform {
    voltage_mv: u32,
    fc_hz: u32,
    cluster_hz: u32,
    available_cores: usize,
    max_cores: usize,
    open_clusters: usize,
}

impl HostPlatform {
    /// Host platform sized after the machine.
    ///
    /// A cluster may have as many cores as the host has threads, and at
    /// least [`CLUSTER_NB_CORES`] even on smaller hosts.
    pub fn new() -> Self {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let mut platform = Self::with_max_cores(available.max(CLUSTER_NB_CORES));
        platform.available_cores = available;
        platform
    }

    /// Host platform allowing at most `max_cores` cluster cores.
    pub fn with_max_cores(max_cores: usize) -> Self {
        Self {
            voltage_mv: VOLTAGE_MAX_MV,
            fc_hz: BOOT_FREQ_HZ,
            cluster_hz: BOOT_FREQ_HZ,
            available_cores: max_cores,
            max_cores,
            open_clusters: 0,
        }
    }

    /// Current supply voltage.
    pub fn voltage(&self) -> u32 {
        self.voltage_mv
    }

    /// Number of clusters currently open.
    pub fn open_clusters(&self) -> usize {
        self.open_clusters
    }

    /// Highest frequency of `domain` at the current voltage.
    ///
    /// Scales linearly from the ceiling at [`VOLTAGE_MAX_MV`].
    pub fn max_frequency(&self, domain: FreqDomain) -> u32 {
        let ceiling = match domain {
            FreqDomain::Fc => FC_MAX_FREQ_HZ,
            FreqDomain::Cluster => CLUSTER_MAX_FREQ_HZ,
        };
        (ceiling as u64 * self.voltage_mv as u64 / VOLTAGE_MAX_MV as u64) as u32
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HostPlatform {
    fn set_voltage(&mut self, mv: u32) -> Result<()> {
        if !(VOLTAGE_MIN_MV..=VOLTAGE_MAX_MV).contains(&mv) {
            return Err(MatmulError::VoltageSet {
                mv,
                min: VOLTAGE_MIN_MV,
                max: VOLTAGE_MAX_MV,
            });
        }
        self.voltage_mv = mv;
        // Lowering the voltage lowers the ceilings of running domains.
        self.fc_hz = self.fc_hz.min(self.max_frequency(FreqDomain::Fc));
        self.cluster_hz = self.cluster_hz.min(self.max_frequency(FreqDomain::Cluster));
        log::debug!("supply voltage set to {mv} mV");
        Ok(())
    }

    fn set_frequency(&mut self, domain: FreqDomain, hz: u32) -> u32 {
        let max = self.max_frequency(domain);
        let applied = hz.min(max);
        if applied < hz {
            log::warn!(
                "{domain} frequency {hz} Hz clamped to {applied} Hz at {} mV",
                self.voltage_mv
            );
        }
        match domain {
            FreqDomain::Fc => self.fc_hz = applied,
            FreqDomain::Cluster => self.cluster_hz = applied,
        }
        applied
    }

    fn frequency(&self, domain: FreqDomain) -> u32 {
        match domain {
            FreqDomain::Fc => self.fc_hz,
            FreqDomain::Cluster => self.cluster_hz,
        }
    }

    fn open_cluster(&mut self, conf: &ClusterConf) -> Result<Cluster> {
        let nb_cores = if conf.nb_cores == 0 {
            self.available_cores
        } else {
            conf.nb_cores
        };
        if nb_cores == 0 || nb_cores > self.max_cores {
            return Err(MatmulError::ClusterOpen(format!(
                "cluster {} requested {nb_cores} cores, host provides {}",
                conf.id, self.max_cores
            )));
        }
        let cluster = Cluster::new(nb_cores)?;
        self.open_clusters += 1;
        log::info!(
            "cluster {} opened with {nb_cores} cores, dot kernel {}",
            conf.id,
            cluster.dot_kernel()
        );
        Ok(cluster)
    }

    fn close_cluster(&mut self, cluster: Cluster) {
        self.open_clusters = self.open_clusters.saturating_sub(1);
        log::info!("cluster with {} cores closed", cluster.nb_cores());
    }
}
