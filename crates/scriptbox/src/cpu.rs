//! CPU utilisation sampling.

use std::time::Duration;

use async_trait::async_trait;
use sysinfo::System;

use crate::types::{ScriptError, ScriptResult};

/// A source of whole-system CPU utilisation readings.
#[async_trait]
pub trait CpuSampler: Send {
    /// Measure utilisation over `window` and return it as a percentage in `[0, 100]`.
    ///
    /// Blocks for the duration of the window.
    async fn sample(&mut self, window: Duration) -> ScriptResult<f32>;
}

/// Samples the global CPU usage through `sysinfo`.
pub struct SysinfoSampler {
    system: System,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CpuSampler for SysinfoSampler {
    async fn sample(&mut self, window: Duration) -> ScriptResult<f32> {
        // usage is computed between two refreshes, so bracket the window with them.
        self.system.refresh_cpu_usage();
        tokio::time::sleep(window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)).await;
        self.system.refresh_cpu_usage();

        if self.system.cpus().is_empty() {
            return Err(ScriptError::Sampling("no CPUs reported".to_string()));
        }

        let usage = self.system.global_cpu_usage();
        if !usage.is_finite() {
            return Err(ScriptError::Sampling(format!(
                "non-finite usage reading: {usage}"
            )));
        }

        tracing::trace!("cpu usage {usage:.1}% over {}ms", window.as_millis());
        Ok(usage.clamp(0.0, 100.0))
    }
}
