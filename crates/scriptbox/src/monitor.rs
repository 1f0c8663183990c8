//! Periodic cpu bar output.
//!
//! Samples utilisation and draws one bar per window until shutdown is
//! signalled. The sampling window doubles as the loop period.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::bar::LoadingBar;
use crate::config::BarConfig;
use crate::cpu::CpuSampler;
use crate::types::ScriptResult;

/// Draws a [`LoadingBar`] for every reading a [`CpuSampler`] produces.
pub struct CpuBarMonitor<S> {
    sampler: S,
    bar: LoadingBar,
    window: Duration,
}

impl<S: CpuSampler> CpuBarMonitor<S> {
    pub fn new(sampler: S, config: &BarConfig) -> Self {
        Self {
            sampler,
            bar: config.bar,
            window: config.interval,
        }
    }

    /// Run until `shutdown` is notified, returning how many bars were drawn.
    ///
    /// A sampling or write failure stops the loop and is returned.
    pub async fn run(&mut self, out: &mut impl Write, shutdown: Arc<Notify>) -> ScriptResult<u64> {
        let Self {
            sampler,
            bar,
            window,
        } = self;

        tracing::info!(
            "cpu bar started: length={} window={}ms",
            bar.length,
            window.as_millis()
        );

        let mut drawn: u64 = 0;
        loop {
            tokio::select! {
                biased;
                _ = shutdown.notified() => {
                    tracing::info!("cpu bar stopping after {drawn} bar(s)");
                    break;
                }
                usage = sampler.sample(*window) => {
                    let usage = usage?;
                    bar.draw(f64::from(usage), 100.0, out)?;
                    drawn += 1;
                }
            }
        }

        Ok(drawn)
    }
}
