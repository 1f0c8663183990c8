//! scriptbox — small desktop utilities: a cpu loading bar, a random MAC
//! identifier generator, and a population scraper that reports through
//! desktop notifications.

pub mod bar;
pub mod config;
pub mod cpu;
pub mod mac;
pub mod monitor;
pub mod notify;
pub mod population;
pub mod scrape;
pub mod types;

pub use bar::LoadingBar;
pub use config::{BarConfig, BarOverrides, OutputFormat, PopulationConfig, PopulationOverrides};
pub use cpu::{CpuSampler, SysinfoSampler};
pub use mac::MacAddress;
pub use monitor::CpuBarMonitor;
pub use notify::{LogNotifier, Notification, Notifier, NotifySend, Urgency};
pub use population::Outcome;
pub use scrape::{
    extract, source_for, ChromiumSource, Field, HttpSource, PageSource, PopulationRecord, Renderer,
    UnavailableSource,
};
pub use types::*;
