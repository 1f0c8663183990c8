//! Configuration loading from environment variables.
//!
//! Every value has a built-in default; a variable that is missing or fails to
//! parse falls back to it. Command-line flags are applied on top by the binary.

use std::time::Duration;

use crate::bar::LoadingBar;

pub const ENV_BAR_LENGTH: &str = "SCRIPTBOX_BAR_LENGTH";
pub const ENV_BAR_FILL: &str = "SCRIPTBOX_BAR_FILL";
pub const ENV_CPU_INTERVAL_MS: &str = "SCRIPTBOX_CPU_INTERVAL_MS";
pub const ENV_POPULATION_URL: &str = "SCRIPTBOX_POPULATION_URL";
pub const ENV_STARTUP_DELAY_SECS: &str = "SCRIPTBOX_STARTUP_DELAY_SECS";
pub const ENV_SETTLE_SECS: &str = "SCRIPTBOX_SETTLE_SECS";
pub const ENV_FETCH_TIMEOUT_MS: &str = "SCRIPTBOX_FETCH_TIMEOUT_MS";

pub const DEFAULT_POPULATION_URL: &str = "https://www.worldometers.info/world-population/";
const DEFAULT_CPU_INTERVAL_MS: u64 = 1000;
const DEFAULT_STARTUP_DELAY_SECS: u64 = 10;
const DEFAULT_SETTLE_SECS: u64 = 3;
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 60_000;

/// Settings for the cpu bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarConfig {
    pub bar: LoadingBar,
    /// Sampling window; also the period between bars.
    pub interval: Duration,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            bar: LoadingBar::default(),
            interval: Duration::from_millis(DEFAULT_CPU_INTERVAL_MS),
        }
    }
}

impl BarConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = LoadingBar::default();
        let length = read_parsed(&lookup, ENV_BAR_LENGTH, defaults.length).max(1);
        let fill = lookup(ENV_BAR_FILL)
            .and_then(|v| v.trim().chars().next())
            .unwrap_or(defaults.fill);
        let interval_ms = read_parsed(&lookup, ENV_CPU_INTERVAL_MS, DEFAULT_CPU_INTERVAL_MS);

        Self {
            bar: LoadingBar::new(length, fill),
            interval: Duration::from_millis(interval_ms),
        }
    }
}

/// Command-line values for the cpu bar; `None` keeps the configured value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarOverrides {
    pub length: Option<usize>,
    pub fill: Option<char>,
    pub interval_ms: Option<u64>,
}

impl BarConfig {
    /// Apply command-line values on top of this configuration.
    pub fn with_overrides(mut self, overrides: BarOverrides) -> Self {
        if let Some(length) = overrides.length {
            self.bar.length = length.max(1);
        }
        if let Some(fill) = overrides.fill {
            self.bar.fill = fill;
        }
        if let Some(ms) = overrides.interval_ms {
            self.interval = Duration::from_millis(ms);
        }
        self
    }
}

/// How a successful population scrape is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Three `[timestamp] TAG: value` lines.
    #[default]
    Lines,
    /// One JSON object per run.
    Json,
}

/// Settings for the population scraper.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationConfig {
    pub url: String,
    /// Wait before doing anything at all.
    pub startup_delay: Duration,
    /// Time client-side scripts get to run before the page is read.
    pub settle: Duration,
    /// Upper bound on loading the page.
    pub timeout: Duration,
    pub format: OutputFormat,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_POPULATION_URL.to_string(),
            startup_delay: Duration::from_secs(DEFAULT_STARTUP_DELAY_SECS),
            settle: Duration::from_secs(DEFAULT_SETTLE_SECS),
            timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            format: OutputFormat::Lines,
        }
    }
}

impl PopulationConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = lookup(ENV_POPULATION_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_POPULATION_URL.to_string());

        Self {
            url,
            startup_delay: Duration::from_secs(read_parsed(
                &lookup,
                ENV_STARTUP_DELAY_SECS,
                DEFAULT_STARTUP_DELAY_SECS,
            )),
            settle: Duration::from_secs(read_parsed(&lookup, ENV_SETTLE_SECS, DEFAULT_SETTLE_SECS)),
            timeout: Duration::from_millis(
                read_parsed(&lookup, ENV_FETCH_TIMEOUT_MS, DEFAULT_FETCH_TIMEOUT_MS).max(1),
            ),
            format: OutputFormat::Lines,
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Command-line values for the population scraper; `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationOverrides {
    pub url: Option<String>,
    pub startup_delay_secs: Option<u64>,
    pub settle_secs: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub json: bool,
}

impl PopulationConfig {
    /// Apply command-line values on top of this configuration.
    pub fn with_overrides(mut self, overrides: PopulationOverrides) -> Self {
        if let Some(url) = overrides.url {
            self.url = url;
        }
        if let Some(secs) = overrides.startup_delay_secs {
            self.startup_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = overrides.settle_secs {
            self.settle = Duration::from_secs(secs);
        }
        if let Some(ms) = overrides.timeout_ms {
            self.timeout = Duration::from_millis(ms.max(1));
        }
        if overrides.json {
            self.format = OutputFormat::Json;
        }
        self
    }
}

fn read_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default_value: T,
) -> T {
    lookup(name)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_bar_defaults() {
        let cfg = BarConfig::from_lookup(lookup_from(&[]));
        assert_eq!(cfg, BarConfig::default());
        assert_eq!(cfg.bar.length, 30);
        assert_eq!(cfg.bar.fill, '#');
        assert_eq!(cfg.interval, Duration::from_secs(1));
    }

    #[test]
    fn test_bar_overrides() {
        let cfg = BarConfig::from_lookup(lookup_from(&[
            (ENV_BAR_LENGTH, "12"),
            (ENV_BAR_FILL, "=="),
            (ENV_CPU_INTERVAL_MS, "250"),
        ]));
        assert_eq!(cfg.bar, LoadingBar::new(12, '='));
        assert_eq!(cfg.interval, Duration::from_millis(250));
    }

    #[test]
    fn test_bar_garbage_falls_back() {
        let cfg = BarConfig::from_lookup(lookup_from(&[
            (ENV_BAR_LENGTH, "wide"),
            (ENV_BAR_FILL, "   "),
            (ENV_CPU_INTERVAL_MS, "-1"),
        ]));
        assert_eq!(cfg, BarConfig::default());
    }

    #[test]
    fn test_bar_zero_length_is_raised() {
        let cfg = BarConfig::from_lookup(lookup_from(&[(ENV_BAR_LENGTH, "0")]));
        assert_eq!(cfg.bar.length, 1);
    }

    #[test]
    fn test_population_defaults() {
        let cfg = PopulationConfig::from_lookup(lookup_from(&[]));
        assert_eq!(cfg, PopulationConfig::default());
        assert_eq!(cfg.url, DEFAULT_POPULATION_URL);
        assert_eq!(cfg.startup_delay, Duration::from_secs(10));
        assert_eq!(cfg.settle, Duration::from_secs(3));
        assert_eq!(cfg.timeout_ms(), 60_000);
    }

    #[test]
    fn test_population_overrides() {
        let cfg = PopulationConfig::from_lookup(lookup_from(&[
            (ENV_POPULATION_URL, " http://localhost:8080/pop "),
            (ENV_STARTUP_DELAY_SECS, "0"),
            (ENV_SETTLE_SECS, "1"),
            (ENV_FETCH_TIMEOUT_MS, "500"),
        ]));
        assert_eq!(cfg.url, "http://localhost:8080/pop");
        assert_eq!(cfg.startup_delay, Duration::ZERO);
        assert_eq!(cfg.settle, Duration::from_secs(1));
        assert_eq!(cfg.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_population_empty_url_falls_back() {
        let cfg = PopulationConfig::from_lookup(lookup_from(&[(ENV_POPULATION_URL, "  ")]));
        assert_eq!(cfg.url, DEFAULT_POPULATION_URL);
    }

    #[test]
    fn test_bar_flag_beats_env() {
        let cfg = BarConfig::from_lookup(lookup_from(&[
            (ENV_BAR_LENGTH, "12"),
            (ENV_BAR_FILL, "="),
            (ENV_CPU_INTERVAL_MS, "250"),
        ]))
        .with_overrides(BarOverrides {
            length: Some(20),
            fill: None,
            interval_ms: Some(500),
        });
        assert_eq!(cfg.bar, LoadingBar::new(20, '='));
        assert_eq!(cfg.interval, Duration::from_millis(500));
    }

    #[test]
    fn test_bar_no_flags_keeps_env() {
        let env = BarConfig::from_lookup(lookup_from(&[(ENV_BAR_LENGTH, "12")]));
        assert_eq!(env.clone().with_overrides(BarOverrides::default()), env);
    }

    #[test]
    fn test_bar_flag_zero_length_is_raised() {
        let cfg = BarConfig::default().with_overrides(BarOverrides {
            length: Some(0),
            ..BarOverrides::default()
        });
        assert_eq!(cfg.bar.length, 1);
    }

    #[test]
    fn test_population_flag_beats_env() {
        let cfg = PopulationConfig::from_lookup(lookup_from(&[
            (ENV_POPULATION_URL, "http://env.example/"),
            (ENV_STARTUP_DELAY_SECS, "7"),
            (ENV_SETTLE_SECS, "5"),
            (ENV_FETCH_TIMEOUT_MS, "9000"),
        ]))
        .with_overrides(PopulationOverrides {
            url: Some("http://flag.example/".to_string()),
            startup_delay_secs: Some(0),
            settle_secs: None,
            timeout_ms: Some(0),
            json: true,
        });
        assert_eq!(cfg.url, "http://flag.example/");
        assert_eq!(cfg.startup_delay, Duration::ZERO);
        assert_eq!(cfg.settle, Duration::from_secs(5));
        assert_eq!(cfg.timeout, Duration::from_millis(1));
        assert_eq!(cfg.format, OutputFormat::Json);
    }

    #[test]
    fn test_population_no_flags_keeps_defaults() {
        let cfg = PopulationConfig::from_lookup(lookup_from(&[]))
            .with_overrides(PopulationOverrides::default());
        assert_eq!(cfg, PopulationConfig::default());
    }
}
