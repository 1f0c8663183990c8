//! The scrape-and-notify run.
//!
//! One run loads the page, extracts the counters, writes them out, and sends
//! exactly one notification: a normal one on success, a critical one carrying
//! the error text on any failure. A failure before the report is rendered
//! writes nothing. A writer that fails partway through `write_all` may have
//! taken part of the report already; those bytes stay where they landed and the
//! run still ends in the critical notification.

use std::io::Write;

use chrono::Local;
use serde::Serialize;

use crate::config::{OutputFormat, PopulationConfig};
use crate::notify::{Notification, Notifier, Urgency};
use crate::scrape::{self, PageSource, PopulationRecord};
use crate::types::ScriptResult;

/// Format of the timestamp prefixed to every output line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M";

pub const SUCCESS_MESSAGE: &str = "Webscraper executed successfully.";
pub const FAILURE_PREFIX: &str = "Webscraper failed to execute due to an error: ";

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(PopulationRecord),
    /// The failure text that was sent in the critical notification.
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    timestamp: &'a str,
    #[serde(flatten)]
    record: &'a PopulationRecord,
}

/// Run the scrape once and report the result through `notifier`.
///
/// Returns `Err` only when the notification itself cannot be delivered.
pub async fn run<P, N, W>(
    source: &P,
    notifier: &N,
    out: &mut W,
    config: &PopulationConfig,
) -> ScriptResult<Outcome>
where
    P: PageSource + ?Sized,
    N: Notifier + ?Sized,
    W: Write,
{
    if !config.startup_delay.is_zero() {
        tracing::debug!("startup delay {}s", config.startup_delay.as_secs_f32());
        tokio::time::sleep(config.startup_delay).await;
    }

    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

    match scrape_and_write(source, out, config, &timestamp).await {
        Ok(record) => {
            tracing::info!("scrape finished at {timestamp}");
            notifier.notify(&Notification::new(Urgency::Normal, SUCCESS_MESSAGE))?;
            Ok(Outcome::Success(record))
        }
        Err(e) => {
            tracing::warn!("scrape failed: {e}");
            let message = format!("{FAILURE_PREFIX}{e}");
            notifier.notify(&Notification::new(Urgency::Critical, message.clone()))?;
            Ok(Outcome::Failure(message))
        }
    }
}

async fn scrape_and_write<P, W>(
    source: &P,
    out: &mut W,
    config: &PopulationConfig,
    timestamp: &str,
) -> ScriptResult<PopulationRecord>
where
    P: PageSource + ?Sized,
    W: Write,
{
    let html = source.load(&config.url, config.settle).await?;
    let record = scrape::extract(&html)?;

    // rendered in full before any of it is written; a short write can still
    // leave a prefix behind
    let report = render(&record, timestamp, config.format)?;
    out.write_all(report.as_bytes())?;
    out.flush()?;

    Ok(record)
}

fn render(record: &PopulationRecord, timestamp: &str, format: OutputFormat) -> ScriptResult<String> {
    let mut report = match format {
        OutputFormat::Lines => record.lines(timestamp).join("\n"),
        OutputFormat::Json => serde_json::to_string(&JsonReport { timestamp, record })?,
    };
    report.push('\n');
    Ok(report)
}
