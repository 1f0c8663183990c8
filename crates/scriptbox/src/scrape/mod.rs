//! Population counters scraped from a rendered page.
//!
//! A [`PageSource`] produces the page's HTML after client-side scripts have
//! run; [`extract`] then reads the three counters out of it.

pub mod chromium;
pub mod http;

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::types::{ScriptError, ScriptResult};

pub use chromium::ChromiumSource;
pub use http::HttpSource;

/// Printed in place of a counter whose element is missing.
pub const NOT_FOUND: &str = "Not found";

/// Loads a page and hands back its HTML.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Load `url`, give client-side scripts `settle` to run, and return the HTML.
    async fn load(&self, url: &str, settle: Duration) -> ScriptResult<String>;
}

/// Which engine loads the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Renderer {
    /// Chromium if one is installed; otherwise every load fails.
    #[default]
    Auto,
    /// Chromium; every load fails if it is not installed.
    Chromium,
    /// Plain HTTP GET. Client-side scripts never run.
    Http,
}

/// Build the page source for `renderer`.
///
/// Never fails: a source that cannot be set up is returned as an
/// [`UnavailableSource`], so the failure surfaces from `load`.
pub fn source_for(renderer: Renderer, timeout: Duration) -> Box<dyn PageSource> {
    match renderer {
        Renderer::Auto | Renderer::Chromium => match ChromiumSource::detect(timeout) {
            Some(source) => Box::new(source),
            None => Box::new(UnavailableSource::new(format!(
                "Chromium not found; install it, set {}, or pass --renderer http",
                chromium::ENV_CHROMIUM_PATH
            ))),
        },
        Renderer::Http => match HttpSource::new(timeout) {
            Ok(source) => Box::new(source),
            Err(e) => Box::new(UnavailableSource::new(format!(
                "HTTP client could not be built: {e}"
            ))),
        },
    }
}

/// A page source that could not be set up; every load fails with the reason.
#[derive(Debug, Clone)]
pub struct UnavailableSource {
    reason: String,
}

impl UnavailableSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PageSource for UnavailableSource {
    async fn load(&self, url: &str, _settle: Duration) -> ScriptResult<String> {
        tracing::debug!("cannot load {url}: {}", self.reason);
        Err(ScriptError::Render(self.reason.clone()))
    }
}

/// One of the counters on the population page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Population,
    BirthsToday,
    DeathsToday,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Population, Field::BirthsToday, Field::DeathsToday];

    /// Two-letter tag used in the output lines.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Population => "WP",
            Self::BirthsToday => "BT",
            Self::DeathsToday => "DT",
        }
    }

    pub fn selector(self) -> &'static str {
        match self {
            Self::Population => "div.maincounter-number span",
            Self::BirthsToday => "span.rts-counter[rel='births_today']",
            Self::DeathsToday => "span.rts-counter[rel='dth1s_today']",
        }
    }
}

/// The counters read from one page load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PopulationRecord {
    pub population: Option<String>,
    pub births_today: Option<String>,
    pub deaths_today: Option<String>,
}

impl PopulationRecord {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Population => self.population.as_deref(),
            Field::BirthsToday => self.births_today.as_deref(),
            Field::DeathsToday => self.deaths_today.as_deref(),
        }
    }

    /// The value for `field`, or [`NOT_FOUND`].
    pub fn display(&self, field: Field) -> &str {
        self.get(field).unwrap_or(NOT_FOUND)
    }

    /// `[timestamp] TAG: value` for every field, in page order.
    pub fn lines(&self, timestamp: &str) -> Vec<String> {
        Field::ALL
            .iter()
            .map(|&field| format!("[{timestamp}] {}: {}", field.tag(), self.display(field)))
            .collect()
    }
}

/// Read the population counters out of `html`.
///
/// A selector that matches nothing leaves its field as `None`.
pub fn extract(html: &str) -> ScriptResult<PopulationRecord> {
    let document = Html::parse_document(html);

    Ok(PopulationRecord {
        population: first_text(&document, Field::Population.selector())?,
        births_today: first_text(&document, Field::BirthsToday.selector())?,
        deaths_today: first_text(&document, Field::DeathsToday.selector())?,
    })
}

fn first_text(document: &Html, selector: &str) -> ScriptResult<Option<String>> {
    let sel = Selector::parse(selector).map_err(|e| ScriptError::Selector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })?;

    Ok(document
        .select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string()))
}
