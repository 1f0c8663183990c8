//! scriptbox — entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use tokio::sync::Notify;

use scriptbox::notify::{self, LogNotifier, Notifier};
use scriptbox::population;
use scriptbox::{
    BarConfig, BarOverrides, CpuBarMonitor, MacAddress, PopulationConfig, PopulationOverrides,
    Renderer, SysinfoSampler,
};

#[derive(Parser)]
#[command(
    name = "scriptbox",
    about = "Small desktop utilities: cpu bar, random MAC, population scraper",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print cpu usage as a loading bar, once per sampling window, until interrupted.
    CpuBar {
        /// Number of glyphs in the bar.
        #[arg(long)]
        length: Option<usize>,

        /// Glyph used for the filled part of the bar.
        #[arg(long)]
        fill: Option<char>,

        /// Sampling window in milliseconds.
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Print one random unicast MAC address.
    Mac,

    /// Scrape world population counters and report through a desktop notification.
    ///
    /// Example:
    ///   scriptbox population >> data.txt
    Population {
        /// Page to scrape.
        #[arg(long)]
        url: Option<String>,

        /// Seconds to wait before starting.
        #[arg(long)]
        startup_delay: Option<u64>,

        /// Seconds client-side scripts get to run before the page is read.
        #[arg(long)]
        settle: Option<u64>,

        /// Upper bound on loading the page, in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// How the page is loaded.
        #[arg(long, value_enum, default_value_t = RendererChoice::Auto)]
        renderer: RendererChoice,

        /// Log notifications instead of calling notify-send.
        #[arg(long)]
        no_notify: bool,

        /// Write one JSON object instead of three lines.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   scriptbox completions bash > ~/.local/share/bash-completion/completions/scriptbox
    ///   scriptbox completions zsh > ~/.zfunc/_scriptbox
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RendererChoice {
    /// Chromium found through SCRIPTBOX_CHROMIUM_PATH or PATH.
    Auto,
    /// Headless Chromium; a missing install is reported by notification.
    Chromium,
    /// Plain HTTP GET; client-side scripts do not run.
    Http,
}

impl From<RendererChoice> for Renderer {
    fn from(choice: RendererChoice) -> Self {
        match choice {
            RendererChoice::Auto => Renderer::Auto,
            RendererChoice::Chromium => Renderer::Chromium,
            RendererChoice::Http => Renderer::Http,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::CpuBar {
            length,
            fill,
            interval_ms,
        } => {
            let config = BarConfig::from_env().with_overrides(BarOverrides {
                length,
                fill,
                interval_ms,
            });
            cpu_bar(&config).await?;
        }

        Commands::Mac => {
            println!("{}", MacAddress::generate());
        }

        Commands::Population {
            url,
            startup_delay,
            settle,
            timeout_ms,
            renderer,
            no_notify,
            json,
        } => {
            let config = PopulationConfig::from_env().with_overrides(PopulationOverrides {
                url,
                startup_delay_secs: startup_delay,
                settle_secs: settle,
                timeout_ms,
                json,
            });

            // a missing renderer still ends in the critical notification
            let source = scriptbox::source_for(renderer.into(), config.timeout);
            let notifier: Box<dyn Notifier> = if no_notify {
                Box::new(LogNotifier)
            } else {
                notify::detect()
            };

            let mut stdout = std::io::stdout().lock();
            population::run(source.as_ref(), notifier.as_ref(), &mut stdout, &config)
                .await
                .context("failed to deliver notification")?;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "scriptbox", &mut std::io::stdout());
        }
    }

    Ok(())
}

async fn cpu_bar(config: &BarConfig) -> anyhow::Result<()> {
    let shutdown = Arc::new(Notify::new());

    let on_signal = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.notify_one();
        }
    });

    let mut monitor = CpuBarMonitor::new(SysinfoSampler::new(), config);
    let mut stdout = std::io::stdout();
    monitor
        .run(&mut stdout, shutdown)
        .await
        .context("cpu sampling failed")?;
    Ok(())
}
