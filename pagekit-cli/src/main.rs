//! pagekit CLI
//!
//! Replays scripted visitor sessions against a landing page fixture and
//! prints the resulting state as JSON.
//!
//! Commands:
//! - `replay`: run a script, sending submissions over HTTP or to a canned reply
//! - `inspect`: mount a fixture and print its initial snapshot

mod host;
mod replay;
mod script;
mod transport;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagekit_core::{Document, NodeSpec, Page, PageConfig};
use pagekit_transport::{FormTransport, HttpFormTransport, HttpTransportConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use replay::Session;
use transport::CannedTransport;

#[derive(Parser)]
#[command(name = "pagekit", about = "pagekit: headless landing page session replay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a visitor script against a page fixture.
    Replay {
        /// Page markup (JSON node tree rooted at body).
        #[arg(long)]
        page: PathBuf,

        /// Visitor script (JSON array of steps).
        #[arg(long)]
        script: PathBuf,

        /// Page configuration JSON. Defaults to the stock landing page setup.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Base URL that relative form actions resolve against.
        #[arg(long)]
        base_url: Option<String>,

        /// Request timeout in seconds.
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Answer every submission with this JSON instead of going to the network.
        #[arg(long, conflicts_with = "fail_status")]
        reply: Option<String>,

        /// Fail every submission with this HTTP status instead of going to the network.
        #[arg(long)]
        fail_status: Option<u16>,

        /// Skip idle waits instead of sleeping through them.
        #[arg(long, default_value_t = false)]
        fast: bool,

        /// Leave pending timers unfired at the end.
        #[arg(long, default_value_t = false)]
        no_settle: bool,

        /// Include the final document tree in the report.
        #[arg(long, default_value_t = false)]
        dump_dom: bool,
    },
    /// Mount a page fixture and print its initial state.
    Inspect {
        /// Page markup (JSON node tree rooted at body).
        #[arg(long)]
        page: PathBuf,

        /// Page configuration JSON.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // 日志输出到 stderr，stdout 留给 JSON 报告
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Replay {
            page,
            script,
            config,
            base_url,
            timeout,
            reply,
            fail_status,
            fast,
            no_settle,
            dump_dom,
        } => {
            let page = load_page(&page, config.as_deref())?;
            let steps = script::load(&script)?;

            let transport: Arc<dyn FormTransport> = match (reply, fail_status) {
                (Some(raw), _) => {
                    let value = serde_json::from_str(&raw).context("--reply is not valid JSON")?;
                    Arc::new(CannedTransport::replying(value))
                }
                (None, Some(status)) => Arc::new(CannedTransport::failing(status)),
                (None, None) => Arc::new(HttpFormTransport::new(HttpTransportConfig {
                    base_url,
                    timeout_secs: timeout,
                    user_agent: Some(format!("pagekit/{}", env!("CARGO_PKG_VERSION"))),
                })?),
            };

            tracing::info!("Replaying {} step(s) via {}", steps.len(), transport.id());
            let mut session = Session::new(page, transport, !fast);
            let outcome = session.run(&steps).await;
            session.finish(!no_settle && outcome.is_ok()).await;
            let report = session.into_report(dump_dom);
            println!("{}", serde_json::to_string_pretty(&report)?);
            outcome
        }
        Commands::Inspect { page, config } => {
            let page = load_page(&page, config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&page.snapshot())?);
            Ok(())
        }
    }
}

fn load_page(markup: &Path, config: Option<&Path>) -> Result<Page> {
    let raw = std::fs::read_to_string(markup)
        .with_context(|| format!("failed to read page {}", markup.display()))?;
    let spec: NodeSpec =
        serde_json::from_str(&raw).with_context(|| format!("invalid page {}", markup.display()))?;
    let config = match config {
        Some(path) => PageConfig::from_file(path)?,
        None => PageConfig::default(),
    };
    Ok(Page::mount(Document::from_spec(&spec), config)?)
}
