//! `schach9`: drive the 9×9 engine from a terminal or a pipe.
//!
//! Commands arrive on stdin one per line; see [`session`] for the list.
//! Searches run on the execution bridge and their events are printed by a
//! task on the async runtime. At end of input the last search is allowed to
//! finish; `quit` drops it.

mod session;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;

use alphabeta_engine::{EngineConfig, SearchEngine};
use anyhow::{Context, Result};
use clap::Parser;
use engine_bridge::{BridgeEvent, EngineBridge};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use session::{EventPrinter, Flow, Session};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Engine configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Opening book (JSON), replacing the built-in one
    #[arg(long)]
    book: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(book) = args.book {
        config.book_path = Some(book);
    }
    let engine = SearchEngine::with_config(config).context("failed to start engine")?;
    info!(?engine, "engine ready");

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let guard = runtime.enter();
    let (bridge, events) = EngineBridge::new(engine);
    let mut session = Session::new(bridge, io::stdout());
    let printer = runtime.spawn(print_events(events, session.printer()));

    let mut quit = false;
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(err) => {
                warn!(%err, "stdin closed");
                break;
            }
        };
        match session.handle_line(&line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => {
                quit = true;
                break;
            }
            Err(err) => session.report(&err),
        }
    }

    if quit {
        session.shutdown();
    }
    // Dropping the session drops the bridge; the printer ends once the
    // searches still holding its channel are done.
    let last = session.finish();
    drop(guard);
    runtime.block_on(async {
        if let Some(ticket) = last {
            ticket.finished().await;
        }
        if let Err(err) = printer.await {
            warn!(%err, "event printer failed");
        }
    });
    runtime.shutdown_timeout(Duration::from_millis(200));
    Ok(())
}

/// Print bridge events until the bridge goes away.
async fn print_events<W: io::Write>(
    mut events: UnboundedReceiver<BridgeEvent>,
    printer: EventPrinter<W>,
) {
    while let Some(event) = events.recv().await {
        printer.print(&event);
    }
}
