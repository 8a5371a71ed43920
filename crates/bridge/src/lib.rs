//! Execution bridge: runs engine searches off the caller's thread.
//!
//! Each [`EngineBridge::submit`] bumps a generation counter. Only the newest
//! request is current; results of older ones are dropped when they finish,
//! and their searches are asked to stop early. Progress and results arrive
//! as [`BridgeEvent`]s on an unbounded channel.
//!
//! The generation is checked and the event sent under the same lock that
//! `submit` and `cancel` take to bump it, so once either returns no event of
//! an older request can reach the channel.
//!
//! Inside a tokio runtime the search runs on the blocking pool. Without a
//! runtime it runs on the calling thread. If the blocking task dies the
//! search is retried in place on the async worker.

pub mod protocol;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use schach_core::{
    Board, BoardError, Color, Engine, LimitsError, NotationError, SearchLimits, SearchResult,
    TimeControl,
};
use thiserror::Error;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub use protocol::{Message, ProgressPayload, ResultPayload, SearchRequest};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unreadable board: {0}")]
    Notation(#[from] NotationError),
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
    #[error("invalid depth: {0}")]
    Depth(#[from] LimitsError),
    #[error("expected a SEARCH message, got {0}")]
    UnexpectedMessage(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// An iteration of the current search finished.
    Progress { id: u64, result: SearchResult },
    /// The current search finished.
    Completed { id: u64, result: SearchResult },
    /// A request was rejected.
    Error { id: u64, error: String },
}

impl BridgeEvent {
    pub fn id(&self) -> u64 {
        match self {
            BridgeEvent::Progress { id, .. }
            | BridgeEvent::Completed { id, .. }
            | BridgeEvent::Error { id, .. } => *id,
        }
    }

    /// Wire form of the event.
    pub fn to_message(&self) -> Message {
        match self {
            BridgeEvent::Progress { id, result } => Message::Progress {
                id: *id,
                payload: result.into(),
            },
            BridgeEvent::Completed { id, result } => Message::SearchResult {
                id: *id,
                payload: result.into(),
            },
            BridgeEvent::Error { id, error } => Message::SearchError {
                id: *id,
                error: error.clone(),
            },
        }
    }
}

/// Handle to a submitted request.
#[derive(Debug)]
pub struct Ticket {
    pub id: u64,
    pub generation: u64,
    /// Background task, or `None` when the search already ran synchronously.
    pub handle: Option<JoinHandle<()>>,
}

impl Ticket {
    /// Wait for the background task, if any.
    pub async fn finished(self) {
        if let Some(handle) = self.handle {
            if let Err(err) = handle.await {
                warn!(id = self.id, %err, "search task ended abnormally");
            }
        }
    }
}

#[derive(Clone)]
struct Job {
    id: u64,
    generation: u64,
    board: Board,
    color: Color,
    limits: SearchLimits,
}

/// State shared between the bridge and its background tasks.
struct Shared<E> {
    engine: Mutex<E>,
    generation: Mutex<u64>,
    events: mpsc::UnboundedSender<BridgeEvent>,
}

impl<E: Engine + 'static> Shared<E> {
    fn generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn advance(&self) -> u64 {
        let mut generation = self.generation();
        *generation += 1;
        *generation
    }

    fn is_current(&self, generation: u64) -> bool {
        *self.generation() == generation
    }

    /// Send `event` if `generation` is still current. Holds the generation
    /// lock across the send.
    fn send_if_current(&self, generation: u64, event: BridgeEvent) -> bool {
        let current = self.generation();
        if *current != generation {
            return false;
        }
        let _ = self.events.send(event);
        true
    }

    fn run(self: &Arc<Self>, job: Job) {
        let mut engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(job.generation) {
            debug!(id = job.id, "request superseded before it started");
            return;
        }

        let shared = Arc::clone(self);
        let (id, generation) = (job.id, job.generation);
        let time_control = job.limits.time_control.clone();
        engine.set_progress_callback(Some(Box::new(move |result: &SearchResult| {
            let progress = BridgeEvent::Progress {
                id,
                result: result.clone(),
            };
            // The engine resets the stop flag when it starts, which can undo
            // a stop that arrived just before. Repeat it.
            if !shared.send_if_current(generation, progress) {
                time_control.stop();
            }
        })));
        let result = engine.search(&job.board, job.color, job.limits);
        engine.set_progress_callback(None);
        drop(engine);

        if !self.send_if_current(job.generation, BridgeEvent::Completed { id: job.id, result }) {
            debug!(id = job.id, "discarding stale search result");
        }
    }
}

pub struct EngineBridge<E> {
    shared: Arc<Shared<E>>,
    /// Stop handle of the most recent search.
    running: Mutex<Option<TimeControl>>,
}

impl<E: Engine + 'static> EngineBridge<E> {
    /// Bridge around `engine` and the receiver for its events.
    pub fn new(engine: E) -> (Self, mpsc::UnboundedReceiver<BridgeEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            engine: Mutex::new(engine),
            generation: Mutex::new(0),
            events,
        });
        let bridge = Self {
            shared,
            running: Mutex::new(None),
        };
        (bridge, rx)
    }

    /// Generation of the current request.
    pub fn generation(&self) -> u64 {
        *self.shared.generation()
    }

    /// Validate `request` and start searching it, superseding any earlier request.
    pub fn submit(&self, request: SearchRequest) -> Result<Ticket, BridgeError> {
        let (board, limits) = request.validate()?;
        let generation = self.shared.advance();
        self.replace_running(Some(limits.time_control.clone()));

        let job = Job {
            id: request.id,
            generation,
            board,
            color: request.color,
            limits,
        };
        let handle = match Handle::try_current() {
            Ok(runtime) => Some(runtime.spawn(run_in_background(Arc::clone(&self.shared), job))),
            Err(_) => {
                warn!(id = request.id, "no async runtime, searching on the calling thread");
                self.shared.run(job);
                None
            }
        };

        Ok(Ticket {
            id: request.id,
            generation,
            handle,
        })
    }

    /// Handle one JSON line. Rejections are reported as [`BridgeEvent::Error`].
    pub fn submit_json(&self, line: &str) -> Option<Ticket> {
        let (id, outcome) = match Message::from_json(line) {
            Ok(Message::Search(request)) => (request.id, self.submit(request)),
            Ok(other) => (0, Err(BridgeError::UnexpectedMessage(other.kind()))),
            Err(err) => (0, Err(err)),
        };
        match outcome {
            Ok(ticket) => Some(ticket),
            Err(err) => {
                let _ = self.shared.events.send(BridgeEvent::Error {
                    id,
                    error: err.to_string(),
                });
                None
            }
        }
    }

    /// Drop the current request. Its result will not be delivered.
    pub fn cancel(&self) {
        let generation = self.shared.advance();
        self.replace_running(None);
        debug!(generation, "search cancelled");
    }

    /// Ask the current search to finish early. Unlike [`cancel`](Self::cancel)
    /// its result, the best move found so far, is still delivered.
    pub fn stop(&self) {
        let running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(time_control) = running.as_ref() {
            time_control.stop();
        }
    }

    /// Run `f` with exclusive access to the engine, waiting for any running search.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        let mut engine = self
            .shared
            .engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut engine)
    }

    fn replace_running(&self, next: Option<TimeControl>) {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = running.take() {
            previous.stop();
        }
        *running = next;
    }
}

async fn run_in_background<E: Engine + 'static>(shared: Arc<Shared<E>>, job: Job) {
    let id = job.id;
    let retry = job.clone();
    let worker = Arc::clone(&shared);
    if let Err(err) = tokio::task::spawn_blocking(move || worker.run(job)).await {
        warn!(id, %err, "background search failed, searching on this task instead");
        match Handle::current().runtime_flavor() {
            RuntimeFlavor::MultiThread => tokio::task::block_in_place(|| shared.run(retry)),
            _ => shared.run(retry),
        }
    }
}
