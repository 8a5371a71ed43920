//! Bridge behaviour with a scripted engine and with the real alpha-beta engine.

use std::thread;
use std::time::{Duration, Instant};

use alphabeta_engine::{EngineConfig, SearchEngine};
use engine_bridge::{BridgeEvent, EngineBridge, SearchRequest};
use schach_core::{
    legal_moves, parse_move, Board, Color, Difficulty, Engine, ProgressCallback, SearchLimits,
    SearchResult,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// Reports one iteration per depth, sleeping between them. With `until_stopped`
/// it keeps going until stopped or out of time.
struct ScriptedEngine {
    step: Duration,
    until_stopped: bool,
    progress: Option<ProgressCallback>,
}

impl ScriptedEngine {
    fn new(step_ms: u64) -> Self {
        Self {
            step: Duration::from_millis(step_ms),
            until_stopped: false,
            progress: None,
        }
    }

    fn endless() -> Self {
        Self {
            until_stopped: true,
            ..Self::new(5)
        }
    }
}

impl Engine for ScriptedEngine {
    fn search(&mut self, board: &Board, color: Color, limits: SearchLimits) -> SearchResult {
        limits.start();
        let best_move = legal_moves(board, color).first().copied();
        let mut result = SearchResult {
            best_move,
            pv: best_move.into_iter().collect(),
            ..SearchResult::default()
        };
        let mut depth = 0u8;
        loop {
            if limits.time_control.check_time() {
                result.stopped = true;
                break;
            }
            if !self.until_stopped && depth >= limits.depth {
                break;
            }
            thread::sleep(self.step);
            depth = depth.saturating_add(1);
            result.depth = depth;
            result.nodes += 100;
            if let Some(callback) = self.progress.as_mut() {
                callback(&result);
            }
        }
        result
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn set_progress_callback(&mut self, callback: Option<ProgressCallback>) {
        self.progress = callback;
    }
}

/// Panics on its first search, then behaves like a quick scripted engine.
struct PanicOnceEngine {
    panicked: bool,
    inner: ScriptedEngine,
}

impl Engine for PanicOnceEngine {
    fn search(&mut self, board: &Board, color: Color, limits: SearchLimits) -> SearchResult {
        if !self.panicked {
            self.panicked = true;
            panic!("first search fails");
        }
        self.inner.search(board, color, limits)
    }

    fn name(&self) -> &str {
        "panic-once"
    }

    fn set_progress_callback(&mut self, callback: Option<ProgressCallback>) {
        self.inner.set_progress_callback(callback);
    }
}

fn request(id: u64, depth: i32) -> SearchRequest {
    SearchRequest::new(id, &Board::startpos(), Color::White, depth, Difficulty::Expert)
}

fn drain(rx: &mut UnboundedReceiver<BridgeEvent>) -> Vec<BridgeEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn completed(events: &[BridgeEvent]) -> Vec<(u64, &SearchResult)> {
    events
        .iter()
        .filter_map(|event| match event {
            BridgeEvent::Completed { id, result } => Some((*id, result)),
            _ => None,
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_only_latest_request_completes() {
    let (bridge, mut rx) = EngineBridge::new(ScriptedEngine::new(20));
    let first = bridge.submit(request(1, 4)).unwrap();
    let second = bridge.submit(request(2, 2)).unwrap();
    assert_eq!(second.generation, first.generation + 1);
    assert_eq!(bridge.generation(), second.generation);

    first.finished().await;
    second.finished().await;

    let events = drain(&mut rx);
    let done = completed(&events);
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].0, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_progress_precedes_result() {
    let (bridge, mut rx) = EngineBridge::new(ScriptedEngine::new(1));
    bridge.submit(request(5, 3)).unwrap().finished().await;

    let events = drain(&mut rx);
    let depths: Vec<u8> = events
        .iter()
        .filter_map(|event| match event {
            BridgeEvent::Progress { result, .. } => Some(result.depth),
            _ => None,
        })
        .collect();
    assert_eq!(depths, vec![1, 2, 3]);
    assert!(matches!(events.last(), Some(BridgeEvent::Completed { id: 5, .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_drops_result() {
    let (bridge, mut rx) = EngineBridge::new(ScriptedEngine::endless());
    let ticket = bridge.submit(request(3, 1)).unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    bridge.cancel();
    ticket.finished().await;

    assert!(completed(&drain(&mut rx)).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_result_arrives_after_cancel() {
    let (bridge, mut rx) = EngineBridge::new(ScriptedEngine::new(0));
    for id in 0..300u64 {
        let ticket = bridge.submit(request(id, 1)).unwrap();
        // Vary where in the search the cancel lands.
        thread::sleep(Duration::from_micros(id % 40));
        bridge.cancel();
        drain(&mut rx);

        ticket.finished().await;
        let late = drain(&mut rx);
        assert!(late.is_empty(), "request {id} reported after cancel: {late:?}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_worker_retries_in_place() {
    let engine = PanicOnceEngine {
        panicked: false,
        inner: ScriptedEngine::new(1),
    };
    let (bridge, mut rx) = EngineBridge::new(engine);
    bridge.submit(request(12, 2)).unwrap().finished().await;

    let events = drain(&mut rx);
    let done = completed(&events);
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].0, 12);
    assert_eq!(done[0].1.depth, 2);
    assert!(bridge.with_engine(|engine| engine.panicked));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stop_still_delivers_result() {
    let (bridge, mut rx) = EngineBridge::new(ScriptedEngine::endless());
    let ticket = bridge.submit(request(4, 1)).unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    bridge.stop();
    ticket.finished().await;

    let events = drain(&mut rx);
    let done = completed(&events);
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].0, 4);
    assert!(done[0].1.stopped);
    assert!(done[0].1.depth > 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_resubmission_stops_running_search() {
    let (bridge, mut rx) = EngineBridge::new(ScriptedEngine::endless());
    let started = Instant::now();
    let first = bridge.submit(request(1, 1)).unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;

    let mut next = request(2, 1);
    next.move_time_ms = Some(40);
    let second = bridge.submit(next).unwrap();
    first.finished().await;
    second.finished().await;

    assert!(started.elapsed() < Duration::from_secs(5));
    let events = drain(&mut rx);
    let done = completed(&events);
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].0, 2);
    assert!(done[0].1.stopped);
}

#[test]
fn test_runs_synchronously_without_runtime() {
    let (bridge, mut rx) = EngineBridge::new(ScriptedEngine::new(1));
    let ticket = bridge.submit(request(8, 2)).unwrap();
    assert!(ticket.handle.is_none());

    let events = drain(&mut rx);
    assert_eq!(events.len(), 3);
    let done = completed(&events);
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].0, 8);
    assert_eq!(done[0].1.depth, 2);
}

#[test]
fn test_rejected_json_reports_error() {
    let (bridge, mut rx) = EngineBridge::new(ScriptedEngine::new(1));
    assert!(bridge.submit_json("{not json").is_none());
    assert!(bridge
        .submit_json(r#"{"kind":"SEARCH_ERROR","id":4,"error":"x"}"#)
        .is_none());

    let mut bad_depth = request(6, 0);
    bad_depth.depth = -1;
    let line = serde_json::to_string(&engine_bridge::Message::Search(bad_depth)).unwrap();
    assert!(bridge.submit_json(&line).is_none());

    let events = drain(&mut rx);
    assert_eq!(events.len(), 3);
    for event in &events {
        assert!(matches!(event, BridgeEvent::Error { .. }));
        assert_eq!(event.to_message().kind(), "SEARCH_ERROR");
    }
    assert_eq!(events[2].id(), 6);
    assert_eq!(bridge.generation(), 0);
}

#[test]
fn test_with_engine_gives_access() {
    let (bridge, _rx) = EngineBridge::new(ScriptedEngine::new(1));
    assert_eq!(bridge.with_engine(|engine| engine.name().to_string()), "scripted");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_alphabeta_through_bridge() {
    let engine = SearchEngine::with_config(EngineConfig {
        use_book: false,
        ..EngineConfig::default()
    })
    .unwrap()
    .with_seed(1);
    let (bridge, mut rx) = EngineBridge::new(engine);

    let line = serde_json::to_string(&engine_bridge::Message::Search(SearchRequest::new(
        42,
        &Board::startpos(),
        Color::White,
        3,
        Difficulty::Hard,
    )))
    .unwrap();
    let ticket = bridge.submit_json(&line).unwrap();
    ticket.finished().await;

    let events = drain(&mut rx);
    let done = completed(&events);
    assert_eq!(done.len(), 1);
    let message = BridgeEvent::Completed {
        id: 42,
        result: done[0].1.clone(),
    }
    .to_message();
    let engine_bridge::Message::SearchResult { id, payload } = message else {
        panic!("expected a search result");
    };
    assert_eq!(id, 42);
    let text = payload.mv.unwrap();
    assert!(parse_move(&Board::startpos(), Color::White, &text).is_ok());
    assert!(bridge.with_engine(|engine| engine.nodes_evaluated()) > 0);
}
