//! Command interpreter for one engine session.
//!
//! ```text
//! position startpos | position <diagram> <w|b>
//! move <mv>...
//! go [depth N] [difficulty D] [elo R] [movetime MS]
//! stop
//! eval
//! analyze [depth N]
//! pv [depth N]
//! book [path]
//! new | clear | nodes | d | quit
//! {"kind":"SEARCH",...}
//! ```
//!
//! `go` and JSON lines both run on the execution bridge. Their events come
//! back through an [`EventPrinter`]: `go` searches print as `info` and
//! `bestmove` lines, everything else as JSON.

use std::collections::HashMap;
use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alphabeta_engine::{OpeningBook, SearchEngine};
use anyhow::{anyhow, bail, Context, Result};
use engine_bridge::{BridgeEvent, EngineBridge, SearchRequest, Ticket};
use schach_core::{
    parse_move, parse_position, position_key, Board, Color, Difficulty, Engine, Move, SearchResult,
    MAX_DEPTH,
};
use tracing::{debug, info, warn};

const DEFAULT_DEPTH: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What the printer needs to know about a `go` search.
#[derive(Debug, Clone, Copy)]
struct GoSearch {
    /// Side to move was in check, so no move means checkmate.
    in_check: bool,
    /// Depth 0 asks for the static evaluation only.
    static_only: bool,
}

type Pending = Arc<Mutex<HashMap<u64, GoSearch>>>;

pub struct Session<W> {
    bridge: EngineBridge<SearchEngine>,
    board: Board,
    color: Color,
    out: Arc<Mutex<W>>,
    pending: Pending,
    /// Id of the next `go` search. Counts down from `u64::MAX` to stay clear
    /// of ids picked by JSON clients.
    next_id: u64,
    last: Option<Ticket>,
}

impl<W: Write + Send + 'static> Session<W> {
    pub fn new(bridge: EngineBridge<SearchEngine>, out: W) -> Self {
        Self {
            bridge,
            board: Board::startpos(),
            color: Color::White,
            out: Arc::new(Mutex::new(out)),
            pending: Arc::default(),
            next_id: u64::MAX,
            last: None,
        }
    }

    /// Printer for the events of this session's bridge.
    pub fn printer(&self) -> EventPrinter<W> {
        EventPrinter {
            out: Arc::clone(&self.out),
            pending: Arc::clone(&self.pending),
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.starts_with('{') {
            if let Some(ticket) = self.bridge.submit_json(line) {
                debug!(id = ticket.id, generation = ticket.generation, "bridge request queued");
                self.last = Some(ticket);
            }
            return Ok(Flow::Continue);
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            return Ok(Flow::Continue);
        };

        match command {
            "position" => self.position(args)?,
            "move" => self.play(args)?,
            "go" => self.go(args)?,
            "stop" => self.bridge.stop(),
            "eval" => {
                let score = self.bridge.with_engine(|e| e.evaluate(&self.board, self.color));
                self.say(format_args!("eval {score}"));
            }
            "analyze" => self.analyze(args)?,
            "pv" => {
                let depth: usize = option(args, "depth")?.unwrap_or(DEFAULT_DEPTH as usize);
                let pv = self
                    .bridge
                    .with_engine(|e| e.extract_pv(&self.board, self.color, depth));
                self.say(format_args!("pv {}", join(&pv)));
            }
            "book" => {
                if let Some(path) = args.first() {
                    let book = OpeningBook::load(path)
                        .with_context(|| format!("failed to load book {path}"))?;
                    self.bridge.with_engine(|e| e.set_opening_book(book));
                }
                let (positions, moves) = self.bridge.with_engine(|e| e.book_size());
                self.say(format_args!("book {positions} positions {moves} moves"));
            }
            "new" => {
                self.bridge.cancel();
                self.bridge.with_engine(|e| e.new_game());
                self.board = Board::startpos();
                self.color = Color::White;
            }
            "clear" => {
                self.bridge.with_engine(|e| e.clear_tt());
                info!("transposition table cleared");
            }
            "nodes" => {
                let (nodes, hashfull) = self
                    .bridge
                    .with_engine(|e| (e.nodes_evaluated(), e.hashfull()));
                self.say(format_args!("nodes {nodes} hashfull {hashfull}"));
            }
            "d" => {
                let pretty = self.board.pretty();
                let key = position_key(&self.board, self.color);
                let check = if self.board.in_check(self.color) {
                    " (check)"
                } else {
                    ""
                };
                self.say(format_args!("{pretty}{key}{check}"));
            }
            "quit" => return Ok(Flow::Quit),
            other => bail!("unknown command '{other}'"),
        }
        Ok(Flow::Continue)
    }

    pub fn report(&self, err: &anyhow::Error) {
        self.say(format_args!("error: {err:#}"));
    }

    /// Drop any pending bridge request.
    pub fn shutdown(&self) {
        self.bridge.cancel();
    }

    /// Close the session, handing back the ticket of the last search submitted.
    pub fn finish(self) -> Option<Ticket> {
        self.last
    }

    fn position(&mut self, args: &[&str]) -> Result<()> {
        let (board, color) = parse_position(&args.join(" "))?;
        board.validate()?;
        self.board = board;
        self.color = color;
        Ok(())
    }

    /// Apply moves in order. Stops at the first bad move, keeping the ones before it.
    fn play(&mut self, moves: &[&str]) -> Result<()> {
        for text in moves {
            let mv = parse_move(&self.board, self.color, text)?;
            self.board.make_move(mv);
            self.color = self.color.other();
        }
        Ok(())
    }

    fn go(&mut self, args: &[&str]) -> Result<()> {
        let move_time: Option<u64> = option(args, "movetime")?;
        // A time limit alone searches as deep as the clock allows.
        let depth = option(args, "depth")?.unwrap_or(match move_time {
            Some(_) => i32::from(MAX_DEPTH),
            None => DEFAULT_DEPTH,
        });
        let difficulty: Difficulty = option(args, "difficulty")?.unwrap_or_default();
        let elo: Option<u32> = option(args, "elo")?;

        let id = self.next_id;
        let mut request = SearchRequest::new(id, &self.board, self.color, depth, difficulty);
        request.move_time_ms = move_time;
        request.elo = elo;

        let search = GoSearch {
            in_check: self.board.in_check(self.color),
            static_only: depth == 0 && elo.is_none(),
        };
        lock(&self.pending).insert(id, search);
        match self.bridge.submit(request) {
            Ok(ticket) => {
                debug!(id, generation = ticket.generation, "search started");
                self.next_id -= 1;
                self.last = Some(ticket);
                Ok(())
            }
            Err(err) => {
                lock(&self.pending).remove(&id);
                Err(err.into())
            }
        }
    }

    fn analyze(&mut self, args: &[&str]) -> Result<()> {
        let depth = option(args, "depth")?.unwrap_or(DEFAULT_DEPTH);
        let analysis = self
            .bridge
            .with_engine(|e| e.analyze(&self.board, self.color, depth))?;
        self.say(format_args!(
            "analysis depth {} score {} nodes {} pv {}",
            analysis.depth,
            analysis.score,
            analysis.nodes,
            join(&analysis.pv)
        ));
        for scored in &analysis.top_moves {
            self.say(format_args!("top {} {}", scored.mv, scored.score));
        }
        Ok(())
    }

    fn say(&self, line: impl Display) {
        write_line(&self.out, line);
    }
}

/// Writes bridge events to the session output.
pub struct EventPrinter<W> {
    out: Arc<Mutex<W>>,
    pending: Pending,
}

impl<W: Write> EventPrinter<W> {
    pub fn print(&self, event: &BridgeEvent) {
        let search = lock(&self.pending).get(&event.id()).copied();
        let Some(search) = search else {
            match event.to_message().to_json() {
                Ok(json) => write_line(&self.out, json),
                Err(err) => warn!(id = event.id(), %err, "could not encode event"),
            }
            return;
        };

        match event {
            BridgeEvent::Progress { result, .. } => write_line(&self.out, info_line(result)),
            BridgeEvent::Completed { id, result } => {
                // Older searches were superseded and have sent all they will.
                lock(&self.pending).retain(|&other, _| other < *id);
                write_line(&self.out, bestmove_line(result, search));
            }
            BridgeEvent::Error { error, .. } => write_line(&self.out, format_args!("error: {error}")),
        }
    }
}

fn bestmove_line(result: &SearchResult, search: GoSearch) -> String {
    match result.best_move {
        Some(mv) => format!(
            "bestmove {mv} score {} depth {} nodes {}",
            result.score, result.depth, result.nodes
        ),
        None if search.static_only => format!("bestmove none score {}", result.score),
        None if search.in_check => "bestmove none (checkmate)".to_string(),
        None => "bestmove none (stalemate)".to_string(),
    }
}

/// Value following `name` in `args`, e.g. `depth 6`.
fn option<T>(args: &[&str], name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(at) = args.iter().position(|&a| a == name) else {
        return Ok(None);
    };
    let text = args
        .get(at + 1)
        .ok_or_else(|| anyhow!("missing value for {name}"))?;
    text.parse()
        .map(Some)
        .map_err(|err| anyhow!("bad {name} '{text}': {err}"))
}

fn info_line(result: &SearchResult) -> String {
    format!(
        "info depth {} score {} nodes {} pv {}",
        result.depth,
        result.score,
        result.nodes,
        join(&result.pv)
    )
}

fn join(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_line<W: Write>(out: &Mutex<W>, line: impl Display) {
    let mut out = lock(out);
    writeln!(out, "{line}").ok();
    out.flush().ok();
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
