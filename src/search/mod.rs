//! Iterative-deepening search driver: `SearchLimits`, the two-thread
//! start/stop/wait protocol, and the progress callback. The recursive
//! negamax/PVS core lives in [`pvs`].

mod pvs;
mod time;

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use crate::eval::{Evaluator, SimpleEvaluator};
use crate::moves::Move;
use crate::position::Position;
use crate::tt::TranspositionTable;
use crate::types::{is_mate_score, Depth, Value, VALUE_CHECKMATE};

pub use pvs::SearchOutcome;
pub use time::TimeBudget;

/// Parameters controlling one search, mirroring UCI `go` options without
/// parsing any UCI text itself.
#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    pub white_time_ms: Option<u64>,
    pub black_time_ms: Option<u64>,
    pub white_inc_ms: Option<u64>,
    pub black_inc_ms: Option<u64>,
    pub move_time_ms: Option<u64>,
    pub moves_to_go: Option<u32>,
    pub depth: Option<Depth>,
    pub nodes: Option<u64>,
    /// Restrict the root move list to exactly these moves, if non-empty.
    pub moves: Vec<Move>,
    pub mate: Option<i32>,
    pub ponder: bool,
    pub infinite: bool,
    pub perft: bool,
}

/// One completed-iteration progress report, handed to the caller's sink.
#[derive(Clone, Debug)]
pub struct SearchProgress {
    pub depth: Depth,
    pub sel_depth: u32,
    pub score: Value,
    pub bound: ScoreBound,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub pv: Vec<Move>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreBound {
    Exact,
    LowerBound,
    UpperBound,
}

impl SearchProgress {
    /// `cp N`, or `mate ±k` once the score crosses the mate threshold.
    #[must_use]
    pub fn score_string(&self) -> String {
        if is_mate_score(self.score) {
            let plies_to_mate = VALUE_CHECKMATE - self.score.abs();
            let moves_to_mate = (plies_to_mate + 1) / 2;
            let signed = if self.score > 0 { moves_to_mate } else { -moves_to_mate };
            format!("mate {signed}")
        } else {
            format!("cp {}", self.score)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SearchState {
    Idle = 0,
    Starting = 1,
    Searching = 2,
    Stopping = 3,
}

impl From<u8> for SearchState {
    fn from(v: u8) -> Self {
        match v {
            1 => SearchState::Starting,
            2 => SearchState::Searching,
            3 => SearchState::Stopping,
            _ => SearchState::Idle,
        }
    }
}

/// Final result of a search: the move to play and, if the ponderhit line
/// extends past it, the move we expect the opponent to reply with.
#[derive(Clone, Copy, Debug, Default)]
pub struct BestMove {
    pub best: Option<Move>,
    pub ponder: Option<Move>,
}

type ProgressSink = Box<dyn Fn(SearchProgress) + Send>;
type DoneSink = Box<dyn FnOnce(BestMove) + Send>;

/// Owns the transposition table and the worker thread across searches.
/// One `Search` instance per running engine; `start`/`stop` are the only
/// entry points callers need.
pub struct Search {
    tt: Arc<Mutex<TranspositionTable>>,
    evaluator: Arc<dyn Evaluator>,
    state: Arc<AtomicU8>,
    stop_flag: Arc<AtomicBool>,
    limits: Arc<Mutex<SearchLimits>>,
    startup: Arc<(Mutex<bool>, Condvar)>,
    handle: Option<JoinHandle<()>>,
}

impl Search {
    #[must_use]
    pub fn new(hash_mb: usize) -> Self {
        Search {
            tt: Arc::new(Mutex::new(TranspositionTable::new(hash_mb))),
            evaluator: Arc::new(SimpleEvaluator),
            state: Arc::new(AtomicU8::new(SearchState::Idle as u8)),
            stop_flag: Arc::new(AtomicBool::new(false)),
            limits: Arc::new(Mutex::new(SearchLimits::default())),
            startup: Arc::new((Mutex::new(false), Condvar::new())),
            handle: None,
        }
    }

    pub fn set_evaluator(&mut self, evaluator: Arc<dyn Evaluator>) {
        self.evaluator = evaluator;
    }

    pub fn resize_tt(&mut self, hash_mb: usize) {
        debug_assert!(self.state() == SearchState::Idle, "resize requires an idle search");
        self.tt.lock().unwrap().resize(hash_mb);
    }

    pub fn clear_tt(&mut self) {
        debug_assert!(self.state() == SearchState::Idle, "clear requires an idle search");
        self.tt.lock().unwrap().clear();
    }

    #[must_use]
    pub fn hashfull_permille(&self) -> u32 {
        self.tt.lock().unwrap().hashfull_permille()
    }

    #[must_use]
    pub fn state(&self) -> SearchState {
        SearchState::from(self.state.load(Ordering::Acquire))
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        matches!(self.state(), SearchState::Starting | SearchState::Searching)
    }

    /// Clones `position`, spawns the worker, and blocks until the worker has
    /// moved STARTING -> SEARCHING, so `stop()` is always well-defined on
    /// return.
    pub fn start(
        &mut self,
        position: Position,
        limits: SearchLimits,
        on_progress: Option<ProgressSink>,
        on_done: Option<DoneSink>,
    ) {
        debug_assert!(!self.is_searching(), "start() called while already searching");

        self.stop_flag.store(false, Ordering::Release);
        self.state.store(SearchState::Starting as u8, Ordering::Release);
        *self.limits.lock().unwrap() = limits.clone();
        *self.startup.0.lock().unwrap() = false;
        self.tt.lock().unwrap().age_entries();

        let tt = Arc::clone(&self.tt);
        let evaluator = Arc::clone(&self.evaluator);
        let state = Arc::clone(&self.state);
        let stop_flag = Arc::clone(&self.stop_flag);
        let shared_limits = Arc::clone(&self.limits);
        let startup = Arc::clone(&self.startup);

        self.handle = Some(std::thread::spawn(move || {
            {
                let (lock, cvar) = &*startup;
                *lock.lock().unwrap() = true;
                cvar.notify_one();
            }
            state.store(SearchState::Searching as u8, Ordering::Release);

            let result = run_iterative_deepening(
                position,
                &shared_limits,
                &tt,
                evaluator.as_ref(),
                &stop_flag,
                on_progress,
            );

            state.store(SearchState::Stopping as u8, Ordering::Release);
            if let Some(done) = on_done {
                done(result);
            }
            state.store(SearchState::Idle as u8, Ordering::Release);
        }));

        let (lock, cvar) = &*self.startup;
        let mut started = lock.lock().unwrap();
        while !*started {
            started = cvar.wait(started).unwrap();
        }
    }

    /// Signals the worker to abort. Does not block; see
    /// [`Search::wait_while_searching`] for synchronous stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    pub fn wait_while_searching(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Promotes an in-flight ponder/infinite search to a timed one by
    /// re-deriving its time budget from `new_limits` in place.
    pub fn ponder_hit(&self, new_limits: SearchLimits) {
        let mut limits = self.limits.lock().unwrap();
        limits.infinite = new_limits.infinite;
        limits.ponder = false;
        limits.white_time_ms = new_limits.white_time_ms;
        limits.black_time_ms = new_limits.black_time_ms;
        limits.white_inc_ms = new_limits.white_inc_ms;
        limits.black_inc_ms = new_limits.black_inc_ms;
        limits.move_time_ms = new_limits.move_time_ms;
        limits.moves_to_go = new_limits.moves_to_go;
    }
}

impl Default for Search {
    fn default() -> Self {
        Search::new(crate::options::DEFAULT_HASH_MB)
    }
}

impl Drop for Search {
    fn drop(&mut self) {
        self.stop();
        self.wait_while_searching();
    }
}

/// Runs the iterative-deepening loop until the time/depth/node limit is hit
/// or the worker is stopped, reporting each completed iteration through
/// `on_progress` and returning the deepest completed iteration's best move.
fn run_iterative_deepening(
    mut position: Position,
    limits: &Mutex<SearchLimits>,
    tt: &Mutex<TranspositionTable>,
    evaluator: &dyn Evaluator,
    stop_flag: &AtomicBool,
    on_progress: Option<ProgressSink>,
) -> BestMove {
    let start = Instant::now();
    let side = position.side_to_move();
    let snapshot = limits.lock().unwrap().clone();
    let budget = time::compute_budget(&snapshot, side);
    let node_limit = snapshot.nodes;
    let max_depth = snapshot.depth.unwrap_or(MAX_SEARCH_DEPTH).min(MAX_SEARCH_DEPTH);

    let root_moves = crate::movegen::generate_legal(&mut position, crate::movegen::GenMode::All);
    let fallback: Option<Move> = if snapshot.moves.is_empty() {
        root_moves.iter().next().copied()
    } else {
        root_moves.iter().copied().find(|m| snapshot.moves.contains(m))
    };

    let Some(fallback_move) = fallback else {
        return BestMove::default();
    };

    let mut best = BestMove { best: Some(fallback_move), ponder: None };
    let mut previous_value = None;
    let mut previous_pv: Vec<Move> = Vec::new();

    let mut depth = 1;
    while depth <= max_depth {
        if stop_flag.load(Ordering::Acquire) {
            break;
        }

        let mut tt_guard = tt.lock().unwrap();
        let time_check = time::TimeCheck::new(budget);
        let mut worker = pvs::SearchWorker::new(
            position.clone(),
            &mut tt_guard,
            evaluator,
            stop_flag,
            time_check,
            node_limit,
        );

        let outcome = worker.aspiration_search(depth, previous_value);
        let nodes = worker.nodes;
        let sel_depth = worker.sel_depth;
        let aborted = worker.was_aborted();
        drop(worker);
        drop(tt_guard);

        let Some(SearchOutcome { value, pv }) = outcome else {
            if aborted {
                break;
            }
            depth += 1;
            continue;
        };

        previous_value = Some(value);
        if !pv.is_empty() {
            previous_pv = pv.clone();
            best = BestMove { best: pv.first().copied(), ponder: pv.get(1).copied() };
        }

        if let Some(sink) = &on_progress {
            let elapsed = start.elapsed();
            let time_ms = elapsed.as_millis().max(1) as u64;
            sink(SearchProgress {
                depth,
                sel_depth,
                score: value,
                bound: ScoreBound::Exact,
                nodes,
                nps: nodes * 1000 / time_ms,
                time_ms,
                pv: previous_pv.clone(),
            });
        }

        if let Some(mate_plies) = snapshot.mate {
            if is_mate_score(value) && (VALUE_CHECKMATE - value.abs() + 1) / 2 <= mate_plies.abs()
            {
                break;
            }
        }

        if let Some(b) = budget {
            if start.elapsed() >= b.soft {
                break;
            }
        }

        depth += 1;
    }

    best
}

const MAX_SEARCH_DEPTH: Depth = 64;
