//! Engine controller: owns the game position and runs searches on a
//! dedicated worker thread.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use super::time::{SearchRequest, TimeConfig};
use crate::board::{
    search, Board, PositionError, SearchInfoCallback, SearchResult, SearchState, STARTPOS_FEN,
};

/// Search thread stack size (32 MB). The recursion is deep and each
/// frame carries fixed-size move lists.
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// A running search.
pub struct SearchJob {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<SearchResult>,
}

impl SearchJob {
    /// Ask the worker to finish its current iteration early.
    pub fn signal_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and take its result.
    fn join(self) -> Option<SearchResult> {
        match self.handle.join() {
            Ok(result) => Some(result),
            Err(_) => {
                log::error!("search thread panicked");
                None
            }
        }
    }
}

/// Position, shared search state and at most one search worker.
pub struct EngineController {
    board: Board,
    search_state: Arc<Mutex<SearchState>>,
    current_job: Option<SearchJob>,
    info_callback: Option<SearchInfoCallback>,
    time_config: TimeConfig,
}

impl EngineController {
    /// Controller at the starting position with a `tt_mb` MiB hash table.
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        crate::init();
        EngineController {
            board: Board::new(),
            search_state: Arc::new(Mutex::new(SearchState::new(tt_mb))),
            current_job: None,
            info_callback: None,
            time_config: TimeConfig::default(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn search_state(&self) -> &Arc<Mutex<SearchState>> {
        &self.search_state
    }

    pub fn set_info_callback(&mut self, cb: Option<SearchInfoCallback>) {
        self.info_callback = cb;
    }

    pub fn set_time_config(&mut self, config: TimeConfig) {
        self.time_config = config;
    }

    /// Set up a position from FEN (`None` for the start position) and replay
    /// `moves`. On any error the current position is kept.
    pub fn set_position(&mut self, fen: Option<&str>, moves: &[&str]) -> Result<(), PositionError> {
        match Board::from_position(fen.unwrap_or(STARTPOS_FEN), moves) {
            Ok(board) => {
                self.stop_search();
                self.board = board;
                Ok(())
            }
            Err(e) => {
                log::warn!("rejected position: {e}");
                Err(e)
            }
        }
    }

    /// Start searching the current position, stopping any running search
    /// first. `on_complete` runs on the worker with the final result.
    pub fn start_search<F>(&mut self, request: &SearchRequest, on_complete: F) -> io::Result<()>
    where
        F: FnOnce(&SearchResult) + Send + 'static,
    {
        self.stop_search();

        let mut config = request.to_config(&self.time_config);
        if let Some(cb) = &self.info_callback {
            config = config.with_info_callback(Arc::clone(cb));
        }
        log::info!("search started: {config:?}");

        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let state = Arc::clone(&self.search_state);
        let mut board = self.board.clone();

        let handle = thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let result = {
                    let mut guard = state.lock();
                    search(&mut board, &mut guard, config, &worker_stop)
                };
                match result.best_move {
                    Some(mv) => log::info!(
                        "bestmove {mv} (depth {}, {} nodes)",
                        result.depth,
                        result.nodes
                    ),
                    None => log::info!("no legal move"),
                }
                on_complete(&result);
                result
            })?;

        self.current_job = Some(SearchJob { stop, handle });
        Ok(())
    }

    /// Stop the running search, if any, and return its result.
    pub fn stop_search(&mut self) -> Option<SearchResult> {
        let job = self.current_job.take()?;
        job.signal_stop();
        log::info!("search stopped");
        job.join()
    }

    /// Wait for the running search to finish on its own.
    pub fn wait(&mut self) -> Option<SearchResult> {
        self.current_job.take()?.join()
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.current_job.as_ref().is_some_and(|job| !job.is_finished())
    }

    /// Back to the start position with empty hash and heuristic tables.
    pub fn new_game(&mut self) {
        self.stop_search();
        self.board = Board::new();
        self.search_state.lock().new_game();
    }

    pub fn resize_hash(&mut self, mb: usize) {
        self.stop_search();
        self.search_state.lock().resize_hash(mb);
    }

    pub fn clear_hash(&mut self) {
        self.stop_search();
        self.search_state.lock().clear_hash();
    }
}

impl Drop for EngineController {
    fn drop(&mut self) {
        self.stop_search();
    }
}
