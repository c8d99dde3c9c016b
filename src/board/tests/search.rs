//! Search behaviour on small positions.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use crate::board::search::{DRAW, MATE};
use crate::board::{search, Board, Score, SearchConfig, SearchInfo, SearchResult, SearchState};

fn search_depth(fen: &str, depth: u32) -> (Board, SearchResult) {
    crate::init();
    let mut board = Board::from_fen(fen);
    let mut state = SearchState::new(1);
    let stop = AtomicBool::new(false);
    let result = search(&mut board, &mut state, SearchConfig::depth(depth), &stop);
    (board, result)
}

#[test]
fn finds_mate_in_one() {
    let (_, result) = search_depth("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", 3);
    assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some("e1e8"));
    assert_eq!(result.score(), Score::Mate(1));
    assert_eq!(result.score, MATE - 1);
}

#[test]
fn checkmated_root_has_no_move() {
    let (_, result) = search_depth("7k/7Q/7K/8/8/8/8/8 b - - 0 1", 4);
    assert!(result.best_move.is_none());
    assert_eq!(result.score, -MATE);
    assert_eq!(result.nodes, 0);
}

#[test]
fn stalemated_root_scores_draw() {
    let (_, result) = search_depth("k7/8/1QK5/8/8/8/8/8 b - - 0 1", 4);
    assert!(result.best_move.is_none());
    assert_eq!(result.score, DRAW);
}

#[test]
fn single_reply_is_returned() {
    // Back-rank check with the king's only flight on g7.
    let (mut board, result) = search_depth("R6k/7p/8/8/8/8/8/K7 b - - 0 1", 3);
    let legal = board.legal_moves();
    assert_eq!(legal.len(), 1);
    assert_eq!(result.best_move, Some(legal.as_slice()[0]));
}

#[test]
fn wins_a_hanging_queen() {
    let (_, result) = search_depth("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1", 4);
    assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some("d2d5"));
    assert!(result.score > 300, "score {}", result.score);
}

#[test]
fn prefers_mate_over_stalemate() {
    // Qc7 stalemates, Qc8 mates.
    let (mut board, result) = search_depth("k7/8/1K6/8/8/8/8/2Q5 w - - 0 1", 4);
    let mv = result.best_move.expect("a move");
    board.make_move(mv);
    assert!(board.in_check());
    assert!(board.has_no_moves());
    assert_eq!(result.score(), Score::Mate(1));
}

#[test]
fn search_restores_the_board() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let (board, result) = search_depth(fen, 4);
    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.game_ply(), 0);
    assert_eq!(board.hash(), board.compute_hash());
    assert!(result.best_move.is_some());
}

#[test]
fn pv_starts_with_best_move_and_is_legal() {
    let (mut board, result) = search_depth(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        5,
    );
    assert_eq!(result.pv.first().copied(), result.best_move);
    assert_eq!(result.ponder_move, result.pv.get(1).copied());
    for &mv in &result.pv {
        assert!(board.is_legal(mv), "{mv} in pv is not legal");
        board.make_move(mv);
    }
}

#[test]
fn node_limit_is_exact() {
    crate::init();
    let mut board = Board::startpos();
    let mut state = SearchState::new(1);
    let config = SearchConfig::default().with_nodes(3000);
    let result = search(&mut board, &mut state, config, &AtomicBool::new(false));
    assert!(result.nodes <= 3000, "{} nodes", result.nodes);
    assert!(result.best_move.is_some());
}

#[test]
fn preset_stop_still_yields_a_legal_move() {
    crate::init();
    let mut board = Board::startpos();
    let mut state = SearchState::new(1);
    let stop = AtomicBool::new(true);
    let result = search(&mut board, &mut state, SearchConfig::default(), &stop);
    let mv = result.best_move.expect("fallback move");
    assert!(board.is_legal(mv));
}

#[test]
fn info_callback_reports_each_depth() {
    crate::init();
    let seen: Arc<Mutex<Vec<SearchInfo>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let config = SearchConfig::depth(4).with_info_callback(Arc::new(move |info: &SearchInfo| {
        sink.lock().unwrap().push(info.clone());
    }));
    let mut board = Board::startpos();
    let mut state = SearchState::new(1);
    let result = search(&mut board, &mut state, config, &AtomicBool::new(false));

    let seen = seen.lock().unwrap();
    let depths: Vec<u32> = seen.iter().map(|i| i.depth).collect();
    assert_eq!(depths, vec![1, 2, 3, 4]);
    assert!(seen.windows(2).all(|w| w[0].nodes <= w[1].nodes));
    let last = seen.last().unwrap();
    assert_eq!(last.pv, result.pv);
    assert!(last.seldepth >= last.depth);
}

#[test]
fn node_limit_mid_iteration_reports_last_completed_depth() {
    crate::init();
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let seen: Arc<Mutex<Vec<SearchInfo>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let config = SearchConfig::depth(5).with_info_callback(Arc::new(move |info: &SearchInfo| {
        sink.lock().unwrap().push(info.clone());
    }));
    let mut board = Board::from_fen(fen);
    let mut state = SearchState::new(1);
    search(&mut board, &mut state, config, &AtomicBool::new(false));

    let seen = seen.lock().unwrap();
    let info4 = seen.iter().find(|i| i.depth == 4).unwrap().clone();
    let info5 = seen.iter().find(|i| i.depth == 5).unwrap();
    assert!(info4.nodes < info5.nodes);
    let limit = (info4.nodes + info5.nodes) / 2;

    // Same state size and position, so the first four iterations replay exactly.
    let mut board = Board::from_fen(fen);
    let mut state = SearchState::new(1);
    let config = SearchConfig::depth(5).with_nodes(limit);
    let result = search(&mut board, &mut state, config, &AtomicBool::new(false));
    assert_eq!(result.depth, 4);
    assert!(result.nodes <= limit);
    assert_eq!(result.best_move, info4.pv.first().copied());
    assert_eq!(result.score(), info4.score);
    assert_eq!(result.pv, info4.pv);
}

#[test]
fn same_state_finds_same_move_after_new_game() {
    crate::init();
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let mut state = SearchState::new(1);
    let mut board = Board::from_fen(fen);
    let first = search(&mut board, &mut state, SearchConfig::depth(5), &AtomicBool::new(false));
    state.new_game();
    let second = search(&mut board, &mut state, SearchConfig::depth(5), &AtomicBool::new(false));
    assert_eq!(first.best_move, second.best_move);
    assert_eq!(first.score, second.score);
    assert_eq!(first.nodes, second.nodes);
}

#[test]
fn dead_drawn_material_scores_zero() {
    let (_, result) = search_depth("8/8/4k3/8/8/3NK3/8/8 w - - 0 1", 5);
    assert!(result.best_move.is_some());
    assert_eq!(result.score, DRAW);
}
