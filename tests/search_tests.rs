//! Whole-engine search behaviour through the public API.

use std::sync::atomic::AtomicBool;

use tactica::board::{search, Board, Score, SearchConfig, SearchResult, SearchState, DRAW, MATE};

fn run(fen: &str, depth: u32) -> SearchResult {
    tactica::init();
    let mut board = Board::from_fen(fen);
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);
    search(&mut board, &mut state, SearchConfig::depth(depth), &stop)
}

fn best_uci(result: &SearchResult) -> String {
    result.best_move.map_or_else(|| "0000".to_string(), |m| m.to_string())
}

#[test]
fn finds_mate_in_one_back_rank() {
    let result = run("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", 4);
    assert_eq!(best_uci(&result), "e1e8");
}

#[test]
fn finds_scholars_mate() {
    let result = run(
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4",
        4,
    );
    assert_eq!(best_uci(&result), "h5f7");
    assert_eq!(result.score(), Score::Mate(1));
}

#[test]
fn takes_a_free_pawn() {
    // Knight and pawn against a lone pawn that cannot be defended.
    let fen = "4k3/8/8/8/3p4/5N2/6P1/4K3 w - - 0 1";
    let result = run(fen, 5);
    let mv = result.best_move.expect("a move");
    assert!(Board::from_fen(fen).is_legal(mv));
    assert!(result.score >= 300, "score {}", result.score);
}

#[test]
fn rook_endgame_is_winning_at_every_depth() {
    for depth in 1..=6 {
        let result = run("8/8/8/4k3/8/8/8/R3K3 w - - 0 1", depth);
        assert!(result.score > 300, "depth {depth}: score {}", result.score);
    }
}

#[test]
fn losing_side_sees_negative_score() {
    let result = run("8/8/8/4k3/8/8/8/R3K3 b - - 0 1", 6);
    assert!(result.score < -300, "score {}", result.score);
}

#[test]
fn checkmated_and_stalemated_roots() {
    let mated = run("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1", 5);
    assert!(mated.best_move.is_none());
    assert_eq!(mated.score, -MATE);

    let stalemate = run("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 5);
    assert!(stalemate.best_move.is_none());
    assert_eq!(stalemate.score, DRAW);
}

#[test]
fn fresh_states_search_deterministically() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let a = run(fen, 6);
    let b = run(fen, 6);
    assert_eq!(a.best_move, b.best_move);
    assert_eq!(a.score, b.score);
    assert_eq!(a.nodes, b.nodes);
    assert_eq!(a.pv, b.pv);
}

#[test]
fn deeper_search_keeps_board_intact() {
    tactica::init();
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut board = Board::from_fen(fen);
    let mut state = SearchState::new(1);
    let stop = AtomicBool::new(false);
    for depth in 1..=6 {
        let result = search(&mut board, &mut state, SearchConfig::depth(depth), &stop);
        assert_eq!(result.depth, depth);
        assert_eq!(board.to_fen(), fen);
    }
    assert!(state.hashfull() > 0);
}

#[test]
fn time_limit_is_respected() {
    tactica::init();
    let mut board = Board::startpos();
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);
    let start = std::time::Instant::now();
    let result = search(&mut board, &mut state, SearchConfig::time(200), &stop);
    assert!(start.elapsed().as_millis() < 1500);
    assert!(result.best_move.is_some());
    assert!(result.depth >= 1);
}
