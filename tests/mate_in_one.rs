use std::sync::atomic::AtomicBool;

use serde::Deserialize;

use tactica::board::{search, Board, Score, SearchConfig, SearchState};

#[derive(Deserialize)]
struct ProblemSet {
    problems: Vec<Problem>,
}

#[derive(Deserialize)]
struct Problem {
    #[serde(rename = "type")]
    kind: String,
    fen: String,
    moves: String,
}

fn load() -> ProblemSet {
    let data = include_str!("data/mates.json");
    serde_json::from_str(data).expect("invalid mates.json")
}

fn first_uci_from_line(moves: &str) -> String {
    let first = moves.split(';').next().unwrap_or(moves);
    first.replace('-', "")
}

fn is_checkmate(board: &mut Board) -> bool {
    board.in_check() && board.has_no_moves()
}

#[test]
fn mate_in_one_solutions_are_checkmate() {
    tactica::init();
    for problem in load().problems.iter().filter(|p| p.kind == "Mate in One") {
        let uci = first_uci_from_line(&problem.moves);
        let mut board = Board::from_position(&problem.fen, &[uci.as_str()])
            .unwrap_or_else(|e| panic!("{}: {e}", problem.fen));
        assert!(
            is_checkmate(&mut board),
            "mate in one failed for fen: {} move: {uci}",
            problem.fen
        );
    }
}

#[test]
fn search_finds_every_mate() {
    tactica::init();
    for problem in &load().problems {
        let (depth, moves) = match problem.kind.as_str() {
            "Mate in One" => (3, 1),
            "Mate in Two" => (5, 2),
            _ => continue,
        };

        let mut board = Board::from_fen(&problem.fen);
        let mut state = SearchState::new(4);
        let stop = AtomicBool::new(false);
        let result = search(&mut board, &mut state, SearchConfig::depth(depth), &stop);

        assert_eq!(
            result.score(),
            Score::Mate(moves),
            "wrong score for fen: {}",
            problem.fen
        );
        let best = result.best_move.expect("a move");
        if moves == 1 {
            board.make_move(best);
            assert!(is_checkmate(&mut board), "{best} does not mate in {}", problem.fen);
        }
    }
}
