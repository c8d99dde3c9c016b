use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use tactica::board::{PositionError, SearchInfo, STARTPOS_FEN};
use tactica::engine::{EngineController, SearchRequest};

#[test]
fn depth_search_completes_and_reports_once() {
    let mut engine = EngineController::new(4);
    engine
        .set_position(None, &["e2e4", "e7e5"])
        .expect("legal moves");

    let (tx, rx) = mpsc::channel();
    engine
        .start_search(&SearchRequest::depth(4), move |result| {
            tx.send(result.best_move).unwrap();
        })
        .expect("spawn search thread");

    let best = rx.recv_timeout(Duration::from_secs(30)).expect("search finished");
    let result = engine.wait().expect("result");
    assert_eq!(best, result.best_move);
    assert_eq!(result.depth, 4);

    let mut board = engine.board().clone();
    assert!(board.is_legal(result.best_move.unwrap()));
    assert!(!engine.is_searching());
}

#[test]
fn stop_interrupts_an_infinite_search() {
    let mut engine = EngineController::new(4);
    engine
        .start_search(&SearchRequest::default(), |_| {})
        .expect("spawn search thread");
    std::thread::sleep(Duration::from_millis(100));
    assert!(engine.is_searching());

    let result = engine.stop_search().expect("result");
    assert!(result.best_move.is_some());
    assert!(!engine.is_searching());
    assert!(engine.stop_search().is_none());
}

#[test]
fn move_time_search_finishes_on_its_own() {
    let mut engine = EngineController::new(4);
    engine
        .start_search(&SearchRequest::move_time(100), |_| {})
        .expect("spawn search thread");
    let result = engine.wait().expect("result");
    assert!(result.best_move.is_some());
}

#[test]
fn rejected_position_keeps_the_current_one() {
    let mut engine = EngineController::new(1);
    engine.set_position(None, &["d2d4"]).unwrap();
    let before = engine.board().to_fen();

    let err = engine.set_position(None, &["d2d4", "e1e3"]).unwrap_err();
    assert!(matches!(err, PositionError::Move { index: 1, .. }));
    assert_eq!(engine.board().to_fen(), before);

    assert!(engine.set_position(Some("not a fen"), &[]).is_err());
    assert_eq!(engine.board().to_fen(), before);
}

#[test]
fn info_callback_sees_every_iteration() {
    let mut engine = EngineController::new(1);
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    engine.set_info_callback(Some(Arc::new(move |_: &SearchInfo| {
        seen.fetch_add(1, Ordering::Relaxed);
    })));
    engine
        .start_search(&SearchRequest::depth(5), |_| {})
        .unwrap();
    engine.wait();
    assert_eq!(count.load(Ordering::Relaxed), 5);
}

#[test]
fn new_game_resets_position_and_tables() {
    let mut engine = EngineController::new(1);
    engine.set_position(None, &["g1f3"]).unwrap();
    engine
        .start_search(&SearchRequest::depth(5), |_| {})
        .unwrap();
    engine.wait();
    assert!(engine.search_state().lock().hashfull() > 0);

    engine.new_game();
    assert_eq!(engine.board().to_fen(), STARTPOS_FEN);
    assert_eq!(engine.search_state().lock().hashfull(), 0);

    engine.resize_hash(2);
    assert_eq!(engine.search_state().lock().hashfull(), 0);
}
