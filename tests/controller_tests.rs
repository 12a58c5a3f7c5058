//! Controller tests - full lock/merge/clear cycles through `step`

use tetris_2048::core::{
    Error, GameConfig, GameController, Grid, Piece, PieceFactory, SavedGame, ScriptedPieces,
};
use tetris_2048::types::{GamePhase, GameStatus, Input, LockEvent, ShapeKind, Tile};

fn o_piece(values: [u64; 4]) -> Piece {
    Piece::new(ShapeKind::O, values.map(|v| Tile::new(v).unwrap()))
}

fn scripted_game(rows: &[&[u64]], pieces: Vec<Piece>) -> GameController<ScriptedPieces> {
    let grid = Grid::from_rows(rows).unwrap();
    let source = ScriptedPieces::new(pieces).unwrap();
    GameController::with_source(grid, source, GameConfig::default()).unwrap()
}

#[test]
fn test_square_of_twos_merges_into_eight() {
    let mut game = scripted_game(&[&[0; 4], &[0; 4], &[0; 4], &[0; 4]], vec![o_piece([2, 2, 2, 2])]);
    let spawned = game.active().unwrap();
    assert_eq!((spawned.x, spawned.y), (1, 0));

    let view = game.step(Input::HardDrop);

    assert_eq!(view.occupied_count(), 1);
    assert_eq!(view.cell(1, 3), Some(Tile::new(8)));
    assert_eq!(view.score, 16);
    assert_eq!(
        view.last_event,
        Some(LockEvent {
            merges: 3,
            merge_score: 16,
            rows_cleared: 0,
            clear_bonus: 0,
            max_tile: Tile::new(8),
        })
    );
    assert_eq!(view.phase, GamePhase::Falling);
}

#[test]
fn test_full_row_of_mismatched_values_clears() {
    let mut game = scripted_game(
        &[
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
            &[8, 0, 0, 0],
            &[2, 4, 0, 0],
        ],
        vec![o_piece([32, 64, 8, 16])],
    );

    game.step(Input::Right);
    let view = game.step(Input::HardDrop);

    // Bottom row [2, 4, 8, 16] is removed; the bonus uses the 64 on the board.
    let expected = Grid::from_rows(&[
        &[0, 0, 0, 0],
        &[0, 0, 0, 0],
        &[0, 0, 0, 0],
        &[0, 0, 0, 0],
        &[0, 0, 0, 0],
        &[8, 0, 32, 64],
    ])
    .unwrap();
    assert_eq!(game.grid(), &expected);
    assert_eq!(view.lines, 1);
    assert_eq!(view.score, 640);
    let event = view.last_event.unwrap();
    assert_eq!((event.merges, event.rows_cleared, event.clear_bonus), (0, 1, 640));
}

#[test]
fn test_blocked_spawn_is_game_over() {
    let mut game = scripted_game(
        &[&[0, 0, 0, 0], &[0, 2, 4, 2], &[0, 4, 2, 4], &[0, 2, 4, 2]],
        vec![o_piece([2, 2, 2, 2])],
    );

    assert!(game.is_game_over());
    assert_eq!(game.status(), GameStatus::GameOver);
    assert_eq!(game.active(), None);
    assert_eq!(game.score(), 0);

    let view = game.step(Input::HardDrop);
    assert!(view.is_game_over());
    assert_eq!(view.next, None);
}

#[test]
fn test_score_freezes_at_game_over() {
    let mut game = scripted_game(
        &[&[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 16, 2, 4], &[0, 2, 4, 2]],
        vec![o_piece([8, 16, 16, 8])],
    );

    let first = game.step(Input::HardDrop);
    assert_eq!(first.score, 144);
    assert_eq!(first.status, GameStatus::Running);

    let over = game.step(Input::HardDrop);
    assert_eq!(over.status, GameStatus::GameOver);
    assert_eq!(over.score, 144);

    for input in [Input::None, Input::Left, Input::Rotate, Input::Hold, Input::HardDrop] {
        assert_eq!(game.step(input), over);
    }
}

#[test]
fn test_rejected_moves_leave_state_unchanged() {
    let mut game = scripted_game(&[&[0; 4], &[0; 4], &[0; 4], &[0; 4]], vec![o_piece([2, 4, 8, 16])]);

    let at_wall = game.step(Input::Left);
    assert_eq!(at_wall.active.unwrap().x, 0);
    assert_eq!(game.step(Input::Left), at_wall);
}

#[test]
fn test_soft_drop_locks_when_grounded() {
    let mut game = scripted_game(&[&[0; 4], &[0; 4], &[0; 4], &[0; 4]], vec![o_piece([2, 4, 8, 16])]);

    game.step(Input::SoftDrop);
    let grounded = game.step(Input::SoftDrop);
    assert_eq!(grounded.active.unwrap().y, 2);
    assert_eq!(grounded.ghost_y, Some(2));
    assert_eq!(grounded.pieces_spawned, 1);

    let locked = game.step(Input::SoftDrop);
    assert_eq!(locked.pieces_spawned, 2);
    assert_eq!(locked.occupied_count(), 4);
    assert_eq!(locked.score, 0);
}

#[test]
fn test_same_seed_same_game() {
    let script = [Input::Left, Input::Rotate, Input::None, Input::HardDrop, Input::Right, Input::Hold];
    let mut a = GameController::new(10, 20, 42, GameConfig::default()).unwrap();
    let mut b = GameController::new(10, 20, 42, GameConfig::default()).unwrap();

    for input in script.iter().cycle().take(200) {
        assert_eq!(a.step(*input), b.step(*input));
    }
}

#[test]
fn test_invalid_dimensions_are_rejected() {
    assert!(GameController::new(2, 20, 1, GameConfig::default()).is_err());
}

#[test]
fn test_snapshot_serializes_to_json() {
    let game = GameController::new(6, 8, 7, GameConfig::default()).unwrap();
    let value = serde_json::to_value(game.snapshot()).unwrap();

    assert_eq!(value["width"], 6);
    assert_eq!(value["cells"].as_array().unwrap().len(), 48);
    assert_eq!(value["status"], serde_json::json!("Running"));
}

#[test]
fn test_resumed_session_matches_uninterrupted_one() {
    let script = [Input::Left, Input::Hold, Input::Rotate, Input::None, Input::HardDrop, Input::Right];
    let mut game = GameController::new(8, 16, 77, GameConfig::default()).unwrap();
    for input in script.iter().cycle().take(40) {
        game.step(*input);
    }

    let json = serde_json::to_string(&game.save()).unwrap();
    let saved: SavedGame<PieceFactory> = serde_json::from_str(&json).unwrap();
    let mut resumed = GameController::resume(saved).unwrap();
    assert_eq!(resumed.snapshot(), game.snapshot());

    for input in script.iter().cycle().take(300) {
        assert_eq!(resumed.step(*input), game.step(*input));
    }
}

#[test]
fn test_resume_keeps_hold_and_progress() {
    let mut game = scripted_game(
        &[&[0; 4], &[0; 4], &[0; 4], &[0; 4], &[8, 0, 0, 0], &[2, 4, 0, 0]],
        vec![o_piece([32, 64, 8, 16]), o_piece([2, 4, 2, 4])],
    );
    game.step(Input::Right);
    game.step(Input::HardDrop);
    game.step(Input::Hold);

    let resumed = GameController::resume(game.save()).unwrap();

    assert_eq!(resumed.score(), 640);
    assert_eq!(resumed.lines(), 1);
    assert_eq!(resumed.held_piece(), game.held_piece());
    assert!(!resumed.can_hold());
    assert_eq!(resumed.snapshot(), game.snapshot());
}

#[test]
fn test_resume_rejects_inconsistent_saves() {
    let game = GameController::new(6, 8, 3, GameConfig::default()).unwrap();

    let mut short = game.save();
    short.cells.pop();
    assert!(matches!(GameController::resume(short), Err(Error::InvalidSave(_))));

    let mut buried = game.save();
    buried.cells.iter_mut().for_each(|cell| *cell = Tile::new(2));
    assert!(matches!(GameController::resume(buried), Err(Error::InvalidSave(_))));

    let mut stalled = game.save();
    stalled.phase = GamePhase::Merging;
    assert!(GameController::resume(stalled).is_err());
}
