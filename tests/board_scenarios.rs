//! Scripted puzzle scenarios with exact tick counts.

use panel_pop::core::{DialogKind, DropPhase, GameBoard};
use panel_pop::types::DrawType;

fn ticks(board: &mut GameBoard, n: usize) {
    for _ in 0..n {
        board.tick();
    }
}

fn cursor_to(board: &mut GameBoard, x: i32, y: i32) {
    while board.cursor().y < y && board.move_down() {}
    while board.cursor().x < x && board.move_right() {}
    assert_eq!((board.cursor().x, board.cursor().y), (x, y));
}

#[test]
fn three_in_a_row_pops_and_clears() {
    let mut board = GameBoard::puzzle("rrr   ").unwrap();

    board.tick();
    assert_eq!(board.pop_animations().len(), 1);
    assert!(board.is_paused());
    for x in 0..3 {
        assert!(board.tile_at(x, 11).is_some_and(|t| t.matched && !t.swappable));
    }

    ticks(&mut board, 95);
    assert_eq!(board.tiles().len(), 3);

    board.tick();
    assert!(board.tiles().is_empty());
    assert!(board.pop_animations().is_empty());
    assert_eq!(board.combo_trackers().len(), 3);

    board.tick();
    assert!(board.combo_trackers().is_empty());
    assert_eq!(board.lowest_visible_row(), 0);
    assert_eq!(board.to_string(), "");
}

#[test]
fn four_match_shows_pop_dialog() {
    let mut board = GameBoard::puzzle("rrrr  ").unwrap();
    ticks(&mut board, 4);

    let dialogs = board.pop_dialogs();
    assert_eq!(dialogs.len(), 1);
    assert_eq!(dialogs[0].kind, DialogKind::Pop);
    assert_eq!(dialogs[0].count, 4);
    assert_eq!(dialogs[0].x, 0.0);
    assert_eq!(dialogs[0].y, 175.0);
}

#[test]
fn swap_completes_a_match() {
    let mut board = GameBoard::puzzle(" r rr ").unwrap();
    cursor_to(&mut board, 1, 11);

    assert!(board.swap());
    assert!(!board.swap());

    ticks(&mut board, 4);
    assert!(board.pop_animations().is_empty());

    board.tick();
    assert_eq!(board.to_string().lines().last(), Some("  rrr "));
    assert_eq!(board.pop_animations().len(), 1);
    assert_eq!(board.pop_animations()[0].queued_pops.len(), 3);
}

#[test]
fn floating_tile_stalls_then_falls() {
    let mut board = GameBoard::puzzle("r     \n     g\n     g").unwrap();
    assert!(board.tile_at(0, 9).is_some());

    ticks(&mut board, 13);
    assert!(board.tile_at(0, 10).is_some());
    assert!(board.tile_at(0, 9).is_none());

    board.tick();
    let tile = board.tile_at(0, 11).unwrap();
    assert!(!tile.swappable);
    assert_eq!(board.dropping_columns().len(), 1);
    assert_eq!(board.dropping_columns()[0].phase, DropPhase::Bouncing);

    let mut expected = "      \n".repeat(10);
    expected.push_str("     g\n");
    expected.push_str("r    g\n");
    assert_eq!(board.to_string(), expected);

    ticks(&mut board, 14);
    assert!(board.dropping_columns().is_empty());
    let tile = board.tile_at(0, 11).unwrap();
    assert!(tile.swappable);
    assert_eq!(tile.draw_type, DrawType::Regular);
}

#[test]
fn falling_group_continues_the_chain() {
    let mut board = GameBoard::puzzle("g     \nb     \nb     \nbgg   \nprr   ").unwrap();

    board.tick();
    assert_eq!(board.pop_animations().len(), 1);
    assert_eq!(board.combo_count(), 1);

    ticks(&mut board, 113);
    assert_eq!(board.combo_count(), 1);

    board.tick();
    assert_eq!(board.combo_count(), 2);
}

#[test]
fn simultaneous_groups_are_all_matched() {
    let mut board = GameBoard::puzzle("rrr   \nggg   ").unwrap();
    board.tick();
    assert!(board.tiles().values().all(|t| t.matched));
}

fn assert_swap_refused(board: &mut GameBoard) {
    let before = board.to_string();
    let cursor = board.cursor();
    assert!(!board.swap());
    assert_eq!(board.to_string(), before);
    assert_eq!(board.cursor(), cursor);
    assert!(board.swap_animation().is_none());
}

#[test]
fn swap_refused_under_a_stalled_column() {
    // The red tile hangs over an empty cell and stalls before falling into it.
    let mut board = GameBoard::puzzle("r     \n g    \nyb    ").unwrap();
    cursor_to(&mut board, 0, 10);

    let mut free = board.clone();
    assert!(free.swap());

    board.tick();
    assert_eq!(board.dropping_columns().len(), 1);
    assert_eq!(board.dropping_columns()[0].x, 0);
    assert_eq!(board.dropping_columns()[0].bottom_y, 9);
    assert!(board.tile_at(1, 10).is_some_and(|t| t.swappable));

    assert_swap_refused(&mut board);
}

#[test]
fn swap_refused_over_a_final_pop() {
    let mut board = GameBoard::puzzle(" g    \nrrr   ").unwrap();
    cursor_to(&mut board, 1, 10);

    board.tick();
    let mut early = board.clone();
    assert!(early.swap());

    let mut guard = 0;
    while !board.pop_animations().first().is_some_and(|p| p.on_final_pop()) {
        board.tick();
        guard += 1;
        assert!(guard < 200, "group never reached its last pop");
    }
    assert!(board.tile_at(1, 10).is_some_and(|t| t.swappable));

    assert_swap_refused(&mut board);
}

#[test]
fn swap_refused_for_matched_tiles() {
    let mut board = GameBoard::puzzle("rrr   ").unwrap();
    cursor_to(&mut board, 0, 11);
    board.tick();
    assert!(board.tile_at(0, 11).is_some_and(|t| t.matched));

    assert_swap_refused(&mut board);
}

#[test]
fn swap_refused_for_bouncing_tiles() {
    let mut board = GameBoard::puzzle("r     \n     g\n     g").unwrap();
    cursor_to(&mut board, 0, 11);
    ticks(&mut board, 14);
    assert!(board.tile_at(0, 11).is_some_and(|t| !t.swappable));
    assert!(board.tile_at(1, 11).is_none());

    assert_swap_refused(&mut board);
}
