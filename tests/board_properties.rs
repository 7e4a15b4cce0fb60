//! Whole-board properties: determinism, snapshots, legality and gravity.

use panel_pop::core::{GameBoard, SimpleRng};
use panel_pop::types::{BoardCommand, BOARD_WIDTH};

fn autoplay(board: &mut GameBoard, ticks: usize) {
    for _ in 0..ticks {
        board.run_auto_swapper();
        board.tick();
    }
}

fn column(board: &GameBoard, x: i32) -> String {
    (board.top_most_row()..board.lowest_visible_row())
        .filter_map(|y| board.tile_at(x, y).map(|t| t.color.as_char()))
        .collect()
}

#[test]
fn same_seed_same_game() {
    let mut a = GameBoard::endless(SimpleRng::from_token("gccd"));
    let mut b = GameBoard::endless(SimpleRng::from_token("gccd"));
    autoplay(&mut a, 1200);
    autoplay(&mut b, 1200);

    assert_eq!(a.to_string(), b.to_string());
    assert_eq!(a.board_offset_position(), b.board_offset_position());
    assert_eq!(a.lowest_visible_row(), b.lowest_visible_row());
    assert_eq!(a.combo_count(), b.combo_count());
    assert_eq!(a.rng().state(), b.rng().state());
}

#[test]
fn different_seeds_diverge() {
    let a = GameBoard::endless(SimpleRng::from_token("gccd"));
    let b = GameBoard::endless(SimpleRng::from_token("dccg"));
    assert_ne!(a.to_string(), b.to_string());
}

#[test]
fn clone_is_independent() {
    let mut board = GameBoard::endless(SimpleRng::from_token("clone"));
    autoplay(&mut board, 300);

    let snapshot = board.clone();
    let before = snapshot.to_string();
    let tick = snapshot.tick_count();

    autoplay(&mut board, 300);
    assert_eq!(snapshot.to_string(), before);
    assert_eq!(snapshot.tick_count(), tick);

    // Both copies replay identically.
    let mut replay = snapshot.clone();
    let mut original = snapshot;
    autoplay(&mut replay, 200);
    autoplay(&mut original, 200);
    assert_eq!(replay.to_string(), original.to_string());
}

#[test]
fn rejected_commands_leave_board_untouched() {
    let mut board = GameBoard::puzzle("  r   ").unwrap();
    let before = board.to_string();

    // Cursor starts on an empty row.
    assert!(!board.swap());
    assert!(!board.apply(BoardCommand::Swap));
    assert!(!board.apply(BoardCommand::Raise));
    assert!(!board.move_left());

    assert_eq!(board.to_string(), before);
    assert!(board.swap_animation().is_none());
    assert_eq!(board.tick_count(), 0);
}

#[test]
fn cursor_stops_at_window_edges() {
    let mut board = GameBoard::endless(SimpleRng::from_token("edges"));

    let mut ups = Vec::new();
    while board.move_up() {
        ups.push(board.cursor().y);
    }
    assert_eq!(ups, [-1, -2]);
    assert_eq!(board.cursor().y, board.top_most_row() - 2);
    assert!(!board.apply(BoardCommand::MoveUp));
    assert_eq!(board.cursor().y, -2);

    while board.move_down() {}
    assert_eq!(board.cursor().y, board.lowest_visible_row() - 1);

    while board.move_right() {}
    assert_eq!(board.cursor().x, BOARD_WIDTH - 2);
    while board.move_left() {}
    assert_eq!(board.cursor().x, 0);
}

#[test]
fn gravity_keeps_column_contents() {
    let mut board = GameBoard::puzzle("rg    \n  t   \nbyrgby").unwrap();
    let columns: Vec<String> = (0..BOARD_WIDTH).map(|x| column(&board, x)).collect();

    for _ in 0..40 {
        board.tick();
        for x in 0..BOARD_WIDTH {
            let mut now: Vec<char> = column(&board, x).chars().collect();
            let mut then: Vec<char> = columns[x as usize].chars().collect();
            now.sort_unstable();
            then.sort_unstable();
            assert_eq!(now, then, "column {x} changed");
        }
    }

    let dump = board.to_string();
    let rows: Vec<&str> = dump.lines().collect();
    assert_eq!(&rows[10..], ["rgt   ", "byrgby"]);
    assert!(board.dropping_columns().is_empty());
}

#[test]
fn combo_count_resets_after_chain() {
    let mut board = GameBoard::puzzle("g     \nb     \nb     \nbgg   \nprr   ").unwrap();
    let mut peak = 1;
    for _ in 0..400 {
        board.tick();
        peak = peak.max(board.combo_count());
    }
    assert_eq!(peak, 2);
    assert_eq!(board.combo_count(), 1);
    assert!(board.pop_animations().is_empty());
}
