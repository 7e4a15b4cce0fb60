//! Front-end wiring: key handling feeds the board, the view draws it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use panel_pop::core::{GameBoard, SimpleRng};
use panel_pop::input::{handle_key_event, should_quit, InputHandler};
use panel_pop::term::{AnchorY, BoardView, FrameBuffer, TerminalRenderer, Viewport};
use panel_pop::types::{BoardCommand, TICK_MS, TILE_SIZE};

#[test]
fn raise_key_lifts_the_board_one_row() {
    let mut board = GameBoard::endless(SimpleRng::from_token("raise"));
    let mut input = InputHandler::new();
    let start = board.board_offset_position();

    assert_eq!(input.handle_key_press(KeyCode::Char('r')), None);
    while input.is_raising() {
        for command in input.update(TICK_MS as u32) {
            assert!(board.apply(command));
        }
    }
    assert_eq!(board.board_offset_position(), start + TILE_SIZE);

    // The window catches up with the raise on the next tick.
    board.tick();
    assert_eq!(board.board_offset_position(), start + TILE_SIZE);
    assert_eq!(board.lowest_visible_row(), 6);
}

#[test]
fn keys_drive_the_cursor() {
    let mut board = GameBoard::puzzle("rg").unwrap();
    let mut input = InputHandler::new();

    for _ in 0..11 {
        let command = input.handle_key_press(KeyCode::Down).unwrap();
        assert!(board.apply(command));
        input.handle_key_release(KeyCode::Down);
    }
    assert_eq!(board.cursor().y, 11);

    let swap = handle_key_event(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
    assert_eq!(swap, Some(BoardCommand::Swap));
    assert!(board.apply(BoardCommand::Swap));

    assert!(should_quit(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
    assert!(should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    assert!(!should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
}

#[test]
fn view_and_renderer_round_out_a_frame() {
    let mut board = GameBoard::endless(SimpleRng::from_token("frame"));
    let view = BoardView::default().with_anchor_y(AnchorY::Top);
    let viewport = Viewport::new(40, 16);

    let mut fb = FrameBuffer::new(0, 0);
    view.render_into(&board, viewport, &mut fb);
    assert_eq!((fb.width(), fb.height()), (40, 16));
    let text: Vec<String> = (0..fb.height()).map(|y| fb.row_text(y)).collect();
    assert!(text.iter().any(|r| r.contains("ENDLESS")));
    assert!(text.iter().any(|r| r.contains('█')));

    let mut renderer = TerminalRenderer::with_writer(Vec::new());
    assert_eq!(renderer.present(&fb).unwrap(), 16);

    // A tick moves the tick counter in the side panel and little else.
    board.tick();
    view.render_into(&board, viewport, &mut fb);
    let repainted = renderer.present(&fb).unwrap();
    assert!(repainted >= 1 && repainted < 16);
}
