//! Terminal Panel Pop runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `panel-pop-term`.
//! `--headless <ticks>` skips the terminal entirely and prints the final grid.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;

use panel_pop::cli::{build_board, init_logging, parse_run_args, RunOptions};
use panel_pop::core::GameBoard;
use panel_pop::input::{should_quit, InputHandler};
use panel_pop::term::{BoardView, FrameBuffer, TerminalRenderer, Viewport};
use panel_pop::types::TICK_MS;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_run_args(&args)?;
    init_logging(opts.log.as_ref())?;

    let mut board = build_board(&opts)?;

    if let Some(ticks) = opts.headless {
        run_headless(&mut board, &opts, ticks);
        print!("{board}");
        return Ok(());
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut board, &opts);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run_headless(board: &mut GameBoard, opts: &RunOptions, ticks: u64) {
    for _ in 0..ticks {
        if opts.autoplay {
            board.run_auto_swapper();
        }
        board.tick();
    }
    info!(ticks, combo = board.combo_count(), "headless run finished");
}

fn run(term: &mut TerminalRenderer, board: &mut GameBoard, opts: &RunOptions) -> Result<()> {
    let view = BoardView::default();
    let mut input_handler = InputHandler::new();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(board, Viewport::new(w, h), &mut fb);
        term.present(&fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if let Some(command) = input_handler.handle_key_press(key.code) {
                            board.apply(command);
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Held keys act once; terminal auto-repeat is ignored.
                    }
                    KeyEventKind::Release => {
                        input_handler.handle_key_release(key.code);
                    }
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            for command in input_handler.update(TICK_MS as u32) {
                board.apply(command);
            }
            if opts.autoplay {
                board.run_auto_swapper();
            }
            board.tick();
        }
    }
}
