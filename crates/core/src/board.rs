//! Game board - owns every tile and animation and runs the tick pipeline
//!
//! One call to [`GameBoard::tick`] advances the simulation one discrete step,
//! always in the same order:
//!
//! 1. scroll the endless board up
//! 2. trim empty rows and refill from the RNG
//! 3. per-tile timers
//! 4. swap animation
//! 5. pop animations
//! 6. match detection
//! 7. falling and bouncing columns
//! 8. new drops and combo bookkeeping
//!
//! Everything else (cursor movement, swap requests, raising) happens between
//! ticks through the command methods. Queries never mutate.

use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use crate::anim::{
    BouncePhase, ComboTracker, DialogBox, DropPhase, DroppingAnimation, MatchPhase, PopAnimation,
    PopDialog, SwapAnimation,
};
use crate::config::BoardConfig;
use crate::error::BoardError;
use crate::keyed::{Handle, Keyed, KeyedCollection};
use crate::match_grid::{Direction, GridCell, MatchGrid};
use crate::rng::SimpleRng;
use crate::tile::{tile_key, Tile};
use crate::types::{
    BoardCommand, DrawType, GameMode, TileColor, BOARD_HEIGHT, BOARD_WIDTH, BOUNCE_SETTLE_TICK,
    COMBO_TRACKER_TICKS, REFILL_ROWS, TILE_SIZE,
};

/// Rows the endless window never searches past.
const MAX_VISIBLE_ROW: i32 = 10_000;

const AUTO_SWAP_COLUMNS: [i32; 5] = [0, 1, 2, 3, 4];
const AUTO_SWAP_ATTEMPTS: usize = 10;

/// Left cell of the 2-wide selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub x: i32,
    pub y: i32,
}

pub struct GameBoard {
    mode: GameMode,
    config: BoardConfig,
    tiles: KeyedCollection<Tile>,
    board_offset_position: i32,
    top_most_row: i32,
    lowest_visible_row: Cell<Option<i32>>,
    cursor: Cursor,
    combo_count: u32,
    tick_count: u64,
    swap_animation: Option<SwapAnimation>,
    dropping_columns: Vec<DroppingAnimation>,
    pop_animations: Vec<PopAnimation>,
    combo_trackers: Vec<ComboTracker>,
    rng: SimpleRng,
}

impl GameBoard {
    /// Endless board: fifteen random rows with the window half raised.
    pub fn endless(rng: SimpleRng) -> Self {
        Self::endless_with_config(rng, BoardConfig::default())
    }

    pub fn endless_with_config(rng: SimpleRng, config: BoardConfig) -> Self {
        let mut board = Self::empty(GameMode::Endless, rng, config);
        board.board_offset_position = TILE_SIZE * (BOARD_HEIGHT / 2);
        for y in 0..REFILL_ROWS {
            board.fill_random(y);
        }
        debug!(
            seed_state = board.rng.state(),
            tiles = board.tiles.len(),
            "created endless board"
        );
        board
    }

    /// Puzzle board from a text layout.
    ///
    /// One line per row, top to bottom. Trailing whitespace is trimmed, blank
    /// lines are dropped and the rows are bottom-aligned to the visible window.
    ///
    /// # Examples
    ///
    /// ```
    /// use panel_pop_core::GameBoard;
    ///
    /// let board = GameBoard::puzzle(" r rr ").unwrap();
    /// assert_eq!(board.tiles().len(), 3);
    /// assert_eq!(board.lowest_visible_row(), 12);
    /// assert!(GameBoard::puzzle("rxr").is_err());
    /// ```
    pub fn puzzle(layout: &str) -> Result<Self, BoardError> {
        Self::puzzle_with_config(layout, SimpleRng::default(), BoardConfig::default())
    }

    pub fn puzzle_with_config(
        layout: &str,
        rng: SimpleRng,
        config: BoardConfig,
    ) -> Result<Self, BoardError> {
        let mut board = Self::empty(GameMode::Puzzle, rng, config);
        board.board_offset_position = TILE_SIZE * BOARD_HEIGHT;

        let rows: Vec<&str> = layout
            .split('\n')
            .map(str::trim_end)
            .filter(|row| !row.is_empty())
            .collect();
        let top_pad = BOARD_HEIGHT - rows.len() as i32;

        for (line, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width > BOARD_WIDTH as usize {
                return Err(BoardError::RowTooWide {
                    line: line + 1,
                    width,
                });
            }
            for (column, ch) in row.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let color = TileColor::from_char(ch).ok_or(BoardError::UnknownColor {
                    ch,
                    line: line + 1,
                    column: column + 1,
                })?;
                board.insert_tile(Tile::new(
                    color,
                    true,
                    column as i32,
                    top_pad + line as i32,
                ));
            }
        }

        debug!(rows = rows.len(), tiles = board.tiles.len(), "loaded puzzle board");
        Ok(board)
    }

    fn empty(mode: GameMode, rng: SimpleRng, config: BoardConfig) -> Self {
        Self {
            mode,
            config,
            tiles: KeyedCollection::with_capacity((BOARD_WIDTH * REFILL_ROWS * 2) as usize),
            board_offset_position: 0,
            top_most_row: 0,
            lowest_visible_row: Cell::new(None),
            cursor: Cursor::default(),
            combo_count: 1,
            tick_count: 0,
            swap_animation: None,
            dropping_columns: Vec::new(),
            pop_animations: Vec::new(),
            combo_trackers: Vec::new(),
            rng,
        }
    }

    // ---- queries ----

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn speed(&self) -> u32 {
        self.config.speed
    }

    pub fn tiles(&self) -> &KeyedCollection<Tile> {
        &self.tiles
    }

    pub fn handle_at(&self, x: i32, y: i32) -> Option<Handle> {
        self.tiles.lookup(tile_key(x, y))
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.tiles.get_by_key(tile_key(x, y))
    }

    pub fn top_most_row(&self) -> i32 {
        self.top_most_row
    }

    /// Last row of the visible window: the incoming row in endless mode, one
    /// past the lowest tile in puzzle mode (0 when the puzzle is cleared).
    ///
    /// Memoized until the next tick starts.
    pub fn lowest_visible_row(&self) -> i32 {
        if let Some(row) = self.lowest_visible_row.get() {
            return row;
        }
        let row = match self.mode {
            GameMode::Endless => {
                // First row at or below the top whose upper edge has scrolled
                // past the window's bottom.
                let scrolled_past = self.board_offset_position.div_euclid(TILE_SIZE)
                    + i32::from(self.board_offset_position.rem_euclid(TILE_SIZE) != 0);
                let first_hidden = self.top_most_row.max(scrolled_past);
                if first_hidden >= MAX_VISIBLE_ROW {
                    return MAX_VISIBLE_ROW;
                }
                first_hidden - 1
            }
            GameMode::Puzzle => self.tiles.values().map(|t| t.y() + 1).max().unwrap_or(0),
        };
        self.lowest_visible_row.set(Some(row));
        row
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Chain counter; 1 while no chain is running.
    pub fn combo_count(&self) -> u32 {
        self.combo_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn board_offset_position(&self) -> i32 {
        self.board_offset_position
    }

    /// Scrolling stops while any group is popping.
    pub fn is_paused(&self) -> bool {
        !self.pop_animations.is_empty()
    }

    pub fn pop_animations(&self) -> &[PopAnimation] {
        &self.pop_animations
    }

    pub fn dropping_columns(&self) -> &[DroppingAnimation] {
        &self.dropping_columns
    }

    pub fn swap_animation(&self) -> Option<&SwapAnimation> {
        self.swap_animation.as_ref()
    }

    pub fn combo_trackers(&self) -> &[ComboTracker] {
        &self.combo_trackers
    }

    /// Every dialog box currently on screen, oldest group first.
    pub fn pop_dialogs(&self) -> Vec<DialogBox> {
        self.pop_animations
            .iter()
            .flat_map(|pop| pop.dialog_boxes())
            .collect()
    }

    /// The cursor is drawn larger in the second half of each flicker period.
    pub fn cursor_expanded(&self) -> bool {
        let period = u64::from(self.config.timings.cursor_flex.max(1));
        (self.tick_count % period) * 2 >= period
    }

    pub fn rng(&self) -> &SimpleRng {
        &self.rng
    }

    fn row_is_empty(&self, y: i32) -> bool {
        (0..BOARD_WIDTH).all(|x| self.handle_at(x, y).is_none())
    }

    // ---- commands ----

    pub fn move_left(&mut self) -> bool {
        if self.cursor.x <= 0 {
            return false;
        }
        self.cursor.x -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor.x >= BOARD_WIDTH - 2 {
            return false;
        }
        self.cursor.x += 1;
        true
    }

    pub fn move_up(&mut self) -> bool {
        if self.cursor.y < self.top_most_row - 1 {
            return false;
        }
        self.cursor.y -= 1;
        true
    }

    pub fn move_down(&mut self) -> bool {
        if self.cursor.y >= self.lowest_visible_row() - 1 {
            return false;
        }
        self.cursor.y += 1;
        true
    }

    /// Start swapping the two cells under the cursor.
    ///
    /// Returns `false`, changing nothing, when the swap is not allowed.
    pub fn swap(&mut self) -> bool {
        if self.swap_animation.is_some() {
            return false;
        }
        let Cursor { x, y } = self.cursor;
        let left = self.handle_at(x, y);
        let right = self.handle_at(x + 1, y);

        match (left, right) {
            (None, None) => return false,
            // The bottom of a falling column cannot be pulled out from under it.
            (Some(_), None) if self.column_lands_on(x + 1, y) => return false,
            (None, Some(_)) if self.column_lands_on(x, y) => return false,
            _ => {}
        }

        if self.final_pop_below(x, y) {
            return false;
        }

        let movable = |handle: Option<Handle>| {
            handle.map_or(true, |h| self.tiles.get(h).is_some_and(|t| t.swappable))
        };
        if !movable(left) || !movable(right) {
            return false;
        }

        self.swap_animation = Some(SwapAnimation {
            x1: x,
            x2: x + 1,
            y,
            ticks_left: self.config.timings.swap_ticks,
        });
        for handle in [left, right].into_iter().flatten() {
            if let Some(tile) = self.tiles.get_mut(handle) {
                tile.set_swappable(false);
            }
        }
        true
    }

    fn column_lands_on(&self, x: i32, y: i32) -> bool {
        self.dropping_columns
            .iter()
            .any(|d| d.x == x && d.bottom_y == y - 1)
    }

    /// A group in its last pop step still holds a tile below row `y` in one of
    /// the cursor's columns.
    fn final_pop_below(&self, x: i32, y: i32) -> bool {
        self.pop_animations.iter().any(|pop| {
            pop.on_final_pop()
                && pop.queued_pops.iter().any(|&h| {
                    self.tiles
                        .get(h)
                        .is_some_and(|t| (t.x() == x || t.x() == x + 1) && t.y() > y)
                })
        })
    }

    /// Raise the endless board by `units` logical units. No-op in puzzle mode.
    ///
    /// The visible window keeps its memoized bottom row until the next tick.
    pub fn nudge_offset(&mut self, units: i32) -> bool {
        if self.mode != GameMode::Endless {
            return false;
        }
        self.board_offset_position += units;
        true
    }

    /// Dispatch a command. `Raise` nudges the board by one unit.
    pub fn apply(&mut self, command: BoardCommand) -> bool {
        match command {
            BoardCommand::MoveLeft => self.move_left(),
            BoardCommand::MoveRight => self.move_right(),
            BoardCommand::MoveUp => self.move_up(),
            BoardCommand::MoveDown => self.move_down(),
            BoardCommand::Swap => self.swap(),
            BoardCommand::Raise => self.nudge_offset(1),
        }
    }

    /// Move the cursor to random positions until a swap is accepted.
    ///
    /// Gives up after a fixed number of attempts; does nothing while a swap is
    /// running.
    pub fn run_auto_swapper(&mut self) -> bool {
        if self.swap_animation.is_some() {
            return false;
        }
        for _ in 0..AUTO_SWAP_ATTEMPTS {
            self.cursor.x = self.rng.random_element(&AUTO_SWAP_COLUMNS).unwrap_or(0);
            let lowest = self.lowest_visible_row();
            self.cursor.y = self.rng.random_between(self.top_most_row, lowest);
            if self.swap() {
                return true;
            }
        }
        false
    }

    // ---- tick pipeline ----

    pub fn tick(&mut self) {
        self.tick_count += 1;
        self.lowest_visible_row.set(None);

        self.push_up_board();
        self.make_sure_board_is_full();
        self.tick_tiles();
        self.update_swap();
        self.update_pop();

        self.test_matches();
        self.advance_drops();
        self.find_new_drops();
    }

    fn push_up_board(&mut self) {
        if self.mode != GameMode::Endless || self.is_paused() {
            return;
        }
        if self.tick_count % self.config.scroll_period() == 0 {
            self.board_offset_position += 1;
        }
    }

    fn make_sure_board_is_full(&mut self) {
        if self.mode != GameMode::Endless {
            return;
        }

        let lowest = self.lowest_visible_row();
        for y in self.top_most_row..lowest {
            if !self.row_is_empty(y) {
                break;
            }
            self.top_most_row = y;
        }

        if self.board_offset_position % TILE_SIZE != 0 {
            return;
        }
        let max_y = self.tiles.values().map(Tile::y).max().unwrap_or(0).max(0) + 1;
        let filled = max_y - self.top_most_row;
        if filled < REFILL_ROWS {
            for y in max_y..max_y + (REFILL_ROWS - filled) {
                self.fill_random(y);
            }
        }
    }

    fn fill_random(&mut self, y: i32) {
        for x in 0..BOARD_WIDTH {
            if let Some(color) = self.rng.random_element(&TileColor::ALL) {
                self.insert_tile(Tile::new(color, true, x, y));
            }
        }
        trace!(y, "filled row");
    }

    fn insert_tile(&mut self, tile: Tile) -> Handle {
        let (x, y) = (tile.x(), tile.y());
        match self.tiles.insert(tile) {
            Some(handle) => handle,
            None => panic!("tile store already holds a tile at ({x}, {y})"),
        }
    }

    fn tick_tiles(&mut self) {
        let lowest = self.lowest_visible_row();
        for y in (self.top_most_row..=lowest).rev() {
            for x in 0..BOARD_WIDTH {
                if let Some(tile) = self
                    .handle_at(x, y)
                    .and_then(|h| self.tiles.get_mut(h))
                {
                    tile.tick();
                }
            }
        }
    }

    fn update_swap(&mut self) {
        let Some(mut swap) = self.swap_animation else {
            return;
        };
        let left = self.handle_at(swap.x1, swap.y);
        let right = self.handle_at(swap.x2, swap.y);

        if swap.ticks_left > 0 {
            swap.ticks_left -= 1;
            let total = self.config.timings.swap_ticks;
            let pct = if total == 0 {
                1.0
            } else {
                1.0 - swap.ticks_left as f32 / total as f32
            };
            let shift = TILE_SIZE as f32 * pct;
            if let Some(tile) = left.and_then(|h| self.tiles.get_mut(h)) {
                tile.draw_x = (tile.x() * TILE_SIZE) as f32 + shift;
            }
            if let Some(tile) = right.and_then(|h| self.tiles.get_mut(h)) {
                tile.draw_x = (tile.x() * TILE_SIZE) as f32 - shift;
            }
            self.swap_animation = Some(swap);
            return;
        }

        let mut moved: ArrayVec<Handle, 2> = ArrayVec::new();
        for (handle, to_x) in [(left, swap.x2), (right, swap.x1)] {
            let Some(handle) = handle else { continue };
            if let Some(tile) = self.tiles.get_mut(handle) {
                tile.set_x(to_x);
                tile.set_swappable(true);
                moved.push(handle);
            }
        }
        if let Err(err) = self.tiles.reassign_keys(&moved) {
            panic!("tile store out of sync after swap at row {}: {err}", swap.y);
        }
        self.swap_animation = None;
    }

    fn update_pop(&mut self) {
        let timings = self.config.timings;

        for i in (0..self.pop_animations.len()).rev() {
            let pop = &mut self.pop_animations[i];
            pop.dialog.tick += 1;

            match pop.phase {
                MatchPhase::Blink => {
                    if pop.timer > 0 {
                        pop.timer -= 1;
                    } else {
                        pop.phase = MatchPhase::Solid;
                        pop.timer = timings.match_solid_ticks;
                    }
                }
                MatchPhase::Solid => {
                    if pop.timer > 0 {
                        pop.timer -= 1;
                    } else {
                        pop.phase = MatchPhase::Pop;
                        pop.timer = timings.match_pop_ticks_each;
                    }
                }
                MatchPhase::Pop => {
                    if pop.timer > 0 {
                        pop.timer -= 1;
                    } else if pop.pop_index + 1 < pop.queued_pops.len() {
                        pop.pop_index += 1;
                        pop.timer = timings.match_pop_ticks_each;
                    } else {
                        let finished = self.pop_animations.remove(i);
                        self.finish_pop(finished);
                        continue;
                    }
                }
            }

            let popping = pop.queued_pops.get(pop.pop_index).copied();
            for &handle in &pop.queued_pops {
                let Some(tile) = self.tiles.get_mut(handle) else {
                    continue;
                };
                match pop.phase {
                    MatchPhase::Blink => {
                        tile.draw_type = if pop.timer % 2 == 0 {
                            DrawType::Matched
                        } else {
                            DrawType::MatchedBlink
                        };
                    }
                    MatchPhase::Solid => {
                        if pop.timer > 0 {
                            tile.draw_type = DrawType::Popping;
                        }
                    }
                    MatchPhase::Pop => {
                        if pop.timer > 0 {
                            if popping == Some(handle) {
                                tile.draw_type = DrawType::Popped;
                            } else if tile.draw_type != DrawType::Popped {
                                tile.draw_type = DrawType::Popping;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Last pop of a group: leave one combo tracker per column and remove the
    /// tiles.
    fn finish_pop(&mut self, pop: PopAnimation) {
        let mut columns: ArrayVec<(i32, i32), { BOARD_WIDTH as usize }> = ArrayVec::new();
        for tile in pop.queued_pops.iter().filter_map(|&h| self.tiles.get(h)) {
            match columns.iter_mut().find(|(x, _)| *x == tile.x()) {
                Some((_, above_y)) => *above_y = (*above_y).max(tile.y()),
                None => columns.push((tile.x(), tile.y())),
            }
        }
        for (x, above_y) in columns {
            self.combo_trackers.push(ComboTracker {
                x,
                above_y,
                timer: COMBO_TRACKER_TICKS,
            });
        }

        for &handle in &pop.queued_pops {
            self.pop_tile(handle);
        }
        debug!(
            tiles = pop.queued_pops.len(),
            combo = pop.dialog.combo_count,
            "group popped"
        );
    }

    fn pop_tile(&mut self, handle: Handle) {
        if self.tiles.remove(handle).is_none() {
            panic!("popped tile is no longer in the tile store");
        }
    }

    fn classify(&self, x: i32, y: i32) -> GridCell {
        let Some(handle) = self.handle_at(x, y) else {
            return GridCell::Empty;
        };
        let Some(tile) = self.tiles.get(handle) else {
            return GridCell::Empty;
        };
        let floating = self
            .dropping_columns
            .iter()
            .any(|d| d.x == x && d.bounce_phase == BouncePhase::NotStarted);
        if !tile.swappable || floating {
            GridCell::Blocked
        } else {
            GridCell::Tile(handle, tile.color)
        }
    }

    fn test_matches(&mut self) {
        let top = self.top_most_row;
        let lowest = self.lowest_visible_row();
        let grid = MatchGrid::build(top, lowest, |x, y| self.classify(x, y));

        let mut queued: Vec<Handle> = Vec::new();
        for y in top..lowest {
            for x in 0..BOARD_WIDTH {
                let GridCell::Tile(handle, color) = grid.at(x, y) else {
                    continue;
                };
                if x < BOARD_WIDTH - 1
                    && grid.run_length(&mut queued, color, Direction::Right, x + 1, y, 1) >= 3
                {
                    queued.push(handle);
                }
                if grid.run_length(&mut queued, color, Direction::Down, x, y + 1, 1) >= 3 {
                    queued.push(handle);
                }
            }
        }

        let mut seen = HashSet::with_capacity(queued.len());
        queued.retain(|h| seen.insert(*h));

        for &handle in &queued {
            if let Some(tile) = self.tiles.get_mut(handle) {
                tile.matched = true;
                tile.set_swappable(false);
            }
        }

        let anchor = queued
            .iter()
            .filter_map(|&h| self.tiles.get(h))
            .min_by_key(|t| t.y() * BOARD_WIDTH + t.x())
            .map(|t| (t.draw_x, t.draw_y));

        if let Some((anchor_x, anchor_y)) = anchor {
            let chained = queued
                .iter()
                .any(|&h| self.tiles.get(h).is_some_and(|t| t.combo_viable));
            if chained {
                self.combo_count += 1;
                debug!(combo = self.combo_count, "chain extended");
            }
            debug!(tiles = queued.len(), tick = self.tick_count, "match found");

            queued.reverse();
            self.pop_animations.push(PopAnimation {
                queued_pops: queued,
                phase: MatchPhase::Blink,
                timer: self.config.timings.match_blink_ticks,
                pop_index: 0,
                dialog: PopDialog {
                    x: anchor_x,
                    starting_y: anchor_y,
                    combo_count: if chained { self.combo_count } else { 1 },
                    tick: 0,
                },
            });
        }

        self.tiles.for_each_mut(|tile| tile.set_combo_viable(false));
    }

    fn advance_drops(&mut self) {
        for i in (0..self.dropping_columns.len()).rev() {
            if self.dropping_columns[i].phase == DropPhase::Bouncing {
                self.advance_bounce(i);
            } else {
                self.advance_fall(i);
            }
        }
    }

    fn advance_bounce(&mut self, i: usize) {
        let bounce_ticks = self.config.timings.drop_bounce_ticks;
        let settle_tick = BOUNCE_SETTLE_TICK.min(bounce_ticks.saturating_sub(1));
        let drop = &mut self.dropping_columns[i];

        if drop.bounce_ticks > 0 {
            drop.bounce_ticks -= 1;
            if drop.bounce_phase == BouncePhase::Low && drop.bounce_ticks == settle_tick {
                for &handle in &drop.bouncing_tiles {
                    if let Some(tile) = self.tiles.get_mut(handle) {
                        if !tile.matched {
                            tile.set_swappable(true);
                        }
                    }
                }
                for &handle in &drop.combo_tiles {
                    if let Some(tile) = self.tiles.get_mut(handle) {
                        tile.set_combo_viable(true);
                    }
                }
            }
            return;
        }

        if !self.pop_animations.is_empty() {
            let pops = &self.pop_animations;
            drop.bouncing_tiles
                .retain(|&h| !pops.iter().any(|pop| pop.contains(h)));
        }

        let (next, draw_type) = match drop.bounce_phase {
            BouncePhase::Regular => (BouncePhase::Low, DrawType::BounceLow),
            BouncePhase::Low => (BouncePhase::High, DrawType::BounceHigh),
            BouncePhase::High => (BouncePhase::Mid, DrawType::BounceMid),
            BouncePhase::Mid | BouncePhase::NotStarted => {
                for &handle in &drop.bouncing_tiles {
                    if let Some(tile) = self.tiles.get_mut(handle) {
                        tile.draw_type = DrawType::Regular;
                    }
                }
                self.dropping_columns.remove(i);
                return;
            }
        };
        drop.bounce_phase = next;
        drop.bounce_ticks = bounce_ticks;
        for &handle in &drop.bouncing_tiles {
            if let Some(tile) = self.tiles.get_mut(handle) {
                tile.draw_type = draw_type;
            }
        }
    }

    fn advance_fall(&mut self, i: usize) {
        let lowest = self.lowest_visible_row();
        let top = self.top_most_row;

        let drop = &mut self.dropping_columns[i];
        if drop.drop_ticks > 0 {
            drop.drop_ticks -= 1;
            return;
        }
        let x = drop.x;
        let bottom_y = drop.bottom_y;

        if self.handle_at(x, bottom_y + 1).is_some() || bottom_y + 1 >= lowest {
            // Something moved in underneath while the column was stalled.
            self.dropping_columns.remove(i);
            return;
        }

        self.dropping_columns[i].phase = DropPhase::Falling;
        for y in (top..=bottom_y).rev() {
            let Some(handle) = self.handle_at(x, y) else {
                continue;
            };
            if self.swap_animation.is_some_and(|s| s.covers(x, y)) {
                break;
            }
            if let Err(err) = self.tiles.modify(handle, |t| t.set_y(y + 1)) {
                panic!("tile store out of sync moving ({x}, {y}) down: {err}");
            }
        }

        let bottom_y = bottom_y + 1;
        let landed = self.handle_at(x, bottom_y + 1).is_some() || bottom_y + 1 >= lowest;
        let bouncing: Vec<Handle> = if landed {
            (top + 1..=bottom_y)
                .filter_map(|y| self.handle_at(x, y))
                .collect()
        } else {
            Vec::new()
        };
        for &handle in &bouncing {
            if let Some(tile) = self.tiles.get_mut(handle) {
                tile.set_swappable(false);
            }
        }

        let drop = &mut self.dropping_columns[i];
        drop.bottom_y = bottom_y;
        if landed {
            debug!(x, bottom_y, tiles = bouncing.len(), "column landed");
            drop.bouncing_tiles = bouncing;
            drop.bounce_ticks = 1;
            drop.bounce_phase = BouncePhase::Regular;
            drop.phase = DropPhase::Bouncing;
        } else {
            drop.drop_ticks = 0;
        }
    }

    fn find_new_drops(&mut self) {
        let lowest = self.lowest_visible_row();
        let top = self.top_most_row;
        let stall_ticks = self.config.timings.drop_stall_ticks;

        for y in top..lowest {
            for x in 0..BOARD_WIDTH {
                let Some(handle) = self.handle_at(x, y) else {
                    continue;
                };
                if !self.tiles.get(handle).is_some_and(|t| t.swappable) {
                    continue;
                }
                let unsupported = lowest > y + 1
                    && self.handle_at(x, y + 1).is_none()
                    && !self.swap_animation.is_some_and(|s| s.covers(x, y + 1));
                if !unsupported {
                    continue;
                }

                if let Some(tile) = self.tiles.get_mut(handle) {
                    tile.set_swappable(false);
                }
                let fell_because_of_pop = self
                    .combo_trackers
                    .iter()
                    .any(|t| t.x == x && y < t.above_y);
                let combo_tiles = if fell_because_of_pop {
                    (top..=y)
                        .rev()
                        .filter_map(|fy| self.handle_at(x, fy))
                        .collect()
                } else {
                    Vec::new()
                };
                self.dropping_columns.push(DroppingAnimation::stalled(
                    x,
                    y,
                    stall_ticks,
                    combo_tiles,
                ));
            }
        }

        if self.dropping_columns.is_empty() && self.pop_animations.is_empty() {
            self.combo_count = 1;
        }
        self.combo_trackers.retain_mut(|tracker| {
            tracker.timer = tracker.timer.saturating_sub(1);
            tracker.timer > 0
        });
    }
}

impl Clone for GameBoard {
    /// Deep copy. Tiles are re-inserted in iteration order and every handle
    /// held by an animation is re-resolved against the new store by key.
    fn clone(&self) -> Self {
        let mut tiles = KeyedCollection::with_capacity(self.tiles.len());
        for tile in self.tiles.values() {
            tiles.insert(tile.clone());
        }
        let rehydrate = |handles: &[Handle]| -> Vec<Handle> {
            handles
                .iter()
                .filter_map(|&h| self.tiles.get(h))
                .filter_map(|t| tiles.lookup(t.key()))
                .collect()
        };

        let dropping_columns = self
            .dropping_columns
            .iter()
            .map(|d| DroppingAnimation {
                bouncing_tiles: rehydrate(&d.bouncing_tiles),
                combo_tiles: rehydrate(&d.combo_tiles),
                ..d.clone()
            })
            .collect();
        let pop_animations = self
            .pop_animations
            .iter()
            .map(|p| PopAnimation {
                queued_pops: rehydrate(&p.queued_pops),
                ..p.clone()
            })
            .collect();

        Self {
            mode: self.mode,
            config: self.config,
            tiles,
            board_offset_position: self.board_offset_position,
            top_most_row: self.top_most_row,
            lowest_visible_row: self.lowest_visible_row.clone(),
            cursor: self.cursor,
            combo_count: self.combo_count,
            tick_count: self.tick_count,
            swap_animation: self.swap_animation,
            dropping_columns,
            pop_animations,
            combo_trackers: self.combo_trackers.clone(),
            rng: self.rng.clone(),
        }
    }
}

impl fmt::Debug for GameBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameBoard")
            .field("mode", &self.mode)
            .field("tick_count", &self.tick_count)
            .field("tiles", &self.tiles.len())
            .field("top_most_row", &self.top_most_row)
            .field("board_offset_position", &self.board_offset_position)
            .field("cursor", &self.cursor)
            .field("combo_count", &self.combo_count)
            .finish_non_exhaustive()
    }
}

/// Text dump: rows `0..lowest_visible_row`, one color character per cell,
/// a space for an empty cell and a newline after every row.
impl fmt::Display for GameBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.lowest_visible_row() {
            for x in 0..BOARD_WIDTH {
                let ch = self.tile_at(x, y).map_or(' ', |t| t.color.as_char());
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
