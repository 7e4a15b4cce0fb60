//! Character grid the board view paints into.
//!
//! Stored row by row: the renderer compares and repaints whole rows, and a
//! board row maps onto one screen row.

/// Truecolor value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }

    /// Multiply every channel by `num / den`, saturating at 255.
    pub const fn scaled(self, num: u16, den: u16) -> Self {
        const fn channel(v: u8, num: u16, den: u16) -> u8 {
            let v = v as u16 * num / den;
            if v > 255 {
                255
            } else {
                v as u8
            }
        }
        Self(
            channel(self.0, num, den),
            channel(self.1, num, den),
            channel(self.2, num, den),
        )
    }
}

/// Glyph intensity. Terminals treat bold and faint as one attribute slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Weight {
    #[default]
    Normal,
    Bold,
    Faint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub weight: Weight,
}

impl CellStyle {
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            weight: Weight::Normal,
        }
    }

    pub const fn bold(self) -> Self {
        Self {
            weight: Weight::Bold,
            ..self
        }
    }

    pub const fn dim(self) -> Self {
        Self {
            weight: Weight::Faint,
            ..self
        }
    }

    /// Same glyph colors over a different background.
    pub const fn on(self, bg: Rgb) -> Self {
        Self { bg, ..self }
    }

    pub const fn cell(self, ch: char) -> Cell {
        Cell { ch, style: self }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::new(Rgb(220, 220, 220), Rgb(0, 0, 0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        CellStyle::default().cell(' ')
    }
}

/// Grid of styled cells. Drawing outside the grid is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameBuffer {
    width: u16,
    rows: Vec<Vec<Cell>>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            rows: vec![vec![Cell::default(); width as usize]; height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.rows.len() as u16
    }

    /// Change the grid size. Surviving cells keep their contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.rows.resize_with(height as usize, Vec::new);
        for row in &mut self.rows {
            row.resize(width as usize, Cell::default());
        }
    }

    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        self.rows.get(y as usize).map(Vec::as_slice)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.row(y)?.get(x as usize).copied()
    }

    fn cell_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.rows.get_mut(y as usize)?.get_mut(x as usize)
    }

    pub fn clear(&mut self, cell: Cell) {
        for row in &mut self.rows {
            row.fill(cell);
        }
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        if let Some(cell) = self.cell_mut(x, y) {
            *cell = style.cell(ch);
        }
    }

    /// Returns the column after the last character.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) -> u16 {
        let mut cx = x;
        for ch in s.chars() {
            self.put_char(cx, y, ch, style);
            cx = cx.saturating_add(1);
        }
        cx
    }

    pub fn put_u64(&mut self, x: u16, y: u16, value: u64, style: CellStyle) -> u16 {
        self.put_str(x, y, &value.to_string(), style)
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: CellStyle) {
        self.restyle_rect(x, y, w, h, |_| style.cell(ch));
    }

    /// Replace each cell in the rectangle with `f(cell)`.
    pub fn restyle_rect(&mut self, x: u16, y: u16, w: u16, h: u16, f: impl Fn(Cell) -> Cell) {
        let top = y as usize;
        let left = x as usize;
        for row in self.rows.iter_mut().skip(top).take(h as usize) {
            for cell in row.iter_mut().skip(left).take(w as usize) {
                *cell = f(*cell);
            }
        }
    }

    /// Characters of row `y`, styles dropped.
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| cells.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_is_clipped() {
        let mut fb = FrameBuffer::new(4, 2);
        assert_eq!(fb.put_str(2, 0, "abcdef", CellStyle::default()), 8);
        assert_eq!(fb.row_text(0), "  ab");

        fb.put_char(9, 9, 'x', CellStyle::default());
        assert_eq!(fb.get(9, 9), None);
        fb.fill_rect(3, 1, 10, 10, '#', CellStyle::default());
        assert_eq!(fb.row_text(1), "   #");
    }

    #[test]
    fn numbers_are_decimal() {
        let mut fb = FrameBuffer::new(8, 1);
        assert_eq!(fb.put_u64(0, 0, 14800, CellStyle::default()), 5);
        fb.put_u64(6, 0, 0, CellStyle::default());
        assert_eq!(fb.row_text(0), "14800 0 ");
    }

    #[test]
    fn restyle_keeps_glyphs() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.put_str(0, 0, "abc", CellStyle::default());
        fb.restyle_rect(1, 0, 5, 1, |c| c.style.bold().cell(c.ch));

        assert_eq!(fb.row_text(0), "abc");
        assert_eq!(fb.get(0, 0).unwrap().style.weight, Weight::Normal);
        assert_eq!(fb.get(2, 0).unwrap().style.weight, Weight::Bold);
    }

    #[test]
    fn resize_keeps_overlap() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.put_str(0, 1, "xyz", CellStyle::default());
        fb.resize(2, 3);
        assert_eq!((fb.width(), fb.height()), (2, 3));
        assert_eq!(fb.row_text(1), "xy");
        assert_eq!(fb.row_text(2), "  ");
    }

    #[test]
    fn scaled_saturates() {
        assert_eq!(Rgb::new(200, 10, 0).scaled(2, 1), Rgb::new(255, 20, 0));
        assert_eq!(Rgb::new(200, 10, 0).scaled(1, 2), Rgb::new(100, 5, 0));
    }
}
