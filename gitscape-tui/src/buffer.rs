use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub char: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub wide_continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: ' ',
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            wide_continuation: false,
        }
    }
}

/// Display width of `c` in cells; control characters count as one.
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(1)
}

pub fn display_width(s: &str) -> usize {
    s.width()
}

#[derive(Debug, Clone)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, Cell::default())
    }

    pub fn filled(width: u16, height: u16, cell: Cell) -> Self {
        let cells = vec![cell; (width as usize) * (height as usize)];
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x < self.width && y < self.height {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Cell at a signed position, or None when it falls outside.
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        let (x, y) = (u16::try_from(x).ok()?, u16::try_from(y).ok()?);
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    fn index(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Draw one glyph, keeping the cell background.
    pub fn put_char(&mut self, x: i32, y: i32, c: char, fg: Rgb) {
        if let Some(cell) = self.get_mut(x, y) {
            cell.char = c;
            cell.fg = fg;
            cell.bold = false;
            cell.wide_continuation = false;
        }
    }

    /// Draw `text` starting at `x`, clipped to `[min_x, max_x)`. Returns the
    /// width written, clipped cells included.
    pub fn put_str_clipped(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: Rgb,
        bold: bool,
        (min_x, max_x): (i32, i32),
    ) -> usize {
        let mut cx = x;
        for c in text.chars() {
            let w = char_width(c) as i32;
            if cx >= min_x && cx + w <= max_x {
                if let Some(cell) = self.get_mut(cx, y) {
                    cell.char = c;
                    cell.fg = fg;
                    cell.bold = bold;
                    cell.wide_continuation = false;
                }
                for extra in 1..w {
                    if let Some(cell) = self.get_mut(cx + extra, y) {
                        cell.char = ' ';
                        cell.wide_continuation = true;
                    }
                }
            }
            cx += w;
        }
        (cx - x) as usize
    }

    pub fn put_str(&mut self, x: i32, y: i32, text: &str, fg: Rgb, bold: bool) -> usize {
        self.put_str_clipped(x, y, text, fg, bold, (0, self.width as i32))
    }

    /// Paint the background of a rectangle.
    pub fn fill(&mut self, x: i32, y: i32, width: u16, height: u16, bg: Rgb) {
        for row in y..y + height as i32 {
            for col in x..x + width as i32 {
                if let Some(cell) = self.get_mut(col, row) {
                    *cell = Cell {
                        bg,
                        ..Cell::default()
                    };
                }
            }
        }
    }

    pub fn diff<'a>(&'a self, other: &'a Buffer) -> impl Iterator<Item = (u16, u16, &'a Cell)> {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(move |(i, (cell, _))| {
                let x = (i % self.width as usize) as u16;
                let y = (i / self.width as usize) as u16;
                (x, y, cell)
            })
    }

    /// Text of one row, wide continuations skipped.
    #[cfg(test)]
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|cell| !cell.wide_continuation)
            .map(|cell| cell.char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FG: Rgb = Rgb::new(1, 2, 3);

    #[test]
    fn test_put_str() {
        let mut buf = Buffer::new(10, 1);
        assert_eq!(buf.put_str(2, 0, "abc", FG, false), 3);
        assert_eq!(buf.row_text(0), "  abc     ");
        assert_eq!(buf.get(2, 0).unwrap().fg, FG);
    }

    #[test]
    fn test_put_str_clips_negative_and_overflow() {
        let mut buf = Buffer::new(5, 1);
        buf.put_str(-2, 0, "abcdefgh", FG, false);
        assert_eq!(buf.row_text(0), "cdefg");
    }

    #[test]
    fn test_put_str_clips_to_range() {
        let mut buf = Buffer::new(8, 1);
        buf.put_str_clipped(0, 0, "abcdefgh", FG, false, (2, 5));
        assert_eq!(buf.row_text(0), "  cde   ");
    }

    #[test]
    fn test_wide_characters() {
        let mut buf = Buffer::new(6, 1);
        assert_eq!(buf.put_str(0, 0, "日本", FG, false), 4);
        assert!(buf.get(1, 0).unwrap().wide_continuation);
        assert_eq!(buf.row_text(0), "日本  ");
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut buf = Buffer::new(2, 2);
        buf.put_char(5, 5, 'x', FG);
        buf.put_char(-1, 0, 'x', FG);
        assert!(buf.get_mut(2, 0).is_none());
        assert_eq!(buf.row_text(0), "  ");
    }

    #[test]
    fn test_diff() {
        let a = Buffer::new(3, 2);
        let mut b = Buffer::new(3, 2);
        b.put_char(1, 1, 'x', FG);
        let changed: Vec<(u16, u16)> = b.diff(&a).map(|(x, y, _)| (x, y)).collect();
        assert_eq!(changed, [(1, 1)]);
    }
}
