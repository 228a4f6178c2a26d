//! Text rendering of the 5x7 LED matrix.

pub const NUM_COLS: usize = 5;
pub const NUM_ROWS: usize = 7;

/// One bitmask per column, bit `n` lights row `n`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    pub columns: [u8; NUM_COLS],
}

impl Frame {
    /// Light the LED at `(col, row)`. Positions off the matrix are ignored.
    pub fn light(&mut self, col: usize, row: usize) {
        if col < NUM_COLS && row < NUM_ROWS {
            self.columns[col] |= 1 << row;
        }
    }

    pub fn is_lit(&self, col: usize, row: usize) -> bool {
        col < NUM_COLS && row < NUM_ROWS && self.columns[col] & (1 << row) != 0
    }

    /// Row 0 first, `#` for a lit LED
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(NUM_ROWS * (NUM_COLS + 1));
        for row in 0..NUM_ROWS {
            for col in 0..NUM_COLS {
                out.push(if self.is_lit(col, row) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light() {
        let mut frame = Frame::default();
        frame.light(4, 2);
        frame.light(4, 3);
        frame.light(0, 6);
        assert_eq!(frame.columns, [0x40, 0, 0, 0, 0x0C]);
        assert!(frame.is_lit(4, 3));
        assert!(!frame.is_lit(3, 3));

        frame.light(5, 0);
        frame.light(0, 7);
        assert_eq!(frame.columns, [0x40, 0, 0, 0, 0x0C]);
    }

    #[test]
    fn test_render() {
        let mut frame = Frame::default();
        frame.light(0, 0);
        frame.light(4, 6);
        assert_eq!(
            frame.render(),
            "#....\n.....\n.....\n.....\n.....\n.....\n....#\n"
        );
    }
}
