//! Display buffer
//!
//! Holds what the tube should show as a fixed-width row of cells in
//! physical digit order. The IV-21 grids are wired right to left, so cell 0
//! is the rightmost character of the text.

use heapless::{String, Vec};

use crate::frame::MAX_DIGITS;
use crate::segment::{self, BLANK_SYMBOL, SEG_DP};

/// Capacity of display text: every position plus an inline dot
pub const TEXT_CAPACITY: usize = 2 * MAX_DIGITS;

/// Text destined for the display buffer
pub type DisplayText = String<TEXT_CAPACITY>;

/// One digit position: a symbol plus its decimal point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    /// Upper-cased symbol
    pub symbol: char,
    /// Decimal point lit
    pub dot: bool,
}

impl Cell {
    /// Blank cell with no dot
    pub const BLANK: Cell = Cell {
        symbol: BLANK_SYMBOL,
        dot: false,
    };

    /// Segment mask for this cell, dot included
    pub fn segments(&self) -> u8 {
        let mask = segment::encode(self.symbol);
        if self.dot {
            mask | SEG_DP
        } else {
            mask
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Fixed-width row of cells in physical order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    cells: Vec<Cell, MAX_DIGITS>,
}

impl DisplayBuffer {
    /// Create a blank buffer with `width` positions (capped at [`MAX_DIGITS`])
    pub fn new(width: usize) -> Self {
        let mut cells = Vec::new();
        let _ = cells.resize(width.min(MAX_DIGITS), Cell::BLANK);
        Self { cells }
    }

    /// Number of digit positions
    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// Cells in physical digit order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at a physical position
    pub fn cell(&self, position: usize) -> Option<Cell> {
        self.cells.get(position).copied()
    }

    /// Replace the content with `text`
    ///
    /// A `.` lights the dot of the symbol before it and takes no cell of its
    /// own. A `.` with nothing to attach to (leading, or repeated) is
    /// dropped. Text beyond the width is discarded and short text is padded
    /// with blanks on the right.
    pub fn set_content(&mut self, text: &str) {
        let width = self.width();
        let mut reading: Vec<Cell, MAX_DIGITS> = Vec::new();
        let mut chars = text.chars().peekable();

        while reading.len() < width {
            let Some(symbol) = chars.next() else {
                break;
            };
            if symbol == '.' {
                continue;
            }

            let dot = chars.next_if_eq(&'.').is_some();
            let _ = reading.push(Cell {
                symbol: symbol.to_ascii_uppercase(),
                dot,
            });
        }

        let _ = reading.resize(width, Cell::BLANK);
        for (slot, cell) in self.cells.iter_mut().zip(reading.iter().rev()) {
            *slot = *cell;
        }
    }

    /// Content in reading order, dots re-inserted
    pub fn text(&self) -> DisplayText {
        let mut text = String::new();
        for cell in self.cells.iter().rev() {
            let _ = text.push(cell.symbol);
            if cell.dot {
                let _ = text.push('.');
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cell(symbol: char, dot: bool) -> Cell {
        Cell { symbol, dot }
    }

    #[test]
    fn test_dot_folds_into_previous_cell() {
        let mut buffer = DisplayBuffer::new(4);
        buffer.set_content("AB.C");
        assert_eq!(
            buffer.cells(),
            &[
                Cell::BLANK,
                cell('C', false),
                cell('B', true),
                cell('A', false),
            ]
        );
    }

    #[test]
    fn test_leading_and_repeated_dots_dropped() {
        let mut buffer = DisplayBuffer::new(4);
        buffer.set_content(".A..B");
        assert_eq!(
            buffer.cells(),
            &[Cell::BLANK, Cell::BLANK, cell('B', false), cell('A', true)]
        );
    }

    #[test]
    fn test_case_folding() {
        let mut buffer = DisplayBuffer::new(3);
        buffer.set_content("abc");
        assert_eq!(buffer.text().as_str(), "ABC");
    }

    #[test]
    fn test_truncates_long_text() {
        let mut buffer = DisplayBuffer::new(8);
        buffer.set_content("RED DAWN RISING");
        assert_eq!(buffer.text().as_str(), "RED DAWN");
    }

    #[test]
    fn test_dot_after_last_cell_is_kept() {
        let mut buffer = DisplayBuffer::new(2);
        buffer.set_content("12.3");
        assert_eq!(buffer.cells(), &[cell('2', true), cell('1', false)]);
    }

    #[test]
    fn test_previous_content_replaced() {
        let mut buffer = DisplayBuffer::new(4);
        buffer.set_content("ABCD");
        buffer.set_content("X");
        assert_eq!(buffer.text().as_str(), "X   ");
    }

    #[test]
    fn test_cell_segments_include_dot() {
        assert_eq!(cell('8', true).segments(), 0xFF);
        assert_eq!(Cell::BLANK.segments(), 0);
    }

    #[test]
    fn test_width_capped() {
        assert_eq!(DisplayBuffer::new(40).width(), MAX_DIGITS);
    }

    proptest! {
        #[test]
        fn dot_free_text_is_reversed(text in "[A-Z0-9 -]{0,12}", width in 1usize..=MAX_DIGITS) {
            let mut buffer = DisplayBuffer::new(width);
            buffer.set_content(&text);

            let symbols: std::vec::Vec<char> = text.chars().collect();
            for (position, cell) in buffer.cells().iter().enumerate() {
                let reading_index = width - 1 - position;
                let expected = symbols.get(reading_index).copied().unwrap_or(BLANK_SYMBOL);
                prop_assert_eq!(cell.symbol, expected);
                prop_assert!(!cell.dot);
            }
        }
    }
}
