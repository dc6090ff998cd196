// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering of the pipeline board.
//!
//! Everything is drawn onto a [`Canvas`] of Unicode cells: connectors first, then arrowheads,
//! then anchor boxes on top. The result carries per-anchor colour regions so the TUI can paint
//! anchors with their declared colours.

use std::fmt;

pub mod board;
pub mod connector;
mod text;

pub use board::{render_board, render_diagram_text, AnchorPaint, BoardRenderError, RenderedBoard};
pub use connector::{
    initialize as initialize_connectors, route_between, ArrowDirection, ConnectorRoute,
    RenderedConnector, RenderedConnectorSet,
};
pub(crate) use text::canvas_to_string_trimmed;

pub const UNICODE_BOX_HORIZONTAL: char = '─';
pub const UNICODE_BOX_VERTICAL: char = '│';
pub const UNICODE_BOX_TOP_LEFT: char = '┌';
pub const UNICODE_BOX_TOP_RIGHT: char = '┐';
pub const UNICODE_BOX_BOTTOM_LEFT: char = '└';
pub const UNICODE_BOX_BOTTOM_RIGHT: char = '┘';
pub const UNICODE_BOX_TEE_RIGHT: char = '├';
pub const UNICODE_BOX_TEE_LEFT: char = '┤';
pub const UNICODE_BOX_TEE_DOWN: char = '┬';
pub const UNICODE_BOX_TEE_UP: char = '┴';
pub const UNICODE_BOX_CROSS: char = '┼';

/// Which of the four cell sides a box-drawing glyph reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sides(u8);

impl Sides {
    const NONE: Self = Self(0);
    const LEFT: Self = Self(1 << 0);
    const RIGHT: Self = Self(1 << 1);
    const UP: Self = Self(1 << 2);
    const DOWN: Self = Self(1 << 3);

    fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn contains(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    fn of_glyph(ch: char) -> Option<Self> {
        let sides = match ch {
            UNICODE_BOX_HORIZONTAL => Self::LEFT.union(Self::RIGHT),
            UNICODE_BOX_VERTICAL => Self::UP.union(Self::DOWN),
            UNICODE_BOX_TOP_LEFT => Self::RIGHT.union(Self::DOWN),
            UNICODE_BOX_TOP_RIGHT => Self::LEFT.union(Self::DOWN),
            UNICODE_BOX_BOTTOM_LEFT => Self::RIGHT.union(Self::UP),
            UNICODE_BOX_BOTTOM_RIGHT => Self::LEFT.union(Self::UP),
            UNICODE_BOX_TEE_RIGHT => Self::UP.union(Self::DOWN).union(Self::RIGHT),
            UNICODE_BOX_TEE_LEFT => Self::UP.union(Self::DOWN).union(Self::LEFT),
            UNICODE_BOX_TEE_DOWN => Self::LEFT.union(Self::RIGHT).union(Self::DOWN),
            UNICODE_BOX_TEE_UP => Self::LEFT.union(Self::RIGHT).union(Self::UP),
            UNICODE_BOX_CROSS => Self::LEFT.union(Self::RIGHT).union(Self::UP).union(Self::DOWN),
            _ => return None,
        };
        Some(sides)
    }

    fn glyph(self) -> char {
        match self.0 {
            0 => ' ',
            // Straight runs, including dangling ends.
            1..=3 => UNICODE_BOX_HORIZONTAL,
            4 | 8 | 12 => UNICODE_BOX_VERTICAL,
            10 => UNICODE_BOX_TOP_LEFT,
            9 => UNICODE_BOX_TOP_RIGHT,
            6 => UNICODE_BOX_BOTTOM_LEFT,
            5 => UNICODE_BOX_BOTTOM_RIGHT,
            14 => UNICODE_BOX_TEE_RIGHT,
            13 => UNICODE_BOX_TEE_LEFT,
            11 => UNICODE_BOX_TEE_DOWN,
            7 => UNICODE_BOX_TEE_UP,
            _ => UNICODE_BOX_CROSS,
        }
    }
}

/// A fixed-size, bounds-checked character grid.
///
/// Box-drawing glyphs written to the same cell merge into junctions; any other character
/// replaces whatever the cell held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
    sides: Vec<Sides>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        let len = width
            .checked_mul(height)
            .ok_or(CanvasError::AreaOverflow { width, height })?;

        Ok(Self {
            width,
            height,
            cells: vec![' '; len],
            sides: vec![Sides::NONE; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        let idx = self.index_of(x, y)?;
        Ok(self.glyph_at(x, y, idx))
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) -> Result<(), CanvasError> {
        let idx = self.index_of(x, y)?;
        match Sides::of_glyph(ch) {
            Some(sides) => self.sides[idx] = self.sides[idx].union(sides),
            None => {
                self.cells[idx] = ch;
                self.sides[idx] = Sides::NONE;
            }
        }
        Ok(())
    }

    /// Writes `text` left-to-right from `(x, y)`, clipping at the right edge.
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) -> Result<(), CanvasError> {
        self.index_of(x.min(self.width.saturating_sub(1)), y)?;
        for (offset, ch) in text.chars().enumerate() {
            let cx = x + offset;
            if cx >= self.width {
                break;
            }
            self.set(cx, y, ch)?;
        }
        Ok(())
    }

    /// Resets every cell of `x0..=x1` x `y0..=y1` to a blank, dropping any line glyphs.
    pub fn clear_rect(
        &mut self,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
    ) -> Result<(), CanvasError> {
        self.check_rect(x0, y0, x1, y1)?;
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                let idx = (y * self.width) + x;
                self.cells[idx] = ' ';
                self.sides[idx] = Sides::NONE;
            }
        }
        Ok(())
    }

    pub fn draw_hline(&mut self, x0: usize, x1: usize, y: usize) -> Result<(), CanvasError> {
        self.check_rect(x0, y, x1, y)?;
        for x in x0.min(x1)..=x0.max(x1) {
            self.set(x, y, UNICODE_BOX_HORIZONTAL)?;
        }
        Ok(())
    }

    pub fn draw_vline(&mut self, x: usize, y0: usize, y1: usize) -> Result<(), CanvasError> {
        self.check_rect(x, y0, x, y1)?;
        for y in y0.min(y1)..=y0.max(y1) {
            self.set(x, y, UNICODE_BOX_VERTICAL)?;
        }
        Ok(())
    }

    /// Draws a single-line box with opposite corners `(x0, y0)` and `(x1, y1)`.
    ///
    /// Nothing is drawn when any corner is out of bounds.
    pub fn draw_box(
        &mut self,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
    ) -> Result<(), CanvasError> {
        self.check_rect(x0, y0, x1, y1)?;
        let (min_x, max_x) = (x0.min(x1), x0.max(x1));
        let (min_y, max_y) = (y0.min(y1), y0.max(y1));

        if min_y == max_y {
            return self.draw_hline(min_x, max_x, min_y);
        }
        if min_x == max_x {
            return self.draw_vline(min_x, min_y, max_y);
        }

        for x in (min_x + 1)..max_x {
            self.set(x, min_y, UNICODE_BOX_HORIZONTAL)?;
            self.set(x, max_y, UNICODE_BOX_HORIZONTAL)?;
        }
        for y in (min_y + 1)..max_y {
            self.set(min_x, y, UNICODE_BOX_VERTICAL)?;
            self.set(max_x, y, UNICODE_BOX_VERTICAL)?;
        }
        self.set(min_x, min_y, UNICODE_BOX_TOP_LEFT)?;
        self.set(max_x, min_y, UNICODE_BOX_TOP_RIGHT)?;
        self.set(min_x, max_y, UNICODE_BOX_BOTTOM_LEFT)?;
        self.set(max_x, max_y, UNICODE_BOX_BOTTOM_RIGHT)?;
        Ok(())
    }

    /// Rendered rows, one `String` per canvas line.
    pub fn rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.glyph_at(x, y, (y * self.width) + x))
                    .collect::<String>()
            })
            .collect()
    }

    fn check_rect(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> Result<(), CanvasError> {
        self.index_of(x0.max(x1), y0.max(y1)).map(|_| ())
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        if !self.in_bounds(x, y) {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y * self.width) + x)
    }

    fn glyph_at(&self, x: usize, y: usize, idx: usize) -> char {
        let sides = self.sides[idx];
        if sides.is_empty() {
            return self.cells[idx];
        }

        // Only keep the sides that actually meet a neighbour, so line ends stay straight.
        let mut joined = Sides::NONE;
        if sides.contains(Sides::LEFT) && x > 0 && self.sides[idx - 1].contains(Sides::RIGHT) {
            joined = joined.union(Sides::LEFT);
        }
        if sides.contains(Sides::RIGHT)
            && x + 1 < self.width
            && self.sides[idx + 1].contains(Sides::LEFT)
        {
            joined = joined.union(Sides::RIGHT);
        }
        if sides.contains(Sides::UP) && y > 0 && self.sides[idx - self.width].contains(Sides::DOWN)
        {
            joined = joined.union(Sides::UP);
        }
        if sides.contains(Sides::DOWN)
            && y + 1 < self.height
            && self.sides[idx + self.width].contains(Sides::UP)
        {
            joined = joined.union(Sides::DOWN);
        }

        if joined.is_empty() {
            sides.glyph()
        } else {
            joined.glyph()
        }
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rows().join("\n"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    AreaOverflow {
        width: usize,
        height: usize,
    },
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AreaOverflow { width, height } => {
                write!(f, "canvas area overflow: {width}*{height}")
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "out of bounds: ({x},{y}) for {width}x{height} canvas"),
        }
    }
}

impl std::error::Error for CanvasError {}
