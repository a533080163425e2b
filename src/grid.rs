//! The program grid.
//!
//! Two layers cover the same cells:
//!
//! - the raw byte layer, read by `g`, written by `p` and scanned by string
//!   mode;
//! - the compiled layer of [`OpCode`]s, one ring wider on every side. The ring
//!   holds `WrapX` on the left and right columns and `WrapY` on the top and
//!   bottom rows, so moving off an edge lands on a handle that snaps the
//!   cursor to the opposite edge.
//!
//! Positions use logical coordinates: `0..width` and `0..height` are program
//! cells, `-1` and `width`/`height` are the ring.

use crate::core::error::{BefError, BefResult};
use crate::core::position::{Position, GRID_H, GRID_W};
use crate::opcode::OpCode;

#[derive(Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    raw: Vec<u8>,
    code: Vec<OpCode>,
}

impl Grid {
    /// A grid of spaces.
    pub fn new(width: usize, height: usize) -> Self {
        let padded_w = width + 2;
        let padded_h = height + 2;
        let mut code = vec![OpCode::Nop; padded_w * padded_h];

        for py in 0..padded_h {
            for px in 0..padded_w {
                let on_side = px == 0 || px == padded_w - 1;
                let on_cap = py == 0 || py == padded_h - 1;
                if on_side {
                    code[py * padded_w + px] = OpCode::WrapX;
                } else if on_cap {
                    code[py * padded_w + px] = OpCode::WrapY;
                }
            }
        }

        Grid {
            width,
            height,
            raw: vec![b' '; width * height],
            code,
        }
    }

    /// Build the standard 80x25 grid from source bytes.
    ///
    /// Reads at most 25 lines. A trailing `\r` is dropped from each line;
    /// short lines are padded with spaces; a line wider than the grid is
    /// rejected.
    pub fn from_source(source: &[u8]) -> BefResult<Self> {
        let mut grid = Grid::new(GRID_W, GRID_H);

        for (y, line) in source.split(|&b| b == b'\n').take(GRID_H).enumerate() {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.len() > GRID_W {
                return Err(BefError::LineTooLong {
                    line: y + 1,
                    length: line.len(),
                    max: GRID_W,
                });
            }
            for (x, &byte) in line.iter().enumerate() {
                grid.set_cell(x, y, byte);
            }
        }

        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw index of a program cell.
    #[inline]
    fn cell_index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Compiled index of a program or ring cell.
    #[inline]
    fn padded_index(&self, pos: Position) -> Option<usize> {
        let px = pos.x as i64 + 1;
        let py = pos.y as i64 + 1;
        let padded_w = self.width as i64 + 2;
        let padded_h = self.height as i64 + 2;
        if px < 0 || py < 0 || px >= padded_w || py >= padded_h {
            return None;
        }
        Some((py * padded_w + px) as usize)
    }

    fn set_cell(&mut self, x: usize, y: usize, byte: u8) {
        self.raw[y * self.width + x] = byte;
        let padded = (y + 1) * (self.width + 2) + (x + 1);
        self.code[padded] = OpCode::from_byte(byte);
    }

    /// The compiled instruction at `pos`.
    #[inline]
    pub fn op_at(&self, pos: Position) -> OpCode {
        match self.padded_index(pos) {
            Some(i) => self.code[i],
            // Only reachable through a corrupted cursor; steer it back
            None if pos.x < -1 || pos.x > self.width as i32 => OpCode::WrapX,
            None => OpCode::WrapY,
        }
    }

    /// The raw byte at a program cell, if `pos` is inside the grid.
    #[inline]
    pub fn raw_at(&self, pos: Position) -> Option<u8> {
        self.get(pos.x as i64, pos.y as i64)
    }

    /// Read a cell for `g`.
    pub fn get(&self, x: i64, y: i64) -> Option<u8> {
        self.cell_index(x, y).map(|i| self.raw[i])
    }

    /// Write a cell for `p` and recompile it. Returns false, writing
    /// nothing, when `(x, y)` is outside the grid.
    pub fn put(&mut self, x: i64, y: i64, byte: u8) -> bool {
        if self.cell_index(x, y).is_none() {
            return false;
        }
        self.set_cell(x as usize, y as usize, byte);
        true
    }

    /// Whether `pos` is on the border ring.
    pub fn is_border(&self, pos: Position) -> bool {
        self.op_at(pos).is_wrap()
    }

    /// Apply the wrap handle at `pos`, if there is one.
    pub fn resolve_wrap(&self, pos: Position) -> Position {
        match self.op_at(pos) {
            OpCode::WrapX => pos.wrap_x(self.width),
            OpCode::WrapY => pos.wrap_y(self.height),
            _ => pos,
        }
    }

    /// A row of raw bytes.
    pub fn row(&self, y: usize) -> &[u8] {
        &self.raw[y * self.width..(y + 1) * self.width]
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid {}x{}", self.width, self.height)?;
        for y in 0..self.height {
            writeln!(f, "{}", String::from_utf8_lossy(self.row(y)).trim_end())?;
        }
        Ok(())
    }
}
