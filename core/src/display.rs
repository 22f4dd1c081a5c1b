use std::fmt;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// # Frame Buffer
/// The Chip-8 display is composed of 64x32 black/white pixels.
///
/// Each row is stored as a 64-bit set, bit `x` holding the pixel in column `x`.
/// Coordinates wrap around both edges, so sprites drawn past the right or
/// bottom edge continue on the opposite side.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    rows: [u64; DISPLAY_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            rows: [0; DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.rows = [0; DISPLAY_HEIGHT];
    }

    /// Lights every pixel.
    pub fn full(&mut self) {
        self.rows = [u64::MAX; DISPLAY_HEIGHT];
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        let (x, y) = wrap(x, y);
        self.rows[y] & (1u64 << x) != 0
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        let (x, y) = wrap(x, y);
        if on {
            self.rows[y] |= 1u64 << x;
        } else {
            self.rows[y] &= !(1u64 << x);
        }
    }

    pub fn toggle(&mut self, x: usize, y: usize) {
        let (x, y) = wrap(x, y);
        self.rows[y] ^= 1u64 << x;
    }

    /// XORs an 8-pixel wide sprite onto the screen with its top left corner at (x, y).
    ///
    /// Each byte of `sprite` is one row, most significant bit leftmost.
    /// Returns whether any lit pixel was switched off.
    pub fn blit(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collided = false;

        for (dy, byte) in sprite.iter().enumerate() {
            for bit in 0..8 {
                let pixel = (byte >> (7 - bit)) & 1 == 1;
                let old = self.get(x + bit, y + dy);
                let new = old ^ pixel;
                self.set(x + bit, y + dy, new);
                collided |= old && !new;
            }
        }

        collided
    }

    /// Rows top to bottom, each as 64 pixels left to right.
    pub fn rows(&self) -> impl Iterator<Item = [bool; DISPLAY_WIDTH]> + '_ {
        self.rows.iter().map(|row| {
            let mut pixels = [false; DISPLAY_WIDTH];
            for (x, pixel) in pixels.iter_mut().enumerate() {
                *pixel = *row & (1u64 << x) != 0;
            }
            pixels
        })
    }
}

fn wrap(x: usize, y: usize) -> (usize, usize) {
    (x % DISPLAY_WIDTH, y % DISPLAY_HEIGHT)
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws lit pixels as `#` inside a border, one text line per row.
impl fmt::Display for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let border = "-".repeat(DISPLAY_WIDTH);
        writeln!(f, "+{}+", border)?;
        for row in self.rows() {
            let line: String = row.iter().map(|on| if *on { '#' } else { ' ' }).collect();
            writeln!(f, "|{}|", line)?;
        }
        write!(f, "+{}+", border)
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lit: u32 = self.rows.iter().map(|row| row.count_ones()).sum();
        write!(f, "FrameBuffer({} lit)", lit)
    }
}
