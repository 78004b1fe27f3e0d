use log::debug;

use crate::config::SpriteMode;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Monochrome 64x32 screen. Only drawing and clearing mutate it; both raise
/// the dirty flag until the host takes it.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    bit_buffer: [[bool; WIDTH]; HEIGHT],
    dirty: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [[false; WIDTH]; HEIGHT],
            dirty: false,
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [[false; WIDTH]; HEIGHT];
        self.dirty = true;
    }

    /// XORs an 8-pixel-wide sprite onto the screen.
    /// Returns true if any lit pixel was switched off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8], mode: SpriteMode) -> bool {
        let mut collision = false;
        let (x, y) = (x as usize, y as usize);
        for (i, row) in sprite.iter().enumerate() {
            for j in 0..8 {
                let (nx, ny) = match mode {
                    SpriteMode::Wrap => ((x + j) % WIDTH, (y + i) % HEIGHT),
                    SpriteMode::Clip => {
                        let (nx, ny) = (x % WIDTH + j, y % HEIGHT + i);
                        if nx >= WIDTH || ny >= HEIGHT {
                            continue;
                        }
                        (nx, ny)
                    }
                };
                let bit = (row >> (7 - j)) & 1 == 1;
                let previous = self.bit_buffer[ny][nx];
                self.bit_buffer[ny][nx] ^= bit;
                if previous && bit {
                    collision = true;
                }
            }
        }
        self.dirty = true;
        debug!(
            "painted {} row sprite at ({x}, {y}), collision: {collision}",
            sprite.len()
        );
        collision
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[y % HEIGHT][x % WIDTH]
    }

    pub fn rows(&self) -> &[[bool; WIDTH]; HEIGHT] {
        &self.bit_buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reads and clears the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
