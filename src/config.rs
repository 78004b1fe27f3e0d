use crate::memory::TypeAddr;

pub const DEFAULT_PROGRAM_OFFSET: TypeAddr = 0x200;
// ETI 660 machines load programs higher up
pub const ETI_660_OFFSET: TypeAddr = 0x600;

/// How a sprite behaves when it runs off the edge of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteMode {
    /// every pixel wraps around to the opposite edge
    #[default]
    Wrap,
    /// the start position wraps, anything past the right/bottom edge is dropped
    Clip,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub program_offset: TypeAddr,
    pub sprite_mode: SpriteMode,
    /// mask addresses to 12 bits instead of faulting
    pub wrap_addresses: bool,
    /// `None` seeds the random source from the OS once per session
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            program_offset: DEFAULT_PROGRAM_OFFSET,
            sprite_mode: SpriteMode::Wrap,
            wrap_addresses: false,
            seed: None,
        }
    }
}

impl Config {
    pub fn eti_660() -> Self {
        Self {
            program_offset: ETI_660_OFFSET,
            ..Self::default()
        }
    }
}
