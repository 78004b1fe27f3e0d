// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits significant)
//
// Delay timer & Sound timer: count down at 60 times / s until 0,
// independent of how fast instructions run
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod errors;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;

pub use config::{Config, SpriteMode};
pub use emulator::{Emulator, MachineState};
pub use errors::{LoadError, RuntimeFault};
