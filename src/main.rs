// Separately:
// CPU: ~700 times per second (configurable)
// Display: 60 times per second
// Timer: 60 times per second

use std::path::PathBuf;

use anyhow::{Context, Result};
use chip8vm::{
    config::{DEFAULT_PROGRAM_OFFSET, ETI_660_OFFSET},
    timer::{TickClock, TIMER_DEC_PER_SECOND},
    Config, Emulator, SpriteMode,
};
use clap::Parser;
use log::{error, info};

use window::Screen;

mod window;

// frames we are willing to catch up on after a stall
const MAX_CATCH_UP_TICKS: u32 = 4;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 virtual machine", long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions per second
    #[arg(long, default_value_t = 700)]
    ips: u32,

    /// Clip sprites at the screen edge instead of wrapping them
    #[arg(long)]
    clip: bool,

    /// Load the program at 0x600 like an ETI 660
    #[arg(long)]
    eti: bool,

    /// Mask out-of-range addresses to 12 bits instead of faulting
    #[arg(long)]
    wrap_addresses: bool,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Window scale factor
    #[arg(long, default_value_t = 16)]
    scale: u8,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            program_offset: if self.eti {
                ETI_660_OFFSET
            } else {
                DEFAULT_PROGRAM_OFFSET
            },
            sprite_mode: if self.clip {
                SpriteMode::Clip
            } else {
                SpriteMode::Wrap
            },
            wrap_addresses: self.wrap_addresses,
            seed: self.seed,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut emu = Emulator::with_config(args.config());
    emu.load_rom_file(&args.rom)
        .with_context(|| format!("loading {}", args.rom.display()))?;

    let mut screen = Screen::new(args.scale)?;
    let steps_per_frame = (args.ips / TIMER_DEC_PER_SECOND as u32).max(1);
    let mut clock = TickClock::new();
    info!(
        "running {} at {} instructions per frame",
        args.rom.display(),
        steps_per_frame
    );

    while screen.is_running() {
        screen.sample_keys(&mut emu);
        for _ in 0..clock.due_ticks().min(MAX_CATCH_UP_TICKS) {
            for _ in 0..steps_per_frame {
                if let Err(fault) = emu.step() {
                    error!("{fault} at {:#05X}", emu.pc());
                    return Err(fault).context("program fault");
                }
                // nothing more happens this frame until the host feeds a key
                if emu.is_waiting_for_key() {
                    break;
                }
            }
            emu.tick_timers();
        }
        screen.sync(&mut emu)?;
    }

    info!("window closed, shutting down");
    Ok(())
}
