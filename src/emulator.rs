use std::{fs, io, path::Path};

use log::{debug, trace, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::Config,
    decode::OpCodes,
    display::FrameBuffer,
    errors::{LoadError, RuntimeFault},
    keyboard::Keypad,
    memory::{glyph_addr, Memory, TypeAddr},
    registers::Registers,
    timer::Timer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    Running,
    /// Parked on `LD Vx, K` until a key is held; carries x.
    WaitingForKey(u8),
}

pub struct Emulator {
    fb: FrameBuffer,
    regs: Registers,
    mem: Memory,
    delay_timer: Timer,
    sound_timer: Timer,
    keypad: Keypad,
    state: MachineState,
    rng: StdRng,
    config: Config,
    unrecognized: u64,
}

impl Emulator {
    pub fn init() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            regs: Registers::new(),
            mem: Memory::new(config.program_offset, config.wrap_addresses),
            fb: FrameBuffer::new(),
            delay_timer: Timer::new(0),
            sound_timer: Timer::new(0),
            keypad: Keypad::new(),
            state: MachineState::Running,
            rng,
            config,
            unrecognized: 0,
        }
    }

    pub fn load_program(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        self.mem.load_program(bytes)
    }

    pub fn load_rom_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let program = fs::read(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
            _ => LoadError::ReadFailure(err),
        })?;
        self.load_program(&program)
    }

    /// Runs one instruction, or polls the keypad while parked on a key wait.
    /// On a fault PC is left on the faulting instruction.
    pub fn step(&mut self) -> Result<(), RuntimeFault> {
        if let MachineState::WaitingForKey(vx) = self.state {
            if let Some(key) = self.keypad.first_pressed() {
                debug!("key {key:#X} released wait on V{vx:X}");
                self.regs.set_register(vx, key);
                self.mem.increment_pc();
                self.state = MachineState::Running;
            }
            return Ok(());
        }

        let start = self.mem.pc.0;
        let operation = self.fetch_decode()?;
        trace!("{start:#05X}: {operation:?}");
        if let Err(fault) = self.execute_ins(operation) {
            self.mem.set_pc(start);
            return Err(fault);
        }
        Ok(())
    }

    fn fetch_decode(&mut self) -> Result<OpCodes, RuntimeFault> {
        let ins = self.mem.next_instruction()?;
        Ok(OpCodes::decode_raw(ins))
    }

    // PC already points past the instruction when this runs
    fn execute_ins(&mut self, ins: OpCodes) -> Result<(), RuntimeFault> {
        match ins {
            OpCodes::ClearScreen => self.fb.clear_buffer(),
            OpCodes::PopSubroutine => {
                let addr = self.mem.stack.pop()?;
                self.mem.set_pc(addr);
            }
            OpCodes::Jump(addr) => self.mem.set_pc(addr),
            OpCodes::PushSubroutine(addr) => {
                self.mem.stack.push(self.mem.pc.0)?; // return address
                self.mem.set_pc(addr);
            }
            OpCodes::JumpWithOffset(addr) => {
                self.mem.set_pc(addr + self.regs.get(0) as TypeAddr);
            }

            OpCodes::SkipEqualConstant(vx, nn) => self.skip_if(self.regs.get(vx) == nn),
            OpCodes::SkipNotEqualConstant(vx, nn) => self.skip_if(self.regs.get(vx) != nn),
            OpCodes::SkipEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) == self.regs.get(vy))
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) != self.regs.get(vy))
            }

            OpCodes::SetRegister(vx, nn) => self.regs.set_register(vx, nn),
            OpCodes::AddToRegister(vx, nn) => self.regs.add_to_register(vx, nn),

            OpCodes::CopyRegister(vx, vy) => self.regs.set_register(vx, self.regs.get(vy)),
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            // flag operations capture operands first and write VF last, since x may be F
            OpCodes::Add(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                let (z, carry) = x.overflowing_add(y);
                self.regs.set_register(vx, z);
                self.regs.set_flag(carry);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, x.wrapping_sub(y));
                self.regs.set_flag(x >= y); // no borrow
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, y.wrapping_sub(x));
                self.regs.set_flag(y >= x); // no borrow
            }
            OpCodes::RightShift(vx, _) => {
                let x = self.regs.get(vx);
                self.regs.set_register(vx, x >> 1);
                self.regs.set_flag(x & 1 == 1);
            }
            OpCodes::LeftShift(vx, _) => {
                let x = self.regs.get(vx);
                self.regs.set_register(vx, x << 1);
                self.regs.set_flag((x >> 7) & 1 == 1);
            }

            OpCodes::SetIndexRegister(addr) => self.mem.set_index(addr),
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::Display(reg_x, reg_y, height) => self.draw(reg_x, reg_y, height)?,

            OpCodes::SkipIfPressed(vx) => {
                self.skip_if(self.keypad.is_pressed(self.regs.get(vx)))
            }
            OpCodes::SkipIfNotPressed(vx) => {
                self.skip_if(!self.keypad.is_pressed(self.regs.get(vx)))
            }

            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.delay_timer.count),
            OpCodes::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)),
            OpCodes::GetKey(vx) => {
                // stay on this instruction until a key shows up
                self.mem.decrement_pc();
                self.state = MachineState::WaitingForKey(vx);
                debug!("waiting for key into V{vx:X}");
            }
            OpCodes::AddToIndex(vx) => {
                let value = self.regs.get(vx);
                let overflow = self.mem.index.add(value);
                self.regs.set_flag(overflow);
            }
            OpCodes::PointChar(vx) => self.mem.set_index(glyph_addr(self.regs.get(vx))),
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let index = self.mem.index.0 as u32;
                self.mem.check_span(index, 3)?;
                for (i, digit) in [value / 100, (value / 10) % 10, value % 10]
                    .into_iter()
                    .enumerate()
                {
                    self.mem.set(index + i as u32, digit)?;
                }
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let index = self.mem.index.0 as u32;
                self.mem.check_span(index, vx as u32 + 1)?;
                for reg in 0..=vx {
                    self.mem.set(index + reg as u32, self.regs.get(reg))?;
                }
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let index = self.mem.index.0 as u32;
                self.mem.check_span(index, vx as u32 + 1)?;
                for reg in 0..=vx {
                    let reg_val = self.mem.get(index + reg as u32)?;
                    self.regs.set_register(reg, reg_val);
                }
            }

            OpCodes::Unrecognized(raw) => {
                self.unrecognized += 1;
                warn!(
                    "ignoring unrecognized opcode {raw:#06X} at {:#05X}",
                    self.mem.pc.0.wrapping_sub(2)
                );
            }
        }
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.mem.increment_pc();
        }
    }

    fn draw(&mut self, reg_x: u8, reg_y: u8, height: u8) -> Result<(), RuntimeFault> {
        let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
        let index = self.mem.index.0 as u32;
        self.mem.check_span(index, height as u32)?;
        // From I to I + N, one byte is one 8 pixel row
        let sprite = (0..height as u32)
            .map(|row| self.mem.get(index + row))
            .collect::<Result<Vec<u8>, _>>()?;

        let collision = self.fb.paint(x, y, &sprite, self.config.sprite_mode);
        self.regs.set_flag(collision);
        Ok(())
    }

    /// One 60 Hz tick of both timers.
    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    pub fn set_key(&mut self, index: u8, pressed: bool) {
        self.keypad.set_key(index, pressed);
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    /// Reads and clears the framebuffer's dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        self.fb.take_dirty()
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn is_waiting_for_key(&self) -> bool {
        matches!(self.state, MachineState::WaitingForKey(_))
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.count
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.count
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer.count > 0
    }

    pub fn pc(&self) -> TypeAddr {
        self.mem.pc.0
    }

    pub fn index(&self) -> TypeAddr {
        self.mem.index.0
    }

    pub fn register(&self, n: u8) -> u8 {
        self.regs.get(n)
    }

    pub fn memory(&self) -> &[u8] {
        self.mem.bytes()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// How many unrecognized opcodes have been skipped this session.
    pub fn unrecognized_count(&self) -> u64 {
        self.unrecognized
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SpriteMode, memory::DEFAULT_FONT};

    fn emulator_with(program: &[u8]) -> Emulator {
        let mut emu = Emulator::with_config(Config {
            seed: Some(8),
            ..Config::default()
        });
        emu.load_program(program).unwrap();
        emu
    }

    fn run(emu: &mut Emulator, steps: usize) {
        for _ in 0..steps {
            emu.step().unwrap();
        }
    }

    #[test]
    fn init_state() {
        let emu = Emulator::init();
        assert_eq!(&emu.memory()[0x050..0x0A0], &DEFAULT_FONT[..]);
        assert_eq!(emu.pc(), 0x200);
        assert_eq!(emu.index(), 0);
        assert!((0..16).all(|r| emu.register(r) == 0));
        assert_eq!(emu.mem.stack.depth(), 0);
        assert_eq!(emu.delay_timer(), 0);
        assert_eq!(emu.sound_timer(), 0);
        assert_eq!(emu.state(), MachineState::Running);
        assert!(emu.framebuffer().rows().iter().flatten().all(|p| !*p));
    }

    #[test]
    fn eti_offset_moves_program_start() {
        let mut emu = Emulator::with_config(Config::eti_660());
        emu.load_program(&[0x60, 0x42]).unwrap();
        assert_eq!(emu.pc(), 0x600);
        emu.step().unwrap();
        assert_eq!(emu.register(0), 0x42);
    }

    #[test]
    fn missing_rom_file() {
        let mut emu = Emulator::init();
        match emu.load_rom_file("/definitely/not/a/rom.ch8") {
            Err(LoadError::NotFound(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn jump_and_call_return() {
        // 200: CALL 206 / 202: JP 202 / 206: RET
        let mut emu = emulator_with(&[0x22, 0x06, 0x12, 0x02, 0x00, 0x00, 0x00, 0xEE]);
        emu.step().unwrap();
        assert_eq!(emu.pc(), 0x206);
        assert_eq!(emu.mem.stack.depth(), 1);
        emu.step().unwrap();
        assert_eq!(emu.pc(), 0x202);
        emu.step().unwrap();
        assert_eq!(emu.pc(), 0x202);
    }

    #[test]
    fn return_on_empty_stack_underflows() {
        let mut emu = emulator_with(&[0x00, 0xEE]);
        assert_eq!(emu.step(), Err(RuntimeFault::StackUnderflow));
        assert_eq!(emu.pc(), 0x200);
    }

    #[test]
    fn sixteen_calls_then_overflow() {
        // each CALL targets the next instruction
        let program: Vec<u8> = (0..17u16)
            .flat_map(|i| {
                let target = 0x202 + i * 2;
                [0x20 | (target >> 8) as u8, target as u8]
            })
            .collect();
        let mut emu = emulator_with(&program);
        run(&mut emu, 16);
        assert_eq!(emu.mem.stack.depth(), 16);
        let pc = emu.pc();
        assert_eq!(emu.step(), Err(RuntimeFault::StackOverflow));
        assert_eq!(emu.pc(), pc);
        assert_eq!(emu.mem.stack.depth(), 16);
    }

    #[test]
    fn jump_with_offset() {
        let mut emu = emulator_with(&[0x60, 0x04, 0xB3, 0x00]);
        run(&mut emu, 2);
        assert_eq!(emu.pc(), 0x304);
    }

    #[test]
    fn skips_move_pc_by_four() {
        // LD V1, 11 / SE V1, 11
        let mut emu = emulator_with(&[0x61, 0x11, 0x31, 0x11]);
        run(&mut emu, 2);
        assert_eq!(emu.pc(), 0x206);

        // SNE V1, 11 not taken
        let mut emu = emulator_with(&[0x61, 0x11, 0x41, 0x11]);
        run(&mut emu, 2);
        assert_eq!(emu.pc(), 0x204);

        // SE V1, V2 not taken / SNE V1, V2 taken
        let mut emu = emulator_with(&[0x61, 0x11, 0x51, 0x20, 0x91, 0x20]);
        run(&mut emu, 3);
        assert_eq!(emu.pc(), 0x208);
    }

    #[test]
    fn immediate_add_wraps_without_flag() {
        let mut emu = emulator_with(&[0x6A, 0xFF, 0x7A, 0x02]);
        run(&mut emu, 2);
        assert_eq!(emu.register(0xA), 0x01);
        assert_eq!(emu.register(0xF), 0);
    }

    #[test]
    fn bitwise_ops() {
        let mut emu = emulator_with(&[
            0x61, 0b1100, 0x62, 0b1010, // V1, V2
            0x83, 0x10, 0x83, 0x21, // V3 = V1 | V2
            0x84, 0x10, 0x84, 0x22, // V4 = V1 & V2
            0x85, 0x10, 0x85, 0x23, // V5 = V1 ^ V2
        ]);
        run(&mut emu, 8);
        assert_eq!(emu.register(3), 0b1110);
        assert_eq!(emu.register(4), 0b1000);
        assert_eq!(emu.register(5), 0b0110);
    }

    #[test]
    fn add_registers_sets_carry() {
        let mut emu = emulator_with(&[0x61, 0xFF, 0x62, 0x01, 0x81, 0x24]);
        run(&mut emu, 3);
        assert_eq!(emu.register(1), 0x00);
        assert_eq!(emu.register(0xF), 1);

        let mut emu = emulator_with(&[0x61, 0x01, 0x62, 0x01, 0x81, 0x24]);
        run(&mut emu, 3);
        assert_eq!(emu.register(1), 0x02);
        assert_eq!(emu.register(0xF), 0);
    }

    #[test]
    fn sub_registers_sets_no_borrow() {
        let mut emu = emulator_with(&[0x61, 0x05, 0x62, 0x03, 0x81, 0x25]);
        run(&mut emu, 3);
        assert_eq!(emu.register(1), 0x02);
        assert_eq!(emu.register(0xF), 1);

        let mut emu = emulator_with(&[0x61, 0x03, 0x62, 0x05, 0x81, 0x25]);
        run(&mut emu, 3);
        assert_eq!(emu.register(1), 0xFE);
        assert_eq!(emu.register(0xF), 0);
    }

    #[test]
    fn subn_registers() {
        let mut emu = emulator_with(&[0x61, 0x05, 0x62, 0x03, 0x81, 0x27]);
        run(&mut emu, 3);
        assert_eq!(emu.register(1), 0xFE);
        assert_eq!(emu.register(0xF), 0);

        let mut emu = emulator_with(&[0x61, 0x03, 0x62, 0x05, 0x81, 0x27]);
        run(&mut emu, 3);
        assert_eq!(emu.register(1), 0x02);
        assert_eq!(emu.register(0xF), 1);
    }

    #[test]
    fn shifts_flag_the_shifted_out_bit() {
        let mut emu = emulator_with(&[0x61, 0b1000_0001, 0x81, 0x06]);
        run(&mut emu, 2);
        assert_eq!(emu.register(1), 0b0100_0000);
        assert_eq!(emu.register(0xF), 1);

        let mut emu = emulator_with(&[0x61, 0b1000_0001, 0x81, 0x0E]);
        run(&mut emu, 2);
        assert_eq!(emu.register(1), 0b0000_0010);
        assert_eq!(emu.register(0xF), 1);
    }

    #[test]
    fn flag_wins_when_vf_is_the_target() {
        // VF = 0xFF, V1 = 1, ADD VF, V1 -> flag 1 overrides the sum
        let mut emu = emulator_with(&[0x6F, 0xFF, 0x61, 0x01, 0x8F, 0x14]);
        run(&mut emu, 3);
        assert_eq!(emu.register(0xF), 1);

        // VF = 2, SHR VF -> low bit 0
        let mut emu = emulator_with(&[0x6F, 0x02, 0x8F, 0x06]);
        run(&mut emu, 2);
        assert_eq!(emu.register(0xF), 0);
    }

    #[test]
    fn random_is_masked_and_seeded() {
        let program = [0xC1, 0x0F, 0xC2, 0xFF];
        let mut a = emulator_with(&program);
        let mut b = emulator_with(&program);
        run(&mut a, 2);
        run(&mut b, 2);
        assert_eq!(a.register(1) & 0xF0, 0);
        assert_eq!(a.register(1), b.register(1));
        assert_eq!(a.register(2), b.register(2));
    }

    #[test]
    fn draw_twice_restores_screen() {
        // I = glyph 0, draw at (3, 4) twice
        let mut emu = emulator_with(&[0x60, 0x03, 0x61, 0x04, 0xA0, 0x50, 0xD0, 0x15, 0xD0, 0x15]);
        run(&mut emu, 4);
        assert_eq!(emu.register(0xF), 0);
        assert!(emu.framebuffer().pixel(3, 4));
        assert!(emu.take_dirty());
        assert!(!emu.take_dirty());
        emu.step().unwrap();
        assert_eq!(emu.register(0xF), 1);
        assert!(emu.framebuffer().rows().iter().flatten().all(|p| !*p));
        assert!(emu.take_dirty());
    }

    #[test]
    fn empty_draw_still_marks_dirty() {
        let mut emu = emulator_with(&[0xD0, 0x00]);
        emu.step().unwrap();
        assert_eq!(emu.register(0xF), 0);
        assert!(emu.take_dirty());
    }

    #[test]
    fn clip_mode_draw() {
        let mut emu = Emulator::with_config(Config {
            sprite_mode: SpriteMode::Clip,
            seed: Some(1),
            ..Config::default()
        });
        // V0 = 60, I = glyph 0, DRW V0, V1, 1
        emu.load_program(&[0x60, 0x3C, 0xA0, 0x50, 0xD0, 0x11]).unwrap();
        run(&mut emu, 3);
        assert!(emu.framebuffer().pixel(63, 0));
        assert!(!emu.framebuffer().pixel(0, 0));
    }

    #[test]
    fn draw_past_memory_end_faults() {
        // I = FFE, DRW 3 rows
        let mut emu = emulator_with(&[0xAF, 0xFE, 0xD0, 0x03]);
        emu.step().unwrap();
        assert_eq!(
            emu.step(),
            Err(RuntimeFault::OutOfRangeMemoryAccess(0x1000))
        );
        assert_eq!(emu.pc(), 0x202);
        assert!(!emu.framebuffer().is_dirty());
    }

    #[test]
    fn clear_screen() {
        let mut emu = emulator_with(&[0xA0, 0x50, 0xD0, 0x05, 0x00, 0xE0]);
        run(&mut emu, 2);
        emu.take_dirty();
        emu.step().unwrap();
        assert!(emu.take_dirty());
        assert!(emu.framebuffer().rows().iter().flatten().all(|p| !*p));
    }

    #[test]
    fn key_skips() {
        // V1 = 7 / SKP V1 / - / SKNP V1
        let mut emu = emulator_with(&[0x61, 0x07, 0xE1, 0x9E, 0x00, 0x00, 0xE1, 0xA1]);
        emu.set_key(7, true);
        run(&mut emu, 2);
        assert_eq!(emu.pc(), 0x206);
        emu.step().unwrap();
        assert_eq!(emu.pc(), 0x208);
    }

    #[test]
    fn timers_load_and_read() {
        // V1 = 10 / LD DT, V1 / LD ST, V1 / LD V2, DT
        let mut emu = emulator_with(&[0x61, 0x0A, 0xF1, 0x15, 0xF1, 0x18, 0xF2, 0x07]);
        run(&mut emu, 4);
        assert_eq!(emu.register(2), 10);
        assert!(emu.sound_active());
        for _ in 0..10 {
            emu.tick_timers();
        }
        assert_eq!(emu.delay_timer(), 0);
        emu.tick_timers();
        assert_eq!(emu.delay_timer(), 0);
        assert!(!emu.sound_active());
    }

    #[test]
    fn timers_ignore_instruction_rate() {
        // LD DT, V1 then spin on JP 204
        let mut emu = emulator_with(&[0x61, 0x05, 0xF1, 0x15, 0x12, 0x04]);
        run(&mut emu, 100);
        assert_eq!(emu.delay_timer(), 5);
    }

    #[test]
    fn wait_for_key() {
        let mut emu = emulator_with(&[0xF3, 0x0A]);
        emu.step().unwrap();
        assert_eq!(emu.state(), MachineState::WaitingForKey(3));
        assert_eq!(emu.pc(), 0x200);
        emu.step().unwrap();
        assert_eq!(emu.pc(), 0x200);
        assert!(emu.is_waiting_for_key());

        emu.set_key(7, true);
        emu.set_key(9, true);
        emu.step().unwrap();
        assert_eq!(emu.register(3), 7);
        assert_eq!(emu.pc(), 0x202);
        assert_eq!(emu.state(), MachineState::Running);
    }

    #[test]
    fn add_to_index_flags_overflow() {
        // I = FFF, V1 = 1, ADD I, V1
        let mut emu = emulator_with(&[0xAF, 0xFF, 0x61, 0x01, 0xF1, 0x1E]);
        run(&mut emu, 3);
        assert_eq!(emu.index(), 0x1000);
        assert_eq!(emu.register(0xF), 1);

        let mut emu = emulator_with(&[0xA1, 0x00, 0x61, 0x01, 0xF1, 0x1E]);
        run(&mut emu, 3);
        assert_eq!(emu.index(), 0x101);
        assert_eq!(emu.register(0xF), 0);
    }

    #[test]
    fn overflowed_index_still_faults_on_access() {
        // I = FFF, V1 = 1, ADD I, V1, LD V0, [I]
        let mut emu = emulator_with(&[0xAF, 0xFF, 0x61, 0x01, 0xF1, 0x1E, 0xF0, 0x65]);
        run(&mut emu, 3);
        assert_eq!(
            emu.step(),
            Err(RuntimeFault::OutOfRangeMemoryAccess(0x1000))
        );
    }

    #[test]
    fn wrapping_addresses_compat_mode() {
        let mut emu = Emulator::with_config(Config {
            wrap_addresses: true,
            seed: Some(1),
            ..Config::default()
        });
        // I = FFF, V1 = 1, ADD I, V1 -> 1000, V0 = 9, LD [I], V0
        emu.load_program(&[0xAF, 0xFF, 0x61, 0x01, 0xF1, 0x1E, 0x60, 0x09, 0xF0, 0x55])
            .unwrap();
        run(&mut emu, 5);
        assert_eq!(emu.memory()[0x000], 9);
    }

    #[test]
    fn font_pointer() {
        let mut emu = emulator_with(&[0x65, 0x05, 0xF5, 0x29]);
        run(&mut emu, 2);
        assert_eq!(emu.index(), 0x50 + 25);
        let i = emu.index() as usize;
        assert_eq!(&emu.memory()[i..i + 5], &[0xF0, 0x80, 0xF0, 0x10, 0xF0]);
    }

    #[test]
    fn binary_coded_decimal() {
        // V1 = 254, I = 300, LD B, V1
        let mut emu = emulator_with(&[0x61, 0xFE, 0xA3, 0x00, 0xF1, 0x33]);
        run(&mut emu, 3);
        assert_eq!(&emu.memory()[0x300..0x303], &[2, 5, 4]);
    }

    #[test]
    fn store_and_load_registers() {
        let mut emu = emulator_with(&[
            0x60, 0x01, 0x61, 0x02, 0x62, 0x03, // V0..V2
            0xA4, 0x00, 0xF2, 0x55, // store V0..V2 at 400
            0x60, 0x00, 0x61, 0x00, 0x62, 0x00, // zero them
            0xF1, 0x65, // load V0..V1 back
        ]);
        run(&mut emu, 9);
        assert_eq!(&emu.memory()[0x400..0x404], &[1, 2, 3, 0]);
        assert_eq!(emu.register(0), 1);
        assert_eq!(emu.register(1), 2);
        assert_eq!(emu.register(2), 0);
        assert_eq!(emu.index(), 0x400);
    }

    #[test]
    fn bulk_store_past_end_faults_before_writing() {
        let mut emu = emulator_with(&[0x60, 0x07, 0xAF, 0xFE, 0xF2, 0x55]);
        run(&mut emu, 2);
        assert_eq!(
            emu.step(),
            Err(RuntimeFault::OutOfRangeMemoryAccess(0x1000))
        );
        assert_eq!(emu.memory()[0xFFE], 0);
    }

    #[test]
    fn programs_may_overwrite_themselves() {
        // V0 = 0x62, V1 = 0x2A, I = 208, LD [I], V1 -> 208 becomes LD V2, 2A
        let mut emu = emulator_with(&[
            0x60, 0x62, 0x61, 0x2A, 0xA2, 0x08, 0xF1, 0x55, 0x00, 0x00,
        ]);
        run(&mut emu, 5);
        assert_eq!(emu.register(2), 0x2A);
        assert_eq!(emu.unrecognized_count(), 0);
    }

    #[test]
    fn unrecognized_opcode_is_skipped() {
        let mut emu = emulator_with(&[0x01, 0x23, 0x80, 0x08, 0x61, 0x01]);
        run(&mut emu, 3);
        assert_eq!(emu.unrecognized_count(), 2);
        assert_eq!(emu.register(1), 1);
        assert_eq!(emu.pc(), 0x206);
    }

    #[test]
    fn running_off_the_end_faults() {
        let mut emu = emulator_with(&[0x1F, 0xFF]);
        emu.step().unwrap();
        assert_eq!(
            emu.step(),
            Err(RuntimeFault::OutOfRangeMemoryAccess(0x1000))
        );
    }
}
