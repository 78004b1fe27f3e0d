use log::info;

use crate::{
    errors::{LoadError, RuntimeFault},
    registers::{IndexRegister, ProgramCounter},
};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; 5 * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const FONT_OFFSET: TypeAddr = 0x50;
pub const FONT_GLYPH_SIZE: TypeAddr = 5;
pub const STACK_SIZE: usize = 16;

pub const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Address of the glyph for the low nibble of `digit`.
pub fn glyph_addr(digit: u8) -> TypeAddr {
    FONT_OFFSET + (digit & 0xF) as TypeAddr * FONT_GLYPH_SIZE
}

#[derive(Debug, Clone)]
pub struct Memory {
    // 4k bytes
    // font data stored from 050 -> 09F (000 -> 04F is empty by convention)
    bytes: [u8; MEMORY_SIZE],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
    program_offset: TypeAddr,
    wrap_addresses: bool,
}

impl Memory {
    pub fn new(program_offset: TypeAddr, wrap_addresses: bool) -> Self {
        let mut mem = Self {
            bytes: [0; MEMORY_SIZE],
            pc: ProgramCounter(program_offset),
            index: IndexRegister(0x0),
            stack: Stack::new(),
            program_offset,
            wrap_addresses,
        };
        let start_index = FONT_OFFSET as usize;
        mem.bytes[start_index..start_index + DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
        mem
    }

    fn resolve(&self, addr: u32) -> Result<usize, RuntimeFault> {
        if self.wrap_addresses {
            Ok((addr & 0xFFF) as usize)
        } else if (addr as usize) < MEMORY_SIZE {
            Ok(addr as usize)
        } else {
            Err(RuntimeFault::OutOfRangeMemoryAccess(addr))
        }
    }

    /// Fails if any address in `start..start + len` is out of range.
    pub fn check_span(&self, start: u32, len: u32) -> Result<(), RuntimeFault> {
        if len == 0 {
            return Ok(());
        }
        self.resolve(start)?;
        self.resolve(start + len - 1)?;
        Ok(())
    }

    pub fn set(&mut self, addr: u32, val: u8) -> Result<(), RuntimeFault> {
        let addr = self.resolve(addr)?;
        self.bytes[addr] = val;
        Ok(())
    }

    pub fn get(&self, addr: u32) -> Result<u8, RuntimeFault> {
        Ok(self.bytes[self.resolve(addr)?])
    }

    pub fn increment_pc(&mut self) {
        self.pc.increment();
    }

    pub fn decrement_pc(&mut self) {
        self.pc.decrement();
    }

    /// Reads the big-endian word at PC and moves PC past it.
    pub fn next_instruction(&mut self) -> Result<u16, RuntimeFault> {
        let pc = self.pc.0 as u32;
        let (l, r) = (self.get(pc)?, self.get(pc + 1)?);
        self.increment_pc();
        Ok(((l as u16) << 8) | r as u16)
    }

    pub fn set_pc(&mut self, addr: TypeAddr) {
        self.pc.set_addr(addr);
    }

    pub fn set_index(&mut self, addr: TypeAddr) {
        self.index.set_addr(addr);
    }

    pub fn program_offset(&self) -> TypeAddr {
        self.program_offset
    }

    pub fn program_capacity(&self) -> usize {
        MEMORY_SIZE.saturating_sub(self.program_offset as usize)
    }

    // copies the image verbatim at the program offset, nothing else changes
    pub fn load_program(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        let max = self.program_capacity();
        if bytes.len() > max {
            return Err(LoadError::OverSizedImage {
                size: bytes.len(),
                max,
            });
        }
        let start_index = self.program_offset as usize;
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        info!(
            "loaded {} byte program at {:#05X}",
            bytes.len(),
            self.program_offset
        );
        Ok(())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Debug, Clone)]
pub struct Stack {
    addresses: [TypeAddr; STACK_SIZE],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_SIZE],
            sp: 0,
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<(), RuntimeFault> {
        if self.sp == STACK_SIZE {
            return Err(RuntimeFault::StackOverflow);
        }
        self.addresses[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr, RuntimeFault> {
        if self.sp == 0 {
            return Err(RuntimeFault::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.addresses[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
