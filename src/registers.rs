use crate::memory::TypeAddr;

pub const FLAG: u8 = 0xF;

// V0..VF, VF doubles as carry/borrow/collision flag
#[derive(Debug, Clone, Default)]
pub struct Registers {
    registers: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { registers: [0; 16] }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn set_flag(&mut self, on: bool) {
        self.set_register(FLAG, on as u8);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn decrement(&mut self) {
        self.0 = self.0.wrapping_sub(2);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

// Only the low 12 bits address memory, but arithmetic may push it up to 0xFFFF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    /// Returns whether the untruncated sum left the 12-bit address space.
    pub fn add(&mut self, value: u8) -> bool {
        let sum = self.0 as u32 + value as u32;
        self.0 = self.0.wrapping_add(value as TypeAddr);
        sum > 0xFFF
    }
}
