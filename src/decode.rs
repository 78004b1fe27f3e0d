use crate::memory::TypeAddr;

/// Field view over a raw big-endian instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    // n is starting digit (1 = most significant), m is length
    fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask = ((1u32 << (m * 4)) - 1) as u16;
        (self.code >> shift_places) & mask
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// bits 15-12
    pub fn prefix(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    /// bits 11-0
    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }

    /// bits 11-8
    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    /// bits 7-4
    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    /// bits 7-0
    pub fn kk(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    /// bits 3-0
    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }
}

impl PartialEq<u16> for RawInstruction {
    fn eq(&self, ins: &u16) -> bool {
        ins.eq(&self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    // set register VX to value NN
    SetRegister(u8, u8),
    // 7XNN
    // add value NN to VX, no carry
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    // 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8, u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8, u8),

    // ANNN
    // set index register I to address NNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I at (VX, VY)
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),

    // anything else, including 0NNN machine routines
    Unrecognized(u16),
}

impl OpCodes {
    pub fn decode_raw(ins: u16) -> Self {
        let raw = RawInstruction::new(ins);
        let (x, y) = (raw.x(), raw.y());

        match raw.prefix() {
            0x0 => match ins {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                _ => Self::Unrecognized(ins),
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::PushSubroutine(raw.nnn()),
            0x3 => Self::SkipEqualConstant(x, raw.kk()),
            0x4 => Self::SkipNotEqualConstant(x, raw.kk()),
            0x5 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, raw.kk()),
            0x7 => Self::AddToRegister(x, raw.kk()),
            0x8 => match raw.n() {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => Self::Unrecognized(ins),
            },
            0x9 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(raw.nnn()),
            0xC => Self::Random(x, raw.kk()),
            0xD => Self::Display(x, y, raw.n()),
            0xE => match raw.kk() {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => Self::Unrecognized(ins),
            },
            0xF => match raw.kk() {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => Self::Unrecognized(ins),
            },
            _ => Self::Unrecognized(ins),
        }
    }
}

#[test]
fn test_bit_manip() {
    let raw = RawInstruction::new(0x4CEE);
    assert_eq!(raw.prefix(), 0x4);
    assert_eq!(raw.x(), 0xC);
    assert_eq!(raw.y(), 0xE);
    assert_eq!(raw.n(), 0xE);
    assert_eq!(raw.kk(), 0xEE);
    assert_eq!(raw.nnn(), 0xCEE);
    assert!(raw == 0x4CEE);
}

#[test]
fn test_decode_families() {
    assert_eq!(OpCodes::decode_raw(0x00E0), OpCodes::ClearScreen);
    assert_eq!(OpCodes::decode_raw(0x00EE), OpCodes::PopSubroutine);
    assert_eq!(OpCodes::decode_raw(0x1ABC), OpCodes::Jump(0xABC));
    assert_eq!(OpCodes::decode_raw(0x2123), OpCodes::PushSubroutine(0x123));
    assert_eq!(OpCodes::decode_raw(0x8AB4), OpCodes::Add(0xA, 0xB));
    assert_eq!(OpCodes::decode_raw(0x8ABE), OpCodes::LeftShift(0xA, 0xB));
    assert_eq!(OpCodes::decode_raw(0xD125), OpCodes::Display(1, 2, 5));
    assert_eq!(OpCodes::decode_raw(0xE39E), OpCodes::SkipIfPressed(3));
    assert_eq!(OpCodes::decode_raw(0xF40A), OpCodes::GetKey(4));
    assert_eq!(OpCodes::decode_raw(0xF565), OpCodes::LoadRegisterFromMemory(5));
}

#[test]
fn test_decode_unrecognized() {
    for ins in [0x0123, 0x8128, 0xE1FF, 0xF1FF] {
        assert_eq!(OpCodes::decode_raw(ins), OpCodes::Unrecognized(ins));
    }
}
