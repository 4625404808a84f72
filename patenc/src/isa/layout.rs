use std::fmt;

/// A slot in the 32-bit instruction word, `width` bits wide starting at bit `shift`.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Field {
    pub shift: u32,
    pub width: u32,
}

impl Field {
    pub const fn new(shift: u32, width: u32) -> Self {
        Self { shift, width }
    }
    /// Largest value the field can hold
    pub const fn max(self) -> u32 {
        (1 << self.width) - 1
    }
    /// The field's bits, in position
    pub const fn mask(self) -> u32 {
        self.max() << self.shift
    }
    /// Shifts `value` into position. `value` must already fit the field.
    pub const fn place(self, value: u32) -> u32 {
        debug_assert!(value <= self.max());
        value << self.shift
    }
    pub const fn extract(self, word: u32) -> u32 {
        (word & self.mask()) >> self.shift
    }
}

/// Predicate, bits 31..27
pub const PRED: Field = Field::new(27, 5);
/// Opcode, bits 26..22
pub const OPCODE: Field = Field::new(22, 5);
/// Destination register, bits 21..17
pub const RD: Field = Field::new(17, 5);
/// First source register, bits 16..12
pub const RS1: Field = Field::new(12, 5);
/// Second source register, bits 11..7
pub const RS2: Field = Field::new(7, 5);
/// Operation-specific bits, 6..4
pub const OPC: Field = Field::new(4, 3);
/// Function code, bits 3..0
pub const FUNC: Field = Field::new(0, 4);

/// A packed instruction.
///
/// Displays as `0x` followed by exactly eight uppercase hex digits.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub struct InstructionWord(u32);

impl InstructionWord {
    pub const fn pred(self) -> u32 {
        PRED.extract(self.0)
    }
    pub const fn opcode(self) -> u32 {
        OPCODE.extract(self.0)
    }
    pub const fn rd(self) -> u32 {
        RD.extract(self.0)
    }
    pub const fn rs1(self) -> u32 {
        RS1.extract(self.0)
    }
    pub const fn rs2(self) -> u32 {
        RS2.extract(self.0)
    }
    pub const fn opc(self) -> u32 {
        OPC.extract(self.0)
    }
    pub const fn func(self) -> u32 {
        FUNC.extract(self.0)
    }
}

impl From<u32> for InstructionWord {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<InstructionWord> for u32 {
    fn from(v: InstructionWord) -> u32 {
        v.0
    }
}

impl fmt::Display for InstructionWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}
