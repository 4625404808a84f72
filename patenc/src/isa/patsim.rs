use super::layout::{Field, OPCODE, RD, RS1, RS2};
use super::{EncodeInstruction, EncodeOperand, Error, ParseInstruction, ParseOperand};
use crate::lexer;

/// A general purpose register number, 0 through 31
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub struct Register(u8);

impl Register {
    pub const MAX: u8 = 31;

    pub const fn new(n: u8) -> Option<Self> {
        if n <= Self::MAX {
            Some(Self(n))
        } else {
            None
        }
    }
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl ParseOperand for Register {
    fn parse(token: &str, operand: usize) -> Result<Self, Error> {
        let invalid = || Error::InvalidRegister {
            token: token.to_string(),
            operand,
        };
        let n = lexer::number(token).map_err(|e| {
            tracing::debug!(token, %e, "register is not a number");
            invalid()
        })?;
        u8::try_from(n).ok().and_then(Self::new).ok_or_else(invalid)
    }
}

impl EncodeOperand for Register {
    fn encode_into(&self, word: &mut u32, field: Field) {
        *word |= field.place(u32::from(self.get()));
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, EncodeInstruction, ParseInstruction)]
#[encode(opcode_field = OPCODE)]
pub enum Instruction {
    /// Compress rs1 and rs2 into rd
    #[encode(opcode = 0x0c)]
    Compress {
        #[encode(field = RD)]
        rd: Register,
        #[encode(field = RS1)]
        rs1: Register,
        #[encode(field = RS2)]
        rs2: Register,
    },
    /// Decompress rs1 and rs2 into rd
    #[encode(opcode = 0x0d)]
    Decompress {
        #[encode(field = RD)]
        rd: Register,
        #[encode(field = RS1)]
        rs1: Register,
        #[encode(field = RS2)]
        rs2: Register,
    },
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Instruction, Instruction::*, Register};
    use crate::isa::{EncodeInstruction, Error, ParseInstruction, ParseOperand};
    use pretty_assertions::assert_eq;

    fn r(n: u8) -> Register {
        Register::new(n).unwrap()
    }

    fn all_instructions() -> impl Iterator<Item = Instruction> {
        (0..=Register::MAX).flat_map(|rd| {
            (0..=Register::MAX).flat_map(move |rs1| {
                (0..=Register::MAX).flat_map(move |rs2| {
                    let (rd, rs1, rs2) = (r(rd), r(rs1), r(rs2));
                    [Compress { rd, rs1, rs2 }, Decompress { rd, rs1, rs2 }]
                })
            })
        })
    }

    #[test]
    fn register_bounds() {
        assert_eq!(Register::new(0).map(Register::get), Some(0));
        assert_eq!(Register::new(31).map(Register::get), Some(31));
        assert_eq!(Register::new(32), None);
    }

    #[test]
    fn register_parse() {
        assert_eq!(Register::parse("17", 0), Ok(r(17)));
        assert_eq!(Register::parse("+3", 1), Ok(r(3)));
        for tok in ["32", "-1", "abc", "", "256", "-256", "99999999999999999999", "1_0", "\u{a0}5"] {
            assert_eq!(
                Register::parse(tok, 2),
                Err(Error::InvalidRegister { token: tok.to_string(), operand: 2 }),
            );
        }
    }

    #[test]
    fn encode_compress_zero() {
        let w = Compress { rd: r(0), rs1: r(0), rs2: r(0) }.encode();
        assert_eq!(u32::from(w), 0x0300_0000);
    }

    #[test]
    fn encode_decompress_max() {
        let w = Decompress { rd: r(31), rs1: r(31), rs2: r(31) }.encode();
        assert_eq!(u32::from(w), 0x037f_ff80);
    }

    #[test]
    fn encode_mixed() {
        let w = Compress { rd: r(5), rs1: r(6), rs2: r(7) }.encode();
        assert_eq!(w.to_string(), "0x030A6380");
        let w = Decompress { rd: r(8), rs1: r(9), rs2: r(10) }.encode();
        assert_eq!(w.to_string(), "0x03509500");
    }

    #[test]
    fn encode_is_deterministic() {
        let i = Decompress { rd: r(12), rs1: r(1), rs2: r(30) };
        assert_eq!(i.encode(), i.encode());
    }

    #[test]
    fn fields_round_trip() {
        for i in all_instructions() {
            let w = i.encode();
            let (opcode, rd, rs1, rs2) = match i {
                Compress { rd, rs1, rs2 } => (12, rd, rs1, rs2),
                Decompress { rd, rs1, rs2 } => (13, rd, rs1, rs2),
            };
            assert_eq!(w.pred(), 0);
            assert_eq!(w.opcode(), opcode);
            assert_eq!(w.rd(), u32::from(rd.get()));
            assert_eq!(w.rs1(), u32::from(rs1.get()));
            assert_eq!(w.rs2(), u32::from(rs2.get()));
            assert_eq!(w.opc(), 0);
            assert_eq!(w.func(), 0);
        }
    }

    #[test]
    fn encoding_is_injective() {
        let words: HashSet<_> = all_instructions().map(|i| i.encode()).collect();
        assert_eq!(words.len(), 2 * 32 * 32 * 32);
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Instruction::MNEMONICS, &["compress", "decompress"]);
        assert_eq!(Compress { rd: r(0), rs1: r(0), rs2: r(0) }.mnemonic(), "compress");
        assert_eq!(Decompress { rd: r(0), rs1: r(0), rs2: r(0) }.mnemonic(), "decompress");
    }

    #[test]
    fn parse_any_case() {
        for m in ["compress", "COMPRESS", "Compress", "cOmPrEsS"] {
            assert_eq!(
                Instruction::parse(m, &["5", "6", "7"]),
                Ok(Compress { rd: r(5), rs1: r(6), rs2: r(7) }),
            );
        }
        assert_eq!(
            Instruction::parse("DECOMPRESS", &["8", "9", "10"]),
            Ok(Decompress { rd: r(8), rs1: r(9), rs2: r(10) }),
        );
    }

    #[test]
    fn parse_unknown_mnemonic() {
        let err = Instruction::parse("add", &["1", "2", "3"]).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownInstruction {
                mnemonic: "add".to_string(),
                expected: &["compress", "decompress"],
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid instruction type: add. Must be 'compress' or 'decompress'."
        );
        assert_eq!(err.argument(), 0);
    }

    #[test]
    fn parse_checks_mnemonic_before_registers() {
        assert!(matches!(
            Instruction::parse("add", &["99", "99", "99"]),
            Err(Error::UnknownInstruction { .. })
        ));
    }

    #[test]
    fn parse_reports_first_bad_register() {
        let err = Instruction::parse("compress", &["1", "32", "abc"]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidRegister { token: "32".to_string(), operand: 1 }
        );
        assert_eq!(err.argument(), 2);
        assert_eq!(
            err.to_string(),
            "Invalid register number: 32. Must be an integer between 0 and 31."
        );
    }

    #[test]
    fn parse_operand_count() {
        assert_eq!(
            Instruction::parse("decompress", &["1", "2"]),
            Err(Error::OperandCount { mnemonic: "decompress", expected: 3, found: 2 }),
        );
    }
}
