use thiserror::Error;

pub mod layout;
mod patsim;

pub use layout::{Field, InstructionWord};
pub use patsim::{Instruction, Register};

/// Reasons an instruction could not be built from its textual form
#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum Error {
    #[error("Invalid instruction type: {mnemonic}. Must be {}.", quoted_list(.expected))]
    UnknownInstruction {
        mnemonic: String,
        expected: &'static [&'static str],
    },
    #[error("Invalid register number: {token}. Must be an integer between 0 and {}.", Register::MAX)]
    InvalidRegister {
        token: String,
        /// Position among the operands, rd is 0
        operand: usize,
    },
    #[error("{mnemonic} takes {expected} operands, found {found}")]
    OperandCount {
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },
}

impl Error {
    /// Index of the blamed word on the command line, mnemonic first
    pub fn argument(&self) -> usize {
        match self {
            Self::UnknownInstruction { .. } | Self::OperandCount { .. } => 0,
            Self::InvalidRegister { operand, .. } => operand + 1,
        }
    }
    /// Short explanation shown under the blamed argument
    pub fn hint(&self) -> String {
        match self {
            Self::UnknownInstruction { expected, .. } => {
                format!("expected {}", quoted_list(expected))
            }
            Self::InvalidRegister { .. } => {
                format!("not an integer between 0 and {}", Register::MAX)
            }
            Self::OperandCount { expected, .. } => format!("takes {expected} registers"),
        }
    }
}

/// `'a'`, `'a' or 'b'`, `'a', 'b' or 'c'`
fn quoted_list(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|i| format!("'{i}'")).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
    }
}

/// Parses one operand token. `operand` is the token's position, used for diagnostics.
pub trait ParseOperand: Sized {
    fn parse(token: &str, operand: usize) -> Result<Self, Error>;
}

/// Packs an operand into its slot of the instruction word.
///
/// Implementors guarantee their value fits `field`, so packing never spills
/// into a neighbouring field.
pub trait EncodeOperand {
    fn encode_into(&self, word: &mut u32, field: Field);
}

use patenc_derive::ParseInstruction;
/// Common trait for parsing instructions from a mnemonic and its operand tokens.
///
/// Derive macro is available for instructions that are represented as enums with named fields.
/// Every field type must implement [`ParseOperand`]; fields are parsed in declaration order.
/// The mnemonic is the lowercased variant name and is matched case-insensitively.
pub trait ParseInstruction: Sized {
    /// Every mnemonic, in declaration order
    const MNEMONICS: &'static [&'static str];

    fn parse(mnemonic: &str, operands: &[&str]) -> Result<Self, Error>;
    /// Lowercase mnemonic of self
    fn mnemonic(&self) -> &'static str;
}

use patenc_derive::EncodeInstruction;
/// Common trait for encoding instructions.
///
/// Derive macro is available for instructions that are represented as enums.
///
/// Type attributes:
/// #[encode(opcode_field = expr)]: Required, the [`Field`] the variant opcode is packed into
///
/// Variant attributes:
/// #[encode(opcode = expr)]: Required, the opcode of this variant. Checked against the
/// opcode field width at compile time
///
/// Field attributes:
/// #[encode(field = expr)]: Required, the [`Field`] the operand is packed into
///
/// Bits not covered by any field are left zero.
pub trait EncodeInstruction {
    fn encode(&self) -> InstructionWord;
}
