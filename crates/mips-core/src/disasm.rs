//! Display formatting for decoded instructions.
//!
//! The rendered string is a pure derivation of the decoded fields and is
//! reproducible identically for every variant: register operands carry a `$`
//! prefix, word/address fields render as hex, immediates and shift amounts
//! as decimal.

use std::fmt;

use crate::decoder::DecodedInstruction;
use crate::encoding::{ImmediateOp, JumpOp, Reg, RegisterOp};

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.index())
    }
}

impl fmt::Display for RegisterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Sub => f.write_str("sub"),
            Self::And => f.write_str("and"),
            Self::Or => f.write_str("or"),
            Self::Slt => f.write_str("slt"),
            Self::Unknown(code) => write!(f, "unknown_r(0x{code:02x})"),
        }
    }
}

impl fmt::Display for ImmediateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addi => f.write_str("addi"),
            Self::Lw => f.write_str("lw"),
            Self::Sw => f.write_str("sw"),
            Self::Beq => f.write_str("beq"),
            Self::Bne => f.write_str("bne"),
            Self::Unknown(code) => write!(f, "unknown_i(0x{code:02x})"),
        }
    }
}

impl fmt::Display for JumpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::J => f.write_str("j"),
            Self::Unknown(code) => write!(f, "unknown_j(0x{code:02x})"),
        }
    }
}

/// Renders a decoded instruction as its canonical display string.
#[must_use]
pub fn format_instruction(instruction: &DecodedInstruction) -> String {
    match instruction {
        DecodedInstruction::Register {
            rs,
            rt,
            rd,
            shamt,
            funct,
            op,
        } => {
            format!("R-type: {op} rs={rs} rt={rt} rd={rd} shamt={shamt} funct=0x{funct:02x}")
        }
        DecodedInstruction::Immediate { rs, rt, imm, op } => {
            format!("I-type: {op} rs={rs} rt={rt} imm={imm}")
        }
        DecodedInstruction::Jump { address, op } => {
            format!("J-type: {op} addr=0x{address:07x}")
        }
    }
}
