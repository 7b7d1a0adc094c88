//! Instruction decoder for the simulated MIPS subset.
//!
//! Decoding is total: every 32-bit word classifies into exactly one of the
//! three instruction formats, with unassigned operation codes carried as
//! `Unknown` mnemonics instead of errors.

use crate::encoding::{
    destination_register, function_code, immediate_field, jump_address, primary_opcode,
    shift_amount, sign_extend_immediate, source_register, target_register, ImmediateOp, JumpOp,
    Reg, RegisterOp, OPCODE_REGISTER,
};

/// A decoded instruction, tagged by format.
///
/// The executor matches this exhaustively; adding a format is a compile-time
/// checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DecodedInstruction {
    /// Register format (opcode 0), dispatched on the function code.
    Register {
        /// Source register.
        rs: Reg,
        /// Target register.
        rt: Reg,
        /// Destination register.
        rd: Reg,
        /// Shift amount field.
        shamt: u8,
        /// Raw function code.
        funct: u8,
        /// Resolved operation.
        op: RegisterOp,
    },
    /// Immediate format with a sign-extended 16-bit operand.
    Immediate {
        /// Source register.
        rs: Reg,
        /// Target register.
        rt: Reg,
        /// Sign-extended immediate.
        imm: i16,
        /// Resolved operation.
        op: ImmediateOp,
    },
    /// Jump format with a 26-bit address field.
    Jump {
        /// Raw 26-bit address field.
        address: u32,
        /// Resolved operation.
        op: JumpOp,
    },
}

impl DecodedInstruction {
    /// Re-encodes this instruction back into a raw 32-bit word.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn encode(self) -> u32 {
        match self {
            Self::Register {
                rs,
                rt,
                rd,
                shamt,
                funct,
                ..
            } => {
                (u32::from(OPCODE_REGISTER) << 26)
                    | (u32::from(rs.bits()) << 21)
                    | (u32::from(rt.bits()) << 16)
                    | (u32::from(rd.bits()) << 11)
                    | (u32::from(shamt) << 6)
                    | u32::from(funct)
            }
            Self::Immediate { rs, rt, imm, op } => {
                (u32::from(op.code()) << 26)
                    | (u32::from(rs.bits()) << 21)
                    | (u32::from(rt.bits()) << 16)
                    | u32::from(imm as u16)
            }
            Self::Jump { address, op } => {
                (u32::from(op.code()) << 26) | (address & 0x03FF_FFFF)
            }
        }
    }
}

/// Instruction decoder over raw 32-bit words.
pub struct Decoder;

impl Decoder {
    /// Decodes a 32-bit instruction word.
    ///
    /// Classification order: opcode 0 selects the register format; an opcode
    /// in the fixed jump set selects the jump format; everything else is the
    /// immediate format. Never fails.
    #[must_use]
    pub fn decode(word: u32) -> DecodedInstruction {
        let opcode = primary_opcode(word);

        if opcode == OPCODE_REGISTER {
            let funct = function_code(word);
            return DecodedInstruction::Register {
                rs: source_register(word),
                rt: target_register(word),
                rd: destination_register(word),
                shamt: shift_amount(word),
                funct,
                op: RegisterOp::classify(funct),
            };
        }

        if let Some(op) = JumpOp::classify(opcode) {
            return DecodedInstruction::Jump {
                address: jump_address(word),
                op,
            };
        }

        DecodedInstruction::Immediate {
            rs: source_register(word),
            rt: target_register(word),
            imm: sign_extend_immediate(immediate_field(word)),
            op: ImmediateOp::classify(opcode),
        }
    }
}

/// One row of a static program decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ListingEntry {
    /// Program counter this word occupies (`base_pc + 4 * index`).
    pub pc: u32,
    /// The raw instruction word.
    pub word: u32,
    /// Its decoding.
    pub instruction: DecodedInstruction,
}

/// Decodes a whole word sequence into a listing paired with PC values.
///
/// This is a static pass over the words; it needs no machine instance and
/// performs no execution.
#[must_use]
pub fn decode_program(words: &[u32], base_pc: u32) -> Vec<ListingEntry> {
    let mut pc = base_pc;
    words
        .iter()
        .map(|&word| {
            let entry = ListingEntry {
                pc,
                word,
                instruction: Decoder::decode(word),
            };
            pc = pc.wrapping_add(4);
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_program, DecodedInstruction, Decoder};
    use crate::encoding::{ImmediateOp, JumpOp, Reg, RegisterOp};

    fn reg(index: u8) -> Reg {
        Reg::from_u5(index).expect("test register index in range")
    }

    #[test]
    fn register_format_recovers_all_fields() {
        // add $4, $9, $10
        let decoded = Decoder::decode(0x012A_2020);
        assert_eq!(
            decoded,
            DecodedInstruction::Register {
                rs: reg(9),
                rt: reg(10),
                rd: reg(4),
                shamt: 0,
                funct: 0x20,
                op: RegisterOp::Add,
            }
        );
    }

    #[test]
    fn register_format_with_unassigned_funct_decodes_as_unknown() {
        let decoded = Decoder::decode(0x0000_003F);
        let DecodedInstruction::Register { funct, op, .. } = decoded else {
            panic!("opcode 0 must decode as register format");
        };
        assert_eq!(funct, 0x3F);
        assert_eq!(op, RegisterOp::Unknown(0x3F));
    }

    #[test]
    fn immediate_format_sign_extends() {
        // addi $9, $8, -4
        let word = (0x08 << 26) | (8 << 21) | (9 << 16) | 0xFFFC;
        let decoded = Decoder::decode(word);
        assert_eq!(
            decoded,
            DecodedInstruction::Immediate {
                rs: reg(8),
                rt: reg(9),
                imm: -4,
                op: ImmediateOp::Addi,
            }
        );
    }

    #[test]
    fn unassigned_opcode_decodes_as_unknown_immediate() {
        let word = 0x3F << 26;
        let DecodedInstruction::Immediate { op, .. } = Decoder::decode(word) else {
            panic!("unassigned opcode must fall through to immediate format");
        };
        assert_eq!(op, ImmediateOp::Unknown(0x3F));
    }

    #[test]
    fn jump_format_extracts_address_field() {
        let word = (0x02 << 26) | 0x10;
        assert_eq!(
            Decoder::decode(word),
            DecodedInstruction::Jump {
                address: 0x10,
                op: JumpOp::J,
            }
        );
    }

    #[test]
    fn encode_inverts_decode() {
        for word in [
            0x012A_2020, // add
            0x012A_2022, // sub
            0x012A_2024, // and
            0x2128_FFFC, // addi negative
            0x8D09_0004, // lw
            0xAD09_0004, // sw
            0x1109_0002, // beq
            0x1509_FFFE, // bne
            0x0800_0010, // j
            0x0000_003F, // unknown funct
            0xFFFF_FFFF, // unknown opcode, imm -1
        ] {
            assert_eq!(Decoder::decode(word).encode(), word);
        }
    }

    #[test]
    fn listing_pairs_each_word_with_its_pc() {
        let words = [0x012A_2020, 0x0800_0010, 0x2128_FFFC];
        let listing = decode_program(&words, 0x0040_0000);
        assert_eq!(listing.len(), 3);
        assert_eq!(listing[0].pc, 0x0040_0000);
        assert_eq!(listing[1].pc, 0x0040_0004);
        assert_eq!(listing[2].pc, 0x0040_0008);
        for (entry, word) in listing.iter().zip(words) {
            assert_eq!(entry.word, word);
            assert_eq!(entry.instruction, Decoder::decode(word));
        }
    }

    #[test]
    fn listing_of_empty_program_is_empty() {
        assert!(decode_program(&[], 0x0040_0000).is_empty());
    }
}
