//! Deterministic trace fingerprint generator used by CI cross-host comparison.

use mips_core::{run, AccessKind, Machine, StepOutcome};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

#[allow(clippy::cast_sign_loss, clippy::cast_lossless)]
const fn i_type(opcode: u32, rs: u32, rt: u32, imm: i16) -> u32 {
    (opcode << 26) | (rs << 21) | (rt << 16) | (imm as u16 as u32)
}

const fn r_type(rs: u32, rt: u32, rd: u32, funct: u32) -> u32 {
    (rs << 21) | (rt << 16) | (rd << 11) | funct
}

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

fn fingerprint() -> u64 {
    let program = vec![
        i_type(0x08, 0, 8, 1000),  // addi $8, $0, 1000
        i_type(0x08, 0, 9, -24),   // addi $9, $0, -24
        r_type(8, 9, 10, 0x20),    // add $10, $8, $9
        i_type(0x2B, 0, 10, 256),  // sw $10, 256($0)
        i_type(0x23, 0, 11, 256),  // lw $11, 256($0)
        i_type(0x05, 10, 11, 2),   // bne $10, $11, +2 (not taken)
        i_type(0x04, 10, 11, 1),   // beq $10, $11, +1 (skips one word)
        r_type(8, 8, 12, 0x22),    // skipped
        r_type(8, 9, 13, 0x2A),    // slt $13, $8, $9
    ];
    let mut machine = Machine::new(program);

    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for outcome in run(&mut machine, 64) {
        match outcome {
            StepOutcome::Executed(record) => {
                hash_bytes(&mut hash, &[0x10]);
                hash_bytes(&mut hash, &record.pc.to_le_bytes());
                hash_bytes(&mut hash, &record.word.to_le_bytes());
                hash_bytes(&mut hash, &record.step.to_le_bytes());
                if let Some(access) = record.access {
                    let kind = match access.kind {
                        AccessKind::Read => 0x01,
                        AccessKind::Write => 0x02,
                    };
                    hash_bytes(&mut hash, &[kind]);
                    hash_bytes(&mut hash, &access.address.to_le_bytes());
                    hash_bytes(&mut hash, &access.value.to_le_bytes());
                }
                for value in record.registers {
                    hash_bytes(&mut hash, &value.to_le_bytes());
                }
            }
            StepOutcome::Halted => hash_bytes(&mut hash, &[0x11]),
            StepOutcome::PcOutOfRange { pc } => {
                hash_bytes(&mut hash, &[0x12]);
                hash_bytes(&mut hash, &pc.to_le_bytes());
            }
            StepOutcome::UnknownJump { instruction } => {
                hash_bytes(&mut hash, &[0x13]);
                hash_bytes(&mut hash, &instruction.encode().to_le_bytes());
            }
        }
    }

    hash_bytes(&mut hash, &machine.pc().to_le_bytes());
    hash_bytes(&mut hash, &machine.step_count().to_le_bytes());
    hash
}

fn main() {
    println!("trace fingerprint: {:016x}", fingerprint());
}
