//! Fetch-decode-execute stepping engine.
//!
//! A step either executes one instruction and reports a full trace record,
//! or reports a terminal condition through the outcome's status — it never
//! panics and never returns an error. After a non-terminal step the engine
//! re-zeroes register 0, bumps the step counter, and snapshots the register
//! file into the record.

use crate::decoder::{DecodedInstruction, Decoder};
use crate::encoding::{ImmediateOp, JumpOp, Reg, RegisterOp};
use crate::halt::HaltCause;
use crate::machine::Machine;
use crate::state::REGISTER_COUNT;

/// Direction of a data-memory side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AccessKind {
    /// Memory was read (`lw`).
    Read,
    /// Memory was written (`sw`).
    Write,
}

/// A data-memory side effect observed during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MemoryAccess {
    /// Read or write.
    pub kind: AccessKind,
    /// Effective byte address (`rs + sign-extended immediate`, mod 2^32).
    pub address: u32,
    /// The word transferred.
    pub value: u32,
}

/// Full trace record of one successfully executed instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StepRecord {
    /// Program counter before the step.
    pub pc: u32,
    /// Raw fetched instruction word.
    pub word: u32,
    /// Its decoding.
    pub instruction: DecodedInstruction,
    /// Step counter value after this step (1-based).
    pub step: u64,
    /// Memory side effect, when the instruction touched data memory.
    pub access: Option<MemoryAccess>,
    /// Value copy of the register file after this step.
    pub registers: [u32; REGISTER_COUNT],
}

/// Outcome of one step attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StepOutcome {
    /// One instruction executed.
    Executed(StepRecord),
    /// The machine was already halted; nothing happened.
    Halted,
    /// The program counter left instruction memory; the machine halts.
    /// This is the designed termination for falling off the program's end.
    PcOutOfRange {
        /// The offending program counter.
        pc: u32,
    },
    /// A jump-format word carried an unassigned operation; the machine halts.
    UnknownJump {
        /// The decoded instruction that could not be dispatched.
        instruction: DecodedInstruction,
    },
}

impl StepOutcome {
    /// Returns the trace record when an instruction executed.
    #[must_use]
    pub const fn record(&self) -> Option<&StepRecord> {
        match self {
            Self::Executed(record) => Some(record),
            Self::Halted | Self::PcOutOfRange { .. } | Self::UnknownJump { .. } => None,
        }
    }

    /// Returns `true` for outcomes that leave the machine halted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Executed(_))
    }
}

/// Computes a taken-branch target: `pc + 4 + (imm × 4)`.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_lossless)]
pub const fn branch_target(pc: u32, imm: i16) -> u32 {
    pc.wrapping_add(4).wrapping_add(((imm as i32) << 2) as u32)
}

/// Computes a jump target: the low 28 bits of `pc` are replaced by the
/// 26-bit address field shifted left two.
#[must_use]
pub const fn jump_target(pc: u32, address: u32) -> u32 {
    (pc & 0xF000_0000) | ((address << 2) & 0x0FFF_FFFF)
}

#[allow(clippy::cast_sign_loss)]
const fn extend(imm: i16) -> u32 {
    imm as u32
}

/// Effect of dispatching one decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// The instruction's effect was applied; carries any memory side effect.
    Applied(Option<MemoryAccess>),
    /// Unassigned jump-format operation; fatal for the machine.
    UnknownJump(u8),
}

/// Applies one decoded instruction's effect to registers, memory, and pc.
///
/// This is the dispatch half of a step: it does not touch the halted flag,
/// the register-zero interlock, or the step counter — [`step`] commits those
/// after a successful dispatch.
pub fn execute_instruction(
    machine: &mut Machine,
    instruction: &DecodedInstruction,
    pc: u32,
) -> ExecuteOutcome {
    match *instruction {
        DecodedInstruction::Register { rs, rt, rd, op, .. } => {
            execute_register(machine, op, rs, rt, rd);
            machine.set_pc(pc.wrapping_add(4));
            ExecuteOutcome::Applied(None)
        }
        DecodedInstruction::Immediate { rs, rt, imm, op } => {
            ExecuteOutcome::Applied(execute_immediate(machine, op, rs, rt, imm, pc))
        }
        DecodedInstruction::Jump { address, op } => match op {
            JumpOp::J => {
                machine.set_pc(jump_target(pc, address));
                ExecuteOutcome::Applied(None)
            }
            JumpOp::Unknown(code) => ExecuteOutcome::UnknownJump(code),
        },
    }
}

/// Executes one instruction against the machine.
///
/// Terminal conditions (already halted, program counter out of range,
/// unassigned jump operation) are reported through the outcome; they never
/// panic and never partially mutate the machine.
pub fn step(machine: &mut Machine) -> StepOutcome {
    if machine.is_halted() {
        return StepOutcome::Halted;
    }

    let pc = machine.pc();
    let Some(word) = machine.fetch(pc) else {
        machine.halt(HaltCause::PcOutOfRange(pc));
        return StepOutcome::PcOutOfRange { pc };
    };

    let instruction = Decoder::decode(word);
    match execute_instruction(machine, &instruction, pc) {
        ExecuteOutcome::Applied(access) => {
            machine.commit_step();
            StepOutcome::Executed(StepRecord {
                pc,
                word,
                instruction,
                step: machine.step_count(),
                access,
                registers: machine.register_snapshot(),
            })
        }
        ExecuteOutcome::UnknownJump(code) => {
            machine.halt(HaltCause::UnknownJump(code));
            StepOutcome::UnknownJump { instruction }
        }
    }
}

/// Runs at most `budget` steps, collecting every outcome.
///
/// The loop refuses to attempt a step once the halted flag is set, so the
/// step that halts the machine is the last entry of the returned trace; a
/// machine that is already halted yields an empty trace.
pub fn run(machine: &mut Machine, budget: usize) -> Vec<StepOutcome> {
    let mut trace = Vec::new();
    for _ in 0..budget {
        if machine.is_halted() {
            break;
        }
        trace.push(step(machine));
    }
    trace
}

fn execute_register(machine: &mut Machine, op: RegisterOp, rs: Reg, rt: Reg, rd: Reg) {
    let a = machine.register(rs);
    let b = machine.register(rt);
    let value = match op {
        RegisterOp::Add => Some(a.wrapping_add(b)),
        RegisterOp::Sub => Some(a.wrapping_sub(b)),
        RegisterOp::And => Some(a & b),
        RegisterOp::Or => Some(a | b),
        RegisterOp::Slt => Some(u32::from(a < b)),
        // Unassigned function codes have no register effect.
        RegisterOp::Unknown(_) => None,
    };
    if let Some(value) = value {
        machine.set_register(rd, value);
    }
}

fn execute_immediate(
    machine: &mut Machine,
    op: ImmediateOp,
    rs: Reg,
    rt: Reg,
    imm: i16,
    pc: u32,
) -> Option<MemoryAccess> {
    let sequential = pc.wrapping_add(4);
    match op {
        ImmediateOp::Addi => {
            let value = machine.register(rs).wrapping_add(extend(imm));
            machine.set_register(rt, value);
            machine.set_pc(sequential);
            None
        }
        ImmediateOp::Lw => {
            let address = machine.register(rs).wrapping_add(extend(imm));
            let value = machine.memory_word(address);
            machine.set_register(rt, value);
            machine.set_pc(sequential);
            Some(MemoryAccess {
                kind: AccessKind::Read,
                address,
                value,
            })
        }
        ImmediateOp::Sw => {
            let address = machine.register(rs).wrapping_add(extend(imm));
            let value = machine.register(rt);
            machine.write_memory(address, value);
            machine.set_pc(sequential);
            Some(MemoryAccess {
                kind: AccessKind::Write,
                address,
                value,
            })
        }
        ImmediateOp::Beq => {
            let taken = machine.register(rs) == machine.register(rt);
            machine.set_pc(if taken {
                branch_target(pc, imm)
            } else {
                sequential
            });
            None
        }
        ImmediateOp::Bne => {
            let taken = machine.register(rs) != machine.register(rt);
            machine.set_pc(if taken {
                branch_target(pc, imm)
            } else {
                sequential
            });
            None
        }
        // Unassigned immediate opcodes are no-ops that still advance.
        ImmediateOp::Unknown(_) => {
            machine.set_pc(sequential);
            None
        }
    }
}
