//! Decode and execution core for a MIPS-subset instructional simulator.
//!
//! The crate decodes raw 32-bit instruction words into a three-format sum
//! type and executes them against an owned machine model (32 registers,
//! sparse data memory, program counter). Hosts drive it through load, step,
//! bounded run, reset, and snapshot inspection; every failure mode is
//! reported through returned values, never through panics or errors.

/// Program-text token parsing.
pub mod parse;
pub use parse::parse_word;

/// Instruction-word field extraction and fixed mnemonic tables.
pub mod encoding;
pub use encoding::{
    destination_register, function_code, immediate_field, jump_address, primary_opcode,
    shift_amount, sign_extend_immediate, source_register, target_register, ImmediateOp, JumpOp,
    Reg, RegisterOp, IMMEDIATE_OPCODE_TABLE, JUMP_OPCODE_TABLE, OPCODE_REGISTER,
    REGISTER_FUNCT_TABLE,
};

/// Total instruction decoding and the static program listing pass.
pub mod decoder;
pub use decoder::{decode_program, DecodedInstruction, Decoder, ListingEntry};

/// Display formatting for decoded instructions.
pub mod disasm;
pub use disasm::format_instruction;

/// Terminal halt-cause taxonomy.
pub mod halt;
pub use halt::HaltCause;

/// Sparse word-granular data memory.
pub mod memory;
pub use memory::SparseMemory;

/// Architectural machine-state primitives.
pub mod state;
pub use state::{RegisterFile, RunState, REGISTER_COUNT};

/// Machine aggregate and load/reset lifecycle.
pub mod machine;
pub use machine::{Machine, DEFAULT_BASE_PC};

/// Fetch-decode-execute stepping engine.
pub mod execute;
pub use execute::{
    branch_target, execute_instruction, jump_target, run, step, AccessKind, ExecuteOutcome,
    MemoryAccess, StepOutcome, StepRecord,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
