//! The owned machine aggregate: load/reset lifecycle and inspection.

use crate::encoding::Reg;
use crate::halt::HaltCause;
use crate::memory::SparseMemory;
use crate::state::{RegisterFile, RunState, REGISTER_COUNT};

/// Conventional program-load address used when the caller supplies none.
pub const DEFAULT_BASE_PC: u32 = 0x0040_0000;

/// The simulated machine.
///
/// Created once per load from a word sequence and a base address, and
/// discarded wholesale on reset; the instruction memory is fixed for the
/// machine's lifetime. All inspection accessors return point-in-time value
/// snapshots, never live views into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Machine {
    regs: RegisterFile,
    memory: SparseMemory,
    pc: u32,
    base_pc: u32,
    program: Vec<u32>,
    step_count: u64,
    run_state: RunState,
}

impl Machine {
    /// Loads a program at [`DEFAULT_BASE_PC`].
    #[must_use]
    pub fn new(program: Vec<u32>) -> Self {
        Self::with_base_pc(program, DEFAULT_BASE_PC)
    }

    /// Loads a program at an explicit base address.
    #[must_use]
    pub fn with_base_pc(program: Vec<u32>, base_pc: u32) -> Self {
        Self {
            regs: RegisterFile::default(),
            memory: SparseMemory::new(),
            pc: base_pc,
            base_pc,
            program,
            step_count: 0,
            run_state: RunState::Running,
        }
    }

    /// Re-loads the same word sequence at the same base address, discarding
    /// registers, memory, program counter, step count, and halt state.
    pub fn reset(&mut self) {
        self.regs = RegisterFile::default();
        self.memory = SparseMemory::new();
        self.pc = self.base_pc;
        self.step_count = 0;
        self.run_state = RunState::Running;
    }

    /// Reads one register.
    #[must_use]
    pub const fn register(&self, reg: Reg) -> u32 {
        self.regs.read(reg)
    }

    /// Writes one register, e.g. to seed operands before execution.
    ///
    /// A write to register 0 sticks only until the next executed step; the
    /// engine re-zeroes slot 0 at every step commit.
    pub const fn set_register(&mut self, reg: Reg, value: u32) {
        self.regs.write(reg, value);
    }

    /// Returns a value copy of the full register file.
    #[must_use]
    pub const fn register_snapshot(&self) -> [u32; REGISTER_COUNT] {
        self.regs.snapshot()
    }

    /// Reads the data-memory word at `address` (zero if never written).
    #[must_use]
    pub fn memory_word(&self, address: u32) -> u32 {
        self.memory.read_word(address)
    }

    /// Returns the non-zero data-memory contents, ordered by address.
    #[must_use]
    pub fn nonzero_memory(&self) -> Vec<(u32, u32)> {
        self.memory.nonzero_words()
    }

    /// Current program counter.
    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Base address of the first loaded word.
    #[must_use]
    pub const fn base_pc(&self) -> u32 {
        self.base_pc
    }

    /// Count of successfully executed instructions.
    #[must_use]
    pub const fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Returns the latched halt cause, if any.
    #[must_use]
    pub const fn halt_cause(&self) -> Option<HaltCause> {
        self.run_state.halt_cause()
    }

    /// Returns `true` once the machine has halted.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.run_state.is_halted()
    }

    /// The loaded instruction words.
    #[must_use]
    pub fn program(&self) -> &[u32] {
        &self.program
    }

    /// Fetches the instruction word occupying `pc`, if `pc` falls inside the
    /// loaded instruction memory.
    pub(crate) fn fetch(&self, pc: u32) -> Option<u32> {
        let offset = i64::from(pc) - i64::from(self.base_pc);
        if offset < 0 {
            return None;
        }
        usize::try_from(offset / 4)
            .ok()
            .and_then(|index| self.program.get(index).copied())
    }

    pub(crate) const fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    pub(crate) fn write_memory(&mut self, address: u32, value: u32) {
        self.memory.write_word(address, value);
    }

    pub(crate) const fn halt(&mut self, cause: HaltCause) {
        self.run_state = RunState::Halted(cause);
    }

    /// Commits a non-terminal step: discards any write to register 0 and
    /// advances the step counter.
    pub(crate) const fn commit_step(&mut self) {
        self.regs.enforce_zero();
        self.step_count = self.step_count.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{Machine, DEFAULT_BASE_PC};
    use crate::encoding::Reg;
    use crate::halt::HaltCause;
    use crate::state::RunState;

    fn reg(index: u8) -> Reg {
        Reg::from_u5(index).expect("test register index in range")
    }

    #[test]
    fn load_starts_at_base_with_clean_state() {
        let machine = Machine::new(vec![0x012A_2020]);
        assert_eq!(machine.pc(), DEFAULT_BASE_PC);
        assert_eq!(machine.base_pc(), DEFAULT_BASE_PC);
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.run_state(), RunState::Running);
        assert!(!machine.is_halted());
        assert_eq!(machine.register_snapshot(), [0; 32]);
        assert!(machine.nonzero_memory().is_empty());
        assert_eq!(machine.program(), &[0x012A_2020]);
    }

    #[test]
    fn explicit_base_positions_the_pc() {
        let machine = Machine::with_base_pc(vec![0, 0], 0x0000_1000);
        assert_eq!(machine.pc(), 0x0000_1000);
        assert_eq!(machine.base_pc(), 0x0000_1000);
    }

    #[test]
    fn fetch_maps_word_aligned_pcs_to_program_indices() {
        let machine = Machine::new(vec![0xAAAA_AAAA, 0xBBBB_BBBB]);
        assert_eq!(machine.fetch(DEFAULT_BASE_PC), Some(0xAAAA_AAAA));
        assert_eq!(machine.fetch(DEFAULT_BASE_PC + 4), Some(0xBBBB_BBBB));
        assert_eq!(machine.fetch(DEFAULT_BASE_PC + 8), None);
        assert_eq!(machine.fetch(DEFAULT_BASE_PC - 4), None);
        assert_eq!(machine.fetch(0), None);
    }

    #[test]
    fn reset_discards_state_but_keeps_the_program() {
        let mut machine = Machine::with_base_pc(vec![1, 2, 3], 0x2000);
        machine.set_register(reg(4), 77);
        machine.write_memory(0x100, 9);
        machine.set_pc(0x2008);
        machine.halt(HaltCause::PcOutOfRange(0x2008));
        machine.commit_step();

        machine.reset();

        assert_eq!(machine.pc(), 0x2000);
        assert_eq!(machine.step_count(), 0);
        assert!(!machine.is_halted());
        assert_eq!(machine.halt_cause(), None);
        assert_eq!(machine.register(reg(4)), 0);
        assert!(machine.nonzero_memory().is_empty());
        assert_eq!(machine.program(), &[1, 2, 3]);
    }

    #[test]
    fn register_snapshot_is_independent_of_later_writes() {
        let mut machine = Machine::new(Vec::new());
        machine.set_register(reg(7), 123);
        let snapshot = machine.register_snapshot();
        machine.set_register(reg(7), 456);
        assert_eq!(snapshot[7], 123);
        assert_eq!(machine.register(reg(7)), 456);
    }
}
