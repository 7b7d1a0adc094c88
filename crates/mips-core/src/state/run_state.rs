use crate::halt::HaltCause;

/// Host-observable execution state of the machine.
///
/// Halting is monotonic: the state machine only ever moves from `Running`
/// to `Halted`, and leaves `Halted` only through a full reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// Terminally halted; no further instruction executes.
    Halted(HaltCause),
}

impl RunState {
    /// Returns the latched halt cause, if the machine has halted.
    #[must_use]
    pub const fn halt_cause(self) -> Option<HaltCause> {
        match self {
            Self::Halted(cause) => Some(cause),
            Self::Running => None,
        }
    }

    /// Returns `true` once the machine has halted.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted(_))
    }
}
