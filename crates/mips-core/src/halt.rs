//! Terminal halt conditions for the simulated machine.

use thiserror::Error;

/// Why the machine stopped executing.
///
/// Both causes are terminal: once latched the machine executes nothing
/// further until it is reset. Falling off the end of the loaded program
/// (`PcOutOfRange`) is the designed termination condition, not a defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HaltCause {
    /// The program counter left the loaded instruction memory.
    #[error("program counter 0x{0:08x} is outside instruction memory")]
    PcOutOfRange(u32),
    /// A jump-format word carried an operation code with no assigned jump.
    #[error("unrecognized jump-format operation 0x{0:02x}")]
    UnknownJump(u8),
}

#[cfg(test)]
mod tests {
    use super::HaltCause;

    #[test]
    fn causes_render_their_payloads() {
        assert_eq!(
            HaltCause::PcOutOfRange(0x0040_0010).to_string(),
            "program counter 0x00400010 is outside instruction memory"
        );
        assert_eq!(
            HaltCause::UnknownJump(0x3E).to_string(),
            "unrecognized jump-format operation 0x3e"
        );
    }
}
