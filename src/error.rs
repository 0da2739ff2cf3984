use std::fmt;

/// Direction of a register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}

/// Fatal protocol errors raised by the PPU register interface.
///
/// An unsupported port means the bus routed an address the chip does not
/// decode. Emulation state past that point is meaningless, so hosts should
/// stop the session rather than retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpuError {
    UnsupportedPort { address: u16, access: Access },
}

impl fmt::Display for PpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPort { address, access } => write!(
                f,
                "unhandled ppu register {} at address: 0x{:04X}",
                access, address,
            ),
        }
    }
}

impl std::error::Error for PpuError {}
