//! Register file and timing core of the NES PPU (2C02).
//!
//! [`ppu::Ppu`] implements the CPU-facing ports `$2000-$2007` and `$4014`
//! together with the dot/scanline/frame counters that drive vblank.
//! [`bus::Bus`] and [`emulator::Emulator`] host it for replaying bus traffic.

pub mod bus;
pub mod emulator;
pub mod error;
pub mod ppu;
pub mod ram;
pub mod registers;
pub mod vram;

pub use error::{Access, PpuError};
pub use ppu::{Ppu, PpuSnapshot};
pub use ram::CpuMemory;
pub use vram::{Mirroring, PpuMemory, VideoMemory};
