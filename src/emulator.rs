use serde::{Deserialize, Serialize};

use crate::bus::Bus;
use crate::error::PpuError;
use crate::ppu::PpuSnapshot;
use crate::vram::Mirroring;

/// One bus operation in a replay script.
///
/// Scripts are JSON arrays, e.g.
/// `[{"write": {"address": 8198, "value": 33}}, {"read": {"address": 8199}}, {"frames": {"count": 1}}]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Write { address: u16, value: u8 },
    Read { address: u16 },
    /// CPU cycles, three PPU dots each.
    Cycles { count: u64 },
    /// Raw PPU dots.
    Dots { count: u64 },
    Frames { count: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadResult {
    pub address: u16,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub reads: Vec<ReadResult>,
    pub cpu_cycles: u64,
    pub stall_cycles: u32,
    pub ppu: PpuSnapshot,
}

pub struct Emulator {
    pub bus: Bus,
    reads: Vec<ReadResult>,
}

impl Emulator {
    pub fn new() -> Self {
        Self::with_mirroring(Mirroring::default())
    }

    pub fn with_mirroring(mirroring: Mirroring) -> Self {
        Emulator {
            bus: Bus::new(mirroring),
            reads: Vec::new(),
        }
    }

    pub fn execute(&mut self, command: &Command) -> Result<(), PpuError> {
        match *command {
            Command::Write { address, value } => self.bus.write(address, value)?,
            Command::Read { address } => {
                let value = self.bus.read(address)?;
                self.reads.push(ReadResult { address, value });
            }
            Command::Cycles { count } => {
                for _ in 0..count {
                    self.bus.clock();
                }
            }
            Command::Dots { count } => {
                for _ in 0..count {
                    self.bus.step_ppu();
                }
            }
            Command::Frames { count } => {
                for _ in 0..count {
                    self.run_frame();
                }
            }
        }
        Ok(())
    }

    // Stops at the first failing command; later commands are not run
    pub fn run_script(&mut self, commands: &[Command]) -> Result<(), PpuError> {
        for (index, command) in commands.iter().enumerate() {
            self.execute(command).map_err(|e| {
                log::error!("script command {} ({:?}) failed: {}", index, command, e);
                e
            })?;
        }
        Ok(())
    }

    // Clocks the bus until the PPU frame counter moves on
    pub fn run_frame(&mut self) {
        let start_frame = self.bus.ppu().frame();
        while self.bus.ppu().frame() == start_frame {
            self.bus.clock();
        }
    }

    pub fn report(&self) -> Report {
        Report {
            reads: self.reads.clone(),
            cpu_cycles: self.bus.total_cycles,
            stall_cycles: self.bus.stall_cycles(),
            ppu: self.bus.ppu().snapshot(),
        }
    }

    pub fn reset(&mut self) {
        self.bus.reset();
        self.reads.clear();
    }
}

impl Default for Emulator {
    fn default() -> Self { Self::new() }
}
