use crate::error::PpuError;
use crate::ppu::Ppu;
use crate::ram::Memory;
use crate::vram::{Mirroring, VideoMemory};

// PPU dots per CPU cycle (NTSC)
pub const PPU_DOTS_PER_CPU_CYCLE: u32 = 3;

// OAM DMA halts the CPU for 513 cycles, one more when started on an odd cycle
const OAM_DMA_STALL_CYCLES: u32 = 513;

// The main system bus, connecting the CPU address space to RAM, cartridge
// space and the PPU register ports.
pub struct Bus {
    cpu_ram: Memory,
    ppu: Ppu<VideoMemory>,
    pub total_cycles: u64,
    stall_cycles: u32,
}

impl Bus {
    pub fn new(mirroring: Mirroring) -> Self {
        Bus {
            cpu_ram: Memory::new(),
            ppu: Ppu::new(VideoMemory::new(mirroring)),
            total_cycles: 0,
            stall_cycles: 0,
        }
    }

    // Read data from the bus at the specified address
    pub fn read(&mut self, addr: u16) -> Result<u8, PpuError> {
        match addr {
            0x2000..=0x3FFF => self.ppu.read_register(ppu_register(addr)), // PPU Registers (+ mirrors)
            // $4014 is write-only; reading it is a wiring fault like any other
            0x4014 => self.ppu.read_register(addr),
            0x4000..=0x401F => Ok(0), // APU / controllers are not modeled
            _ => Ok(self.cpu_ram.read(addr)),
        }
    }

    // Write data to the bus at the specified address
    pub fn write(&mut self, addr: u16, data: u8) -> Result<(), PpuError> {
        match addr {
            0x2000..=0x3FFF => self.ppu.write_register(ppu_register(addr), data, &self.cpu_ram),
            0x4014 => {
                self.ppu.write_register(addr, data, &self.cpu_ram)?;
                self.schedule_oam_dma_stall();
                Ok(())
            }
            0x4000..=0x401F => Ok(()),
            _ => {
                self.cpu_ram.write(addr, data);
                Ok(())
            }
        }
    }

    fn schedule_oam_dma_stall(&mut self) {
        let stall = OAM_DMA_STALL_CYCLES + (self.total_cycles % 2) as u32;
        self.stall_cycles += stall;
        log::trace!("OAM DMA stalls CPU for {} cycles at cycle {}", stall, self.total_cycles);
    }

    /// Advances one CPU cycle: three PPU dots, and one stall cycle consumed if
    /// a DMA is pending. Returns true while the CPU is stalled.
    pub fn clock(&mut self) -> bool {
        for _ in 0..PPU_DOTS_PER_CPU_CYCLE {
            self.ppu.step();
        }
        self.total_cycles += 1;
        if self.stall_cycles > 0 {
            self.stall_cycles -= 1;
            true
        } else {
            false
        }
    }

    /// Steps the PPU alone, without advancing CPU time.
    pub fn step_ppu(&mut self) {
        self.ppu.step();
    }

    pub fn stall_cycles(&self) -> u32 { self.stall_cycles }
    pub fn nmi_line(&self) -> bool { self.ppu.nmi_line() }

    pub fn ppu(&self) -> &Ppu<VideoMemory> { &self.ppu }
    pub fn ppu_mut(&mut self) -> &mut Ppu<VideoMemory> { &mut self.ppu }
    pub fn cpu_memory(&self) -> &Memory { &self.cpu_ram }

    pub fn reset(&mut self) {
        self.ppu.reset();
        self.total_cycles = 0;
        self.stall_cycles = 0;
    }
}

impl Default for Bus {
    fn default() -> Self { Self::new(Mirroring::default()) }
}

// $2008-$3FFF repeat the eight ports every 8 bytes
fn ppu_register(addr: u16) -> u16 {
    0x2000 | (addr & 0x0007)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Access;

    #[test]
    fn register_mirrors_fold_onto_ports() {
        assert_eq!(ppu_register(0x2000), 0x2000);
        assert_eq!(ppu_register(0x2007), 0x2007);
        assert_eq!(ppu_register(0x200A), 0x2002);
        assert_eq!(ppu_register(0x3FFF), 0x2007);
    }

    #[test]
    fn mirrored_writes_reach_ppu() {
        let mut bus = Bus::default();
        bus.write(0x3456, 0x21).unwrap(); // $2006
        bus.write(0x200E, 0x00).unwrap(); // $2006
        assert_eq!(bus.ppu().vram_address(), 0x2100);
    }

    #[test]
    fn reading_write_only_port_is_fatal() {
        let mut bus = Bus::default();
        assert_eq!(
            bus.read(0x2008),
            Err(PpuError::UnsupportedPort { address: 0x2000, access: Access::Read })
        );
        assert_eq!(
            bus.read(0x4014),
            Err(PpuError::UnsupportedPort { address: 0x4014, access: Access::Read })
        );
    }

    #[test]
    fn oam_dma_copies_ram_page_and_stalls() {
        let mut bus = Bus::default();
        for i in 0..256u16 {
            bus.write(0x0300 + i, i as u8 ^ 0xA5).unwrap();
        }
        bus.write(0x4014, 0x03).unwrap();
        assert_eq!(bus.stall_cycles(), 513);
        for i in 0..256usize {
            assert_eq!(bus.ppu().oam()[i], i as u8 ^ 0xA5);
        }
    }

    #[test]
    fn oam_dma_on_odd_cycle_costs_one_more() {
        let mut bus = Bus::default();
        bus.clock();
        bus.write(0x4014, 0x00).unwrap();
        assert_eq!(bus.stall_cycles(), 514);
    }

    #[test]
    fn stall_is_consumed_one_cycle_at_a_time() {
        let mut bus = Bus::default();
        bus.write(0x4014, 0x00).unwrap();
        let mut stalled = 0;
        while bus.clock() {
            stalled += 1;
        }
        assert_eq!(stalled, 513);
        assert_eq!(bus.stall_cycles(), 0);
        // the PPU kept running through the stall
        assert_eq!(bus.total_cycles, 514);
    }

    #[test]
    fn clock_runs_three_dots() {
        let mut bus = Bus::default();
        bus.clock();
        assert_eq!((bus.ppu().cycle(), bus.ppu().scanline()), (2, 241));
        assert!(bus.ppu().vertical_blank());
    }

    #[test]
    fn io_range_is_inert() {
        let mut bus = Bus::default();
        bus.write(0x4016, 0x01).unwrap();
        assert_eq!(bus.read(0x4016), Ok(0));
    }
}
