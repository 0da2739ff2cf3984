/// Read-only view of CPU address space, lent to the PPU for OAM DMA.
pub trait CpuMemory {
    fn read(&self, addr: u16) -> u8;
}

const WORK_RAM_SIZE: usize = 2048;
const CARTRIDGE_BASE: u16 = 0x4020;

// CPU-side memory reachable without going through a chip register:
// 2KB work RAM (mirrored to $1FFF) and a flat cartridge space from $4020.
pub struct Memory {
    pub ram: Vec<u8>,
    pub cartridge: Vec<u8>,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            ram: vec![0; WORK_RAM_SIZE],
            cartridge: vec![0; 0x10000 - CARTRIDGE_BASE as usize],
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr as usize) % WORK_RAM_SIZE], // ミラー
            CARTRIDGE_BASE..=0xFFFF => self.cartridge[(addr - CARTRIDGE_BASE) as usize],
            // PPU and APU/IO registers are not memory
            _ => 0,
        }
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr as usize) % WORK_RAM_SIZE] = data,
            CARTRIDGE_BASE..=0xFFFF => self.cartridge[(addr - CARTRIDGE_BASE) as usize] = data,
            _ => {}
        }
    }
}

impl Default for Memory {
    fn default() -> Self { Self::new() }
}

impl CpuMemory for Memory {
    fn read(&self, addr: u16) -> u8 {
        Memory::read(self, addr)
    }
}
