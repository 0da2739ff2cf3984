// PPU address space ($0000-$3FFF): pattern tables, nametables and palette.

/// Addressable memory seen by the PPU through $2007.
///
/// The register core only hands addresses over; decoding and mirroring are
/// the implementor's responsibility.
pub trait PpuMemory {
    fn read(&self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);
}

// Nametable mirroring arrangements supported by the flat memory map
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    #[default]
    Horizontal,
    Vertical,
    SingleScreenLower,
    SingleScreenUpper,
}

impl Mirroring {
    // Physical 1KB page backing each of the four logical nametables
    fn pages(self) -> [u16; 4] {
        match self {
            Mirroring::Horizontal => [0, 0, 1, 1],
            Mirroring::Vertical => [0, 1, 0, 1],
            Mirroring::SingleScreenLower => [0, 0, 0, 0],
            Mirroring::SingleScreenUpper => [1, 1, 1, 1],
        }
    }
}

const PATTERN_RAM_SIZE: usize = 8 * 1024;
const NAMETABLE_RAM_SIZE: usize = 2048;
const PALETTE_RAM_SIZE: usize = 32;

/// Default PPU memory map: 8KB pattern RAM, 2KB nametable RAM, 32B palette.
pub struct VideoMemory {
    pattern_ram: Vec<u8>,
    nametable_ram: [u8; NAMETABLE_RAM_SIZE],
    palette_ram: [u8; PALETTE_RAM_SIZE],
    mirroring: Mirroring,
}

impl VideoMemory {
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            pattern_ram: vec![0; PATTERN_RAM_SIZE],
            nametable_ram: [0; NAMETABLE_RAM_SIZE],
            palette_ram: [0; PALETTE_RAM_SIZE],
            mirroring,
        }
    }

    pub fn mirroring(&self) -> Mirroring { self.mirroring }
    pub fn set_mirroring(&mut self, mirroring: Mirroring) { self.mirroring = mirroring; }

    pub fn nametable_ram(&self) -> &[u8] { &self.nametable_ram }
    pub fn palette_ram(&self) -> &[u8] { &self.palette_ram }

    // Maps $2000-$3EFF onto the 2KB nametable RAM
    pub fn mirror_vram_addr(&self, addr: u16) -> usize {
        let offset = addr.wrapping_sub(0x2000) & 0x0FFF;
        let table = (offset / 0x0400) as usize;
        let page = self.mirroring.pages()[table];
        (page * 0x0400 + (offset & 0x03FF)) as usize
    }

    // $3F10/$3F14/$3F18/$3F1C mirror $3F00/$3F04/$3F08/$3F0C
    pub fn palette_index(addr: u16) -> usize {
        let index = (addr & 0x1F) as usize;
        match index {
            0x10 | 0x14 | 0x18 | 0x1C => index & 0x0F,
            _ => index,
        }
    }
}

impl Default for VideoMemory {
    fn default() -> Self { Self::new(Mirroring::default()) }
}

impl PpuMemory for VideoMemory {
    fn read(&self, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => self.pattern_ram[addr as usize],
            0x2000..=0x3EFF => self.nametable_ram[self.mirror_vram_addr(addr)],
            _ => self.palette_ram[Self::palette_index(addr)],
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => self.pattern_ram[addr as usize] = data,
            0x2000..=0x3EFF => {
                let index = self.mirror_vram_addr(addr);
                self.nametable_ram[index] = data;
            }
            _ => self.palette_ram[Self::palette_index(addr)] = data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_mirroring_pairs_top_and_bottom() {
        let vram = VideoMemory::new(Mirroring::Horizontal);
        assert_eq!(vram.mirror_vram_addr(0x2000), 0x000);
        assert_eq!(vram.mirror_vram_addr(0x2400), 0x000);
        assert_eq!(vram.mirror_vram_addr(0x2800), 0x400);
        assert_eq!(vram.mirror_vram_addr(0x2C00), 0x400);
    }

    #[test]
    fn vertical_mirroring_pairs_left_and_right() {
        let vram = VideoMemory::new(Mirroring::Vertical);
        assert_eq!(vram.mirror_vram_addr(0x2000), 0x000);
        assert_eq!(vram.mirror_vram_addr(0x2800), 0x000);
        assert_eq!(vram.mirror_vram_addr(0x2400), 0x400);
        assert_eq!(vram.mirror_vram_addr(0x2C05), 0x405);
    }

    #[test]
    fn single_screen_uses_one_page() {
        let lower = VideoMemory::new(Mirroring::SingleScreenLower);
        let upper = VideoMemory::new(Mirroring::SingleScreenUpper);
        for base in [0x2000, 0x2400, 0x2800, 0x2C00] {
            assert_eq!(lower.mirror_vram_addr(base + 0x10), 0x010);
            assert_eq!(upper.mirror_vram_addr(base + 0x10), 0x410);
        }
    }

    #[test]
    fn nametable_region_repeats_above_3000() {
        let mut vram = VideoMemory::new(Mirroring::Vertical);
        vram.write(0x2123, 0xAB);
        assert_eq!(vram.read(0x3123), 0xAB);
    }

    #[test]
    fn palette_mirrors() {
        let mut vram = VideoMemory::default();
        vram.write(0x3F10, 0x21);
        assert_eq!(vram.read(0x3F00), 0x21);
        vram.write(0x3F05, 0x16);
        assert_eq!(vram.read(0x3F25), 0x16);
        assert_eq!(VideoMemory::palette_index(0x3F1C), 0x0C);
        assert_eq!(VideoMemory::palette_index(0x3F1F), 0x1F);
    }

    #[test]
    fn addresses_wrap_at_14_bits() {
        let mut vram = VideoMemory::default();
        vram.write(0x0042, 0x99);
        assert_eq!(vram.read(0x4042), 0x99);
        assert_eq!(vram.read(0xC042), 0x99);
    }
}
