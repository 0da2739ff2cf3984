// src/registers.rs

use serde::Serialize;

// --- CPU-visible port addresses ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    Control,    // $2000 PPUCTRL (write)
    Mask,       // $2001 PPUMASK (write)
    Status,     // $2002 PPUSTATUS (read)
    OamAddress, // $2003 OAMADDR (write)
    OamData,    // $2004 OAMDATA (read/write)
    Scroll,     // $2005 PPUSCROLL (write x2)
    Address,    // $2006 PPUADDR (write x2)
    Data,       // $2007 PPUDATA (read/write)
    OamDma,     // $4014 OAMDMA (write)
}

impl Port {
    pub fn from_address(address: u16) -> Option<Self> {
        match address {
            0x2000 => Some(Port::Control),
            0x2001 => Some(Port::Mask),
            0x2002 => Some(Port::Status),
            0x2003 => Some(Port::OamAddress),
            0x2004 => Some(Port::OamData),
            0x2005 => Some(Port::Scroll),
            0x2006 => Some(Port::Address),
            0x2007 => Some(Port::Data),
            0x4014 => Some(Port::OamDma),
            _ => None,
        }
    }

    pub fn address(self) -> u16 {
        match self {
            Port::Control => 0x2000,
            Port::Mask => 0x2001,
            Port::Status => 0x2002,
            Port::OamAddress => 0x2003,
            Port::OamData => 0x2004,
            Port::Scroll => 0x2005,
            Port::Address => 0x2006,
            Port::Data => 0x2007,
            Port::OamDma => 0x4014,
        }
    }
}

// --- PPU Control Register ($2000) ---
// Every flag is derived from the last byte written; nothing is stored apart.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(transparent)]
pub struct ControlRegister {
    bits: u8,
}

impl ControlRegister {
    pub fn new() -> Self {
        Self { bits: 0 }
    }
    pub fn bits(&self) -> u8 { self.bits }
    pub fn set_bits(&mut self, data: u8) { self.bits = data; }

    pub fn nametable(&self) -> u8 { self.bits & 0x03 } // 0: $2000; 1: $2400; 2: $2800; 3: $2C00
    pub fn nametable_addr(&self) -> u16 { 0x2000 + 0x0400 * self.nametable() as u16 }
    pub fn increment_step(&self) -> bool { (self.bits & 0x04) != 0 } // false = +1, true = +32
    pub fn vram_addr_increment(&self) -> u16 { if self.increment_step() { 32 } else { 1 } }
    pub fn sprite_table(&self) -> bool { (self.bits & 0x08) != 0 }
    pub fn sprite_pattern_addr(&self) -> u16 { if self.sprite_table() { 0x1000 } else { 0x0000 } }
    pub fn background_table(&self) -> bool { (self.bits & 0x10) != 0 }
    pub fn background_pattern_addr(&self) -> u16 { if self.background_table() { 0x1000 } else { 0x0000 } }
    pub fn sprite_size_large(&self) -> bool { (self.bits & 0x20) != 0 } // true = 8x16, false = 8x8
    pub fn master_slave_select(&self) -> bool { (self.bits & 0x40) != 0 } // false = read EXT, true = write EXT
    pub fn generate_nmi(&self) -> bool { (self.bits & 0x80) != 0 }
}

// --- PPU Mask Register ($2001) ---
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(transparent)]
pub struct MaskRegister {
    bits: u8,
}

impl MaskRegister {
    pub fn new() -> Self { Self { bits: 0 } }
    pub fn bits(&self) -> u8 { self.bits }
    pub fn set_bits(&mut self, data: u8) { self.bits = data; }

    pub fn grayscale(&self) -> bool { (self.bits & 0x01) != 0 }
    pub fn show_background_leftmost(&self) -> bool { (self.bits & 0x02) != 0 }
    pub fn show_sprites_leftmost(&self) -> bool { (self.bits & 0x04) != 0 }
    pub fn show_background(&self) -> bool { (self.bits & 0x08) != 0 }
    pub fn show_sprites(&self) -> bool { (self.bits & 0x10) != 0 }
    pub fn emphasize_red(&self) -> bool { (self.bits & 0x20) != 0 }
    pub fn emphasize_green(&self) -> bool { (self.bits & 0x40) != 0 }
    pub fn emphasize_blue(&self) -> bool { (self.bits & 0x80) != 0 }
}

// --- $2005 / $2006 accumulators ---
// No first/second write toggle: each write shifts the live value up a byte
// and ORs the new byte in, so the register always holds the last two writes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(transparent)]
pub struct ShiftLatch {
    value: u16,
}

impl ShiftLatch {
    pub fn new() -> Self { Self { value: 0 } }
    pub fn get(&self) -> u16 { self.value }
    pub fn set(&mut self, value: u16) { self.value = value; }

    pub fn write(&mut self, data: u8) {
        self.value = (self.value << 8) | data as u16;
    }

    pub fn increment(&mut self, amount: u16) {
        self.value = self.value.wrapping_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn port_addresses_round_trip() {
        for address in [0x2000, 0x2001, 0x2002, 0x2003, 0x2004, 0x2005, 0x2006, 0x2007, 0x4014] {
            let port = Port::from_address(address).unwrap();
            assert_eq!(port.address(), address);
        }
    }

    #[test]
    fn mirrors_and_neighbours_are_not_ports() {
        // Mirror folding is the bus's job; the chip only decodes canonical addresses.
        assert_eq!(Port::from_address(0x2008), None);
        assert_eq!(Port::from_address(0x3FFF), None);
        assert_eq!(Port::from_address(0x4013), None);
        assert_eq!(Port::from_address(0x4015), None);
    }

    #[test]
    fn control_helpers_follow_selectors() {
        let mut ctrl = ControlRegister::new();
        ctrl.set_bits(0b1001_1110);
        assert_eq!(ctrl.nametable(), 2);
        assert_eq!(ctrl.nametable_addr(), 0x2800);
        assert_eq!(ctrl.vram_addr_increment(), 32);
        assert_eq!(ctrl.sprite_pattern_addr(), 0x1000);
        assert_eq!(ctrl.background_pattern_addr(), 0x1000);
        assert!(!ctrl.sprite_size_large());
        assert!(!ctrl.master_slave_select());
        assert!(ctrl.generate_nmi());
    }

    #[test]
    fn second_control_write_leaves_no_sticky_bits() {
        let mut ctrl = ControlRegister::new();
        ctrl.set_bits(0xFF);
        ctrl.set_bits(0x00);
        assert_eq!(ctrl.nametable(), 0);
        assert!(!ctrl.increment_step());
        assert!(!ctrl.sprite_table());
        assert!(!ctrl.background_table());
        assert!(!ctrl.sprite_size_large());
        assert!(!ctrl.master_slave_select());
        assert!(!ctrl.generate_nmi());
    }

    #[test]
    fn latch_keeps_last_two_writes() {
        let mut latch = ShiftLatch::new();
        latch.write(0x12);
        assert_eq!(latch.get(), 0x0012);
        latch.write(0x34);
        assert_eq!(latch.get(), 0x1234);
        latch.write(0x56);
        assert_eq!(latch.get(), 0x3456);
    }

    #[test]
    fn latch_increment_wraps() {
        let mut latch = ShiftLatch::new();
        latch.set(0xFFF0);
        latch.increment(32);
        assert_eq!(latch.get(), 0x0010);
    }

    proptest! {
        #[test]
        fn control_flags_are_bit_slices(value in 0u8..=0xFF) {
            let mut ctrl = ControlRegister::new();
            ctrl.set_bits(value);
            prop_assert_eq!(ctrl.nametable(), value & 0x03);
            prop_assert_eq!(ctrl.increment_step(), (value >> 2) & 1 == 1);
            prop_assert_eq!(ctrl.sprite_table(), (value >> 3) & 1 == 1);
            prop_assert_eq!(ctrl.background_table(), (value >> 4) & 1 == 1);
            prop_assert_eq!(ctrl.sprite_size_large(), (value >> 5) & 1 == 1);
            prop_assert_eq!(ctrl.master_slave_select(), (value >> 6) & 1 == 1);
            prop_assert_eq!(ctrl.generate_nmi(), (value >> 7) & 1 == 1);
        }

        #[test]
        fn mask_flags_are_bit_slices(value in 0u8..=0xFF) {
            let mut mask = MaskRegister::new();
            mask.set_bits(value);
            let flags = [
                mask.grayscale(),
                mask.show_background_leftmost(),
                mask.show_sprites_leftmost(),
                mask.show_background(),
                mask.show_sprites(),
                mask.emphasize_red(),
                mask.emphasize_green(),
                mask.emphasize_blue(),
            ];
            for (bit, flag) in flags.iter().enumerate() {
                prop_assert_eq!(*flag, (value >> bit) & 1 == 1);
            }
        }

        #[test]
        fn latch_holds_last_two_bytes(writes in proptest::collection::vec(0u8..=0xFF, 2..8)) {
            let mut latch = ShiftLatch::new();
            for &w in &writes {
                latch.write(w);
            }
            let n = writes.len();
            prop_assert_eq!(latch.get(), (writes[n - 2] as u16) << 8 | writes[n - 1] as u16);
        }
    }
}
