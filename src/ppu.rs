use serde::Serialize;

use crate::error::{Access, PpuError};
use crate::ram::CpuMemory;
use crate::registers::{ControlRegister, MaskRegister, Port, ShiftLatch};
use crate::vram::{PpuMemory, VideoMemory};

pub const LAST_DOT: u16 = 340;
pub const LAST_SCANLINE: u16 = 261; // 0-239 visible, 240 post-render, 241-260 vblank, 261 pre-render
pub const VBLANK_SCANLINE: u16 = 241;
pub const PRE_RENDER_SCANLINE: u16 = 261;
pub const DOTS_PER_FRAME: u64 = (LAST_DOT as u64 + 1) * (LAST_SCANLINE as u64 + 1);

// Power-on position: the first step lands on dot 0 of scanline 241
const POWER_ON_DOT: u16 = LAST_DOT;
const POWER_ON_SCANLINE: u16 = 240;

const STATUS_VBLANK: u8 = 0x80;
const OAM_SIZE: usize = 256;

/// Register file and timing counters of the 2C02.
///
/// The vblank bit is the only state shared between register access and
/// timing: `step` sets and clears it at fixed positions, `$2002` reads clear it.
pub struct Ppu<M: PpuMemory = VideoMemory> {
    memory: M,

    // $2000 / $2001
    ctrl: ControlRegister,
    mask: MaskRegister,

    // $2003 / $2004
    oam_addr: u8,
    oam_data: [u8; OAM_SIZE],

    // $2005 / $2006
    scroll: ShiftLatch,
    vram_addr: ShiftLatch,

    vertical_blank: bool,

    cycle: u16,    // dot within the scanline (0-340)
    scanline: u16, // 0-261
    frame: u64,
}

impl<M: PpuMemory> Ppu<M> {
    pub fn new(memory: M) -> Self {
        let mut ppu = Self {
            memory,
            ctrl: ControlRegister::new(),
            mask: MaskRegister::new(),
            oam_addr: 0,
            oam_data: [0; OAM_SIZE],
            scroll: ShiftLatch::new(),
            vram_addr: ShiftLatch::new(),
            vertical_blank: false,
            cycle: 0,
            scanline: 0,
            frame: 0,
        };
        ppu.reset();
        ppu
    }

    // OAM contents, the latches and memory survive a reset
    pub fn reset(&mut self) {
        self.cycle = POWER_ON_DOT;
        self.scanline = POWER_ON_SCANLINE;
        self.frame = 0;
        self.vertical_blank = false;
        self.write_ctrl(0);
        self.write_mask(0);
        self.write_oam_addr(0);
        log::debug!("PPU reset to dot {} scanline {}", self.cycle, self.scanline);
    }

    // --- Register Access Methods (Called by Bus) ---

    pub fn read_register(&mut self, address: u16) -> Result<u8, PpuError> {
        match Port::from_address(address) {
            Some(Port::Status) => Ok(self.read_status()),
            Some(Port::OamData) => Ok(self.read_oam_data()),
            Some(Port::Data) => Ok(self.read_data()),
            _ => Err(PpuError::UnsupportedPort { address, access: Access::Read }),
        }
    }

    /// `cpu` is only consulted by `$4014`.
    pub fn write_register<C>(&mut self, address: u16, data: u8, cpu: &C) -> Result<(), PpuError>
    where
        C: CpuMemory + ?Sized,
    {
        let port = Port::from_address(address)
            .ok_or(PpuError::UnsupportedPort { address, access: Access::Write })?;
        match port {
            Port::Control => self.write_ctrl(data),
            Port::Mask => self.write_mask(data),
            Port::OamAddress => self.write_oam_addr(data),
            Port::OamData => self.write_oam_data(data),
            Port::Scroll => self.write_scroll(data),
            Port::Address => self.write_addr(data),
            Port::Data => self.write_data(data),
            Port::OamDma => self.write_oam_dma(data, cpu),
            Port::Status => {
                return Err(PpuError::UnsupportedPort { address, access: Access::Write });
            }
        }
        Ok(())
    }

    fn write_ctrl(&mut self, data: u8) { self.ctrl.set_bits(data); }
    fn write_mask(&mut self, data: u8) { self.mask.set_bits(data); }

    fn read_status(&mut self) -> u8 {
        let status = if self.vertical_blank { STATUS_VBLANK } else { 0 };
        self.vertical_blank = false;
        status
    }

    fn write_oam_addr(&mut self, data: u8) { self.oam_addr = data; }

    fn read_oam_data(&self) -> u8 { self.oam_data[self.oam_addr as usize] }

    fn write_oam_data(&mut self, data: u8) {
        self.oam_data[self.oam_addr as usize] = data;
        self.oam_addr = self.oam_addr.wrapping_add(1);
    }

    fn write_scroll(&mut self, data: u8) { self.scroll.write(data); }
    fn write_addr(&mut self, data: u8) { self.vram_addr.write(data); }

    fn read_data(&mut self) -> u8 {
        let data = self.memory.read(self.vram_addr.get());
        self.vram_addr.increment(self.ctrl.vram_addr_increment());
        data
    }

    fn write_data(&mut self, data: u8) {
        self.memory.write(self.vram_addr.get(), data);
        self.vram_addr.increment(self.ctrl.vram_addr_increment());
    }

    // Copies one CPU page into OAM. The 513/514 cycle CPU stall is the bus's concern.
    fn write_oam_dma<C: CpuMemory + ?Sized>(&mut self, page: u8, cpu: &C) {
        let base_addr = (page as u16) << 8;
        log::trace!("OAM DMA from page ${:02X}00 at OAM ${:02X}", page, self.oam_addr);
        for i in 0..OAM_SIZE as u16 {
            self.oam_data[self.oam_addr as usize] = cpu.read(base_addr.wrapping_add(i));
            self.oam_addr = self.oam_addr.wrapping_add(1);
        }
    }

    // --- Timing ---

    // Advances the dot/scanline/frame counters by one PPU cycle
    fn tick(&mut self) {
        self.cycle += 1;
        if self.cycle > LAST_DOT {
            self.cycle = 0;
            self.scanline += 1;
            if self.scanline > LAST_SCANLINE {
                self.scanline = 0;
                self.frame += 1;
                log::debug!("PPU frame {} started", self.frame);
            }
        }
    }

    /// One PPU cycle.
    pub fn step(&mut self) {
        self.tick();
        if self.scanline == VBLANK_SCANLINE && self.cycle == 1 {
            self.vertical_blank = true;
        }
        if self.scanline == PRE_RENDER_SCANLINE && self.cycle == 1 {
            self.vertical_blank = false;
        }
    }

    // --- Observable state ---

    pub fn cycle(&self) -> u16 { self.cycle }
    pub fn scanline(&self) -> u16 { self.scanline }
    pub fn frame(&self) -> u64 { self.frame }
    pub fn vertical_blank(&self) -> bool { self.vertical_blank }

    /// Level of the NMI output: vblank gated by the `$2000` enable bit.
    /// Delivering the interrupt is left to the CPU side.
    pub fn nmi_line(&self) -> bool { self.vertical_blank && self.ctrl.generate_nmi() }

    pub fn ctrl(&self) -> ControlRegister { self.ctrl }
    pub fn mask(&self) -> MaskRegister { self.mask }
    pub fn oam_addr(&self) -> u8 { self.oam_addr }
    pub fn oam(&self) -> &[u8; OAM_SIZE] { &self.oam_data }
    pub fn scroll(&self) -> u16 { self.scroll.get() }
    pub fn vram_address(&self) -> u16 { self.vram_addr.get() }

    pub fn memory(&self) -> &M { &self.memory }
    pub fn memory_mut(&mut self) -> &mut M { &mut self.memory }

    pub fn snapshot(&self) -> PpuSnapshot {
        PpuSnapshot {
            cycle: self.cycle,
            scanline: self.scanline,
            frame: self.frame,
            vertical_blank: self.vertical_blank,
            control: ControlFlags::from(self.ctrl),
            mask: MaskFlags::from(self.mask),
            oam_addr: self.oam_addr,
            scroll: self.scroll.get(),
            vram_addr: self.vram_addr.get(),
            nmi_line: self.nmi_line(),
        }
    }
}

impl Default for Ppu<VideoMemory> { fn default() -> Self { Self::new(VideoMemory::default()) } }

// --- Debug views ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlFlags {
    pub bits: u8,
    pub nametable: u8,
    pub increment_32: bool,
    pub sprite_table: bool,
    pub background_table: bool,
    pub sprite_size_large: bool,
    pub master_slave: bool,
    pub generate_nmi: bool,
}

impl From<ControlRegister> for ControlFlags {
    fn from(ctrl: ControlRegister) -> Self {
        Self {
            bits: ctrl.bits(),
            nametable: ctrl.nametable(),
            increment_32: ctrl.increment_step(),
            sprite_table: ctrl.sprite_table(),
            background_table: ctrl.background_table(),
            sprite_size_large: ctrl.sprite_size_large(),
            master_slave: ctrl.master_slave_select(),
            generate_nmi: ctrl.generate_nmi(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskFlags {
    pub bits: u8,
    pub grayscale: bool,
    pub show_background_leftmost: bool,
    pub show_sprites_leftmost: bool,
    pub show_background: bool,
    pub show_sprites: bool,
    pub emphasize_red: bool,
    pub emphasize_green: bool,
    pub emphasize_blue: bool,
}

impl From<MaskRegister> for MaskFlags {
    fn from(mask: MaskRegister) -> Self {
        Self {
            bits: mask.bits(),
            grayscale: mask.grayscale(),
            show_background_leftmost: mask.show_background_leftmost(),
            show_sprites_leftmost: mask.show_sprites_leftmost(),
            show_background: mask.show_background(),
            show_sprites: mask.show_sprites(),
            emphasize_red: mask.emphasize_red(),
            emphasize_green: mask.emphasize_green(),
            emphasize_blue: mask.emphasize_blue(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PpuSnapshot {
    pub cycle: u16,
    pub scanline: u16,
    pub frame: u64,
    pub vertical_blank: bool,
    pub control: ControlFlags,
    pub mask: MaskFlags,
    pub oam_addr: u8,
    pub scroll: u16,
    pub vram_addr: u16,
    pub nmi_line: bool,
}
