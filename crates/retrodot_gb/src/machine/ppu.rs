mod dma;
mod fetcher;
mod fifo;
mod oam_scan;
mod palette;
mod pipeline;
mod registers;

pub(crate) use dma::DmaCopy;
pub use registers::{Lcdc, Mode, Stat};
pub(crate) use registers::{
    BCPD, BCPS, BGP, DMA, LCDC, LY, LYC, OBP0, OBP1, OCPD, OCPS, SCX, SCY, STAT, VBK, WX, WY,
};

use crate::cpu::InterruptFlags;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};
use dma::OamDma;
use oam_scan::OamScan;
use palette::{ColorPalettes, DMG_SHADES};
use pipeline::{LineContext, LineRender};
use registers::LcdRegisters;

pub(crate) const VRAM_BANK_SIZE: usize = 0x2000;
pub(crate) const OAM_SIZE: usize = 0xA0;

/// Two banks of video RAM. DMG only ever touches bank 0.
pub(crate) type Vram = [[u8; VRAM_BANK_SIZE]; 2];

const DOTS_PER_LINE: u16 = 456;
const OAM_SCAN_DOTS: u16 = 80;
const VBLANK_LINE: u8 = 144;
const LINES_PER_FRAME: u8 = 154;

const FRAME_BYTES: usize = SCREEN_WIDTH * SCREEN_HEIGHT * 3;

/// Dot-driven picture processing unit.
///
/// Each call to [`Ppu::tick`] advances one dot. Mode 2 walks OAM, mode 3
/// runs the fetchers and pixel FIFOs into an RGB24 framebuffer, and modes
/// 0 and 1 idle until the line (or frame) ends.
#[derive(Clone)]
pub struct Ppu {
    regs: LcdRegisters,
    vram: Box<Vram>,
    vram_bank: u8,
    oam: [u8; OAM_SIZE],
    bg_palettes: ColorPalettes,
    obj_palettes: ColorPalettes,
    pub(crate) dma: OamDma,
    color: bool,
    mode: Mode,
    /// Dot within the current line, 0..456.
    dot: u16,
    scan: OamScan,
    line: Option<LineRender>,
    window_line: u8,
    window_armed: bool,
    /// Level of the ORed STAT sources; interrupts fire on its rising edge.
    stat_line: bool,
    requests: InterruptFlags,
    framebuffer: Vec<u8>,
    frame_ready: bool,
    drawing_dots: u16,
}

impl Ppu {
    pub fn new(color: bool) -> Self {
        let mut ppu = Self {
            regs: LcdRegisters::default(),
            vram: Box::new([[0; VRAM_BANK_SIZE]; 2]),
            vram_bank: 0,
            oam: [0; OAM_SIZE],
            bg_palettes: ColorPalettes::default(),
            obj_palettes: ColorPalettes::default(),
            dma: OamDma::default(),
            color,
            mode: Mode::OamScan,
            dot: 0,
            scan: OamScan::default(),
            line: None,
            window_line: 0,
            window_armed: false,
            stat_line: false,
            requests: InterruptFlags::empty(),
            framebuffer: vec![DMG_SHADES[0]; FRAME_BYTES],
            frame_ready: false,
            drawing_dots: 0,
        };
        ppu.start_oam_scan();
        ppu.update_stat_line();
        // Power-on state does not count as an edge.
        ppu.requests = InterruptFlags::empty();
        ppu
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn ly(&self) -> u8 {
        self.regs.ly
    }

    pub fn lcdc(&self) -> Lcdc {
        self.regs.lcdc
    }

    pub fn is_color(&self) -> bool {
        self.color
    }

    /// RGB24, row-major, 160x144.
    pub fn frame_buffer(&self) -> &[u8] {
        &self.framebuffer
    }

    /// Length of mode 3 on the most recently drawn line.
    pub fn last_drawing_dots(&self) -> u16 {
        self.drawing_dots
    }

    /// True once per frame, after line 143 has been drawn.
    pub fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame_ready)
    }

    /// Advance one dot and hand back the interrupts raised on it.
    pub fn tick(&mut self) -> InterruptFlags {
        if self.regs.lcd_enabled() {
            self.step_dot();
            self.update_stat_line();
        }
        std::mem::take(&mut self.requests)
    }

    fn step_dot(&mut self) {
        match self.mode {
            Mode::OamScan => {
                self.scan
                    .tick(&self.oam, self.regs.ly, self.regs.obj_height());
                self.dot += 1;
                if self.dot == OAM_SCAN_DOTS {
                    self.start_drawing();
                }
            }
            Mode::Drawing => {
                self.draw_dot();
                self.dot += 1;
                let finished = self.line.as_ref().map_or(true, LineRender::is_finished);
                if finished {
                    self.drawing_dots = self.dot - OAM_SCAN_DOTS;
                    self.mode = Mode::HBlank;
                    log::trace!(
                        "GB PPU: LY={} mode 3 took {} dots",
                        self.regs.ly,
                        self.drawing_dots
                    );
                }
            }
            Mode::HBlank | Mode::VBlank => self.dot += 1,
        }

        if self.dot >= DOTS_PER_LINE {
            self.next_line();
        }
    }

    fn start_oam_scan(&mut self) {
        self.mode = Mode::OamScan;
        self.scan.reset();
        if self.regs.ly == self.regs.wy {
            self.window_armed = true;
        }
    }

    fn start_drawing(&mut self) {
        self.mode = Mode::Drawing;
        let sprites = self.scan.take_sorted();
        self.line = Some(LineRender::new(self.regs.scx, sprites));
    }

    fn draw_dot(&mut self) {
        let Some(line) = self.line.as_mut() else {
            return;
        };
        let ctx = LineContext {
            regs: &self.regs,
            vram: self.vram.as_ref(),
            oam: &self.oam,
            bg_palettes: &self.bg_palettes,
            obj_palettes: &self.obj_palettes,
            window_line: self.window_line,
            window_armed: self.window_armed,
            color: self.color,
        };
        if let Some((x, rgb)) = line.tick(&ctx) {
            let offset = (self.regs.ly as usize * SCREEN_WIDTH + x as usize) * 3;
            self.framebuffer[offset..offset + 3].copy_from_slice(&rgb);
        }
    }

    fn next_line(&mut self) {
        self.dot = 0;
        if self.line.take().is_some_and(|line| line.window_drawn()) {
            self.window_line = self.window_line.wrapping_add(1);
        }
        self.regs.ly += 1;

        if self.regs.ly == VBLANK_LINE {
            self.mode = Mode::VBlank;
            self.frame_ready = true;
            self.requests.insert(InterruptFlags::VBLANK);
            // Hardware also raises STAT here when the mode 2 source is selected.
            if self.regs.stat.contains(Stat::MODE2_SELECT) {
                self.requests.insert(InterruptFlags::LCD);
            }
            log::trace!("GB PPU: entering VBlank");
        } else if self.regs.ly == LINES_PER_FRAME {
            self.regs.ly = 0;
            self.window_line = 0;
            self.window_armed = false;
            self.start_oam_scan();
        } else if self.regs.ly < VBLANK_LINE {
            self.start_oam_scan();
        }
    }

    fn update_stat_line(&mut self) {
        let coincidence = self.regs.ly == self.regs.lyc;
        self.regs.stat.set(Stat::COINCIDENCE, coincidence);

        let stat = self.regs.stat;
        let mode_source = match self.mode {
            Mode::HBlank => stat.contains(Stat::MODE0_SELECT),
            Mode::VBlank => stat.contains(Stat::MODE1_SELECT),
            Mode::OamScan => stat.contains(Stat::MODE2_SELECT),
            Mode::Drawing => false,
        };
        let line = self.regs.lcd_enabled()
            && (mode_source || (coincidence && stat.contains(Stat::LYC_SELECT)));
        if line && !self.stat_line {
            log::trace!("GB PPU: STAT interrupt at LY={} ({})", self.regs.ly, self.mode);
            self.requests.insert(InterruptFlags::LCD);
        }
        self.stat_line = line;
    }

    fn lcd_off(&mut self) {
        log::debug!("GB PPU: LCD off at LY={}", self.regs.ly);
        self.regs.ly = 0;
        self.dot = 0;
        self.mode = Mode::HBlank;
        self.line = None;
        self.stat_line = false;
        self.framebuffer.fill(DMG_SHADES[0]);
    }

    fn lcd_on(&mut self) {
        log::debug!("GB PPU: LCD on");
        self.regs.ly = 0;
        self.dot = 0;
        self.window_line = 0;
        self.window_armed = false;
        self.start_oam_scan();
    }

    fn vram_blocked(&self) -> bool {
        self.dma.is_transferring() || (self.regs.lcd_enabled() && self.mode == Mode::Drawing)
    }

    fn oam_blocked(&self) -> bool {
        self.dma.is_transferring()
            || (self.regs.lcd_enabled() && matches!(self.mode, Mode::OamScan | Mode::Drawing))
    }

    /// CPU read of 0x8000-0x9FFF; `None` while the PPU owns VRAM.
    pub(crate) fn read_vram(&self, address: u16) -> Option<u8> {
        if self.vram_blocked() {
            return None;
        }
        Some(self.peek_vram(address))
    }

    /// CPU write of 0x8000-0x9FFF; false when the write was dropped.
    pub(crate) fn write_vram(&mut self, address: u16, value: u8) -> bool {
        if self.vram_blocked() {
            return false;
        }
        self.vram[self.vram_bank as usize][(address & 0x1FFF) as usize] = value;
        true
    }

    /// VRAM in the selected bank, ignoring mode and DMA.
    pub(crate) fn peek_vram(&self, address: u16) -> u8 {
        self.vram[self.vram_bank as usize][(address & 0x1FFF) as usize]
    }

    /// CPU read of 0xFE00-0xFE9F; `None` while the PPU or DMA owns OAM.
    pub(crate) fn read_oam(&self, address: u16) -> Option<u8> {
        if self.oam_blocked() {
            return None;
        }
        Some(self.peek_oam(address))
    }

    pub(crate) fn write_oam(&mut self, address: u16, value: u8) -> bool {
        if self.oam_blocked() {
            return false;
        }
        self.oam[(address - 0xFE00) as usize % OAM_SIZE] = value;
        true
    }

    pub(crate) fn peek_oam(&self, address: u16) -> u8 {
        self.oam[(address - 0xFE00) as usize % OAM_SIZE]
    }

    /// Store one byte moved by OAM DMA.
    pub(crate) fn write_oam_dma(&mut self, offset: u8, value: u8) {
        if let Some(slot) = self.oam.get_mut(offset as usize) {
            *slot = value;
        }
    }

    /// Registers 0xFF40-0xFF4B.
    pub(crate) fn read_register(&self, address: u16) -> u8 {
        match address {
            LCDC => self.regs.lcdc.bits(),
            STAT => 0x80 | self.regs.stat.bits() | self.mode as u8,
            SCY => self.regs.scy,
            SCX => self.regs.scx,
            LY => self.regs.ly,
            LYC => self.regs.lyc,
            DMA => self.dma.register(),
            BGP => self.regs.bgp,
            OBP0 => self.regs.obp0,
            OBP1 => self.regs.obp1,
            WY => self.regs.wy,
            WX => self.regs.wx,
            _ => crate::OPEN_BUS,
        }
    }

    pub(crate) fn write_register(&mut self, address: u16, value: u8) {
        match address {
            LCDC => {
                let was_on = self.regs.lcd_enabled();
                self.regs.lcdc = Lcdc::from_bits_retain(value);
                match (was_on, self.regs.lcd_enabled()) {
                    (true, false) => self.lcd_off(),
                    (false, true) => self.lcd_on(),
                    _ => {}
                }
                self.update_stat_line();
            }
            STAT => {
                let writable = Stat::from_bits_truncate(value) & Stat::WRITABLE;
                self.regs.stat = self.regs.stat.difference(Stat::WRITABLE) | writable;
                self.update_stat_line();
            }
            SCY => self.regs.scy = value,
            SCX => self.regs.scx = value,
            LY => log::debug!("GB PPU: ignoring write 0x{value:02X} to LY"),
            LYC => {
                self.regs.lyc = value;
                self.update_stat_line();
            }
            DMA => self.dma.start(value),
            BGP => self.regs.bgp = value,
            OBP0 => self.regs.obp0 = value,
            OBP1 => self.regs.obp1 = value,
            WY => self.regs.wy = value,
            WX => self.regs.wx = value,
            _ => {}
        }
    }

    /// Color-only registers: VBK and the palette ports.
    pub(crate) fn read_color_register(&self, address: u16) -> u8 {
        match address {
            VBK => 0xFE | self.vram_bank,
            BCPS => self.bg_palettes.read_index(),
            OCPS => self.obj_palettes.read_index(),
            BCPD | OCPD if self.palettes_locked() => {
                log::debug!("GB PPU: palette data read during mode 3");
                crate::OPEN_BUS
            }
            BCPD => self.bg_palettes.read_data(),
            OCPD => self.obj_palettes.read_data(),
            _ => crate::OPEN_BUS,
        }
    }

    pub(crate) fn write_color_register(&mut self, address: u16, value: u8) {
        match address {
            VBK => self.vram_bank = value & 0x01,
            BCPS..=OCPD if self.palettes_locked() => {
                log::debug!(
                    "GB PPU: palette write 0x{value:02X} to 0x{address:04X} dropped during mode 3"
                );
            }
            BCPS => self.bg_palettes.write_index(value),
            OCPS => self.obj_palettes.write_index(value),
            BCPD => self.bg_palettes.write_data(value),
            OCPD => self.obj_palettes.write_data(value),
            _ => {}
        }
    }

    fn palettes_locked(&self) -> bool {
        self.regs.lcd_enabled() && self.mode == Mode::Drawing
    }
}
