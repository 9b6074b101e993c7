use core::fmt;

use bitflags::bitflags;

pub(crate) const LCDC: u16 = 0xFF40;
pub(crate) const STAT: u16 = 0xFF41;
pub(crate) const SCY: u16 = 0xFF42;
pub(crate) const SCX: u16 = 0xFF43;
pub(crate) const LY: u16 = 0xFF44;
pub(crate) const LYC: u16 = 0xFF45;
pub(crate) const DMA: u16 = 0xFF46;
pub(crate) const BGP: u16 = 0xFF47;
pub(crate) const OBP0: u16 = 0xFF48;
pub(crate) const OBP1: u16 = 0xFF49;
pub(crate) const WY: u16 = 0xFF4A;
pub(crate) const WX: u16 = 0xFF4B;
pub(crate) const VBK: u16 = 0xFF4F;
pub(crate) const BCPS: u16 = 0xFF68;
pub(crate) const BCPD: u16 = 0xFF69;
pub(crate) const OCPS: u16 = 0xFF6A;
pub(crate) const OCPD: u16 = 0xFF6B;

bitflags! {
    /// LCD control (0xFF40).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Lcdc: u8 {
        const LCD_ENABLE = 0x80;
        const WINDOW_MAP = 0x40;
        const WINDOW_ENABLE = 0x20;
        /// Unsigned tile addressing from 0x8000.
        const TILE_DATA = 0x10;
        const BG_MAP = 0x08;
        const OBJ_TALL = 0x04;
        const OBJ_ENABLE = 0x02;
        /// BG/window enable on DMG, BG priority master switch on CGB.
        const BG_ENABLE = 0x01;
    }
}

bitflags! {
    /// Writable STAT bits plus the coincidence flag.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Stat: u8 {
        const LYC_SELECT = 0x40;
        const MODE2_SELECT = 0x20;
        const MODE1_SELECT = 0x10;
        const MODE0_SELECT = 0x08;
        const COINCIDENCE = 0x04;
    }
}

impl Stat {
    pub(crate) const WRITABLE: Stat = Stat::LYC_SELECT
        .union(Stat::MODE2_SELECT)
        .union(Stat::MODE1_SELECT)
        .union(Stat::MODE0_SELECT);
}

/// PPU scanline mode as reported in STAT bits 0-1.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Drawing = 3,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::HBlank => write!(f, "HBlank"),
            Mode::VBlank => write!(f, "VBlank"),
            Mode::OamScan => write!(f, "OAM scan"),
            Mode::Drawing => write!(f, "Drawing"),
        }
    }
}

/// The plain LCD registers.
#[derive(Clone, Debug)]
pub(crate) struct LcdRegisters {
    pub lcdc: Lcdc,
    pub stat: Stat,
    pub scy: u8,
    pub scx: u8,
    pub ly: u8,
    pub lyc: u8,
    pub wy: u8,
    pub wx: u8,
    pub bgp: u8,
    pub obp0: u8,
    pub obp1: u8,
}

impl Default for LcdRegisters {
    fn default() -> Self {
        Self {
            lcdc: Lcdc::from_bits_retain(0x91),
            stat: Stat::empty(),
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            wy: 0,
            wx: 0,
            bgp: 0xFC,
            obp0: 0,
            obp1: 0,
        }
    }
}

impl LcdRegisters {
    #[inline]
    pub fn lcd_enabled(&self) -> bool {
        self.lcdc.contains(Lcdc::LCD_ENABLE)
    }

    #[inline]
    pub fn obj_height(&self) -> u8 {
        if self.lcdc.contains(Lcdc::OBJ_TALL) {
            16
        } else {
            8
        }
    }
}
