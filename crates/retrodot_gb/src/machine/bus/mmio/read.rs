use retrodot_common::Issue;

use super::super::MemoryBus;
use super::{prohibited, unmapped, wrong_mode, BOOT_ROM_DISABLE, JOYP, KEY1, SB, SC, SVBK};
use crate::cpu::IF_ADDRESS;
use crate::machine::apu::{AUDIO_END, AUDIO_START};
use crate::machine::ppu::{BCPS, BGP, LCDC, OBP0, OBP1, OCPD, VBK, WX};
use crate::machine::timer::{DIV, TAC};
use crate::OPEN_BUS;

impl MemoryBus {
    /// Decode a CPU read. `Err` carries an issue to report; the CPU then
    /// sees open bus.
    pub(crate) fn read_checked(&self, address: u16) -> Result<u8, Issue> {
        let value = match address {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => self.cartridge.read_byte(address),

            // Blocked while the PPU draws or DMA runs.
            0x8000..=0x9FFF => self.ppu.read_vram(address).unwrap_or_else(|| {
                log::debug!("GB bus: VRAM read at 0x{address:04X} while blocked");
                OPEN_BUS
            }),

            0xC000..=0xDFFF => self.wram_read(address),

            0xE000..=0xFDFF => {
                log::debug!("GB bus: echo RAM read at 0x{address:04X}");
                self.wram_read(address)
            }

            0xFE00..=0xFE9F => self.ppu.read_oam(address).unwrap_or_else(|| {
                log::debug!("GB bus: OAM read at 0x{address:04X} while blocked");
                OPEN_BUS
            }),

            0xFEA0..=0xFEFF => return Err(prohibited(address, "read")),

            0xFF00..=0xFF7F => return self.read_io(address),

            0xFF80..=0xFFFE => self.hram[(address - 0xFF80) as usize],

            0xFFFF => self.ie,
        };
        Ok(value)
    }

    fn read_io(&self, address: u16) -> Result<u8, Issue> {
        let value = match address {
            JOYP => self.joypad.read(),
            SB => self.serial.read_sb(),
            SC => self.serial.read_sc(),
            DIV..=TAC => self.timer.read(address),
            IF_ADDRESS => 0xE0 | self.interrupt_flag.bits(),
            AUDIO_START..=AUDIO_END => self.audio.read(address),

            BGP | OBP0 | OBP1 if self.color => return Err(wrong_mode(address, true)),
            LCDC..=WX => self.ppu.read_register(address),

            KEY1 | VBK | BCPS..=OCPD | SVBK if !self.color => {
                return Err(wrong_mode(address, false))
            }
            // No double-speed mode: KEY1 always reports normal speed.
            KEY1 => 0x7E,
            VBK | BCPS..=OCPD => self.ppu.read_color_register(address),
            SVBK => 0xF8 | self.svbk,

            BOOT_ROM_DISABLE => OPEN_BUS,

            _ => return Err(unmapped(address, "read")),
        };
        Ok(value)
    }
}
