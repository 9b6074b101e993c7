use retrodot_common::Issue;

use super::super::MemoryBus;
use super::{prohibited, unmapped, wrong_mode, BOOT_ROM_DISABLE, JOYP, KEY1, SB, SC, SVBK};
use crate::cpu::{InterruptFlags, IF_ADDRESS};
use crate::machine::apu::{AUDIO_END, AUDIO_START};
use crate::machine::ppu::{BCPS, BGP, LCDC, OBP0, OBP1, OCPD, VBK, WX};
use crate::machine::timer::{DIV, TAC};

impl MemoryBus {
    /// Decode a CPU write. Dropped writes are only logged; `Err` carries
    /// an issue to report.
    pub(crate) fn write_checked(&mut self, address: u16, value: u8) -> Result<(), Issue> {
        match address {
            // ROM writes drive the mapper registers.
            0x0000..=0x7FFF | 0xA000..=0xBFFF => self.cartridge.write_byte(address, value),

            0x8000..=0x9FFF => {
                if !self.ppu.write_vram(address, value) {
                    log::debug!("GB bus: VRAM write 0x{value:02X} at 0x{address:04X} dropped");
                }
            }

            0xC000..=0xDFFF => self.wram_write(address, value),

            0xE000..=0xFDFF => {
                log::debug!("GB bus: echo RAM write at 0x{address:04X}");
                self.wram_write(address, value);
            }

            0xFE00..=0xFE9F => {
                if !self.ppu.write_oam(address, value) {
                    log::debug!("GB bus: OAM write 0x{value:02X} at 0x{address:04X} dropped");
                }
            }

            0xFEA0..=0xFEFF => return Err(prohibited(address, "write")),

            0xFF00..=0xFF7F => return self.write_io(address, value),

            0xFF80..=0xFFFE => self.hram[(address - 0xFF80) as usize] = value,

            0xFFFF => self.ie = value,
        }
        Ok(())
    }

    fn write_io(&mut self, address: u16, value: u8) -> Result<(), Issue> {
        match address {
            JOYP => self.joypad.write(value),
            SB => self.serial.write_sb(value),
            SC => {
                if self.serial.write_sc(value) {
                    self.interrupt_flag |= InterruptFlags::SERIAL;
                }
            }
            DIV..=TAC => self.timer.write(address, value),
            IF_ADDRESS => self.interrupt_flag = InterruptFlags::from_bits_truncate(value),
            AUDIO_START..=AUDIO_END => self.audio.write(address, value),

            BGP | OBP0 | OBP1 if self.color => return Err(wrong_mode(address, true)),
            LCDC..=WX => self.ppu.write_register(address, value),

            KEY1 | VBK | BCPS..=OCPD | SVBK if !self.color => {
                return Err(wrong_mode(address, false))
            }
            KEY1 => log::debug!("GB bus: speed switch request 0x{value:02X} ignored"),
            VBK | BCPS..=OCPD => self.ppu.write_color_register(address, value),
            SVBK => {
                self.svbk = value & 0x07;
                log::trace!("GB bus: WRAM bank {}", self.wram_bank());
            }

            BOOT_ROM_DISABLE => {}

            _ => return Err(unmapped(address, "write")),
        }
        Ok(())
    }
}
