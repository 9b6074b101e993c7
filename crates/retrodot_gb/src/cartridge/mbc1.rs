use super::rom::{ExternalRam, Rom};
use crate::OPEN_BUS;

/// Bank that carries the second boot-logo copy on MBC1M multicarts.
const MULTICART_PROBE_BANK: usize = 0x10;

/// MBC1 mapper state.
///
/// The 5-bit BANK1 register selects the switchable ROM bank; the 2-bit
/// BANK2 register either extends it or selects a RAM bank, depending on the
/// banking mode. On MBC1M multicarts BANK1 only contributes 4 bits and BANK2
/// shifts in at bit 4.
#[derive(Clone, Debug)]
pub struct Mbc1 {
    rom: Rom,
    ram: ExternalRam,
    ram_enabled: bool,
    bank1: u8,
    bank2: u8,
    advanced_mode: bool,
    multicart: bool,
}

impl Mbc1 {
    pub fn new(rom: Rom) -> Self {
        let multicart = detect_multicart(&rom);
        if multicart {
            log::info!("GB cart: MBC1M multicart wiring detected");
        }
        let ram = ExternalRam::new(rom.header().ram_bank_count());
        Self {
            rom,
            ram,
            ram_enabled: false,
            bank1: 1,
            bank2: 0,
            advanced_mode: false,
            multicart,
        }
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn is_multicart(&self) -> bool {
        self.multicart
    }

    fn bank2_shift(&self) -> u32 {
        if self.multicart {
            4
        } else {
            5
        }
    }

    fn bank1_value(&self) -> usize {
        if self.multicart {
            (self.bank1 & 0x0F) as usize
        } else {
            self.bank1 as usize
        }
    }

    /// Bank mapped at 0x0000-0x3FFF: zero, or BANK2 in mode 1.
    fn low_rom_bank(&self) -> usize {
        if self.advanced_mode {
            (self.bank2 as usize) << self.bank2_shift()
        } else {
            0
        }
    }

    /// Bank mapped at 0x4000-0x7FFF.
    fn high_rom_bank(&self) -> usize {
        ((self.bank2 as usize) << self.bank2_shift()) | self.bank1_value()
    }

    fn ram_bank(&self) -> usize {
        if self.advanced_mode {
            self.bank2 as usize
        } else {
            0
        }
    }

    pub fn read_rom(&self, address: u16) -> u8 {
        let bank = if address < 0x4000 {
            self.low_rom_bank()
        } else {
            self.high_rom_bank()
        };
        self.rom.read(bank, address)
    }

    pub fn write_rom(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                // Zero is checked on the full 5-bit value, before any
                // multicart masking.
                self.bank1 = value & 0x1F;
                if self.bank1 == 0 {
                    self.bank1 = 1;
                }
            }
            0x4000..=0x5FFF => self.bank2 = value & 0x03,
            _ => self.advanced_mode = value & 0x01 != 0,
        }
    }

    pub fn read_ram(&self, address: u16) -> u8 {
        if !self.ram_enabled {
            log::debug!("GB cart: MBC1 RAM read at 0x{address:04X} while disabled");
            return OPEN_BUS;
        }
        self.ram.read(self.ram_bank(), address)
    }

    pub fn write_ram(&mut self, address: u16, value: u8) {
        if !self.ram_enabled {
            log::debug!("GB cart: MBC1 RAM write at 0x{address:04X} while disabled");
            return;
        }
        self.ram.write(self.ram_bank(), address, value);
    }
}

/// MBC1M boards repeat the boot logo at the start of each 256 KiB game.
fn detect_multicart(rom: &Rom) -> bool {
    if rom.bank_count() <= MULTICART_PROBE_BANK {
        return false;
    }
    let logo = &rom.header().logo;
    if logo.iter().all(|&b| b == 0) {
        return false;
    }
    &rom.bank(MULTICART_PROBE_BANK)[0x0104..0x0134] == logo
}
