use super::rom::Rom;
use crate::OPEN_BUS;

const RAM_SIZE: usize = 0x200;

/// MBC2 mapper with its built-in 512 x 4-bit RAM.
#[derive(Clone, Debug)]
pub struct Mbc2 {
    rom: Rom,
    ram: [u8; RAM_SIZE],
    ram_enabled: bool,
    rom_bank: u8,
}

impl Mbc2 {
    pub fn new(rom: Rom) -> Self {
        Self {
            rom,
            ram: [0x0F; RAM_SIZE],
            ram_enabled: false,
            rom_bank: 1,
        }
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn read_rom(&self, address: u16) -> u8 {
        let bank = if address < 0x4000 {
            0
        } else {
            self.rom_bank as usize
        };
        self.rom.read(bank, address)
    }

    /// Address bit 8 picks the register inside 0x0000-0x3FFF: clear for
    /// RAM enable, set for the ROM bank.
    pub fn write_rom(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x3FFF if address & 0x0100 == 0 => {
                self.ram_enabled = value & 0x0F == 0x0A;
            }
            0x0000..=0x3FFF => {
                self.rom_bank = value & 0x0F;
                if self.rom_bank == 0 {
                    self.rom_bank = 1;
                }
            }
            _ => log::debug!("GB cart: MBC2 write 0x{value:02X} to 0x{address:04X} ignored"),
        }
    }

    /// Only the low nibble is stored; the upper nibble reads as set.
    pub fn read_ram(&self, address: u16) -> u8 {
        if !self.ram_enabled {
            return OPEN_BUS;
        }
        0xF0 | self.ram[address as usize & (RAM_SIZE - 1)]
    }

    pub fn write_ram(&mut self, address: u16, value: u8) {
        if !self.ram_enabled {
            return;
        }
        self.ram[address as usize & (RAM_SIZE - 1)] = value & 0x0F;
    }
}
