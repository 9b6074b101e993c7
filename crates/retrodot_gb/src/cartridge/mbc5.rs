use super::rom::{ExternalRam, Rom};
use crate::OPEN_BUS;

/// MBC5 mapper: 9-bit ROM bank, up to 16 RAM banks.
///
/// Rumble boards reuse bit 3 of the RAM-bank register as the motor line,
/// leaving three bits for the bank.
#[derive(Clone, Debug)]
pub struct Mbc5 {
    rom: Rom,
    ram: ExternalRam,
    ram_enabled: bool,
    rom_bank: u16,
    ram_bank: u8,
    rumble: bool,
    motor_on: bool,
}

impl Mbc5 {
    pub fn new(rom: Rom) -> Self {
        let ram = ExternalRam::new(rom.header().ram_bank_count());
        let rumble = rom.header().cartridge_type.has_rumble();
        Self {
            rom,
            ram,
            ram_enabled: false,
            rom_bank: 1,
            ram_bank: 0,
            rumble,
            motor_on: false,
        }
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn motor_on(&self) -> bool {
        self.motor_on
    }

    pub fn read_rom(&self, address: u16) -> u8 {
        let bank = if address < 0x4000 {
            0
        } else {
            self.rom_bank as usize
        };
        self.rom.read(bank, address)
    }

    pub fn write_rom(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            // Bank 0 is selectable on MBC5.
            0x2000..=0x2FFF => self.rom_bank = (self.rom_bank & 0x100) | value as u16,
            0x3000..=0x3FFF => {
                self.rom_bank = (self.rom_bank & 0xFF) | (((value & 0x01) as u16) << 8);
            }
            0x4000..=0x5FFF => {
                if self.rumble {
                    let motor_on = value & 0x08 != 0;
                    if motor_on != self.motor_on {
                        log::debug!("GB cart: rumble motor {}", if motor_on { "on" } else { "off" });
                    }
                    self.motor_on = motor_on;
                    self.ram_bank = value & 0x07;
                } else {
                    self.ram_bank = value & 0x0F;
                }
            }
            _ => log::debug!("GB cart: MBC5 write 0x{value:02X} to 0x{address:04X} ignored"),
        }
    }

    pub fn read_ram(&self, address: u16) -> u8 {
        if !self.ram_enabled {
            return OPEN_BUS;
        }
        self.ram.read(self.ram_bank as usize, address)
    }

    pub fn write_ram(&mut self, address: u16, value: u8) {
        if !self.ram_enabled {
            return;
        }
        self.ram.write(self.ram_bank as usize, address, value);
    }
}
