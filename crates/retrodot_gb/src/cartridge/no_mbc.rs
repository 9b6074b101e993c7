use super::rom::{ExternalRam, Rom};

/// ROM-only cartridge: two fixed banks and at most one RAM bank.
#[derive(Clone, Debug)]
pub struct NoMbc {
    rom: Rom,
    ram: ExternalRam,
}

impl NoMbc {
    pub fn new(rom: Rom) -> Self {
        let ram_banks = rom.header().ram_bank_count().min(1);
        if rom.bank_count() > 2 {
            log::warn!(
                "GB cart: ROM-only image has {} banks, only 0 and 1 are visible",
                rom.bank_count()
            );
        }
        Self {
            rom,
            ram: ExternalRam::new(ram_banks),
        }
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn read_rom(&self, address: u16) -> u8 {
        let bank = usize::from(address >= 0x4000);
        self.rom.read(bank, address)
    }

    pub fn write_rom(&mut self, address: u16, value: u8) {
        log::debug!("GB cart: ROM-only write 0x{value:02X} to 0x{address:04X} ignored");
    }

    pub fn read_ram(&self, address: u16) -> u8 {
        self.ram.read(0, address)
    }

    pub fn write_ram(&mut self, address: u16, value: u8) {
        self.ram.write(0, address, value);
    }
}
