use std::time::SystemTime;

use super::rom::{ExternalRam, Rom};
use super::rtc::{Rtc, RTC_DAY_HIGH, RTC_SECONDS};
use crate::OPEN_BUS;

/// Source of wall-clock time for the RTC.
pub type Clock = fn() -> SystemTime;

/// MBC3 mapper with optional real-time clock.
#[derive(Clone, Debug)]
pub struct Mbc3 {
    rom: Rom,
    ram: ExternalRam,
    ram_enabled: bool,
    rom_bank: u8,
    /// 0x00-0x03 select a RAM bank, 0x08-0x0C an RTC register.
    select: u8,
    last_latch_write: u8,
    rtc: Option<Rtc>,
    clock: Clock,
}

impl Mbc3 {
    pub fn new(rom: Rom) -> Self {
        Self::with_clock(rom, SystemTime::now)
    }

    pub fn with_clock(rom: Rom, clock: Clock) -> Self {
        let header = rom.header();
        let ram = ExternalRam::new(header.ram_bank_count());
        let rtc = header.cartridge_type.has_timer().then(|| Rtc::new(clock()));
        Self {
            rom,
            ram,
            ram_enabled: false,
            rom_bank: 1,
            select: 0,
            last_latch_write: 0xFF,
            rtc,
            clock,
        }
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn rtc(&self) -> Option<&Rtc> {
        self.rtc.as_ref()
    }

    pub fn rtc_mut(&mut self) -> Option<&mut Rtc> {
        self.rtc.as_mut()
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
            0x2000..=0x3FFF => {
                self.rom_bank = value & 0x7F;
                if self.rom_bank == 0 {
                    self.rom_bank = 1;
                }
            }
            0x4000..=0x5FFF => self.select = value,
            _ => {
                if self.last_latch_write == 0x00 && value == 0x01 {
                    let now = (self.clock)();
                    if let Some(rtc) = self.rtc.as_mut() {
                        rtc.sync(now);
                        rtc.latch();
                    }
                }
                self.last_latch_write = value;
            }
        }
    }

    pub fn read_ram(&self, address: u16) -> u8 {
        if !self.ram_enabled {
            return OPEN_BUS;
        }
        match self.select {
            0x00..=0x03 => self.ram.read(self.select as usize, address),
            RTC_SECONDS..=RTC_DAY_HIGH => self
                .rtc
                .as_ref()
                .map_or(OPEN_BUS, |rtc| rtc.read(self.select)),
            _ => {
                log::debug!("GB cart: MBC3 read with unmapped select 0x{:02X}", self.select);
                OPEN_BUS
            }
        }
    }

    pub fn write_ram(&mut self, address: u16, value: u8) {
        if !self.ram_enabled {
            return;
        }
        match self.select {
            0x00..=0x03 => self.ram.write(self.select as usize, address, value),
            RTC_SECONDS..=RTC_DAY_HIGH => {
                let now = (self.clock)();
                if let Some(rtc) = self.rtc.as_mut() {
                    rtc.sync(now);
                    rtc.write(self.select, value);
                }
            }
            _ => log::debug!("GB cart: MBC3 write with unmapped select 0x{:02X}", self.select),
        }
    }
}
