mod header;
mod mbc1;
mod mbc2;
mod mbc3;
mod mbc5;
mod no_mbc;
mod rom;
mod rtc;


use std::path::Path;

use anyhow::{bail, Context, Result};

pub use header::{CartridgeFeatures, CartridgeType, MbcKind, RomHeader};
pub use mbc1::Mbc1;
pub use mbc2::Mbc2;
pub use mbc3::{Clock, Mbc3};
pub use mbc5::Mbc5;
pub use no_mbc::NoMbc;
pub use rom::{ExternalRam, Rom, RAM_BANK_SIZE, ROM_BANK_SIZE};
pub use rtc::{Rtc, RtcRegisters};

use crate::OPEN_BUS;

/// A loaded cartridge, dispatched by mapper type.
#[derive(Clone, Debug)]
pub enum Cartridge {
    NoMbc(NoMbc),
    Mbc1(Mbc1),
    Mbc2(Mbc2),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

impl Cartridge {
    /// Read a ROM image from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = std::fs::read(path)
            .with_context(|| format!("failed to read ROM image {}", path.display()))?;
        Self::from_bytes(&image).with_context(|| format!("failed to load {}", path.display()))
    }

    /// Build the mapper named by the header's cartridge-type byte.
    ///
    /// Unsupported mappers fall back to ROM-only mapping.
    pub fn from_bytes(image: &[u8]) -> Result<Self> {
        if image.is_empty() {
            bail!("ROM image is empty");
        }

        let rom = Rom::new(image);
        let header = rom.header();
        log::info!("GB cart: {header}");
        if !header.checksum_valid() {
            log::warn!(
                "GB cart: header checksum mismatch (stored 0x{:02X}, computed 0x{:02X})",
                header.header_checksum,
                header.computed_checksum()
            );
        }

        let ty = header.cartridge_type;
        let cartridge = match ty.mbc {
            MbcKind::None => Cartridge::NoMbc(NoMbc::new(rom)),
            MbcKind::Mbc1 => Cartridge::Mbc1(Mbc1::new(rom)),
            MbcKind::Mbc2 => Cartridge::Mbc2(Mbc2::new(rom)),
            MbcKind::Mbc3 => Cartridge::Mbc3(Mbc3::new(rom)),
            MbcKind::Mbc5 => Cartridge::Mbc5(Mbc5::new(rom)),
            MbcKind::Unsupported => {
                log::warn!(
                    "GB cart: unsupported cartridge type 0x{:02X}, mapping as ROM only",
                    ty.code
                );
                Cartridge::NoMbc(NoMbc::new(rom))
            }
        };
        Ok(cartridge)
    }

    pub fn rom(&self) -> &Rom {
        match self {
            Cartridge::NoMbc(m) => m.rom(),
            Cartridge::Mbc1(m) => m.rom(),
            Cartridge::Mbc2(m) => m.rom(),
            Cartridge::Mbc3(m) => m.rom(),
            Cartridge::Mbc5(m) => m.rom(),
        }
    }

    pub fn header(&self) -> &RomHeader {
        self.rom().header()
    }

    /// Read from 0x0000-0x7FFF or 0xA000-0xBFFF.
    pub fn read_byte(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x7FFF => match self {
                Cartridge::NoMbc(m) => m.read_rom(address),
                Cartridge::Mbc1(m) => m.read_rom(address),
                Cartridge::Mbc2(m) => m.read_rom(address),
                Cartridge::Mbc3(m) => m.read_rom(address),
                Cartridge::Mbc5(m) => m.read_rom(address),
            },
            0xA000..=0xBFFF => match self {
                Cartridge::NoMbc(m) => m.read_ram(address),
                Cartridge::Mbc1(m) => m.read_ram(address),
                Cartridge::Mbc2(m) => m.read_ram(address),
                Cartridge::Mbc3(m) => m.read_ram(address),
                Cartridge::Mbc5(m) => m.read_ram(address),
            },
            _ => {
                log::warn!("GB cart: read outside cartridge space at 0x{address:04X}");
                OPEN_BUS
            }
        }
    }

    /// Writes to the ROM window reach the mapper's control registers.
    pub fn write_byte(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x7FFF => match self {
                Cartridge::NoMbc(m) => m.write_rom(address, value),
                Cartridge::Mbc1(m) => m.write_rom(address, value),
                Cartridge::Mbc2(m) => m.write_rom(address, value),
                Cartridge::Mbc3(m) => m.write_rom(address, value),
                Cartridge::Mbc5(m) => m.write_rom(address, value),
            },
            0xA000..=0xBFFF => match self {
                Cartridge::NoMbc(m) => m.write_ram(address, value),
                Cartridge::Mbc1(m) => m.write_ram(address, value),
                Cartridge::Mbc2(m) => m.write_ram(address, value),
                Cartridge::Mbc3(m) => m.write_ram(address, value),
                Cartridge::Mbc5(m) => m.write_ram(address, value),
            },
            _ => log::warn!("GB cart: write outside cartridge space at 0x{address:04X}"),
        }
    }
}
