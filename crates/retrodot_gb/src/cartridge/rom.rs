use super::header::RomHeader;
use crate::OPEN_BUS;

pub const ROM_BANK_SIZE: usize = 0x4000;
pub const RAM_BANK_SIZE: usize = 0x2000;

/// Cartridge ROM split into 16 KiB banks.
#[derive(Clone, Debug)]
pub struct Rom {
    header: RomHeader,
    banks: Vec<Box<[u8; ROM_BANK_SIZE]>>,
}

impl Rom {
    /// Partition `image` into banks.
    ///
    /// The bank count is the larger of what the header declares and what
    /// the image holds; missing bytes read as zero.
    pub fn new(image: &[u8]) -> Self {
        let header = RomHeader::parse(image);
        let in_image = image.len().div_ceil(ROM_BANK_SIZE);
        let declared = header.rom_bank_count();
        if in_image < declared || image.len() % ROM_BANK_SIZE != 0 {
            log::warn!(
                "GB cart: image is {} bytes, header declares {} banks; padding with zeros",
                image.len(),
                declared
            );
        }

        let count = declared.max(in_image).max(2);
        let banks = (0..count)
            .map(|index| {
                let mut bank = Box::new([0u8; ROM_BANK_SIZE]);
                let start = index * ROM_BANK_SIZE;
                if start < image.len() {
                    let end = (start + ROM_BANK_SIZE).min(image.len());
                    bank[..end - start].copy_from_slice(&image[start..end]);
                }
                bank
            })
            .collect();

        Self { header, banks }
    }

    pub fn header(&self) -> &RomHeader {
        &self.header
    }

    pub fn bank_count(&self) -> usize {
        self.banks.len()
    }

    /// Fold a selected bank number into the banks that actually exist.
    #[inline]
    pub fn wrap_bank(&self, bank: usize) -> usize {
        bank % self.banks.len()
    }

    pub fn bank(&self, bank: usize) -> &[u8] {
        &self.banks[self.wrap_bank(bank)][..]
    }

    /// Byte at `offset` (taken modulo 16 KiB) inside `bank`.
    #[inline]
    pub fn read(&self, bank: usize, offset: u16) -> u8 {
        self.banks[self.wrap_bank(bank)][offset as usize & (ROM_BANK_SIZE - 1)]
    }
}

/// Cartridge RAM split into 8 KiB banks.
#[derive(Clone, Debug)]
pub struct ExternalRam {
    data: Vec<u8>,
    banks: usize,
}

impl ExternalRam {
    pub fn new(banks: usize) -> Self {
        Self {
            data: vec![0xFF; banks * RAM_BANK_SIZE],
            banks,
        }
    }

    pub fn bank_count(&self) -> usize {
        self.banks
    }

    pub fn is_present(&self) -> bool {
        self.banks > 0
    }

    fn index(&self, bank: usize, address: u16) -> Option<usize> {
        if self.banks == 0 {
            return None;
        }
        let bank = bank % self.banks;
        Some(bank * RAM_BANK_SIZE + (address as usize & (RAM_BANK_SIZE - 1)))
    }

    pub fn read(&self, bank: usize, address: u16) -> u8 {
        self.index(bank, address)
            .map_or(OPEN_BUS, |index| self.data[index])
    }

    pub fn write(&mut self, bank: usize, address: u16, value: u8) {
        if let Some(index) = self.index(bank, address) {
            self.data[index] = value;
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
