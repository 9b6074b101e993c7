use std::fmt;

use bitflags::bitflags;

/// Size of the fixed header region at the start of bank 0.
pub const HEADER_END: usize = 0x0150;

const LOGO: std::ops::Range<usize> = 0x0104..0x0134;
const TITLE: std::ops::Range<usize> = 0x0134..0x0144;
const MANUFACTURER: std::ops::Range<usize> = 0x013F..0x0143;
const CGB_FLAG: usize = 0x0143;
const NEW_LICENSEE: std::ops::Range<usize> = 0x0144..0x0146;
const SGB_FLAG: usize = 0x0146;
const CARTRIDGE_TYPE: usize = 0x0147;
const ROM_SIZE: usize = 0x0148;
const RAM_SIZE: usize = 0x0149;
const DESTINATION: usize = 0x014A;
const OLD_LICENSEE: usize = 0x014B;
const VERSION: usize = 0x014C;
const HEADER_CHECKSUM: usize = 0x014D;
const GLOBAL_CHECKSUM: usize = 0x014E;

/// Memory bank controller family selected by the cartridge-type byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MbcKind {
    None,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc5,
    /// A controller we do not emulate; loaded as ROM-only.
    Unsupported,
}

bitflags! {
    /// Extra hardware advertised by the cartridge-type byte.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct CartridgeFeatures: u8 {
        const RAM = 0x01;
        const BATTERY = 0x02;
        const TIMER = 0x04;
        const RUMBLE = 0x08;
    }
}

/// Decoded cartridge-type byte (0x0147).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CartridgeType {
    pub code: u8,
    pub mbc: MbcKind,
    pub features: CartridgeFeatures,
}

impl CartridgeType {
    pub fn from_code(code: u8) -> Self {
        use CartridgeFeatures as F;

        let (mbc, features) = match code {
            0x00 => (MbcKind::None, F::empty()),
            0x01 => (MbcKind::Mbc1, F::empty()),
            0x02 => (MbcKind::Mbc1, F::RAM),
            0x03 => (MbcKind::Mbc1, F::RAM | F::BATTERY),
            0x05 => (MbcKind::Mbc2, F::empty()),
            0x06 => (MbcKind::Mbc2, F::BATTERY),
            0x08 => (MbcKind::None, F::RAM),
            0x09 => (MbcKind::None, F::RAM | F::BATTERY),
            0x0F => (MbcKind::Mbc3, F::TIMER | F::BATTERY),
            0x10 => (MbcKind::Mbc3, F::TIMER | F::RAM | F::BATTERY),
            0x11 => (MbcKind::Mbc3, F::empty()),
            0x12 => (MbcKind::Mbc3, F::RAM),
            0x13 => (MbcKind::Mbc3, F::RAM | F::BATTERY),
            0x19 => (MbcKind::Mbc5, F::empty()),
            0x1A => (MbcKind::Mbc5, F::RAM),
            0x1B => (MbcKind::Mbc5, F::RAM | F::BATTERY),
            0x1C => (MbcKind::Mbc5, F::RUMBLE),
            0x1D => (MbcKind::Mbc5, F::RUMBLE | F::RAM),
            0x1E => (MbcKind::Mbc5, F::RUMBLE | F::RAM | F::BATTERY),
            _ => (MbcKind::Unsupported, F::empty()),
        };

        Self {
            code,
            mbc,
            features,
        }
    }

    pub fn has_timer(&self) -> bool {
        self.features.contains(CartridgeFeatures::TIMER)
    }

    pub fn has_rumble(&self) -> bool {
        self.features.contains(CartridgeFeatures::RUMBLE)
    }

    pub fn has_battery(&self) -> bool {
        self.features.contains(CartridgeFeatures::BATTERY)
    }
}

impl fmt::Display for CartridgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.mbc {
            MbcKind::None => "ROM",
            MbcKind::Mbc1 => "MBC1",
            MbcKind::Mbc2 => "MBC2",
            MbcKind::Mbc3 => "MBC3",
            MbcKind::Mbc5 => "MBC5",
            MbcKind::Unsupported => return write!(f, "unsupported (0x{:02X})", self.code),
        };
        write!(f, "{name}")?;
        for (label, flag) in [
            ("TIMER", CartridgeFeatures::TIMER),
            ("RAM", CartridgeFeatures::RAM),
            ("BATTERY", CartridgeFeatures::BATTERY),
            ("RUMBLE", CartridgeFeatures::RUMBLE),
        ] {
            if self.features.contains(flag) {
                write!(f, "+{label}")?;
            }
        }
        Ok(())
    }
}

/// Parsed cartridge header (0x0100-0x014F).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RomHeader {
    pub logo: [u8; 0x30],
    pub title: String,
    pub manufacturer_code: String,
    pub cgb_flag: u8,
    pub new_licensee_code: [u8; 2],
    pub sgb_flag: u8,
    pub cartridge_type: CartridgeType,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
    pub destination_code: u8,
    pub old_licensee_code: u8,
    pub version: u8,
    pub header_checksum: u8,
    pub global_checksum: u16,
    computed_checksum: u8,
}

impl RomHeader {
    /// Parse the header out of a raw image. Images shorter than the header
    /// read as zero past their end.
    pub fn parse(image: &[u8]) -> Self {
        let mut raw = [0u8; HEADER_END];
        let len = image.len().min(HEADER_END);
        raw[..len].copy_from_slice(&image[..len]);

        let mut logo = [0u8; 0x30];
        logo.copy_from_slice(&raw[LOGO]);

        let cgb_flag = raw[CGB_FLAG];
        // Newer carts reuse the tail of the title for the manufacturer code
        // and CGB flag.
        let title_end = if cgb_flag & 0x80 != 0 {
            MANUFACTURER.start
        } else {
            TITLE.end
        };
        let title = ascii_field(&raw[TITLE.start..title_end]);
        let manufacturer_code = if cgb_flag & 0x80 != 0 {
            ascii_field(&raw[MANUFACTURER])
        } else {
            String::new()
        };

        Self {
            logo,
            title,
            manufacturer_code,
            cgb_flag,
            new_licensee_code: [raw[NEW_LICENSEE.start], raw[NEW_LICENSEE.start + 1]],
            sgb_flag: raw[SGB_FLAG],
            cartridge_type: CartridgeType::from_code(raw[CARTRIDGE_TYPE]),
            rom_size_code: raw[ROM_SIZE],
            ram_size_code: raw[RAM_SIZE],
            destination_code: raw[DESTINATION],
            old_licensee_code: raw[OLD_LICENSEE],
            version: raw[VERSION],
            header_checksum: raw[HEADER_CHECKSUM],
            global_checksum: u16::from_be_bytes([raw[GLOBAL_CHECKSUM], raw[GLOBAL_CHECKSUM + 1]]),
            computed_checksum: header_checksum(&raw),
        }
    }

    /// Number of 16 KiB ROM banks: `2 << code`.
    pub fn rom_bank_count(&self) -> usize {
        rom_banks_for_code(self.rom_size_code)
    }

    /// Number of 8 KiB RAM banks.
    pub fn ram_bank_count(&self) -> usize {
        ram_banks_for_code(self.ram_size_code)
    }

    pub fn supports_color(&self) -> bool {
        self.cgb_flag & 0x80 != 0
    }

    pub fn color_only(&self) -> bool {
        self.cgb_flag == 0xC0
    }

    pub fn supports_sgb(&self) -> bool {
        self.sgb_flag == 0x03
    }

    pub fn is_japanese(&self) -> bool {
        self.destination_code == 0x00
    }

    pub fn checksum_valid(&self) -> bool {
        self.computed_checksum == self.header_checksum
    }

    pub fn computed_checksum(&self) -> u8 {
        self.computed_checksum
    }

    /// Publisher name from the old or new licensee code.
    pub fn licensee(&self) -> &'static str {
        if self.old_licensee_code == 0x33 {
            new_licensee_name(self.new_licensee_code)
        } else {
            old_licensee_name(self.old_licensee_code)
        }
    }
}

impl fmt::Display for RomHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" [{}] rom={}x16KiB ram={}x8KiB licensee={} v{}",
            self.title,
            self.cartridge_type,
            self.rom_bank_count(),
            self.ram_bank_count(),
            self.licensee(),
            self.version
        )
    }
}

pub fn rom_banks_for_code(code: u8) -> usize {
    match code {
        0x00..=0x08 => 2usize << code,
        _ => {
            log::warn!("GB cart: unknown ROM size code 0x{code:02X}, assuming 2 banks");
            2
        }
    }
}

pub fn ram_banks_for_code(code: u8) -> usize {
    match code {
        0x00 => 0,
        // 2 KiB parts are backed by a full bank.
        0x01 => 1,
        0x02 => 1,
        0x03 => 4,
        0x04 => 16,
        0x05 => 8,
        _ => {
            log::warn!("GB cart: unknown RAM size code 0x{code:02X}, assuming no RAM");
            0
        }
    }
}

/// `x = x - byte - 1` over 0x0134..=0x014C.
fn header_checksum(raw: &[u8; HEADER_END]) -> u8 {
    raw[TITLE.start..=VERSION]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1))
}

fn ascii_field(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    bytes[..end]
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn old_licensee_name(code: u8) -> &'static str {
    match code {
        0x00 => "None",
        0x01 | 0x31 => "Nintendo",
        0x08 | 0x38 => "Capcom",
        0x09 => "HOT-B",
        0x0A | 0xE0 => "Jaleco",
        0x13 | 0x69 => "Electronic Arts",
        0x18 => "Hudson Soft",
        0x1F => "Virgin Games",
        0x24 => "PCM Complete",
        0x28 => "Kemco",
        0x34 | 0xA4 => "Konami",
        0x41 => "Ubi Soft",
        0x51 | 0xB0 => "Acclaim",
        0x52 => "Activision",
        0x54 => "Konami",
        0x67 => "Ocean",
        0x70 => "Infogrames",
        0x78 => "THQ",
        0x79 => "Accolade",
        0x8B => "Bullet-Proof Software",
        0x8C => "Vic Tokai",
        0x99 => "Pack-In-Video",
        0xA7 => "Takara",
        0xAF => "Namco",
        0xB1 => "ASCII or Nexsoft",
        0xB4 => "Enix",
        0xB6 => "HAL Laboratory",
        0xC0 => "Taito",
        0xC3 => "Squaresoft",
        0xC8 => "Koei",
        0xDA => "Tomy",
        0xE9 => "Natsume",
        0xEB => "Atlus",
        0xEC => "Epic/Sony Records",
        _ => "Unknown",
    }
}

fn new_licensee_name(code: [u8; 2]) -> &'static str {
    match &code {
        b"00" => "None",
        b"01" => "Nintendo R&D1",
        b"08" => "Capcom",
        b"13" => "Electronic Arts",
        b"18" => "Hudson Soft",
        b"19" => "b-ai",
        b"20" => "kss",
        b"22" => "pow",
        b"24" => "PCM Complete",
        b"25" => "san-x",
        b"28" => "Kemco Japan",
        b"29" => "seta",
        b"30" => "Viacom",
        b"31" => "Nintendo",
        b"32" => "Bandai",
        b"33" => "Ocean/Acclaim",
        b"34" => "Konami",
        b"35" => "Hector",
        b"37" => "Taito",
        b"38" => "Hudson",
        b"39" => "Banpresto",
        b"41" => "Ubi Soft",
        b"42" => "Atlus",
        b"44" => "Malibu",
        b"46" => "angel",
        b"47" => "Bullet-Proof",
        b"49" => "irem",
        b"50" => "Absolute",
        b"51" => "Acclaim",
        b"52" => "Activision",
        b"53" => "American sammy",
        b"54" => "Konami",
        b"55" => "Hi tech entertainment",
        b"56" => "LJN",
        b"57" => "Matchbox",
        b"58" => "Mattel",
        b"59" => "Milton Bradley",
        b"60" => "Titus",
        b"61" => "Virgin",
        b"64" => "LucasArts",
        b"67" => "Ocean",
        b"69" => "Electronic Arts",
        b"70" => "Infogrames",
        b"71" => "Interplay",
        b"72" => "Broderbund",
        b"73" => "sculptured",
        b"75" => "sci",
        b"78" => "THQ",
        b"79" => "Accolade",
        b"80" => "misawa",
        b"83" => "lozc",
        b"86" => "Tokuma Shoten Intermedia",
        b"87" => "Tsukuda Original",
        b"91" => "Chunsoft",
        b"92" => "Video system",
        b"93" => "Ocean/Acclaim",
        b"95" => "Varie",
        b"96" => "Yonezawa/s'pal",
        b"97" => "Kaneko",
        b"99" => "Pack in soft",
        b"A4" => "Konami (Yu-Gi-Oh!)",
        _ => "Unknown",
    }
}
