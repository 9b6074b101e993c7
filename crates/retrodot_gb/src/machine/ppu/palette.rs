/// Grey levels for DMG shades 0-3.
pub const DMG_SHADES: [u8; 4] = [0xFF, 0xAA, 0x55, 0x00];

/// Map a color index through a DMG palette register (BGP/OBP0/OBP1).
#[inline]
pub fn dmg_shade(palette: u8, color: u8) -> u8 {
    (palette >> ((color & 0x03) * 2)) & 0x03
}

/// RGB24 triple for a DMG palette lookup.
#[inline]
pub fn dmg_rgb(palette: u8, color: u8) -> [u8; 3] {
    let grey = DMG_SHADES[dmg_shade(palette, color) as usize];
    [grey, grey, grey]
}

/// Eight 4-color palettes of little-endian RGB555 entries, reached through
/// an index register (BCPS/OCPS) and a data port (BCPD/OCPD).
#[derive(Clone, Debug)]
pub(crate) struct ColorPalettes {
    data: [u8; 64],
    index: u8,
    auto_increment: bool,
}

impl Default for ColorPalettes {
    fn default() -> Self {
        Self {
            data: [0xFF; 64],
            index: 0,
            auto_increment: false,
        }
    }
}

impl ColorPalettes {
    pub fn read_index(&self) -> u8 {
        let increment = if self.auto_increment { 0x80 } else { 0 };
        increment | 0x40 | self.index
    }

    pub fn write_index(&mut self, value: u8) {
        self.index = value & 0x3F;
        self.auto_increment = value & 0x80 != 0;
    }

    pub fn read_data(&self) -> u8 {
        self.data[self.index as usize]
    }

    pub fn write_data(&mut self, value: u8) {
        self.data[self.index as usize] = value;
        if self.auto_increment {
            self.index = (self.index + 1) & 0x3F;
        }
    }

    /// Raw RGB555 entry for `color` of `palette`.
    pub fn entry(&self, palette: u8, color: u8) -> u16 {
        let offset = ((palette & 0x07) as usize * 4 + (color & 0x03) as usize) * 2;
        u16::from_le_bytes([self.data[offset], self.data[offset + 1]])
    }

    /// RGB24 triple, each 5-bit channel widened to 8 bits.
    pub fn rgb(&self, palette: u8, color: u8) -> [u8; 3] {
        let entry = self.entry(palette, color);
        let widen = |c: u16| {
            let c = (c & 0x1F) as u8;
            (c << 3) | (c >> 2)
        };
        [widen(entry), widen(entry >> 5), widen(entry >> 10)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dmg_palette_maps_each_index() {
        // 0xE4: 3,2,1,0 from the top pair down.
        assert_eq!(dmg_shade(0xE4, 0), 0);
        assert_eq!(dmg_shade(0xE4, 3), 3);
        assert_eq!(dmg_rgb(0xE4, 1), [0xAA; 3]);
        assert_eq!(dmg_rgb(0x1B, 0), [0x00; 3]);
    }

    #[test]
    fn auto_increment_walks_the_data_port() {
        let mut palettes = ColorPalettes::default();
        palettes.write_index(0x80 | 0x08);
        palettes.write_data(0x1F);
        palettes.write_data(0x00);
        assert_eq!(palettes.read_index(), 0xCA);

        // Palette 1, color 0 is pure red.
        assert_eq!(palettes.entry(1, 0), 0x001F);
        assert_eq!(palettes.rgb(1, 0), [0xFF, 0x00, 0x00]);
    }

    #[test]
    fn index_wraps_within_sixty_four_bytes() {
        let mut palettes = ColorPalettes::default();
        palettes.write_index(0xBF);
        palettes.write_data(0x12);
        assert_eq!(palettes.read_index(), 0xC0);
        palettes.write_index(0x3F);
        assert_eq!(palettes.read_data(), 0x12);
        assert_eq!(palettes.read_index(), 0x7F);
    }
}
