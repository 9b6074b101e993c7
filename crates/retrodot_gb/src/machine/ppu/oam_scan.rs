/// Objects the PPU can draw on one line.
pub(crate) const MAX_SPRITES_PER_LINE: usize = 10;

const OAM_ENTRIES: u8 = 40;

/// An object picked during OAM scan.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct SpriteEntry {
    pub oam_index: u8,
    /// OAM byte 0: screen Y + 16.
    pub y: u8,
    /// OAM byte 1: screen X + 8.
    pub x: u8,
}

impl SpriteEntry {
    /// Row of the object that falls on `ly`.
    #[inline]
    pub fn row(&self, ly: u8) -> u8 {
        ly.wrapping_add(16).wrapping_sub(self.y)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ScanStep {
    ReadY,
    Compare,
}

/// Mode 2: two dots per OAM entry, 40 entries, 80 dots.
#[derive(Clone, Debug)]
pub(crate) struct OamScan {
    index: u8,
    step: ScanStep,
    y: u8,
    selected: Vec<SpriteEntry>,
}

impl Default for OamScan {
    fn default() -> Self {
        Self {
            index: 0,
            step: ScanStep::ReadY,
            y: 0,
            selected: Vec::with_capacity(MAX_SPRITES_PER_LINE),
        }
    }
}

impl OamScan {
    pub fn reset(&mut self) {
        self.index = 0;
        self.step = ScanStep::ReadY;
        self.selected.clear();
    }

    pub fn is_done(&self) -> bool {
        self.index >= OAM_ENTRIES
    }

    pub fn tick(&mut self, oam: &[u8], ly: u8, height: u8) {
        if self.is_done() {
            return;
        }
        let base = self.index as usize * 4;
        match self.step {
            ScanStep::ReadY => {
                self.y = oam[base];
                self.step = ScanStep::Compare;
            }
            ScanStep::Compare => {
                let top = ly as u16 + 16;
                let y = self.y as u16;
                if self.selected.len() < MAX_SPRITES_PER_LINE && top >= y && top < y + height as u16
                {
                    self.selected.push(SpriteEntry {
                        oam_index: self.index,
                        y: self.y,
                        x: oam[base + 1],
                    });
                }
                self.index += 1;
                self.step = ScanStep::ReadY;
            }
        }
    }

    /// Selected objects in the order the drawing mode meets them: by X,
    /// OAM order breaking ties.
    pub fn take_sorted(&mut self) -> Vec<SpriteEntry> {
        let mut sprites = std::mem::take(&mut self.selected);
        sprites.sort_by_key(|sprite| sprite.x);
        self.selected = Vec::with_capacity(MAX_SPRITES_PER_LINE);
        sprites
    }

    pub fn selected(&self) -> &[SpriteEntry] {
        &self.selected
    }
}
