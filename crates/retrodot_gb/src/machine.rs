mod apu;
mod bus;
mod gameboy;
mod joypad;
pub mod ppu;
mod serial;
mod timer;

pub(crate) use bus::MemoryBus;
pub use gameboy::GameBoy;
pub use joypad::Button;
pub use ppu::{Mode, Ppu};

use typed_builder::TypedBuilder;

/// Hardware flavour the machine runs as.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum Model {
    #[default]
    Dmg,
    /// Color hardware with a cartridge that asked for color mode.
    Cgb,
}

impl Model {
    #[inline]
    pub fn is_color(self) -> bool {
        matches!(self, Model::Cgb)
    }
}

/// Seed for the power-on RAM fill when none is given.
pub const DEFAULT_RAM_SEED: u64 = 0xC0DE_1234;

/// Dots in one full frame (154 lines of 456 dots).
pub const DOTS_PER_FRAME: u32 = 70_224;

/// Knobs fixed at machine construction.
#[derive(Clone, Debug, TypedBuilder)]
pub struct EmulatorOptions {
    /// Run color-capable cartridges as plain DMG software.
    #[builder(default = false)]
    pub force_dmg: bool,
    /// Seed for the pseudo-random WRAM/HRAM contents at power-on.
    #[builder(default = DEFAULT_RAM_SEED)]
    pub ram_seed: u64,
}

impl Default for EmulatorOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests;
