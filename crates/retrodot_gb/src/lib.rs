pub mod app;
pub mod cartridge;
pub mod cpu;
pub mod machine;

pub use app::GameBoyApp;
pub use cartridge::Cartridge;
pub use machine::{EmulatorOptions, GameBoy};

/// Logical screen width in pixels.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
/// Default integer scaling factor suggested to frontends.
pub const SCREEN_SCALE: u32 = 4;

/// Value returned by reads that hit disabled, banked-out or blocked memory.
pub const OPEN_BUS: u8 = 0xFF;
