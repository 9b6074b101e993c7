use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::Parser;
use retrodot_common::app::App;
use retrodot_gb::{EmulatorOptions, GameBoy, GameBoyApp};
use typed_builder::TypedBuilder;

pub const DEFAULT_FRAMES: u32 = 60;

/// Run a Game Boy ROM headless and optionally dump the last frame.
#[derive(Debug, Parser)]
#[command(
    name = "retrodot",
    version,
    after_help = "Set RUST_LOG (e.g. RUST_LOG=debug) to control logging."
)]
pub struct Cli {
    /// Path to the ROM image
    pub rom: PathBuf,

    /// Number of frames to emulate
    #[arg(long, env = "RETRODOT_FRAMES", default_value_t = DEFAULT_FRAMES)]
    pub frames: u32,

    /// Write the last frame as raw 160x144 RGB24
    #[arg(long, value_name = "PATH")]
    pub dump: Option<PathBuf>,

    /// Ignore the cartridge's color flag and run as DMG
    #[arg(long, env = "RETRODOT_FORCE_DMG", value_parser = FalseyValueParser::new())]
    pub dmg: bool,
}

/// What one headless run does.
#[derive(Clone, Debug, TypedBuilder)]
pub struct RunConfig {
    #[builder(setter(into))]
    pub rom_path: PathBuf,
    #[builder(default = DEFAULT_FRAMES)]
    pub frames: u32,
    /// Where to write the final RGB24 frame.
    #[builder(default)]
    pub dump_path: Option<PathBuf>,
    #[builder(default = false)]
    pub force_dmg: bool,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        Self::builder()
            .rom_path(cli.rom)
            .frames(cli.frames)
            .dump_path(cli.dump)
            .force_dmg(cli.dmg)
            .build()
    }
}

/// Load the ROM, run the configured number of frames and optionally dump
/// the last one.
pub fn run(config: &RunConfig) -> Result<()> {
    let options = EmulatorOptions::builder()
        .force_dmg(config.force_dmg)
        .build();
    let gb = GameBoy::from_rom_path(&config.rom_path, options)?;
    let mut app = GameBoyApp::new(gb);
    log::info!("Running '{}' for {} frames", app.title(), config.frames);

    app.init();
    let mut screen = vec![0u8; (app.width() * app.height() * 3) as usize];
    for _ in 0..config.frames {
        if app.should_exit() {
            break;
        }
        app.update(&mut screen);
    }
    app.exit();

    if let Some(path) = &config.dump_path {
        std::fs::write(path, &screen)
            .with_context(|| format!("failed to write frame to {}", path.display()))?;
        log::info!(
            "Wrote {} bytes ({}x{} rgb24) to '{}'",
            screen.len(),
            app.width(),
            app.height(),
            path.display()
        );
    }

    let serial = app.gb.serial_output();
    if !serial.is_empty() {
        log::info!("Serial output: {}", String::from_utf8_lossy(serial));
    }
    Ok(())
}
