use std::path::Path;

use anyhow::Result;
use retrodot_common::key::Key;
use retrodot_common::{Issue, IssueCode, IssueSink, LogIssueSink, Severity};

use super::{Button, EmulatorOptions, MemoryBus, Model, Ppu, DOTS_PER_FRAME};
use crate::cartridge::{Cartridge, MbcKind, RomHeader};
use crate::cpu::{Bus, Cpu};

/// High-level Game Boy machine.
///
/// Owns the CPU, the bus (and through it the cartridge, PPU and
/// peripherals) and the sink that diagnostics end up in. Everything is
/// clocked from [`GameBoy::tick`], one dot at a time.
pub struct GameBoy {
    pub cpu: Cpu,
    pub(crate) bus: MemoryBus,
    sink: Box<dyn IssueSink>,
    model: Model,
    options: EmulatorOptions,
}

impl GameBoy {
    pub fn new(cartridge: Cartridge, options: EmulatorOptions) -> Self {
        let header = cartridge.header();
        let model = if header.supports_color() && !options.force_dmg {
            Model::Cgb
        } else {
            Model::Dmg
        };
        log::info!(
            "GB: \"{}\" ({}, {}) as {:?}",
            header.title,
            header.licensee(),
            header.cartridge_type,
            model
        );
        let startup = cartridge_issues(header);

        let mut gb = Self {
            cpu: Cpu::power_on(model.is_color()),
            bus: MemoryBus::new(cartridge, model.is_color(), options.ram_seed),
            sink: Box::new(LogIssueSink::new()),
            model,
            options,
        };
        for issue in startup {
            gb.bus.report(issue);
        }
        gb
    }

    /// Load a ROM file and power the machine on.
    pub fn from_rom_path(path: impl AsRef<Path>, options: EmulatorOptions) -> Result<Self> {
        let cartridge = Cartridge::from_path(path)?;
        Ok(Self::new(cartridge, options))
    }

    /// Route future diagnostics to `sink`. Issues raised so far but not yet
    /// drained go there too.
    pub fn set_issue_sink(&mut self, sink: Box<dyn IssueSink>) {
        self.sink = sink;
    }

    pub fn issue_sink(&self) -> &dyn IssueSink {
        self.sink.as_ref()
    }

    /// Power-cycle the machine. The cartridge, battery RAM included, stays
    /// inserted.
    pub fn reset(&mut self) {
        for code in IssueCode::ALL {
            self.sink.resolve_issue(code);
        }
        let cartridge = self.bus.cartridge.clone();
        let color = self.model.is_color();
        let startup = cartridge_issues(cartridge.header());
        self.cpu = Cpu::power_on(color);
        self.bus = MemoryBus::new(cartridge, color, self.options.ram_seed);
        for issue in startup {
            self.bus.report(issue);
        }
        log::info!("GB: reset");
    }

    /// Advance the whole machine by one dot.
    pub fn tick(&mut self) {
        self.step_dot();
        self.flush_issues();
    }

    fn step_dot(&mut self) {
        self.cpu.instruction_tick(&mut self.bus);
        self.bus.tick_dot();
    }

    /// Run until the PPU finishes a frame. With the LCD off this stops
    /// after one frame's worth of dots.
    pub fn render_frame(&mut self) {
        self.bus.ppu.take_frame_ready();
        for _ in 0..DOTS_PER_FRAME {
            self.step_dot();
            if self.bus.ppu.take_frame_ready() {
                break;
            }
        }
        self.flush_issues();
    }

    fn flush_issues(&mut self) {
        for issue in self.bus.take_issues() {
            self.sink.set_issue(issue);
        }
    }

    /// RGB24 pixels of the last drawn frame.
    pub fn frame_buffer(&self) -> &[u8] {
        self.bus.ppu.frame_buffer()
    }

    /// Map a host key onto the joypad: Z is A, X is B, A is Select, S is
    /// Start and the arrows drive the D-pad.
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        let button = match key {
            Key::Right => Button::Right,
            Key::Left => Button::Left,
            Key::Up => Button::Up,
            Key::Down => Button::Down,
            Key::Z => Button::A,
            Key::X => Button::B,
            Key::A => Button::Select,
            Key::S => Button::Start,
            Key::Enter | Key::Escape => return,
        };
        self.press(button, pressed);
    }

    pub fn press(&mut self, button: Button, pressed: bool) {
        self.bus.set_button(button, pressed);
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn ppu(&self) -> &Ppu {
        &self.bus.ppu
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.bus.cartridge
    }

    pub fn model(&self) -> Model {
        self.model
    }

    /// Read memory the way the CPU would, without reporting anything.
    pub fn peek(&self, address: u16) -> u8 {
        self.bus.peek(address)
    }

    /// Bytes sent out of the serial port so far.
    pub fn serial_output(&self) -> &[u8] {
        self.bus.serial_output()
    }
}

fn cartridge_issues(header: &RomHeader) -> Vec<Issue> {
    let mut issues = Vec::new();
    if !header.checksum_valid() {
        issues.push(Issue::new(
            IssueCode::HeaderChecksum,
            Severity::Warning,
            format!(
                "header checksum 0x{:02X} does not match computed 0x{:02X}",
                header.header_checksum,
                header.computed_checksum()
            ),
        ));
    }
    if header.cartridge_type.mbc == MbcKind::Unsupported {
        issues.push(Issue::new(
            IssueCode::UnsupportedCartridge,
            Severity::Warning,
            format!(
                "cartridge type 0x{:02X} is not emulated, mapping as plain ROM",
                header.cartridge_type.code
            ),
        ));
    }
    issues
}
