use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use retrodot_common::Issue;

use super::apu::AudioRegisters;
use super::joypad::{Button, Joypad};
use super::ppu::Ppu;
use super::serial::Serial;
use super::timer::Timer;
use crate::cartridge::Cartridge;
use crate::cpu::{Bus, InterruptFlags, DOTS_PER_MCYCLE};
use crate::OPEN_BUS;

mod mmio;

const WRAM_BANK_SIZE: usize = 0x1000;
const WRAM_BANKS: usize = 8;
const HRAM_SIZE: usize = 0x7F;

/// Everything the CPU can reach through the 16-bit address space.
///
/// The bus owns the cartridge, the PPU and the small peripherals, and keeps
/// IE/IF itself; the CPU only ever sees them through reads at 0xFFFF and
/// 0xFF0F. Conditions worth surfacing are queued in `issues` for the owner
/// to drain.
pub(crate) struct MemoryBus {
    pub(crate) cartridge: Cartridge,
    wram: Box<[[u8; WRAM_BANK_SIZE]; WRAM_BANKS]>,
    /// SVBK as written; only meaningful in color mode.
    svbk: u8,
    hram: [u8; HRAM_SIZE],
    ie: u8,
    interrupt_flag: InterruptFlags,
    pub(crate) ppu: Ppu,
    timer: Timer,
    joypad: Joypad,
    serial: Serial,
    audio: AudioRegisters,
    color: bool,
    /// Dot within the current machine cycle.
    dot_phase: u32,
    issues: Vec<Issue>,
}

impl MemoryBus {
    pub(crate) fn new(cartridge: Cartridge, color: bool, ram_seed: u64) -> Self {
        let mut bus = Self {
            cartridge,
            wram: Box::new([[0; WRAM_BANK_SIZE]; WRAM_BANKS]),
            svbk: 0,
            hram: [0; HRAM_SIZE],
            ie: 0,
            // The boot ROM hands over with a VBlank request pending.
            interrupt_flag: InterruptFlags::VBLANK,
            ppu: Ppu::new(color),
            timer: Timer::new(),
            joypad: Joypad::default(),
            serial: Serial::default(),
            audio: AudioRegisters::default(),
            color,
            dot_phase: 0,
            issues: Vec::new(),
        };
        bus.randomize_internal_ram(ram_seed);
        bus
    }

    /// Work RAM and high RAM hold noise at power-on. A seeded generator
    /// keeps runs reproducible.
    fn randomize_internal_ram(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        for bank in self.wram.iter_mut() {
            rng.fill_bytes(bank);
        }
        rng.fill_bytes(&mut self.hram);
    }

    /// Advance the PPU, OAM DMA and (every fourth dot) the timer by one dot.
    pub(crate) fn tick_dot(&mut self) {
        let mut raised = self.ppu.tick();

        if let Some(copy) = self.ppu.dma.tick() {
            let byte = self.dma_source_read(copy.source);
            self.ppu.write_oam_dma(copy.offset, byte);
        }

        self.dot_phase += 1;
        if self.dot_phase == DOTS_PER_MCYCLE {
            self.dot_phase = 0;
            self.timer.tick(&mut raised);
        }

        self.interrupt_flag |= raised;
    }

    /// DMA reads ignore the PPU access windows it is itself causing.
    fn dma_source_read(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => self.cartridge.read_byte(address),
            0x8000..=0x9FFF => self.ppu.peek_vram(address),
            0xC000..=0xFDFF => self.wram_read(address),
            _ => OPEN_BUS,
        }
    }

    /// Bank index mapped at 0xD000. Plain mode is fixed to bank 1, and
    /// SVBK 0 also selects bank 1.
    fn wram_bank(&self) -> usize {
        if !self.color {
            return 1;
        }
        ((self.svbk & 0x07) as usize).max(1)
    }

    /// 0xC000-0xDFFF and its echo at 0xE000-0xFDFF.
    fn wram_slot(&self, address: u16) -> (usize, usize) {
        let offset = (address.wrapping_sub(0xC000) & 0x1FFF) as usize;
        if offset < WRAM_BANK_SIZE {
            (0, offset)
        } else {
            (self.wram_bank(), offset - WRAM_BANK_SIZE)
        }
    }

    fn wram_read(&self, address: u16) -> u8 {
        let (bank, offset) = self.wram_slot(address);
        self.wram[bank][offset]
    }

    fn wram_write(&mut self, address: u16, value: u8) {
        let (bank, offset) = self.wram_slot(address);
        self.wram[bank][offset] = value;
    }

    pub(crate) fn set_button(&mut self, button: Button, pressed: bool) {
        if self.joypad.set(button, pressed) {
            log::debug!("GB joypad: {button:?} pressed");
            self.interrupt_flag |= InterruptFlags::JOYPAD;
        }
    }

    pub(crate) fn serial_output(&self) -> &[u8] {
        self.serial.output()
    }

    /// Side-effect-free read for debuggers.
    pub(crate) fn peek(&self, address: u16) -> u8 {
        self.read_checked(address).unwrap_or(OPEN_BUS)
    }

    pub(crate) fn take_issues(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }
}

impl Bus for MemoryBus {
    fn read_byte(&mut self, address: u16) -> u8 {
        match self.read_checked(address) {
            Ok(value) => value,
            Err(issue) => {
                self.report(issue);
                OPEN_BUS
            }
        }
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        if let Err(issue) = self.write_checked(address, value) {
            self.report(issue);
        }
    }

    fn report(&mut self, issue: Issue) {
        self.issues.push(issue);
    }
}
