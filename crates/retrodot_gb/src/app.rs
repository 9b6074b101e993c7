use retrodot_common::app::App;
use retrodot_common::key::Key;

use crate::{GameBoy, SCREEN_HEIGHT, SCREEN_SCALE, SCREEN_WIDTH};

/// Frontend-facing wrapper for the Game Boy machine.
///
/// Implements the shared `App` trait so a presentation layer can drive the
/// emulator one video frame per `update`.
pub struct GameBoyApp {
    pub gb: GameBoy,
    should_exit: bool,
    frame_counter: u64,
    last_pc: u16,
    pc_stagnant_frames: u32,
}

impl GameBoyApp {
    pub fn new(gb: GameBoy) -> Self {
        Self {
            gb,
            should_exit: false,
            frame_counter: 0,
            last_pc: 0,
            pc_stagnant_frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frame_counter
    }
}

impl App for GameBoyApp {
    fn init(&mut self) {
        log::info!("Game Boy init ({:?})", self.gb.model());
        self.last_pc = self.gb.cpu().regs.pc();
    }

    fn update(&mut self, screen_state: &mut [u8]) {
        self.gb.render_frame();

        let frame = self.gb.frame_buffer();
        let len = frame.len().min(screen_state.len());
        screen_state[..len].copy_from_slice(&frame[..len]);

        self.frame_counter = self.frame_counter.wrapping_add(1);

        let cpu = self.gb.cpu();
        let pc = cpu.regs.pc();
        if pc == self.last_pc {
            self.pc_stagnant_frames = self.pc_stagnant_frames.saturating_add(1);
        } else {
            self.pc_stagnant_frames = 0;
            self.last_pc = pc;
        }

        if self.frame_counter == 1 || self.frame_counter % 60 == 0 {
            let ppu = self.gb.ppu();
            log::debug!(
                "GB: frame={} pc=0x{:04X} sp=0x{:04X} af=0x{:04X} ime={} halted={} locked={} LCDC=0x{:02X} LY={} mode={}",
                self.frame_counter,
                pc,
                cpu.regs.sp(),
                cpu.regs.af.get(),
                cpu.ime,
                cpu.halted,
                cpu.is_locked(),
                ppu.lcdc().bits(),
                ppu.ly(),
                ppu.mode(),
            );
        }

        if self.pc_stagnant_frames == 600 && !cpu.halted {
            log::warn!(
                "GB: PC unchanged for ~600 frames at 0x{:04X} (stopped={} locked={})",
                pc,
                cpu.is_stopped(),
                cpu.is_locked(),
            );
        }
    }

    fn handle_key_event(&mut self, key: Key, is_pressed: bool) {
        log::debug!("GB key event: {key:?} pressed={is_pressed}");
        if key == Key::Escape && is_pressed {
            self.should_exit = true;
            return;
        }
        self.gb.handle_key(key, is_pressed);
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn exit(&mut self) {
        log::info!("Game Boy exit after {} frames", self.frame_counter);
        self.should_exit = true;
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn scale(&self) -> u32 {
        SCREEN_SCALE
    }

    fn title(&self) -> String {
        let title = self.gb.cartridge().header().title.trim();
        if title.is_empty() {
            "Retrodot Game Boy".to_string()
        } else {
            format!("Retrodot - {title}")
        }
    }
}
