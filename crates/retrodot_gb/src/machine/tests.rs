use std::cell::RefCell;
use std::rc::Rc;

use retrodot_common::key::Key;
use retrodot_common::{Issue, IssueCode, IssueSink, Severity};

use super::*;
use crate::cartridge::Cartridge;
use crate::cpu::{Bus, InterruptFlags, Operation, R16};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Programs start here; the entry point jumps over the header.
const PROGRAM_START: usize = 0x0150;

fn rom_image(program: &[u8], cgb_flag: u8) -> Vec<u8> {
    let mut image = vec![0u8; 0x8000];
    // JP $0150
    image[0x0100..0x0103].copy_from_slice(&[0xC3, 0x50, 0x01]);
    image[0x0134..0x0138].copy_from_slice(b"TEST");
    image[0x0143] = cgb_flag;
    let checksum = image[0x0134..=0x014C]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1));
    image[0x014D] = checksum;
    image[PROGRAM_START..PROGRAM_START + program.len()].copy_from_slice(program);
    image
}

fn boot(image: &[u8], options: EmulatorOptions) -> GameBoy {
    let cartridge = Cartridge::from_bytes(image).expect("test image loads");
    GameBoy::new(cartridge, options)
}

fn machine(program: &[u8]) -> GameBoy {
    boot(&rom_image(program, 0x00), EmulatorOptions::default())
}

fn run_dots(gb: &mut GameBoy, dots: u32) {
    for _ in 0..dots {
        gb.tick();
    }
}

fn tick_bus(gb: &mut GameBoy, dots: u32) {
    for _ in 0..dots {
        gb.bus.tick_dot();
    }
}

/// Sink that keeps every active issue so tests can look at them.
#[derive(Clone, Default)]
struct RecordingSink {
    issues: Rc<RefCell<Vec<Issue>>>,
}

impl IssueSink for RecordingSink {
    fn set_issue(&mut self, issue: Issue) {
        self.issues.borrow_mut().push(issue);
    }

    fn resolve_issue(&mut self, code: IssueCode) {
        self.issues.borrow_mut().retain(|issue| issue.code != code);
    }

    fn is_active(&self, code: IssueCode) -> bool {
        self.issues.borrow().iter().any(|issue| issue.code == code)
    }
}

fn record_issues(gb: &mut GameBoy) -> Rc<RefCell<Vec<Issue>>> {
    let sink = RecordingSink::default();
    let issues = Rc::clone(&sink.issues);
    gb.set_issue_sink(Box::new(sink));
    issues
}

fn codes(issues: &Rc<RefCell<Vec<Issue>>>) -> Vec<IssueCode> {
    issues.borrow().iter().map(|issue| issue.code).collect()
}

#[test]
fn two_byte_image_loads_bc_immediate() {
    let cartridge = Cartridge::from_bytes(&[0xF0, 0x0F]).expect("tiny image loads");
    let mut gb = GameBoy::new(cartridge, EmulatorOptions::default());
    gb.cpu.regs.pc.set(0x0000);

    let mcycles = gb.cpu.execute(&mut gb.bus, Operation::LdR16Imm(R16::BC));

    assert_eq!(gb.cpu().regs.bc.get(), 0x0FF0);
    assert_eq!(gb.cpu().regs.pc(), 0x0002);
    assert_eq!(mcycles, 3);
}

#[test]
fn program_runs_through_work_ram_and_echo() {
    let mut gb = machine(&[
        0x3E, 0x42, // LD A,$42
        0xEA, 0x23, 0xC1, // LD ($C123),A
        0xAF, // XOR A
        0xFA, 0x23, 0xE1, // LD A,($E123)
        0x47, // LD B,A
        0x18, 0xFE, // JR -2
    ]);
    run_dots(&mut gb, 400);

    assert_eq!(gb.cpu().regs.b(), 0x42);
    assert_eq!(gb.peek(0xC123), 0x42);
    assert_eq!(gb.peek(0xE123), 0x42);
    assert_eq!(gb.cpu().regs.pc(), 0x015A);
}

#[test]
fn oam_dma_copies_a_page_and_locks_oam() {
    let mut gb = machine(&[0x18, 0xFE]);
    gb.bus.write_byte(0xFF40, 0x00);
    for i in 0..0xA0u16 {
        gb.bus.write_byte(0xC000 + i, i as u8);
    }
    gb.bus.write_byte(0xFF46, 0xC0);
    assert_eq!(gb.bus.read_byte(0xFF46), 0xC0);

    // Start delay, then the first byte.
    tick_bus(&mut gb, 9);
    assert_eq!(gb.bus.read_byte(0xFE00), 0xFF);
    assert_eq!(gb.bus.read_byte(0x8000), 0xFF);

    tick_bus(&mut gb, 0xA0 * 4);
    for i in 0..0xA0u16 {
        assert_eq!(gb.bus.read_byte(0xFE00 + i), i as u8);
    }
}

#[test]
fn vram_writes_in_mode_3_are_dropped() {
    let mut gb = machine(&[0x18, 0xFE]);
    tick_bus(&mut gb, 80);
    assert_eq!(gb.ppu().mode(), Mode::Drawing);
    gb.bus.write_byte(0x8000, 0x12);
    assert_eq!(gb.bus.read_byte(0x8000), 0xFF);

    tick_bus(&mut gb, 200);
    assert_eq!(gb.ppu().mode(), Mode::HBlank);
    assert_eq!(gb.bus.read_byte(0x8000), 0x00);
}

#[test]
fn bad_accesses_reach_the_sink() {
    let mut gb = machine(&[0x18, 0xFE]);
    let issues = record_issues(&mut gb);

    assert_eq!(gb.bus.read_byte(0xFEA0), 0xFF);
    gb.bus.write_byte(0xFF70, 0x02);
    assert_eq!(gb.bus.read_byte(0xFF03), 0xFF);
    // Unmapped but expected: boot ROM disable is silent.
    gb.bus.write_byte(0xFF50, 0x01);
    gb.tick();

    assert_eq!(
        codes(&issues),
        vec![
            IssueCode::ProhibitedAccess,
            IssueCode::WrongModeRegister,
            IssueCode::UnmappedIo
        ]
    );
    assert!(issues
        .borrow()
        .iter()
        .all(|issue| issue.severity == Severity::Warning));
}

#[test]
fn peek_does_not_report() {
    let mut gb = machine(&[0x18, 0xFE]);
    let issues = record_issues(&mut gb);
    assert_eq!(gb.peek(0xFEA0), 0xFF);
    assert_eq!(gb.peek(0xFF4F), 0xFF);
    gb.tick();
    assert!(issues.borrow().is_empty());
}

#[test]
fn dmg_palettes_are_wrong_mode_in_color() {
    let mut gb = boot(&rom_image(&[0x18, 0xFE], 0x80), EmulatorOptions::default());
    let issues = record_issues(&mut gb);
    gb.bus.write_byte(0xFF47, 0xE4);
    gb.tick();
    assert_eq!(codes(&issues), vec![IssueCode::WrongModeRegister]);
}

#[test]
fn header_problems_are_reported_and_reset_reraises_them() {
    let mut image = rom_image(&[0x18, 0xFE], 0x00);
    // Pocket camera, and the checksum no longer matches.
    image[0x0147] = 0xFC;
    let mut gb = boot(&image, EmulatorOptions::default());
    let issues = record_issues(&mut gb);
    gb.tick();
    assert_eq!(
        codes(&issues),
        vec![IssueCode::HeaderChecksum, IssueCode::UnsupportedCartridge]
    );

    gb.reset();
    assert!(issues.borrow().is_empty());
    assert_eq!(gb.cpu().regs.pc(), 0x0100);
    gb.tick();
    assert_eq!(codes(&issues).len(), 2);
}

#[test]
fn illegal_opcode_locks_and_raises_fatal() {
    let mut gb = machine(&[0xD3]);
    let issues = record_issues(&mut gb);
    run_dots(&mut gb, 64);

    assert!(gb.cpu().is_locked());
    assert_eq!(gb.cpu().regs.pc(), 0x0151);
    let issues = issues.borrow();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, IssueCode::IllegalOpcode);
    assert_eq!(issues[0].severity, Severity::Fatal);
}

#[test]
fn joypad_press_requests_interrupt() {
    let mut gb = machine(&[0x18, 0xFE]);
    gb.bus.write_byte(0xFF0F, 0x00);
    // Select the action buttons.
    gb.bus.write_byte(0xFF00, 0x10);

    gb.handle_key(Key::Z, true);
    assert_eq!(gb.bus.read_byte(0xFF0F) & 0x10, 0x10);
    assert_eq!(gb.bus.read_byte(0xFF00), 0xDE);

    gb.bus.write_byte(0xFF0F, 0x00);
    gb.handle_key(Key::Enter, true);
    gb.handle_key(Key::Z, false);
    assert_eq!(gb.bus.read_byte(0xFF00) & 0x0F, 0x0F);
    assert_eq!(gb.bus.read_byte(0xFF0F) & 0x10, 0x00);

    // D-pad lines stay hidden while only buttons are selected.
    gb.handle_key(Key::Down, true);
    assert_eq!(gb.bus.read_byte(0xFF00) & 0x0F, 0x0F);
    gb.bus.write_byte(0xFF00, 0x20);
    assert_eq!(gb.bus.read_byte(0xFF00) & 0x0F, 0x07);
}

#[test]
fn vblank_interrupt_runs_handler() {
    let mut image = rom_image(
        &[
            0x3E, 0x01, // LD A,$01
            0xE0, 0xFF, // LDH ($FF),A
            0xAF, // XOR A
            0xE0, 0x0F, // LDH ($0F),A
            0xFB, // EI
            0x18, 0xFE, // JR -2
        ],
        0x00,
    );
    // VBlank vector: LD A,$99 ; LD ($C000),A ; RETI
    image[0x0040..0x0046].copy_from_slice(&[0x3E, 0x99, 0xEA, 0x00, 0xC0, 0xD9]);
    let mut gb = boot(&image, EmulatorOptions::default());
    gb.bus.write_byte(0xC000, 0x00);

    gb.render_frame();
    assert_eq!(gb.ppu().ly(), 144);
    run_dots(&mut gb, 200);
    assert_eq!(gb.peek(0xC000), 0x99);
    assert!(gb.cpu().ime);
}

#[test]
fn timer_overflow_requests_interrupt() {
    let mut gb = machine(&[0x18, 0xFE]);
    gb.bus.write_byte(0xFF0F, 0x00);
    gb.bus.write_byte(0xFF06, 0x80);
    gb.bus.write_byte(0xFF05, 0xFF);
    gb.bus.write_byte(0xFF07, 0x05);

    tick_bus(&mut gb, 100);
    assert_eq!(gb.bus.read_byte(0xFF0F) & 0x04, 0x04);
    assert!(gb.bus.read_byte(0xFF05) >= 0x80);
}

#[test]
fn work_ram_banks_switch_in_color_mode() {
    let mut gb = boot(&rom_image(&[0x18, 0xFE], 0x80), EmulatorOptions::default());
    assert_eq!(gb.model(), Model::Cgb);

    gb.bus.write_byte(0xFF70, 0x02);
    gb.bus.write_byte(0xD000, 0x22);
    gb.bus.write_byte(0xFF70, 0x03);
    gb.bus.write_byte(0xD000, 0x33);
    // Bank 0 selects bank 1.
    gb.bus.write_byte(0xFF70, 0x00);
    gb.bus.write_byte(0xD000, 0x11);
    gb.bus.write_byte(0xC000, 0x00);

    gb.bus.write_byte(0xFF70, 0x02);
    assert_eq!(gb.bus.read_byte(0xD000), 0x22);
    assert_eq!(gb.bus.read_byte(0xF000), 0x22);
    gb.bus.write_byte(0xFF70, 0x01);
    assert_eq!(gb.bus.read_byte(0xD000), 0x11);
    assert_eq!(gb.bus.read_byte(0xFF70), 0xF9);
    assert_eq!(gb.bus.read_byte(0xFF4D), 0x7E);
}

#[test]
fn force_dmg_ignores_the_color_flag() {
    let options = EmulatorOptions::builder().force_dmg(true).build();
    let gb = boot(&rom_image(&[0x18, 0xFE], 0x80), options);
    assert_eq!(gb.model(), Model::Dmg);
    assert!(!gb.ppu().is_color());
    assert_eq!(gb.cpu().regs.a(), 0x01);
}

#[test]
fn ram_seed_controls_power_on_contents() {
    let image = rom_image(&[0x18, 0xFE], 0x00);
    let seeded = |seed| {
        let gb = boot(&image, EmulatorOptions::builder().ram_seed(seed).build());
        (0xC000..0xC100u16).map(|a| gb.peek(a)).collect::<Vec<u8>>()
    };
    assert_eq!(seeded(7), seeded(7));
    assert_ne!(seeded(7), seeded(8));
}

#[test]
fn serial_transfer_collects_output() {
    let mut gb = machine(&[0x18, 0xFE]);
    gb.bus.write_byte(0xFF0F, 0x00);
    for &byte in b"ok" {
        gb.bus.write_byte(0xFF01, byte);
        gb.bus.write_byte(0xFF02, 0x81);
    }
    assert_eq!(gb.serial_output(), b"ok");
    assert_eq!(gb.bus.read_byte(0xFF0F) & 0x08, 0x08);
}

#[test]
fn interrupt_flag_reads_with_high_bits_set() {
    let mut gb = machine(&[0x18, 0xFE]);
    gb.bus.write_byte(0xFF0F, 0xFF);
    assert_eq!(gb.bus.read_byte(0xFF0F), 0xFF);
    gb.bus.write_byte(0xFF0F, 0x00);
    assert_eq!(gb.bus.read_byte(0xFF0F), 0xE0);
    gb.bus.write_byte(0xFFFF, 0x1F);
    assert_eq!(gb.bus.read_byte(0xFFFF), 0x1F);
    assert_eq!(
        InterruptFlags::from_bits_truncate(gb.bus.read_byte(0xFFFF)),
        InterruptFlags::all()
    );
}

#[test]
fn render_frame_stops_at_vblank() {
    let mut gb = machine(&[0x18, 0xFE]);
    gb.render_frame();
    assert_eq!(gb.ppu().ly(), 144);
    assert_eq!(gb.ppu().mode(), Mode::VBlank);
    assert_eq!(gb.frame_buffer().len(), SCREEN_WIDTH * SCREEN_HEIGHT * 3);

    gb.render_frame();
    assert_eq!(gb.ppu().ly(), 144);
}

#[test]
fn render_frame_with_lcd_off_runs_one_frame_of_dots() {
    let mut gb = machine(&[
        0xAF, // XOR A
        0xE0, 0x40, // LDH ($40),A
        0x18, 0xFE, // JR -2
    ]);
    gb.render_frame();
    assert!(!gb.ppu().lcdc().contains(ppu::Lcdc::LCD_ENABLE));
    assert_eq!(gb.ppu().ly(), 0);
    assert!(gb.frame_buffer().iter().all(|&b| b == 0xFF));
}
