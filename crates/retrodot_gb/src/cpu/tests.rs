use super::*;

struct TestBus {
    memory: [u8; 0x10000],
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
        }
    }
}

impl Bus for TestBus {
    fn read_byte(&mut self, address: u16) -> u8 {
        self.memory[address as usize]
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        self.memory[address as usize] = value;
    }
}

/// Fresh DMG CPU with `program` placed at the entry point 0x0100.
fn cpu_with_program(program: &[u8]) -> (Cpu, TestBus) {
    let cpu = Cpu::new();
    let mut bus = TestBus::default();
    bus.memory[0x0100..0x0100 + program.len()].copy_from_slice(program);
    (cpu, bus)
}

#[test]
fn power_on_matches_boot_handoff() {
    let cpu = Cpu::new();
    assert_eq!(cpu.regs.af.get(), 0x01B0);
    assert_eq!(cpu.regs.bc.get(), 0x0013);
    assert_eq!(cpu.regs.de.get(), 0x00D8);
    assert_eq!(cpu.regs.hl.get(), 0x014D);
    assert_eq!(cpu.regs.sp(), 0xFFFE);
    assert_eq!(cpu.regs.pc(), 0x0100);
    assert!(!cpu.ime);

    let color = Cpu::power_on(true);
    assert_eq!(color.regs.a(), 0x11);
}

#[test]
fn nop_advances_pc() {
    let (mut cpu, mut bus) = cpu_with_program(&[0x00]);
    assert_eq!(cpu.step_instruction(&mut bus), 1);
    assert_eq!(cpu.regs.pc(), 0x0101);
}

#[test]
fn ld_bc_imm16_reads_little_endian_operand() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::default();
    bus.memory[0] = 0xF0;
    bus.memory[1] = 0x0F;
    cpu.regs.pc.set(0x0000);

    let mcycles = cpu.execute(&mut bus, Operation::LdR16Imm(R16::BC));

    assert_eq!(cpu.regs.bc.get(), 0x0FF0);
    assert_eq!(cpu.regs.pc(), 0x0002);
    assert_eq!(mcycles, 3);
}

#[test]
fn inc_b_sets_half_carry_and_zero() {
    let (mut cpu, mut bus) = cpu_with_program(&[0x04, 0x04]);
    cpu.regs.bc.set_high(0x0F);
    cpu.set_flag(Flag::C, false);
    assert_eq!(cpu.step_instruction(&mut bus), 1);
    assert_eq!(cpu.regs.b(), 0x10);
    assert!(cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::Z));
    assert!(!cpu.get_flag(Flag::N));
    assert!(!cpu.get_flag(Flag::C));

    cpu.regs.bc.set_high(0xFF);
    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.b(), 0x00);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::C));
}

#[test]
fn inc_dec_preserve_carry() {
    let (mut cpu, mut bus) = cpu_with_program(&[0x0D, 0x0C]);
    cpu.set_flag(Flag::C, true);
    cpu.regs.bc.set_low(0x10);

    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.c(), 0x0F);
    assert!(cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));

    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.c(), 0x10);
    assert!(!cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn inc_hl_indirect_costs_three_cycles() {
    let (mut cpu, mut bus) = cpu_with_program(&[0x34]);
    cpu.regs.hl.set(0xC000);
    bus.memory[0xC000] = 0x7F;
    assert_eq!(cpu.step_instruction(&mut bus), 3);
    assert_eq!(bus.memory[0xC000], 0x80);
}

#[test]
fn ld_hl_increment_and_decrement_forms() {
    // LD (HL+),A ; LD A,(HL-)
    let (mut cpu, mut bus) = cpu_with_program(&[0x22, 0x3A]);
    cpu.regs.set_a(0x5A);
    cpu.regs.hl.set(0xC010);

    assert_eq!(cpu.step_instruction(&mut bus), 2);
    assert_eq!(bus.memory[0xC010], 0x5A);
    assert_eq!(cpu.regs.hl.get(), 0xC011);

    bus.memory[0xC011] = 0x33;
    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.a(), 0x33);
    assert_eq!(cpu.regs.hl.get(), 0xC010);
}

#[test]
fn ld_imm16_sp_stores_little_endian() {
    let (mut cpu, mut bus) = cpu_with_program(&[0x08, 0x00, 0xC1]);
    cpu.regs.sp.set(0xBEEF);
    assert_eq!(cpu.step_instruction(&mut bus), 5);
    assert_eq!(bus.memory[0xC100], 0xEF);
    assert_eq!(bus.memory[0xC101], 0xBE);
}

#[test]
fn add_hl_leaves_zero_flag() {
    let (mut cpu, mut bus) = cpu_with_program(&[0x09]);
    cpu.regs.hl.set(0x0FFF);
    cpu.regs.bc.set(0x0001);
    cpu.set_flag(Flag::Z, true);

    assert_eq!(cpu.step_instruction(&mut bus), 2);
    assert_eq!(cpu.regs.hl.get(), 0x1000);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::C));
}

#[test]
fn add_sp_signed_uses_low_byte_carries() {
    // ADD SP,-1
    let (mut cpu, mut bus) = cpu_with_program(&[0xE8, 0xFF]);
    cpu.regs.sp.set(0x0001);
    assert_eq!(cpu.step_instruction(&mut bus), 4);
    assert_eq!(cpu.regs.sp(), 0x0000);
    assert!(!cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn ld_hl_sp_offset_and_back() {
    // LD HL,SP+2 ; LD SP,HL
    let (mut cpu, mut bus) = cpu_with_program(&[0xF8, 0x02, 0xF9]);
    cpu.regs.sp.set(0xDFF0);
    assert_eq!(cpu.step_instruction(&mut bus), 3);
    assert_eq!(cpu.regs.hl.get(), 0xDFF2);
    assert_eq!(cpu.step_instruction(&mut bus), 2);
    assert_eq!(cpu.regs.sp(), 0xDFF2);
}

#[test]
fn alu_sub_and_compare() {
    // SUB B ; CP $10
    let (mut cpu, mut bus) = cpu_with_program(&[0x90, 0xFE, 0x10]);
    cpu.regs.set_a(0x10);
    cpu.regs.bc.set_high(0x01);

    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.a(), 0x0F);
    assert!(cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::H));
    assert!(!cpu.get_flag(Flag::C));

    assert_eq!(cpu.step_instruction(&mut bus), 2);
    assert_eq!(cpu.regs.a(), 0x0F);
    assert!(cpu.get_flag(Flag::C));
    assert!(!cpu.get_flag(Flag::Z));
}

#[test]
fn adc_includes_carry_in() {
    // ADC A,$0F
    let (mut cpu, mut bus) = cpu_with_program(&[0xCE, 0x0F]);
    cpu.regs.set_a(0xF0);
    cpu.set_flag(Flag::C, true);
    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.a(), 0x00);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn daa_cpl_scf_ccf_behaviour() {
    // ADD A,$27 ; DAA ; CPL ; SCF ; CCF
    let (mut cpu, mut bus) = cpu_with_program(&[0xC6, 0x27, 0x27, 0x2F, 0x37, 0x3F]);
    cpu.regs.set_a(0x15);

    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.a(), 0x3C);
    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.a(), 0x42);
    assert!(!cpu.get_flag(Flag::C));

    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.a(), 0xBD);
    assert!(cpu.get_flag(Flag::N));
    assert!(cpu.get_flag(Flag::H));

    cpu.step_instruction(&mut bus);
    assert!(cpu.get_flag(Flag::C));
    assert!(!cpu.get_flag(Flag::N));
    assert!(!cpu.get_flag(Flag::H));

    cpu.step_instruction(&mut bus);
    assert!(!cpu.get_flag(Flag::C));
}

#[test]
fn daa_after_bcd_subtraction() {
    // SUB $01 ; DAA
    let (mut cpu, mut bus) = cpu_with_program(&[0xD6, 0x01, 0x27]);
    cpu.regs.set_a(0x10);
    cpu.step_instruction(&mut bus);
    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.a(), 0x09);
    assert!(cpu.get_flag(Flag::N));
}

#[test]
fn rotate_accumulator_always_clears_zero() {
    // RLCA with A = 0
    let (mut cpu, mut bus) = cpu_with_program(&[0x07]);
    cpu.regs.set_a(0x00);
    cpu.step_instruction(&mut bus);
    assert!(!cpu.get_flag(Flag::Z));

    // RLA shifts the old carry into bit 0.
    let (mut cpu, mut bus) = cpu_with_program(&[0x17]);
    cpu.regs.set_a(0x80);
    cpu.set_flag(Flag::C, true);
    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.a(), 0x01);
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn jr_treats_high_displacements_as_negative() {
    // NOP ; JR -3 (back onto the NOP)
    let (mut cpu, mut bus) = cpu_with_program(&[0x00, 0x18, 0xFD]);
    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.step_instruction(&mut bus), 3);
    assert_eq!(cpu.regs.pc(), 0x0100);
}

#[test]
fn conditional_jumps_cost_less_when_not_taken() {
    // JR NZ,+2 with Z set ; JP Z,$0200
    let (mut cpu, mut bus) = cpu_with_program(&[0x20, 0x02, 0xCA, 0x00, 0x02]);
    cpu.set_flag(Flag::Z, true);
    assert_eq!(cpu.step_instruction(&mut bus), 2);
    assert_eq!(cpu.regs.pc(), 0x0102);
    assert_eq!(cpu.step_instruction(&mut bus), 4);
    assert_eq!(cpu.regs.pc(), 0x0200);
}

#[test]
fn call_and_ret_use_the_stack() {
    // CALL $0200 ... at $0200: RET
    let (mut cpu, mut bus) = cpu_with_program(&[0xCD, 0x00, 0x02]);
    bus.memory[0x0200] = 0xC9;

    assert_eq!(cpu.step_instruction(&mut bus), 6);
    assert_eq!(cpu.regs.pc(), 0x0200);
    assert_eq!(cpu.regs.sp(), 0xFFFC);
    assert_eq!(bus.memory[0xFFFD], 0x01);
    assert_eq!(bus.memory[0xFFFC], 0x03);

    assert_eq!(cpu.step_instruction(&mut bus), 4);
    assert_eq!(cpu.regs.pc(), 0x0103);
    assert_eq!(cpu.regs.sp(), 0xFFFE);
}

#[test]
fn rst_jumps_to_fixed_vector() {
    let (mut cpu, mut bus) = cpu_with_program(&[0xEF]);
    assert_eq!(cpu.step_instruction(&mut bus), 4);
    assert_eq!(cpu.regs.pc(), 0x0028);
    assert_eq!(bus.memory[0xFFFC], 0x01);
}

#[test]
fn push_and_pop_af_masks_low_flags() {
    // PUSH BC ; POP AF
    let (mut cpu, mut bus) = cpu_with_program(&[0xC5, 0xF1]);
    cpu.regs.bc.set(0x12FF);

    assert_eq!(cpu.step_instruction(&mut bus), 4);
    assert_eq!(bus.memory[0xFFFD], 0x12);
    assert_eq!(bus.memory[0xFFFC], 0xFF);

    assert_eq!(cpu.step_instruction(&mut bus), 3);
    assert_eq!(cpu.regs.af.get(), 0x12F0);
    assert_eq!(cpu.regs.sp(), 0xFFFE);
}

#[test]
fn bus_stack_helpers_order_bytes() {
    let mut bus = TestBus::default();
    let mut sp = 0xD000;
    bus.push_stack(&mut sp, 0xABCD);
    assert_eq!(sp, 0xCFFE);
    assert_eq!(bus.memory[0xCFFF], 0xAB);
    assert_eq!(bus.memory[0xCFFE], 0xCD);

    assert_eq!(bus.pop_stack(&mut sp), 0xABCD);
    assert_eq!(sp, 0xD000);
}

#[test]
fn cb_prefixed_ops() {
    // SWAP A ; BIT 5,H ; SET 0,(HL) ; RES 7,A ; SRL B
    let program = [0xCB, 0x37, 0xCB, 0x6C, 0xCB, 0xC6, 0xCB, 0xBF, 0xCB, 0x38];
    let (mut cpu, mut bus) = cpu_with_program(&program);
    cpu.regs.set_a(0xF1);
    cpu.regs.hl.set(0xC000);
    cpu.regs.bc.set_high(0x01);

    assert_eq!(cpu.step_instruction(&mut bus), 2);
    assert_eq!(cpu.regs.a(), 0x1F);

    cpu.set_flag(Flag::C, true);
    assert_eq!(cpu.step_instruction(&mut bus), 2);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::H));
    assert!(cpu.get_flag(Flag::C));

    assert_eq!(cpu.step_instruction(&mut bus), 4);
    assert_eq!(bus.memory[0xC000], 0x01);

    cpu.regs.set_a(0x80);
    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.a(), 0x00);

    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.b(), 0x00);
    assert!(cpu.get_flag(Flag::Z));
    assert!(cpu.get_flag(Flag::C));
    assert_eq!(cpu.regs.pc(), 0x010A);
}

#[test]
fn bit_on_hl_costs_three_cycles() {
    let (mut cpu, mut bus) = cpu_with_program(&[0xCB, 0x46]);
    cpu.regs.hl.set(0xC000);
    bus.memory[0xC000] = 0x01;
    assert_eq!(cpu.step_instruction(&mut bus), 3);
    assert!(!cpu.get_flag(Flag::Z));
}

#[test]
fn interrupt_service_pushes_pc_and_jumps_to_vector() {
    let (mut cpu, mut bus) = cpu_with_program(&[0x00]);
    cpu.ime = true;
    bus.memory[IE_ADDRESS as usize] = 0x1F;
    bus.memory[IF_ADDRESS as usize] = 0x05;

    assert_eq!(cpu.step_instruction(&mut bus), 5);
    assert_eq!(cpu.regs.pc(), 0x0040);
    assert!(!cpu.ime);
    assert_eq!(bus.memory[IF_ADDRESS as usize], 0x04);
    assert_eq!(cpu.regs.sp(), 0xFFFC);
    assert_eq!(bus.memory[0xFFFD], 0x01);
    assert_eq!(bus.memory[0xFFFC], 0x00);
}

#[test]
fn interrupt_requires_enable_bit() {
    let (mut cpu, mut bus) = cpu_with_program(&[0x00]);
    cpu.ime = true;
    bus.memory[IE_ADDRESS as usize] = 0x04;
    bus.memory[IF_ADDRESS as usize] = 0x05;

    assert_eq!(cpu.step_instruction(&mut bus), 5);
    assert_eq!(cpu.regs.pc(), 0x0050);
    assert_eq!(bus.memory[IF_ADDRESS as usize], 0x01);
}

#[test]
fn ei_enables_after_following_instruction() {
    // EI ; NOP ; NOP
    let (mut cpu, mut bus) = cpu_with_program(&[0xFB, 0x00, 0x00]);
    bus.memory[IE_ADDRESS as usize] = 0x01;
    bus.memory[IF_ADDRESS as usize] = 0x01;

    cpu.step_instruction(&mut bus);
    assert!(!cpu.ime);
    assert_eq!(cpu.ime_transition, ImeTransition::EnableNextTick);

    cpu.step_instruction(&mut bus);
    assert!(cpu.ime);
    assert_eq!(cpu.regs.pc(), 0x0102);

    assert_eq!(cpu.step_instruction(&mut bus), 5);
    assert_eq!(cpu.regs.pc(), 0x0040);
}

#[test]
fn di_cancels_pending_ei() {
    // EI ; DI ; NOP
    let (mut cpu, mut bus) = cpu_with_program(&[0xFB, 0xF3, 0x00]);
    cpu.step_instruction(&mut bus);
    cpu.step_instruction(&mut bus);
    cpu.step_instruction(&mut bus);
    assert!(!cpu.ime);
    assert_eq!(cpu.ime_transition, ImeTransition::None);
}

#[test]
fn reti_enables_immediately() {
    let (mut cpu, mut bus) = cpu_with_program(&[0xD9]);
    cpu.regs.sp.set(0xFFFC);
    bus.memory[0xFFFC] = 0x34;
    bus.memory[0xFFFD] = 0x12;
    assert_eq!(cpu.step_instruction(&mut bus), 4);
    assert!(cpu.ime);
    assert_eq!(cpu.regs.pc(), 0x1234);
}

#[test]
fn halt_idles_until_interrupt_pending() {
    // HALT ; INC B
    let (mut cpu, mut bus) = cpu_with_program(&[0x76, 0x04]);
    bus.memory[IE_ADDRESS as usize] = 0x01;

    cpu.step_instruction(&mut bus);
    assert!(cpu.halted);
    assert_eq!(cpu.step_instruction(&mut bus), 1);
    assert_eq!(cpu.regs.pc(), 0x0101);

    // IME is clear, so the wake-up resumes execution without servicing.
    bus.memory[IF_ADDRESS as usize] = 0x01;
    let b = cpu.regs.b();
    cpu.step_instruction(&mut bus);
    assert!(!cpu.halted);
    assert_eq!(cpu.regs.b(), b.wrapping_add(1));
    assert_eq!(cpu.regs.pc(), 0x0102);
}

#[test]
fn halt_bug_repeats_next_byte() {
    // HALT ; INC B with IME clear and an interrupt already pending
    let (mut cpu, mut bus) = cpu_with_program(&[0x76, 0x04, 0x00]);
    bus.memory[IE_ADDRESS as usize] = 0x01;
    bus.memory[IF_ADDRESS as usize] = 0x01;
    cpu.regs.bc.set_high(0x00);

    cpu.step_instruction(&mut bus);
    assert!(!cpu.halted);

    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.b(), 0x01);
    assert_eq!(cpu.regs.pc(), 0x0101);

    cpu.step_instruction(&mut bus);
    assert_eq!(cpu.regs.b(), 0x02);
    assert_eq!(cpu.regs.pc(), 0x0102);
}

#[test]
fn stop_waits_for_joypad_line() {
    let (mut cpu, mut bus) = cpu_with_program(&[0x10, 0x00, 0x04]);
    bus.memory[0xFF00] = 0xFF;

    cpu.step_instruction(&mut bus);
    assert!(cpu.is_stopped());
    assert_eq!(cpu.regs.pc(), 0x0102);

    cpu.step_instruction(&mut bus);
    assert!(cpu.is_stopped());

    bus.memory[0xFF00] = 0xFE;
    cpu.step_instruction(&mut bus);
    assert!(!cpu.is_stopped());
    assert_eq!(cpu.regs.pc(), 0x0103);
}

#[test]
fn illegal_opcode_locks_the_cpu() {
    let (mut cpu, mut bus) = cpu_with_program(&[0xD3, 0x00]);
    cpu.ime = true;
    bus.memory[IE_ADDRESS as usize] = 0x01;

    assert_eq!(cpu.step_instruction(&mut bus), 0);
    assert!(cpu.is_locked());
    assert_eq!(cpu.regs.pc(), 0x0101);

    bus.memory[IF_ADDRESS as usize] = 0x01;
    for _ in 0..16 {
        cpu.instruction_tick(&mut bus);
    }
    assert_eq!(cpu.regs.pc(), 0x0101);
    assert_eq!(bus.memory[IF_ADDRESS as usize], 0x01);
}

#[test]
fn instruction_tick_paces_by_dots() {
    // LD BC,$1234 ; INC B
    let (mut cpu, mut bus) = cpu_with_program(&[0x01, 0x34, 0x12, 0x04]);

    cpu.instruction_tick(&mut bus);
    assert_eq!(cpu.regs.bc.get(), 0x1234);
    assert_eq!(cpu.cycles_remaining(), 12);

    for _ in 0..11 {
        cpu.instruction_tick(&mut bus);
    }
    assert_eq!(cpu.regs.b(), 0x12);
    assert_eq!(cpu.cycles_remaining(), 1);

    cpu.instruction_tick(&mut bus);
    assert_eq!(cpu.regs.b(), 0x13);
    assert_eq!(cpu.cycles_remaining(), 4);
}

/// Machine cycles per plain opcode, conditional branches not taken. Zero
/// marks the opcode holes and the 0xCB escape.
#[rustfmt::skip]
const PLAIN_MCYCLES: [u32; 256] = [
//  x0 x1 x2 x3 x4 x5 x6 x7 x8 x9 xA xB xC xD xE xF
    1, 3, 2, 2, 1, 1, 2, 1, 5, 2, 2, 2, 1, 1, 2, 1, // 0x
    1, 3, 2, 2, 1, 1, 2, 1, 3, 2, 2, 2, 1, 1, 2, 1, // 1x
    2, 3, 2, 2, 1, 1, 2, 1, 2, 2, 2, 2, 1, 1, 2, 1, // 2x
    2, 3, 2, 2, 3, 3, 3, 1, 2, 2, 2, 2, 1, 1, 2, 1, // 3x
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // 4x
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // 5x
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // 6x
    2, 2, 2, 2, 2, 2, 1, 2, 1, 1, 1, 1, 1, 1, 2, 1, // 7x
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // 8x
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // 9x
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // Ax
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // Bx
    2, 3, 3, 4, 3, 4, 2, 4, 2, 4, 3, 0, 3, 6, 2, 4, // Cx
    2, 3, 3, 0, 3, 4, 2, 4, 2, 4, 3, 0, 3, 0, 2, 4, // Dx
    3, 3, 2, 0, 0, 4, 2, 4, 4, 1, 4, 0, 0, 0, 2, 4, // Ex
    3, 3, 2, 1, 0, 4, 2, 4, 3, 2, 4, 1, 0, 0, 2, 4, // Fx
];

/// Cost of the conditional branches when they are taken.
#[rustfmt::skip]
const TAKEN_MCYCLES: [(u8, u32); 16] = [
    (0x20, 3), (0x28, 3), (0x30, 3), (0x38, 3),
    (0xC0, 5), (0xC8, 5), (0xD0, 5), (0xD8, 5),
    (0xC2, 4), (0xCA, 4), (0xD2, 4), (0xDA, 4),
    (0xC4, 6), (0xCC, 6), (0xD4, 6), (0xDC, 6),
];

/// F value that makes conditional `opcode` take (or skip) its branch.
/// Bit 4 of the opcode picks carry over zero, bit 3 tests for set.
fn branch_flags(opcode: u8, taken: bool) -> u8 {
    let flag = if opcode & 0x10 != 0 { 0x10 } else { 0x80 };
    let when_set = opcode & 0x08 != 0;
    if taken == when_set {
        flag
    } else {
        0
    }
}

fn mcycles_with_flags(program: &[u8], flags: u8) -> u32 {
    let (mut cpu, mut bus) = cpu_with_program(program);
    cpu.regs.set_f(flags);
    cpu.step_instruction(&mut bus)
}

#[test]
fn every_plain_opcode_charges_its_cycle_count() {
    for opcode in (0..=0xFFu8).filter(|&op| op != 0xCB) {
        let program = [opcode, 0x00, 0x00];
        let taken = TAKEN_MCYCLES.iter().find(|&&(op, _)| op == opcode);
        match taken {
            Some(&(_, taken_mcycles)) => {
                assert_eq!(
                    mcycles_with_flags(&program, branch_flags(opcode, false)),
                    PLAIN_MCYCLES[opcode as usize],
                    "opcode 0x{opcode:02X} not taken"
                );
                assert_eq!(
                    mcycles_with_flags(&program, branch_flags(opcode, true)),
                    taken_mcycles,
                    "opcode 0x{opcode:02X} taken"
                );
            }
            None => {
                for flags in [0x00, 0xF0] {
                    assert_eq!(
                        mcycles_with_flags(&program, flags),
                        PLAIN_MCYCLES[opcode as usize],
                        "opcode 0x{opcode:02X} with F=0x{flags:02X}"
                    );
                }
            }
        }
    }
}

#[test]
fn every_prefixed_opcode_charges_its_cycle_count() {
    for opcode in 0..=0xFFu8 {
        let expected = match (opcode & 0x07 == 6, opcode) {
            (false, _) => 2,
            // BIT n,(HL) only reads.
            (true, 0x40..=0x7F) => 3,
            (true, _) => 4,
        };
        assert_eq!(
            mcycles_with_flags(&[0xCB, opcode], 0x00),
            expected,
            "opcode CB 0x{opcode:02X}"
        );
    }
}
