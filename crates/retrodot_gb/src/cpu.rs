mod alu;
mod cb;
mod exec;
mod helpers;
mod instruction;
mod interrupts;
mod regs;

#[cfg(test)]
mod tests;

pub use instruction::{
    AluOp, Cond, Instruction, Opcode, Operation, RotOp, R16, R16Mem, R16Stack, R8,
};
pub use interrupts::{ImeTransition, Interrupt, InterruptFlags};
pub use regs::{Flag, Register, Registers};

use retrodot_common::{Issue, Severity};

/// Dot cycles per machine cycle.
pub const DOTS_PER_MCYCLE: u32 = 4;

/// Address of the interrupt-request register (IF).
pub const IF_ADDRESS: u16 = 0xFF0F;
/// Address of the interrupt-enable register (IE).
pub const IE_ADDRESS: u16 = 0xFFFF;

/// Abstraction over the Game Boy address space as seen by the CPU.
pub trait Bus {
    fn read_byte(&mut self, address: u16) -> u8;
    fn write_byte(&mut self, address: u16, value: u8);

    /// Push a word through `sp`: decrement, write high byte, decrement,
    /// write low byte.
    fn push_stack(&mut self, sp: &mut u16, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        *sp = sp.wrapping_sub(1);
        self.write_byte(*sp, hi);
        *sp = sp.wrapping_sub(1);
        self.write_byte(*sp, lo);
    }

    /// Pop a word through `sp`: read low byte, increment, read high byte,
    /// increment.
    fn pop_stack(&mut self, sp: &mut u16) -> u16 {
        let lo = self.read_byte(*sp);
        *sp = sp.wrapping_add(1);
        let hi = self.read_byte(*sp);
        *sp = sp.wrapping_add(1);
        u16::from_be_bytes([hi, lo])
    }

    /// Hand a diagnostic to whoever owns the machine.
    ///
    /// The default just logs it, which is what bare test buses want.
    fn report(&mut self, issue: Issue) {
        match issue.severity {
            Severity::Fatal => log::error!("{issue}"),
            Severity::Warning => log::warn!("{issue}"),
            Severity::Info => log::info!("{issue}"),
            Severity::Debug => log::debug!("{issue}"),
        }
    }
}

/// Game Boy CPU core.
///
/// The core is driven one dot at a time through [`Cpu::instruction_tick`].
/// An executed instruction charges `machine cycles * 4` dots to
/// `cycles_remaining`; the next interrupt check and fetch happen on the dot
/// where that counter drains to zero.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub ime: bool,
    pub ime_transition: ImeTransition,
    pub halted: bool,
    /// STOP low-power state, left when a joypad line goes low.
    stopped: bool,
    halt_bug: bool,
    /// Set after an opcode hole was executed. Nothing but a power cycle
    /// clears it.
    locked: bool,
    cycles_remaining: u32,
    current: Instruction,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU in the state the DMG boot ROM leaves it in.
    pub fn new() -> Self {
        Self::power_on(false)
    }

    /// CPU in the post-boot state for plain (`color == false`) or color mode.
    pub fn power_on(color: bool) -> Self {
        let mut regs = Registers::default();
        if color {
            regs.set_af(0x1180);
            regs.bc.set(0x0000);
            regs.de.set(0xFF56);
            regs.hl.set(0x000D);
        } else {
            regs.set_af(0x01B0);
            regs.bc.set(0x0013);
            regs.de.set(0x00D8);
            regs.hl.set(0x014D);
        }
        regs.sp.set(0xFFFE);
        regs.pc.set(0x0100);

        Self {
            regs,
            ime: false,
            ime_transition: ImeTransition::None,
            halted: false,
            stopped: false,
            halt_bug: false,
            locked: false,
            cycles_remaining: 0,
            current: Instruction::NOP,
        }
    }

    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        (self.regs.f() & (1 << flag as u8)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let bit = 1 << flag as u8;
        let f = self.regs.f();
        self.regs.set_f(if value { f | bit } else { f & !bit });
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.set_f(0);
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn cycles_remaining(&self) -> u32 {
        self.cycles_remaining
    }

    pub fn current_instruction(&self) -> Instruction {
        self.current
    }

    /// Read the opcode at PC (and its second byte after a `0xCB` escape)
    /// and bind the decoded instruction as the current one.
    pub fn fetch_instruction<B: Bus>(&mut self, bus: &mut B) -> Instruction {
        let byte = self.fetch8(bus);
        let opcode = if byte == 0xCB {
            Opcode::Prefixed(self.fetch8(bus))
        } else {
            Opcode::Plain(byte)
        };
        self.current = Instruction::lookup(opcode);
        self.current
    }

    /// Run the bound instruction and charge its cost to the dot counter.
    ///
    /// Returns the machine-cycle count.
    pub fn execute_instruction<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let mcycles = self.execute(bus, self.current.operation);
        self.cycles_remaining += mcycles * DOTS_PER_MCYCLE;
        mcycles
    }

    /// Per-dot driver.
    pub fn instruction_tick<B: Bus>(&mut self, bus: &mut B) {
        if self.cycles_remaining > 0 {
            self.cycles_remaining -= 1;
            if self.cycles_remaining > 0 {
                return;
            }
        }
        self.instruction_boundary(bus);
    }

    /// Run one instruction boundary immediately, discarding any dots still
    /// owed by the previous instruction. Returns the machine cycles charged.
    ///
    /// Handy for debuggers and tests that do not care about dot placement.
    pub fn step_instruction<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.cycles_remaining = 0;
        self.instruction_boundary(bus);
        self.cycles_remaining / DOTS_PER_MCYCLE
    }

    fn instruction_boundary<B: Bus>(&mut self, bus: &mut B) {
        if self.locked {
            return;
        }

        if let Some(mcycles) = self.service_interrupts(bus) {
            self.cycles_remaining = mcycles * DOTS_PER_MCYCLE;
            return;
        }

        if self.stopped {
            let p1 = bus.read_byte(0xFF00);
            if (p1 & 0x0F) != 0x0F {
                self.stopped = false;
            } else {
                self.cycles_remaining = DOTS_PER_MCYCLE;
                return;
            }
        }

        if self.halted {
            if self.pending_interrupts(bus).is_empty() {
                self.cycles_remaining = DOTS_PER_MCYCLE;
                return;
            }
            self.halted = false;
        }

        self.fetch_instruction(bus);
        self.execute_instruction(bus);
        self.apply_ime_transition();
    }
}
