use retrodot_common::{Issue, IssueCode, Severity};

use crate::cpu::{Bus, Cpu, ImeTransition, Instruction, Opcode};

impl Cpu {
    pub(in crate::cpu) fn exec_stop<B: Bus>(&mut self, bus: &mut B) -> u32 {
        // STOP is two bytes wide; the padding byte is fetched and dropped.
        let _padding = self.fetch8(bus);
        self.stopped = true;
        self.halted = false;
        log::debug!("GB CPU: STOP at pc=0x{:04X}", self.regs.pc());
        1
    }

    /// HALT with IME clear and an interrupt already pending does not halt;
    /// it triggers the HALT bug instead.
    pub(in crate::cpu) fn exec_halt<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if !self.ime && !self.pending_interrupts(bus).is_empty() {
            self.halt_bug = true;
        } else {
            self.halted = true;
        }
        1
    }

    pub(in crate::cpu) fn exec_di(&mut self) -> u32 {
        self.ime = false;
        self.ime_transition = ImeTransition::None;
        1
    }

    pub(in crate::cpu) fn exec_ei(&mut self) -> u32 {
        if !self.ime && self.ime_transition == ImeTransition::None {
            self.ime_transition = ImeTransition::Delay;
        }
        1
    }

    /// Opcode holes lock the CPU up for good.
    pub(in crate::cpu) fn exec_illegal<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let pc = self.regs.pc().wrapping_sub(1);
        self.locked = true;
        bus.report(Issue::new(
            IssueCode::IllegalOpcode,
            Severity::Fatal,
            format!(
                "illegal opcode {:?} at 0x{:04X}, CPU locked",
                self.current.opcode, pc
            ),
        ));
        0
    }

    /// Only reached when a bare `0xCB` was bound without its second byte.
    pub(in crate::cpu) fn exec_prefix<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let byte = self.fetch8(bus);
        self.current = Instruction::lookup(Opcode::Prefixed(byte));
        self.execute(bus, self.current.operation)
    }
}
