use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(in crate::cpu) fn exec_jp_hl(&mut self) -> u32 {
        self.regs.pc.set(self.regs.hl.get());
        1
    }

    pub(in crate::cpu) fn exec_ret<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = self.pop_u16(bus);
        self.regs.pc.set(addr);
        4
    }

    /// RETI returns and enables interrupts with no EI-style delay.
    pub(in crate::cpu) fn exec_reti<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = self.pop_u16(bus);
        self.regs.pc.set(addr);
        self.ime = true;
        4
    }

    pub(in crate::cpu) fn exec_rst<B: Bus>(&mut self, bus: &mut B, vector: u8) -> u32 {
        let ret = self.regs.pc.get();
        self.push_u16(bus, ret);
        self.regs.pc.set(vector as u16);
        4
    }
}
