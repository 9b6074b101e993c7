use crate::cpu::{Bus, Cpu, R16Stack};

impl Cpu {
    pub(in crate::cpu) fn exec_push<B: Bus>(&mut self, bus: &mut B, reg: R16Stack) -> u32 {
        let value = self.read_r16_stack(reg);
        self.push_u16(bus, value);
        4
    }

    /// POP AF drops the low nibble of F.
    pub(in crate::cpu) fn exec_pop<B: Bus>(&mut self, bus: &mut B, reg: R16Stack) -> u32 {
        let value = self.pop_u16(bus);
        self.write_r16_stack(reg, value);
        3
    }
}
