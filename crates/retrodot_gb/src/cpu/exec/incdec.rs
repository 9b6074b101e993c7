use crate::cpu::{Bus, Cpu, R16, R8};

impl Cpu {
    pub(in crate::cpu) fn exec_inc_r8<B: Bus>(&mut self, bus: &mut B, reg: R8) -> u32 {
        let value = self.read_r8(bus, reg);
        let result = self.alu_inc8(value);
        self.write_r8(bus, reg, result);

        if reg.is_memory() {
            3
        } else {
            1
        }
    }

    pub(in crate::cpu) fn exec_dec_r8<B: Bus>(&mut self, bus: &mut B, reg: R8) -> u32 {
        let value = self.read_r8(bus, reg);
        let result = self.alu_dec8(value);
        self.write_r8(bus, reg, result);

        if reg.is_memory() {
            3
        } else {
            1
        }
    }

    pub(in crate::cpu) fn exec_inc_r16(&mut self, reg: R16) -> u32 {
        let value = self.read_r16(reg).wrapping_add(1);
        self.write_r16(reg, value);
        2
    }

    pub(in crate::cpu) fn exec_dec_r16(&mut self, reg: R16) -> u32 {
        let value = self.read_r16(reg).wrapping_sub(1);
        self.write_r16(reg, value);
        2
    }
}
