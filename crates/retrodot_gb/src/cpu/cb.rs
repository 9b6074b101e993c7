use super::{Bus, Cpu, Flag, RotOp, R8};

/// CB-prefixed instructions. Costs include the prefix fetch: 2 machine
/// cycles on a register, 4 on (HL), 3 for `BIT n,(HL)`.
impl Cpu {
    pub(super) fn exec_cb_rot<B: Bus>(&mut self, bus: &mut B, op: RotOp, reg: R8) -> u32 {
        let value = self.read_r8(bus, reg);
        let result = self.alu_rot(op, value);
        self.write_r8(bus, reg, result);
        if reg.is_memory() {
            4
        } else {
            2
        }
    }

    /// Z is the complement of the tested bit; C is untouched.
    pub(super) fn exec_cb_bit<B: Bus>(&mut self, bus: &mut B, bit: u8, reg: R8) -> u32 {
        let value = self.read_r8(bus, reg);
        self.set_flag(Flag::Z, value & (1 << bit) == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, true);
        if reg.is_memory() {
            3
        } else {
            2
        }
    }

    pub(super) fn exec_cb_res<B: Bus>(&mut self, bus: &mut B, bit: u8, reg: R8) -> u32 {
        let value = self.read_r8(bus, reg) & !(1 << bit);
        self.write_r8(bus, reg, value);
        if reg.is_memory() {
            4
        } else {
            2
        }
    }

    pub(super) fn exec_cb_set<B: Bus>(&mut self, bus: &mut B, bit: u8, reg: R8) -> u32 {
        let value = self.read_r8(bus, reg) | (1 << bit);
        self.write_r8(bus, reg, value);
        if reg.is_memory() {
            4
        } else {
            2
        }
    }
}
