use crate::cpu::{AluOp, Bus, Cpu, Flag, RotOp, R16, R8};

impl Cpu {
    pub(in crate::cpu) fn exec_alu_r8<B: Bus>(&mut self, bus: &mut B, op: AluOp, reg: R8) -> u32 {
        let value = self.read_r8(bus, reg);
        self.alu(op, value);
        if reg.is_memory() {
            2
        } else {
            1
        }
    }

    pub(in crate::cpu) fn exec_alu_imm<B: Bus>(&mut self, bus: &mut B, op: AluOp) -> u32 {
        let value = self.fetch8(bus);
        self.alu(op, value);
        2
    }

    pub(in crate::cpu) fn exec_add_hl(&mut self, reg: R16) -> u32 {
        let value = self.read_r16(reg);
        self.alu_add16_hl(value);
        2
    }

    pub(in crate::cpu) fn exec_add_sp_imm<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let imm = self.fetch8(bus);
        let value = self.alu_add16_signed(self.regs.sp.get(), imm);
        self.regs.sp.set(value);
        4
    }

    pub(in crate::cpu) fn exec_rotate_a(&mut self, op: RotOp) -> u32 {
        self.alu_rot_a(op);
        1
    }

    pub(in crate::cpu) fn exec_daa(&mut self) -> u32 {
        self.alu_daa();
        1
    }

    pub(in crate::cpu) fn exec_cpl(&mut self) -> u32 {
        self.regs.set_a(!self.regs.a());
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, true);
        1
    }

    pub(in crate::cpu) fn exec_scf(&mut self) -> u32 {
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, true);
        1
    }

    pub(in crate::cpu) fn exec_ccf(&mut self) -> u32 {
        let carry = self.get_flag(Flag::C);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, !carry);
        1
    }
}
