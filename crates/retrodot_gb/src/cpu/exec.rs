mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu, Operation, RotOp};

impl Cpu {
    /// Execute one decoded operation and return its cost in machine cycles.
    ///
    /// Operands are fetched from PC as usual; no dots are charged.
    pub fn execute<B: Bus>(&mut self, bus: &mut B, op: Operation) -> u32 {
        match op {
            Operation::Nop => 1,
            Operation::Stop => self.exec_stop(bus),
            Operation::Halt => self.exec_halt(bus),
            Operation::Di => self.exec_di(),
            Operation::Ei => self.exec_ei(),
            Operation::Illegal => self.exec_illegal(bus),
            Operation::Prefix => self.exec_prefix(bus),

            Operation::LdR16Imm(reg) => self.exec_ld_r16_imm(bus, reg),
            Operation::LdMemA(reg) => self.exec_ld_mem_a(bus, reg),
            Operation::LdAMem(reg) => self.exec_ld_a_mem(bus, reg),
            Operation::LdImm16Sp => self.exec_ld_imm16_sp(bus),
            Operation::IncR16(reg) => self.exec_inc_r16(reg),
            Operation::DecR16(reg) => self.exec_dec_r16(reg),
            Operation::AddHl(reg) => self.exec_add_hl(reg),
            Operation::IncR8(reg) => self.exec_inc_r8(bus, reg),
            Operation::DecR8(reg) => self.exec_dec_r8(bus, reg),
            Operation::LdR8Imm(reg) => self.exec_ld_r8_imm(bus, reg),
            Operation::LdR8R8(dst, src) => self.exec_ld_r8_r8(bus, dst, src),

            Operation::Rlca => self.exec_rotate_a(RotOp::Rlc),
            Operation::Rrca => self.exec_rotate_a(RotOp::Rrc),
            Operation::Rla => self.exec_rotate_a(RotOp::Rl),
            Operation::Rra => self.exec_rotate_a(RotOp::Rr),
            Operation::Daa => self.exec_daa(),
            Operation::Cpl => self.exec_cpl(),
            Operation::Scf => self.exec_scf(),
            Operation::Ccf => self.exec_ccf(),

            Operation::AluR8(alu_op, reg) => self.exec_alu_r8(bus, alu_op, reg),
            Operation::AluImm(alu_op) => self.exec_alu_imm(bus, alu_op),

            Operation::Jr => self.jr(bus, true),
            Operation::JrCond(cond) => {
                let taken = self.condition(cond);
                self.jr(bus, taken)
            }
            Operation::Jp => self.jp_cond(bus, true),
            Operation::JpCond(cond) => {
                let taken = self.condition(cond);
                self.jp_cond(bus, taken)
            }
            Operation::JpHl => self.exec_jp_hl(),
            Operation::Call => self.call_cond(bus, true),
            Operation::CallCond(cond) => {
                let taken = self.condition(cond);
                self.call_cond(bus, taken)
            }
            Operation::Ret => self.exec_ret(bus),
            Operation::RetCond(cond) => {
                let taken = self.condition(cond);
                self.ret_cond(bus, taken)
            }
            Operation::Reti => self.exec_reti(bus),
            Operation::Rst(vector) => self.exec_rst(bus, vector),
            Operation::Push(reg) => self.exec_push(bus, reg),
            Operation::Pop(reg) => self.exec_pop(bus, reg),

            Operation::LdhImmA => self.exec_ldh_imm_a(bus),
            Operation::LdhAImm => self.exec_ldh_a_imm(bus),
            Operation::LdhCA => self.exec_ldh_c_a(bus),
            Operation::LdhAC => self.exec_ldh_a_c(bus),
            Operation::LdImm16A => self.exec_ld_imm16_a(bus),
            Operation::LdAImm16 => self.exec_ld_a_imm16(bus),
            Operation::AddSpImm => self.exec_add_sp_imm(bus),
            Operation::LdHlSpImm => self.exec_ld_hl_sp_imm(bus),
            Operation::LdSpHl => self.exec_ld_sp_hl(),

            Operation::Rot(rot, reg) => self.exec_cb_rot(bus, rot, reg),
            Operation::Bit(bit, reg) => self.exec_cb_bit(bus, bit, reg),
            Operation::Res(bit, reg) => self.exec_cb_res(bus, bit, reg),
            Operation::Set(bit, reg) => self.exec_cb_set(bus, bit, reg),
        }
    }
}
