use crate::cpu::{Bus, Cpu, R16Mem, R16, R8};

impl Cpu {
    pub(in crate::cpu) fn exec_ld_r16_imm<B: Bus>(&mut self, bus: &mut B, reg: R16) -> u32 {
        let value = self.fetch16(bus);
        self.write_r16(reg, value);
        3
    }

    pub(in crate::cpu) fn exec_ld_mem_a<B: Bus>(&mut self, bus: &mut B, reg: R16Mem) -> u32 {
        let addr = self.r16_mem_address(reg);
        bus.write_byte(addr, self.regs.a());
        2
    }

    pub(in crate::cpu) fn exec_ld_a_mem<B: Bus>(&mut self, bus: &mut B, reg: R16Mem) -> u32 {
        let addr = self.r16_mem_address(reg);
        let value = bus.read_byte(addr);
        self.regs.set_a(value);
        2
    }

    /// LD (a16),SP stores SP little-endian.
    pub(in crate::cpu) fn exec_ld_imm16_sp<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = self.fetch16(bus);
        let sp = self.regs.sp;
        bus.write_byte(addr, sp.low());
        bus.write_byte(addr.wrapping_add(1), sp.high());
        5
    }

    pub(in crate::cpu) fn exec_ld_r8_imm<B: Bus>(&mut self, bus: &mut B, reg: R8) -> u32 {
        let value = self.fetch8(bus);
        self.write_r8(bus, reg, value);
        if reg.is_memory() {
            3
        } else {
            2
        }
    }

    pub(in crate::cpu) fn exec_ld_r8_r8<B: Bus>(&mut self, bus: &mut B, dst: R8, src: R8) -> u32 {
        let value = self.read_r8(bus, src);
        self.write_r8(bus, dst, value);
        if dst.is_memory() || src.is_memory() {
            2
        } else {
            1
        }
    }

    pub(in crate::cpu) fn exec_ldh_imm_a<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let offset = self.fetch8(bus);
        bus.write_byte(0xFF00 | offset as u16, self.regs.a());
        3
    }

    pub(in crate::cpu) fn exec_ldh_a_imm<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let offset = self.fetch8(bus);
        let value = bus.read_byte(0xFF00 | offset as u16);
        self.regs.set_a(value);
        3
    }

    pub(in crate::cpu) fn exec_ldh_c_a<B: Bus>(&mut self, bus: &mut B) -> u32 {
        bus.write_byte(0xFF00 | self.regs.c() as u16, self.regs.a());
        2
    }

    pub(in crate::cpu) fn exec_ldh_a_c<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let value = bus.read_byte(0xFF00 | self.regs.c() as u16);
        self.regs.set_a(value);
        2
    }

    pub(in crate::cpu) fn exec_ld_imm16_a<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = self.fetch16(bus);
        bus.write_byte(addr, self.regs.a());
        4
    }

    pub(in crate::cpu) fn exec_ld_a_imm16<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = self.fetch16(bus);
        let value = bus.read_byte(addr);
        self.regs.set_a(value);
        4
    }

    pub(in crate::cpu) fn exec_ld_hl_sp_imm<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let imm = self.fetch8(bus);
        let value = self.alu_add16_signed(self.regs.sp.get(), imm);
        self.regs.hl.set(value);
        3
    }

    pub(in crate::cpu) fn exec_ld_sp_hl(&mut self) -> u32 {
        self.regs.sp.set(self.regs.hl.get());
        2
    }
}
