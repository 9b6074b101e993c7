use super::{Bus, Cond, Cpu, Flag, R16Mem, R16Stack, R16, R8};

impl Cpu {
    #[inline]
    pub(super) fn read_r8<B: Bus>(&mut self, bus: &mut B, reg: R8) -> u8 {
        match reg {
            R8::B => self.regs.b(),
            R8::C => self.regs.c(),
            R8::D => self.regs.d(),
            R8::E => self.regs.e(),
            R8::H => self.regs.h(),
            R8::L => self.regs.l(),
            R8::HlIndirect => bus.read_byte(self.regs.hl.get()),
            R8::A => self.regs.a(),
        }
    }

    #[inline]
    pub(super) fn write_r8<B: Bus>(&mut self, bus: &mut B, reg: R8, value: u8) {
        match reg {
            R8::B => self.regs.bc.set_high(value),
            R8::C => self.regs.bc.set_low(value),
            R8::D => self.regs.de.set_high(value),
            R8::E => self.regs.de.set_low(value),
            R8::H => self.regs.hl.set_high(value),
            R8::L => self.regs.hl.set_low(value),
            R8::HlIndirect => bus.write_byte(self.regs.hl.get(), value),
            R8::A => self.regs.set_a(value),
        }
    }

    #[inline]
    pub(super) fn read_r16(&self, reg: R16) -> u16 {
        match reg {
            R16::BC => self.regs.bc.get(),
            R16::DE => self.regs.de.get(),
            R16::HL => self.regs.hl.get(),
            R16::SP => self.regs.sp.get(),
        }
    }

    #[inline]
    pub(super) fn write_r16(&mut self, reg: R16, value: u16) {
        match reg {
            R16::BC => self.regs.bc.set(value),
            R16::DE => self.regs.de.set(value),
            R16::HL => self.regs.hl.set(value),
            R16::SP => self.regs.sp.set(value),
        }
    }

    #[inline]
    pub(super) fn read_r16_stack(&self, reg: R16Stack) -> u16 {
        match reg {
            R16Stack::BC => self.regs.bc.get(),
            R16Stack::DE => self.regs.de.get(),
            R16Stack::HL => self.regs.hl.get(),
            R16Stack::AF => self.regs.af.get(),
        }
    }

    #[inline]
    pub(super) fn write_r16_stack(&mut self, reg: R16Stack, value: u16) {
        match reg {
            R16Stack::BC => self.regs.bc.set(value),
            R16Stack::DE => self.regs.de.set(value),
            R16Stack::HL => self.regs.hl.set(value),
            R16Stack::AF => self.regs.set_af(value),
        }
    }

    /// Resolve a pointer operand, applying the HL post-increment/decrement.
    #[inline]
    pub(super) fn r16_mem_address(&mut self, reg: R16Mem) -> u16 {
        match reg {
            R16Mem::BC => self.regs.bc.get(),
            R16Mem::DE => self.regs.de.get(),
            R16Mem::HLI => {
                let hl = self.regs.hl.get();
                self.regs.hl.set(hl.wrapping_add(1));
                hl
            }
            R16Mem::HLD => {
                let hl = self.regs.hl.get();
                self.regs.hl.set(hl.wrapping_sub(1));
                hl
            }
        }
    }

    #[inline]
    pub(super) fn condition(&self, cond: Cond) -> bool {
        match cond {
            Cond::NZ => !self.get_flag(Flag::Z),
            Cond::Z => self.get_flag(Flag::Z),
            Cond::NC => !self.get_flag(Flag::C),
            Cond::C => self.get_flag(Flag::C),
        }
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let pc = self.regs.pc.get();
        let value = bus.read_byte(pc);
        if self.halt_bug {
            // HALT bug: the first fetch after the bug does not advance PC.
            self.halt_bug = false;
        } else {
            self.regs.pc.set(pc.wrapping_add(1));
        }
        value
    }

    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let mut sp = self.regs.sp.get();
        bus.push_stack(&mut sp, value);
        self.regs.sp.set(sp);
    }

    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let mut sp = self.regs.sp.get();
        let value = bus.pop_stack(&mut sp);
        self.regs.sp.set(sp);
        value
    }

    /// Relative jump helper used by JR/JR cc.
    ///
    /// Displacement bytes above 0x7F are negative offsets from the address
    /// following the operand.
    pub(super) fn jr<B: Bus>(&mut self, bus: &mut B, cond: bool) -> u32 {
        let offset = self.fetch8(bus) as i8;
        if cond {
            let pc = self.regs.pc.get().wrapping_add(offset as i16 as u16);
            self.regs.pc.set(pc);
            3
        } else {
            2
        }
    }

    pub(super) fn jp_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> u32 {
        let addr = self.fetch16(bus);
        if cond {
            self.regs.pc.set(addr);
            4
        } else {
            3
        }
    }

    pub(super) fn call_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> u32 {
        let addr = self.fetch16(bus);
        if cond {
            let ret = self.regs.pc.get();
            self.push_u16(bus, ret);
            self.regs.pc.set(addr);
            6
        } else {
            3
        }
    }

    pub(super) fn ret_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> u32 {
        if cond {
            let addr = self.pop_u16(bus);
            self.regs.pc.set(addr);
            5
        } else {
            2
        }
    }
}
