use super::{AluOp, Cpu, Flag, RotOp};

impl Cpu {
    pub(super) fn alu(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => self.alu_add(value, true),
            AluOp::Sub => self.alu_sub(value, false),
            AluOp::Sbc => self.alu_sub(value, true),
            AluOp::And => self.alu_and(value),
            AluOp::Xor => self.alu_xor(value),
            AluOp::Or => self.alu_or(value),
            AluOp::Cp => self.alu_cp(value),
        }
    }

    /// Core 8-bit ADD/ADC operation on A.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true).
    fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a();
        let carry_in = u8::from(use_carry && self.get_flag(Flag::C));

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = a as u16 + value as u16 + carry_in as u16;
        let result = full as u8;

        self.regs.set_a(result);

        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::H, (half & 0x10) != 0);
        self.set_flag(Flag::C, full > 0xFF);
    }

    /// Core 8-bit SUB/SBC operation on A.
    fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a();
        let carry_in = i16::from(use_carry && self.get_flag(Flag::C));

        let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in;
        let full = a as i16 - value as i16 - carry_in;
        let result = full as u8;

        self.regs.set_a(result);

        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, half < 0);
        self.set_flag(Flag::C, full < 0);
    }

    #[inline]
    fn alu_and(&mut self, value: u8) {
        let result = self.regs.a() & value;
        self.regs.set_a(result);

        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::H, true);
    }

    #[inline]
    fn alu_or(&mut self, value: u8) {
        let result = self.regs.a() | value;
        self.regs.set_a(result);

        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
    }

    #[inline]
    fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a() ^ value;
        self.regs.set_a(result);

        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
    }

    /// Compare A with `value`, setting flags as if `A - value` was performed.
    /// A itself is not modified.
    #[inline]
    fn alu_cp(&mut self, value: u8) {
        let a = self.regs.a();
        self.alu_sub(value, false);
        self.regs.set_a(a);
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// Updates A, Z, H, C; leaves N unchanged.
    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a();
        let mut adjust: u8 = if self.get_flag(Flag::C) { 0x60 } else { 0x00 };
        if self.get_flag(Flag::H) {
            adjust |= 0x06;
        }

        if !self.get_flag(Flag::N) {
            if (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        } else {
            a = a.wrapping_sub(adjust);
        }

        self.set_flag(Flag::C, adjust >= 0x60);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::Z, a == 0);
        self.regs.set_a(a);
    }

    /// Updates Z, N, H while leaving C unchanged.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (value & 0x0F) == 0x0F);
        result
    }

    /// Updates Z, N, H while leaving C unchanged.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, (value & 0x0F) == 0);
        result
    }

    /// 16-bit add helper for `ADD HL,rr`. Z is unaffected.
    #[inline]
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl.get();
        let result = hl.wrapping_add(value);

        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_flag(Flag::C, (hl as u32) + (value as u32) > 0xFFFF);

        self.regs.hl.set(result);
    }

    /// Add a signed immediate to a 16-bit base (ADD SP,e / LD HL,SP+e).
    ///
    /// Z and N are cleared; H and C come from the low byte.
    #[inline]
    pub(super) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = imm8 as i8 as i16 as u16;
        self.clear_flags();
        self.set_flag(Flag::H, (base & 0x000F) + (offset & 0x000F) > 0x000F);
        self.set_flag(Flag::C, (base & 0x00FF) + (offset & 0x00FF) > 0x00FF);
        base.wrapping_add(offset)
    }

    /// Rotate/shift used by the prefixed table. Sets Z from the result.
    pub(super) fn alu_rot(&mut self, op: RotOp, value: u8) -> u8 {
        let carry_in = self.get_flag(Flag::C);
        let (result, carry) = match op {
            RotOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            RotOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            RotOp::Rl => ((value << 1) | u8::from(carry_in), value & 0x80 != 0),
            RotOp::Rr => ((value >> 1) | (u8::from(carry_in) << 7), value & 0x01 != 0),
            RotOp::Sla => (value << 1, value & 0x80 != 0),
            RotOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            RotOp::Swap => (value.rotate_left(4), false),
            RotOp::Srl => (value >> 1, value & 0x01 != 0),
        };
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::C, carry);
        result
    }

    /// Accumulator rotates (RLCA/RRCA/RLA/RRA) always clear Z.
    pub(super) fn alu_rot_a(&mut self, op: RotOp) {
        let a = self.regs.a();
        let result = self.alu_rot(op, a);
        self.set_flag(Flag::Z, false);
        self.regs.set_a(result);
    }
}
