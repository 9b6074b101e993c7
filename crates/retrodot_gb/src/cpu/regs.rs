/// A 16-bit register cell that can also be addressed as two bytes.
///
/// The high byte is the first named half of a pair (`B` in `BC`, `A` in
/// `AF`). Byte views are computed from the word, so there is no aliasing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Register(u16);

impl Register {
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn set(&mut self, value: u16) {
        self.0 = value;
    }

    #[inline]
    pub const fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn low(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub fn set_high(&mut self, value: u8) {
        self.0 = (self.0 & 0x00FF) | ((value as u16) << 8);
    }

    #[inline]
    pub fn set_low(&mut self, value: u8) {
        self.0 = (self.0 & 0xFF00) | value as u16;
    }
}

/// Registers for the Game Boy CPU (LR35902).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Registers {
    pub af: Register,
    pub bc: Register,
    pub de: Register,
    pub hl: Register,
    pub sp: Register,
    pub pc: Register,
}

impl Registers {
    #[inline]
    pub fn a(&self) -> u8 {
        self.af.high()
    }

    #[inline]
    pub fn set_a(&mut self, value: u8) {
        self.af.set_high(value);
    }

    #[inline]
    pub fn f(&self) -> u8 {
        self.af.low()
    }

    #[inline]
    pub fn set_f(&mut self, value: u8) {
        // Lower 4 bits of F are always zero.
        self.af.set_low(value & 0xF0);
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        self.af.set(value & 0xFFF0);
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.bc.high()
    }

    #[inline]
    pub fn c(&self) -> u8 {
        self.bc.low()
    }

    #[inline]
    pub fn d(&self) -> u8 {
        self.de.high()
    }

    #[inline]
    pub fn e(&self) -> u8 {
        self.de.low()
    }

    #[inline]
    pub fn h(&self) -> u8 {
        self.hl.high()
    }

    #[inline]
    pub fn l(&self) -> u8 {
        self.hl.low()
    }

    #[inline]
    pub fn pc(&self) -> u16 {
        self.pc.get()
    }

    #[inline]
    pub fn sp(&self) -> u16 {
        self.sp.get()
    }
}

/// Flag bits in the F register.
///
/// Layout (bit index in the byte, from MSB to LSB):
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
/// - bits 0–3 are always zero.
#[derive(Clone, Copy, Debug)]
pub enum Flag {
    Z = 7,
    N = 6,
    H = 5,
    C = 4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_views_share_the_word() {
        let mut reg = Register::new(0x1234);
        assert_eq!(reg.high(), 0x12);
        assert_eq!(reg.low(), 0x34);

        reg.set_high(0xAB);
        assert_eq!(reg.get(), 0xAB34);
        reg.set_low(0xCD);
        assert_eq!(reg.get(), 0xABCD);
    }

    #[test]
    fn flag_register_low_nibble_is_masked() {
        let mut regs = Registers::default();
        regs.set_af(0x12FF);
        assert_eq!(regs.a(), 0x12);
        assert_eq!(regs.f(), 0xF0);

        regs.set_f(0x0F);
        assert_eq!(regs.af.get(), 0x1200);
    }
}
