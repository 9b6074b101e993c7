use crate::cpu::InterruptFlags;

pub(crate) const DIV: u16 = 0xFF04;
pub(crate) const TIMA: u16 = 0xFF05;
pub(crate) const TMA: u16 = 0xFF06;
pub(crate) const TAC: u16 = 0xFF07;

/// Divider and programmable timer.
///
/// `counter` advances once per machine cycle and DIV exposes bits 13..6 of
/// it. TIMA counts falling edges of the counter bit picked by TAC, gated by
/// the enable bit. An overflow leaves TIMA at zero for one machine cycle
/// before TMA is reloaded and the interrupt is requested.
#[derive(Clone, Debug)]
pub(crate) struct Timer {
    counter: u16,
    tima: u8,
    tma: u8,
    tac: u8,
    overflow: bool,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Timer as the DMG boot ROM leaves it: DIV reads 0xAB.
    pub(crate) fn new() -> Self {
        Self {
            counter: 0x2AC0,
            tima: 0,
            tma: 0,
            tac: 0,
            overflow: false,
        }
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    /// Counter bit feeding TIMA: 00 -> 7, 01 -> 1, 10 -> 3, 11 -> 5.
    #[inline]
    fn counter_bit(&self) -> bool {
        let bit = match self.tac & 0x03 {
            0x01 => 1,
            0x02 => 3,
            0x03 => 5,
            _ => 7,
        };
        self.counter & (1 << bit) != 0
    }

    #[inline]
    fn timer_input(&self) -> bool {
        self.enabled() && self.counter_bit()
    }

    fn increment_tima(&mut self) {
        let (next, overflow) = self.tima.overflowing_add(1);
        self.tima = next;
        if overflow {
            self.overflow = true;
        }
    }

    /// Advance by one machine cycle.
    pub(crate) fn tick(&mut self, requests: &mut InterruptFlags) {
        if self.overflow {
            self.overflow = false;
            self.tima = self.tma;
            requests.insert(InterruptFlags::TIMER);
            log::trace!("GB timer: TIMA reloaded with 0x{:02X}", self.tma);
        }

        let before = self.timer_input();
        self.counter = self.counter.wrapping_add(1);
        if before && !self.timer_input() {
            self.increment_tima();
        }
    }

    pub(crate) fn div(&self) -> u8 {
        (self.counter >> 6) as u8
    }

    pub(crate) fn read(&self, address: u16) -> u8 {
        match address {
            DIV => self.div(),
            TIMA => self.tima,
            TMA => self.tma,
            _ => self.tac | 0xF8,
        }
    }

    pub(crate) fn write(&mut self, address: u16, value: u8) {
        match address {
            DIV => {
                // Clearing the counter drops the selected bit, which TIMA
                // sees as a falling edge.
                if self.timer_input() {
                    self.increment_tima();
                }
                self.counter = 0;
            }
            TIMA => {
                self.tima = value;
                self.overflow = false;
            }
            TMA => {
                self.tma = value;
                if self.overflow {
                    self.tima = value;
                }
            }
            _ => {
                let before = self.timer_input();
                self.tac = value & 0x07;
                if before && !self.timer_input() {
                    self.increment_tima();
                }
            }
        }
    }
}
