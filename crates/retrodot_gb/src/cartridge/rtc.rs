use std::time::{Duration, SystemTime};

use bitflags::bitflags;

bitflags! {
    /// Flag bits of the day-high register (0x0C).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct RtcControl: u8 {
        const DAY_HIGH = 0x01;
        const HALT = 0x40;
        const CARRY = 0x80;
    }
}

/// Register selector values written to 0x4000-0x5FFF.
pub const RTC_SECONDS: u8 = 0x08;
pub const RTC_MINUTES: u8 = 0x09;
pub const RTC_HOURS: u8 = 0x0A;
pub const RTC_DAY_LOW: u8 = 0x0B;
pub const RTC_DAY_HIGH: u8 = 0x0C;

/// One copy of the five clock registers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RtcRegisters {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    /// 9-bit day counter.
    pub days: u16,
    pub halt: bool,
    pub carry: bool,
}

impl RtcRegisters {
    fn control_byte(&self) -> u8 {
        let mut control = RtcControl::empty();
        control.set(RtcControl::DAY_HIGH, self.days & 0x100 != 0);
        control.set(RtcControl::HALT, self.halt);
        control.set(RtcControl::CARRY, self.carry);
        control.bits()
    }

    pub fn read(&self, select: u8) -> u8 {
        match select {
            RTC_SECONDS => self.seconds & 0x3F,
            RTC_MINUTES => self.minutes & 0x3F,
            RTC_HOURS => self.hours & 0x1F,
            RTC_DAY_LOW => self.days as u8,
            RTC_DAY_HIGH => self.control_byte(),
            _ => crate::OPEN_BUS,
        }
    }
}

/// MBC3 real-time clock.
///
/// The live counters advance from wall-clock time elapsed since the last
/// sync; reads see the latched copy taken on the last 0 -> 1 latch write.
#[derive(Clone, Debug)]
pub struct Rtc {
    live: RtcRegisters,
    latched: RtcRegisters,
    last_sync: SystemTime,
    subsecond: Duration,
}

impl Rtc {
    pub fn new(now: SystemTime) -> Self {
        Self {
            live: RtcRegisters::default(),
            latched: RtcRegisters::default(),
            last_sync: now,
            subsecond: Duration::ZERO,
        }
    }

    pub fn live(&self) -> &RtcRegisters {
        &self.live
    }

    pub fn latched(&self) -> &RtcRegisters {
        &self.latched
    }

    /// Snapshot the live counters into the latched set.
    pub fn latch(&mut self) {
        self.latched = self.live;
    }

    pub fn read(&self, select: u8) -> u8 {
        self.latched.read(select)
    }

    pub fn write(&mut self, select: u8, value: u8) {
        let live = &mut self.live;
        match select {
            RTC_SECONDS => {
                live.seconds = value & 0x3F;
                self.subsecond = Duration::ZERO;
            }
            RTC_MINUTES => live.minutes = value & 0x3F,
            RTC_HOURS => live.hours = value & 0x1F,
            RTC_DAY_LOW => live.days = (live.days & 0x100) | value as u16,
            RTC_DAY_HIGH => {
                let control = RtcControl::from_bits_truncate(value);
                live.days = (live.days & 0xFF)
                    | if control.contains(RtcControl::DAY_HIGH) {
                        0x100
                    } else {
                        0
                    };
                live.halt = control.contains(RtcControl::HALT);
                live.carry = control.contains(RtcControl::CARRY);
            }
            _ => log::debug!("GB cart: write to unknown RTC register 0x{select:02X}"),
        }
    }

    /// Catch the live counters up to `now`.
    ///
    /// A clock running backwards is treated as no time passing.
    pub fn sync(&mut self, now: SystemTime) {
        let elapsed = now.duration_since(self.last_sync).unwrap_or_default();
        self.last_sync = now;
        self.advance(elapsed);
    }

    /// Advance the live counters by `elapsed`, keeping fractional seconds.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.live.halt {
            return;
        }
        let total = self.subsecond + elapsed;
        self.subsecond = Duration::from_nanos(total.subsec_nanos() as u64);
        self.advance_seconds(total.as_secs());
    }

    pub fn advance_seconds(&mut self, mut seconds: u64) {
        if self.live.halt {
            return;
        }
        while seconds > 0 {
            let until_minute = self.seconds_until_minute_tick();
            if seconds < until_minute {
                self.live.seconds = ((self.live.seconds as u64 + seconds) & 0x3F) as u8;
                return;
            }
            seconds -= until_minute;
            self.live.seconds = 0;
            self.minute_tick();

            // Whole days can be skipped once the clock sits on a day edge.
            if self.live.seconds == 0 && self.live.minutes == 0 && self.live.hours == 0 {
                while seconds >= 86_400 {
                    seconds -= 86_400;
                    self.day_tick();
                }
            }
        }
    }

    /// Out-of-range values written by software count up to 63 and wrap
    /// before reaching the next minute.
    fn seconds_until_minute_tick(&self) -> u64 {
        let seconds = self.live.seconds as u64;
        if seconds <= 59 {
            60 - seconds
        } else {
            (64 - seconds) + 60
        }
    }

    fn minute_tick(&mut self) {
        if self.live.minutes == 59 {
            self.live.minutes = 0;
            self.hour_tick();
        } else {
            self.live.minutes = (self.live.minutes + 1) & 0x3F;
        }
    }

    fn hour_tick(&mut self) {
        if self.live.hours == 23 {
            self.live.hours = 0;
            self.day_tick();
        } else {
            self.live.hours = (self.live.hours + 1) & 0x1F;
        }
    }

    fn day_tick(&mut self) {
        if self.live.days >= 0x1FF {
            self.live.days = 0;
            self.live.carry = true;
        } else {
            self.live.days += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_day_increments_day_counter() {
        let mut rtc = Rtc::new(SystemTime::UNIX_EPOCH);
        rtc.advance_seconds(86_400);
        assert_eq!(rtc.live().days, 1);
        assert_eq!(rtc.live().hours, 0);
        assert_eq!(rtc.live().minutes, 0);
        assert_eq!(rtc.live().seconds, 0);
        assert!(!rtc.live().carry);
    }

    #[test]
    fn day_overflow_sets_carry_and_wraps() {
        let mut rtc = Rtc::new(SystemTime::UNIX_EPOCH);
        rtc.write(RTC_DAY_LOW, 0xFF);
        rtc.write(RTC_DAY_HIGH, 0x01);
        assert_eq!(rtc.live().days, 0x1FF);

        rtc.advance_seconds(86_400);
        assert_eq!(rtc.live().days, 0);
        assert!(rtc.live().carry);
    }

    #[test]
    fn halt_freezes_the_clock() {
        let mut rtc = Rtc::new(SystemTime::UNIX_EPOCH);
        rtc.write(RTC_DAY_HIGH, 0x40);
        rtc.sync(SystemTime::UNIX_EPOCH + Duration::from_secs(3_600));
        assert_eq!(rtc.live().hours, 0);

        rtc.write(RTC_DAY_HIGH, 0x00);
        rtc.sync(SystemTime::UNIX_EPOCH + Duration::from_secs(3_661));
        assert_eq!(rtc.live().minutes, 1);
        assert_eq!(rtc.live().seconds, 1);
    }

    #[test]
    fn fractional_seconds_accumulate() {
        let mut rtc = Rtc::new(SystemTime::UNIX_EPOCH);
        rtc.advance(Duration::from_millis(600));
        assert_eq!(rtc.live().seconds, 0);
        rtc.advance(Duration::from_millis(600));
        assert_eq!(rtc.live().seconds, 1);
    }

    #[test]
    fn latch_copies_all_registers() {
        let mut rtc = Rtc::new(SystemTime::UNIX_EPOCH);
        rtc.advance_seconds(86_400 + 3_600 + 60 + 1);
        assert_eq!(rtc.read(RTC_SECONDS), 0);

        rtc.latch();
        assert_eq!(rtc.read(RTC_SECONDS), 1);
        assert_eq!(rtc.read(RTC_MINUTES), 1);
        assert_eq!(rtc.read(RTC_HOURS), 1);
        assert_eq!(rtc.read(RTC_DAY_LOW), 1);
        assert_eq!(rtc.read(RTC_DAY_HIGH), 0);
    }

    #[test]
    fn invalid_seconds_tick_through_to_wrap() {
        let mut rtc = Rtc::new(SystemTime::UNIX_EPOCH);
        rtc.write(RTC_SECONDS, 62);
        rtc.advance_seconds(2);
        assert_eq!(rtc.live().seconds, 0);
        assert_eq!(rtc.live().minutes, 0);
    }
}
