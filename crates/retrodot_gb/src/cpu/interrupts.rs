use bitflags::bitflags;

use super::{Bus, Cpu, IE_ADDRESS, IF_ADDRESS};

bitflags! {
    /// Bit layout shared by IE (0xFFFF) and IF (0xFF0F).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 0x01;
        const LCD = 0x02;
        const TIMER = 0x04;
        const SERIAL = 0x08;
        const JOYPAD = 0x10;
    }
}

/// Interrupt sources in service priority order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Interrupt {
    VBlank,
    Lcd,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    pub const PRIORITY: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::Lcd,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    pub fn flag(self) -> InterruptFlags {
        match self {
            Interrupt::VBlank => InterruptFlags::VBLANK,
            Interrupt::Lcd => InterruptFlags::LCD,
            Interrupt::Timer => InterruptFlags::TIMER,
            Interrupt::Serial => InterruptFlags::SERIAL,
            Interrupt::Joypad => InterruptFlags::JOYPAD,
        }
    }

    pub fn vector(self) -> u16 {
        match self {
            Interrupt::VBlank => 0x0040,
            Interrupt::Lcd => 0x0048,
            Interrupt::Timer => 0x0050,
            Interrupt::Serial => 0x0058,
            Interrupt::Joypad => 0x0060,
        }
    }
}

/// Deferred IME change requested by EI.
///
/// EI enables interrupts only after the instruction that follows it, so the
/// request moves `Delay -> EnableNextTick -> (IME set)` across two
/// instruction boundaries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ImeTransition {
    #[default]
    None,
    Delay,
    EnableNextTick,
}

/// Machine cycles spent dispatching an interrupt.
const SERVICE_MCYCLES: u32 = 5;

impl Cpu {
    /// Interrupts both requested and enabled, regardless of IME.
    pub(in crate::cpu) fn pending_interrupts<B: Bus>(&self, bus: &mut B) -> InterruptFlags {
        let enabled = InterruptFlags::from_bits_truncate(bus.read_byte(IE_ADDRESS));
        let requested = InterruptFlags::from_bits_truncate(bus.read_byte(IF_ADDRESS));
        enabled & requested
    }

    /// Dispatch the highest-priority pending interrupt if IME allows it.
    ///
    /// Returns the machine cycles consumed when an interrupt was taken.
    pub fn service_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        if !self.ime {
            return None;
        }

        let pending = self.pending_interrupts(bus);
        let interrupt = Interrupt::PRIORITY
            .into_iter()
            .find(|i| pending.contains(i.flag()))?;

        self.ime = false;
        self.ime_transition = ImeTransition::None;
        self.halted = false;

        let requested = bus.read_byte(IF_ADDRESS);
        bus.write_byte(IF_ADDRESS, requested & !interrupt.flag().bits());

        let pc = self.regs.pc();
        let mut sp = self.regs.sp();
        bus.push_stack(&mut sp, pc);
        self.regs.sp.set(sp);
        self.regs.pc.set(interrupt.vector());

        log::trace!(
            "GB CPU interrupt: {:?} vector=0x{:04X} from pc=0x{:04X}",
            interrupt,
            interrupt.vector(),
            pc
        );
        Some(SERVICE_MCYCLES)
    }

    /// Advance the EI latency state after an executed instruction.
    #[inline]
    pub(in crate::cpu) fn apply_ime_transition(&mut self) {
        self.ime_transition = match self.ime_transition {
            ImeTransition::None => ImeTransition::None,
            ImeTransition::Delay => ImeTransition::EnableNextTick,
            ImeTransition::EnableNextTick => {
                self.ime = true;
                ImeTransition::None
            }
        };
    }
}
