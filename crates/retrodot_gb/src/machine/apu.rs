pub(crate) const AUDIO_START: u16 = 0xFF10;
pub(crate) const AUDIO_END: u16 = 0xFF3F;

const NR52: u16 = 0xFF26;
const WAVE_START: u16 = 0xFF30;

/// Bits that always read back as 1, indexed from NR10.
const READ_MASK: [u8; 0x20] = [
    0x80, 0x3F, 0x00, 0xFF, 0xBF, // NR10-NR14
    0xFF, 0x3F, 0x00, 0xFF, 0xBF, // unused, NR21-NR24
    0x7F, 0xFF, 0x9F, 0xFF, 0xBF, // NR30-NR34
    0xFF, 0xFF, 0x00, 0x00, 0xBF, // unused, NR41-NR44
    0x00, 0x00, 0x70, // NR50-NR52
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

/// Boot ROM exit values for 0xFF10-0xFF26.
const POWER_ON: [u8; 0x17] = [
    0x80, 0xBF, 0xF3, 0xFF, 0xBF, //
    0x00, 0x3F, 0x00, 0xFF, 0xBF, //
    0x7F, 0xFF, 0x9F, 0xFF, 0xBF, //
    0x00, 0xFF, 0x00, 0x00, 0xBF, //
    0x77, 0xF3, 0xF1,
];

/// Sound registers kept as plain storage.
///
/// There is no synthesis. NR52 bit 7 gates the block: powering off clears
/// NR10-NR51 and drops further writes to them until power returns. Wave RAM
/// stays writable either way.
#[derive(Clone, Debug)]
pub(crate) struct AudioRegisters {
    regs: [u8; 0x30],
}

impl Default for AudioRegisters {
    fn default() -> Self {
        let mut regs = [0; 0x30];
        regs[..POWER_ON.len()].copy_from_slice(&POWER_ON);
        Self { regs }
    }
}

impl AudioRegisters {
    pub(crate) fn powered(&self) -> bool {
        self.regs[(NR52 - AUDIO_START) as usize] & 0x80 != 0
    }

    pub(crate) fn read(&self, address: u16) -> u8 {
        let index = (address - AUDIO_START) as usize;
        match READ_MASK.get(index) {
            Some(mask) => self.regs[index] | mask,
            None => self.regs[index],
        }
    }

    pub(crate) fn write(&mut self, address: u16, value: u8) {
        let index = (address - AUDIO_START) as usize;
        match address {
            NR52 => self.write_nr52(value),
            WAVE_START..=AUDIO_END => self.regs[index] = value,
            _ if self.powered() => self.regs[index] = value,
            _ => log::trace!("GB APU: write 0x{value:02X} to 0x{address:04X} while powered off"),
        }
    }

    fn write_nr52(&mut self, value: u8) {
        let index = (NR52 - AUDIO_START) as usize;
        let on = value & 0x80 != 0;
        if self.powered() && !on {
            log::debug!("GB APU: powered off");
            self.regs[..index].fill(0);
            self.regs[index] = 0;
        }
        if on {
            self.regs[index] |= 0x80;
        }
    }
}
