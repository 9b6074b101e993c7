/// SB/SC registers without a link partner.
///
/// A transfer started with the internal clock completes immediately: the
/// byte in SB lands in `output` and the start bit clears. Test ROMs report
/// their results this way.
#[derive(Clone, Debug)]
pub(crate) struct Serial {
    sb: u8,
    sc: u8,
    output: Vec<u8>,
}

impl Default for Serial {
    fn default() -> Self {
        Self {
            sb: 0x00,
            sc: 0x7E,
            output: Vec::new(),
        }
    }
}

impl Serial {
    pub(crate) fn read_sb(&self) -> u8 {
        self.sb
    }

    pub(crate) fn read_sc(&self) -> u8 {
        self.sc | 0x7E
    }

    pub(crate) fn write_sb(&mut self, value: u8) {
        self.sb = value;
    }

    /// Returns true when the write completed a transfer, which requests
    /// the serial interrupt.
    pub(crate) fn write_sc(&mut self, value: u8) -> bool {
        self.sc = value;
        if value & 0x81 != 0x81 {
            return false;
        }
        log::trace!("GB serial: sent 0x{:02X}", self.sb);
        self.output.push(self.sb);
        // Nothing is connected, so the byte shifted in is all ones.
        self.sb = 0xFF;
        self.sc &= !0x80;
        true
    }

    pub(crate) fn output(&self) -> &[u8] {
        &self.output
    }
}
