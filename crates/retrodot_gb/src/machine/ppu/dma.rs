/// Bytes copied by one OAM DMA.
pub(crate) const DMA_LENGTH: u8 = 0xA0;
/// Dots between the DMA write and the first byte.
pub(crate) const DMA_START_DELAY: u8 = 8;
/// Dots per copied byte.
const DOTS_PER_BYTE: u8 = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DmaState {
    Idle,
    Starting { delay: u8 },
    Transferring { next: u8, wait: u8 },
}

/// One byte to move: read `source`, store it at OAM offset `offset`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DmaCopy {
    pub source: u16,
    pub offset: u8,
}

/// OAM DMA engine driven from 0xFF46.
#[derive(Clone, Debug)]
pub(crate) struct OamDma {
    register: u8,
    source: u16,
    state: DmaState,
}

impl Default for OamDma {
    fn default() -> Self {
        Self {
            register: 0xFF,
            source: 0,
            state: DmaState::Idle,
        }
    }
}

impl OamDma {
    /// Latch a new source page. A transfer in flight restarts.
    pub fn start(&mut self, value: u8) {
        self.register = value;
        // Pages above 0xDF read through echo RAM.
        let page = if value >= 0xE0 { value - 0x20 } else { value };
        self.source = (page as u16) << 8;
        self.state = DmaState::Starting {
            delay: DMA_START_DELAY,
        };
        log::debug!("GB PPU: OAM DMA from 0x{:04X}", self.source);
    }

    pub fn register(&self) -> u8 {
        self.register
    }

    /// True while bytes are being copied. During the start delay the CPU
    /// still owns OAM; the lock begins with the first copied byte.
    pub fn is_transferring(&self) -> bool {
        matches!(self.state, DmaState::Transferring { .. })
    }

    pub fn is_idle(&self) -> bool {
        self.state == DmaState::Idle
    }

    /// Advance one dot, returning the byte to copy on dots that move one.
    pub fn tick(&mut self) -> Option<DmaCopy> {
        match self.state {
            DmaState::Idle => None,
            DmaState::Starting { delay } => {
                self.state = if delay > 1 {
                    DmaState::Starting { delay: delay - 1 }
                } else {
                    DmaState::Transferring { next: 0, wait: 0 }
                };
                None
            }
            DmaState::Transferring { next, wait } => {
                if wait > 0 {
                    self.state = DmaState::Transferring {
                        next,
                        wait: wait - 1,
                    };
                    return None;
                }
                let copy = DmaCopy {
                    source: self.source + next as u16,
                    offset: next,
                };
                self.state = if next + 1 == DMA_LENGTH {
                    DmaState::Idle
                } else {
                    DmaState::Transferring {
                        next: next + 1,
                        wait: DOTS_PER_BYTE - 1,
                    }
                };
                Some(copy)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_then_one_byte_every_four_dots() {
        let mut dma = OamDma::default();
        dma.start(0xC1);
        assert_eq!(dma.register(), 0xC1);

        for _ in 0..DMA_START_DELAY {
            assert_eq!(dma.tick(), None);
            assert!(!dma.is_transferring());
        }
        assert!(dma.is_transferring());

        let mut copies = Vec::new();
        let mut dots = 0;
        while !dma.is_idle() {
            if let Some(copy) = dma.tick() {
                copies.push(copy);
            }
            dots += 1;
        }
        assert_eq!(copies.len(), DMA_LENGTH as usize);
        assert_eq!(copies[0], DmaCopy { source: 0xC100, offset: 0 });
        assert_eq!(copies[159], DmaCopy { source: 0xC19F, offset: 159 });
        assert_eq!(dots, 159 * 4 + 1);
    }

    #[test]
    fn high_pages_mirror_work_ram() {
        let mut dma = OamDma::default();
        dma.start(0xFE);
        for _ in 0..=DMA_START_DELAY {
            if let Some(copy) = dma.tick() {
                assert_eq!(copy.source, 0xDE00);
            }
        }
    }
}
