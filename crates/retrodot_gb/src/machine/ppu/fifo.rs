use std::collections::VecDeque;

/// Pixels held by one FIFO at most.
pub(crate) const FIFO_CAPACITY: usize = 16;

/// One queued pixel.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Pixel {
    /// Color index 0-3 from the tile row.
    pub color: u8,
    /// OBP0/OBP1 on DMG, palette 0-7 on CGB.
    pub palette: u8,
    /// OAM index of the owning object; lower wins on CGB.
    pub sprite_priority: u8,
    /// BG tiles: attribute priority bit. Objects: the "behind BG" bit.
    pub bg_priority: bool,
}

/// Bounded pixel queue shared by the background and object pipelines.
///
/// Unlike a sliding window, a full FIFO refuses new pixels; the fetchers
/// wait instead.
#[derive(Clone, Debug)]
pub(crate) struct PixelFifo {
    pixels: VecDeque<Pixel>,
}

impl Default for PixelFifo {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelFifo {
    pub fn new() -> Self {
        Self {
            pixels: VecDeque::with_capacity(FIFO_CAPACITY),
        }
    }

    /// Append a pixel. Returns false when the FIFO is full.
    pub fn push(&mut self, pixel: Pixel) -> bool {
        if self.pixels.len() == FIFO_CAPACITY {
            return false;
        }
        self.pixels.push_back(pixel);
        true
    }

    pub fn pop(&mut self) -> Option<Pixel> {
        self.pixels.pop_front()
    }

    /// Slot `index` counted from the next pixel out.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Pixel> {
        self.pixels.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn clear(&mut self) {
        self.pixels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(color: u8) -> Pixel {
        Pixel {
            color,
            ..Pixel::default()
        }
    }

    #[test]
    fn pops_in_push_order() {
        let mut fifo = PixelFifo::new();
        assert!(fifo.is_empty());
        fifo.push(pixel(1));
        fifo.push(pixel(2));
        assert_eq!(fifo.len(), 2);
        assert_eq!(fifo.pop().map(|p| p.color), Some(1));
        assert_eq!(fifo.pop().map(|p| p.color), Some(2));
        assert_eq!(fifo.pop(), None);
    }

    #[test]
    fn full_fifo_rejects_pixels() {
        let mut fifo = PixelFifo::new();
        for i in 0..FIFO_CAPACITY {
            assert!(fifo.push(pixel(i as u8 & 3)));
        }
        assert!(!fifo.push(pixel(3)));
        assert_eq!(fifo.len(), FIFO_CAPACITY);

        fifo.clear();
        assert!(fifo.is_empty());
    }

    #[test]
    fn slots_can_be_overwritten_in_place() {
        let mut fifo = PixelFifo::new();
        fifo.push(pixel(0));
        fifo.push(pixel(0));
        if let Some(slot) = fifo.get_mut(1) {
            slot.color = 2;
        }
        fifo.pop();
        assert_eq!(fifo.pop().map(|p| p.color), Some(2));
    }
}
