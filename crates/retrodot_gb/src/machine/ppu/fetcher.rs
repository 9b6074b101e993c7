use bitflags::bitflags;

use super::fifo::{Pixel, PixelFifo};
use super::oam_scan::SpriteEntry;
use super::pipeline::LineContext;
use super::registers::Lcdc;

bitflags! {
    /// Tile attribute byte: CGB map attributes from VRAM bank 1, or OAM
    /// byte 3 for objects.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub(crate) struct TileAttributes: u8 {
        const PRIORITY = 0x80;
        const Y_FLIP = 0x40;
        const X_FLIP = 0x20;
        const DMG_PALETTE = 0x10;
        const BANK = 0x08;
        const CGB_PALETTE = 0x07;
    }
}

impl TileAttributes {
    #[inline]
    pub fn cgb_palette(self) -> u8 {
        self.bits() & 0x07
    }
}

/// The five fetch phases every layer walks through.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FetchPhase {
    TileNumber,
    DataLow,
    DataHigh,
    Sleep,
    Push,
}

/// Each memory access takes two dots: one to form the address, one to
/// perform the read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum MicroStep {
    ComputeAddress,
    Io,
}

/// What differs between the background/window and object fetchers.
pub(crate) trait FetchLayer {
    /// Whether the two idle dots run between the high byte and the push.
    fn sleeps(&self) -> bool;

    fn tile_number_address(&self, ctx: &LineContext) -> u16;

    /// Tile number and attributes found at `address`.
    fn read_tile(&self, ctx: &LineContext, address: u16) -> (u8, TileAttributes);

    /// Address of the low bitplane byte of the row being drawn.
    fn tile_data_address(&self, ctx: &LineContext, tile: u8, attributes: TileAttributes) -> u16;

    /// Hand a decoded row (left to right, flips applied) to the FIFO.
    /// Returns false while the FIFO cannot take it.
    fn push(
        &mut self,
        ctx: &LineContext,
        fifo: &mut PixelFifo,
        colors: [u8; 8],
        attributes: TileAttributes,
    ) -> bool;
}

/// Shared fetch state machine, parameterised over the layer.
#[derive(Clone, Debug)]
pub(crate) struct Fetcher<L> {
    layer: L,
    phase: FetchPhase,
    step: MicroStep,
    address: u16,
    tile: u8,
    attributes: TileAttributes,
    low: u8,
    high: u8,
}

impl<L: FetchLayer> Fetcher<L> {
    pub fn new(layer: L) -> Self {
        Self {
            layer,
            phase: FetchPhase::TileNumber,
            step: MicroStep::ComputeAddress,
            address: 0,
            tile: 0,
            attributes: TileAttributes::empty(),
            low: 0,
            high: 0,
        }
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn step(&self) -> MicroStep {
        self.step
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    fn enter(&mut self, phase: FetchPhase) {
        self.phase = phase;
        self.step = MicroStep::ComputeAddress;
    }

    /// Advance one dot. Returns true on the dot the row reaches the FIFO.
    pub fn tick(&mut self, ctx: &LineContext, fifo: &mut PixelFifo) -> bool {
        match (self.phase, self.step) {
            (FetchPhase::TileNumber, MicroStep::ComputeAddress) => {
                self.address = self.layer.tile_number_address(ctx);
                self.step = MicroStep::Io;
            }
            (FetchPhase::TileNumber, MicroStep::Io) => {
                let (tile, attributes) = self.layer.read_tile(ctx, self.address);
                self.tile = tile;
                self.attributes = attributes;
                self.enter(FetchPhase::DataLow);
            }
            (FetchPhase::DataLow, MicroStep::ComputeAddress) => {
                self.address = self.layer.tile_data_address(ctx, self.tile, self.attributes);
                self.step = MicroStep::Io;
            }
            (FetchPhase::DataLow, MicroStep::Io) => {
                self.low = self.read_tile_data(ctx);
                self.enter(FetchPhase::DataHigh);
            }
            (FetchPhase::DataHigh, MicroStep::ComputeAddress) => {
                let low = self.layer.tile_data_address(ctx, self.tile, self.attributes);
                self.address = low.wrapping_add(1);
                self.step = MicroStep::Io;
            }
            (FetchPhase::DataHigh, MicroStep::Io) => {
                self.high = self.read_tile_data(ctx);
                if self.layer.sleeps() {
                    self.enter(FetchPhase::Sleep);
                } else {
                    self.enter(FetchPhase::Push);
                    return self.try_push(ctx, fifo);
                }
            }
            (FetchPhase::Sleep, MicroStep::ComputeAddress) => self.step = MicroStep::Io,
            (FetchPhase::Sleep, MicroStep::Io) => {
                // The push is attempted on the last idle dot.
                self.enter(FetchPhase::Push);
                return self.try_push(ctx, fifo);
            }
            (FetchPhase::Push, _) => return self.try_push(ctx, fifo),
        }
        false
    }

    fn read_tile_data(&self, ctx: &LineContext) -> u8 {
        let bank = ctx.color && self.attributes.contains(TileAttributes::BANK);
        ctx.read_vram(bank as usize, self.address)
    }

    fn try_push(&mut self, ctx: &LineContext, fifo: &mut PixelFifo) -> bool {
        let colors = decode_row(
            self.low,
            self.high,
            self.attributes.contains(TileAttributes::X_FLIP),
        );
        if self.layer.push(ctx, fifo, colors, self.attributes) {
            self.enter(FetchPhase::TileNumber);
            true
        } else {
            false
        }
    }
}

/// Combine the two bitplanes of a tile row into color indices, leftmost
/// pixel first.
pub(crate) fn decode_row(low: u8, high: u8, x_flip: bool) -> [u8; 8] {
    let mut colors = [0; 8];
    for (i, color) in colors.iter_mut().enumerate() {
        let bit = if x_flip { i } else { 7 - i };
        *color = (((high >> bit) & 1) << 1) | ((low >> bit) & 1);
    }
    colors
}

/// Background and window tiles.
#[derive(Clone, Debug, Default)]
pub(crate) struct BgLayer {
    tile_x: u8,
    window: bool,
    /// Window opened part way through a line: its first tile goes to the
    /// emptied FIFO without the idle dots.
    restarted: bool,
}

impl BgLayer {
    pub fn background() -> Self {
        Self::default()
    }

    pub fn window(restarted: bool) -> Self {
        Self {
            tile_x: 0,
            window: true,
            restarted,
        }
    }

    pub fn is_window(&self) -> bool {
        self.window
    }

    /// Row within the tile, before any vertical flip.
    fn fine_y(&self, ctx: &LineContext) -> u8 {
        if self.window {
            ctx.window_line & 7
        } else {
            ctx.regs.ly.wrapping_add(ctx.regs.scy) & 7
        }
    }
}

impl FetchLayer for BgLayer {
    fn sleeps(&self) -> bool {
        !(self.restarted && self.tile_x == 0)
    }

    fn tile_number_address(&self, ctx: &LineContext) -> u16 {
        let lcdc = ctx.regs.lcdc;
        let (high_map, map_x, map_y) = if self.window {
            (
                lcdc.contains(Lcdc::WINDOW_MAP),
                self.tile_x & 31,
                ctx.window_line / 8,
            )
        } else {
            (
                lcdc.contains(Lcdc::BG_MAP),
                (ctx.regs.scx / 8).wrapping_add(self.tile_x) & 31,
                ctx.regs.ly.wrapping_add(ctx.regs.scy) / 8,
            )
        };
        let base: u16 = if high_map { 0x9C00 } else { 0x9800 };
        base + (map_y as u16 & 31) * 32 + map_x as u16
    }

    fn read_tile(&self, ctx: &LineContext, address: u16) -> (u8, TileAttributes) {
        let tile = ctx.read_vram(0, address);
        let attributes = if ctx.color {
            TileAttributes::from_bits_retain(ctx.read_vram(1, address))
        } else {
            TileAttributes::empty()
        };
        (tile, attributes)
    }

    fn tile_data_address(&self, ctx: &LineContext, tile: u8, attributes: TileAttributes) -> u16 {
        let mut row = self.fine_y(ctx);
        if attributes.contains(TileAttributes::Y_FLIP) {
            row = 7 - row;
        }
        let tile_base = if ctx.regs.lcdc.contains(Lcdc::TILE_DATA) {
            0x8000 + tile as u16 * 16
        } else {
            0x9000u16.wrapping_add_signed(tile as i8 as i16 * 16)
        };
        tile_base + row as u16 * 2
    }

    fn push(
        &mut self,
        _ctx: &LineContext,
        fifo: &mut PixelFifo,
        colors: [u8; 8],
        attributes: TileAttributes,
    ) -> bool {
        if !fifo.is_empty() {
            return false;
        }
        for color in colors {
            fifo.push(Pixel {
                color,
                palette: attributes.cgb_palette(),
                sprite_priority: 0,
                bg_priority: attributes.contains(TileAttributes::PRIORITY),
            });
        }
        self.tile_x = self.tile_x.wrapping_add(1);
        true
    }
}

/// One selected object.
#[derive(Clone, Debug)]
pub(crate) struct ObjLayer {
    sprite: SpriteEntry,
    /// Leftmost pixels hidden past the screen edge.
    clip: u8,
}

impl ObjLayer {
    pub fn new(sprite: SpriteEntry, clip: u8) -> Self {
        Self { sprite, clip }
    }

    fn oam_base(&self) -> usize {
        self.sprite.oam_index as usize * 4
    }
}

impl FetchLayer for ObjLayer {
    fn sleeps(&self) -> bool {
        false
    }

    fn tile_number_address(&self, _ctx: &LineContext) -> u16 {
        0xFE00 + self.oam_base() as u16 + 2
    }

    fn read_tile(&self, ctx: &LineContext, _address: u16) -> (u8, TileAttributes) {
        let base = self.oam_base();
        (
            ctx.oam[base + 2],
            TileAttributes::from_bits_retain(ctx.oam[base + 3]),
        )
    }

    fn tile_data_address(&self, ctx: &LineContext, tile: u8, attributes: TileAttributes) -> u16 {
        let height = ctx.regs.obj_height();
        let mut row = self.sprite.row(ctx.regs.ly) & (height - 1);
        if attributes.contains(TileAttributes::Y_FLIP) {
            row = height - 1 - row;
        }
        let tile = if height == 16 { tile & 0xFE } else { tile };
        0x8000 + tile as u16 * 16 + row as u16 * 2
    }

    fn push(
        &mut self,
        ctx: &LineContext,
        fifo: &mut PixelFifo,
        colors: [u8; 8],
        attributes: TileAttributes,
    ) -> bool {
        let palette = if ctx.color {
            attributes.cgb_palette()
        } else {
            attributes.contains(TileAttributes::DMG_PALETTE) as u8
        };
        let visible = colors.iter().skip(self.clip as usize);
        for (slot, &color) in visible.enumerate() {
            let pixel = Pixel {
                color,
                palette,
                sprite_priority: self.sprite.oam_index,
                bg_priority: attributes.contains(TileAttributes::PRIORITY),
            };
            match fifo.get_mut(slot) {
                Some(existing) => {
                    if replaces(existing, &pixel, ctx.color) {
                        *existing = pixel;
                    }
                }
                None => {
                    fifo.push(pixel);
                }
            }
        }
        true
    }
}

/// Object-over-object priority. On DMG the object fetched first (lower X)
/// keeps its opaque pixels; on CGB the lower OAM index wins.
fn replaces(existing: &Pixel, incoming: &Pixel, color: bool) -> bool {
    if incoming.color == 0 {
        return false;
    }
    existing.color == 0 || (color && incoming.sprite_priority < existing.sprite_priority)
}
