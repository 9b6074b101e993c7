use super::fetcher::{BgLayer, FetchPhase, Fetcher, ObjLayer};
use super::fifo::{Pixel, PixelFifo};
use super::oam_scan::SpriteEntry;
use super::palette::{dmg_rgb, ColorPalettes, DMG_SHADES};
use super::registers::{LcdRegisters, Lcdc};
use super::{Vram, OAM_SIZE};
use crate::SCREEN_WIDTH;

/// Everything a drawing dot may read.
pub(crate) struct LineContext<'a> {
    pub regs: &'a LcdRegisters,
    pub vram: &'a Vram,
    pub oam: &'a [u8; OAM_SIZE],
    pub bg_palettes: &'a ColorPalettes,
    pub obj_palettes: &'a ColorPalettes,
    /// Internal window row counter.
    pub window_line: u8,
    /// WY matched LY at some point this frame.
    pub window_armed: bool,
    pub color: bool,
}

impl LineContext<'_> {
    #[inline]
    pub fn read_vram(&self, bank: usize, address: u16) -> u8 {
        self.vram[bank & 1][(address & 0x1FFF) as usize]
    }
}

/// State of mode 3 for one line.
#[derive(Clone, Debug)]
pub(crate) struct LineRender {
    x: u8,
    /// Pixels still to drop for SCX fine scroll.
    discard: u8,
    bg_fifo: PixelFifo,
    obj_fifo: PixelFifo,
    bg_fetcher: Fetcher<BgLayer>,
    obj_fetcher: Option<Fetcher<ObjLayer>>,
    sprites: Vec<SpriteEntry>,
    next_sprite: usize,
    window_drawn: bool,
}

impl LineRender {
    pub fn new(scx: u8, sprites: Vec<SpriteEntry>) -> Self {
        Self {
            x: 0,
            discard: scx & 7,
            bg_fifo: PixelFifo::new(),
            obj_fifo: PixelFifo::new(),
            bg_fetcher: Fetcher::new(BgLayer::background()),
            obj_fetcher: None,
            sprites,
            next_sprite: 0,
            window_drawn: false,
        }
    }

    /// Pixels emitted so far.
    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn is_finished(&self) -> bool {
        self.x as usize >= SCREEN_WIDTH
    }

    pub fn window_drawn(&self) -> bool {
        self.window_drawn
    }

    /// Run one dot of mode 3. Returns the screen column and color of a
    /// pixel emitted on this dot.
    pub fn tick(&mut self, ctx: &LineContext) -> Option<(u8, [u8; 3])> {
        if self.is_finished() {
            return None;
        }

        if self.obj_fetcher.is_none() && self.discard == 0 {
            self.start_object_fetch(ctx);
        }
        if self.obj_fetcher.is_some() {
            self.object_dot(ctx);
            return None;
        }

        self.check_window(ctx);

        let emitted = self.shift_out(ctx);
        self.bg_fetcher.tick(ctx, &mut self.bg_fifo);
        emitted
    }

    /// Begin fetching the next object whose left edge has been reached.
    fn start_object_fetch(&mut self, ctx: &LineContext) {
        if !ctx.regs.lcdc.contains(Lcdc::OBJ_ENABLE) {
            return;
        }
        let Some(&sprite) = self.sprites.get(self.next_sprite) else {
            return;
        };
        // OAM X is the screen column plus eight.
        let left = self.x as u16 + 8;
        if sprite.x as u16 > left {
            return;
        }
        self.next_sprite += 1;
        let clip = (left - sprite.x as u16).min(8) as u8;
        self.obj_fetcher = Some(Fetcher::new(ObjLayer::new(sprite, clip)));
    }

    /// Objects wait until the background fetcher has both bitplanes of its
    /// row and the FIFO has pixels, then fetch while the background is
    /// frozen.
    fn object_dot(&mut self, ctx: &LineContext) {
        let bg_ready = matches!(self.bg_fetcher.phase(), FetchPhase::Sleep | FetchPhase::Push)
            && !self.bg_fifo.is_empty();
        if !bg_ready {
            self.bg_fetcher.tick(ctx, &mut self.bg_fifo);
            return;
        }
        if let Some(fetcher) = self.obj_fetcher.as_mut() {
            if fetcher.tick(ctx, &mut self.obj_fifo) {
                self.obj_fetcher = None;
            }
        }
    }

    fn check_window(&mut self, ctx: &LineContext) {
        if self.bg_fetcher.layer().is_window()
            || !ctx.window_armed
            || !ctx.regs.lcdc.contains(Lcdc::WINDOW_ENABLE)
            || ctx.regs.wx > 166
        {
            return;
        }
        if self.x as u16 + 7 < ctx.regs.wx as u16 {
            return;
        }
        log::trace!(
            "GB PPU: window starts at x={} (LY={})",
            self.x,
            ctx.regs.ly
        );
        self.bg_fifo.clear();
        // WX below 7 puts the window's left edge off screen.
        self.discard = 7u8.saturating_sub(ctx.regs.wx);
        self.bg_fetcher = Fetcher::new(BgLayer::window(self.x > 0));
        self.window_drawn = true;
    }

    fn shift_out(&mut self, ctx: &LineContext) -> Option<(u8, [u8; 3])> {
        let bg = self.bg_fifo.pop()?;
        if self.discard > 0 {
            self.discard -= 1;
            return None;
        }
        let obj = self.obj_fifo.pop();
        let rgb = mix(ctx, bg, obj);
        let x = self.x;
        self.x += 1;
        Some((x, rgb))
    }
}

/// Resolve background against object and look up the final color.
fn mix(ctx: &LineContext, bg: Pixel, obj: Option<Pixel>) -> [u8; 3] {
    let lcdc = ctx.regs.lcdc;
    let bg_enabled = lcdc.contains(Lcdc::BG_ENABLE);
    let obj = obj.filter(|p| p.color != 0 && lcdc.contains(Lcdc::OBJ_ENABLE));

    if ctx.color {
        if let Some(obj) = obj {
            // BG_ENABLE clear on CGB strips the background of priority.
            let bg_wins = bg_enabled && bg.color != 0 && (bg.bg_priority || obj.bg_priority);
            if !bg_wins {
                return ctx.obj_palettes.rgb(obj.palette, obj.color);
            }
        }
        return ctx.bg_palettes.rgb(bg.palette, bg.color);
    }

    let bg_color = if bg_enabled { bg.color } else { 0 };
    if let Some(obj) = obj {
        if !obj.bg_priority || bg_color == 0 {
            let palette = if obj.palette == 0 {
                ctx.regs.obp0
            } else {
                ctx.regs.obp1
            };
            return dmg_rgb(palette, obj.color);
        }
    }
    if bg_enabled {
        dmg_rgb(ctx.regs.bgp, bg_color)
    } else {
        [DMG_SHADES[0]; 3]
    }
}
