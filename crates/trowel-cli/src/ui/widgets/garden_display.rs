use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use trowel_engine::{Grid, TilePos, tile_sprites};

use crate::ui::widgets::{GlyphSprites, style};

pub const TILE_WIDTH: u16 = 4;
pub const TILE_HEIGHT: u16 = 2;

/// The garden plot, drawn top row first.
#[derive(Debug)]
pub struct GardenDisplay<'a> {
    grid: &'a Grid,
    sprites: &'a GlyphSprites,
    hovered: Option<TilePos>,
    flashes: &'a [TilePos],
    offset: (i16, i16),
    block: Option<BlockWidget<'a>>,
}

impl<'a> GardenDisplay<'a> {
    pub fn new(grid: &'a Grid, sprites: &'a GlyphSprites) -> Self {
        Self {
            grid,
            sprites,
            hovered: None,
            flashes: &[],
            offset: (0, 0),
            block: None,
        }
    }

    pub fn hovered(self, hovered: Option<TilePos>) -> Self {
        Self { hovered, ..self }
    }

    /// Tiles highlighted for placement feedback.
    pub fn flashes(self, flashes: &'a [TilePos]) -> Self {
        Self { flashes, ..self }
    }

    /// Screen shake, in cells.
    pub fn offset(self, offset: (i16, i16)) -> Self {
        Self { offset, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        u16::try_from(self.grid.width())
            .unwrap_or(u16::MAX)
            .saturating_mul(TILE_WIDTH)
            .saturating_add(super::block_margins(self.block.as_ref()).0)
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.grid.height())
            .unwrap_or(u16::MAX)
            .saturating_mul(TILE_HEIGHT)
            .saturating_add(super::block_margins(self.block.as_ref()).1)
    }

    /// Maps a terminal cell inside the plot area back to a tile.
    pub fn pos_at(inner: Rect, grid: &Grid, cell: Position) -> Option<TilePos> {
        if !inner.contains(cell) {
            return None;
        }
        let x = usize::from((cell.x - inner.x) / TILE_WIDTH);
        let row = usize::from((cell.y - inner.y) / TILE_HEIGHT);
        let y = grid.height().checked_sub(row + 1)?;
        let pos = TilePos::new(x, y);
        grid.contains(pos).then_some(pos)
    }

    fn tile_rect(&self, inner: Rect, pos: TilePos) -> Option<Rect> {
        let (dx, dy) = self.offset;
        let column = u16::try_from(pos.x).ok()?;
        let row = u16::try_from(self.grid.height().checked_sub(pos.y + 1)?).ok()?;
        let x = inner
            .x
            .checked_add(column.checked_mul(TILE_WIDTH)?)?
            .checked_add_signed(dx)?;
        let y = inner
            .y
            .checked_add(row.checked_mul(TILE_HEIGHT)?)?
            .checked_add_signed(dy)?;
        let rect = Rect::new(x, y, TILE_WIDTH, TILE_HEIGHT).intersection(inner);
        (!rect.is_empty()).then_some(rect)
    }
}

impl Widget for GardenDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GardenDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        for tile in self.grid.tiles() {
            let Some(rect) = self.tile_rect(area, tile.pos()) else {
                continue;
            };
            let (base, overlay) = tile_sprites(self.sprites, tile);
            if let Some(base) = base {
                base.render(rect, buf);
            }
            if let Some(overlay) = overlay {
                overlay.render(rect, buf);
            }
            if self.flashes.contains(&tile.pos()) {
                buf.set_style(rect, style::FLASH);
            }
            if self.hovered == Some(tile.pos()) {
                buf.set_style(rect, style::HOVERED);
            }
        }
    }
}
