use std::{collections::HashMap, iter};

use ratatui::{buffer::Buffer, layout::Rect, style::Style, text::Line, widgets::Widget};
use trowel_engine::{BaseKind, Catalog, ItemId, ItemKind, OverlayKind, SpriteProvider};

use crate::ui::widgets::style;

/// Terminal art for one tile layer: up to two text rows over a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    rows: [&'static str; 2],
    style: Style,
}

/// Base art per corner variant, indexed by sprite index.
const CORNERS: [[&str; 2]; 5] = [
    ["", ""],
    ["┌   ", ""],
    ["   ┐", ""],
    ["", "└   "],
    ["", "   ┘"],
];

/// Overlay art per amount step.
const FLOWERS: [&str; 3] = ["*", "* *", "***"];
const HEDGES: [&str; 3] = ["#", "# #", "###"];
const SHRUBS: [&str; 3] = ["@", "@ @", "@@@"];

impl Glyph {
    #[must_use]
    pub fn rows(&self) -> [&'static str; 2] {
        self.rows
    }

    fn base(base: BaseKind, index: usize) -> Option<Self> {
        let style = match base {
            BaseKind::Dirt => style::DIRT,
            BaseKind::Grass => style::GRASS,
            BaseKind::Pavement => style::PAVEMENT,
            BaseKind::Gravel => style::GRAVEL,
            BaseKind::Moss => style::MOSS,
        };
        Some(Self {
            rows: *CORNERS.get(index)?,
            style,
        })
    }

    fn overlay(overlay: OverlayKind, index: usize) -> Option<Self> {
        let (symbols, style) = match overlay {
            OverlayKind::None => return None,
            OverlayKind::Flowers => (FLOWERS, style::FLOWERS),
            OverlayKind::Hedges => (HEDGES, style::HEDGES),
            OverlayKind::Shrubs => (SHRUBS, style::SHRUBS),
        };
        let symbol = *symbols.get(index).or(symbols.last())?;
        Some(Self {
            rows: [symbol, ""],
            style,
        })
    }
}

impl Widget for Glyph {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &Glyph {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.style);
        for (text, row) in iter::zip(self.rows(), area.rows()) {
            if !text.is_empty() {
                Line::styled(text, self.style).centered().render(row, buf);
            }
        }
    }
}

/// [`SpriteProvider`] drawing catalog items as colored text.
#[derive(Debug, Clone)]
pub struct GlyphSprites {
    kinds: HashMap<ItemId, ItemKind>,
}

impl GlyphSprites {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            kinds: catalog.iter().map(|item| (item.id, item.kind)).collect(),
        }
    }
}

impl SpriteProvider for GlyphSprites {
    type Sprite = Glyph;

    fn sprite_variant(&self, item: ItemId, index: usize) -> Option<Glyph> {
        match *self.kinds.get(&item)? {
            ItemKind::Base(base) => Glyph::base(base, index),
            ItemKind::Overlay(overlay) => Glyph::overlay(overlay, index),
        }
    }

    fn display_sprite(&self, item: ItemId, amount: u8) -> Option<Glyph> {
        match *self.kinds.get(&item)? {
            ItemKind::Base(base) => Glyph::base(base, 0),
            ItemKind::Overlay(overlay) => Glyph::overlay(overlay, usize::from(amount)),
        }
    }
}
