use serde::{Deserialize, Serialize};

use super::catalog::{BaseKind, ItemId, ItemKind, OverlayKind, PlaceableItem};

/// Side length of the standard square garden.
pub const GRID_SIZE: usize = 10;

/// Cell coordinates, `(0, 0)` at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("({x}, {y})")]
pub struct TilePos {
    pub x: usize,
    pub y: usize,
}

impl TilePos {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Sprite variant of a tile's base.
///
/// Corner tiles use dedicated edge art; everything else uses the default
/// variant. The variant is derived from position only, so repainting a corner
/// keeps its corner art.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileVariant {
    #[default]
    Default,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl TileVariant {
    #[must_use]
    pub fn for_position(pos: TilePos, width: usize, height: usize) -> Self {
        let right = width.saturating_sub(1);
        let top = height.saturating_sub(1);
        match (pos.x, pos.y) {
            (0, 0) => TileVariant::BottomLeft,
            (0, y) if y == top => TileVariant::TopLeft,
            (x, 0) if x == right => TileVariant::BottomRight,
            (x, y) if x == right && y == top => TileVariant::TopRight,
            _ => TileVariant::Default,
        }
    }

    /// Index into an item's sprite sheet.
    #[must_use]
    pub const fn sprite_index(self) -> usize {
        match self {
            TileVariant::Default => 0,
            TileVariant::TopLeft => 1,
            TileVariant::TopRight => 2,
            TileVariant::BottomLeft => 3,
            TileVariant::BottomRight => 4,
        }
    }
}

/// A single garden cell.
///
/// `value` is the contribution of whichever layer was painted last; resetting
/// a tile restores the default base's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pos: TilePos,
    variant: TileVariant,
    base: BaseKind,
    base_item: ItemId,
    overlay: OverlayKind,
    overlay_item: Option<ItemId>,
    overlay_amount: u8,
    value: f64,
}

impl Tile {
    #[must_use]
    pub fn pos(&self) -> TilePos {
        self.pos
    }

    #[must_use]
    pub fn variant(&self) -> TileVariant {
        self.variant
    }

    #[must_use]
    pub fn base(&self) -> BaseKind {
        self.base
    }

    #[must_use]
    pub fn base_item(&self) -> ItemId {
        self.base_item
    }

    #[must_use]
    pub fn overlay(&self) -> OverlayKind {
        self.overlay
    }

    #[must_use]
    pub fn overlay_item(&self) -> Option<ItemId> {
        self.overlay_item
    }

    /// Amount index (`0..3`) of the overlay, for sprite selection.
    #[must_use]
    pub fn overlay_amount(&self) -> u8 {
        self.overlay_amount
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Fixed-size garden plot.
///
/// # Example
///
/// ```
/// use trowel_engine::{BaseKind, Catalog, Grid, TilePos, TileVariant};
///
/// let catalog = Catalog::standard();
/// let mut grid = Grid::new(10, 10, catalog.default_base());
///
/// let corner = TilePos::new(0, 0);
/// assert!(grid.set_base(corner, catalog.item_at(1).unwrap()));
/// let tile = grid.tile(corner).unwrap();
/// assert_eq!(tile.base(), BaseKind::Grass);
/// assert_eq!(tile.variant(), TileVariant::BottomLeft);
/// ```
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a `width` x `height` grid painted with `default_base`.
    #[must_use]
    pub fn new(width: usize, height: usize, default_base: &PlaceableItem) -> Self {
        let base = match default_base.kind {
            ItemKind::Base(kind) => kind,
            ItemKind::Overlay(_) => BaseKind::default(),
        };
        let mut tiles = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                let pos = TilePos::new(x, y);
                tiles.push(Tile {
                    pos,
                    variant: TileVariant::for_position(pos, width, height),
                    base,
                    base_item: default_base.id,
                    overlay: OverlayKind::None,
                    overlay_item: None,
                    overlay_amount: 0,
                    value: default_base.value,
                });
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: TilePos) -> Option<usize> {
        self.contains(pos).then_some(pos.x * self.height + pos.y)
    }

    #[must_use]
    pub fn tile(&self, pos: TilePos) -> Option<&Tile> {
        self.tiles.get(self.index(pos)?)
    }

    fn tile_mut(&mut self, pos: TilePos) -> Option<&mut Tile> {
        let index = self.index(pos)?;
        self.tiles.get_mut(index)
    }

    /// All tiles, column by column.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Returns whether painting `item` at `pos` would change anything.
    #[must_use]
    pub fn would_change(&self, pos: TilePos, item: &PlaceableItem) -> bool {
        let Some(tile) = self.tile(pos) else {
            return false;
        };
        match item.kind {
            ItemKind::Base(kind) => tile.base != kind,
            ItemKind::Overlay(kind) => tile.overlay != kind,
        }
    }

    /// Paints a base material.
    ///
    /// Returns `false` without touching the tile if the base already matches,
    /// the position is outside the grid, or `item` is an overlay.
    pub fn set_base(&mut self, pos: TilePos, item: &PlaceableItem) -> bool {
        let ItemKind::Base(kind) = item.kind else {
            return false;
        };
        let (width, height) = (self.width, self.height);
        let Some(tile) = self.tile_mut(pos) else {
            return false;
        };
        if tile.base == kind {
            return false;
        }
        tile.base = kind;
        tile.base_item = item.id;
        tile.value = item.value;
        tile.variant = TileVariant::for_position(pos, width, height);
        true
    }

    /// Paints an overlay with the given amount index.
    ///
    /// Returns `false` without touching the tile if the overlay already
    /// matches, the position is outside the grid, or `item` is a base.
    pub fn set_overlay(&mut self, pos: TilePos, item: &PlaceableItem, amount: u8) -> bool {
        let ItemKind::Overlay(kind) = item.kind else {
            return false;
        };
        let Some(tile) = self.tile_mut(pos) else {
            return false;
        };
        if tile.overlay == kind {
            return false;
        }
        tile.overlay = kind;
        tile.overlay_item = (!kind.is_none()).then_some(item.id);
        tile.overlay_amount = amount;
        tile.value = item.value;
        true
    }

    /// Strips the overlay and repaints `default_base`, unconditionally.
    pub fn reset_tile(&mut self, pos: TilePos, default_base: &PlaceableItem) -> bool {
        let ItemKind::Base(kind) = default_base.kind else {
            return false;
        };
        let (width, height) = (self.width, self.height);
        let Some(tile) = self.tile_mut(pos) else {
            return false;
        };
        tile.overlay = OverlayKind::None;
        tile.overlay_item = None;
        tile.overlay_amount = 0;
        tile.base = kind;
        tile.base_item = default_base.id;
        tile.value = default_base.value;
        tile.variant = TileVariant::for_position(pos, width, height);
        true
    }

    /// Destroys every tile.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
