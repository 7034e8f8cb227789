use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// Terrain material underneath a tile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum BaseKind {
    #[default]
    Dirt,
    Grass,
    Pavement,
    Gravel,
    Moss,
}

/// Decoration layered on top of a tile's base.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    #[default]
    None,
    Flowers,
    Hedges,
    Shrubs,
}

impl OverlayKind {
    /// Overlay kinds a judge can have an opinion about.
    pub const PLANTS: [OverlayKind; 3] = [OverlayKind::Flowers, OverlayKind::Hedges, OverlayKind::Shrubs];

    /// Maps a preference bucket onto an overlay kind.
    ///
    /// Bucket `0` and anything outside `1..=3` mean "no opinion".
    #[must_use]
    pub fn from_bucket(bucket: i32) -> Self {
        usize::try_from(bucket)
            .ok()
            .and_then(|b| b.checked_sub(1))
            .and_then(|i| Self::PLANTS.get(i).copied())
            .unwrap_or(OverlayKind::None)
    }
}

/// Stable identifier of a catalog entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
#[display("#{_0}")]
pub struct ItemId(pub u16);

/// Which layer of a tile an item paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Base(BaseKind),
    Overlay(OverlayKind),
}

/// A purchasable base or overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceableItem {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    pub cost: f64,
    pub value: f64,
    /// Unlock level at which the item becomes selectable.
    pub unlock_tier: u32,
    /// Asset key handed to the sprite provider.
    pub sprite: String,
}

impl PlaceableItem {
    #[must_use]
    pub fn is_overlay(&self) -> bool {
        matches!(self.kind, ItemKind::Overlay(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogData {
    default_base: ItemId,
    items: Vec<PlaceableItem>,
}

/// Immutable list of every item the player can place.
///
/// Items are kept in display order; selection cycling walks this order and
/// includes items that are still locked.
///
/// # Example
///
/// ```
/// use trowel_engine::{Catalog, ItemId};
///
/// let catalog = Catalog::standard();
/// assert!(catalog.is_unlocked(catalog.default_base().id, 1));
/// assert!(!catalog.is_unlocked(ItemId(999), 100));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CatalogData", into = "CatalogData")]
pub struct Catalog {
    items: Vec<PlaceableItem>,
    default_base: usize,
}

impl TryFrom<CatalogData> for Catalog {
    type Error = CatalogError;

    fn try_from(data: CatalogData) -> Result<Self, Self::Error> {
        Self::new(data.items, data.default_base)
    }
}

impl From<Catalog> for CatalogData {
    fn from(catalog: Catalog) -> Self {
        let default_base = catalog.default_base().id;
        Self {
            default_base,
            items: catalog.items,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    pub fn new(items: Vec<PlaceableItem>, default_base: ItemId) -> Result<Self, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
        }
        let index = items
            .iter()
            .position(|item| item.id == default_base)
            .ok_or(CatalogError::MissingDefaultBase(default_base))?;
        if items[index].is_overlay() {
            return Err(CatalogError::DefaultBaseIsOverlay(default_base));
        }
        Ok(Self {
            items,
            default_base: index,
        })
    }

    /// The built-in garden catalog.
    #[must_use]
    pub fn standard() -> Self {
        fn item(id: u16, name: &str, kind: ItemKind, cost: f64, value: f64, tier: u32) -> PlaceableItem {
            PlaceableItem {
                id: ItemId(id),
                name: name.to_owned(),
                kind,
                cost,
                value,
                unlock_tier: tier,
                sprite: name.to_lowercase(),
            }
        }
        use ItemKind::{Base, Overlay};
        let items = vec![
            item(0, "Dirt", Base(BaseKind::Dirt), 10.0, 0.0, 0),
            item(1, "Grass", Base(BaseKind::Grass), 100.0, 1.0, 0),
            item(2, "Flowers", Overlay(OverlayKind::Flowers), 250.0, 2.0, 0),
            item(3, "Pavement", Base(BaseKind::Pavement), 150.0, 1.0, 1),
            item(4, "Hedges", Overlay(OverlayKind::Hedges), 400.0, 3.0, 2),
            item(5, "Gravel", Base(BaseKind::Gravel), 120.0, 1.0, 3),
            item(6, "Shrubs", Overlay(OverlayKind::Shrubs), 600.0, 4.0, 4),
            item(7, "Moss", Base(BaseKind::Moss), 300.0, 2.0, 6),
        ];
        match Self::new(items, ItemId(0)) {
            Ok(catalog) => catalog,
            Err(e) => unreachable!("standard catalog is valid: {e}"),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaceableItem> + '_ {
        self.items.iter()
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&PlaceableItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns the item at a selection index (display order).
    #[must_use]
    pub fn item_at(&self, index: usize) -> Option<&PlaceableItem> {
        self.items.get(index)
    }

    /// The base a tile is reset to, and the base fresh tiles start with.
    #[must_use]
    pub fn default_base(&self) -> &PlaceableItem {
        &self.items[self.default_base]
    }

    /// Returns whether an item is selectable at `level`.
    ///
    /// Unknown ids are never unlocked.
    #[must_use]
    pub fn is_unlocked(&self, id: ItemId, level: u32) -> bool {
        self.get(id).is_some_and(|item| item.unlock_tier <= level)
    }

    /// Items that become available when the unlock level moves from
    /// `previous` to `current`.
    pub fn unlocked_between(
        &self,
        previous: u32,
        current: u32,
    ) -> impl Iterator<Item = &PlaceableItem> + '_ {
        self.items
            .iter()
            .filter(move |item| item.unlock_tier > previous && item.unlock_tier <= current)
    }
}
