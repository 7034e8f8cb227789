//! Static garden data: the placeable-item catalog and the tile grid.
//!
//! - [`Catalog`] / [`PlaceableItem`] - immutable items the player can buy
//! - [`Grid`] / [`Tile`] - the fixed-size plot being decorated

pub use self::{catalog::*, grid::*};

pub(crate) mod catalog;
pub(crate) mod grid;
