pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reasons a placement or tile reset was refused.
///
/// The input path discards these: a refused placement spends nothing and
/// fires no feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    #[display("placement is only accepted while playing")]
    NotPlaying,
    #[display("no tile is selected")]
    NoTileSelected,
    #[display("selected item is not in the catalog")]
    UnknownItem,
    #[display("selected item is still locked")]
    ItemLocked,
    #[display("tile already has this material")]
    AlreadyPlaced,
    #[display("not enough budget left")]
    Unaffordable,
}

/// A command was issued in a phase that does not accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cannot {action} during the {phase} phase")]
pub struct PhaseError {
    pub action: &'static str,
    pub phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CatalogError {
    #[display("catalog has no items")]
    Empty,
    #[display("item id {_0} appears more than once")]
    DuplicateId(#[error(not(source))] ItemId),
    #[display("default base {_0} is not in the catalog")]
    MissingDefaultBase(#[error(not(source))] ItemId),
    #[display("default base {_0} is an overlay item")]
    DefaultBaseIsOverlay(#[error(not(source))] ItemId),
}

/// Any refusal from [`GardenGame::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CommandError {
    Phase(PhaseError),
    Placement(PlacementError),
}
