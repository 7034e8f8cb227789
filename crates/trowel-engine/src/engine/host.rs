//! Seams to the outside world.
//!
//! The game never calls a collaborator directly. It records [`GameEvent`]s
//! that the driver drains each frame and routes with [`dispatch`]; the only
//! inbound calls are [`Persistence`] reads and writes.

use std::collections::HashMap;

use crate::{CountdownStage, ItemId, Phase, Tile, TilePos, TransitionTicket};

/// A key/value store write or wipe failed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("persistence failed: {reason}")]
pub struct StoreError {
    #[error(not(source))]
    reason: String,
}

impl StoreError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Last-write-wins integer settings store.
pub trait Persistence {
    fn get_int(&self, key: &str) -> Option<i64>;
    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError>;
    fn delete_all(&mut self) -> Result<(), StoreError>;
}

/// In-memory [`Persistence`], for tests and throwaway runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for MemoryStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.values.clear();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SfxKind {
    PlaceTile,
    DeleteTile,
    NextSelect,
    PreviousSelect,
    PlusAmount,
    MinusAmount,
    Countdown,
    CountdownEnd,
    FinishRound,
}

/// Fire-and-forget sound effects.
pub trait AudioSink {
    fn play_effect(&mut self, kind: SfxKind);
}

/// Plays show/hide animations.
///
/// Every begun ticket must eventually be passed back to
/// [`GardenGame::complete_transition`](crate::GardenGame::complete_transition),
/// once.
pub trait UiShell {
    fn begin(&mut self, ticket: TransitionTicket);
}

/// Stateless sprite lookup.
pub trait SpriteProvider {
    type Sprite;

    /// Sprite of `item` for a corner variant (bases) or amount index
    /// (overlays).
    fn sprite_variant(&self, item: ItemId, index: usize) -> Option<Self::Sprite>;

    /// Sprite shown in the "selected item" slot.
    fn display_sprite(&self, item: ItemId, amount: u8) -> Option<Self::Sprite>;
}

/// Base and overlay sprites of a tile.
pub fn tile_sprites<P>(provider: &P, tile: &Tile) -> (Option<P::Sprite>, Option<P::Sprite>)
where
    P: SpriteProvider + ?Sized,
{
    let base = provider.sprite_variant(tile.base_item(), tile.variant().sprite_index());
    let overlay = tile
        .overlay_item()
        .and_then(|item| provider.sprite_variant(item, usize::from(tile.overlay_amount())));
    (base, overlay)
}

/// Something the host should react to.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum GameEvent {
    Sfx(SfxKind),
    Transition(TransitionTicket),
    /// A tile was painted; drives placement particles and shake.
    PlacementFeedback { pos: TilePos, item: ItemId },
    TileReset { pos: TilePos },
    CountdownStage(CountdownStage),
    PhaseChanged(Phase),
    UnlocksRevealed(Vec<ItemId>),
    NoNewUnlocks,
    VolumeChanged(f32),
    SelectionChanged { item: ItemId, amount: u8 },
}

/// Routes sound and transition events to their sinks.
///
/// Returns the events neither sink consumes, in order.
pub fn dispatch<I>(events: I, audio: &mut dyn AudioSink, shell: &mut dyn UiShell) -> Vec<GameEvent>
where
    I: IntoIterator<Item = GameEvent>,
{
    let mut rest = vec![];
    for event in events {
        match event {
            GameEvent::Sfx(kind) => audio.play_effect(kind),
            GameEvent::Transition(ticket) => shell.begin(ticket),
            event => rest.push(event),
        }
    }
    rest
}
