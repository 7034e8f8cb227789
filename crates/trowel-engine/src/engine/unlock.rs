use log::{debug, warn};

use crate::{Catalog, ItemId, Persistence, Verdict};

/// Persistence key of the unlock level.
pub const UNLOCK_LEVEL_KEY: &str = "UnlockLevel";

/// Persistent progression gate over the catalog.
///
/// The level never decreases except through a full data reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockState {
    level: u32,
}

/// Items revealed by one [`UnlockState::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockReveal {
    pub previous_level: u32,
    pub level: u32,
    pub items: Vec<ItemId>,
}

impl UnlockReveal {
    /// Returns whether the advance made nothing new available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for UnlockState {
    fn default() -> Self {
        Self {
            level: Self::INITIAL_LEVEL,
        }
    }
}

impl UnlockState {
    /// Level of a player that has never finished a garden.
    pub const INITIAL_LEVEL: u32 = 1;

    /// Reads the stored level; a missing or nonsensical value becomes
    /// [`Self::INITIAL_LEVEL`].
    #[must_use]
    pub fn load(store: &dyn Persistence) -> Self {
        let level = store
            .get_int(UNLOCK_LEVEL_KEY)
            .and_then(|level| u32::try_from(level).ok())
            .map_or(Self::INITIAL_LEVEL, |level| level.max(Self::INITIAL_LEVEL));
        Self { level }
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Advances the level after a judged garden and persists it immediately.
    ///
    /// A best garden is worth two levels, any other finish one.
    pub fn advance(
        &mut self,
        verdict: Verdict,
        store: &mut dyn Persistence,
        catalog: &Catalog,
    ) -> UnlockReveal {
        let previous_level = self.level;
        let step = if verdict.is_success() { 2 } else { 1 };
        self.level = self.level.saturating_add(step);
        if let Err(e) = store.set_int(UNLOCK_LEVEL_KEY, i64::from(self.level)) {
            warn!("failed to persist unlock level {}: {e}", self.level);
        }
        let items: Vec<_> = catalog
            .unlocked_between(previous_level, self.level)
            .map(|item| item.id)
            .collect();
        debug!(
            "unlock level {previous_level} -> {}, {} new item(s)",
            self.level,
            items.len()
        );
        UnlockReveal {
            previous_level,
            level: self.level,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::MemoryStore;

    use super::*;

    #[test]
    fn test_load_defaults_and_clamps() {
        let mut store = MemoryStore::new();
        assert_eq!(UnlockState::load(&store).level(), 1);

        store.set_int(UNLOCK_LEVEL_KEY, 0).unwrap();
        assert_eq!(UnlockState::load(&store).level(), 1);
        store.set_int(UNLOCK_LEVEL_KEY, -4).unwrap();
        assert_eq!(UnlockState::load(&store).level(), 1);
        store.set_int(UNLOCK_LEVEL_KEY, 5).unwrap();
        assert_eq!(UnlockState::load(&store).level(), 5);
    }

    #[test]
    fn test_best_garden_advances_two_levels() {
        let catalog = Catalog::standard();
        let mut store = MemoryStore::new();
        let mut state = UnlockState::load(&store);

        let reveal = state.advance(Verdict::Success, &mut store, &catalog);
        assert_eq!((reveal.previous_level, reveal.level), (1, 3));
        assert_eq!(store.get_int(UNLOCK_LEVEL_KEY), Some(3));
        let names: Vec<_> = reveal
            .items
            .iter()
            .map(|&id| catalog.get(id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, ["Hedges", "Gravel"]);
    }

    #[test]
    fn test_plain_finish_advances_one_level() {
        let catalog = Catalog::standard();
        let mut store = MemoryStore::new();
        store.set_int(UNLOCK_LEVEL_KEY, 4).unwrap();
        let mut state = UnlockState::load(&store);

        let reveal = state.advance(Verdict::Fail, &mut store, &catalog);
        assert_eq!(reveal.level, 5);
        // Nothing sits at tier 5 in the standard catalog.
        assert!(reveal.is_empty());
        assert_eq!(UnlockState::load(&store).level(), 5);
    }
}
