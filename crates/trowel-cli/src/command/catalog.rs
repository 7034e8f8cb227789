use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use serde::Serialize;
use trowel_engine::{Catalog, ItemKind, PlaceableItem, UnlockState};

use crate::{command::CommonArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CatalogArg {
    /// Print the catalog as JSON instead of a table
    #[clap(long)]
    json: bool,
    /// Write to this file instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CatalogListing<'a> {
    unlock_level: u32,
    items: Vec<ListedItem<'a>>,
}

#[derive(Debug, Serialize)]
struct ListedItem<'a> {
    #[serde(flatten)]
    item: &'a PlaceableItem,
    unlocked: bool,
}

fn listing(catalog: &Catalog, level: u32) -> CatalogListing<'_> {
    let items = catalog
        .iter()
        .map(|item| ListedItem {
            item,
            unlocked: catalog.is_unlocked(item.id, level),
        })
        .collect();
    CatalogListing {
        unlock_level: level,
        items,
    }
}

fn kind_label(kind: ItemKind) -> String {
    match kind {
        ItemKind::Base(base) => format!("base/{base}"),
        ItemKind::Overlay(overlay) => format!("overlay/{overlay}"),
    }
}

pub(crate) fn run(common: &CommonArg, arg: &CatalogArg) -> anyhow::Result<()> {
    let CatalogArg { json, output } = arg;

    let catalog = common.load_catalog()?;
    let store = common.open_store()?;
    let level = UnlockState::load(&store).level();
    let listing = listing(&catalog, level);

    let mut output = Output::new(output.as_deref())?;
    if *json {
        return output.write_json(&listing);
    }

    write_table(&mut output, &listing)
        .with_context(|| format!("Failed to write catalog to {}", output.name()))?;
    Ok(())
}

fn write_table(output: &mut Output, listing: &CatalogListing) -> io::Result<()> {
    writeln!(output, "Unlock level {}", listing.unlock_level)?;
    writeln!(
        output,
        "{:>4}  {:<12} {:<18} {:>7} {:>6} {:>4}  STATE",
        "ID", "NAME", "KIND", "COST", "VALUE", "TIER"
    )?;
    for ListedItem { item, unlocked } in &listing.items {
        writeln!(
            output,
            "{:>4}  {:<12} {:<18} {:>7.0} {:>6.1} {:>4}  {}",
            item.id.0,
            item.name,
            kind_label(item.kind),
            item.cost,
            item.value,
            item.unlock_tier,
            if *unlocked { "unlocked" } else { "locked" },
        )?;
    }
    output.flush()
}

#[cfg(test)]
mod tests {
    use trowel_engine::{ItemId, MemoryStore, Persistence as _, UNLOCK_LEVEL_KEY};

    use super::*;

    #[test]
    fn test_listing_marks_locked_items() {
        let catalog = Catalog::standard();
        let listing = listing(&catalog, UnlockState::INITIAL_LEVEL);
        assert_eq!(listing.items.len(), catalog.len());

        let base = catalog.default_base().id;
        let entry = listing.items.iter().find(|e| e.item.id == base).unwrap();
        assert!(entry.unlocked);
        assert!(
            listing
                .items
                .iter()
                .all(|e| e.unlocked == (e.item.unlock_tier <= UnlockState::INITIAL_LEVEL))
        );
    }

    #[test]
    fn test_listing_reads_stored_level() {
        let catalog = Catalog::standard();
        let mut store = MemoryStore::new();
        store.set_int(UNLOCK_LEVEL_KEY, 100).unwrap();
        let level = UnlockState::load(&store).level();
        let listing = listing(&catalog, level);
        assert_eq!(listing.unlock_level, 100);
        assert!(listing.items.iter().all(|e| e.unlocked));
        assert!(!catalog.is_unlocked(ItemId(999), level));
    }

    #[test]
    fn test_json_listing_flattens_items() {
        let catalog = Catalog::standard();
        let json = serde_json::to_value(listing(&catalog, 1)).unwrap();
        assert_eq!(json["unlock_level"], 1);
        let first = &json["items"][0];
        assert!(first["name"].is_string());
        assert!(first["unlocked"].is_boolean());
    }
}
