use log::info;
use rand::Rng as _;
use trowel_engine::{GardenGame, GardenSeed};

use crate::{
    command::{CommonArg, play::app::PlayApp},
    tui::Runtime,
};

mod app;
mod controls;
mod shell;
mod view;

/// Seconds each panel transition takes when not given.
const DEFAULT_TRANSITION_SECS: f32 = 0.25;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for judge tastes and narratives (32 hex characters)
    #[clap(long)]
    seed: Option<GardenSeed>,
    /// Duration of panel transitions in seconds
    #[clap(long)]
    transition_secs: Option<f32>,
}

pub(crate) fn run(common: &CommonArg, arg: &PlayArg) -> anyhow::Result<()> {
    let config = common.load_config()?;
    let catalog = common.load_catalog()?;
    let store = common.open_store()?;
    info!("save file: {}", store.path().display());

    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    info!("seed: {seed}");

    let game = GardenGame::new(config, catalog, Box::new(store), seed);
    let transition_secs = arg.transition_secs.unwrap_or(DEFAULT_TRANSITION_SECS);
    let mut app = PlayApp::new(game, transition_secs);
    Runtime::new().run(&mut app)?;
    Ok(())
}
