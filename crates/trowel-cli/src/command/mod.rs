use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use env_logger::Target;
use log::LevelFilter;
use trowel_engine::{Catalog, GameConfig};

use crate::{command::play::PlayArg, store::JsonFileStore, util};

mod catalog;
mod play;
mod reset_data;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[clap(flatten)]
    common: CommonArg,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// List the item catalog and what is unlocked
    Catalog(#[clap(flatten)] catalog::CatalogArg),
    /// Delete the save file
    ResetData,
}

/// Options shared by every mode.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CommonArg {
    /// Game tuning file (JSON); missing fields keep their defaults
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// Item catalog file (JSON); the built-in catalog is used when omitted
    #[clap(long, global = true)]
    catalog: Option<PathBuf>,
    /// Where unlock progress and volume are saved
    #[clap(long, global = true, default_value = "./data/trowel.json")]
    save_file: PathBuf,
    /// Write log messages to this file
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// Most verbose log level to record
    #[clap(long, global = true, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

impl CommonArg {
    pub(crate) fn load_config(&self) -> anyhow::Result<GameConfig> {
        match &self.config {
            Some(path) => util::read_json_file("config", path),
            None => Ok(GameConfig::default()),
        }
    }

    pub(crate) fn load_catalog(&self) -> anyhow::Result<Catalog> {
        match &self.catalog {
            Some(path) => util::read_json_file("catalog", path),
            None => Ok(Catalog::standard()),
        }
    }

    pub(crate) fn open_store(&self) -> anyhow::Result<JsonFileStore> {
        JsonFileStore::open(&self.save_file)
    }
}

/// Sets up `env_logger`.
///
/// `RUST_LOG` overrides `--log-level`. The terminal belongs to the game while
/// playing, so without a log file the play mode records nothing.
fn init_logger(common: &CommonArg, mode: &Mode) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(common.log_level).parse_default_env();
    match &common.log_file {
        Some(path) => {
            builder.target(Target::Pipe(Box::new(create_log_file(path)?)));
        }
        None if matches!(mode, Mode::Play(_)) => return Ok(()),
        None => {
            builder.target(Target::Stderr);
        }
    }
    builder
        .try_init()
        .context("Failed to initialize the logger")?;
    Ok(())
}

fn create_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("Failed to create log file: {}", path.display()))
}

pub fn run() -> anyhow::Result<()> {
    let CommandArgs { common, mode } = CommandArgs::parse();
    let mode = mode.unwrap_or(Mode::Play(PlayArg::default()));
    init_logger(&common, &mode)?;
    match mode {
        Mode::Play(arg) => play::run(&common, &arg)?,
        Mode::Catalog(arg) => catalog::run(&common, &arg)?,
        Mode::ResetData => reset_data::run(&common)?,
    }
    Ok(())
}
