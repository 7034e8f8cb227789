use log::info;
use trowel_engine::Persistence as _;

use crate::command::CommonArg;

pub(crate) fn run(common: &CommonArg) -> anyhow::Result<()> {
    let mut store = common.open_store()?;
    store.delete_all()?;
    info!("deleted save data at {}", store.path().display());
    println!("Deleted save data: {}", store.path().display());
    Ok(())
}
