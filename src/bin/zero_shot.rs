//! `zero-shot`: rank fixed candidate labels against a fixed text.

use anyhow::Result;
use es_extract::{
    cli::zero_shot::{self, Args},
    config::ZeroShotSettings,
    logging,
};
use tracing::info;

fn main() -> Result<()> {
    logging::init_tracing()?;
    let args = Args::parse();
    let settings = ZeroShotSettings::load()?;

    info!(model = ?settings.model, "starting zero-shot");
    zero_shot::run(args, settings)
}
