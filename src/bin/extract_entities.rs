//! `extract-entities`: named entities of a Spanish text as one JSON line.

use std::process::ExitCode;

use anyhow::Result;
use es_extract::{
    cli::extract::{self, Args},
    config::NerSettings,
    logging,
};
use tracing::info;

fn main() -> Result<ExitCode> {
    logging::init_tracing()?;
    let args = Args::parse();
    let settings = NerSettings::load()?;

    info!(?args, backend = ?settings.backend, "starting extract-entities");
    extract::run(args, settings)
}
