//! CLI entry-point for named-entity extraction.

use std::{io, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, instrument};

use crate::{config::NerSettings, input, nlp, nlp::ner};

/// Printed on stdout when neither stdin nor arguments carry text.
pub const USAGE: &str = "Uso: extract-entities 'Texto a analizar'";

/// Args for `extract-entities`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "extract-entities",
    author,
    version,
    about = "Print the named entities of a Spanish text as JSON",
    long_about = None
)]
pub struct Args {
    /// Text to analyse; ignored when text is piped on stdin.
    #[arg(
        value_name = "TEXT",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub text: Vec<String>,
}

impl Args {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[instrument(skip_all)]
pub fn run(args: Args, settings: NerSettings) -> Result<ExitCode> {
    let Some(text) = input::resolve_from_process(&args.text).context("reading input")? else {
        println!("{USAGE}");
        return Ok(ExitCode::from(1));
    };
    info!(source = ?text.source, bytes = text.text.len(), "resolved input");

    let mut oracle = ner::load_model(&settings).context("loading NER model")?;
    let entities = nlp::extract_entities(oracle.as_mut(), &text.text).context("running NER")?;
    entities
        .write_line(io::stdout().lock())
        .context("writing entities")?;
    Ok(ExitCode::SUCCESS)
}
