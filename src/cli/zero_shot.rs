//! CLI entry-point for zero-shot classification of a fixed text.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::instrument;

use crate::{config::ZeroShotSettings, nlp, nlp::zero_shot};

/// Text scored by `zero-shot`.
pub const TEXT: &str = "
El Instituto de Investigaciones en Biodiversidad y Medioambiente (INIBIOMA) es un centro de investigación científica ubicado en la ciudad de San Carlos de Bariloche, Argentina. Fue fundado en 1985 y depende del Consejo Nacional de Investigaciones Científicas y Técnicas (CONICET) y de la Universidad Nacional del Comahue (UNCo).
";

/// Candidate labels, in the order handed to the model.
pub const LABELS: [&str; 5] = [
    "miembros de un instituto",
    "instituciones",
    "publicaciones",
    "proyectos",
    "listado de personas",
];

/// `zero-shot` takes no arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "zero-shot",
    author,
    version,
    about = "Score a fixed Spanish text against fixed candidate labels",
    long_about = None
)]
pub struct Args {}

impl Args {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[instrument(skip_all)]
pub fn run(_args: Args, settings: ZeroShotSettings) -> Result<()> {
    let labels: Vec<String> = LABELS.iter().map(|label| label.to_string()).collect();
    let mut oracle = zero_shot::load_model(&settings).context("loading zero-shot model")?;
    let result = nlp::classify(oracle.as_mut(), TEXT, &labels).context("classifying text")?;
    println!("{result:?}");
    Ok(())
}
