//! Command-line interface wiring for the es-extract binaries.

pub mod extract;
pub mod zero_shot;
