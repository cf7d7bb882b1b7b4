//! Entity extraction and zero-shot classification for Spanish text.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod nlp;
pub mod output;

pub use error::{NlpError, Result};
