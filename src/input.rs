//! Resolution of the text to analyse from stdin or command arguments.

use std::io::{self, IsTerminal, Read};

use tracing::{debug, warn};

use crate::error::Result;

/// Where the resolved text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Stdin,
    Args,
}

/// Text handed to a pipeline, created once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub text: String,
    pub source: TextSource,
}

/// Pick the input text.
///
/// Piped stdin is read whole, trimmed and wins over `args`. When stdin is
/// interactive, or piped but blank, the arguments are joined with single
/// spaces. `Ok(None)` means neither source produced text.
pub fn resolve<R: Read>(
    mut stdin: R,
    interactive: bool,
    args: &[String],
) -> Result<Option<TextInput>> {
    if !interactive {
        let mut buffer = String::new();
        stdin.read_to_string(&mut buffer)?;
        let text = buffer.trim();
        if !text.is_empty() {
            debug!(bytes = text.len(), "using piped stdin");
            return Ok(Some(TextInput {
                text: text.to_string(),
                source: TextSource::Stdin,
            }));
        }
        if !args.is_empty() {
            warn!("stdin was piped but empty; falling back to arguments");
        }
    }

    if args.is_empty() {
        return Ok(None);
    }
    Ok(Some(TextInput {
        text: args.join(" "),
        source: TextSource::Args,
    }))
}

/// Resolve against the real process stdin.
pub fn resolve_from_process(args: &[String]) -> Result<Option<TextInput>> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    resolve(stdin.lock(), interactive, args)
}
