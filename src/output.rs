//! JSON encoding of extracted entities.

use std::io::{self, Write};

use serde::Serialize;

use crate::error::Result;

/// One recognised span as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

/// Entities in detection order, wrapped under the `entities` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityCollection {
    pub entities: Vec<Entity>,
}

impl EntityCollection {
    /// Encode as one JSON line without the trailing newline.
    ///
    /// Items are separated by `", "` and keys by `": "`; non-ASCII text is
    /// written as-is.
    pub fn to_json_line(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the encoded line plus `\n` to `out`.
    pub fn write_line<W: Write>(&self, mut out: W) -> Result<()> {
        let line = self.to_json_line()?;
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}

/// Compact JSON with a space after every `,` and `:`.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}
