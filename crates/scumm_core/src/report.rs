use serde::Serialize;

use crate::block::BlockTag;
use crate::strings::{EscapeError, scan_text_payloads, unescape};

pub const STRING_HEADER: &str = "[String]";

/// The script block a string was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScriptSource {
    pub tag: BlockTag,
    pub offset: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedString {
    /// Decoded bytes, in whatever encoding the game uses.
    pub text: Vec<u8>,
    pub source: ScriptSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub strings: Vec<ExtractedString>,
}

impl ScriptReport {
    /// Collects every `Text("...")` operand of one descumm listing.
    pub fn from_listing(listing: &str, source: ScriptSource) -> Result<Self, EscapeError> {
        let strings = scan_text_payloads(listing)
            .into_iter()
            .map(|payload| {
                Ok(ExtractedString {
                    text: unescape(payload)?,
                    source,
                })
            })
            .collect::<Result<Vec<_>, EscapeError>>()?;
        Ok(Self { strings })
    }

    pub fn append(&mut self, mut other: ScriptReport) {
        self.strings.append(&mut other.strings);
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// `[String]`, the text, then a blank line, for each string in order.
    pub fn fragment(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for s in &self.strings {
            out.extend_from_slice(STRING_HEADER.as_bytes());
            out.push(b'\n');
            out.extend_from_slice(&s.text);
            out.extend_from_slice(b"\n\n");
        }
        out
    }
}

/// Report for a script that does not belong to an object (global, local,
/// room entry and exit scripts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandaloneScript {
    pub source: ScriptSource,
    pub report: ScriptReport,
}
