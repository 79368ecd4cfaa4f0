use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::block::BlockTag;
use crate::disasm::ToolError;
use crate::strings::EscapeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoreErrorCode {
    Io,
    Format,
    Corruption,
    Tool,
}

/// Structural invariant violated by a file that otherwise claims to be a
/// SCUMM v5 resource.
#[derive(Debug, Error)]
pub enum CorruptionKind {
    #[error("declared block size {declared_size} is smaller than the 8-byte header")]
    SizeUnderflow { declared_size: u32 },

    #[error("sub-blocks overshot container end {end:#010X} (stream at {position:#010X})")]
    Overshoot { end: u64, position: u64 },

    #[error("invalid block tag {tag}")]
    InvalidTag { tag: BlockTag },

    #[error("malformed escape in disassembly: {0}")]
    MalformedEscape(#[source] EscapeError),

    #[error("{tag} block outside of any OBCD block")]
    NoObjectInContext { tag: BlockTag },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("only SCUMM version 5 is supported (got {0})")]
    UnsupportedVersion(u32),

    #[error("{0}")]
    Format(String),

    #[error("bad block structure at offset {offset:#010X}: {kind}")]
    Corruption { offset: u64, kind: CorruptionKind },

    #[error("{0}")]
    Tool(#[from] ToolError),
}

impl CoreError {
    pub fn corruption(offset: u64, kind: CorruptionKind) -> Self {
        Self::Corruption { offset, kind }
    }

    pub fn code(&self) -> CoreErrorCode {
        match self {
            Self::Io(_) => CoreErrorCode::Io,
            Self::UnsupportedVersion(_) | Self::Format(_) => CoreErrorCode::Format,
            Self::Corruption { .. } => CoreErrorCode::Corruption,
            Self::Tool(_) => CoreErrorCode::Tool,
        }
    }
}
