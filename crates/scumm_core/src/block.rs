use std::fmt;

use serde::{Serialize, Serializer};

/// Tag plus big-endian size, as laid out in SCUMM v5 resource files.
pub const HEADER_SIZE: u32 = 8;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockTag([u8; 4]);

impl BlockTag {
    pub const LECF: Self = Self(*b"LECF");
    pub const LFLF: Self = Self(*b"LFLF");
    pub const ROOM: Self = Self(*b"ROOM");
    pub const SCRP: Self = Self(*b"SCRP");
    pub const LSCR: Self = Self(*b"LSCR");
    pub const ENCD: Self = Self(*b"ENCD");
    pub const EXCD: Self = Self(*b"EXCD");
    pub const VERB: Self = Self(*b"VERB");
    pub const OBCD: Self = Self(*b"OBCD");
    pub const OBNA: Self = Self(*b"OBNA");

    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// A well-formed tag is four uppercase ASCII letters. Anything else
    /// means the walker has lost sync with the block structure.
    pub fn is_well_formed(&self) -> bool {
        self.0.iter().all(u8::is_ascii_uppercase)
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

impl fmt::Debug for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockTag(\"{}\")", self.0.escape_ascii())
    }
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Container,
    Script,
    VerbScript,
    Object,
    ObjectName,
    Unknown,
}

impl BlockKind {
    pub fn of(tag: BlockTag) -> Self {
        match tag {
            BlockTag::LECF | BlockTag::LFLF | BlockTag::ROOM => Self::Container,
            BlockTag::SCRP | BlockTag::LSCR | BlockTag::ENCD | BlockTag::EXCD => Self::Script,
            BlockTag::VERB => Self::VerbScript,
            BlockTag::OBCD => Self::Object,
            BlockTag::OBNA => Self::ObjectName,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub tag: BlockTag,
    /// Size including the header itself.
    pub declared_size: u32,
    /// Absolute position of the tag's first byte.
    pub offset: u64,
}

impl BlockHeader {
    /// Size of the block body, or `None` when the declared size cannot
    /// even cover the header.
    pub fn payload_size(&self) -> Option<u32> {
        self.declared_size.checked_sub(HEADER_SIZE)
    }

    pub fn end(&self) -> u64 {
        self.offset + u64::from(self.declared_size)
    }
}
