use std::io;

use serde::Serialize;

use crate::block::{BlockTag, HEADER_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockEntry {
    pub tag: BlockTag,
    pub offset: u64,
    pub size: u32,
    /// Nesting level; the root LECF block is 0.
    pub depth: usize,
}

impl BlockEntry {
    pub fn end(&self) -> u64 {
        self.offset + u64::from(self.size)
    }
}

/// Every block the walker visited, in visit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockLayout {
    pub entries: Vec<BlockEntry>,
}

impl BlockLayout {
    pub fn push(&mut self, entry: BlockEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that every block lies inside its parent and that siblings do
    /// not overlap.
    pub fn validate(&self) -> io::Result<()> {
        let mut open: Vec<BlockEntry> = Vec::new();
        let mut sibling_end: Vec<u64> = vec![0];

        for entry in &self.entries {
            while open.len() > entry.depth {
                open.pop();
                sibling_end.pop();
            }
            if open.len() != entry.depth {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "block {} at {:#X} skips a nesting level (depth {})",
                        entry.tag, entry.offset, entry.depth
                    ),
                ));
            }
            if let Some(parent) = open.last().filter(|p| entry.end() > p.end()) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "block {} at {:#X} ends past its parent {} at {:#X}",
                        entry.tag, entry.offset, parent.tag, parent.offset
                    ),
                ));
            }
            let last_end = sibling_end.last_mut().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "layout nesting underflow")
            })?;
            if entry.offset < *last_end {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "block {} at {:#X} overlaps the previous sibling",
                        entry.tag, entry.offset
                    ),
                ));
            }
            *last_end = entry.end();

            open.push(*entry);
            sibling_end.push(entry.offset + u64::from(HEADER_SIZE));
        }

        Ok(())
    }
}
