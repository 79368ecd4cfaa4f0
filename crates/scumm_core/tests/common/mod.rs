#![allow(dead_code)]

use std::cell::RefCell;

use scumm_core::disasm::{Disassembler, ToolError};

/// Key used by shipped SCUMM v5 data files.
pub const GAME_KEY: u8 = 0x69;

pub fn block(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let size = u32::try_from(payload.len() + 8).expect("test block too large");
    sized_block(tag, size, payload)
}

/// A block whose size field says `declared_size` regardless of payload.
pub fn sized_block(tag: &[u8; 4], declared_size: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 8);
    out.extend_from_slice(tag);
    out.extend_from_slice(&declared_size.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn container(tag: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    block(tag, &children.concat())
}

pub fn encrypt(mut bytes: Vec<u8>, key: u8) -> Vec<u8> {
    for b in &mut bytes {
        *b ^= key;
    }
    bytes
}

/// Returns canned listings keyed by the block's tag and remembers every
/// block it was handed.
pub struct StubDisassembler {
    listings: Vec<([u8; 4], String)>,
    pub calls: RefCell<Vec<Vec<u8>>>,
}

impl StubDisassembler {
    pub fn new() -> Self {
        Self {
            listings: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_listing(mut self, tag: &[u8; 4], listing: &str) -> Self {
        self.listings.push((*tag, listing.to_string()));
        self
    }
}

impl Disassembler for StubDisassembler {
    fn disassemble(&self, block: &[u8]) -> Result<String, ToolError> {
        self.calls.borrow_mut().push(block.to_vec());
        let tag: [u8; 4] = block[..4].try_into().expect("block shorter than a tag");
        Ok(self
            .listings
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, listing)| listing.clone())
            .unwrap_or_default())
    }
}

pub struct FailingDisassembler {
    pub code: i32,
    pub stderr: &'static str,
}

impl Disassembler for FailingDisassembler {
    fn disassemble(&self, _block: &[u8]) -> Result<String, ToolError> {
        Err(ToolError::Failed {
            code: self.code,
            stderr: self.stderr.to_string(),
        })
    }
}
