//! Extraction of translatable strings from SCUMM v5 resource files.
//!
//! The file is a tree of `tag + big-endian size` blocks, XOR-obfuscated
//! with a single byte. [`core_api::Engine`] undoes the obfuscation, walks
//! the tree and hands every script block to a [`disasm::Disassembler`]
//! (descumm by default), collecting the `Text("...")` operands of the
//! resulting listings.

pub mod block;
pub mod core_api;
pub mod decrypt;
pub mod disasm;
pub mod layout;
pub mod object;
pub mod reader;
pub mod report;
pub mod strings;
pub mod walker;
