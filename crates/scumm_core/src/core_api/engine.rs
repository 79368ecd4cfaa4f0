use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use log::info;

use crate::block::BlockTag;
use crate::decrypt::{DecryptingStream, key_from_first_byte};
use crate::disasm::{Descumm, Disassembler};
use crate::walker::Walker;

use super::error::CoreError;
use super::types::{Extraction, ExtractorConfig};

/// Entry point: validates the file signature and walks the block tree,
/// handing script blocks to a [`Disassembler`].
#[derive(Debug, Clone)]
pub struct Engine<D = Descumm> {
    disassembler: D,
}

impl Engine<Descumm> {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            disassembler: Descumm::new(config.disassembler.clone()),
        }
    }
}

impl<D: Disassembler> Engine<D> {
    pub fn with_disassembler(disassembler: D) -> Self {
        Self { disassembler }
    }

    pub fn open_path<P: AsRef<Path>>(&self, path: P) -> Result<Extraction, CoreError> {
        let file = File::open(path)?;
        self.extract(BufReader::new(file))
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Extraction, CoreError> {
        self.extract(Cursor::new(bytes.as_ref()))
    }

    pub fn extract<R: Read + Seek>(&self, mut stream: R) -> Result<Extraction, CoreError> {
        stream.seek(SeekFrom::Start(0))?;
        let mut first = [0u8; 1];
        stream.read_exact(&mut first).map_err(not_scumm_if_short)?;
        let xor_key = key_from_first_byte(first[0]);

        let mut stream = DecryptingStream::new(stream, xor_key);
        stream.seek(SeekFrom::Start(0))?;
        let mut magic = [0u8; 4];
        stream.read_exact(&mut magic).map_err(not_scumm_if_short)?;
        let magic = BlockTag::new(magic);
        if magic != BlockTag::LECF {
            return Err(CoreError::Format(format!(
                "expected {} signature, found {magic}",
                BlockTag::LECF
            )));
        }
        stream.seek(SeekFrom::Start(0))?;

        let out = Walker::new(stream, &self.disassembler).walk()?;
        let extraction = Extraction {
            xor_key,
            scripts: out.scripts,
            objects: out.objects,
            layout: out.layout,
        };
        info!(
            "walked {} blocks (key {xor_key:#04X}): {} standalone script(s), {} object(s), {} string(s)",
            extraction.layout.len(),
            extraction.scripts.len(),
            extraction.objects.len(),
            extraction.string_count()
        );
        Ok(extraction)
    }
}

fn not_scumm_if_short(e: io::Error) -> CoreError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            CoreError::Format("file is too short to hold a block header".to_string())
        }
        _ => CoreError::Io(e),
    }
}
