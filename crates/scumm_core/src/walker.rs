use std::io::{Read, Seek};

use log::{debug, trace};

use crate::block::{BlockHeader, BlockKind};
use crate::core_api::{CoreError, CorruptionKind};
use crate::disasm::Disassembler;
use crate::layout::{BlockEntry, BlockLayout};
use crate::object::{GameObjectRecord, ObjectRegistry};
use crate::reader::BlockReader;
use crate::report::{ScriptReport, ScriptSource, StandaloneScript};

/// What one walk over a resource file produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutput {
    /// Non-verb scripts in the order they were met.
    pub scripts: Vec<StandaloneScript>,
    pub objects: ObjectRegistry,
    pub layout: BlockLayout,
}

/// Depth-first walker over the block tree of a (decrypted) stream.
///
/// The owning object is threaded down the recursion as a parameter: an
/// OBCD block hands its record to its own sub-blocks, so OBNA and VERB
/// blocks can only ever be attributed to the object they sit inside.
pub struct Walker<'d, R, D: ?Sized> {
    reader: BlockReader<R>,
    disassembler: &'d D,
    out: WalkOutput,
}

impl<'d, R: Read + Seek, D: Disassembler + ?Sized> Walker<'d, R, D> {
    pub fn new(stream: R, disassembler: &'d D) -> Self {
        Self {
            reader: BlockReader::new(stream),
            disassembler,
            out: WalkOutput::default(),
        }
    }

    /// Processes the single block at the current stream position, and all
    /// of its descendants.
    pub fn walk(mut self) -> Result<WalkOutput, CoreError> {
        self.process_block(0, None)?;
        Ok(self.out)
    }

    fn process_block(
        &mut self,
        depth: usize,
        owner: Option<&mut GameObjectRecord>,
    ) -> Result<(), CoreError> {
        let offset = self.reader.position()?;
        let tag = self.reader.read_tag()?;
        let declared_size = self.reader.read_u32()?;
        let header = BlockHeader {
            tag,
            declared_size,
            offset,
        };

        let payload_size = header.payload_size().ok_or_else(|| {
            CoreError::corruption(offset, CorruptionKind::SizeUnderflow { declared_size })
        })?;
        let kind = BlockKind::of(tag);
        if kind == BlockKind::Unknown && !tag.is_well_formed() {
            return Err(CoreError::corruption(offset, CorruptionKind::InvalidTag { tag }));
        }

        debug!("{tag} at {offset:#010X}, {declared_size} bytes, depth {depth}");
        self.out.layout.push(BlockEntry {
            tag,
            offset,
            size: declared_size,
            depth,
        });

        match kind {
            BlockKind::Container => self.process_sub_blocks(&header, depth, owner)?,
            BlockKind::Script => {
                let report = self.handle_script(&header)?;
                self.out.scripts.push(StandaloneScript {
                    source: ScriptSource { tag, offset },
                    report,
                });
            }
            BlockKind::VerbScript => {
                let owner = owner.ok_or_else(|| {
                    CoreError::corruption(offset, CorruptionKind::NoObjectInContext { tag })
                })?;
                let report = self.handle_script(&header)?;
                owner.scripts.append(report);
            }
            BlockKind::Object => {
                let mut record = GameObjectRecord::new(offset);
                self.process_sub_blocks(&header, depth, Some(&mut record))?;
                self.out.objects.insert(record);
            }
            BlockKind::ObjectName => {
                let owner = owner.ok_or_else(|| {
                    CoreError::corruption(offset, CorruptionKind::NoObjectInContext { tag })
                })?;
                owner.name = Some(self.reader.read_null_terminated()?);
                self.close_block(&header)?;
            }
            BlockKind::Unknown => {
                trace!("skipping {payload_size} bytes of {tag}");
                self.reader.skip(u64::from(payload_size))?;
            }
        }

        Ok(())
    }

    fn process_sub_blocks(
        &mut self,
        header: &BlockHeader,
        depth: usize,
        mut owner: Option<&mut GameObjectRecord>,
    ) -> Result<(), CoreError> {
        let end = header.end();
        while self.reader.position()? < end {
            self.process_block(depth + 1, owner.as_deref_mut())?;
        }
        self.close_block(header)
    }

    /// Fails if processing the block's body went past its declared end;
    /// otherwise leaves the stream at that end.
    fn close_block(&mut self, header: &BlockHeader) -> Result<(), CoreError> {
        let end = header.end();
        let position = self.reader.position()?;
        if position > end {
            return Err(CoreError::corruption(
                header.offset,
                CorruptionKind::Overshoot { end, position },
            ));
        }
        if position < end {
            self.reader.seek_to(end)?;
        }
        Ok(())
    }

    fn handle_script(&mut self, header: &BlockHeader) -> Result<ScriptReport, CoreError> {
        // descumm wants the whole block, header included.
        self.reader.seek_to(header.offset)?;
        let block = self.reader.read_bytes(u64::from(header.declared_size))?;
        let listing = self.disassembler.disassemble(&block)?;

        let source = ScriptSource {
            tag: header.tag,
            offset: header.offset,
        };
        let report = ScriptReport::from_listing(&listing, source).map_err(|e| {
            CoreError::corruption(header.offset, CorruptionKind::MalformedEscape(e))
        })?;
        debug!(
            "{} at {:#010X}: {} string(s)",
            header.tag,
            header.offset,
            report.len()
        );
        Ok(report)
    }
}
