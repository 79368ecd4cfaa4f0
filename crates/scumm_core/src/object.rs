use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::report::ScriptReport;

/// One OBCD block and what was found beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameObjectRecord {
    /// Absolute offset of the OBCD header; the object's identity.
    pub offset: u64,
    pub name: Option<Vec<u8>>,
    /// Strings from all of the object's VERB blocks, in stream order. The
    /// file format gives no cheap way to tell which verb each came from.
    pub scripts: ScriptReport,
}

impl GameObjectRecord {
    pub fn new(offset: u64) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> Option<Cow<'_, str>> {
        self.name.as_deref().map(String::from_utf8_lossy)
    }
}

/// Objects keyed by file offset. Offsets grow in stream order, so
/// iteration order is also encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectRegistry {
    records: BTreeMap<u64, GameObjectRecord>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: GameObjectRecord) {
        self.records.insert(record.offset, record);
    }

    pub fn get(&self, offset: u64) -> Option<&GameObjectRecord> {
        self.records.get(&offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameObjectRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
