use std::path::PathBuf;

use serde::Serialize;

use crate::layout::BlockLayout;
use crate::object::ObjectRegistry;
use crate::report::StandaloneScript;

use super::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScummVersion {
    V5,
}

impl ScummVersion {
    /// Maps the numeric command-line selector onto a supported version.
    pub fn from_selector(selector: u32) -> Result<Self, CoreError> {
        match selector {
            5 => Ok(Self::V5),
            other => Err(CoreError::UnsupportedVersion(other)),
        }
    }

    pub fn number(self) -> u32 {
        match self {
            Self::V5 => 5,
        }
    }

    /// The flag descumm takes to select this version.
    pub fn descumm_flag(self) -> String {
        format!("-{}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescummConfig {
    pub program: PathBuf,
    pub version_flag: String,
}

impl DescummConfig {
    pub const DEFAULT_PROGRAM: &'static str = "descumm";

    pub fn for_version(version: ScummVersion) -> Self {
        Self {
            program: PathBuf::from(Self::DEFAULT_PROGRAM),
            version_flag: version.descumm_flag(),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub version: ScummVersion,
    pub disassembler: DescummConfig,
}

impl ExtractorConfig {
    pub fn new(version: ScummVersion) -> Self {
        Self {
            version,
            disassembler: DescummConfig::for_version(version),
        }
    }
}

/// Everything extracted from one resource file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub xor_key: u8,
    /// Non-verb scripts in stream order.
    pub scripts: Vec<StandaloneScript>,
    pub objects: ObjectRegistry,
    pub layout: BlockLayout,
}

impl Extraction {
    pub fn string_count(&self) -> usize {
        self.scripts.iter().map(|s| s.report.len()).sum::<usize>()
            + self.objects.iter().map(|o| o.scripts.len()).sum::<usize>()
    }
}
