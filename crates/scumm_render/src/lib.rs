use std::fmt::Write as _;
use std::io::{self, Write};

use scumm_core::core_api::Extraction;
use scumm_core::layout::BlockLayout;
use scumm_core::object::GameObjectRecord;
use scumm_core::report::{ExtractedString, ScriptReport, StandaloneScript};
use scumm_core::strings::escape;
use serde_json::{Map as JsonMap, Value as JsonValue};

const BANNER: &str = "*****";
const UNNAMED_OBJECT: &str = "<unnamed>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonRenderOptions {
    pub include_blocks: bool,
}

/// Writes the human-readable report: standalone scripts in stream order,
/// then every object. Names and strings are written as raw bytes.
pub fn write_text<W: Write>(out: &mut W, extraction: &Extraction) -> io::Result<()> {
    for script in &extraction.scripts {
        write_script(out, script)?;
    }
    for object in extraction.objects.iter() {
        write_object(out, object)?;
    }
    Ok(())
}

pub fn render_text(extraction: &Extraction) -> Vec<u8> {
    let mut out = Vec::new();
    write_text(&mut out, extraction).expect("writing to Vec cannot fail");
    out
}

fn write_script<W: Write>(out: &mut W, script: &StandaloneScript) -> io::Result<()> {
    writeln!(
        out,
        "{BANNER} {} SCRIPT AT: {:08X} {BANNER}",
        script.source.tag, script.source.offset
    )?;
    write_report(out, &script.report)
}

fn write_object<W: Write>(out: &mut W, object: &GameObjectRecord) -> io::Result<()> {
    write!(out, "{BANNER} OBJECT AT: {:08X} (", object.offset)?;
    match &object.name {
        Some(name) => out.write_all(name)?,
        None => out.write_all(UNNAMED_OBJECT.as_bytes())?,
    }
    writeln!(out, ") {BANNER}")?;
    write_report(out, &object.scripts)
}

fn write_report<W: Write>(out: &mut W, report: &ScriptReport) -> io::Result<()> {
    out.write_all(&report.fragment())?;
    writeln!(out)
}

/// Indented tree of every visited block, one line per block.
pub fn render_block_tree(layout: &BlockLayout) -> String {
    let mut out = String::new();
    for entry in &layout.entries {
        writeln!(
            out,
            "{:indent$}{} {:08X} ({} bytes)",
            "",
            entry.tag,
            entry.offset,
            entry.size,
            indent = entry.depth * 2
        )
        .expect("writing to String cannot fail");
    }
    out
}

pub fn render_json(extraction: &Extraction, options: JsonRenderOptions) -> JsonValue {
    let mut root = JsonMap::new();
    root.insert("xor_key".to_string(), JsonValue::from(extraction.xor_key));
    root.insert(
        "scripts".to_string(),
        JsonValue::Array(extraction.scripts.iter().map(script_json).collect()),
    );
    root.insert(
        "objects".to_string(),
        JsonValue::Array(extraction.objects.iter().map(object_json).collect()),
    );
    if options.include_blocks {
        root.insert(
            "blocks".to_string(),
            serde_json::to_value(&extraction.layout.entries).unwrap_or(JsonValue::Null),
        );
    }
    JsonValue::Object(root)
}

fn script_json(script: &StandaloneScript) -> JsonValue {
    let mut map = JsonMap::new();
    map.insert(
        "tag".to_string(),
        JsonValue::String(script.source.tag.to_string()),
    );
    map.insert("offset".to_string(), JsonValue::from(script.source.offset));
    map.insert("strings".to_string(), strings_json(&script.report));
    JsonValue::Object(map)
}

fn object_json(object: &GameObjectRecord) -> JsonValue {
    let mut map = JsonMap::new();
    map.insert("offset".to_string(), JsonValue::from(object.offset));
    map.insert(
        "name".to_string(),
        object
            .display_name()
            .map_or(JsonValue::Null, |name| JsonValue::String(name.into_owned())),
    );
    map.insert("strings".to_string(), strings_json(&object.scripts));
    JsonValue::Object(map)
}

/// `text` is lossy UTF-8 for reading; `escaped` keeps every byte in
/// descumm's escape syntax.
fn strings_json(report: &ScriptReport) -> JsonValue {
    JsonValue::Array(report.strings.iter().map(string_json).collect())
}

fn string_json(s: &ExtractedString) -> JsonValue {
    let mut map = JsonMap::new();
    map.insert(
        "text".to_string(),
        JsonValue::String(String::from_utf8_lossy(&s.text).into_owned()),
    );
    map.insert("escaped".to_string(), JsonValue::String(escape(&s.text)));
    map.insert(
        "source".to_string(),
        serde_json::to_value(s.source).unwrap_or(JsonValue::Null),
    );
    JsonValue::Object(map)
}
