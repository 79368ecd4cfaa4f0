use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::{LevelFilter, debug, warn};
use scumm_core::core_api::{
    CoreError, CoreErrorCode, Engine, Extraction, ExtractorConfig, ScummVersion,
};
use scumm_render::{JsonRenderOptions, render_block_tree, render_json, write_text};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Extract translatable strings from SCUMM resource files (e.g. monkeyk.001).
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// SCUMM version of the game; only 5 is supported.
    #[arg(value_name = "SCUMM_VERSION")]
    scumm_version: u32,
    #[arg(value_name = "FILE")]
    path: PathBuf,
    /// descumm executable to run on each script.
    #[arg(long, env = "DESCUMM", value_name = "PATH")]
    descumm: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Also print the block tree that was walked.
    #[arg(long)]
    blocks: bool,
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(&cli) {
        eprintln!("{}", diagnostic(&e));
        process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    // Checked before the file is touched.
    let version = ScummVersion::from_selector(cli.scumm_version)?;
    let mut config = ExtractorConfig::new(version);
    if let Some(program) = &cli.descumm {
        config.disassembler = config.disassembler.with_program(program);
    }
    debug!("configuration: {config:?}");

    let extraction = Engine::new(&config).open_path(&cli.path)?;
    if cli.blocks {
        if let Err(e) = extraction.layout.validate() {
            warn!("block layout is inconsistent: {e}");
        }
    }

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            emit(&mut out, cli, &extraction)
                .and_then(|()| out.flush())
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", display_path(path));
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            emit(&mut out, cli, &extraction).context("failed to write report")?;
        }
    }
    Ok(())
}

fn emit<W: Write>(out: &mut W, cli: &Cli, extraction: &Extraction) -> io::Result<()> {
    match cli.format {
        OutputFormat::Text => {
            if cli.blocks {
                out.write_all(render_block_tree(&extraction.layout).as_bytes())?;
                writeln!(out)?;
            }
            write_text(out, extraction)
        }
        OutputFormat::Json => {
            let value = render_json(
                extraction,
                JsonRenderOptions {
                    include_blocks: cli.blocks,
                },
            );
            serde_json::to_writer_pretty(&mut *out, &value)?;
            writeln!(out)
        }
    }
}

/// Single line prefixed with the error class.
fn diagnostic(e: &anyhow::Error) -> String {
    let prefix = match e.downcast_ref::<CoreError>().map(CoreError::code) {
        Some(CoreErrorCode::Io) => "IO error",
        Some(CoreErrorCode::Format) => "SCUMM file error",
        Some(CoreErrorCode::Corruption) => "Corrupt SCUMM file",
        Some(CoreErrorCode::Tool) => "Error calling descumm",
        None => "Error",
    };
    let detail = format!("{e:#}").replace('\n', " ");
    format!("{prefix}: {detail}")
}

fn display_path(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
