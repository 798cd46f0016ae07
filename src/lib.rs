pub mod cli;
pub mod config;
pub mod model;
pub mod parser;
pub mod processor;
pub mod runner;
pub mod writer;

pub use config::RunnerConfig;
pub use model::{CompiledScript, DIRECTIVE_PREFIX, MACRO_SIGIL};
pub use processor::compile;
pub use runner::{ExecError, MacroScript};

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };

    match args.command {
        cli::Command::Compile { input, output } => {
            // 1. ── Parse + process ────────────────────────────────────────
            let document = read_document(&input)?;
            let script = compile(&document);

            // 2. ── Write output ───────────────────────────────────────────
            writer::file::emit(&script, output.as_deref())
                .with_context(|| "Writing compiled script")?;
        }
        cli::Command::Run {
            input,
            node,
            timeout,
        } => {
            let document = read_document(&input)?;
            let config = config.with_overrides(node, timeout);
            let output = MacroScript::new(document, config)
                .execute()
                .await
                .with_context(|| format!("Executing {}", input.display()))?;
            print!("{output}");
        }
        cli::Command::Inspect { input } => {
            let document = read_document(&input)?;
            let processed = processor::run(&document);
            let report = json!({
                "runs": processed.runs,
                "macros": processed.macros,
                "statements": processed.statements,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn read_document(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))
}

/// Log to stderr; `RUST_LOG` wins over the `-v` count.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
