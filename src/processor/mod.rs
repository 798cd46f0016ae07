//! The functional core: document text in, compiled script out.
//!
//! Classification, macro discovery and rewriting happen here; turning the
//! resulting statements into script text is the writer's job.
pub mod registry;
pub mod rewriter;
pub mod spans;

use tracing::{info, info_span};

use crate::model::{CompiledScript, Run, Statement};
use crate::parser::classify_and_merge;
use crate::writer::script::{assemble, render_body};

use registry::MacroRegistry;

/// Everything the pipeline produced for one document.
#[derive(Debug)]
pub struct ProcessedDocument {
    pub runs: Vec<Run>,
    pub macros: Vec<String>,
    pub statements: Vec<Statement>,
    pub script: CompiledScript,
}

/// Runs every processing pass and keeps the intermediate results.
pub fn run(document: &str) -> ProcessedDocument {
    let _span = info_span!("compile", bytes = document.len()).entered();

    let runs = classify_and_merge(document);
    let mut registry = MacroRegistry::new();
    let statements = rewriter::rewrite(&runs, &mut registry);
    let script = CompiledScript {
        source: assemble(&render_body(&statements)),
    };

    info!(
        runs = runs.len(),
        macros = registry.len(),
        statements = statements.len(),
        "compiled document"
    );

    ProcessedDocument {
        runs,
        macros: registry.names().map(str::to_string).collect(),
        statements,
        script,
    }
}

/// Compile `document` into a standalone script.
pub fn compile(document: &str) -> CompiledScript {
    run(document).script
}
