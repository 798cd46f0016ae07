//! Token rewriter: turns runs into generated statements.

use tracing::trace;

use crate::model::{Run, Span, Statement};

use super::registry::MacroRegistry;
use super::spans::find_macro_spans;

/// Rewrite `runs` in document order.
///
/// Directive runs feed `registry` as they are visited, so a literal run is
/// only rewritten against macros declared in earlier runs.
pub fn rewrite(runs: &[Run], registry: &mut MacroRegistry) -> Vec<Statement> {
    let mut statements = Vec::with_capacity(runs.len());

    for run in runs {
        match run {
            Run::Directive(code) => {
                registry.register_declarations(code);
                statements.push(Statement::Directive { code: code.clone() });
            }
            Run::Literal(text) => match registry.pattern() {
                None => statements.push(append(text)),
                Some(pattern) => {
                    let spans = find_macro_spans(pattern, text);
                    trace!(spans = spans.len(), "rewrote literal run");
                    statements.extend(spans.into_iter().map(lower_span));
                }
            },
        }
    }

    statements
}

fn append(text: &str) -> Statement {
    Statement::Append {
        text: text.trim_end().to_string(),
    }
}

fn lower_span(span: Span<'_>) -> Statement {
    match span {
        Span::LiteralText(text) => append(text),
        Span::MacroCall { name, args } => Statement::Invoke {
            name: name.to_string(),
            args: args.to_string(),
        },
        Span::MacroReference(name) => Statement::Invoke {
            name: name.to_string(),
            args: "()".to_string(),
        },
    }
}
