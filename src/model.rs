//! Data types shared by every stage of the pipeline.

use serde::Serialize;

/// First character of a line that holds embedded script code.
pub const DIRECTIVE_PREFIX: char = '%';

/// Prefix of every macro function name in directive code.
pub const MACRO_SIGIL: char = '$';

/// Name of the output accumulator in the generated script.
pub const ACCUMULATOR: &str = "__code__";

/// Name of the overridable hook called right before the final print.
pub const FINALIZE_HOOK: &str = "__final__";

/// Private alias for the runtime's print primitive.
pub const PRINTER: &str = "__out__";

/// A maximal block of adjacent lines sharing one classification.
///
/// The stored text keeps every line terminator. Directive text has the
/// leading [`DIRECTIVE_PREFIX`] of each line removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Run {
    Directive(String),
    Literal(String),
}

impl Run {
    pub fn text(&self) -> &str {
        match self {
            Run::Directive(text) | Run::Literal(text) => text,
        }
    }

    pub fn is_directive(&self) -> bool {
        matches!(self, Run::Directive(_))
    }

    /// Concatenate `next` onto `self` when both carry the same tag.
    ///
    /// On a tag mismatch both runs are handed back untouched.
    pub fn merge_same_tag(self, next: Run) -> Result<Run, (Run, Run)> {
        match (self, next) {
            (Run::Directive(mut a), Run::Directive(b)) => {
                a.push_str(&b);
                Ok(Run::Directive(a))
            }
            (Run::Literal(mut a), Run::Literal(b)) => {
                a.push_str(&b);
                Ok(Run::Literal(a))
            }
            (a, b) => Err((a, b)),
        }
    }
}

/// A fragment of one literal run, produced while scanning for macro uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span<'a> {
    LiteralText(&'a str),
    /// `name(args)`; `args` keeps its parentheses exactly as written.
    MacroCall { name: &'a str, args: &'a str },
    /// A bare `name` with no argument list.
    MacroReference(&'a str),
}

/// One unit of generated script code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// Directive text copied through unchanged.
    Directive { code: String },
    /// Add text to the accumulator.
    Append { text: String },
    /// Call a macro; `args` is the full parenthesised list, e.g. `(hi)`.
    Invoke { name: String, args: String },
}

/// Final artifact of a compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledScript {
    pub source: String,
}

impl CompiledScript {
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Display for CompiledScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
