//! Script assembler: statements to JavaScript source.
//!
//! Generated layout:
//!
//! ```text
//! var __code__ = "";            accumulator
//! function __final__(){;}       hook, directive code may redefine it
//! var __out__ = console.log;    private print primitive
//! console.log = undefined;      nothing else may print
//! ...body...
//! __final__();
//! __out__(__code__);
//! ```

use crate::model::{ACCUMULATOR, FINALIZE_HOOK, MACRO_SIGIL, PRINTER, Statement};

/// Anything that lowers to a fragment of script source.
pub trait ToScript {
    fn to_script(&self) -> String;
}

impl ToScript for Statement {
    fn to_script(&self) -> String {
        match self {
            Statement::Directive { code } => {
                let mut line = code.clone();
                if !line.ends_with('\n') {
                    line.push('\n');
                }
                line
            }
            Statement::Append { text } => {
                format!("{ACCUMULATOR} += `{}`;\n", escape_template(text))
            }
            Statement::Invoke { name, args } => format!("{MACRO_SIGIL}{name}{args};\n"),
        }
    }
}

/// Escape text for a template literal.
///
/// Backslashes and backticks are escaped so the text comes out as written;
/// `${...}` is left alone and still interpolates directive variables.
pub fn escape_template(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == '`' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Concatenate the rendered statements.
pub fn render_body(statements: &[Statement]) -> String {
    statements.iter().map(ToScript::to_script).collect()
}

pub fn preamble() -> String {
    format!(
        "var {ACCUMULATOR} = \"\";\n\
         function {FINALIZE_HOOK}(){{;}}\n\
         var {PRINTER} = console.log;\n\
         console.log = undefined;\n"
    )
}

pub fn postamble() -> String {
    format!("{FINALIZE_HOOK}();\n{PRINTER}({ACCUMULATOR});")
}

/// Wrap a generated body into a complete script.
pub fn assemble(body: &str) -> String {
    let mut script = preamble();
    script.push_str(body);
    script.push_str(&postamble());
    script
}
