//! Write a compiled script to disk or stdout.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::model::CompiledScript;

/// Write `script` to `out`, or to stdout when `out` is `None`.
pub fn emit(script: &CompiledScript, out: Option<&Path>) -> io::Result<()> {
    match out {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            let mut f = File::create(path)?;
            write_script(&mut f, script)
        }
        None => write_script(&mut io::stdout().lock(), script),
    }
}

/// Script text plus a final newline.
pub fn write_script<W: Write>(w: &mut W, script: &CompiledScript) -> io::Result<()> {
    writeln!(w, "{script}")?;
    w.flush()
}
