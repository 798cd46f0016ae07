//! Line classifier and merger.
//!
//! The document is cut into lines (terminators kept), every line is tagged
//! as directive or literal, and adjacent lines with the same tag are glued
//! into one [`Run`]. Concatenating the runs back, with `%` restored in front
//! of each directive line, gives the original document.

use tracing::debug;

use crate::model::{DIRECTIVE_PREFIX, Run};

/// Characters that end a line; `\r\n` counts as one terminator.
pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Cut `text` into lines, each keeping its terminator.
///
/// A final line without terminator is kept as is; empty text gives no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                end = j + 1;
            }
        }
        lines.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Tag a single line. `line` includes its terminator, if any.
pub fn classify_line(line: &str) -> Run {
    match line.strip_prefix(DIRECTIVE_PREFIX) {
        Some(code) => Run::Directive(code.to_string()),
        None => Run::Literal(line.to_string()),
    }
}

/// Split `document` into runs of same-tagged lines, in document order.
pub fn classify_and_merge(document: &str) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();

    for line in split_lines(document) {
        let run = classify_line(line);
        match runs.pop() {
            None => runs.push(run),
            Some(last) => match last.merge_same_tag(run) {
                Ok(merged) => runs.push(merged),
                Err((last, run)) => {
                    runs.push(last);
                    runs.push(run);
                }
            },
        }
    }

    debug!(runs = runs.len(), bytes = document.len(), "classified document");
    runs
}

/// Rebuild document text from runs, restoring the directive prefix.
pub fn reassemble(runs: &[Run]) -> String {
    let mut out = String::new();
    for run in runs {
        match run {
            Run::Literal(text) => out.push_str(text),
            Run::Directive(code) if code.is_empty() => out.push(DIRECTIVE_PREFIX),
            Run::Directive(code) => {
                for line in split_lines(code) {
                    out.push(DIRECTIVE_PREFIX);
                    out.push_str(line);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_line() {
        let test_cases = vec![
            ("%var x = 1;\n", Run::Directive("var x = 1;\n".into())),
            ("hello\n", Run::Literal("hello\n".into())),
            ("  %not a directive\n", Run::Literal("  %not a directive\n".into())),
            ("%", Run::Directive("".into())),
            ("", Run::Literal("".into())),
        ];

        for (line, expected) in test_cases {
            assert_eq!(classify_line(line), expected, "line {line:?}");
        }
    }

    #[test]
    fn test_classify_and_merge() {
        let test_cases = vec![
            ("", vec![]),
            ("hello\n", vec![Run::Literal("hello\n".into())]),
            (
                "a\nb\n",
                vec![Run::Literal("a\nb\n".into())],
            ),
            (
                "%x = 1;\n%y = 2;\ntext\n%z();\n",
                vec![
                    Run::Directive("x = 1;\ny = 2;\n".into()),
                    Run::Literal("text\n".into()),
                    Run::Directive("z();\n".into()),
                ],
            ),
            (
                "no newline at end",
                vec![Run::Literal("no newline at end".into())],
            ),
            (
                "a\r\n%b\r\n",
                vec![
                    Run::Literal("a\r\n".into()),
                    Run::Directive("b\r\n".into()),
                ],
            ),
            (
                "text\r%var x = 1;\r",
                vec![
                    Run::Literal("text\r".into()),
                    Run::Directive("var x = 1;\r".into()),
                ],
            ),
            (
                "a\u{2028}%b\u{2029}c",
                vec![
                    Run::Literal("a\u{2028}".into()),
                    Run::Directive("b\u{2029}".into()),
                    Run::Literal("c".into()),
                ],
            ),
            (
                "%x\x0c%y\u{85}",
                vec![Run::Directive("x\x0cy\u{85}".into())],
            ),
        ];

        for (document, expected) in test_cases {
            assert_eq!(classify_and_merge(document), expected, "document {document:?}");
        }
    }

    #[test]
    fn test_split_lines() {
        let test_cases = vec![
            ("", vec![]),
            ("a", vec!["a"]),
            ("a\nb", vec!["a\n", "b"]),
            ("a\r\nb\r", vec!["a\r\n", "b\r"]),
            ("\r\r\n\n", vec!["\r", "\r\n", "\n"]),
            ("x\x0by\x1ez\u{2028}", vec!["x\x0b", "y\x1e", "z\u{2028}"]),
        ];

        for (text, expected) in test_cases {
            assert_eq!(split_lines(text), expected, "text {text:?}");
        }
    }

    #[test]
    fn test_reassemble_keeps_bare_carriage_returns() {
        let document = "%a\r%b\rtext\r";
        let runs = classify_and_merge(document);
        assert_eq!(runs[0], Run::Directive("a\rb\r".into()));
        assert_eq!(reassemble(&runs), document);
    }

    #[test]
    fn test_adjacent_runs_never_share_a_tag() {
        let runs = classify_and_merge("%a\nb\nc\n%d\n%e\nf\n");
        for pair in runs.windows(2) {
            assert_ne!(pair[0].is_directive(), pair[1].is_directive());
        }
        assert_eq!(runs.len(), 4);
    }

    #[test]
    fn test_reassemble_restores_document() {
        let document = "%function $f(){}\nbody $f\n%\nend";
        let runs = classify_and_merge(document);
        assert_eq!(reassemble(&runs), document);
        assert_eq!(classify_and_merge(&reassemble(&runs)), runs);
    }
}
