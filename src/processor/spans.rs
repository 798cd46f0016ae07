//! Shallow lexical scan of literal text for macro uses.
//!
//! This is pattern matching, not parsing: a macro use is a known name as a
//! whole word, optionally prefixed with `$`, optionally followed directly by
//! `( ... )` without nested parentheses. Uses touching a `${...}`
//! interpolation are left inside it. Anything smarter belongs here and
//! nowhere else.

use std::ops::Range;

use regex::Regex;

use crate::model::Span;

/// Partition `text` into literal and macro spans, left to right.
///
/// `pattern` must come from [`super::registry::alternation`]. Empty literal
/// stretches between adjacent macro uses produce no span.
pub fn find_macro_spans<'a>(pattern: &Regex, text: &'a str) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut last = 0usize;
    let interpolations = interpolation_ranges(text);

    for caps in pattern.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
            continue;
        };
        if interpolations
            .iter()
            .any(|r| whole.start() < r.end && r.start < whole.end())
        {
            continue;
        }
        if whole.start() > last {
            spans.push(Span::LiteralText(&text[last..whole.start()]));
        }
        spans.push(match caps.name("args") {
            Some(args) => Span::MacroCall {
                name: name.as_str(),
                args: args.as_str(),
            },
            None => Span::MacroReference(name.as_str()),
        });
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Span::LiteralText(&text[last..]));
    }
    spans
}

/// Byte ranges of `${...}` interpolations, braces balanced.
///
/// An unclosed `${` runs to the end of the text.
fn interpolation_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0usize;

    while i + 1 < bytes.len() {
        if bytes[i] != b'$' || bytes[i + 1] != b'{' {
            i += 1;
            continue;
        }
        let start = i;
        let mut depth = 0usize;
        let mut end = bytes.len();
        for (j, &b) in bytes.iter().enumerate().skip(i + 1) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = j + 1;
                        break;
                    }
                }
                _ => {}
            }
        }
        ranges.push(start..end);
        i = end;
    }
    ranges
}
