//! Macro registry: names declared as `function $name` in directive code.

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfunction\s+\$(\w+)").expect("declaration pattern is valid")
});

/// Every macro name declared in `code`, in order of appearance.
///
/// Duplicates are kept; the registry de-duplicates on insert.
pub fn find_macro_declarations(code: &str) -> Vec<String> {
    DECLARATION
        .captures_iter(code)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Ordered set of known macro names plus the alternation built from them.
#[derive(Debug, Default)]
pub struct MacroRegistry {
    names: IndexSet<String>,
    /// Cached build of the alternation; a failed build is kept too, so it is
    /// reported once per registry state.
    pattern: Option<Result<Regex, regex::Error>>,
    /// Compiled-size cap handed to the regex engine; its default when `None`.
    size_limit: Option<usize>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Names in first-declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Add `name`; returns `false` if it was already known.
    pub fn insert(&mut self, name: String) -> bool {
        if self.contains(&name) {
            return false;
        }
        debug!(name = %name, "registered macro");
        self.names.insert(name);
        self.pattern = None;
        true
    }

    /// Register every declaration found in a directive run.
    ///
    /// Returns how many names were new.
    pub fn register_declarations(&mut self, code: &str) -> usize {
        find_macro_declarations(code)
            .into_iter()
            .filter(|name| self.insert(name.clone()))
            .count()
    }

    /// Pattern matching any known macro use in literal text.
    ///
    /// Rebuilt lazily after the set changes. `None` while the registry is
    /// empty, or if the alternation is too large for the regex engine.
    pub fn pattern(&mut self) -> Option<&Regex> {
        if self.names.is_empty() {
            return None;
        }
        if self.pattern.is_none() {
            let source = alternation(self.names.iter().map(String::as_str));
            let mut builder = RegexBuilder::new(&source);
            if let Some(limit) = self.size_limit {
                builder.size_limit(limit);
            }
            let built = builder.build();
            if let Err(e) = &built {
                warn!(macros = self.names.len(), "cannot build macro pattern: {e}");
            }
            self.pattern = Some(built);
        }
        self.pattern.as_ref().and_then(|built| built.as_ref().ok())
    }
}

/// Source of the macro-use pattern for `names`.
///
/// Groups: `name` is the bare macro name, `args` the optional `(...)` list
/// directly after it. A leading `$` is consumed with the match. Alternatives
/// keep registry order, so at equal start positions earlier names win.
pub fn alternation<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let alts: Vec<String> = names.map(regex::escape).collect();
    format!(
        r"\$?\b(?P<name>{})\b(?P<args>\([^)]*\))?",
        alts.join("|")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_macro_declarations() {
        let test_cases = vec![
            ("function $bold(x){ return x; }", vec!["bold"]),
            ("function   $a(){}\nfunction $b_2(y){}", vec!["a", "b_2"]),
            ("function plain(){}", vec![]),
            ("myfunction $x(){}", vec![]),
            ("function $dup(){}\nfunction $dup(){}", vec!["dup", "dup"]),
            ("var f = function $inner(){};", vec!["inner"]),
            ("", vec![]),
        ];

        for (code, expected) in test_cases {
            assert_eq!(find_macro_declarations(code), expected, "code {code:?}");
        }
    }

    #[test]
    fn test_registry_keeps_first_declaration_order() {
        let mut registry = MacroRegistry::new();
        assert_eq!(registry.register_declarations("function $b(){}\nfunction $a(){}"), 2);
        assert_eq!(registry.register_declarations("function $a(){}\nfunction $c(){}"), 1);

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert!(registry.contains("a"));
        assert!(!registry.contains("d"));
    }

    #[test]
    fn test_pattern_absent_while_empty() {
        let mut registry = MacroRegistry::new();
        assert!(registry.pattern().is_none());
        registry.insert("x".into());
        assert!(registry.pattern().is_some());
    }

    #[test]
    fn test_pattern_rebuilt_after_insert() {
        let mut registry = MacroRegistry::new();
        registry.insert("first".into());
        assert!(!registry.pattern().unwrap().is_match("second"));
        registry.insert("second".into());
        assert!(registry.pattern().unwrap().is_match("second"));
    }

    #[test]
    fn test_failed_pattern_build_is_remembered() {
        let mut registry = MacroRegistry::new();
        registry.size_limit = Some(1);
        registry.insert("toolarge".into());

        assert!(registry.pattern().is_none());
        assert!(matches!(registry.pattern, Some(Err(_))));
        assert!(registry.pattern().is_none());

        registry.size_limit = None;
        assert!(registry.pattern().is_none(), "cached failure survives until insert");
        registry.insert("other".into());
        assert!(registry.pattern().is_some());
    }

    #[test]
    fn test_alternation_escapes_names() {
        let source = alternation(["a.b", "c+"].into_iter());
        let re = Regex::new(&source).unwrap();
        assert!(re.is_match("x a.b y"));
        assert!(!re.is_match("x aXb y"));
    }
}
