use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    Variable,
    Procedure,
}

/// Issues identifiers for one generation pass.
///
/// User-facing names map to the same identifier every time they are asked for;
/// `distinct_name` always hands out an identifier nothing else in the pass uses.
#[derive(Debug, Clone, Default)]
pub struct NameAllocator {
    issued: HashSet<String>,
    bound: HashMap<(NameKind, String), String>,
    variables: Vec<String>,
}

impl NameAllocator {
    pub fn new(reserved: &[&str]) -> Self {
        Self {
            issued: reserved.iter().map(|w| w.to_string()).collect(),
            bound: HashMap::new(),
            variables: Vec::new(),
        }
    }

    pub fn distinct_name(&mut self, base: &str) -> String {
        let base_name = safe_name(base);
        let mut candidate = base_name.clone();
        let mut suffix = 2usize;
        while !self.issued.insert(candidate.clone()) {
            candidate = format!("{}{}", base_name, suffix);
            suffix += 1;
        }
        debug!(base, name = %candidate, "allocated distinct name");
        candidate
    }

    pub fn variable_name(&mut self, user_name: &str) -> String {
        self.bound_name(NameKind::Variable, user_name)
    }

    pub fn procedure_name(&mut self, user_name: &str) -> String {
        self.bound_name(NameKind::Procedure, user_name)
    }

    /// User variables in the order they were first referenced.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    fn bound_name(&mut self, kind: NameKind, user_name: &str) -> String {
        let key = (kind, user_name.to_string());
        if let Some(existing) = self.bound.get(&key) {
            return existing.clone();
        }
        let name = self.distinct_name(user_name);
        if kind == NameKind::Variable {
            self.variables.push(name.clone());
        }
        self.bound.insert(key, name.clone());
        name
    }
}

/// Replaces anything outside `[A-Za-z0-9_]` so the result is a legal identifier in every target.
pub fn safe_name(name: &str) -> String {
    let mut out = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect::<String>();
    if out.is_empty() {
        out = "unnamed".to_string();
    } else if out.starts_with(|c: char| c.is_ascii_digit()) {
        out = format!("my_{}", out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_names_never_repeat() {
        let mut names = NameAllocator::new(&[]);
        assert_eq!(names.distinct_name("temp_text"), "temp_text");
        assert_eq!(names.distinct_name("temp_text"), "temp_text2");
        assert_eq!(names.distinct_name("temp_text"), "temp_text3");
    }

    #[test]
    fn reserved_words_are_skipped() {
        let mut names = NameAllocator::new(&["for", "list"]);
        assert_eq!(names.variable_name("for"), "for2");
        assert_eq!(names.distinct_name("list"), "list2");
    }

    #[test]
    fn user_names_are_stable_and_do_not_clash_with_helpers() {
        let mut names = NameAllocator::new(&[]);
        let helper = names.distinct_name("math_median");
        let var = names.variable_name("math_median");
        assert_eq!(helper, "math_median");
        assert_eq!(var, "math_median2");
        assert_eq!(names.variable_name("math_median"), "math_median2");
        assert_eq!(names.variables(), ["math_median2".to_string()]);
    }

    #[test]
    fn variable_and_procedure_namespaces_are_separate() {
        let mut names = NameAllocator::new(&[]);
        let var = names.variable_name("count");
        let proc_name = names.procedure_name("count");
        assert_ne!(var, proc_name);
        assert_eq!(names.variables().len(), 1);
    }

    #[test]
    fn safe_name_sanitizes() {
        assert_eq!(safe_name("my var"), "my_var");
        assert_eq!(safe_name("2nd"), "my_2nd");
        assert_eq!(safe_name("  "), "unnamed");
    }
}
