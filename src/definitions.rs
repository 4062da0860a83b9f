use std::collections::HashMap;

/// One hoisted top-level block of source: a helper function, an import or a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub key: String,
    /// Identifier allocated for the definition, when it introduces one.
    pub name: Option<String>,
    pub source: String,
}

/// Pass-scoped, insertion-ordered set of hoisted definitions.
///
/// A key is written at most once; later requests get the stored entry back.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    entries: Vec<Definition>,
    index: HashMap<String, usize>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Definition> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn get_or_insert_with<F>(&mut self, key: &str, build: F) -> &Definition
    where
        F: FnOnce() -> (Option<String>, String),
    {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                let (name, source) = build();
                self.entries.push(Definition {
                    key: key.to_string(),
                    name,
                    source,
                });
                let idx = self.entries.len() - 1;
                self.index.insert(key.to_string(), idx);
                idx
            }
        };
        &self.entries[idx]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.entries.iter()
    }

    /// Imports (entries without a name) come first as one block, then every other definition.
    pub fn emit(&self) -> String {
        let (imports, rest): (Vec<_>, Vec<_>) =
            self.entries.iter().partition(|d| d.name.is_none());
        let imports = imports
            .iter()
            .map(|d| d.source.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        std::iter::once(imports)
            .filter(|block| !block.is_empty())
            .chain(rest.iter().map(|d| d.source.clone()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_writer_wins() {
        let mut registry = DefinitionRegistry::new();
        registry.get_or_insert_with("math_median", || {
            (Some("math_median".to_string()), "first".to_string())
        });
        let again = registry.get_or_insert_with("math_median", || {
            panic!("builder must not run for an existing key")
        });
        assert_eq!(again.source, "first");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn emits_in_insertion_order() {
        let mut registry = DefinitionRegistry::new();
        registry.get_or_insert_with("import_random", || (None, "import random".to_string()));
        registry.get_or_insert_with("import_math", || (None, "import math".to_string()));
        registry.get_or_insert_with("import_random", || (None, "ignored".to_string()));
        assert_eq!(registry.emit(), "import random\nimport math");
        let keys = registry.iter().map(|d| d.key.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["import_random", "import_math"]);
    }

    #[test]
    fn imports_are_emitted_before_helpers() {
        let mut registry = DefinitionRegistry::new();
        registry.get_or_insert_with("math_modes", || {
            (Some("math_modes".to_string()), "def math_modes(xs):\n  pass".to_string())
        });
        registry.get_or_insert_with("import_math", || (None, "import math".to_string()));
        registry.get_or_insert_with("import_re", || (None, "import re".to_string()));
        assert_eq!(
            registry.emit(),
            "import math\nimport re\n\ndef math_modes(xs):\n  pass"
        );
    }
}
