use crate::blocks::{BlockKind, BlockView};
use crate::definitions::DefinitionRegistry;
use crate::names::NameAllocator;
use crate::{dart, javascript, python};
use regex::Regex;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, info, trace};

pub const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    Dart,
    Python,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::JavaScript, Language::Dart, Language::Python];

    pub fn name(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Dart => "dart",
            Language::Python => "python",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::Dart => "dart",
            Language::Python => "py",
        }
    }

    pub fn reserved_words(self) -> &'static [&'static str] {
        match self {
            Language::JavaScript => javascript::RESERVED_WORDS,
            Language::Dart => dart::RESERVED_WORDS,
            Language::Python => python::RESERVED_WORDS,
        }
    }

    pub fn false_literal(self) -> &'static str {
        match self {
            Language::Python => "False",
            Language::JavaScript | Language::Dart => "false",
        }
    }

    /// Statement used where a body would otherwise be empty.
    pub fn noop_statement(self) -> &'static str {
        match self {
            Language::Python => "pass",
            Language::JavaScript | Language::Dart => ";",
        }
    }

    pub fn expression_statement(self, code: &str) -> String {
        match self {
            Language::Python => format!("{}\n", code),
            Language::JavaScript | Language::Dart => format!("{};\n", code),
        }
    }

    fn declares_variables(self) -> bool {
        !matches!(self, Language::Python)
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "js" | "javascript" => Ok(Language::JavaScript),
            "dart" => Ok(Language::Dart),
            "py" | "python" => Ok(Language::Python),
            other => Err(format!(
                "Unknown language '{}' (expected javascript, dart or python).",
                other
            )),
        }
    }
}

/// Fatal conditions that abort a generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    /// A block's configured operator or choice is not one its template knows.
    UnknownSelector { kind: BlockKind, selector: String },
    UnknownBlockKind { kind: String },
    MissingHandler { language: Language, kind: BlockKind },
}

impl Display for CodegenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CodegenError::UnknownSelector { kind, selector } => {
                write!(f, "Unknown selector '{}' on block '{}'.", selector, kind)
            }
            CodegenError::UnknownBlockKind { kind } => write!(f, "Unknown block type '{}'.", kind),
            CodegenError::MissingHandler { language, kind } => write!(
                f,
                "No {} generator registered for block type '{}'.",
                language, kind
            ),
        }
    }
}

impl Error for CodegenError {}

pub type BlockHandler =
    fn(&mut CodegenPass, &dyn BlockView, bool) -> Result<String, CodegenError>;

pub struct HandlerTable {
    language: Language,
    handlers: HashMap<BlockKind, BlockHandler>,
}

impl HandlerTable {
    /// Builds the table for `language` and checks that every block kind is covered.
    pub fn new(language: Language) -> Result<Self, CodegenError> {
        let entries = match language {
            Language::JavaScript => javascript::handlers(),
            Language::Dart => dart::handlers(),
            Language::Python => python::handlers(),
        };
        Self::from_entries(language, entries)
    }

    pub fn from_entries(
        language: Language,
        entries: Vec<(BlockKind, BlockHandler)>,
    ) -> Result<Self, CodegenError> {
        let handlers = entries.into_iter().collect::<HashMap<_, _>>();
        if let Some(kind) = BlockKind::ALL
            .iter()
            .copied()
            .find(|kind| !handlers.contains_key(kind))
        {
            return Err(CodegenError::MissingHandler { language, kind });
        }
        Ok(Self { language, handlers })
    }

    pub fn get(&self, kind: BlockKind) -> Result<BlockHandler, CodegenError> {
        self.handlers
            .get(&kind)
            .copied()
            .ok_or(CodegenError::MissingHandler {
                language: self.language,
                kind,
            })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub language: Language,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            language: Language::JavaScript,
        }
    }
}

/// State shared by every template function during one generation pass.
pub struct CodegenPass {
    language: Language,
    handlers: HandlerTable,
    pub definitions: DefinitionRegistry,
    pub names: NameAllocator,
}

impl CodegenPass {
    pub fn new(language: Language) -> Result<Self, CodegenError> {
        Ok(Self {
            language,
            handlers: HandlerTable::new(language)?,
            definitions: DefinitionRegistry::new(),
            names: NameAllocator::new(language.reserved_words()),
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn block_to_code(
        &mut self,
        block: &dyn BlockView,
        drop_parens: bool,
    ) -> Result<String, CodegenError> {
        let kind = block.kind().parse::<BlockKind>()?;
        let handler = self.handlers.get(kind)?;
        trace!(kind = %kind, family = ?kind.family(), drop_parens, "generating block");
        handler(self, block, drop_parens)
    }

    /// Generated code of the child plugged into value slot `slot`, or `None` when unconnected.
    pub fn value_to_code(
        &mut self,
        block: &dyn BlockView,
        slot: usize,
        drop_parens: bool,
    ) -> Result<Option<String>, CodegenError> {
        let Some(child) = block.value_input(slot) else {
            return Ok(None);
        };
        let code = self.block_to_code(child, drop_parens)?;
        Ok(Some(code).filter(|c| !c.is_empty()))
    }

    pub fn value_or(
        &mut self,
        block: &dyn BlockView,
        slot: usize,
        drop_parens: bool,
        default: &str,
    ) -> Result<String, CodegenError> {
        Ok(self
            .value_to_code(block, slot, drop_parens)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Indented code of the statement chain in `slot`, or `None` when the slot is empty.
    pub fn statement_to_code(
        &mut self,
        block: &dyn BlockView,
        slot: usize,
    ) -> Result<Option<String>, CodegenError> {
        let Some(first) = block.statement_input(slot) else {
            return Ok(None);
        };
        let code = self.chain_to_code(first)?;
        if code.is_empty() {
            return Ok(None);
        }
        Ok(Some(prefix_lines(&code, INDENT)))
    }

    /// Body of a compound statement, falling back to the no-op placeholder.
    pub fn branch_or_noop(
        &mut self,
        block: &dyn BlockView,
        slot: usize,
    ) -> Result<String, CodegenError> {
        Ok(self
            .statement_to_code(block, slot)?
            .unwrap_or_else(|| format!("{}{}\n", INDENT, self.language.noop_statement())))
    }

    pub fn chain_to_code(&mut self, first: &dyn BlockView) -> Result<String, CodegenError> {
        let mut out = String::new();
        let mut current = Some(first);
        while let Some(block) = current {
            let kind = block.kind().parse::<BlockKind>()?;
            let code = self.block_to_code(block, true)?;
            if kind.is_statement() {
                out.push_str(&code);
            } else if !code.is_empty() {
                out.push_str(&self.language.expression_statement(&code));
            }
            current = block.next_block();
        }
        Ok(out)
    }

    /// Hoists a helper function once per pass and returns the name every call site must use.
    pub fn provide_function<F>(&mut self, key: &str, base_name: &str, build: F) -> String
    where
        F: FnOnce(&str) -> Vec<String>,
    {
        let names = &mut self.names;
        let definition = self.definitions.get_or_insert_with(key, || {
            let name = names.distinct_name(base_name);
            debug!(key, name = %name, "hoisting helper definition");
            let source = build(&name).join("\n");
            (Some(name), source)
        });
        definition.name.clone().unwrap_or_default()
    }

    pub fn provide_import(&mut self, key: &str, source: &str) {
        self.definitions
            .get_or_insert_with(key, || (None, source.to_string()));
    }

    /// Allocates a fresh temporary and hoists its top-level declaration.
    pub fn declare_temp(&mut self, base_name: &str) -> String {
        let name = self.names.distinct_name(base_name);
        let key = format!("temp_{}", name);
        let declaration = format!("var {};", name);
        self.definitions
            .get_or_insert_with(&key, || (Some(name.clone()), declaration));
        name
    }

    /// Joins hoisted definitions, variable declarations and the program body.
    ///
    /// JavaScript and Dart declare every user variable once at the top, so
    /// templates assign to them without a declaration keyword. Dart has no
    /// top-level statements, so its body always lives in `main()`.
    pub fn finish(self, body: &str) -> String {
        let mut parts = Vec::new();
        if !self.definitions.is_empty() {
            parts.push(self.definitions.emit());
        }
        let variables = self.names.variables();
        if self.language.declares_variables() && !variables.is_empty() {
            parts.push(format!("var {};", variables.join(", ")));
        }
        if self.language == Language::Dart {
            parts.push(format!("main() {{\n{}}}", prefix_lines(body, INDENT)));
        } else if !body.is_empty() {
            parts.push(body.trim_end_matches('\n').to_string());
        }
        let mut out = parts.join("\n\n");
        out.push('\n');
        out
    }
}

/// Generates one complete program from the given top-level blocks.
pub fn generate_program(
    top_blocks: &[&dyn BlockView],
    options: GenerateOptions,
) -> Result<String, CodegenError> {
    let mut pass = CodegenPass::new(options.language)?;
    let mut body = String::new();
    for block in top_blocks {
        body.push_str(&pass.chain_to_code(*block)?);
    }
    info!(
        language = %options.language,
        top_blocks = top_blocks.len(),
        definitions = pass.definitions.len(),
        "generated program"
    );
    Ok(pass.finish(&body))
}

pub fn parenthesize(code: String, drop_parens: bool) -> String {
    if drop_parens {
        code
    } else {
        format!("({})", code)
    }
}

pub fn prefix_lines(code: &str, prefix: &str) -> String {
    code.lines()
        .map(|line| {
            if line.is_empty() {
                "\n".to_string()
            } else {
                format!("{}{}\n", prefix, line)
            }
        })
        .collect()
}

pub(crate) fn static_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

/// `^\w+$`: identifiers and plain numbers, safe to prefix with a unary operator.
pub fn is_bare_word(code: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    static_regex(&RE, r"^\w+$").is_match(code)
}

pub fn is_plain_integer(code: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    static_regex(&RE, r"^\d+$").is_match(code)
}

/// Value of `code` when it is a bare numeric literal such as `5`, `-2` or `0.5`.
pub fn numeric_literal(code: &str) -> Option<f64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    if !static_regex(&RE, r"^-?\d+(\.\d+)?$").is_match(code) {
        return None;
    }
    code.parse::<f64>().ok()
}

/// Host-style float parsing: the longest numeric prefix wins, anything else is NaN.
pub fn parse_float(text: &str) -> f64 {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = static_regex(
        &RE,
        r"^[+-]?(Infinity|\d+\.?\d*(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?)",
    );
    let trimmed = text.trim_start();
    let Some(found) = re.find(trimmed) else {
        return f64::NAN;
    };
    let matched = found.as_str();
    match matched.trim_start_matches(|c| c == '+' || c == '-') {
        "Infinity" => {
            if matched.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        }
        _ => matched.parse::<f64>().unwrap_or(f64::NAN),
    }
}

pub fn format_number(value: f64, language: Language) -> String {
    if value.is_nan() {
        return match language {
            Language::JavaScript => "NaN",
            Language::Dart => "double.nan",
            Language::Python => "float('nan')",
        }
        .to_string();
    }
    if value.is_infinite() {
        let negative = value < 0.0;
        return match (language, negative) {
            (Language::JavaScript, false) => "Infinity",
            (Language::JavaScript, true) => "-Infinity",
            (Language::Dart, false) => "double.infinity",
            (Language::Dart, true) => "double.negativeInfinity",
            (Language::Python, false) => "float('inf')",
            (Language::Python, true) => "float('-inf')",
        }
        .to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    // Dart integer literals must fit in 64 bits.
    if language == Language::Dart && value.fract() == 0.0 && value.abs() >= 2f64.powi(63) {
        return format!("{}.0", value);
    }
    format!("{}", value)
}

pub fn quote_string(text: &str, language: Language) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' if language == Language::Dart => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Block;

    #[test]
    fn every_language_covers_every_block_kind() {
        for language in Language::ALL {
            assert!(HandlerTable::new(language).is_ok(), "{language}");
        }
    }

    #[test]
    fn incomplete_table_is_rejected() {
        let err = HandlerTable::from_entries(Language::Python, Vec::new())
            .err()
            .unwrap();
        assert!(matches!(err, CodegenError::MissingHandler { .. }));
    }

    #[test]
    fn parse_float_follows_host_semantics() {
        assert_eq!(parse_float("5"), 5.0);
        assert_eq!(parse_float("  2.5abc"), 2.5);
        assert_eq!(parse_float("-.5"), -0.5);
        assert_eq!(parse_float("1e3"), 1000.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_float("abc").is_nan());
        assert!(parse_float("").is_nan());
    }

    #[test]
    fn numbers_format_per_language() {
        assert_eq!(format_number(5.0, Language::Python), "5");
        assert_eq!(format_number(-0.0, Language::Dart), "0");
        assert_eq!(format_number(2.5, Language::JavaScript), "2.5");
        assert_eq!(format_number(f64::NAN, Language::JavaScript), "NaN");
        assert_eq!(format_number(f64::NAN, Language::Dart), "double.nan");
        assert_eq!(format_number(f64::INFINITY, Language::Python), "float('inf')");
    }

    #[test]
    fn dart_integers_past_64_bits_become_doubles() {
        assert_eq!(format_number(1e21, Language::Dart), "1000000000000000000000.0");
        assert_eq!(format_number(-1e19, Language::Dart), "-10000000000000000000.0");
        assert_eq!(format_number(1e18, Language::Dart), "1000000000000000000");
        assert_eq!(format_number(1e21, Language::JavaScript), "1000000000000000000000");
    }

    #[test]
    fn quoting_escapes_dart_interpolation() {
        assert_eq!(quote_string("it's $5", Language::Dart), r"'it\'s \$5'");
        assert_eq!(quote_string("it's $5", Language::JavaScript), r"'it\'s $5'");
        assert_eq!(quote_string("a\nb", Language::Python), r"'a\nb'");
    }

    #[test]
    fn literal_shape_checks() {
        assert_eq!(numeric_literal("-3"), Some(-3.0));
        assert_eq!(numeric_literal("0.5"), Some(0.5));
        assert_eq!(numeric_literal("x"), None);
        assert_eq!(numeric_literal("(1 + 2)"), None);
        assert!(is_plain_integer("12"));
        assert!(!is_plain_integer("-1"));
        assert!(is_bare_word("done"));
        assert!(!is_bare_word("a and b"));
    }

    #[test]
    fn prefix_lines_indents_each_line() {
        assert_eq!(prefix_lines("a\nb\n", INDENT), "  a\n  b\n");
    }

    #[test]
    fn unknown_block_type_aborts_the_pass() {
        let block = Block::new("logic_compare");
        let err = generate_program(&[&block], GenerateOptions::default()).unwrap_err();
        assert_eq!(
            err,
            CodegenError::UnknownBlockKind {
                kind: "logic_compare".to_string()
            }
        );
    }

    #[test]
    fn program_hoists_definitions_before_the_body() {
        let median = Block::new("math_on_list").with_title(0, "MEDIAN");
        let print = Block::new("text_print").with_value(0, median.clone());
        let second = Block::new("text_print").with_value(0, median);
        let program = print.chain(second);
        let out = generate_program(
            &[&program],
            GenerateOptions {
                language: Language::Python,
            },
        )
        .unwrap();
        assert!(out.starts_with("from numbers import Number\n\ndef math_median(myList):\n"));
        assert!(out.ends_with("print(math_median([]))\nprint(math_median([]))\n"));
        assert_eq!(out.matches("def math_median").count(), 1);
    }

    #[test]
    fn javascript_programs_declare_user_variables() {
        let set = Block::new("variables_set")
            .with_title(0, "count")
            .with_value(0, Block::number("1"));
        let out = generate_program(&[&set], GenerateOptions::default()).unwrap();
        assert_eq!(out, "var count;\n\ncount = 1;\n");
    }

    #[test]
    fn top_level_value_blocks_become_expression_statements() {
        let block = Block::new("math_random_float");
        let out = generate_program(&[&block], GenerateOptions::default()).unwrap();
        assert_eq!(out, "Math.random();\n");
    }

    #[test]
    fn generation_is_deterministic() {
        let block = Block::new("text_endString")
            .with_label(0, "LAST")
            .with_value(0, Block::number("3"))
            .with_value(1, Block::text("hello"));
        let options = GenerateOptions {
            language: Language::Dart,
        };
        let first = generate_program(&[&block], options).unwrap();
        let second = generate_program(&[&block], options).unwrap();
        assert_eq!(first, second);
    }
}
