use crate::generator::CodegenError;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFamily {
    Math,
    Text,
    Control,
    Procedure,
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    MathNumber,
    MathArithmetic,
    MathChange,
    MathSingle,
    MathRound,
    MathTrig,
    MathOnList,
    MathModulo,
    MathRandomFloat,
    MathRandomInt,
    Text,
    TextJoin,
    TextLength,
    TextIsEmpty,
    TextEndString,
    TextIndexOf,
    TextCharAt,
    TextChangeCase,
    TextTrim,
    TextPrint,
    ControlsIf,
    ControlsWhileUntil,
    ControlsFor,
    ControlsForEach,
    ControlsFlowStatements,
    ProceduresDefReturn,
    ProceduresDefNoReturn,
    VariablesGet,
    VariablesSet,
}

impl BlockKind {
    pub const ALL: [BlockKind; 29] = [
        BlockKind::MathNumber,
        BlockKind::MathArithmetic,
        BlockKind::MathChange,
        BlockKind::MathSingle,
        BlockKind::MathRound,
        BlockKind::MathTrig,
        BlockKind::MathOnList,
        BlockKind::MathModulo,
        BlockKind::MathRandomFloat,
        BlockKind::MathRandomInt,
        BlockKind::Text,
        BlockKind::TextJoin,
        BlockKind::TextLength,
        BlockKind::TextIsEmpty,
        BlockKind::TextEndString,
        BlockKind::TextIndexOf,
        BlockKind::TextCharAt,
        BlockKind::TextChangeCase,
        BlockKind::TextTrim,
        BlockKind::TextPrint,
        BlockKind::ControlsIf,
        BlockKind::ControlsWhileUntil,
        BlockKind::ControlsFor,
        BlockKind::ControlsForEach,
        BlockKind::ControlsFlowStatements,
        BlockKind::ProceduresDefReturn,
        BlockKind::ProceduresDefNoReturn,
        BlockKind::VariablesGet,
        BlockKind::VariablesSet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::MathNumber => "math_number",
            BlockKind::MathArithmetic => "math_arithmetic",
            BlockKind::MathChange => "math_change",
            BlockKind::MathSingle => "math_single",
            BlockKind::MathRound => "math_round",
            BlockKind::MathTrig => "math_trig",
            BlockKind::MathOnList => "math_on_list",
            BlockKind::MathModulo => "math_modulo",
            BlockKind::MathRandomFloat => "math_random_float",
            BlockKind::MathRandomInt => "math_random_int",
            BlockKind::Text => "text",
            BlockKind::TextJoin => "text_join",
            BlockKind::TextLength => "text_length",
            BlockKind::TextIsEmpty => "text_isEmpty",
            BlockKind::TextEndString => "text_endString",
            BlockKind::TextIndexOf => "text_indexOf",
            BlockKind::TextCharAt => "text_charAt",
            BlockKind::TextChangeCase => "text_changeCase",
            BlockKind::TextTrim => "text_trim",
            BlockKind::TextPrint => "text_print",
            BlockKind::ControlsIf => "controls_if",
            BlockKind::ControlsWhileUntil => "controls_whileUntil",
            BlockKind::ControlsFor => "controls_for",
            BlockKind::ControlsForEach => "controls_forEach",
            BlockKind::ControlsFlowStatements => "controls_flow_statements",
            BlockKind::ProceduresDefReturn => "procedures_defreturn",
            BlockKind::ProceduresDefNoReturn => "procedures_defnoreturn",
            BlockKind::VariablesGet => "variables_get",
            BlockKind::VariablesSet => "variables_set",
        }
    }

    pub fn family(self) -> BlockFamily {
        match self {
            BlockKind::MathNumber
            | BlockKind::MathArithmetic
            | BlockKind::MathChange
            | BlockKind::MathSingle
            | BlockKind::MathRound
            | BlockKind::MathTrig
            | BlockKind::MathOnList
            | BlockKind::MathModulo
            | BlockKind::MathRandomFloat
            | BlockKind::MathRandomInt => BlockFamily::Math,
            BlockKind::Text
            | BlockKind::TextJoin
            | BlockKind::TextLength
            | BlockKind::TextIsEmpty
            | BlockKind::TextEndString
            | BlockKind::TextIndexOf
            | BlockKind::TextCharAt
            | BlockKind::TextChangeCase
            | BlockKind::TextTrim
            | BlockKind::TextPrint => BlockFamily::Text,
            BlockKind::ControlsIf
            | BlockKind::ControlsWhileUntil
            | BlockKind::ControlsFor
            | BlockKind::ControlsForEach
            | BlockKind::ControlsFlowStatements => BlockFamily::Control,
            BlockKind::ProceduresDefReturn | BlockKind::ProceduresDefNoReturn => {
                BlockFamily::Procedure
            }
            BlockKind::VariablesGet | BlockKind::VariablesSet => BlockFamily::Variable,
        }
    }

    /// Statement blocks produce newline-terminated text; everything else is an expression.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            BlockKind::MathChange
                | BlockKind::TextPrint
                | BlockKind::ControlsIf
                | BlockKind::ControlsWhileUntil
                | BlockKind::ControlsFor
                | BlockKind::ControlsForEach
                | BlockKind::ControlsFlowStatements
                | BlockKind::ProceduresDefReturn
                | BlockKind::ProceduresDefNoReturn
                | BlockKind::VariablesSet
        )
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CodegenError::UnknownBlockKind {
                kind: s.to_string(),
            })
    }
}

/// Read-only view of one block instance, as supplied by the block graph.
pub trait BlockView {
    fn kind(&self) -> &str;
    fn title_text(&self, slot: usize) -> Option<&str>;
    fn value_label(&self, slot: usize) -> Option<&str>;
    fn value_input(&self, slot: usize) -> Option<&dyn BlockView>;
    /// First block of the statement chain plugged into `slot`.
    fn statement_input(&self, slot: usize) -> Option<&dyn BlockView>;
    fn next_block(&self) -> Option<&dyn BlockView>;
    fn item_count(&self) -> usize;
    fn elseif_count(&self) -> usize;
    fn else_count(&self) -> usize;
    fn variable_input(&self, slot: usize) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mutation {
    pub items: usize,
    pub elseif: usize,
    pub else_: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: String,
    pub titles: BTreeMap<usize, String>,
    pub labels: BTreeMap<usize, String>,
    pub values: BTreeMap<usize, Block>,
    pub statements: BTreeMap<usize, Block>,
    pub variables: BTreeMap<usize, String>,
    pub mutation: Mutation,
    pub next: Option<Box<Block>>,
}

impl Block {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            titles: BTreeMap::new(),
            labels: BTreeMap::new(),
            values: BTreeMap::new(),
            statements: BTreeMap::new(),
            variables: BTreeMap::new(),
            mutation: Mutation::default(),
            next: None,
        }
    }

    pub fn number(literal: &str) -> Self {
        Block::new(BlockKind::MathNumber.as_str()).with_title(0, literal)
    }

    pub fn text(literal: &str) -> Self {
        Block::new(BlockKind::Text.as_str()).with_title(1, literal)
    }

    pub fn variable(name: &str) -> Self {
        Block::new(BlockKind::VariablesGet.as_str()).with_title(0, name)
    }

    pub fn with_title(mut self, slot: usize, text: impl Into<String>) -> Self {
        self.titles.insert(slot, text.into());
        self
    }

    pub fn with_label(mut self, slot: usize, token: impl Into<String>) -> Self {
        self.labels.insert(slot, token.into());
        self
    }

    pub fn with_value(mut self, slot: usize, child: Block) -> Self {
        self.values.insert(slot, child);
        self
    }

    pub fn with_statement(mut self, slot: usize, first: Block) -> Self {
        self.statements.insert(slot, first);
        self
    }

    pub fn with_variable(mut self, slot: usize, name: impl Into<String>) -> Self {
        self.variables.insert(slot, name.into());
        self
    }

    pub fn with_items(mut self, count: usize) -> Self {
        self.mutation.items = count;
        self
    }

    pub fn with_elseif(mut self, count: usize) -> Self {
        self.mutation.elseif = count;
        self
    }

    pub fn with_else(mut self, count: usize) -> Self {
        self.mutation.else_ = count;
        self
    }

    /// Appends `tail` at the end of this block's `next` chain.
    pub fn chain(mut self, tail: Block) -> Self {
        match self.next.take() {
            Some(next) => self.next = Some(Box::new(next.chain(tail))),
            None => self.next = Some(Box::new(tail)),
        }
        self
    }
}

impl BlockView for Block {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn title_text(&self, slot: usize) -> Option<&str> {
        self.titles.get(&slot).map(String::as_str)
    }

    fn value_label(&self, slot: usize) -> Option<&str> {
        self.labels.get(&slot).map(String::as_str)
    }

    fn value_input(&self, slot: usize) -> Option<&dyn BlockView> {
        self.values.get(&slot).map(|b| b as &dyn BlockView)
    }

    fn statement_input(&self, slot: usize) -> Option<&dyn BlockView> {
        self.statements.get(&slot).map(|b| b as &dyn BlockView)
    }

    fn next_block(&self) -> Option<&dyn BlockView> {
        self.next.as_deref().map(|b| b as &dyn BlockView)
    }

    fn item_count(&self) -> usize {
        self.mutation.items
    }

    fn elseif_count(&self) -> usize {
        self.mutation.elseif
    }

    fn else_count(&self) -> usize {
        self.mutation.else_
    }

    fn variable_input(&self, slot: usize) -> Option<&str> {
        self.variables.get(&slot).map(String::as_str)
    }
}
