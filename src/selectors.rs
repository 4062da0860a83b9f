//! Operator and choice tokens configured on blocks.
//!
//! Every parser maps an unrecognized token to `CodegenError::UnknownSelector`,
//! which aborts the whole generation pass.

use crate::blocks::BlockKind;
use crate::generator::CodegenError;

fn unknown(kind: BlockKind, token: Option<&str>) -> CodegenError {
    CodegenError::UnknownSelector {
        kind,
        selector: token.unwrap_or_default().to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Minus,
    Multiply,
    Divide,
    Power,
}

impl ArithmeticOp {
    pub fn parse(token: Option<&str>) -> Result<Self, CodegenError> {
        match token {
            Some("ADD") => Ok(Self::Add),
            Some("MINUS") => Ok(Self::Minus),
            Some("MULTIPLY") => Ok(Self::Multiply),
            Some("DIVIDE") => Ok(Self::Divide),
            Some("POWER") => Ok(Self::Power),
            other => Err(unknown(BlockKind::MathArithmetic, other)),
        }
    }

    /// Infix spelling shared by every target; power is target-specific.
    pub fn infix(self) -> Option<&'static str> {
        match self {
            Self::Add => Some("+"),
            Self::Minus => Some("-"),
            Self::Multiply => Some("*"),
            Self::Divide => Some("/"),
            Self::Power => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleOp {
    Abs,
    Root,
    Ln,
    Log10,
    Exp,
    Pow10,
    Round,
    RoundUp,
    RoundDown,
    Sin,
    Cos,
    Tan,
    Neg,
    Asin,
    Acos,
    Atan,
}

impl SingleOp {
    pub fn parse(kind: BlockKind, token: Option<&str>) -> Result<Self, CodegenError> {
        match token {
            Some("ABS") => Ok(Self::Abs),
            Some("ROOT") => Ok(Self::Root),
            Some("LN") => Ok(Self::Ln),
            Some("LOG10") => Ok(Self::Log10),
            Some("EXP") => Ok(Self::Exp),
            Some("POW10") => Ok(Self::Pow10),
            Some("ROUND") => Ok(Self::Round),
            Some("ROUNDUP") => Ok(Self::RoundUp),
            Some("ROUNDDOWN") => Ok(Self::RoundDown),
            Some("SIN") => Ok(Self::Sin),
            Some("COS") => Ok(Self::Cos),
            Some("TAN") => Ok(Self::Tan),
            Some("NEG") => Ok(Self::Neg),
            Some("ASIN") => Ok(Self::Asin),
            Some("ACOS") => Ok(Self::Acos),
            Some("ATAN") => Ok(Self::Atan),
            other => Err(unknown(kind, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOp {
    Sum,
    Min,
    Max,
    Average,
    Median,
    Mode,
    StdDev,
    Random,
}

impl ListOp {
    pub fn parse(token: Option<&str>) -> Result<Self, CodegenError> {
        match token {
            Some("SUM") => Ok(Self::Sum),
            Some("MIN") => Ok(Self::Min),
            Some("MAX") => Ok(Self::Max),
            Some("AVERAGE") => Ok(Self::Average),
            Some("MEDIAN") => Ok(Self::Median),
            Some("MODE") => Ok(Self::Mode),
            Some("STD_DEV") => Ok(Self::StdDev),
            Some("RANDOM") => Ok(Self::Random),
            other => Err(unknown(BlockKind::MathOnList, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    First,
    Last,
}

impl End {
    pub fn parse(kind: BlockKind, token: Option<&str>) -> Result<Self, CodegenError> {
        match token {
            Some("FIRST") => Ok(Self::First),
            Some("LAST") => Ok(Self::Last),
            other => Err(unknown(kind, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseOp {
    Upper,
    Lower,
    Title,
}

impl CaseOp {
    pub fn parse(token: Option<&str>) -> Result<Self, CodegenError> {
        match token {
            Some("UPPERCASE") => Ok(Self::Upper),
            Some("LOWERCASE") => Ok(Self::Lower),
            Some("TITLECASE") => Ok(Self::Title),
            other => Err(unknown(BlockKind::TextChangeCase, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimOp {
    Left,
    Right,
    Both,
}

impl TrimOp {
    pub fn parse(token: Option<&str>) -> Result<Self, CodegenError> {
        match token {
            Some("LEFT") => Ok(Self::Left),
            Some("RIGHT") => Ok(Self::Right),
            Some("BOTH") => Ok(Self::Both),
            other => Err(unknown(BlockKind::TextTrim, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    While,
    Until,
}

impl LoopMode {
    pub fn parse(token: Option<&str>) -> Result<Self, CodegenError> {
        match token {
            Some("WHILE") => Ok(Self::While),
            Some("UNTIL") => Ok(Self::Until),
            other => Err(unknown(BlockKind::ControlsWhileUntil, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOp {
    Break,
    Continue,
}

impl FlowOp {
    pub fn parse(token: Option<&str>) -> Result<Self, CodegenError> {
        match token {
            Some("BREAK") => Ok(Self::Break),
            Some("CONTINUE") => Ok(Self::Continue),
            other => Err(unknown(BlockKind::ControlsFlowStatements, other)),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Break => "break",
            Self::Continue => "continue",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tokens_carry_the_block_kind() {
        let err = SingleOp::parse(BlockKind::MathTrig, Some("SINH")).unwrap_err();
        match err {
            CodegenError::UnknownSelector { kind, selector } => {
                assert_eq!(kind, BlockKind::MathTrig);
                assert_eq!(selector, "SINH");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_token_is_unknown() {
        assert!(FlowOp::parse(None).is_err());
        assert!(TrimOp::parse(Some("both")).is_err());
        assert_eq!(ListOp::parse(Some("STD_DEV")).unwrap(), ListOp::StdDev);
    }
}
