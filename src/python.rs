//! Python 3 templates.
//!
//! No operand guard is needed for method or unary forms: Python parses `-x`,
//! `abs(-4)` and `--4` the way they read.

use crate::blocks::{BlockKind, BlockView};
use crate::generator::{
    format_number, is_bare_word, is_plain_integer, numeric_literal, parenthesize, parse_float,
    quote_string, BlockHandler, CodegenError, CodegenPass, Language, INDENT,
};
use crate::selectors::{ArithmeticOp, CaseOp, End, FlowOp, ListOp, LoopMode, SingleOp, TrimOp};

type Code = Result<String, CodegenError>;

pub const RESERVED_WORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "False", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "None", "nonlocal", "not", "or", "pass", "raise", "return", "True", "try", "while",
    "with", "yield", "abs", "float", "int", "len", "list", "map", "math", "max", "min", "print",
    "random", "range", "re", "round", "sorted", "str", "sum", "Number",
];

pub fn handlers() -> Vec<(BlockKind, BlockHandler)> {
    vec![
        (BlockKind::MathNumber, math_number),
        (BlockKind::MathArithmetic, math_arithmetic),
        (BlockKind::MathChange, math_change),
        (BlockKind::MathSingle, math_single),
        (BlockKind::MathRound, math_single),
        (BlockKind::MathTrig, math_single),
        (BlockKind::MathOnList, math_on_list),
        (BlockKind::MathModulo, math_modulo),
        (BlockKind::MathRandomFloat, math_random_float),
        (BlockKind::MathRandomInt, math_random_int),
        (BlockKind::Text, text),
        (BlockKind::TextJoin, text_join),
        (BlockKind::TextLength, text_length),
        (BlockKind::TextIsEmpty, text_is_empty),
        (BlockKind::TextEndString, text_end_string),
        (BlockKind::TextIndexOf, text_index_of),
        (BlockKind::TextCharAt, text_char_at),
        (BlockKind::TextChangeCase, text_change_case),
        (BlockKind::TextTrim, text_trim),
        (BlockKind::TextPrint, text_print),
        (BlockKind::ControlsIf, controls_if),
        (BlockKind::ControlsWhileUntil, controls_while_until),
        (BlockKind::ControlsFor, controls_for),
        (BlockKind::ControlsForEach, controls_for_each),
        (BlockKind::ControlsFlowStatements, controls_flow_statements),
        (BlockKind::ProceduresDefReturn, procedures_def),
        (BlockKind::ProceduresDefNoReturn, procedures_def),
        (BlockKind::VariablesGet, variables_get),
        (BlockKind::VariablesSet, variables_set),
    ]
}

fn math_number(_pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let value = parse_float(block.title_text(0).unwrap_or_default());
    Ok(format_number(value, Language::Python))
}

fn math_arithmetic(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let op = ArithmeticOp::parse(block.value_label(1))?;
    let left = pass.value_or(block, 0, false, "0")?;
    let right = pass.value_or(block, 1, false, "0")?;
    let code = match op.infix() {
        Some(symbol) => format!("{} {} {}", left, symbol, right),
        // `-2 ** 2` binds as `-(2 ** 2)`.
        None if left.starts_with('-') => format!("({}) ** {}", left, right),
        None => format!("{} ** {}", left, right),
    };
    Ok(parenthesize(code, drop_parens))
}

fn math_change(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    pass.provide_import("from_numbers_import_number", "from numbers import Number");
    let delta = pass.value_or(block, 0, false, "0")?;
    let var = pass
        .names
        .variable_name(block.title_text(1).unwrap_or_default());
    Ok(format!(
        "{var} = ({var} if isinstance({var}, Number) else 0) + {}\n",
        delta
    ))
}

fn math_single(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let kind = block.kind().parse::<BlockKind>()?;
    let op = SingleOp::parse(kind, block.value_label(0))?;
    let wants_parens = matches!(
        op,
        SingleOp::Sin | SingleOp::Cos | SingleOp::Tan | SingleOp::Neg
    );
    let arg = pass.value_or(block, 0, !wants_parens, "0")?;
    if !matches!(op, SingleOp::Round | SingleOp::Neg) {
        pass.provide_import("import_math", "import math");
    }
    // The flag marks results whose top-level operator is looser than a call.
    let (code, infix) = match op {
        SingleOp::Abs => (format!("math.fabs({})", arg), false),
        SingleOp::Root => (format!("math.sqrt({})", arg), false),
        SingleOp::Ln => (format!("math.log({})", arg), false),
        SingleOp::Log10 => (format!("math.log10({})", arg), false),
        SingleOp::Exp => (format!("math.exp({})", arg), false),
        SingleOp::Pow10 => (format!("math.pow(10, {})", arg), false),
        SingleOp::Round => (format!("round({})", arg), false),
        SingleOp::RoundUp => (format!("math.ceil({})", arg), false),
        SingleOp::RoundDown => (format!("math.floor({})", arg), false),
        SingleOp::Sin => (format!("math.sin({} / 180.0 * math.pi)", arg), false),
        SingleOp::Cos => (format!("math.cos({} / 180.0 * math.pi)", arg), false),
        SingleOp::Tan => (format!("math.tan({} / 180.0 * math.pi)", arg), false),
        SingleOp::Neg => (format!("-{}", arg), true),
        SingleOp::Asin => (format!("math.asin({}) / math.pi * 180", arg), true),
        SingleOp::Acos => (format!("math.acos({}) / math.pi * 180", arg), true),
        SingleOp::Atan => (format!("math.atan({}) / math.pi * 180", arg), true),
    };
    if infix {
        Ok(parenthesize(code, drop_parens))
    } else {
        Ok(code)
    }
}

fn math_on_list(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let op = ListOp::parse(block.title_text(0))?;
    let list = pass.value_or(block, 0, true, "[]")?;
    let code = match op {
        ListOp::Sum => format!("sum({})", list),
        ListOp::Min => format!("min({})", list),
        ListOp::Max => format!("max({})", list),
        ListOp::Average => {
            let name = pass.provide_function("math_mean", "math_mean", |name| {
                vec![
                    format!("def {}(myList):", name),
                    "  if not myList: return 0".to_string(),
                    "  return float(sum(myList)) / len(myList)".to_string(),
                ]
            });
            format!("{}({})", name, list)
        }
        ListOp::Median => {
            pass.provide_import("from_numbers_import_number", "from numbers import Number");
            let name = pass.provide_function("math_median", "math_median", |name| {
                vec![
                    format!("def {}(myList):", name),
                    "  localList = sorted(e for e in myList if isinstance(e, Number))".to_string(),
                    "  if not localList: return 0".to_string(),
                    "  if len(localList) % 2 == 0:".to_string(),
                    "    return (localList[len(localList) // 2 - 1] + localList[len(localList) // 2]) / 2.0".to_string(),
                    "  else:".to_string(),
                    "    return localList[(len(localList) - 1) // 2]".to_string(),
                ]
            });
            format!("{}({})", name, list)
        }
        ListOp::Mode => {
            let name = pass.provide_function("math_modes", "math_modes", |name| {
                vec![
                    format!("def {}(some_list):", name),
                    "  modes = []".to_string(),
                    "  # [item, count] pairs instead of a dict so unhashable items can be counted.".to_string(),
                    "  counts = []".to_string(),
                    "  maxCount = 1".to_string(),
                    "  for item in some_list:".to_string(),
                    "    found = False".to_string(),
                    "    for count in counts:".to_string(),
                    "      if count[0] == item:".to_string(),
                    "        count[1] += 1".to_string(),
                    "        maxCount = max(maxCount, count[1])".to_string(),
                    "        found = True".to_string(),
                    "    if not found:".to_string(),
                    "      counts.append([item, 1])".to_string(),
                    "  for counted_item, item_count in counts:".to_string(),
                    "    if item_count == maxCount:".to_string(),
                    "      modes.append(counted_item)".to_string(),
                    "  return modes".to_string(),
                ]
            });
            format!("{}({})", name, list)
        }
        ListOp::StdDev => {
            pass.provide_import("import_math", "import math");
            pass.provide_import("from_numbers_import_number", "from numbers import Number");
            let name = pass.provide_function(
                "math_standard_deviation",
                "math_standard_deviation",
                |name| {
                    vec![
                        format!("def {}(myList):", name),
                        "  numbers = [e for e in myList if isinstance(e, Number)]".to_string(),
                        "  n = len(numbers)".to_string(),
                        "  if n == 0: return None".to_string(),
                        "  mean = float(sum(numbers)) / n".to_string(),
                        "  variance = sum((x - mean) ** 2 for x in numbers) / n".to_string(),
                        "  return math.sqrt(variance)".to_string(),
                    ]
                },
            );
            format!("{}({})", name, list)
        }
        ListOp::Random => {
            pass.provide_import("import_random", "import random");
            format!("random.choice({})", list)
        }
    };
    Ok(code)
}

fn math_modulo(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let left = pass.value_or(block, 0, false, "0")?;
    let right = pass.value_or(block, 1, false, "0")?;
    Ok(parenthesize(format!("{} % {}", left, right), drop_parens))
}

fn math_random_float(pass: &mut CodegenPass, _block: &dyn BlockView, _drop_parens: bool) -> Code {
    pass.provide_import("import_random", "import random");
    Ok("random.random()".to_string())
}

fn math_random_int(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    pass.provide_import("import_math", "import math");
    pass.provide_import("import_random", "import random");
    let a = pass.value_or(block, 0, false, "0")?;
    let b = pass.value_or(block, 1, false, "0")?;
    let formula = |low: &str, high: &str| {
        format!(
            "math.floor(random.random() * ({} - {} + 1) + {})",
            high, low, low
        )
    };
    match (numeric_literal(&a), numeric_literal(&b)) {
        (Some(x), Some(y)) if x <= y => Ok(formula(&a, &b)),
        (Some(_), Some(_)) => Ok(formula(&b, &a)),
        _ => Ok(parenthesize(
            format!("{} if {} < {} else {}", formula(&a, &b), a, b, formula(&b, &a)),
            drop_parens,
        )),
    }
}

fn text(_pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    Ok(quote_string(
        block.title_text(1).unwrap_or_default(),
        Language::Python,
    ))
}

fn text_join(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    match block.item_count() {
        0 => Ok("''".to_string()),
        1 => Ok(format!("str({})", pass.value_or(block, 0, true, "''")?)),
        2 => {
            let first = pass.value_or(block, 0, true, "''")?;
            let second = pass.value_or(block, 1, true, "''")?;
            Ok(parenthesize(
                format!("str({}) + str({})", first, second),
                drop_parens,
            ))
        }
        count => {
            let mut parts = Vec::with_capacity(count);
            for slot in 0..count {
                parts.push(format!("str({})", pass.value_or(block, slot, true, "''")?));
            }
            Ok(format!("''.join([{}])", parts.join(", ")))
        }
    }
}

fn text_length(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    Ok(format!("len({})", pass.value_or(block, 0, true, "''")?))
}

fn text_is_empty(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let arg = pass.value_or(block, 0, true, "''")?;
    Ok(parenthesize(format!("not len({})", arg), drop_parens))
}

fn text_end_string(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    match End::parse(BlockKind::TextEndString, block.value_label(0))? {
        End::First => {
            let count = pass.value_or(block, 0, true, "0")?;
            let source = pass.value_or(block, 1, false, "''")?;
            Ok(format!("{}[:{}]", source, count))
        }
        End::Last => {
            let count = pass.value_or(block, 0, false, "0")?;
            let source = pass.value_or(block, 1, true, "''")?;
            let temp = pass.names.distinct_name("temp_text");
            Ok(format!(
                "({temp} := {})[max(0, len({temp}) - {}):]",
                source, count
            ))
        }
    }
}

fn text_index_of(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let method = match End::parse(BlockKind::TextIndexOf, block.title_text(1))? {
        End::First => "find",
        End::Last => "rfind",
    };
    let needle = pass.value_or(block, 0, true, "''")?;
    let haystack = pass.value_or(block, 1, false, "''")?;
    Ok(parenthesize(
        format!("{}.{}({}) + 1", haystack, method, needle),
        drop_parens,
    ))
}

fn text_char_at(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let index = pass.value_or(block, 0, false, "1")?;
    let source = pass.value_or(block, 1, false, "[]")?;
    // Negative indices count from the end in Python, so a literal 0 clamps to the first item.
    let index = match index.parse::<u64>() {
        Ok(n) if is_plain_integer(&index) => n.saturating_sub(1).to_string(),
        _ => format!("{} - 1", index),
    };
    Ok(format!("{}[{}]", source, index))
}

fn text_change_case(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    match CaseOp::parse(block.value_label(0))? {
        CaseOp::Upper => Ok(format!("{}.upper()", pass.value_or(block, 0, false, "''")?)),
        CaseOp::Lower => Ok(format!("{}.lower()", pass.value_or(block, 0, false, "''")?)),
        CaseOp::Title => {
            pass.provide_import("import_re", "import re");
            let name = pass.provide_function("text_toTitleCase", "text_toTitleCase", |name| {
                vec![
                    format!("def {}(text):", name),
                    "  return re.sub(r'\\S+', lambda m: m.group(0)[:1].upper() + m.group(0)[1:].lower(), text)".to_string(),
                ]
            });
            let arg = pass.value_or(block, 0, true, "''")?;
            Ok(format!("{}({})", name, arg))
        }
    }
}

fn text_trim(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let method = match TrimOp::parse(block.title_text(1))? {
        TrimOp::Left => "lstrip",
        TrimOp::Right => "rstrip",
        TrimOp::Both => "strip",
    };
    let arg = pass.value_or(block, 0, false, "''")?;
    Ok(format!("{}.{}()", arg, method))
}

fn text_print(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    Ok(format!("print({})\n", pass.value_or(block, 0, true, "''")?))
}

fn controls_if(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let mut code = String::new();
    for n in 0..=block.elseif_count() {
        let condition = pass.value_or(block, n, true, "False")?;
        let branch = pass.branch_or_noop(block, n)?;
        let keyword = if n == 0 { "if" } else { "elif" };
        code.push_str(&format!("{} {}:\n{}", keyword, condition, branch));
    }
    if block.else_count() > 0 {
        let branch = pass.branch_or_noop(block, block.elseif_count() + 1)?;
        code.push_str(&format!("else:\n{}", branch));
    }
    Ok(code)
}

fn controls_while_until(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let mode = LoopMode::parse(block.title_text(1))?;
    let mut condition = pass.value_or(block, 0, true, "False")?;
    let branch = pass.branch_or_noop(block, 0)?;
    if mode == LoopMode::Until {
        if !is_bare_word(&condition) {
            condition = format!("({})", condition);
        }
        condition = format!("not {}", condition);
    }
    Ok(format!("while {}:\n{}", condition, branch))
}

fn controls_for(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let var = pass
        .names
        .variable_name(block.variable_input(0).unwrap_or("i"));
    let start = pass.value_or(block, 0, true, "0")?;
    let end = pass.value_or(block, 1, false, "0")?;
    let start = if numeric_literal(&start) == Some(0.0) {
        String::new()
    } else {
        format!("{}, ", start)
    };
    let end = match end.parse::<u64>() {
        Ok(n) if is_plain_integer(&end) => (n + 1).to_string(),
        _ => format!("{} + 1", end),
    };
    let branch = pass.branch_or_noop(block, 0)?;
    Ok(format!("for {} in range({}{}):\n{}", var, start, end, branch))
}

fn controls_for_each(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let var = pass
        .names
        .variable_name(block.variable_input(0).unwrap_or("item"));
    let list = pass.value_or(block, 0, true, "[]")?;
    let branch = pass.branch_or_noop(block, 0)?;
    Ok(format!("for {} in {}:\n{}", var, list, branch))
}

fn controls_flow_statements(
    _pass: &mut CodegenPass,
    block: &dyn BlockView,
    _drop_parens: bool,
) -> Code {
    Ok(format!("{}\n", FlowOp::parse(block.title_text(0))?.keyword()))
}

fn procedures_def(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let name = pass
        .names
        .procedure_name(block.title_text(0).unwrap_or("procedure"));
    let branch = pass.statement_to_code(block, 0)?;
    let result = pass.value_to_code(block, 0, true)?;
    let mut code = format!("def {}():\n", name);
    match (branch, result) {
        (branch, Some(result)) => {
            code.push_str(&branch.unwrap_or_default());
            code.push_str(&format!("{}return {}\n", INDENT, result));
        }
        (Some(branch), None) => code.push_str(&branch),
        (None, None) => code.push_str(&format!("{}pass\n", INDENT)),
    }
    Ok(code)
}

fn variables_get(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    Ok(pass
        .names
        .variable_name(block.title_text(0).unwrap_or_default()))
}

fn variables_set(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let value = pass.value_or(block, 0, true, "0")?;
    let var = pass
        .names
        .variable_name(block.title_text(0).unwrap_or_default());
    Ok(format!("{} = {}\n", var, value))
}
