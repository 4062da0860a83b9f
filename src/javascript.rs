//! JavaScript (ES2015) templates.

use crate::blocks::{BlockKind, BlockView};
use crate::c_family;
use crate::generator::{
    format_number, is_plain_integer, numeric_literal, parenthesize, parse_float, quote_string,
    BlockHandler, CodegenError, CodegenPass, Language,
};
use crate::selectors::{ArithmeticOp, CaseOp, End, ListOp, SingleOp, TrimOp};

type Code = Result<String, CodegenError>;

pub const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "export", "extends", "finally", "for", "function", "if", "import", "in",
    "instanceof", "new", "return", "super", "switch", "this", "throw", "try", "typeof", "var",
    "void", "while", "with", "yield", "enum", "await", "implements", "interface", "let",
    "package", "private", "protected", "public", "static", "null", "true", "false", "undefined",
    "NaN", "Infinity", "arguments", "Array", "Math", "Number", "String", "Object", "console",
    "eval", "window",
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
        (BlockKind::ControlsIf, c_family::controls_if),
        (BlockKind::ControlsWhileUntil, c_family::controls_while_until),
        (BlockKind::ControlsFor, c_family::controls_for),
        (BlockKind::ControlsForEach, controls_for_each),
        (BlockKind::ControlsFlowStatements, c_family::controls_flow_statements),
        (BlockKind::ProceduresDefReturn, procedures_def),
        (BlockKind::ProceduresDefNoReturn, procedures_def),
        (BlockKind::VariablesGet, c_family::variables_get),
        (BlockKind::VariablesSet, c_family::variables_set),
    ]
}

const SUM_CALLBACK: &str = "function(x, y) {return x + y;}";

const MEAN_BODY: &str = "  if (!myList.length) return 0;
  return myList.reduce(function(x, y) {return x + y;}, 0) / myList.length;
}";

const MEDIAN_BODY: &str = "  var localList = myList.filter(function (x) {return typeof x == 'number';});
  if (!localList.length) return 0;
  localList.sort(function(a, b) {return a - b;});
  if (localList.length % 2 == 0) {
    return (localList[localList.length / 2 - 1] + localList[localList.length / 2]) / 2;
  } else {
    return localList[(localList.length - 1) / 2];
  }
}";

const MODES_BODY: &str = "  var modes = [];
  var counts = [];
  var maxCount = 0;
  for (var i = 0; i < values.length; i++) {
    var value = values[i];
    var found = false;
    var thisCount;
    for (var j = 0; j < counts.length; j++) {
      if (counts[j][0] === value) {
        thisCount = ++counts[j][1];
        found = true;
        break;
      }
    }
    if (!found) {
      counts.push([value, 1]);
      thisCount = 1;
    }
    maxCount = Math.max(thisCount, maxCount);
  }
  for (var j = 0; j < counts.length; j++) {
    if (counts[j][1] == maxCount) {
      modes.push(counts[j][0]);
    }
  }
  return modes;
}";

const STANDARD_DEVIATION_BODY: &str = "  var numbers = myList.filter(function (x) {return typeof x == 'number';});
  var n = numbers.length;
  if (!n) return null;
  var mean = numbers.reduce(function(x, y) {return x + y;}) / n;
  var variance = 0;
  for (var j = 0; j < n; j++) {
    variance += Math.pow(numbers[j] - mean, 2);
  }
  variance = variance / n;
  return Math.sqrt(variance);
}";

const RANDOM_ITEM_BODY: &str = "  var x = Math.floor(Math.random() * list.length);
  return list[x];
}";

const TITLE_CASE_BODY: &str = "  return str.replace(/\\S+/g,
      function(txt) {return txt[0].toUpperCase() + txt.substring(1).toLowerCase();});
}";

fn helper(name: &str, params: &str, body: &str) -> Vec<String> {
    std::iter::once(format!("function {}({}) {{", name, params))
        .chain(body.lines().map(str::to_string))
        .collect()
}

fn math_number(_pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let value = parse_float(block.title_text(0).unwrap_or_default());
    Ok(format_number(value, Language::JavaScript))
}

fn math_arithmetic(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let op = ArithmeticOp::parse(block.value_label(1))?;
    let Some(symbol) = op.infix() else {
        let base = pass.value_or(block, 0, true, "0")?;
        let exponent = pass.value_or(block, 1, true, "0")?;
        return Ok(format!("Math.pow({}, {})", base, exponent));
    };
    let left = pass.value_or(block, 0, false, "0")?;
    let right = pass.value_or(block, 1, false, "0")?;
    Ok(parenthesize(
        format!("{} {} {}", left, symbol, right),
        drop_parens,
    ))
}

fn math_change(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let delta = pass.value_or(block, 0, false, "0")?;
    let var = pass
        .names
        .variable_name(block.title_text(1).unwrap_or_default());
    Ok(format!(
        "{var} = (typeof {var} == 'number' ? {var} : 0) + {};\n",
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
    let code = match op {
        SingleOp::Abs => format!("Math.abs({})", arg),
        SingleOp::Root => format!("Math.sqrt({})", arg),
        SingleOp::Ln => format!("Math.log({})", arg),
        SingleOp::Exp => format!("Math.exp({})", arg),
        SingleOp::Pow10 => format!("Math.pow(10, {})", arg),
        SingleOp::Round => format!("Math.round({})", arg),
        SingleOp::RoundUp => format!("Math.ceil({})", arg),
        SingleOp::RoundDown => format!("Math.floor({})", arg),
        SingleOp::Sin => format!("Math.sin({} / 180 * Math.PI)", arg),
        SingleOp::Cos => format!("Math.cos({} / 180 * Math.PI)", arg),
        SingleOp::Tan => format!("Math.tan({} / 180 * Math.PI)", arg),
        // `--3` is a decrement.
        SingleOp::Neg if arg.starts_with('-') => {
            return Ok(parenthesize(format!("-({})", arg), drop_parens))
        }
        SingleOp::Neg => return Ok(parenthesize(format!("-{}", arg), drop_parens)),
        SingleOp::Log10 => {
            return Ok(parenthesize(
                format!("Math.log({}) / Math.log(10)", arg),
                drop_parens,
            ))
        }
        SingleOp::Asin | SingleOp::Acos | SingleOp::Atan => {
            let func = match op {
                SingleOp::Asin => "asin",
                SingleOp::Acos => "acos",
                _ => "atan",
            };
            return Ok(parenthesize(
                format!("Math.{}({}) / Math.PI * 180", func, arg),
                drop_parens,
            ));
        }
    };
    Ok(code)
}

fn math_on_list(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let (key, params, body) = match ListOp::parse(block.title_text(0))? {
        ListOp::Sum => {
            let list = pass.value_or(block, 0, false, "[]")?;
            return Ok(format!("{}.reduce({}, 0)", list, SUM_CALLBACK));
        }
        ListOp::Min => {
            let list = pass.value_or(block, 0, true, "[]")?;
            return Ok(format!("Math.min.apply(null, {})", list));
        }
        ListOp::Max => {
            let list = pass.value_or(block, 0, true, "[]")?;
            return Ok(format!("Math.max.apply(null, {})", list));
        }
        ListOp::Average => ("math_mean", "myList", MEAN_BODY),
        ListOp::Median => ("math_median", "myList", MEDIAN_BODY),
        ListOp::Mode => ("math_modes", "values", MODES_BODY),
        ListOp::StdDev => ("math_standard_deviation", "myList", STANDARD_DEVIATION_BODY),
        ListOp::Random => ("math_random_item", "list", RANDOM_ITEM_BODY),
    };
    let list = pass.value_or(block, 0, true, "[]")?;
    let name = pass.provide_function(key, key, |name| helper(name, params, body));
    Ok(format!("{}({})", name, list))
}

fn math_modulo(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let left = pass.value_or(block, 0, false, "0")?;
    let right = pass.value_or(block, 1, false, "0")?;
    Ok(parenthesize(format!("{} % {}", left, right), drop_parens))
}

fn math_random_float(_pass: &mut CodegenPass, _block: &dyn BlockView, _drop_parens: bool) -> Code {
    Ok("Math.random()".to_string())
}

fn math_random_int(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let a = pass.value_or(block, 0, false, "0")?;
    let b = pass.value_or(block, 1, false, "0")?;
    let formula = |low: &str, high: &str| {
        format!(
            "Math.floor(Math.random() * ({} - {} + 1) + {})",
            high, low, low
        )
    };
    match (numeric_literal(&a), numeric_literal(&b)) {
        (Some(x), Some(y)) if x <= y => Ok(formula(&a, &b)),
        (Some(_), Some(_)) => Ok(formula(&b, &a)),
        _ => Ok(parenthesize(
            format!("{} < {} ? {} : {}", a, b, formula(&a, &b), formula(&b, &a)),
            drop_parens,
        )),
    }
}

fn text(_pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    Ok(quote_string(
        block.title_text(1).unwrap_or_default(),
        Language::JavaScript,
    ))
}

fn text_join(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    match block.item_count() {
        0 => Ok("''".to_string()),
        1 => Ok(format!("String({})", pass.value_or(block, 0, true, "''")?)),
        2 => {
            let first = pass.value_or(block, 0, true, "''")?;
            let second = pass.value_or(block, 1, true, "''")?;
            Ok(parenthesize(
                format!("String({}) + String({})", first, second),
                drop_parens,
            ))
        }
        count => {
            let mut parts = Vec::with_capacity(count);
            for slot in 0..count {
                parts.push(pass.value_or(block, slot, true, "''")?);
            }
            Ok(format!("[{}].join('')", parts.join(", ")))
        }
    }
}

fn text_length(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    Ok(format!("{}.length", pass.value_or(block, 0, false, "''")?))
}

fn text_is_empty(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let arg = pass.value_or(block, 0, false, "''")?;
    Ok(parenthesize(format!("!{}.length", arg), drop_parens))
}

fn text_end_string(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    match End::parse(BlockKind::TextEndString, block.value_label(0))? {
        End::First => {
            let count = pass.value_or(block, 0, true, "0")?;
            let source = pass.value_or(block, 1, false, "''")?;
            Ok(format!("{}.substring(0, {})", source, count))
        }
        End::Last => {
            let count = pass.value_or(block, 0, false, "0")?;
            let source = pass.value_or(block, 1, true, "''")?;
            let temp = pass.declare_temp("temp_text");
            Ok(format!(
                "[{temp} = {}, {temp}.substring({temp}.length - {})][1]",
                source, count
            ))
        }
    }
}

fn text_index_of(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let method = match End::parse(BlockKind::TextIndexOf, block.title_text(1))? {
        End::First => "indexOf",
        End::Last => "lastIndexOf",
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
    let index = match index.parse::<i64>() {
        Ok(n) if is_plain_integer(&index) => (n - 1).to_string(),
        _ => format!("{} - 1", index),
    };
    Ok(format!("{}[{}]", source, index))
}

fn text_change_case(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    match CaseOp::parse(block.value_label(0))? {
        CaseOp::Upper => Ok(format!(
            "{}.toUpperCase()",
            pass.value_or(block, 0, false, "''")?
        )),
        CaseOp::Lower => Ok(format!(
            "{}.toLowerCase()",
            pass.value_or(block, 0, false, "''")?
        )),
        CaseOp::Title => {
            let name = pass.provide_function("text_toTitleCase", "text_toTitleCase", |name| {
                helper(name, "str", TITLE_CASE_BODY)
            });
            let arg = pass.value_or(block, 0, true, "''")?;
            Ok(format!("{}({})", name, arg))
        }
    }
}

fn text_trim(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let op = TrimOp::parse(block.title_text(1))?;
    let arg = pass.value_or(block, 0, false, "''")?;
    Ok(match op {
        TrimOp::Left => format!("{}.replace(/^[\\s\\xa0]+/, '')", arg),
        TrimOp::Right => format!("{}.replace(/[\\s\\xa0]+$/, '')", arg),
        TrimOp::Both => format!("{}.trim()", arg),
    })
}

fn text_print(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    Ok(format!(
        "console.log({});\n",
        pass.value_or(block, 0, true, "''")?
    ))
}

fn controls_for_each(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    c_family::for_each(pass, block, "of")
}

fn procedures_def(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let name = pass
        .names
        .procedure_name(block.title_text(0).unwrap_or("procedure"));
    let body = c_family::procedure_body(pass, block)?;
    Ok(format!("function {}() {{\n{}}}\n", name, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Block;
    use crate::generator::{generate_program, GenerateOptions};

    fn gen(block: &Block, drop_parens: bool) -> (String, CodegenPass) {
        let mut pass = CodegenPass::new(Language::JavaScript).unwrap();
        let code = pass.block_to_code(block, drop_parens).unwrap();
        (code, pass)
    }

    fn arithmetic(op: &str, left: Block, right: Block) -> Block {
        Block::new("math_arithmetic")
            .with_label(1, op)
            .with_value(0, left)
            .with_value(1, right)
    }

    #[test]
    fn power_is_a_call() {
        let block = arithmetic(
            "POWER",
            arithmetic("ADD", Block::variable("a"), Block::number("1")),
            Block::number("2"),
        );
        assert_eq!(gen(&block, false).0, "Math.pow(a + 1, 2)");
    }

    #[test]
    fn infix_arithmetic_wraps_nested_operands() {
        let inner = arithmetic("MINUS", Block::number("5"), Block::number("2"));
        let block = arithmetic("DIVIDE", Block::variable("x"), inner);
        assert_eq!(gen(&block, false).0, "(x / (5 - 2))");
        assert_eq!(gen(&block, true).0, "x / (5 - 2)");
    }

    #[test]
    fn negating_a_negative_literal_avoids_decrement() {
        let block = Block::new("math_single")
            .with_label(0, "NEG")
            .with_value(0, Block::number("-3"));
        assert_eq!(gen(&block, true).0, "-(-3)");
        let plain = Block::new("math_single")
            .with_label(0, "NEG")
            .with_value(0, Block::variable("x"));
        assert_eq!(gen(&plain, false).0, "(-x)");
    }

    #[test]
    fn log10_divides_natural_logs() {
        let block = Block::new("math_single")
            .with_label(0, "LOG10")
            .with_value(0, Block::number("100"));
        assert_eq!(gen(&block, true).0, "Math.log(100) / Math.log(10)");
    }

    #[test]
    fn rounding_and_trig() {
        let up = Block::new("math_round")
            .with_label(0, "ROUNDUP")
            .with_value(0, Block::number("2.5"));
        assert_eq!(gen(&up, false).0, "Math.ceil(2.5)");
        let cos = Block::new("math_trig")
            .with_label(0, "COS")
            .with_value(0, Block::variable("deg"));
        assert_eq!(gen(&cos, false).0, "Math.cos(deg / 180 * Math.PI)");
    }

    #[test]
    fn sum_reduces_from_zero() {
        let block = Block::new("math_on_list")
            .with_title(0, "SUM")
            .with_value(0, Block::variable("xs"));
        assert_eq!(
            gen(&block, false).0,
            "xs.reduce(function(x, y) {return x + y;}, 0)"
        );
    }

    #[test]
    fn list_helpers_are_hoisted_under_distinct_names() {
        let mut pass = CodegenPass::new(Language::JavaScript).unwrap();
        pass.names.variable_name("math_random_item");
        let block = Block::new("math_on_list").with_title(0, "RANDOM");
        assert_eq!(
            pass.block_to_code(&block, false).unwrap(),
            "math_random_item2([])"
        );
        let helper = pass.definitions.get("math_random_item").unwrap();
        assert!(helper.source.starts_with("function math_random_item2(list) {\n"));
        assert!(helper.source.ends_with("\n}"));
    }

    #[test]
    fn empty_list_statistics() {
        let (_, pass) = gen(&Block::new("math_on_list").with_title(0, "AVERAGE"), false);
        assert!(pass
            .definitions
            .get("math_mean")
            .unwrap()
            .source
            .contains("if (!myList.length) return 0;"));
        let (_, pass) = gen(&Block::new("math_on_list").with_title(0, "STD_DEV"), false);
        assert!(pass
            .definitions
            .get("math_standard_deviation")
            .unwrap()
            .source
            .contains("if (!n) return null;"));
    }

    #[test]
    fn standard_deviation_skips_non_numbers() {
        let block = Block::new("math_on_list")
            .with_title(0, "STD_DEV")
            .with_value(0, Block::variable("xs"));
        let (code, pass) = gen(&block, false);
        assert_eq!(code, "math_standard_deviation(xs)");
        assert_eq!(
            pass.definitions.get("math_standard_deviation").unwrap().source,
            "function math_standard_deviation(myList) {
  var numbers = myList.filter(function (x) {return typeof x == 'number';});
  var n = numbers.length;
  if (!n) return null;
  var mean = numbers.reduce(function(x, y) {return x + y;}) / n;
  var variance = 0;
  for (var j = 0; j < n; j++) {
    variance += Math.pow(numbers[j] - mean, 2);
  }
  variance = variance / n;
  return Math.sqrt(variance);
}"
        );
    }

    #[test]
    fn random_int_literal_bounds() {
        let block = Block::new("math_random_int")
            .with_value(0, Block::number("1"))
            .with_value(1, Block::number("6"));
        assert_eq!(
            gen(&block, false).0,
            "Math.floor(Math.random() * (6 - 1 + 1) + 1)"
        );
    }

    #[test]
    fn random_int_dynamic_bounds_use_a_conditional() {
        let block = Block::new("math_random_int")
            .with_value(0, Block::variable("lo"))
            .with_value(1, Block::variable("hi"));
        assert_eq!(
            gen(&block, false).0,
            "(lo < hi ? Math.floor(Math.random() * (hi - lo + 1) + lo) : Math.floor(Math.random() * (lo - hi + 1) + hi))"
        );
    }

    #[test]
    fn join_by_arity() {
        let two = Block::new("text_join")
            .with_items(2)
            .with_value(0, Block::text("a"))
            .with_value(1, Block::variable("n"));
        assert_eq!(gen(&two, true).0, "String('a') + String(n)");
        let three = Block::new("text_join").with_items(3).with_value(1, Block::text("b"));
        assert_eq!(gen(&three, false).0, "['', 'b', ''].join('')");
    }

    #[test]
    fn last_characters_use_a_hoisted_temporary() {
        let block = Block::new("text_endString")
            .with_label(0, "LAST")
            .with_value(0, Block::number("2"))
            .with_value(1, Block::variable("s"));
        let out = generate_program(&[&Block::new("text_print").with_value(0, block)], GenerateOptions::default()).unwrap();
        assert_eq!(
            out,
            "var temp_text;\n\nvar s;\n\nconsole.log([temp_text = s, temp_text.substring(temp_text.length - 2)][1]);\n"
        );
    }

    #[test]
    fn first_characters_use_substring() {
        let block = Block::new("text_endString")
            .with_label(0, "FIRST")
            .with_value(0, Block::number("2"))
            .with_value(1, Block::text("hello"));
        assert_eq!(gen(&block, false).0, "'hello'.substring(0, 2)");
    }

    #[test]
    fn char_at_literal_index_is_adjusted_at_generation_time() {
        let block = Block::new("text_charAt")
            .with_value(0, Block::number("1"))
            .with_value(1, Block::variable("s"));
        assert_eq!(gen(&block, false).0, "s[0]");
        let zero = Block::new("text_charAt")
            .with_value(0, Block::number("0"))
            .with_value(1, Block::variable("s"));
        assert_eq!(gen(&zero, false).0, "s[-1]");
    }

    #[test]
    fn emptiness_and_index_of() {
        let empty = Block::new("text_isEmpty").with_value(0, Block::variable("s"));
        assert_eq!(gen(&empty, false).0, "(!s.length)");
        let index = Block::new("text_indexOf")
            .with_title(1, "FIRST")
            .with_value(0, Block::text("x"))
            .with_value(1, Block::variable("s"));
        assert_eq!(gen(&index, true).0, "s.indexOf('x') + 1");
    }

    #[test]
    fn case_and_trim() {
        let upper = Block::new("text_changeCase")
            .with_label(0, "UPPERCASE")
            .with_value(0, Block::variable("s"));
        assert_eq!(gen(&upper, false).0, "s.toUpperCase()");
        let title = Block::new("text_changeCase").with_label(0, "TITLECASE");
        let (code, pass) = gen(&title, false);
        assert_eq!(code, "text_toTitleCase('')");
        assert!(pass.definitions.contains("text_toTitleCase"));
        let right = Block::new("text_trim")
            .with_title(1, "RIGHT")
            .with_value(0, Block::variable("s"));
        assert_eq!(gen(&right, false).0, r"s.replace(/[\s\xa0]+$/, '')");
    }

    #[test]
    fn change_guards_non_numbers() {
        let block = Block::new("math_change")
            .with_title(1, "n")
            .with_value(0, Block::number("1"));
        assert_eq!(
            gen(&block, false).0,
            "n = (typeof n == 'number' ? n : 0) + 1;\n"
        );
    }

    #[test]
    fn for_each_iterates_values() {
        let block = Block::new("controls_forEach")
            .with_variable(0, "x")
            .with_value(0, Block::variable("xs"))
            .with_statement(0, Block::new("text_print").with_value(0, Block::variable("x")));
        let out = generate_program(&[&block], GenerateOptions::default()).unwrap();
        assert_eq!(out, "var x, xs;\n\nfor (x of xs) {\n  console.log(x);\n}\n");
    }

    #[test]
    fn reserved_words_are_renamed() {
        let block = Block::new("variables_set")
            .with_title(0, "new")
            .with_value(0, Block::number("1"));
        assert_eq!(gen(&block, false).0, "new2 = 1;\n");
    }
}
