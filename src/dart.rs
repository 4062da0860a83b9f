//! Dart 2.12+ templates.
//!
//! `dart:math` is imported under the `Math` prefix. Method forms such as
//! `x.abs()` bind tighter than unary minus, so non-atomic receivers are wrapped.

use crate::blocks::{BlockKind, BlockView};
use crate::c_family;
use crate::generator::{
    format_number, is_plain_integer, numeric_literal, parenthesize, parse_float, quote_string,
    static_regex, BlockHandler, CodegenError, CodegenPass, Language,
};
use crate::selectors::{ArithmeticOp, CaseOp, End, ListOp, SingleOp, TrimOp};
use regex::Regex;
use std::sync::OnceLock;

type Code = Result<String, CodegenError>;

pub const RESERVED_WORDS: &[&str] = &[
    "assert", "break", "case", "catch", "class", "const", "continue", "default", "do", "else",
    "enum", "extends", "false", "final", "finally", "for", "if", "in", "is", "new", "null",
    "rethrow", "return", "super", "switch", "this", "throw", "true", "try", "var", "void",
    "while", "with", "abstract", "as", "covariant", "deferred", "dynamic", "export", "external",
    "factory", "Function", "get", "implements", "import", "interface", "late", "library",
    "mixin", "operator", "part", "required", "set", "static", "typedef", "async", "await",
    "yield", "Math", "List", "String", "num", "int", "double", "bool", "print", "main",
];

const IMPORT_KEY: &str = "import_dart_math";
const IMPORT_SOURCE: &str = "import 'dart:math' as Math;";

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

const MEAN_BODY: &str = "  if (myList.isEmpty) return 0;
  return myList.fold<num>(0, (x, y) => x + y) / myList.length;
}";

const MEDIAN_BODY: &str = "  List localList = List.from(myList)..removeWhere((a) => a is! num);
  if (localList.isEmpty) return 0;
  localList.sort((a, b) => a.compareTo(b));
  int index = localList.length ~/ 2;
  if (localList.length % 2 == 1) {
    return localList[index];
  } else {
    return (localList[index - 1] + localList[index]) / 2;
  }
}";

const MODES_BODY: &str = "  List modes = [];
  List counts = [];
  int maxCount = 0;
  for (int i = 0; i < values.length; i++) {
    var value = values[i];
    bool found = false;
    int thisCount = 0;
    for (int j = 0; j < counts.length; j++) {
      if (counts[j][0] == value) {
        thisCount = ++counts[j][1];
        found = true;
        break;
      }
    }
    if (!found) {
      counts.add([value, 1]);
      thisCount = 1;
    }
    maxCount = Math.max(thisCount, maxCount);
  }
  for (int j = 0; j < counts.length; j++) {
    if (counts[j][1] == maxCount) {
      modes.add(counts[j][0]);
    }
  }
  return modes;
}";

const STANDARD_DEVIATION_BODY: &str = "  List numbers = List.from(myList)..removeWhere((a) => a is! num);
  if (numbers.isEmpty) return null;
  num n = numbers.length;
  num mean = numbers.fold<num>(0, (x, y) => x + y) / n;
  num variance = 0;
  for (int j = 0; j < n; j++) {
    variance += Math.pow(numbers[j] - mean, 2);
  }
  variance = variance / n;
  return Math.sqrt(variance);
}";

const RANDOM_ITEM_BODY: &str = "  int x = Math.Random().nextInt(myList.length);
  return myList[x];
}";

const TITLE_CASE_BODY: &str = "  RegExp exp = RegExp(r'\\S+');
  return str.replaceAllMapped(exp, (Match m) {
    String word = m.group(0)!;
    return word.substring(0, 1).toUpperCase() + word.substring(1).toLowerCase();
  });
}";

fn helper(signature: String, body: &str) -> Vec<String> {
    std::iter::once(signature)
        .chain(body.lines().map(str::to_string))
        .collect()
}

/// Wraps `code` unless it is an identifier, member path, number or plain string literal.
fn receiver(code: String) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    if static_regex(&RE, r"^(?:[\w.]+|'(?:[^'\\]|\\.)*')$").is_match(&code) {
        code
    } else {
        format!("({})", code)
    }
}

fn math_number(_pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let value = parse_float(block.title_text(0).unwrap_or_default());
    Ok(format_number(value, Language::Dart))
}

fn math_arithmetic(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let op = ArithmeticOp::parse(block.value_label(1))?;
    let Some(symbol) = op.infix() else {
        pass.provide_import(IMPORT_KEY, IMPORT_SOURCE);
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
    Ok(format!("{var} = ({var} is num ? {var} : 0) + {};\n", delta))
}

fn math_single(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let kind = block.kind().parse::<BlockKind>()?;
    let op = SingleOp::parse(kind, block.value_label(0))?;
    let wants_parens = matches!(
        op,
        SingleOp::Sin | SingleOp::Cos | SingleOp::Tan | SingleOp::Neg
    );
    let arg = pass.value_or(block, 0, !wants_parens, "0")?;
    match op {
        SingleOp::Abs => return Ok(format!("{}.abs()", receiver(arg))),
        SingleOp::Round => return Ok(format!("{}.round()", receiver(arg))),
        SingleOp::RoundUp => return Ok(format!("{}.ceil()", receiver(arg))),
        SingleOp::RoundDown => return Ok(format!("{}.floor()", receiver(arg))),
        SingleOp::Neg => {
            let operand = if arg.starts_with('-') {
                format!("({})", arg)
            } else {
                arg
            };
            return Ok(parenthesize(format!("-{}", operand), drop_parens));
        }
        _ => {}
    }
    pass.provide_import(IMPORT_KEY, IMPORT_SOURCE);
    let (code, infix) = match op {
        SingleOp::Root => (format!("Math.sqrt({})", arg), false),
        SingleOp::Ln => (format!("Math.log({})", arg), false),
        SingleOp::Log10 => (format!("Math.log({}) / Math.ln10", arg), true),
        SingleOp::Exp => (format!("Math.exp({})", arg), false),
        SingleOp::Pow10 => (format!("Math.pow(10, {})", arg), false),
        SingleOp::Sin => (format!("Math.sin({} / 180 * Math.pi)", arg), false),
        SingleOp::Cos => (format!("Math.cos({} / 180 * Math.pi)", arg), false),
        SingleOp::Tan => (format!("Math.tan({} / 180 * Math.pi)", arg), false),
        SingleOp::Asin => (format!("Math.asin({}) / Math.pi * 180", arg), true),
        SingleOp::Acos => (format!("Math.acos({}) / Math.pi * 180", arg), true),
        SingleOp::Atan => (format!("Math.atan({}) / Math.pi * 180", arg), true),
        SingleOp::Abs
        | SingleOp::Round
        | SingleOp::RoundUp
        | SingleOp::RoundDown
        | SingleOp::Neg => (arg, false),
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
    // (helper key, return type, parameter, body)
    let (key, returns, param, body) = match op {
        ListOp::Sum => return Ok(format!("{}.fold<num>(0, (x, y) => x + y)", receiver(list))),
        ListOp::Min | ListOp::Max => {
            pass.provide_import(IMPORT_KEY, IMPORT_SOURCE);
            let func = if op == ListOp::Min { "min" } else { "max" };
            return Ok(format!("{}.reduce(Math.{})", receiver(list), func));
        }
        ListOp::Average => ("math_mean", "num", "myList", MEAN_BODY),
        ListOp::Median => ("math_median", "num", "myList", MEDIAN_BODY),
        ListOp::Mode => ("math_modes", "List", "values", MODES_BODY),
        ListOp::StdDev => (
            "math_standard_deviation",
            "num?",
            "myList",
            STANDARD_DEVIATION_BODY,
        ),
        ListOp::Random => ("math_random_item", "dynamic", "myList", RANDOM_ITEM_BODY),
    };
    if matches!(op, ListOp::Mode | ListOp::StdDev | ListOp::Random) {
        pass.provide_import(IMPORT_KEY, IMPORT_SOURCE);
    }
    let name = pass.provide_function(key, key, |name| {
        helper(format!("{} {}(List {}) {{", returns, name, param), body)
    });
    Ok(format!("{}({})", name, list))
}

fn math_modulo(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    let left = pass.value_or(block, 0, false, "0")?;
    let right = pass.value_or(block, 1, false, "0")?;
    Ok(parenthesize(format!("{} % {}", left, right), drop_parens))
}

fn math_random_float(pass: &mut CodegenPass, _block: &dyn BlockView, _drop_parens: bool) -> Code {
    pass.provide_import(IMPORT_KEY, IMPORT_SOURCE);
    Ok("Math.Random().nextDouble()".to_string())
}

fn math_random_int(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    pass.provide_import(IMPORT_KEY, IMPORT_SOURCE);
    let a = pass.value_or(block, 0, false, "0")?;
    let b = pass.value_or(block, 1, false, "0")?;
    let formula = |low: &str, high: &str| {
        format!(
            "(Math.Random().nextDouble() * ({} - {} + 1) + {}).floor()",
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
        Language::Dart,
    ))
}

fn text_join(pass: &mut CodegenPass, block: &dyn BlockView, drop_parens: bool) -> Code {
    match block.item_count() {
        0 => Ok("''".to_string()),
        1 => {
            let item = pass.value_or(block, 0, true, "''")?;
            Ok(format!("{}.toString()", receiver(item)))
        }
        2 => {
            let first = pass.value_or(block, 0, true, "''")?;
            let second = pass.value_or(block, 1, true, "''")?;
            Ok(parenthesize(
                format!(
                    "{}.toString() + {}.toString()",
                    receiver(first),
                    receiver(second)
                ),
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
    let arg = pass.value_or(block, 0, true, "''")?;
    Ok(format!("{}.length", receiver(arg)))
}

fn text_is_empty(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let arg = pass.value_or(block, 0, true, "''")?;
    Ok(format!("{}.isEmpty", receiver(arg)))
}

fn text_end_string(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    match End::parse(BlockKind::TextEndString, block.value_label(0))? {
        End::First => {
            let count = pass.value_or(block, 0, true, "0")?;
            let source = pass.value_or(block, 1, true, "''")?;
            Ok(format!("{}.substring(0, {})", receiver(source), count))
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
    let haystack = pass.value_or(block, 1, true, "''")?;
    Ok(parenthesize(
        format!("{}.{}({}) + 1", receiver(haystack), method, needle),
        drop_parens,
    ))
}

fn text_char_at(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let index = pass.value_or(block, 0, false, "1")?;
    let source = pass.value_or(block, 1, true, "[]")?;
    let index = match index.parse::<i64>() {
        Ok(n) if is_plain_integer(&index) => (n - 1).to_string(),
        _ => format!("{} - 1", index),
    };
    Ok(format!("{}[{}]", receiver(source), index))
}

fn text_change_case(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let op = CaseOp::parse(block.value_label(0))?;
    let arg = pass.value_or(block, 0, true, "''")?;
    match op {
        CaseOp::Upper => Ok(format!("{}.toUpperCase()", receiver(arg))),
        CaseOp::Lower => Ok(format!("{}.toLowerCase()", receiver(arg))),
        CaseOp::Title => {
            let name = pass.provide_function("text_toTitleCase", "text_toTitleCase", |name| {
                helper(format!("String {}(String str) {{", name), TITLE_CASE_BODY)
            });
            Ok(format!("{}({})", name, arg))
        }
    }
}

fn text_trim(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let method = match TrimOp::parse(block.title_text(1))? {
        TrimOp::Left => "trimLeft",
        TrimOp::Right => "trimRight",
        TrimOp::Both => "trim",
    };
    let arg = pass.value_or(block, 0, true, "''")?;
    Ok(format!("{}.{}()", receiver(arg), method))
}

fn text_print(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    Ok(format!("print({});\n", pass.value_or(block, 0, true, "''")?))
}

fn controls_for_each(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    c_family::for_each(pass, block, "in")
}

/// Procedures become top-level functions next to the helpers; `main()` only holds statements.
fn procedures_def(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let name = pass
        .names
        .procedure_name(block.title_text(0).unwrap_or("procedure"));
    let body = c_family::procedure_body(pass, block)?;
    let source = format!("dynamic {}() {{\n{}}}", name, body);
    pass.definitions
        .get_or_insert_with(&format!("procedure_{}", name), || (Some(name), source));
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Block;
    use crate::generator::{generate_program, GenerateOptions};

    fn gen(block: &Block, drop_parens: bool) -> (String, CodegenPass) {
        let mut pass = CodegenPass::new(Language::Dart).unwrap();
        let code = pass.block_to_code(block, drop_parens).unwrap();
        (code, pass)
    }

    fn single(op: &str, arg: Block) -> Block {
        Block::new("math_single").with_label(0, op).with_value(0, arg)
    }

    fn program(block: &Block) -> String {
        generate_program(
            &[block],
            GenerateOptions {
                language: Language::Dart,
            },
        )
        .unwrap()
    }

    #[test]
    fn method_forms_guard_negative_receivers() {
        assert_eq!(gen(&single("ABS", Block::number("-4")), false).0, "(-4).abs()");
        assert_eq!(gen(&single("ABS", Block::variable("x")), false).0, "x.abs()");
        let sum = Block::new("math_arithmetic")
            .with_label(1, "ADD")
            .with_value(0, Block::variable("a"))
            .with_value(1, Block::number("0.5"));
        assert_eq!(
            gen(&Block::new("math_round").with_label(0, "ROUND").with_value(0, sum), false).0,
            "(a + 0.5).round()"
        );
    }

    #[test]
    fn method_forms_need_no_import() {
        let (_, pass) = gen(&single("ROUNDDOWN", Block::number("2.7")), false);
        assert!(pass.definitions.is_empty());
        let (code, pass) = gen(&single("ROOT", Block::number("2")), false);
        assert_eq!(code, "Math.sqrt(2)");
        assert!(pass.definitions.contains("import_dart_math"));
    }

    #[test]
    fn negation_and_logarithms() {
        assert_eq!(gen(&single("NEG", Block::number("-3")), true).0, "-(-3)");
        assert_eq!(
            gen(&single("LOG10", Block::variable("x")), false).0,
            "(Math.log(x) / Math.ln10)"
        );
    }

    #[test]
    fn trig_uses_lowercase_pi() {
        let block = Block::new("math_trig")
            .with_label(0, "TAN")
            .with_value(0, Block::number("45"));
        assert_eq!(gen(&block, false).0, "Math.tan(45 / 180 * Math.pi)");
    }

    #[test]
    fn random_int_dynamic_bounds() {
        let block = Block::new("math_random_int")
            .with_value(0, Block::number("1"))
            .with_value(1, Block::variable("n"));
        assert_eq!(
            gen(&block, true).0,
            "1 < n ? (Math.Random().nextDouble() * (n - 1 + 1) + 1).floor() : (Math.Random().nextDouble() * (1 - n + 1) + n).floor()"
        );
    }

    #[test]
    fn statistics_helpers() {
        let block = Block::new("math_on_list")
            .with_title(0, "STD_DEV")
            .with_value(0, Block::variable("xs"));
        let (code, pass) = gen(&block, false);
        assert_eq!(code, "math_standard_deviation(xs)");
        let keys = pass.definitions.iter().map(|d| d.key.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["import_dart_math", "math_standard_deviation"]);
        let helper = &pass.definitions.get("math_standard_deviation").unwrap().source;
        assert!(helper.starts_with("num? math_standard_deviation(List myList) {\n"));
        assert!(helper.contains("if (numbers.isEmpty) return null;"));
    }

    #[test]
    fn list_reductions() {
        let sum = Block::new("math_on_list")
            .with_title(0, "SUM")
            .with_value(0, Block::variable("xs"));
        assert_eq!(gen(&sum, false).0, "xs.fold<num>(0, (x, y) => x + y)");
        let max = Block::new("math_on_list").with_title(0, "MAX");
        assert_eq!(gen(&max, false).0, "([]).reduce(Math.max)");
        let mean = Block::new("math_on_list").with_title(0, "AVERAGE");
        let (code, pass) = gen(&mean, false);
        assert_eq!(code, "math_mean([])");
        assert!(!pass.definitions.contains("import_dart_math"));
    }

    #[test]
    fn join_uses_to_string() {
        let one = Block::new("text_join").with_items(1).with_value(0, Block::text("a"));
        assert_eq!(gen(&one, false).0, "'a'.toString()");
        let two = Block::new("text_join")
            .with_items(2)
            .with_value(0, Block::number("-1"))
            .with_value(1, Block::variable("b"));
        assert_eq!(gen(&two, false).0, "((-1).toString() + b.toString())");
    }

    #[test]
    fn text_properties() {
        assert_eq!(gen(&Block::new("text_isEmpty"), false).0, "''.isEmpty");
        let length = Block::new("text_length").with_value(0, Block::text("it's"));
        assert_eq!(gen(&length, false).0, r"'it\'s'.length");
        let trim = Block::new("text_trim")
            .with_title(1, "BOTH")
            .with_value(0, Block::variable("s"));
        assert_eq!(gen(&trim, false).0, "s.trim()");
    }

    #[test]
    fn interpolation_is_escaped() {
        assert_eq!(gen(&Block::text("$name"), false).0, r"'\$name'");
    }

    #[test]
    fn last_characters_program() {
        let block = Block::new("text_endString")
            .with_label(0, "LAST")
            .with_value(0, Block::number("3"))
            .with_value(1, Block::text("hello"));
        assert_eq!(
            program(&Block::new("text_print").with_value(0, block)),
            "var temp_text;\n\nmain() {\n  print([temp_text = 'hello', temp_text.substring(temp_text.length - 3)][1]);\n}\n"
        );
    }

    #[test]
    fn title_case_helper() {
        let block = Block::new("text_changeCase")
            .with_label(0, "TITLECASE")
            .with_value(0, Block::variable("s"));
        let (code, pass) = gen(&block, false);
        assert_eq!(code, "text_toTitleCase(s)");
        let helper = &pass.definitions.get("text_toTitleCase").unwrap().source;
        assert!(helper.starts_with("String text_toTitleCase(String str) {"));
        assert!(helper.contains("replaceAllMapped"));
    }

    #[test]
    fn for_each_uses_in() {
        let block = Block::new("controls_forEach")
            .with_variable(0, "x")
            .with_value(0, Block::variable("xs"));
        assert_eq!(
            program(&block),
            "var x, xs;\n\nmain() {\n  for (x in xs) {\n    ;\n  }\n}\n"
        );
    }

    #[test]
    fn power_imports_math() {
        let block = Block::new("math_arithmetic")
            .with_label(1, "POWER")
            .with_value(0, Block::number("2"))
            .with_value(1, Block::number("8"));
        assert_eq!(
            program(&Block::new("text_print").with_value(0, block)),
            "import 'dart:math' as Math;\n\nmain() {\n  print(Math.pow(2, 8));\n}\n"
        );
    }

    #[test]
    fn change_guards_non_numbers() {
        let block = Block::new("math_change").with_title(1, "n");
        assert_eq!(gen(&block, false).0, "n = (n is num ? n : 0) + 0;\n");
    }

    #[test]
    fn median_sorts_with_compare_to() {
        let block = Block::new("math_on_list")
            .with_title(0, "MEDIAN")
            .with_value(0, Block::variable("xs"));
        let (code, pass) = gen(&block, false);
        assert_eq!(code, "math_median(xs)");
        assert_eq!(
            pass.definitions.get("math_median").unwrap().source,
            "num math_median(List myList) {
  List localList = List.from(myList)..removeWhere((a) => a is! num);
  if (localList.isEmpty) return 0;
  localList.sort((a, b) => a.compareTo(b));
  int index = localList.length ~/ 2;
  if (localList.length % 2 == 1) {
    return localList[index];
  } else {
    return (localList[index - 1] + localList[index]) / 2;
  }
}"
        );
    }

    #[test]
    fn mean_folds_as_num() {
        let block = Block::new("math_on_list").with_title(0, "AVERAGE");
        let (_, pass) = gen(&block, false);
        assert_eq!(
            pass.definitions.get("math_mean").unwrap().source,
            "num math_mean(List myList) {
  if (myList.isEmpty) return 0;
  return myList.fold<num>(0, (x, y) => x + y) / myList.length;
}"
        );
    }

    #[test]
    fn procedures_are_top_level_functions() {
        let def = Block::new("procedures_defreturn")
            .with_title(0, "answer")
            .with_value(0, Block::number("42"));
        let call = Block::new("text_print").with_value(0, Block::text("hi"));
        let out = generate_program(
            &[&def, &call],
            GenerateOptions {
                language: Language::Dart,
            },
        )
        .unwrap();
        assert_eq!(
            out,
            "dynamic answer() {\n  return 42;\n}\n\nmain() {\n  print('hi');\n}\n"
        );
    }

    #[test]
    fn empty_program_still_has_main() {
        let out = generate_program(
            &[],
            GenerateOptions {
                language: Language::Dart,
            },
        )
        .unwrap();
        assert_eq!(out, "main() {\n}\n");
    }
}
