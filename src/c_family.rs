//! Statement templates shared by the brace-delimited targets (JavaScript and Dart).
//!
//! Both targets declare user variables once at the top of the program, so loops
//! and assignments here never repeat a declaration keyword.

use crate::blocks::BlockView;
use crate::generator::{is_bare_word, is_plain_integer, CodegenError, CodegenPass, INDENT};
use crate::selectors::{FlowOp, LoopMode};

type Code = Result<String, CodegenError>;

pub fn controls_if(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let falsy = pass.language().false_literal();
    let mut code = String::new();
    for n in 0..=block.elseif_count() {
        let condition = pass.value_or(block, n, true, falsy)?;
        let branch = pass.branch_or_noop(block, n)?;
        if n > 0 {
            code.push_str(" else ");
        }
        code.push_str(&format!("if ({}) {{\n{}}}", condition, branch));
    }
    if block.else_count() > 0 {
        let branch = pass.branch_or_noop(block, block.elseif_count() + 1)?;
        code.push_str(&format!(" else {{\n{}}}", branch));
    }
    code.push('\n');
    Ok(code)
}

pub fn controls_while_until(
    pass: &mut CodegenPass,
    block: &dyn BlockView,
    _drop_parens: bool,
) -> Code {
    let mode = LoopMode::parse(block.title_text(1))?;
    let falsy = pass.language().false_literal();
    let mut condition = pass.value_or(block, 0, true, falsy)?;
    let branch = pass.branch_or_noop(block, 0)?;
    if mode == LoopMode::Until {
        if !is_bare_word(&condition) {
            condition = format!("({})", condition);
        }
        condition = format!("!{}", condition);
    }
    Ok(format!("while ({}) {{\n{}}}\n", condition, branch))
}

pub fn controls_for(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let var = pass
        .names
        .variable_name(block.variable_input(0).unwrap_or("i"));
    let start = pass.value_or(block, 0, true, "0")?;
    let end = pass.value_or(block, 1, false, "0")?;
    // The loop test is exclusive, so the inclusive end moves up by one.
    let end = match end.parse::<u64>() {
        Ok(n) if is_plain_integer(&end) => (n + 1).to_string(),
        _ => format!("{} + 1", end),
    };
    let branch = pass.branch_or_noop(block, 0)?;
    Ok(format!(
        "for ({var} = {}; {var} < {}; {var}++) {{\n{}}}\n",
        start, end, branch
    ))
}

/// `for (x <keyword> list)`: `of` in JavaScript, `in` in Dart.
pub fn for_each(pass: &mut CodegenPass, block: &dyn BlockView, keyword: &str) -> Code {
    let var = pass
        .names
        .variable_name(block.variable_input(0).unwrap_or("item"));
    let list = pass.value_or(block, 0, true, "[]")?;
    let branch = pass.branch_or_noop(block, 0)?;
    Ok(format!("for ({} {} {}) {{\n{}}}\n", var, keyword, list, branch))
}

pub fn controls_flow_statements(
    _pass: &mut CodegenPass,
    block: &dyn BlockView,
    _drop_parens: bool,
) -> Code {
    Ok(format!("{};\n", FlowOp::parse(block.title_text(0))?.keyword()))
}

/// Procedure body with the optional trailing return, falling back to the no-op placeholder.
pub fn procedure_body(pass: &mut CodegenPass, block: &dyn BlockView) -> Code {
    let branch = pass.statement_to_code(block, 0)?;
    let result = pass.value_to_code(block, 0, true)?;
    let body = match (branch, result) {
        (branch, Some(result)) => format!(
            "{}{}return {};\n",
            branch.unwrap_or_default(),
            INDENT,
            result
        ),
        (Some(branch), None) => branch,
        (None, None) => format!("{}{}\n", INDENT, pass.language().noop_statement()),
    };
    Ok(body)
}

pub fn variables_get(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    Ok(pass
        .names
        .variable_name(block.title_text(0).unwrap_or_default()))
}

pub fn variables_set(pass: &mut CodegenPass, block: &dyn BlockView, _drop_parens: bool) -> Code {
    let value = pass.value_or(block, 0, true, "0")?;
    let var = pass
        .names
        .variable_name(block.title_text(0).unwrap_or_default());
    Ok(format!("{} = {};\n", var, value))
}
