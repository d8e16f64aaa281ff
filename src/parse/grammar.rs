use winnow::combinator::{alt, cut_err, delimited, repeat};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::{Connective, LogicExpr};

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

// -- Words ------------------------------------------------------------------

/// Any run of characters up to whitespace or a parenthesis.
fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| !c.is_whitespace() && c != '(' && c != ')').parse_next(input)
}

fn as_connective(word: &str) -> Option<Connective> {
    if word.eq_ignore_ascii_case("and") {
        Some(Connective::And)
    } else if word.eq_ignore_ascii_case("or") {
        Some(Connective::Or)
    } else {
        None
    }
}

fn connective(input: &mut &str) -> ModalResult<Connective> {
    ws.parse_next(input)?;
    word.verify_map(as_connective).parse_next(input)
}

fn rule_id(input: &mut &str) -> ModalResult<LogicExpr> {
    word.verify(|w: &str| as_connective(w).is_none())
        .map(LogicExpr::rule)
        .parse_next(input)
}

// -- Expressions (no precedence: strict left-to-right fold) -----------------

fn term(input: &mut &str) -> ModalResult<LogicExpr> {
    ws.parse_next(input)?;
    alt((delimited('(', cut_err(expr), (ws, cut_err(')'))), rule_id))
        .context(StrContext::Expected(StrContextValue::Description("rule id")))
        .parse_next(input)
}

fn expr(input: &mut &str) -> ModalResult<LogicExpr> {
    let first = term(input)?;
    let rest: Vec<(Connective, LogicExpr)> =
        repeat(0.., (connective, cut_err(term))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, (conn, next)| acc.then(conn, next)))
}

// -- Top-level parser -------------------------------------------------------

pub fn logic(input: &mut &str) -> ModalResult<LogicExpr> {
    let parsed = expr(input)?;
    ws.parse_next(input)?;
    Ok(parsed)
}
