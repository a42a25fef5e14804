use winnow::ascii::multispace0;
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::take_while;

use super::expr::{CompareOp, FilterExpr, FilterField};
use crate::literal::grammar::quoted;

// -- Whitespace & keywords --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    multispace0.void().parse_next(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.' || c == ':'
}

/// A case-insensitive keyword that is not the prefix of a longer word.
fn keyword<'i>(kw: &'static str) -> impl FnMut(&mut &'i str) -> ModalResult<&'i str> {
    move |input: &mut &'i str| {
        take_while(1.., is_ident_char)
            .verify(|word: &str| word.eq_ignore_ascii_case(kw))
            .parse_next(input)
    }
}

// -- Atoms ------------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_alphabetic() || c == '_'),
        take_while(0.., is_ident_char),
    )
        .take()
        .parse_next(input)
}

fn bare_word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| !c.is_whitespace() && c != '(' && c != ')').parse_next(input)
}

fn value(input: &mut &str) -> ModalResult<String> {
    ws.parse_next(input)?;
    alt((quoted, bare_word.map(str::to_owned)))
        .context(StrContext::Expected(StrContextValue::Description("value")))
        .parse_next(input)
}

fn tag(input: &mut &str) -> ModalResult<FilterExpr> {
    preceded('#', cut_err(ident))
        .map(|t: &str| FilterExpr::Tag(t.to_owned()))
        .parse_next(input)
}

fn link(input: &mut &str) -> ModalResult<FilterExpr> {
    preceded('^', cut_err(ident))
        .map(|l: &str| FilterExpr::Link(l.to_owned()))
        .parse_next(input)
}

fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    ws.parse_next(input)?;
    alt((
        "==".value(CompareOp::Eq),
        "!=".value(CompareOp::Neq),
        "~".value(CompareOp::Match),
        ">=".value(CompareOp::Gte),
        ">".value(CompareOp::Gt),
        "<=".value(CompareOp::Lte),
        "<".value(CompareOp::Lt),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "comparison operator",
    )))
    .parse_next(input)
}

fn comparison(input: &mut &str) -> ModalResult<FilterExpr> {
    let name = ident.parse_next(input)?;
    let op = cut_err(compare_op).parse_next(input)?;
    let value = cut_err(value).parse_next(input)?;
    Ok(FilterExpr::Compare {
        field: FilterField::from_name(name),
        op,
        value,
    })
}

// -- Expressions (precedence: OR < AND < NOT < primary) ---------------------

fn primary(input: &mut &str) -> ModalResult<FilterExpr> {
    ws.parse_next(input)?;
    alt((
        delimited('(', expr, (ws, cut_err(')'))),
        tag,
        link,
        quoted.map(FilterExpr::Text),
        comparison,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "expression",
    )))
    .parse_next(input)
}

fn unary(input: &mut &str) -> ModalResult<FilterExpr> {
    ws.parse_next(input)?;
    if opt(keyword("not")).parse_next(input)?.is_some() {
        let inner = cut_err(unary).parse_next(input)?;
        Ok(FilterExpr::Not(Box::new(inner)))
    } else {
        primary(input)
    }
}

fn and_expr(input: &mut &str) -> ModalResult<FilterExpr> {
    let first = unary(input)?;
    let rest: Vec<FilterExpr> =
        repeat(0.., preceded((ws, keyword("and")), cut_err(unary))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| FilterExpr::And(Box::new(acc), Box::new(r))))
}

fn or_expr(input: &mut &str) -> ModalResult<FilterExpr> {
    let first = and_expr(input)?;
    let rest: Vec<FilterExpr> =
        repeat(0.., preceded((ws, keyword("or")), cut_err(and_expr))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| FilterExpr::Or(Box::new(acc), Box::new(r))))
}

fn expr(input: &mut &str) -> ModalResult<FilterExpr> {
    ws.parse_next(input)?;
    or_expr(input)
}

// -- Top-level parser -------------------------------------------------------

pub(crate) fn parse_filter(input: &mut &str) -> ModalResult<FilterExpr> {
    let e = expr(input)?;
    ws.parse_next(input)?;
    Ok(e)
}
