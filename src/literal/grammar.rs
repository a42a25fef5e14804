use std::str::FromStr;

use rust_decimal::Decimal;
use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, cut_err, opt, separated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::any;

use crate::MetaValue;

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    multispace0.void().parse_next(input)
}

// -- Scalars ----------------------------------------------------------------

/// A single- or double-quoted string with backslash escapes.
pub(crate) fn quoted(input: &mut &str) -> ModalResult<String> {
    let quote = alt(('"', '\'')).parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            c if c == quote => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\'' => s.push('\''),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn number(input: &mut &str) -> ModalResult<Decimal> {
    (opt('-'), digit1, opt(('.', digit1)))
        .take()
        .try_map(Decimal::from_str)
        .parse_next(input)
}

fn value(input: &mut &str) -> ModalResult<MetaValue> {
    ws.parse_next(input)?;
    alt((
        quoted.map(MetaValue::String),
        "True".value(MetaValue::Bool(true)),
        "False".value(MetaValue::Bool(false)),
        "None".value(MetaValue::None),
        number.map(MetaValue::Number),
    ))
    .context(StrContext::Expected(StrContextValue::Description("value")))
    .parse_next(input)
}

// -- Mapping ----------------------------------------------------------------

fn entry(input: &mut &str) -> ModalResult<(String, MetaValue)> {
    ws.parse_next(input)?;
    let key = quoted
        .context(StrContext::Expected(StrContextValue::Description(
            "quoted key",
        )))
        .parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(':').parse_next(input)?;
    let val = cut_err(value).parse_next(input)?;
    Ok((key, val))
}

pub(crate) fn mapping(input: &mut &str) -> ModalResult<Vec<(String, MetaValue)>> {
    ws.parse_next(input)?;
    '{'.context(StrContext::Expected(StrContextValue::CharLiteral('{')))
        .parse_next(input)?;
    let entries: Vec<(String, MetaValue)> = separated(0.., entry, (ws, ',')).parse_next(input)?;
    opt((ws, ',')).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err('}')
        .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)?;
    ws.parse_next(input)?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use crate::literal::parse_mapping;
    use crate::MetaValue;

    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parse_empty_mapping() {
        let meta = parse_mapping("{}").unwrap();
        assert!(meta.is_empty());
        assert!(parse_mapping("  {  }  ").unwrap().is_empty());
    }

    #[test]
    fn parse_single_quoted_strings() {
        let meta = parse_mapping("{'invoice': 'F/2025/01'}").unwrap();
        assert_eq!(meta["invoice"], MetaValue::from("F/2025/01"));
    }

    #[test]
    fn parse_double_quoted_strings() {
        let meta = parse_mapping(r#"{"category": "office"}"#).unwrap();
        assert_eq!(meta["category"], MetaValue::from("office"));
    }

    #[test]
    fn parse_all_value_types() {
        let meta =
            parse_mapping("{'s': 'x', 'i': 42, 'n': -12.50, 't': True, 'f': False, 'z': None}")
                .unwrap();
        assert_eq!(meta["s"], MetaValue::from("x"));
        assert_eq!(meta["i"], MetaValue::Number(d("42")));
        assert_eq!(meta["n"], MetaValue::Number(d("-12.50")));
        assert_eq!(meta["t"], MetaValue::Bool(true));
        assert_eq!(meta["f"], MetaValue::Bool(false));
        assert_eq!(meta["z"], MetaValue::None);
    }

    #[test]
    fn parse_trailing_comma_and_newlines() {
        let input = "{\n    'rate': '0.08',\n    'input_account': 'Assets:Tax:VATInput',\n}";
        let meta = parse_mapping(input).unwrap();
        assert_eq!(meta.len(), 2);
        assert_eq!(meta["rate"], MetaValue::from("0.08"));
    }

    #[test]
    fn parse_preserves_declaration_order() {
        let meta = parse_mapping("{'b': 1, 'a': 2, 'c': 3}").unwrap();
        let keys: Vec<&str> = meta.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn parse_string_with_escapes() {
        let meta = parse_mapping(r"{'q': 'it\'s', 'p': 'a\\b'}").unwrap();
        assert_eq!(meta["q"], MetaValue::from("it's"));
        assert_eq!(meta["p"], MetaValue::from("a\\b"));
    }

    #[test]
    fn parse_string_containing_delimiters() {
        let meta = parse_mapping("{'k': 'a, b: {c}'}").unwrap();
        assert_eq!(meta["k"], MetaValue::from("a, b: {c}"));
    }

    #[test]
    fn unquoted_key_is_rejected() {
        assert!(parse_mapping("{key: 'v'}").is_err());
    }

    #[test]
    fn missing_colon_is_rejected() {
        assert!(parse_mapping("{'key' 'v'}").is_err());
    }

    #[test]
    fn unterminated_string_is_rejected() {
        assert!(parse_mapping("{'key': 'v}").is_err());
    }
}
