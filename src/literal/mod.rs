//! The mapping-literal mini language.
//!
//! Rule declarations and plugin configuration carry small dictionaries in
//! string form: `addMeta: "{'invoice': 'F/1', 'amount': 12.50}"`. Keys are
//! quoted strings; values are quoted strings, decimal numbers, `True`,
//! `False` or `None`. A trailing comma is allowed.

mod error;
pub(crate) mod grammar;

use indexmap::IndexMap;

pub use error::LiteralError;

use crate::Metadata;

/// Parse a mapping literal into metadata.
///
/// Duplicate keys keep their first position and take the last value.
///
/// # Errors
///
/// Returns [`LiteralError`] if the input is not a well-formed mapping.
pub fn parse_mapping(input: &str) -> Result<Metadata, LiteralError> {
    use winnow::Parser;
    grammar::mapping
        .parse(input)
        .map(|pairs| pairs.into_iter().collect())
        .map_err(|e| LiteralError::new(e.to_string()))
}

/// Parse a mapping literal whose keys and values must all be strings,
/// returning the pairs in declaration order.
///
/// # Errors
///
/// Returns [`LiteralError`] on a syntax error or a non-string value.
pub fn parse_string_pairs(input: &str) -> Result<Vec<(String, String)>, LiteralError> {
    let mapping = parse_mapping(input)?;
    let mut pairs: IndexMap<String, String> = IndexMap::with_capacity(mapping.len());
    for (key, value) in mapping {
        match value.as_str() {
            Some(s) => {
                pairs.insert(key, s.to_owned());
            }
            None => {
                return Err(LiteralError::new(format!(
                    "value for '{key}' is not a string: {value}"
                )));
            }
        }
    }
    Ok(pairs.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetaValue;

    #[test]
    fn duplicate_key_last_value_wins() {
        let meta = parse_mapping("{'a': '1', 'b': '2', 'a': '3'}").unwrap();
        let keys: Vec<&str> = meta.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(meta["a"], MetaValue::from("3"));
    }

    #[test]
    fn string_pairs_keep_order() {
        let pairs = parse_string_pairs("{'z': 'last', 'a': 'first'}").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("z".to_owned(), "last".to_owned()),
                ("a".to_owned(), "first".to_owned()),
            ]
        );
    }

    #[test]
    fn string_pairs_reject_numbers() {
        let err = parse_string_pairs("{'a': 1}").unwrap_err();
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_mapping("not a dict").is_err());
        assert!(parse_mapping("{'a': }").is_err());
        assert!(parse_mapping("{'a': 'b'").is_err());
        assert!(parse_mapping("{'a': 'b'} trailing").is_err());
    }
}
