// Literal parsing functions for the contract reader
// Handles integer, unsigned integer, buffer and string literals

use super::{ClarityParser, Rule};
use crate::ast::*;
use crate::error::*;
use pest::iterators::Pair;

impl ClarityParser {
    /// Parse a literal value from a Pest pair
    pub(super) fn parse_literal(pair: Pair<Rule>) -> ParseResult<Literal> {
        let src = pair.get_input().to_string();
        let span = Self::extract_span(&pair);
        let text = pair.as_str();

        match pair.as_rule() {
            Rule::int => text
                .parse::<i128>()
                .map(Literal::Int)
                .map_err(|_| ParseError::invalid_integer(src, span.into(), text.to_string())),
            Rule::uint => text[1..]
                .parse::<u128>()
                .map(Literal::UInt)
                .map_err(|_| ParseError::invalid_integer(src, span.into(), text.to_string())),
            Rule::buffer => decode_hex(&text[2..])
                .map(Literal::Buffer)
                .ok_or_else(|| ParseError::invalid_buffer(src, span.into(), text.to_string())),
            Rule::utf8_string => {
                let content = Self::string_content(pair);
                unescape(content)
                    .map(Literal::Utf8)
                    .map_err(|found| ParseError::invalid_string_escape(src, span.into(), found))
            }
            Rule::ascii_string => {
                let content = Self::string_content(pair);
                unescape(content)
                    .map(Literal::Ascii)
                    .map_err(|found| ParseError::invalid_string_escape(src, span.into(), found))
            }
            found => Err(ParseError::UnexpectedRule {
                expected: "literal".to_string(),
                found,
                span,
            }),
        }
    }

    fn string_content(pair: Pair<'_, Rule>) -> &str {
        pair.into_inner()
            .find(|inner| inner.as_rule() == Rule::string_content)
            .map(|inner| inner.as_str())
            .unwrap_or_default()
    }
}

fn decode_hex(digits: &str) -> Option<Vec<u8>> {
    if digits.len() % 2 != 0 {
        return None;
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
        .collect()
}

/// Resolve backslash escapes; the offending sequence is returned on failure
fn unescape(content: &str) -> Result<String, String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some(other) => return Err(format!("\\{other}")),
            None => return Err("\\".to_string()),
        }
    }

    Ok(result)
}
