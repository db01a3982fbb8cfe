// Rendezvous Syntax Error Handling
// Contract reader errors with miette integration

use crate::ast::Span;
use crate::parser::Rule;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("Parse error")]
    #[diagnostic(
        code(rendezvous::parse::pest_error),
        help("Check the syntax near the highlighted location")
    )]
    PestError {
        #[source_code]
        src: String,
        #[label("error occurred here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Invalid integer literal")]
    #[diagnostic(
        code(rendezvous::parse::invalid_integer),
        help("Integers must fit in 128 bits; unsigned integers are written u123")
    )]
    InvalidInteger {
        #[source_code]
        src: String,
        #[label("invalid integer")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid buffer literal")]
    #[diagnostic(
        code(rendezvous::parse::invalid_buffer),
        help("Buffer literals are written 0x followed by an even number of hex digits")
    )]
    InvalidBuffer {
        #[source_code]
        src: String,
        #[label("invalid buffer")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid string escape sequence")]
    #[diagnostic(
        code(rendezvous::parse::invalid_string_escape),
        help("Valid escape sequences: \\n, \\t, \\r, \\\\, \\\"")
    )]
    InvalidStringEscape {
        #[source_code]
        src: String,
        #[label("invalid escape sequence")]
        span: SourceSpan,
        found: String,
    },

    #[error("Use of undeclared trait <{alias}>")]
    #[diagnostic(
        code(rendezvous::parse::undeclared_trait),
        help("Declare the trait with define-trait or import it with use-trait")
    )]
    UndeclaredTrait {
        #[source_code]
        src: String,
        #[label("unknown trait alias")]
        span: SourceSpan,
        alias: String,
    },

    #[error("Malformed {form} declaration")]
    #[diagnostic(
        code(rendezvous::parse::malformed_trait_declaration),
        help("Expected (use-trait alias .contract.trait) or (define-trait name (...))")
    )]
    MalformedTraitDeclaration {
        #[source_code]
        src: String,
        #[label("malformed declaration")]
        span: SourceSpan,
        form: String,
    },

    #[error("Unexpected grammar rule")]
    #[diagnostic(
        code(rendezvous::parse::unexpected_rule),
        help("Expected rule: {expected}")
    )]
    UnexpectedRule {
        expected: String,
        found: Rule,
        span: Span,
    },
}

impl ParseError {
    /// Create a parse error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, src: String) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 1),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };

        let message = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
                let expected: Vec<&str> = positives.iter().map(rule_description).collect();
                format!("{}\nexpected {}", error, expected.join(" or "))
            }
            _ => error.to_string(),
        };

        ParseError::PestError { src, span, message }
    }

    pub fn invalid_integer(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidInteger { src, span, found }
    }

    pub fn invalid_buffer(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidBuffer { src, span, found }
    }

    pub fn invalid_string_escape(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidStringEscape { src, span, found }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Convert a parser rule to a user-friendly description
fn rule_description(rule: &Rule) -> &'static str {
    match rule {
        Rule::list => "a list like (f a b)",
        Rule::tuple | Rule::tuple_entry => "a tuple like { key: value }",
        Rule::trait_reference | Rule::trait_alias => "a trait reference like <ft-trait>",
        Rule::buffer => "a buffer like 0x00ff",
        Rule::uint => "an unsigned integer like u10",
        Rule::int => "an integer like 10",
        Rule::utf8_string | Rule::ascii_string | Rule::string_content => "a string",
        Rule::principal | Rule::issuer => "a principal like 'ST1…",
        Rule::contract_path | Rule::contract_name => "a contract name like .token",
        Rule::trait_name => "a trait name",
        Rule::atom | Rule::identifier => "a name",
        Rule::EOI => "end of input",
        _ => "an expression",
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.len())
    }
}

/// Errors from reading `ISSUER.name` contract identifiers
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Contract identifier `{0}` is missing the `.` between issuer and name")]
    #[diagnostic(code(rendezvous::identifier::missing_separator))]
    MissingSeparator(String),

    #[error("Contract identifier `{0}` has an empty issuer")]
    #[diagnostic(code(rendezvous::identifier::empty_issuer))]
    EmptyIssuer(String),

    #[error("Contract identifier `{0}` has an invalid contract name")]
    #[diagnostic(code(rendezvous::identifier::invalid_contract_name))]
    InvalidContractName(String),
}
