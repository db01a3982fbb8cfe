// Rendezvous contract reader
// Pest-based reader producing symbolic expressions for Clarity contracts

use crate::ast::*;
use crate::error::*;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

mod literals;
mod traits;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct ClarityParser;

/// Expression before `<alias>` trait references are bound to their definitions
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PreExpressionType {
    Atom(String),
    Literal(Literal),
    List(Vec<PreExpression>),
    Field(TraitIdentifier),
    TraitReference(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PreExpression {
    pub kind: PreExpressionType,
    pub span: Span,
}

impl PreExpression {
    fn new(kind: PreExpressionType, span: Span) -> Self {
        Self { kind, span }
    }

    pub(crate) fn match_atom(&self) -> Option<&str> {
        match &self.kind {
            PreExpressionType::Atom(name) => Some(name),
            _ => None,
        }
    }
}

impl ClarityParser {
    /// Read a whole contract and bind every trait reference it uses
    pub fn parse_contract(
        input: &str,
        contract_identifier: &QualifiedContractIdentifier,
    ) -> ParseResult<ContractAst> {
        let pre_expressions = Self::parse_pre_expressions(input, &contract_identifier.issuer)?;
        let expressions =
            traits::resolve_trait_references(input, contract_identifier, pre_expressions)?;

        Ok(ContractAst::new(contract_identifier.clone(), expressions))
    }

    pub(crate) fn parse_pre_expressions(
        input: &str,
        issuer: &str,
    ) -> ParseResult<Vec<PreExpression>> {
        let mut pairs = Self::parse(Rule::contract, input)
            .map_err(|e| ParseError::from_pest_error(e, input.to_string()))?;

        let Some(contract) = pairs.next() else {
            return Ok(Vec::new());
        };

        contract
            .into_inner()
            .filter(|pair| pair.as_rule() != Rule::EOI)
            .map(|pair| Self::parse_expression(pair, issuer))
            .collect()
    }

    fn parse_expression(pair: Pair<Rule>, issuer: &str) -> ParseResult<PreExpression> {
        let span = Self::extract_span(&pair);

        let kind = match pair.as_rule() {
            Rule::list => PreExpressionType::List(
                pair.into_inner()
                    .map(|inner| Self::parse_expression(inner, issuer))
                    .collect::<ParseResult<_>>()?,
            ),
            Rule::tuple => return Self::parse_tuple(pair, issuer),
            Rule::trait_reference => {
                let alias = pair.as_str().trim_start_matches('<').trim_end_matches('>');
                PreExpressionType::TraitReference(alias.to_string())
            }
            Rule::atom => PreExpressionType::Atom(pair.as_str().to_string()),
            Rule::principal => Self::parse_principal(pair, issuer),
            Rule::buffer
            | Rule::uint
            | Rule::int
            | Rule::utf8_string
            | Rule::ascii_string => PreExpressionType::Literal(Self::parse_literal(pair)?),
            found => {
                return Err(ParseError::UnexpectedRule {
                    expected: "expression".to_string(),
                    found,
                    span,
                })
            }
        };

        Ok(PreExpression::new(kind, span))
    }

    /// `{ a: x, b: y }` reads as `(tuple (a x) (b y))`
    fn parse_tuple(pair: Pair<Rule>, issuer: &str) -> ParseResult<PreExpression> {
        let span = Self::extract_span(&pair);
        let mut items = vec![PreExpression::new(
            PreExpressionType::Atom("tuple".to_string()),
            span,
        )];

        for entry in pair.into_inner() {
            let entry_span = Self::extract_span(&entry);
            let mut parts = entry.into_inner();
            let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
                return Err(ParseError::UnexpectedRule {
                    expected: "tuple_entry".to_string(),
                    found: Rule::tuple,
                    span: entry_span,
                });
            };

            let key = PreExpression::new(
                PreExpressionType::Atom(key.as_str().to_string()),
                Self::extract_span(&key),
            );
            let value = Self::parse_expression(value, issuer)?;
            items.push(PreExpression::new(
                PreExpressionType::List(vec![key, value]),
                entry_span,
            ));
        }

        Ok(PreExpression::new(PreExpressionType::List(items), span))
    }

    fn parse_principal(pair: Pair<Rule>, issuer: &str) -> PreExpressionType {
        let mut explicit_issuer = None;
        let mut contract_name = None;
        let mut trait_name = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::issuer => explicit_issuer = Some(inner.as_str().trim_start_matches('\'')),
                Rule::contract_path => {
                    for part in inner.into_inner() {
                        match part.as_rule() {
                            Rule::contract_name => contract_name = Some(part.as_str()),
                            Rule::trait_name => trait_name = Some(part.as_str()),
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        let issuer = explicit_issuer.unwrap_or(issuer);
        match (contract_name, trait_name) {
            (None, _) => {
                PreExpressionType::Literal(Literal::StandardPrincipal(issuer.to_string()))
            }
            (Some(contract), None) => PreExpressionType::Literal(Literal::ContractPrincipal(
                QualifiedContractIdentifier::new(issuer, contract),
            )),
            (Some(contract), Some(name)) => PreExpressionType::Field(TraitIdentifier::new(
                QualifiedContractIdentifier::new(issuer, contract),
                name,
            )),
        }
    }

    pub(super) fn extract_span(pair: &Pair<Rule>) -> Span {
        let span = pair.as_span();
        Span::with_line_col(
            span.start(),
            span.end(),
            span.start_pos().line_col(),
            span.end_pos().line_col(),
        )
    }
}
