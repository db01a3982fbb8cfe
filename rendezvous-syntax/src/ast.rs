// Rendezvous Syntax Tree Definitions
// Symbolic expressions for Clarity contracts with source spans

use crate::error::IdentifierError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source position information for syntax nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub start_line_col: Option<(usize, usize)>,
    pub end_line_col: Option<(usize, usize)>,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            start_line_col: None,
            end_line_col: None,
        }
    }

    pub fn with_line_col(
        start: usize,
        end: usize,
        start_line_col: (usize, usize),
        end_line_col: (usize, usize),
    ) -> Self {
        Self {
            start,
            end,
            start_line_col: Some(start_line_col),
            end_line_col: Some(end_line_col),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A deployed contract: the issuing principal and the contract name.
///
/// Written as `ISSUER.name` in source and in serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedContractIdentifier {
    pub issuer: String,
    pub name: String,
}

impl QualifiedContractIdentifier {
    pub fn new(issuer: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedContractIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.issuer, self.name)
    }
}

impl FromStr for QualifiedContractIdentifier {
    type Err = IdentifierError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (issuer, name) = text
            .split_once('.')
            .ok_or_else(|| IdentifierError::MissingSeparator(text.to_string()))?;

        if issuer.is_empty() {
            return Err(IdentifierError::EmptyIssuer(text.to_string()));
        }
        if name.is_empty() || name.contains('.') {
            return Err(IdentifierError::InvalidContractName(text.to_string()));
        }

        Ok(Self::new(issuer, name))
    }
}

impl TryFrom<String> for QualifiedContractIdentifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualifiedContractIdentifier> for String {
    fn from(value: QualifiedContractIdentifier) -> Self {
        value.to_string()
    }
}

/// A trait as named by the contract that defines it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraitIdentifier {
    pub name: String,
    pub contract_identifier: QualifiedContractIdentifier,
}

impl TraitIdentifier {
    pub fn new(contract_identifier: QualifiedContractIdentifier, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contract_identifier,
        }
    }
}

impl fmt::Display for TraitIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.contract_identifier, self.name)
    }
}

/// Where a trait referenced by a contract comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitDefinition {
    /// Declared with `define-trait` in the contract itself
    Defined(TraitIdentifier),
    /// Pulled in from another contract with `use-trait`
    Imported(TraitIdentifier),
}

impl TraitDefinition {
    pub fn identifier(&self) -> &TraitIdentifier {
        match self {
            TraitDefinition::Defined(id) | TraitDefinition::Imported(id) => id,
        }
    }

    pub fn is_imported(&self) -> bool {
        matches!(self, TraitDefinition::Imported(_))
    }
}

impl fmt::Display for TraitDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitDefinition::Defined(id) => write!(f, "defined {id}"),
            TraitDefinition::Imported(id) => write!(f, "imported {id}"),
        }
    }
}

/// Literal values appearing in contract source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Int(i128),
    UInt(u128),
    Ascii(String),
    Utf8(String),
    Buffer(Vec<u8>),
    StandardPrincipal(String),
    ContractPrincipal(QualifiedContractIdentifier),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(value) => write!(f, "{value}"),
            Literal::UInt(value) => write!(f, "u{value}"),
            Literal::Ascii(text) => write!(f, "{text:?}"),
            Literal::Utf8(text) => write!(f, "u{text:?}"),
            Literal::Buffer(bytes) => {
                write!(f, "0x")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Literal::StandardPrincipal(address) => write!(f, "'{address}"),
            Literal::ContractPrincipal(id) => write!(f, "'{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolicExpressionType {
    Atom(String),
    LiteralValue(Literal),
    List(Vec<SymbolicExpression>),
    /// A fully qualified trait name such as `.sip-010.ft-trait`
    Field(TraitIdentifier),
    /// A `<alias>` type annotation together with the trait it resolved to
    TraitReference(String, TraitDefinition),
}

/// One node of a contract syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicExpression {
    pub expr: SymbolicExpressionType,
    pub span: Span,
}

impl SymbolicExpression {
    pub fn new(expr: SymbolicExpressionType, span: Span) -> Self {
        Self { expr, span }
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Self::new(SymbolicExpressionType::Atom(name.into()), Span::default())
    }

    pub fn literal_value(value: Literal) -> Self {
        Self::new(SymbolicExpressionType::LiteralValue(value), Span::default())
    }

    pub fn list(items: Vec<SymbolicExpression>) -> Self {
        Self::new(SymbolicExpressionType::List(items), Span::default())
    }

    pub fn field(identifier: TraitIdentifier) -> Self {
        Self::new(SymbolicExpressionType::Field(identifier), Span::default())
    }

    pub fn trait_reference(alias: impl Into<String>, definition: TraitDefinition) -> Self {
        Self::new(
            SymbolicExpressionType::TraitReference(alias.into(), definition),
            Span::default(),
        )
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn match_atom(&self) -> Option<&str> {
        match &self.expr {
            SymbolicExpressionType::Atom(name) => Some(name),
            _ => None,
        }
    }

    pub fn match_literal_value(&self) -> Option<&Literal> {
        match &self.expr {
            SymbolicExpressionType::LiteralValue(value) => Some(value),
            _ => None,
        }
    }

    pub fn match_list(&self) -> Option<&[SymbolicExpression]> {
        match &self.expr {
            SymbolicExpressionType::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn match_field(&self) -> Option<&TraitIdentifier> {
        match &self.expr {
            SymbolicExpressionType::Field(identifier) => Some(identifier),
            _ => None,
        }
    }

    pub fn match_trait_reference(&self) -> Option<(&str, &TraitDefinition)> {
        match &self.expr {
            SymbolicExpressionType::TraitReference(alias, definition) => {
                Some((alias.as_str(), definition))
            }
            _ => None,
        }
    }

    /// The list's children when its head is the atom `keyword`, e.g. `(use-trait …)`
    pub fn match_form(&self, keyword: &str) -> Option<&[SymbolicExpression]> {
        let items = self.match_list()?;
        let (head, rest) = items.split_first()?;
        (head.match_atom() == Some(keyword)).then_some(rest)
    }
}

impl fmt::Display for SymbolicExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expr {
            SymbolicExpressionType::Atom(name) => write!(f, "{name}"),
            SymbolicExpressionType::LiteralValue(value) => write!(f, "{value}"),
            SymbolicExpressionType::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            SymbolicExpressionType::Field(identifier) => write!(f, "'{identifier}"),
            SymbolicExpressionType::TraitReference(alias, _) => write!(f, "<{alias}>"),
        }
    }
}

/// The syntax tree of one contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractAst {
    pub contract_identifier: QualifiedContractIdentifier,
    pub expressions: Vec<SymbolicExpression>,
}

impl ContractAst {
    pub fn new(
        contract_identifier: QualifiedContractIdentifier,
        expressions: Vec<SymbolicExpression>,
    ) -> Self {
        Self {
            contract_identifier,
            expressions,
        }
    }
}
