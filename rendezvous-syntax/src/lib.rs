// Rendezvous Syntax Library
// Clarity contract syntax trees and a pest-based source reader

pub mod ast;
pub mod error;
pub mod parser;
pub mod visitor;

pub use ast::*;
pub use error::*;
pub use parser::ClarityParser;
pub use visitor::{walk_contract, walk_expression, walk_list, ExpressionVisitor, VisitorResult};

// Re-export parser rule for manual testing
pub use parser::Rule;

/// Read a contract's source into a syntax tree with bound trait references
pub fn parse_contract(
    input: &str,
    contract_identifier: &QualifiedContractIdentifier,
) -> Result<ContractAst, ParseError> {
    ClarityParser::parse_contract(input, contract_identifier)
}

#[cfg(test)]
mod tests;
