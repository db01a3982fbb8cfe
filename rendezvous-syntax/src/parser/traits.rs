// Trait reference binding for the contract reader
// Binds every <alias> to the define-trait or use-trait declaration that introduced it

use super::{PreExpression, PreExpressionType};
use crate::ast::*;
use crate::error::*;
use std::collections::HashMap;

/// Lower pre-expressions into symbolic expressions, binding trait references.
///
/// Declarations are only honoured at the top level of the contract, matching
/// where Clarity accepts them.
pub(super) fn resolve_trait_references(
    src: &str,
    contract_identifier: &QualifiedContractIdentifier,
    pre_expressions: Vec<PreExpression>,
) -> ParseResult<Vec<SymbolicExpression>> {
    let declared = collect_declarations(src, contract_identifier, &pre_expressions)?;

    pre_expressions
        .into_iter()
        .map(|expr| lower(src, &declared, expr))
        .collect()
}

fn collect_declarations(
    src: &str,
    contract_identifier: &QualifiedContractIdentifier,
    pre_expressions: &[PreExpression],
) -> ParseResult<HashMap<String, TraitDefinition>> {
    let mut declared = HashMap::new();

    for expr in pre_expressions {
        let PreExpressionType::List(items) = &expr.kind else {
            continue;
        };

        match items.first().and_then(PreExpression::match_atom) {
            Some("define-trait") => {
                let name = items
                    .get(1)
                    .and_then(PreExpression::match_atom)
                    .ok_or_else(|| malformed(src, expr, "define-trait"))?;
                declared.insert(
                    name.to_string(),
                    TraitDefinition::Defined(TraitIdentifier::new(
                        contract_identifier.clone(),
                        name,
                    )),
                );
            }
            Some("use-trait") => {
                let alias = items.get(1).and_then(PreExpression::match_atom);
                let field = match items.get(2).map(|item| &item.kind) {
                    Some(PreExpressionType::Field(identifier)) => Some(identifier),
                    _ => None,
                };
                let (Some(alias), Some(field)) = (alias, field) else {
                    return Err(malformed(src, expr, "use-trait"));
                };
                declared.insert(alias.to_string(), TraitDefinition::Imported(field.clone()));
            }
            _ => {}
        }
    }

    Ok(declared)
}

fn lower(
    src: &str,
    declared: &HashMap<String, TraitDefinition>,
    expr: PreExpression,
) -> ParseResult<SymbolicExpression> {
    let kind = match expr.kind {
        PreExpressionType::Atom(name) => SymbolicExpressionType::Atom(name),
        PreExpressionType::Literal(value) => SymbolicExpressionType::LiteralValue(value),
        PreExpressionType::Field(identifier) => SymbolicExpressionType::Field(identifier),
        PreExpressionType::List(items) => SymbolicExpressionType::List(
            items
                .into_iter()
                .map(|item| lower(src, declared, item))
                .collect::<ParseResult<_>>()?,
        ),
        PreExpressionType::TraitReference(alias) => {
            let Some(definition) = declared.get(&alias) else {
                return Err(ParseError::UndeclaredTrait {
                    src: src.to_string(),
                    span: expr.span.into(),
                    alias,
                });
            };
            SymbolicExpressionType::TraitReference(alias, definition.clone())
        }
    };

    Ok(SymbolicExpression::new(kind, expr.span))
}

fn malformed(src: &str, expr: &PreExpression, form: &str) -> ParseError {
    ParseError::MalformedTraitDeclaration {
        src: src.to_string(),
        span: expr.span.into(),
        form: form.to_string(),
    }
}
