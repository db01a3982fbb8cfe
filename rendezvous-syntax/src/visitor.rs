//! Visitor trait for traversing contract syntax trees
//!
//! Default methods perform a depth-first, left-to-right walk over every
//! expression. Implementors override the node kinds they care about and call
//! the matching `walk_*` function when they still want to descend.

use crate::ast::{
    ContractAst, Literal, Span, SymbolicExpression, SymbolicExpressionType, TraitDefinition,
    TraitIdentifier,
};

/// Result type for visitor methods that can fail
pub type VisitorResult<E> = Result<(), E>;

pub trait ExpressionVisitor: Sized {
    type Error;

    /// Visit any expression (entry point for every node)
    fn visit_expression(&mut self, expr: &SymbolicExpression) -> VisitorResult<Self::Error> {
        walk_expression(self, expr)
    }

    /// Visit a list node; the default descends into every child
    fn visit_list(
        &mut self,
        items: &[SymbolicExpression],
        _span: &Span,
    ) -> VisitorResult<Self::Error> {
        walk_list(self, items)
    }

    fn visit_atom(&mut self, _name: &str, _span: &Span) -> VisitorResult<Self::Error> {
        Ok(())
    }

    fn visit_literal(&mut self, _value: &Literal, _span: &Span) -> VisitorResult<Self::Error> {
        Ok(())
    }

    fn visit_field(
        &mut self,
        _identifier: &TraitIdentifier,
        _span: &Span,
    ) -> VisitorResult<Self::Error> {
        Ok(())
    }

    fn visit_trait_reference(
        &mut self,
        _alias: &str,
        _definition: &TraitDefinition,
        _span: &Span,
    ) -> VisitorResult<Self::Error> {
        Ok(())
    }
}

/// Walk every top-level expression of a contract
pub fn walk_contract<V: ExpressionVisitor>(
    visitor: &mut V,
    contract: &ContractAst,
) -> VisitorResult<V::Error> {
    walk_list(visitor, &contract.expressions)
}

/// Dispatch an expression to the visitor method for its kind
pub fn walk_expression<V: ExpressionVisitor>(
    visitor: &mut V,
    expr: &SymbolicExpression,
) -> VisitorResult<V::Error> {
    match &expr.expr {
        SymbolicExpressionType::Atom(name) => visitor.visit_atom(name, &expr.span),
        SymbolicExpressionType::LiteralValue(value) => visitor.visit_literal(value, &expr.span),
        SymbolicExpressionType::List(items) => visitor.visit_list(items, &expr.span),
        SymbolicExpressionType::Field(identifier) => visitor.visit_field(identifier, &expr.span),
        SymbolicExpressionType::TraitReference(alias, definition) => {
            visitor.visit_trait_reference(alias, definition, &expr.span)
        }
    }
}

pub fn walk_list<V: ExpressionVisitor>(
    visitor: &mut V,
    items: &[SymbolicExpression],
) -> VisitorResult<V::Error> {
    for item in items {
        visitor.visit_expression(item)?;
    }
    Ok(())
}
