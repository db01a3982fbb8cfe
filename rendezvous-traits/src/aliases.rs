//! Local trait alias table
//!
//! Maps the alias a contract's own code uses for a trait to the trait's full
//! identity. Two forms introduce aliases, and both are searched for at every
//! depth of the syntax tree:
//!
//! - `(use-trait alias 'ISSUER.contract.trait)` binds `alias` to an imported
//!   trait.
//! - an inline `<alias>` annotation whose trait reference has already been
//!   bound to its definition by the reader.

use crate::error::TraitResolutionError;
use crate::interface::TraitIdentity;
use indexmap::map::Entry;
use indexmap::IndexMap;
use rendezvous_syntax::{
    walk_list, ContractAst, ExpressionVisitor, Span, SymbolicExpression, TraitDefinition,
    VisitorResult,
};
use tracing::trace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalTraitAliases {
    aliases: IndexMap<String, TraitIdentity>,
}

impl LocalTraitAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every alias bound anywhere in an expression forest.
    ///
    /// Binding the same alias twice to the same identity is accepted; binding
    /// it to a different identity is a [`TraitResolutionError::ConflictingAlias`].
    pub fn resolve(expressions: &[SymbolicExpression]) -> Result<Self, TraitResolutionError> {
        let mut collector = AliasCollector::default();
        walk_list(&mut collector, expressions)?;
        Ok(collector.table)
    }

    pub fn from_contract(contract: &ContractAst) -> Result<Self, TraitResolutionError> {
        Self::resolve(&contract.expressions)
    }

    pub fn bind(
        &mut self,
        alias: impl Into<String>,
        identity: TraitIdentity,
    ) -> Result<(), TraitResolutionError> {
        match self.aliases.entry(alias.into()) {
            Entry::Vacant(entry) => {
                trace!(alias = %entry.key(), identity = %identity, "bound trait alias");
                entry.insert(identity);
                Ok(())
            }
            Entry::Occupied(entry) if *entry.get() == identity => Ok(()),
            Entry::Occupied(entry) => Err(TraitResolutionError::ConflictingAlias {
                alias: entry.key().clone(),
                first: Box::new(entry.get().clone()),
                second: Box::new(identity),
            }),
        }
    }

    pub fn get(&self, alias: &str) -> Option<&TraitIdentity> {
        self.aliases.get(alias)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TraitIdentity)> {
        self.aliases
            .iter()
            .map(|(alias, identity)| (alias.as_str(), identity))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Free-function form of [`LocalTraitAliases::resolve`]
pub fn resolve_trait_aliases(
    expressions: &[SymbolicExpression],
) -> Result<LocalTraitAliases, TraitResolutionError> {
    LocalTraitAliases::resolve(expressions)
}

#[derive(Default)]
struct AliasCollector {
    table: LocalTraitAliases,
}

impl ExpressionVisitor for AliasCollector {
    type Error = TraitResolutionError;

    fn visit_list(
        &mut self,
        items: &[SymbolicExpression],
        _span: &Span,
    ) -> VisitorResult<Self::Error> {
        if let [head, alias, field] = items {
            let declaration = (head.match_atom(), alias.match_atom(), field.match_field());
            if let (Some("use-trait"), Some(alias), Some(field)) = declaration {
                self.table.bind(alias, TraitIdentity::imported(field.clone()))?;
            }
        }

        walk_list(self, items)
    }

    fn visit_trait_reference(
        &mut self,
        alias: &str,
        definition: &TraitDefinition,
        _span: &Span,
    ) -> VisitorResult<Self::Error> {
        self.table
            .bind(alias, TraitIdentity::from_definition(definition.clone()))
    }
}
