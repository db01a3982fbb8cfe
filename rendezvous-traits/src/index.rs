//! Project trait implementation index
//!
//! Which traits each deployed project contract declares it implements. Built
//! once per run and passed by reference; nothing mutates it during analysis.

use crate::interface::TraitIdentity;
use indexmap::IndexMap;
use rendezvous_syntax::{
    walk_contract, ContractAst, ExpressionVisitor, QualifiedContractIdentifier, Span,
    SymbolicExpression, TraitIdentifier, VisitorResult,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::convert::Infallible;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectTraitIndex {
    contracts: IndexMap<QualifiedContractIdentifier, Vec<TraitIdentity>>,
}

impl ProjectTraitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the traits a contract implements, replacing any earlier entry
    pub fn insert(&mut self, contract: QualifiedContractIdentifier, traits: Vec<TraitIdentity>) {
        if let Some(previous) = self.contracts.insert(contract.clone(), traits) {
            warn!(
                contract = %contract,
                replaced = previous.len(),
                "contract indexed twice, keeping the later trait list"
            );
        }
    }

    pub fn implemented_traits(&self, contract: &QualifiedContractIdentifier) -> &[TraitIdentity] {
        self.contracts
            .get(contract)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contracts(&self) -> impl Iterator<Item = &QualifiedContractIdentifier> {
        self.contracts.keys()
    }

    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&QualifiedContractIdentifier, &[TraitIdentity])> {
        self.contracts
            .iter()
            .map(|(contract, traits)| (contract, traits.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Contracts whose implemented traits contain exactly `trait_identity`.
    ///
    /// Order follows the index; origin kinds are compared as-is, so an
    /// `Imported` lookup never matches a `Defined` record.
    pub fn implementers_of(
        &self,
        trait_identity: &TraitIdentity,
    ) -> Vec<&QualifiedContractIdentifier> {
        self.contracts
            .iter()
            .filter(|(_, traits)| traits.contains(trait_identity))
            .map(|(contract, _)| contract)
            .collect()
    }

    /// Index a project from its contracts' top-level `impl-trait` forms.
    ///
    /// Every implemented trait is recorded as `Imported`, the identity other
    /// contracts see through `use-trait`. When the trait's owner is the
    /// implementing contract or a project contract declaring it with
    /// `define-trait`, it is also recorded as `Defined`, the identity the
    /// owner's own functions resolve to. Contracts implementing nothing are
    /// still listed, with no traits.
    pub fn from_contracts<'a>(contracts: impl IntoIterator<Item = &'a ContractAst>) -> Self {
        let contracts: Vec<_> = contracts.into_iter().collect();
        let defined: HashSet<TraitIdentifier> = contracts
            .iter()
            .copied()
            .flat_map(defined_traits)
            .collect();
        let mut index = Self::new();

        for contract in contracts {
            let mut collector = ImplTraitCollector::default();
            if let Err(never) = walk_contract(&mut collector, contract) {
                match never {}
            }

            let mut traits = Vec::with_capacity(collector.implemented.len() * 2);
            for identifier in collector.implemented {
                let owned = identifier.contract_identifier == contract.contract_identifier
                    || defined.contains(&identifier);
                traits.push(TraitIdentity::imported(identifier.clone()));
                if owned {
                    traits.push(TraitIdentity::defined(identifier));
                }
            }

            debug!(
                contract = %contract.contract_identifier,
                traits = traits.len(),
                "indexed trait implementations"
            );
            index.insert(contract.contract_identifier.clone(), traits);
        }

        index
    }
}

/// Traits a contract declares with a top-level `(define-trait name …)`
fn defined_traits(contract: &ContractAst) -> impl Iterator<Item = TraitIdentifier> + '_ {
    contract.expressions.iter().filter_map(|expr| {
        let name = expr.match_form("define-trait")?.first()?.match_atom()?;
        Some(TraitIdentifier::new(contract.contract_identifier.clone(), name))
    })
}

impl FromIterator<(QualifiedContractIdentifier, Vec<TraitIdentity>)> for ProjectTraitIndex {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (QualifiedContractIdentifier, Vec<TraitIdentity>)>,
    {
        Self {
            contracts: iter.into_iter().collect(),
        }
    }
}

/// Top-level `(impl-trait <field>)` declarations; nested forms are skipped
#[derive(Default)]
struct ImplTraitCollector {
    implemented: Vec<TraitIdentifier>,
}

impl ExpressionVisitor for ImplTraitCollector {
    type Error = Infallible;

    fn visit_list(
        &mut self,
        items: &[SymbolicExpression],
        _span: &Span,
    ) -> VisitorResult<Infallible> {
        if let [head, field] = items {
            if let (Some("impl-trait"), Some(identifier)) = (head.match_atom(), field.match_field())
            {
                if !self.implemented.contains(identifier) {
                    self.implemented.push(identifier.clone());
                }
            }
        }
        Ok(())
    }
}
