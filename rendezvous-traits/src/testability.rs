//! Implementer resolution and the testability filter
//!
//! A function whose trait-typed parameters cannot all be filled with a
//! deployed implementer cannot be called by generated tests, so it is
//! excluded from test generation.

use crate::enrich::EnrichedInterfaces;
use crate::index::ProjectTraitIndex;
use crate::interface::TraitIdentity;
use crate::references::TraitReferenceMap;
use rendezvous_syntax::QualifiedContractIdentifier;
use tracing::{debug, warn};

/// Contracts able to stand in for `trait_identity`, in index order.
///
/// Equality is exact: origin kind, trait name and defining contract must all
/// match. Callers needing a stable order sort the result themselves.
pub fn contracts_implementing_trait<'a>(
    trait_identity: &TraitIdentity,
    index: &'a ProjectTraitIndex,
) -> Vec<&'a QualifiedContractIdentifier> {
    index.implementers_of(trait_identity)
}

/// Names of the functions of `contract` that take a trait no project
/// contract implements, in reference-map order.
///
/// Only functions in the reference map are considered; every other function
/// has no trait-typed parameter and is never excluded here.
pub fn non_testable_trait_functions(
    enriched: &EnrichedInterfaces,
    reference_map: &TraitReferenceMap,
    index: &ProjectTraitIndex,
    contract: &QualifiedContractIdentifier,
) -> Vec<String> {
    let Some(functions) = enriched.get(contract) else {
        warn!(contract = %contract, "no enriched interfaces for contract");
        return Vec::new();
    };

    let mut excluded = Vec::new();
    for name in reference_map.function_names() {
        let Some(function) = functions.iter().find(|function| function.name == name) else {
            warn!(
                contract = %contract,
                function = name,
                "function missing from enriched interfaces"
            );
            continue;
        };

        let unimplemented = function
            .trait_identities()
            .into_iter()
            .find(|identity| contracts_implementing_trait(identity, index).is_empty());

        if let Some(identity) = unimplemented {
            debug!(
                contract = %contract,
                function = name,
                trait_identity = %identity,
                "excluding function: no project contract implements its trait"
            );
            excluded.push(name.to_string());
        }
    }

    excluded
}
