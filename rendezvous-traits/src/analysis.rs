//! One-call trait analysis of a single contract
//!
//! Runs selection, the reference map, enrichment and the testability filter
//! in order and keeps every intermediate result for inspection.

use crate::config::AnalysisConfig;
use crate::enrich::enrich_interfaces_with_trait_data;
use crate::error::TraitResolutionError;
use crate::index::ProjectTraitIndex;
use crate::interface::{ContractInterfaceFunction, EnrichedFunctionInterface};
use crate::references::TraitReferenceMap;
use crate::selection::analyzable_functions;
use crate::testability::non_testable_trait_functions;
use rendezvous_syntax::{ContractAst, QualifiedContractIdentifier};
use tracing::{debug, info_span};

#[derive(Debug, Clone, PartialEq)]
pub struct ContractTraitAnalysis {
    pub contract: QualifiedContractIdentifier,
    pub reference_map: TraitReferenceMap,
    pub enriched_functions: Vec<EnrichedFunctionInterface>,
    pub non_testable: Vec<String>,
}

impl ContractTraitAnalysis {
    /// Analyze the contract described by `ast` and its interface `functions`.
    ///
    /// A [`TraitResolutionError`] from enrichment is returned as is.
    pub fn analyze(
        ast: &ContractAst,
        functions: &[ContractInterfaceFunction],
        index: &ProjectTraitIndex,
        config: &AnalysisConfig,
    ) -> Result<Self, TraitResolutionError> {
        let contract = ast.contract_identifier.clone();
        let _span = info_span!("analyze_contract", contract = %contract).entered();

        let functions = analyzable_functions(functions, config);
        let reference_map = TraitReferenceMap::build(&functions);
        let mut enriched =
            enrich_interfaces_with_trait_data(ast, &reference_map, &functions, &contract)?;
        let non_testable =
            non_testable_trait_functions(&enriched, &reference_map, index, &contract);
        let enriched_functions = enriched.shift_remove(&contract).unwrap_or_default();

        debug!(
            functions = enriched_functions.len(),
            trait_functions = reference_map.len(),
            excluded = non_testable.len(),
            "contract analyzed"
        );

        Ok(Self {
            contract,
            reference_map,
            enriched_functions,
            non_testable,
        })
    }

    pub fn is_testable(&self, function: &str) -> bool {
        !self.non_testable.iter().any(|name| name == function)
    }

    /// Enriched functions not excluded by the testability filter, in order
    pub fn testable_functions(&self) -> impl Iterator<Item = &EnrichedFunctionInterface> {
        self.enriched_functions
            .iter()
            .filter(|function| self.is_testable(&function.name))
    }
}
