//! Rendezvous Trait Analysis
//!
//! Finds the trait-typed parameters of a Clarity contract's functions, gives
//! each one its full trait identity, and decides which functions randomized
//! tests can call given the contracts deployed in the project.
//!
//! ## Pipeline
//!
//! - **Reference map** ([`references`]): sparse per-function mirror of the
//!   argument types keeping only the paths that reach a trait reference
//! - **Alias table** ([`aliases`]): local trait alias to trait identity, read
//!   from the contract's syntax tree
//! - **Enrichment** ([`enrich`]): joins the two, rewriting each trait-reference
//!   leaf of the interface with its identity
//! - **Testability** ([`testability`]): implementers per trait from the
//!   [`ProjectTraitIndex`], and the functions to exclude when a trait has none
//!
//! [`ContractTraitAnalysis`] runs all four for one contract.

pub mod aliases;
pub mod analysis;
pub mod config;
pub mod enrich;
pub mod error;
pub mod index;
pub mod interface;
pub mod references;
pub mod selection;
pub mod testability;

pub use aliases::{resolve_trait_aliases, LocalTraitAliases};
pub use analysis::ContractTraitAnalysis;
pub use config::AnalysisConfig;
pub use enrich::{enrich_interfaces_with_trait_data, EnrichedInterfaces};
pub use error::{ConfigError, InterfaceError, TraitResolutionError};
pub use index::ProjectTraitIndex;
pub use interface::{
    ContractInterface, ContractInterfaceFunction, EnrichedFunctionInterface, EnrichedType,
    FunctionAccess, FunctionArg, FunctionInterface, FunctionOutput, PrimitiveType, RawType,
    TraitIdentity, TraitSlot, TupleField, TypeSignature,
};
pub use references::{
    build_trait_reference_map, ParameterReferenceMap, TraitReferenceMap, TraitReferenceNode,
};
pub use selection::{
    analyzable_functions, invariant_functions, property_test_functions, target_functions,
};
pub use testability::{contracts_implementing_trait, non_testable_trait_functions};

#[cfg(test)]
mod tests;
