//! Error types for trait reference analysis
//!
//! Following the miette patterns of the syntax crate for consistent reporting.

use crate::interface::TraitIdentity;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// The contract's interface and syntax tree cannot be reconciled.
///
/// Raised instead of emitting a partially enriched interface, which test
/// generation would misread as "no trait here".
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum TraitResolutionError {
    #[error("Trait alias `{alias}` used by function `{function}` is not declared in the contract")]
    #[diagnostic(
        code(rendezvous::traits::unknown_alias),
        help("Declare the trait with use-trait, or pass a syntax tree whose trait references are resolved")
    )]
    UnknownAlias { alias: String, function: String },

    #[error("Function `{function}` takes trait references but has no definition in the syntax tree")]
    #[diagnostic(
        code(rendezvous::traits::missing_function_definition),
        help("The interface and the syntax tree must describe the same contract")
    )]
    MissingFunctionDefinition { function: String },

    #[error("Parameter `{parameter}` of function `{function}` does not match its type in the syntax tree")]
    #[diagnostic(
        code(rendezvous::traits::unlocated_parameter),
        help("The interface and the syntax tree must describe the same contract")
    )]
    UnlocatedParameter { function: String, parameter: String },

    #[error("Parameter `{parameter}` of function `{function}` holds a trait reference missing from the reference map")]
    #[diagnostic(
        code(rendezvous::traits::unmapped_trait_reference),
        help("Build the reference map from the same function list that is being enriched")
    )]
    UnmappedTraitReference { function: String, parameter: String },

    #[error("Trait alias `{alias}` is bound to both {first} and {second}")]
    #[diagnostic(
        code(rendezvous::traits::conflicting_alias),
        help("A contract must use each trait alias for a single trait")
    )]
    ConflictingAlias {
        alias: String,
        first: Box<TraitIdentity>,
        second: Box<TraitIdentity>,
    },
}

/// Contract interface JSON could not be decoded
#[derive(Error, Diagnostic, Debug)]
pub enum InterfaceError {
    #[error("Invalid contract interface JSON")]
    #[diagnostic(code(rendezvous::interface::invalid_json))]
    Json(#[from] serde_json::Error),
}

/// Analysis configuration could not be loaded
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {}", path.display())]
    #[diagnostic(code(rendezvous::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration")]
    #[diagnostic(
        code(rendezvous::config::invalid_toml),
        help("Known keys: reserved-functions, property-test-prefix, invariant-prefix")
    )]
    Toml(#[from] toml::de::Error),
}
