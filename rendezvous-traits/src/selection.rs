//! Choosing which interface functions each stage works on

use crate::config::AnalysisConfig;
use crate::interface::{ContractInterfaceFunction, FunctionAccess};

/// Every function except the reserved bookkeeping ones
pub fn analyzable_functions(
    functions: &[ContractInterfaceFunction],
    config: &AnalysisConfig,
) -> Vec<ContractInterfaceFunction> {
    functions
        .iter()
        .filter(|function| !config.is_reserved(&function.name))
        .cloned()
        .collect()
}

/// Public functions that property tests and invariants call into
pub fn target_functions(
    functions: &[ContractInterfaceFunction],
    config: &AnalysisConfig,
) -> Vec<ContractInterfaceFunction> {
    functions
        .iter()
        .filter(|function| {
            function.access == FunctionAccess::Public
                && !config.is_reserved(&function.name)
                && !function.name.starts_with(&config.property_test_prefix)
        })
        .cloned()
        .collect()
}

pub fn property_test_functions(
    functions: &[ContractInterfaceFunction],
    config: &AnalysisConfig,
) -> Vec<ContractInterfaceFunction> {
    functions
        .iter()
        .filter(|function| {
            function.access == FunctionAccess::Public
                && function.name.starts_with(&config.property_test_prefix)
        })
        .cloned()
        .collect()
}

pub fn invariant_functions(
    functions: &[ContractInterfaceFunction],
    config: &AnalysisConfig,
) -> Vec<ContractInterfaceFunction> {
    functions
        .iter()
        .filter(|function| {
            function.access == FunctionAccess::ReadOnly
                && function.name.starts_with(&config.invariant_prefix)
        })
        .cloned()
        .collect()
}
