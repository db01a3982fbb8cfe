//! Unit tests for trait reference analysis
//!
//! Shared fixtures live here; each stage of the pipeline has its own module.

mod test_enrich;
mod test_testability;

use crate::interface::{
    ContractInterfaceFunction, FunctionAccess, FunctionArg, PrimitiveType, RawType,
    TraitIdentity, TypeSignature,
};
use rendezvous_syntax::{parse_contract, ContractAst, QualifiedContractIdentifier, TraitIdentifier};

pub(crate) const DEPLOYER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
pub(crate) const WALLET_1: &str = "ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5";

pub(crate) fn contract_id(name: &str) -> QualifiedContractIdentifier {
    QualifiedContractIdentifier::new(DEPLOYER, name)
}

pub(crate) fn parse(source: &str, name: &str) -> ContractAst {
    parse_contract(source, &contract_id(name)).expect("fixture contract should parse")
}

pub(crate) fn uint() -> RawType {
    TypeSignature::Primitive(PrimitiveType::UInt128)
}

pub(crate) fn int() -> RawType {
    TypeSignature::Primitive(PrimitiveType::Int128)
}

pub(crate) fn bool_type() -> RawType {
    TypeSignature::Primitive(PrimitiveType::Bool)
}

pub(crate) fn trait_ref() -> RawType {
    RawType::trait_reference()
}

/// A public function returning `(response bool uint)`
pub(crate) fn public(name: &str, args: Vec<(&str, RawType)>) -> ContractInterfaceFunction {
    function(name, FunctionAccess::Public, args)
}

pub(crate) fn function(
    name: &str,
    access: FunctionAccess,
    args: Vec<(&str, RawType)>,
) -> ContractInterfaceFunction {
    ContractInterfaceFunction::new(
        name,
        access,
        args.into_iter()
            .map(|(arg, signature)| FunctionArg::new(arg, signature))
            .collect(),
        RawType::response(bool_type(), uint()),
    )
}

/// `ft-trait` imported from the deployer's SIP-010 standard contract
pub(crate) fn ft_trait() -> TraitIdentity {
    TraitIdentity::imported(TraitIdentifier::new(
        contract_id("sip-010-trait-ft-standard"),
        "ft-trait",
    ))
}

pub(crate) fn nft_trait() -> TraitIdentity {
    TraitIdentity::imported(TraitIdentifier::new(
        contract_id("sip-009-trait-nft-standard"),
        "nft-trait",
    ))
}
