//! Enrichment of interfaces with trait identities

use super::*;
use crate::enrich::enrich_interfaces_with_trait_data;
use crate::error::TraitResolutionError;
use crate::interface::{EnrichedFunctionInterface, EnrichedType, FunctionInterface};
use crate::references::TraitReferenceMap;
use indoc::indoc;
use pretty_assertions::assert_eq;
use rendezvous_syntax::SymbolicExpression;

fn enrich(
    ast: &ContractAst,
    functions: &[ContractInterfaceFunction],
) -> Result<Vec<EnrichedFunctionInterface>, TraitResolutionError> {
    let reference_map = TraitReferenceMap::build(functions);
    let mut enriched = enrich_interfaces_with_trait_data(
        ast,
        &reference_map,
        functions,
        &ast.contract_identifier,
    )?;
    assert_eq!(enriched.len(), 1);
    Ok(enriched.shift_remove(&ast.contract_identifier).unwrap())
}

fn ft() -> EnrichedType {
    TypeSignature::TraitReference(ft_trait())
}

#[test]
fn test_round_trip_scenario() {
    let ast = parse(
        indoc! {r#"
            (use-trait ft-trait .sip-010-trait-ft-standard.ft-trait)

            (define-public (test-trait (token <ft-trait>))
              (ok true))

            (define-public (no-args)
              (ok true))
        "#},
        "rendezvous-token",
    );
    let functions = vec![
        public("test-trait", vec![("token", trait_ref())]),
        public("no-args", vec![]),
    ];

    let enriched = enrich(&ast, &functions).unwrap();

    assert_eq!(enriched.len(), 2);
    assert_eq!(enriched[0].name, "test-trait");
    assert_eq!(enriched[0].args[0].signature, ft());
    assert_eq!(enriched[1].erase(), functions[1]);
    assert_eq!(enriched[1].outputs, functions[1].outputs);
}

#[test]
fn test_output_is_keyed_by_target_contract() {
    let ast = parse("(define-public (no-args) (ok true))", "plain");
    let functions = vec![public("no-args", vec![])];
    let target = QualifiedContractIdentifier::new(WALLET_1, "plain");

    let enriched =
        enrich_interfaces_with_trait_data(&ast, &TraitReferenceMap::default(), &functions, &target)
            .unwrap();

    assert_eq!(enriched.keys().collect::<Vec<_>>(), vec![&target]);
}

#[test]
fn test_composite_parameters_are_enriched_in_place() {
    let ast = parse(
        indoc! {r#"
            (use-trait ft-trait .sip-010-trait-ft-standard.ft-trait)

            (define-public (batch
                (tokens (list 5 <ft-trait>))
                (pair { amount: uint, token: <ft-trait> })
                (maybe (optional <ft-trait>))
                (outcome (response <ft-trait> int)))
              (ok true))
        "#},
        "batcher",
    );
    let functions = vec![public(
        "batch",
        vec![
            ("tokens", RawType::list(trait_ref(), 5)),
            ("pair", RawType::tuple([("amount", uint()), ("token", trait_ref())])),
            ("maybe", RawType::optional(trait_ref())),
            ("outcome", RawType::response(trait_ref(), int())),
        ],
    )];

    let enriched = enrich(&ast, &functions).unwrap();
    let args = &enriched[0].args;

    assert_eq!(args[0].signature, TypeSignature::list(ft(), 5));
    assert_eq!(
        args[1].signature,
        TypeSignature::tuple([
            ("amount", TypeSignature::Primitive(PrimitiveType::UInt128)),
            ("token", ft()),
        ])
    );
    assert_eq!(args[2].signature, TypeSignature::optional(ft()));
    assert_eq!(
        args[3].signature,
        TypeSignature::response(ft(), TypeSignature::Primitive(PrimitiveType::Int128))
    );
    assert_eq!(enriched[0].erase(), functions[0]);
}

#[test]
fn test_each_position_gets_the_identity_of_its_own_alias() {
    let ast = parse(
        indoc! {r#"
            (use-trait ft-trait .sip-010-trait-ft-standard.ft-trait)
            (use-trait nft-trait .sip-009-trait-nft-standard.nft-trait)

            (define-public (swap (give <nft-trait>) (take (list 2 <ft-trait>)) (fee uint))
              (ok true))
        "#},
        "swapper",
    );
    let functions = vec![public(
        "swap",
        vec![
            ("give", trait_ref()),
            ("take", RawType::list(trait_ref(), 2)),
            ("fee", uint()),
        ],
    )];

    let enriched = enrich(&ast, &functions).unwrap();
    let args = &enriched[0].args;

    assert_eq!(args[0].signature, TypeSignature::TraitReference(nft_trait()));
    assert_eq!(args[1].signature, TypeSignature::list(ft(), 2));
    assert_eq!(args[2].signature, TypeSignature::Primitive(PrimitiveType::UInt128));
}

#[test]
fn test_read_only_and_private_definitions_are_located() {
    let ast = parse(
        indoc! {r#"
            (define-trait local-trait ((ping () (response bool uint))))

            (define-read-only (peek (target <local-trait>)) true)
            (define-private (poke (target <local-trait>)) true)
        "#},
        "pinger",
    );
    let functions = vec![
        function("peek", FunctionAccess::ReadOnly, vec![("target", trait_ref())]),
        function("poke", FunctionAccess::Private, vec![("target", trait_ref())]),
    ];

    let enriched = enrich(&ast, &functions).unwrap();

    let local = TraitIdentity::defined(TraitIdentifier::new(contract_id("pinger"), "local-trait"));
    for function in &enriched {
        assert_eq!(function.args[0].signature, TypeSignature::TraitReference(local.clone()));
    }
}

#[test]
fn test_unknown_alias_is_an_error() {
    // A tree whose trait references were never bound keeps the bare alias atom
    let ast = ContractAst::new(
        contract_id("unbound"),
        vec![SymbolicExpression::list(vec![
            SymbolicExpression::atom("define-public"),
            SymbolicExpression::list(vec![
                SymbolicExpression::atom("call"),
                SymbolicExpression::list(vec![
                    SymbolicExpression::atom("target"),
                    SymbolicExpression::atom("missing-trait"),
                ]),
            ]),
            SymbolicExpression::list(vec![
                SymbolicExpression::atom("ok"),
                SymbolicExpression::atom("true"),
            ]),
        ])],
    );
    let functions = vec![public("call", vec![("target", trait_ref())])];

    let error = enrich(&ast, &functions).unwrap_err();

    assert_eq!(
        error,
        TraitResolutionError::UnknownAlias {
            alias: "missing-trait".to_string(),
            function: "call".to_string(),
        }
    );
}

#[test]
fn test_missing_definition_is_an_error() {
    let ast = parse("(define-public (other) (ok true))", "mismatch");
    let functions = vec![public("call", vec![("target", trait_ref())])];

    let error = enrich(&ast, &functions).unwrap_err();

    assert_eq!(
        error,
        TraitResolutionError::MissingFunctionDefinition {
            function: "call".to_string()
        }
    );
}

#[test]
fn test_shape_disagreement_is_an_error() {
    let ast = parse(
        indoc! {r#"
            (use-trait ft-trait .sip-010-trait-ft-standard.ft-trait)
            (define-public (call (target (optional <ft-trait>))) (ok true))
        "#},
        "mismatch",
    );
    let functions = vec![public("call", vec![("target", RawType::list(trait_ref(), 3))])];

    let error = enrich(&ast, &functions).unwrap_err();

    assert_eq!(
        error,
        TraitResolutionError::UnlocatedParameter {
            function: "call".to_string(),
            parameter: "target".to_string(),
        }
    );
}

#[test]
fn test_trait_slot_without_map_entry_is_an_error() {
    let ast = parse(
        indoc! {r#"
            (use-trait ft-trait .sip-010-trait-ft-standard.ft-trait)
            (define-public (call (target <ft-trait>)) (ok true))
        "#},
        "unmapped",
    );
    let functions = vec![public("call", vec![("target", trait_ref())])];

    let error = enrich_interfaces_with_trait_data(
        &ast,
        &TraitReferenceMap::default(),
        &functions,
        &ast.contract_identifier,
    )
    .unwrap_err();

    assert!(matches!(
        error,
        TraitResolutionError::UnmappedTraitReference { ref parameter, .. } if parameter == "target"
    ));
}

#[test]
fn test_functions_without_traits_pass_through_unchanged() {
    let ast = parse(
        indoc! {r#"
            (define-map balances principal uint)
            (define-public (deposit (amount uint) (memo (optional (buff 34))))
              (ok true))
        "#},
        "vault",
    );
    let functions = vec![public(
        "deposit",
        vec![
            ("amount", uint()),
            (
                "memo",
                RawType::optional(TypeSignature::Primitive(PrimitiveType::Buffer { length: 34 })),
            ),
        ],
    )];

    let enriched = enrich(&ast, &functions).unwrap();

    assert_eq!(
        enriched,
        vec![FunctionInterface {
            name: "deposit".to_string(),
            access: FunctionAccess::Public,
            args: vec![
                FunctionArg::new("amount", TypeSignature::Primitive(PrimitiveType::UInt128)),
                FunctionArg::new(
                    "memo",
                    TypeSignature::optional(TypeSignature::Primitive(PrimitiveType::Buffer {
                        length: 34
                    })),
                ),
            ],
            outputs: functions[0].outputs.clone(),
        }]
    );
}
