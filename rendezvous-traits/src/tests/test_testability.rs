//! Implementer resolution, the project index and the testability filter

use super::*;
use crate::enrich::{enrich_interfaces_with_trait_data, EnrichedInterfaces};
use crate::index::ProjectTraitIndex;
use crate::references::TraitReferenceMap;
use crate::testability::{contracts_implementing_trait, non_testable_trait_functions};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn index_of(entries: Vec<(&str, Vec<TraitIdentity>)>) -> ProjectTraitIndex {
    entries
        .into_iter()
        .map(|(name, traits)| (contract_id(name), traits))
        .collect()
}

fn swap_contract() -> (ContractAst, Vec<ContractInterfaceFunction>) {
    let ast = parse(
        indoc! {r#"
            (use-trait ft-trait .sip-010-trait-ft-standard.ft-trait)
            (use-trait nft-trait .sip-009-trait-nft-standard.nft-trait)

            (define-public (swap (give <nft-trait>) (take <ft-trait>))
              (ok true))

            (define-public (pay (token <ft-trait>) (amount uint))
              (ok true))

            (define-public (ping)
              (ok true))
        "#},
        "swapper",
    );
    let functions = vec![
        public("swap", vec![("give", trait_ref()), ("take", trait_ref())]),
        public("pay", vec![("token", trait_ref()), ("amount", uint())]),
        public("ping", vec![]),
    ];
    (ast, functions)
}

fn analyze(
    ast: &ContractAst,
    functions: &[ContractInterfaceFunction],
) -> (EnrichedInterfaces, TraitReferenceMap) {
    let reference_map = TraitReferenceMap::build(functions);
    let enriched =
        enrich_interfaces_with_trait_data(ast, &reference_map, functions, &ast.contract_identifier)
            .unwrap();
    (enriched, reference_map)
}

#[test]
fn test_implementers_follow_index_order() {
    let index = index_of(vec![
        ("token-b", vec![ft_trait()]),
        ("nft-a", vec![nft_trait()]),
        ("token-a", vec![nft_trait(), ft_trait()]),
    ]);

    assert_eq!(
        contracts_implementing_trait(&ft_trait(), &index),
        vec![&contract_id("token-b"), &contract_id("token-a")]
    );
    assert_eq!(
        index.implementers_of(&nft_trait()),
        vec![&contract_id("nft-a"), &contract_id("token-a")]
    );
}

#[test]
fn test_no_implementers_is_an_empty_list() {
    let index = index_of(vec![("nft-a", vec![nft_trait()]), ("plain", vec![])]);

    assert!(contracts_implementing_trait(&ft_trait(), &index).is_empty());
    assert!(contracts_implementing_trait(&ft_trait(), &ProjectTraitIndex::new()).is_empty());
}

#[test]
fn test_origin_kind_is_compared_exactly() {
    let identifier = TraitIdentifier::new(contract_id("sip-010-trait-ft-standard"), "ft-trait");
    let imported = TraitIdentity::imported(identifier.clone());
    let defined = TraitIdentity::defined(identifier);

    let index = index_of(vec![("token", vec![defined.clone()])]);

    assert!(contracts_implementing_trait(&imported, &index).is_empty());
    assert_eq!(contracts_implementing_trait(&defined, &index), vec![&contract_id("token")]);

    let both = index_of(vec![("token", vec![defined.clone(), imported.clone()])]);
    assert_eq!(contracts_implementing_trait(&imported, &both).len(), 1);
}

#[test]
fn test_function_with_unimplemented_trait_is_excluded() {
    let (ast, functions) = swap_contract();
    let (enriched, reference_map) = analyze(&ast, &functions);
    let index = index_of(vec![("rendezvous-token", vec![ft_trait()])]);

    let excluded =
        non_testable_trait_functions(&enriched, &reference_map, &index, &ast.contract_identifier);

    assert_eq!(excluded, vec!["swap".to_string()]);
}

#[test]
fn test_first_missing_implementer_excludes_once() {
    // No nft implementer for `give`, `take` has one: excluded exactly once
    let (ast, functions) = swap_contract();
    let (enriched, reference_map) = analyze(&ast, &functions);
    let index = index_of(vec![
        ("rendezvous-token", vec![ft_trait()]),
        ("other-token", vec![ft_trait()]),
    ]);

    let excluded =
        non_testable_trait_functions(&enriched, &reference_map, &index, &ast.contract_identifier);

    assert_eq!(excluded.iter().filter(|name| *name == "swap").count(), 1);
    assert!(!excluded.contains(&"pay".to_string()));
}

#[test]
fn test_all_traits_implemented_means_nothing_excluded() {
    let (ast, functions) = swap_contract();
    let (enriched, reference_map) = analyze(&ast, &functions);
    let index = index_of(vec![
        ("rendezvous-token", vec![ft_trait()]),
        ("rendezvous-nft", vec![nft_trait()]),
    ]);

    let excluded =
        non_testable_trait_functions(&enriched, &reference_map, &index, &ast.contract_identifier);

    assert!(excluded.is_empty());
}

#[test]
fn test_functions_without_traits_are_never_excluded() {
    let (ast, functions) = swap_contract();
    let (enriched, reference_map) = analyze(&ast, &functions);

    let excluded = non_testable_trait_functions(
        &enriched,
        &reference_map,
        &ProjectTraitIndex::new(),
        &ast.contract_identifier,
    );

    assert_eq!(excluded, vec!["swap".to_string(), "pay".to_string()]);
}

#[test]
fn test_unknown_contract_excludes_nothing() {
    let (ast, functions) = swap_contract();
    let (enriched, reference_map) = analyze(&ast, &functions);

    let excluded = non_testable_trait_functions(
        &enriched,
        &reference_map,
        &ProjectTraitIndex::new(),
        &contract_id("someone-else"),
    );

    assert!(excluded.is_empty());
}

#[test]
fn test_index_from_impl_trait_declarations() {
    let standard = parse(
        indoc! {r#"
            (define-trait ft-trait
              ((transfer (uint principal principal (optional (buff 34))) (response bool uint))))
        "#},
        "sip-010-trait-ft-standard",
    );
    let token = parse(
        indoc! {r#"
            (impl-trait .sip-010-trait-ft-standard.ft-trait)
            (define-fungible-token rendezvous-token)
        "#},
        "rendezvous-token",
    );
    let self_implementing = parse(
        indoc! {r#"
            (define-trait ping-trait ((ping () (response bool uint))))
            (impl-trait .pinger.ping-trait)
            (impl-trait .pinger.ping-trait)
        "#},
        "pinger",
    );

    let index = ProjectTraitIndex::from_contracts([&standard, &token, &self_implementing]);

    assert_eq!(index.len(), 3);
    assert!(index.implemented_traits(&contract_id("sip-010-trait-ft-standard")).is_empty());
    assert_eq!(
        index.implemented_traits(&contract_id("rendezvous-token")),
        &[ft_trait(), TraitIdentity::defined(ft_trait().identifier().clone())]
    );
    let ping_trait = TraitIdentifier::new(contract_id("pinger"), "ping-trait");
    assert_eq!(
        index.implemented_traits(&contract_id("pinger")),
        &[
            TraitIdentity::imported(ping_trait.clone()),
            TraitIdentity::defined(ping_trait)
        ]
    );
    assert!(index.implemented_traits(&contract_id("absent")).is_empty());
}

#[test]
fn test_traits_from_outside_the_project_are_only_imported() {
    let token = parse(
        "(impl-trait .sip-010-trait-ft-standard.ft-trait)",
        "rendezvous-token",
    );

    let index = ProjectTraitIndex::from_contracts([&token]);

    assert_eq!(index.implemented_traits(&contract_id("rendezvous-token")), &[ft_trait()]);
}

#[test]
fn test_owner_functions_see_implementers_of_their_own_trait() {
    let vault = parse(
        indoc! {r#"
            (define-trait strategy-trait ((harvest () (response uint uint))))

            (define-public (harvest (strategy <strategy-trait>))
              (contract-call? strategy harvest))
        "#},
        "vault",
    );
    let strategy = parse(
        indoc! {r#"
            (impl-trait .vault.strategy-trait)

            (define-public (harvest)
              (ok u0))
        "#},
        "my-strategy",
    );
    let functions = vec![public("harvest", vec![("strategy", trait_ref())])];
    let (enriched, reference_map) = analyze(&vault, &functions);

    let index = ProjectTraitIndex::from_contracts([&vault, &strategy]);
    let strategy_trait = TraitIdentifier::new(contract_id("vault"), "strategy-trait");

    assert_eq!(
        contracts_implementing_trait(&TraitIdentity::defined(strategy_trait.clone()), &index),
        vec![&contract_id("my-strategy")]
    );
    assert_eq!(
        contracts_implementing_trait(&TraitIdentity::imported(strategy_trait), &index),
        vec![&contract_id("my-strategy")]
    );
    assert!(non_testable_trait_functions(
        &enriched,
        &reference_map,
        &index,
        &contract_id("vault")
    )
    .is_empty());
}

#[test]
fn test_reindexing_a_contract_keeps_the_later_entry() {
    let mut index = index_of(vec![("rendezvous-token", vec![ft_trait()])]);

    index.insert(contract_id("rendezvous-token"), vec![nft_trait()]);

    assert_eq!(index.len(), 1);
    assert_eq!(index.implemented_traits(&contract_id("rendezvous-token")), &[nft_trait()]);
}

#[test]
fn test_nested_impl_trait_is_ignored() {
    let contract = parse(
        "(begin (impl-trait .sip-010-trait-ft-standard.ft-trait))",
        "nested",
    );

    let index = ProjectTraitIndex::from_contracts([&contract]);

    assert!(index.implemented_traits(&contract_id("nested")).is_empty());
}

#[test]
fn test_index_serializes_as_contract_keyed_map() {
    let index = index_of(vec![("rendezvous-token", vec![ft_trait()])]);

    let value = serde_json::to_value(&index).unwrap();
    let key = format!("{DEPLOYER}.rendezvous-token");

    assert_eq!(value[&key][0]["name"], "ft-trait");
    assert_eq!(
        value[&key][0]["import"]["Imported"]["contract_identifier"],
        format!("{DEPLOYER}.sip-010-trait-ft-standard")
    );

    let decoded: ProjectTraitIndex = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, index);
}
