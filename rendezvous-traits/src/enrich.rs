//! Interface enrichment
//!
//! Rewrites a contract's function interfaces so that each trait-reference
//! leaf carries the identity of the trait it stands for. The descriptor tree,
//! the reference map and the function's definition in the syntax tree are
//! walked in lock-step: the reference map says where the trait references
//! are, the syntax tree says which alias was written there, and the alias
//! table turns that alias into an identity. Everything off the reference map
//! is copied unchanged.

use crate::aliases::LocalTraitAliases;
use crate::error::TraitResolutionError;
use crate::interface::{
    ContractInterfaceFunction, EnrichedFunctionInterface, EnrichedType, FunctionArg,
    FunctionInterface, RawType, TupleField, TypeSignature,
};
use crate::references::{ParameterReferenceMap, TraitReferenceMap, TraitReferenceNode};
use indexmap::IndexMap;
use rendezvous_syntax::{ContractAst, QualifiedContractIdentifier, SymbolicExpression};
use tracing::{debug, debug_span};

/// Enriched functions keyed by the contract they belong to
pub type EnrichedInterfaces =
    IndexMap<QualifiedContractIdentifier, Vec<EnrichedFunctionInterface>>;

const FUNCTION_DEFINITIONS: [&str; 3] = ["define-public", "define-read-only", "define-private"];

/// Enrich one contract's functions.
///
/// Returns a single-entry map keyed by `target`, with functions in their
/// original order. Any inconsistency between the interface and the syntax
/// tree is returned as an error; no partially enriched interface is produced.
pub fn enrich_interfaces_with_trait_data(
    ast: &ContractAst,
    reference_map: &TraitReferenceMap,
    functions: &[ContractInterfaceFunction],
    target: &QualifiedContractIdentifier,
) -> Result<EnrichedInterfaces, TraitResolutionError> {
    let aliases = LocalTraitAliases::from_contract(ast)?;

    let enriched = functions
        .iter()
        .map(|function| match reference_map.get(&function.name) {
            Some(parameters) => enrich_function(ast, &aliases, function, parameters),
            None => copy_function(function),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut interfaces = EnrichedInterfaces::new();
    interfaces.insert(target.clone(), enriched);
    Ok(interfaces)
}

fn enrich_function(
    ast: &ContractAst,
    aliases: &LocalTraitAliases,
    function: &ContractInterfaceFunction,
    parameters: &ParameterReferenceMap,
) -> Result<EnrichedFunctionInterface, TraitResolutionError> {
    let _span = debug_span!("enrich_function", function = %function.name).entered();

    let signature = function_signature(ast, &function.name).ok_or_else(|| {
        TraitResolutionError::MissingFunctionDefinition {
            function: function.name.clone(),
        }
    })?;

    let mut args = Vec::with_capacity(function.args.len());
    for arg in &function.args {
        let location = Location {
            aliases,
            function: &function.name,
            parameter: &arg.name,
        };

        let enriched = match parameters.get(&arg.name) {
            Some(node) => {
                let type_expr = parameter_type(signature, &arg.name)
                    .ok_or_else(|| location.unlocated())?;
                location.enrich(&arg.signature, node, type_expr)?
            }
            None => location.copy(&arg.signature)?,
        };
        args.push(FunctionArg::new(arg.name.clone(), enriched));
    }

    debug!(
        function = %function.name,
        enriched = parameters.len(),
        "enriched trait parameters"
    );

    Ok(FunctionInterface {
        name: function.name.clone(),
        access: function.access,
        args,
        outputs: function.outputs.clone(),
    })
}

fn copy_function(
    function: &ContractInterfaceFunction,
) -> Result<EnrichedFunctionInterface, TraitResolutionError> {
    let args = function
        .args
        .iter()
        .map(|arg| {
            let signature = copy_unreferenced(&arg.signature, &function.name, &arg.name)?;
            Ok(FunctionArg::new(arg.name.clone(), signature))
        })
        .collect::<Result<_, TraitResolutionError>>()?;

    Ok(FunctionInterface {
        name: function.name.clone(),
        access: function.access,
        args,
        outputs: function.outputs.clone(),
    })
}

/// Copy a subtree the reference map does not reach
fn copy_unreferenced(
    signature: &RawType,
    function: &str,
    parameter: &str,
) -> Result<EnrichedType, TraitResolutionError> {
    signature
        .without_trait_slots()
        .ok_or_else(|| TraitResolutionError::UnmappedTraitReference {
            function: function.to_string(),
            parameter: parameter.to_string(),
        })
}

/// The parameter list of a top-level function definition:
/// `(define-public (name (param type) ...) body)` yields `(param type) ...`
fn function_signature<'a>(
    ast: &'a ContractAst,
    name: &str,
) -> Option<&'a [SymbolicExpression]> {
    ast.expressions.iter().find_map(|expr| {
        let rest = FUNCTION_DEFINITIONS
            .iter()
            .find_map(|keyword| expr.match_form(keyword))?;
        let (head, parameters) = rest.first()?.match_list()?.split_first()?;
        (head.match_atom() == Some(name)).then_some(parameters)
    })
}

/// The type expression of a named `(param type)` entry
fn parameter_type<'a>(
    entries: &'a [SymbolicExpression],
    name: &str,
) -> Option<&'a SymbolicExpression> {
    entries.iter().find_map(|entry| match entry.match_list()? {
        [key, type_expr] if key.match_atom() == Some(name) => Some(type_expr),
        _ => None,
    })
}

/// The alias written at a trait-reference position: a bound `<alias>` or,
/// in trees that were never bound, the bare alias atom
fn written_alias(type_expr: &SymbolicExpression) -> Option<&str> {
    type_expr
        .match_trait_reference()
        .map(|(alias, _)| alias)
        .or_else(|| type_expr.match_atom())
}

/// One argument being enriched, for lookups and error reporting
struct Location<'a> {
    aliases: &'a LocalTraitAliases,
    function: &'a str,
    parameter: &'a str,
}

impl Location<'_> {
    fn enrich(
        &self,
        signature: &RawType,
        node: &TraitReferenceNode,
        type_expr: &SymbolicExpression,
    ) -> Result<EnrichedType, TraitResolutionError> {
        match (signature, node) {
            (TypeSignature::TraitReference(_), TraitReferenceNode::TraitReference) => {
                let alias = written_alias(type_expr).ok_or_else(|| self.unlocated())?;
                let identity = self.aliases.get(alias).ok_or_else(|| {
                    TraitResolutionError::UnknownAlias {
                        alias: alias.to_string(),
                        function: self.function.to_string(),
                    }
                })?;
                Ok(TypeSignature::TraitReference(identity.clone()))
            }
            (TypeSignature::List { element, length }, TraitReferenceNode::List(inner)) => {
                // (list length element-type)
                let element_expr = self.form(type_expr, "list", 1)?;
                Ok(TypeSignature::List {
                    element: Box::new(self.enrich(element, inner, element_expr)?),
                    length: *length,
                })
            }
            (TypeSignature::Optional(wrapped), TraitReferenceNode::Optional(inner)) => {
                let inner_expr = self.form(type_expr, "optional", 0)?;
                Ok(TypeSignature::Optional(Box::new(
                    self.enrich(wrapped, inner, inner_expr)?,
                )))
            }
            (
                TypeSignature::Response { ok, error },
                TraitReferenceNode::Response {
                    ok: ok_node,
                    error: error_node,
                },
            ) => {
                let ok = match ok_node {
                    Some(node) => self.enrich(ok, node, self.form(type_expr, "response", 0)?)?,
                    None => self.copy(ok)?,
                };
                let error = match error_node {
                    Some(node) => {
                        self.enrich(error, node, self.form(type_expr, "response", 1)?)?
                    }
                    None => self.copy(error)?,
                };
                Ok(TypeSignature::response(ok, error))
            }
            (TypeSignature::Tuple(fields), TraitReferenceNode::Tuple(nodes)) => {
                let entries = type_expr
                    .match_form("tuple")
                    .ok_or_else(|| self.unlocated())?;

                let mut enriched = Vec::with_capacity(fields.len());
                for field in fields {
                    let signature = match nodes.get(&field.name) {
                        Some(node) => {
                            let field_expr = parameter_type(entries, &field.name)
                                .ok_or_else(|| self.unlocated())?;
                            self.enrich(&field.signature, node, field_expr)?
                        }
                        None => self.copy(&field.signature)?,
                    };
                    enriched.push(TupleField {
                        name: field.name.clone(),
                        signature,
                    });
                }
                Ok(TypeSignature::Tuple(enriched))
            }
            _ => Err(self.unlocated()),
        }
    }

    fn copy(&self, signature: &RawType) -> Result<EnrichedType, TraitResolutionError> {
        copy_unreferenced(signature, self.function, self.parameter)
    }

    /// The child at `index` of a `(keyword ...)` type expression
    fn form<'e>(
        &self,
        type_expr: &'e SymbolicExpression,
        keyword: &str,
        index: usize,
    ) -> Result<&'e SymbolicExpression, TraitResolutionError> {
        type_expr
            .match_form(keyword)
            .and_then(|children| children.get(index))
            .ok_or_else(|| self.unlocated())
    }

    fn unlocated(&self) -> TraitResolutionError {
        TraitResolutionError::UnlocatedParameter {
            function: self.function.to_string(),
            parameter: self.parameter.to_string(),
        }
    }
}
