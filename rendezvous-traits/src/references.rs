//! Trait reference map builder
//!
//! Walks every function's argument descriptors and keeps a sparse mirror of
//! each argument's shape: paths that reach a trait reference are retained and
//! labelled by composite kind, everything else is pruned. A function without
//! any trait reference does not appear in the map at all.

use crate::interface::{ContractInterfaceFunction, RawType, TypeSignature};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One retained position in an argument's type
///
/// Serializes to the interface-style shape used by test generation, e.g.
/// `"trait_reference"`, `{"list": "trait_reference"}` or
/// `{"response": {"ok": "trait_reference"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitReferenceNode {
    /// The sentinel: this position is itself a trait reference
    TraitReference,
    List(Box<TraitReferenceNode>),
    /// Only the fields that contain a trait reference, in declaration order
    Tuple(IndexMap<String, TraitReferenceNode>),
    Optional(Box<TraitReferenceNode>),
    /// Each branch is present only when it contains a trait reference
    Response {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ok: Option<Box<TraitReferenceNode>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<Box<TraitReferenceNode>>,
    },
}

impl TraitReferenceNode {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, TraitReferenceNode::TraitReference)
    }

    /// Number of trait-reference positions beneath this node
    pub fn leaf_count(&self) -> usize {
        match self {
            TraitReferenceNode::TraitReference => 1,
            TraitReferenceNode::List(inner) | TraitReferenceNode::Optional(inner) => {
                inner.leaf_count()
            }
            TraitReferenceNode::Tuple(fields) => fields.values().map(Self::leaf_count).sum(),
            TraitReferenceNode::Response { ok, error } => {
                ok.as_ref().map_or(0, |node| node.leaf_count())
                    + error.as_ref().map_or(0, |node| node.leaf_count())
            }
        }
    }
}

/// Argument name to retained shape, for the arguments of one function
pub type ParameterReferenceMap = IndexMap<String, TraitReferenceNode>;

/// Function name to its parameter reference map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitReferenceMap {
    functions: IndexMap<String, ParameterReferenceMap>,
}

impl TraitReferenceMap {
    /// Build the map for a contract's function list.
    ///
    /// Callers remove synthetic bookkeeping functions first; see
    /// [`crate::selection::analyzable_functions`].
    pub fn build(functions: &[ContractInterfaceFunction]) -> Self {
        let mut map = Self::default();

        for function in functions {
            let parameters: ParameterReferenceMap = function
                .args
                .iter()
                .filter_map(|arg| {
                    reference_shape(&arg.signature).map(|node| (arg.name.clone(), node))
                })
                .collect();

            if parameters.is_empty() {
                trace!(function = %function.name, "no trait references");
                continue;
            }

            debug!(
                function = %function.name,
                parameters = parameters.len(),
                "function takes trait references"
            );
            map.functions.insert(function.name.clone(), parameters);
        }

        map
    }

    pub fn get(&self, function: &str) -> Option<&ParameterReferenceMap> {
        self.functions.get(function)
    }

    pub fn contains_function(&self, function: &str) -> bool {
        self.functions.contains_key(function)
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterReferenceMap)> {
        self.functions
            .iter()
            .map(|(name, parameters)| (name.as_str(), parameters))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FromIterator<(String, ParameterReferenceMap)> for TraitReferenceMap {
    fn from_iter<I: IntoIterator<Item = (String, ParameterReferenceMap)>>(iter: I) -> Self {
        Self {
            functions: iter.into_iter().collect(),
        }
    }
}

/// Free-function form of [`TraitReferenceMap::build`]
pub fn build_trait_reference_map(functions: &[ContractInterfaceFunction]) -> TraitReferenceMap {
    TraitReferenceMap::build(functions)
}

/// The retained shape of one type descriptor, or `None` when it holds no
/// trait reference.
///
/// An argument that is itself a trait reference comes back as the bare
/// sentinel, with no wrapper. Unrecognized descriptors are primitives and
/// therefore never retained.
pub fn reference_shape(signature: &RawType) -> Option<TraitReferenceNode> {
    match signature {
        TypeSignature::Primitive(_) => None,
        TypeSignature::TraitReference(_) => Some(TraitReferenceNode::TraitReference),
        TypeSignature::List { element, .. } => {
            reference_shape(element).map(|node| TraitReferenceNode::List(Box::new(node)))
        }
        TypeSignature::Tuple(fields) => {
            let retained: IndexMap<_, _> = fields
                .iter()
                .filter_map(|field| {
                    reference_shape(&field.signature).map(|node| (field.name.clone(), node))
                })
                .collect();
            (!retained.is_empty()).then_some(TraitReferenceNode::Tuple(retained))
        }
        TypeSignature::Optional(inner) => {
            reference_shape(inner).map(|node| TraitReferenceNode::Optional(Box::new(node)))
        }
        TypeSignature::Response { ok, error } => {
            let ok = reference_shape(ok).map(Box::new);
            let error = reference_shape(error).map(Box::new);
            if ok.is_none() && error.is_none() {
                None
            } else {
                Some(TraitReferenceNode::Response { ok, error })
            }
        }
    }
}
