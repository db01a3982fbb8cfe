//! Contract interface model
//!
//! Function signatures as reported by the compiled-contract layer, in the
//! contract interface ABI JSON format. Parameter types are a closed sum type
//! whose trait-reference leaf is a type parameter: raw interfaces carry the
//! bare [`TraitSlot`] sentinel, enriched interfaces carry a full
//! [`TraitIdentity`]. A raw interface therefore cannot hold identity data.

use crate::error::InterfaceError;
use indexmap::IndexSet;
use rendezvous_syntax::{TraitDefinition, TraitIdentifier};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use tracing::debug;

/// The bare trait-reference sentinel of a raw interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TraitSlot;

/// Full identity of a trait: its declared name and where it is defined
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraitIdentity {
    pub name: String,
    #[serde(rename = "import")]
    pub origin: TraitDefinition,
}

impl TraitIdentity {
    pub fn from_definition(origin: TraitDefinition) -> Self {
        Self {
            name: origin.identifier().name.clone(),
            origin,
        }
    }

    pub fn imported(identifier: TraitIdentifier) -> Self {
        Self::from_definition(TraitDefinition::Imported(identifier))
    }

    pub fn defined(identifier: TraitIdentifier) -> Self {
        Self::from_definition(TraitDefinition::Defined(identifier))
    }

    /// The trait as named by the contract defining it
    pub fn identifier(&self) -> &TraitIdentifier {
        self.origin.identifier()
    }
}

impl fmt::Display for TraitIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.origin)
    }
}

/// Leaf types that contain no trait reference
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveType {
    Int128,
    UInt128,
    Bool,
    Principal,
    NoType,
    Buffer { length: u32 },
    StringAscii { length: u32 },
    StringUtf8 { length: u32 },
    /// A descriptor this engine does not know; never treated as a trait reference
    Unrecognized(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "L: TraitLeaf",
    deserialize = "TypeSignature<L>: Deserialize<'de>"
))]
pub struct TupleField<L = TraitSlot> {
    pub name: String,
    #[serde(rename = "type")]
    pub signature: TypeSignature<L>,
}

/// A parameter or return type descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSignature<L = TraitSlot> {
    Primitive(PrimitiveType),
    TraitReference(L),
    List {
        element: Box<TypeSignature<L>>,
        length: u32,
    },
    Tuple(Vec<TupleField<L>>),
    Optional(Box<TypeSignature<L>>),
    Response {
        ok: Box<TypeSignature<L>>,
        error: Box<TypeSignature<L>>,
    },
}

/// Type descriptor as found in a compiled contract's interface
pub type RawType = TypeSignature<TraitSlot>;

/// Type descriptor whose trait references carry their resolved identity
pub type EnrichedType = TypeSignature<TraitIdentity>;

impl<L> TypeSignature<L> {
    pub fn list(element: TypeSignature<L>, length: u32) -> Self {
        TypeSignature::List {
            element: Box::new(element),
            length,
        }
    }

    pub fn optional(inner: TypeSignature<L>) -> Self {
        TypeSignature::Optional(Box::new(inner))
    }

    pub fn response(ok: TypeSignature<L>, error: TypeSignature<L>) -> Self {
        TypeSignature::Response {
            ok: Box::new(ok),
            error: Box::new(error),
        }
    }

    pub fn tuple<N: Into<String>>(fields: impl IntoIterator<Item = (N, TypeSignature<L>)>) -> Self {
        TypeSignature::Tuple(
            fields
                .into_iter()
                .map(|(name, signature)| TupleField {
                    name: name.into(),
                    signature,
                })
                .collect(),
        )
    }

    /// Rebuild the descriptor with every trait-reference leaf replaced by `f`.
    ///
    /// Composite structure, field names, list lengths and primitive leaves are
    /// copied unchanged.
    pub fn try_map_leaves<M, E, F>(&self, f: &mut F) -> Result<TypeSignature<M>, E>
    where
        F: FnMut(&L) -> Result<M, E>,
    {
        Ok(match self {
            TypeSignature::Primitive(primitive) => TypeSignature::Primitive(primitive.clone()),
            TypeSignature::TraitReference(leaf) => TypeSignature::TraitReference(f(leaf)?),
            TypeSignature::List { element, length } => TypeSignature::List {
                element: Box::new(element.try_map_leaves(f)?),
                length: *length,
            },
            TypeSignature::Tuple(fields) => {
                let mut mapped = Vec::with_capacity(fields.len());
                for field in fields {
                    mapped.push(TupleField {
                        name: field.name.clone(),
                        signature: field.signature.try_map_leaves(f)?,
                    });
                }
                TypeSignature::Tuple(mapped)
            }
            TypeSignature::Optional(inner) => {
                TypeSignature::Optional(Box::new(inner.try_map_leaves(f)?))
            }
            TypeSignature::Response { ok, error } => TypeSignature::Response {
                ok: Box::new(ok.try_map_leaves(f)?),
                error: Box::new(error.try_map_leaves(f)?),
            },
        })
    }

    pub fn map_leaves<M>(&self, mut f: impl FnMut(&L) -> M) -> TypeSignature<M> {
        match self.try_map_leaves(&mut |leaf: &L| Ok::<M, Infallible>(f(leaf))) {
            Ok(mapped) => mapped,
            Err(never) => match never {},
        }
    }

    /// The same descriptor with every trait reference reduced to the bare sentinel
    pub fn erase(&self) -> RawType {
        self.map_leaves(|_| TraitSlot)
    }

    /// Copy a descriptor holding no trait reference into any leaf type.
    ///
    /// Returns `None` when a trait-reference leaf is present.
    pub fn without_trait_slots<M>(&self) -> Option<TypeSignature<M>> {
        self.try_map_leaves(&mut |_: &L| Err(())).ok()
    }

    /// Every trait-reference leaf, depth first, ok branch before error branch
    pub fn trait_leaves(&self) -> Vec<&L> {
        let mut leaves = Vec::new();
        self.collect_trait_leaves(&mut leaves);
        leaves
    }

    fn collect_trait_leaves<'a>(&'a self, leaves: &mut Vec<&'a L>) {
        match self {
            TypeSignature::Primitive(_) => {}
            TypeSignature::TraitReference(leaf) => leaves.push(leaf),
            TypeSignature::List { element, .. } => element.collect_trait_leaves(leaves),
            TypeSignature::Tuple(fields) => {
                for field in fields {
                    field.signature.collect_trait_leaves(leaves);
                }
            }
            TypeSignature::Optional(inner) => inner.collect_trait_leaves(leaves),
            TypeSignature::Response { ok, error } => {
                ok.collect_trait_leaves(leaves);
                error.collect_trait_leaves(leaves);
            }
        }
    }

    pub fn contains_trait_reference(&self) -> bool {
        !self.trait_leaves().is_empty()
    }
}

impl RawType {
    pub fn trait_reference() -> Self {
        TypeSignature::TraitReference(TraitSlot)
    }
}

/// How a trait-reference leaf is written in interface JSON
pub trait TraitLeaf {
    fn serialize_leaf<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>;
}

impl TraitLeaf for TraitSlot {
    fn serialize_leaf<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(TRAIT_REFERENCE_TAG)
    }
}

impl TraitLeaf for TraitIdentity {
    fn serialize_leaf<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        single_entry(serializer, TRAIT_REFERENCE_TAG, self)
    }
}

const TRAIT_REFERENCE_TAG: &str = "trait_reference";

fn single_entry<S, V>(serializer: S, key: &str, value: &V) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

#[derive(Serialize, Deserialize)]
struct LengthRepr {
    length: u32,
}

impl Serialize for PrimitiveType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PrimitiveType::Int128 => serializer.serialize_str("int128"),
            PrimitiveType::UInt128 => serializer.serialize_str("uint128"),
            PrimitiveType::Bool => serializer.serialize_str("bool"),
            PrimitiveType::Principal => serializer.serialize_str("principal"),
            PrimitiveType::NoType => serializer.serialize_str("none"),
            PrimitiveType::Buffer { length } => {
                single_entry(serializer, "buffer", &LengthRepr { length: *length })
            }
            PrimitiveType::StringAscii { length } => {
                single_entry(serializer, "string-ascii", &LengthRepr { length: *length })
            }
            PrimitiveType::StringUtf8 { length } => {
                single_entry(serializer, "string-utf8", &LengthRepr { length: *length })
            }
            PrimitiveType::Unrecognized(value) => value.serialize(serializer),
        }
    }
}

#[derive(Serialize)]
#[serde(bound(serialize = "L: TraitLeaf"))]
struct ListRepr<'a, L> {
    #[serde(rename = "type")]
    signature: &'a TypeSignature<L>,
    length: u32,
}

#[derive(Serialize)]
#[serde(bound(serialize = "L: TraitLeaf"))]
struct ResponseRepr<'a, L> {
    ok: &'a TypeSignature<L>,
    error: &'a TypeSignature<L>,
}

impl<L: TraitLeaf> Serialize for TypeSignature<L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TypeSignature::Primitive(primitive) => primitive.serialize(serializer),
            TypeSignature::TraitReference(leaf) => leaf.serialize_leaf(serializer),
            TypeSignature::List { element, length } => single_entry(
                serializer,
                "list",
                &ListRepr {
                    signature: element.as_ref(),
                    length: *length,
                },
            ),
            TypeSignature::Tuple(fields) => single_entry(serializer, "tuple", fields),
            TypeSignature::Optional(inner) => single_entry(serializer, "optional", inner),
            TypeSignature::Response { ok, error } => single_entry(
                serializer,
                "response",
                &ResponseRepr {
                    ok: ok.as_ref(),
                    error: error.as_ref(),
                },
            ),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTypeRepr {
    Tag(String),
    Composite(CompositeRepr),
    Unrecognized(serde_json::Value),
}

#[derive(Deserialize)]
enum CompositeRepr {
    #[serde(rename = "buffer")]
    Buffer(LengthRepr),
    #[serde(rename = "string-ascii")]
    StringAscii(LengthRepr),
    #[serde(rename = "string-utf8")]
    StringUtf8(LengthRepr),
    #[serde(rename = "list")]
    List {
        #[serde(rename = "type")]
        signature: Box<RawType>,
        length: u32,
    },
    #[serde(rename = "tuple")]
    Tuple(Vec<TupleField>),
    #[serde(rename = "optional")]
    Optional(Box<RawType>),
    #[serde(rename = "response")]
    Response { ok: Box<RawType>, error: Box<RawType> },
}

impl<'de> Deserialize<'de> for RawType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawTypeRepr::deserialize(deserializer)? {
            RawTypeRepr::Tag(tag) => match tag.as_str() {
                "int128" => TypeSignature::Primitive(PrimitiveType::Int128),
                "uint128" => TypeSignature::Primitive(PrimitiveType::UInt128),
                "bool" => TypeSignature::Primitive(PrimitiveType::Bool),
                "principal" => TypeSignature::Primitive(PrimitiveType::Principal),
                "none" => TypeSignature::Primitive(PrimitiveType::NoType),
                TRAIT_REFERENCE_TAG => TypeSignature::TraitReference(TraitSlot),
                _ => unrecognized(serde_json::Value::String(tag)),
            },
            RawTypeRepr::Composite(composite) => match composite {
                CompositeRepr::Buffer(LengthRepr { length }) => {
                    TypeSignature::Primitive(PrimitiveType::Buffer { length })
                }
                CompositeRepr::StringAscii(LengthRepr { length }) => {
                    TypeSignature::Primitive(PrimitiveType::StringAscii { length })
                }
                CompositeRepr::StringUtf8(LengthRepr { length }) => {
                    TypeSignature::Primitive(PrimitiveType::StringUtf8 { length })
                }
                CompositeRepr::List { signature, length } => TypeSignature::List {
                    element: signature,
                    length,
                },
                CompositeRepr::Tuple(fields) => TypeSignature::Tuple(fields),
                CompositeRepr::Optional(inner) => TypeSignature::Optional(inner),
                CompositeRepr::Response { ok, error } => TypeSignature::Response { ok, error },
            },
            RawTypeRepr::Unrecognized(value) => unrecognized(value),
        })
    }
}

fn unrecognized(value: serde_json::Value) -> RawType {
    debug!(descriptor = %value, "unrecognized type descriptor, treating it as a plain value");
    TypeSignature::Primitive(PrimitiveType::Unrecognized(value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionAccess {
    Public,
    ReadOnly,
    Private,
}

impl fmt::Display for FunctionAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionAccess::Public => write!(f, "public"),
            FunctionAccess::ReadOnly => write!(f, "read_only"),
            FunctionAccess::Private => write!(f, "private"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "L: TraitLeaf",
    deserialize = "TypeSignature<L>: Deserialize<'de>"
))]
pub struct FunctionArg<L = TraitSlot> {
    pub name: String,
    #[serde(rename = "type")]
    pub signature: TypeSignature<L>,
}

impl<L> FunctionArg<L> {
    pub fn new(name: impl Into<String>, signature: TypeSignature<L>) -> Self {
        Self {
            name: name.into(),
            signature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionOutput {
    #[serde(rename = "type")]
    pub signature: RawType,
}

/// One exported function of a contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "L: TraitLeaf",
    deserialize = "TypeSignature<L>: Deserialize<'de>"
))]
pub struct FunctionInterface<L = TraitSlot> {
    pub name: String,
    pub access: FunctionAccess,
    pub args: Vec<FunctionArg<L>>,
    pub outputs: FunctionOutput,
}

/// A function exactly as reported by the compiled contract
pub type ContractInterfaceFunction = FunctionInterface<TraitSlot>;

/// A function whose trait-typed parameters carry their resolved identity
pub type EnrichedFunctionInterface = FunctionInterface<TraitIdentity>;

impl<L> FunctionInterface<L> {
    pub fn new(
        name: impl Into<String>,
        access: FunctionAccess,
        args: Vec<FunctionArg<L>>,
        output: RawType,
    ) -> Self {
        Self {
            name: name.into(),
            access,
            args,
            outputs: FunctionOutput { signature: output },
        }
    }

    pub fn arg(&self, name: &str) -> Option<&FunctionArg<L>> {
        self.args.iter().find(|arg| arg.name == name)
    }

    /// The function with every trait reference reduced to the bare sentinel
    pub fn erase(&self) -> ContractInterfaceFunction {
        FunctionInterface {
            name: self.name.clone(),
            access: self.access,
            args: self
                .args
                .iter()
                .map(|arg| FunctionArg::new(arg.name.clone(), arg.signature.erase()))
                .collect(),
            outputs: self.outputs.clone(),
        }
    }
}

impl EnrichedFunctionInterface {
    /// Distinct trait identities across all parameters, in parameter order
    pub fn trait_identities(&self) -> IndexSet<&TraitIdentity> {
        self.args
            .iter()
            .flat_map(|arg| arg.signature.trait_leaves())
            .collect()
    }
}

/// The function section of a compiled contract's interface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractInterface {
    pub functions: Vec<ContractInterfaceFunction>,
}

impl ContractInterface {
    /// Decode interface JSON; sections other than `functions` are ignored
    pub fn from_json(json: &str) -> Result<Self, InterfaceError> {
        Ok(serde_json::from_str(json)?)
    }
}
