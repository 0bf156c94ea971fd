//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;

use crate::error::SchemaError;
use crate::path::{ModuleNodePair, SchemaPath};

/// An identity: defining module plus name.
pub type Identity = (String, String);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeKind {
    Action,
    Container,
    Leaf,
    LeafList,
    List,
    PresenceContainer,
    Rpc,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Status {
    #[default]
    Current,
    Deprecated,
    Obsolete,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Recursion {
    NonRecursive,
    Recursive,
}

/// A leaf type, resolved through typedefs. Leaf-refs keep both the target
/// xpath and the (recursively resolved) target type; the chain always
/// terminates at a non-leafref type, cycles are a schema-loading error and
/// never reach this representation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeafType {
    String,
    Bool,
    Empty,
    Binary,
    InstanceIdentifier,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Decimal64 { fraction_digits: u8 },
    Enumeration(BTreeSet<String>),
    Bits(BTreeSet<String>),
    IdentityRef(BTreeSet<Identity>),
    LeafRef { xpath: String, target: Box<LeafType> },
    Union(Vec<LeafType>),
}

// ===== impl LeafType =====

impl LeafType {
    /// Follows leaf-ref indirections down to the terminal type.
    pub fn resolved(&self) -> &LeafType {
        match self {
            LeafType::LeafRef { target, .. } => target.resolved(),
            other => other,
        }
    }

    /// Human description used in type-mismatch diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            LeafType::String => "a string",
            LeafType::Bool => "a boolean",
            LeafType::Empty => "an empty leaf",
            LeafType::Binary => "a base64-encoded binary value",
            LeafType::InstanceIdentifier => "an instance identifier",
            LeafType::Int8 => "an 8-bit integer",
            LeafType::Int16 => "a 16-bit integer",
            LeafType::Int32 => "a 32-bit integer",
            LeafType::Int64 => "a 64-bit integer",
            LeafType::Uint8 => "an 8-bit unsigned integer",
            LeafType::Uint16 => "a 16-bit unsigned integer",
            LeafType::Uint32 => "a 32-bit unsigned integer",
            LeafType::Uint64 => "a 64-bit unsigned integer",
            LeafType::Decimal64 { .. } => "a decimal",
            LeafType::Enumeration(_) => "an enum",
            LeafType::Bits(_) => "a bit field",
            LeafType::IdentityRef(_) => "an identity",
            LeafType::LeafRef { .. } => "a leafref",
            LeafType::Union(_) => "a union",
        }
    }
}

/// Read-only schema facade consumed by the parser and the completion
/// engine. Node arguments follow the usual split: a schema `location` plus
/// the queried child as a (prefix, name) pair, where an omitted prefix is
/// canonicalized against the location's top-level module.
pub trait Schema: Sync {
    fn is_module(&self, name: &str) -> bool;

    fn node_kind(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Result<NodeKind, SchemaError>;

    /// Whether the node holds configuration (as opposed to operational
    /// state).
    fn is_config(&self, location: &SchemaPath, node: &ModuleNodePair)
    -> bool;

    /// Child nodes at `path`, honoring enabled features. Children living in
    /// the same module as the path's top-level module come back without a
    /// prefix; everything else is prefixed.
    fn available_nodes(
        &self,
        path: &SchemaPath,
        recursion: Recursion,
    ) -> BTreeSet<ModuleNodePair>;

    /// Top-level nodes of a module, for the `module:*` listing form.
    fn module_nodes(
        &self,
        module: &str,
        recursion: Recursion,
    ) -> BTreeSet<ModuleNodePair>;

    /// Key leaf names of a list, in declared order.
    fn list_keys(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Vec<String>;

    fn leaf_type(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Result<LeafType, SchemaError>;

    /// Canonical target path of a leaf-ref leaf.
    fn leafref_path(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Option<String>;

    fn description(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Option<String>;

    fn units(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Option<String>;

    fn default_value(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Option<String>;

    fn status(&self, location: &SchemaPath, node: &ModuleNodePair)
    -> Status;

    fn list_has_key(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
        key: &str,
    ) -> bool {
        self.list_keys(location, node).iter().any(|k| k == key)
    }

    /// The set of identities assignable to an identity-ref leaf, including
    /// the base identity itself.
    fn identities(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> BTreeSet<Identity> {
        match self.leaf_type(location, node) {
            Ok(leaf_type) => match leaf_type.resolved() {
                LeafType::IdentityRef(allowed) => allowed.clone(),
                _ => BTreeSet::new(),
            },
            Err(_) => BTreeSet::new(),
        }
    }

    /// Whether `module:name` (with `fallback_module` standing in for an
    /// omitted prefix) is derived from the leaf's base identity.
    fn identity_is_valid(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
        module: Option<&str>,
        name: &str,
        fallback_module: Option<&str>,
    ) -> bool {
        let Some(module) = module.or(fallback_module) else {
            return false;
        };
        self.identities(location, node)
            .contains(&(module.to_owned(), name.to_owned()))
    }
}
