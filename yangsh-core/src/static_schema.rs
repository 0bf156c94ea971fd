//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::{BTreeMap, BTreeSet};

use indextree::{Arena, NodeId};

use crate::error::SchemaError;
use crate::path::{ModuleNodePair, SchemaPath, SchemaSuffix};
use crate::schema::{Identity, LeafType, NodeKind, Recursion, Schema, Status};

/// An in-memory schema tree built programmatically. Primarily a test
/// vehicle, but also good enough to drive an interactive session without a
/// real YANG context behind it.
pub struct StaticSchema {
    arena: Arena<SchemaEntry>,
    root: NodeId,
    modules: BTreeSet<String>,
    // Base identity to its directly derived identities.
    identities: BTreeMap<Identity, BTreeSet<Identity>>,
    enabled_features: BTreeSet<(String, String)>,
}

#[derive(Debug)]
struct SchemaEntry {
    module: String,
    name: String,
    data: NodeData,
    config: bool,
    description: Option<String>,
    units: Option<String>,
    default_value: Option<String>,
    status: Status,
    if_feature: Option<(String, String)>,
}

#[derive(Debug)]
enum NodeData {
    Root,
    Container { presence: bool },
    Leaf { leaf_type: LeafType },
    LeafList { leaf_type: LeafType },
    List { keys: Vec<String> },
    Rpc,
    Action,
}

// ===== impl StaticSchema =====

impl StaticSchema {
    pub fn new() -> StaticSchema {
        let mut arena = Arena::new();
        let root = arena.new_node(SchemaEntry::new(
            String::new(),
            String::new(),
            NodeData::Root,
        ));

        StaticSchema {
            arena,
            root,
            modules: BTreeSet::new(),
            identities: BTreeMap::new(),
            enabled_features: BTreeSet::new(),
        }
    }

    pub fn add_module(&mut self, name: &str) {
        self.modules.insert(name.to_owned());
    }

    pub fn add_container(&mut self, location: &str, name: &str) {
        self.add_node(location, name, NodeData::Container { presence: false });
    }

    pub fn add_presence_container(&mut self, location: &str, name: &str) {
        self.add_node(location, name, NodeData::Container { presence: true });
    }

    pub fn add_list(&mut self, location: &str, name: &str, keys: &[&str]) {
        let keys = keys.iter().map(|key| (*key).to_owned()).collect();
        self.add_node(location, name, NodeData::List { keys });
    }

    pub fn add_leaf(&mut self, location: &str, name: &str, leaf_type: LeafType) {
        self.add_node(location, name, NodeData::Leaf { leaf_type });
    }

    pub fn add_leaf_list(
        &mut self,
        location: &str,
        name: &str,
        leaf_type: LeafType,
    ) {
        self.add_node(location, name, NodeData::LeafList { leaf_type });
    }

    pub fn add_rpc(&mut self, location: &str, name: &str) {
        self.add_node(location, name, NodeData::Rpc);
    }

    pub fn add_action(&mut self, location: &str, name: &str) {
        self.add_node(location, name, NodeData::Action);
    }

    /// Registers an identity, optionally derived from a base identity.
    pub fn add_identity(
        &mut self,
        base: Option<(&str, &str)>,
        identity: (&str, &str),
    ) {
        let identity = (identity.0.to_owned(), identity.1.to_owned());
        self.identities.entry(identity.clone()).or_default();
        if let Some((module, name)) = base {
            self.identities
                .entry((module.to_owned(), name.to_owned()))
                .or_default()
                .insert(identity);
        }
    }

    /// All identities usable as a value of an identity-ref based on the
    /// given identity: the base itself plus everything transitively derived
    /// from it.
    pub fn valid_identities(
        &self,
        module: &str,
        name: &str,
    ) -> BTreeSet<Identity> {
        let mut out = BTreeSet::new();
        let mut stack = vec![(module.to_owned(), name.to_owned())];
        while let Some(identity) = stack.pop() {
            if out.insert(identity.clone())
                && let Some(derived) = self.identities.get(&identity)
            {
                stack.extend(derived.iter().cloned());
            }
        }
        out
    }

    pub fn enable_feature(&mut self, module: &str, feature: &str) {
        self.enabled_features
            .insert((module.to_owned(), feature.to_owned()));
    }

    /// Marks the node at `path` as conditional on a feature. Disabled nodes
    /// disappear from `available_nodes` and from direct lookups.
    pub fn set_if_feature(&mut self, path: &str, module: &str, feature: &str) {
        let node = self.locate(path);
        self.arena[node].get_mut().if_feature =
            Some((module.to_owned(), feature.to_owned()));
    }

    /// Marks the node at `path` as operational state (`config false`).
    pub fn set_config_false(&mut self, path: &str) {
        let node = self.locate(path);
        self.arena[node].get_mut().config = false;
    }

    pub fn set_description(&mut self, path: &str, description: &str) {
        let node = self.locate(path);
        self.arena[node].get_mut().description = Some(description.to_owned());
    }

    pub fn set_units(&mut self, path: &str, units: &str) {
        let node = self.locate(path);
        self.arena[node].get_mut().units = Some(units.to_owned());
    }

    pub fn set_default_value(&mut self, path: &str, value: &str) {
        let node = self.locate(path);
        self.arena[node].get_mut().default_value = Some(value.to_owned());
    }

    pub fn set_status(&mut self, path: &str, status: Status) {
        let node = self.locate(path);
        self.arena[node].get_mut().status = status;
    }

    fn add_node(&mut self, location: &str, name: &str, data: NodeData) {
        let parent = self.locate(location);
        let (module, name) = split_prefix(name);
        let module = module
            .map(str::to_owned)
            .or_else(|| {
                let entry = self.arena[parent].get();
                (!entry.module.is_empty()).then(|| entry.module.clone())
            })
            .expect("top-level schema nodes require a module prefix");
        assert!(
            self.modules.contains(&module),
            "unknown module \"{}\"",
            module
        );

        let entry = SchemaEntry::new(module, name.to_owned(), data);
        let node = self.arena.new_node(entry);
        parent.append(node, &mut self.arena);
    }

    // Resolves a builder location string ("/", "/example:a/a2", ...).
    fn locate(&self, location: &str) -> NodeId {
        let mut node = self.root;
        let mut module: Option<String> = None;
        for segment in location.split('/').filter(|s| !s.is_empty()) {
            let (prefix, name) = split_prefix(segment);
            if let Some(prefix) = prefix {
                module = Some(prefix.to_owned());
            }
            let module = module.as_deref().expect("missing module prefix");
            node = self
                .find_child(node, module, name)
                .unwrap_or_else(|| panic!("unknown node \"{}\"", segment));
        }
        node
    }

    fn find_child(
        &self,
        parent: NodeId,
        module: &str,
        name: &str,
    ) -> Option<NodeId> {
        parent.children(&self.arena).find(|child| {
            let entry = self.arena[*child].get();
            entry.module == module
                && entry.name == name
                && self.feature_enabled(entry)
        })
    }

    fn feature_enabled(&self, entry: &SchemaEntry) -> bool {
        match &entry.if_feature {
            Some(feature) => self.enabled_features.contains(feature),
            None => true,
        }
    }

    // Resolves a schema path against the tree. A segment without a prefix
    // inherits the module of the preceding segment.
    fn find_path(&self, path: &SchemaPath) -> Result<NodeId, SchemaError> {
        let mut node = self.root;
        let mut cur_module: Option<String> = None;
        for segment in &path.nodes {
            if let SchemaSuffix::Up = segment.suffix {
                node = self.arena[node].parent().unwrap_or(self.root);
                continue;
            }
            let name = segment.suffix.name().unwrap();
            let module = segment
                .prefix
                .clone()
                .or(cur_module)
                .ok_or_else(|| {
                    SchemaError::UnknownNode(name.to_owned())
                })?;
            node = self
                .find_child(node, &module, name)
                .ok_or_else(|| SchemaError::UnknownNode(name.to_owned()))?;
            cur_module = Some(module);
        }
        Ok(node)
    }

    fn find_node(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Result<NodeId, SchemaError> {
        let parent = self.find_path(location)?;
        // An omitted prefix means the module the location path ends in.
        let module = node
            .0
            .as_deref()
            .or_else(|| {
                location
                    .nodes
                    .iter()
                    .rev()
                    .find_map(|segment| segment.prefix.as_deref())
            })
            .ok_or_else(|| SchemaError::UnknownNode(node.1.clone()))?;
        self.find_child(parent, module, &node.1)
            .ok_or_else(|| SchemaError::UnknownNode(node.1.clone()))
    }

    fn collect_nodes(
        &self,
        parent: NodeId,
        top_module: Option<&str>,
        recursion: Recursion,
        out: &mut BTreeSet<ModuleNodePair>,
    ) {
        for child in parent.children(&self.arena).collect::<Vec<_>>() {
            let entry = self.arena[child].get();
            if !self.feature_enabled(entry) {
                continue;
            }
            let prefix = match top_module {
                Some(top) if entry.module == top => None,
                _ => Some(entry.module.clone()),
            };
            out.insert((prefix, entry.name.clone()));
            if recursion == Recursion::Recursive {
                self.collect_nodes(child, top_module, recursion, out);
            }
        }
    }
}

impl Default for StaticSchema {
    fn default() -> StaticSchema {
        StaticSchema::new()
    }
}

impl Schema for StaticSchema {
    fn is_module(&self, name: &str) -> bool {
        self.modules.contains(name)
    }

    fn node_kind(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Result<NodeKind, SchemaError> {
        let node = self.find_node(location, node)?;
        let kind = match &self.arena[node].get().data {
            NodeData::Root => return Err(SchemaError::UnknownNode(
                String::new(),
            )),
            NodeData::Container { presence: false } => NodeKind::Container,
            NodeData::Container { presence: true } => {
                NodeKind::PresenceContainer
            }
            NodeData::Leaf { .. } => NodeKind::Leaf,
            NodeData::LeafList { .. } => NodeKind::LeafList,
            NodeData::List { .. } => NodeKind::List,
            NodeData::Rpc => NodeKind::Rpc,
            NodeData::Action => NodeKind::Action,
        };
        Ok(kind)
    }

    fn is_config(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> bool {
        let Ok(mut node) = self.find_node(location, node) else {
            return false;
        };
        // Operational state propagates down the subtree.
        loop {
            if !self.arena[node].get().config {
                return false;
            }
            match self.arena[node].parent() {
                Some(parent) => node = parent,
                None => return true,
            }
        }
    }

    fn available_nodes(
        &self,
        path: &SchemaPath,
        recursion: Recursion,
    ) -> BTreeSet<ModuleNodePair> {
        let mut out = BTreeSet::new();
        let Ok(node) = self.find_path(path) else {
            return out;
        };
        // Below the root every child is named relative to the path's
        // top-level module; at the root everything is prefixed.
        let top_module = path.top_level_module();
        self.collect_nodes(node, top_module, recursion, &mut out);
        out
    }

    fn module_nodes(
        &self,
        module: &str,
        recursion: Recursion,
    ) -> BTreeSet<ModuleNodePair> {
        let mut out = BTreeSet::new();
        for child in self.root.children(&self.arena).collect::<Vec<_>>() {
            let entry = self.arena[child].get();
            if entry.module != module || !self.feature_enabled(entry) {
                continue;
            }
            out.insert((Some(entry.module.clone()), entry.name.clone()));
            if recursion == Recursion::Recursive {
                self.collect_nodes(child, Some(module), recursion, &mut out);
            }
        }
        out
    }

    fn list_keys(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Vec<String> {
        match self.find_node(location, node) {
            Ok(node) => match &self.arena[node].get().data {
                NodeData::List { keys } => keys.clone(),
                _ => Vec::new(),
            },
            Err(_) => Vec::new(),
        }
    }

    fn leaf_type(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Result<LeafType, SchemaError> {
        let found = self.find_node(location, node)?;
        match &self.arena[found].get().data {
            NodeData::Leaf { leaf_type } | NodeData::LeafList { leaf_type } => {
                Ok(leaf_type.clone())
            }
            _ => Err(SchemaError::UnknownNode(node.1.clone())),
        }
    }

    fn leafref_path(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Option<String> {
        match self.leaf_type(location, node) {
            Ok(LeafType::LeafRef { xpath, .. }) => Some(xpath),
            _ => None,
        }
    }

    fn description(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Option<String> {
        let node = self.find_node(location, node).ok()?;
        self.arena[node].get().description.clone()
    }

    fn units(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Option<String> {
        let node = self.find_node(location, node).ok()?;
        self.arena[node].get().units.clone()
    }

    fn default_value(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Option<String> {
        let node = self.find_node(location, node).ok()?;
        self.arena[node].get().default_value.clone()
    }

    fn status(
        &self,
        location: &SchemaPath,
        node: &ModuleNodePair,
    ) -> Status {
        match self.find_node(location, node) {
            Ok(node) => self.arena[node].get().status,
            Err(_) => Status::Current,
        }
    }
}

// ===== impl SchemaEntry =====

impl SchemaEntry {
    fn new(module: String, name: String, data: NodeData) -> SchemaEntry {
        SchemaEntry {
            module,
            name,
            data,
            config: true,
            description: None,
            units: None,
            default_value: None,
            status: Status::Current,
            if_feature: None,
        }
    }
}

// ===== helper functions =====

fn split_prefix(segment: &str) -> (Option<&str>, &str) {
    match segment.split_once(':') {
        Some((module, name)) => (Some(module), name),
        None => (None, segment),
    }
}
