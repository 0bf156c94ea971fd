//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::fmt;

use derive_new::new;
use enum_as_inner::EnumAsInner;

use crate::value::{self, Value};

/// Key instance of a list element: key leaf name to parsed value.
pub type ListKeys = BTreeMap<String, Value>;

/// A node identifier as used for schema queries: optional module prefix plus
/// local name. A `None` module is canonicalized against the top-level module
/// of the path it appears in.
pub type ModuleNodePair = (Option<String>, String);

#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub enum Scope {
    Absolute,
    #[default]
    Relative,
}

/// Module prefix rendering policy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Prefixes {
    Always,
    WhenNeeded,
}

/// Segment payload of a schema path. Lists and leaf-lists are key-less.
#[derive(Clone, Debug, Eq, PartialEq, EnumAsInner)]
pub enum SchemaSuffix {
    Up,
    Container(String),
    Leaf(String),
    LeafList(String),
    List(String),
    Rpc(String),
    Action(String),
}

/// Segment payload of a data path. Lists may carry key instances and
/// leaf-lists a selected value.
#[derive(Clone, Debug, Eq, PartialEq, EnumAsInner)]
pub enum DataSuffix {
    Up,
    Container(String),
    Leaf(String),
    LeafList(String),
    LeafListElement(String, Value),
    List(String),
    ListElement(String, ListKeys),
    Rpc(String),
    Action(String),
}

#[derive(Clone, Debug, Eq, PartialEq, new)]
pub struct SchemaNode {
    pub prefix: Option<String>,
    pub suffix: SchemaSuffix,
}

#[derive(Clone, Debug, Eq, PartialEq, new)]
pub struct DataNode {
    pub prefix: Option<String>,
    pub suffix: DataSuffix,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, new)]
pub struct SchemaPath {
    pub scope: Scope,
    pub nodes: Vec<SchemaNode>,
    pub trailing_slash: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, new)]
pub struct DataPath {
    pub scope: Scope,
    pub nodes: Vec<DataNode>,
    pub trailing_slash: bool,
}

// ===== impl SchemaSuffix =====

impl SchemaSuffix {
    pub fn name(&self) -> Option<&str> {
        match self {
            SchemaSuffix::Up => None,
            SchemaSuffix::Container(name)
            | SchemaSuffix::Leaf(name)
            | SchemaSuffix::LeafList(name)
            | SchemaSuffix::List(name)
            | SchemaSuffix::Rpc(name)
            | SchemaSuffix::Action(name) => Some(name),
        }
    }
}

// ===== impl DataSuffix =====

impl DataSuffix {
    pub fn name(&self) -> Option<&str> {
        match self {
            DataSuffix::Up => None,
            DataSuffix::Container(name)
            | DataSuffix::Leaf(name)
            | DataSuffix::LeafList(name)
            | DataSuffix::LeafListElement(name, _)
            | DataSuffix::List(name)
            | DataSuffix::ListElement(name, _)
            | DataSuffix::Rpc(name)
            | DataSuffix::Action(name) => Some(name),
        }
    }
}

// ===== impl DataNode =====

impl DataNode {
    pub fn to_schema_node(&self) -> SchemaNode {
        let suffix = match &self.suffix {
            DataSuffix::Up => SchemaSuffix::Up,
            DataSuffix::Container(name) => {
                SchemaSuffix::Container(name.clone())
            }
            DataSuffix::Leaf(name) => SchemaSuffix::Leaf(name.clone()),
            DataSuffix::LeafList(name)
            | DataSuffix::LeafListElement(name, _) => {
                SchemaSuffix::LeafList(name.clone())
            }
            DataSuffix::List(name) | DataSuffix::ListElement(name, _) => {
                SchemaSuffix::List(name.clone())
            }
            DataSuffix::Rpc(name) => SchemaSuffix::Rpc(name.clone()),
            DataSuffix::Action(name) => SchemaSuffix::Action(name.clone()),
        };
        SchemaNode::new(self.prefix.clone(), suffix)
    }
}

// ===== impl SchemaPath =====

impl SchemaPath {
    /// The absolute root path.
    pub fn root() -> SchemaPath {
        SchemaPath::new(Scope::Absolute, Vec::new(), false)
    }

    pub fn push(&mut self, node: SchemaNode) {
        self.nodes.push(node);
    }

    pub fn pop(&mut self) -> Option<SchemaNode> {
        self.nodes.pop()
    }

    /// The module every segment without an explicit prefix resolves against.
    pub fn top_level_module(&self) -> Option<&str> {
        self.nodes.iter().find_map(|node| node.prefix.as_deref())
    }

    pub fn to_path_string(&self, prefixes: Prefixes) -> String {
        render_path(
            self.scope,
            self.trailing_slash,
            prefixes,
            self.nodes.iter().map(|node| {
                (node.prefix.as_deref(), node.suffix.name(), None, None)
            }),
        )
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string(Prefixes::WhenNeeded))
    }
}

// ===== impl DataPath =====

impl DataPath {
    /// The absolute root path.
    pub fn root() -> DataPath {
        DataPath::new(Scope::Absolute, Vec::new(), false)
    }

    pub fn push(&mut self, node: DataNode) {
        self.nodes.push(node);
    }

    pub fn pop(&mut self) -> Option<DataNode> {
        self.nodes.pop()
    }

    /// The module every segment without an explicit prefix resolves against.
    pub fn top_level_module(&self) -> Option<&str> {
        self.nodes.iter().find_map(|node| node.prefix.as_deref())
    }

    /// Erases key values, turning the data path into its schema path.
    pub fn to_schema_path(&self) -> SchemaPath {
        SchemaPath::new(
            self.scope,
            self.nodes.iter().map(DataNode::to_schema_node).collect(),
            self.trailing_slash,
        )
    }

    pub fn to_path_string(&self, prefixes: Prefixes) -> String {
        render_path(
            self.scope,
            self.trailing_slash,
            prefixes,
            self.nodes.iter().map(|node| {
                let (keys, value) = match &node.suffix {
                    DataSuffix::ListElement(_, keys) => (Some(keys), None),
                    DataSuffix::LeafListElement(_, value) => {
                        (None, Some(value))
                    }
                    _ => (None, None),
                };
                (node.prefix.as_deref(), node.suffix.name(), keys, value)
            }),
        )
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string(Prefixes::WhenNeeded))
    }
}

// ===== helper functions =====

type RenderSegment<'a> = (
    Option<&'a str>,
    Option<&'a str>,
    Option<&'a ListKeys>,
    Option<&'a Value>,
);

fn render_path<'a>(
    scope: Scope,
    trailing_slash: bool,
    prefixes: Prefixes,
    segments: impl Iterator<Item = RenderSegment<'a>>,
) -> String {
    let mut out = String::new();
    if scope == Scope::Absolute {
        out.push('/');
    }

    let mut prev_module = None;
    let mut first = true;
    let mut empty = true;
    for (prefix, name, keys, value) in segments {
        empty = false;
        if !first {
            out.push('/');
        }
        first = false;

        // Parent steps carry no name and no prefix.
        let Some(name) = name else {
            out.push_str("..");
            continue;
        };

        let module = prefix.or(prev_module);
        let emitted = match prefixes {
            Prefixes::Always => module,
            Prefixes::WhenNeeded => {
                if module != prev_module {
                    module
                } else {
                    None
                }
            }
        };
        if let Some(module) = emitted {
            out.push_str(module);
            out.push(':');
        }
        out.push_str(name);

        if let Some(keys) = keys {
            for (key, value) in keys {
                out.push('[');
                out.push_str(key);
                out.push('=');
                out.push_str(&value::render_key_value(value));
                out.push(']');
            }
        }
        if let Some(value) = value {
            out.push_str("[.=");
            out.push_str(&value::render_key_value(value));
            out.push(']');
        }

        prev_module = module;
    }

    if trailing_slash && !empty {
        out.push('/');
    }
    out
}
