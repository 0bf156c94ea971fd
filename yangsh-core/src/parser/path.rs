//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use itertools::Itertools;

use crate::completion::{Completion, WhenToAdd};
use crate::parser::context::{Context, Failure, PResult};
use crate::parser::input::Input;
use crate::parser::leaf_value::leaf_value;
use crate::path::{
    DataNode, DataPath, DataSuffix, ListKeys, ModuleNodePair, Scope,
    SchemaNode, SchemaPath, SchemaSuffix,
};
use crate::schema::{NodeKind, Recursion};
use crate::value::render_key_value;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PathKind {
    Data,
    Schema,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ListTail {
    Allow,
    Disallow,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RpcNodes {
    Allow,
    Disallow,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Trailing {
    Allow,
    Disallow,
}

/// Shape of the path grammar a command asks for.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PathSpec {
    pub(crate) kind: PathKind,
    pub(crate) tail: ListTail,
    pub(crate) rpcs: RpcNodes,
    pub(crate) trailing: Trailing,
}

struct Candidate {
    module: Option<String>,
    name: String,
    kind: NodeKind,
}

// ===== impl PathSpec =====

impl PathSpec {
    /// Plain data path: lists must carry keys.
    pub(crate) fn data() -> PathSpec {
        PathSpec {
            kind: PathKind::Data,
            tail: ListTail::Disallow,
            rpcs: RpcNodes::Disallow,
            trailing: Trailing::Disallow,
        }
    }

    /// Data path that may end in a bare (leaf-)list, for `ls` and `get`.
    pub(crate) fn data_list_end() -> PathSpec {
        PathSpec {
            tail: ListTail::Allow,
            trailing: Trailing::Allow,
            ..PathSpec::data()
        }
    }

    /// Data path ending in an RPC or action.
    pub(crate) fn rpc() -> PathSpec {
        PathSpec {
            rpcs: RpcNodes::Allow,
            ..PathSpec::data()
        }
    }

    fn schema(rpcs: RpcNodes) -> PathSpec {
        PathSpec {
            kind: PathKind::Schema,
            tail: ListTail::Allow,
            rpcs,
            trailing: Trailing::Allow,
        }
    }
}

// ===== global functions =====

pub(crate) fn data_path(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    spec: PathSpec,
) -> PResult<DataPath> {
    parse_path(ctx, input, spec)
}

pub(crate) fn schema_path(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    rpcs: RpcNodes,
) -> PResult<SchemaPath> {
    let path = parse_path(ctx, input, PathSpec::schema(rpcs))?;
    Ok(path.to_schema_path())
}

fn parse_path(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    spec: PathSpec,
) -> PResult<DataPath> {
    ctx.reset_path();
    let start = *input;
    let mut scope = Scope::Relative;
    let mut nodes = Vec::new();
    let mut trailing = false;
    // Expectation points: once a separator or a list suffix went by, a
    // failing segment is an error rather than a backtrack.
    let mut committed = false;

    if input.eat_char('/') {
        scope = Scope::Absolute;
        ctx.clear_path();
        if path_end(input) {
            // Bare "/" names the root itself.
            probe_candidates(ctx, input, spec);
            return Ok(DataPath::new(scope, nodes, false));
        }
    }

    loop {
        let seg_start = input.pos();
        let node = match parse_node(ctx, input, spec) {
            Ok(node) => node,
            Err(Failure::Soft) => {
                if committed {
                    let word = unknown_word(input);
                    return Err(ctx.fail(
                        seg_start,
                        format!("Unknown node \"{}\".", word),
                    ));
                }
                *input = start;
                ctx.reset_path();
                return Err(Failure::Soft);
            }
            Err(Failure::Hard) => return Err(Failure::Hard),
        };

        if matches!(
            node.suffix,
            DataSuffix::ListElement(..) | DataSuffix::LeafListElement(..)
        ) {
            committed = true;
        }
        // RPCs/actions always close a path; in a data path, a bare
        // (leaf-)list does too. Schema paths navigate through lists.
        let terminal = match node.suffix {
            DataSuffix::Rpc(_) | DataSuffix::Action(_) => true,
            DataSuffix::List(_) | DataSuffix::LeafList(_) => {
                spec.kind == PathKind::Data
            }
            _ => false,
        };
        ctx.push_segment(&node);
        nodes.push(node);
        if terminal {
            break;
        }

        if input.eat_char('/') {
            if path_end(input) {
                trailing = true;
                probe_candidates(ctx, input, spec);
                break;
            }
            committed = true;
            continue;
        }
        break;
    }

    if !path_end(input) {
        if committed {
            return Err(ctx.fail(input.pos(), "Expected \"/\" here:"));
        }
        *input = start;
        ctx.reset_path();
        return Err(Failure::Soft);
    }
    if trailing && spec.trailing == Trailing::Disallow {
        return Err(ctx.fail(input.pos() - 1, "Unexpected trailing slash."));
    }
    Ok(DataPath::new(scope, nodes, trailing))
}

fn parse_node(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    spec: PathSpec,
) -> PResult<DataNode> {
    let seg_start = input.pos();
    let cands = candidates(ctx, spec);
    publish_candidates(ctx, seg_start, &cands);

    // Parent step. Accepted by the grammar, never suggested.
    {
        let mut probe = *input;
        if probe.eat("..") && segment_end(&probe) {
            *input = probe;
            ctx.last_segment = seg_start;
            return Ok(DataNode::new(None, DataSuffix::Up));
        }
    }

    let save = *input;
    let prefix = input.module_prefix().map(str::to_owned);
    let Some(name) = input.identifier() else {
        *input = save;
        return Err(Failure::Soft);
    };

    // Resolve the typed name against the candidate set after
    // canonicalizing modules: a candidate without a prefix lives in the
    // path's top-level module, an omitted prefix in the input means the
    // module of the preceding segment. The first segment of a path always
    // needs its prefix spelled out.
    let top_module = ctx.path.top_level_module().map(str::to_owned);
    let cur_module = ctx
        .path
        .nodes
        .iter()
        .rev()
        .find_map(|node| node.prefix.as_deref())
        .map(str::to_owned);
    let candidate = cands.iter().find(|cand| {
        let cand_module =
            cand.module.as_deref().or(top_module.as_deref());
        let typed_module = prefix.as_deref().or(cur_module.as_deref());
        cand.name == name
            && typed_module.is_some()
            && typed_module == cand_module
    });
    let Some(candidate) = candidate else {
        *input = save;
        return Err(Failure::Soft);
    };
    // The module the node actually lives in, for schema queries.
    let module = candidate.module.clone().or(top_module);

    ctx.last_segment = seg_start;
    let name = name.to_owned();
    match candidate.kind {
        NodeKind::Container | NodeKind::PresenceContainer => {
            Ok(DataNode::new(prefix, DataSuffix::Container(name)))
        }
        NodeKind::Leaf => {
            ctx.tmp_leaf =
                Some((ctx.schema_path(), (module, name.clone())));
            Ok(DataNode::new(prefix, DataSuffix::Leaf(name)))
        }
        NodeKind::Rpc => Ok(DataNode::new(prefix, DataSuffix::Rpc(name))),
        NodeKind::Action => {
            Ok(DataNode::new(prefix, DataSuffix::Action(name)))
        }
        NodeKind::LeafList => {
            if spec.kind == PathKind::Schema {
                return Ok(DataNode::new(prefix, DataSuffix::LeafList(name)));
            }
            if input.peek() == Some('[') {
                let value = leaf_list_selector(ctx, input, &module, &name)?;
                return Ok(DataNode::new(
                    prefix,
                    DataSuffix::LeafListElement(name, value),
                ));
            }
            if spec.tail == ListTail::Allow {
                Ok(DataNode::new(prefix, DataSuffix::LeafList(name)))
            } else {
                *input = save;
                Err(Failure::Soft)
            }
        }
        NodeKind::List => {
            if spec.kind == PathKind::Schema {
                return Ok(DataNode::new(prefix, DataSuffix::List(name)));
            }
            if input.peek() == Some('[') {
                let keys =
                    list_element_suffix(ctx, input, &module, &name)?;
                return Ok(DataNode::new(
                    prefix,
                    DataSuffix::ListElement(name, keys),
                ));
            }
            if spec.tail == ListTail::Allow {
                Ok(DataNode::new(prefix, DataSuffix::List(name)))
            } else {
                // Keys are mandatory in a data path.
                let declared = ctx
                    .schema
                    .list_keys(&ctx.schema_path(), &(module, name.clone()));
                Err(ctx.fail(
                    input.pos(),
                    missing_keys_message(&name, declared.iter()),
                ))
            }
        }
    }
}

fn candidates(ctx: &Context<'_>, spec: PathSpec) -> Vec<Candidate> {
    let location = ctx.schema_path();
    ctx.schema
        .available_nodes(&location, Recursion::NonRecursive)
        .into_iter()
        .filter_map(|(module, name)| {
            let kind = ctx
                .schema
                .node_kind(&location, &(module.clone(), name.clone()))
                .ok()?;
            if matches!(kind, NodeKind::Rpc | NodeKind::Action)
                && spec.rpcs == RpcNodes::Disallow
            {
                return None;
            }
            Some(Candidate { module, name, kind })
        })
        .collect()
}

fn publish_candidates(
    ctx: &mut Context<'_>,
    anchor: usize,
    cands: &[Candidate],
) {
    let suggestions = cands
        .iter()
        .map(|cand| {
            let value = match &cand.module {
                Some(module) => format!("{}:{}", module, cand.name),
                None => cand.name.clone(),
            };
            match cand.kind {
                NodeKind::Container | NodeKind::PresenceContainer => {
                    Completion::new(value, "/".to_owned(), WhenToAdd::Always)
                }
                NodeKind::Leaf => {
                    Completion::new(value, " ".to_owned(), WhenToAdd::Always)
                }
                NodeKind::List | NodeKind::LeafList => Completion::new(
                    value,
                    "[".to_owned(),
                    WhenToAdd::IfFullMatch,
                ),
                NodeKind::Rpc | NodeKind::Action => {
                    Completion::new(value, " ".to_owned(), WhenToAdd::Always)
                }
            }
        })
        .collect();
    ctx.publish(anchor, suggestions);
}

// Publishes the children at the current position without consuming input;
// used after a trailing slash, where no further segment gets parsed.
fn probe_candidates(
    ctx: &mut Context<'_>,
    input: &Input<'_>,
    spec: PathSpec,
) {
    let mut probe = *input;
    let _ = parse_node(ctx, &mut probe, spec);
}

fn list_element_suffix(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    module: &Option<String>,
    name: &str,
) -> PResult<ListKeys> {
    let location = ctx.schema_path();
    let list_node: ModuleNodePair = (module.clone(), name.to_owned());
    let declared = ctx.schema.list_keys(&location, &list_node);

    // Key leaves live under the list node itself.
    let mut key_location = location;
    key_location.push(SchemaNode::new(
        module.clone(),
        SchemaSuffix::List(name.to_owned()),
    ));
    // Data path of the key-less list, for instance queries.
    let mut list_path = ctx.path.clone();
    list_path.push(DataNode::new(
        module.clone(),
        DataSuffix::List(name.to_owned()),
    ));

    list_suffix(ctx, input, &key_location, &list_path, name, &declared)
}

/// Parses `[key=value]...`, validating key membership, duplicates and
/// typed values, and finally that the supplied key set covers the declared
/// one. Also used for the destination instance of `move`.
pub(crate) fn list_suffix(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    key_location: &SchemaPath,
    list_path: &DataPath,
    list_name: &str,
    declared: &[String],
) -> PResult<ListKeys> {
    let key_module = key_location
        .nodes
        .last()
        .and_then(|node| node.prefix.clone());
    let mut keys = ListKeys::new();

    while input.peek() == Some('[') {
        input.bump(1);
        publish_missing_keys(ctx, input.pos(), declared, &keys, "");

        let key_start = input.pos();
        let Some(key) = input.identifier() else {
            return Err(ctx.fail(key_start, "Expected a key name here:"));
        };
        if keys.contains_key(key) {
            return Err(ctx.fail(
                key_start,
                format!("Key \"{}\" was entered more than once.", key),
            ));
        }
        if !declared.iter().any(|k| k == key) {
            return Err(ctx.fail(
                key_start,
                format!("{} is not indexed by \"{}\".", list_name, key),
            ));
        }
        if !input.eat_char('=') {
            return Err(ctx.fail(input.pos(), "Expected \"=\" here:"));
        }

        // Offer the values of existing instances, narrowed down by the
        // keys already supplied.
        publish_key_values(ctx, input.pos(), list_path, key, &keys);

        let leaf_type = match ctx
            .schema
            .leaf_type(key_location, &(key_module.clone(), key.to_owned()))
        {
            Ok(leaf_type) => leaf_type,
            Err(_) => {
                return Err(ctx.fail(
                    key_start,
                    format!("{} is not indexed by \"{}\".", list_name, key),
                ));
            }
        };
        let top_module = ctx.path.top_level_module().map(str::to_owned);
        let value = leaf_value(ctx, input, &leaf_type, top_module.as_deref())?;
        if !input.eat_char(']') {
            return Err(ctx.fail(input.pos(), "Expected \"]\" here:"));
        }
        keys.insert(key.to_owned(), value);
        publish_missing_keys(ctx, input.pos(), declared, &keys, "[");
    }

    let missing = declared
        .iter()
        .filter(|key| !keys.contains_key(*key))
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(ctx.fail(
            input.pos(),
            missing_keys_message(list_name, missing.into_iter()),
        ));
    }
    Ok(keys)
}

fn leaf_list_selector(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    module: &Option<String>,
    name: &str,
) -> PResult<crate::value::Value> {
    input.bump(1); // '['
    // Canonical selector is "[.=value]"; the bare value form is accepted.
    if input.starts_with(".=") {
        input.bump(2);
    }

    let leaf_type = ctx
        .schema
        .leaf_type(&ctx.schema_path(), &(module.clone(), name.to_owned()))
        .map_err(|_| Failure::Soft)?;
    let top_module = ctx.path.top_level_module().map(str::to_owned);
    let value = leaf_value(ctx, input, &leaf_type, top_module.as_deref())?;
    if !input.eat_char(']') {
        return Err(ctx.fail(input.pos(), "Expected \"]\" here:"));
    }
    Ok(value)
}

fn publish_missing_keys(
    ctx: &mut Context<'_>,
    anchor: usize,
    declared: &[String],
    supplied: &ListKeys,
    opener: &str,
) {
    let suggestions = declared
        .iter()
        .filter(|key| !supplied.contains_key(*key))
        .map(|key| Completion::bare(format!("{}{}=", opener, key)))
        .collect();
    ctx.publish(anchor, suggestions);
}

fn publish_key_values(
    ctx: &mut Context<'_>,
    anchor: usize,
    list_path: &DataPath,
    key: &str,
    supplied: &ListKeys,
) {
    // The datastore is only consulted while completing; a plain parse
    // never pays for the query.
    if !ctx.completing {
        ctx.publish(anchor, Default::default());
        return;
    }
    let suggestions = ctx
        .data_query
        .list_instances(list_path)
        .into_iter()
        .filter(|instance| {
            supplied
                .iter()
                .all(|(name, value)| instance.get(name) == Some(value))
        })
        .filter_map(|mut instance| instance.remove(key))
        .map(|value| Completion::bare(render_key_value(&value)))
        .collect();
    ctx.publish(anchor, suggestions);
}

fn missing_keys_message<'a>(
    list_name: &str,
    missing: impl Iterator<Item = &'a String>,
) -> String {
    format!(
        "Not enough keys for {}. Missing: {}.",
        list_name,
        missing.map(|key| key.as_str()).join(" ")
    )
}

// Paths stop at whitespace or end of input.
fn path_end(input: &Input<'_>) -> bool {
    match input.peek() {
        None => true,
        Some(c) => c.is_whitespace(),
    }
}

// Where a plain segment (no selector) may stop.
fn segment_end(input: &Input<'_>) -> bool {
    match input.peek() {
        None => true,
        Some(c) => c.is_whitespace() || c == '/',
    }
}

fn unknown_word(input: &Input<'_>) -> String {
    input
        .peek_word()
        .split(['/', '['])
        .next()
        .unwrap_or_default()
        .to_owned()
}
