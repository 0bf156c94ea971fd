//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use crate::ast::{
    AnyPath, Command, CommandKind, DataFormat, Datastore, DatastoreTarget,
    GetPath, LsOption, LsPath, MoveDestination,
};
use crate::completion::{Completion, WhenToAdd};
use crate::parser::WritableOps;
use crate::parser::context::{Context, Failure, PResult};
use crate::parser::input::Input;
use crate::parser::leaf_value::leaf_value;
use crate::parser::path::{self, PathSpec, RpcNodes};
use crate::path::{DataNode, DataPath, DataSuffix, ListKeys};
use crate::schema::{NodeKind, Recursion};

const DATASTORES: [(&str, Datastore); 2] = [
    ("running", Datastore::Running),
    ("startup", Datastore::Startup),
];

const DATASTORE_TARGETS: [(&str, DatastoreTarget); 3] = [
    ("operational", DatastoreTarget::Operational),
    ("running", DatastoreTarget::Running),
    ("startup", DatastoreTarget::Startup),
];

const DATA_FORMATS: [(&str, DataFormat); 2] =
    [("json", DataFormat::Json), ("xml", DataFormat::Xml)];

const MOVE_POSITIONS: [(&str, MovePosition); 4] = [
    ("after", MovePosition::After),
    ("before", MovePosition::Before),
    ("begin", MovePosition::Begin),
    ("end", MovePosition::End),
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum MovePosition {
    After,
    Before,
    Begin,
    End,
}

/// Top-level grammar: optional whitespace, a command keyword, the
/// command's arguments. Trailing input is the caller's business.
pub(crate) fn command(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
) -> PResult<Command> {
    input.skip_whitespace();
    let keyword_start = input.pos();
    ctx.publish(
        keyword_start,
        CommandKind::ALL
            .iter()
            .map(|kind| Completion::bare(kind.name()))
            .collect(),
    );

    let word = input.peek_word();
    let Some(kind) =
        CommandKind::ALL.iter().copied().find(|k| k.name() == word)
    else {
        return Err(ctx.fail(keyword_start, "Unknown command."));
    };
    input.take_word();

    // Past the keyword, failures are committed to this command.
    match kind {
        CommandKind::Cancel => Ok(Command::Cancel),
        CommandKind::Cd => cmd_cd(ctx, input),
        CommandKind::Commit => Ok(Command::Commit),
        CommandKind::Copy => cmd_copy(ctx, input),
        CommandKind::Create => cmd_create(ctx, input),
        CommandKind::Delete => cmd_delete(ctx, input),
        CommandKind::Describe => cmd_describe(ctx, input),
        CommandKind::Discard => Ok(Command::Discard),
        CommandKind::Dump => cmd_dump(ctx, input),
        CommandKind::Exec => cmd_exec(ctx, input),
        CommandKind::Get => cmd_get(ctx, input),
        CommandKind::Help => cmd_help(ctx, input),
        CommandKind::Ls => cmd_ls(ctx, input),
        CommandKind::Move => cmd_move(ctx, input),
        CommandKind::Prepare => cmd_prepare(ctx, input),
        CommandKind::Quit => Ok(Command::Quit),
        CommandKind::Set => cmd_set(ctx, input),
        CommandKind::Switch => cmd_switch(ctx, input),
    }
}

// ===== per-command grammars =====

fn cmd_cd(ctx: &mut Context<'_>, input: &mut Input<'_>) -> PResult<Command> {
    const MSG: &str =
        "Expected a path to a container or list instance here:";
    let path = required_data_path(ctx, input, PathSpec::data(), MSG)?;
    match terminal_kind(ctx, &path) {
        None
        | Some(
            NodeKind::Container | NodeKind::PresenceContainer | NodeKind::List,
        ) => (),
        Some(_) => return Err(ctx.fail(ctx.last_segment, MSG)),
    }
    Ok(Command::Cd { path })
}

fn cmd_create(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
) -> PResult<Command> {
    const MSG: &str = "Expected a path to a presence container, list \
                       instance or leaf-list instance here:";
    let path = required_data_path(ctx, input, PathSpec::data(), MSG)?;
    match terminal_kind(ctx, &path) {
        Some(
            NodeKind::PresenceContainer | NodeKind::List | NodeKind::LeafList,
        ) => (),
        _ => return Err(ctx.fail(ctx.last_segment, MSG)),
    }
    check_writable(ctx, &path)?;
    Ok(Command::Create { path })
}

fn cmd_delete(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
) -> PResult<Command> {
    const MSG: &str = "Expected a path to a presence container, list \
                       instance, leaf-list instance or leaf here:";
    let path = required_data_path(ctx, input, PathSpec::data(), MSG)?;
    match terminal_kind(ctx, &path) {
        Some(
            NodeKind::PresenceContainer
            | NodeKind::List
            | NodeKind::LeafList
            | NodeKind::Leaf,
        ) => (),
        _ => return Err(ctx.fail(ctx.last_segment, MSG)),
    }
    check_writable(ctx, &path)?;
    Ok(Command::Delete { path })
}

fn cmd_set(ctx: &mut Context<'_>, input: &mut Input<'_>) -> PResult<Command> {
    const MSG: &str = "Expected a path to a leaf here:";
    let path = required_data_path(ctx, input, PathSpec::data(), MSG)?;
    if terminal_kind(ctx, &path) != Some(NodeKind::Leaf) {
        return Err(ctx.fail(ctx.last_segment, MSG));
    }
    check_writable(ctx, &path)?;

    if !input.skip_whitespace() {
        return Err(ctx.fail(input.pos(), "Expected a leaf value here:"));
    }
    let Some((location, node)) = ctx.tmp_leaf.clone() else {
        return Err(ctx.fail(ctx.last_segment, MSG));
    };
    let leaf_type = match ctx.schema.leaf_type(&location, &node) {
        Ok(leaf_type) => leaf_type,
        Err(_) => return Err(ctx.fail(ctx.last_segment, MSG)),
    };
    let top_module = ctx.path.top_level_module().map(str::to_owned);
    let value = leaf_value(ctx, input, &leaf_type, top_module.as_deref())?;
    Ok(Command::Set { path, value })
}

fn cmd_ls(ctx: &mut Context<'_>, input: &mut Input<'_>) -> PResult<Command> {
    let mut options = Vec::new();
    loop {
        let save = *input;
        if input.skip_whitespace()
            && input.eat("--recursive")
            && word_boundary(input)
        {
            options.push(LsOption::Recursive);
        } else {
            *input = save;
            break;
        }
    }

    if !input.skip_whitespace() {
        return Ok(Command::Ls {
            options,
            path: None,
        });
    }
    let arg_start = input.pos();
    let path = match path::data_path(ctx, input, PathSpec::data_list_end()) {
        Ok(path) => Some(LsPath::Data(path)),
        Err(Failure::Hard) => return Err(Failure::Hard),
        Err(Failure::Soft) => {
            match path::schema_path(ctx, input, RpcNodes::Disallow) {
                Ok(path) => Some(LsPath::Schema(path)),
                Err(Failure::Hard) => return Err(Failure::Hard),
                Err(Failure::Soft) => match module_star(ctx, input) {
                    Some(module) => Some(LsPath::Module(module)),
                    None if input.at_end() => None,
                    None => {
                        return Err(
                            ctx.fail(arg_start, "Expected a path here:")
                        );
                    }
                },
            }
        }
    };
    Ok(Command::Ls { options, path })
}

fn cmd_get(ctx: &mut Context<'_>, input: &mut Input<'_>) -> PResult<Command> {
    const TARGET_MSG: &str = "Expected a datastore target (operational, \
                              running, startup) here:";
    let mut datastore = None;
    let save = *input;
    if input.skip_whitespace() && input.peek() == Some('-') {
        let option_start = input.pos();
        ctx.publish(
            option_start,
            [Completion::new(
                "--datastore".to_owned(),
                " ".to_owned(),
                WhenToAdd::Always,
            )]
            .into(),
        );
        if !input.eat("--datastore") || !word_boundary(input) {
            return Err(
                ctx.fail(option_start, "Expected \"--datastore\" here:")
            );
        }
        if !input.skip_whitespace() {
            return Err(ctx.fail(input.pos(), TARGET_MSG));
        }
        publish_words(ctx, input.pos(), &DATASTORE_TARGETS);
        let target_start = input.pos();
        let Some(target) = keyword(input, &DATASTORE_TARGETS) else {
            return Err(ctx.fail(target_start, TARGET_MSG));
        };
        datastore = Some(target);
    } else {
        *input = save;
    }

    if !input.skip_whitespace() {
        return Ok(Command::Get {
            datastore,
            path: None,
        });
    }
    let arg_start = input.pos();
    let path = match path::data_path(ctx, input, PathSpec::data_list_end()) {
        Ok(path) => Some(GetPath::Data(path)),
        Err(Failure::Hard) => return Err(Failure::Hard),
        Err(Failure::Soft) => match module_star(ctx, input) {
            Some(module) => Some(GetPath::Module(module)),
            None if input.at_end() => None,
            None => {
                return Err(ctx.fail(arg_start, "Expected a path here:"));
            }
        },
    };
    Ok(Command::Get { datastore, path })
}

fn cmd_describe(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
) -> PResult<Command> {
    const MSG: &str = "Expected a path here:";
    if !input.skip_whitespace() {
        return Err(ctx.fail(input.pos(), MSG));
    }
    let arg_start = input.pos();
    let spec = PathSpec {
        rpcs: RpcNodes::Allow,
        ..PathSpec::data_list_end()
    };
    let path = match path::data_path(ctx, input, spec) {
        Ok(path) => AnyPath::Data(path),
        Err(Failure::Hard) => return Err(Failure::Hard),
        Err(Failure::Soft) => {
            match path::schema_path(ctx, input, RpcNodes::Allow) {
                Ok(path) => AnyPath::Schema(path),
                Err(Failure::Hard) => return Err(Failure::Hard),
                Err(Failure::Soft) => {
                    return Err(ctx.fail(arg_start, MSG));
                }
            }
        }
    };
    Ok(Command::Describe { path })
}

fn cmd_prepare(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
) -> PResult<Command> {
    const MSG: &str = "Expected a path to an RPC or action here:";
    let path = required_data_path(ctx, input, PathSpec::rpc(), MSG)?;
    match terminal_kind(ctx, &path) {
        Some(NodeKind::Rpc | NodeKind::Action) => (),
        _ => return Err(ctx.fail(ctx.last_segment, MSG)),
    }
    Ok(Command::Prepare { path })
}

fn cmd_exec(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
) -> PResult<Command> {
    const MSG: &str = "Expected a path to an RPC or action here:";
    if !input.skip_whitespace() {
        return Ok(Command::Exec { path: None });
    }
    let arg_start = input.pos();
    match path::data_path(ctx, input, PathSpec::rpc()) {
        Ok(path) => {
            match terminal_kind(ctx, &path) {
                Some(NodeKind::Rpc | NodeKind::Action) => (),
                _ => return Err(ctx.fail(ctx.last_segment, MSG)),
            }
            // Anything with input parameters has to go through `prepare`.
            let inputs = ctx
                .schema
                .available_nodes(&ctx.schema_path(), Recursion::NonRecursive);
            if !inputs.is_empty() {
                return Err(ctx.fail(
                    ctx.last_segment,
                    "This RPC or action has input parameters; use \
                     \"prepare\" to set them.",
                ));
            }
            Ok(Command::Exec { path: Some(path) })
        }
        Err(Failure::Soft) if input.at_end() => {
            Ok(Command::Exec { path: None })
        }
        Err(Failure::Soft) => Err(ctx.fail(arg_start, MSG)),
        Err(Failure::Hard) => Err(Failure::Hard),
    }
}

fn cmd_move(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
) -> PResult<Command> {
    const SRC_MSG: &str = "Expected a source path here:";
    const POS_MSG: &str =
        "Expected a move position (begin, end, before, after) here:";
    const DST_MSG: &str = "Expected a destination here:";

    let source = required_data_path(ctx, input, PathSpec::data(), SRC_MSG)?;
    let last = match source.nodes.last() {
        Some(node)
            if matches!(
                node.suffix,
                DataSuffix::ListElement(..)
                    | DataSuffix::LeafListElement(..)
            ) =>
        {
            node.clone()
        }
        _ => return Err(ctx.fail(ctx.last_segment, SRC_MSG)),
    };

    if !input.skip_whitespace() {
        return Err(ctx.fail(input.pos(), POS_MSG));
    }
    publish_words(ctx, input.pos(), &MOVE_POSITIONS);
    let position_start = input.pos();
    let Some(position) = keyword(input, &MOVE_POSITIONS) else {
        return Err(ctx.fail(position_start, POS_MSG));
    };

    let destination = match position {
        MovePosition::Begin => MoveDestination::Begin,
        MovePosition::End => MoveDestination::End,
        MovePosition::Before | MovePosition::After => {
            if !input.skip_whitespace() {
                return Err(ctx.fail(input.pos(), DST_MSG));
            }
            let keys = match &last.suffix {
                DataSuffix::LeafListElement(name, _) => {
                    // The sibling is identified by its value, held under
                    // the "." pseudo-key.
                    let mut location = ctx.schema_path();
                    location.pop();
                    let leaf_type = match ctx
                        .schema
                        .leaf_type(&location, &(last.prefix.clone(), name.clone()))
                    {
                        Ok(leaf_type) => leaf_type,
                        Err(_) => {
                            return Err(ctx.fail(ctx.last_segment, SRC_MSG));
                        }
                    };
                    let top_module =
                        ctx.path.top_level_module().map(str::to_owned);
                    let value = leaf_value(
                        ctx,
                        input,
                        &leaf_type,
                        top_module.as_deref(),
                    )?;
                    ListKeys::from([(".".to_owned(), value)])
                }
                DataSuffix::ListElement(name, _) => {
                    if input.peek() != Some('[') {
                        return Err(ctx.fail(input.pos(), DST_MSG));
                    }
                    // The sibling is an instance of the source's list.
                    let key_location = ctx.schema_path();
                    let mut parent = key_location.clone();
                    parent.pop();
                    let declared = ctx.schema.list_keys(
                        &parent,
                        &(last.prefix.clone(), name.clone()),
                    );
                    let mut list_path = ctx.path.clone();
                    list_path.pop();
                    list_path.push(DataNode::new(
                        last.prefix.clone(),
                        DataSuffix::List(name.clone()),
                    ));
                    path::list_suffix(
                        ctx,
                        input,
                        &key_location,
                        &list_path,
                        name,
                        &declared,
                    )?
                }
                _ => unreachable!(),
            };
            match position {
                MovePosition::Before => MoveDestination::Before(keys),
                _ => MoveDestination::After(keys),
            }
        }
    };
    Ok(Command::Move {
        source,
        destination,
    })
}

fn cmd_copy(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
) -> PResult<Command> {
    const MSG: &str = "Expected a datastore (running, startup) here:";
    if !input.skip_whitespace() {
        return Err(ctx.fail(input.pos(), MSG));
    }
    publish_words(ctx, input.pos(), &DATASTORES);
    let source_start = input.pos();
    let Some(source) = keyword(input, &DATASTORES) else {
        return Err(ctx.fail(source_start, MSG));
    };

    if !input.skip_whitespace() {
        return Err(ctx.fail(input.pos(), MSG));
    }
    publish_words(ctx, input.pos(), &DATASTORES);
    let destination_start = input.pos();
    let Some(destination) = keyword(input, &DATASTORES) else {
        return Err(ctx.fail(destination_start, MSG));
    };
    if source == destination {
        return Err(ctx.fail(
            destination_start,
            "Source datastore and destination datastore can't be the same.",
        ));
    }
    Ok(Command::Copy {
        source,
        destination,
    })
}

fn cmd_dump(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
) -> PResult<Command> {
    const MSG: &str = "Expected a data format (xml, json) here:";
    if !input.skip_whitespace() {
        return Err(ctx.fail(input.pos(), MSG));
    }
    publish_words(ctx, input.pos(), &DATA_FORMATS);
    let format_start = input.pos();
    let Some(format) = keyword(input, &DATA_FORMATS) else {
        return Err(ctx.fail(format_start, MSG));
    };
    Ok(Command::Dump { format })
}

fn cmd_switch(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
) -> PResult<Command> {
    const MSG: &str = "Expected a datastore target (operational, running, \
                       startup) here:";
    if !input.skip_whitespace() {
        return Err(ctx.fail(input.pos(), MSG));
    }
    publish_words(ctx, input.pos(), &DATASTORE_TARGETS);
    let target_start = input.pos();
    let Some(target) = keyword(input, &DATASTORE_TARGETS) else {
        return Err(ctx.fail(target_start, MSG));
    };
    Ok(Command::Switch { target })
}

fn cmd_help(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
) -> PResult<Command> {
    if !input.skip_whitespace() {
        return Ok(Command::Help { command: None });
    }
    ctx.publish(
        input.pos(),
        CommandKind::ALL
            .iter()
            .map(|kind| Completion::bare(kind.name()))
            .collect(),
    );
    let word = input.peek_word();
    let command = CommandKind::ALL.iter().copied().find(|k| k.name() == word);
    if command.is_some() {
        input.take_word();
    }
    Ok(Command::Help { command })
}

// ===== helper functions =====

fn required_data_path(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
    spec: PathSpec,
    msg: &str,
) -> PResult<DataPath> {
    if !input.skip_whitespace() {
        return Err(ctx.fail(input.pos(), msg));
    }
    let arg_start = input.pos();
    match path::data_path(ctx, input, spec) {
        Ok(path) => Ok(path),
        Err(Failure::Soft) => Err(ctx.fail(arg_start, msg)),
        Err(Failure::Hard) => Err(Failure::Hard),
    }
}

/// Schema kind of the path's final segment; `None` for the root or a
/// parent step, which have nothing to look up.
fn terminal_kind(ctx: &Context<'_>, path: &DataPath) -> Option<NodeKind> {
    let last = path.nodes.last()?;
    let name = last.suffix.name()?.to_owned();
    let mut location = ctx.schema_path();
    location.pop();
    ctx.schema
        .node_kind(&location, &(last.prefix.clone(), name))
        .ok()
}

/// `set`/`create`/`delete` may only touch operational state when the
/// session allows it.
fn check_writable(
    ctx: &mut Context<'_>,
    path: &DataPath,
) -> PResult<()> {
    if ctx.writable_ops == WritableOps::Yes {
        return Ok(());
    }
    let Some(last) = path.nodes.last() else {
        return Ok(());
    };
    let Some(name) = last.suffix.name() else {
        return Ok(());
    };
    let mut location = ctx.schema_path();
    location.pop();
    if ctx
        .schema
        .is_config(&location, &(last.prefix.clone(), name.to_owned()))
    {
        Ok(())
    } else {
        Err(ctx.fail(ctx.last_segment, "This node is read-only."))
    }
}

fn module_star(
    ctx: &mut Context<'_>,
    input: &mut Input<'_>,
) -> Option<String> {
    let save = *input;
    if let Some(module) = input.module_prefix()
        && input.eat_char('*')
        && word_boundary(input)
        && ctx.schema.is_module(module)
    {
        return Some(module.to_owned());
    }
    *input = save;
    None
}

fn keyword<T: Copy>(input: &mut Input<'_>, table: &[(&str, T)]) -> Option<T> {
    let word = input.peek_word();
    let found = table.iter().find(|(name, _)| *name == word)?;
    input.take_word();
    Some(found.1)
}

fn publish_words<T>(
    ctx: &mut Context<'_>,
    anchor: usize,
    table: &[(&str, T)],
) {
    ctx.publish(
        anchor,
        table
            .iter()
            .map(|(name, _)| Completion::bare(*name))
            .collect(),
    );
}

fn word_boundary(input: &Input<'_>) -> bool {
    match input.peek() {
        None => true,
        Some(c) => c.is_whitespace(),
    }
}
