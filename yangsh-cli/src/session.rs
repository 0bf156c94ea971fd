//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::debug;
use yangsh_core::ast::{AnyPath, Command, CommandKind, GetPath, LsPath};
use yangsh_core::completion::Completions;
use yangsh_core::error::ParseError;
use yangsh_core::parser::Parser;
use yangsh_core::path::{
    DataPath, ModuleNodePair, Prefixes, Scope, SchemaPath,
};
use yangsh_core::schema::{Recursion, Status};
use yangsh_core::value::render_key_value;

/// An interactive session: the parser plus the thin command executor that
/// drives it. Datastore-facing commands are acknowledged with their parsed
/// canonical form; tree-facing commands (`cd`, `ls`, `describe`, `help`)
/// run against the schema directly.
pub struct Session {
    parser: Parser<'static>,
}

// ===== impl Session =====

impl Session {
    pub(crate) fn new(parser: Parser<'static>) -> Session {
        Session { parser }
    }

    pub(crate) fn prompt(&self) -> String {
        self.parser.prompt()
    }

    pub(crate) fn completions(&self, line: &str) -> Completions {
        self.parser.completions(line)
    }

    /// Parses and executes one input line. Returns true when the session
    /// should end.
    pub(crate) fn enter_command(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            return false;
        }
        let command = match self.parser.parse_command(line) {
            Ok(command) => command,
            Err(error) => {
                print_parse_error(line, &error);
                return false;
            }
        };
        debug!(command = ?command.kind(), "executing command");

        match command {
            Command::Quit => return true,
            Command::Cd { path } => self.parser.change_node(&path),
            Command::Ls { options, path } => self.ls(!options.is_empty(), path),
            Command::Help { command } => help(command),
            Command::Describe { path } => self.describe(&path),
            Command::Set { path, value } => {
                println!(
                    "set {} = {}",
                    self.resolve(&path).to_path_string(Prefixes::WhenNeeded),
                    render_key_value(&value)
                );
            }
            Command::Create { path } => self.echo("create", &path),
            Command::Delete { path } => self.echo("delete", &path),
            Command::Get { datastore, path } => {
                let target = datastore
                    .map(|target| format!(" ({})", target))
                    .unwrap_or_default();
                match path {
                    Some(GetPath::Data(path)) => println!(
                        "get{} {}",
                        target,
                        self.resolve(&path)
                            .to_path_string(Prefixes::WhenNeeded)
                    ),
                    Some(GetPath::Module(module)) => {
                        println!("get{} {}:*", target, module)
                    }
                    None => println!(
                        "get{} {}",
                        target,
                        self.parser.current_node()
                    ),
                }
            }
            Command::Move {
                source,
                destination,
            } => {
                println!(
                    "move {} {:?}",
                    self.resolve(&source)
                        .to_path_string(Prefixes::WhenNeeded),
                    destination
                );
            }
            Command::Copy {
                source,
                destination,
            } => println!("copy {} -> {}", source, destination),
            Command::Dump { format } => println!("dump {:?}", format),
            Command::Switch { target } => println!("switch {}", target),
            Command::Prepare { path } => self.echo("prepare", &path),
            Command::Exec { path } => match path {
                Some(path) => self.echo("exec", &path),
                None => println!("exec"),
            },
            Command::Commit => println!("commit"),
            Command::Discard => println!("discard"),
            Command::Cancel => println!("cancel"),
        }
        false
    }

    fn echo(&self, verb: &str, path: &DataPath) {
        println!(
            "{} {}",
            verb,
            self.resolve(path).to_path_string(Prefixes::WhenNeeded)
        );
    }

    // Folds a parsed (possibly relative) path into the cursor.
    fn resolve(&self, path: &DataPath) -> DataPath {
        let mut full = match path.scope {
            Scope::Absolute => DataPath::root(),
            Scope::Relative => self.parser.current_path().clone(),
        };
        for node in &path.nodes {
            if node.suffix.is_up() {
                full.nodes.pop();
            } else {
                full.nodes.push(node.clone());
            }
        }
        full
    }

    fn ls(&self, recursive: bool, path: Option<LsPath>) {
        let schema = self.parser.schema();
        let recursion = if recursive {
            Recursion::Recursive
        } else {
            Recursion::NonRecursive
        };
        let nodes = match path {
            None => schema.available_nodes(
                &self.parser.current_path().to_schema_path(),
                recursion,
            ),
            Some(LsPath::Data(path)) => schema
                .available_nodes(&self.resolve(&path).to_schema_path(), recursion),
            Some(LsPath::Schema(path)) => {
                let mut full =
                    self.parser.current_path().to_schema_path();
                if path.scope == Scope::Absolute {
                    full = SchemaPath::root();
                }
                for node in path.nodes {
                    if node.suffix.is_up() {
                        full.pop();
                    } else {
                        full.push(node);
                    }
                }
                schema.available_nodes(&full, recursion)
            }
            Some(LsPath::Module(module)) => {
                schema.module_nodes(&module, recursion)
            }
        };
        for (module, name) in nodes {
            match module {
                Some(module) => println!("{}:{}", module, name),
                None => println!("{}", name),
            }
        }
    }

    fn describe(&self, path: &AnyPath) {
        let (location, node) = match path {
            AnyPath::Data(path) => {
                let full = self.resolve(path).to_schema_path();
                split_last(full)
            }
            AnyPath::Schema(path) => {
                let mut full = self.parser.current_path().to_schema_path();
                if path.scope == Scope::Absolute {
                    full = SchemaPath::root();
                }
                for node in &path.nodes {
                    if node.suffix.is_up() {
                        full.pop();
                    } else {
                        full.push(node.clone());
                    }
                }
                split_last(full)
            }
        };
        let Some(node) = node else {
            println!("/ (root)");
            return;
        };

        let schema = self.parser.schema();
        match schema.node_kind(&location, &node) {
            Ok(kind) => println!("Node type: {:?}", kind),
            Err(error) => {
                println!("% {}", error);
                return;
            }
        }
        if let Ok(leaf_type) = schema.leaf_type(&location, &node) {
            println!("Type: {}", leaf_type.describe());
        }
        if let Some(description) = schema.description(&location, &node) {
            println!("Description: {}", description);
        }
        if let Some(units) = schema.units(&location, &node) {
            println!("Units: {}", units);
        }
        if let Some(default) = schema.default_value(&location, &node) {
            println!("Default: {}", default);
        }
        match schema.status(&location, &node) {
            Status::Current => (),
            status => println!("Status: {:?}", status),
        }
    }
}

// ===== global functions =====

fn split_last(
    mut path: SchemaPath,
) -> (SchemaPath, Option<ModuleNodePair>) {
    match path.pop() {
        Some(last) => {
            let node = (
                last.prefix.clone(),
                last.suffix.name().unwrap_or_default().to_owned(),
            );
            (path, Some(node))
        }
        None => (path, None),
    }
}

fn help(command: Option<CommandKind>) {
    match command {
        Some(command) => println!("{}", command.long_help()),
        None => {
            for command in CommandKind::ALL {
                println!("{}", command.short_help());
            }
        }
    }
}

/// Renders the single caret-with-message error record of a failed parse.
pub(crate) fn print_parse_error(line: &str, error: &ParseError) {
    println!("% {}", error);
    println!("{}", line);
    println!("{}^", " ".repeat(error.offset.min(line.len())));
}
