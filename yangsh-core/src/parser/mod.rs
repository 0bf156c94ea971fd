//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod commands;
mod context;
mod input;
mod leaf_value;
mod path;

use std::collections::BTreeSet;

use tracing::debug;

use crate::ast::Command;
use crate::completion::{Completions, filter_by_prefix};
use crate::data::DataQuery;
use crate::error::ParseError;
use crate::parser::context::Context;
use crate::parser::input::Input;
use crate::path::{DataPath, ModuleNodePair, Prefixes, Scope};
use crate::schema::{Recursion, Schema};

/// Whether operational (`config false`) nodes may be edited by `set`,
/// `create` and `delete`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WritableOps {
    Yes,
    No,
}

/// The parser front-end. Owns the navigation cursor; each call to
/// [`Parser::parse_command`] or [`Parser::completions`] runs on a fresh,
/// exclusively owned context, and never mutates the cursor itself.
pub struct Parser<'a> {
    schema: &'a dyn Schema,
    data_query: &'a dyn DataQuery,
    writable_ops: WritableOps,
    prefixes: Prefixes,
    cur_dir: DataPath,
}

// ===== impl Parser =====

impl<'a> Parser<'a> {
    pub fn new(
        schema: &'a dyn Schema,
        data_query: &'a dyn DataQuery,
        writable_ops: WritableOps,
    ) -> Parser<'a> {
        Parser {
            schema,
            data_query,
            writable_ops,
            prefixes: Prefixes::WhenNeeded,
            cur_dir: DataPath::root(),
        }
    }

    /// Module prefix rendering policy used by the prompt.
    pub fn with_prefixes(mut self, prefixes: Prefixes) -> Parser<'a> {
        self.prefixes = prefixes;
        self
    }

    /// Parses one input line into a command, or a single caret-ready
    /// error record.
    pub fn parse_command(&self, line: &str) -> Result<Command, ParseError> {
        let mut ctx = Context::new(
            self.schema,
            self.data_query,
            self.writable_ops,
            self.cur_dir.clone(),
            false,
        );
        let mut input = Input::new(line);
        match commands::command(&mut ctx, &mut input) {
            Ok(command) => {
                input.skip_whitespace();
                if !input.at_end() {
                    return Err(ParseError::new(
                        "Too many arguments.".to_owned(),
                        input.pos(),
                    ));
                }
                debug!(command = ?command.kind(), "parsed command");
                Ok(command)
            }
            Err(_) => Err(ctx.into_error(input.pos())),
        }
    }

    /// Completion candidates for a partial input line. Runs the grammar in
    /// completing mode, takes the suggestion set at the deepest anchor, and
    /// filters it by the input past the anchor.
    pub fn completions(&self, line: &str) -> Completions {
        let mut ctx = Context::new(
            self.schema,
            self.data_query,
            self.writable_ops,
            self.cur_dir.clone(),
            true,
        );
        let mut input = Input::new(line);
        let _ = commands::command(&mut ctx, &mut input);

        let anchor = ctx.anchor.unwrap_or(line.len());
        let prefix = &line[anchor..];
        let completions = filter_by_prefix(&ctx.suggestions, prefix);
        Completions {
            completions: completions
                .iter()
                .map(|completion| completion.render(prefix))
                .collect(),
            context_length: line.len() - anchor,
        }
    }

    /// The cursor, an absolute data path.
    pub fn current_path(&self) -> &DataPath {
        &self.cur_dir
    }

    /// The schema facade this parser consults.
    pub fn schema(&self) -> &'a dyn Schema {
        self.schema
    }

    /// Canonical textual form of the cursor.
    pub fn current_node(&self) -> String {
        self.cur_dir.to_path_string(self.prefixes)
    }

    pub fn prompt(&self) -> String {
        format!("{}> ", self.current_node())
    }

    /// Applies a successfully executed `cd`: an absolute path replaces the
    /// cursor, a relative one is folded into it segment by segment.
    pub fn change_node(&mut self, path: &DataPath) {
        if path.scope == Scope::Absolute {
            self.cur_dir.nodes = path.nodes.clone();
        } else {
            for node in &path.nodes {
                if node.suffix.is_up() {
                    self.cur_dir.nodes.pop();
                } else {
                    self.cur_dir.nodes.push(node.clone());
                }
            }
        }
        self.cur_dir.trailing_slash = false;
    }

    /// Schema children of `cursor ⊕ path`.
    pub fn available_nodes(
        &self,
        path: Option<&DataPath>,
    ) -> BTreeSet<ModuleNodePair> {
        let mut full = self.cur_dir.clone();
        if let Some(path) = path {
            for node in &path.nodes {
                if node.suffix.is_up() {
                    full.nodes.pop();
                } else {
                    full.nodes.push(node.clone());
                }
            }
        }
        self.schema
            .available_nodes(&full.to_schema_path(), Recursion::NonRecursive)
    }
}
