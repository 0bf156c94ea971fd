//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;

use crate::completion::Completion;
use crate::data::DataQuery;
use crate::error::ParseError;
use crate::parser::WritableOps;
use crate::path::{DataNode, DataPath, ModuleNodePair, SchemaPath};
use crate::schema::Schema;

/// How a grammar rule failed. Soft failures let the surrounding rule try
/// another alternative; hard failures are committed (an expectation point
/// was passed) and abort the whole parse.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Failure {
    Soft,
    Hard,
}

pub(crate) type PResult<T> = Result<T, Failure>;

/// Mutable state threaded through every grammar rule of a single parse.
pub(crate) struct Context<'a> {
    pub(crate) schema: &'a dyn Schema,
    pub(crate) data_query: &'a dyn DataQuery,
    pub(crate) writable_ops: WritableOps,
    pub(crate) completing: bool,

    // Working path: starts at the navigation cursor and follows the
    // segments as they parse, so each step sees the right schema location.
    origin: DataPath,
    pub(crate) path: DataPath,

    // Schema location of the most recently matched leaf, for typed value
    // parsing (`set`, list keys).
    pub(crate) tmp_leaf: Option<(SchemaPath, ModuleNodePair)>,
    // Input offset of the most recently matched path segment, for
    // node-kind diagnostics.
    pub(crate) last_segment: usize,

    pub(crate) suggestions: BTreeSet<Completion>,
    pub(crate) anchor: Option<usize>,

    error: Option<ParseError>,
}

// ===== impl Context =====

impl<'a> Context<'a> {
    pub(crate) fn new(
        schema: &'a dyn Schema,
        data_query: &'a dyn DataQuery,
        writable_ops: WritableOps,
        origin: DataPath,
        completing: bool,
    ) -> Context<'a> {
        let path = origin.clone();
        Context {
            schema,
            data_query,
            writable_ops,
            completing,
            origin,
            path,
            tmp_leaf: None,
            last_segment: 0,
            suggestions: BTreeSet::new(),
            anchor: None,
            error: None,
        }
    }

    /// Rewinds the working path to the cursor, for a fresh path attempt.
    pub(crate) fn reset_path(&mut self) {
        self.path = self.origin.clone();
    }

    /// Restarts the working path at the root (a leading `/` was seen).
    pub(crate) fn clear_path(&mut self) {
        self.path = DataPath::root();
    }

    pub(crate) fn schema_path(&self) -> SchemaPath {
        self.path.to_schema_path()
    }

    pub(crate) fn push_segment(&mut self, node: &DataNode) {
        if node.suffix.is_up() {
            self.path.pop();
        } else {
            self.path.push(node.clone());
        }
    }

    /// Publishes a candidate set, anchored at `anchor`. Publication always
    /// precedes the corresponding match attempt, so the deepest anchor
    /// survives a failed parse.
    pub(crate) fn publish(
        &mut self,
        anchor: usize,
        suggestions: BTreeSet<Completion>,
    ) {
        self.suggestions = suggestions;
        self.anchor = Some(anchor);
    }

    /// Records a committed error. Only the first report sticks; later
    /// handlers on the same failure path observe it and decline.
    pub(crate) fn fail(
        &mut self,
        offset: usize,
        message: impl Into<String>,
    ) -> Failure {
        if self.error.is_none() {
            self.error = Some(ParseError::new(message.into(), offset));
        }
        Failure::Hard
    }

    pub(crate) fn error_handled(&self) -> bool {
        self.error.is_some()
    }

    /// Drops an error recorded by a failed alternative that the caller is
    /// going to retry differently (union members).
    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn into_error(self, fallback_offset: usize) -> ParseError {
        self.error.unwrap_or_else(|| {
            ParseError::new("Invalid command.".to_owned(), fallback_offset)
        })
    }
}
