//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::fmt;

use derive_new::new;

/// The single error record produced by a failed parse: a message plus the
/// byte offset into the input line the caret should point at.
#[derive(Clone, Debug, Eq, PartialEq, new)]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

/// Failures reported by the schema facade.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SchemaError {
    UnknownNode(String),
}

// ===== impl ParseError =====

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

// ===== impl SchemaError =====

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::UnknownNode(name) => {
                write!(f, "unknown node \"{}\"", name)
            }
        }
    }
}

impl std::error::Error for SchemaError {}
