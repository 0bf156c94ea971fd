//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod ast;
pub mod completion;
pub mod data;
pub mod error;
pub mod parser;
pub mod path;
pub mod schema;
pub mod static_schema;
pub mod value;

pub use crate::ast::Command;
pub use crate::completion::Completions;
pub use crate::error::ParseError;
pub use crate::parser::{Parser, WritableOps};
pub use crate::path::{DataPath, Prefixes, SchemaPath};
pub use crate::schema::{LeafType, Schema};
pub use crate::static_schema::StaticSchema;
pub use crate::value::Value;
