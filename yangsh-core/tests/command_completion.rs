mod common;

use common::*;
use yangsh_core::data::StaticDataQuery;
use yangsh_core::parser::{Parser, WritableOps};
use yangsh_core::static_schema::StaticSchema;

const ALL_COMMANDS: [&str; 18] = [
    "cancel", "cd", "commit", "copy", "create", "delete", "describe",
    "discard", "dump", "exec", "get", "help", "ls", "move", "prepare",
    "quit", "set", "switch",
];

#[test]
fn command_names() {
    let mut schema = StaticSchema::new();
    schema.add_module("example");
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    check_completions(&parser, "", &ALL_COMMANDS, 0);
    check_completions(&parser, " ", &ALL_COMMANDS, 0);
    check_completions(
        &parser,
        "c",
        &["cancel", "cd", "commit", "copy", "create"],
        1,
    );
    check_completions(
        &parser,
        "d",
        &["delete", "describe", "discard", "dump"],
        1,
    );
    check_completions(&parser, "x", &[], 1);
    check_completions(&parser, "cd", &["cd"], 2);
    check_completions(&parser, "create", &["create"], 6);
}

#[test]
fn help_argument() {
    let mut schema = StaticSchema::new();
    schema.add_module("example");
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    check_completions(&parser, "help ", &ALL_COMMANDS, 0);
    check_completions(
        &parser,
        "help c",
        &["cancel", "cd", "commit", "copy", "create"],
        1,
    );
}
