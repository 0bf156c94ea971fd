mod common;

use common::*;
use yangsh_core::data::StaticDataQuery;
use yangsh_core::parser::{Parser, WritableOps};
use yangsh_core::schema::LeafType;
use yangsh_core::static_schema::StaticSchema;

fn schema() -> StaticSchema {
    let mut schema = StaticSchema::new();
    schema.add_module("example");
    schema.add_module("second");
    schema.add_container("/", "example:ano");
    schema.add_container("/", "example:anoda");
    schema.add_list("/example:ano", "listInCont", &["number"]);
    schema.add_leaf("/example:ano/listInCont", "number", LeafType::Int32);
    schema.add_container("/", "second:amelie");
    schema.add_container("/", "example:bota");
    schema.add_container("/example:ano", "a2");
    schema.add_container("/example:bota", "b2");
    schema.add_list("/", "example:list", &["number"]);
    schema.add_leaf("/example:list", "number", LeafType::Int32);
    schema.add_container("/example:list", "contInList");
    schema.add_list("/", "example:ovoce", &["name"]);
    schema.add_leaf("/example:ovoce", "name", LeafType::String);
    schema.add_list("/", "example:ovocezelenina", &["name"]);
    schema.add_leaf("/example:ovocezelenina", "name", LeafType::String);
    schema.add_list("/", "example:twoKeyList", &["number", "name"]);
    schema.add_leaf("/example:twoKeyList", "number", LeafType::Int32);
    schema.add_leaf("/example:twoKeyList", "name", LeafType::String);
    schema.add_leaf("/", "example:leafInt", LeafType::Int32);
    schema
}

const ALL_TOP_NODES: [&str; 9] = [
    "example:ano/",
    "example:anoda/",
    "example:bota/",
    "example:leafInt ",
    "example:list",
    "example:ovoce",
    "example:ovocezelenina",
    "example:twoKeyList",
    "second:amelie/",
];

#[test]
fn node_name_completion() {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    check_completions(&parser, "ls ", &ALL_TOP_NODES, 0);
    check_completions(
        &parser,
        "ls e",
        &[
            "example:ano/",
            "example:anoda/",
            "example:bota/",
            "example:leafInt ",
            "example:list",
            "example:ovoce",
            "example:ovocezelenina",
            "example:twoKeyList",
        ],
        1,
    );
    check_completions(
        &parser,
        "ls example:ano",
        &["example:ano/", "example:anoda/"],
        11,
    );
    check_completions(&parser, "ls example:anoda", &["example:anoda/"], 13);
    check_completions(&parser, "ls x", &[], 1);
    check_completions(&parser, "ls /", &ALL_TOP_NODES, 0);
    check_completions(&parser, "ls /s", &["second:amelie/"], 1);
    check_completions(&parser, "ls example:ano/", &["a2/", "listInCont"], 0);
    check_completions(&parser, "ls example:ano/a", &["a2/"], 1);
}

#[test]
fn list_opener_only_on_full_match() {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    // A partial name never gets the opening bracket.
    check_completions(&parser, "cd example:lis", &["example:list"], 11);
    // A full match does, even with other candidates sharing the prefix.
    check_completions(
        &parser,
        "ls example:ovoce",
        &["example:ovoce[", "example:ovocezelenina"],
        13,
    );
    check_completions(&parser, "cd example:list", &["example:list["], 12);
}

#[test]
fn completion_inside_list_instances() {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    check_completions(&parser, "cd example:list[", &["number="], 0);
    check_completions(&parser, "cd example:list[number=12]", &[], 0);
    check_completions(
        &parser,
        "cd example:twoKeyList[",
        &["name=", "number="],
        0,
    );
    check_completions(
        &parser,
        "cd example:twoKeyList[name=\"AHOJ\"][",
        &["number="],
        0,
    );
    check_completions(
        &parser,
        "cd example:twoKeyList[number=42][",
        &["name="],
        0,
    );
    check_completions(
        &parser,
        "cd example:twoKeyList[name=\"AHOJ\"][number=123]",
        &[],
        0,
    );
    // After a closed bracket the remaining keys are offered with their
    // opener.
    check_completions(
        &parser,
        "cd example:twoKeyList[number=42]",
        &["[name="],
        0,
    );
}

#[test]
fn completion_past_list_instances() {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    check_completions(
        &parser,
        "ls /example:list[number=3]/",
        &["contInList/"],
        0,
    );
    check_completions(
        &parser,
        "ls /example:list[number=3]/c",
        &["contInList/"],
        1,
    );
    check_completions(&parser, "ls /example:list[number=3]/x", &[], 1);
}

#[test]
fn completion_relative_to_cursor() {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let mut parser = Parser::new(&schema, &data_query, WritableOps::No);

    let command = parser.parse_command("cd example:ano").unwrap();
    if let yangsh_core::Command::Cd { path } = command {
        parser.change_node(&path);
    }
    check_completions(&parser, "ls ", &["a2/", "listInCont"], 0);
    check_completions(&parser, "cd a", &["a2/"], 1);
    // Absolute paths ignore the cursor.
    check_completions(&parser, "ls /s", &["second:amelie/"], 1);
}
