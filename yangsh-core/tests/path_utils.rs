mod common;

use common::*;
use yangsh_core::ast::{AnyPath, Command};
use yangsh_core::data::StaticDataQuery;
use yangsh_core::parser::{Parser, WritableOps};
use yangsh_core::path::Prefixes;
use yangsh_core::schema::LeafType;
use yangsh_core::static_schema::StaticSchema;
use yangsh_core::value::{Decimal64, Value, escape_key_string, render_key_value};

fn schema() -> StaticSchema {
    let mut schema = StaticSchema::new();
    schema.add_module("example");
    schema.add_module("other");
    schema.add_container("/", "example:a");
    schema.add_container("/example:a", "a2");
    schema.add_list("/", "example:twoKeyList", &["number", "name"]);
    schema.add_leaf("/example:twoKeyList", "number", LeafType::Int32);
    schema.add_leaf("/example:twoKeyList", "name", LeafType::String);
    schema.add_leaf_list("/", "example:addresses", LeafType::String);
    schema.add_leaf("/", "example:leafInt", LeafType::Int32);
    schema
}

fn parse_path(line: &str) -> yangsh_core::DataPath {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);
    match parser.parse_command(line).unwrap() {
        Command::Cd { path } => path,
        Command::Create { path } => path,
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn render_prefix_policies() {
    let path = parse_path("cd /example:a/a2");
    assert_eq!(
        path.to_path_string(Prefixes::WhenNeeded),
        "/example:a/a2"
    );
    assert_eq!(
        path.to_path_string(Prefixes::Always),
        "/example:a/example:a2"
    );

    // A redundant inner prefix renders away under when-needed.
    let path = parse_path("cd /example:a/example:a2");
    assert_eq!(
        path.to_path_string(Prefixes::WhenNeeded),
        "/example:a/a2"
    );
}

#[test]
fn render_list_keys() {
    let path = parse_path("cd example:twoKeyList[number=1][name='abc']");
    assert_eq!(
        path.to_path_string(Prefixes::WhenNeeded),
        "example:twoKeyList[name='abc'][number=1]"
    );

    // Values with a single quote switch to double quotes.
    let path = parse_path("cd example:twoKeyList[number=1][name=\"a'b\"]");
    assert_eq!(
        path.to_path_string(Prefixes::WhenNeeded),
        "example:twoKeyList[name=\"a'b\"][number=1]"
    );
}

#[test]
fn render_leaf_list_elements() {
    let path = parse_path("create example:addresses['fe80::1']");
    assert_eq!(
        path.to_path_string(Prefixes::WhenNeeded),
        "example:addresses[.='fe80::1']"
    );
}

#[test]
fn render_parse_round_trip() {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    for input in [
        "cd /example:a/a2",
        "cd example:twoKeyList[name='x'][number=3]",
        "create example:addresses[.='10.0.0.1']",
    ] {
        let (Command::Cd { path } | Command::Create { path }) =
            parser.parse_command(input).unwrap()
        else {
            panic!("unexpected command");
        };
        let rendered = path.to_path_string(Prefixes::WhenNeeded);
        let reparsed = parser
            .parse_command(&format!(
                "{} {}",
                input.split_whitespace().next().unwrap(),
                rendered
            ))
            .unwrap();
        let (Command::Cd { path: reparsed }
        | Command::Create { path: reparsed }) = reparsed
        else {
            panic!("unexpected command");
        };
        assert_eq!(
            reparsed.to_path_string(Prefixes::WhenNeeded),
            rendered,
            "round trip for {:?}",
            input
        );
    }
}

#[test]
fn schema_path_erasure() {
    let path = parse_path("cd example:twoKeyList[number=1][name='abc']");
    let schema_path = path.to_schema_path();
    assert_eq!(
        schema_path.to_path_string(Prefixes::WhenNeeded),
        "example:twoKeyList"
    );
}

#[test]
fn describe_accepts_both_trees() {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    // Data path when keys are present.
    let command = parser
        .parse_command("describe example:twoKeyList[number=1][name='x']")
        .unwrap();
    assert!(matches!(
        command,
        Command::Describe {
            path: AnyPath::Data(_)
        }
    ));

    // Bare lists parse as a data path with a list tail.
    let command = parser.parse_command("describe example:twoKeyList").unwrap();
    assert!(matches!(
        command,
        Command::Describe {
            path: AnyPath::Data(_)
        }
    ));

    // Leaves work too.
    assert!(parser.parse_command("describe example:leafInt").is_ok());
    assert!(parser.parse_command("describe example:missing").is_err());
}

#[test]
fn key_value_quoting() {
    assert_eq!(escape_key_string("abc"), "'abc'");
    assert_eq!(escape_key_string("a'bc"), "\"a'bc\"");
    assert_eq!(
        render_key_value(&Value::String("eth0".to_owned())),
        "'eth0'"
    );
    assert_eq!(render_key_value(&Value::Int32(-3)), "-3");
    assert_eq!(render_key_value(&Value::Bool(true)), "true");
    assert_eq!(
        render_key_value(&Value::Enum("fast".to_owned())),
        "fast"
    );
    assert_eq!(
        render_key_value(&Value::IdentityRef {
            module: Some("mod".to_owned()),
            name: "pizza".to_owned(),
        }),
        "mod:pizza"
    );
}

#[test]
fn decimal_rendering() {
    assert_eq!(Decimal64::new(314, 2).to_string(), "3.14");
    assert_eq!(Decimal64::new(300, 2).to_string(), "3.0");
    assert_eq!(Decimal64::new(-50, 2).to_string(), "-0.5");
    assert_eq!(Decimal64::new(0, 2).to_string(), "0.0");
    assert_eq!(Decimal64::new(420, 1).to_string(), "42.0");
}

#[test]
fn value_display() {
    assert_eq!(Value::String("x y".to_owned()).to_string(), "x y");
    assert_eq!(Value::Uint64(18446744073709551615).to_string(), "18446744073709551615");
    assert_eq!(Value::Empty.to_string(), "");
    assert_eq!(
        Value::Bits(["b", "a"].iter().map(|s| (*s).to_owned()).collect())
            .to_string(),
        "a b"
    );
    assert_eq!(
        Value::IdentityRef {
            module: None,
            name: "pizza".to_owned(),
        }
        .to_string(),
        "pizza"
    );
}
