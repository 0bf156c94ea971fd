mod common;

use common::*;
use maplit::btreemap;
use yangsh_core::ast::{Command, MoveDestination};
use yangsh_core::data::StaticDataQuery;
use yangsh_core::parser::{Parser, WritableOps};
use yangsh_core::schema::LeafType;
use yangsh_core::static_schema::StaticSchema;
use yangsh_core::value::Value;

fn schema() -> StaticSchema {
    let mut schema = StaticSchema::new();
    schema.add_module("mod");
    schema.add_container("/", "mod:cont");
    schema.add_presence_container("/", "mod:pCont");
    schema.add_presence_container("/mod:cont", "pInCont");
    schema.add_leaf_list("/", "mod:leaflist", LeafType::String);
    schema.add_leaf_list("/", "mod:intLeaflist", LeafType::Int32);
    schema.add_list("/", "mod:protocols", &["name"]);
    schema.add_leaf("/mod:protocols", "name", LeafType::String);
    schema.add_list("/", "mod:servers", &["id"]);
    schema.add_leaf("/mod:servers", "id", LeafType::Int32);
    schema.add_presence_container("/mod:servers", "settings");
    schema.add_list("/", "mod:points", &["x", "y"]);
    schema.add_leaf("/mod:points", "x", LeafType::Int32);
    schema.add_leaf("/mod:points", "y", LeafType::Int32);
    schema.add_leaf("/", "mod:leafInt", LeafType::Int32);
    schema
}

fn parse(line: &str) -> Result<Command, yangsh_core::ParseError> {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);
    parser.parse_command(line)
}

#[test]
fn create_presence_container() {
    assert_eq!(
        parse("create mod:pCont").unwrap(),
        Command::Create {
            path: relative(vec![container(Some("mod"), "pCont")]),
        }
    );
    assert_eq!(
        parse("create mod:cont/pInCont").unwrap(),
        Command::Create {
            path: relative(vec![
                container(Some("mod"), "cont"),
                container(None, "pInCont"),
            ]),
        }
    );
    // Non-presence containers exist implicitly and can't be created.
    assert!(parse("create mod:cont").is_err());
}

#[test]
fn create_list_instance() {
    assert_eq!(
        parse("create mod:protocols[name='ftp']").unwrap(),
        Command::Create {
            path: relative(vec![list_element(
                Some("mod"),
                "protocols",
                btreemap! {
                    "name".to_owned() => Value::String("ftp".to_owned())
                },
            )]),
        }
    );
}

#[test]
fn create_presence_container_inside_list_instance() {
    assert_eq!(
        parse("create mod:servers[id=1]/settings").unwrap(),
        Command::Create {
            path: relative(vec![
                list_element(
                    Some("mod"),
                    "servers",
                    btreemap! {"id".to_owned() => Value::Int32(1)},
                ),
                container(None, "settings"),
            ]),
        }
    );
}

#[test]
fn create_leaf_list_instance() {
    let expected = Command::Create {
        path: relative(vec![leaf_list_element(
            Some("mod"),
            "leaflist",
            Value::String("abc".to_owned()),
        )]),
    };
    // Both the canonical and the shorthand selector forms parse.
    assert_eq!(parse("create mod:leaflist[.='abc']").unwrap(), expected);
    assert_eq!(parse("create mod:leaflist['abc']").unwrap(), expected);
}

#[test]
fn delete_targets() {
    assert!(parse("delete mod:pCont").is_ok());
    assert!(parse("delete mod:protocols[name='ftp']").is_ok());
    assert!(parse("delete mod:leaflist['abc']").is_ok());
    // Leaf values may be deleted too.
    assert_eq!(
        parse("delete mod:leafInt").unwrap(),
        Command::Delete {
            path: relative(vec![leaf(Some("mod"), "leafInt")]),
        }
    );
    assert!(parse("delete mod:cont").is_err());
}

#[test]
fn move_absolute() {
    assert_eq!(
        parse("move mod:leaflist['abc'] begin").unwrap(),
        Command::Move {
            source: relative(vec![leaf_list_element(
                Some("mod"),
                "leaflist",
                Value::String("abc".to_owned()),
            )]),
            destination: MoveDestination::Begin,
        }
    );
    assert_eq!(
        parse("move mod:protocols[name='ftp'] end").unwrap(),
        Command::Move {
            source: relative(vec![list_element(
                Some("mod"),
                "protocols",
                btreemap! {
                    "name".to_owned() => Value::String("ftp".to_owned())
                },
            )]),
            destination: MoveDestination::End,
        }
    );
}

#[test]
fn move_relative_leaf_list() {
    // The destination sibling's value lands under the "." pseudo-key.
    assert_eq!(
        parse("move mod:leaflist['def'] after 'abc'").unwrap(),
        Command::Move {
            source: relative(vec![leaf_list_element(
                Some("mod"),
                "leaflist",
                Value::String("def".to_owned()),
            )]),
            destination: MoveDestination::After(btreemap! {
                ".".to_owned() => Value::String("abc".to_owned())
            }),
        }
    );
    assert_eq!(
        parse("move mod:intLeaflist[.=4] before 7").unwrap(),
        Command::Move {
            source: relative(vec![leaf_list_element(
                Some("mod"),
                "intLeaflist",
                Value::Int32(4),
            )]),
            destination: MoveDestination::Before(btreemap! {
                ".".to_owned() => Value::Int32(7)
            }),
        }
    );
}

#[test]
fn move_relative_list() {
    assert_eq!(
        parse("move mod:protocols[name='ftp'] before [name='tftp']")
            .unwrap(),
        Command::Move {
            source: relative(vec![list_element(
                Some("mod"),
                "protocols",
                btreemap! {
                    "name".to_owned() => Value::String("ftp".to_owned())
                },
            )]),
            destination: MoveDestination::Before(btreemap! {
                "name".to_owned() => Value::String("tftp".to_owned())
            }),
        }
    );
    // The destination instance needs the full key set.
    assert!(parse("move mod:points[x=1][y=2] after [x=3][y=4]").is_ok());
    assert!(parse("move mod:points[x=1][y=2] after [x=3]").is_err());
}

#[test]
fn move_errors() {
    let error = parse("move mod:leaflist['def']").unwrap_err();
    assert_eq!(
        error.message,
        "Expected a move position (begin, end, before, after) here:"
    );

    let error = parse("move mod:leaflist['def'] sideways").unwrap_err();
    assert_eq!(
        error.message,
        "Expected a move position (begin, end, before, after) here:"
    );
    assert_eq!(error.offset, 25);

    let error = parse("move mod:cont begin").unwrap_err();
    assert_eq!(error.message, "Expected a source path here:");

    let error = parse("move mod:protocols[name='ftp'] after").unwrap_err();
    assert_eq!(error.message, "Expected a destination here:");
}

#[test]
fn move_position_completion() {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    check_completions(
        &parser,
        "move mod:leaflist['def'] ",
        &["after", "before", "begin", "end"],
        0,
    );
    check_completions(
        &parser,
        "move mod:leaflist['def'] be",
        &["before", "begin"],
        2,
    );
}
