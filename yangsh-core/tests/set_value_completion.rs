mod common;

use std::collections::BTreeSet;

use common::*;
use yangsh_core::data::StaticDataQuery;
use yangsh_core::parser::{Parser, WritableOps};
use yangsh_core::schema::LeafType;
use yangsh_core::static_schema::StaticSchema;

fn schema() -> StaticSchema {
    let mut schema = StaticSchema::new();
    schema.add_module("mod");
    schema.add_module("pizza-module");
    schema.add_leaf(
        "/",
        "mod:leafEnum",
        LeafType::Enumeration(
            ["lol", "data", "coze"]
                .iter()
                .map(|s| (*s).to_owned())
                .collect::<BTreeSet<_>>(),
        ),
    );
    schema.add_identity(None, ("mod", "food"));
    schema.add_identity(Some(("mod", "food")), ("mod", "pizza"));
    schema.add_identity(Some(("mod", "food")), ("mod", "spaghetti"));
    schema.add_identity(Some(("mod", "pizza")), ("pizza-module", "hawaii"));
    let food = schema.valid_identities("mod", "food");
    schema.add_leaf("/", "mod:foodIdentRef", LeafType::IdentityRef(food));
    schema.add_leaf(
        "/",
        "mod:flags",
        LeafType::Bits(
            ["a", "b", "c"].iter().map(|s| (*s).to_owned()).collect(),
        ),
    );
    schema.add_leaf(
        "/",
        "mod:leafUnion",
        LeafType::Union(vec![
            LeafType::Int32,
            LeafType::Enumeration(
                ["infinity", "unbounded"]
                    .iter()
                    .map(|s| (*s).to_owned())
                    .collect::<BTreeSet<_>>(),
            ),
        ]),
    );
    schema
}

#[test]
fn enum_values() {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    check_completions(
        &parser,
        "set mod:leafEnum ",
        &["coze", "data", "lol"],
        0,
    );
    check_completions(&parser, "set mod:leafEnum c", &["coze"], 1);
    check_completions(&parser, "set mod:leafEnum x", &[], 1);
}

#[test]
fn identity_values() {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    // The whole derivation closure, always prefixed.
    check_completions(
        &parser,
        "set mod:foodIdentRef ",
        &["mod:food", "mod:pizza", "mod:spaghetti", "pizza-module:hawaii"],
        0,
    );
    check_completions(
        &parser,
        "set mod:foodIdentRef mod:p",
        &["mod:pizza"],
        5,
    );
    check_completions(
        &parser,
        "set mod:foodIdentRef pizza-m",
        &["pizza-module:hawaii"],
        7,
    );
}

#[test]
fn bits_values() {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    check_completions(&parser, "set mod:flags ", &["a", "b", "c"], 0);
    // Already chosen bits are not offered again.
    check_completions(&parser, "set mod:flags a ", &["b", "c"], 0);
    check_completions(&parser, "set mod:flags a c ", &["b"], 0);
}

#[test]
fn union_members_combined() {
    let schema = schema();
    let data_query = StaticDataQuery::new();
    let parser = Parser::new(&schema, &data_query, WritableOps::No);

    check_completions(
        &parser,
        "set mod:leafUnion ",
        &["infinity", "unbounded"],
        0,
    );
    check_completions(&parser, "set mod:leafUnion in", &["infinity"], 2);
}
