#![allow(dead_code)]

use std::collections::BTreeSet;

use yangsh_core::parser::Parser;
use yangsh_core::path::{DataNode, DataPath, DataSuffix, ListKeys, Scope};
use yangsh_core::value::Value;

pub fn container(module: Option<&str>, name: &str) -> DataNode {
    DataNode::new(
        module.map(str::to_owned),
        DataSuffix::Container(name.to_owned()),
    )
}

pub fn leaf(module: Option<&str>, name: &str) -> DataNode {
    DataNode::new(module.map(str::to_owned), DataSuffix::Leaf(name.to_owned()))
}

pub fn list(module: Option<&str>, name: &str) -> DataNode {
    DataNode::new(module.map(str::to_owned), DataSuffix::List(name.to_owned()))
}

pub fn leaf_list(module: Option<&str>, name: &str) -> DataNode {
    DataNode::new(
        module.map(str::to_owned),
        DataSuffix::LeafList(name.to_owned()),
    )
}

pub fn list_element(
    module: Option<&str>,
    name: &str,
    keys: ListKeys,
) -> DataNode {
    DataNode::new(
        module.map(str::to_owned),
        DataSuffix::ListElement(name.to_owned(), keys),
    )
}

pub fn leaf_list_element(
    module: Option<&str>,
    name: &str,
    value: Value,
) -> DataNode {
    DataNode::new(
        module.map(str::to_owned),
        DataSuffix::LeafListElement(name.to_owned(), value),
    )
}

pub fn rpc(module: Option<&str>, name: &str) -> DataNode {
    DataNode::new(module.map(str::to_owned), DataSuffix::Rpc(name.to_owned()))
}

pub fn up() -> DataNode {
    DataNode::new(None, DataSuffix::Up)
}

pub fn relative(nodes: Vec<DataNode>) -> DataPath {
    DataPath::new(Scope::Relative, nodes, false)
}

pub fn absolute(nodes: Vec<DataNode>) -> DataPath {
    DataPath::new(Scope::Absolute, nodes, false)
}

pub fn check_completions(
    parser: &Parser<'_>,
    input: &str,
    expected: &[&str],
    context_length: usize,
) {
    let completions = parser.completions(input);
    let expected = expected
        .iter()
        .map(|s| (*s).to_owned())
        .collect::<BTreeSet<_>>();
    assert_eq!(
        completions.completions, expected,
        "completion set for {:?}",
        input
    );
    assert_eq!(
        completions.context_length, context_length,
        "context length for {:?}",
        input
    );
}
