//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;

use crate::path::{DataPath, ListKeys, Prefixes};

/// Data-instance query facade, consulted while completing list-key values.
/// The argument is a data path whose final segment is a key-less list; the
/// result is the set of key instances currently present in the datastore.
pub trait DataQuery: Sync {
    fn list_instances(&self, list: &DataPath) -> Vec<ListKeys>;
}

/// Canned query results keyed by the list's canonical path string. Used by
/// tests and by sessions without a live datastore.
#[derive(Debug, Default)]
pub struct StaticDataQuery {
    instances: HashMap<String, Vec<ListKeys>>,
}

// ===== impl StaticDataQuery =====

impl StaticDataQuery {
    pub fn new() -> StaticDataQuery {
        StaticDataQuery::default()
    }

    /// Registers the key instances of the list at `path` (canonical form,
    /// e.g. `/example:list`).
    pub fn insert(&mut self, path: &str, instances: Vec<ListKeys>) {
        self.instances.insert(path.to_owned(), instances);
    }
}

impl DataQuery for StaticDataQuery {
    fn list_instances(&self, list: &DataPath) -> Vec<ListKeys> {
        self.instances
            .get(&list.to_path_string(Prefixes::Always))
            .cloned()
            .unwrap_or_default()
    }
}
