//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;

use derive_new::new;

/// Controls when a completion's suffix gets appended to its value: always,
/// or only once the typed prefix matches the whole value (used for the `[`
/// opener of lists, which should not fire while the name is still partial).
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum WhenToAdd {
    Always,
    IfFullMatch,
}

/// A single completion candidate published by a grammar rule.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, new)]
pub struct Completion {
    pub value: String,
    pub suffix: String,
    pub when_to_add: WhenToAdd,
}

/// Result of a completion request: the rendered candidate strings plus the
/// number of characters (from the anchor to the end of input) the line
/// editor should replace.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Completions {
    pub completions: BTreeSet<String>,
    pub context_length: usize,
}

// ===== impl Completion =====

impl Completion {
    /// A plain candidate with no suffix.
    pub fn bare(value: impl Into<String>) -> Completion {
        Completion::new(value.into(), String::new(), WhenToAdd::Always)
    }

    /// Renders the candidate according to the suffix policy, given the
    /// prefix typed so far.
    pub fn render(&self, prefix: &str) -> String {
        let full_match = self.value == prefix;
        match self.when_to_add {
            WhenToAdd::Always => format!("{}{}", self.value, self.suffix),
            WhenToAdd::IfFullMatch if full_match => {
                format!("{}{}", self.value, self.suffix)
            }
            WhenToAdd::IfFullMatch => self.value.clone(),
        }
    }
}

// ===== global functions =====

/// The subset of `set` whose values start with `prefix`.
pub fn filter_by_prefix(
    set: &BTreeSet<Completion>,
    prefix: &str,
) -> BTreeSet<Completion> {
    set.iter()
        .filter(|completion| completion.value.starts_with(prefix))
        .cloned()
        .collect()
}
