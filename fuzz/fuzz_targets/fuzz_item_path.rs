// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fuzz target for field lists and item path rendering

#![no_main]

use arbitrary::Arbitrary;
use boxwalk_core::{FieldSet, Item, PathEntry};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    fields: &'a str,
    name: &'a str,
    ancestors: Vec<(&'a str, &'a str)>,
}

fuzz_target!(|input: Input<'_>| {
    let fields = FieldSet::parse(input.fields);
    for required in ["id", "type", "name", "path_collection"] {
        assert!(fields.contains(required));
    }
    let _ = fields.to_query();

    let entries: Vec<PathEntry> = input
        .ancestors
        .iter()
        .map(|(id, name)| PathEntry::new(*id, *name))
        .collect();
    let item = Item::file("1", input.name).with_path_entries(entries);
    let path = item.display_path();
    assert!(!path.starts_with('/'));
});
