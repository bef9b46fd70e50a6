// SPDX-License-Identifier: MIT

use super::*;

define_id! {
    pub struct TestId("tst-");
}

#[test]
fn new_ids_carry_prefix() {
    let id = TestId::new();
    assert!(id.as_str().starts_with("tst-"));
    assert_eq!(id.as_str().len(), ID_MAX_LEN);
}

#[test]
fn from_string_round_trips() {
    let id = TestId::from_string("tst-abc123");
    assert_eq!(id.as_str(), "tst-abc123");
    assert_eq!(id.suffix(), "abc123");
}

#[test]
fn two_new_ids_are_distinct() {
    assert_ne!(TestId::new(), TestId::new());
}

#[test]
fn short_truncates() {
    assert_eq!(short("hello world", 5), "hello");
    assert_eq!(short("hi", 5), "hi");
}

#[test]
fn idbuf_borrow_matches_hashmap_lookup() {
    use std::collections::HashMap;
    let mut map: HashMap<IdBuf, i32> = HashMap::new();
    map.insert(IdBuf::new("abc"), 1);
    assert_eq!(map.get("abc"), Some(&1));
}
