//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};

/// Capital-city cards used across the API tests.
pub const CAPITALS: &[(&str, &str)] = &[
    ("Paris", "France"),
    ("Rome", "Italy"),
    ("Madrid", "Spain"),
    ("Berlin", "Germany"),
    ("Lisbon", "Portugal"),
    ("Vienna", "Austria"),
    ("Athens", "Greece"),
];

/// Definition for a term in `CAPITALS`.
pub fn definition_of(term: &str) -> &'static str {
    CAPITALS
        .iter()
        .find(|(t, _)| *t == term)
        .map(|(_, d)| *d)
        .unwrap_or_else(|| panic!("unknown term {}", term))
}

pub fn start_request(mode: &str) -> Value {
    json!({ "mode": mode })
}

pub fn flip() -> Value {
    json!({ "type": "flip" })
}

pub fn next() -> Value {
    json!({ "type": "next" })
}

pub fn finish() -> Value {
    json!({ "type": "finish" })
}

pub fn restart() -> Value {
    json!({ "type": "restart" })
}

pub fn submit() -> Value {
    json!({ "type": "submit" })
}

pub fn answer(answer: &str) -> Value {
    json!({ "type": "answer", "answer": answer })
}

pub fn answer_at(index: usize, answer: &str) -> Value {
    json!({ "type": "answer", "index": index, "answer": answer })
}

pub fn click(item_id: &str) -> Value {
    json!({ "type": "click", "item_id": item_id })
}
