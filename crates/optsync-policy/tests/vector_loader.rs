//! JSON decision vectors shared by the policy tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AllowVector {
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub allowed: bool,
}

#[derive(Debug, Deserialize)]
pub struct SkipVector {
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub property: String,
    pub skip: bool,
}

pub fn load<T: DeserializeOwned>(name: &str) -> Vec<T> {
    let s = fs::read_to_string(format!("tests/vectors/{name}"))
        .unwrap_or_else(|e| panic!("missing vector file {name}: {e}"));
    serde_json::from_str(&s).expect("invalid vector json")
}
