//! Function → category lookup.
//!
//! The engine only ever asks one question of a category table: which
//! category does this symbol belong to. Tables come in different shapes, each
//! handled by its own adapter behind [`Categorizer`].

mod file_tags;
mod function_list;

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{Error, Result};

pub use file_tags::FileTagCategorizer;
pub use function_list::FunctionListCategorizer;

/// Category reported for symbols missing from the table.
pub const UNCATEGORIZED: &str = "None";

pub trait Categorizer {
    /// Category of `function`, or `None` if the table does not know it.
    fn category(&self, function: &str) -> Option<&str>;
}

impl<C: Categorizer + ?Sized> Categorizer for Box<C> {
    fn category(&self, function: &str) -> Option<&str> {
        (**self).category(function)
    }
}

/// A table held directly in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCategorizer {
    function_to_category: HashMap<String, String>,
}

impl StaticCategorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, function: impl Into<String>, category: impl Into<String>) {
        self.function_to_category
            .insert(function.into(), category.into());
    }
}

impl<F: Into<String>, C: Into<String>> FromIterator<(F, C)> for StaticCategorizer {
    fn from_iter<I: IntoIterator<Item = (F, C)>>(iter: I) -> Self {
        let mut categorizer = Self::new();
        for (function, category) in iter {
            categorizer.insert(function, category);
        }
        categorizer
    }
}

impl Categorizer for StaticCategorizer {
    fn category(&self, function: &str) -> Option<&str> {
        self.function_to_category.get(function).map(String::as_str)
    }
}

/// Memoizes lookups so each distinct symbol reaches the table once, with
/// misses already mapped to [`UNCATEGORIZED`].
pub struct CategoryCache<'a, C: ?Sized> {
    inner: &'a C,
    resolved: HashMap<String, String>,
}

impl<'a, C: Categorizer + ?Sized> CategoryCache<'a, C> {
    pub fn new(inner: &'a C) -> Self {
        Self {
            inner,
            resolved: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, function: &str) -> &str {
        if !self.resolved.contains_key(function) {
            let category = self.inner.category(function).unwrap_or(UNCATEGORIZED);
            self.resolved
                .insert(function.to_string(), category.to_string());
        }
        self.resolved
            .get(function)
            .map_or(UNCATEGORIZED, String::as_str)
    }
}

/// Invert a `category → [item]` table into `item → category`. When an item
/// is listed under several categories the last listing wins.
fn invert(table: IndexMap<String, Vec<String>>) -> HashMap<String, String> {
    let mut inverted = HashMap::new();
    for (category, items) in table {
        for item in items {
            inverted.insert(item, category.clone());
        }
    }
    inverted
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_slice(&data).map_err(|e| Error::json(path, e))
}
