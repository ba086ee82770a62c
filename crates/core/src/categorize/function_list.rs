use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;

use super::{Categorizer, invert, read_json};
use crate::error::Result;

/// Categories listing their member functions directly.
#[derive(Debug, Clone, Default)]
pub struct FunctionListCategorizer {
    function_to_category: HashMap<String, String>,
}

impl FunctionListCategorizer {
    pub fn from_file(category_to_functions: &Path) -> Result<Self> {
        Ok(Self::new(read_json(category_to_functions)?))
    }

    pub fn new(category_to_functions: IndexMap<String, Vec<String>>) -> Self {
        Self {
            function_to_category: invert(category_to_functions),
        }
    }
}

impl Categorizer for FunctionListCategorizer {
    fn category(&self, function: &str) -> Option<&str> {
        self.function_to_category.get(function).map(String::as_str)
    }
}
