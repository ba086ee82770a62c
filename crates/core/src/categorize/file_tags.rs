use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Categorizer, invert, read_json};
use crate::error::Result;

/// Categories assigned per source file, with functions placed in files by a
/// tag index (one JSON object per tag with `kind`, `name` and `path`).
#[derive(Debug, Clone, Default)]
pub struct FileTagCategorizer {
    function_to_category: HashMap<String, String>,
}

impl FileTagCategorizer {
    pub fn from_files(category_to_files: &Path, tags: &Path) -> Result<Self> {
        let category_to_files: IndexMap<String, Vec<String>> = read_json(category_to_files)?;
        let tags: Vec<Value> = read_json(tags)?;
        Ok(Self::new(category_to_files, &tags))
    }

    /// Build the lookup from already-parsed tables.
    ///
    /// Tags that are not functions, lack a name or path, or live in a file no
    /// category claims are skipped.
    pub fn new(category_to_files: IndexMap<String, Vec<String>>, tags: &[Value]) -> Self {
        let file_to_category = invert(category_to_files);
        let mut function_to_category = HashMap::new();
        let mut malformed = 0usize;

        for tag in tags {
            let field = |key: &str| tag.get(key).and_then(Value::as_str);
            let Some(kind) = field("kind") else {
                malformed += 1;
                continue;
            };
            if kind != "function" {
                continue;
            }
            let (Some(name), Some(path)) = (field("name"), field("path")) else {
                malformed += 1;
                continue;
            };
            if name.is_empty() || path.is_empty() {
                malformed += 1;
                continue;
            }
            match file_to_category.get(path) {
                Some(category) => {
                    function_to_category.insert(name.to_string(), category.clone());
                }
                None => debug!(function = name, path = path, "source file has no category"),
            }
        }

        if malformed > 0 {
            warn!(malformed, "skipped malformed tag entries");
        }

        Self {
            function_to_category,
        }
    }

    pub fn len(&self) -> usize {
        self.function_to_category.len()
    }

    pub fn is_empty(&self) -> bool {
        self.function_to_category.is_empty()
    }
}

impl Categorizer for FileTagCategorizer {
    fn category(&self, function: &str) -> Option<&str> {
        self.function_to_category.get(function).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tables() -> (IndexMap<String, Vec<String>>, Vec<Value>) {
        let categories = serde_json::from_value(json!({
            "vtree": ["src/vtree/vtree.c", "src/vtree/io.c"],
            "compiler": ["src/compiler.c"],
        }))
        .unwrap();
        let tags = json!([
            {"kind": "function", "name": "vtree_new", "path": "src/vtree/vtree.c"},
            {"kind": "function", "name": "compile", "path": "src/compiler.c"},
            {"kind": "variable", "name": "global_counter", "path": "src/compiler.c"},
            {"kind": "function", "name": "orphan", "path": "src/util.c"},
            {"kind": "function", "path": "src/compiler.c"},
            {"kind": "function", "name": "", "path": "src/compiler.c"},
            {"name": "no_kind", "path": "src/compiler.c"},
            "not an object",
        ])
        .as_array()
        .cloned()
        .unwrap();
        (categories, tags)
    }

    #[test]
    fn maps_functions_through_their_files() {
        let (categories, tags) = tables();
        let map = FileTagCategorizer::new(categories, &tags);
        assert_eq!(map.category("vtree_new"), Some("vtree"));
        assert_eq!(map.category("compile"), Some("compiler"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn skips_non_functions_and_malformed_tags() {
        let (categories, tags) = tables();
        let map = FileTagCategorizer::new(categories, &tags);
        assert_eq!(map.category("global_counter"), None);
        assert_eq!(map.category("orphan"), None);
        assert_eq!(map.category("no_kind"), None);
    }

    #[test]
    fn loads_from_disk() {
        let (categories, tags) = tables();
        let dir = tempfile::tempdir().unwrap();
        let categories_path = dir.path().join("category_to_file.json");
        let tags_path = dir.path().join("tags.json");
        std::fs::write(&categories_path, serde_json::to_vec(&categories).unwrap()).unwrap();
        std::fs::write(&tags_path, serde_json::to_vec(&tags).unwrap()).unwrap();

        let map = FileTagCategorizer::from_files(&categories_path, &tags_path).unwrap();
        assert_eq!(map.category("compile"), Some("compiler"));
    }
}
