//! Output node naming
//!
//! Names are fixed up once per node id and cached, so animation channels
//! always refer to the same name the hierarchy walk emitted.

use rustc_hash::FxHashMap;

use crate::document::NodeId;

/// Prefix the source format puts in front of every model name.
const MODEL_PREFIX: &str = "Model::";

/// Removes the source class prefix from a model name.
#[must_use]
pub fn fix_node_name(name: &str) -> &str {
    name.strip_prefix(MODEL_PREFIX).unwrap_or(name)
}

/// Hands out unique names by appending a three-digit instance counter to
/// names that were seen before: `Cube`, `Cube001`, `Cube002`, …
#[derive(Debug, Default)]
pub struct NameCache {
    counters: FxHashMap<String, u32>,
}

impl NameCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique_name(&mut self, name: &str) -> String {
        let Some(&seen) = self.counters.get(name) else {
            self.counters.insert(name.to_owned(), 0);
            return name.to_owned();
        };

        let mut counter = seen;
        loop {
            counter += 1;
            let candidate = format!("{name}{counter:03}");
            if !self.counters.contains_key(&candidate) {
                self.counters.insert(name.to_owned(), counter);
                self.counters.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }
}

/// Per-id cache of final output names.
#[derive(Debug, Default)]
pub struct NodeNames {
    cache: NameCache,
    by_id: FxHashMap<NodeId, String>,
}

impl NodeNames {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the output name of `id`, assigning one from `raw` on first
    /// request.
    pub fn name_for(&mut self, id: NodeId, raw: &str) -> String {
        if let Some(name) = self.by_id.get(&id) {
            return name.clone();
        }
        let fixed = fix_node_name(raw);
        let base = if fixed.is_empty() {
            format!("Node_{}", id.0)
        } else {
            fixed.to_owned()
        };
        let name = self.cache.unique_name(&base);
        self.by_id.insert(id, name.clone());
        name
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }
}
