//! Directory entry map.

use std::collections::HashMap;

use super::types::NodeId;

/// Entries of a directory node: name → node ID, unique per parent.
///
/// Insertion order carries no meaning; the host's readdir layer is free to
/// sort or not.
#[derive(Debug, Clone, Default)]
pub(crate) struct DirEntries {
    entries: HashMap<String, NodeId>,
}

impl DirEntries {
    /// Create an empty entry map.
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Bind `name` to `id`, returning any entry it displaced.
    pub(crate) fn insert(&mut self, name: String, id: NodeId) -> Option<NodeId> {
        self.entries.insert(name, id)
    }

    /// Get the node ID bound to `name`.
    pub(crate) fn get(&self, name: &str) -> Option<NodeId> {
        self.entries.get(name).copied()
    }

    /// Remove the binding for `name`, returning the node ID it held.
    pub(crate) fn remove(&mut self, name: &str) -> Option<NodeId> {
        self.entries.remove(name)
    }

    /// Number of entries.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Snapshot of all entries as (name, node ID) pairs.
    pub(crate) fn to_vec(&self) -> Vec<(String, NodeId)> {
        self.entries.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut entries: DirEntries = DirEntries::new();
        assert_eq!(entries.len(), 0);

        assert_eq!(entries.insert("file.txt".to_string(), 2), None);
        assert_eq!(entries.insert("subdir".to_string(), 3), None);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get("file.txt"), Some(2));
        assert_eq!(entries.get("subdir"), Some(3));
        assert_eq!(entries.get("missing"), None);
    }

    #[test]
    fn test_remove() {
        let mut entries: DirEntries = DirEntries::new();
        entries.insert("file.txt".to_string(), 2);

        assert_eq!(entries.remove("file.txt"), Some(2));
        assert_eq!(entries.remove("file.txt"), None);
        assert_eq!(entries.len(), 0);
    }

    #[test]
    fn test_snapshot() {
        let mut entries: DirEntries = DirEntries::new();
        entries.insert("a".to_string(), 2);
        entries.insert("b".to_string(), 3);

        let mut snapshot: Vec<(String, NodeId)> = entries.to_vec();
        snapshot.sort();
        assert_eq!(snapshot, vec![("a".to_string(), 2), ("b".to_string(), 3)]);
    }
}
