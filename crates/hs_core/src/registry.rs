use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A linked program and the two source files it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramEntry<P> {
    pub name: String,
    pub handle: P,
    pub vertex_path: PathBuf,
    pub fragment_path: PathBuf,
}

impl<P> ProgramEntry<P> {
    pub fn depends_on(&self, path: &Path) -> bool {
        self.vertex_path == path || self.fragment_path == path
    }
}

/// Program entries keyed by logical name.
///
/// Pure bookkeeping: nothing here talks to the graphics API. Handles that
/// get replaced or removed are handed back so the caller can release them.
#[derive(Debug)]
pub struct ProgramRegistry<P> {
    entries: BTreeMap<String, ProgramEntry<P>>,
}

impl<P: Copy> ProgramRegistry<P> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or replace the entry for `name`. Returns the previous handle.
    pub fn upsert(
        &mut self,
        name: &str,
        handle: P,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Option<P> {
        let entry = ProgramEntry {
            name: name.to_string(),
            handle,
            vertex_path: vertex_path.to_path_buf(),
            fragment_path: fragment_path.to_path_buf(),
        };
        self.entries
            .insert(name.to_string(), entry)
            .map(|previous| previous.handle)
    }

    /// Names of every program built from `path`, in name order.
    pub fn dependents_of(&self, path: &Path) -> Vec<String> {
        self.entries
            .values()
            .filter(|entry| entry.depends_on(path))
            .map(|entry| entry.name.clone())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&ProgramEntry<P>> {
        self.entries.get(name)
    }

    pub fn handle(&self, name: &str) -> Option<P> {
        self.entries.get(name).map(|entry| entry.handle)
    }

    pub fn remove(&mut self, name: &str) -> Option<ProgramEntry<P>> {
        self.entries.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProgramEntry<P>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Copy> Default for ProgramRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn upsert_inserts_then_replaces_in_place() {
        let mut registry = ProgramRegistry::new();
        assert_eq!(
            registry.upsert("sprite", 1u32, &p("sprite.vert"), &p("sprite.frag")),
            None
        );
        assert_eq!(
            registry.upsert("sprite", 2u32, &p("sprite.vert"), &p("other.frag")),
            Some(1)
        );
        assert_eq!(registry.len(), 1);

        let entry = registry.get("sprite").expect("entry exists");
        assert_eq!(entry.handle, 2);
        assert_eq!(entry.fragment_path, p("other.frag"));
    }

    #[test]
    fn dependents_of_matches_either_stage() {
        let mut registry = ProgramRegistry::new();
        registry.upsert("p1", 1u32, &p("shared.vert"), &p("a.frag"));
        registry.upsert("p2", 2u32, &p("shared.vert"), &p("b.frag"));
        registry.upsert("p3", 3u32, &p("own.vert"), &p("a.frag"));

        assert_eq!(registry.dependents_of(&p("shared.vert")), vec!["p1", "p2"]);
        assert_eq!(registry.dependents_of(&p("a.frag")), vec!["p1", "p3"]);
        assert_eq!(registry.dependents_of(&p("b.frag")), vec!["p2"]);
        assert!(registry.dependents_of(&p("unused.frag")).is_empty());
    }

    #[test]
    fn get_unknown_name_is_none() {
        let registry: ProgramRegistry<u32> = ProgramRegistry::new();
        assert!(registry.get("missing").is_none());
        assert!(registry.handle("missing").is_none());
    }

    #[test]
    fn remove_hands_back_entry() {
        let mut registry = ProgramRegistry::new();
        registry.upsert("p1", 7u32, &p("a.vert"), &p("a.frag"));
        let removed = registry.remove("p1").expect("removed");
        assert_eq!(removed.handle, 7);
        assert!(registry.is_empty());
        assert!(registry.remove("p1").is_none());
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = ProgramRegistry::new();
        registry.upsert("zeta", 1u32, &p("z.vert"), &p("z.frag"));
        registry.upsert("alpha", 2u32, &p("a.vert"), &p("a.frag"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
    }
}
