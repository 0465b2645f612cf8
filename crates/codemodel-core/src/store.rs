use crate::{AnalysisArtifacts, ApiEndpoint, Artifact, Relation, Symbol};
use parking_lot::RwLock;

/// Append-only container accumulating artifacts across all scanned files.
///
/// The store is the single piece of shared mutable state in a scan, so it
/// synchronizes internally; appends from concurrent file tasks interleave
/// in arrival order. `snapshot` hands out an independent copy: mutating a
/// snapshot never changes the store, and later appends never change an
/// already-taken snapshot.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    inner: RwLock<AnalysisArtifacts>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_symbols(&self, symbols: impl IntoIterator<Item = Symbol>) {
        self.inner.write().symbols.extend(symbols);
    }

    pub fn add_relations(&self, relations: impl IntoIterator<Item = Relation>) {
        self.inner.write().relations.extend(relations);
    }

    pub fn add_endpoints(&self, endpoints: impl IntoIterator<Item = ApiEndpoint>) {
        self.inner.write().endpoints.extend(endpoints);
    }

    /// Append a mixed artifact stream, partitioning by record type under a
    /// single write lock so one file's artifacts stay contiguous.
    pub fn add_artifacts(&self, artifacts: impl IntoIterator<Item = Artifact>) {
        let mut inner = self.inner.write();
        for artifact in artifacts {
            match artifact {
                Artifact::Symbol(symbol) => inner.symbols.push(symbol),
                Artifact::Relation(relation) => inner.relations.push(relation),
                Artifact::Endpoint(endpoint) => inner.endpoints.push(endpoint),
            }
        }
    }

    pub fn snapshot(&self) -> AnalysisArtifacts {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Language, RelationKind, SymbolKind};

    fn symbol(name: &str) -> Symbol {
        Symbol::new(name, SymbolKind::Function, Language::Python, "app.py")
    }

    #[test]
    fn snapshot_is_isolated_from_later_adds() {
        let store = ArtifactStore::new();
        store.add_symbols([symbol("a")]);
        let snap = store.snapshot();
        store.add_symbols([symbol("b")]);
        assert_eq!(snap.symbols.len(), 1);
        assert_eq!(store.snapshot().symbols.len(), 2);
    }

    #[test]
    fn mutating_snapshot_does_not_touch_store() {
        let store = ArtifactStore::new();
        store.add_relations([Relation::new(
            "a",
            "b",
            RelationKind::Calls,
            Language::Python,
            "app.py",
        )]);
        let mut snap = store.snapshot();
        snap.relations.clear();
        snap.symbols.push(symbol("ghost"));
        let fresh = store.snapshot();
        assert_eq!(fresh.relations.len(), 1);
        assert!(fresh.symbols.is_empty());
    }

    #[test]
    fn mixed_artifacts_partition_by_type() {
        let store = ArtifactStore::new();
        store.add_artifacts([
            Artifact::Symbol(symbol("f")),
            Artifact::Relation(Relation::new(
                "f",
                "g",
                RelationKind::Calls,
                Language::Python,
                "app.py",
            )),
        ]);
        let snap = store.snapshot();
        assert_eq!(snap.symbols.len(), 1);
        assert_eq!(snap.relations.len(), 1);
        assert!(snap.endpoints.is_empty());
    }
}
