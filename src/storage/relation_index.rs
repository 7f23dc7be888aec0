use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::entity::{EntityId, EntityKind, RelationKind};

type Adjacency = BTreeMap<EntityId, BTreeSet<EntityId>>;

/// Directed edge sets, one per relation kind.
///
/// The index knows nothing about entity existence; callers check that before
/// inserting. Mirroring comes from the relation catalog: writing an edge of a
/// mirrored kind writes the reverse edge of its mirror in the same call.
#[derive(Debug, Default)]
pub struct RelationIndex {
    edges: HashMap<RelationKind, Adjacency>,
}

impl RelationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert_one(&mut self, relation: RelationKind, from: EntityId, to: EntityId) -> bool {
        self.edges
            .entry(relation)
            .or_default()
            .entry(from)
            .or_default()
            .insert(to)
    }

    fn remove_one(&mut self, relation: RelationKind, from: EntityId, to: EntityId) -> bool {
        let Some(adjacency) = self.edges.get_mut(&relation) else {
            return false;
        };
        let Some(targets) = adjacency.get_mut(&from) else {
            return false;
        };
        let removed = targets.remove(&to);
        if targets.is_empty() {
            adjacency.remove(&from);
        }
        removed
    }

    /// Add an edge (and its mirror). Returns false when it already existed.
    pub fn insert(&mut self, relation: RelationKind, from: EntityId, to: EntityId) -> bool {
        let added = self.insert_one(relation, from, to);
        if let Some(mirror) = relation.mirror() {
            self.insert_one(mirror, to, from);
        }
        added
    }

    /// Remove an edge (and its mirror). Returns false when there was no edge.
    pub fn remove(&mut self, relation: RelationKind, from: EntityId, to: EntityId) -> bool {
        let removed = self.remove_one(relation, from, to);
        if let Some(mirror) = relation.mirror() {
            self.remove_one(mirror, to, from);
        }
        removed
    }

    #[cfg(test)]
    fn contains(&self, relation: RelationKind, from: EntityId, to: EntityId) -> bool {
        self.edges
            .get(&relation)
            .and_then(|adjacency| adjacency.get(&from))
            .is_some_and(|targets| targets.contains(&to))
    }

    /// Targets of `from` on `relation`, ordered by id.
    pub fn targets(&self, relation: RelationKind, from: EntityId) -> Vec<EntityId> {
        self.edges
            .get(&relation)
            .and_then(|adjacency| adjacency.get(&from))
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Drop every edge that mentions the entity, on either side of any
    /// relation kind. Returns the number of edges removed.
    pub fn purge(&mut self, kind: EntityKind, id: EntityId) -> usize {
        let mut removed = 0;

        for relation in RelationKind::all() {
            let Some(adjacency) = self.edges.get_mut(&relation) else {
                continue;
            };

            if relation.from_kind() == kind {
                if let Some(targets) = adjacency.remove(&id) {
                    removed += targets.len();
                }
            }

            if relation.to_kind() == kind {
                adjacency.retain(|_, targets| {
                    if targets.remove(&id) {
                        removed += 1;
                    }
                    !targets.is_empty()
                });
            }
        }

        removed
    }

    #[cfg(test)]
    fn edge_count(&self, relation: RelationKind) -> usize {
        self.edges
            .get(&relation)
            .map(|adjacency| adjacency.values().map(BTreeSet::len).sum())
            .unwrap_or(0)
    }
}
