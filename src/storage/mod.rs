//! In-memory store for projects, todos, categories and their relationships.
//!
//! [`TodoStore`] owns an [`EntityStore`] and a [`RelationIndex`] and is the
//! only place where the two are mutated together, so every operation that
//! touches both (deletion cascade, linking) runs under one `&mut self`.

mod entity_store;
mod relation_index;

pub use entity_store::EntityStore;
pub use relation_index::RelationIndex;

use crate::entity::{Entity, EntityId, EntityKind, EntityPayload, RelationKind};
use crate::error::{Result, TodoManagerError};

#[derive(Debug, Default)]
pub struct TodoStore {
    entities: EntityStore,
    relations: RelationIndex,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, kind: EntityKind, payload: &EntityPayload) -> Result<Entity> {
        let entity = self.entities.create(kind, payload)?.clone();
        tracing::debug!(kind = %kind, id = %entity.id(), "created entity");
        Ok(entity)
    }

    pub fn get(&self, kind: EntityKind, id: EntityId) -> Result<&Entity> {
        self.entities.get(kind, id)
    }

    pub fn list<'a>(&'a self, kind: EntityKind, filter: &'a [(String, String)]) -> Vec<&'a Entity> {
        self.entities.list(kind, filter)
    }

    pub fn update(&mut self, kind: EntityKind, id: EntityId, payload: &EntityPayload) -> Result<Entity> {
        let entity = self.entities.update(kind, id, payload)?.clone();
        tracing::debug!(kind = %kind, id = %id, "updated entity");
        Ok(entity)
    }

    /// Remove an entity and every edge that references it.
    pub fn delete(&mut self, kind: EntityKind, id: EntityId) -> Result<()> {
        self.entities.remove(kind, id)?;
        let edges = self.relations.purge(kind, id);
        tracing::debug!(kind = %kind, id = %id, edges, "deleted entity");
        Ok(())
    }

    fn require(&self, kind: EntityKind, id: EntityId) -> Result<()> {
        if self.entities.contains(kind, id) {
            Ok(())
        } else {
            Err(TodoManagerError::not_found(kind, id))
        }
    }

    /// Link two existing entities. Re-linking is a successful no-op.
    ///
    /// Returns whether a new edge was written.
    pub fn link(&mut self, relation: RelationKind, from: EntityId, to: EntityId) -> Result<bool> {
        self.require(relation.from_kind(), from)?;
        self.require(relation.to_kind(), to)?;

        let added = self.relations.insert(relation, from, to);
        tracing::debug!(relation = %relation, %from, %to, added, "linked");
        Ok(added)
    }

    /// Create a new target entity from `payload` and link it to `from`.
    ///
    /// The owner is checked before the target is created, so a missing owner
    /// leaves no orphan behind.
    pub fn link_new(&mut self, relation: RelationKind, from: EntityId, payload: &EntityPayload) -> Result<Entity> {
        self.require(relation.from_kind(), from)?;

        let target = self.entities.create(relation.to_kind(), payload)?.clone();
        self.relations.insert(relation, from, target.id());
        tracing::debug!(relation = %relation, %from, to = %target.id(), "created and linked");
        Ok(target)
    }

    /// Remove an edge. A missing owner or a missing edge is `NotFound`.
    pub fn unlink(&mut self, relation: RelationKind, from: EntityId, to: EntityId) -> Result<()> {
        self.require(relation.from_kind(), from)?;

        if !self.relations.remove(relation, from, to) {
            return Err(TodoManagerError::RelationNotFound { relation, from, to });
        }
        tracing::debug!(relation = %relation, %from, %to, "unlinked");
        Ok(())
    }

    /// Entities linked from `from` on `relation`, ordered by id.
    pub fn list_linked(&self, relation: RelationKind, from: EntityId) -> Result<Vec<&Entity>> {
        self.require(relation.from_kind(), from)?;

        let to_kind = relation.to_kind();
        Ok(self
            .relations
            .targets(relation, from)
            .into_iter()
            .filter_map(|id| self.entities.get(to_kind, id).ok())
            .collect())
    }

    /// Existence probe behind HEAD requests; `Ok(false)` means no edges.
    pub fn has_any(&self, relation: RelationKind, from: EntityId) -> Result<bool> {
        self.require(relation.from_kind(), from)?;
        Ok(!self.relations.targets(relation, from).is_empty())
    }

    /// Outgoing relations of an entity that have at least one edge.
    pub fn links_of(&self, entity: &Entity) -> Vec<(RelationKind, Vec<EntityId>)> {
        RelationKind::outgoing(entity.kind())
            .map(|relation| (relation, self.relations.targets(relation, entity.id())))
            .filter(|(_, targets)| !targets.is_empty())
            .collect()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.len(kind)
    }
}
