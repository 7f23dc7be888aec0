use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::entity::{Entity, EntityId, EntityKind, EntityPayload};
use crate::error::{Result, TodoManagerError};

/// Records of one kind plus the id allocator for that kind
#[derive(Debug, Default)]
struct Table {
    records: BTreeMap<EntityId, Entity>,
    /// Highest id ever handed out or accepted; never decreases
    high_water: u64,
}

impl Table {
    fn allocate(&self, kind: EntityKind, requested: Option<EntityId>) -> Result<EntityId> {
        match requested {
            Some(id) if !self.records.contains_key(&id) => Ok(id),
            _ => self.high_water.checked_add(1).map(EntityId).ok_or_else(|| {
                TodoManagerError::validation(format!("id : no identifiers left for {}", kind.plural()))
            }),
        }
    }
}

/// Projects, todos and categories keyed by id, one table per kind.
///
/// Lists come back ordered by id, which matches creation order for
/// store-allocated ids.
#[derive(Debug)]
pub struct EntityStore {
    tables: [Table; 3],
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            tables: Default::default(),
        }
    }

    fn table(&self, kind: EntityKind) -> &Table {
        &self.tables[kind as usize]
    }

    fn table_mut(&mut self, kind: EntityKind) -> &mut Table {
        &mut self.tables[kind as usize]
    }

    /// Validate and insert a new record, returning it.
    ///
    /// A caller-supplied id is honoured when no live record of the kind holds
    /// it; otherwise the next id is allocated. Nothing is written on failure.
    pub fn create(&mut self, kind: EntityKind, payload: &EntityPayload) -> Result<&Entity> {
        let table = self.table_mut(kind);
        let id = table.allocate(kind, payload.id)?;
        let entity = Entity::create(kind, id, payload)?;

        match table.records.entry(id) {
            Entry::Vacant(slot) => {
                table.high_water = table.high_water.max(id.0);
                Ok(slot.insert(entity))
            }
            Entry::Occupied(_) => Err(TodoManagerError::validation(format!(
                "id : {} already holds {}",
                kind.plural(),
                id
            ))),
        }
    }

    pub fn get(&self, kind: EntityKind, id: EntityId) -> Result<&Entity> {
        self.table(kind)
            .records
            .get(&id)
            .ok_or_else(|| TodoManagerError::not_found(kind, id))
    }

    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        self.table(kind).records.contains_key(&id)
    }

    /// All records of `kind` matching every `(field, value)` pair.
    pub fn list<'a>(&'a self, kind: EntityKind, filter: &'a [(String, String)]) -> Vec<&'a Entity> {
        self.table(kind)
            .records
            .values()
            .filter(|e| filter.iter().all(|(field, value)| e.matches(field, value)))
            .collect()
    }

    /// Partial update of the mutable fields. The id itself can not change.
    pub fn update(&mut self, kind: EntityKind, id: EntityId, payload: &EntityPayload) -> Result<&Entity> {
        let entity = self
            .table_mut(kind)
            .records
            .get_mut(&id)
            .ok_or_else(|| TodoManagerError::not_found(kind, id))?;

        if let Some(requested) = payload.id {
            if requested != id {
                return Err(TodoManagerError::validation(format!(
                    "id : can not amend id from {} to {}",
                    id, requested
                )));
            }
        }
        entity.apply(payload)?;
        Ok(entity)
    }

    pub fn remove(&mut self, kind: EntityKind, id: EntityId) -> Result<Entity> {
        self.table_mut(kind)
            .records
            .remove(&id)
            .ok_or_else(|| TodoManagerError::not_found(kind, id))
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.table(kind).records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> EntityPayload {
        EntityPayload {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_and_get() {
        let mut store = EntityStore::new();
        let id = store.create(EntityKind::Project, &titled("testProject")).unwrap().id();

        let fetched = store.get(EntityKind::Project, id).unwrap();
        assert_eq!(fetched.title(), "testProject");
        assert_eq!(fetched.kind(), EntityKind::Project);
    }

    #[test]
    fn test_ids_are_per_kind_and_monotonic() {
        let mut store = EntityStore::new();
        let first = store.create(EntityKind::Todo, &titled("a")).unwrap().id();
        let second = store.create(EntityKind::Todo, &titled("b")).unwrap().id();
        let category = store.create(EntityKind::Category, &titled("c")).unwrap().id();

        assert_eq!(first, EntityId(1));
        assert_eq!(second, EntityId(2));
        assert_eq!(category, EntityId(1));
    }

    #[test]
    fn test_deleted_ids_are_not_reallocated() {
        let mut store = EntityStore::new();
        store.create(EntityKind::Todo, &titled("a")).unwrap();
        let second = store.create(EntityKind::Todo, &titled("b")).unwrap().id();
        store.remove(EntityKind::Todo, second).unwrap();

        let third = store.create(EntityKind::Todo, &titled("c")).unwrap().id();
        assert_eq!(third, EntityId(3));
    }

    #[test]
    fn test_failed_create_writes_nothing() {
        let mut store = EntityStore::new();
        let err = store
            .create(EntityKind::Project, &EntityPayload::default())
            .unwrap_err();

        assert!(matches!(err, TodoManagerError::Validation(_)));
        assert!(EntityKind::ALL.iter().all(|kind| store.len(*kind) == 0));
        let id = store.create(EntityKind::Project, &titled("p")).unwrap().id();
        assert_eq!(id, EntityId(1));
    }

    #[test]
    fn test_supplied_id_is_used_when_vacant() {
        let mut store = EntityStore::new();
        let mut payload = titled("chosen");
        payload.id = Some(EntityId(10));

        assert_eq!(store.create(EntityKind::Project, &payload).unwrap().id(), EntityId(10));
        // occupied now, so the allocator picks the next free value
        assert_eq!(store.create(EntityKind::Project, &payload).unwrap().id(), EntityId(11));
        assert_eq!(store.create(EntityKind::Project, &titled("x")).unwrap().id(), EntityId(12));
    }

    #[test]
    fn test_exhausted_allocator_is_rejected_without_overwriting() {
        let mut store = EntityStore::new();
        let mut last = titled("last");
        last.id = Some(EntityId(u64::MAX));
        store.create(EntityKind::Todo, &last).unwrap();

        let err = store.create(EntityKind::Todo, &titled("one more")).unwrap_err();
        assert!(matches!(err, TodoManagerError::Validation(_)));

        let err = store.create(EntityKind::Todo, &last).unwrap_err();
        assert!(matches!(err, TodoManagerError::Validation(_)));

        assert_eq!(store.len(EntityKind::Todo), 1);
        assert_eq!(store.get(EntityKind::Todo, EntityId(u64::MAX)).unwrap().title(), "last");
    }

    #[test]
    fn test_update_of_missing_record_is_not_found_before_id_check() {
        let mut store = EntityStore::new();
        let mut moved = titled("x");
        moved.id = Some(EntityId(5));

        assert!(matches!(
            store.update(EntityKind::Todo, EntityId(600), &moved),
            Err(TodoManagerError::EntityNotFound { .. })
        ));
    }

    #[test]
    fn test_list_filters_by_title() {
        let mut store = EntityStore::new();
        store.create(EntityKind::Category, &titled("home")).unwrap();
        store.create(EntityKind::Category, &titled("office")).unwrap();
        store.create(EntityKind::Category, &titled("home")).unwrap();

        let filter = vec![("title".to_string(), "home".to_string())];
        let homes = store.list(EntityKind::Category, &filter);
        assert_eq!(homes.len(), 2);
        assert_eq!(homes[0].id(), EntityId(1));
        assert_eq!(homes[1].id(), EntityId(3));

        let filter = vec![("title".to_string(), "garden".to_string())];
        assert!(store.list(EntityKind::Category, &filter).is_empty());
        assert_eq!(store.list(EntityKind::Category, &[]).len(), 3);
    }

    #[test]
    fn test_update_is_partial_and_keeps_id() {
        let mut store = EntityStore::new();
        let mut payload = titled("original");
        payload.description = Some("desc".to_string());
        let id = store.create(EntityKind::Todo, &payload).unwrap().id();

        let updated = store
            .update(EntityKind::Todo, id, &titled("renamed"))
            .unwrap();
        assert_eq!(updated.title(), "renamed");
        assert_eq!(updated.base().description, "desc");
        assert_eq!(updated.id(), id);

        let mut moved = titled("x");
        moved.id = Some(EntityId(99));
        assert!(matches!(
            store.update(EntityKind::Todo, id, &moved),
            Err(TodoManagerError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_records_are_not_found() {
        let mut store = EntityStore::new();
        assert!(matches!(
            store.get(EntityKind::Todo, EntityId(600)),
            Err(TodoManagerError::EntityNotFound { .. })
        ));
        assert!(matches!(
            store.update(EntityKind::Todo, EntityId(600), &titled("x")),
            Err(TodoManagerError::EntityNotFound { .. })
        ));
        assert!(matches!(
            store.remove(EntityKind::Todo, EntityId(600)),
            Err(TodoManagerError::EntityNotFound { .. })
        ));
    }
}
