mod category;
mod payload;
mod project;
mod relation;
mod todo;

pub use category::Category;
pub use payload::{parse_id, EntityPayload};
pub use project::Project;
pub use relation::{RelationDescriptor, RelationKind, CATALOG};
pub use todo::Todo;

use crate::error::{Result, TodoManagerError};

/// The three record kinds held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Project,
    Todo,
    Category,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Project, EntityKind::Todo, EntityKind::Category];

    /// Collection name, also the path segment (`/projects`)
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Project => "projects",
            EntityKind::Todo => "todos",
            EntityKind::Category => "categories",
        }
    }

    /// Element name of a single record
    pub fn singular(self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Todo => "todo",
            EntityKind::Category => "category",
        }
    }

    /// Scalar fields accepted in a create/update body, besides `id`
    pub fn mutable_fields(self) -> &'static [&'static str] {
        match self {
            EntityKind::Project => &["title", "completed", "active", "description"],
            EntityKind::Todo => &["title", "doneStatus", "description"],
            EntityKind::Category => &["title", "description"],
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.singular())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "projects" | "project" => Ok(EntityKind::Project),
            "todos" | "todo" => Ok(EntityKind::Todo),
            "categories" | "category" => Ok(EntityKind::Category),
            _ => Err(format!("Unknown entity kind: {}", s)),
        }
    }
}

/// Store-assigned identifier, unique per entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntityId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(EntityId(n)),
            _ => Err(format!("Invalid id: {}", s)),
        }
    }
}

/// Base fields shared by all entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityBase {
    pub id: EntityId,
    pub title: String,
    pub description: String,
}

impl EntityBase {
    pub fn new(id: EntityId, title: String) -> Self {
        Self {
            id,
            title,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Project(Project),
    Todo(Todo),
    Category(Category),
}

impl Entity {
    /// Build a new record of `kind` from a create payload.
    ///
    /// The title is mandatory and must not be empty; every other field
    /// takes its default when absent.
    pub fn create(kind: EntityKind, id: EntityId, payload: &EntityPayload) -> Result<Self> {
        let title = match payload.title.as_deref() {
            None => return Err(TodoManagerError::validation("title : field is mandatory")),
            Some(t) if t.trim().is_empty() => {
                return Err(TodoManagerError::validation("title : can not be empty"))
            }
            Some(t) => t.to_string(),
        };

        let base = EntityBase::new(id, title);
        let mut entity = match kind {
            EntityKind::Project => Entity::Project(Project::new(base)),
            EntityKind::Todo => Entity::Todo(Todo::new(base)),
            EntityKind::Category => Entity::Category(Category::new(base)),
        };
        entity.apply(payload)?;
        Ok(entity)
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Project(_) => EntityKind::Project,
            Entity::Todo(_) => EntityKind::Todo,
            Entity::Category(_) => EntityKind::Category,
        }
    }

    pub fn base(&self) -> &EntityBase {
        match self {
            Entity::Project(p) => &p.base,
            Entity::Todo(t) => &t.base,
            Entity::Category(c) => &c.base,
        }
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        match self {
            Entity::Project(p) => &mut p.base,
            Entity::Todo(t) => &mut t.base,
            Entity::Category(c) => &mut c.base,
        }
    }

    pub fn id(&self) -> EntityId {
        self.base().id
    }

    pub fn title(&self) -> &str {
        &self.base().title
    }

    /// Apply the mutable fields present in `payload`, leaving the rest as is.
    ///
    /// Fields that do not belong to this kind are rejected before anything
    /// is written, so a failed update leaves the record untouched.
    pub fn apply(&mut self, payload: &EntityPayload) -> Result<()> {
        payload.check_fields_for(self.kind())?;

        if let Some(ref title) = payload.title {
            if title.trim().is_empty() {
                return Err(TodoManagerError::validation("title : can not be empty"));
            }
        }

        let base = self.base_mut();
        if let Some(ref title) = payload.title {
            base.title = title.clone();
        }
        if let Some(ref description) = payload.description {
            base.description = description.clone();
        }

        match self {
            Entity::Project(p) => {
                if let Some(completed) = payload.completed {
                    p.completed = completed;
                }
                if let Some(active) = payload.active {
                    p.active = active;
                }
            }
            Entity::Todo(t) => {
                if let Some(done) = payload.done_status {
                    t.done_status = done;
                }
            }
            Entity::Category(_) => {}
        }
        Ok(())
    }

    /// Scalar fields in rendering order, values as wire strings.
    pub fn scalar_fields(&self) -> Vec<(&'static str, String)> {
        let base = self.base();
        let mut fields = vec![("id", base.id.to_string()), ("title", base.title.clone())];
        match self {
            Entity::Project(p) => {
                fields.push(("completed", p.completed.to_string()));
                fields.push(("active", p.active.to_string()));
            }
            Entity::Todo(t) => fields.push(("doneStatus", t.done_status.to_string())),
            Entity::Category(_) => {}
        }
        fields.push(("description", base.description.clone()));
        fields
    }

    /// Equality match of a scalar field against a query value.
    ///
    /// Unknown field names always match.
    pub fn matches(&self, field: &str, value: &str) -> bool {
        let fields = self.scalar_fields();
        match fields.iter().find(|(name, _)| *name == field) {
            Some((_, actual)) if is_flag(field) => actual.eq_ignore_ascii_case(value),
            Some((_, actual)) => actual == value,
            None => true,
        }
    }
}

fn is_flag(field: &str) -> bool {
    matches!(field, "doneStatus" | "completed" | "active")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> EntityPayload {
        EntityPayload::from_value(&serde_json::from_str(json).unwrap()).unwrap()
    }

    #[test]
    fn test_kind_round_trips_through_path_segment() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.plural().parse::<EntityKind>().unwrap(), kind);
        }
        assert!("widgets".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_entity_id_rejects_zero_and_garbage() {
        assert_eq!("7".parse::<EntityId>().unwrap(), EntityId(7));
        assert!("0".parse::<EntityId>().is_err());
        assert!("abc".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_create_requires_title() {
        let err = Entity::create(EntityKind::Project, EntityId(1), &payload(r#"{"description":"x"}"#))
            .unwrap_err();
        assert!(err.to_string().contains("title : field is mandatory"));

        let err = Entity::create(EntityKind::Project, EntityId(1), &payload(r#"{"title":"  "}"#))
            .unwrap_err();
        assert!(err.to_string().contains("can not be empty"));
    }

    #[test]
    fn test_create_todo_defaults() {
        let entity =
            Entity::create(EntityKind::Todo, EntityId(3), &payload(r#"{"title":"write"}"#)).unwrap();
        match entity {
            Entity::Todo(ref t) => {
                assert_eq!(t.base.title, "write");
                assert_eq!(t.base.description, "");
                assert!(!t.done_status);
            }
            _ => panic!("expected a todo"),
        }
        assert_eq!(
            entity.scalar_fields(),
            vec![
                ("id", "3".to_string()),
                ("title", "write".to_string()),
                ("doneStatus", "false".to_string()),
                ("description", String::new()),
            ]
        );
    }

    #[test]
    fn test_apply_is_partial() {
        let mut entity = Entity::create(
            EntityKind::Project,
            EntityId(1),
            &payload(r#"{"title":"p","description":"keep me"}"#),
        )
        .unwrap();

        entity.apply(&payload(r#"{"active":true}"#)).unwrap();

        match entity {
            Entity::Project(ref p) => {
                assert_eq!(p.base.title, "p");
                assert_eq!(p.base.description, "keep me");
                assert!(p.active);
                assert!(!p.completed);
            }
            _ => panic!("expected a project"),
        }
    }

    #[test]
    fn test_apply_rejects_foreign_field_without_writing() {
        let mut entity =
            Entity::create(EntityKind::Category, EntityId(1), &payload(r#"{"title":"c"}"#)).unwrap();

        let err = entity
            .apply(&payload(r#"{"title":"renamed","doneStatus":true}"#))
            .unwrap_err();

        assert!(err.to_string().contains("doneStatus"));
        assert_eq!(entity.title(), "c");
    }

    #[test]
    fn test_matches_filters_on_scalar_fields() {
        let entity =
            Entity::create(EntityKind::Todo, EntityId(2), &payload(r#"{"title":"buy milk"}"#))
                .unwrap();

        assert!(entity.matches("title", "buy milk"));
        assert!(!entity.matches("title", "buy"));
        assert!(entity.matches("doneStatus", "FALSE"));
        assert!(entity.matches("id", "2"));
        assert!(entity.matches("colour", "red"));
    }
}
