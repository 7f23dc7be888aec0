use super::EntityKind;

/// Relation kinds supported by the system.
///
/// Every kind is stored as its own directed edge set. Only `Tasks` and
/// `TasksOf` mirror each other; the category relations in opposite
/// directions are independent of one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelationKind {
    /// Project owns todos
    Tasks,
    /// Todo belongs to projects (mirror of `Tasks`)
    TasksOf,
    /// Todo is filed under categories
    TodoCategories,
    /// Category lists todos
    CategoryTodos,
    /// Project is filed under categories
    ProjectCategories,
    /// Category lists projects
    CategoryProjects,
}

/// Catalog entry describing one relation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDescriptor {
    pub kind: RelationKind,
    /// Path segment and field name, e.g. `tasksof`
    pub name: &'static str,
    pub from: EntityKind,
    pub to: EntityKind,
    pub mirror: Option<RelationKind>,
}

pub const CATALOG: [RelationDescriptor; 6] = [
    RelationDescriptor {
        kind: RelationKind::Tasks,
        name: "tasks",
        from: EntityKind::Project,
        to: EntityKind::Todo,
        mirror: Some(RelationKind::TasksOf),
    },
    RelationDescriptor {
        kind: RelationKind::TasksOf,
        name: "tasksof",
        from: EntityKind::Todo,
        to: EntityKind::Project,
        mirror: Some(RelationKind::Tasks),
    },
    RelationDescriptor {
        kind: RelationKind::TodoCategories,
        name: "categories",
        from: EntityKind::Todo,
        to: EntityKind::Category,
        mirror: None,
    },
    RelationDescriptor {
        kind: RelationKind::CategoryTodos,
        name: "todos",
        from: EntityKind::Category,
        to: EntityKind::Todo,
        mirror: None,
    },
    RelationDescriptor {
        kind: RelationKind::ProjectCategories,
        name: "categories",
        from: EntityKind::Project,
        to: EntityKind::Category,
        mirror: None,
    },
    RelationDescriptor {
        kind: RelationKind::CategoryProjects,
        name: "projects",
        from: EntityKind::Category,
        to: EntityKind::Project,
        mirror: None,
    },
];

impl RelationKind {
    pub fn descriptor(self) -> &'static RelationDescriptor {
        // CATALOG is indexed in declaration order of the enum
        &CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn from_kind(self) -> EntityKind {
        self.descriptor().from
    }

    pub fn to_kind(self) -> EntityKind {
        self.descriptor().to
    }

    pub fn mirror(self) -> Option<RelationKind> {
        self.descriptor().mirror
    }

    /// Resolve a relation by owner kind and path segment (`todos` + `tasksof`).
    pub fn lookup(from: EntityKind, name: &str) -> Option<RelationKind> {
        CATALOG
            .iter()
            .find(|d| d.from == from && d.name.eq_ignore_ascii_case(name))
            .map(|d| d.kind)
    }

    /// Relations stored on the side of `kind`, in catalog order.
    pub fn outgoing(kind: EntityKind) -> impl Iterator<Item = RelationKind> {
        CATALOG.iter().filter(move |d| d.from == kind).map(|d| d.kind)
    }

    pub fn all() -> impl Iterator<Item = RelationKind> {
        CATALOG.iter().map(|d| d.kind)
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.from_kind().plural(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_indexed_by_kind() {
        for (index, descriptor) in CATALOG.iter().enumerate() {
            assert_eq!(descriptor.kind as usize, index);
        }
    }

    #[test]
    fn test_mirrors_are_symmetric_and_swap_endpoints() {
        for kind in RelationKind::all() {
            if let Some(mirror) = kind.mirror() {
                assert_eq!(mirror.mirror(), Some(kind));
                assert_eq!(mirror.from_kind(), kind.to_kind());
                assert_eq!(mirror.to_kind(), kind.from_kind());
            }
        }
    }

    #[test]
    fn test_category_relations_are_not_mirrored() {
        assert_eq!(RelationKind::TodoCategories.mirror(), None);
        assert_eq!(RelationKind::CategoryTodos.mirror(), None);
        assert_eq!(RelationKind::ProjectCategories.mirror(), None);
        assert_eq!(RelationKind::CategoryProjects.mirror(), None);
    }

    #[test]
    fn test_lookup_depends_on_owner_kind() {
        assert_eq!(
            RelationKind::lookup(EntityKind::Todo, "categories"),
            Some(RelationKind::TodoCategories)
        );
        assert_eq!(
            RelationKind::lookup(EntityKind::Project, "categories"),
            Some(RelationKind::ProjectCategories)
        );
        assert_eq!(
            RelationKind::lookup(EntityKind::Todo, "tasksof"),
            Some(RelationKind::TasksOf)
        );
        assert_eq!(RelationKind::lookup(EntityKind::Category, "tasks"), None);
    }

    #[test]
    fn test_outgoing_relations() {
        let project: Vec<_> = RelationKind::outgoing(EntityKind::Project).collect();
        assert_eq!(
            project,
            vec![RelationKind::Tasks, RelationKind::ProjectCategories]
        );
        assert_eq!(RelationKind::Tasks.to_string(), "projects/tasks");
    }
}
