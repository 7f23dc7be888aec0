use thiserror::Error;

use crate::entity::{EntityId, EntityKind, RelationKind};

#[derive(Error, Debug)]
pub enum TodoManagerError {
    #[error("{0}")]
    Validation(String),

    #[error("Could not find an instance with {}/{id}", kind.plural())]
    EntityNotFound { kind: EntityKind, id: String },

    #[error("Could not find relationship {relation} from {from} to {to}")]
    RelationNotFound {
        relation: RelationKind,
        from: EntityId,
        to: EntityId,
    },

    #[error("Could not find path: {0}")]
    UnknownRoute(String),

    #[error("Unrecognised Accept type: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported Content-Type: {0}")]
    UnsupportedMediaType(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TodoManagerError {
    pub fn validation(message: impl Into<String>) -> Self {
        TodoManagerError::Validation(message.into())
    }

    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        TodoManagerError::EntityNotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TodoManagerError>;
