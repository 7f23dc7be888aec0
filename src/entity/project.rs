// src/entity/project.rs

use super::EntityBase;

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub base: EntityBase,
    pub completed: bool,
    pub active: bool,
}

impl Project {
    pub fn new(base: EntityBase) -> Self {
        Self {
            base,
            completed: false,
            active: false,
        }
    }
}
