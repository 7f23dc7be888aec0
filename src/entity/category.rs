// src/entity/category.rs

use super::EntityBase;

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub base: EntityBase,
}

impl Category {
    pub fn new(base: EntityBase) -> Self {
        Self { base }
    }
}
