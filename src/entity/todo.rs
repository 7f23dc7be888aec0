// src/entity/todo.rs

use super::EntityBase;

#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub base: EntityBase,
    pub done_status: bool,
}

impl Todo {
    pub fn new(base: EntityBase) -> Self {
        Self {
            base,
            done_status: false,
        }
    }
}
