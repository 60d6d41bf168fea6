use crate::entity::Entity;
use crate::entity::EntityKey;
use std::cell::Cell;
use std::cell::RefCell;

/// Owns every entity created through it for as long as it lives.
#[derive(Default)]
pub struct EntityManager {
    entities: RefCell<Vec<Entity>>,
    next_index: Cell<u64>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_entity(&self) -> Entity {
        let key = EntityKey {
            index: self.next_index.get(),
        };
        self.next_index.set(key.index + 1);
        let entity = Entity::new(key);
        self.entities.borrow_mut().push(entity.clone());
        entity
    }

    pub fn len(&self) -> usize {
        self.entities.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
