//! Copyable entity handle
//!
//! An `Entity` is only an id. Every operation takes the store it indexes into,
//! so handles can be copied freely and never own anything.

use crate::core::types::EntityId;
use crate::ecs::store::{Component, ComponentStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    id: EntityId,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn tag<'s>(&self, store: &'s ComponentStore) -> &'s str {
        store.tag(self.id)
    }

    pub fn is_alive(&self, store: &ComponentStore) -> bool {
        store.is_alive(self.id)
    }

    /// Mark for removal; the directory drops it on its next commit
    pub fn destroy(&self, store: &mut ComponentStore) {
        store.destroy(self.id);
    }

    pub fn add<'s, T: Component>(&self, store: &'s mut ComponentStore, value: T) -> &'s mut T {
        store.add(self.id, value)
    }

    pub fn has<T: Component>(&self, store: &ComponentStore) -> bool {
        store.has::<T>(self.id)
    }

    pub fn get<'s, T: Component>(&self, store: &'s ComponentStore) -> &'s T {
        store.get::<T>(self.id)
    }

    pub fn get_mut<'s, T: Component>(&self, store: &'s mut ComponentStore) -> &'s mut T {
        store.get_mut::<T>(self.id)
    }

    pub fn remove<T: Component>(&self, store: &mut ComponentStore) {
        store.remove::<T>(self.id);
    }
}

impl From<EntityId> for Entity {
    fn from(id: EntityId) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Cell, Text};
    use glam::Vec2;

    #[test]
    fn test_handle_delegates_to_store() {
        let mut store = ComponentStore::new(2);
        let entity = Entity::new(store.create("cell").unwrap());

        entity.add(&mut store, Cell::new(3));
        assert!(entity.has::<Cell>(&store));
        assert!(!entity.has::<Text>(&store));

        entity.get_mut::<Cell>(&mut store).value = 4;
        assert_eq!(entity.get::<Cell>(&store).value, 4);

        entity.remove::<Cell>(&mut store);
        assert!(!entity.has::<Cell>(&store));
    }

    #[test]
    fn test_copies_are_interchangeable() {
        let mut store = ComponentStore::new(1);
        let entity = Entity::new(store.create("label").unwrap());
        let copy = entity;

        copy.add(&mut store, Text::new("7", Vec2::new(4.0, 4.0), Default::default()));
        assert!(entity.has::<Text>(&store));
        assert_eq!(entity.tag(&store), "label");

        copy.destroy(&mut store);
        assert!(!entity.is_alive(&store));
    }
}
