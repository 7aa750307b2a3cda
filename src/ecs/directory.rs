//! Entity directory - staged creation, tag index and recycling
//!
//! New entities are staged and only become visible after `commit()`.
//! Destroyed entities stay in the active list until the next commit, so a
//! caller iterating the active list within one frame never sees it shift.

use ahash::AHashMap;

use crate::core::error::Result;
use crate::ecs::entity::Entity;
use crate::ecs::store::ComponentStore;

pub struct EntityDirectory {
    store: ComponentStore,
    entities: Vec<Entity>,
    pending: Vec<Entity>,
    by_tag: AHashMap<String, Vec<Entity>>,
}

impl EntityDirectory {
    pub fn new(store: ComponentStore) -> Self {
        Self {
            store,
            entities: Vec::new(),
            pending: Vec::new(),
            by_tag: AHashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(ComponentStore::new(capacity))
    }

    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ComponentStore {
        &mut self.store
    }

    /// Create an entity and stage it for the next commit
    ///
    /// The handle can receive components right away.
    pub fn add_entity(&mut self, tag: &str) -> Result<Entity> {
        let entity = Entity::new(self.store.create(tag)?);
        self.pending.push(entity);
        self.by_tag.entry(tag.to_owned()).or_default();
        Ok(entity)
    }

    /// Apply staged additions, then drop every dead entity
    pub fn commit(&mut self) {
        self.add_pending();
        self.remove_dead();
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Committed entities carrying `tag`
    ///
    /// Panics if `tag` was never passed to `add_entity`.
    pub fn entities_by_tag(&self, tag: &str) -> &[Entity] {
        match self.by_tag.get(tag) {
            Some(entities) => entities,
            None => panic!("unknown entity tag \"{}\"", tag),
        }
    }

    /// Committed entities whose tag differs from `tag`
    pub fn entities_except<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = Entity> + 'a {
        self.entities
            .iter()
            .copied()
            .filter(move |entity| entity.tag(&self.store) != tag)
    }

    /// Destroy every committed entity of `tag`; takes effect on the next commit
    pub fn destroy_tag(&mut self, tag: &str) {
        if let Some(entities) = self.by_tag.get(tag) {
            for entity in entities {
                entity.destroy(&mut self.store);
            }
        }
    }

    fn add_pending(&mut self) {
        for entity in self.pending.drain(..) {
            self.entities.push(entity);
            self.by_tag
                .entry(self.store.tag(entity.id()).to_owned())
                .or_default()
                .push(entity);
        }
    }

    fn remove_dead(&mut self) {
        let store = &mut self.store;
        let by_tag = &mut self.by_tag;
        let before = self.entities.len();

        self.entities.retain(|entity| {
            if entity.is_alive(store) {
                return true;
            }
            store.release(entity.id());
            if let Some(members) = by_tag.get_mut(store.tag(entity.id())) {
                if let Some(position) = members.iter().position(|member| member == entity) {
                    members.remove(position);
                }
            }
            false
        });

        if self.entities.len() != before {
            self.store.reclaim_tail();
            tracing::trace!(
                "Removed {} dead entities, {} remain",
                before - self.entities.len(),
                self.entities.len()
            );
        }
    }
}
