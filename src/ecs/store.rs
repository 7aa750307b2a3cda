//! Fixed-capacity columnar component storage
//!
//! Every column (one per component kind, plus tags and liveness) has exactly
//! `capacity` slots and is indexed by the same `EntityId`. Slots are never
//! freed: destroying an entity lowers its liveness flag, and the directory's
//! commit pass releases the slot. Only released slots are handed out again.

use crate::core::error::{EvolveError, Result};
use crate::core::types::EntityId;
use crate::ecs::components::{AnimatedSprite, Cell, Shape, Text, Transform};

/// Record type that owns one column of the store
pub trait Component: Default + 'static {
    fn has(&self) -> bool;
    fn set_has(&mut self, has: bool);
    fn column(store: &ComponentStore) -> &[Self];
    fn column_mut(store: &mut ComponentStore) -> &mut [Self];
}

macro_rules! impl_component {
    ($ty:ty, $field:ident) => {
        impl Component for $ty {
            fn has(&self) -> bool {
                self.has
            }

            fn set_has(&mut self, has: bool) {
                self.has = has;
            }

            fn column(store: &ComponentStore) -> &[Self] {
                &store.$field
            }

            fn column_mut(store: &mut ComponentStore) -> &mut [Self] {
                &mut store.$field
            }
        }
    };
}

impl_component!(Transform, transforms);
impl_component!(AnimatedSprite, sprites);
impl_component!(Shape, shapes);
impl_component!(Text, texts);
impl_component!(Cell, cells);

/// Structure of Arrays for every entity the pool can hold
pub struct ComponentStore {
    transforms: Vec<Transform>,
    sprites: Vec<AnimatedSprite>,
    shapes: Vec<Shape>,
    texts: Vec<Text>,
    cells: Vec<Cell>,
    tags: Vec<String>,
    alive: Vec<bool>,
    /// Slot is neither live nor waiting for its owner's removal
    reclaimable: Vec<bool>,
    /// Bump cursor: ids at or above it have never been handed out since the
    /// last reclaim
    next_id: usize,
    capacity: usize,
}

impl ComponentStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            transforms: column(capacity),
            sprites: column(capacity),
            shapes: column(capacity),
            texts: column(capacity),
            cells: column(capacity),
            tags: column(capacity),
            alive: vec![false; capacity],
            reclaimable: vec![true; capacity],
            next_id: 0,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn live_count(&self) -> usize {
        self.alive.iter().filter(|&&alive| alive).count()
    }

    /// Allocate an id for a new entity
    ///
    /// Sequential ids are handed out until the cursor reaches capacity; after
    /// that the first dead slot from the front is reused.
    pub fn create(&mut self, tag: &str) -> Result<EntityId> {
        assert!(!tag.is_empty(), "entity tag must not be empty");

        let index = if self.next_id < self.capacity {
            self.next_id += 1;
            self.next_id - 1
        } else {
            self.first_free_from_front()
                .ok_or(EvolveError::CapacityExhausted {
                    capacity: self.capacity,
                })?
        };

        self.alive[index] = true;
        self.reclaimable[index] = false;
        self.tags[index].clear();
        self.tags[index].push_str(tag);
        Ok(EntityId::new(index))
    }

    pub fn destroy(&mut self, id: EntityId) {
        let index = self.checked(id);
        self.alive[index] = false;
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.alive[self.checked(id)]
    }

    pub fn tag(&self, id: EntityId) -> &str {
        &self.tags[self.checked(id)]
    }

    pub fn get<T: Component>(&self, id: EntityId) -> &T {
        &T::column(self)[self.checked(id)]
    }

    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> &mut T {
        let index = self.checked(id);
        &mut T::column_mut(self)[index]
    }

    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        self.get::<T>(id).has()
    }

    /// Overwrite the slot with `value` and mark it present
    pub fn add<T: Component>(&mut self, id: EntityId, value: T) -> &mut T {
        let slot = self.get_mut::<T>(id);
        *slot = value;
        slot.set_has(true);
        slot
    }

    pub fn remove<T: Component>(&mut self, id: EntityId) {
        self.get_mut::<T>(id).set_has(false);
    }

    /// Restore every component slot of `id` to its default (absent) value
    pub fn reset_components(&mut self, id: EntityId) {
        let index = self.checked(id);
        self.transforms[index] = Transform::default();
        self.sprites[index] = AnimatedSprite::default();
        self.shapes[index] = Shape::default();
        self.texts[index] = Text::default();
        self.cells[index] = Cell::default();
    }

    /// Hand a destroyed slot back for reuse with default components
    pub fn release(&mut self, id: EntityId) {
        let index = self.checked(id);
        assert!(!self.alive[index], "cannot release live entity {}", index);
        self.reset_components(id);
        self.reclaimable[index] = true;
    }

    pub fn is_reclaimable(&self, id: EntityId) -> bool {
        self.reclaimable[self.checked(id)]
    }

    /// Pull the bump cursor back to one past the highest unreleased id
    ///
    /// Lets the next allocations reuse a freed tail range sequentially
    /// before falling back to the front scan.
    pub fn reclaim_tail(&mut self) {
        self.next_id = self
            .reclaimable
            .iter()
            .rposition(|&free| !free)
            .map_or(0, |index| index + 1);
    }

    fn first_free_from_front(&self) -> Option<usize> {
        self.reclaimable.iter().position(|&free| free)
    }

    fn checked(&self, id: EntityId) -> usize {
        let index = id.index();
        assert!(
            index < self.capacity,
            "entity id {} out of range for pool of {}",
            index,
            self.capacity
        );
        index
    }
}

fn column<T: Default>(capacity: usize) -> Vec<T> {
    std::iter::repeat_with(T::default).take(capacity).collect()
}
