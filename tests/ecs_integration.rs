//! Integration tests for the entity layer
//!
//! These tests drive the directory and store the way a scene does:
//! - Staged creation becomes visible only after commit
//! - Destroyed entities linger until commit, then release their slot
//! - Capacity exhaustion surfaces as an error

use glam::Vec2;
use grid_evolve::core::error::EvolveError;
use grid_evolve::core::types::Color;
use grid_evolve::ecs::{Cell, ComponentStore, EntityDirectory, Shape, Text, Transform};

#[test]
fn test_staged_entity_visible_after_commit() {
    let mut directory = EntityDirectory::with_capacity(8);
    let cell = directory.add_entity("cell").unwrap();
    cell.add(directory.store_mut(), Cell::new(3));

    assert!(directory.entities_by_tag("cell").is_empty());
    assert!(directory.entities().is_empty());

    directory.commit();
    assert_eq!(directory.entities_by_tag("cell"), [cell]);
    assert_eq!(cell.get::<Cell>(directory.store()).value, 3);
}

#[test]
fn test_destroyed_entity_lingers_until_commit() {
    let mut directory = EntityDirectory::with_capacity(4);
    let a = directory.add_entity("cell").unwrap();
    let b = directory.add_entity("label").unwrap();
    directory.commit();

    a.destroy(directory.store_mut());
    assert!(!a.is_alive(directory.store()));
    assert_eq!(directory.entities().len(), 2);

    directory.commit();
    assert_eq!(directory.entities(), [b]);
    assert!(directory.entities_by_tag("cell").is_empty());
}

#[test]
fn test_recycled_slot_starts_clean() {
    let mut directory = EntityDirectory::with_capacity(1);
    let first = directory.add_entity("cell").unwrap();
    first.add(
        directory.store_mut(),
        Shape::new(Vec2::splat(10.0), Color::WHITE, Color::BLACK, 1.0),
    );
    directory.commit();

    first.destroy(directory.store_mut());
    directory.commit();

    let second = directory.add_entity("cell").unwrap();
    assert_eq!(second.id(), first.id());
    assert!(!second.has::<Shape>(directory.store()));
    assert!(!second.has::<Transform>(directory.store()));
}

#[test]
fn test_capacity_one_rejects_second_create() {
    let mut store = ComponentStore::new(1);
    store.create("cell").unwrap();
    let result = store.create("cell");
    assert!(matches!(
        result,
        Err(EvolveError::CapacityExhausted { capacity: 1 })
    ));
}

#[test]
fn test_destroy_tag_keeps_other_tags() {
    let mut directory = EntityDirectory::with_capacity(16);
    for _ in 0..5 {
        directory.add_entity("cell").unwrap();
    }
    let label = directory.add_entity("label").unwrap();
    label.add(
        directory.store_mut(),
        Text::new("score", Vec2::new(80.0, 20.0), Color::BLACK),
    );
    directory.commit();

    directory.destroy_tag("cell");
    directory.commit();

    assert!(directory.entities_by_tag("cell").is_empty());
    assert_eq!(directory.entities(), [label]);
    assert_eq!(directory.entities_except("cell").count(), 1);
    assert_eq!(directory.store().live_count(), 1);
}

#[test]
fn test_refill_after_mass_destroy() {
    let mut directory = EntityDirectory::with_capacity(4);
    for _ in 0..4 {
        directory.add_entity("cell").unwrap();
    }
    directory.commit();
    assert!(directory.add_entity("cell").is_err());

    directory.destroy_tag("cell");
    directory.commit();

    for _ in 0..4 {
        directory.add_entity("cell").unwrap();
    }
    directory.commit();
    assert_eq!(directory.entities_by_tag("cell").len(), 4);
}

#[test]
#[should_panic(expected = "unknown entity tag")]
fn test_query_unknown_tag_panics() {
    let directory = EntityDirectory::with_capacity(2);
    directory.entities_by_tag("ghost");
}
