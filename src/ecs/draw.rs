//! Drawing seam between the store and whatever paints pixels
//!
//! The engine never draws. A renderer implements `Canvas` and the directory
//! walks entities through `draw_entity`, which decides which components are
//! visible.

use crate::ecs::components::{AnimatedSprite, Animation, Shape, Text, Transform};
use crate::ecs::directory::EntityDirectory;
use crate::ecs::entity::Entity;
use crate::ecs::store::ComponentStore;

pub trait Canvas {
    fn draw_sprite(&mut self, transform: &Transform, animation: &Animation);
    fn draw_shape(&mut self, transform: &Transform, shape: &Shape);
    fn draw_text(&mut self, transform: &Transform, text: &Text);
}

/// Paint one entity: its animation, or failing that its shape, then its text
///
/// Entities without a transform have nowhere to be drawn and are skipped.
pub fn draw_entity(store: &ComponentStore, entity: Entity, canvas: &mut impl Canvas) {
    if !entity.has::<Transform>(store) {
        return;
    }
    let transform = entity.get::<Transform>(store);

    if entity.has::<AnimatedSprite>(store) {
        canvas.draw_sprite(transform, &entity.get::<AnimatedSprite>(store).animation);
    } else if entity.has::<Shape>(store) {
        canvas.draw_shape(transform, entity.get::<Shape>(store));
    }

    if entity.has::<Text>(store) {
        canvas.draw_text(transform, entity.get::<Text>(store));
    }
}

/// Paint every committed entity
pub fn draw_all(directory: &EntityDirectory, canvas: &mut impl Canvas) {
    for &entity in directory.entities() {
        draw_entity(directory.store(), entity, canvas);
    }
}

/// Paint committed entities carrying `tag`
pub fn draw_tagged(directory: &EntityDirectory, tag: &str, canvas: &mut impl Canvas) {
    for &entity in directory.entities_by_tag(tag) {
        draw_entity(directory.store(), entity, canvas);
    }
}
