//! Entity/component layer
//!
//! A fixed-capacity `ComponentStore`, copyable `Entity` handles into it, and
//! the `EntityDirectory` that stages creation and recycles destroyed ids.

pub mod components;
pub mod directory;
pub mod draw;
pub mod entity;
pub mod store;

pub use components::{AnimatedSprite, Animation, Cell, Shape, Text, Transform};
pub use directory::EntityDirectory;
pub use draw::{draw_all, draw_entity, draw_tagged, Canvas};
pub use entity::Entity;
pub use store::{Component, ComponentStore};
