//! Component records stored column-wise in the `ComponentStore`
//!
//! Every record carries a `has` flag. A default record is absent; adding a
//! component overwrites the slot and raises the flag, removing only lowers it.

use glam::Vec2;

use crate::core::types::Color;

/// Position of an entity's centre in window coordinates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transform {
    pub has: bool,
    pub pos: Vec2,
}

impl Transform {
    pub fn new(pos: Vec2) -> Self {
        Self { has: false, pos }
    }
}

/// Frame-stepped sprite-sheet animation
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: String,
    pub frame_count: u32,
    /// Presentation frames per animation frame; 0 freezes the animation
    pub speed: u32,
    current_frame: u32,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            name: "NONE".to_string(),
            frame_count: 1,
            speed: 0,
            current_frame: 0,
        }
    }
}

impl Animation {
    pub fn new(name: impl Into<String>, frame_count: u32, speed: u32) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "animation needs a name");
        assert!(frame_count > 0, "animation needs at least one frame");
        Self {
            name,
            frame_count,
            speed,
            current_frame: 0,
        }
    }

    /// Advance one presentation frame
    pub fn update(&mut self) {
        if self.speed > 0 {
            self.current_frame += 1;
        }
    }

    /// Index of the sprite-sheet cell to show
    pub fn sheet_frame(&self) -> u32 {
        if self.speed == 0 {
            return 0;
        }
        (self.current_frame / self.speed) % self.frame_count
    }

    /// True once a full cycle has played
    pub fn has_ended(&self) -> bool {
        self.speed > 0 && self.current_frame / self.speed >= self.frame_count
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimatedSprite {
    pub has: bool,
    pub animation: Animation,
    pub repeating: bool,
}

impl AnimatedSprite {
    pub fn new(animation: Animation, repeating: bool) -> Self {
        Self {
            has: false,
            animation,
            repeating,
        }
    }
}

/// Axis-aligned rectangle centred on the entity's transform
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub has: bool,
    pub size: Vec2,
    pub fill: Color,
    pub outline: Color,
    pub outline_thickness: f32,
}

impl Shape {
    pub fn new(size: Vec2, fill: Color, outline: Color, outline_thickness: f32) -> Self {
        assert!(size.x >= 0.0 && size.y >= 0.0, "shape size must be non-negative");
        Self {
            has: false,
            size,
            fill,
            outline,
            outline_thickness,
        }
    }

    /// Scale the rectangle so it fits `bounds`, optionally keeping its aspect ratio
    pub fn fit_to(&mut self, bounds: Vec2, maintain_ratio: bool) {
        assert!(bounds.x > 0.0 && bounds.y > 0.0, "fit bounds must be positive");
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            self.size = bounds;
            return;
        }
        let scale = bounds / self.size;
        self.size *= if maintain_ratio {
            Vec2::splat(scale.x.min(scale.y))
        } else {
            scale
        };
    }
}

/// Label drawn centred inside a container box
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub has: bool,
    pub content: String,
    /// Box the glyphs are scaled into
    pub container: Vec2,
    pub fill: Color,
    pub outline: Color,
    pub outline_thickness: f32,
}

impl Text {
    pub fn new(content: impl Into<String>, container: Vec2, fill: Color) -> Self {
        assert!(
            container.x >= 0.0 && container.y >= 0.0,
            "text container must be non-negative"
        );
        Self {
            has: false,
            content: content.into(),
            container,
            fill,
            outline: fill,
            outline_thickness: 0.0,
        }
    }
}

/// Symbol shown by a grid cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub has: bool,
    pub value: u8,
}

impl Cell {
    pub fn new(value: u8) -> Self {
        Self { has: false, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_default_absent() {
        assert!(!Transform::default().has);
        assert!(!Shape::default().has);
        assert!(!Text::default().has);
        assert!(!Cell::default().has);
        assert!(!AnimatedSprite::default().has);
    }

    #[test]
    fn test_animation_cycles_through_frames() {
        let mut animation = Animation::new("spark", 3, 2);
        let frames: Vec<u32> = (0..8)
            .map(|_| {
                let frame = animation.sheet_frame();
                animation.update();
                frame
            })
            .collect();
        assert_eq!(frames, vec![0, 0, 1, 1, 2, 2, 0, 0]);
        assert!(animation.has_ended());
    }

    #[test]
    fn test_frozen_animation_never_ends() {
        let mut animation = Animation::new("still", 4, 0);
        for _ in 0..100 {
            animation.update();
        }
        assert_eq!(animation.sheet_frame(), 0);
        assert!(!animation.has_ended());
    }

    #[test]
    fn test_shape_fit_keeps_ratio() {
        let mut shape = Shape::new(Vec2::new(20.0, 10.0), Color::WHITE, Color::BLACK, 1.0);
        shape.fit_to(Vec2::new(10.0, 10.0), true);
        assert_eq!(shape.size, Vec2::new(10.0, 5.0));

        shape.fit_to(Vec2::new(30.0, 30.0), false);
        assert_eq!(shape.size, Vec2::new(30.0, 30.0));
    }
}
