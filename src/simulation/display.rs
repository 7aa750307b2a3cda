//! Board presentation through the entity layer
//!
//! One reusable cell entity is restyled and drawn for every grid cell
//! instead of keeping N² entities alive.

use glam::Vec2;

use crate::core::config::WindowConfig;
use crate::core::error::Result;
use crate::core::types::Color;
use crate::ecs::components::{Cell, Shape, Text, Transform};
use crate::ecs::directory::EntityDirectory;
use crate::ecs::draw::{draw_entity, Canvas};
use crate::ecs::entity::Entity;

pub const CELL_TAG: &str = "cell";

/// Share of the window height covered by the board
const BOARD_HEIGHT_FRACTION: f32 = 0.75;

pub struct GridDisplay {
    directory: EntityDirectory,
    cell: Entity,
    board_extent: f32,
}

impl GridDisplay {
    /// Square board of side `board_extent` pixels, top-left at the origin
    pub fn new(board_extent: f32) -> Result<Self> {
        assert!(board_extent > 0.0, "board extent must be positive");

        let mut directory = EntityDirectory::with_capacity(1);
        let cell = directory.add_entity(CELL_TAG)?;
        {
            let store = directory.store_mut();
            cell.add(store, Transform::new(Vec2::ZERO));
            cell.add(store, Shape::new(Vec2::ZERO, Color::WHITE, Color::BLACK, -1.0));
            cell.add(store, Text::new("0", Vec2::ZERO, Color::BLACK));
            cell.add(store, Cell::new(0));
        }
        directory.commit();

        Ok(Self {
            directory,
            cell,
            board_extent,
        })
    }

    pub fn for_window(window: &WindowConfig) -> Result<Self> {
        Self::new(window.height as f32 * BOARD_HEIGHT_FRACTION)
    }

    pub fn board_extent(&self) -> f32 {
        self.board_extent
    }

    pub fn set_board_extent(&mut self, board_extent: f32) {
        assert!(board_extent > 0.0, "board extent must be positive");
        self.board_extent = board_extent;
    }

    pub fn directory(&self) -> &EntityDirectory {
        &self.directory
    }

    pub fn cell(&self) -> Entity {
        self.cell
    }

    /// Draw `gene` as an N×N board, shading each cell by its heat
    pub fn paint(&mut self, gene: &[u8], heat: &[i32], grid_size: usize, canvas: &mut impl Canvas) {
        debug_assert_eq!(gene.len(), grid_size * grid_size);
        debug_assert_eq!(heat.len(), gene.len());

        let cell_size = self.board_extent / grid_size as f32;
        let half = cell_size / 2.0;

        for (index, (&value, &cell_heat)) in gene.iter().zip(heat).enumerate() {
            let (row, col) = (index / grid_size, index % grid_size);
            {
                let store = self.directory.store_mut();
                self.cell.get_mut::<Transform>(store).pos =
                    Vec2::new(col as f32 * cell_size + half, row as f32 * cell_size + half);

                let shape = self.cell.get_mut::<Shape>(store);
                shape.size = Vec2::splat(cell_size);
                shape.fill = heat_color(cell_heat, grid_size);

                let text = self.cell.get_mut::<Text>(store);
                text.content = (value as u32 + 1).to_string();
                text.container = Vec2::splat(cell_size * 0.5);

                self.cell.get_mut::<Cell>(store).value = value;
            }
            draw_entity(self.directory.store(), self.cell, canvas);
        }
    }
}

/// White for no conflicts, fading to red as heat approaches N−1
pub fn heat_color(heat: i32, grid_size: usize) -> Color {
    let unit = if grid_size > 1 {
        255 / (grid_size as i32 - 1)
    } else {
        255
    };
    let gb = (255 - unit * heat).clamp(0, 255) as u8;
    Color::rgb(255, gb, gb)
}
