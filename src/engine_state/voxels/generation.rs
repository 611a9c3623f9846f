//! # World Generation
//!
//! One-shot population of the grid from the validated [`WorldBounds`], run after the
//! engine state is built and before any player input.
//!
//! ## Layers
//!
//! The cuboid between `origin` and `end` is filled top to bottom:
//!
//! - the `origin` layer is grass
//! - the `end` layer is unbreakable stone
//! - cells at or above the vertical midpoint are dirt
//! - everything else is stone
//!
//! The spawn cell is always stone that is unbreakable and nothing else, so the player
//! never starts above a hole.
//!
//! [`WorldBounds`]: super::bounds::WorldBounds

use cgmath::Point3;
use log::info;

use super::block::block_tag::BlockTag;
use super::block::{BlockParams, BlockType};
use super::voxel::Voxel;
use crate::application_state::frontend::Frontend;
use crate::engine_state::EngineState;
use crate::error::WorldError;

const GRASS: &str = "grass";
const DIRT: &str = "dirt";
const STONE: &str = "stone";

/// Fills the world from its bounds.
pub struct WorldGenerator;

impl WorldGenerator {
    /// Generates the layered cuboid.
    ///
    /// Voxels are inserted directly: generation never triggers cascades, and every
    /// voxel gets its renderable.
    ///
    /// # Arguments
    ///
    /// * `state` - Engine state whose grid is filled
    /// * `frontend` - Receives one renderable per voxel
    ///
    /// # Returns
    ///
    /// The number of voxels placed.
    ///
    /// # Errors
    ///
    /// * [`WorldError::UnknownBlockType`] if grass, dirt or stone is not registered
    /// * [`WorldError::Occupied`] if the grid was not empty where the cuboid lies
    pub fn generate<F: Frontend + ?Sized>(
        state: &mut EngineState,
        frontend: &mut F,
    ) -> Result<usize, WorldError> {
        for name in [GRASS, DIRT, STONE] {
            if !state.registry.contains(name) {
                return Err(WorldError::UnknownBlockType(name.to_string()));
            }
        }

        let bounds = state.bounds;
        let (origin, end, spawn) = (bounds.origin(), bounds.end(), bounds.spawn());
        let mut placed = 0;

        for x in axis(origin.x, end.x) {
            for y in axis(origin.y, end.y) {
                for z in axis(origin.z, end.z) {
                    let position = Point3::new(x, y, z);
                    let voxel = if position == spawn {
                        Voxel::with_overrides(
                            position,
                            block_type(state, STONE)?,
                            &[BlockTag::Unbreakable, BlockTag::Overwrite],
                            &BlockParams::new(),
                        )
                    } else if y == origin.y {
                        Voxel::new(position, block_type(state, GRASS)?)
                    } else if y == end.y {
                        Voxel::with_overrides(
                            position,
                            block_type(state, STONE)?,
                            &[BlockTag::Unbreakable],
                            &BlockParams::new(),
                        )
                    } else if 2 * y >= origin.y + end.y {
                        Voxel::new(position, block_type(state, DIRT)?)
                    } else {
                        Voxel::new(position, block_type(state, STONE)?)
                    };
                    state.world.insert(voxel)?;
                    state.attach_renderable(position, frontend);
                    placed += 1;
                }
            }
        }

        info!("Generated {placed} voxels between {origin:?} and {end:?}");
        Ok(placed)
    }
}

fn block_type<'a>(state: &'a EngineState, name: &str) -> Result<&'a BlockType, WorldError> {
    state
        .registry
        .get(name)
        .ok_or_else(|| WorldError::UnknownBlockType(name.to_string()))
}

/// Coordinates from `origin` to `end` inclusive, stepping towards `end`.
fn axis(origin: i32, end: i32) -> impl Iterator<Item = i32> {
    let step = (end - origin).signum();
    (0..=(end - origin).abs()).map(move |i| origin + i * step)
}
