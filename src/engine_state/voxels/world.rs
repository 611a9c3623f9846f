//! # World Module
//!
//! This module provides the `World` struct, the sparse voxel grid at the center of the
//! engine. Every placed block lives in exactly one cell of the grid, keyed by its
//! integer position.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach where only occupied cells are kept in
//! memory. Empty space costs nothing, so the playable area is bounded only by the
//! configured world radius.
//!
//! ## Invariants
//!
//! - At most one voxel exists per position
//! - A voxel's stored position always equals its key in the grid
//! - Removing a voxel from the grid destroys it
//!
//! The only way to move a voxel is [`World::reposition`], which keeps the second
//! invariant intact.

use std::collections::HashMap;

use cgmath::Point3;

use super::voxel::{Voxel, VoxelId};
use crate::error::WorldError;

/// Represents the voxel world as a sparse 3D grid of blocks.
///
/// # Examples
///
/// ```ignore
/// let mut world = World::new();
/// world.insert(Voxel::new(Point3::new(0, 0, 0), stone))?;
///
/// // A second voxel in the same cell is rejected
/// assert!(world.insert(Voxel::new(Point3::new(0, 0, 0), stone)).is_err());
/// ```
#[derive(Debug, Default)]
pub struct World {
    /// A mapping from cell coordinates to the voxel occupying that cell.
    voxels: HashMap<Point3<i32>, Voxel>,
    /// Reverse index from voxel identity to its cell.
    positions: HashMap<VoxelId, Point3<i32>>,
}

impl World {
    /// Creates a new, empty world.
    ///
    /// # Returns
    ///
    /// A new `World` instance with no voxels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves the voxel at the specified position.
    ///
    /// # Arguments
    ///
    /// * `position` - The cell to look up
    ///
    /// # Returns
    ///
    /// The voxel if the cell is occupied, or `None` if not.
    pub fn get(&self, position: Point3<i32>) -> Option<&Voxel> {
        self.voxels.get(&position)
    }

    /// Mutable access to the voxel at the specified position.
    ///
    /// The position itself cannot be changed through this reference.
    pub fn get_mut(&mut self, position: Point3<i32>) -> Option<&mut Voxel> {
        self.voxels.get_mut(&position)
    }

    /// Finds the cell of a voxel that may have moved since it was last seen.
    ///
    /// # Returns
    ///
    /// `None` once the voxel has been removed from the grid.
    pub fn locate(&self, id: VoxelId) -> Option<Point3<i32>> {
        self.positions.get(&id).copied()
    }

    /// Returns whether a voxel occupies `position`.
    pub fn is_occupied(&self, position: Point3<i32>) -> bool {
        self.voxels.contains_key(&position)
    }

    /// Adds a voxel at its own position.
    ///
    /// # Errors
    ///
    /// [`WorldError::Occupied`] if the cell already holds a voxel. The grid is left
    /// unchanged in that case and the rejected voxel is dropped.
    pub fn insert(&mut self, voxel: Voxel) -> Result<(), WorldError> {
        let position = voxel.position();
        if self.voxels.contains_key(&position) {
            return Err(WorldError::Occupied(position));
        }
        self.positions.insert(voxel.id(), position);
        self.voxels.insert(position, voxel);
        Ok(())
    }

    /// Removes and returns the voxel at `position`.
    ///
    /// Removing from an empty cell is a no-op that returns `None`.
    pub fn remove(&mut self, position: Point3<i32>) -> Option<Voxel> {
        let voxel = self.voxels.remove(&position)?;
        self.positions.remove(&voxel.id());
        Some(voxel)
    }

    /// Moves the voxel at `from` into the empty cell `to`.
    ///
    /// Moving a voxel onto its own position succeeds without doing anything.
    ///
    /// # Errors
    ///
    /// * [`WorldError::Vacant`] if `from` is empty
    /// * [`WorldError::Occupied`] if `to` is held by a different voxel
    pub fn reposition(&mut self, from: Point3<i32>, to: Point3<i32>) -> Result<(), WorldError> {
        if from == to {
            return if self.is_occupied(from) {
                Ok(())
            } else {
                Err(WorldError::Vacant(from))
            };
        }
        if self.is_occupied(to) {
            return Err(WorldError::Occupied(to));
        }
        let mut voxel = self.voxels.remove(&from).ok_or(WorldError::Vacant(from))?;
        voxel.set_position(to);
        self.positions.insert(voxel.id(), to);
        self.voxels.insert(to, voxel);
        Ok(())
    }

    /// Number of voxels in the world.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Returns whether the world holds no voxels.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Iterates every voxel, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Voxel> {
        self.voxels.values()
    }

    /// Lazily yields the voxels within Euclidean distance `radius` of `center`.
    ///
    /// The scan covers the cube `[-radius, radius]^3` around the center and keeps the
    /// occupied cells whose distance is at most `radius`. Nothing is collected up
    /// front, so callers that mutate the grid must snapshot what they need first.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the sphere, which does not need to be occupied
    /// * `radius` - Sphere radius in blocks; a negative or NaN radius yields nothing
    pub fn neighbors_in_radius(
        &self,
        center: Point3<i32>,
        radius: f64,
    ) -> impl Iterator<Item = &Voxel> + '_ {
        let reach = if radius >= 0.0 {
            radius.min(f64::from(i32::MAX)).floor() as i32
        } else {
            -1
        };
        let span = -reach..=reach;
        span.clone()
            .flat_map(move |dx| span.clone().map(move |dy| (dx, dy)))
            .flat_map(move |(dx, dy)| (-reach..=reach).map(move |dz| (dx, dy, dz)))
            .filter_map(move |(dx, dy, dz)| {
                let position = Point3::new(
                    center.x.checked_add(dx)?,
                    center.y.checked_add(dy)?,
                    center.z.checked_add(dz)?,
                );
                self.voxels.get(&position)
            })
            .filter(move |voxel| distance(voxel.position(), center) <= radius)
    }
}

/// Euclidean distance between two cells.
pub fn distance(a: Point3<i32>, b: Point3<i32>) -> f64 {
    let d = b - a;
    (f64::from(d.x).powi(2) + f64::from(d.y).powi(2) + f64::from(d.z).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_tag::TagSet;
    use crate::engine_state::voxels::block::{AssetRef, BlockParams, BlockType};
    use pretty_assertions::assert_eq;

    fn stone() -> BlockType {
        BlockType {
            name: "stone".into(),
            asset: AssetRef {
                model: "assets/block".into(),
                texture: "stone".into(),
                preloaded: true,
            },
            key: None,
            default_tags: TagSet::new(),
            default_params: BlockParams::new(),
        }
    }

    #[test]
    fn insert_rejects_occupied_cells() {
        let mut world = World::new();
        let first = Voxel::new(Point3::new(1, 1, 1), &stone());
        let first_id = first.id();
        world.insert(first).expect("empty cell");

        let err = world
            .insert(Voxel::new(Point3::new(1, 1, 1), &stone()))
            .unwrap_err();
        assert_eq!(err, WorldError::Occupied(Point3::new(1, 1, 1)));
        assert_eq!(world.len(), 1);
        assert_eq!(world.get(Point3::new(1, 1, 1)).map(Voxel::id), Some(first_id));
        assert_eq!(world.locate(first_id), Some(Point3::new(1, 1, 1)));
    }

    #[test]
    fn remove_absent_is_a_no_op() {
        let mut world = World::new();
        assert!(world.remove(Point3::new(0, 0, 0)).is_none());
        assert!(world.is_empty());
    }

    #[test]
    fn removed_voxels_cannot_be_located() {
        let mut world = World::new();
        let voxel = Voxel::new(Point3::new(3, 0, 0), &stone());
        let id = voxel.id();
        world.insert(voxel).expect("empty cell");
        let removed = world.remove(Point3::new(3, 0, 0)).expect("present");
        assert_eq!(removed.id(), id);
        assert_eq!(world.locate(id), None);
    }

    #[test]
    fn reposition_keeps_key_and_position_in_sync() {
        let mut world = World::new();
        let voxel = Voxel::new(Point3::new(0, 5, 0), &stone());
        let id = voxel.id();
        world.insert(voxel).expect("empty cell");
        world
            .reposition(Point3::new(0, 5, 0), Point3::new(0, 2, 0))
            .expect("target is free");
        assert_eq!(world.locate(id), Some(Point3::new(0, 2, 0)));

        assert!(world.get(Point3::new(0, 5, 0)).is_none());
        let moved = world.get(Point3::new(0, 2, 0)).expect("voxel moved");
        assert_eq!(moved.position(), Point3::new(0, 2, 0));
        for voxel in world.iter() {
            assert_eq!(world.get(voxel.position()).map(Voxel::id), Some(voxel.id()));
        }
    }

    #[test]
    fn reposition_refuses_to_overwrite() {
        let mut world = World::new();
        world.insert(Voxel::new(Point3::new(0, 1, 0), &stone())).expect("empty");
        world.insert(Voxel::new(Point3::new(0, 0, 0), &stone())).expect("empty");
        assert_eq!(
            world.reposition(Point3::new(0, 1, 0), Point3::new(0, 0, 0)),
            Err(WorldError::Occupied(Point3::new(0, 0, 0)))
        );
        assert_eq!(
            world.reposition(Point3::new(9, 9, 9), Point3::new(8, 8, 8)),
            Err(WorldError::Vacant(Point3::new(9, 9, 9)))
        );
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn neighbors_are_inside_the_sphere() {
        let mut world = World::new();
        for x in -3..=3 {
            for y in -3..=3 {
                for z in -3..=3 {
                    world
                        .insert(Voxel::new(Point3::new(x, y, z), &stone()))
                        .expect("distinct cells");
                }
            }
        }
        let center = Point3::new(0, 0, 0);

        let within_one: Vec<_> = world.neighbors_in_radius(center, 1.0).collect();
        // The center plus its six face neighbors
        assert_eq!(within_one.len(), 7);

        let within_two = world.neighbors_in_radius(center, 2.0).count();
        let expected = world
            .iter()
            .filter(|v| distance(v.position(), center) <= 2.0)
            .count();
        assert_eq!(within_two, expected);
        assert!(world
            .neighbors_in_radius(center, 2.0)
            .all(|v| distance(v.position(), center) <= 2.0));

        assert_eq!(world.neighbors_in_radius(center, 0.0).count(), 1);
        assert_eq!(world.neighbors_in_radius(center, -1.0).count(), 0);
    }

    #[test]
    fn fractional_radius_uses_the_exact_distance() {
        let mut world = World::new();
        world.insert(Voxel::new(Point3::new(1, 1, 0), &stone())).expect("empty");
        let center = Point3::new(0, 0, 0);
        assert_eq!(world.neighbors_in_radius(center, 1.4).count(), 0);
        assert_eq!(world.neighbors_in_radius(center, 1.5).count(), 1);
    }

    #[test]
    fn scans_at_the_grid_edge_skip_unrepresentable_cells() {
        let mut world = World::new();
        let corner = Point3::new(i32::MAX, i32::MIN, 0);
        world.insert(Voxel::new(corner, &stone())).expect("empty");
        assert_eq!(world.neighbors_in_radius(corner, 1.0).count(), 1);
        assert_eq!(world.neighbors_in_radius(corner, f64::NAN).count(), 0);
    }
}
