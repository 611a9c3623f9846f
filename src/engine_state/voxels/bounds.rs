//! # World Bounds
//!
//! The spawn point, the generated cuboid and the size of the playable world. Bounds are
//! validated once, before generation; a value of [`WorldBounds`] is always consistent.

use cgmath::Point3;

use crate::error::BoundsError;

const AXES: [char; 3] = ['x', 'y', 'z'];

/// Largest accepted world radius.
///
/// Any cell inside the world, offset by any tool radius up to the world radius, stays
/// representable as `i32`.
pub const MAX_WORLD_RADIUS: f64 = (1u32 << 30) as f64;

/// Validated world geometry.
///
/// * `origin` and `end` are opposite corners of the generated cuboid, with
///   `origin >= end` on every axis;
/// * `spawn` lies inside that cuboid;
/// * both corners lie strictly within `±world_radius / 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    spawn: Point3<i32>,
    origin: Point3<i32>,
    end: Point3<i32>,
    world_radius: f64,
}

impl WorldBounds {
    /// Builds bounds from integer corners.
    ///
    /// # Errors
    ///
    /// A [`BoundsError`] naming the first axis that violates an invariant.
    pub fn new(
        spawn: Point3<i32>,
        origin: Point3<i32>,
        end: Point3<i32>,
        world_radius: f64,
    ) -> Result<Self, BoundsError> {
        if !(world_radius.is_finite() && world_radius > 0.0) {
            return Err(BoundsError::InvalidRadius(world_radius));
        }
        if world_radius > MAX_WORLD_RADIUS {
            return Err(BoundsError::RadiusTooLarge {
                world_radius,
                max: MAX_WORLD_RADIUS,
            });
        }
        let half_size = world_radius / 2.0;
        let spawn_axes: [i32; 3] = spawn.into();
        let origin_axes: [i32; 3] = origin.into();
        let end_axes: [i32; 3] = end.into();

        for (i, axis) in AXES.into_iter().enumerate() {
            for (point, value) in [("origin", origin_axes[i]), ("end", end_axes[i])] {
                if f64::from(value).abs() >= half_size {
                    return Err(BoundsError::OutsideWorld {
                        point,
                        axis,
                        value,
                        half_size,
                    });
                }
            }
            if origin_axes[i] < end_axes[i] {
                return Err(BoundsError::InvertedCuboid {
                    axis,
                    origin: origin_axes[i],
                    end: end_axes[i],
                });
            }
            if !(origin_axes[i] >= spawn_axes[i] && spawn_axes[i] >= end_axes[i]) {
                return Err(BoundsError::SpawnOutsideCuboid {
                    axis,
                    spawn: spawn_axes[i],
                    origin: origin_axes[i],
                    end: end_axes[i],
                });
            }
        }

        Ok(WorldBounds {
            spawn,
            origin,
            end,
            world_radius,
        })
    }

    /// Builds bounds from the raw numbers of a configuration file.
    ///
    /// Coordinates arrive as JSON numbers; any fractional component is rejected before
    /// the geometric checks of [`new`](Self::new) run.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxel_rules::engine_state::voxels::bounds::WorldBounds;
    ///
    /// let bounds = WorldBounds::from_coordinates(
    ///     [0.0, 0.0, 0.0],
    ///     [20.0, 0.0, 20.0],
    ///     [-20.0, -2.0, -20.0],
    ///     150.0,
    /// );
    /// assert!(bounds.is_ok());
    ///
    /// let fractional = WorldBounds::from_coordinates(
    ///     [0.5, 0.0, 0.0],
    ///     [20.0, 0.0, 20.0],
    ///     [-20.0, -2.0, -20.0],
    ///     150.0,
    /// );
    /// assert!(fractional.is_err());
    /// ```
    pub fn from_coordinates(
        spawn: [f64; 3],
        origin: [f64; 3],
        end: [f64; 3],
        world_radius: f64,
    ) -> Result<Self, BoundsError> {
        Self::new(
            to_cell("spawn", spawn)?,
            to_cell("origin", origin)?,
            to_cell("end", end)?,
            world_radius,
        )
    }

    /// Where the player starts and is returned to.
    pub fn spawn(&self) -> Point3<i32> {
        self.spawn
    }

    /// The generation corner the iteration starts from (the top layer).
    pub fn origin(&self) -> Point3<i32> {
        self.origin
    }

    /// The generation corner the iteration ends at (the bottom layer).
    pub fn end(&self) -> Point3<i32> {
        self.end
    }

    /// Size of the playable world.
    pub fn world_radius(&self) -> f64 {
        self.world_radius
    }

    /// Half the world radius; the distance at which the world ends.
    pub fn half_size(&self) -> f64 {
        self.world_radius / 2.0
    }
}

fn to_cell(point: &'static str, coordinates: [f64; 3]) -> Result<Point3<i32>, BoundsError> {
    let mut cell = [0i32; 3];
    for (i, (value, axis)) in coordinates.into_iter().zip(AXES).enumerate() {
        if !value.is_finite()
            || value.fract() != 0.0
            || value < f64::from(i32::MIN)
            || value > f64::from(i32::MAX)
        {
            return Err(BoundsError::NonInteger { point, axis, value });
        }
        cell[i] = value as i32;
    }
    Ok(Point3::from(cell))
}
