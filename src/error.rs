//! # Error Types
//!
//! Two classes of failure exist in the engine:
//!
//! * [`ConfigError`] - the world description is invalid. These are fatal at startup and
//!   must stop world generation from ever running.
//! * [`WorldError`] - a grid invariant would have been broken. The rule engine checks
//!   before it mutates, so these only surface from direct misuse of the grid.
//!
//! [`StartupError`] wraps both for the application entry point.
//!
//! Ordinary gameplay outcomes such as placing into an occupied cell or hitting an
//! unbreakable block are not errors at all and never produce one of these values.

use cgmath::Point3;
use thiserror::Error;

/// Violation of one of the [`WorldBounds`](crate::engine_state::voxels::bounds::WorldBounds)
/// construction invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundsError {
    /// A coordinate of `point` was not a whole number.
    #[error("{point} coordinates must be integers ({axis} = {value})")]
    NonInteger {
        /// Which point ("spawn", "origin" or "end") was malformed
        point: &'static str,
        /// Axis name
        axis: char,
        /// The offending value
        value: f64,
    },

    /// A coordinate lies on or outside the world's edge.
    #[error("{axis}: {point} has to be inside the world ({value} is not within ±{half_size})")]
    OutsideWorld {
        /// Which point ("origin" or "end") was out of range
        point: &'static str,
        /// Axis name
        axis: char,
        /// The offending value
        value: i32,
        /// Half of the world radius
        half_size: f64,
    },

    /// The origin corner is lower than the end corner on an axis.
    #[error("origin {axis} cannot be less than end {axis} ({origin} < {end})")]
    InvertedCuboid {
        /// Axis name
        axis: char,
        /// Origin coordinate on this axis
        origin: i32,
        /// End coordinate on this axis
        end: i32,
    },

    /// The spawn point is not between origin and end.
    #[error("spawn {axis} has to be between origin {axis} and end {axis} ({origin} >= {spawn} >= {end} does not hold)")]
    SpawnOutsideCuboid {
        /// Axis name
        axis: char,
        /// Spawn coordinate on this axis
        spawn: i32,
        /// Origin coordinate on this axis
        origin: i32,
        /// End coordinate on this axis
        end: i32,
    },

    /// The world radius is not a positive finite number.
    #[error("world radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// The world radius is too large for integer cell coordinates.
    #[error("world radius {world_radius} exceeds the maximum of {max}")]
    RadiusTooLarge {
        /// The requested radius
        world_radius: f64,
        /// Largest accepted radius
        max: f64,
    },
}

/// Fatal startup error: the world configuration cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}")]
    Io {
        /// Path that was being read
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for a [`WorldConfig`](crate::config::WorldConfig).
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The world bounds are invalid.
    #[error("invalid world bounds: {0}")]
    Bounds(#[from] BoundsError),

    /// A block type lists a tag name that has no meaning.
    #[error("block type {block:?} has unknown tag {tag:?}")]
    UnknownTag {
        /// Block type being registered
        block: String,
        /// The unrecognized tag name
        tag: String,
    },

    /// Two block types share a name.
    #[error("block type {0:?} is registered twice")]
    DuplicateBlockType(String),

    /// A block type that the configuration refers to was never registered.
    #[error("unknown block type {0:?}")]
    UnknownBlockType(String),

    /// A block type's parameters do not support its tags.
    #[error("block type {block:?} is {tag} but {problem}")]
    MissingParameter {
        /// Block type being registered
        block: String,
        /// The tag that needs the parameter
        tag: &'static str,
        /// What is wrong with the parameter
        problem: String,
    },

    /// A numeric block parameter is out of range.
    #[error("block type {block:?} has {key} = {value}, which is {problem}")]
    InvalidParameter {
        /// Block type being registered
        block: String,
        /// Parameter name
        key: &'static str,
        /// The offending value
        value: f64,
        /// Which range it violates
        problem: &'static str,
    },
}

/// A mutation of the voxel grid that would break one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// A voxel already occupies the position.
    #[error("position {0:?} is already occupied")]
    Occupied(Point3<i32>),

    /// No voxel exists at the position.
    #[error("no voxel at {0:?}")]
    Vacant(Point3<i32>),

    /// The block type name is not in the registry.
    #[error("unknown block type {0:?}")]
    UnknownBlockType(String),
}

/// Anything that stops the application from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// World generation failed.
    #[error("world generation failed: {0}")]
    World(#[from] WorldError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_error_messages_name_the_axis() {
        let err = BoundsError::InvertedCuboid {
            axis: 'y',
            origin: -3,
            end: 0,
        };
        assert_eq!(
            err.to_string(),
            "origin y cannot be less than end y (-3 < 0)"
        );
    }

    #[test]
    fn config_error_wraps_bounds_error() {
        let err: ConfigError = BoundsError::InvalidRadius(-1.0).into();
        assert!(matches!(err, ConfigError::Bounds(BoundsError::InvalidRadius(_))));
        assert!(err.to_string().starts_with("invalid world bounds"));
    }
}
