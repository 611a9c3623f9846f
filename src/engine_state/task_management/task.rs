//! # Cascade Tasks
//!
//! One unit of rule-engine work. A player action is split into tasks, and each task may
//! publish further tasks; together they form the cascade of that action.
//!
//! ## Task Lifecycle
//! 1. A task is published with `CascadeQueue::publish_task()`
//! 2. The rule engine pops it and performs its immediate effect on the grid
//! 3. Follow-up work is published back onto the queue, in reverse order so the first
//!    follow-up runs next
//!
//! Tasks that refer to an existing voxel carry its [`VoxelId`] rather than a position.
//! The voxel is located again when the task runs, and the task does nothing if the voxel
//! has been destroyed or replaced in the meantime.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::block_side::{BlockSide, BlockSides};
use crate::engine_state::voxels::voxel::VoxelId;

/// A pending piece of rule-engine work.
#[derive(Clone, Debug, PartialEq)]
pub enum CascadeTask {
    /// Place the held tool at `target`, the cell across `normal` from the clicked voxel.
    Place {
        /// Cell to place into
        target: Point3<i32>,
        /// Face normal of the click, reused by area carry-over
        normal: Vector3<i32>,
    },

    /// Blast the surroundings of `target` if the held tool is explosive.
    Detonate {
        /// Blast center
        target: Point3<i32>,
    },

    /// Insert the held tool's voxel at `target` and start its cascade.
    Settle {
        /// Cell to place into
        target: Point3<i32>,
    },

    /// Dirt placed at `target` covers the grass next to it.
    CoverGrass {
        /// Cell of the new dirt
        target: Point3<i32>,
    },

    /// Apply blast damage to one voxel.
    Blow {
        /// Target voxel
        id: VoxelId,
        /// Blast center
        center: Point3<i32>,
        /// Blast strength
        damage: f64,
    },

    /// Let the neighbors of `origin` react to a change there.
    Propagate {
        /// Cell whose neighborhood is checked
        origin: Point3<i32>,
        /// Voxel that may fall itself once the neighbors are done
        check_self: Option<VoxelId>,
        /// Which neighbors to check
        sides: BlockSides,
    },

    /// Check the neighbor of `origin` across `side`.
    Neighbor {
        /// Cell whose neighbor is checked
        origin: Point3<i32>,
        /// Direction of the neighbor
        side: BlockSide,
    },

    /// Drop a gravity-affected voxel until it is supported.
    Fall {
        /// Falling voxel
        id: VoxelId,
    },

    /// Replace a voxel by its decay target.
    Decay {
        /// Decaying voxel
        id: VoxelId,
        /// Explicit target type; the voxel's `decay_into` parameter when `None`
        into: Option<String>,
    },
}

impl CascadeTask {
    /// Short name for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            CascadeTask::Place { .. } => "place",
            CascadeTask::Detonate { .. } => "detonate",
            CascadeTask::Settle { .. } => "settle",
            CascadeTask::CoverGrass { .. } => "cover-grass",
            CascadeTask::Blow { .. } => "blow",
            CascadeTask::Propagate { .. } => "propagate",
            CascadeTask::Neighbor { .. } => "neighbor",
            CascadeTask::Fall { .. } => "fall",
            CascadeTask::Decay { .. } => "decay",
        }
    }
}
