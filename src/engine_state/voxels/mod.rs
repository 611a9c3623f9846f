//! # Voxel Engine Core
//!
//! This module contains the voxel data model: what kinds of blocks exist, the blocks
//! placed in the world, where the world ends and how it is first filled.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Block types, behavior tags, parameters and the type registry
//! * **Voxel**: A single placed block with its resolved tags and parameters
//! * **World**: The sparse grid owning every voxel
//! * **Bounds**: The validated spawn point, generation cuboid and world size
//! * **Generation**: The one-shot layered fill of the cuboid
//!
//! ## Data Flow
//!
//! 1. Block types are registered from the configuration
//! 2. The bounds are validated, then generation fills the grid
//! 3. The rule engine mutates the grid in response to player actions
//! 4. Every grid change is mirrored to the frontend's renderables

pub mod block;
pub mod bounds;
pub mod generation;
pub mod voxel;
pub mod world;
