//! # Rule Engine
//!
//! The mutation rules of the voxel world. Every public operation is one top-level
//! action: it publishes its first task on a [`CascadeQueue`] and drains the queue, so
//! the grid is at a fixed point again when the call returns.
//!
//! ## Rules
//!
//! * **Place**: fills an empty cell with the held tool. An explosive tool blasts its
//!   surroundings first; an implacable tool places nothing. Switching away from the
//!   `place` tool makes the next placement repeat itself around the target.
//! * **Break**: removes a breakable block.
//! * **Blow**: blast damage; a block survives if its toughness (distance / 10 plus its
//!   `tnt_resistance`) reaches the damage.
//! * **Fall**: a gravity-affected block drops until supported or near the world edge.
//! * **Decay**: a decayable block is replaced by its `decay_into` type.
//! * **Propagate**: after a change, neighbors react: gravity-affected neighbors fall,
//!   and a decayable block directly below decays.
//!
//! Outcomes such as placing into an occupied cell or hitting an unbreakable block are
//! silent no-ops, logged at trace level only.

use cgmath::{Point3, Vector3};
use log::{debug, trace, warn};

use super::task_management::task::CascadeTask;
use super::task_management::{CascadeQueue, CascadeReport};
use super::voxels::block::block_side::{BlockSide, BlockSides};
use super::voxels::block::block_tag::BlockTag;
use super::voxels::block::{DAMAGE, DECAY_INTO, RADIUS, TNT_RESISTANCE};
use super::voxels::voxel::{Voxel, VoxelId};
use super::voxels::world::distance;
use super::EngineState;
use crate::application_state::frontend::Frontend;
use crate::error::WorldError;


/// The area tool; switching away from it repeats the next placement around the target.
pub const PLACE_TOOL: &str = "place";
/// Placing this type turns neighboring grass into its decay target.
pub const DIRT: &str = "dirt";
/// The type covered by dirt.
pub const GRASS: &str = "grass";
/// Distance, in blocks, over which blast toughness grows by one.
pub const BLAST_FALLOFF: f64 = 10.0;

/// Resistance of a block at `distance` from a blast with the given intrinsic
/// `resistance`. The block is destroyed when this is below the blast damage.
pub fn blast_toughness(distance: f64, resistance: f64) -> f64 {
    distance / BLAST_FALLOFF + resistance
}

/// Applies the voxel rules to an [`EngineState`], mirroring every change to a
/// [`Frontend`].
pub struct RuleEngine<'a, F: Frontend + ?Sized> {
    state: &'a mut EngineState,
    frontend: &'a mut F,
    queue: CascadeQueue,
}

impl<'a, F: Frontend + ?Sized> RuleEngine<'a, F> {
    /// Borrows the state and frontend.
    pub fn new(state: &'a mut EngineState, frontend: &'a mut F) -> Self {
        let queue = CascadeQueue::new(state.settings.cascade_step_limit);
        RuleEngine {
            state,
            frontend,
            queue,
        }
    }

    /// Places the held tool against the face `normal` of the voxel at `invoker`.
    ///
    /// The target cell is `invoker + normal`. Placing into an occupied cell does
    /// nothing and leaves the tool selection as it was, as does a `normal` that is not
    /// one of the six unit face normals.
    pub fn place(&mut self, invoker: Point3<i32>, normal: Vector3<i32>) -> CascadeReport {
        if BlockSide::from_normal(normal).is_none() {
            warn!("Ignoring placement against {invoker:?} with non-face normal {normal:?}");
            return CascadeReport::default();
        }
        debug!(
            "Placing {} against {invoker:?} (normal {normal:?})",
            self.state.hand.current()
        );
        self.run(CascadeTask::Place {
            target: invoker + normal,
            normal,
        })
    }

    /// Breaks the voxel at `position` unless it is unbreakable.
    pub fn break_block(&mut self, position: Point3<i32>) -> CascadeReport {
        let Some(voxel) = self.state.world.get(position) else {
            trace!("Nothing to break at {position:?}");
            return CascadeReport::default();
        };
        if voxel.has_tag(BlockTag::Unbreakable) {
            trace!("{} at {position:?} is unbreakable", voxel.block_type);
            return CascadeReport::default();
        }
        debug!("Breaking {} at {position:?}", voxel.block_type);
        let clip = self.state.settings.sounds.break_block.clone();
        self.destroy(position, &clip);
        self.run(CascadeTask::Propagate {
            origin: position,
            check_self: None,
            sides: BlockSides::ALL,
        })
    }

    /// Applies blast `damage` centered on `center` to the voxel at `position`.
    ///
    /// Calling this on an empty cell, for instance a voxel an earlier blast already
    /// destroyed, does nothing.
    pub fn blow_block(
        &mut self,
        position: Point3<i32>,
        center: Point3<i32>,
        damage: f64,
    ) -> CascadeReport {
        match self.state.world.get(position) {
            Some(voxel) => {
                let id = voxel.id();
                self.run(CascadeTask::Blow { id, center, damage })
            }
            None => CascadeReport::default(),
        }
    }

    /// Replaces the voxel at `position` with a voxel of type `into`, or of its own
    /// `decay_into` parameter when `into` is `None`.
    pub fn decay(&mut self, position: Point3<i32>, into: Option<&str>) -> CascadeReport {
        match self.state.world.get(position) {
            Some(voxel) => {
                let id = voxel.id();
                self.run(CascadeTask::Decay {
                    id,
                    into: into.map(str::to_string),
                })
            }
            None => CascadeReport::default(),
        }
    }

    /// Drops the voxel at `position` if it is gravity-affected and unsupported.
    pub fn fall(&mut self, position: Point3<i32>) -> CascadeReport {
        match self.state.world.get(position) {
            Some(voxel) => {
                let id = voxel.id();
                self.run(CascadeTask::Fall { id })
            }
            None => CascadeReport::default(),
        }
    }

    /// Lets the neighbors of `position` on the given `sides` react to a change there,
    /// then, with `check_self`, the voxel at `position` itself.
    pub fn propagate_update(
        &mut self,
        position: Point3<i32>,
        check_self: bool,
        sides: BlockSides,
    ) -> CascadeReport {
        let check_self = if check_self {
            self.state.world.get(position).map(Voxel::id)
        } else {
            None
        };
        self.run(CascadeTask::Propagate {
            origin: position,
            check_self,
            sides,
        })
    }

    /// Lazily yields the voxels within Euclidean distance `radius` of `center`.
    pub fn neighbors_in_radius(
        &self,
        center: Point3<i32>,
        radius: f64,
    ) -> impl Iterator<Item = &Voxel> + '_ {
        self.state.world.neighbors_in_radius(center, radius)
    }

    /// Holds the block type `name` as the tool. The previous tool is not changed.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownBlockType`] if no such type is registered; the selection is
    /// left unchanged.
    pub fn select_tool(&mut self, name: &str) -> Result<(), WorldError> {
        if !self.state.registry.contains(name) {
            return Err(WorldError::UnknownBlockType(name.to_string()));
        }
        if self.state.hand.current() != name {
            debug!("Selected tool {name}");
            self.state.hand.select(name);
        }
        Ok(())
    }

    /// Holds the type of the voxel at `position` as the tool. An empty cell does
    /// nothing.
    pub fn pick(&mut self, position: Point3<i32>) -> Result<(), WorldError> {
        match self.state.world.get(position) {
            Some(voxel) => {
                let name = voxel.block_type.clone();
                self.select_tool(&name)
            }
            None => Ok(()),
        }
    }

    /// Runs one top-level action to completion.
    fn run(&mut self, first: CascadeTask) -> CascadeReport {
        self.queue.publish_task(first);
        while let Some(task) = self.queue.next_task() {
            self.process(task);
        }
        let report = self.queue.finish();
        trace!("Action finished: {report:?}");
        report
    }

    fn process(&mut self, task: CascadeTask) {
        match task {
            CascadeTask::Place { target, normal } => self.place_step(target, normal),
            CascadeTask::Detonate { target } => self.detonate_step(target),
            CascadeTask::Settle { target } => self.settle_step(target),
            CascadeTask::CoverGrass { target } => self.cover_grass_step(target),
            CascadeTask::Blow { id, center, damage } => self.blow_step(id, center, damage),
            CascadeTask::Propagate {
                origin,
                check_self,
                sides,
            } => self.propagate_step(origin, check_self, sides),
            CascadeTask::Neighbor { origin, side } => self.neighbor_step(origin, side),
            CascadeTask::Fall { id } => self.fall_step(id),
            CascadeTask::Decay { id, into } => self.decay_step(id, into),
        }
    }

    /// Removes a voxel, its renderable, and plays `clip`.
    fn destroy(&mut self, position: Point3<i32>, clip: &str) -> Option<Voxel> {
        let voxel = self.state.world.remove(position)?;
        if let Some(handle) = voxel.renderable {
            self.frontend.destroy_renderable(handle);
        }
        self.frontend.play_sound(clip);
        Some(voxel)
    }

    fn place_step(&mut self, target: Point3<i32>, normal: Vector3<i32>) {
        if self.state.world.is_occupied(target) {
            trace!("{target:?} is occupied, nothing placed");
            return;
        }

        let mut follow_ups = Vec::new();
        let hand = &mut self.state.hand;
        if hand.previous() == PLACE_TOOL && hand.current() != PLACE_TOOL {
            hand.commit();
            let radius = self
                .state
                .registry
                .get(PLACE_TOOL)
                .and_then(|tool| tool.default_params.number(RADIUS));
            if let Some(radius) = radius {
                follow_ups.extend(
                    self.state
                        .world
                        .neighbors_in_radius(target, radius)
                        .map(|voxel| CascadeTask::Place {
                            target: voxel.position() + normal,
                            normal,
                        }),
                );
            }
        }
        follow_ups.push(CascadeTask::Detonate { target });
        self.queue.publish_all(follow_ups);
    }

    fn detonate_step(&mut self, target: Point3<i32>) {
        let Some(tool) = self.state.registry.get(self.state.hand.current()) else {
            warn!("Held tool {} is not registered", self.state.hand.current());
            return;
        };

        let mut follow_ups = Vec::new();
        if tool.has_tag(BlockTag::Explosive) {
            let params = &tool.default_params;
            if let (Some(radius), Some(damage)) = (params.number(RADIUS), params.number(DAMAGE)) {
                debug!("{} detonates at {target:?}", tool.name);
                follow_ups.extend(
                    self.state
                        .world
                        .neighbors_in_radius(target, radius)
                        .map(|voxel| CascadeTask::Blow {
                            id: voxel.id(),
                            center: target,
                            damage,
                        }),
                );
            }
        }
        follow_ups.push(CascadeTask::Settle { target });
        self.queue.publish_all(follow_ups);
    }

    fn settle_step(&mut self, target: Point3<i32>) {
        self.state.hand.commit();
        let Some(tool) = self.state.registry.get(self.state.hand.current()) else {
            return;
        };
        if tool.has_tag(BlockTag::Implacable) {
            trace!("{} is implacable, nothing placed", tool.name);
            return;
        }
        if self.state.world.is_occupied(target) {
            trace!("{target:?} was filled by this action, nothing placed");
            return;
        }

        let voxel = Voxel::new(target, tool);
        let id = voxel.id();
        let covers_grass = tool.name == DIRT;
        if let Err(err) = self.state.world.insert(voxel) {
            warn!("Placement into {target:?} failed: {err}");
            return;
        }
        self.state.attach_renderable(target, &mut *self.frontend);
        self.frontend.play_sound(&self.state.settings.sounds.place);

        let mut follow_ups = vec![CascadeTask::Propagate {
            origin: target,
            check_self: Some(id),
            sides: BlockSides::ALL,
        }];
        if covers_grass {
            follow_ups.push(CascadeTask::CoverGrass { target });
        }
        self.queue.publish_all(follow_ups);
    }

    fn cover_grass_step(&mut self, target: Point3<i32>) {
        let decays: Vec<_> = self
            .state
            .world
            .neighbors_in_radius(target, 1.0)
            .filter(|voxel| voxel.is(GRASS))
            .map(|voxel| CascadeTask::Decay {
                id: voxel.id(),
                into: None,
            })
            .collect();
        self.queue.publish_all(decays);
    }

    fn blow_step(&mut self, id: VoxelId, center: Point3<i32>, damage: f64) {
        let Some(position) = self.state.world.locate(id) else {
            trace!("Blast target {id:?} is already gone");
            return;
        };
        let Some(voxel) = self.state.world.get(position) else {
            return;
        };
        if voxel.has_tag(BlockTag::Unbreakable) || voxel.has_tag(BlockTag::TntResistant) {
            trace!("{} at {position:?} withstands the blast", voxel.block_type);
            return;
        }
        let resistance = voxel.params.number(TNT_RESISTANCE).unwrap_or(0.0);
        if blast_toughness(distance(position, center), resistance) >= damage {
            trace!("{} at {position:?} survives the blast", voxel.block_type);
            return;
        }

        let clip = self.state.settings.sounds.blast.clone();
        self.destroy(position, &clip);
        self.queue.publish_task(CascadeTask::Propagate {
            origin: position,
            check_self: None,
            sides: BlockSides::ALL,
        });
    }

    fn propagate_step(
        &mut self,
        origin: Point3<i32>,
        check_self: Option<VoxelId>,
        sides: BlockSides,
    ) {
        let mut follow_ups: Vec<_> = sides
            .iter()
            .map(|side| CascadeTask::Neighbor { origin, side })
            .collect();
        if let Some(id) = check_self {
            follow_ups.push(CascadeTask::Fall { id });
        }
        self.queue.publish_all(follow_ups);
    }

    fn neighbor_step(&mut self, origin: Point3<i32>, side: BlockSide) {
        let Some(neighbor) = self.state.world.get(side.neighbor_of(origin)) else {
            return;
        };
        let id = neighbor.id();
        let falls = neighbor.has_tag(BlockTag::GravityAffected);
        let decays = side == BlockSide::BOTTOM && neighbor.has_tag(BlockTag::Decayable);

        // The decay runs once the whole fall cascade has settled.
        if decays {
            self.queue.publish_task(CascadeTask::Decay { id, into: None });
        }
        if falls {
            self.fall_step(id);
        }
    }

    fn fall_step(&mut self, id: VoxelId) {
        let Some(start) = self.state.world.locate(id) else {
            return;
        };
        if !self
            .state
            .world
            .get(start)
            .is_some_and(|voxel| voxel.has_tag(BlockTag::GravityAffected))
        {
            return;
        }

        let floor = self.state.bounds.half_size() - 1.0;
        let center = Point3::new(0, 0, 0);
        let mut end = start;
        while let Some(y) = end.y.checked_sub(1) {
            let below = Point3::new(end.x, y, end.z);
            if self.state.world.is_occupied(below) || distance(end, center) >= floor {
                break;
            }
            end = below;
        }
        if end == start {
            return;
        }

        if let Err(err) = self.state.world.reposition(start, end) {
            warn!("Fall from {start:?} to {end:?} failed: {err}");
            return;
        }
        if let Some(handle) = self.state.world.get(end).and_then(|voxel| voxel.renderable) {
            self.frontend.move_renderable(handle, end);
        }
        trace!("Voxel fell from {start:?} to {end:?}");

        let above = BlockSide::TOP.neighbor_of(start);
        let mut follow_ups = Vec::new();
        if let Some(top) = self.state.world.get(above) {
            follow_ups.push(CascadeTask::Propagate {
                origin: above,
                check_self: Some(top.id()),
                sides: BlockSides::ALL,
            });
        }
        follow_ups.push(CascadeTask::Propagate {
            origin: end,
            check_self: None,
            sides: BlockSides::BOTTOM,
        });
        self.queue.publish_all(follow_ups);
    }

    fn decay_step(&mut self, id: VoxelId, into: Option<String>) {
        let Some(position) = self.state.world.locate(id) else {
            trace!("Decay target {id:?} is already gone");
            return;
        };
        let Some(voxel) = self.state.world.get(position) else {
            return;
        };
        let Some(target) = into.or_else(|| voxel.params.text(DECAY_INTO).map(str::to_string))
        else {
            trace!("{} at {position:?} has nothing to decay into", voxel.block_type);
            return;
        };
        let Some(block_type) = self.state.registry.get(&target) else {
            warn!("{} at {position:?} decays into unknown type {target:?}", voxel.block_type);
            return;
        };
        if !self.queue.mark_decayed(position) {
            trace!("{position:?} already decayed in this action");
            return;
        }

        let replacement = Voxel::new(position, block_type);
        if let Some(old) = self.state.world.remove(position) {
            trace!("{} at {position:?} decays into {target}", old.block_type);
            if let Some(handle) = old.renderable {
                self.frontend.destroy_renderable(handle);
            }
        }
        if let Err(err) = self.state.world.insert(replacement) {
            warn!("Decay at {position:?} failed: {err}");
            return;
        }
        self.state.attach_renderable(position, &mut *self.frontend);

        self.queue.publish_task(CascadeTask::Propagate {
            origin: position,
            check_self: None,
            sides: BlockSides::ALL,
        });
    }
}
