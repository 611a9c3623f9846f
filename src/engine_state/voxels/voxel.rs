//! # Voxel Module
//!
//! One placed block instance. Voxels are only ever owned by the [`World`] grid; once a
//! voxel is removed from the grid it no longer exists.
//!
//! [`World`]: super::world::World

use std::sync::atomic::{AtomicU64, Ordering};

use cgmath::Point3;

use super::block::block_tag::{BlockTag, TagSet};
use super::block::{BlockParams, BlockType};
use crate::application_state::frontend::RenderableHandle;

/// Process-unique identity of a voxel instance.
///
/// Replacing a voxel (decay) produces a new id at the same position, which lets
/// scheduled cascade work notice that its target is gone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelId(u64);

impl VoxelId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        VoxelId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Tag overrides supplied when constructing a voxel.
///
/// If the list contains [`BlockTag::Overwrite`], it replaces the type's default tags
/// (minus the `Overwrite` marker itself); otherwise it is added to them.
pub type TagOverrides<'a> = &'a [BlockTag];

/// A single placed block.
#[derive(Clone, Debug)]
pub struct Voxel {
    id: VoxelId,
    position: Point3<i32>,
    /// Name of the block type this voxel was built from.
    pub block_type: String,
    /// Resolved behavior tags.
    pub tags: TagSet,
    /// Resolved parameters (type defaults merged with overrides).
    pub params: BlockParams,
    /// Brightness multiplier for rendering, in `[0.9, 1.0)`.
    pub shade: f32,
    /// The frontend's handle for this voxel's visual, once created.
    pub renderable: Option<RenderableHandle>,
}

impl Voxel {
    /// Creates a voxel of `block_type` with its default tags and parameters.
    pub fn new(position: Point3<i32>, block_type: &BlockType) -> Self {
        Self::with_overrides(position, block_type, &[], &BlockParams::new())
    }

    /// Creates a voxel, resolving tags and parameters against the type defaults.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Spawn marker: stone that is unbreakable and nothing else.
    /// let voxel = Voxel::with_overrides(
    ///     spawn,
    ///     stone,
    ///     &[BlockTag::Unbreakable, BlockTag::Overwrite],
    ///     &BlockParams::new(),
    /// );
    /// ```
    pub fn with_overrides(
        position: Point3<i32>,
        block_type: &BlockType,
        tag_overrides: TagOverrides<'_>,
        param_overrides: &BlockParams,
    ) -> Self {
        let tags = if tag_overrides.contains(&BlockTag::Overwrite) {
            let mut tags: TagSet = tag_overrides.iter().copied().collect();
            tags.remove(BlockTag::Overwrite);
            tags
        } else {
            let mut tags = block_type.default_tags;
            tags.extend_from(&tag_overrides.iter().copied().collect::<TagSet>());
            tags.remove(BlockTag::Overwrite);
            tags
        };

        Voxel {
            id: VoxelId::next(),
            position,
            block_type: block_type.name.clone(),
            tags,
            params: block_type.default_params.merged_with(param_overrides),
            shade: 0.9 + fastrand::f32() * 0.1,
            renderable: None,
        }
    }

    /// This voxel's identity.
    pub fn id(&self) -> VoxelId {
        self.id
    }

    /// The grid position. Only the grid may change it, see
    /// [`World::reposition`](super::world::World::reposition).
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    pub(super) fn set_position(&mut self, position: Point3<i32>) {
        self.position = position;
    }

    /// Shorthand for `self.tags.contains(tag)`.
    pub fn has_tag(&self, tag: BlockTag) -> bool {
        self.tags.contains(tag)
    }

    /// Whether this voxel is of the named type.
    pub fn is(&self, block_type: &str) -> bool {
        self.block_type == block_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{AssetRef, ParamValue, DECAY_INTO, TNT_RESISTANCE};
    use pretty_assertions::assert_eq;

    fn grass() -> BlockType {
        BlockType {
            name: "grass".into(),
            asset: AssetRef {
                model: "assets/block".into(),
                texture: "assets/grass_block.png".into(),
                preloaded: false,
            },
            key: Some("1".into()),
            default_tags: [BlockTag::Decayable, BlockTag::GravityAffected]
                .into_iter()
                .collect(),
            default_params: BlockParams::new()
                .with(DECAY_INTO, ParamValue::Text("dirt".into())),
        }
    }

    #[test]
    fn defaults_are_copied() {
        let v = Voxel::new(Point3::new(1, 2, 3), &grass());
        assert_eq!(v.position(), Point3::new(1, 2, 3));
        assert!(v.is("grass"));
        assert!(v.has_tag(BlockTag::Decayable));
        assert_eq!(v.params.text(DECAY_INTO), Some("dirt"));
        assert!((0.9..1.0).contains(&v.shade));
    }

    #[test]
    fn overrides_extend_tags_and_replace_params() {
        let v = Voxel::with_overrides(
            Point3::new(0, 0, 0),
            &grass(),
            &[BlockTag::Unbreakable],
            &BlockParams::new().with(TNT_RESISTANCE, ParamValue::Number(2.0)),
        );
        assert_eq!(
            v.tags.iter().collect::<Vec<_>>(),
            vec![
                BlockTag::Unbreakable,
                BlockTag::GravityAffected,
                BlockTag::Decayable
            ]
        );
        assert_eq!(v.params.number(TNT_RESISTANCE), Some(2.0));
        assert_eq!(v.params.text(DECAY_INTO), Some("dirt"));
    }

    #[test]
    fn overwrite_replaces_default_tags() {
        let v = Voxel::with_overrides(
            Point3::new(0, 0, 0),
            &grass(),
            &[BlockTag::Unbreakable, BlockTag::Overwrite],
            &BlockParams::new(),
        );
        assert_eq!(v.tags.iter().collect::<Vec<_>>(), vec![BlockTag::Unbreakable]);
    }

    #[test]
    fn every_voxel_gets_a_fresh_id() {
        let a = Voxel::new(Point3::new(0, 0, 0), &grass());
        let b = Voxel::new(Point3::new(0, 0, 0), &grass());
        assert_ne!(a.id(), b.id());
    }
}
