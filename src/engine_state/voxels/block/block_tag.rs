//! # Block Tag Module
//!
//! This module defines the behavior markers a voxel can carry, and the compact set
//! type that stores them.
//!
//! Tags are a closed enumeration: every tag the rule engine reacts to is listed here,
//! so behavior checks are exhaustive. Anything type-specific and open-ended belongs in
//! the block parameters instead.

use std::fmt;

use bitvec::order::Lsb0;
use bitvec::view::BitView;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// A behavior marker attached to a block type or voxel.
///
/// The discriminant is the bit index inside a [`TagSet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockTag {
    /// Immune to breaking and to blasts.
    Unbreakable = 0,

    /// Immune to blasts only.
    TntResistant = 1,

    /// Falls while the cell below it is empty.
    GravityAffected = 2,

    /// Converts into its `decay_into` type when the block above it is disturbed.
    Decayable = 3,

    /// Detonates when used as a tool.
    Explosive = 4,

    /// Using this tool consumes the action without placing a block.
    Implacable = 5,

    /// Construction directive: the listed tags replace the type defaults instead of
    /// extending them. Never stored on a voxel.
    Overwrite = 6,
}

/// Number of distinct tags; the bit width of a [`TagSet`].
pub const TAG_COUNT: usize = 7;

/// Lookup from configuration names to tags.
static TAG_NAMES: phf::Map<&'static str, BlockTag> = phf::phf_map! {
    "unbreakable" => BlockTag::Unbreakable,
    "tnt-resistant" => BlockTag::TntResistant,
    "gravity_affected" => BlockTag::GravityAffected,
    "decayable" => BlockTag::Decayable,
    "explosive" => BlockTag::Explosive,
    "implacable" => BlockTag::Implacable,
    "overwrite" => BlockTag::Overwrite,
};

impl BlockTag {
    /// Looks up a tag by the name used in configuration files.
    ///
    /// ```
    /// use voxel_rules::engine_state::voxels::block::block_tag::BlockTag;
    /// assert_eq!(BlockTag::from_name("tnt-resistant"), Some(BlockTag::TntResistant));
    /// assert_eq!(BlockTag::from_name("sticky"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        TAG_NAMES.get(name).copied()
    }

    /// The configuration name of this tag.
    pub fn name(self) -> &'static str {
        match self {
            BlockTag::Unbreakable => "unbreakable",
            BlockTag::TntResistant => "tnt-resistant",
            BlockTag::GravityAffected => "gravity_affected",
            BlockTag::Decayable => "decayable",
            BlockTag::Explosive => "explosive",
            BlockTag::Implacable => "implacable",
            BlockTag::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`BlockTag`]s stored as a bitset, one bit per tag.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagSet {
    bits: u8,
}

impl TagSet {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `tag` is in the set.
    pub fn contains(&self, tag: BlockTag) -> bool {
        self.bits.view_bits::<Lsb0>()[tag as usize]
    }

    /// Adds `tag` to the set.
    pub fn insert(&mut self, tag: BlockTag) {
        self.bits.view_bits_mut::<Lsb0>().set(tag as usize, true);
    }

    /// Removes `tag` from the set.
    pub fn remove(&mut self, tag: BlockTag) {
        self.bits.view_bits_mut::<Lsb0>().set(tag as usize, false);
    }

    /// Adds every tag of `other` to this set.
    pub fn extend_from(&mut self, other: &TagSet) {
        for tag in other.iter() {
            self.insert(tag);
        }
    }

    /// Returns whether the set has no tags.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterates the tags in bit order.
    pub fn iter(&self) -> impl Iterator<Item = BlockTag> + '_ {
        self.bits
            .view_bits::<Lsb0>()
            .iter_ones()
            .filter_map(BlockTag::from_usize)
    }
}

impl FromIterator<BlockTag> for TagSet {
    fn from_iter<I: IntoIterator<Item = BlockTag>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_tag_round_trips_through_its_name() {
        for index in 0..TAG_COUNT {
            let tag = BlockTag::from_usize(index).expect("tag index in range");
            assert_eq!(BlockTag::from_name(tag.name()), Some(tag));
        }
        assert_eq!(BlockTag::from_usize(TAG_COUNT), None);
    }

    #[test]
    fn tag_set_membership() {
        let mut set: TagSet = [BlockTag::Decayable, BlockTag::GravityAffected]
            .into_iter()
            .collect();
        assert!(set.contains(BlockTag::Decayable));
        assert!(!set.contains(BlockTag::Unbreakable));

        set.remove(BlockTag::Decayable);
        set.insert(BlockTag::Unbreakable);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![BlockTag::Unbreakable, BlockTag::GravityAffected]
        );
        assert!(!set.is_empty());
        assert!(TagSet::new().is_empty());
    }

    #[test]
    fn extend_is_a_union() {
        let mut a: TagSet = [BlockTag::Explosive].into_iter().collect();
        let b: TagSet = [BlockTag::Explosive, BlockTag::Implacable]
            .into_iter()
            .collect();
        a.extend_from(&b);
        assert_eq!(a, b);
    }
}
