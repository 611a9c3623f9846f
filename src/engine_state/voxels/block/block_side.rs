//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel block, used both as
//! neighbor directions for cascade checks and as placement normals.

use cgmath::{Point3, Vector3};

/// Represents the six possible faces of a voxel block.
///
/// Each variant corresponds to a specific face and is assigned a unique integer value,
/// which is also its bit in a [`BlockSides`] set.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The top face (facing positive Y)
    TOP = 0,

    /// The left face (facing negative X)
    LEFT = 1,

    /// The right face (facing positive X)
    RIGHT = 2,

    /// The bottom face (facing negative Y)
    BOTTOM = 3,

    /// The front face (facing positive Z)
    FRONT = 4,

    /// The back face (facing negative Z)
    BACK = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in neighbor-check order.
    ///
    /// The order is: [TOP, LEFT, RIGHT, BOTTOM, FRONT, BACK]. Cascades visit neighbors
    /// in exactly this order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
            BlockSide::BOTTOM,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// The unit offset from a block to its neighbor across this face.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
        }
    }

    /// The position of the neighbor of `position` across this face.
    pub fn neighbor_of(self, position: Point3<i32>) -> Point3<i32> {
        position + self.offset()
    }

    /// Converts a face normal reported by a hit-test back into a side.
    ///
    /// Returns `None` for anything that is not one of the six unit axis vectors.
    pub fn from_normal(normal: Vector3<i32>) -> Option<BlockSide> {
        BlockSide::all()
            .into_iter()
            .find(|side| side.offset() == normal)
    }
}

/// A subset of the six sides, used to restrict which neighbors a cascade examines.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub struct BlockSides(u8);

impl BlockSides {
    /// All six sides.
    pub const ALL: BlockSides = BlockSides(0b11_1111);

    /// Only the side below.
    pub const BOTTOM: BlockSides = BlockSides(1 << BlockSide::BOTTOM as u8);

    /// Returns whether `side` is part of the set.
    pub fn contains(self, side: BlockSide) -> bool {
        self.0 & (1 << side as u8) != 0
    }

    /// Iterates the member sides in neighbor-check order.
    pub fn iter(self) -> impl Iterator<Item = BlockSide> {
        BlockSide::all()
            .into_iter()
            .filter(move |&side| self.contains(side))
    }
}

impl FromIterator<BlockSide> for BlockSides {
    fn from_iter<I: IntoIterator<Item = BlockSide>>(iter: I) -> Self {
        BlockSides(iter.into_iter().fold(0, |bits, side| bits | 1 << side as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn offsets_are_unit_and_distinct() {
        let offsets: Vec<_> = BlockSide::all().iter().map(|s| s.offset()).collect();
        for (i, a) in offsets.iter().enumerate() {
            assert_eq!(a.x.abs() + a.y.abs() + a.z.abs(), 1);
            for b in &offsets[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn normal_round_trip() {
        for side in BlockSide::all() {
            assert_eq!(BlockSide::from_normal(side.offset()), Some(side));
        }
        assert_eq!(BlockSide::from_normal(Vector3::new(1, 1, 0)), None);
    }

    #[test]
    fn side_sets() {
        assert_eq!(BlockSides::ALL.iter().count(), 6);
        assert_eq!(BlockSides::BOTTOM.iter().collect::<Vec<_>>(), vec![BlockSide::BOTTOM]);
        let pair: BlockSides = [BlockSide::FRONT, BlockSide::TOP].into_iter().collect();
        assert_eq!(pair.iter().collect::<Vec<_>>(), vec![BlockSide::TOP, BlockSide::FRONT]);
        assert!(!pair.contains(BlockSide::LEFT));
    }
}
