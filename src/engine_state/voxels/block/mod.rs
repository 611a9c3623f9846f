//! # Block Module
//!
//! This module provides the block catalog types: what a named block type looks like,
//! which behavior tags it carries by default and which parameters configure it.
//!
//! * `block_side` - the six faces of a block, used as neighbor directions and normals
//! * `block_tag` - the closed set of behavior tags and their bitset
//! * `registry` - the name-indexed catalog of block types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use block_tag::TagSet;

pub mod block_side;
pub mod block_tag;
pub mod registry;

/// Parameter key naming the type a decayable block turns into.
pub const DECAY_INTO: &str = "decay_into";
/// Parameter key for the area of effect of a tool, in blocks.
pub const RADIUS: &str = "radius";
/// Parameter key for the blast strength of an explosive tool.
pub const DAMAGE: &str = "damage";
/// Parameter key for a block's intrinsic blast resistance.
pub const TNT_RESISTANCE: &str = "tnt_resistance";

/// A single block parameter value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A numeric parameter such as `radius` or `damage`.
    Number(f64),
    /// A textual parameter such as `decay_into`.
    Text(String),
}

/// Open mapping of type-specific parameters.
///
/// Merging is key-wise: values from the overriding side replace values with the same
/// key and leave other keys untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockParams(HashMap<String, ParamValue>);

impl BlockParams {
    /// An empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, mostly for catalogs written in code.
    pub fn with(mut self, key: &str, value: ParamValue) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    /// Returns the raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Returns `key` if it holds a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(ParamValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Returns `key` if it holds text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(ParamValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns a copy of `self` with every entry of `overrides` applied on top.
    pub fn merged_with(&self, overrides: &BlockParams) -> BlockParams {
        let mut merged = self.clone();
        for (key, value) in &overrides.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }
}

/// Where a block type's visuals come from. Only the frontend interprets these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Model name or path.
    pub model: String,
    /// Texture path, or built-in texture name when `preloaded` is set.
    pub texture: String,
    /// When set, `texture` names a texture the frontend already has and nothing is loaded.
    #[serde(default)]
    pub preloaded: bool,
}

/// Model used when a block type does not name one.
pub const DEFAULT_MODEL: &str = "assets/block";

/// A named catalog entry defining a voxel's rendering and default behavior.
///
/// Block types are immutable once registered; voxels copy what they need from them
/// when they are constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockType {
    /// Unique name, also the tool name when the type is held.
    pub name: String,
    /// Rendering asset reference.
    pub asset: AssetRef,
    /// Name of the key that selects this type as the held tool.
    pub key: Option<String>,
    /// Tags every voxel of this type starts with.
    pub default_tags: TagSet,
    /// Parameters every voxel of this type starts with.
    pub default_params: BlockParams,
}

impl BlockType {
    /// Returns whether the type carries `tag` by default.
    pub fn has_tag(&self, tag: block_tag::BlockTag) -> bool {
        self.default_tags.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overrides_win_on_collision() {
        let defaults = BlockParams::new()
            .with(RADIUS, ParamValue::Number(10.0))
            .with(DAMAGE, ParamValue::Number(1.0));
        let overrides = BlockParams::new()
            .with(DAMAGE, ParamValue::Number(3.0))
            .with(DECAY_INTO, ParamValue::Text("dirt".into()));
        let merged = defaults.merged_with(&overrides);
        assert_eq!(merged.number(RADIUS), Some(10.0));
        assert_eq!(merged.number(DAMAGE), Some(3.0));
        assert_eq!(merged.text(DECAY_INTO), Some("dirt"));
        assert_eq!(merged.text(RADIUS), None);
    }

    #[test]
    fn params_deserialize_from_plain_json() {
        let params: BlockParams =
            serde_json::from_str(r#"{"decay_into": "dirt", "tnt_resistance": 0.8}"#)
                .expect("valid params");
        assert_eq!(params.text(DECAY_INTO), Some("dirt"));
        assert_eq!(params.number(TNT_RESISTANCE), Some(0.8));
    }
}
