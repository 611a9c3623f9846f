//! # Configuration
//!
//! The world description: bounds, block catalog, sound clips and engine limits. A
//! configuration is plain JSON deserialized with `serde`; [`WorldConfig::default`]
//! describes the stock world with nine block types bound to the keys `1` to `9`.
//!
//! Validation happens when the configuration is turned into engine values
//! ([`WorldConfig::bounds`], [`WorldConfig::registry`]), so a config that parses can
//! still be rejected with a [`ConfigError`].

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::block_tag::{BlockTag, TagSet};
use crate::engine_state::voxels::block::registry::BlockTypeRegistry;
use crate::engine_state::voxels::block::{
    AssetRef, BlockParams, BlockType, ParamValue, DAMAGE, DECAY_INTO, DEFAULT_MODEL, RADIUS,
    TNT_RESISTANCE,
};
use crate::engine_state::voxels::bounds::WorldBounds;
use crate::error::ConfigError;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "VOXEL_CONFIG";

/// Default upper bound on cascade steps within one player action.
pub const DEFAULT_CASCADE_STEP_LIMIT: usize = 100_000;

const PUNCH_SOUND: &str = "assets/punch_sound";

/// Complete world configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// World geometry.
    pub bounds: BoundsConfig,
    /// The block catalog, in key-priority order.
    pub blocks: Vec<BlockTypeConfig>,
    /// Sound clips.
    #[serde(default)]
    pub sounds: SoundConfig,
    /// Block type held when the game starts.
    pub starting_tool: String,
    /// Cascade steps one player action may take before the rest is dropped.
    #[serde(default = "default_cascade_step_limit")]
    pub cascade_step_limit: usize,
}

fn default_cascade_step_limit() -> usize {
    DEFAULT_CASCADE_STEP_LIMIT
}

/// Raw world geometry, as numbers. Integrality is checked by [`WorldBounds`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundsConfig {
    /// Player start.
    pub spawn: [f64; 3],
    /// High corner of the generated cuboid.
    pub origin: [f64; 3],
    /// Low corner of the generated cuboid.
    pub end: [f64; 3],
    /// World size; the player is returned to spawn beyond half of it.
    pub world_radius: f64,
}

/// One block type as written in a configuration file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockTypeConfig {
    /// Unique type name.
    pub name: String,
    /// Texture file, or built-in texture name when `preloaded`.
    pub texture: String,
    /// Whether `texture` is a built-in texture.
    #[serde(default)]
    pub preloaded: bool,
    /// Model; [`DEFAULT_MODEL`] when absent.
    #[serde(default)]
    pub model: Option<String>,
    /// Selection key.
    #[serde(default)]
    pub key: Option<String>,
    /// Tag names.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Default parameters.
    #[serde(default)]
    pub params: BlockParams,
}

impl BlockTypeConfig {
    fn new(name: &str, texture: &str, key: &str) -> Self {
        BlockTypeConfig {
            name: name.to_string(),
            texture: texture.to_string(),
            preloaded: false,
            model: None,
            key: Some(key.to_string()),
            tags: Vec::new(),
            params: BlockParams::new(),
        }
    }

    fn preloaded(mut self) -> Self {
        self.preloaded = true;
        self
    }

    fn tags(mut self, tags: &[BlockTag]) -> Self {
        self.tags = tags.iter().map(|tag| tag.name().to_string()).collect();
        self
    }

    fn param(mut self, key: &str, value: ParamValue) -> Self {
        self.params = self.params.with(key, value);
        self
    }

    /// Resolves tag names and fills in defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownTag`] for a tag name with no meaning.
    pub fn to_block_type(&self) -> Result<BlockType, ConfigError> {
        let default_tags = self
            .tags
            .iter()
            .map(|name| {
                BlockTag::from_name(name).ok_or_else(|| ConfigError::UnknownTag {
                    block: self.name.clone(),
                    tag: name.clone(),
                })
            })
            .collect::<Result<TagSet, _>>()?;

        Ok(BlockType {
            name: self.name.clone(),
            asset: AssetRef {
                model: self
                    .model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                texture: self.texture.clone(),
                preloaded: self.preloaded,
            },
            key: self.key.clone(),
            default_tags,
            default_params: self.params.clone(),
        })
    }
}

/// Sound clip names for the three kinds of grid change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Played when a block is placed.
    pub place: String,
    /// Played when a block is broken by hand.
    #[serde(rename = "break")]
    pub break_block: String,
    /// Played for every block a blast destroys.
    pub blast: String,
}

impl Default for SoundConfig {
    fn default() -> Self {
        SoundConfig {
            place: PUNCH_SOUND.to_string(),
            break_block: PUNCH_SOUND.to_string(),
            blast: PUNCH_SOUND.to_string(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        use BlockTag::*;

        WorldConfig {
            bounds: BoundsConfig {
                spawn: [0.0, 0.0, 0.0],
                origin: [20.0, 0.0, 20.0],
                end: [-20.0, -2.0, -20.0],
                world_radius: 150.0,
            },
            blocks: vec![
                BlockTypeConfig::new("grass", "assets/grass_block.png", "1")
                    .tags(&[Decayable, GravityAffected])
                    .param(DECAY_INTO, ParamValue::Text("dirt".into())),
                BlockTypeConfig::new("stone", "assets/stone_block.png", "2")
                    .tags(&[GravityAffected]),
                BlockTypeConfig::new("brick", "assets/brick_block.png", "3"),
                BlockTypeConfig::new("dirt", "assets/dirt_block.png", "4")
                    .tags(&[GravityAffected]),
                BlockTypeConfig::new("tnt", "white_cube", "5")
                    .preloaded()
                    .tags(&[Implacable, Explosive])
                    .param(RADIUS, ParamValue::Number(10.0))
                    .param(DAMAGE, ParamValue::Number(1.0)),
                BlockTypeConfig::new("place", "brick", "6")
                    .preloaded()
                    .param(RADIUS, ParamValue::Number(7.0)),
                BlockTypeConfig::new("noise", "noise", "7")
                    .preloaded()
                    .tags(&[Explosive, Unbreakable])
                    .param(RADIUS, ParamValue::Number(10.0))
                    .param(DAMAGE, ParamValue::Number(1.0)),
                BlockTypeConfig::new("nontnt", "grass", "8")
                    .preloaded()
                    .param(TNT_RESISTANCE, ParamValue::Number(0.8)),
                BlockTypeConfig {
                    model: Some("cube".to_string()),
                    ..BlockTypeConfig::new("glass", "assets/border.png", "9")
                },
            ],
            sounds: SoundConfig::default(),
            starting_tool: "tnt".to_string(),
            cascade_step_limit: DEFAULT_CASCADE_STEP_LIMIT,
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, [`ConfigError::Parse`] when it
    /// is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    /// Validates and returns the world geometry.
    pub fn bounds(&self) -> Result<WorldBounds, ConfigError> {
        let b = &self.bounds;
        Ok(WorldBounds::from_coordinates(
            b.spawn,
            b.origin,
            b.end,
            b.world_radius,
        )?)
    }

    /// Builds and validates the block catalog. No tool may reach past the world radius.
    pub fn registry(&self) -> Result<BlockTypeRegistry, ConfigError> {
        let types = self
            .blocks
            .iter()
            .map(BlockTypeConfig::to_block_type)
            .collect::<Result<Vec<_>, _>>()?;
        let registry = BlockTypeRegistry::from_types(types)?;
        registry.check_reach(self.bounds.world_radius)?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_valid() {
        let config = WorldConfig::default();
        let registry = config.registry().expect("valid catalog");
        assert_eq!(registry.len(), 9);
        assert!(registry.contains(&config.starting_tool));

        let tnt = registry.get("tnt").expect("tnt registered");
        assert!(tnt.has_tag(BlockTag::Explosive));
        assert!(tnt.has_tag(BlockTag::Implacable));
        assert!(tnt.asset.preloaded);
        assert_eq!(registry.get("glass").map(|t| t.asset.model.as_str()), Some("cube"));
        assert_eq!(
            registry.get("brick").map(|t| t.asset.model.as_str()),
            Some(DEFAULT_MODEL)
        );

        let keys: Vec<_> = registry.iter().filter_map(|t| t.key.as_deref()).collect();
        assert_eq!(keys, ["1", "2", "3", "4", "5", "6", "7", "8", "9"]);

        config.bounds().expect("valid bounds");
    }

    #[test]
    fn minimal_json_uses_defaults() {
        let config = WorldConfig::from_json(
            r#"{
                "bounds": {
                    "spawn": [0, 0, 0],
                    "origin": [2, 0, 2],
                    "end": [-2, -1, -2],
                    "world_radius": 20
                },
                "blocks": [
                    {"name": "stone", "texture": "stone", "preloaded": true,
                     "tags": ["gravity_affected"]}
                ],
                "starting_tool": "stone"
            }"#,
        )
        .expect("valid json");
        assert_eq!(config.cascade_step_limit, DEFAULT_CASCADE_STEP_LIMIT);
        assert_eq!(config.sounds, SoundConfig::default());
        let stone = config.blocks[0].to_block_type().expect("known tags");
        assert_eq!(stone.asset.model, DEFAULT_MODEL);
        assert!(stone.has_tag(BlockTag::GravityAffected));
        assert_eq!(stone.key, None);
    }

    #[test]
    fn unknown_tags_are_rejected() {
        let mut config = WorldConfig::default();
        config.blocks[2].tags.push("sticky".into());
        let err = config.registry().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTag { ref tag, .. } if tag == "sticky"));
    }

    #[test]
    fn fractional_bounds_are_rejected() {
        let mut config = WorldConfig::default();
        config.bounds.origin[1] = 0.5;
        assert!(matches!(config.bounds(), Err(ConfigError::Bounds(_))));
    }

    #[test]
    fn tool_radius_is_capped_by_the_world() {
        let mut config = WorldConfig::default();
        let tnt = &mut config.blocks[4];
        assert_eq!(tnt.name, "tnt");
        tnt.params = tnt.params.clone().with(RADIUS, ParamValue::Number(3e9));
        let err = config.registry().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { ref block, key: RADIUS, .. } if block == "tnt"
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = WorldConfig::load("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
