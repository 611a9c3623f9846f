//! # Block Type Registry
//!
//! The static catalog mapping a block type name to its asset reference, default tags
//! and default parameters. It is filled once at startup and only read afterwards.

use std::collections::HashMap;

use log::{debug, info};

use super::block_tag::BlockTag;
use super::{BlockType, DAMAGE, DECAY_INTO, RADIUS, TNT_RESISTANCE};
use crate::error::ConfigError;

/// Registry that stores all block types, in registration order.
#[derive(Debug, Default)]
pub struct BlockTypeRegistry {
    /// Registered types, in the order they were added
    types: Vec<BlockType>,
    /// Map from name to index in `types`
    name_to_index: HashMap<String, usize>,
}

impl BlockTypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and validates a registry from a whole catalog.
    ///
    /// # Errors
    /// Fails on duplicate names and on types whose parameters do not support their
    /// tags (see [`validate`](Self::validate)).
    pub fn from_types(types: impl IntoIterator<Item = BlockType>) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for block_type in types {
            registry.register(block_type)?;
        }
        registry.validate()?;
        info!("Registered {} block types", registry.len());
        Ok(registry)
    }

    /// Appends a block type.
    ///
    /// # Errors
    /// [`ConfigError::DuplicateBlockType`] if the name is taken.
    pub fn register(&mut self, block_type: BlockType) -> Result<(), ConfigError> {
        if self.name_to_index.contains_key(&block_type.name) {
            return Err(ConfigError::DuplicateBlockType(block_type.name));
        }
        debug!(
            "Registering block type '{}' with tags {:?}",
            block_type.name, block_type.default_tags
        );
        self.name_to_index
            .insert(block_type.name.clone(), self.types.len());
        self.types.push(block_type);
        Ok(())
    }

    /// Checks cross-references between registered types.
    ///
    /// * every `decayable` type names a registered `decay_into` type;
    /// * every `explosive` type has numeric `radius` and `damage`;
    /// * `radius` is finite and not negative, `damage` and `tnt_resistance` are finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for block_type in &self.types {
            let params = &block_type.default_params;
            for key in [RADIUS, DAMAGE, TNT_RESISTANCE] {
                let Some(value) = params.number(key) else {
                    continue;
                };
                let problem = if !value.is_finite() {
                    Some("not finite")
                } else if key == RADIUS && value < 0.0 {
                    Some("negative")
                } else {
                    None
                };
                if let Some(problem) = problem {
                    return Err(ConfigError::InvalidParameter {
                        block: block_type.name.clone(),
                        key,
                        value,
                        problem,
                    });
                }
            }
            if block_type.has_tag(BlockTag::Decayable) {
                match params.text(DECAY_INTO) {
                    None => {
                        return Err(ConfigError::MissingParameter {
                            block: block_type.name.clone(),
                            tag: BlockTag::Decayable.name(),
                            problem: format!("has no textual {DECAY_INTO} parameter"),
                        })
                    }
                    Some(target) if !self.contains(target) => {
                        return Err(ConfigError::MissingParameter {
                            block: block_type.name.clone(),
                            tag: BlockTag::Decayable.name(),
                            problem: format!("decays into unregistered type {target:?}"),
                        })
                    }
                    Some(_) => {}
                }
            }
            if block_type.has_tag(BlockTag::Explosive) {
                for key in [RADIUS, DAMAGE] {
                    if params.number(key).is_none() {
                        return Err(ConfigError::MissingParameter {
                            block: block_type.name.clone(),
                            tag: BlockTag::Explosive.name(),
                            problem: format!("has no numeric {key} parameter"),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Checks that no block type reaches further than the world is wide.
    ///
    /// # Errors
    /// [`ConfigError::InvalidParameter`] for a `radius` above `world_radius`.
    pub fn check_reach(&self, world_radius: f64) -> Result<(), ConfigError> {
        for block_type in &self.types {
            if let Some(radius) = block_type.default_params.number(RADIUS) {
                if radius > world_radius {
                    return Err(ConfigError::InvalidParameter {
                        block: block_type.name.clone(),
                        key: RADIUS,
                        value: radius,
                        problem: "wider than the world",
                    });
                }
            }
        }
        Ok(())
    }

    /// Looks up a block type by name.
    pub fn get(&self, name: &str) -> Option<&BlockType> {
        self.name_to_index.get(name).map(|&i| &self.types[i])
    }

    /// Returns whether a type with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Iterates all block types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.types.iter()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
