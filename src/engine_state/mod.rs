//! # Engine State Module
//!
//! The core engine module that owns the voxel world and everything the rule engine
//! needs to mutate it.
//!
//! ## Key Components
//!
//! * `EngineState` - The context object owning the catalog, the grid, the bounds and the hand
//! * `hand` - The player's tool selection
//! * `rules` - The rule engine: placing, breaking, blasting, falling and decaying
//! * `task_management` - The worklist that runs rule-engine cascades
//! * `voxels` - Block types, voxels, the grid, bounds and world generation
//!
//! ## Architecture
//!
//! There is no global state. `EngineState` is constructed once from a
//! [`WorldConfig`] and passed by reference; the [`RuleEngine`] borrows it, together
//! with the [`Frontend`], for the duration of one player action.
//!
//! Each frame the application calls [`EngineState::process_input`] to turn clicks into
//! rule-engine actions and then [`EngineState::tick`] for the per-frame upkeep (world
//! edge check, tool keys, HUD).

use std::collections::HashMap;

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};
use log::{debug, info, trace, warn};
use web_time::Instant;

use crate::application_state::frontend::{Frontend, HandPose, HudState, Renderable, TextureRef};
use crate::application_state::input_manager::QUIT_KEY;
use crate::application_state::input_state::{MouseButton, ProcessedInputState};
use crate::config::{SoundConfig, WorldConfig};
use crate::error::ConfigError;
use hand::Hand;
use rules::RuleEngine;
use task_management::CascadeReport;
use voxels::block::registry::BlockTypeRegistry;
use voxels::bounds::WorldBounds;
use voxels::world::World;

pub mod hand;
pub mod rules;
pub mod task_management;
pub mod voxels;

/// Runtime settings taken from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Sound clips for grid changes.
    pub sounds: SoundConfig,
    /// Maximum cascade steps per player action.
    pub cascade_step_limit: usize,
}

/// The main state container for the voxel engine
///
/// # Examples
///
/// ```
/// use voxel_rules::application_state::frontend::RecordingFrontend;
/// use voxel_rules::config::WorldConfig;
/// use voxel_rules::engine_state::EngineState;
/// use voxel_rules::engine_state::voxels::generation::WorldGenerator;
///
/// let mut frontend = RecordingFrontend::new();
/// let mut state = EngineState::new(&WorldConfig::default(), &mut frontend).unwrap();
/// let placed = WorldGenerator::generate(&mut state, &mut frontend).unwrap();
/// assert_eq!(placed, state.world.len());
/// ```
#[derive(Debug)]
pub struct EngineState {
    /// The block catalog
    pub registry: BlockTypeRegistry,
    /// The voxel grid
    pub world: World,
    /// Validated world geometry
    pub bounds: WorldBounds,
    /// Tool selection
    pub hand: Hand,
    /// Runtime settings
    pub settings: EngineSettings,
    /// Texture of each block type, resolved at startup
    textures: HashMap<String, TextureRef>,
    /// When the previous frame was ticked
    last_frame: Instant,
}

impl EngineState {
    /// Creates a new engine state from a configuration.
    ///
    /// Textures of block types that are not preloaded are loaded through the frontend
    /// here, once.
    ///
    /// # Arguments
    ///
    /// * `config` - The world description
    /// * `frontend` - Used to load textures
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`]: invalid bounds, an invalid catalog, or a starting tool that
    /// is not in the catalog.
    pub fn new<F: Frontend + ?Sized>(
        config: &WorldConfig,
        frontend: &mut F,
    ) -> Result<Self, ConfigError> {
        let bounds = config.bounds()?;
        let registry = config.registry()?;
        if !registry.contains(&config.starting_tool) {
            return Err(ConfigError::UnknownBlockType(config.starting_tool.clone()));
        }

        let textures = registry
            .iter()
            .map(|block_type| {
                let texture = if block_type.asset.preloaded {
                    TextureRef::Builtin(block_type.asset.texture.clone())
                } else {
                    TextureRef::Loaded(frontend.load_texture(&block_type.asset.texture))
                };
                (block_type.name.clone(), texture)
            })
            .collect();

        info!(
            "Engine ready: world radius {}, spawn {:?}, holding {}",
            bounds.world_radius(),
            bounds.spawn(),
            config.starting_tool
        );

        Ok(EngineState {
            registry,
            world: World::new(),
            bounds,
            hand: Hand::new(config.starting_tool.clone()),
            settings: EngineSettings {
                sounds: config.sounds.clone(),
                cascade_step_limit: config.cascade_step_limit,
            },
            textures,
            last_frame: Instant::now(),
        })
    }

    /// Borrows the state and a frontend as a rule engine for one or more actions.
    pub fn rules<'a, F: Frontend + ?Sized>(
        &'a mut self,
        frontend: &'a mut F,
    ) -> RuleEngine<'a, F> {
        RuleEngine::new(self, frontend)
    }

    /// The texture a block type is drawn with.
    pub fn texture_of(&self, block_type: &str) -> Option<&TextureRef> {
        self.textures.get(block_type)
    }

    /// Creates the renderable of the voxel at `position` and stores its handle.
    pub(crate) fn attach_renderable<F: Frontend + ?Sized>(
        &mut self,
        position: Point3<i32>,
        frontend: &mut F,
    ) {
        let Some(voxel) = self.world.get(position) else {
            return;
        };
        let Some(block_type) = self.registry.get(&voxel.block_type) else {
            warn!("Voxel at {position:?} has unregistered type {}", voxel.block_type);
            return;
        };
        let texture = self
            .textures
            .get(&block_type.name)
            .cloned()
            .unwrap_or_else(|| TextureRef::Builtin(block_type.asset.texture.clone()));
        let handle = frontend.create_renderable(Renderable {
            position,
            model: block_type.asset.model.clone(),
            texture,
            shade: voxel.shade,
        });
        if let Some(voxel) = self.world.get_mut(position) {
            voxel.renderable = Some(handle);
        }
    }

    /// Turns this frame's clicks into rule-engine actions.
    ///
    /// Right click breaks the facing block, left click places against it and middle
    /// click picks its type. Nothing happens when no block is in view.
    ///
    /// # Returns
    ///
    /// The cascade report of the action taken, if any.
    pub fn process_input<F: Frontend + ?Sized>(
        &mut self,
        input: &ProcessedInputState,
        frontend: &mut F,
    ) -> Option<CascadeReport> {
        let action = Self::translate_processed_input(input, &*frontend);
        let (position, normal) = action.target?;

        let mut rules = self.rules(frontend);
        if action.break_block {
            return Some(rules.break_block(position));
        }
        if action.place_block {
            return Some(rules.place(position, normal));
        }
        if action.pick_block {
            if let Err(err) = rules.pick(position) {
                warn!("Cannot pick block at {position:?}: {err}");
            }
        }
        None
    }

    /// Per-frame upkeep.
    ///
    /// * Returns the player to spawn once they are `world_radius / 2` from the center
    /// * Raises the arm while a primary or secondary button is held
    /// * Selects the first block type whose key is held
    /// * Requests quitting while escape is held
    /// * Refreshes the HUD
    ///
    /// # Returns
    ///
    /// The HUD contents that were shown.
    pub fn tick<F: Frontend + ?Sized>(
        &mut self,
        input: &ProcessedInputState,
        frontend: &mut F,
    ) -> HudState {
        let player = frontend.player_position();
        let coordinates = format!("X:{:.2} Y:{:.2} Z:{:.2}", player.x, player.y, player.z);

        if player.to_vec().magnitude() >= self.bounds.half_size() {
            let spawn = self.bounds.spawn();
            let spawn = Point3::new(
                f64::from(spawn.x),
                f64::from(spawn.y),
                f64::from(spawn.z),
            );
            debug!("Player left the world at {player:?}, returning to spawn");
            frontend.teleport_player(spawn);
        }

        self.hand.pose = if input.get_mouse_button_state(MouseButton::Left).is_active()
            || input.get_mouse_button_state(MouseButton::Right).is_active()
        {
            HandPose::Active
        } else {
            HandPose::Passive
        };

        let selected = self.registry.iter().find(|block_type| {
            block_type
                .key
                .as_deref()
                .is_some_and(|key| input.get_key_state(key).is_active())
        });
        if let Some(block_type) = selected {
            if block_type.name != self.hand.current() {
                debug!("Selected tool {}", block_type.name);
                self.hand.select(block_type.name.clone());
            }
        }

        if input.get_key_state(QUIT_KEY).is_active() {
            frontend.request_quit();
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        let fps = if elapsed > 0.0 { 1.0 / elapsed } else { 0.0 };

        let hud = HudState {
            coordinates,
            fps: format!("{fps:.0} fps"),
            tool: self.hand.current().to_string(),
            hand_pose: self.hand.pose,
        };
        frontend.show_hud(&hud);
        hud
    }

    /// Translates the processed input state into player actions.
    ///
    /// # Arguments
    /// * `input` - The processed input state to translate
    /// * `frontend` - Asked for the block in view
    ///
    /// # Returns
    /// A PlayerAction struct with the appropriate actions set
    fn translate_processed_input<F: Frontend + ?Sized>(
        input: &ProcessedInputState,
        frontend: &F,
    ) -> PlayerAction {
        let pressed = |button| input.get_mouse_button_state(button).is_just_pressed();
        let action = PlayerAction {
            target: frontend.facing_block(),
            break_block: pressed(MouseButton::Right),
            place_block: pressed(MouseButton::Left),
            pick_block: pressed(MouseButton::Middle),
        };
        if action.target.is_none()
            && (action.break_block || action.place_block || action.pick_block)
        {
            trace!("Click with no block in view");
        }
        action
    }
}

/// Represents player actions derived from input
///
/// Clicks only trigger on the frame the button goes down, not while it is held.
#[derive(Debug, Default)]
struct PlayerAction {
    /// The facing block and the normal of the face under the cursor
    target: Option<(Point3<i32>, Vector3<i32>)>,
    break_block: bool,
    place_block: bool,
    pick_block: bool,
}
