//! # Frontend Interface
//!
//! The engine never renders, plays audio or reads devices itself. Everything visible or
//! audible goes through the [`Frontend`] trait, which a windowed application implements
//! on top of its renderer and which [`RecordingFrontend`] implements headlessly.
//!
//! ## Responsibilities
//!
//! * Renderables: one per voxel, created, moved and destroyed as the grid changes
//! * Sound clips: fire-and-forget playback by clip name
//! * Textures: loading of non-built-in block textures at startup
//! * Player: hit-test against the facing block, position queries, teleporting
//! * HUD: the per-frame text and hand pose, and the quit request

use std::collections::HashMap;
use std::fmt;

use cgmath::{Point3, Vector3};

/// Opaque handle of a renderable owned by the frontend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderableHandle(pub u64);

/// Opaque handle of a texture loaded by the frontend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// How a block type's texture is referred to when drawing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextureRef {
    /// A texture built into the frontend, referred to by name.
    Builtin(String),
    /// A texture loaded from a file at startup.
    Loaded(TextureHandle),
}

/// Everything the frontend needs to draw one voxel.
#[derive(Clone, Debug, PartialEq)]
pub struct Renderable {
    /// Grid cell of the voxel.
    pub position: Point3<i32>,
    /// Model name or path.
    pub model: String,
    /// Texture to draw the model with.
    pub texture: TextureRef,
    /// Brightness multiplier.
    pub shade: f32,
}

/// Position of the player's arm on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum HandPose {
    /// Resting position.
    #[default]
    Passive,
    /// Raised while a mouse button is held.
    Active,
}

/// The per-frame heads-up display contents.
#[derive(Clone, Debug, PartialEq)]
pub struct HudState {
    /// Player coordinates, `X:.. Y:.. Z:..` with two decimals.
    pub coordinates: String,
    /// Frames per second over the last frame.
    pub fps: String,
    /// Name of the block type held as the current tool.
    pub tool: String,
    /// Arm pose.
    pub hand_pose: HandPose,
}

/// The services the engine consumes from the rendering and windowing layer.
pub trait Frontend {
    /// Starts drawing a voxel and returns its handle.
    fn create_renderable(&mut self, renderable: Renderable) -> RenderableHandle;

    /// Moves an existing renderable to a new cell.
    fn move_renderable(&mut self, handle: RenderableHandle, position: Point3<i32>);

    /// Stops drawing a renderable. Unknown handles are ignored.
    fn destroy_renderable(&mut self, handle: RenderableHandle);

    /// Plays a sound clip once.
    fn play_sound(&mut self, clip: &str);

    /// Loads a texture file.
    fn load_texture(&mut self, path: &str) -> TextureHandle;

    /// The voxel cell the camera is looking at and the normal of the face that was hit.
    fn facing_block(&self) -> Option<(Point3<i32>, Vector3<i32>)>;

    /// The player's current position.
    fn player_position(&self) -> Point3<f64>;

    /// Moves the player.
    fn teleport_player(&mut self, position: Point3<f64>);

    /// Replaces the HUD contents.
    fn show_hud(&mut self, hud: &HudState);

    /// Asks the application to close.
    fn request_quit(&mut self);
}

/// A call received by a [`RecordingFrontend`].
#[derive(Clone, Debug, PartialEq)]
pub enum FrontendEvent {
    /// `create_renderable`
    Created(RenderableHandle, Renderable),
    /// `move_renderable`
    Moved(RenderableHandle, Point3<i32>),
    /// `destroy_renderable`
    Destroyed(RenderableHandle),
    /// `play_sound`
    Sound(String),
    /// `load_texture`
    TextureLoaded(String),
    /// `teleport_player`
    Teleported(Point3<f64>),
    /// `show_hud`
    Hud(HudState),
    /// `request_quit`
    QuitRequested,
}

/// A headless frontend that records every call.
///
/// Used by the command-line driver, where nothing is drawn, and by tests, which inspect
/// the recorded events and the set of live renderables.
pub struct RecordingFrontend {
    /// Every call, in order.
    pub events: Vec<FrontendEvent>,
    /// Renderables that were created and not yet destroyed.
    pub live: HashMap<RenderableHandle, Renderable>,
    /// What the next `facing_block` call reports.
    pub facing: Option<(Point3<i32>, Vector3<i32>)>,
    /// Where the player is.
    pub player: Point3<f64>,
    /// Set once quitting was requested.
    pub quit_requested: bool,
    next_handle: u64,
}

impl RecordingFrontend {
    /// Creates a frontend with the player at the world center and nothing in view.
    pub fn new() -> Self {
        RecordingFrontend {
            events: Vec::new(),
            live: HashMap::new(),
            facing: None,
            player: Point3::new(0.0, 0.0, 0.0),
            quit_requested: false,
            next_handle: 0,
        }
    }

    /// Names of all sounds played so far.
    pub fn sounds(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|event| match event {
            FrontendEvent::Sound(clip) => Some(clip.as_str()),
            _ => None,
        })
    }

    /// The most recent HUD contents.
    pub fn last_hud(&self) -> Option<&HudState> {
        self.events.iter().rev().find_map(|event| match event {
            FrontendEvent::Hud(hud) => Some(hud),
            _ => None,
        })
    }

    /// Forgets recorded events, keeping the live renderables.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl Default for RecordingFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordingFrontend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingFrontend")
            .field("events", &self.events.len())
            .field("live", &self.live.len())
            .field("player", &self.player)
            .finish()
    }
}

impl Frontend for RecordingFrontend {
    fn create_renderable(&mut self, renderable: Renderable) -> RenderableHandle {
        let handle = RenderableHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(handle, renderable.clone());
        self.events.push(FrontendEvent::Created(handle, renderable));
        handle
    }

    fn move_renderable(&mut self, handle: RenderableHandle, position: Point3<i32>) {
        if let Some(renderable) = self.live.get_mut(&handle) {
            renderable.position = position;
        }
        self.events.push(FrontendEvent::Moved(handle, position));
    }

    fn destroy_renderable(&mut self, handle: RenderableHandle) {
        self.live.remove(&handle);
        self.events.push(FrontendEvent::Destroyed(handle));
    }

    fn play_sound(&mut self, clip: &str) {
        self.events.push(FrontendEvent::Sound(clip.to_string()));
    }

    fn load_texture(&mut self, path: &str) -> TextureHandle {
        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        self.events.push(FrontendEvent::TextureLoaded(path.to_string()));
        handle
    }

    fn facing_block(&self) -> Option<(Point3<i32>, Vector3<i32>)> {
        self.facing
    }

    fn player_position(&self) -> Point3<f64> {
        self.player
    }

    fn teleport_player(&mut self, position: Point3<f64>) {
        self.player = position;
        self.events.push(FrontendEvent::Teleported(position));
    }

    fn show_hud(&mut self, hud: &HudState) {
        self.events.push(FrontendEvent::Hud(hud.clone()));
    }

    fn request_quit(&mut self) {
        self.quit_requested = true;
        self.events.push(FrontendEvent::QuitRequested);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn live_set_tracks_create_move_destroy() {
        let mut frontend = RecordingFrontend::new();
        let handle = frontend.create_renderable(Renderable {
            position: Point3::new(0, 0, 0),
            model: "cube".into(),
            texture: TextureRef::Builtin("white_cube".into()),
            shade: 1.0,
        });
        frontend.move_renderable(handle, Point3::new(0, -3, 0));
        assert_eq!(frontend.live[&handle].position, Point3::new(0, -3, 0));

        frontend.destroy_renderable(handle);
        assert!(frontend.live.is_empty());
        assert_eq!(frontend.events.len(), 3);
    }

    #[test]
    fn handles_are_distinct() {
        let mut frontend = RecordingFrontend::new();
        let a = frontend.load_texture("assets/grass_block.png");
        let b = frontend.load_texture("assets/dirt_block.png");
        assert_ne!(a, b);
        frontend.play_sound("assets/punch_sound");
        assert_eq!(frontend.sounds().collect::<Vec<_>>(), ["assets/punch_sound"]);
    }
}
