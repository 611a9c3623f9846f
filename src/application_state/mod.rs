//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Engine initialization from a configuration
//! - Input handling
//! - The per-frame update
//!
//! The application is headless: drawing, audio and camera control belong to whichever
//! [`Frontend`] it is run with. The frontend forwards raw key and button changes as they
//! happen and calls [`ApplicationState::frame`] once per frame.

pub mod frontend;
pub mod input_manager;
pub mod input_state;

use log::{debug, info};
use web_time::Instant;

use frontend::{Frontend, HudState};
use input_manager::InputManager;
use input_state::MouseButton;

use crate::config::WorldConfig;
use crate::engine_state::task_management::CascadeReport;
use crate::engine_state::voxels::generation::WorldGenerator;
use crate::engine_state::EngineState;
use crate::error::StartupError;

/// The main application state container.
///
/// Owns the engine, the input tracking and the frontend everything is mirrored to.
pub struct ApplicationState<F: Frontend> {
    /// The core game engine state and logic
    pub engine_state: EngineState,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Where renderables, sounds and the HUD go
    pub frontend: F,

    /// Timestamp of the last frame
    pub last_wait_time: Instant,
}

/// What one frame did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    /// The cascade triggered by this frame's click, if any.
    pub report: Option<CascadeReport>,
    /// The HUD shown at the end of the frame.
    pub hud: HudState,
}

impl<F: Frontend> ApplicationState<F> {
    /// Builds the engine and generates the world.
    ///
    /// # Arguments
    ///
    /// * `config` - The world description
    /// * `frontend` - The frontend to mirror the world to
    ///
    /// # Errors
    ///
    /// A [`StartupError`] if the configuration is rejected or generation fails.
    pub fn new(config: &WorldConfig, mut frontend: F) -> Result<Self, StartupError> {
        let mut engine_state = EngineState::new(config, &mut frontend)?;
        let placed = WorldGenerator::generate(&mut engine_state, &mut frontend)?;
        info!("World ready with {placed} voxels");

        let input_manager = InputManager::new(
            engine_state
                .registry
                .iter()
                .filter_map(|block_type| block_type.key.as_deref()),
        );

        Ok(ApplicationState {
            engine_state,
            input_manager,
            frontend,
            last_wait_time: Instant::now(),
        })
    }

    /// Forwards a key going down or up.
    pub fn key_event(&mut self, key: &str, pressed: bool) {
        self.input_manager.intake_key(key, pressed);
    }

    /// Forwards a mouse button going down or up.
    pub fn mouse_button_event(&mut self, button: MouseButton, pressed: bool) {
        self.input_manager.intake_mouse_button(button, pressed);
    }

    /// Runs one frame: clicks first, then the per-frame upkeep.
    pub fn frame(&mut self) -> FrameOutcome {
        let now = Instant::now();
        let wait_dt = now - self.last_wait_time;
        self.last_wait_time = now;

        let processed_input = self.input_manager.get_and_reset_processed_input();
        let report = self
            .engine_state
            .process_input(&processed_input, &mut self.frontend);
        if let Some(report) = report {
            debug!("Frame after {wait_dt:?} ran {} cascade steps", report.steps);
        }
        let hud = self.engine_state.tick(&processed_input, &mut self.frontend);

        FrameOutcome { report, hud }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Vector3};
    use frontend::RecordingFrontend;
    use pretty_assertions::assert_eq;

    #[test]
    fn startup_generates_the_world() {
        let app = ApplicationState::new(&WorldConfig::default(), RecordingFrontend::new())
            .expect("default config starts");
        assert_eq!(app.engine_state.world.len(), 41 * 3 * 41);
        assert_eq!(app.frontend.live.len(), app.engine_state.world.len());
    }

    #[test]
    fn invalid_config_stops_startup() {
        let mut config = WorldConfig::default();
        config.bounds.world_radius = 10.0;
        let err = ApplicationState::new(&config, RecordingFrontend::new())
            .err()
            .expect("origin lies outside a radius 10 world");
        assert!(matches!(err, StartupError::Config(_)));
    }

    #[test]
    fn frame_places_and_selects() {
        let mut app = ApplicationState::new(&WorldConfig::default(), RecordingFrontend::new())
            .expect("default config starts");
        app.frontend.facing = Some((Point3::new(3, 0, 3), Vector3::new(0, 1, 0)));

        app.key_event("3", true);
        let outcome = app.frame();
        assert_eq!(outcome.hud.tool, "brick");
        assert_eq!(outcome.report, None);

        app.key_event("3", false);
        app.mouse_button_event(MouseButton::Left, true);
        let outcome = app.frame();
        assert!(outcome.report.is_some());
        assert!(app
            .engine_state
            .world
            .get(Point3::new(3, 1, 3))
            .is_some_and(|voxel| voxel.is("brick")));
    }
}
