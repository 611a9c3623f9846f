#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Rules
//!
//! A voxel-world rule engine: a sparse, integer-indexed 3D grid of typed blocks whose
//! mutation rules (placement, breakage, gravity collapse, decay and explosive
//! destruction) react to each other over spatial neighborhoods.
//!
//! ## Key Modules
//!
//! * `application_state` - Startup, input tracking, the per-frame update and the
//!   [`Frontend`](application_state::frontend::Frontend) interface to rendering and audio
//! * `config` - The JSON world description
//! * `engine_state` - Block catalog, voxel grid, world generation and the rule engine
//! * `error` - Error types
//!
//! ## Architecture
//!
//! The engine is headless and single-threaded. Everything visible (renderables, sounds,
//! the HUD) goes through a `Frontend`; the crate ships a recording frontend that the
//! command-line driver and the tests use.
//!
//! Each player action is one call into the
//! [`RuleEngine`](engine_state::rules::RuleEngine), which runs the resulting cascade of
//! falls, decays and blasts to completion on an explicit worklist before returning.
//!
//! ## Usage
//!
//! ```rust
//! use voxel_rules::application_state::frontend::RecordingFrontend;
//! use voxel_rules::application_state::ApplicationState;
//! use voxel_rules::config::WorldConfig;
//!
//! let mut app = ApplicationState::new(&WorldConfig::default(), RecordingFrontend::new())
//!     .expect("the default world is valid");
//! let outcome = app.frame();
//! assert_eq!(outcome.hud.tool, "tnt");
//! ```

use std::env;
use std::process;

use log::{error, info};

use application_state::frontend::RecordingFrontend;
use application_state::ApplicationState;
use config::{WorldConfig, CONFIG_ENV_VAR};
use error::StartupError;

pub mod application_state;
pub mod config;
pub mod engine_state;
pub mod error;

/// Runs the engine headless: loads the configuration, generates the world and runs one
/// frame.
///
/// The configuration file is taken from the first command-line argument, then from the
/// `VOXEL_CONFIG` environment variable; without either the built-in default world is
/// used. Startup errors are logged and end the process with a non-zero status.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    if let Err(err) = start() {
        error!("{err}");
        process::exit(1);
    }
}

fn start() -> Result<(), StartupError> {
    let config = match env::args().nth(1).or_else(|| env::var(CONFIG_ENV_VAR).ok()) {
        Some(path) => WorldConfig::load(path)?,
        None => {
            info!("No config given, using the default world");
            WorldConfig::default()
        }
    };

    let mut app = ApplicationState::new(&config, RecordingFrontend::new())?;
    let outcome = app.frame();
    info!(
        "{} voxels, {} renderables, holding {}",
        app.engine_state.world.len(),
        app.frontend.live.len(),
        outcome.hud.tool
    );
    Ok(())
}
