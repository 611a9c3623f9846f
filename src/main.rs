//! # Voxel Rules Entry Point
//!
//! This is the main entry point of the headless command-line driver.
//! It simply calls into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- world.json
//! ```

fn main() {
    voxel_rules::run();
}
