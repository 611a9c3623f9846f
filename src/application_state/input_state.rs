//! # Input State
//!
//! Per-frame key and mouse button states, as produced by the
//! [`InputManager`](super::input_manager::InputManager).
//!
//! Keys are identified by name (`"1"`, `"escape"`, ...), the same names block types use
//! for their selection key, so the engine never depends on a windowing library's key
//! codes.

use std::collections::HashMap;

/// The mouse buttons the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button; places blocks.
    Left,
    /// Secondary button; breaks blocks.
    Right,
    /// Wheel button; picks the block type under the cursor.
    Middle,
}

impl MouseButton {
    /// All tracked buttons.
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];
}

/// Where a key or button is in its press cycle this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Up in both frames
    #[default]
    NotPressed,
    /// Went down this frame
    Pressed,
    /// Down in both frames
    Held,
    /// Went up this frame
    Released,
}

impl RawInputState {
    /// Whether the input is down, freshly or not.
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Whether the input went down this frame.
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Whether the input went up this frame.
    pub fn is_just_released(&self) -> bool {
        matches!(self, RawInputState::Released)
    }

    /// Derives the state from the raw up/down flags of the previous and this frame.
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// All tracked inputs for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedInputState {
    /// Tracked keys, by name
    pub keyboard_states: HashMap<String, RawInputState>,

    /// Mouse buttons
    pub mouse_button_states: HashMap<MouseButton, RawInputState>,
}

impl ProcessedInputState {
    /// Gets the state of a keyboard key; untracked keys are never pressed.
    pub fn get_key_state(&self, key: &str) -> RawInputState {
        self.keyboard_states.get(key).copied().unwrap_or_default()
    }

    /// The state of a mouse button.
    pub fn get_mouse_button_state(&self, button: MouseButton) -> RawInputState {
        self.mouse_button_states
            .get(&button)
            .copied()
            .unwrap_or_default()
    }
}
