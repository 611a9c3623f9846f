//! # Input Manager
//!
//! This module handles input processing for the application, including:
//! - Keyboard input state tracking
//! - Mouse button state tracking
//! - Per-frame transitions (pressed, held, released)
//!
//! The frontend reports raw up/down booleans as they change; once per frame the manager
//! turns them into a [`ProcessedInputState`] by comparing with the previous frame.

use std::collections::HashMap;

use log::trace;

use super::input_state::{MouseButton, ProcessedInputState, RawInputState};

/// Key that requests the application to quit.
pub const QUIT_KEY: &str = "escape";

/// Tracks raw key and button states across frames.
#[derive(Debug, Default)]
pub struct InputManager {
    keyboard_inputs_old: HashMap<String, bool>,
    keyboard_inputs_new: HashMap<String, bool>,

    mouse_button_inputs_old: HashMap<MouseButton, bool>,
    mouse_button_inputs_new: HashMap<MouseButton, bool>,
}

impl InputManager {
    /// Creates a manager tracking the named keys, the quit key and all mouse buttons.
    ///
    /// # Arguments
    ///
    /// * `keys` - Key names to track, typically the block type selection keys
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut manager = InputManager::default();
        for key in keys.into_iter().chain([QUIT_KEY]) {
            manager.keyboard_inputs_old.insert(key.to_string(), false);
            manager.keyboard_inputs_new.insert(key.to_string(), false);
        }
        for button in MouseButton::ALL {
            manager.mouse_button_inputs_old.insert(button, false);
            manager.mouse_button_inputs_new.insert(button, false);
        }
        manager
    }

    /// Copies this frame's raw states into the previous-frame slots.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }

        for (button, new_state) in self.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }
    }

    /// Records a key going down or up. Untracked keys are ignored.
    pub fn intake_key(&mut self, key: &str, pressed: bool) {
        match self.keyboard_inputs_new.get_mut(key) {
            Some(key_state) => *key_state = pressed,
            None => trace!("Ignoring untracked key {key:?}"),
        }
    }

    /// Records a mouse button going down or up.
    pub fn intake_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if let Some(button_state) = self.mouse_button_inputs_new.get_mut(&button) {
            *button_state = pressed;
        }
    }

    /// Compares this frame with the previous one.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (key.clone(), RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        let mouse_button_states = self
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                (*button, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
        }
    }

    /// Produces this frame's input and advances to the next frame.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.move_old_states();
        processed_input
    }
}
