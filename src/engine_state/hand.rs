//! # Hand
//!
//! The player's tool selection: the block type currently held, the one used by the
//! last placement, and the on-screen arm pose.

use crate::application_state::frontend::HandPose;

/// Tool selection state.
///
/// `previous` only changes when a placement completes. It drives the area carry-over
/// of the `place` tool: switching away from `place` and then placing fills the area
/// around the target with the new tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    current: String,
    previous: String,
    /// Arm pose shown in the HUD.
    pub pose: HandPose,
}

impl Hand {
    /// Starts out holding `tool`, with `tool` also recorded as the previous tool.
    pub fn new(tool: impl Into<String>) -> Self {
        let tool = tool.into();
        Hand {
            previous: tool.clone(),
            current: tool,
            pose: HandPose::Passive,
        }
    }

    /// The block type currently held.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// The block type the last placement was made with.
    pub fn previous(&self) -> &str {
        &self.previous
    }

    /// Switches the held block type, leaving `previous` alone.
    pub fn select(&mut self, tool: impl Into<String>) {
        self.current = tool.into();
    }

    /// Records the held block type as the one last placed with.
    pub fn commit(&mut self) {
        if self.previous != self.current {
            self.previous = self.current.clone();
        }
    }
}
