use axel_common::Axis;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What happens to the caller's velocity when a movement step is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionTag {
    /// Stop moving; leave velocity alone.
    #[default]
    None,
    /// Zero the velocity component along the blocked axis only.
    StopSharedVelocity,
    /// Zero the whole velocity vector, whichever axis was blocked.
    HaltSharedVelocity,
}

/// The blocked unit step: which axis, and in which direction (+1 or -1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub axis: Axis,
    pub sign: i32,
}

impl Contact {
    pub fn new(axis: Axis, sign: i32) -> Self {
        Self { axis, sign }
    }

    /// The step that was refused, as a vector.
    pub fn direction(&self) -> Vec2 {
        self.axis.step(self.sign)
    }
}

/// Apply `reaction` for `contact` to the velocity the caller owns.
///
/// Called synchronously by the resolver, once per blocked axis per move.
pub fn on_blocked(reaction: ReactionTag, contact: Contact, velocity: &mut Vec2) {
    match reaction {
        ReactionTag::None => {}
        ReactionTag::StopSharedVelocity => *contact.axis.of_mut(velocity) = 0.0,
        ReactionTag::HaltSharedVelocity => *velocity = Vec2::ZERO,
    }
}
