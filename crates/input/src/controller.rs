use axel_common::EntityId;
use axel_kernel::{KernelError, World};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::intent::Intent;

/// Movement tunables, in pixels per second (squared for gravity).
/// Y grows downward, so gravity is positive and a jump is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tunables {
    #[serde(default = "default_gravity")]
    pub gravity: Vec2,
    #[serde(default = "default_walk_velocity")]
    pub walk_velocity: f32,
    #[serde(default = "default_jump_velocity")]
    pub jump_velocity: Vec2,
}

fn default_gravity() -> Vec2 {
    Vec2::new(0.0, 256.0)
}
fn default_walk_velocity() -> f32 {
    64.0
}
fn default_jump_velocity() -> Vec2 {
    Vec2::new(0.0, -128.0)
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            walk_velocity: default_walk_velocity(),
            jump_velocity: default_jump_velocity(),
        }
    }
}

/// Turns per-frame intents into the velocity of one body.
///
/// The controller owns the policy; the velocity itself lives in the world
/// body and is handed over as `&mut`, the same handle the resolver's
/// reactions write to.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerController {
    pub tunables: Tunables,
}

impl PlayerController {
    pub fn new(tunables: Tunables) -> Self {
        Self { tunables }
    }

    /// Rewrite `velocity` for one frame. Returns true when a jump starts.
    ///
    /// Horizontal speed is rebuilt from scratch every frame. A grounded jump
    /// replaces the whole velocity with the jump velocity, so walking resumes
    /// on the next frame; otherwise gravity integrates while airborne.
    pub fn update(&self, intent: Intent, grounded: bool, dt: f32, velocity: &mut Vec2) -> bool {
        let t = &self.tunables;
        velocity.x = intent.horizontal() * t.walk_velocity;

        if grounded && intent.jump {
            *velocity = t.jump_velocity;
            return true;
        }
        if !grounded {
            *velocity += t.gravity * dt;
        }
        false
    }

    /// Read the grounded query for `id` and update its velocity in `world`.
    pub fn drive(
        &self,
        world: &mut World,
        id: EntityId,
        intent: Intent,
        dt: f32,
    ) -> Result<bool, KernelError> {
        let grounded = world.is_grounded(id)?;
        let velocity = world.velocity_mut(id).ok_or(KernelError::UnknownActor(id))?;
        let jumped = self.update(intent, grounded, dt, velocity);
        if jumped {
            tracing::debug!(actor = %id.short(), "jump");
        }
        Ok(jumped)
    }
}
