use axel_common::EntityId;
use glam::Vec2;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::actor::Actor;
use crate::error::KernelError;
use crate::level::Level;
use crate::movement::{MoveReport, MovementResolver};
use crate::probe;
use crate::reaction::Contact;

/// An event record produced by every mutation to the world.
#[derive(Debug, Clone, Serialize)]
pub enum WorldEvent {
    /// Actor entered the simulation.
    Spawned { id: EntityId, actor: Actor },
    /// Actor left the simulation. Carries its last state.
    Despawned { id: EntityId, actor: Actor },
    /// Actor's pixel position changed during a move.
    Moved { id: EntityId, from: Vec2, to: Vec2 },
    /// A step was refused by a solid.
    Blocked {
        id: EntityId,
        contact: Contact,
        discarded: i32,
    },
    /// Simulation advanced one tick.
    Stepped { tick: u64 },
}

/// An actor together with the velocity its controller owns.
///
/// The world stores the velocity so `step` can scale it by the frame delta,
/// but only the actor's reaction (through the resolver) and the caller ever
/// change it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Body {
    pub actor: Actor,
    pub velocity: Vec2,
}

/// Simulation host: a shared static level plus the bodies moving through it.
///
/// Uses BTreeMap so bodies are stepped in the same order on every run.
#[derive(Debug, Clone)]
pub struct World {
    level: Arc<Level>,
    bodies: BTreeMap<EntityId, Body>,
    resolver: MovementResolver,
    tick: u64,
    /// Append-only event log of all mutations.
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Create a world at tick 0 with the default X-then-Y resolver.
    pub fn new(level: Arc<Level>) -> Self {
        Self::with_resolver(level, MovementResolver::default())
    }

    pub fn with_resolver(level: Arc<Level>, resolver: MovementResolver) -> Self {
        Self {
            level,
            bodies: BTreeMap::new(),
            resolver,
            tick: 0,
            event_log: Vec::new(),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn resolver(&self) -> MovementResolver {
        self.resolver
    }

    /// Current simulation tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// All bodies in stepping order.
    pub fn bodies(&self) -> &BTreeMap<EntityId, Body> {
        &self.bodies
    }

    /// Spawn an actor at rest. Returns its id.
    pub fn spawn(&mut self, actor: Actor) -> Result<EntityId, KernelError> {
        let id = EntityId::new();
        self.spawn_with_id(id, actor)?;
        Ok(id)
    }

    /// Spawn an actor under a chosen id, replacing any body already there.
    pub fn spawn_with_id(&mut self, id: EntityId, actor: Actor) -> Result<(), KernelError> {
        self.level.validate(actor.kind())?;
        if !actor.position.is_finite() {
            return Err(KernelError::NonFinitePosition(actor.position));
        }
        self.bodies.insert(
            id,
            Body {
                actor,
                velocity: Vec2::ZERO,
            },
        );
        self.event_log.push(WorldEvent::Spawned { id, actor });
        Ok(())
    }

    /// Remove a body. Returns it if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Body> {
        let body = self.bodies.remove(&id);
        if let Some(b) = &body {
            self.event_log.push(WorldEvent::Despawned { id, actor: b.actor });
        }
        body
    }

    pub fn get(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// The velocity handle a controller writes before each step.
    pub fn velocity_mut(&mut self, id: EntityId) -> Option<&mut Vec2> {
        self.bodies.get_mut(&id).map(|b| &mut b.velocity)
    }

    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.actor.position)
    }

    /// Is a solid flush under this body?
    pub fn is_grounded(&self, id: EntityId) -> Result<bool, KernelError> {
        let body = self.bodies.get(&id).ok_or(KernelError::UnknownActor(id))?;
        probe::is_grounded(&self.level, &body.actor)
    }

    /// Would this body overlap a solid at `candidate`?
    pub fn collides_at(&self, id: EntityId, candidate: Vec2) -> Result<bool, KernelError> {
        let body = self.bodies.get(&id).ok_or(KernelError::UnknownActor(id))?;
        probe::collides_at(&self.level, &body.actor, candidate)
    }

    /// Move one body by an externally computed displacement.
    pub fn move_body(&mut self, id: EntityId, displacement: Vec2) -> Result<MoveReport, KernelError> {
        let body = self
            .bodies
            .get_mut(&id)
            .ok_or(KernelError::UnknownActor(id))?;
        Self::resolve(
            &self.level,
            self.resolver,
            &mut self.event_log,
            id,
            body,
            displacement,
        )
    }

    /// Advance the simulation by one tick of `dt` seconds, moving every body
    /// by `velocity * dt`.
    pub fn step(&mut self, dt: f32) -> Result<Vec<(EntityId, MoveReport)>, KernelError> {
        if !dt.is_finite() {
            return Err(KernelError::NonFiniteDelta(dt));
        }
        let _span = tracing::info_span!("world_step", tick = self.tick + 1).entered();

        let mut reports = Vec::with_capacity(self.bodies.len());
        for (&id, body) in self.bodies.iter_mut() {
            let displacement = body.velocity * dt;
            if !displacement.is_finite() {
                tracing::warn!(actor = %id.short(), velocity = %body.velocity, "skipping non-finite velocity");
                continue;
            }
            let report = Self::resolve(
                &self.level,
                self.resolver,
                &mut self.event_log,
                id,
                body,
                displacement,
            )?;
            reports.push((id, report));
        }

        self.tick += 1;
        self.event_log.push(WorldEvent::Stepped { tick: self.tick });
        Ok(reports)
    }

    fn resolve(
        level: &Level,
        resolver: MovementResolver,
        event_log: &mut Vec<WorldEvent>,
        id: EntityId,
        body: &mut Body,
        displacement: Vec2,
    ) -> Result<MoveReport, KernelError> {
        let from = body.actor.position;
        let report = resolver.move_actor(level, &mut body.actor, displacement, &mut body.velocity)?;
        let to = body.actor.position;

        if from != to {
            event_log.push(WorldEvent::Moved { id, from, to });
        }
        for axis in resolver.order().axes() {
            let m = report.axis(axis);
            if let Some(contact) = m.contact {
                tracing::debug!(
                    actor = %id.short(),
                    axis = %contact.axis,
                    sign = contact.sign,
                    discarded = m.discarded,
                    "movement blocked"
                );
                event_log.push(WorldEvent::Blocked {
                    id,
                    contact,
                    discarded: m.discarded,
                });
            }
        }
        tracing::trace!(actor = %id.short(), %from, %to, "moved");
        Ok(report)
    }

    /// Compute a deterministic hash of the simulation state.
    /// Uses canonical (BTreeMap) iteration order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        for (id, body) in &self.bodies {
            let a = &body.actor;
            mix(&mut h, id.0.as_bytes());
            mix(&mut h, &(a.kind().index() as u32).to_le_bytes());
            for f in [
                a.position.x,
                a.position.y,
                a.remainder().x,
                a.remainder().y,
                body.velocity.x,
                body.velocity.y,
            ] {
                mix(&mut h, &f.to_le_bytes());
            }
        }
        h
    }

    pub fn summary(&self) -> WorldSummary {
        WorldSummary {
            tick: self.tick,
            bodies: self.bodies.len(),
            solids: self.level.solids().len(),
            tile_kinds: self.level.catalog().len(),
            pending_events: self.event_log.len(),
        }
    }
}

/// Summary of world state for logs and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSummary {
    pub tick: u64,
    pub bodies: usize,
    pub solids: usize,
    pub tile_kinds: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tick={} bodies={} solids={} tile_kinds={} pending_events={}",
            self.tick, self.bodies, self.solids, self.tile_kinds, self.pending_events
        )
    }
}
