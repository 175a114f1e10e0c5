//! Pixel-stepped actor movement.
//!
//! Displacements accumulate into a per-axis remainder; whole pixels are then
//! applied one at a time, probing before each step. The first blocked step
//! ends that axis for the frame and fires the actor's reaction.
//!
//! # Invariants
//! - Each committed step moves exactly one pixel on one axis.
//! - An actor never ends a step overlapping a solid it was not already in.
//! - Pixels left over after a contact are dropped, not carried to the next
//!   frame; only the sub-pixel residue carries.

use axel_common::{Aabb, Axis};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::error::KernelError;
use crate::level::Level;
use crate::probe::overlaps;
use crate::reaction::{Contact, on_blocked};
use crate::solid::SolidSet;

/// Which axis is resolved first.
///
/// Resolving one axis fully before the other means a diagonal move into a
/// concave corner can end in different places depending on the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrder {
    #[default]
    XThenY,
    YThenX,
}

impl AxisOrder {
    pub fn axes(self) -> [Axis; 2] {
        match self {
            AxisOrder::XThenY => [Axis::X, Axis::Y],
            AxisOrder::YThenX => [Axis::Y, Axis::X],
        }
    }
}

/// Outcome of resolving one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AxisMove {
    /// Signed pixels actually committed.
    pub moved: i32,
    /// Signed whole pixels requested but dropped because of a contact.
    pub discarded: i32,
    pub contact: Option<Contact>,
}

/// Outcome of one [`MovementResolver::move_actor`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MoveReport {
    pub x: AxisMove,
    pub y: AxisMove,
}

impl MoveReport {
    pub fn axis(&self, axis: Axis) -> &AxisMove {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisMove {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    /// Contacts, X first. At most one per axis.
    pub fn contacts(&self) -> impl Iterator<Item = Contact> {
        [self.x.contact, self.y.contact].into_iter().flatten()
    }

    pub fn is_blocked(&self) -> bool {
        self.x.contact.is_some() || self.y.contact.is_some()
    }
}

/// Moves actors through a [`Level`] one pixel at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementResolver {
    order: AxisOrder,
}

impl MovementResolver {
    pub fn new(order: AxisOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> AxisOrder {
        self.order
    }

    /// Advance `actor` by `displacement` pixels.
    ///
    /// `velocity` belongs to the caller; it is only touched by the actor's
    /// reaction when a step is blocked. Nothing changes if `displacement` is
    /// not finite or the actor's kind is not from `level`.
    pub fn move_actor(
        &self,
        level: &Level,
        actor: &mut Actor,
        displacement: Vec2,
        velocity: &mut Vec2,
    ) -> Result<MoveReport, KernelError> {
        if !displacement.is_finite() {
            return Err(KernelError::NonFiniteDisplacement(displacement));
        }
        let collider = level.collider(actor.kind())?;
        let mut report = MoveReport::default();
        for axis in self.order.axes() {
            *report.axis_mut(axis) = move_axis(
                level.solids(),
                &collider,
                actor,
                axis,
                axis.of(displacement),
                velocity,
            );
        }
        Ok(report)
    }
}

/// Move with the default X-then-Y resolver.
pub fn move_actor(
    level: &Level,
    actor: &mut Actor,
    displacement: Vec2,
    velocity: &mut Vec2,
) -> Result<MoveReport, KernelError> {
    MovementResolver::default().move_actor(level, actor, displacement, velocity)
}

fn move_axis(
    solids: &SolidSet,
    collider: &Aabb,
    actor: &mut Actor,
    axis: Axis,
    amount: f32,
    velocity: &mut Vec2,
) -> AxisMove {
    let remainder = axis.of_mut(&mut actor.remainder);
    *remainder += amount;
    // Ties go to even so a steady half pixel per frame lands every other frame.
    let mut steps = remainder.round_ties_even() as i32;
    *remainder -= steps as f32;

    let mut result = AxisMove::default();
    if steps == 0 {
        return result;
    }

    let sign = steps.signum();
    let unit = axis.step(sign);
    while steps != 0 {
        if overlaps(&collider.translated(actor.position + unit), solids) {
            let contact = Contact::new(axis, sign);
            on_blocked(actor.reaction, contact, velocity);
            result.contact = Some(contact);
            result.discarded = steps;
            tracing::trace!(%axis, sign, discarded = steps, "step blocked");
            break;
        }
        actor.position += unit;
        steps -= sign;
        result.moved += sign;
    }
    result
}
