use glam::Vec2;
use serde::Serialize;

use crate::reaction::ReactionTag;
use crate::tile::TileKind;

/// A moving entity whose collider comes from its tile kind.
///
/// `position` is in world pixels. The per-axis remainder keeps the
/// sub-pixel part of past displacements; after every resolved axis its
/// magnitude is at most half a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Actor {
    kind: TileKind,
    pub position: Vec2,
    pub(crate) remainder: Vec2,
    pub reaction: ReactionTag,
}

impl Actor {
    pub fn new(kind: TileKind, position: Vec2, reaction: ReactionTag) -> Self {
        Self {
            kind,
            position,
            remainder: Vec2::ZERO,
            reaction,
        }
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// Sub-pixel displacement not yet applied to `position`.
    pub fn remainder(&self) -> Vec2 {
        self.remainder
    }
}
