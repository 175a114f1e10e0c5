use axel_common::{Aabb, EntityId};
use glam::Vec2;

use crate::tile::TileKind;

/// Errors from level construction and world bookkeeping.
///
/// Contact is never an error; these only reject inputs the engine cannot
/// resolve: foreign tile handles and non-finite numbers.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("tile kind {0:?} is not registered in this catalog")]
    UnknownTile(TileKind),
    #[error("tile '{name}' has an invalid collider {collider:?}")]
    InvalidCollider { name: String, collider: Aabb },
    #[error("tile '{0}' is already registered")]
    DuplicateTile(String),
    #[error("tile catalog is full ({0} kinds)")]
    CatalogFull(usize),
    #[error("position {0} is not finite")]
    NonFinitePosition(Vec2),
    #[error("displacement {0} is not finite")]
    NonFiniteDisplacement(Vec2),
    #[error("actor {0:?} not found")]
    UnknownActor(EntityId),
    #[error("frame delta {0} is not finite")]
    NonFiniteDelta(f32),
}
