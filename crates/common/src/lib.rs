//! Shared types for the axelisation workspace: entity identity, axes and
//! axis-aligned rectangles.

mod types;

pub use types::{Aabb, Axis, EntityId};
