//! Movement kernel: tile catalog, static solids, actors and the pixel-stepped
//! collision resolver that moves them.
//!
//! # Invariants
//! - Movement is deterministic: same level, actor and displacements give the
//!   same positions on every platform.
//! - Levels are immutable after construction; movement never alters them.
//! - Velocity is owned by the caller and only reaches the engine as `&mut`.
//! - A `TileKind` only resolves in the catalog that issued it; every lookup
//!   of a foreign handle is an `UnknownTile` error, never an index.

mod actor;
mod error;
mod level;
pub mod movement;
pub mod probe;
pub mod reaction;
mod solid;
mod tile;
pub mod world;

pub use actor::Actor;
pub use error::KernelError;
pub use level::Level;
pub use movement::{AxisMove, AxisOrder, MoveReport, MovementResolver, move_actor};
pub use probe::{collides_at, is_grounded};
pub use reaction::{Contact, ReactionTag, on_blocked};
pub use solid::{SolidInstance, SolidSet};
pub use tile::{TileCatalog, TileDefinition, TileKind, VisualRef};
pub use world::{Body, World, WorldEvent, WorldSummary};
