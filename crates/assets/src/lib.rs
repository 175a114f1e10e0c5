//! Scene files: tile definitions, solid placement and actor spawns.
//!
//! Scenes are authored in YAML, in tile units, and built into a shared
//! [`axel_kernel::Level`]. Image paths pass through as opaque visual
//! references; nothing here decodes images.

mod scene;

pub use scene::{
    ActorSpawn, ActorSpec, Scene, SceneError, SceneFile, SolidSpec, SpawnedActor, TileSpec,
};
