//! Player input: per-frame intents, the controller that turns them into body
//! velocity, and scripted intents for headless runs.
//!
//! # Invariants
//! - Controllers only see intents, never device events.
//! - Velocity stays in the world body; the controller writes it through the
//!   same `&mut` handle the resolver's reactions use.

pub mod controller;
pub mod intent;
pub mod script;

pub use controller::{PlayerController, Tunables};
pub use intent::Intent;
pub use script::{InputScript, ScriptError, ScriptStep};
