use axel_common::{Aabb, EntityId};
use axel_input::Tunables;
use axel_kernel::{
    Actor, KernelError, Level, MovementResolver, ReactionTag, SolidInstance, TileCatalog,
    VisualRef, World,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Errors from scene loading and instantiation.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{context} refers to unknown tile '{tile}'")]
    UnknownTileName { tile: String, context: String },
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),
    #[error("actor name '{0}' is used twice")]
    DuplicateActor(String),
    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// One tile kind as written in a scene file. Collider is in tile-local pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    pub name: String,
    pub collider: Aabb,
    /// Image path; carried through to the catalog untouched.
    #[serde(default)]
    pub image: String,
}

/// A solid placement, in tile units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidSpec {
    pub tile: String,
    pub at: Vec2,
}

/// An actor spawn, in tile units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSpec {
    pub name: String,
    pub tile: String,
    #[serde(default)]
    pub at: Vec2,
    #[serde(default)]
    pub reaction: ReactionTag,
    /// Driven by the player controller.
    #[serde(default)]
    pub controlled: bool,
}

fn default_tile_size() -> f32 {
    32.0
}

/// On-disk scene description (YAML).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
    #[serde(default)]
    pub solids: Vec<SolidSpec>,
    #[serde(default)]
    pub actors: Vec<ActorSpec>,
    #[serde(default)]
    pub tunables: Tunables,
}

impl SceneFile {
    pub fn from_yaml(text: &str) -> Result<Self, SceneError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String, SceneError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// The prototype room: a player on a short floor, walls either side and a
    /// floating block to jump under.
    pub fn prototype() -> Self {
        let block = |x: f32, y: f32| SolidSpec {
            tile: "block".into(),
            at: Vec2::new(x, y),
        };
        Self {
            tile_size: 32.0,
            tiles: vec![
                TileSpec {
                    name: "player".into(),
                    collider: Aabb::new(3.0, 0.0, 26.0, 32.0),
                    image: "resources/basicguy.png".into(),
                },
                TileSpec {
                    name: "block".into(),
                    collider: Aabb::new(0.0, 0.0, 32.0, 32.0),
                    image: "resources/basicblock.png".into(),
                },
            ],
            solids: vec![
                block(0.0, 1.0),
                block(1.0, 1.0),
                block(2.0, 1.0),
                block(3.0, 1.0),
                block(3.0, 0.0),
                block(-1.0, 1.0),
                block(-2.0, 1.0),
                block(-3.0, 1.0),
                block(-3.0, 0.0),
                block(1.0, -1.5),
                block(-4.0, 0.0),
                block(-4.0, -1.0),
                block(-4.0, -2.0),
                block(-4.0, -3.0),
            ],
            actors: vec![ActorSpec {
                name: "player".into(),
                tile: "player".into(),
                at: Vec2::ZERO,
                reaction: ReactionTag::StopSharedVelocity,
                controlled: true,
            }],
            tunables: Tunables::default(),
        }
    }

    /// Resolve names, scale tile units to pixels and build the level.
    pub fn build(&self) -> Result<Scene, SceneError> {
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(SceneError::InvalidTileSize(self.tile_size));
        }

        let mut catalog = TileCatalog::new();
        for tile in &self.tiles {
            catalog.register(
                tile.name.as_str(),
                tile.collider,
                VisualRef(tile.image.clone()),
            )?;
        }

        let lookup = |name: &str, context: String| {
            catalog
                .by_name(name)
                .ok_or_else(|| SceneError::UnknownTileName {
                    tile: name.to_string(),
                    context,
                })
        };

        let mut solids = Vec::with_capacity(self.solids.len());
        for (i, s) in self.solids.iter().enumerate() {
            let kind = lookup(&s.tile, format!("solid #{i}"))?;
            solids.push(SolidInstance::new(kind, s.at * self.tile_size));
        }

        let mut actors: Vec<ActorSpawn> = Vec::with_capacity(self.actors.len());
        for a in &self.actors {
            if actors.iter().any(|s| s.name == a.name) {
                return Err(SceneError::DuplicateActor(a.name.clone()));
            }
            let kind = lookup(&a.tile, format!("actor '{}'", a.name))?;
            actors.push(ActorSpawn {
                name: a.name.clone(),
                actor: Actor::new(kind, a.at * self.tile_size, a.reaction),
                controlled: a.controlled,
            });
        }

        let level = Level::new(catalog, solids)?;
        tracing::info!(
            tiles = level.catalog().len(),
            solids = level.solids().len(),
            actors = actors.len(),
            "scene built"
        );
        Ok(Scene {
            level: Arc::new(level),
            actors,
            tunables: self.tunables,
            tile_size: self.tile_size,
        })
    }
}

/// An actor ready to spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorSpawn {
    pub name: String,
    pub actor: Actor,
    pub controlled: bool,
}

/// An actor spawned into a world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnedActor {
    pub name: String,
    pub id: EntityId,
    pub controlled: bool,
}

/// A built scene: shared level, spawns and tunables.
#[derive(Debug, Clone)]
pub struct Scene {
    pub level: Arc<Level>,
    pub actors: Vec<ActorSpawn>,
    pub tunables: Tunables,
    pub tile_size: f32,
}

impl Scene {
    /// Load and build a scene file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        tracing::info!("loading scene {}", path.display());
        SceneFile::load(path)?.build()
    }

    /// Start a fresh world on this scene's level with every actor spawned.
    pub fn instantiate(
        &self,
        resolver: MovementResolver,
    ) -> Result<(World, Vec<SpawnedActor>), SceneError> {
        let mut world = World::with_resolver(self.level.clone(), resolver);
        let mut spawned = Vec::with_capacity(self.actors.len());
        for spawn in &self.actors {
            let id = world.spawn(spawn.actor)?;
            spawned.push(SpawnedActor {
                name: spawn.name.clone(),
                id,
                controlled: spawn.controlled,
            });
        }
        Ok((world, spawned))
    }

    pub fn actor(&self, name: &str) -> Option<&ActorSpawn> {
        self.actors.iter().find(|a| a.name == name)
    }

    /// The first controlled actor, if any.
    pub fn player(&self) -> Option<&ActorSpawn> {
        self.actors.iter().find(|a| a.controlled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axel_kernel::{AxisOrder, is_grounded};

    #[test]
    fn prototype_builds() {
        let scene = SceneFile::prototype().build().unwrap();
        assert_eq!(scene.level.catalog().len(), 2);
        assert_eq!(scene.level.solids().len(), 14);
        let player = scene.player().unwrap();
        assert_eq!(player.name, "player");
        assert_eq!(player.actor.reaction, ReactionTag::StopSharedVelocity);
        // Floating block at (1, -1.5) tiles lands on a half-tile pixel offset.
        assert!(
            scene
                .level
                .solids()
                .iter()
                .any(|s| s.position == Vec2::new(32.0, -48.0))
        );
        assert!(is_grounded(&scene.level, &player.actor).unwrap());
    }

    #[test]
    fn yaml_round_trip() {
        let file = SceneFile::prototype();
        let text = file.to_yaml().unwrap();
        assert!(text.contains("stop_shared_velocity"));
        let back = SceneFile::from_yaml(&text).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn minimal_yaml_uses_defaults() {
        let text = r#"
tiles:
  - name: box
    collider: { x: 0, y: 0, w: 16, h: 16 }
solids:
  - { tile: box, at: [0, 1] }
actors:
  - { name: crate, tile: box }
"#;
        let file = SceneFile::from_yaml(text).unwrap();
        assert_eq!(file.tile_size, 32.0);
        assert_eq!(file.tunables, Tunables::default());
        assert_eq!(file.actors[0].reaction, ReactionTag::None);
        assert!(!file.actors[0].controlled);

        let scene = file.build().unwrap();
        assert_eq!(scene.level.solids().get(0).unwrap().position, Vec2::new(0.0, 32.0));
        assert!(scene.player().is_none());
        assert!(scene.actor("crate").is_some());
    }

    #[test]
    fn unknown_tile_name() {
        let mut file = SceneFile::prototype();
        file.solids.push(SolidSpec {
            tile: "lava".into(),
            at: Vec2::ZERO,
        });
        let err = file.build().unwrap_err();
        assert!(matches!(err, SceneError::UnknownTileName { ref tile, .. } if tile == "lava"));
        assert!(err.to_string().contains("solid #14"));
    }

    #[test]
    fn bad_tile_size() {
        let mut file = SceneFile::prototype();
        file.tile_size = 0.0;
        assert!(matches!(file.build(), Err(SceneError::InvalidTileSize(_))));
    }

    #[test]
    fn duplicate_tile_surfaces_kernel_error() {
        let mut file = SceneFile::prototype();
        let dup = file.tiles[1].clone();
        file.tiles.push(dup);
        assert!(matches!(
            file.build(),
            Err(SceneError::Kernel(KernelError::DuplicateTile(_)))
        ));
    }

    #[test]
    fn duplicate_actor_name() {
        let mut file = SceneFile::prototype();
        let dup = file.actors[0].clone();
        file.actors.push(dup);
        assert!(matches!(file.build(), Err(SceneError::DuplicateActor(_))));
    }

    #[test]
    fn instantiate_spawns_every_actor() {
        let scene = SceneFile::prototype().build().unwrap();
        let (world, spawned) = scene
            .instantiate(MovementResolver::new(AxisOrder::YThenX))
            .unwrap();
        assert_eq!(world.body_count(), 1);
        assert_eq!(spawned.len(), 1);
        assert!(spawned[0].controlled);
        assert_eq!(world.position(spawned[0].id), Some(Vec2::ZERO));
        assert_eq!(world.resolver().order(), AxisOrder::YThenX);
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        SceneFile::prototype().save(tmp.path()).unwrap();
        let scene = Scene::load(tmp.path()).unwrap();
        assert_eq!(scene.level.solids().len(), 14);
        assert_eq!(scene.tile_size, 32.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Scene::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, SceneError::Io(_)));
    }
}
