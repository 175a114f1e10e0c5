use axel_common::Aabb;
use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::KernelError;

static NEXT_CATALOG_ID: AtomicU32 = AtomicU32::new(0);

fn next_catalog_id() -> u32 {
    NEXT_CATALOG_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a tile definition.
///
/// Only [`TileCatalog::register`] creates these. Each handle carries the id
/// of the catalog that issued it, and a catalog never drops entries, so a
/// handle resolves in exactly one catalog and always succeeds there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileKind {
    #[serde(skip)]
    catalog: u32,
    index: u16,
}

impl TileKind {
    /// Position of this kind in its catalog.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// Opaque visual reference (an image path). The engine never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct VisualRef(pub String);

/// Collider and visual for one tile kind. Collider is tile-local.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileDefinition {
    pub name: String,
    pub collider: Aabb,
    pub visual: VisualRef,
}

/// Append-only table of tile definitions.
///
/// Every catalog, clones included, gets its own id; handles from one catalog
/// are rejected by every other.
#[derive(Debug)]
pub struct TileCatalog {
    id: u32,
    tiles: Vec<TileDefinition>,
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self {
            id: next_catalog_id(),
            tiles: Vec::new(),
        }
    }
}

impl Clone for TileCatalog {
    fn clone(&self) -> Self {
        Self {
            id: next_catalog_id(),
            tiles: self.tiles.clone(),
        }
    }
}

impl TileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, index: usize) -> TileKind {
        TileKind {
            catalog: self.id,
            index: index as u16,
        }
    }

    /// Add a tile kind. Names are unique and colliders must have positive size.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        collider: Aabb,
        visual: VisualRef,
    ) -> Result<TileKind, KernelError> {
        let name = name.into();
        if !collider.is_valid() {
            return Err(KernelError::InvalidCollider { name, collider });
        }
        if self.by_name(&name).is_some() {
            return Err(KernelError::DuplicateTile(name));
        }
        let index = self.tiles.len();
        if u16::try_from(index).is_err() {
            return Err(KernelError::CatalogFull(index));
        }
        self.tiles.push(TileDefinition {
            name,
            collider,
            visual,
        });
        Ok(self.handle(index))
    }

    /// Whether `kind` was issued by this catalog.
    pub fn contains(&self, kind: TileKind) -> bool {
        kind.catalog == self.id && kind.index() < self.tiles.len()
    }

    /// Returns `UnknownTile` for handles this catalog did not issue.
    pub fn validate(&self, kind: TileKind) -> Result<(), KernelError> {
        if self.contains(kind) {
            Ok(())
        } else {
            Err(KernelError::UnknownTile(kind))
        }
    }

    pub fn get(&self, kind: TileKind) -> Option<&TileDefinition> {
        if kind.catalog != self.id {
            return None;
        }
        self.tiles.get(kind.index())
    }

    /// Tile-local collider of `kind`, or `None` for a foreign handle.
    pub fn collider(&self, kind: TileKind) -> Option<Aabb> {
        self.get(kind).map(|t| t.collider)
    }

    pub fn by_name(&self, name: &str) -> Option<TileKind> {
        self.tiles
            .iter()
            .position(|t| t.name == name)
            .map(|i| self.handle(i))
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileKind, &TileDefinition)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, t)| (self.handle(i), t))
    }
}
