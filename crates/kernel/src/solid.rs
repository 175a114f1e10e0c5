use axel_common::Aabb;
use glam::Vec2;
use serde::Serialize;

use crate::error::KernelError;
use crate::tile::{TileCatalog, TileKind};

/// A static obstacle: a tile kind placed at a world-space pixel offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolidInstance {
    pub kind: TileKind,
    pub position: Vec2,
}

impl SolidInstance {
    pub fn new(kind: TileKind, position: Vec2) -> Self {
        Self { kind, position }
    }
}

/// Ordered, immutable set of placed solids.
///
/// Each solid's world-space collider is resolved once at construction, so
/// probing never goes back to the catalog.
#[derive(Debug, Clone, Default)]
pub struct SolidSet {
    solids: Vec<SolidInstance>,
    colliders: Vec<Aabb>,
}

impl SolidSet {
    /// Resolve `solids` against `catalog`. Fails on a handle the catalog did
    /// not issue or a non-finite position.
    pub fn build(
        catalog: &TileCatalog,
        solids: impl IntoIterator<Item = SolidInstance>,
    ) -> Result<Self, KernelError> {
        let mut set = Self::default();
        for solid in solids {
            let collider = catalog
                .collider(solid.kind)
                .ok_or(KernelError::UnknownTile(solid.kind))?;
            if !solid.position.is_finite() {
                return Err(KernelError::NonFinitePosition(solid.position));
            }
            set.colliders.push(collider.translated(solid.position));
            set.solids.push(solid);
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.solids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SolidInstance> {
        self.solids.get(index)
    }

    /// Placed solids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SolidInstance> {
        self.solids.iter()
    }

    /// World-space colliders, parallel to [`SolidSet::iter`].
    pub fn colliders(&self) -> &[Aabb] {
        &self.colliders
    }
}
