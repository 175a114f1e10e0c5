use axel_common::Aabb;

use crate::error::KernelError;
use crate::solid::{SolidInstance, SolidSet};
use crate::tile::{TileCatalog, TileKind};

/// The static half of a scene: tile catalog plus the solids placed with it.
///
/// Immutable once built. Share it by reference (or `Arc`) between actors
/// and worlds; it is not `Clone`, since tile handles are tied to this
/// level's catalog.
#[derive(Debug, Default)]
pub struct Level {
    catalog: TileCatalog,
    solids: SolidSet,
}

impl Level {
    pub fn new(
        catalog: TileCatalog,
        solids: impl IntoIterator<Item = SolidInstance>,
    ) -> Result<Self, KernelError> {
        let solids = SolidSet::build(&catalog, solids)?;
        Ok(Self { catalog, solids })
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    pub fn solids(&self) -> &SolidSet {
        &self.solids
    }

    pub fn validate(&self, kind: TileKind) -> Result<(), KernelError> {
        self.catalog.validate(kind)
    }

    /// Tile-local collider of `kind`. Fails for handles from another catalog.
    pub fn collider(&self, kind: TileKind) -> Result<Aabb, KernelError> {
        self.catalog
            .collider(kind)
            .ok_or(KernelError::UnknownTile(kind))
    }
}
