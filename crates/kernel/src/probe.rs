//! Collision probes. Pure and brute force: every call scans the whole
//! solid set, which is fine for hand-built tile scenes.

use axel_common::Aabb;
use glam::Vec2;

use crate::actor::Actor;
use crate::error::KernelError;
use crate::level::Level;
use crate::solid::SolidSet;

/// Does the world-space `collider` strictly overlap any solid?
#[inline]
pub fn overlaps(collider: &Aabb, solids: &SolidSet) -> bool {
    solids.colliders().iter().any(|s| collider.overlaps(s))
}

/// Would `actor` overlap a solid if it stood at `candidate`?
///
/// Fails with `UnknownTile` if the actor's kind is not from this level.
pub fn collides_at(level: &Level, actor: &Actor, candidate: Vec2) -> Result<bool, KernelError> {
    let collider = level.collider(actor.kind())?.translated(candidate);
    Ok(overlaps(&collider, level.solids()))
}

/// Is a solid flush under the actor? Probes one pixel below its position.
pub fn is_grounded(level: &Level, actor: &Actor) -> Result<bool, KernelError> {
    collides_at(level, actor, actor.position + Vec2::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reaction::ReactionTag;
    use crate::solid::SolidInstance;
    use crate::tile::{TileCatalog, TileKind, VisualRef};

    const TILE: f32 = 32.0;

    fn tiles() -> (TileCatalog, TileKind, TileKind) {
        let mut catalog = TileCatalog::new();
        let player = catalog
            .register("player", Aabb::new(3.0, 0.0, 26.0, TILE), VisualRef::default())
            .unwrap();
        let block = catalog
            .register("block", Aabb::new(0.0, 0.0, TILE, TILE), VisualRef::default())
            .unwrap();
        (catalog, player, block)
    }

    fn level_with(positions: &[Vec2]) -> (Level, TileKind) {
        let (catalog, player, block) = tiles();
        let solids: Vec<_> = positions
            .iter()
            .map(|&p| SolidInstance::new(block, p))
            .collect();
        (Level::new(catalog, solids).unwrap(), player)
    }

    #[test]
    fn empty_level_never_collides() {
        let (level, player) = level_with(&[]);
        let actor = Actor::new(player, Vec2::ZERO, ReactionTag::None);
        assert!(!collides_at(&level, &actor, Vec2::new(1000.0, -1000.0)).unwrap());
        assert!(!is_grounded(&level, &actor).unwrap());
    }

    #[test]
    fn overlap_detected_inside_solid() {
        let (level, player) = level_with(&[Vec2::new(0.0, TILE)]);
        let actor = Actor::new(player, Vec2::ZERO, ReactionTag::None);
        assert!(collides_at(&level, &actor, Vec2::new(0.0, 1.0)).unwrap());
        assert!(collides_at(&level, &actor, Vec2::new(10.0, 20.0)).unwrap());
    }

    #[test]
    fn collider_offset_is_respected() {
        // Player collider spans x in [3, 29). A block whose left edge is at 29
        // only touches it.
        let (level, player) = level_with(&[Vec2::new(29.0, 0.0)]);
        let actor = Actor::new(player, Vec2::ZERO, ReactionTag::None);
        assert!(!collides_at(&level, &actor, Vec2::ZERO).unwrap());
        assert!(collides_at(&level, &actor, Vec2::new(1.0, 0.0)).unwrap());
    }

    #[test]
    fn grounded_only_when_flush() {
        let (level, player) = level_with(&[Vec2::new(0.0, TILE)]);
        let standing = Actor::new(player, Vec2::ZERO, ReactionTag::None);
        assert!(is_grounded(&level, &standing).unwrap());

        let hovering = Actor::new(player, Vec2::new(0.0, -1.0), ReactionTag::None);
        assert!(!is_grounded(&level, &hovering).unwrap());

        let high = Actor::new(player, Vec2::new(0.0, -5.0), ReactionTag::None);
        assert!(!is_grounded(&level, &high).unwrap());
    }

    #[test]
    fn grounded_ignores_solid_beside() {
        // Block to the right at the same height: touching the side is not ground.
        let (level, player) = level_with(&[Vec2::new(29.0, 0.0)]);
        let actor = Actor::new(player, Vec2::ZERO, ReactionTag::None);
        assert!(!is_grounded(&level, &actor).unwrap());
    }

    #[test]
    fn solid_order_does_not_change_results() {
        let base = [
            Vec2::new(0.0, TILE),
            Vec2::new(TILE, TILE),
            Vec2::new(3.0 * TILE, 0.0),
            Vec2::new(TILE, -1.5 * TILE),
            Vec2::new(-4.0 * TILE, -TILE),
        ];
        let mut orders: Vec<Vec<Vec2>> = vec![base.to_vec()];
        let mut reversed = base.to_vec();
        reversed.reverse();
        orders.push(reversed);
        for r in 1..base.len() {
            let mut rotated = base.to_vec();
            rotated.rotate_left(r);
            orders.push(rotated);
        }

        let candidates: Vec<Vec2> = (-6..6)
            .flat_map(|i| (-4..3).map(move |j| Vec2::new(i as f32 * 13.0, j as f32 * 11.0)))
            .collect();

        let (reference, player) = level_with(&base);
        let actor = Actor::new(player, Vec2::ZERO, ReactionTag::None);
        let expected: Vec<bool> = candidates
            .iter()
            .map(|&c| collides_at(&reference, &actor, c).unwrap())
            .collect();
        assert!(expected.iter().any(|&b| b));
        assert!(expected.iter().any(|&b| !b));

        for order in &orders {
            let (level, _) = level_with(order);
            let got: Vec<bool> = candidates
                .iter()
                .map(|&c| collides_at(&level, &actor, c).unwrap())
                .collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn foreign_actor_kind_is_an_error() {
        let (level, _) = level_with(&[Vec2::new(0.0, TILE)]);
        let mut other = TileCatalog::new();
        let foreign = other
            .register("pebble", Aabb::new(0.0, 0.0, 1.0, 1.0), VisualRef::default())
            .unwrap();
        let actor = Actor::new(foreign, Vec2::ZERO, ReactionTag::None);
        assert!(matches!(
            collides_at(&level, &actor, Vec2::ZERO),
            Err(KernelError::UnknownTile(k)) if k == foreign
        ));
        assert!(is_grounded(&level, &actor).is_err());
    }
}
