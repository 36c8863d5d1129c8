//! Projectile collision resolution
//!
//! Two independent passes per tick: projectiles against blocks, then the
//! surviving projectiles against power-ups. Everything is axis-aligned
//! rectangle overlap.

use super::state::{Block, PowerUp, Projectile};

/// What a collision pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// IDs of blocks that took a hit (once per hit)
    pub blocks_hit: Vec<u32>,
    /// IDs of blocks whose resistance reached zero
    pub blocks_destroyed: Vec<u32>,
    /// Number of power-ups picked up
    pub powerups_collected: u32,
}

impl CollisionReport {
    pub fn is_empty(&self) -> bool {
        self.blocks_hit.is_empty() && self.powerups_collected == 0
    }
}

/// Resolve projectile hits against blocks.
///
/// Each projectile damages at most the first live block it overlaps and is
/// consumed by it. Destroyed blocks are removed before returning.
pub fn resolve_block_hits(
    projectiles: &mut Vec<Projectile>,
    blocks: &mut Vec<Block>,
    report: &mut CollisionReport,
) {
    if blocks.is_empty() {
        return;
    }

    projectiles.retain(|projectile| {
        let rect = projectile.rect();
        let Some(block) = blocks
            .iter_mut()
            .find(|b| !b.is_destroyed() && b.rect().overlaps(&rect))
        else {
            return true;
        };

        report.blocks_hit.push(block.id);
        if block.hit() {
            report.blocks_destroyed.push(block.id);
        }
        false
    });

    blocks.retain(|b| !b.is_destroyed());
}

/// Resolve pickups: every power-up a projectile touches is collected and the
/// projectile keeps flying.
pub fn resolve_powerup_pickups(
    projectiles: &[Projectile],
    powerups: &mut Vec<PowerUp>,
    report: &mut CollisionReport,
) {
    if projectiles.is_empty() {
        return;
    }

    let before = powerups.len();
    powerups.retain(|powerup| {
        let rect = powerup.rect();
        !projectiles.iter().any(|p| p.rect().overlaps(&rect))
    });
    report.powerups_collected += (before - powerups.len()) as u32;
}

/// Run both passes in order
pub fn resolve_collisions(
    projectiles: &mut Vec<Projectile>,
    blocks: &mut Vec<Block>,
    powerups: &mut Vec<PowerUp>,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    resolve_block_hits(projectiles, blocks, &mut report);
    resolve_powerup_pickups(projectiles, powerups, &mut report);
    report
}
