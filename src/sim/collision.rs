//! Collision detection and outcome resolution
//!
//! One pass per active tick, in a fixed priority per missile:
//! barrier first, then the formation, then the stray. Each missile affects
//! at most one target (the first one found), so a single shot can never
//! score twice. Removals use `retain`, never index juggling.

use super::effects::{Explosion, ExplosionKind, ScoreBubble};
use super::formation::EnemyKind;
use super::state::Playfield;
use crate::audio::SoundEffect;
use crate::consts::CONTACT_DAMAGE;

/// Rules in force for this pass
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext {
    pub level: u32,
    /// False while cheat mode is on
    pub award_points: bool,
    /// Player can be damaged (not already exploding)
    pub player_vulnerable: bool,
    pub explosions: bool,
    pub score_bubbles: bool,
}

/// What happened during a pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    pub sounds: Vec<SoundEffect>,
    /// Formation ships destroyed
    pub kills: u32,
    pub stray_destroyed: bool,
    pub barriers_destroyed: u32,
    pub points: u64,
    /// Damage landed on the player
    pub player_hit: bool,
    /// Health ran out this pass
    pub player_destroyed: bool,
    /// A ship slipped past the left edge
    pub invaded: bool,
}

/// Resolve every collision on the playfield
pub fn resolve(field: &mut Playfield, ctx: &ResolveContext) -> CollisionReport {
    let mut report = CollisionReport::default();
    resolve_player_missiles(field, ctx, &mut report);
    resolve_enemy_missiles(field, ctx, &mut report);
    resolve_contact(field, ctx, &mut report);
    report.invaded = field.formation.invaded();
    report
}

fn resolve_player_missiles(field: &mut Playfield, ctx: &ResolveContext, report: &mut CollisionReport) {
    let Playfield {
        player,
        formation,
        player_missiles,
        barriers,
        stray,
        explosions,
        score_bubbles,
        ..
    } = field;

    let mut award = |kind: EnemyKind, at: glam::Vec2, report: &mut CollisionReport| {
        let points = kind.points(ctx.level);
        let (explosion, sound, bubble_offset) = match kind {
            EnemyKind::Stray => {
                // Keep the bubble inside the playfield
                let dx = if at.x < 300.0 { 20.0 } else { -10.0 };
                (ExplosionKind::Stray, SoundEffect::ExplosionStray, glam::Vec2::new(dx, 30.0))
            }
            EnemyKind::Rank(_) => (ExplosionKind::Ship, SoundEffect::Explosion, glam::Vec2::new(10.0, 0.0)),
        };
        if ctx.explosions {
            explosions.push(Explosion::new(explosion, at));
        }
        if ctx.score_bubbles {
            score_bubbles.push(ScoreBubble::new(points, at + bubble_offset));
        }
        if ctx.award_points {
            player.score += points;
            report.points += points;
        }
        report.sounds.push(sound);
    };

    player_missiles.retain(|missile| {
        // 1. Barriers block the shot
        if let Some(idx) = barriers.iter().position(|b| missile.entity.intersects(b)) {
            barriers.remove(idx);
            report.barriers_destroyed += 1;
            return false;
        }

        // 2. First live formation ship
        if let Some(ship) = formation
            .ships
            .iter_mut()
            .find(|s| !s.dead && missile.entity.intersects(&s.entity))
        {
            ship.kill();
            let (kind, at) = (ship.kind, ship.pos());
            award(kind, at, report);
            formation.record_kill();
            report.kills += 1;
            log::debug!("Ship destroyed at {:?} ({} kills)", at, formation.kills());
            return false;
        }

        // 3. Stray
        if let Some(ship) = stray.ship.as_ref().filter(|s| missile.entity.intersects(&s.entity)) {
            let (kind, at) = (ship.kind, ship.pos());
            stray.clear();
            award(kind, at, report);
            report.stray_destroyed = true;
            log::debug!("Stray destroyed at {:?}", at);
            return false;
        }

        true
    });

    formation.remove_dead();
}

fn resolve_enemy_missiles(field: &mut Playfield, ctx: &ResolveContext, report: &mut CollisionReport) {
    let Playfield {
        player,
        enemy_missiles,
        barriers,
        explosions,
        ..
    } = field;

    enemy_missiles.retain(|missile| {
        // 4. Barriers
        if let Some(idx) = barriers.iter().position(|b| missile.entity.intersects(b)) {
            barriers.remove(idx);
            report.barriers_destroyed += 1;
            return false;
        }

        // 5. Player; the missile is absorbed even while flinching
        if ctx.player_vulnerable && !report.player_destroyed && missile.entity.intersects(&player.entity) {
            if player.hit(missile.damage) {
                report.player_hit = true;
                if player.is_destroyed() {
                    report.player_destroyed = true;
                    if ctx.explosions {
                        explosions.push(Explosion::new(ExplosionKind::Player, player.pos()));
                    }
                    report.sounds.push(SoundEffect::ExplosionPlayer);
                }
            }
            return false;
        }

        true
    });
}

/// 6. Formation ships ramming the player
fn resolve_contact(field: &mut Playfield, ctx: &ResolveContext, report: &mut CollisionReport) {
    if !ctx.player_vulnerable || report.player_destroyed {
        return;
    }
    let Playfield {
        player,
        formation,
        explosions,
        ..
    } = field;

    let rammed = formation
        .ships
        .iter()
        .any(|s| !s.dead && s.entity.intersects(&player.entity));
    if rammed && player.hit(CONTACT_DAMAGE) {
        report.player_hit = true;
        if player.is_destroyed() {
            report.player_destroyed = true;
            if ctx.explosions {
                explosions.push(Explosion::new(ExplosionKind::Player, player.pos()));
            }
            report.sounds.push(SoundEffect::ExplosionPlayer);
        }
    }
}
