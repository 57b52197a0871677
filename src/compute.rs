//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, input or an RNG handle) and returns a
//! brand-new `GameState`.  Side effects are limited to the injected RNG.

use glam::Vec2;
use rand::Rng;

use crate::entities::{
    Edge, Enemy, EnemyMotion, FrameInput, GameState, GameStatus, PlayField, Player, Projectile,
    SpriteFrame, SpriteInstance, Tuning,
};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial round state: player centred and facing up, nothing else
/// on screen.  Restarting a round means calling this again.
pub fn init_state(tuning: Tuning, field: PlayField) -> GameState {
    GameState {
        player: Player {
            pos: field.center(),
            angle: 0.0,
            move_speed: tuning.move_step,
        },
        projectiles: Vec::new(),
        enemies: Vec::new(),
        field,
        tuning,
        status: GameStatus::Playing,
        frame: 0,
        score: 0,
    }
}

// ── 1. Movement ──────────────────────────────────────────────────────────────

/// Turn on left/right, thrust along the heading on up/down.
///
/// Opposing keys do not cancel: left beats right and up beats down.
pub fn move_player(state: &GameState, input: &FrameInput) -> GameState {
    let mut player = state.player.clone();

    if input.left {
        player.angle -= state.tuning.turn_step;
    } else if input.right {
        player.angle += state.tuning.turn_step;
    }
    player.angle = player.angle.rem_euclid(360.0);

    let thrust = if input.up {
        1.0
    } else if input.down {
        -1.0
    } else {
        0.0
    };
    if thrust != 0.0 {
        let next = player.pos + player.heading() * player.move_speed * thrust;
        player.pos = state.field.clamp(next);
    }

    GameState {
        player,
        ..state.clone()
    }
}

/// Fire a projectile along the player's heading, unless the live cap is hit.
pub fn fire(state: &GameState) -> GameState {
    let cap = state.tuning.max_projectiles;
    if cap != 0 && state.projectiles.len() >= cap {
        return state.clone();
    }
    let mut projectiles = state.projectiles.clone();
    projectiles.push(Projectile {
        pos: state.player.pos,
        dir: state.player.heading(),
    });
    GameState {
        projectiles,
        ..state.clone()
    }
}

// ── 2-3. Projectiles ─────────────────────────────────────────────────────────

pub fn advance_projectiles(state: &GameState) -> GameState {
    let speed = state.tuning.projectile_speed;
    let projectiles = state
        .projectiles
        .iter()
        .map(|p| Projectile {
            pos: p.pos + p.dir * speed,
            ..p.clone()
        })
        .collect();
    GameState {
        projectiles,
        ..state.clone()
    }
}

/// Drop every projectile that has left the play field on any side.
pub fn cleanup_projectiles(state: &GameState) -> GameState {
    let projectiles = state
        .projectiles
        .iter()
        .filter(|p| state.field.contains(p.pos))
        .cloned()
        .collect();
    GameState {
        projectiles,
        ..state.clone()
    }
}

// ── 4. Spawning ──────────────────────────────────────────────────────────────

/// Where a fresh enemy appears: just beyond `edge`, at a random offset along it.
fn spawn_point(field: &PlayField, tuning: &Tuning, edge: Edge, rng: &mut impl Rng) -> Vec2 {
    let hb = tuning.enemy_hitbox;
    match edge {
        Edge::Top => Vec2::new(rng.gen_range(0.0..=field.width), -hb.half_h),
        Edge::Bottom => Vec2::new(rng.gen_range(0.0..=field.width), field.height + hb.half_h),
        Edge::Left => Vec2::new(-hb.half_w, rng.gen_range(0.0..=field.height)),
        Edge::Right => Vec2::new(field.width + hb.half_w, rng.gen_range(0.0..=field.height)),
    }
}

/// Each configured edge independently spawns an enemy with chance
/// `1 / spawn_frequency`.
pub fn spawn_enemies(state: &GameState, rng: &mut impl Rng) -> GameState {
    let freq = state.tuning.spawn_frequency;
    if freq == 0 {
        return state.clone();
    }
    let mut enemies = state.enemies.clone();
    for &edge in &state.tuning.spawn_edges {
        if rng.gen_range(0..freq) == 0 {
            let pos = spawn_point(&state.field, &state.tuning, edge, rng);
            log::trace!(
                "frame {}: enemy spawned at {edge:?} ({:.1}, {:.1})",
                state.frame,
                pos.x,
                pos.y
            );
            enemies.push(Enemy { pos, alive: true });
        }
    }
    GameState {
        enemies,
        ..state.clone()
    }
}

// ── 5. Enemy movement ────────────────────────────────────────────────────────

pub fn advance_enemies(state: &GameState) -> GameState {
    let speed = state.tuning.enemy_speed;
    let target = state.player.pos;
    let enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .map(|e| {
            let step = match state.tuning.enemy_motion {
                // normalize_or_zero: an enemy sitting on the player stays put
                EnemyMotion::Chase => (target - e.pos).normalize_or_zero() * speed,
                EnemyMotion::Descend => Vec2::new(0.0, speed),
            };
            Enemy {
                pos: e.pos + step,
                ..e.clone()
            }
        })
        .collect();

    // Descending enemies never turn back; forget them once fully below the field
    let enemies = match state.tuning.enemy_motion {
        EnemyMotion::Chase => enemies,
        EnemyMotion::Descend => {
            let limit = state.field.height + state.tuning.enemy_hitbox.half_h;
            enemies.into_iter().filter(|e| e.pos.y <= limit).collect()
        }
    };

    GameState {
        enemies,
        ..state.clone()
    }
}

// ── 6. Collisions ────────────────────────────────────────────────────────────

/// Resolve projectile↔enemy hits, then enemy↔player contact.
///
/// Hits are many-to-many: every alive enemy touching any projectile dies and
/// every projectile touching any alive enemy is spent, all in one pass.
pub fn resolve_collisions(state: &GameState) -> GameState {
    let tuning = &state.tuning;

    let enemy_boxes: Vec<_> = state
        .enemies
        .iter()
        .map(|e| tuning.enemy_hitbox.at(e.pos))
        .collect();
    let projectile_boxes: Vec<_> = state
        .projectiles
        .iter()
        .map(|p| tuning.projectile_hitbox.at(p.pos))
        .collect();

    let enemy_hit: Vec<bool> = state
        .enemies
        .iter()
        .zip(&enemy_boxes)
        .map(|(e, eb)| e.alive && projectile_boxes.iter().any(|pb| pb.overlaps(eb)))
        .collect();
    let projectile_hit: Vec<bool> = projectile_boxes
        .iter()
        .map(|pb| {
            state
                .enemies
                .iter()
                .zip(&enemy_boxes)
                .any(|(e, eb)| e.alive && eb.overlaps(pb))
        })
        .collect();

    let kills = enemy_hit.iter().filter(|&&hit| hit).count() as u32;
    if kills > 0 {
        log::debug!("frame {}: {kills} enemies destroyed", state.frame);
    }

    let projectiles: Vec<Projectile> = state
        .projectiles
        .iter()
        .zip(&projectile_hit)
        .filter(|(_, hit)| !**hit)
        .map(|(p, _)| p.clone())
        .collect();

    // Survivors of the projectile pass; dead enemies are purged here
    let survivors: Vec<Enemy> = state
        .enemies
        .iter()
        .zip(&enemy_hit)
        .filter(|(e, hit)| e.alive && !**hit)
        .map(|(e, _)| e.clone())
        .collect();

    let player_box = tuning.player_hitbox.at(state.player.pos);
    let (touching, enemies): (Vec<Enemy>, Vec<Enemy>) = survivors
        .into_iter()
        .partition(|e| tuning.enemy_hitbox.at(e.pos).overlaps(&player_box));

    let status = if touching.is_empty() {
        state.status
    } else {
        log::info!(
            "frame {}: player caught by {} enemies, score {}",
            state.frame,
            touching.len(),
            state.score + kills
        );
        GameStatus::GameOver
    };

    GameState {
        projectiles,
        enemies,
        status,
        score: state.score + kills,
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure, RNG is injected) ──────────────────────────

/// Advance the round by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// A finished round is returned untouched.
pub fn tick(state: &GameState, input: &FrameInput, rng: &mut impl Rng) -> GameState {
    if state.status == GameStatus::GameOver {
        return state.clone();
    }

    let mut next = GameState {
        frame: state.frame + 1,
        ..state.clone()
    };

    next = move_player(&next, input);
    if input.fire {
        next = fire(&next);
    }
    next = advance_projectiles(&next);
    next = cleanup_projectiles(&next);
    next = spawn_enemies(&next, rng);
    next = advance_enemies(&next);
    resolve_collisions(&next)
}

// ── Render surface ───────────────────────────────────────────────────────────

/// Everything the adapter has to draw this frame, player last so it sits on top.
pub fn sprites(state: &GameState) -> Vec<SpriteInstance> {
    let enemies = state.enemies.iter().filter(|e| e.alive).map(|e| SpriteInstance {
        pos: e.pos,
        angle: 0.0,
        frame: SpriteFrame::Enemy,
    });
    let projectiles = state.projectiles.iter().map(|p| SpriteInstance {
        pos: p.pos,
        angle: p.dir.y.atan2(p.dir.x).to_degrees() + 90.0,
        frame: SpriteFrame::Projectile,
    });
    let player = std::iter::once(SpriteInstance {
        pos: state.player.pos,
        angle: state.player.angle,
        frame: SpriteFrame::Player,
    });
    enemies.chain(projectiles).chain(player).collect()
}
