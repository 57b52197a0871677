//! All game entity types: pure data, no per-frame logic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyMotion {
    /// Fixed downward velocity, independent of the player.
    Descend,
    /// Constant-speed homing on the player's current position.
    #[default]
    Chase,
}

/// Screen edge an enemy can spawn beyond.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Half-extents of an axis-aligned hitbox, centred on the entity position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    pub half_w: f32,
    pub half_h: f32,
}

impl Hitbox {
    pub const fn new(half_w: f32, half_h: f32) -> Self {
        Self { half_w, half_h }
    }

    pub fn at(&self, pos: Vec2) -> Aabb {
        let half = Vec2::new(self.half_w, self.half_h);
        Aabb {
            min: pos - half,
            max: pos + half,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Playable area in world units. Origin is the top-left corner, y grows down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl PlayField {
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        pos.clamp(Vec2::ZERO, Vec2::new(self.width, self.height))
    }
}

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Every constant the round loop reads.  Built from `config::Settings`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    /// Degrees turned per frame while left/right is held.
    pub turn_step: f32,
    /// World units moved per frame while up/down is held.
    pub move_step: f32,
    pub projectile_speed: f32,
    pub enemy_speed: f32,
    pub enemy_motion: EnemyMotion,
    /// Per-edge spawn chance is `1 / spawn_frequency`; 0 disables spawning.
    pub spawn_frequency: u32,
    pub spawn_edges: Vec<Edge>,
    /// Live projectile cap; 0 means uncapped.
    pub max_projectiles: usize,
    pub player_hitbox: Hitbox,
    pub enemy_hitbox: Hitbox,
    pub projectile_hitbox: Hitbox,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Input signals sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// One-shot: set for exactly one frame per fire key press.
    pub fire: bool,
}

// ── Player, projectiles & enemies ─────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Degrees, 0 = facing up, clockwise positive.
    pub angle: f32,
    pub move_speed: f32,
}

impl Player {
    /// Unit vector the player is facing.
    pub fn heading(&self) -> Vec2 {
        let rad = self.angle.to_radians();
        Vec2::new(rad.sin(), -rad.cos())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Unit direction captured from the player's heading when fired.
    pub dir: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub alive: bool,
}

// ── Render surface ────────────────────────────────────────────────────────────

/// Frame index into the sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteFrame {
    Enemy = 0,
    Projectile = 7,
    Player = 8,
}

/// What the adapter is asked to draw: a frame at a position and orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteInstance {
    pub pos: Vec2,
    pub angle: f32,
    pub frame: SpriteFrame,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire round state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub field: PlayField,
    pub tuning: Tuning,
    pub status: GameStatus,
    pub frame: u64,
    /// Enemies destroyed this round.
    pub score: u32,
}
