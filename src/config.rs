//! Game settings.
//!
//! Loaded from an optional JSON file; every field has a default so a partial
//! file (or none at all) is fine.  The binary layers CLI flags on top.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::{Difficulty, Edge, EnemyMotion, Hitbox, Tuning};
use crate::error::{GameError, Result};

// ── Difficulty tables ────────────────────────────────────────────────────────

fn spawn_frequency(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 120,
        Difficulty::Medium => 80,
        Difficulty::Hard => 45,
    }
}

fn enemy_speed(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 0.2,
        Difficulty::Medium => 0.3,
        Difficulty::Hard => 0.45,
    }
}

const TURN_STEP: f32 = 6.0;
const MOVE_STEP: f32 = 0.6;
const PROJECTILE_SPEED: f32 = 1.5;

const PLAYER_HITBOX: Hitbox = Hitbox::new(1.0, 1.0);
const ENEMY_HITBOX: Hitbox = Hitbox::new(1.5, 1.0);
const PROJECTILE_HITBOX: Hitbox = Hitbox::new(0.5, 0.5);

// ── Settings ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub enemy_motion: EnemyMotion,
    /// `None` picks the edges that suit `enemy_motion`.
    pub spawn_edges: Option<Vec<Edge>>,
    /// 0 means uncapped.
    pub max_projectiles: usize,
    pub fps: u32,
    /// Terminal cells are roughly twice as tall as they are wide.
    pub cell_aspect: f32,
    /// Fixed RNG seed for reproducible rounds.
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            enemy_motion: EnemyMotion::Chase,
            spawn_edges: None,
            max_projectiles: 6,
            fps: 30,
            cell_aspect: 2.0,
            seed: None,
            log_file: None,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file and validate them.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let settings: Settings =
            serde_json::from_str(&text).map_err(|source| GameError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        // Settings only holds plain data, serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=240).contains(&self.fps) {
            return Err(GameError::InvalidSetting {
                name: "fps",
                reason: format!("{} is outside 1..=240", self.fps),
            });
        }
        if !self.cell_aspect.is_finite() || self.cell_aspect <= 0.0 {
            return Err(GameError::InvalidSetting {
                name: "cell_aspect",
                reason: format!("{} must be a positive number", self.cell_aspect),
            });
        }
        if let Some(edges) = &self.spawn_edges {
            if edges.is_empty() {
                return Err(GameError::InvalidSetting {
                    name: "spawn_edges",
                    reason: "at least one edge is required".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Edges enemies spawn beyond: explicit list, or the motion's natural set.
    pub fn edges(&self) -> Vec<Edge> {
        match (&self.spawn_edges, self.enemy_motion) {
            (Some(edges), _) => {
                let mut unique = Vec::with_capacity(edges.len());
                for edge in edges {
                    if !unique.contains(edge) {
                        unique.push(*edge);
                    }
                }
                unique
            }
            (None, EnemyMotion::Descend) => vec![Edge::Top],
            (None, EnemyMotion::Chase) => Edge::ALL.to_vec(),
        }
    }

    /// Resolve the per-frame constants for a round.
    pub fn tuning(&self) -> Tuning {
        Tuning {
            turn_step: TURN_STEP,
            move_step: MOVE_STEP,
            projectile_speed: PROJECTILE_SPEED,
            enemy_speed: enemy_speed(self.difficulty),
            enemy_motion: self.enemy_motion,
            spawn_frequency: spawn_frequency(self.difficulty),
            spawn_edges: self.edges(),
            max_projectiles: self.max_projectiles,
            player_hitbox: PLAYER_HITBOX,
            enemy_hitbox: ENEMY_HITBOX,
            projectile_hitbox: PROJECTILE_HITBOX,
        }
    }
}

// ── String parsing (CLI values) ──────────────────────────────────────────────

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "med" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            _ => Err(GameError::UnknownValue {
                kind: "difficulty",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for EnemyMotion {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "descend" => Ok(EnemyMotion::Descend),
            "chase" => Ok(EnemyMotion::Chase),
            _ => Err(GameError::UnknownValue {
                kind: "enemy motion",
                value: s.to_string(),
            }),
        }
    }
}
