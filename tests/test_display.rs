use glam::Vec2;

use swarm_shooter::compute::{init_state, move_player};
use swarm_shooter::config::Settings;
use swarm_shooter::display::*;
use swarm_shooter::entities::*;
use swarm_shooter::error::GameError;

fn view() -> Viewport {
    Viewport::new(42, 24, 2.0).unwrap()
}

fn make_state() -> GameState {
    init_state(Settings::default().tuning(), view().field())
}

fn render_to_string(state: &GameState) -> String {
    let mut buf: Vec<u8> = Vec::new();
    render(&mut buf, state, &view()).unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

// ── Viewport ──────────────────────────────────────────────────────────────────

#[test]
fn tiny_terminal_rejected() {
    assert!(matches!(
        Viewport::new(10, 24, 2.0),
        Err(GameError::TerminalTooSmall {
            width: 10,
            height: 24
        })
    ));
    assert!(Viewport::new(80, 5, 2.0).is_err());
}

#[test]
fn field_covers_interior() {
    let f = view().field();
    assert_eq!(f.width, 40.0); // 42 - 2 border columns
    assert_eq!(f.height, 40.0); // (24 - 4) rows * 2.0
}

#[test]
fn cell_mapping() {
    let v = view();
    assert_eq!(v.cell(Vec2::new(0.0, 0.0)), Some((1, 2)));
    assert_eq!(v.cell(Vec2::new(10.5, 7.9)), Some((11, 5)));
    assert_eq!(v.cell(Vec2::new(39.9, 39.9)), Some((40, 21)));
}

#[test]
fn cells_outside_interior_skipped() {
    let v = view();
    assert_eq!(v.cell(Vec2::new(-0.5, 5.0)), None);
    assert_eq!(v.cell(Vec2::new(5.0, -1.0)), None);
    assert_eq!(v.cell(Vec2::new(40.5, 5.0)), None);
    assert_eq!(v.cell(Vec2::new(5.0, 41.0)), None);
}

#[test]
fn far_edges_fold_into_last_interior_cell() {
    let v = view();
    assert_eq!(v.cell(Vec2::new(40.0, 5.0)), Some((40, 4)));
    assert_eq!(v.cell(Vec2::new(5.0, 40.0)), Some((6, 21)));
    assert_eq!(v.cell(Vec2::new(40.0, 40.0)), Some((40, 21)));

    let small = Viewport::new(40, 20, 2.0).unwrap();
    let f = small.field();
    assert_eq!(small.cell(Vec2::new(f.width, f.height)), Some((38, 17)));
}

#[test]
fn heading_glyphs() {
    assert_eq!(heading_glyph(0.0), '↑');
    assert_eq!(heading_glyph(90.0), '→');
    assert_eq!(heading_glyph(180.0), '↓');
    assert_eq!(heading_glyph(270.0), '←');
    assert_eq!(heading_glyph(350.0), '↑');
    assert_eq!(heading_glyph(-45.0), '↖');
}

// ── render ────────────────────────────────────────────────────────────────────

#[test]
fn render_playing_frame() {
    let mut s = make_state();
    s.enemies.push(Enemy {
        pos: Vec2::new(5.0, 5.0),
        alive: true,
    });
    s.projectiles.push(Projectile {
        pos: Vec2::new(20.0, 10.0),
        dir: Vec2::new(0.0, -1.0),
    });
    let out = render_to_string(&s);
    assert!(out.contains("Score:"));
    assert!(out.contains("Shots:1/6"));
    assert!(out.contains("[ CHASE ]"));
    assert!(out.contains('↑'));
    assert!(out.contains('▼'));
    assert!(out.contains('•'));
    assert!(!out.contains(GAME_OVER_MESSAGE));
}

#[test]
fn render_game_over_overlay() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    s.score = 12;
    let out = render_to_string(&s);
    assert!(out.contains(GAME_OVER_MESSAGE));
    assert!(out.contains("Final Score:    12"));
    assert!(out.contains("R - Restart"));
}

#[test]
fn render_uncapped_shot_counter() {
    let mut s = make_state();
    s.tuning.max_projectiles = 0;
    let out = render_to_string(&s);
    assert!(out.contains("Shots:0"));
    assert!(!out.contains("Shots:0/"));
}

#[test]
fn offscreen_enemy_not_drawn() {
    let mut s = make_state();
    s.enemies.push(Enemy {
        pos: Vec2::new(-5.0, -5.0),
        alive: true,
    });
    let out = render_to_string(&s);
    assert!(!out.contains('▼'));
}

#[test]
fn player_clamped_to_far_corner_is_drawn() {
    let mut s = make_state();
    s.player.angle = 135.0;
    let thrust = FrameInput {
        up: true,
        ..Default::default()
    };
    for _ in 0..200 {
        s = move_player(&s, &thrust);
    }
    assert_eq!(s.player.pos, Vec2::new(s.field.width, s.field.height));
    assert_eq!(view().cell(s.player.pos), Some((40, 21)));

    let out = render_to_string(&s);
    assert!(out.contains('↘'));
}

#[test]
fn projectile_on_far_edge_is_drawn() {
    let mut s = make_state();
    s.projectiles.push(Projectile {
        pos: Vec2::new(s.field.width, 10.0),
        dir: Vec2::new(1.0, 0.0),
    });
    let out = render_to_string(&s);
    assert!(out.contains('•'));
}
