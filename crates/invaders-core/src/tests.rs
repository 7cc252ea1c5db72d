use glam::Vec2;

use crate::config::{ConfigError, SimConfig};
use crate::enums::*;
use crate::events::GameEvent;
use crate::sinks::{ChannelSink, Collaborators, FixedAmmo};
use crate::state::{ColumnView, EnemyView, FormationSnapshot};
use crate::types::{ProjectileId, Viewport, XRange};

// ---- Types ----

#[test]
fn test_x_range_contains_is_inclusive() {
    let range = XRange::around(10.0, 5.0);
    assert_eq!(range, XRange::new(5.0, 15.0));
    assert!(range.contains(5.0));
    assert!(range.contains(15.0));
    assert!(range.contains(10.0));
    assert!(!range.contains(4.99));
    assert!(!range.contains(15.01));
}

#[test]
fn test_viewport_vertical_bounds() {
    let viewport = Viewport::new(100.0, 200.0);
    assert!(!viewport.is_vertically_outside(Vec2::new(50.0, 0.0)));
    assert!(!viewport.is_vertically_outside(Vec2::new(50.0, 200.0)));
    assert!(viewport.is_vertically_outside(Vec2::new(50.0, -1.0)));
    assert!(viewport.is_vertically_outside(Vec2::new(50.0, 201.0)));
}

#[test]
fn test_projectile_id_display() {
    assert_eq!(ProjectileId(7).to_string(), "projectile#7");
}

// ---- Enums ----

#[test]
fn test_hit_state_explosion_runs_out() {
    let mut state = HitState::Exploding { frames_left: 2 };
    state = state.advance();
    assert_eq!(state, HitState::Exploding { frames_left: 1 });
    state = state.advance();
    assert_eq!(state, HitState::Destroyed);
    assert_eq!(state.advance(), HitState::Destroyed);
    assert_eq!(HitState::Alive.advance(), HitState::Alive);
}

#[test]
fn test_hit_state_serde() {
    let variants = vec![
        HitState::Alive,
        HitState::Exploding { frames_left: 3 },
        HitState::Destroyed,
    ];
    for v in variants {
        let json = serde_json::to_string(&v).unwrap();
        let back: HitState = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}

// ---- Events ----

#[test]
fn test_game_event_tagged_json() {
    let event = GameEvent::Collision {
        projectile: ProjectileId(3),
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"Collision\""), "got {json}");

    let back: GameEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn test_channel_sink_forwards_events() {
    let (sink, rx) = ChannelSink::new();
    let collaborators = Collaborators::from_sink(sink.clone(), std::sync::Arc::new(FixedAmmo(9)));

    collaborators.events.on_canon_ready(1.0, 2.0);
    collaborators.events.on_game_over();
    collaborators.collisions.on_collision(ProjectileId(4));
    collaborators
        .events
        .on_all_eliminated(collaborators.ammo.ammo_count());
    collaborators.haptics.vibrate(64, Some(48));
    collaborators.redraw.request_redraw();

    let events: Vec<GameEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            GameEvent::CanonReady { x: 1.0, y: 2.0 },
            GameEvent::GameOver,
            GameEvent::Collision {
                projectile: ProjectileId(4)
            },
            GameEvent::AllEliminated { ammo_count: 9 },
        ]
    );
    assert_eq!(sink.vibrations().len(), 1);
    assert_eq!(sink.vibrations()[0].amplitude, Some(48));
    assert_eq!(sink.redraw_count(), 1);
}

#[test]
fn test_silent_collaborators_report_no_ammo() {
    let collaborators = Collaborators::silent();
    collaborators.events.on_game_over();
    assert_eq!(collaborators.ammo.ammo_count(), 0);
}

// ---- Config ----

#[test]
fn test_config_defaults() {
    let config = SimConfig::default();
    assert_eq!(config.column_count, 6);
    assert_eq!(config.row_count, 4);
    assert_eq!(config.fire_interval().as_millis(), 1000);
    assert_eq!(config.fire_initial_delay().as_millis(), 200);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_partial_toml_keeps_defaults() {
    let config = SimConfig::from_toml_str("column_count = 3\nspeed = 4.5\n").unwrap();
    assert_eq!(config.column_count, 3);
    assert_eq!(config.speed, 4.5);
    assert_eq!(config.row_count, SimConfig::default().row_count);
}

#[test]
fn test_config_toml_round_trip() {
    let config = SimConfig {
        seed: 99,
        ..Default::default()
    };
    let text = config.to_toml_string().unwrap();
    assert_eq!(SimConfig::from_toml_str(&text).unwrap(), config);
}

#[test]
fn test_config_rejects_zero_intervals() {
    let err = SimConfig::from_toml_str("motion_tick_ms = 0").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidInterval("motion_tick_ms")));

    let err = SimConfig::from_toml_str("fire_interval_ms = 0").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidInterval("fire_interval_ms")));
}

#[test]
fn test_config_accepts_empty_formation() {
    let config = SimConfig::from_toml_str("column_count = 0").unwrap();
    assert_eq!(config.column_count, 0);
}

#[test]
fn test_config_parse_error() {
    let err = SimConfig::from_toml_str("column_count = \"many\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_config_missing_file_is_io_error() {
    let err = SimConfig::load("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

// ---- Snapshot ----

#[test]
fn test_snapshot_visible_count() {
    let enemy = |index, visible| EnemyView {
        index,
        position: Vec2::new(10.0, 10.0 * index as f32),
        radius: 5.0,
        visible,
        hit_state: if visible {
            HitState::Alive
        } else {
            HitState::Destroyed
        },
    };
    let snapshot = FormationSnapshot {
        columns: vec![ColumnView {
            x_range: XRange::new(5.0, 15.0),
            enemies: vec![enemy(0, true), enemy(1, false), enemy(2, true)],
        }],
        ..Default::default()
    };
    assert_eq!(snapshot.visible_count(), 2);

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: FormationSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.visible_count(), 2);
}

// ---- Commands ----

#[test]
fn test_player_command_serde() {
    let variants = vec![
        crate::commands::PlayerCommand::Resize {
            width: 600.0,
            height: 1000.0,
        },
        crate::commands::PlayerCommand::StartGame,
        crate::commands::PlayerCommand::Fire { x: 12.5 },
        crate::commands::PlayerCommand::CollectAmmo { rounds: 5 },
    ];
    for v in variants {
        let json = serde_json::to_string(&v).unwrap();
        let back: crate::commands::PlayerCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
