//! End-to-end wave sessions driven through the public API.

use std::sync::Arc;
use std::time::Duration;

use invaders_sim::ammo::AmmoStore;
use invaders_sim::core::config::SimConfig;
use invaders_sim::core::events::GameEvent;
use invaders_sim::core::sinks::{AmmoSource, ChannelSink, Collaborators};
use invaders_sim::core::types::ProjectileId;
use invaders_sim::stream::position_channel;
use invaders_sim::timer::ManualTicker;
use invaders_sim::WaveSimulation;

const WAIT: Duration = Duration::from_secs(2);

#[test]
fn clearing_every_enemy_reports_wave_clear_once() {
    let (sink, rx) = ChannelSink::new();
    let ammo = Arc::new(AmmoStore::new(30));
    let mut sim = WaveSimulation::new(
        SimConfig::default(),
        Collaborators::from_sink(sink, ammo.clone()),
    );
    sim.on_viewport_sized(600.0, 1000.0);

    let (motion, _motion_ticks) = ManualTicker::new();
    let (fire, _fire_ticks) = ManualTicker::new();
    sim.start_with(motion, fire).unwrap();

    let targets: Vec<_> = sim
        .snapshot()
        .columns
        .iter()
        .flat_map(|c| c.enemies.iter().map(|e| e.position))
        .collect();
    assert_eq!(targets.len(), 24);

    let mut senders = Vec::new();
    for (i, target) in targets.into_iter().enumerate() {
        assert!(ammo.consume());
        let id = ProjectileId(i as u64);
        let (tx, positions) = position_channel(target);
        sim.track_projectile(id, positions).unwrap();
        senders.push(tx);
        assert_eq!(
            rx.recv_timeout(WAIT).unwrap(),
            GameEvent::Collision { projectile: id }
        );
    }

    assert_eq!(
        rx.recv_timeout(WAIT).unwrap(),
        GameEvent::AllEliminated {
            ammo_count: ammo.ammo_count()
        }
    );
    assert_eq!(ammo.ammo_count(), 6);
    assert!(rx.recv_timeout(Duration::from_millis(150)).is_err());

    let snapshot = sim.snapshot();
    assert_eq!(snapshot.visible_count(), 0);
    assert!(snapshot.wave_cleared);
    assert_eq!(sim.collision().tracked_count(), 0);

    sim.reset_wave();
    assert_eq!(sim.snapshot().visible_count(), 24);
    sim.detach();
}

#[test]
fn formation_reaching_the_bottom_ends_the_game() {
    let (sink, rx) = ChannelSink::new();
    let mut sim = WaveSimulation::new(
        SimConfig::default(),
        Collaborators::from_sink(sink, Arc::new(AmmoStore::new(30))),
    );
    // Bottom row starts at y = 350 with 2 units per tick.
    sim.on_viewport_sized(600.0, 400.0);

    let (motion, motion_ticks) = ManualTicker::new();
    let (fire, _fire_ticks) = ManualTicker::new();
    sim.start_with(motion, fire).unwrap();

    let tick = Duration::from_millis(sim.config().motion_tick_ms);
    for _ in 0..26 {
        assert!(motion_ticks.tick(tick));
    }
    assert!(rx.try_recv().is_err(), "no breach before the bottom");

    assert!(motion_ticks.tick(tick));
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), GameEvent::GameOver);

    for _ in 0..5 {
        assert!(motion_ticks.tick(tick));
    }
    assert!(rx.try_recv().is_err(), "game over fires once");

    let snapshot = sim.snapshot();
    assert!(snapshot.game_over);
    assert!(snapshot.columns.is_empty());

    sim.detach();
}

#[test]
fn enemies_fire_from_the_bottom_row() {
    let (sink, rx) = ChannelSink::new();
    let mut sim = WaveSimulation::new(
        SimConfig::default(),
        Collaborators::from_sink(sink, Arc::new(AmmoStore::new(30))),
    );
    sim.on_viewport_sized(600.0, 1000.0);

    let (motion, _motion_ticks) = ManualTicker::new();
    let (fire, fire_ticks) = ManualTicker::new();
    sim.start_with(motion, fire).unwrap();

    for _ in 0..10 {
        assert!(fire_ticks.tick(Duration::from_secs(1)));
        match rx.recv_timeout(WAIT).unwrap() {
            GameEvent::CanonReady { x, y } => {
                assert!((y - 350.0).abs() < 1e-3);
                assert!((0.0..600.0).contains(&x));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    sim.detach();
}
