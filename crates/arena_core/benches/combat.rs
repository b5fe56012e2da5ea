//! Combat benchmarks for arena_core.
//!
//! Run with: `cargo bench -p arena_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use arena_core::prelude::*;
use arena_core::status::library;
use arena_test_utils::{balanced_rifle_config, ManualClock, StaticWorld};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn crowded_arena() -> (CombatArena<ManualClock>, ManualClock, StaticWorld) {
    let clock = ManualClock::new(0);
    let mut arena = CombatArena::new(clock.clone(), ArsenalCatalog::with_defaults());
    let mut world = StaticWorld::new();

    for id in 0..32u64 {
        let team = u8::try_from(id % 4).unwrap_or(0) + 1;
        arena.add_player(id, team);
        world = world.with_player(id, team, Vec2::new((id as f32) * 20.0, 0.0));
        if let Err(error) = arena.apply_status(id, library::health_regen(2.0, 0)) {
            panic!("setup failed: {error}");
        }
    }

    for i in 0..20u64 {
        arena.spawn_field_effect(FieldEffectParams {
            owner: i % 32,
            owner_team: u8::try_from(i % 4).unwrap_or(0) + 1,
            kind: if i % 2 == 0 {
                FieldEffectKind::FireZone
            } else {
                FieldEffectKind::HealZone
            },
            center: Vec2::new((i as f32) * 30.0, 0.0),
            radius: 60.0,
            base_damage: 5.0,
            duration_ms: 600_000,
        });
    }

    (arena, clock, world)
}

pub fn combat_benchmark(c: &mut Criterion) {
    c.bench_function("tick_32_players_20_effects", |b| {
        let (mut arena, clock, world) = crowded_arena();
        b.iter(|| {
            clock.advance(16);
            black_box(arena.tick(&world))
        })
    });

    c.bench_function("weapon_assembly", |b| {
        let catalog = ArsenalCatalog::with_defaults();
        let config = balanced_rifle_config();
        b.iter(|| black_box(Weapon::assemble(&config, &catalog)))
    });

    c.bench_function("snapshot_serialize", |b| {
        let (mut arena, clock, world) = crowded_arena();
        clock.advance(16);
        arena.tick(&world);
        b.iter(|| black_box(arena.snapshot().to_bytes()))
    });
}

criterion_group!(benches, combat_benchmark);
criterion_main!(benches);
