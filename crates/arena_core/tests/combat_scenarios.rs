//! End-to-end combat scenarios for arena_core.
//!
//! These tests drive the full stack - weapon assembly, status effects,
//! field effects and the tick - the way a game session would, with a
//! manually advanced clock.

use arena_core::prelude::*;
use arena_core::status::library;
use arena_test_utils::{balanced_rifle_config, glass_cannon_config, ManualClock, StaticWorld};

fn new_arena() -> (CombatArena<ManualClock>, ManualClock) {
    let clock = ManualClock::new(0);
    let arena = CombatArena::new(clock.clone(), ArsenalCatalog::with_defaults());
    (arena, clock)
}

// =============================================================================
// Weapon Assembly
// =============================================================================

mod assembly {
    use super::*;

    #[test]
    fn test_full_loadout_with_effects_and_ordinance() {
        let (mut arena, _clock) = new_arena();
        arena.add_player(1, 0);

        // 60 attribute points + piercing (15) + grenade (15) = 90
        let config = WeaponConfig {
            name: "grenadier".to_string(),
            damage: 30,
            fire_rate: 10,
            range: 10,
            accuracy: 0,
            magazine_size: 5,
            reload_time: 5,
            projectile_speed: 0,
            bullets_per_shot: 0,
            linear_damping: 0,
            bullet_effects: vec!["piercing".to_string()],
            ordinance: "grenade".to_string(),
        };
        arena.configure_weapon(1, &config).unwrap();

        let weapon = arena.weapon(1).unwrap();
        assert!(weapon.has_bullet_effect("piercing"));
        assert_eq!(weapon.ordinance().name, "grenade");
        assert_eq!(weapon.stats().damage, 40.0);
        assert_eq!(weapon.stats().magazine_size, 10);
    }

    #[test]
    fn test_effect_costs_push_over_budget() {
        let (mut arena, _clock) = new_arena();
        arena.add_player(1, 0);

        // Full attribute budget plus a 25-point effect
        let mut config = glass_cannon_config();
        config.bullet_effects = vec!["homing".to_string()];

        let err = arena.configure_weapon(1, &config).unwrap_err();
        assert!(matches!(err, CombatError::BudgetExceeded { total: 125, .. }));
        assert!(arena.weapon(1).is_none());
    }

    #[test]
    fn test_unknown_player_is_rejected() {
        let (mut arena, _clock) = new_arena();
        let err = arena
            .configure_weapon(42, &balanced_rifle_config())
            .unwrap_err();
        assert!(matches!(err, CombatError::PlayerNotFound(42)));
    }
}

// =============================================================================
// Status Effects Through The Tick
// =============================================================================

mod status {
    use super::*;

    #[test]
    fn test_buffed_weapon_view_leaves_stored_weapon_unchanged() {
        let (mut arena, clock) = new_arena();
        arena.add_player(1, 0);
        arena.configure_weapon(1, &balanced_rifle_config()).unwrap();
        let world = StaticWorld::new().with_player(1, 0, Vec2::ZERO);

        arena.queue(CombatCommand::ApplyStatus {
            player: 1,
            effect: library::damage_boost(2.0, 5_000),
        });
        clock.advance(50);
        arena.tick(&world);

        assert_eq!(arena.effective_weapon(1).unwrap().damage, 60.0);
        assert_eq!(arena.weapon(1).unwrap().stats().damage, 30.0);

        // Expiry restores the unbuffed view
        clock.advance(6_000);
        arena.tick(&world);
        assert_eq!(arena.effective_weapon(1).unwrap().damage, 30.0);
    }

    #[test]
    fn test_reapplying_a_pickup_refreshes_instead_of_stacking() {
        let (mut arena, clock) = new_arena();
        arena.add_player(1, 0);
        arena.configure_weapon(1, &balanced_rifle_config()).unwrap();
        let world = StaticWorld::new().with_player(1, 0, Vec2::ZERO);

        arena.apply_status(1, library::damage_boost(2.0, 1_000)).unwrap();
        arena.apply_status(1, library::damage_boost(2.0, 10_000)).unwrap();
        clock.advance(2_000);
        arena.tick(&world);

        // Still exactly one boost, with the refreshed expiry
        assert_eq!(arena.effective_weapon(1).unwrap().damage, 60.0);
        assert_eq!(arena.render_hints(1).len(), 1);
    }

    #[test]
    fn test_remove_status_command_reverts() {
        let (mut arena, clock) = new_arena();
        arena.add_player(1, 0);
        let world = StaticWorld::new().with_player(1, 0, Vec2::ZERO);

        arena.apply_status(1, library::slow(0.5, 0)).unwrap();
        clock.advance(50);
        arena.tick(&world);
        assert_eq!(
            arena.player(1).unwrap().max_speed,
            Player::DEFAULT_MAX_SPEED * 0.5
        );

        arena.queue(CombatCommand::RemoveStatus {
            player: 1,
            unique_key: "slow".to_string(),
        });
        clock.advance(50);
        arena.tick(&world);
        assert_eq!(arena.player(1).unwrap().max_speed, Player::DEFAULT_MAX_SPEED);
        assert_eq!(
            arena.player(1).unwrap().linear_damping,
            Player::DEFAULT_LINEAR_DAMPING
        );
    }

    #[test]
    fn test_poison_kill_is_reported_once() {
        let (mut arena, clock) = new_arena();
        arena.add_player(1, 0);
        arena.player_mut(1).unwrap().health = 5.0;
        let world = StaticWorld::new().with_player(1, 0, Vec2::ZERO);

        arena.apply_status(1, library::poison(10.0, 0)).unwrap();

        clock.advance(1_000);
        let events = arena.tick(&world);
        assert_eq!(events.deaths, vec![1]);

        clock.advance(1_000);
        let events = arena.tick(&world);
        assert!(events.deaths.is_empty());
    }
}

// =============================================================================
// Field Effects Through The Tick
// =============================================================================

mod field {
    use super::*;

    fn explosion(owner: EntityId, center: Vec2, radius: f32, damage: f32) -> FieldEffectParams {
        FieldEffectParams {
            owner,
            owner_team: 0,
            kind: FieldEffectKind::Explosion,
            center,
            radius,
            base_damage: damage,
            duration_ms: 400,
        }
    }

    #[test]
    fn test_explosion_falloff_across_targets() {
        let (mut arena, clock) = new_arena();
        for id in 1..=4 {
            arena.add_player(id, 0);
        }
        let world = StaticWorld::new()
            .with_player(1, 0, Vec2::new(1_000.0, 0.0))
            .with_player(2, 0, Vec2::ZERO) // at center
            .with_player(3, 0, Vec2::new(50.0, 0.0)) // halfway out
            .with_player(4, 0, Vec2::new(100.0, 0.0)); // on the rim

        arena.spawn_field_effect(explosion(1, Vec2::ZERO, 100.0, 50.0));
        clock.advance(50);
        let events = arena.tick(&world);

        let amount = |target: EntityId| {
            events
                .damage
                .iter()
                .find(|d| d.target == target)
                .map(|d| d.amount)
        };
        assert_eq!(amount(2), Some(50.0));
        assert!((amount(3).unwrap() - 30.0).abs() < 1e-3);
        assert!((amount(4).unwrap() - 10.0).abs() < 1e-3); // rim still deals 20%
        assert_eq!(amount(1), None); // out of range
    }

    #[test]
    fn test_supportive_ffa_zone_helps_only_its_owner() {
        let (mut arena, clock) = new_arena();
        arena.add_player(1, 0);
        arena.add_player(2, 0);
        arena.player_mut(1).unwrap().health = 40.0;
        arena.player_mut(2).unwrap().health = 40.0;
        let world = StaticWorld::new()
            .with_player(1, 0, Vec2::ZERO)
            .with_player(2, 0, Vec2::new(5.0, 0.0));

        arena.spawn_field_effect(FieldEffectParams {
            owner: 1,
            owner_team: 0,
            kind: FieldEffectKind::HealZone,
            center: Vec2::ZERO,
            radius: 50.0,
            base_damage: 10.0,
            duration_ms: 5_000,
        });
        clock.advance(50);
        let events = arena.tick(&world);

        assert_eq!(events.heals.len(), 1);
        assert_eq!(events.heals[0].target, 1);
        assert_eq!(arena.player(2).unwrap().health, 40.0);
    }

    #[test]
    fn test_speed_zone_buff_lingers_then_expires() {
        let (mut arena, clock) = new_arena();
        arena.add_player(1, 2);
        arena.add_player(2, 2);
        let mut world = StaticWorld::new()
            .with_player(1, 2, Vec2::new(500.0, 0.0))
            .with_player(2, 2, Vec2::ZERO);

        arena.spawn_field_effect(FieldEffectParams {
            owner: 1,
            owner_team: 2,
            kind: FieldEffectKind::SpeedZone,
            center: Vec2::ZERO,
            radius: 40.0,
            base_damage: 0.0,
            duration_ms: 10_000,
        });

        clock.advance(50);
        arena.tick(&world);
        clock.advance(50);
        arena.tick(&world);
        assert!(arena.player(2).unwrap().max_speed > Player::DEFAULT_MAX_SPEED);

        // Leave the zone; the buff outlives it briefly, then reverts
        world.set_position(2, Vec2::new(500.0, 0.0));
        clock.advance(500);
        arena.tick(&world);
        assert!(arena.player(2).unwrap().max_speed > Player::DEFAULT_MAX_SPEED);

        clock.advance(2_000);
        arena.tick(&world);
        assert_eq!(arena.player(2).unwrap().max_speed, Player::DEFAULT_MAX_SPEED);
    }

    #[test]
    fn test_remote_detonation_command() {
        let (mut arena, clock) = new_arena();
        arena.add_player(1, 0);
        arena.add_player(2, 0);
        let world = StaticWorld::new()
            .with_player(1, 0, Vec2::new(500.0, 0.0))
            .with_player(2, 0, Vec2::new(10.0, 0.0));

        let mine = arena.spawn_field_effect(FieldEffectParams {
            owner: 1,
            owner_team: 0,
            kind: FieldEffectKind::ProximityMine,
            center: Vec2::ZERO,
            radius: 30.0,
            base_damage: 60.0,
            duration_ms: 60_000,
        });

        // Remote trigger works even before the arming deadline; the
        // blast spawned while draining commands hits on the same tick
        arena.queue(CombatCommand::Detonate { effect: mine });
        clock.advance(500);
        let events = arena.tick(&world);
        assert_eq!(events.detonations, vec![mine]);
        assert_eq!(events.damage.len(), 1);
        assert_eq!(events.damage[0].target, 2);
    }

    #[test]
    fn test_zone_damages_props_without_tracking_health() {
        let (mut arena, clock) = new_arena();
        arena.add_player(1, 0);
        let world = StaticWorld::new()
            .with_player(1, 0, Vec2::new(500.0, 0.0))
            .with_prop(7, 0, Vec2::ZERO);

        arena.spawn_field_effect(explosion(1, Vec2::ZERO, 50.0, 30.0));
        clock.advance(50);
        let events = arena.tick(&world);

        assert_eq!(events.damage.len(), 1);
        assert_eq!(events.damage[0].target, 7);
        assert_eq!(events.damage[0].amount, 30.0);
    }

    #[test]
    fn test_two_mines_do_not_share_triggers() {
        let (mut arena, clock) = new_arena();
        arena.add_player(1, 0);
        arena.add_player(2, 0);
        let world = StaticWorld::new()
            .with_player(1, 0, Vec2::new(500.0, 0.0))
            .with_player(2, 0, Vec2::ZERO);

        let near = arena.spawn_field_effect(FieldEffectParams {
            owner: 1,
            owner_team: 0,
            kind: FieldEffectKind::ProximityMine,
            center: Vec2::new(5.0, 0.0),
            radius: 30.0,
            base_damage: 60.0,
            duration_ms: 60_000,
        });
        let far = arena.spawn_field_effect(FieldEffectParams {
            owner: 1,
            owner_team: 0,
            kind: FieldEffectKind::ProximityMine,
            center: Vec2::new(200.0, 0.0),
            radius: 30.0,
            base_damage: 60.0,
            duration_ms: 60_000,
        });

        clock.advance(2_500);
        let events = arena.tick(&world);

        assert_eq!(events.detonations, vec![near]);
        assert!(arena.field_effect(far).is_some());
    }
}

// =============================================================================
// Session Handoff
// =============================================================================

mod session {
    use super::*;

    #[test]
    fn test_snapshot_reflects_tick_results() {
        let (mut arena, clock) = new_arena();
        arena.add_player(1, 0);
        arena.add_player(2, 0);
        arena.configure_weapon(1, &balanced_rifle_config()).unwrap();
        let world = StaticWorld::new()
            .with_player(1, 0, Vec2::new(500.0, 0.0))
            .with_player(2, 0, Vec2::ZERO);

        arena.apply_status(1, library::berserker(60_000)).unwrap();
        arena.spawn_field_effect(FieldEffectParams {
            owner: 1,
            owner_team: 0,
            kind: FieldEffectKind::FireZone,
            center: Vec2::ZERO,
            radius: 40.0,
            base_damage: 10.0,
            duration_ms: 10_000,
        });
        clock.advance(50);
        arena.tick(&world);

        let bytes = arena.snapshot().to_bytes().unwrap();
        let snapshot = arena_core::arena::ArenaSnapshot::from_bytes(&bytes).unwrap();

        assert_eq!(snapshot.now_ms, 50);
        assert_eq!(snapshot.players.len(), 2);
        assert_eq!(snapshot.field_effects.len(), 1);
        let p1 = snapshot.players.iter().find(|p| p.id == 1).unwrap();
        let p2 = snapshot.players.iter().find(|p| p.id == 2).unwrap();
        assert_eq!(p1.render_hints.len(), 1);
        assert_eq!(p2.health, 90.0);
    }
}

// =============================================================================
// Properties
// =============================================================================

mod properties {
    use arena_test_utils::proptest::prelude::*;

    use super::*;

    proptest! {
        /// Every in-range point allocation produces a finite value.
        #[test]
        fn curve_values_are_finite_in_range(points in -10i32..=40) {
            for kind in AttributeKind::ALL {
                let curve = kind.curve();
                if curve.contains(points) {
                    let value = compute(kind, points).unwrap();
                    prop_assert!(value.is_finite());
                }
            }
        }

        /// Assembly either succeeds or reports a structured error; the
        /// budget check matches the sum of allocations.
        #[test]
        fn assembly_enforces_the_budget(
            damage in 0i32..=40,
            fire_rate in 0i32..=30,
            magazine_size in 0i32..=30,
        ) {
            let config = WeaponConfig {
                name: "prop".to_string(),
                damage,
                fire_rate,
                range: 0,
                accuracy: 0,
                magazine_size,
                reload_time: 0,
                projectile_speed: 0,
                bullets_per_shot: 0,
                linear_damping: 0,
                bullet_effects: Vec::new(),
                ordinance: "bullet".to_string(),
            };
            let catalog = ArsenalCatalog::with_defaults();
            let total = damage + fire_rate + magazine_size;
            match Weapon::assemble(&config, &catalog) {
                Ok(_) => prop_assert!(total <= POINT_BUDGET),
                Err(CombatError::BudgetExceeded { .. }) => prop_assert!(total > POINT_BUDGET),
                Err(other) => return Err(TestCaseError::fail(other.to_string())),
            }
        }

        /// Explosion intensity never exceeds 1.0 and the rim still
        /// registers the 20% floor.
        #[test]
        fn explosion_intensity_is_bounded(distance in 0f32..200.0) {
            let fx = FieldEffect::new(
                1,
                1,
                0,
                FieldEffectKind::Explosion,
                Vec2::ZERO,
                100.0,
                1.0,
                0,
                1_000,
            );
            let intensity = fx.intensity_at(Vec2::new(distance, 0.0));
            if distance <= 100.0 {
                prop_assert!((0.2..=1.0).contains(&intensity));
            } else {
                prop_assert!(intensity <= 0.2);
            }
        }
    }
}
