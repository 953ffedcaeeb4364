//! End-to-end scenarios with hand-computed expected values.

use warlock_sim::model::settings::{CurseChoice, SimulationConfig, Trinket};
use warlock_sim::player::Player;
use warlock_sim::spell;
use warlock_sim::{Simulation, SpellId};

fn bare_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.player.stats.max_mana = 10_000.0;
    config.enemy.level = 70;
    config.simulation.randomize_values = false;
    config
}

#[test]
fn no_op_fight_has_zero_dps_and_no_errors() {
    let mut config = bare_config();
    config.simulation.min_time = 0.0;
    config.simulation.max_time = 0.0;
    config.simulation.iterations = 1000;

    let report = Simulation::new(&config).unwrap().run().unwrap();
    assert_eq!(report.samples.len(), 1000);
    assert_eq!(report.dps.mean, 0.0);
    assert_eq!(report.dps.max, 0.0);
}

/// A fight exactly long enough for one unhasted Shadow Bolt
/// (3 s base + 0.0625 s delay). Expected damage per cast:
/// (544 + 607) / 2 + 1000 * (3 / 3.5) = 1432.642857...
#[test]
fn single_shadow_bolt_damage_and_dps() {
    let mut config = bare_config();
    config.player.stats.spell_power = 1000.0;
    config.player.stats.hit_chance = 30.0; // capped to 99 against level 70
    config.simulation.infinite_player_mana = true;
    config.simulation.using_custom_isb_uptime = true;
    config.simulation.custom_isb_uptime = 0.0;
    config.simulation.min_time = 3.0625;
    config.simulation.max_time = 3.0625;
    config.simulation.iterations = 1000;
    config.simulation.rng_seed = 1;

    let report = Simulation::new(&config).unwrap().run().unwrap();
    let expected_damage = 575.5 + 1000.0 * (3.0 / 3.5);
    let expected_dps = expected_damage / 3.0625;

    // Iterations where the bolt landed produce exactly the expected DPS;
    // the 99% hit cap makes a handful of 0-damage samples inevitable.
    assert!((report.dps.max - expected_dps).abs() < 1e-6 * expected_dps);
    assert!(report.dps.mean > 0.95 * expected_dps);
    assert!(report.dps.mean <= expected_dps);

    let bolt = report.breakdown.get(SpellId::ShadowBolt).unwrap();
    assert_eq!(bolt.casts, 1000);
    assert!(bolt.misses < 50);
    assert_eq!(bolt.crits, 0);
}

/// Corruption with 5/5 Improved Corruption is instant: applied at t=0 it
/// ticks exactly six times across an 18 second fight, for
/// (900 + 500 * 0.936) / 6 damage per tick.
#[test]
fn corruption_ticks_exactly_six_times_over_eighteen_seconds() {
    let mut config = bare_config();
    config.player.stats.spell_power = 500.0;
    config.player.talents.improved_corruption = 5;
    config.player.rotation.keep_corruption = true;
    config.simulation.infinite_player_mana = true;
    config.simulation.iterations = 1;

    let mut player = Player::new(&config).unwrap();
    let corruption = player.spell_index(SpellId::Corruption).unwrap();
    // Pin the application itself; the scenario is about the DoT schedule.
    player.spells[corruption].can_miss = false;

    spell::start_cast(&mut player, corruption, 0.0).unwrap();
    assert!(player.dot_active(SpellId::Corruption));

    for _ in 0..6 {
        player.tick(3.0).unwrap();
    }
    assert!(!player.dot_active(SpellId::Corruption));

    let entry = player.breakdown.get(SpellId::Corruption).unwrap();
    assert_eq!(entry.casts, 1);
    let expected_tick = (900.0 + 500.0 * 0.936) / 6.0;
    assert!((entry.damage - 6.0 * expected_tick).abs() < 1e-9);

    // Nothing further: the DoT detached after its final tick.
    player.tick(3.0).unwrap();
    assert!((player.breakdown.get(SpellId::Corruption).unwrap().damage
        - 6.0 * expected_tick)
        .abs()
        < 1e-9);
}

/// Seed of Corruption against a 10-enemy pull. With 9 hits the capped
/// individual hit is 13580 * 9 / (9 * 10) = 1358 and the total 12222.
#[test]
fn seed_of_corruption_respects_the_buggy_aoe_cap() {
    let mut config = bare_config();
    config.player.stats.spell_power = 2000.0;
    config.player.stats.hit_chance = 30.0;
    config.enemy.amount = 10;
    config.simulation.infinite_player_mana = true;

    // The per-target rolls ride the 99%-capped hit chance, so search for
    // a seed where every roll lands; most do.
    let mut exact_case_checked = false;
    for seed in 0..50_u64 {
        let mut config = config.clone();
        config.simulation.rng_seed = seed;
        let mut player = Player::new(&config).unwrap();
        let seed_idx = player.spell_index(SpellId::SeedOfCorruption).unwrap();
        player.spells[seed_idx].can_miss = false; // pin the carrier hit
        spell::cast(&mut player, seed_idx).unwrap();

        let entry = player.breakdown.get(SpellId::SeedOfCorruption).unwrap();
        let hits = 9 - entry.misses;
        if hits == 0 {
            continue;
        }
        // The capped per-hit damage never exceeds cap / (hits + 1).
        let per_hit_cap = 13580.0 / (hits + 1) as f64;
        let non_crit_hits = hits.saturating_sub(entry.crits) as f64;
        assert!(
            player.iteration_damage
                <= per_hit_cap * non_crit_hits + per_hit_cap * 2.0 * entry.crits as f64 + 1e-6
        );

        if hits == 9 && entry.crits == 0 {
            assert!((player.iteration_damage - 12_222.0).abs() < 1e-6);
            exact_case_checked = true;
            break;
        }
    }
    assert!(exact_case_checked, "no miss-free, crit-free seed in range");
}

/// Two runs under the same seed fire the same procs at the same times.
#[test]
fn proc_sequence_is_deterministic_under_a_fixed_seed() {
    let mut config = bare_config();
    config.player.stats.spell_power = 900.0;
    config.player.stats.max_mana = 8000.0;
    config.player.stats.spell_crit_chance = 20.0;
    config.player.talents.improved_shadow_bolt = 5;
    config.player.talents.nightfall = 2;
    config.player.rotation.keep_corruption = true;
    config.player.rotation.curse = CurseChoice::Agony;
    config.player.trinket_1 = Some(Trinket::QuagmirransEye);
    config.player.trinket_2 = Some(Trinket::TimbalsFocusingCrystal);
    config.simulation.min_time = 120.0;
    config.simulation.max_time = 120.0;
    config.simulation.iterations = 1;
    config.simulation.rng_seed = 42;
    config.simulation.record_combat_log = true;

    let first = Simulation::new(&config).unwrap().run().unwrap();
    let second = Simulation::new(&config).unwrap().run().unwrap();

    assert!(!first.combat_log.is_empty());
    assert_eq!(first.combat_log, second.combat_log);
    assert_eq!(first.dps.mean, second.dps.mean);
}

/// A 120-second cooldown in a 300-second fight fires at 0, 120 and 240
/// and never again.
#[test]
fn destruction_potion_respects_its_cooldown() {
    let mut config = bare_config();
    config.player.stats.spell_power = 800.0;
    config.player.auras.destruction_potion = true;
    config.simulation.infinite_player_mana = true;
    config.simulation.min_time = 300.0;
    config.simulation.max_time = 300.0;
    config.simulation.iterations = 1;

    let report = Simulation::new(&config).unwrap().run().unwrap();
    let potion = report.breakdown.get(SpellId::DestructionPotion).unwrap();
    assert!(potion.casts <= 3);
    assert_eq!(potion.casts, 3);
}
