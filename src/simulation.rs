//! Simulation driver.
//!
//! Runs N independent iterations of a scripted-duration fight. Each
//! iteration reseeds the RNG from the base seed plus the iteration index,
//! resets the actors, samples a fight length, then advances virtual time
//! by the smallest scheduled horizon until the fight ends. Iterations are
//! therefore reproducible individually as well as in aggregate.

use crate::aggregation::DpsSummary;
use crate::breakdown::CombatBreakdown;
use crate::error_handling::SimulationError;
use crate::model::settings::{SimulationConfig, SimulationSettings};
use crate::pet::Pet;
use crate::player::Player;

pub struct Simulation {
    pub player: Player,
    pub pet: Option<Pet>,
    settings: SimulationSettings,
}

/// Aggregate outcome of a run.
pub struct SimulationReport {
    pub dps: DpsSummary,
    pub samples: Vec<f64>,
    pub breakdown: CombatBreakdown,
    pub combat_log: Vec<String>,
    pub iterations: usize,
    pub total_fight_time: f64,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let player = Player::new(config)?;
        let pet = config.player.has_pet.then(Pet::new);
        Ok(Self {
            player,
            pet,
            settings: config.simulation.clone(),
        })
    }

    pub fn run(&mut self) -> Result<SimulationReport, SimulationError> {
        let iterations = self.settings.iterations;
        log::info!(
            "starting run: {} iterations, fight {}..{}s, seed {}",
            iterations,
            self.settings.min_time,
            self.settings.max_time,
            self.settings.rng_seed
        );

        let mut samples = Vec::with_capacity(iterations);
        let mut breakdown = CombatBreakdown::default();
        let mut combat_log = Vec::new();
        let mut total_fight_time = 0.0;

        for i in 0..iterations {
            let seed = self.settings.rng_seed.wrapping_add(i as u64);
            self.player.rng.seed(seed);
            self.player.reset();
            if let Some(pet) = &mut self.pet {
                pet.reset();
            }
            // Only the first iteration records text, to keep large runs
            // from going quadratic on log volume.
            self.player.recording_combat_log = self.settings.record_combat_log && i == 0;

            let fight_length = self
                .player
                .rng
                .uniform_range(self.settings.min_time, self.settings.max_time);
            if fight_length <= 0.0 {
                samples.push(0.0);
                continue;
            }

            self.run_iteration(fight_length)?;

            total_fight_time += fight_length;
            samples.push(self.player.iteration_damage / fight_length);
            breakdown.merge(&self.player.breakdown);
            self.player.breakdown = CombatBreakdown::default();
            if self.player.recording_combat_log {
                combat_log = std::mem::take(&mut self.player.combat_log);
            }
        }

        log::debug!("run complete: {} samples", samples.len());
        Ok(SimulationReport {
            dps: DpsSummary::from_samples(&samples),
            samples,
            breakdown,
            combat_log,
            iterations,
            total_fight_time,
        })
    }

    /// One fight. An in-flight cast at the end of the fight is discarded:
    /// the loop simply stops advancing before it completes.
    fn run_iteration(&mut self, fight_length: f64) -> Result<(), SimulationError> {
        let mut remaining = fight_length;
        while remaining > 1e-9 {
            self.player.use_cooldowns(remaining)?;
            if self.player.cast_time_remaining <= 0.0 && self.player.gcd_remaining <= 0.0 {
                self.player.make_rotation_decision(remaining)?;
            }

            let mut dt = self.player.find_time_until_next_action();
            if let Some(pet) = &self.pet {
                dt = dt.min(pet.time_until_next_action());
            }
            dt = dt.min(remaining);

            self.player.tick(dt)?;
            if let Some(pet) = &mut self.pet {
                pet.tick(dt, &mut self.player);
            }
            remaining -= dt;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::SpellId;
    use crate::model::settings::{CurseChoice, SimulationConfig};

    fn base_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.player.stats.max_mana = 8000.0;
        config.player.stats.spell_power = 900.0;
        config.player.stats.hit_chance = 16.0;
        config.simulation.iterations = 50;
        config.simulation.min_time = 60.0;
        config.simulation.max_time = 90.0;
        config.simulation.rng_seed = 7;
        config
    }

    #[test]
    fn same_seed_reproduces_the_same_dps() {
        let first = Simulation::new(&base_config()).unwrap().run().unwrap();
        let second = Simulation::new(&base_config()).unwrap().run().unwrap();
        assert_eq!(first.samples, second.samples);
        assert_eq!(first.dps.mean, second.dps.mean);
    }

    #[test]
    fn different_seeds_diverge() {
        let first = Simulation::new(&base_config()).unwrap().run().unwrap();
        let mut config = base_config();
        config.simulation.rng_seed = 8;
        let second = Simulation::new(&config).unwrap().run().unwrap();
        assert_ne!(first.samples, second.samples);
    }

    #[test]
    fn breakdown_damage_matches_sampled_damage() {
        let mut config = base_config();
        config.player.rotation.curse = CurseChoice::Agony;
        config.player.rotation.keep_corruption = true;
        let mut sim = Simulation::new(&config).unwrap();
        let report = sim.run().unwrap();

        let sampled_total: f64 = report
            .samples
            .iter()
            .zip(per_iteration_lengths(&config))
            .map(|(dps, len)| dps * len)
            .sum();
        let breakdown_total = report.breakdown.total_damage();
        assert!(
            (sampled_total - breakdown_total).abs() <= 1e-6 * breakdown_total.max(1.0),
            "sampled {} vs breakdown {}",
            sampled_total,
            breakdown_total
        );
    }

    // Re-derive the fight lengths the run drew, using the same seed
    // scheme.
    fn per_iteration_lengths(config: &SimulationConfig) -> Vec<f64> {
        let mut lengths = Vec::new();
        let mut rng = crate::rng::SimRng::new(0);
        for i in 0..config.simulation.iterations {
            rng.seed(config.simulation.rng_seed.wrapping_add(i as u64));
            lengths.push(rng.uniform_range(config.simulation.min_time, config.simulation.max_time));
        }
        lengths
    }

    #[test]
    fn pet_contributes_to_the_total() {
        let mut config = base_config();
        config.player.has_pet = true;
        config.simulation.iterations = 5;
        let mut sim = Simulation::new(&config).unwrap();
        let report = sim.run().unwrap();
        assert!(report.breakdown.get(SpellId::Firebolt).unwrap().damage > 0.0);
    }

    #[test]
    fn combat_log_is_recorded_for_the_first_iteration_only() {
        let mut config = base_config();
        config.simulation.record_combat_log = true;
        config.simulation.iterations = 3;
        let mut sim = Simulation::new(&config).unwrap();
        let report = sim.run().unwrap();
        assert!(!report.combat_log.is_empty());
    }
}
