use serde::{Deserialize, Serialize};

use super::stats::CharacterStats;
use super::talents::{AuraSelection, Sets, Talents};
use crate::enums::SpellId;
use crate::error_handling::SimulationError;

// Meta gem item ids the engine reacts to.
pub const CHAOTIC_SKYFIRE_DIAMOND: u32 = 34220;
pub const MYSTICAL_SKYFIRE_DIAMOND: u32 = 25893;
pub const INSIGHTFUL_EARTHSTORM_DIAMOND: u32 = 25901;

/// Trinkets that hook into the proc fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trinket {
    TimbalsFocusingCrystal,
    MarkOfDefiance,
    TheLightningCapacitor,
    ShiffarsNexusHorn,
    SextantOfUnstableCurrents,
    QuagmirransEye,
    AshtongueTalismanOfShadows,
    DarkmoonCardCrusade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CurseChoice {
    #[default]
    None,
    Elements,
    Recklessness,
    Doom,
    Agony,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillerChoice {
    #[default]
    ShadowBolt,
    Incinerate,
    SearingPain,
}

impl FillerChoice {
    pub fn spell_id(&self) -> SpellId {
        match self {
            FillerChoice::ShadowBolt => SpellId::ShadowBolt,
            FillerChoice::Incinerate => SpellId::Incinerate,
            FillerChoice::SearingPain => SpellId::SearingPain,
        }
    }
}

/// Rotation preferences: which curse to maintain, which DoTs to keep up
/// (checked in a fixed priority order), and the filler spell.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RotationSettings {
    pub filler: FillerChoice,
    pub curse: CurseChoice,
    pub keep_corruption: bool,
    pub keep_siphon_life: bool,
    pub keep_immolate: bool,
    pub keep_unstable_affliction: bool,
    pub use_shadowburn: bool,
    pub use_death_coil: bool,
    pub use_shadowfury: bool,
    /// Use Dark Pact instead of Life Tap when mana runs low.
    pub use_dark_pact: bool,
    /// Fraction of max mana below which the mana-return ability is used
    /// when nothing better is ready.
    pub mana_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySettings {
    pub level: u32,
    pub shadow_resistance: f64,
    pub fire_resistance: f64,
    /// Total enemies in the pull; Seed of Corruption hits `amount - 1`.
    pub amount: u32,
}

impl Default for EnemySettings {
    fn default() -> Self {
        Self {
            level: 73,
            shadow_resistance: 0.0,
            fire_resistance: 0.0,
            amount: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub iterations: usize,
    pub min_time: f64,
    pub max_time: f64,
    pub rng_seed: u64,
    /// Roll spell damage in `[min, max]` instead of using the average.
    pub randomize_values: bool,
    pub infinite_player_mana: bool,
    /// Model Improved Shadow Bolt as a fixed average uptime instead of
    /// tracking the debuff's charges.
    pub using_custom_isb_uptime: bool,
    /// Uptime percentage used when `using_custom_isb_uptime` is set.
    pub custom_isb_uptime: f64,
    /// Record the textual combat log for the first iteration only.
    pub record_combat_log: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            iterations: 1000,
            min_time: 150.0,
            max_time: 210.0,
            rng_seed: 0,
            randomize_values: false,
            infinite_player_mana: false,
            using_custom_isb_uptime: false,
            custom_isb_uptime: 70.0,
            record_combat_log: false,
        }
    }
}

/// Everything that describes the simulated character.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlayerSettings {
    pub stats: CharacterStats,
    pub talents: Talents,
    pub sets: Sets,
    pub auras: AuraSelection,
    pub trinket_1: Option<Trinket>,
    pub trinket_2: Option<Trinket>,
    pub meta_gem_id: u32,
    pub rotation: RotationSettings,
    pub has_pet: bool,
}

/// Root configuration document consumed by the CLI and the test suite.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimulationConfig {
    pub player: PlayerSettings,
    pub enemy: EnemySettings,
    pub simulation: SimulationSettings,
}

impl SimulationConfig {
    /// Init-time validation. Contradictory flags are fatal before the
    /// first iteration runs.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.simulation.min_time > self.simulation.max_time {
            return Err(SimulationError::InvalidConfig(format!(
                "min_time ({}) exceeds max_time ({})",
                self.simulation.min_time, self.simulation.max_time
            )));
        }
        if self.simulation.iterations == 0 {
            return Err(SimulationError::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }
        if self.enemy.amount == 0 {
            return Err(SimulationError::InvalidConfig(
                "enemy amount must be at least 1".to_string(),
            ));
        }
        if self.player.stats.max_mana < self.player.stats.mana {
            return Err(SimulationError::InvalidConfig(format!(
                "mana ({}) exceeds max_mana ({})",
                self.player.stats.mana, self.player.stats.max_mana
            )));
        }
        if self.player.rotation.use_dark_pact && self.player.talents.dark_pact == 0 {
            return Err(SimulationError::InvalidConfig(
                "rotation selects Dark Pact but the talent is not taken".to_string(),
            ));
        }
        Ok(())
    }
}
