//! Minimal pet actor. An Imp on a Firebolt loop: it snapshots the stats
//! it inherits from its owner when a new cast begins, and its damage goes
//! into the owner's iteration total under its own breakdown entry.

use crate::enums::{SpellId, SpellSchool, SpellType};
use crate::player::Player;

// Imp base attributes at level 70, used for Demonic Knowledge.
pub const IMP_STAMINA: f64 = 101.0;
pub const IMP_INTELLECT: f64 = 327.0;

const FIREBOLT_CAST_TIME: f64 = 2.0;
const FIREBOLT_MIN: f64 = 119.0;
const FIREBOLT_MAX: f64 = 137.0;
const FIREBOLT_COEFFICIENT: f64 = 0.571;
/// Share of the owner's fire spell power the pet inherits.
const SPELL_POWER_INHERITANCE: f64 = 0.15;

#[derive(Debug)]
pub struct Pet {
    pub cast_time_remaining: f64,
    /// Spell power snapshot taken when the current cast started.
    pub snapshot_spell_power: f64,
    casting: bool,
}

impl Pet {
    pub fn new() -> Self {
        Self {
            cast_time_remaining: 0.0,
            snapshot_spell_power: 0.0,
            casting: false,
        }
    }

    pub fn reset(&mut self) {
        self.cast_time_remaining = 0.0;
        self.snapshot_spell_power = 0.0;
        self.casting = false;
    }

    /// Refresh the inherited-stat snapshot. The driver calls this after
    /// owner auras change hands so the next cast sees the new stats.
    pub fn sync(&mut self, owner: &Player) {
        if !self.casting {
            self.snapshot_spell_power =
                owner.spell_power(SpellSchool::Fire) * SPELL_POWER_INHERITANCE;
        }
    }

    pub fn time_until_next_action(&self) -> f64 {
        if self.casting {
            self.cast_time_remaining.max(1e-4)
        } else {
            FIREBOLT_CAST_TIME
        }
    }

    /// Advance the pet's cast loop; completed Firebolts credit the owner.
    pub fn tick(&mut self, dt: f64, owner: &mut Player) {
        if !self.casting {
            self.sync(owner);
            self.casting = true;
            self.cast_time_remaining = FIREBOLT_CAST_TIME;
        }
        self.cast_time_remaining -= dt;
        if self.cast_time_remaining > 0.0 {
            return;
        }

        owner.breakdown.entry(SpellId::Firebolt).casts += 1;
        if owner.is_hit(SpellType::Destruction) {
            let base = (FIREBOLT_MIN + FIREBOLT_MAX) / 2.0;
            let mut damage = (base + self.snapshot_spell_power * FIREBOLT_COEFFICIENT)
                * owner.partial_resist_multiplier(SpellSchool::Fire);
            if owner.is_crit(SpellType::Destruction, 0.0) {
                owner.breakdown.entry(SpellId::Firebolt).crits += 1;
                damage *= crate::player::CRIT_DAMAGE_MULTIPLIER;
            }
            owner.iteration_damage += damage;
            owner.breakdown.add_damage(SpellId::Firebolt, damage);
            if owner.should_log() {
                owner.log(format!("{} {:.0} (pet)", SpellId::Firebolt, damage));
            }
        } else {
            owner.breakdown.entry(SpellId::Firebolt).misses += 1;
        }

        // Next bolt starts immediately with a fresh snapshot.
        self.sync_after_cast(owner);
    }

    fn sync_after_cast(&mut self, owner: &Player) {
        self.casting = false;
        self.sync(owner);
        self.casting = true;
        self.cast_time_remaining += FIREBOLT_CAST_TIME;
    }
}

impl Default for Pet {
    fn default() -> Self {
        Self::new()
    }
}
