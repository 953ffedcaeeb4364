use std::collections::BTreeMap;

use serde::Serialize;

use crate::enums::SpellId;

/// Per-spell counters accumulated across every iteration of a run. The
/// sum of `damage` across all entries equals the sum of iteration damage,
/// which the driver asserts in tests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpellBreakdown {
    pub casts: u64,
    pub crits: u64,
    pub misses: u64,
    pub damage: f64,
    pub mana_gain: f64,
}

/// Breakdown table keyed by spell. A BTreeMap keeps report ordering
/// deterministic without an explicit sort.
#[derive(Debug, Clone, Default)]
pub struct CombatBreakdown {
    entries: BTreeMap<SpellId, SpellBreakdown>,
}

impl CombatBreakdown {
    pub fn entry(&mut self, id: SpellId) -> &mut SpellBreakdown {
        self.entries.entry(id).or_default()
    }

    pub fn get(&self, id: SpellId) -> Option<&SpellBreakdown> {
        self.entries.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SpellId, &SpellBreakdown)> {
        self.entries.iter()
    }

    pub fn add_damage(&mut self, id: SpellId, damage: f64) {
        self.entry(id).damage += damage;
    }

    pub fn add_mana_gain(&mut self, id: SpellId, mana: f64) {
        self.entry(id).mana_gain += mana;
    }

    pub fn total_damage(&self) -> f64 {
        self.entries.values().map(|e| e.damage).sum()
    }

    /// Fold another table (one iteration's counters) into this one.
    pub fn merge(&mut self, other: &CombatBreakdown) {
        for (id, entry) in other.iter() {
            let target = self.entry(*id);
            target.casts += entry.casts;
            target.crits += entry.crits;
            target.misses += entry.misses;
            target.damage += entry.damage;
            target.mana_gain += entry.mana_gain;
        }
    }
}
