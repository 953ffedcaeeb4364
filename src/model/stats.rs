use serde::{Deserialize, Serialize};

// TBC combat rating conversions at level 70.
pub const HASTE_RATING_PER_PERCENT: f64 = 15.77;
pub const CRIT_RATING_PER_PERCENT: f64 = 22.08;
pub const HIT_RATING_PER_PERCENT: f64 = 12.62;

/// Flat record of derived character statistics. The baseline comes from the
/// input configuration; auras mutate it while active and revert their
/// deltas on fade. All reads during a single spell resolution see the same
/// snapshot because the simulation is single-threaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CharacterStats {
    pub spell_power: f64,
    pub shadow_power: f64,
    pub fire_power: f64,
    pub spell_haste_rating: f64,
    pub spell_haste_percent: f64,
    pub spell_crit_chance: f64,
    pub spell_crit_rating: f64,
    pub spell_hit_rating: f64,
    pub hit_chance: f64,
    pub mana: f64,
    pub max_mana: f64,
    pub mana_cost_modifier: f64,
    pub shadow_modifier: f64,
    pub fire_modifier: f64,
    pub mp5: f64,
    pub spirit: f64,
    pub intellect: f64,
    pub stamina: f64,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            spell_power: 0.0,
            shadow_power: 0.0,
            fire_power: 0.0,
            spell_haste_rating: 0.0,
            spell_haste_percent: 0.0,
            spell_crit_chance: 0.0,
            spell_crit_rating: 0.0,
            spell_hit_rating: 0.0,
            hit_chance: 0.0,
            mana: 0.0,
            max_mana: 0.0,
            mana_cost_modifier: 1.0,
            shadow_modifier: 1.0,
            fire_modifier: 1.0,
            mp5: 0.0,
            spirit: 0.0,
            intellect: 0.0,
            stamina: 0.0,
        }
    }
}

/// Which statistic an aura delta targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    SpellPower,
    ShadowPower,
    FirePower,
    SpellHasteRating,
    SpellHastePercent,
    SpellCritChance,
    SpellCritRating,
    ManaCostModifier,
    ShadowModifier,
    FireModifier,
    Mp5,
    Spirit,
    Intellect,
}

impl CharacterStats {
    fn field_mut(&mut self, kind: StatKind) -> &mut f64 {
        match kind {
            StatKind::SpellPower => &mut self.spell_power,
            StatKind::ShadowPower => &mut self.shadow_power,
            StatKind::FirePower => &mut self.fire_power,
            StatKind::SpellHasteRating => &mut self.spell_haste_rating,
            StatKind::SpellHastePercent => &mut self.spell_haste_percent,
            StatKind::SpellCritChance => &mut self.spell_crit_chance,
            StatKind::SpellCritRating => &mut self.spell_crit_rating,
            StatKind::ManaCostModifier => &mut self.mana_cost_modifier,
            StatKind::ShadowModifier => &mut self.shadow_modifier,
            StatKind::FireModifier => &mut self.fire_modifier,
            StatKind::Mp5 => &mut self.mp5,
            StatKind::Spirit => &mut self.spirit,
            StatKind::Intellect => &mut self.intellect,
        }
    }

    pub fn apply_delta(&mut self, kind: StatKind, amount: f64, calc: crate::enums::Calculation) {
        let field = self.field_mut(kind);
        match calc {
            crate::enums::Calculation::Additive => *field += amount,
            crate::enums::Calculation::Multiplicative => *field *= amount,
        }
    }

    pub fn revert_delta(&mut self, kind: StatKind, amount: f64, calc: crate::enums::Calculation) {
        let field = self.field_mut(kind);
        match calc {
            crate::enums::Calculation::Additive => *field -= amount,
            crate::enums::Calculation::Multiplicative => *field /= amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Calculation;

    #[test]
    fn apply_then_revert_is_identity() {
        let mut stats = CharacterStats {
            spell_power: 1000.0,
            shadow_modifier: 1.1,
            ..Default::default()
        };
        let baseline = stats.clone();

        stats.apply_delta(StatKind::SpellPower, 150.0, Calculation::Additive);
        stats.apply_delta(StatKind::ShadowModifier, 1.2, Calculation::Multiplicative);
        assert_eq!(stats.spell_power, 1150.0);
        assert!((stats.shadow_modifier - 1.32).abs() < 1e-12);

        stats.revert_delta(StatKind::SpellPower, 150.0, Calculation::Additive);
        stats.revert_delta(StatKind::ShadowModifier, 1.2, Calculation::Multiplicative);
        assert_eq!(stats.spell_power, baseline.spell_power);
        assert!((stats.shadow_modifier - baseline.shadow_modifier).abs() < 1e-12);
    }
}
