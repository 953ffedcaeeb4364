//! Aura state machine: apply, refresh, stack, fade.
//!
//! An aura owns the stat deltas it grants while active. Deltas are added
//! per stack on apply and reverted in full on fade, so the owning actor's
//! stats always return to baseline.

use crate::enums::{Calculation, SpellId};
use crate::model::stats::{CharacterStats, StatKind};

#[derive(Debug, Clone, Copy)]
pub struct StatMod {
    pub kind: StatKind,
    pub amount: f64,
    pub calc: Calculation,
}

impl StatMod {
    pub fn add(kind: StatKind, amount: f64) -> Self {
        Self {
            kind,
            amount,
            calc: Calculation::Additive,
        }
    }

    pub fn mul(kind: StatKind, amount: f64) -> Self {
        Self {
            kind,
            amount,
            calc: Calculation::Multiplicative,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Aura {
    pub id: SpellId,
    pub duration: f64,
    pub duration_remaining: f64,
    pub active: bool,
    pub stacks: u32,
    pub max_stacks: u32,
    /// One apply grants this many stacks (charge-style auras grant all).
    pub stacks_per_apply: u32,
    /// Damage multiplier read by spell resolution while active.
    pub modifier: f64,
    /// Per-stack stat deltas.
    pub stat_mods: Vec<StatMod>,
}

impl Aura {
    fn new(id: SpellId, duration: f64) -> Self {
        Self {
            id,
            duration,
            duration_remaining: 0.0,
            active: false,
            stacks: 0,
            max_stacks: 1,
            stacks_per_apply: 1,
            modifier: 1.0,
            stat_mods: Vec::new(),
        }
    }

    fn with_mods(mut self, mods: Vec<StatMod>) -> Self {
        self.stat_mods = mods;
        self
    }

    fn with_stacks(mut self, max: u32, per_apply: u32) -> Self {
        self.max_stacks = max;
        self.stacks_per_apply = per_apply;
        self
    }

    fn with_modifier(mut self, modifier: f64) -> Self {
        self.modifier = modifier;
        self
    }

    /// Apply or refresh. Stacking never exceeds the cap; each newly added
    /// stack re-applies the per-stack deltas.
    pub fn apply(&mut self, stats: &mut CharacterStats) {
        let new_stacks = (self.stacks + self.stacks_per_apply).min(self.max_stacks);
        let added = new_stacks - self.stacks;
        for _ in 0..added {
            for m in &self.stat_mods {
                stats.apply_delta(m.kind, m.amount, m.calc);
            }
        }
        self.stacks = new_stacks;
        self.active = true;
        self.duration_remaining = self.duration;
    }

    /// Revert every granted delta and deactivate.
    pub fn fade(&mut self, stats: &mut CharacterStats) {
        for _ in 0..self.stacks {
            for m in &self.stat_mods {
                stats.revert_delta(m.kind, m.amount, m.calc);
            }
        }
        self.stacks = 0;
        self.active = false;
        self.duration_remaining = 0.0;
    }

    /// Consume one stack; the aura fades when the last one goes.
    pub fn decrement_stacks(&mut self, stats: &mut CharacterStats) {
        if !self.active {
            return;
        }
        if self.stacks <= 1 {
            self.fade(stats);
        } else {
            self.stacks -= 1;
            for m in &self.stat_mods {
                stats.revert_delta(m.kind, m.amount, m.calc);
            }
        }
    }

    /// Returns true when the aura faded on this tick.
    pub fn tick(&mut self, dt: f64, stats: &mut CharacterStats) -> bool {
        if !self.active {
            return false;
        }
        self.duration_remaining -= dt;
        if self.duration_remaining <= 0.0 {
            self.fade(stats);
            return true;
        }
        false
    }
}

// Definition table. Durations and magnitudes follow the TBC items and
// talents these auras come from.
impl Aura {
    pub fn improved_shadow_bolt(points: u8) -> Self {
        Aura::new(SpellId::ImprovedShadowBolt, 12.0)
            .with_stacks(4, 4)
            .with_modifier(1.0 + 0.04 * f64::from(points))
    }

    pub fn shadow_trance() -> Self {
        Aura::new(SpellId::ShadowTrance, 10.0)
    }

    pub fn power_infusion() -> Self {
        Aura::new(SpellId::PowerInfusion, 15.0).with_mods(vec![
            StatMod::add(StatKind::SpellHastePercent, 20.0),
            StatMod::mul(StatKind::ManaCostModifier, 0.8),
        ])
    }

    pub fn destruction_potion() -> Self {
        Aura::new(SpellId::DestructionPotion, 15.0).with_mods(vec![
            StatMod::add(StatKind::SpellPower, 120.0),
            StatMod::add(StatKind::SpellCritChance, 2.0),
        ])
    }

    pub fn flame_cap() -> Self {
        Aura::new(SpellId::FlameCap, 60.0).with_mods(vec![StatMod::add(StatKind::FirePower, 80.0)])
    }

    pub fn blood_fury() -> Self {
        Aura::new(SpellId::BloodFury, 15.0).with_mods(vec![StatMod::add(StatKind::SpellPower, 140.0)])
    }

    pub fn bloodlust() -> Self {
        Aura::new(SpellId::Bloodlust, 40.0)
            .with_mods(vec![StatMod::add(StatKind::SpellHastePercent, 30.0)])
    }

    pub fn drums_of_battle() -> Self {
        Aura::new(SpellId::DrumsOfBattle, 30.0)
            .with_mods(vec![StatMod::add(StatKind::SpellHasteRating, 80.0)])
    }

    pub fn innervate() -> Self {
        Aura::new(SpellId::Innervate, 20.0).with_mods(vec![StatMod::mul(StatKind::Spirit, 5.0)])
    }

    pub fn amplify_curse() -> Self {
        Aura::new(SpellId::AmplifyCurse, 30.0)
    }

    pub fn curse_of_the_elements(improved: u8) -> Self {
        let m = 1.1 + 0.01 * f64::from(improved);
        Aura::new(SpellId::CurseOfTheElements, 300.0).with_mods(vec![
            StatMod::mul(StatKind::ShadowModifier, m),
            StatMod::mul(StatKind::FireModifier, m),
        ])
    }

    pub fn curse_of_recklessness() -> Self {
        // Attack power debuff; nothing a caster's stats care about.
        Aura::new(SpellId::CurseOfRecklessness, 120.0)
    }

    pub fn the_lightning_capacitor() -> Self {
        Aura::new(SpellId::TheLightningCapacitor, 120.0).with_stacks(3, 1)
    }

    pub fn shiffars_nexus_horn() -> Self {
        Aura::new(SpellId::ShiffarsNexusHorn, 10.0)
            .with_mods(vec![StatMod::add(StatKind::SpellPower, 225.0)])
    }

    pub fn sextant_of_unstable_currents() -> Self {
        Aura::new(SpellId::SextantOfUnstableCurrents, 15.0)
            .with_mods(vec![StatMod::add(StatKind::SpellPower, 190.0)])
    }

    pub fn quagmirrans_eye() -> Self {
        Aura::new(SpellId::QuagmirransEye, 6.0)
            .with_mods(vec![StatMod::add(StatKind::SpellHasteRating, 320.0)])
    }

    pub fn blade_of_wizardry() -> Self {
        Aura::new(SpellId::BladeOfWizardry, 6.0)
            .with_mods(vec![StatMod::add(StatKind::SpellHasteRating, 280.0)])
    }

    pub fn band_of_the_eternal_sage() -> Self {
        Aura::new(SpellId::BandOfTheEternalSage, 10.0)
            .with_mods(vec![StatMod::add(StatKind::SpellPower, 95.0)])
    }

    pub fn robe_of_the_elder_scribes() -> Self {
        Aura::new(SpellId::RobeOfTheElderScribes, 10.0)
            .with_mods(vec![StatMod::add(StatKind::SpellPower, 130.0)])
    }

    pub fn mystical_skyfire_diamond() -> Self {
        Aura::new(SpellId::MysticalSkyfireDiamond, 4.0)
            .with_mods(vec![StatMod::add(StatKind::SpellHasteRating, 320.0)])
    }

    pub fn flameshadow() -> Self {
        Aura::new(SpellId::Flameshadow, 15.0)
            .with_mods(vec![StatMod::add(StatKind::ShadowPower, 135.0)])
    }

    pub fn shadowflame() -> Self {
        Aura::new(SpellId::Shadowflame, 15.0)
            .with_mods(vec![StatMod::add(StatKind::FirePower, 135.0)])
    }

    pub fn spellstrike() -> Self {
        Aura::new(SpellId::Spellstrike, 10.0)
            .with_mods(vec![StatMod::add(StatKind::SpellPower, 92.0)])
    }

    pub fn mana_etched_4_set() -> Self {
        Aura::new(SpellId::ManaEtched4Set, 15.0)
            .with_mods(vec![StatMod::add(StatKind::SpellPower, 110.0)])
    }

    pub fn ashtongue_talisman_of_shadows() -> Self {
        Aura::new(SpellId::AshtongueTalismanOfShadows, 5.0)
            .with_mods(vec![StatMod::add(StatKind::SpellPower, 220.0)])
    }

    pub fn wrath_of_cenarius() -> Self {
        Aura::new(SpellId::WrathOfCenarius, 10.0)
            .with_mods(vec![StatMod::add(StatKind::SpellPower, 132.0)])
    }

    pub fn darkmoon_card_crusade() -> Self {
        Aura::new(SpellId::DarkmoonCardCrusade, 10.0)
            .with_stacks(10, 1)
            .with_mods(vec![StatMod::add(StatKind::SpellPower, 8.0)])
    }

    pub fn shattered_sun_pendant_aldor() -> Self {
        Aura::new(SpellId::ShatteredSunPendantAldor, 10.0)
            .with_mods(vec![StatMod::add(StatKind::SpellPower, 120.0)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_refreshes_duration_and_adds_deltas() {
        let mut stats = CharacterStats::default();
        let mut aura = Aura::destruction_potion();

        aura.apply(&mut stats);
        assert!(aura.active);
        assert_eq!(aura.duration_remaining, 15.0);
        assert_eq!(stats.spell_power, 120.0);

        aura.tick(10.0, &mut stats);
        aura.apply(&mut stats);
        assert_eq!(aura.duration_remaining, 15.0);
        // Refresh of a non-stacking aura must not double the delta.
        assert_eq!(stats.spell_power, 120.0);
    }

    #[test]
    fn fade_reverts_all_stacks() {
        let mut stats = CharacterStats::default();
        let mut aura = Aura::darkmoon_card_crusade();
        for _ in 0..4 {
            aura.apply(&mut stats);
        }
        assert_eq!(aura.stacks, 4);
        assert_eq!(stats.spell_power, 32.0);

        aura.fade(&mut stats);
        assert_eq!(aura.stacks, 0);
        assert!(!aura.active);
        assert_eq!(stats.spell_power, 0.0);
    }

    #[test]
    fn stacks_cap_at_max() {
        let mut stats = CharacterStats::default();
        let mut aura = Aura::darkmoon_card_crusade();
        for _ in 0..15 {
            aura.apply(&mut stats);
        }
        assert_eq!(aura.stacks, 10);
        assert_eq!(stats.spell_power, 80.0);
    }

    #[test]
    fn charge_auras_grant_full_stacks_per_apply() {
        let mut stats = CharacterStats::default();
        let mut aura = Aura::improved_shadow_bolt(5);
        aura.apply(&mut stats);
        assert_eq!(aura.stacks, 4);
        assert!((aura.modifier - 1.2).abs() < 1e-12);

        aura.decrement_stacks(&mut stats);
        assert_eq!(aura.stacks, 3);
        for _ in 0..3 {
            aura.decrement_stacks(&mut stats);
        }
        assert!(!aura.active);
    }

    #[test]
    fn expiry_fires_exactly_once() {
        let mut stats = CharacterStats::default();
        let mut aura = Aura::blood_fury();
        aura.apply(&mut stats);
        assert!(!aura.tick(14.0, &mut stats));
        assert!(aura.tick(1.0, &mut stats));
        assert!(!aura.tick(1.0, &mut stats));
        assert_eq!(stats.spell_power, 0.0);
    }
}
