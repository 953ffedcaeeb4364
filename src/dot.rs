//! Damage-over-time effects.
//!
//! A DoT snapshots the caster's spell power, damage modifier and partial
//! resist at apply time; later stat changes do not alter an effect that is
//! already ticking. Reapplying refreshes the tick count but keeps the
//! original snapshot, matching the game behavior.

use crate::enums::{SpellId, SpellSchool};

#[derive(Debug, Clone)]
pub struct DamageOverTime {
    pub id: SpellId,
    pub school: SpellSchool,
    pub duration: f64,
    pub tick_interval: f64,
    pub ticks_total: u32,
    pub ticks_remaining: u32,
    pub time_until_next_tick: f64,
    pub active: bool,
    /// Base damage over the full duration, before spell power.
    pub base_total: f64,
    /// Spell-power coefficient over the full duration.
    pub coefficient: f64,
    /// Static multiplier from talents baked in at construction.
    pub base_modifier: f64,
    /// Curse of Agony ramps: early ticks hit for half, late ticks for 150%.
    pub ramps: bool,
    // Apply-time snapshot
    pub snapshot_spell_power: f64,
    pub snapshot_modifier: f64,
    pub snapshot_partial_resist: f64,
    /// Dynamic set-bonus multiplier (T5 4pc grows it on filler hits).
    pub t5_bonus_modifier: f64,
}

impl DamageOverTime {
    fn new(
        id: SpellId,
        school: SpellSchool,
        duration: f64,
        tick_interval: f64,
        base_total: f64,
        coefficient: f64,
    ) -> Self {
        let ticks_total = (duration / tick_interval).round() as u32;
        Self {
            id,
            school,
            duration,
            tick_interval,
            ticks_total,
            ticks_remaining: 0,
            time_until_next_tick: 0.0,
            active: false,
            base_total,
            coefficient,
            base_modifier: 1.0,
            ramps: false,
            snapshot_spell_power: 0.0,
            snapshot_modifier: 1.0,
            snapshot_partial_resist: 1.0,
            t5_bonus_modifier: 1.0,
        }
    }

    /// Apply or refresh. A fresh application snapshots the caster's state;
    /// a refresh only resets the tick schedule.
    pub fn apply(&mut self, spell_power: f64, modifier: f64, partial_resist: f64) {
        if !self.active {
            self.snapshot_spell_power = spell_power;
            self.snapshot_modifier = modifier * self.base_modifier;
            self.snapshot_partial_resist = partial_resist;
            self.t5_bonus_modifier = 1.0;
        }
        self.ticks_remaining = self.ticks_total;
        self.time_until_next_tick = self.tick_interval;
        self.active = true;
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.ticks_remaining = 0;
        self.time_until_next_tick = 0.0;
        self.t5_bonus_modifier = 1.0;
    }

    /// Remaining active time; zero when detached.
    pub fn time_remaining(&self) -> f64 {
        if !self.active {
            return 0.0;
        }
        self.time_until_next_tick + self.tick_interval * (self.ticks_remaining.saturating_sub(1)) as f64
    }

    /// Damage of the next pending tick under the apply-time snapshot.
    pub fn tick_damage(&self) -> f64 {
        let per_tick = (self.base_total + self.snapshot_spell_power * self.coefficient)
            / self.ticks_total as f64;
        let weight = if self.ramps {
            // 12-tick curses: four ticks at 50%, four at 100%, four at 150%.
            let index = self.ticks_total - self.ticks_remaining;
            match index * 3 / self.ticks_total {
                0 => 0.5,
                1 => 1.0,
                _ => 1.5,
            }
        } else {
            1.0
        };
        per_tick * weight * self.snapshot_modifier * self.snapshot_partial_resist * self.t5_bonus_modifier
    }

    /// Advance time; returns the damage of each tick that fired. The last
    /// tick detaches the effect.
    pub fn advance(&mut self, dt: f64) -> Vec<f64> {
        let mut damages = Vec::new();
        if !self.active {
            return damages;
        }
        self.time_until_next_tick -= dt;
        while self.active && self.time_until_next_tick <= 1e-9 {
            damages.push(self.tick_damage());
            self.ticks_remaining -= 1;
            if self.ticks_remaining == 0 {
                self.active = false;
                self.time_until_next_tick = 0.0;
            } else {
                self.time_until_next_tick += self.tick_interval;
            }
        }
        damages
    }

    /// Expected damage over the full duration under the given caster
    /// state. Used by the rotation's damage prediction.
    pub fn predict_damage(&self, spell_power: f64, modifier: f64, partial_resist: f64) -> f64 {
        (self.base_total + spell_power * self.coefficient)
            * modifier
            * self.base_modifier
            * partial_resist
    }
}

// Definition table, rank values from the 2.4.3 spell data.
impl DamageOverTime {
    pub fn corruption(empowered_corruption: u8, contagion: u8) -> Self {
        let mut dot = DamageOverTime::new(
            SpellId::Corruption,
            SpellSchool::Shadow,
            18.0,
            3.0,
            900.0,
            0.936 + 0.12 * f64::from(empowered_corruption),
        );
        dot.base_modifier = 1.0 + 0.01 * f64::from(contagion);
        dot
    }

    pub fn curse_of_agony(improved: u8, contagion: u8) -> Self {
        let mut dot = DamageOverTime::new(
            SpellId::CurseOfAgony,
            SpellSchool::Shadow,
            24.0,
            2.0,
            1356.0,
            1.2,
        );
        dot.base_modifier =
            (1.0 + 0.05 * f64::from(improved)) * (1.0 + 0.01 * f64::from(contagion));
        dot.ramps = true;
        dot
    }

    pub fn siphon_life() -> Self {
        DamageOverTime::new(SpellId::SiphonLife, SpellSchool::Shadow, 30.0, 3.0, 630.0, 1.0)
    }

    pub fn immolate() -> Self {
        DamageOverTime::new(SpellId::Immolate, SpellSchool::Fire, 15.0, 3.0, 615.0, 0.65)
    }

    pub fn unstable_affliction() -> Self {
        DamageOverTime::new(
            SpellId::UnstableAffliction,
            SpellSchool::Shadow,
            18.0,
            3.0,
            1050.0,
            1.2,
        )
    }

    pub fn curse_of_doom() -> Self {
        DamageOverTime::new(SpellId::CurseOfDoom, SpellSchool::Shadow, 60.0, 60.0, 4200.0, 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corruption_ticks_six_times_then_detaches() {
        let mut dot = DamageOverTime::corruption(0, 0);
        dot.apply(500.0, 1.0, 1.0);
        assert!(dot.active);
        assert_eq!(dot.ticks_remaining, 6);

        let expected_tick = (900.0 + 500.0 * 0.936) / 6.0;
        let mut ticks = Vec::new();
        for _ in 0..6 {
            ticks.extend(dot.advance(3.0));
        }
        assert_eq!(ticks.len(), 6);
        for damage in &ticks {
            assert!((damage - expected_tick).abs() < 1e-9);
        }
        assert!(!dot.active);
        assert!(dot.advance(3.0).is_empty());
    }

    #[test]
    fn reapply_refreshes_ticks_without_resnapshotting() {
        let mut dot = DamageOverTime::corruption(0, 0);
        dot.apply(500.0, 1.0, 1.0);
        dot.advance(3.0);
        assert_eq!(dot.ticks_remaining, 5);

        // More spell power mid-flight must not change the ticking damage.
        dot.apply(2000.0, 2.0, 1.0);
        assert_eq!(dot.ticks_remaining, 6);
        assert_eq!(dot.snapshot_spell_power, 500.0);
        assert_eq!(dot.snapshot_modifier, 1.0);
    }

    #[test]
    fn fresh_apply_after_detach_resnapshots() {
        let mut dot = DamageOverTime::corruption(0, 0);
        dot.apply(500.0, 1.0, 1.0);
        for _ in 0..6 {
            dot.advance(3.0);
        }
        assert!(!dot.active);

        dot.apply(800.0, 1.1, 1.0);
        assert_eq!(dot.snapshot_spell_power, 800.0);
    }

    #[test]
    fn agony_ramp_weights_average_to_one() {
        let mut dot = DamageOverTime::curse_of_agony(0, 0);
        dot.apply(0.0, 1.0, 1.0);
        let mut total = 0.0;
        for _ in 0..12 {
            let damages = dot.advance(2.0);
            assert_eq!(damages.len(), 1);
            total += damages[0];
        }
        assert!((total - 1356.0).abs() < 1e-9);
    }

    #[test]
    fn time_remaining_tracks_schedule() {
        let mut dot = DamageOverTime::siphon_life();
        dot.apply(0.0, 1.0, 1.0);
        assert!((dot.time_remaining() - 30.0).abs() < 1e-9);
        dot.advance(3.0);
        assert!((dot.time_remaining() - 27.0).abs() < 1e-9);
    }

    #[test]
    fn curse_of_doom_is_one_big_tick() {
        let mut dot = DamageOverTime::curse_of_doom();
        dot.apply(1000.0, 1.0, 1.0);
        assert!(dot.advance(59.0).is_empty());
        let damages = dot.advance(1.0);
        assert_eq!(damages.len(), 1);
        assert!((damages[0] - (4200.0 + 2.0 * 1000.0)).abs() < 1e-9);
        assert!(!dot.active);
    }
}
