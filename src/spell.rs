//! Spell state machine and damage resolution.
//!
//! The lifecycle is `idle -> casting -> resolving -> idle`. The common path
//! lives in free functions parameterized by the spell's data; per-spell
//! behavior differences are a tagged match on `SpellId` at the few points
//! where the original abilities deviate (Shadow Bolt's instant-cast
//! charge, The Lightning Capacitor's charge counter, Seed of Corruption's
//! capped AoE split, Immolate's talent re-weighting).
//!
//! All of these functions take `&mut Player` instead of holding a back
//! reference; the spell arena lives on the player and is addressed by
//! index.

use crate::enums::{SpellId, SpellSchool, SpellType};
use crate::error_handling::SimulationError;
use crate::model::settings::CHAOTIC_SKYFIRE_DIAMOND;
use crate::player::{Player, CRIT_DAMAGE_MULTIPLIER};

#[derive(Debug, Clone)]
pub struct Spell {
    pub id: SpellId,
    pub school: SpellSchool,
    pub spell_type: SpellType,
    pub min_dmg: f64,
    pub max_dmg: f64,
    pub dmg: f64,
    pub bonus_damage_from_immolate_min: f64,
    pub bonus_damage_from_immolate_max: f64,
    pub bonus_damage_from_immolate_average: f64,
    pub aoe_cap: f64,
    pub mana_cost: f64,
    pub min_mana: f64,
    pub max_mana: f64,
    pub mana_gain: f64,
    pub cast_time: f64,
    pub cooldown: f64,
    pub cooldown_remaining: f64,
    pub coefficient: f64,
    pub modifier: f64,
    pub bonus_crit: f64,
    pub can_crit: bool,
    pub can_miss: bool,
    pub does_damage: bool,
    pub is_item: bool,
    pub is_proc: bool,
    pub is_finisher: bool,
    pub is_non_warlock_ability: bool,
    pub on_gcd: bool,
    pub usable_once_per_fight: bool,
    pub has_not_been_cast_this_fight: bool,
    pub gain_mana_on_cast: bool,
    pub proc_chance: f64,
    pub casting: bool,
    pub aura_effect: Option<SpellId>,
    pub dot_effect: Option<SpellId>,
    pub procs_on_hit: bool,
    pub on_hit_procs_enabled: bool,
    pub procs_on_crit: bool,
    pub on_crit_procs_enabled: bool,
    pub procs_on_dot_ticks: bool,
    pub on_dot_tick_procs_enabled: bool,
    pub procs_on_damage: bool,
    pub on_damage_procs_enabled: bool,
    pub procs_from_shadow_spells: bool,
    pub procs_from_fire_spells: bool,
}

impl Spell {
    pub(crate) fn base(id: SpellId) -> Self {
        Self {
            id,
            school: SpellSchool::None,
            spell_type: SpellType::None,
            min_dmg: 0.0,
            max_dmg: 0.0,
            dmg: 0.0,
            bonus_damage_from_immolate_min: 0.0,
            bonus_damage_from_immolate_max: 0.0,
            bonus_damage_from_immolate_average: 0.0,
            aoe_cap: 0.0,
            mana_cost: 0.0,
            min_mana: 0.0,
            max_mana: 0.0,
            mana_gain: 0.0,
            cast_time: 0.0,
            cooldown: 0.0,
            cooldown_remaining: 0.0,
            coefficient: 0.0,
            modifier: 1.0,
            bonus_crit: 0.0,
            can_crit: false,
            can_miss: false,
            does_damage: false,
            is_item: false,
            is_proc: false,
            is_finisher: false,
            is_non_warlock_ability: false,
            on_gcd: true,
            usable_once_per_fight: false,
            has_not_been_cast_this_fight: true,
            gain_mana_on_cast: false,
            proc_chance: 0.0,
            casting: false,
            aura_effect: None,
            dot_effect: None,
            procs_on_hit: false,
            on_hit_procs_enabled: false,
            procs_on_crit: false,
            on_crit_procs_enabled: false,
            procs_on_dot_ticks: false,
            on_dot_tick_procs_enabled: false,
            procs_on_damage: false,
            on_damage_procs_enabled: false,
            procs_from_shadow_spells: true,
            procs_from_fire_spells: true,
        }
    }

    /// Derive the averaged fields once the min/max pairs are set.
    pub(crate) fn finish(mut self) -> Self {
        if self.min_dmg > 0.0 && self.max_dmg > 0.0 {
            self.dmg = (self.min_dmg + self.max_dmg) / 2.0;
        }
        if self.min_mana > 0.0 && self.max_mana > 0.0 {
            self.mana_gain = (self.min_mana + self.max_mana) / 2.0;
        }
        if self.bonus_damage_from_immolate_min > 0.0 && self.bonus_damage_from_immolate_max > 0.0 {
            self.bonus_damage_from_immolate_average =
                (self.bonus_damage_from_immolate_min + self.bonus_damage_from_immolate_max) / 2.0;
        }
        self
    }

    pub fn reset(&mut self) {
        self.cooldown_remaining = 0.0;
        self.casting = false;
        self.has_not_been_cast_this_fight = true;
    }
}

/// `(base, total, damage_modifier, partial_resist, spell_power)` of a
/// resolution, before crit.
pub struct ConstantDamage {
    pub base: f64,
    pub total: f64,
    pub modifier: f64,
    pub partial_resist: f64,
    pub spell_power: f64,
}

pub fn can_cast(player: &Player, idx: usize) -> bool {
    let s = &player.spells[idx];
    s.cooldown_remaining <= 0.0
        && (s.is_non_warlock_ability
            || ((!s.on_gcd || player.gcd_remaining <= 0.0)
                && (s.is_proc || player.cast_time_remaining <= 0.0)))
        && (!s.usable_once_per_fight || s.has_not_been_cast_this_fight)
}

pub fn mana_cost(player: &Player, idx: usize) -> f64 {
    player.spells[idx].mana_cost * player.stats.mana_cost_modifier
}

pub fn has_enough_mana(player: &Player, idx: usize) -> bool {
    player.sim.infinite_player_mana || mana_cost(player, idx) <= player.stats.mana
}

pub fn ready(player: &Player, idx: usize) -> bool {
    can_cast(player, idx) && has_enough_mana(player, idx)
}

pub fn start_cast(
    player: &mut Player,
    idx: usize,
    predicted_damage: f64,
) -> Result<(), SimulationError> {
    let id = player.spells[idx].id;

    // The Lightning Capacitor accumulates a charge per triggering crit and
    // only discharges on the third.
    if id == SpellId::TheLightningCapacitor {
        if player.spells[idx].cooldown_remaining <= 0.0 {
            player.apply_aura(SpellId::TheLightningCapacitor);
            if player.aura_stacks(SpellId::TheLightningCapacitor) == 3 {
                cast(player, idx)?;
                let cooldown = player.spells[idx].cooldown;
                player.spells[idx].cooldown_remaining = cooldown;
                player.fade_aura(SpellId::TheLightningCapacitor);
            }
        }
        return Ok(());
    }
    // Conflagrate never fires in the source build.
    if id == SpellId::Conflagrate {
        return Ok(());
    }

    let (on_gcd, non_warlock, is_proc) = {
        let s = &player.spells[idx];
        (s.on_gcd, s.is_non_warlock_ability, s.is_proc)
    };

    if on_gcd && !non_warlock {
        if player.gcd_remaining > 0.0 {
            return Err(SimulationError::GcdViolation {
                spell: id,
                remaining: player.gcd_remaining,
            });
        }
        player.gcd_remaining = player.gcd_value();
    }
    if player.cast_time_remaining > 0.0 && !non_warlock && !is_proc {
        return Err(SimulationError::CastOverlap {
            spell: id,
            remaining: player.cast_time_remaining,
        });
    }
    {
        let s = &player.spells[idx];
        if s.cooldown > 0.0 && s.cooldown_remaining > 0.0 {
            return Err(SimulationError::CooldownViolation {
                spell: id,
                remaining: s.cooldown_remaining,
            });
        }
    }

    let mut base_cast = player.spells[idx].cast_time;
    // A Nightfall charge makes the next Shadow Bolt instant.
    if id == SpellId::ShadowBolt && player.aura_active(SpellId::ShadowTrance) {
        base_cast = 0.0;
        player.fade_aura(SpellId::ShadowTrance);
    }

    if base_cast > 0.0 {
        player.spells[idx].casting = true;
        player.casting_spell = Some(idx);
        player.cast_time_remaining = player.observed_cast_time(base_cast);
        if !is_proc && player.should_log() {
            let haste = (player.haste_multiplier() - 1.0) * 100.0;
            player.log(format!(
                "Started casting {} - Cast time: {:.4} ({:.4}% haste at a base cast speed of {:.2})",
                id,
                player.cast_time_remaining - crate::player::SPELL_DELAY,
                haste,
                base_cast
            ));
        }
    } else {
        if !is_proc && player.should_log() {
            player.log(format!("Cast {}", id));
        }
        cast(player, idx)?;
    }

    if on_gcd && !non_warlock && player.should_log() {
        player.log(format!("Global cooldown: {:.4}", player.gcd_remaining));
    }
    if predicted_damage > 0.0 && player.should_log() {
        player.log(format!(
            "{} - Estimated damage / cast time: {:.0}",
            id,
            predicted_damage.round()
        ));
    }
    Ok(())
}

/// Per-frame spell bookkeeping: cooldown countdown (with its cross-zero
/// notification) and cast completion.
pub fn spell_tick(player: &mut Player, idx: usize, dt: f64) -> Result<(), SimulationError> {
    let id = player.spells[idx].id;
    let cooldown_remaining = player.spells[idx].cooldown_remaining;
    if cooldown_remaining > 0.0 && cooldown_remaining - dt <= 0.0 {
        if id == SpellId::PowerInfusion {
            player.power_infusions_ready += 1;
        }
        if player.should_log() {
            player.log(format!("{} is off cooldown", id));
        }
    }
    player.spells[idx].cooldown_remaining -= dt;

    if player.spells[idx].casting && player.cast_time_remaining <= 0.0 {
        cast(player, idx)?;
    }
    Ok(())
}

pub fn cast(player: &mut Player, idx: usize) -> Result<(), SimulationError> {
    let id = player.spells[idx].id;
    let current_mana = player.stats.mana;

    {
        let s = &mut player.spells[idx];
        s.cooldown_remaining = s.cooldown;
        s.casting = false;
        s.has_not_been_cast_this_fight = false;
    }
    if player.casting_spell == Some(idx) {
        player.casting_spell = None;
        player.cast_time_remaining = 0.0;
    }
    if id == SpellId::PowerInfusion {
        player.power_infusions_ready = player.power_infusions_ready.saturating_sub(1);
    }
    player.breakdown.entry(id).casts += 1;

    let (spell_mana_cost, spell_cast_time) = {
        let s = &player.spells[idx];
        (s.mana_cost, s.cast_time)
    };
    if spell_mana_cost > 0.0 && !player.sim.infinite_player_mana {
        let cost = mana_cost(player, idx);
        player.stats.mana -= cost;
        player.five_second_rule_timer = 5.0;
        if spell_cast_time > 0.0 && player.should_log() {
            player.log(format!(
                "Finished casting {} - Mana: {:.0} -> {:.0} - Mana cost: {:.0}",
                id, current_mana, player.stats.mana, cost
            ));
        }
    }

    // Mana returns. Life Tap and Dark Pact scale with shadow power at cast
    // time; everything else uses the precomputed gain.
    let mana_gain = match id {
        SpellId::LifeTap => {
            (582.0 + 0.8 * player.spell_power(SpellSchool::Shadow))
                * (1.0 + 0.1 * f64::from(player.settings.talents.improved_life_tap))
        }
        SpellId::DarkPact => 700.0 + 0.96 * player.spell_power(SpellSchool::Shadow),
        _ if player.spells[idx].gain_mana_on_cast => player.spells[idx].mana_gain,
        _ => 0.0,
    };
    if mana_gain > 0.0 {
        let before = player.stats.mana;
        player.stats.mana = (before + mana_gain).min(player.stats.max_mana);
        let gained = player.stats.mana - before;
        player.breakdown.add_mana_gain(id, gained);
        if player.should_log() {
            player.log(format!(
                "Player gains {:.0} mana from {} ({:.0} -> {:.0})",
                gained, id, before, player.stats.mana
            ));
        }
    }

    // Power-core consumables share a cooldown with each other, the rune
    // and Flame Cap.
    match id {
        SpellId::FlameCap => {
            let cd = player.spells[idx].cooldown;
            player.put_on_cooldown(SpellId::ChippedPowerCore, cd);
            player.put_on_cooldown(SpellId::CrackedPowerCore, cd);
        }
        SpellId::ChippedPowerCore | SpellId::CrackedPowerCore => {
            let cd = player.spells[idx].cooldown;
            player.put_on_cooldown(SpellId::DemonicRune, cd);
            player.put_on_cooldown(SpellId::FlameCap, cd);
            let other = if id == SpellId::ChippedPowerCore {
                SpellId::CrackedPowerCore
            } else {
                SpellId::ChippedPowerCore
            };
            player.put_on_cooldown(other, cd);
        }
        _ => {}
    }

    let (can_crit, bonus_crit, can_miss, spell_type) = {
        let s = &player.spells[idx];
        (s.can_crit, s.bonus_crit, s.can_miss, s.spell_type)
    };

    let mut is_crit = false;
    if can_crit {
        is_crit = player.is_crit(spell_type, bonus_crit);
        if is_crit {
            // Counted whether or not the cast subsequently misses, so the
            // displayed crit percentage reflects attempts.
            player.breakdown.entry(id).crits += 1;
        }
    }

    if can_miss && !player.is_hit(spell_type) {
        if player.should_log() {
            player.log(format!("{} *resist*", id));
        }
        player.breakdown.entry(id).misses += 1;
        return Ok(());
    }

    if let Some(aura_id) = player.spells[idx].aura_effect {
        player.apply_aura(aura_id);
    }
    if let Some(dot_id) = player.spells[idx].dot_effect {
        apply_dot_effect(player, idx, dot_id);
    }
    if player.spells[idx].does_damage {
        if id == SpellId::SeedOfCorruption {
            seed_damage(player, idx)?;
        } else {
            damage(player, idx, is_crit)?;
        }
    }

    let (is_item, is_proc, non_warlock, school) = {
        let s = &player.spells[idx];
        (s.is_item, s.is_proc, s.is_non_warlock_ability, s.school)
    };
    if !is_item && !is_proc && !non_warlock && id != SpellId::AmplifyCurse {
        on_hit_procs(player, school, id)?;
    }
    Ok(())
}

fn apply_dot_effect(player: &mut Player, idx: usize, dot_id: SpellId) {
    let school = player.spells[idx].school;
    let spell_power = player.spell_power(school);
    let modifier = get_modifier(player, idx);
    let partial_resist = player.partial_resist_multiplier(school);
    player.apply_dot(dot_id, spell_power, modifier, partial_resist);
}

/// School and debuff scaling shared by every damage path.
pub fn get_modifier(player: &Player, idx: usize) -> f64 {
    let s = &player.spells[idx];
    let mut modifier = s.modifier;
    match s.school {
        SpellSchool::Shadow => {
            modifier *= player.stats.shadow_modifier;
            if !player.sim.using_custom_isb_uptime
                && player.aura_active(SpellId::ImprovedShadowBolt)
            {
                modifier *= player.aura_modifier(SpellId::ImprovedShadowBolt);
            }
        }
        SpellSchool::Fire => modifier *= player.stats.fire_modifier,
        SpellSchool::None => {}
    }

    let talents = &player.settings.talents;
    match s.id {
        SpellId::Immolate => {
            // Emberstorm is already part of the generic fire bonus; divide
            // it out and re-apply together with Improved Immolate, which
            // only affects the direct portion.
            if talents.emberstorm > 0 {
                modifier /= 1.0 + 0.02 * f64::from(talents.emberstorm);
            }
            modifier *= 1.0
                + (0.02 * f64::from(talents.emberstorm)
                    + 0.05 * f64::from(talents.improved_immolate));
        }
        SpellId::SeedOfCorruption => {
            if talents.shadow_mastery > 0 && talents.contagion > 0 {
                modifier /= 1.0 + 0.02 * f64::from(talents.shadow_mastery);
                modifier *= 1.0
                    + (0.02 * f64::from(talents.shadow_mastery)
                        + f64::from(talents.contagion) / 100.0);
            }
        }
        _ => {}
    }
    modifier
}

pub fn get_crit_multiplier(player: &Player, idx: usize) -> f64 {
    let mut crit_multiplier = CRIT_DAMAGE_MULTIPLIER;
    if player.settings.meta_gem_id == CHAOTIC_SKYFIRE_DIAMOND {
        crit_multiplier *= 1.03;
    }
    // Ruin doubles the bonus of the crit, not the crit itself.
    if player.spells[idx].spell_type == SpellType::Destruction && player.settings.talents.ruin > 0 {
        crit_multiplier = 1.0 + 2.0 * (crit_multiplier - 1.0);
    }
    crit_multiplier
}

/// Non-crit resolution of the spell: rolled (or averaged) base damage plus
/// spell power scaling, then modifier and partial resist.
pub fn get_constant_damage(player: &mut Player, idx: usize, no_rng: bool) -> ConstantDamage {
    let (min_dmg, max_dmg, dmg, coefficient, school, id) = {
        let s = &player.spells[idx];
        (s.min_dmg, s.max_dmg, s.dmg, s.coefficient, s.school, s.id)
    };
    let randomize = player.sim.randomize_values && min_dmg > 0.0 && max_dmg > 0.0 && !no_rng;
    let base = if randomize {
        player.rng.uniform_range(min_dmg, max_dmg)
    } else {
        dmg
    };
    let mut total = base;

    // Incinerate hits harder while the target is burning.
    if id == SpellId::Incinerate && player.dot_active(SpellId::Immolate) {
        let s = &player.spells[idx];
        let (bonus_min, bonus_max, bonus_avg) = (
            s.bonus_damage_from_immolate_min,
            s.bonus_damage_from_immolate_max,
            s.bonus_damage_from_immolate_average,
        );
        total += if player.sim.randomize_values && !no_rng {
            player.rng.uniform_range(bonus_min, bonus_max)
        } else {
            bonus_avg
        };
    }

    let spell_power = player.spell_power(school);
    let modifier = get_modifier(player, idx);
    let partial_resist = player.partial_resist_multiplier(school);
    total += spell_power * coefficient;
    total *= modifier;
    total *= partial_resist;

    ConstantDamage {
        base,
        total,
        modifier,
        partial_resist,
        spell_power,
    }
}

fn damage(player: &mut Player, idx: usize, is_crit: bool) -> Result<(), SimulationError> {
    let id = player.spells[idx].id;
    let constant = get_constant_damage(player, idx, false);
    let mut total_damage = constant.total;
    let mut crit_multiplier = CRIT_DAMAGE_MULTIPLIER;

    let (school, has_dot) = {
        let s = &player.spells[idx];
        (s.school, s.dot_effect.is_some())
    };

    if is_crit {
        crit_multiplier = get_crit_multiplier(player, idx);
        total_damage *= crit_multiplier;
        on_crit_procs(player, id)?;
    } else if school == SpellSchool::Shadow
        && !has_dot
        && !player.sim.using_custom_isb_uptime
        && player.aura_active(SpellId::ImprovedShadowBolt)
    {
        // Each shadow direct hit eats one of the debuff's charges.
        player.decrement_aura_stacks(SpellId::ImprovedShadowBolt);
    }

    on_damage_procs(player)?;
    player.iteration_damage += total_damage;
    player.breakdown.add_damage(id, total_damage);

    if player.should_log() {
        let mut msg = format!(
            "{} {}{:.0}{} ({:.1} base - {:.3} coefficient - {:.0} spell power - ",
            id,
            if is_crit { "*" } else { "" },
            total_damage.round(),
            if is_crit { "*" } else { "" },
            constant.base,
            player.spells[idx].coefficient,
            constant.spell_power,
        );
        if is_crit {
            msg.push_str(&format!("{:.3}% crit multiplier - ", crit_multiplier * 100.0));
        }
        msg.push_str(&format!(
            "{:.2}% damage modifier - {:.1}% partial resist multiplier)",
            constant.modifier * 100.0,
            constant.partial_resist * 100.0
        ));
        player.log(msg);
    }

    // T5 4pc: the filler feeds the matching DoT.
    if player.settings.sets.t5 >= 4 {
        if id == SpellId::ShadowBolt && player.dot_active(SpellId::Corruption) {
            player.boost_dot_t5_bonus(SpellId::Corruption, 1.1);
        } else if id == SpellId::Incinerate && player.dot_active(SpellId::Immolate) {
            player.boost_dot_t5_bonus(SpellId::Immolate, 1.1);
        }
    }
    Ok(())
}

/// Seed of Corruption detonation. Per-target hit and crit rolls, an AoE
/// cap split that reproduces the off-by-one game bug (the cap divisor
/// includes the seeded target that the explosion cannot hit), debuff
/// modifiers factored out of the capped portion and re-applied after.
fn seed_damage(player: &mut Player, idx: usize) -> Result<(), SimulationError> {
    let (min_dmg, max_dmg, dmg, coefficient, aoe_cap, school, spell_type) = {
        let s = &player.spells[idx];
        (
            s.min_dmg, s.max_dmg, s.dmg, s.coefficient, s.aoe_cap, s.school, s.spell_type,
        )
    };
    let base_damage = if player.sim.randomize_values && min_dmg > 0.0 && max_dmg > 0.0 {
        player.rng.uniform_range(min_dmg, max_dmg)
    } else {
        dmg
    };
    // The target carrying the seed is not hit by its own explosion.
    let enemy_amount = player.enemy.amount.saturating_sub(1);
    let spell_power = player.spell_power(school);
    let mut internal_modifier = get_modifier(player, idx);
    let mut external_modifier = 1.0;

    // Debuffs ignore the AoE cap; pull them out and re-apply on the capped
    // total.
    if player.settings.auras.curse_of_the_elements {
        let m = 1.1 + 0.01 * f64::from(player.settings.talents.improved_curse_of_the_elements);
        internal_modifier /= m;
        external_modifier *= m;
    }
    if player.settings.auras.shadow_weaving {
        internal_modifier /= 1.1;
        external_modifier *= 1.1;
    }
    if player.settings.auras.misery {
        internal_modifier /= 1.05;
        external_modifier *= 1.05;
    }

    let mut resist_amount: u32 = 0;
    let mut crit_amount: u32 = 0;
    for _ in 0..enemy_amount {
        if !player.is_hit(spell_type) {
            resist_amount += 1;
        } else {
            on_damage_procs(player)?;
            if player.is_crit(spell_type, 0.0) {
                crit_amount += 1;
                on_crit_procs(player, SpellId::SeedOfCorruption)?;
            }
        }
    }

    let mut individual_damage = base_damage + spell_power * coefficient;
    if player.settings.sets.oblivion >= 4 {
        individual_damage += 180.0;
    }
    individual_damage *= internal_modifier;

    let enemies_hit = enemy_amount - resist_amount;
    let mut total_damage = individual_damage * enemies_hit as f64;
    // The cap the game actually enforces is lower than the nominal one:
    // the divisor counts the seeded target even though it takes no damage.
    let true_aoe_cap = aoe_cap * enemies_hit as f64 / (enemies_hit + 1) as f64;
    if total_damage > true_aoe_cap && enemies_hit > 0 {
        individual_damage = true_aoe_cap / enemies_hit as f64;
        total_damage = individual_damage * enemies_hit as f64;
    }
    let mut crit_multiplier = 0.0;
    if crit_amount > 0 {
        crit_multiplier = get_crit_multiplier(player, idx);
        let bonus_from_crit = individual_damage * crit_multiplier - individual_damage;
        total_damage += bonus_from_crit * crit_amount as f64;
    }
    let partial_resist = player.partial_resist_multiplier(school);
    total_damage *= partial_resist;
    total_damage *= external_modifier;

    player.iteration_damage += total_damage;
    player.breakdown.add_damage(SpellId::SeedOfCorruption, total_damage);

    if player.should_log() {
        let mut msg = format!(
            "{} {:.0} ({} enemies ({} resists & {} crits) - {:.0} base damage - {:.3} coefficient - {:.0} spell power - {:.1}% modifier",
            SpellId::SeedOfCorruption,
            total_damage.round(),
            enemy_amount,
            resist_amount,
            crit_amount,
            base_damage,
            coefficient,
            spell_power,
            internal_modifier * external_modifier * 100.0,
        );
        if crit_amount > 0 {
            msg.push_str(&format!(" - {:.3} crit multiplier", crit_multiplier));
        }
        msg.push_str(&format!(
            " - {:.1}% partial resist multiplier)",
            partial_resist * 100.0
        ));
        player.log(msg);
    }

    let entry = player.breakdown.entry(SpellId::SeedOfCorruption);
    entry.crits += u64::from(crit_amount);
    entry.misses += u64::from(resist_amount);
    // cast() already counted one cast.
    entry.casts += u64::from(enemies_hit.saturating_sub(1));
    Ok(())
}

/// Expected damage per second of execution time, used to pick between
/// filler candidates and for the combat log estimate.
pub fn predict_damage(player: &mut Player, idx: usize) -> f64 {
    let constant = get_constant_damage(player, idx, true);
    let normal_damage = constant.total;
    let (can_crit, spell_type, school, cast_time, dot_effect) = {
        let s = &player.spells[idx];
        (s.can_crit, s.spell_type, s.school, s.cast_time, s.dot_effect)
    };

    let mut estimated = if can_crit {
        let crit_damage = normal_damage * get_crit_multiplier(player, idx);
        let crit_chance = player.crit_chance(spell_type) / 100.0;
        normal_damage * (1.0 - crit_chance) + crit_damage * crit_chance
    } else {
        normal_damage
    };

    if let Some(dot_id) = dot_effect {
        estimated += player.predict_dot_damage(dot_id, constant.spell_power, constant.modifier);
    }

    // Average-case bonus for shadow spells when the Improved Shadow Bolt
    // debuff is tracked but currently down; without it the prediction
    // would never favor Shadow Bolt over Incinerate.
    if school == SpellSchool::Shadow
        && !player.sim.using_custom_isb_uptime
        && player.has_aura(SpellId::ImprovedShadowBolt)
        && !player.aura_active(SpellId::ImprovedShadowBolt)
    {
        estimated *= 1.15;
    }

    let hit_chance = player.hit_chance(spell_type) / 100.0;
    let execution_time = player.gcd_value().max(player.observed_cast_time(cast_time));
    estimated * hit_chance / execution_time
}

pub fn on_hit_procs(
    player: &mut Player,
    school: SpellSchool,
    _source: SpellId,
) -> Result<(), SimulationError> {
    for i in 0..player.on_hit_procs.len() {
        let proc_idx = player.on_hit_procs[i];
        if !ready(player, proc_idx) {
            continue;
        }
        let (from_shadow, from_fire, chance) = {
            let p = &player.spells[proc_idx];
            (p.procs_from_shadow_spells, p.procs_from_fire_spells, p.proc_chance)
        };
        let school_ok = (school == SpellSchool::Shadow && from_shadow)
            || (school == SpellSchool::Fire && from_fire);
        if school_ok && player.rng.roll_chance(chance) {
            start_cast(player, proc_idx, 0.0)?;
        }
    }
    Ok(())
}

pub fn on_crit_procs(player: &mut Player, source: SpellId) -> Result<(), SimulationError> {
    for i in 0..player.on_crit_procs.len() {
        let proc_idx = player.on_crit_procs[i];
        let (proc_id, chance) = {
            let p = &player.spells[proc_idx];
            (p.id, p.proc_chance)
        };
        // The Improved Shadow Bolt debuff only comes from Shadow Bolt
        // crits.
        if proc_id == SpellId::ImprovedShadowBolt && source != SpellId::ShadowBolt {
            continue;
        }
        if ready(player, proc_idx) && player.rng.roll_chance(chance) {
            start_cast(player, proc_idx, 0.0)?;
        }
    }
    Ok(())
}

pub fn on_damage_procs(player: &mut Player) -> Result<(), SimulationError> {
    for i in 0..player.on_damage_procs.len() {
        let proc_idx = player.on_damage_procs[i];
        let chance = player.spells[proc_idx].proc_chance;
        if ready(player, proc_idx) && player.rng.roll_chance(chance) {
            start_cast(player, proc_idx, 0.0)?;
        }
    }
    Ok(())
}

pub fn on_dot_tick_procs(player: &mut Player) -> Result<(), SimulationError> {
    for i in 0..player.on_dot_tick_procs.len() {
        let proc_idx = player.on_dot_tick_procs[i];
        let chance = player.spells[proc_idx].proc_chance;
        if ready(player, proc_idx) && player.rng.roll_chance(chance) {
            start_cast(player, proc_idx, 0.0)?;
        }
    }
    Ok(())
}
