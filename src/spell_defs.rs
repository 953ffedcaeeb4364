//! Per-spell parameterization and spellbook assembly.
//!
//! Rank values, coefficients and proc rates come from the 2.4.3 game data.
//! `build_spellbook` constructs spells, auras and DoTs in one fixed order,
//! which makes proc registration (and therefore proc firing order)
//! deterministic for a given configuration.

use crate::aura::Aura;
use crate::dot::DamageOverTime;
use crate::enums::{SpellId, SpellSchool, SpellType};
use crate::model::settings::{
    CurseChoice, FillerChoice, PlayerSettings, SimulationSettings, Trinket,
    INSIGHTFUL_EARTHSTORM_DIAMOND, MYSTICAL_SKYFIRE_DIAMOND,
};
use crate::model::talents::{Sets, Talents};
use crate::spell::Spell;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn cataclysm_cost(base: f64, talents: &Talents) -> f64 {
    base * (1.0 - 0.01 * f64::from(talents.cataclysm))
}

impl Spell {
    pub fn shadow_bolt(talents: &Talents, sets: &Sets) -> Spell {
        let mut s = Spell::base(SpellId::ShadowBolt);
        s.cast_time = 3.0 - 0.1 * f64::from(talents.bane);
        s.mana_cost = cataclysm_cost(420.0, talents);
        s.coefficient = 3.0 / 3.5 + 0.04 * f64::from(talents.shadow_and_flame);
        s.min_dmg = 544.0;
        s.max_dmg = 607.0;
        s.does_damage = true;
        s.can_crit = true;
        s.can_miss = true;
        s.school = SpellSchool::Shadow;
        s.spell_type = SpellType::Destruction;
        if sets.t6 >= 4 {
            s.modifier *= 1.06;
        }
        s.finish()
    }

    pub fn incinerate(talents: &Talents, sets: &Sets) -> Spell {
        let mut s = Spell::base(SpellId::Incinerate);
        s.cast_time = round2(2.5 * (1.0 - 0.02 * f64::from(talents.emberstorm)));
        s.mana_cost = cataclysm_cost(355.0, talents);
        s.coefficient = 2.5 / 3.5 + 0.04 * f64::from(talents.shadow_and_flame);
        s.min_dmg = 444.0;
        s.max_dmg = 514.0;
        s.bonus_damage_from_immolate_min = 111.0;
        s.bonus_damage_from_immolate_max = 128.0;
        s.does_damage = true;
        s.can_crit = true;
        s.can_miss = true;
        s.school = SpellSchool::Fire;
        s.spell_type = SpellType::Destruction;
        if sets.t6 >= 4 {
            s.modifier *= 1.06;
        }
        s.finish()
    }

    pub fn searing_pain(talents: &Talents) -> Spell {
        let mut s = Spell::base(SpellId::SearingPain);
        s.cast_time = 1.5;
        s.mana_cost = cataclysm_cost(205.0, talents);
        s.coefficient = 1.5 / 3.5;
        s.min_dmg = 270.0;
        s.max_dmg = 320.0;
        s.bonus_crit = 4.0 * f64::from(talents.improved_searing_pain);
        s.does_damage = true;
        s.can_crit = true;
        s.can_miss = true;
        s.school = SpellSchool::Fire;
        s.spell_type = SpellType::Destruction;
        s.finish()
    }

    pub fn shadowburn(talents: &Talents) -> Spell {
        let mut s = Spell::base(SpellId::Shadowburn);
        s.cooldown = 15.0;
        s.mana_cost = cataclysm_cost(515.0, talents);
        s.coefficient = 0.22;
        s.min_dmg = 597.0;
        s.max_dmg = 665.0;
        s.does_damage = true;
        s.can_crit = true;
        s.can_miss = true;
        s.is_finisher = true;
        s.school = SpellSchool::Shadow;
        s.spell_type = SpellType::Destruction;
        s.finish()
    }

    pub fn death_coil() -> Spell {
        let mut s = Spell::base(SpellId::DeathCoil);
        s.cooldown = 120.0;
        s.mana_cost = 600.0;
        s.coefficient = 0.4286;
        s.dmg = 526.0;
        s.does_damage = true;
        s.can_miss = true;
        s.is_finisher = true;
        s.school = SpellSchool::Shadow;
        s.spell_type = SpellType::Affliction;
        s.finish()
    }

    pub fn shadowfury(talents: &Talents) -> Spell {
        let mut s = Spell::base(SpellId::Shadowfury);
        s.cast_time = 0.5;
        s.cooldown = 20.0;
        s.mana_cost = cataclysm_cost(710.0, talents);
        s.coefficient = 0.195;
        s.min_dmg = 612.0;
        s.max_dmg = 728.0;
        s.does_damage = true;
        s.can_crit = true;
        s.can_miss = true;
        s.school = SpellSchool::Shadow;
        s.spell_type = SpellType::Destruction;
        s.finish()
    }

    pub fn seed_of_corruption() -> Spell {
        let mut s = Spell::base(SpellId::SeedOfCorruption);
        s.cast_time = 2.0;
        s.mana_cost = 882.0;
        s.coefficient = 0.214;
        s.min_dmg = 1110.0;
        s.max_dmg = 1290.0;
        s.aoe_cap = 13580.0;
        s.does_damage = true;
        s.can_miss = true;
        s.school = SpellSchool::Shadow;
        s.spell_type = SpellType::Affliction;
        s.finish()
    }

    pub fn conflagrate(talents: &Talents) -> Spell {
        let mut s = Spell::base(SpellId::Conflagrate);
        s.cooldown = 10.0;
        s.mana_cost = cataclysm_cost(305.0, talents);
        s.coefficient = 1.5 / 3.5;
        s.min_dmg = 579.0;
        s.max_dmg = 721.0;
        s.does_damage = true;
        s.can_crit = true;
        s.can_miss = true;
        s.is_finisher = true;
        s.school = SpellSchool::Fire;
        s.spell_type = SpellType::Destruction;
        s.finish()
    }

    pub fn corruption(talents: &Talents) -> Spell {
        let mut s = Spell::base(SpellId::Corruption);
        s.mana_cost = 370.0;
        s.cast_time = round2(2.0 - 0.4 * f64::from(talents.improved_corruption));
        s.can_miss = true;
        s.school = SpellSchool::Shadow;
        s.spell_type = SpellType::Affliction;
        s.dot_effect = Some(SpellId::Corruption);
        s.finish()
    }

    pub fn unstable_affliction() -> Spell {
        let mut s = Spell::base(SpellId::UnstableAffliction);
        s.mana_cost = 400.0;
        s.cast_time = 1.5;
        s.can_miss = true;
        s.school = SpellSchool::Shadow;
        s.spell_type = SpellType::Affliction;
        s.dot_effect = Some(SpellId::UnstableAffliction);
        s.finish()
    }

    pub fn siphon_life() -> Spell {
        let mut s = Spell::base(SpellId::SiphonLife);
        s.mana_cost = 410.0;
        s.can_miss = true;
        s.school = SpellSchool::Shadow;
        s.spell_type = SpellType::Affliction;
        s.dot_effect = Some(SpellId::SiphonLife);
        s.finish()
    }

    pub fn immolate(talents: &Talents) -> Spell {
        let mut s = Spell::base(SpellId::Immolate);
        s.mana_cost = cataclysm_cost(445.0, talents);
        s.cast_time = 2.0 - 0.1 * f64::from(talents.bane);
        s.dmg = 331.0;
        s.coefficient = 0.2;
        s.does_damage = true;
        s.can_crit = true;
        s.can_miss = true;
        s.school = SpellSchool::Fire;
        s.spell_type = SpellType::Destruction;
        s.dot_effect = Some(SpellId::Immolate);
        s.finish()
    }

    pub fn curse_of_agony() -> Spell {
        let mut s = Spell::base(SpellId::CurseOfAgony);
        s.mana_cost = 265.0;
        s.can_miss = true;
        s.school = SpellSchool::Shadow;
        s.spell_type = SpellType::Affliction;
        s.dot_effect = Some(SpellId::CurseOfAgony);
        s.finish()
    }

    pub fn curse_of_doom() -> Spell {
        let mut s = Spell::base(SpellId::CurseOfDoom);
        s.mana_cost = 380.0;
        s.cooldown = 60.0;
        s.can_miss = true;
        s.school = SpellSchool::Shadow;
        s.spell_type = SpellType::Affliction;
        s.dot_effect = Some(SpellId::CurseOfDoom);
        s.finish()
    }

    // The source never sets a school on the utility curses; on-hit proc
    // school gating therefore matches neither school for them.
    pub fn curse_of_the_elements() -> Spell {
        let mut s = Spell::base(SpellId::CurseOfTheElements);
        s.mana_cost = 260.0;
        s.can_miss = true;
        s.spell_type = SpellType::Affliction;
        s.aura_effect = Some(SpellId::CurseOfTheElements);
        s.finish()
    }

    pub fn curse_of_recklessness() -> Spell {
        let mut s = Spell::base(SpellId::CurseOfRecklessness);
        s.mana_cost = 160.0;
        s.can_miss = true;
        s.spell_type = SpellType::Affliction;
        s.aura_effect = Some(SpellId::CurseOfRecklessness);
        s.finish()
    }

    pub fn amplify_curse() -> Spell {
        let mut s = Spell::base(SpellId::AmplifyCurse);
        s.cooldown = 180.0;
        s.on_gcd = false;
        s.aura_effect = Some(SpellId::AmplifyCurse);
        s.finish()
    }

    pub fn life_tap() -> Spell {
        let mut s = Spell::base(SpellId::LifeTap);
        s.school = SpellSchool::Shadow;
        s.spell_type = SpellType::Affliction;
        s.finish()
    }

    pub fn dark_pact() -> Spell {
        let mut s = Spell::base(SpellId::DarkPact);
        s.school = SpellSchool::Shadow;
        s.spell_type = SpellType::Affliction;
        s.finish()
    }

    pub fn destruction_potion() -> Spell {
        let mut s = Spell::base(SpellId::DestructionPotion);
        s.cooldown = 120.0;
        s.is_item = true;
        s.on_gcd = false;
        s.aura_effect = Some(SpellId::DestructionPotion);
        s.finish()
    }

    pub fn super_mana_potion() -> Spell {
        let mut s = Spell::base(SpellId::SuperManaPotion);
        s.cooldown = 120.0;
        s.is_item = true;
        s.on_gcd = false;
        s.gain_mana_on_cast = true;
        s.min_mana = 1800.0;
        s.max_mana = 3000.0;
        s.finish()
    }

    pub fn demonic_rune() -> Spell {
        let mut s = Spell::base(SpellId::DemonicRune);
        s.cooldown = 120.0;
        s.is_item = true;
        s.on_gcd = false;
        s.gain_mana_on_cast = true;
        s.min_mana = 900.0;
        s.max_mana = 1500.0;
        s.finish()
    }

    pub fn flame_cap() -> Spell {
        let mut s = Spell::base(SpellId::FlameCap);
        s.cooldown = 180.0;
        s.is_item = true;
        s.on_gcd = false;
        s.aura_effect = Some(SpellId::FlameCap);
        s.finish()
    }

    pub fn chipped_power_core() -> Spell {
        let mut s = Spell::base(SpellId::ChippedPowerCore);
        s.cooldown = 120.0;
        s.usable_once_per_fight = true;
        s.on_gcd = false;
        s.gain_mana_on_cast = true;
        s.mana_gain = 1200.0;
        s.finish()
    }

    pub fn cracked_power_core() -> Spell {
        let mut s = Spell::base(SpellId::CrackedPowerCore);
        s.cooldown = 120.0;
        s.usable_once_per_fight = true;
        s.on_gcd = false;
        s.gain_mana_on_cast = true;
        s.mana_gain = 800.0;
        s.finish()
    }

    pub fn blood_fury() -> Spell {
        let mut s = Spell::base(SpellId::BloodFury);
        s.cooldown = 120.0;
        s.on_gcd = false;
        s.aura_effect = Some(SpellId::BloodFury);
        s.finish()
    }

    pub fn bloodlust() -> Spell {
        let mut s = Spell::base(SpellId::Bloodlust);
        s.cooldown = 600.0;
        s.is_item = true;
        s.on_gcd = false;
        s.is_non_warlock_ability = true;
        s.aura_effect = Some(SpellId::Bloodlust);
        s.finish()
    }

    pub fn drums_of_battle() -> Spell {
        let mut s = Spell::base(SpellId::DrumsOfBattle);
        s.cooldown = 120.0;
        s.on_gcd = false;
        s.is_non_warlock_ability = true;
        s.is_item = true;
        s.aura_effect = Some(SpellId::DrumsOfBattle);
        s.finish()
    }

    pub fn power_infusion() -> Spell {
        let mut s = Spell::base(SpellId::PowerInfusion);
        s.cooldown = 180.0;
        s.on_gcd = false;
        s.is_non_warlock_ability = true;
        s.aura_effect = Some(SpellId::PowerInfusion);
        s.finish()
    }

    pub fn innervate() -> Spell {
        let mut s = Spell::base(SpellId::Innervate);
        s.cooldown = 360.0;
        s.on_gcd = false;
        s.is_non_warlock_ability = true;
        s.aura_effect = Some(SpellId::Innervate);
        s.finish()
    }

    pub fn mana_tide_totem() -> Spell {
        let mut s = Spell::base(SpellId::ManaTideTotem);
        s.cooldown = 300.0;
        s.is_non_warlock_ability = true;
        s.finish()
    }

    pub fn improved_shadow_bolt(talents: &Talents, sim: &SimulationSettings) -> Spell {
        let mut s = Spell::base(SpellId::ImprovedShadowBolt);
        s.proc_chance = 100.0;
        s.procs_on_crit = true;
        s.on_crit_procs_enabled = !sim.using_custom_isb_uptime && talents.improved_shadow_bolt > 0;
        s.on_gcd = false;
        s.is_proc = true;
        s.aura_effect = Some(SpellId::ImprovedShadowBolt);
        s.finish()
    }

    pub fn nightfall(talents: &Talents) -> Spell {
        let mut s = Spell::base(SpellId::Nightfall);
        s.proc_chance = 2.0 * f64::from(talents.nightfall);
        s.procs_on_dot_ticks = true;
        s.on_dot_tick_procs_enabled = talents.nightfall > 0;
        s.on_gcd = false;
        s.is_proc = true;
        s.aura_effect = Some(SpellId::ShadowTrance);
        s.finish()
    }

    pub fn timbals_focusing_crystal() -> Spell {
        let mut s = Spell::base(SpellId::TimbalsFocusingCrystal);
        s.cooldown = 15.0;
        s.on_gcd = false;
        s.proc_chance = 10.0;
        s.min_dmg = 285.0;
        s.max_dmg = 475.0;
        s.does_damage = true;
        s.is_proc = true;
        s.can_crit = true;
        s.can_miss = true;
        s.school = SpellSchool::Shadow;
        s.procs_on_dot_ticks = true;
        s.on_dot_tick_procs_enabled = true;
        s.finish()
    }

    pub fn mark_of_defiance() -> Spell {
        let mut s = Spell::base(SpellId::MarkOfDefiance);
        s.cooldown = 17.0;
        s.proc_chance = 15.0;
        s.on_gcd = false;
        s.is_proc = true;
        s.is_item = true;
        s.gain_mana_on_cast = true;
        s.min_mana = 128.0;
        s.max_mana = 172.0;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = true;
        s.finish()
    }

    pub fn judgement_of_wisdom() -> Spell {
        let mut s = Spell::base(SpellId::JudgementOfWisdom);
        s.mana_gain = 74.0;
        s.gain_mana_on_cast = true;
        s.is_proc = true;
        s.on_gcd = false;
        s.proc_chance = 50.0;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = true;
        s.finish()
    }

    pub fn the_lightning_capacitor() -> Spell {
        let mut s = Spell::base(SpellId::TheLightningCapacitor);
        s.cooldown = 2.5;
        s.min_dmg = 694.0;
        s.max_dmg = 806.0;
        s.proc_chance = 100.0;
        s.does_damage = true;
        s.can_crit = true;
        s.can_miss = true;
        s.on_gcd = false;
        s.procs_on_crit = true;
        s.on_crit_procs_enabled = true;
        s.finish()
    }

    pub fn shiffars_nexus_horn() -> Spell {
        let mut s = Spell::base(SpellId::ShiffarsNexusHorn);
        s.cooldown = 45.0;
        s.proc_chance = 20.0;
        s.on_gcd = false;
        s.is_item = true;
        s.procs_on_crit = true;
        s.on_crit_procs_enabled = true;
        s.aura_effect = Some(SpellId::ShiffarsNexusHorn);
        s.finish()
    }

    pub fn sextant_of_unstable_currents() -> Spell {
        let mut s = Spell::base(SpellId::SextantOfUnstableCurrents);
        s.cooldown = 45.0;
        s.proc_chance = 20.0;
        s.on_gcd = false;
        s.is_item = true;
        s.procs_on_crit = true;
        s.on_crit_procs_enabled = true;
        s.aura_effect = Some(SpellId::SextantOfUnstableCurrents);
        s.finish()
    }

    pub fn quagmirrans_eye() -> Spell {
        let mut s = Spell::base(SpellId::QuagmirransEye);
        s.cooldown = 45.0;
        s.proc_chance = 10.0;
        s.on_gcd = false;
        s.is_item = true;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = true;
        s.aura_effect = Some(SpellId::QuagmirransEye);
        s.finish()
    }

    pub fn blade_of_wizardry() -> Spell {
        let mut s = Spell::base(SpellId::BladeOfWizardry);
        s.cooldown = 50.0;
        s.proc_chance = 15.0;
        s.on_gcd = false;
        s.is_item = true;
        s.is_proc = true;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = true;
        s.aura_effect = Some(SpellId::BladeOfWizardry);
        s.finish()
    }

    pub fn band_of_the_eternal_sage() -> Spell {
        let mut s = Spell::base(SpellId::BandOfTheEternalSage);
        s.cooldown = 60.0;
        s.proc_chance = 10.0;
        s.on_gcd = false;
        s.is_item = true;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = true;
        s.aura_effect = Some(SpellId::BandOfTheEternalSage);
        s.finish()
    }

    pub fn robe_of_the_elder_scribes() -> Spell {
        let mut s = Spell::base(SpellId::RobeOfTheElderScribes);
        s.cooldown = 50.0;
        s.proc_chance = 20.0;
        s.on_gcd = false;
        s.is_item = true;
        s.is_proc = true;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = true;
        s.aura_effect = Some(SpellId::RobeOfTheElderScribes);
        s.finish()
    }

    pub fn shattered_sun_pendant_aldor() -> Spell {
        let mut s = Spell::base(SpellId::ShatteredSunPendantAldor);
        s.cooldown = 45.0;
        s.proc_chance = 15.0;
        s.is_proc = true;
        s.on_gcd = false;
        s.is_item = true;
        s.procs_on_damage = true;
        s.on_damage_procs_enabled = true;
        s.aura_effect = Some(SpellId::ShatteredSunPendantAldor);
        s.finish()
    }

    pub fn shattered_sun_pendant_scryers() -> Spell {
        let mut s = Spell::base(SpellId::ShatteredSunPendantScryers);
        s.cooldown = 45.0;
        s.proc_chance = 15.0;
        s.min_dmg = 333.0;
        s.max_dmg = 367.0;
        s.on_gcd = false;
        s.is_item = true;
        s.does_damage = true;
        s.can_crit = true;
        s.can_miss = true;
        s.procs_on_damage = true;
        s.on_damage_procs_enabled = true;
        s.finish()
    }

    pub fn mystical_skyfire_diamond() -> Spell {
        let mut s = Spell::base(SpellId::MysticalSkyfireDiamond);
        s.cooldown = 35.0;
        s.proc_chance = 15.0;
        s.on_gcd = false;
        s.is_proc = true;
        s.is_item = true;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = true;
        s.aura_effect = Some(SpellId::MysticalSkyfireDiamond);
        s.finish()
    }

    pub fn insightful_earthstorm_diamond() -> Spell {
        let mut s = Spell::base(SpellId::InsightfulEarthstormDiamond);
        s.cooldown = 15.0;
        s.proc_chance = 5.0;
        s.on_gcd = false;
        s.is_proc = true;
        s.is_item = true;
        s.gain_mana_on_cast = true;
        s.mana_gain = 300.0;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = true;
        s.finish()
    }

    pub fn flameshadow(sets: &Sets) -> Spell {
        let mut s = Spell::base(SpellId::Flameshadow);
        s.is_proc = true;
        s.on_gcd = false;
        s.proc_chance = 5.0;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = sets.t4 >= 2;
        s.procs_from_fire_spells = false;
        s.aura_effect = Some(SpellId::Flameshadow);
        s.finish()
    }

    pub fn shadowflame(sets: &Sets) -> Spell {
        let mut s = Spell::base(SpellId::Shadowflame);
        s.is_proc = true;
        s.on_gcd = false;
        s.proc_chance = 5.0;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = sets.t4 >= 2;
        s.procs_from_shadow_spells = false;
        s.aura_effect = Some(SpellId::Shadowflame);
        s.finish()
    }

    pub fn spellstrike(sets: &Sets) -> Spell {
        let mut s = Spell::base(SpellId::Spellstrike);
        s.is_proc = true;
        s.on_gcd = false;
        s.proc_chance = 5.0;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = sets.spellstrike == 2;
        s.aura_effect = Some(SpellId::Spellstrike);
        s.finish()
    }

    pub fn mana_etched_4_set(sets: &Sets) -> Spell {
        let mut s = Spell::base(SpellId::ManaEtched4Set);
        s.is_proc = true;
        s.on_gcd = false;
        s.proc_chance = 2.0;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = sets.mana_etched >= 4;
        s.aura_effect = Some(SpellId::ManaEtched4Set);
        s.finish()
    }

    pub fn ashtongue_talisman_of_shadows() -> Spell {
        let mut s = Spell::base(SpellId::AshtongueTalismanOfShadows);
        s.is_proc = true;
        s.on_gcd = false;
        s.proc_chance = 20.0;
        s.procs_on_dot_ticks = true;
        s.on_dot_tick_procs_enabled = true;
        s.aura_effect = Some(SpellId::AshtongueTalismanOfShadows);
        s.finish()
    }

    pub fn wrath_of_cenarius() -> Spell {
        let mut s = Spell::base(SpellId::WrathOfCenarius);
        s.is_proc = true;
        s.on_gcd = false;
        s.proc_chance = 5.0;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = true;
        s.aura_effect = Some(SpellId::WrathOfCenarius);
        s.finish()
    }

    pub fn darkmoon_card_crusade() -> Spell {
        let mut s = Spell::base(SpellId::DarkmoonCardCrusade);
        s.is_proc = true;
        s.on_gcd = false;
        s.proc_chance = 100.0;
        s.procs_on_hit = true;
        s.on_hit_procs_enabled = true;
        s.aura_effect = Some(SpellId::DarkmoonCardCrusade);
        s.finish()
    }
}

fn trinket_spell(trinket: Trinket) -> Spell {
    match trinket {
        Trinket::TimbalsFocusingCrystal => Spell::timbals_focusing_crystal(),
        Trinket::MarkOfDefiance => Spell::mark_of_defiance(),
        Trinket::TheLightningCapacitor => Spell::the_lightning_capacitor(),
        Trinket::ShiffarsNexusHorn => Spell::shiffars_nexus_horn(),
        Trinket::SextantOfUnstableCurrents => Spell::sextant_of_unstable_currents(),
        Trinket::QuagmirransEye => Spell::quagmirrans_eye(),
        Trinket::AshtongueTalismanOfShadows => Spell::ashtongue_talisman_of_shadows(),
        Trinket::DarkmoonCardCrusade => Spell::darkmoon_card_crusade(),
    }
}

/// The spells, auras and DoTs a configuration owns, constructed in the
/// fixed order that defines proc registration.
pub(crate) fn build_spellbook(
    settings: &PlayerSettings,
    sim: &SimulationSettings,
) -> (Vec<Spell>, Vec<Aura>, Vec<DamageOverTime>) {
    let talents = &settings.talents;
    let sets = &settings.sets;
    let auras_selected = &settings.auras;
    let rotation = &settings.rotation;

    let mut spells = Vec::new();
    let mut auras = Vec::new();
    let mut dots = Vec::new();

    // Mana returns first, then the damage rotation.
    spells.push(Spell::life_tap());
    if talents.dark_pact > 0 {
        spells.push(Spell::dark_pact());
    }
    spells.push(Spell::shadow_bolt(talents, sets));
    spells.push(Spell::incinerate(talents, sets));
    if rotation.filler == FillerChoice::SearingPain {
        spells.push(Spell::searing_pain(talents));
    }
    if rotation.use_shadowburn && talents.shadowburn > 0 {
        spells.push(Spell::shadowburn(talents));
    }
    if rotation.use_death_coil {
        spells.push(Spell::death_coil());
    }
    if rotation.use_shadowfury && talents.shadowfury > 0 {
        spells.push(Spell::shadowfury(talents));
    }
    if talents.conflagrate > 0 {
        spells.push(Spell::conflagrate(talents));
    }
    spells.push(Spell::seed_of_corruption());

    if rotation.keep_corruption {
        spells.push(Spell::corruption(talents));
        dots.push(DamageOverTime::corruption(
            talents.empowered_corruption,
            talents.contagion,
        ));
    }
    if rotation.keep_siphon_life && talents.siphon_life > 0 {
        spells.push(Spell::siphon_life());
        dots.push(DamageOverTime::siphon_life());
    }
    if rotation.keep_immolate {
        spells.push(Spell::immolate(talents));
        dots.push(DamageOverTime::immolate());
    }
    if rotation.keep_unstable_affliction && talents.unstable_affliction > 0 {
        spells.push(Spell::unstable_affliction());
        dots.push(DamageOverTime::unstable_affliction());
    }

    match rotation.curse {
        CurseChoice::Elements => {
            spells.push(Spell::curse_of_the_elements());
            auras.push(Aura::curse_of_the_elements(
                talents.improved_curse_of_the_elements,
            ));
        }
        CurseChoice::Recklessness => {
            spells.push(Spell::curse_of_recklessness());
            auras.push(Aura::curse_of_recklessness());
        }
        CurseChoice::Doom => {
            spells.push(Spell::curse_of_doom());
            dots.push(DamageOverTime::curse_of_doom());
        }
        CurseChoice::Agony => {
            spells.push(Spell::curse_of_agony());
            dots.push(DamageOverTime::curse_of_agony(
                talents.improved_curse_of_agony,
                talents.contagion,
            ));
        }
        CurseChoice::None => {}
    }
    if talents.amplify_curse > 0 {
        spells.push(Spell::amplify_curse());
        auras.push(Aura::amplify_curse());
    }

    // Cooldowns and consumables.
    if auras_selected.destruction_potion {
        spells.push(Spell::destruction_potion());
        auras.push(Aura::destruction_potion());
    }
    if auras_selected.super_mana_potion {
        spells.push(Spell::super_mana_potion());
    }
    if auras_selected.demonic_rune {
        spells.push(Spell::demonic_rune());
    }
    if auras_selected.flame_cap {
        spells.push(Spell::flame_cap());
        auras.push(Aura::flame_cap());
    }
    if auras_selected.chipped_power_core {
        spells.push(Spell::chipped_power_core());
    }
    if auras_selected.cracked_power_core {
        spells.push(Spell::cracked_power_core());
    }
    if auras_selected.blood_fury {
        spells.push(Spell::blood_fury());
        auras.push(Aura::blood_fury());
    }
    if auras_selected.bloodlust {
        spells.push(Spell::bloodlust());
        auras.push(Aura::bloodlust());
    }
    if auras_selected.drums_of_battle {
        spells.push(Spell::drums_of_battle());
        auras.push(Aura::drums_of_battle());
    }
    if auras_selected.power_infusion {
        spells.push(Spell::power_infusion());
        auras.push(Aura::power_infusion());
    }
    if auras_selected.innervate {
        spells.push(Spell::innervate());
        auras.push(Aura::innervate());
    }
    // Mana Tide Totem is deliberately left out of the book: the source
    // constructs it without registering it, so it never participates.

    // Proc fabric.
    if talents.improved_shadow_bolt > 0 {
        spells.push(Spell::improved_shadow_bolt(talents, sim));
        auras.push(Aura::improved_shadow_bolt(talents.improved_shadow_bolt));
    }
    if talents.nightfall > 0 {
        spells.push(Spell::nightfall(talents));
        auras.push(Aura::shadow_trance());
    }
    for trinket in [settings.trinket_1, settings.trinket_2].into_iter().flatten() {
        spells.push(trinket_spell(trinket));
        match trinket {
            Trinket::TheLightningCapacitor => auras.push(Aura::the_lightning_capacitor()),
            Trinket::ShiffarsNexusHorn => auras.push(Aura::shiffars_nexus_horn()),
            Trinket::SextantOfUnstableCurrents => {
                auras.push(Aura::sextant_of_unstable_currents())
            }
            Trinket::QuagmirransEye => auras.push(Aura::quagmirrans_eye()),
            Trinket::AshtongueTalismanOfShadows => {
                auras.push(Aura::ashtongue_talisman_of_shadows())
            }
            Trinket::DarkmoonCardCrusade => auras.push(Aura::darkmoon_card_crusade()),
            Trinket::TimbalsFocusingCrystal | Trinket::MarkOfDefiance => {}
        }
    }
    if auras_selected.judgement_of_wisdom {
        spells.push(Spell::judgement_of_wisdom());
    }
    if settings.meta_gem_id == MYSTICAL_SKYFIRE_DIAMOND {
        spells.push(Spell::mystical_skyfire_diamond());
        auras.push(Aura::mystical_skyfire_diamond());
    }
    if settings.meta_gem_id == INSIGHTFUL_EARTHSTORM_DIAMOND {
        spells.push(Spell::insightful_earthstorm_diamond());
    }
    if sets.t4 >= 2 {
        spells.push(Spell::flameshadow(sets));
        auras.push(Aura::flameshadow());
        spells.push(Spell::shadowflame(sets));
        auras.push(Aura::shadowflame());
    }
    if sets.spellstrike == 2 {
        spells.push(Spell::spellstrike(sets));
        auras.push(Aura::spellstrike());
    }
    if sets.mana_etched >= 4 {
        spells.push(Spell::mana_etched_4_set(sets));
        auras.push(Aura::mana_etched_4_set());
    }
    if auras_selected.wrath_of_cenarius {
        spells.push(Spell::wrath_of_cenarius());
        auras.push(Aura::wrath_of_cenarius());
    }
    if auras_selected.robe_of_the_elder_scribes {
        spells.push(Spell::robe_of_the_elder_scribes());
        auras.push(Aura::robe_of_the_elder_scribes());
    }
    if auras_selected.blade_of_wizardry {
        spells.push(Spell::blade_of_wizardry());
        auras.push(Aura::blade_of_wizardry());
    }
    if auras_selected.band_of_the_eternal_sage {
        spells.push(Spell::band_of_the_eternal_sage());
        auras.push(Aura::band_of_the_eternal_sage());
    }
    if auras_selected.darkmoon_card_crusade
        && settings.trinket_1 != Some(Trinket::DarkmoonCardCrusade)
        && settings.trinket_2 != Some(Trinket::DarkmoonCardCrusade)
    {
        spells.push(Spell::darkmoon_card_crusade());
        auras.push(Aura::darkmoon_card_crusade());
    }
    if auras_selected.shattered_sun_pendant_aldor {
        spells.push(Spell::shattered_sun_pendant_aldor());
        auras.push(Aura::shattered_sun_pendant_aldor());
    }
    if auras_selected.shattered_sun_pendant_scryers {
        spells.push(Spell::shattered_sun_pendant_scryers());
    }

    (spells, auras, dots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::SimulationConfig;

    #[test]
    fn shadow_bolt_matches_the_spell_data() {
        let talents = Talents::default();
        let sets = Sets::default();
        let spell = Spell::shadow_bolt(&talents, &sets);
        assert_eq!(spell.cast_time, 3.0);
        assert_eq!(spell.mana_cost, 420.0);
        assert!((spell.coefficient - 3.0 / 3.5).abs() < 1e-12);
        assert_eq!(spell.dmg, 575.5);
        assert!(spell.can_crit && spell.can_miss && spell.does_damage);
    }

    #[test]
    fn talents_shape_the_definitions() {
        let mut talents = Talents::default();
        talents.bane = 5;
        talents.cataclysm = 5;
        talents.shadow_and_flame = 5;
        let sets = Sets::default();
        let spell = Spell::shadow_bolt(&talents, &sets);
        assert!((spell.cast_time - 2.5).abs() < 1e-12);
        assert!((spell.mana_cost - 399.0).abs() < 1e-12);
        assert!((spell.coefficient - (3.0 / 3.5 + 0.2)).abs() < 1e-12);
    }

    #[test]
    fn t6_four_piece_boosts_the_fillers() {
        let talents = Talents::default();
        let mut sets = Sets::default();
        sets.t6 = 4;
        assert!((Spell::shadow_bolt(&talents, &sets).modifier - 1.06).abs() < 1e-12);
        assert!((Spell::incinerate(&talents, &sets).modifier - 1.06).abs() < 1e-12);
    }

    #[test]
    fn spellbook_order_is_deterministic() {
        let mut config = SimulationConfig::default();
        config.player.rotation.keep_corruption = true;
        config.player.auras.destruction_potion = true;
        let (a, _, _) = build_spellbook(&config.player, &config.simulation);
        let (b, _, _) = build_spellbook(&config.player, &config.simulation);
        let ids_a: Vec<_> = a.iter().map(|s| s.id).collect();
        let ids_b: Vec<_> = b.iter().map(|s| s.id).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn mana_tide_totem_is_never_registered() {
        // The definition exists but stays out of the book, so it can never
        // tick, cast or appear in the breakdown.
        let totem = Spell::mana_tide_totem();
        assert!(totem.is_non_warlock_ability);
        assert_eq!(totem.cooldown, 300.0);

        let mut config = SimulationConfig::default();
        config.player.auras.mana_tide_totem = true;
        let (spells, _, _) = build_spellbook(&config.player, &config.simulation);
        assert!(spells.iter().all(|s| s.id != SpellId::ManaTideTotem));
    }

    #[test]
    fn isb_proc_respects_the_custom_uptime_flag() {
        let mut config = SimulationConfig::default();
        config.player.talents.improved_shadow_bolt = 5;
        let (spells, _, _) = build_spellbook(&config.player, &config.simulation);
        let isb = spells
            .iter()
            .find(|s| s.id == SpellId::ImprovedShadowBolt)
            .unwrap();
        assert!(isb.on_crit_procs_enabled);

        config.simulation.using_custom_isb_uptime = true;
        let (spells, _, _) = build_spellbook(&config.player, &config.simulation);
        let isb = spells
            .iter()
            .find(|s| s.id == SpellId::ImprovedShadowBolt)
            .unwrap();
        assert!(!isb.on_crit_procs_enabled);
    }

    #[test]
    fn t4_procs_are_school_gated() {
        let flameshadow = Spell::flameshadow(&Sets { t4: 2, ..Default::default() });
        assert!(flameshadow.procs_from_shadow_spells);
        assert!(!flameshadow.procs_from_fire_spells);
        let shadowflame = Spell::shadowflame(&Sets { t4: 2, ..Default::default() });
        assert!(!shadowflame.procs_from_shadow_spells);
        assert!(shadowflame.procs_from_fire_spells);
    }
}
