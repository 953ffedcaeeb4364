use serde::{Deserialize, Serialize};

/// Talent point allocations. Only the talents the damage formulas read are
/// modelled; everything defaults to zero points.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Talents {
    // Affliction
    pub suppression: u8,
    pub improved_corruption: u8,
    pub improved_curse_of_agony: u8,
    pub improved_life_tap: u8,
    pub amplify_curse: u8,
    pub improved_curse_of_the_elements: u8,
    pub nightfall: u8,
    pub empowered_corruption: u8,
    pub siphon_life: u8,
    pub shadow_mastery: u8,
    pub contagion: u8,
    pub dark_pact: u8,
    pub unstable_affliction: u8,
    // Demonology
    pub demonic_knowledge: u8,
    // Destruction
    pub improved_shadow_bolt: u8,
    pub bane: u8,
    pub cataclysm: u8,
    pub devastation: u8,
    pub improved_searing_pain: u8,
    pub improved_immolate: u8,
    pub ruin: u8,
    pub emberstorm: u8,
    pub conflagrate: u8,
    pub shadowburn: u8,
    pub shadowfury: u8,
    pub shadow_and_flame: u8,
}

/// Equipped set piece counts. Bonuses gate on thresholds (2pc / 4pc).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Sets {
    pub t4: u8,
    pub t5: u8,
    pub t6: u8,
    pub spellstrike: u8,
    pub oblivion: u8,
    pub mana_etched: u8,
}

/// External buffs and debuffs selected for the fight.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuraSelection {
    // Target debuffs
    pub curse_of_the_elements: bool,
    pub shadow_weaving: bool,
    pub misery: bool,
    pub judgement_of_wisdom: bool,
    // Externally granted abilities
    pub power_infusion: bool,
    pub bloodlust: bool,
    pub drums_of_battle: bool,
    pub innervate: bool,
    pub mana_tide_totem: bool,
    // Racial / consumables
    pub blood_fury: bool,
    pub destruction_potion: bool,
    pub super_mana_potion: bool,
    pub demonic_rune: bool,
    pub flame_cap: bool,
    pub chipped_power_core: bool,
    pub cracked_power_core: bool,
    // Equipment procs not covered by set counts or trinket slots
    pub wrath_of_cenarius: bool,
    pub robe_of_the_elder_scribes: bool,
    pub blade_of_wizardry: bool,
    pub band_of_the_eternal_sage: bool,
    pub darkmoon_card_crusade: bool,
    pub shattered_sun_pendant_aldor: bool,
    pub shattered_sun_pendant_scryers: bool,
}
