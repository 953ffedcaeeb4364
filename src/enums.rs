use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpellSchool {
    #[default]
    None,
    Shadow,
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpellType {
    #[default]
    None,
    Affliction,
    Destruction,
}

/// How an aura's stat delta combines with the current stat value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculation {
    Additive,
    Multiplicative,
}

/// Identity of every spell, aura and damage-over-time effect the engine
/// knows about. Proc registries and the combat-log breakdown key off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellId {
    // Rotation spells
    ShadowBolt,
    Incinerate,
    SearingPain,
    SoulFire,
    Shadowburn,
    DeathCoil,
    Shadowfury,
    SeedOfCorruption,
    Conflagrate,
    Corruption,
    UnstableAffliction,
    SiphonLife,
    Immolate,
    CurseOfAgony,
    CurseOfDoom,
    CurseOfTheElements,
    CurseOfRecklessness,
    AmplifyCurse,
    LifeTap,
    DarkPact,
    // Cooldowns and consumables
    DestructionPotion,
    SuperManaPotion,
    DemonicRune,
    FlameCap,
    ChippedPowerCore,
    CrackedPowerCore,
    BloodFury,
    Bloodlust,
    DrumsOfBattle,
    PowerInfusion,
    Innervate,
    ManaTideTotem,
    // Procs and their auras
    ImprovedShadowBolt,
    ShadowTrance,
    Nightfall,
    TimbalsFocusingCrystal,
    MarkOfDefiance,
    JudgementOfWisdom,
    InsightfulEarthstormDiamond,
    MysticalSkyfireDiamond,
    TheLightningCapacitor,
    ShiffarsNexusHorn,
    SextantOfUnstableCurrents,
    QuagmirransEye,
    BladeOfWizardry,
    BandOfTheEternalSage,
    RobeOfTheElderScribes,
    ShatteredSunPendantAldor,
    ShatteredSunPendantScryers,
    Flameshadow,
    Shadowflame,
    Spellstrike,
    ManaEtched4Set,
    AshtongueTalismanOfShadows,
    WrathOfCenarius,
    DarkmoonCardCrusade,
    // Pet
    Firebolt,
}

impl SpellId {
    pub fn name(&self) -> &'static str {
        match self {
            SpellId::ShadowBolt => "Shadow Bolt",
            SpellId::Incinerate => "Incinerate",
            SpellId::SearingPain => "Searing Pain",
            SpellId::SoulFire => "Soul Fire",
            SpellId::Shadowburn => "Shadowburn",
            SpellId::DeathCoil => "Death Coil",
            SpellId::Shadowfury => "Shadowfury",
            SpellId::SeedOfCorruption => "Seed of Corruption",
            SpellId::Conflagrate => "Conflagrate",
            SpellId::Corruption => "Corruption",
            SpellId::UnstableAffliction => "Unstable Affliction",
            SpellId::SiphonLife => "Siphon Life",
            SpellId::Immolate => "Immolate",
            SpellId::CurseOfAgony => "Curse of Agony",
            SpellId::CurseOfDoom => "Curse of Doom",
            SpellId::CurseOfTheElements => "Curse of the Elements",
            SpellId::CurseOfRecklessness => "Curse of Recklessness",
            SpellId::AmplifyCurse => "Amplify Curse",
            SpellId::LifeTap => "Life Tap",
            SpellId::DarkPact => "Dark Pact",
            SpellId::DestructionPotion => "Destruction Potion",
            SpellId::SuperManaPotion => "Super Mana Potion",
            SpellId::DemonicRune => "Demonic Rune",
            SpellId::FlameCap => "Flame Cap",
            SpellId::ChippedPowerCore => "Chipped Power Core",
            SpellId::CrackedPowerCore => "Cracked Power Core",
            SpellId::BloodFury => "Blood Fury",
            SpellId::Bloodlust => "Bloodlust",
            SpellId::DrumsOfBattle => "Drums of Battle",
            SpellId::PowerInfusion => "Power Infusion",
            SpellId::Innervate => "Innervate",
            SpellId::ManaTideTotem => "Mana Tide Totem",
            SpellId::ImprovedShadowBolt => "Improved Shadow Bolt",
            SpellId::ShadowTrance => "Shadow Trance",
            SpellId::Nightfall => "Nightfall",
            SpellId::TimbalsFocusingCrystal => "Timbal's Focusing Crystal",
            SpellId::MarkOfDefiance => "Mark of Defiance",
            SpellId::JudgementOfWisdom => "Judgement of Wisdom",
            SpellId::InsightfulEarthstormDiamond => "Insightful Earthstorm Diamond",
            SpellId::MysticalSkyfireDiamond => "Mystical Skyfire Diamond",
            SpellId::TheLightningCapacitor => "The Lightning Capacitor",
            SpellId::ShiffarsNexusHorn => "Shiffar's Nexus-Horn",
            SpellId::SextantOfUnstableCurrents => "Sextant of Unstable Currents",
            SpellId::QuagmirransEye => "Quagmirran's Eye",
            SpellId::BladeOfWizardry => "Blade of Wizardry",
            SpellId::BandOfTheEternalSage => "Band of the Eternal Sage",
            SpellId::RobeOfTheElderScribes => "Robe of the Elder Scribes",
            SpellId::ShatteredSunPendantAldor => "Shattered Sun Pendant of Acumen (Aldor)",
            SpellId::ShatteredSunPendantScryers => "Shattered Sun Pendant of Acumen (Scryers)",
            SpellId::Flameshadow => "Flameshadow",
            SpellId::Shadowflame => "Shadowflame",
            SpellId::Spellstrike => "Spellstrike",
            SpellId::ManaEtched4Set => "Mana-Etched 4-Set",
            SpellId::AshtongueTalismanOfShadows => "Ashtongue Talisman of Shadows",
            SpellId::WrathOfCenarius => "Wrath of Cenarius",
            SpellId::DarkmoonCardCrusade => "Darkmoon Card: Crusade",
            SpellId::Firebolt => "Firebolt",
        }
    }
}

impl std::fmt::Display for SpellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
