//! Character classes and subclasses.
//!
//! Class definitions are immutable data. A character copies the parts it
//! needs at creation. Base attributes are added once and stat bonuses are
//! layered on every recompute. Favored attributes describe the class and carry
//! no rule.

use std::collections::BTreeMap;

use crate::attributes::{AttributeKind, AttributeModifiers, Attributes};
use crate::ids::SpellId;
use crate::stats::{StatBonuses, StatKind};

/// Which pool a class spends to cast.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceType {
    Health,
    #[default]
    Mana,
    Rage,
    Energy,
    Focus,
    Radiopower,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubclassDefinition {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Name of the one class this subclass specializes.
    pub parent_class: String,
    /// Applied once, when the subclass is selected.
    pub attribute_modifiers: AttributeModifiers,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDefinition {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub resource_type: ResourceType,
    /// Starting attribute values, added to an all-zero store at creation.
    pub base_attributes: AttributeModifiers,
    /// Attributes the class leans on. Descriptive; levelling does not read them.
    #[cfg_attr(feature = "serde", serde(default))]
    pub favored_attributes: AttributeModifiers,
    /// Flat deltas layered on top of derived stats.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stat_bonuses: StatBonuses,
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting_spells: Vec<SpellId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub subclasses: Vec<SubclassDefinition>,
}

impl ClassDefinition {
    /// Default value for attributes a class does not call out.
    pub const DEFAULT_ATTRIBUTE: i32 = 5;

    /// Attribute store a new character of this class starts with.
    pub fn starting_attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.apply_modifiers(self.base_attributes.iter().map(|(k, v)| (*k, *v)));
        attributes
    }

    pub fn subclass(&self, name: &str) -> Option<&SubclassDefinition> {
        self.subclasses.iter().find(|s| s.name == name)
    }
}

/// Named class definitions.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ClassCatalog {
    classes: BTreeMap<String, ClassDefinition>,
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any class of the same name.
    pub fn insert(&mut self, class: ClassDefinition) -> Option<ClassDefinition> {
        self.classes.insert(class.name.clone(), class)
    }

    pub fn get(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The four playable classes shipped with the game.
    pub fn builtin() -> Self {
        use AttributeKind::*;

        let mut catalog = Self::new();
        catalog.insert(ClassDefinition {
            name: "Radiomancer".into(),
            description: "Channels unstable isotopes into ranged destruction.".into(),
            resource_type: ResourceType::Radiopower,
            base_attributes: base_attributes(&[(Offense, 8), (Tenacity, 7)]),
            favored_attributes: favored(&[Offense, Tenacity, Expertise]),
            stat_bonuses: bonuses(&[(StatKind::MagicalDamage, 15.0)]),
            starting_spells: spells(&["Radiation Bolt", "Atomic Shield", "Isotope Drain"]),
            subclasses: Vec::new(),
        });
        catalog.insert(ClassDefinition {
            name: "Brawler".into(),
            description: "A close-combat fighter who wins with fists and grit.".into(),
            resource_type: ResourceType::Rage,
            base_attributes: base_attributes(&[(Resilience, 8), (Offense, 7)]),
            favored_attributes: favored(&[Offense, Resilience, Tenacity]),
            stat_bonuses: bonuses(&[
                (StatKind::PhysicalDamage, 15.0),
                (StatKind::DamageReduction, 5.0),
            ]),
            starting_spells: spells(&["Heavy Punch", "Block", "Adrenaline Rush"]),
            subclasses: Vec::new(),
        });
        catalog.insert(ClassDefinition {
            name: "Gunslinger".into(),
            description: "Trades armor for reflexes and a fast trigger finger.".into(),
            resource_type: ResourceType::Energy,
            base_attributes: base_attributes(&[(Expertise, 8), (Fortuity, 7)]),
            favored_attributes: favored(&[Offense, Expertise, Fortuity]),
            stat_bonuses: bonuses(&[
                (StatKind::CriticalChance, 5.0),
                (StatKind::AttackSpeed, 10.0),
            ]),
            starting_spells: spells(&["Quick Shot", "Dodge Roll", "Trick Shot"]),
            subclasses: Vec::new(),
        });
        catalog.insert(ClassDefinition {
            name: "Gambler".into(),
            description: "Bets everything on luck, and usually collects.".into(),
            resource_type: ResourceType::Focus,
            base_attributes: base_attributes(&[(Fortuity, 9), (Negotiation, 8)]),
            favored_attributes: favored(&[Fortuity, Negotiation, Offense]),
            stat_bonuses: bonuses(&[
                (StatKind::MagicFind, 20.0),
                (StatKind::CriticalDamage, 10.0),
            ]),
            starting_spells: spells(&["Lucky Strike", "Fortune's Favor", "Wild Card"]),
            subclasses: Vec::new(),
        });
        catalog
    }
}

fn base_attributes(overrides: &[(AttributeKind, i32)]) -> AttributeModifiers {
    let mut base: AttributeModifiers = AttributeKind::ALL
        .iter()
        .map(|kind| (*kind, ClassDefinition::DEFAULT_ATTRIBUTE))
        .collect();
    base.extend(overrides.iter().copied());
    base
}

fn favored(kinds: &[AttributeKind]) -> AttributeModifiers {
    kinds.iter().map(|kind| (*kind, 1)).collect()
}

fn bonuses(entries: &[(StatKind, f32)]) -> StatBonuses {
    entries.iter().copied().collect()
}

fn spells(names: &[&str]) -> Vec<SpellId> {
    names.iter().map(|name| SpellId::from(*name)).collect()
}
